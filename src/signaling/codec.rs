use crate::signaling::{
    decode_error::{DecodeError, EncodeError},
    envelope::{InboundEnvelope, OutboundEnvelope},
    signaling_message::{IceCandidate, SdpKind, SessionDescription, SignalingMessage},
};

/// Decodes one signaling text into a typed message.
///
/// # Errors
/// - [`DecodeError::Malformed`] if `raw` is not a JSON object or a field has
///   the wrong type.
/// - [`DecodeError::MissingField`] if `type` or a field it requires is absent.
/// - [`DecodeError::UnknownType`] for an unrecognised `type`.
pub fn parse(raw: &str) -> Result<SignalingMessage, DecodeError> {
    let env: InboundEnvelope = serde_json::from_str(raw)?;
    let kind = env.kind.ok_or(DecodeError::MissingField("type"))?;

    match kind.as_str() {
        "candidate" => Ok(SignalingMessage::Candidate(IceCandidate {
            mid: env.id.ok_or(DecodeError::MissingField("id"))?,
            sdp_mline_index: env.label.ok_or(DecodeError::MissingField("label"))?,
            candidate: env.candidate.ok_or(DecodeError::MissingField("candidate"))?,
        })),
        "offer" | "answer" => {
            let sdp = env.sdp.ok_or(DecodeError::MissingField("sdp"))?;
            let kind = if kind == "offer" {
                SdpKind::Offer
            } else {
                SdpKind::Answer
            };
            Ok(SignalingMessage::Description(SessionDescription { kind, sdp }))
        }
        "bye" => Ok(SignalingMessage::Bye),
        other => Err(DecodeError::UnknownType(other.to_owned())),
    }
}

/// Encodes a message into the same envelope [`parse`] accepts.
///
/// # Errors
/// [`EncodeError`] if serialization fails.
pub fn encode(msg: &SignalingMessage) -> Result<String, EncodeError> {
    let mut env = OutboundEnvelope::bare(msg.type_name());
    match msg {
        SignalingMessage::Candidate(c) => {
            env.id = Some(&c.mid);
            env.label = Some(c.sdp_mline_index);
            env.candidate = Some(&c.candidate);
        }
        SignalingMessage::Description(d) => env.sdp = Some(&d.sdp),
        SignalingMessage::Bye => {}
    }
    Ok(serde_json::to_string(&env)?)
}
