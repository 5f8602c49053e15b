use std::fmt;

/// Offer/answer tag of a session description.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SdpKind {
    Offer,
    Answer,
}

impl SdpKind {
    /// Value of the envelope `type` field.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Offer => "offer",
            Self::Answer => "answer",
        }
    }
}

impl fmt::Display for SdpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionDescription {
    pub kind: SdpKind,
    pub sdp: String,
}

impl SessionDescription {
    pub fn offer(sdp: impl Into<String>) -> Self {
        Self {
            kind: SdpKind::Offer,
            sdp: sdp.into(),
        }
    }

    pub fn answer(sdp: impl Into<String>) -> Self {
        Self {
            kind: SdpKind::Answer,
            sdp: sdp.into(),
        }
    }
}

/// A trickled ICE candidate as carried by signaling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IceCandidate {
    /// Media stream identification tag (`a=mid`), wire field `id`.
    pub mid: String,
    /// Index of the m-line the candidate belongs to, wire field `label`.
    pub sdp_mline_index: u16,
    /// Raw `candidate:` line, wire field `candidate`.
    pub candidate: String,
}

impl IceCandidate {
    pub fn new(mid: impl Into<String>, sdp_mline_index: u16, candidate: impl Into<String>) -> Self {
        Self {
            mid: mid.into(),
            sdp_mline_index,
            candidate: candidate.into(),
        }
    }
}

/// One decoded signaling message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignalingMessage {
    Candidate(IceCandidate),
    Description(SessionDescription),
    Bye,
}

impl SignalingMessage {
    /// Envelope `type` value for this message.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Candidate(_) => "candidate",
            Self::Description(d) => d.kind.as_str(),
            Self::Bye => "bye",
        }
    }
}
