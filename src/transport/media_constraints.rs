/// Constraint set a session's transport is created with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MediaConstraints {
    pub offer_to_receive_audio: bool,
    pub offer_to_receive_video: bool,
    pub internal_sctp_data_channels: bool,
    pub dtls_srtp_key_agreement: bool,
}

/// Audio-only call with data channels and DTLS-SRTP. Fixed for every
/// session; not configurable at this layer.
pub const SESSION_CONSTRAINTS: MediaConstraints = MediaConstraints {
    offer_to_receive_audio: true,
    offer_to_receive_video: false,
    internal_sctp_data_channels: true,
    dtls_srtp_key_agreement: true,
};

impl MediaConstraints {
    /// Mandatory key/value pairs, in engine naming.
    #[must_use]
    pub fn mandatory(&self) -> Vec<(&'static str, &'static str)> {
        vec![
            ("OfferToReceiveAudio", bool_str(self.offer_to_receive_audio)),
            ("OfferToReceiveVideo", bool_str(self.offer_to_receive_video)),
        ]
    }

    /// Optional key/value pairs, in engine naming.
    #[must_use]
    pub fn optional(&self) -> Vec<(&'static str, &'static str)> {
        vec![
            (
                "internalSctpDataChannels",
                bool_str(self.internal_sctp_data_channels),
            ),
            ("DtlsSrtpKeyAgreement", bool_str(self.dtls_srtp_key_agreement)),
        ]
    }
}

const fn bool_str(v: bool) -> &'static str {
    if v { "true" } else { "false" }
}
