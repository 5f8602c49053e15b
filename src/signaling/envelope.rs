use serde::{Deserialize, Serialize};

/// Inbound envelope. Every field is optional so that a missing field maps to
/// `DecodeError::MissingField` instead of a generic serde error; wrong JSON
/// types still fail deserialization.
#[derive(Debug, Default, Deserialize)]
pub(super) struct InboundEnvelope {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub id: Option<String>,
    pub label: Option<u16>,
    pub candidate: Option<String>,
    pub sdp: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct OutboundEnvelope<'a> {
    #[serde(rename = "type")]
    pub kind: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub candidate: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sdp: Option<&'a str>,
}

impl<'a> OutboundEnvelope<'a> {
    pub fn bare(kind: &'a str) -> Self {
        Self {
            kind,
            id: None,
            label: None,
            candidate: None,
            sdp: None,
        }
    }
}
