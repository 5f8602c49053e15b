use std::fmt;

/// Why an inbound signaling text was rejected. All variants are recoverable:
/// the message is dropped and the session carries on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// Not JSON, not an object, or a field of the wrong JSON type.
    Malformed(String),
    /// A field required by the message `type` (or `type` itself) is absent.
    MissingField(&'static str),
    /// `type` is not one of `candidate`, `offer`, `answer`, `bye`.
    UnknownType(String),
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Malformed(e) => write!(f, "malformed signaling message: {e}"),
            Self::MissingField(name) => write!(f, "signaling message missing field `{name}`"),
            Self::UnknownType(t) => write!(f, "unknown signaling message type {t:?}"),
        }
    }
}

impl std::error::Error for DecodeError {}

impl From<serde_json::Error> for DecodeError {
    fn from(e: serde_json::Error) -> Self {
        Self::Malformed(e.to_string())
    }
}

/// Outbound serialization failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodeError(pub String);

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to encode signaling message: {}", self.0)
    }
}

impl std::error::Error for EncodeError {}

impl From<serde_json::Error> for EncodeError {
    fn from(e: serde_json::Error) -> Self {
        Self(e.to_string())
    }
}
