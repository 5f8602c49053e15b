use std::fmt;

/// Opaque failure reported by the media engine. The session surfaces these
/// but never retries; retry policy belongs to the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The engine could not create a connection.
    Creation(String),
    /// A request was refused synchronously.
    Rejected(String),
    /// An asynchronous operation failed (e.g. setting a description).
    Failed(String),
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Creation(e) => write!(f, "transport creation failed: {e}"),
            Self::Rejected(e) => write!(f, "transport rejected request: {e}"),
            Self::Failed(e) => write!(f, "transport operation failed: {e}"),
        }
    }
}

impl std::error::Error for TransportError {}
