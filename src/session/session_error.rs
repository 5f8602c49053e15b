use std::fmt;

use crate::{
    signaling::{DecodeError, EncodeError},
    transport::TransportError,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// Inbound signaling text was rejected; the session is unaffected.
    Decode(DecodeError),
    Encode(EncodeError),
    Transport(TransportError),
    /// The session is `Disconnected`; nothing was done.
    SessionClosed,
    /// A description arrived before `start()`.
    NotStarted,
    AlreadyStarted,
    /// The session lock was poisoned by a panicking thread.
    Poisoned,
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Decode(e) => write!(f, "{e}"),
            Self::Encode(e) => write!(f, "{e}"),
            Self::Transport(e) => write!(f, "{e}"),
            Self::SessionClosed => write!(f, "session closed"),
            Self::NotStarted => write!(f, "session not started"),
            Self::AlreadyStarted => write!(f, "session already started"),
            Self::Poisoned => write!(f, "session lock poisoned"),
        }
    }
}

impl std::error::Error for SessionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Decode(e) => Some(e),
            Self::Encode(e) => Some(e),
            Self::Transport(e) => Some(e),
            _ => None,
        }
    }
}

impl From<DecodeError> for SessionError {
    fn from(e: DecodeError) -> Self {
        Self::Decode(e)
    }
}

impl From<EncodeError> for SessionError {
    fn from(e: EncodeError) -> Self {
        Self::Encode(e)
    }
}

impl From<TransportError> for SessionError {
    fn from(e: TransportError) -> Self {
        Self::Transport(e)
    }
}
