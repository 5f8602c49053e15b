use std::fmt;

/// Lifecycle of a session.
///
/// ```text
/// Created --start(initiator)--> AwaitingLocalDescription --local set--> AwaitingRemoteDescription
/// Created --start(responder)--> AwaitingRemoteDescription
/// AwaitingRemoteDescription --remote confirmed--> Ready
/// (any) --bye--> Disconnected
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionPhase {
    Created,
    AwaitingLocalDescription,
    AwaitingRemoteDescription,
    Ready,
    Disconnected,
}

impl SessionPhase {
    /// Remote candidates are held back in every phase but `Ready` and
    /// `Disconnected`.
    #[must_use]
    pub const fn buffers_candidates(self) -> bool {
        !matches!(self, Self::Ready | Self::Disconnected)
    }

    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Disconnected)
    }
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Created => "created",
            Self::AwaitingLocalDescription => "awaiting-local-description",
            Self::AwaitingRemoteDescription => "awaiting-remote-description",
            Self::Ready => "ready",
            Self::Disconnected => "disconnected",
        };
        f.write_str(s)
    }
}
