use crate::{
    session::{
        candidate_buffer::CandidateBuffer, session_action::SessionAction,
        session_phase::SessionPhase, session_report::SessionReport,
    },
    signaling::SdpKind,
};

/// Mutable state of one session. Only [`transition`](crate::session::transition)
/// changes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    phase: SessionPhase,
    buffer: CandidateBuffer,
    /// Kind of the remote description handed to the transport and not yet
    /// confirmed.
    pending_remote: Option<SdpKind>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionState {
    #[must_use]
    pub fn new() -> Self {
        Self {
            phase: SessionPhase::Created,
            buffer: CandidateBuffer::new(),
            pending_remote: None,
        }
    }

    #[must_use]
    pub const fn phase(&self) -> SessionPhase {
        self.phase
    }

    #[must_use]
    pub fn buffered_candidates(&self) -> usize {
        self.buffer.len()
    }

    pub(super) fn buffer_mut(&mut self) -> &mut CandidateBuffer {
        &mut self.buffer
    }

    pub(super) fn set_pending_remote(&mut self, kind: SdpKind) {
        self.pending_remote = Some(kind);
    }

    pub(super) fn take_pending_remote(&mut self) -> Option<SdpKind> {
        self.pending_remote.take()
    }

    /// Moves to `next` and returns the report announcing it.
    pub(super) fn enter(&mut self, next: SessionPhase) -> SessionAction {
        let from = std::mem::replace(&mut self.phase, next);
        SessionAction::Report(SessionReport::PhaseChanged { from, to: next })
    }
}
