use crate::signaling::IceCandidate;

/// Remote candidates received before the transport can take them, in arrival
/// order.
///
/// Whether candidates are buffered is decided by the session phase, not by
/// this type: an empty buffer says nothing about readiness.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CandidateBuffer {
    pending: Vec<IceCandidate>,
}

impl CandidateBuffer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, candidate: IceCandidate) {
        self.pending.push(candidate);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Hands out every pending candidate in arrival order and leaves the
    /// buffer empty, so nothing can be handed out twice.
    pub fn drain(&mut self) -> Vec<IceCandidate> {
        std::mem::take(&mut self.pending)
    }

    /// Drops every pending candidate, returning how many there were.
    pub fn discard(&mut self) -> usize {
        let n = self.pending.len();
        self.pending.clear();
        n
    }
}
