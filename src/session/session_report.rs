use crate::{
    session::{session_error::SessionError, session_phase::SessionPhase},
    transport::ConnectionState,
};

/// Asynchronous notification surfaced to the embedding application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionReport {
    PhaseChanged {
        from: SessionPhase,
        to: SessionPhase,
    },
    ConnectionStateChanged(ConnectionState),
    /// Something went wrong outside a direct call (transport failure,
    /// outbound encoding). Never retried.
    Failure(SessionError),
}
