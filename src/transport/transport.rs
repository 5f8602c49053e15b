use std::sync::Arc;

use crate::{
    signaling::{IceCandidate, SessionDescription},
    transport::{
        connection_state::ConnectionState, local_media_stream::LocalMediaStream,
        media_constraints::MediaConstraints, transport_error::TransportError,
    },
};

/// A peer connection owned by exactly one session.
///
/// Every call is a request: an `Ok` only means the engine accepted it. The
/// outcome (a local description, a confirmation, a failure) arrives later
/// through the [`TransportObserver`] handed to the factory. Implementations
/// must not block waiting for the engine.
pub trait Transport: Send + Sync {
    fn attach_local_stream(&self, stream: &LocalMediaStream) -> Result<(), TransportError>;

    /// Answered by [`TransportObserver::on_local_description`].
    fn create_offer(&self) -> Result<(), TransportError>;

    /// Answered by [`TransportObserver::on_local_description`].
    fn create_answer(&self) -> Result<(), TransportError>;

    fn set_local_description(&self, desc: &SessionDescription) -> Result<(), TransportError>;

    /// Confirmed by [`TransportObserver::on_remote_description_set`].
    fn set_remote_description(&self, desc: &SessionDescription) -> Result<(), TransportError>;

    fn add_ice_candidate(&self, candidate: &IceCandidate) -> Result<(), TransportError>;

    /// Tears the connection down. Called at most once per transport.
    fn close(&self);
}

/// Receives the engine's asynchronous events. May be called from any thread,
/// including from inside a [`Transport`] call.
pub trait TransportObserver: Send + Sync {
    fn on_local_description(&self, desc: SessionDescription);
    fn on_ice_candidate(&self, candidate: IceCandidate);
    fn on_remote_description_set(&self);
    fn on_connection_state_change(&self, state: ConnectionState);
    fn on_error(&self, error: TransportError);
}

pub trait TransportFactory: Send + Sync {
    /// Creates a transport configured with `constraints` that reports to
    /// `observer`.
    ///
    /// # Errors
    /// [`TransportError::Creation`] when the engine cannot build a connection.
    fn create(
        &self,
        constraints: &MediaConstraints,
        observer: Arc<dyn TransportObserver>,
    ) -> Result<Arc<dyn Transport>, TransportError>;
}
