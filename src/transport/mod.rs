//! Narrow interface to the native media engine.
//!
//! The session never talks to a peer connection directly: it asks a
//! [`TransportFactory`] for a [`Transport`] and receives the engine's
//! asynchronous results through a [`TransportObserver`].

pub mod connection_state;
pub mod local_media_stream;
pub mod media_constraints;
#[allow(clippy::module_inception)]
pub mod transport;
pub mod transport_error;

pub use connection_state::ConnectionState;
pub use local_media_stream::LocalMediaStream;
pub use media_constraints::{MediaConstraints, SESSION_CONSTRAINTS};
pub use transport::{Transport, TransportFactory, TransportObserver};
pub use transport_error::TransportError;
