//! Per-call signaling session for a one-to-one audio call.
//!
//! A [`SessionController`] sits between a JSON signaling channel and a
//! native peer connection. It creates the transport, runs the offer/answer
//! exchange, buffers remote ICE candidates until the remote description is
//! confirmed, and rewrites every remote description so the preferred audio
//! codec comes first.

/// Handles configuration loading and management.
pub mod config;
/// Logging utilities shared by every session.
pub mod log;
/// Line-level SDP helpers and the audio codec preference rewrite.
pub mod sdp;
/// Session state machine, candidate buffering and the controller.
pub mod session;
/// JSON signaling messages and the outbound sink.
pub mod signaling;
/// Interface to the media engine's peer connection.
pub mod transport;
/// Small helpers with no better home.
pub mod utils;

pub use session::{
    SessionConfig, SessionController, SessionError, SessionPhase, SessionReport,
};
pub use signaling::{IceCandidate, SdpKind, SessionDescription, SignalSink, SignalingMessage};
pub use transport::{Transport, TransportError, TransportFactory, TransportObserver};
