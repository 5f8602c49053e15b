use crate::{
    signaling::{IceCandidate, SessionDescription, SignalingMessage},
    transport::{ConnectionState, TransportError},
};

/// Everything that can happen to a session, from either side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    Start,
    /// A decoded inbound signaling message.
    SignalReceived(SignalingMessage),
    /// The transport produced our offer or answer.
    LocalDescriptionReady(SessionDescription),
    /// The transport gathered a local candidate.
    IceCandidateGathered(IceCandidate),
    /// The transport accepted the remote description.
    RemoteDescriptionConfirmed,
    ConnectionStateChanged(ConnectionState),
    /// A transport operation failed; the session carries on.
    TransportFailed(TransportError),
    /// No transport could be created; the session cannot proceed.
    TransportUnavailable(TransportError),
    /// Local hang-up: tell the peer, then tear down.
    HangUp,
    /// Local disposal without notifying the peer.
    Close,
}
