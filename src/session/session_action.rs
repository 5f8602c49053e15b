use crate::{
    log::LogLevel,
    session::session_report::SessionReport,
    signaling::{IceCandidate, SessionDescription, SignalingMessage},
};

/// Side effect requested by [`transition`](crate::session::transition),
/// executed by the controller outside the session lock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionAction {
    CreateTransport,
    AttachLocalStream,
    CreateOffer,
    CreateAnswer,
    SetLocalDescription(SessionDescription),
    SetRemoteDescription(SessionDescription),
    AddIceCandidate(IceCandidate),
    SendSignal(SignalingMessage),
    CloseTransport,
    Report(SessionReport),
    Log(LogLevel, String),
}

impl SessionAction {
    /// Short name for log lines.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::CreateTransport => "create_transport",
            Self::AttachLocalStream => "attach_local_stream",
            Self::CreateOffer => "create_offer",
            Self::CreateAnswer => "create_answer",
            Self::SetLocalDescription(_) => "set_local_description",
            Self::SetRemoteDescription(_) => "set_remote_description",
            Self::AddIceCandidate(_) => "add_ice_candidate",
            Self::SendSignal(_) => "send_signal",
            Self::CloseTransport => "close_transport",
            Self::Report(_) => "report",
            Self::Log(..) => "log",
        }
    }

    /// Whether the action still runs once the session is `Disconnected`.
    /// Everything else queued before teardown is dropped.
    #[must_use]
    pub const fn survives_teardown(&self) -> bool {
        matches!(
            self,
            Self::CloseTransport
                | Self::SendSignal(SignalingMessage::Bye)
                | Self::Report(_)
                | Self::Log(..)
        )
    }
}
