use crate::{
    log::LogLevel,
    sdp::PreferOutcome,
    session::{
        session_action::SessionAction, session_config::SessionConfig,
        session_error::SessionError, session_event::SessionEvent, session_phase::SessionPhase,
        session_report::SessionReport, session_state::SessionState,
    },
    signaling::{SdpKind, SessionDescription, SignalingMessage},
};

/// Applies one event to the session state and returns the side effects to
/// run, in order.
///
/// Pure apart from mutating `state`; nothing here touches the transport or
/// the signaling channel. On `Err` the state is left as it was.
///
/// # Errors
/// - [`SessionError::SessionClosed`] for signaling or `Start` after teardown.
/// - [`SessionError::AlreadyStarted`] for a second `Start`.
/// - [`SessionError::NotStarted`] for a remote description before `Start`.
pub fn transition(
    state: &mut SessionState,
    event: SessionEvent,
    config: &SessionConfig,
) -> Result<Vec<SessionAction>, SessionError> {
    use SessionPhase::*;

    let phase = state.phase();
    match event {
        SessionEvent::Start => match phase {
            Created => {
                let next = if config.is_initiator {
                    AwaitingLocalDescription
                } else {
                    AwaitingRemoteDescription
                };
                let mut actions = vec![SessionAction::CreateTransport, SessionAction::AttachLocalStream];
                if config.is_initiator {
                    actions.push(SessionAction::CreateOffer);
                }
                actions.push(state.enter(next));
                Ok(actions)
            }
            Disconnected => Err(SessionError::SessionClosed),
            _ => Err(SessionError::AlreadyStarted),
        },

        SessionEvent::SignalReceived(_) if phase == Disconnected => Err(SessionError::SessionClosed),

        SessionEvent::SignalReceived(SignalingMessage::Candidate(candidate)) => {
            if phase.buffers_candidates() {
                state.buffer_mut().push(candidate);
                Ok(vec![SessionAction::Log(
                    LogLevel::Debug,
                    format!(
                        "buffered remote candidate in {phase} ({} pending)",
                        state.buffered_candidates()
                    ),
                )])
            } else {
                Ok(vec![SessionAction::AddIceCandidate(candidate)])
            }
        }

        SessionEvent::SignalReceived(SignalingMessage::Description(desc)) => {
            if phase == Created {
                return Err(SessionError::NotStarted);
            }
            let (desc, note) = apply_codec_preference(desc, config);
            state.set_pending_remote(desc.kind);
            let mut actions: Vec<SessionAction> = note.into_iter().collect();
            actions.push(SessionAction::SetRemoteDescription(desc));
            Ok(actions)
        }

        SessionEvent::SignalReceived(SignalingMessage::Bye) => Ok(teardown(state, false, "bye received")),

        _ if phase == Disconnected => Ok(after_teardown(event)),

        SessionEvent::LocalDescriptionReady(desc) => {
            let mut actions = vec![
                SessionAction::SetLocalDescription(desc.clone()),
                SessionAction::SendSignal(SignalingMessage::Description(desc)),
            ];
            if phase == AwaitingLocalDescription {
                actions.push(state.enter(AwaitingRemoteDescription));
            }
            Ok(actions)
        }

        SessionEvent::IceCandidateGathered(candidate) => Ok(vec![SessionAction::SendSignal(
            SignalingMessage::Candidate(candidate),
        )]),

        SessionEvent::RemoteDescriptionConfirmed => {
            let Some(remote) = state.take_pending_remote() else {
                return Ok(vec![SessionAction::Log(
                    LogLevel::Debug,
                    format!("ignoring remote description confirmation in {phase}, none pending"),
                )]);
            };
            let mut actions = Vec::new();
            if phase != Ready {
                actions.push(state.enter(Ready));
            }
            actions.extend(
                state
                    .buffer_mut()
                    .drain()
                    .into_iter()
                    .map(SessionAction::AddIceCandidate),
            );
            if remote == SdpKind::Offer && !config.is_initiator {
                actions.push(SessionAction::CreateAnswer);
            }
            Ok(actions)
        }

        SessionEvent::ConnectionStateChanged(s) => Ok(vec![SessionAction::Report(
            SessionReport::ConnectionStateChanged(s),
        )]),

        SessionEvent::TransportFailed(e) => Ok(vec![SessionAction::Report(SessionReport::Failure(
            SessionError::Transport(e),
        ))]),

        SessionEvent::TransportUnavailable(e) => {
            let mut actions = vec![SessionAction::Report(SessionReport::Failure(
                SessionError::Transport(e),
            ))];
            actions.extend(teardown(state, false, "no transport"));
            Ok(actions)
        }

        SessionEvent::HangUp => Ok(teardown(state, true, "local hang-up")),

        SessionEvent::Close => Ok(teardown(state, false, "closed")),
    }
}

/// Non-signaling events reaching a `Disconnected` session: teardown requests
/// are no-ops, late transport callbacks are noted and dropped.
fn after_teardown(event: SessionEvent) -> Vec<SessionAction> {
    match event {
        SessionEvent::HangUp | SessionEvent::Close => Vec::new(),
        SessionEvent::ConnectionStateChanged(s) => vec![SessionAction::Report(
            SessionReport::ConnectionStateChanged(s),
        )],
        other => vec![SessionAction::Log(
            LogLevel::Debug,
            format!("ignoring {other:?} after teardown"),
        )],
    }
}

fn teardown(state: &mut SessionState, send_bye: bool, reason: &str) -> Vec<SessionAction> {
    let dropped = state.buffer_mut().discard();
    let _ = state.take_pending_remote();

    let mut actions = vec![
        SessionAction::Log(
            LogLevel::Info,
            format!("tearing down ({reason}), {dropped} buffered candidates dropped"),
        ),
        state.enter(SessionPhase::Disconnected),
    ];
    if send_bye {
        actions.push(SessionAction::SendSignal(SignalingMessage::Bye));
    }
    actions.push(SessionAction::CloseTransport);
    actions
}

fn apply_codec_preference(
    desc: SessionDescription,
    config: &SessionConfig,
) -> (SessionDescription, Option<SessionAction>) {
    let pref = &config.codec_preference;
    let note = |why: &str| {
        Some(SessionAction::Log(
            LogLevel::Warn,
            format!(
                "{why}, so can't prefer {}/{} in remote {}",
                pref.codec_name, pref.clock_rate, desc.kind
            ),
        ))
    };

    match pref.apply(&desc.sdp) {
        PreferOutcome::Rewritten(sdp) => (SessionDescription { kind: desc.kind, sdp }, None),
        PreferOutcome::NoAudioLine => {
            let n = note("no m=audio line");
            (desc, n)
        }
        PreferOutcome::CodecNotOffered => {
            let n = note("codec not offered");
            (desc, n)
        }
        PreferOutcome::MalformedAudioLine => {
            let n = note("m=audio line has no port/proto");
            (desc, n)
        }
    }
}
