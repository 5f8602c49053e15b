#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::{
    sync::{
        Arc, Mutex, Weak,
        atomic::{AtomicBool, Ordering},
        mpsc::{self, Receiver, Sender},
    },
    thread,
};

use callsession::{
    IceCandidate, SdpKind, SessionConfig, SessionController, SessionDescription, SessionError,
    SessionPhase, SessionReport, SignalSink, Transport, TransportError, TransportFactory,
    TransportObserver,
    log::NoopLogSink,
    session::session_controller::REPORT_QUEUE_CAP,
    transport::{ConnectionState, LocalMediaStream, MediaConstraints},
};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Call {
    Attach(String),
    CreateOffer,
    CreateAnswer,
    SetLocal(SessionDescription),
    SetRemote(SessionDescription),
    AddCandidate(String),
    Close,
}

type Hook = Box<dyn Fn(&Call) + Send + Sync>;

/// Records every call; `hook` runs after recording, still inside the call.
#[derive(Default)]
struct FakeTransport {
    calls: Mutex<Vec<Call>>,
    hook: Mutex<Option<Hook>>,
    fail_candidates: bool,
    /// Panics on the next `set_remote_description`, once.
    panic_on_remote: AtomicBool,
}

impl FakeTransport {
    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call.clone());
        if let Some(hook) = self.hook.lock().unwrap().as_ref() {
            hook(&call);
        }
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn added_candidates(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::AddCandidate(s) => Some(s),
                _ => None,
            })
            .collect()
    }

    fn set_hook(&self, hook: impl Fn(&Call) + Send + Sync + 'static) {
        *self.hook.lock().unwrap() = Some(Box::new(hook));
    }
}

impl Transport for FakeTransport {
    fn attach_local_stream(&self, stream: &LocalMediaStream) -> Result<(), TransportError> {
        self.record(Call::Attach(stream.label.clone()));
        Ok(())
    }

    fn create_offer(&self) -> Result<(), TransportError> {
        self.record(Call::CreateOffer);
        Ok(())
    }

    fn create_answer(&self) -> Result<(), TransportError> {
        self.record(Call::CreateAnswer);
        Ok(())
    }

    fn set_local_description(&self, desc: &SessionDescription) -> Result<(), TransportError> {
        self.record(Call::SetLocal(desc.clone()));
        Ok(())
    }

    fn set_remote_description(&self, desc: &SessionDescription) -> Result<(), TransportError> {
        self.record(Call::SetRemote(desc.clone()));
        if self.panic_on_remote.swap(false, Ordering::SeqCst) {
            panic!("engine blew up applying {}", desc.kind);
        }
        Ok(())
    }

    fn add_ice_candidate(&self, candidate: &IceCandidate) -> Result<(), TransportError> {
        self.record(Call::AddCandidate(candidate.candidate.clone()));
        if self.fail_candidates {
            return Err(TransportError::Rejected("bad candidate".into()));
        }
        Ok(())
    }

    fn close(&self) {
        self.record(Call::Close);
    }
}

struct FakeFactory {
    transport: Arc<FakeTransport>,
    observer: Mutex<Option<Arc<dyn TransportObserver>>>,
    constraints: Mutex<Option<MediaConstraints>>,
    fail: bool,
}

impl FakeFactory {
    fn new(transport: Arc<FakeTransport>) -> Self {
        Self {
            transport,
            observer: Mutex::new(None),
            constraints: Mutex::new(None),
            fail: false,
        }
    }

    fn observer(&self) -> Arc<dyn TransportObserver> {
        self.observer.lock().unwrap().clone().expect("transport was created")
    }
}

impl TransportFactory for FakeFactory {
    fn create(
        &self,
        constraints: &MediaConstraints,
        observer: Arc<dyn TransportObserver>,
    ) -> Result<Arc<dyn Transport>, TransportError> {
        if self.fail {
            return Err(TransportError::Creation("engine unavailable".into()));
        }
        *self.constraints.lock().unwrap() = Some(*constraints);
        *self.observer.lock().unwrap() = Some(observer);
        Ok(self.transport.clone())
    }
}

struct Harness {
    session: Arc<SessionController>,
    transport: Arc<FakeTransport>,
    factory: Arc<FakeFactory>,
    sent: Receiver<String>,
}

impl Harness {
    fn new(config: SessionConfig) -> Self {
        Self::with_transport(config, FakeTransport::default())
    }

    fn with_transport(config: SessionConfig, transport: FakeTransport) -> Self {
        let transport = Arc::new(transport);
        let factory = Arc::new(FakeFactory::new(transport.clone()));
        Self::build(config, transport, factory)
    }

    fn build(config: SessionConfig, transport: Arc<FakeTransport>, factory: Arc<FakeFactory>) -> Self {
        let (tx, sent): (Sender<String>, Receiver<String>) = mpsc::channel();
        let session = Arc::new(SessionController::new(
            config,
            factory.clone(),
            Arc::new(tx) as Arc<dyn SignalSink>,
            Arc::new(NoopLogSink),
        ));
        Self {
            session,
            transport,
            factory,
            sent,
        }
    }

    fn sent(&self) -> Vec<serde_json::Value> {
        self.sent
            .try_iter()
            .map(|raw| serde_json::from_str(&raw).unwrap())
            .collect()
    }

    fn phase(&self) -> SessionPhase {
        self.session.phase().unwrap()
    }
}

const REMOTE_OFFER: &str = "v=0\r\n\
o=- 1 2 IN IP4 127.0.0.1\r\n\
s=-\r\n\
t=0 0\r\n\
m=audio 9 UDP/TLS/RTP/SAVPF 111 103 0\r\n\
a=rtpmap:111 opus/48000/2\r\n\
a=rtpmap:103 ISAC/16000\r\n\
a=rtpmap:0 PCMU/8000\r\n";

fn candidate_json(n: u32) -> String {
    format!(r#"{{"type":"candidate","id":"audio","label":0,"candidate":"candidate:{n}"}}"#)
}

fn offer_json(sdp: &str) -> String {
    serde_json::json!({ "type": "offer", "sdp": sdp }).to_string()
}

#[test]
fn initiator_sends_offer_after_engine_produces_it() {
    let h = Harness::new(SessionConfig::initiator());
    h.session.start().unwrap();

    assert_eq!(
        h.transport.calls(),
        vec![Call::Attach("ARDAMS".into()), Call::CreateOffer]
    );
    assert_eq!(h.phase(), SessionPhase::AwaitingLocalDescription);
    let constraints = h.factory.constraints.lock().unwrap().unwrap();
    assert!(constraints.offer_to_receive_audio);
    assert!(!constraints.offer_to_receive_video);

    let offer = SessionDescription::offer("v=0\r\nm=audio 9 RTP/SAVPF 0\r\n");
    h.factory.observer().on_local_description(offer.clone());

    assert_eq!(h.phase(), SessionPhase::AwaitingRemoteDescription);
    assert_eq!(h.transport.calls().last(), Some(&Call::SetLocal(offer.clone())));
    let sent = h.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0]["type"], "offer");
    assert_eq!(sent[0]["sdp"], offer.sdp.as_str());
}

#[test]
fn responder_answers_with_isac_first_and_drains_candidates_in_order() {
    let h = Harness::new(SessionConfig::responder());
    h.session.start().unwrap();
    assert_eq!(h.phase(), SessionPhase::AwaitingRemoteDescription);

    for n in 1..=3 {
        h.session.handle_signal(&candidate_json(n)).unwrap();
    }
    h.session.handle_signal(&offer_json(REMOTE_OFFER)).unwrap();
    assert_eq!(h.session.pending_candidates().unwrap(), 3);
    assert!(h.transport.added_candidates().is_empty());

    let Some(Call::SetRemote(remote)) = h.transport.calls().last().cloned() else {
        panic!("remote description not applied");
    };
    assert!(remote.sdp.contains("m=audio 9 UDP/TLS/RTP/SAVPF 103 111 0\r\n"));

    h.factory.observer().on_remote_description_set();
    assert_eq!(h.phase(), SessionPhase::Ready);
    assert_eq!(
        h.transport.added_candidates(),
        vec!["candidate:1", "candidate:2", "candidate:3"]
    );
    assert_eq!(h.transport.calls().last(), Some(&Call::CreateAnswer));

    h.session.handle_signal(&candidate_json(4)).unwrap();
    assert_eq!(h.transport.added_candidates().len(), 4);
    assert_eq!(h.session.pending_candidates().unwrap(), 0);

    let answer = SessionDescription::answer("v=0\r\n");
    h.factory.observer().on_local_description(answer);
    let sent = h.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0]["type"], "answer");
    assert_eq!(h.phase(), SessionPhase::Ready);
}

#[test]
fn gathered_candidates_are_trickled_to_the_peer() {
    let h = Harness::new(SessionConfig::initiator());
    h.session.start().unwrap();
    h.factory
        .observer()
        .on_ice_candidate(IceCandidate::new("audio", 0, "candidate:9"));

    let sent = h.sent();
    assert_eq!(
        sent,
        vec![serde_json::json!({
            "type": "candidate",
            "id": "audio",
            "label": 0,
            "candidate": "candidate:9"
        })]
    );
}

#[test]
fn decode_errors_leave_the_session_untouched() {
    let h = Harness::new(SessionConfig::responder());
    h.session.start().unwrap();
    let before = h.transport.calls();

    assert!(matches!(
        h.session.handle_signal("not json"),
        Err(SessionError::Decode(_))
    ));
    assert!(matches!(
        h.session.handle_signal(r#"{"type":"foo"}"#),
        Err(SessionError::Decode(_))
    ));
    assert!(matches!(
        h.session.handle_signal(r#"{"type":"candidate","id":"a"}"#),
        Err(SessionError::Decode(_))
    ));

    assert_eq!(h.phase(), SessionPhase::AwaitingRemoteDescription);
    assert_eq!(h.transport.calls(), before);
    assert_eq!(h.session.pending_candidates().unwrap(), 0);
}

#[test]
fn bye_is_terminal() {
    let h = Harness::new(SessionConfig::responder());
    h.session.start().unwrap();
    h.session.handle_signal(&candidate_json(1)).unwrap();
    h.session.handle_signal(r#"{"type":"bye"}"#).unwrap();

    assert_eq!(h.phase(), SessionPhase::Disconnected);
    assert_eq!(h.session.pending_candidates().unwrap(), 0);
    let calls_after_bye = h.transport.calls();
    assert_eq!(calls_after_bye.last(), Some(&Call::Close));

    for raw in [
        candidate_json(2),
        offer_json(REMOTE_OFFER),
        r#"{"type":"bye"}"#.to_owned(),
        "garbage".to_owned(),
    ] {
        assert_eq!(h.session.handle_signal(&raw), Err(SessionError::SessionClosed));
    }
    h.factory.observer().on_remote_description_set();
    h.session.close().unwrap();

    assert_eq!(h.transport.calls(), calls_after_bye);
    assert!(h.sent().is_empty());
}

#[test]
fn hang_up_sends_bye_and_closes_once() {
    let h = Harness::new(SessionConfig::initiator());
    h.session.start().unwrap();
    h.session.hang_up().unwrap();
    h.session.hang_up().unwrap();
    h.session.close().unwrap();

    let sent = h.sent();
    assert_eq!(sent, vec![serde_json::json!({ "type": "bye" })]);
    let closes = h.transport.calls().iter().filter(|c| **c == Call::Close).count();
    assert_eq!(closes, 1);
    assert_eq!(h.phase(), SessionPhase::Disconnected);
}

#[test]
fn dropping_the_controller_closes_the_transport() {
    let h = Harness::new(SessionConfig::initiator());
    h.session.start().unwrap();
    let Harness {
        session, transport, ..
    } = h;
    drop(session);
    assert_eq!(transport.calls().last(), Some(&Call::Close));
}

#[test]
fn reports_phase_changes_and_connection_state() {
    let h = Harness::new(SessionConfig::initiator());
    h.session.start().unwrap();
    h.factory
        .observer()
        .on_connection_state_change(ConnectionState::Checking);

    let reports = h.session.poll_reports();
    assert_eq!(
        reports,
        vec![
            SessionReport::PhaseChanged {
                from: SessionPhase::Created,
                to: SessionPhase::AwaitingLocalDescription,
            },
            SessionReport::ConnectionStateChanged(ConnectionState::Checking),
        ]
    );
    assert!(h.session.poll_reports().is_empty());
    assert_eq!(h.phase(), SessionPhase::AwaitingLocalDescription);
}

#[test]
fn factory_failure_disconnects_and_reports() {
    let transport = Arc::new(FakeTransport::default());
    let mut factory = FakeFactory::new(transport.clone());
    factory.fail = true;
    let h = Harness::build(SessionConfig::initiator(), transport, Arc::new(factory));

    h.session.start().unwrap();
    assert_eq!(h.phase(), SessionPhase::Disconnected);
    assert!(h.transport.calls().is_empty());
    assert!(h.session.poll_reports().iter().any(|r| matches!(
        r,
        SessionReport::Failure(SessionError::Transport(TransportError::Creation(_)))
    )));
}

#[test]
fn transport_failures_are_reported_not_fatal() {
    let transport = FakeTransport {
        fail_candidates: true,
        ..FakeTransport::default()
    };
    let h = Harness::with_transport(SessionConfig::initiator(), transport);
    h.session.start().unwrap();
    h.session
        .handle_signal(&serde_json::json!({ "type": "answer", "sdp": REMOTE_OFFER }).to_string())
        .unwrap();
    h.factory.observer().on_remote_description_set();
    h.session.handle_signal(&candidate_json(1)).unwrap();

    assert_eq!(h.phase(), SessionPhase::Ready);
    assert!(h.session.poll_reports().iter().any(|r| matches!(
        r,
        SessionReport::Failure(SessionError::Transport(TransportError::Rejected(_)))
    )));
}

#[test]
fn engine_callbacks_from_inside_transport_calls_do_not_deadlock() {
    let h = Harness::new(SessionConfig::initiator());
    let factory: Weak<FakeFactory> = Arc::downgrade(&h.factory);
    h.transport.set_hook(move |call| {
        if *call == Call::CreateOffer {
            let f = factory.upgrade().unwrap();
            f.observer()
                .on_local_description(SessionDescription::offer("v=0\r\n"));
            f.observer()
                .on_ice_candidate(IceCandidate::new("audio", 0, "candidate:local"));
        }
    });

    h.session.start().unwrap();

    assert_eq!(h.phase(), SessionPhase::AwaitingRemoteDescription);
    let types: Vec<String> = h
        .sent()
        .iter()
        .map(|v| v["type"].as_str().unwrap().to_owned())
        .collect();
    assert_eq!(types, vec!["offer", "candidate"]);
    assert_eq!(
        h.transport.calls(),
        vec![
            Call::Attach("ARDAMS".into()),
            Call::CreateOffer,
            Call::SetLocal(SessionDescription::offer("v=0\r\n")),
        ]
    );
}

#[test]
fn teardown_during_drain_cancels_remaining_candidates() {
    let h = Harness::new(SessionConfig::responder());
    let session: Weak<SessionController> = Arc::downgrade(&h.session);
    h.transport.set_hook(move |call| {
        if matches!(call, Call::AddCandidate(_)) {
            session.upgrade().unwrap().close().unwrap();
        }
    });

    h.session.start().unwrap();
    for n in 1..=3 {
        h.session.handle_signal(&candidate_json(n)).unwrap();
    }
    h.session.handle_signal(&offer_json(REMOTE_OFFER)).unwrap();
    h.factory.observer().on_remote_description_set();

    assert_eq!(h.transport.added_candidates(), vec!["candidate:1"]);
    assert_eq!(h.transport.calls().last(), Some(&Call::Close));
    assert!(!h.transport.calls().contains(&Call::CreateAnswer));
    assert_eq!(h.phase(), SessionPhase::Disconnected);
}

#[test]
fn concurrent_candidates_are_each_delivered_once() {
    let h = Harness::new(SessionConfig::responder());
    h.session.start().unwrap();
    h.session.handle_signal(&offer_json(REMOTE_OFFER)).unwrap();

    let workers: Vec<_> = (0..4u32)
        .map(|w| {
            let session = h.session.clone();
            thread::spawn(move || {
                for i in 0..25 {
                    session.handle_signal(&candidate_json(w * 100 + i)).unwrap();
                }
            })
        })
        .collect();
    h.factory.observer().on_remote_description_set();
    for w in workers {
        w.join().unwrap();
    }

    let mut added = h.transport.added_candidates();
    assert_eq!(added.len(), 100);
    added.sort();
    added.dedup();
    assert_eq!(added.len(), 100);
    assert_eq!(h.session.pending_candidates().unwrap(), 0);
}

#[derive(Default)]
struct CapturingSink {
    lines: Mutex<Vec<(callsession::log::LogLevel, String)>>,
}

impl callsession::log::LogSink for CapturingSink {
    fn log(&self, level: callsession::log::LogLevel, msg: &str, _target: &'static str) {
        self.lines.lock().unwrap().push((level, msg.to_owned()));
    }
}

#[test]
fn dropped_signals_are_logged_with_the_session_tag() {
    let sink = Arc::new(CapturingSink::default());
    let (tx, _rx) = mpsc::channel::<String>();
    let transport = Arc::new(FakeTransport::default());
    let session = SessionController::new(
        SessionConfig::responder(),
        Arc::new(FakeFactory::new(transport)),
        Arc::new(tx),
        sink.clone(),
    );

    let _ = session.handle_signal(r#"{"type":"foo"}"#);

    let tag = format!("[session {:016x}]", session.id());
    let lines = sink.lines.lock().unwrap();
    assert!(lines.iter().any(|(level, msg)| {
        *level == callsession::log::LogLevel::Warn && msg.starts_with(&tag) && msg.contains("foo")
    }));
}

#[test]
fn stray_confirmation_neither_readies_nor_drains() {
    let h = Harness::new(SessionConfig::responder());
    h.session.on_remote_description_confirmed().unwrap();
    assert_eq!(h.phase(), SessionPhase::Created);

    h.session.start().unwrap();
    h.session.handle_signal(&candidate_json(1)).unwrap();
    h.factory.observer().on_remote_description_set();

    assert_eq!(h.phase(), SessionPhase::AwaitingRemoteDescription);
    assert_eq!(h.transport.calls(), vec![Call::Attach("ARDAMS".into())]);
    assert_eq!(h.session.pending_candidates().unwrap(), 1);

    h.session.handle_signal(&offer_json(REMOTE_OFFER)).unwrap();
    h.factory.observer().on_remote_description_set();
    assert_eq!(h.phase(), SessionPhase::Ready);
    assert_eq!(h.transport.added_candidates(), vec!["candidate:1"]);
}

#[test]
fn panicking_transport_call_is_reported_and_session_keeps_working() {
    let transport = FakeTransport {
        panic_on_remote: AtomicBool::new(true),
        ..FakeTransport::default()
    };
    let h = Harness::with_transport(SessionConfig::responder(), transport);
    h.session.start().unwrap();

    h.session.handle_signal(&offer_json(REMOTE_OFFER)).unwrap();
    assert!(h.session.poll_reports().iter().any(|r| matches!(
        r,
        SessionReport::Failure(SessionError::Transport(TransportError::Failed(m)))
            if m.contains("set_remote_description") && m.contains("engine blew up")
    )));

    h.session.hang_up().unwrap();

    assert_eq!(h.phase(), SessionPhase::Disconnected);
    assert_eq!(h.transport.calls().last(), Some(&Call::Close));
    assert_eq!(h.sent(), vec![serde_json::json!({ "type": "bye" })]);
}

#[test]
fn unpolled_reports_are_capped() {
    let transport = FakeTransport {
        fail_candidates: true,
        ..FakeTransport::default()
    };
    let h = Harness::with_transport(SessionConfig::initiator(), transport);
    h.session.start().unwrap();
    h.session
        .handle_signal(&serde_json::json!({ "type": SdpKind::Answer.as_str(), "sdp": REMOTE_OFFER }).to_string())
        .unwrap();
    h.factory.observer().on_remote_description_set();

    let extra = 10;
    for n in 0..(REPORT_QUEUE_CAP + extra) {
        h.session.handle_signal(&candidate_json(n as u32)).unwrap();
    }

    assert_eq!(h.transport.added_candidates().len(), REPORT_QUEUE_CAP + extra);
    let reports = h.session.poll_reports();
    assert_eq!(reports.len(), REPORT_QUEUE_CAP);
    assert!(h.session.poll_reports().is_empty());

    h.session.close().unwrap();
    assert!(h.session.poll_reports().contains(&SessionReport::PhaseChanged {
        from: SessionPhase::Ready,
        to: SessionPhase::Disconnected,
    }));
}
