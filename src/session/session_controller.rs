use std::{
    any::Any,
    collections::VecDeque,
    panic::{self, AssertUnwindSafe},
    sync::{
        Arc, Mutex, Weak,
        mpsc::{self, Receiver, SyncSender, TrySendError},
    },
};

use rand::{RngCore, rngs::OsRng};

use crate::{
    log::{LogLevel, LogSink},
    session::{
        session_action::SessionAction, session_config::SessionConfig,
        session_error::SessionError, session_event::SessionEvent, session_phase::SessionPhase,
        session_report::SessionReport, session_state::SessionState, transition::transition,
    },
    signaling::{self, IceCandidate, SessionDescription, SignalSink, SignalingMessage},
    sink_debug, sink_error, sink_info, sink_trace, sink_warn,
    transport::{ConnectionState, Transport, TransportError, TransportFactory, TransportObserver},
};

/// Reports held for the embedder before new ones are dropped.
pub const REPORT_QUEUE_CAP: usize = 256;

/// Drives one call: feeds signaling and transport callbacks through
/// [`transition`] and executes the resulting actions.
///
/// All methods take `&self` and may be called from any thread, including
/// from inside a [`Transport`] call. State changes are serialized by one
/// lock; side effects run outside it, in the order they were produced.
/// Dropping the controller closes the session.
pub struct SessionController {
    inner: Arc<Inner>,
    reports: Mutex<Receiver<SessionReport>>,
}

struct Inner {
    id: u64,
    config: SessionConfig,
    factory: Arc<dyn TransportFactory>,
    signal_sink: Arc<dyn SignalSink>,
    logger: Arc<dyn LogSink>,
    core: Mutex<Core>,
    transport: Mutex<Option<Arc<dyn Transport>>>,
    report_tx: SyncSender<SessionReport>,
    me: Weak<Inner>,
}

struct Core {
    state: SessionState,
    outbox: VecDeque<SessionAction>,
    /// Set while some thread is draining `outbox`; others only enqueue.
    executing: bool,
}

impl SessionController {
    /// Creates an idle session. Nothing touches the transport or the
    /// signaling channel until [`start`](Self::start).
    pub fn new(
        config: SessionConfig,
        factory: Arc<dyn TransportFactory>,
        signal_sink: Arc<dyn SignalSink>,
        logger: Arc<dyn LogSink>,
    ) -> Self {
        let (report_tx, report_rx) = mpsc::sync_channel(REPORT_QUEUE_CAP);
        let id = OsRng.next_u64();
        let inner = Arc::new_cyclic(|me| Inner {
            id,
            config,
            factory,
            signal_sink,
            logger,
            core: Mutex::new(Core {
                state: SessionState::new(),
                outbox: VecDeque::new(),
                executing: false,
            }),
            transport: Mutex::new(None),
            report_tx,
            me: me.clone(),
        });
        sink_info!(
            inner.logger,
            "[session {id:016x}] created as {}",
            if inner.config.is_initiator { "initiator" } else { "responder" }
        );
        Self {
            inner,
            reports: Mutex::new(report_rx),
        }
    }

    /// Random identifier used to tell sessions apart in logs.
    #[must_use]
    pub fn id(&self) -> u64 {
        self.inner.id
    }

    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.inner.config
    }

    /// Creates the transport, attaches the local stream and, for the
    /// initiator, requests an offer.
    ///
    /// # Errors
    /// [`SessionError::AlreadyStarted`] on a second call,
    /// [`SessionError::SessionClosed`] after teardown.
    pub fn start(&self) -> Result<(), SessionError> {
        self.inner.dispatch(SessionEvent::Start)
    }

    /// Handles one raw message from the signaling channel.
    ///
    /// # Errors
    /// - [`SessionError::SessionClosed`] once the session is `Disconnected`,
    ///   whatever `raw` contains.
    /// - [`SessionError::Decode`] for malformed input; the session is left
    ///   unchanged.
    /// - [`SessionError::NotStarted`] for a description before `start`.
    pub fn handle_signal(&self, raw: &str) -> Result<(), SessionError> {
        if self.phase()? == SessionPhase::Disconnected {
            return Err(SessionError::SessionClosed);
        }
        let msg = signaling::parse(raw).map_err(|e| {
            sink_warn!(self.inner.logger, "[session {:016x}] dropped signal: {e}", self.inner.id);
            SessionError::Decode(e)
        })?;
        sink_trace!(
            self.inner.logger,
            "[session {:016x}] signal in: {}",
            self.inner.id,
            msg.type_name()
        );
        self.inner.dispatch(SessionEvent::SignalReceived(msg))
    }

    /// # Errors
    /// [`SessionError::Poisoned`] if the session lock was poisoned.
    pub fn on_local_description_ready(&self, desc: SessionDescription) -> Result<(), SessionError> {
        self.inner.dispatch(SessionEvent::LocalDescriptionReady(desc))
    }

    /// # Errors
    /// [`SessionError::Poisoned`] if the session lock was poisoned.
    pub fn on_ice_candidate_gathered(&self, candidate: IceCandidate) -> Result<(), SessionError> {
        self.inner.dispatch(SessionEvent::IceCandidateGathered(candidate))
    }

    /// # Errors
    /// [`SessionError::Poisoned`] if the session lock was poisoned.
    pub fn on_remote_description_confirmed(&self) -> Result<(), SessionError> {
        self.inner.dispatch(SessionEvent::RemoteDescriptionConfirmed)
    }

    /// # Errors
    /// [`SessionError::Poisoned`] if the session lock was poisoned.
    pub fn on_connection_state_changed(&self, state: ConnectionState) -> Result<(), SessionError> {
        self.inner.dispatch(SessionEvent::ConnectionStateChanged(state))
    }

    /// # Errors
    /// [`SessionError::Poisoned`] if the session lock was poisoned.
    pub fn on_transport_error(&self, error: TransportError) -> Result<(), SessionError> {
        self.inner.dispatch(SessionEvent::TransportFailed(error))
    }

    /// Sends `bye` to the peer and tears down. A no-op once disconnected.
    ///
    /// # Errors
    /// [`SessionError::Poisoned`] if the session lock was poisoned.
    pub fn hang_up(&self) -> Result<(), SessionError> {
        self.inner.dispatch(SessionEvent::HangUp)
    }

    /// Tears down without telling the peer. Idempotent.
    ///
    /// # Errors
    /// [`SessionError::Poisoned`] if the session lock was poisoned.
    pub fn close(&self) -> Result<(), SessionError> {
        self.inner.dispatch(SessionEvent::Close)
    }

    /// # Errors
    /// [`SessionError::Poisoned`] if the session lock was poisoned.
    pub fn phase(&self) -> Result<SessionPhase, SessionError> {
        self.inner.with_state(SessionState::phase)
    }

    /// Remote candidates waiting for the remote description to be confirmed.
    ///
    /// # Errors
    /// [`SessionError::Poisoned`] if the session lock was poisoned.
    pub fn pending_candidates(&self) -> Result<usize, SessionError> {
        self.inner.with_state(SessionState::buffered_candidates)
    }

    /// Reports produced since the last poll, oldest first. Never blocks.
    ///
    /// At most [`REPORT_QUEUE_CAP`] reports are kept between polls; later
    /// ones are logged and dropped until the embedder polls again.
    pub fn poll_reports(&self) -> Vec<SessionReport> {
        match self.reports.lock() {
            Ok(rx) => rx.try_iter().collect(),
            Err(_) => Vec::new(),
        }
    }

    /// Observer to hand to a transport created outside the factory. The
    /// controller passes an equivalent one to [`TransportFactory::create`].
    #[must_use]
    pub fn observer(&self) -> Arc<dyn TransportObserver> {
        self.inner.observer()
    }
}

impl Drop for SessionController {
    fn drop(&mut self) {
        if let Err(e) = self.inner.dispatch(SessionEvent::Close) {
            sink_error!(self.inner.logger, "[session {:016x}] close on drop: {e}", self.inner.id);
        }
    }
}

impl Inner {
    fn with_state<T>(&self, f: impl FnOnce(&SessionState) -> T) -> Result<T, SessionError> {
        let core = self.core.lock().map_err(|_| SessionError::Poisoned)?;
        Ok(f(&core.state))
    }

    fn observer(&self) -> Arc<dyn TransportObserver> {
        Arc::new(ObserverBridge {
            inner: self.me.clone(),
        })
    }

    /// Applies `event` and, unless another call is already executing, runs
    /// every queued action. Nested calls from inside an action only enqueue.
    fn dispatch(&self, event: SessionEvent) -> Result<(), SessionError> {
        {
            let mut core = self.core.lock().map_err(|_| SessionError::Poisoned)?;
            let actions = transition(&mut core.state, event, &self.config)?;
            core.outbox.extend(actions);
            if core.executing {
                return Ok(());
            }
            core.executing = true;
        }
        self.run_outbox()
    }

    fn run_outbox(&self) -> Result<(), SessionError> {
        loop {
            let action = {
                let mut core = self.core.lock().map_err(|_| SessionError::Poisoned)?;
                let closed = core.state.phase() == SessionPhase::Disconnected;
                loop {
                    match core.outbox.pop_front() {
                        None => {
                            core.executing = false;
                            return Ok(());
                        }
                        Some(a) if closed && !a.survives_teardown() => {
                            sink_trace!(self.logger, "[session {:016x}] cancelled {a:?}", self.id);
                        }
                        Some(a) => break a,
                    }
                }
            };
            let op = action.name();
            if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(|| self.execute(action))) {
                let why = panic_message(payload.as_ref());
                sink_error!(self.logger, "[session {:016x}] {op} panicked: {why}", self.id);
                self.enqueue(SessionEvent::TransportFailed(TransportError::Failed(format!(
                    "{op} panicked: {why}"
                ))));
            }
        }
    }

    fn execute(&self, action: SessionAction) {
        sink_trace!(self.logger, "[session {:016x}] exec {action:?}", self.id);
        match action {
            SessionAction::CreateTransport => self.create_transport(),
            SessionAction::AttachLocalStream => self.with_transport("attach_local_stream", |t| {
                t.attach_local_stream(&self.config.local_stream)
            }),
            SessionAction::CreateOffer => self.with_transport("create_offer", |t| t.create_offer()),
            SessionAction::CreateAnswer => {
                self.with_transport("create_answer", |t| t.create_answer());
            }
            SessionAction::SetLocalDescription(desc) => {
                self.with_transport("set_local_description", |t| t.set_local_description(&desc));
            }
            SessionAction::SetRemoteDescription(desc) => {
                self.with_transport("set_remote_description", |t| {
                    t.set_remote_description(&desc)
                });
            }
            SessionAction::AddIceCandidate(candidate) => {
                self.with_transport("add_ice_candidate", |t| t.add_ice_candidate(&candidate));
            }
            SessionAction::SendSignal(msg) => self.send_signal(&msg),
            SessionAction::CloseTransport => self.close_transport(),
            SessionAction::Report(report) => self.report(report),
            SessionAction::Log(level, msg) => self.log(level, &msg),
        }
    }

    fn create_transport(&self) {
        match self.factory.create(&self.config.constraints(), self.observer()) {
            Ok(t) => match self.transport.lock() {
                Ok(mut slot) => *slot = Some(t),
                Err(_) => {
                    sink_error!(self.logger, "[session {:016x}] transport slot poisoned", self.id);
                    t.close();
                }
            },
            Err(e) => {
                sink_error!(self.logger, "[session {:016x}] transport creation failed: {e}", self.id);
                self.enqueue(SessionEvent::TransportUnavailable(e));
            }
        }
    }

    fn current_transport(&self) -> Option<Arc<dyn Transport>> {
        self.transport.lock().ok().and_then(|slot| slot.clone())
    }

    /// Runs `op` on the transport with the slot lock released. A failure is
    /// fed back as `TransportFailed`.
    fn with_transport<F>(&self, name: &str, op: F)
    where
        F: FnOnce(&dyn Transport) -> Result<(), TransportError>,
    {
        let Some(t) = self.current_transport() else {
            sink_debug!(self.logger, "[session {:016x}] no transport for {name}", self.id);
            return;
        };
        if let Err(e) = op(t.as_ref()) {
            sink_warn!(self.logger, "[session {:016x}] {name} failed: {e}", self.id);
            self.enqueue(SessionEvent::TransportFailed(e));
        }
    }

    fn close_transport(&self) {
        let taken = match self.transport.lock() {
            Ok(mut slot) => slot.take(),
            Err(_) => None,
        };
        if let Some(t) = taken {
            sink_info!(self.logger, "[session {:016x}] closing transport", self.id);
            t.close();
        }
    }

    fn send_signal(&self, msg: &SignalingMessage) {
        match signaling::encode(msg) {
            Ok(raw) => {
                sink_trace!(self.logger, "[session {:016x}] signal out: {raw}", self.id);
                self.signal_sink.send(raw);
            }
            Err(e) => {
                sink_error!(
                    self.logger,
                    "[session {:016x}] can't encode {}: {e}",
                    self.id,
                    msg.type_name()
                );
                self.report(SessionReport::Failure(SessionError::Encode(e)));
            }
        }
    }

    fn report(&self, report: SessionReport) {
        match &report {
            SessionReport::PhaseChanged { from, to } => {
                sink_info!(self.logger, "[session {:016x}] {from} -> {to}", self.id);
            }
            SessionReport::ConnectionStateChanged(s) => {
                sink_info!(self.logger, "[session {:016x}] connection {s}", self.id);
            }
            SessionReport::Failure(e) => {
                sink_warn!(self.logger, "[session {:016x}] failure: {e}", self.id);
            }
        }
        match self.report_tx.try_send(report) {
            Ok(()) | Err(TrySendError::Disconnected(_)) => {}
            Err(TrySendError::Full(r)) => {
                sink_warn!(self.logger, "[session {:016x}] report queue full, dropped {r:?}", self.id);
            }
        }
    }

    fn log(&self, level: LogLevel, msg: &str) {
        match level {
            LogLevel::Trace => sink_trace!(self.logger, "[session {:016x}] {msg}", self.id),
            LogLevel::Debug => sink_debug!(self.logger, "[session {:016x}] {msg}", self.id),
            LogLevel::Info => sink_info!(self.logger, "[session {:016x}] {msg}", self.id),
            LogLevel::Warn => sink_warn!(self.logger, "[session {:016x}] {msg}", self.id),
            LogLevel::Error => sink_error!(self.logger, "[session {:016x}] {msg}", self.id),
        }
    }

    /// Dispatch from inside an action; the running executor picks it up.
    fn enqueue(&self, event: SessionEvent) {
        if let Err(e) = self.dispatch(event) {
            sink_warn!(self.logger, "[session {:016x}] dropped internal event: {e}", self.id);
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("non-string panic payload")
}

/// Forwards engine callbacks to the session, if it still exists.
struct ObserverBridge {
    inner: Weak<Inner>,
}

impl ObserverBridge {
    fn forward(&self, event: SessionEvent) {
        let Some(inner) = self.inner.upgrade() else {
            return;
        };
        if let Err(e) = inner.dispatch(event) {
            sink_warn!(inner.logger, "[session {:016x}] dropped transport callback: {e}", inner.id);
        }
    }
}

impl TransportObserver for ObserverBridge {
    fn on_local_description(&self, desc: SessionDescription) {
        self.forward(SessionEvent::LocalDescriptionReady(desc));
    }

    fn on_ice_candidate(&self, candidate: IceCandidate) {
        self.forward(SessionEvent::IceCandidateGathered(candidate));
    }

    fn on_remote_description_set(&self) {
        self.forward(SessionEvent::RemoteDescriptionConfirmed);
    }

    fn on_connection_state_change(&self, state: ConnectionState) {
        self.forward(SessionEvent::ConnectionStateChanged(state));
    }

    fn on_error(&self, error: TransportError) {
        self.forward(SessionEvent::TransportFailed(error));
    }
}
