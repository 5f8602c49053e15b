use std::sync::mpsc;

/// Outbound half of the signaling channel. `send` is fire-and-forget: no
/// acknowledgement is awaited and delivery failures are the channel's concern.
pub trait SignalSink: Send + Sync {
    fn send(&self, raw: String);
}

impl SignalSink for mpsc::Sender<String> {
    fn send(&self, raw: String) {
        let _ = mpsc::Sender::send(self, raw);
    }
}
