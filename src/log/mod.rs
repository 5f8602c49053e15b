//! Leveled logging shared by every component of a session.
//!
//! Components never write anywhere themselves: they receive an
//! `Arc<dyn LogSink>` and log through the `sink_*!` macros. The file-backed
//! [`logger::Logger`] is one sink; [`NoopLogSink`] silences everything.

pub mod log_level;
pub mod log_macros;
pub mod log_msg;
pub mod log_sink;
pub mod logger;
pub mod logger_handle;
pub mod noop_log_sink;

pub use log_level::LogLevel;
pub use log_sink::LogSink;
pub use noop_log_sink::NoopLogSink;
