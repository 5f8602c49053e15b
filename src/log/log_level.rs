use std::fmt;

/// Severity of a log line, ordered from most to least verbose.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LogLevel {
    /// Every event and action a session processes.
    Trace,
    /// Decisions that help explain a session's behaviour after the fact.
    Debug,
    /// Lifecycle milestones (start, phase changes, teardown).
    Info,
    /// Recoverable problems: dropped messages, no-op rewrites.
    Warn,
    /// Failures that leave the session unusable.
    Error,
}

impl LogLevel {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Trace => "TRACE",
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warn => "WARN",
            Self::Error => "ERROR",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
