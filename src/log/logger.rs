use crate::{
    config::Config,
    log::{log_msg::LogMsg, logger_handle::LoggerHandle},
};

use std::{
    fs::{self, OpenOptions},
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
    sync::mpsc::{self, TrySendError},
    thread,
    time::{SystemTime, UNIX_EPOCH},
};

use crate::log::log_level::LogLevel;

/// Flush every 100 lines when debugging, so a crash leaves recent lines on disk.
#[cfg(feature = "log-debug")]
const FLUSH_BATCH_SIZE: u32 = 100;

#[cfg(not(feature = "log-debug"))]
const FLUSH_BATCH_SIZE: u32 = 1_000;

const DEFAULT_QUEUE_CAP: usize = 4_096;
const FALLBACK_FILE: &str = "callsession-fallback.log";

/// Bounded, non-blocking logger writing to a per-process log file.
///
/// Producers enqueue through [`LoggerHandle`]s; a dedicated `logger-worker`
/// thread drains the queue into a buffered file. Warnings and errors force a
/// flush so they survive an abrupt exit.
pub struct Logger {
    handle: LoggerHandle,
    thread: Option<thread::JoinHandle<()>>,
    file_path: PathBuf,
}

impl Logger {
    /// Starts a logger from the `[Logging]` section of `config`.
    ///
    /// `log_path` picks the directory (a leading `~` is expanded) and
    /// `log_filename` the file name prefix. Without `log_path` the file goes
    /// to a `logs/` directory next to the executable.
    #[must_use]
    pub fn start(config: &Config) -> Self {
        let app_name = config.get_non_empty("Logging", "log_filename");
        let cap = config
            .get("Logging", "queue_capacity")
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_QUEUE_CAP);

        if let Some(dir_str) = config.get_non_empty("Logging", "log_path") {
            Self::start_in_dir(expand_path(dir_str), app_name, cap)
        } else {
            Self::start_in_dir(exe_dir_fallback_cwd().join("logs"), app_name, cap)
        }
    }

    /// Starts the logger in `dir`, creating it if missing.
    ///
    /// The file is named `<app_name>-YYYYMMDD_HHMMSS-pid<pid>.log`
    /// (`app_name` and its dash are omitted when `None`).
    pub fn start_in_dir<D: AsRef<Path>>(dir: D, app_name: Option<&str>, cap: usize) -> Self {
        let dir = dir.as_ref().to_path_buf();
        let _ = fs::create_dir_all(&dir);

        let ts = timestamp_for_filename();
        let pid = std::process::id();
        let fname = match app_name {
            Some(name) => format!("{name}-{ts}-pid{pid}.log"),
            None => format!("{ts}-pid{pid}.log"),
        };
        let file_path = dir.join(fname);

        let (tx, rx) = mpsc::sync_channel::<LogMsg>(cap.max(1));
        let worker_path = file_path.clone();

        let thread = thread::Builder::new()
            .name("logger-worker".into())
            .spawn(move || {
                // Target file -> temp file -> sink; never panic.
                let writer: Box<dyn Write + Send> = match OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(&worker_path)
                {
                    Ok(f) => Box::new(f),
                    Err(_) => {
                        let fallback = std::env::temp_dir().join(FALLBACK_FILE);
                        match OpenOptions::new().create(true).append(true).open(&fallback) {
                            Ok(f) => Box::new(f),
                            Err(_) => Box::new(io::sink()),
                        }
                    }
                };
                let mut out = BufWriter::new(writer);
                let mut lines_written: u32 = 0;

                while let Ok(m) = rx.recv() {
                    let _ = writeln!(&mut out, "{}", m.render());
                    lines_written = lines_written.wrapping_add(1);

                    if matches!(m.level, LogLevel::Warn | LogLevel::Error)
                        || lines_written.is_multiple_of(FLUSH_BATCH_SIZE)
                    {
                        let _ = out.flush();
                    }
                }

                let _ = out.flush();
            })
            .ok();

        Self {
            handle: LoggerHandle { tx },
            thread,
            file_path,
        }
    }

    /// Enqueues a line without blocking; see [`LoggerHandle::try_log`].
    ///
    /// # Errors
    /// Returns the rejected line when the queue is full or the writer is gone.
    pub fn try_log<S: Into<String>>(
        &self,
        level: LogLevel,
        text: S,
        target: &'static str,
    ) -> Result<(), TrySendError<LogMsg>> {
        self.handle.try_log(level, text, target)
    }

    /// Cloneable handle usable as an `Arc<dyn LogSink>`.
    #[must_use]
    pub fn handle(&self) -> LoggerHandle {
        self.handle.clone()
    }

    #[must_use]
    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    /// Stops accepting lines from this logger's own handle and waits for the
    /// writer to drain. Lines from outstanding cloned handles keep the writer
    /// alive until those handles are dropped too.
    pub fn shutdown(mut self) {
        let Self { handle, thread, .. } = &mut self;
        let (dead_tx, _) = mpsc::sync_channel(1);
        let live = std::mem::replace(handle, LoggerHandle { tx: dead_tx });
        drop(live);
        if let Some(t) = thread.take() {
            let _ = t.join();
        }
    }
}

fn exe_dir_fallback_cwd() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}

/// `YYYYMMDD_HHMMSS` in UTC, e.g. `20251102_023045`.
fn timestamp_for_filename() -> String {
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();

    unix_to_utc(secs).map_or_else(
        || format!("unix_{secs}"),
        |tm| {
            format!(
                "{:04}{:02}{:02}_{:02}{:02}{:02}",
                tm.year, tm.mon, tm.day, tm.hour, tm.min, tm.sec
            )
        },
    )
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct SimpleUtc {
    year: i32,
    mon: u32,
    day: u32,
    hour: u32,
    min: u32,
    sec: u32,
}

/// Civil-from-days conversion, enough for file names without pulling a date crate.
#[allow(clippy::many_single_char_names)]
fn unix_to_utc(mut s: u64) -> Option<SimpleUtc> {
    let sec = u32::try_from(s % 60).ok()?;
    s /= 60;
    let min = u32::try_from(s % 60).ok()?;
    s /= 60;
    let hour = u32::try_from(s % 24).ok()?;
    s /= 24;

    let z: i128 = i128::from(s) + 719_468;
    let era = (if z >= 0 { z } else { z - 146_096 }) / 146_097;
    let doe = z - era * 146_097;
    let yoe = (doe - doe / 1_460 + doe / 36_524 - doe / 146_096) / 365;
    let y = yoe + era * 400;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let d = doy - (153 * mp + 2) / 5 + 1;
    let m = mp + if mp < 10 { 3 } else { -9 };

    Some(SimpleUtc {
        year: i32::try_from(y + i128::from(m <= 2)).ok()?,
        mon: u32::try_from(m).ok()?,
        day: u32::try_from(d).ok()?,
        hour,
        min,
        sec,
    })
}

/// Expands a leading `~` to the user's home directory.
fn expand_path(path_str: &str) -> PathBuf {
    if let Some(rest) = path_str.strip_prefix('~') {
        let home = std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .ok()
            .map(PathBuf::from);

        if let Some(mut home_path) = home {
            if rest.is_empty() {
                return home_path;
            }
            if let Some(tail) = rest.strip_prefix('/').or_else(|| rest.strip_prefix('\\')) {
                home_path.push(tail);
                return home_path;
            }
        }
    }
    PathBuf::from(path_str)
}
