//! Diagnostics sink: the injector's append-only debug log.
//!
//! Every received payload, decode failure, and delivery outcome is written
//! here as one timestamped line:
//!
//! ```text
//! [14:03:27.412] Received raw data: {"type":"click","x":100,"y":200}
//! [14:03:27.413] press sent to element #4 at (12, 8) (global (100, 200)): accepted
//! ```
//!
//! The sink is shared by the listener thread and the foreground dispatcher
//! through an `Arc`.  Each entry is a single `write_all` on a file opened in
//! append mode, serialized by a mutex, so lines from the two threads never
//! interleave.
//!
//! Persisting is best effort.  If the file cannot be opened or written, the
//! entry still goes to `tracing` at debug level and the sink otherwise does
//! nothing; it never returns an error to its callers.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, Local};
use tracing::{debug, warn};

use crate::application::dispatch::DiagnosticsLog;

/// Timestamp layout of each line, millisecond resolution.
const TIMESTAMP_FORMAT: &str = "%H:%M:%S%.3f";

/// Append-only, thread-safe diagnostics log.
#[derive(Debug)]
pub struct DiagnosticsSink {
    path: Option<PathBuf>,
    file: Mutex<Option<File>>,
}

impl DiagnosticsSink {
    /// Opens (creating if needed) the log at `path` in append mode.
    ///
    /// An unopenable path yields a sink that only mirrors to `tracing`.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let file = match OpenOptions::new().create(true).append(true).open(&path) {
            Ok(file) => Some(file),
            Err(e) => {
                warn!("diagnostics log {} unavailable: {e}", path.display());
                None
            }
        };
        Self {
            path: Some(path),
            file: Mutex::new(file),
        }
    }

    /// A sink that persists nothing.
    pub fn disabled() -> Self {
        Self {
            path: None,
            file: Mutex::new(None),
        }
    }

    /// The configured log path, even if it could not be opened.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// `true` if entries are currently reaching a file.
    pub fn is_persistent(&self) -> bool {
        self.lock().is_some()
    }

    /// Appends one entry stamped with the current local time.
    pub fn record(&self, message: &str) {
        debug!(target: "touch_injector::diagnostics", "{message}");

        let mut guard = self.lock();
        let Some(file) = guard.as_mut() else {
            return;
        };
        let line = format_line(Local::now(), message);
        // Ignore: a failing disk must not affect injection.
        let _ = file.write_all(line.as_bytes());
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<File>> {
        self.file
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl DiagnosticsLog for DiagnosticsSink {
    fn record(&self, line: &str) {
        DiagnosticsSink::record(self, line);
    }
}

/// Formats one log line, newline-terminated.
///
/// Embedded line breaks are escaped so one entry is always one line.
pub fn format_line(at: DateTime<Local>, message: &str) -> String {
    let message = message.replace('\r', "\\r").replace('\n', "\\n");
    format!("[{}] {message}\n", at.format(TIMESTAMP_FORMAT))
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::sync::Arc;

    fn temp_log_path() -> PathBuf {
        std::env::temp_dir().join(format!("touch-diag-{}.log", uuid::Uuid::new_v4()))
    }

    fn assert_well_formed(line: &str) {
        let bytes = line.as_bytes();
        assert!(bytes.len() > 15, "line too short: {line:?}");
        assert_eq!(bytes[0], b'[', "{line:?}");
        assert_eq!(bytes[3], b':', "{line:?}");
        assert_eq!(bytes[6], b':', "{line:?}");
        assert_eq!(bytes[9], b'.', "{line:?}");
        assert_eq!(bytes[13], b']', "{line:?}");
        assert_eq!(bytes[14], b' ', "{line:?}");
    }

    #[test]
    fn test_format_line_has_millisecond_timestamp() {
        // Arrange
        let at = Local.with_ymd_and_hms(2024, 5, 1, 9, 8, 7).unwrap()
            + chrono::Duration::milliseconds(42);

        // Act
        let line = format_line(at, "hello");

        // Assert
        assert_eq!(line, "[09:08:07.042] hello\n");
    }

    #[test]
    fn test_format_line_escapes_line_breaks() {
        let at = Local.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap();
        let line = format_line(at, "a\nb\r\nc");
        assert_eq!(line, "[00:00:00.000] a\\nb\\r\\nc\n");
    }

    #[test]
    fn test_record_appends_lines_in_order() {
        // Arrange
        let path = temp_log_path();
        std::fs::write(&path, "existing\n").unwrap();
        let sink = DiagnosticsSink::open(&path);

        // Act
        sink.record("first");
        sink.record("second");

        // Assert
        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines[0], "existing");
        assert!(lines[1].ends_with("] first"));
        assert!(lines[2].ends_with("] second"));
        assert_well_formed(lines[1]);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_unopenable_path_degrades_to_no_op() {
        let sink = DiagnosticsSink::open("/nonexistent-touch-dir/sub/debug.log");

        sink.record("goes nowhere");

        assert!(!sink.is_persistent());
        assert!(sink.path().is_some());
    }

    #[test]
    fn test_disabled_sink_persists_nothing() {
        let sink = DiagnosticsSink::disabled();
        sink.record("ignored");
        assert!(!sink.is_persistent());
        assert!(sink.path().is_none());
    }

    #[test]
    fn test_concurrent_writers_never_interleave() {
        // Arrange
        let path = temp_log_path();
        let sink = Arc::new(DiagnosticsSink::open(&path));

        // Act
        let handles: Vec<_> = (0..4)
            .map(|t| {
                let sink = Arc::clone(&sink);
                std::thread::spawn(move || {
                    for i in 0..50 {
                        sink.record(&format!("thread {t} entry {i}"));
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        // Assert
        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines.len(), 200);
        for line in lines {
            assert_well_formed(line);
            assert!(line.contains("thread "));
        }
        let _ = std::fs::remove_file(&path);
    }
}
