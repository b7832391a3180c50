//! Observer hooks for pipeline runs.
//!
//! A [`PipelineObserver`] receives one [`StageEvent`] per completed stage plus
//! a failure or completion callback, which is enough to log progress, spot a
//! stage that unexpectedly drops every row, or append an audit trail to a file.

use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::error::PrepError;

/// Severity classification for failure callbacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Warning-level event (non-fatal).
    Warning,
    /// Error-level event (the run failed).
    Error,
    /// Critical error (typically I/O or other infrastructure failures).
    Critical,
}

/// Classify an error for observer callbacks. I/O problems (missing input
/// file, unwritable output) are Critical; data and config problems are Error.
pub fn severity_for_error(error: &PrepError) -> Severity {
    match error {
        PrepError::Io(_) => Severity::Critical,
        PrepError::Csv(e) => match e.kind() {
            csv::ErrorKind::Io(_) => Severity::Critical,
            _ => Severity::Error,
        },
        PrepError::Json(_)
        | PrepError::MissingColumn { .. }
        | PrepError::Parse { .. }
        | PrepError::InvalidConfig { .. } => Severity::Error,
    }
}

/// One completed pipeline stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageEvent {
    /// Stage name (`"load"`, `"filter"`, ...).
    pub stage: &'static str,
    /// Rows entering the stage.
    pub rows_in: usize,
    /// Rows leaving the stage.
    pub rows_out: usize,
    /// Wall-clock time spent in the stage.
    pub elapsed: Duration,
}

/// Observer interface for pipeline outcomes.
pub trait PipelineObserver: Send + Sync {
    /// Called after each stage completes.
    fn on_stage(&self, _event: &StageEvent) {}

    /// Called once when a stage fails; the run aborts afterwards.
    fn on_failure(&self, _stage: &'static str, _severity: Severity, _error: &PrepError) {}

    /// Called once when the whole run succeeds and the output file is written.
    fn on_complete(&self, _rows_written: usize, _output: &Path) {}
}

/// An observer that fans out callbacks to a list of observers.
#[derive(Default)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn PipelineObserver>>,
}

impl CompositeObserver {
    /// Create a new composite observer from a list of observers.
    pub fn new(observers: Vec<Arc<dyn PipelineObserver>>) -> Self {
        Self { observers }
    }
}

impl fmt::Debug for CompositeObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeObserver")
            .field("observers_len", &self.observers.len())
            .finish()
    }
}

impl PipelineObserver for CompositeObserver {
    fn on_stage(&self, event: &StageEvent) {
        for o in &self.observers {
            o.on_stage(event);
        }
    }

    fn on_failure(&self, stage: &'static str, severity: Severity, error: &PrepError) {
        for o in &self.observers {
            o.on_failure(stage, severity, error);
        }
    }

    fn on_complete(&self, rows_written: usize, output: &Path) {
        for o in &self.observers {
            o.on_complete(rows_written, output);
        }
    }
}

/// Logs pipeline events to stderr.
#[derive(Debug, Default)]
pub struct StdErrObserver;

impl PipelineObserver for StdErrObserver {
    fn on_stage(&self, event: &StageEvent) {
        eprintln!(
            "[prep][{}] rows {} -> {} ({:?})",
            event.stage, event.rows_in, event.rows_out, event.elapsed
        );
    }

    fn on_failure(&self, stage: &'static str, severity: Severity, error: &PrepError) {
        eprintln!("[prep][{stage}][{severity:?}] {error}");
    }

    fn on_complete(&self, rows_written: usize, output: &Path) {
        eprintln!("[prep][done] rows={} path={}", rows_written, output.display());
    }
}

/// Appends pipeline events to a local log file.
#[derive(Debug)]
pub struct FileObserver {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileObserver {
    /// Create a file observer that appends events to `path`.
    ///
    /// Writes are best-effort; failures to open/write the log file are ignored.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        }
    }

    fn append_line(&self, line: &str) {
        let _guard = self.lock.lock().ok();
        if let Ok(mut f) = OpenOptions::new().create(true).append(true).open(&self.path) {
            let _ = writeln!(f, "{line}");
        }
    }
}

impl PipelineObserver for FileObserver {
    fn on_stage(&self, event: &StageEvent) {
        self.append_line(&format!(
            "{} stage={} rows_in={} rows_out={} elapsed_ms={}",
            unix_ts(),
            event.stage,
            event.rows_in,
            event.rows_out,
            event.elapsed.as_millis()
        ));
    }

    fn on_failure(&self, stage: &'static str, severity: Severity, error: &PrepError) {
        self.append_line(&format!(
            "{} fail stage={stage} severity={severity:?} err={error}",
            unix_ts()
        ));
    }

    fn on_complete(&self, rows_written: usize, output: &Path) {
        self.append_line(&format!(
            "{} done rows={} path={}",
            unix_ts(),
            rows_written,
            output.display()
        ));
    }
}

fn unix_ts() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

#[cfg(test)]
mod tests {
    use std::path::Path;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use super::{
        CompositeObserver, PipelineObserver, Severity, StageEvent, severity_for_error,
    };
    use crate::error::PrepError;

    #[derive(Default)]
    struct CountingObserver {
        stages: AtomicUsize,
        completions: AtomicUsize,
    }

    impl PipelineObserver for CountingObserver {
        fn on_stage(&self, _event: &StageEvent) {
            self.stages.fetch_add(1, Ordering::SeqCst);
        }

        fn on_complete(&self, _rows_written: usize, _output: &Path) {
            self.completions.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn composite_fans_out_to_all_observers() {
        let a = Arc::new(CountingObserver::default());
        let b = Arc::new(CountingObserver::default());
        let composite = CompositeObserver::new(vec![a.clone(), b.clone()]);

        composite.on_stage(&StageEvent {
            stage: "filter",
            rows_in: 10,
            rows_out: 4,
            elapsed: Duration::from_millis(1),
        });
        composite.on_complete(4, Path::new("out.csv"));

        assert_eq!(a.stages.load(Ordering::SeqCst), 1);
        assert_eq!(b.stages.load(Ordering::SeqCst), 1);
        assert_eq!(a.completions.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn io_errors_are_critical() {
        let io = PrepError::Io(std::io::Error::other("disk gone"));
        assert_eq!(severity_for_error(&io), Severity::Critical);

        let missing = PrepError::MissingColumn {
            column: "year".to_string(),
            context: "filter".to_string(),
        };
        assert_eq!(severity_for_error(&missing), Severity::Error);
    }
}
