//! Timing scopes and an optional edit debug log.
//!
//! Both are process-wide diagnostics switched on from the command line; the
//! document itself never depends on them.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{LazyLock, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

static ENABLED: AtomicBool = AtomicBool::new(false);
static EDIT_LOG: LazyLock<Mutex<EditLog>> = LazyLock::new(|| Mutex::new(EditLog::new()));

/// Prints its lifetime to stderr on drop when timing is enabled.
#[derive(Debug)]
pub struct Scope {
    name: &'static str,
    start: Instant,
}

impl Drop for Scope {
    fn drop(&mut self) {
        if !is_enabled() {
            return;
        }
        let elapsed_ms = self.start.elapsed().as_secs_f64() * 1000.0;
        eprintln!("[perf] {}: {:.3} ms", self.name, elapsed_ms);
    }
}

#[derive(Debug)]
struct EditLog {
    start: Instant,
    events: usize,
    writer: Option<BufWriter<File>>,
}

impl EditLog {
    fn new() -> Self {
        Self {
            start: Instant::now(),
            events: 0,
            writer: None,
        }
    }
}

fn edit_log() -> MutexGuard<'static, EditLog> {
    EDIT_LOG.lock().unwrap_or_else(PoisonError::into_inner)
}

pub fn set_enabled(enabled: bool) {
    ENABLED.store(enabled, Ordering::Relaxed);
}

pub fn is_enabled() -> bool {
    ENABLED.load(Ordering::Relaxed)
}

pub fn scope(name: &'static str) -> Scope {
    Scope {
        name,
        start: Instant::now(),
    }
}

/// Start writing edit events to `path`, or stop when `None`.
pub fn set_debug_log_path(path: Option<&Path>) -> std::io::Result<()> {
    let mut log = edit_log();
    match path {
        Some(path) => {
            let mut writer = BufWriter::new(File::create(path)?);
            writeln!(writer, "markspan edit log start")?;
            writer.flush()?;
            log.start = Instant::now();
            log.events = 0;
            log.writer = Some(writer);
        }
        None => log.writer = None,
    }
    Ok(())
}

pub fn is_debug_log_enabled() -> bool {
    edit_log().writer.is_some()
}

/// Record one edit event with the time since the log was opened.
pub fn log_event(name: &str, detail: impl AsRef<str>) {
    tracing::trace!(target: "markspan::perf", event = name, detail = detail.as_ref());
    let mut log = edit_log();
    let elapsed_ms = log.start.elapsed().as_secs_f64() * 1000.0;
    log.events += 1;
    let seq = log.events;
    if let Some(writer) = log.writer.as_mut() {
        let _ = writeln!(
            writer,
            "#{seq:<5} [{elapsed_ms:>10.3} ms] {name}: {}",
            detail.as_ref()
        );
        let _ = writer.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_set_enabled_toggles_runtime_flag() {
        set_enabled(true);
        assert!(is_enabled());

        set_enabled(false);
        assert!(!is_enabled());
    }

    #[test]
    fn test_debug_log_path_enables_logging_and_writes() {
        let temp_file = NamedTempFile::new().unwrap();
        set_debug_log_path(Some(temp_file.path())).unwrap();
        assert!(is_debug_log_enabled());
        log_event("editor.on_change", "start=0 removed=1 inserted=0");
        set_debug_log_path(None).unwrap();
        assert!(!is_debug_log_enabled());

        let content = std::fs::read_to_string(temp_file.path()).unwrap();
        assert!(content.contains("markspan edit log start"));
        assert!(content.contains("editor.on_change: start=0 removed=1 inserted=0"));
    }
}
