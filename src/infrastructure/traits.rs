//! I/O boundary traits for testability

use std::io::{self, Read};
use std::path::Path;
use std::thread;
use std::time::Duration;

/// Waits between two animation ticks.
pub trait Pacer: Send + Sync {
    fn wait(&self, delay: Duration);
}

/// Where operation scripts come from.
pub trait ScriptSource: Send + Sync {
    /// Read the whole script. The path `-` stands for standard input.
    fn read_script(&self, path: &Path) -> io::Result<String>;
}

// ============================================================
// REAL IMPLEMENTATIONS
// ============================================================

/// Blocks the calling thread for the requested delay.
#[derive(Debug, Default)]
pub struct SleepPacer;

impl Pacer for SleepPacer {
    fn wait(&self, delay: Duration) {
        thread::sleep(delay);
    }
}

/// Returns immediately; used when animation is disabled and in tests.
#[derive(Debug, Default)]
pub struct InstantPacer;

impl Pacer for InstantPacer {
    fn wait(&self, _delay: Duration) {}
}

#[derive(Debug, Default)]
pub struct RealScriptSource;

impl ScriptSource for RealScriptSource {
    fn read_script(&self, path: &Path) -> io::Result<String> {
        if path.as_os_str() == "-" {
            let mut content = String::new();
            io::stdin().lock().read_to_string(&mut content)?;
            return Ok(content);
        }
        std::fs::read_to_string(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[test]
    fn given_instant_pacer_when_waiting_then_returns_immediately() {
        let start = Instant::now();
        InstantPacer.wait(Duration::from_secs(5));
        assert!(start.elapsed() < Duration::from_secs(1));
    }

    #[test]
    fn given_missing_file_when_reading_script_then_not_found() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = RealScriptSource
            .read_script(&dir.path().join("missing.bst"))
            .expect_err("missing file");
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
