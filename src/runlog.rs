//! Run log - timestamped console output mirrored into a plain-text file.
//!
//! The log file is truncated when the log is created and appended for the
//! rest of the run. The log is passed by reference to every stage; nothing
//! here is process-global.

use chrono::Local;
use console::style;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::error::Result;

pub struct RunLog {
    file: Option<File>,
}

impl RunLog {
    /// Create a run log backed by `path`, truncating any previous content.
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::create(path)?;
        Ok(RunLog { file: Some(file) })
    }

    /// A log that only writes to the console. Used by tests and library
    /// callers that manage their own files.
    pub fn disabled() -> Self {
        RunLog { file: None }
    }

    /// Plain progress line.
    pub fn status(&self, message: &str) {
        println!("[{}] {}", Local::now().format("%H:%M:%S"), message);
        self.append(message);
    }

    /// Progress line with a success marker.
    pub fn success(&self, message: &str) {
        println!(
            "[{}] {} {}",
            Local::now().format("%H:%M:%S"),
            style("✓").green(),
            message
        );
        self.append(&format!("✓ {}", message));
    }

    /// Non-fatal warning.
    pub fn warn(&self, message: &str) {
        println!(
            "[{}] {} {}",
            Local::now().format("%H:%M:%S"),
            style("⚠").yellow(),
            message
        );
        self.append(&format!("⚠ {}", message));
    }

    /// Error line, written to stderr.
    pub fn error(&self, message: &str) {
        eprintln!(
            "[{}] {} {}",
            Local::now().format("%H:%M:%S"),
            style("ERROR:").red(),
            message
        );
        self.append(&format!("ERROR: {}", message));
    }

    /// Separator line framing a run section.
    pub fn banner(&self) {
        self.status(&"=".repeat(60));
    }

    // File writes are best-effort once the log exists.
    fn append(&self, line: &str) {
        if let Some(file) = &self.file {
            let mut file = file;
            let _ = writeln!(
                file,
                "[{}] {}",
                Local::now().format("%Y-%m-%d %H:%M:%S"),
                line
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_create_truncates_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sync_result.log");
        fs::write(&path, "stale content from a previous run\n").unwrap();

        let log = RunLog::create(&path).unwrap();
        log.status("fresh line");

        let contents = fs::read_to_string(&path).unwrap();
        assert!(!contents.contains("stale content"));
        assert!(contents.contains("fresh line"));
    }

    #[test]
    fn test_lines_are_timestamped_and_appended() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sync_result.log");

        let log = RunLog::create(&path).unwrap();
        log.status("first");
        log.success("second");
        log.warn("third");
        log.error("fourth");

        let contents = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 4);
        for line in &lines {
            // [YYYY-MM-DD HH:MM:SS] prefix
            assert!(line.starts_with('['), "line should be timestamped: {}", line);
        }
        assert!(lines[1].contains("second"));
        assert!(lines[3].contains("ERROR: fourth"));
    }

    #[test]
    fn test_disabled_log_writes_nothing() {
        let log = RunLog::disabled();
        log.status("goes only to the console");
        log.banner();
    }
}
