//! Event lines in the form `[<timestamp>] <text>`, echoed to stdout and
//! appended to an optional log file.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;

use chrono::Local;
use log::warn;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn format_event(text: &str) -> String {
    format!("[{}] {}", Local::now().format(TIMESTAMP_FORMAT), text)
}

pub struct EventLog {
    file: Option<File>,
    echo: bool,
}

impl EventLog {
    /// A log file that cannot be opened is reported and skipped
    pub fn open(path: Option<&Path>, echo: bool) -> Self {
        let file = path.and_then(|path| {
            OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|e| warn!("Cannot open log file {}: {}", path.display(), e))
                .ok()
        });
        Self { file, echo }
    }

    pub fn record(&mut self, text: &str) {
        let line = format_event(text);
        if self.echo {
            println!("{}", line);
        }
        if let Some(file) = self.file.as_mut()
            && let Err(e) = writeln!(file, "{}", line)
        {
            warn!("Failed to write log line: {}", e);
        }
    }

    pub fn flush(&mut self) {
        if let Some(file) = self.file.as_mut()
            && let Err(e) = file.flush().and_then(|_| file.sync_data())
        {
            warn!("Failed to flush log file: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_event() {
        let line = format_event("Original MAC → 00:11:22:33:44:55");
        // [YYYY-MM-DD HH:MM:SS] text
        assert_eq!(&line[0..1], "[");
        assert_eq!(&line[20..22], "] ");
        assert!(line.ends_with("Original MAC → 00:11:22:33:44:55"));
        assert!(chrono::NaiveDateTime::parse_from_str(&line[1..20], TIMESTAMP_FORMAT).is_ok());
    }

    #[test]
    fn test_appends_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rotation.log");
        std::fs::write(&path, "existing\n").unwrap();

        let mut log = EventLog::open(Some(&path), false);
        log.record("first");
        log.record("second");
        log.flush();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "existing");
        assert!(lines[1].ends_with("] first"));
        assert!(lines[2].ends_with("] second"));
    }

    #[test]
    fn test_unopenable_log_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let mut log = EventLog::open(Some(dir.path()), false);
        log.record("still fine");
        log.flush();
    }
}
