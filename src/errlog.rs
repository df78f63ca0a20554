//! Disk logging for model-call failures and panics.
//!
//! The transcript shows the user a short error line; the full message lands
//! in `.aquasathi/errors/` for later inspection.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

use chrono::Local;

use crate::constants::ERROR_DIR;

fn timestamp() -> String {
    Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

fn format_entry(timestamp: &str, error: &str) -> String {
    format!("[{}] {}\n---\n", timestamp, error)
}

/// Append an error to the model-error log. Returns the log path for display.
/// Logging failures are swallowed; an unwritable disk must not take the
/// session down.
pub fn log_error(error: &str) -> String {
    let dir = Path::new(ERROR_DIR);
    let _ = fs::create_dir_all(dir);
    let path = dir.join("model.log");
    let entry = format_entry(&timestamp(), error);
    let _ = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .and_then(|mut f| f.write_all(entry.as_bytes()));
    path.display().to_string()
}

/// Append panic info (with backtrace) to the panic log.
pub fn log_panic(info: &std::panic::PanicHookInfo<'_>) {
    let dir = Path::new(ERROR_DIR);
    let _ = fs::create_dir_all(dir);
    let backtrace = std::backtrace::Backtrace::force_capture();
    let msg = format!("[{}] {}\n\n{}\n\n---\n", timestamp(), info, backtrace);
    let path = dir.join("panic.log");
    let _ = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .and_then(|mut f| f.write_all(msg.as_bytes()));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entries_carry_human_readable_timestamps() {
        let ts = timestamp();
        // 2026-08-25 14:03:09 — a formatted local time, not a bare epoch integer
        assert_eq!(ts.len(), 19);
        assert_eq!(&ts[4..5], "-");
        assert_eq!(&ts[7..8], "-");
        assert_eq!(&ts[10..11], " ");
        assert_eq!(&ts[13..14], ":");
        assert!(!ts.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn entry_format_leads_with_timestamp() {
        let entry = format_entry("2026-08-25 14:03:09", "stream failed");
        assert_eq!(entry, "[2026-08-25 14:03:09] stream failed\n---\n");
    }
}
