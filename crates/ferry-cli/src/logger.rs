use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;

use chrono::Local;
use clap::ValueEnum;
use eyre::{Context, Result};
use ferry_core::logger::Logger;
use parking_lot::Mutex;

/// File-log verbosity. `Debug` additionally records every per-file
/// copy/skip event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Info,
    Debug,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Info => write!(f, "info"),
            LogLevel::Debug => write!(f, "debug"),
        }
    }
}

/// Warnings and errors go to stderr; everything (at the configured level)
/// is appended to the optional log file with a timestamp.
pub struct FileConsoleLogger {
    file: Option<Mutex<File>>,
    level: LogLevel,
}

impl FileConsoleLogger {
    pub fn new(path: Option<&Path>, level: LogLevel) -> Result<Self> {
        let file = match path {
            Some(path) => {
                let file = OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(path)
                    .with_context(|| format!("open log file {}", path.display()))?;
                Some(Mutex::new(file))
            }
            None => None,
        };
        Ok(Self { file, level })
    }

    fn write_line(&self, level: &str, msg: &str) {
        if let Some(file) = &self.file {
            let stamp = Local::now().format("%Y-%m-%d %H:%M:%S");
            let mut file = file.lock();
            let _ = writeln!(file, "{stamp} [{level}] {msg}");
        }
    }
}

impl Logger for FileConsoleLogger {
    fn info(&self, msg: &str) {
        self.write_line("INFO", msg);
    }

    fn warn(&self, msg: &str) {
        eprintln!("[warn] {msg}");
        self.write_line("WARNING", msg);
    }

    fn error(&self, op: &str, path: &Path, msg: &str) {
        let line = format!("{op} {}: {msg}", path.display());
        eprintln!("[error] {line}");
        self.write_line("ERROR", &line);
    }

    fn copy_done(&self, src: &Path, dst: &Path, bytes: u64) {
        if self.level == LogLevel::Debug {
            self.write_line(
                "DEBUG",
                &format!("copied {} -> {} ({bytes} bytes)", src.display(), dst.display()),
            );
        }
    }

    fn skip(&self, src: &Path) {
        if self.level == LogLevel::Debug {
            self.write_line("DEBUG", &format!("up to date: {}", src.display()));
        }
    }
}
