//! Tracing setup
//!
//! One-shot commands log to stderr. The interactive shell owns the terminal,
//! so its logs go to `~/.stickynotes/<file>` instead, through
//! [`FileWriterGuard`].

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tracing::Level;

/// Log file name used by the shell unless `STICKYNOTES_LOG_FILE` is set
pub const DEFAULT_LOG_FILE: &str = "shell.log";

/// A thread-safe writer that flushes and syncs the shared log file after
/// every write, so the log is complete even if the shell is killed.
///
/// # Example
///
/// ```no_run
/// use std::io::Write;
/// use std::sync::{Arc, Mutex};
/// use std::fs::File;
/// use stickynotes_cli::logging::FileWriterGuard;
///
/// let file = File::create("log.txt").unwrap();
/// let mut guard = FileWriterGuard::new(Arc::new(Mutex::new(file)));
/// guard.write_all(b"Log message\n").unwrap();
/// ```
pub struct FileWriterGuard {
    file: Arc<Mutex<File>>,
}

impl FileWriterGuard {
    /// Wrap a shared log file
    pub fn new(file: Arc<Mutex<File>>) -> Self {
        Self { file }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, File> {
        self.file.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Write for FileWriterGuard {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let mut file = self.lock();
        let written = file.write(buf)?;
        file.flush()?;
        file.sync_all()?;
        Ok(written)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        let mut file = self.lock();
        file.flush()?;
        file.sync_all()
    }
}

/// Pick the log level from the global flags
pub fn log_level(quiet: bool, debug: bool, verbose: bool) -> Level {
    if quiet {
        Level::ERROR
    } else if verbose {
        Level::TRACE
    } else if debug {
        Level::DEBUG
    } else {
        Level::WARN
    }
}

/// Directory holding shell logs
pub fn log_dir() -> PathBuf {
    dirs::home_dir()
        .map(|home| home.join(".stickynotes"))
        .unwrap_or_else(|| PathBuf::from(".stickynotes"))
}

/// Install the global subscriber
pub fn init_tracing(level: Level, shell_mode: bool) {
    if shell_mode {
        match open_log_file() {
            Ok(file) => {
                let shared = Arc::new(Mutex::new(file));
                tracing_subscriber::fmt()
                    .with_writer(move || FileWriterGuard::new(Arc::clone(&shared)))
                    .with_max_level(level.max(Level::INFO))
                    .with_ansi(false)
                    .init();
                return;
            }
            Err(e) => {
                eprintln!("Failed to open log file, logging to stderr: {}", e);
            }
        }
    }

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .init();
}

fn open_log_file() -> std::io::Result<File> {
    let dir = log_dir();
    std::fs::create_dir_all(&dir)?;
    let file_name =
        std::env::var("STICKYNOTES_LOG_FILE").unwrap_or_else(|_| DEFAULT_LOG_FILE.to_string());
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join(file_name))
}
