// repo-publish: publish a local project directory to GitHub
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Per-invocation audit log.
//!
//! ```text
//! append(level, msg)
//!   for each text line:
//!     "YYYY-MM-DD HH:MM:SS LEVEL line" --> lines (memory)
//!                                     --> file, flushed
//!     tracing event ------------------> console
//!
//! relocate(new)
//!   create new file, replay lines, flush
//!   swap, remove old file (best effort)
//! ```
//!
//! The log never fails the caller. If the file cannot be written any more,
//! lines go to stderr instead and a single warning is traced.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::Local;
use tracing::{Level, debug, error, info, warn};

use crate::error::Result;

/// File name of the log once it lives in the repository metadata directory.
pub const GIT_DIR_LOG_NAME: &str = "repo-publish.log";

/// File name used when the per-project log cannot be created.
pub const FALLBACK_LOG_NAME: &str = "repo-publish-fallback.log";

/// Append-only, line-oriented publish log.
#[derive(Debug)]
pub struct PublishLog {
    path: Option<PathBuf>,
    file: Option<File>,
    lines: Vec<String>,
}

impl PublishLog {
    /// Create (truncate) the log at `path`, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or file cannot be created.
    pub fn create(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let file = open_truncated(&path)?;
        Ok(Self {
            path: Some(path),
            file: Some(file),
            lines: Vec::new(),
        })
    }

    /// Open the primary log, else the fallback log in `scratch`, else stderr.
    ///
    /// When the primary cannot be created the reason is the first line
    /// of whichever sink is used instead.
    #[must_use]
    pub fn open_or_fallback(primary: &Path, scratch: &Path) -> Self {
        let err = match Self::create(primary) {
            Ok(log) => return log,
            Err(err) => err,
        };

        let mut log = Self::create(scratch.join(FALLBACK_LOG_NAME)).unwrap_or_else(|_| Self::stderr());
        log.append(
            Level::WARN,
            format!("cannot open log {}: {err:#}", primary.display()),
        );
        log
    }

    /// A log with no backing file; lines are written to stderr.
    #[must_use]
    pub const fn stderr() -> Self {
        Self {
            path: None,
            file: None,
            lines: Vec::new(),
        }
    }

    /// Path of the backing file, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Every line written so far, in order.
    #[must_use]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Write `message` at `level`.
    ///
    /// Multi-line messages (captured tool output) become one timestamped
    /// line per text line. Every line is flushed before this returns.
    pub fn append(&mut self, level: Level, message: impl AsRef<str>) {
        let message = message.as_ref();
        let stamp = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
        let level_name = level.to_string();

        for text in message.lines().filter(|l| !l.trim().is_empty()) {
            let line = format!("{stamp} {level_name:<5} {text}");
            self.write_line(&line);
            self.lines.push(line);
            emit(level, text);
        }
        if message.trim().is_empty() {
            let line = format!("{stamp} {level_name:<5}");
            self.write_line(&line);
            self.lines.push(line);
        }
    }

    pub fn info(&mut self, message: impl AsRef<str>) {
        self.append(Level::INFO, message);
    }

    pub fn warn(&mut self, message: impl AsRef<str>) {
        self.append(Level::WARN, message);
    }

    pub fn error(&mut self, message: impl AsRef<str>) {
        self.append(Level::ERROR, message);
    }

    /// Move the log to `new_path`, replaying every prior line there.
    ///
    /// On failure the log stays where it was.
    ///
    /// # Errors
    ///
    /// Returns an error if the new file cannot be created or written.
    pub fn relocate(&mut self, new_path: impl Into<PathBuf>) -> Result<()> {
        let new_path = new_path.into();
        if self.path.as_deref() == Some(new_path.as_path()) {
            return Ok(());
        }

        let mut file = open_truncated(&new_path)?;
        for line in &self.lines {
            writeln!(file, "{line}")
                .with_context(|| format!("failed to replay log into {}", new_path.display()))?;
        }
        file.flush()
            .with_context(|| format!("failed to flush {}", new_path.display()))?;

        if let Some(old) = self.path.replace(new_path) {
            drop(self.file.take());
            if let Err(e) = fs::remove_file(&old) {
                debug!(path = %old.display(), error = %e, "could not remove previous log");
            }
        }
        self.file = Some(file);
        Ok(())
    }

    fn write_line(&mut self, line: &str) {
        let Some(file) = self.file.as_mut() else {
            eprintln!("{line}");
            return;
        };

        let result = writeln!(file, "{line}").and_then(|()| file.flush());
        if let Err(e) = result {
            let path = self.path.as_deref().unwrap_or_else(|| Path::new("?"));
            warn!(path = %path.display(), error = %e, "publish log is no longer writable, using stderr");
            self.file = None;
            eprintln!("{line}");
        }
    }
}

fn open_truncated(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create log directory {}", parent.display()))?;
    }
    OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(path)
        .with_context(|| format!("failed to create log file {}", path.display()))
}

/// Echo one log line to the console subscriber.
fn emit(level: Level, text: &str) {
    match level {
        Level::ERROR => error!("{text}"),
        Level::WARN => warn!("{text}"),
        Level::INFO => info!("{text}"),
        _ => debug!("{text}"),
    }
}
