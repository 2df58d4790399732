// repo-publish: publish a local project directory to GitHub
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Process builder with configuration options.
//!
//! ```text
//! ProcessBuilder
//!  • new/exists/find
//!  • args/cwd/env_var/flag/name
//!  • capture_output
//!
//! ProcessFlags: ALLOW_FAILURE
//! StreamFlags: FORWARD_TO_LOG (default), KEEP_IN_STRING
//! ```

use bitflags::bitflags;
use std::collections::BTreeMap;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::sync::{OnceLock, RwLock};

use serde::Serialize;

/// Static cache for executable paths resolved via `which`.
static EXECUTABLE_CACHE: OnceLock<RwLock<BTreeMap<String, PathBuf>>> = OnceLock::new();

/// Get the executable cache, initializing if needed.
fn exe_cache() -> &'static RwLock<BTreeMap<String, PathBuf>> {
    EXECUTABLE_CACHE.get_or_init(|| RwLock::new(BTreeMap::new()))
}

bitflags! {
    /// Flags controlling process execution behavior.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct ProcessFlags: u32 {
        /// Don't fail if the process exits with a non-zero status
        const ALLOW_FAILURE = 0x01;
    }
}

bitflags! {
    /// Flags controlling stream handling for stdout/stderr.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct StreamFlags: u32 {
        /// Forward output to tracing logs
        const FORWARD_TO_LOG = 0x01;
        /// Keep output in a string for later retrieval
        const KEEP_IN_STRING = 0x04;
    }
}

impl Default for StreamFlags {
    fn default() -> Self {
        Self::FORWARD_TO_LOG
    }
}

/// Output from a completed process.
///
/// This is the result type of every collaborator call: the command line
/// that was attempted, its exit code and whatever it printed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProcessOutput {
    command: String,
    exit_code: i32,
    stdout: String,
    stderr: String,
}

impl ProcessOutput {
    /// Creates a new `ProcessOutput`.
    pub fn new(
        command: impl Into<String>,
        exit_code: i32,
        stdout: impl Into<String>,
        stderr: impl Into<String>,
    ) -> Self {
        Self {
            command: command.into(),
            exit_code,
            stdout: stdout.into(),
            stderr: stderr.into(),
        }
    }

    /// Returns the command line that produced this output.
    #[must_use]
    pub fn command(&self) -> &str {
        &self.command
    }

    /// Returns the process exit code (0 = success, -1 = killed by signal).
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        self.exit_code
    }

    /// Returns captured stdout (if `KEEP_IN_STRING` was set).
    #[must_use]
    pub fn stdout(&self) -> &str {
        &self.stdout
    }

    /// Returns captured stderr (if `KEEP_IN_STRING` was set).
    #[must_use]
    pub fn stderr(&self) -> &str {
        &self.stderr
    }

    /// Returns stdout followed by stderr, trimmed, one block of text.
    #[must_use]
    pub fn combined(&self) -> String {
        let stdout = self.stdout.trim_end();
        let stderr = self.stderr.trim_end();
        match (stdout.is_empty(), stderr.is_empty()) {
            (true, _) => stderr.to_string(),
            (false, true) => stdout.to_string(),
            (false, false) => format!("{stdout}\n{stderr}"),
        }
    }

    /// Returns true if the process exited successfully (code 0).
    #[must_use]
    pub const fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Builder for configuring and running a process.
///
/// Uses the builder pattern to configure process options before spawning.
#[derive(Debug)]
pub struct ProcessBuilder {
    /// Path to the executable
    program: PathBuf,
    /// Command-line arguments
    args: Vec<String>,
    /// Working directory
    cwd: Option<PathBuf>,
    /// Variables added on top of the inherited environment
    env: BTreeMap<String, String>,
    /// Process flags
    flags: ProcessFlags,
    /// Stdout handling
    stdout: StreamFlags,
    /// Stderr handling
    stderr: StreamFlags,
    /// Display name for logging
    name: Option<String>,
}

impl ProcessBuilder {
    /// Creates a new `ProcessBuilder` for the given program.
    ///
    /// The program can be an absolute path, relative path, or just the executable name.
    /// If just a name is given, it will be resolved via PATH when `run()` is called.
    pub fn new(program: impl AsRef<Path>) -> Self {
        Self {
            program: program.as_ref().to_path_buf(),
            args: Vec::new(),
            cwd: None,
            env: BTreeMap::new(),
            flags: ProcessFlags::empty(),
            stdout: StreamFlags::default(),
            stderr: StreamFlags::default(),
            name: None,
        }
    }

    /// Checks if an executable exists in PATH.
    #[must_use]
    pub fn exists(program: &str) -> bool {
        Self::find(program).is_some()
    }

    /// Finds the full path to an executable in PATH.
    ///
    /// Absolute and relative paths are checked as given. Results are cached
    /// for subsequent lookups. Returns `None` if the executable is not found.
    #[must_use]
    pub fn find(program: &str) -> Option<PathBuf> {
        // Check cache first (read lock)
        {
            let cache = exe_cache()
                .read()
                .unwrap_or_else(std::sync::PoisonError::into_inner);
            if let Some(path) = cache.get(program) {
                return Some(path.clone());
            }
        }

        // Not in cache, resolve via which
        which::which(program).map_or(None, |path| {
            // Cache the result (write lock)
            {
                let mut cache = exe_cache()
                    .write()
                    .unwrap_or_else(std::sync::PoisonError::into_inner);
                cache.insert(program.to_string(), path.clone());
            }
            Some(path)
        })
    }

    /// Adds an argument to the command.
    #[must_use]
    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_string_lossy().into_owned());
        self
    }

    /// Adds multiple arguments to the command.
    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        for arg in args {
            self.args.push(arg.as_ref().to_string_lossy().into_owned());
        }
        self
    }

    /// Sets the working directory for the process.
    #[must_use]
    pub fn cwd(mut self, dir: impl AsRef<Path>) -> Self {
        self.cwd = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Sets one environment variable for the child only.
    ///
    /// The rest of the parent environment is inherited.
    #[must_use]
    pub fn env_var(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    /// Adds a process flag.
    #[must_use]
    pub fn flag(mut self, flag: ProcessFlags) -> Self {
        self.flags |= flag;
        self
    }

    /// Convenience: capture both stdout and stderr to strings, still
    /// forwarding every line to the trace log.
    #[must_use]
    pub const fn capture_output(mut self) -> Self {
        let flags = StreamFlags::KEEP_IN_STRING.union(StreamFlags::FORWARD_TO_LOG);
        self.stdout = flags;
        self.stderr = flags;
        self
    }

    /// Sets a display name for logging.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    // Getters for field access within the process module

    /// Returns a reference to the program path.
    #[must_use]
    pub const fn program(&self) -> &PathBuf {
        &self.program
    }

    /// Returns a slice of the arguments.
    #[must_use]
    pub fn args_slice(&self) -> &[String] {
        &self.args
    }

    /// Returns a reference to the working directory, if set.
    pub(super) const fn working_dir(&self) -> Option<&PathBuf> {
        self.cwd.as_ref()
    }

    /// Returns the extra environment variables.
    pub(super) const fn env_vars(&self) -> &BTreeMap<String, String> {
        &self.env
    }

    /// Returns the process flags.
    pub(super) const fn process_flags(&self) -> ProcessFlags {
        self.flags
    }

    /// Returns the stdout flags.
    pub(super) const fn stdout_config(&self) -> StreamFlags {
        self.stdout
    }

    /// Returns the stderr flags.
    pub(super) const fn stderr_config(&self) -> StreamFlags {
        self.stderr
    }

    /// Returns the display name, if set.
    pub(super) fn name_override(&self) -> Option<&str> {
        self.name.as_deref()
    }
}
