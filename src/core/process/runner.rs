// repo-publish: publish a local project directory to GitHub
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Process execution and lifecycle management.
//!
//! ```text
//!          run()
//!            |
//!            v
//!     build_command()
//!   args, cwd, env overlay, stdio
//!            |
//!            v
//!         spawn() --err--> ProcessError::SpawnFailed
//!            |
//!            v
//!       run_child()
//!            |
//!            v
//!    validate exit_code
//!   (skip if ALLOW_FAILURE)
//!            |
//!            v
//!      ProcessOutput
//! ```

use crate::error::{ProcessError, Result};
use std::fmt::Write as _;
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, error, trace};

use super::builder::{ProcessBuilder, ProcessFlags, ProcessOutput};

impl ProcessBuilder {
    /// Returns the display name for this process.
    fn display_name(&self) -> String {
        self.name_override().map_or_else(
            || {
                self.program().file_stem().map_or_else(
                    || "process".to_string(),
                    |s| s.to_string_lossy().into_owned(),
                )
            },
            String::from,
        )
    }

    /// Returns the full command line as a string (for logging).
    ///
    /// Arguments containing whitespace are double-quoted.
    #[must_use]
    pub fn command_line(&self) -> String {
        let mut cmd = format!("{}", self.program().display());
        for arg in self.args_slice() {
            if arg.is_empty() || arg.contains(char::is_whitespace) {
                let _ = write!(cmd, " \"{arg}\"");
            } else {
                let _ = write!(cmd, " {arg}");
            }
        }
        cmd
    }

    /// Spawns and runs the process, waiting for completion.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Spawning the child process fails.
    /// - The process exits with a non-zero status (and `ALLOW_FAILURE` flag is not set).
    pub async fn run(self) -> Result<ProcessOutput> {
        let name = self.display_name();
        let cmd_line = self.command_line();

        if let Some(cwd) = self.working_dir() {
            debug!(cwd = %cwd.display(), "cd");
        }
        debug!(cmd = %cmd_line, "exec");

        let mut command = self.build_command();

        let mut child = command.spawn().map_err(|source| ProcessError::SpawnFailed {
            command: cmd_line.clone(),
            source,
        })?;

        trace!(process = %name, pid = ?child.id(), "spawned");

        let output = self.run_child(&name, &cmd_line, &mut child).await?;

        if !self.process_flags().contains(ProcessFlags::ALLOW_FAILURE) && !output.success() {
            if !output.stderr().is_empty() {
                error!(process = %name, stderr = %output.stderr(), "process error output");
            }
            anyhow::bail!("{} exited with code {}", name, output.exit_code());
        }

        trace!(process = %name, exit_code = output.exit_code(), "completed");
        Ok(output)
    }

    /// Builds the tokio Command from this builder's configuration.
    fn build_command(&self) -> Command {
        let mut command = Command::new(self.program());

        command.args(self.args_slice());

        if let Some(cwd) = self.working_dir() {
            command.current_dir(cwd);
        }

        // Overlay only; the parent environment is kept.
        for (key, value) in self.env_vars() {
            command.env(key, value);
        }

        // Never let a child wait on the operator's terminal.
        command.stdin(Stdio::null());
        // Both streams are always read, either into the log or a string.
        command.stdout(Stdio::piped());
        command.stderr(Stdio::piped());

        command.kill_on_drop(true);

        command
    }
}
