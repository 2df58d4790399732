// repo-publish: publish a local project directory to GitHub
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Async process spawning.
//!
//! ```text
//! ProcessBuilder::new("git")
//!   .args() .cwd() .env_var() .capture_output()
//!   .run()
//!       --> tokio::process::Command
//!           stream stdout/stderr
//!       --> ProcessOutput { command, exit_code, stdout, stderr }
//! ```
//!
//! Every call blocks the caller until the child exits; nothing is cancelled
//! mid-flight.

pub mod builder;
mod io;
mod runner;
