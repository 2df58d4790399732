// repo-publish: publish a local project directory to GitHub
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Global CLI options available for all commands.
//!
//! # Option Precedence
//!
//! ```text
//! --ini FILE        <- Additional config files (can repeat)
//! --dry             <- Plan only, change nothing
//! --log-level N     <- Console verbosity (0-6)
//! --file-log-level  <- Trace file verbosity (overrides --log-level)
//! --log-file FILE   <- Trace file path
//! --set KEY=VAL     <- Direct config override
//!
//! Precedence: CLI flags > --set > RPUB_* env > --ini > repo-publish.toml > defaults
//! ```

use clap::Args;
use std::path::PathBuf;

/// Global options available for all commands.
#[derive(Debug, Clone, Default, Args)]
pub struct GlobalOptions {
    /// Path to additional TOML configuration file(s).
    /// Can be specified multiple times.
    #[arg(short = 'i', long = "ini", value_name = "FILE", action = clap::ArgAction::Append)]
    pub inis: Vec<PathBuf>,

    /// Only read and plan: nothing is initialized, committed or pushed.
    #[arg(long)]
    pub dry: bool,

    /// Console log level (0=silent, 1=errors, 2=warnings, 3=info, 4=debug, 5=trace, 6=dump).
    #[arg(short = 'l', long = "log-level", value_name = "LEVEL", value_parser = clap::value_parser!(u8).range(0..=6)
    )]
    pub log_level: Option<u8>,

    /// Trace file log level, overrides --log-level for the file.
    #[arg(long = "file-log-level", value_name = "LEVEL", value_parser = clap::value_parser!(u8).range(0..=6)
    )]
    pub file_log_level: Option<u8>,

    /// Path to a diagnostic trace file (separate from the publish log).
    #[arg(long = "log-file", value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Sets an option, such as 'publish/default_branch=trunk'.
    /// Can be specified multiple times.
    #[arg(short = 's', long = "set", value_name = "OPTION", action = clap::ArgAction::Append)]
    pub options: Vec<String>,
}

impl GlobalOptions {
    /// Converts command-line options to `section/key=value` overrides,
    /// applied after every other configuration source.
    #[must_use]
    pub fn to_config_overrides(&self) -> Vec<String> {
        let mut overrides = self.options.clone();

        if let Some(level) = self.log_level {
            overrides.push(format!("global/output_log_level={level}"));
        }

        // file_log_level falls back to log_level if not specified
        if let Some(level) = self.file_log_level.or(self.log_level) {
            overrides.push(format!("global/file_log_level={level}"));
        }

        if let Some(ref path) = self.log_file {
            overrides.push(format!("global/log_file={}", path.display()));
        }

        if self.dry {
            overrides.push("global/dry=true".to_string());
        }

        overrides
    }
}
