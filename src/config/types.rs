// repo-publish: publish a local project directory to GitHub
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration types for repo-publish.
//!
//! # Config Structure
//!
//! ```text
//! Config: GlobalConfig, PublishConfig, ToolsConfig
//! Visibility: Public (default) | Private
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::ConfigError;
use crate::logging::LogLevel;

/// Visibility of the remote repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    #[default]
    Public,
    Private,
}

impl Visibility {
    /// Flag passed to the hosting client.
    #[must_use]
    pub const fn as_flag(self) -> &'static str {
        match self {
            Self::Public => "--public",
            Self::Private => "--private",
        }
    }
}

impl std::fmt::Display for Visibility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Public => write!(f, "public"),
            Self::Private => write!(f, "private"),
        }
    }
}

impl std::str::FromStr for Visibility {
    type Err = ConfigError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "public" => Ok(Self::Public),
            "private" => Ok(Self::Private),
            _ => Err(ConfigError::InvalidValue {
                section: "publish".to_string(),
                key: "visibility".to_string(),
                message: format!("expected 'public' or 'private', got '{s}'"),
            }),
        }
    }
}

/// Global configuration options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GlobalConfig {
    /// Run the read-only steps and log the plan only.
    pub dry: bool,
    /// Log level for stdout output (0-6).
    pub output_log_level: LogLevel,
    /// Log level for the trace file (0-6).
    pub file_log_level: LogLevel,
    /// Optional diagnostic trace file, separate from the publish log.
    pub log_file: Option<PathBuf>,
    /// Skip the final "press enter" pause.
    pub no_pause: bool,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            dry: false,
            output_log_level: LogLevel::INFO,
            file_log_level: LogLevel::TRACE,
            log_file: None,
            no_pause: false,
        }
    }
}

/// Publish workflow options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PublishConfig {
    /// Canonical primary branch name.
    pub default_branch: String,
    /// Visibility used when neither `--public` nor `--private` is given.
    pub visibility: Visibility,
    /// Remote that receives the push.
    pub remote_name: String,
    /// Environment variable holding the hosting credential.
    pub token_env: String,
    /// Commit message for the first commit of a repository.
    pub init_message: String,
    /// Commit message when the repository already has history.
    pub auto_message: String,
    /// Scratch directory for publish logs. Defaults to `$TMPDIR/repo-publish`.
    pub log_dir: Option<PathBuf>,
    /// Move the publish log into the repository metadata directory once it exists.
    pub log_in_git_dir: bool,
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            default_branch: "main".to_string(),
            visibility: Visibility::Public,
            remote_name: "origin".to_string(),
            token_env: "GITHUB_TOKEN".to_string(),
            init_message: "init commit".to_string(),
            auto_message: "auto commit".to_string(),
            log_dir: None,
            log_in_git_dir: true,
        }
    }
}

impl PublishConfig {
    /// Directory holding publish logs before (or instead of) relocation.
    #[must_use]
    pub fn scratch_dir(&self) -> PathBuf {
        self.log_dir
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join("repo-publish"))
    }
}

/// External tool paths.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ToolsConfig {
    /// Version control executable.
    pub git: PathBuf,
    /// Hosting client executable.
    pub gh: PathBuf,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            git: PathBuf::from("git"),
            gh: PathBuf::from("gh"),
        }
    }
}
