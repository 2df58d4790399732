// repo-publish: publish a local project directory to GitHub
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Error handling module.
//!
//! ```text
//!              PublishError (~24 bytes)
//!                     |
//!   +------+------+---+----+------+------+------+
//!   |      |      |        |      |      |      |
//!   v      v      v        v      v      v      v
//! Path  Tool   Command  Missing  User  Proc   Cfg/Io
//! Box   Box    Box      Cred     Canc  Box    Box
//!
//! Exit codes:
//!   0 ok   1 unexpected   2 cancelled   3 credential
//!   4 tool missing   5 path   6 vcs command   push: passthrough
//! ```

use std::fmt;

use thiserror::Error;

/// Convenience alias for `anyhow::Result`.
pub type Result<T> = anyhow::Result<T>;

/// Result type using [`PublishError`].
pub type PublishResult<T> = std::result::Result<T, PublishError>;

pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILURE: i32 = 1;
pub const EXIT_CANCELLED: i32 = 2;
pub const EXIT_MISSING_CREDENTIAL: i32 = 3;
pub const EXIT_TOOL_MISSING: i32 = 4;
pub const EXIT_PATH: i32 = 5;
pub const EXIT_COMMAND: i32 = 6;

/// Top-level publish error type.
///
/// All payloads are boxed to keep this enum at ~24 bytes on the stack.
#[derive(Debug, Error)]
pub enum PublishError {
    /// Target path does not exist or cannot be resolved.
    #[error("path error: {0}")]
    Path(Box<PathError>),

    /// The request is inconsistent (e.g. `--skip-create` without an owner).
    #[error("invalid request: {0}")]
    InvalidRequest(Box<str>),

    /// One or more collaborator executables are not installed.
    #[error("required tool not found: {}", .0.join(", "))]
    ToolMissing(Box<[String]>),

    /// A collaborator subprocess returned non-zero.
    #[error(transparent)]
    Command(Box<CommandError>),

    /// The hosting credential is not provisioned.
    #[error("no credential found in environment variable {0}")]
    MissingCredential(Box<str>),

    /// The operator declined the commit gate.
    #[error("cancelled by user at the commit confirmation")]
    UserCancelled,

    /// Process execution error.
    #[error("process error: {0}")]
    Process(Box<ProcessError>),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(Box<ConfigError>),

    /// I/O error.
    #[error("io error: {0}")]
    Io(Box<std::io::Error>),
}

impl PublishError {
    /// Create a [`PublishError::Path`].
    pub fn path(path: impl Into<String>, reason: impl Into<String>) -> Self {
        PathError {
            path: path.into(),
            reason: reason.into(),
        }
        .into()
    }

    /// Create a [`PublishError::InvalidRequest`].
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into().into_boxed_str())
    }

    /// Create a [`PublishError::ToolMissing`] listing the absent tools.
    #[must_use]
    pub fn tool_missing(tools: Vec<String>) -> Self {
        Self::ToolMissing(tools.into_boxed_slice())
    }

    /// Create a [`PublishError::MissingCredential`] for the given variable.
    pub fn missing_credential(var: impl Into<String>) -> Self {
        Self::MissingCredential(var.into().into_boxed_str())
    }

    /// Exit code reported for this error.
    ///
    /// Push failures pass the hosting tool's own code through unchanged.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Path(_) => EXIT_PATH,
            Self::ToolMissing(_) => EXIT_TOOL_MISSING,
            Self::Command(err) if err.step == Step::Push => {
                if err.exit_code > 0 {
                    err.exit_code
                } else {
                    EXIT_FAILURE
                }
            }
            Self::Command(_) => EXIT_COMMAND,
            Self::MissingCredential(_) => EXIT_MISSING_CREDENTIAL,
            Self::UserCancelled => EXIT_CANCELLED,
            Self::InvalidRequest(_)
            | Self::Process(_)
            | Self::Config(_)
            | Self::Io(_) => EXIT_FAILURE,
        }
    }

    /// Remediation hint shown to the operator, if one applies.
    #[must_use]
    pub fn hint(&self) -> Option<String> {
        match self {
            Self::Path(_) => Some("pass an existing directory as the target path".to_string()),
            Self::ToolMissing(tools) => Some(format!(
                "install {} and make sure it is on PATH (or set [tools] in the config)",
                tools.join(" and ")
            )),
            Self::Command(err) => Some(err.hint().to_string()),
            Self::MissingCredential(var) => Some(format!(
                "create a personal access token with the `repo` scope and export it, e.g. `export {var}=<token>`"
            )),
            _ => None,
        }
    }
}

// --- From implementations for boxing ---

/// Macro to generate `From` implementations that box the source error.
macro_rules! impl_from_boxed {
    ($($error:ty => $variant:ident),+ $(,)?) => {
        $(
            impl From<$error> for PublishError {
                fn from(err: $error) -> Self {
                    PublishError::$variant(Box::new(err))
                }
            }
        )+
    };
}

impl_from_boxed! {
    PathError => Path,
    CommandError => Command,
    ProcessError => Process,
    ConfigError => Config,
    std::io::Error => Io,
}

// --- Path Errors ---

/// Unresolvable target path.
#[derive(Debug, Error)]
#[error("{path}: {reason}")]
pub struct PathError {
    pub path: String,
    pub reason: String,
}

// --- Command Errors ---

/// Workflow step a collaborator command belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Init,
    Status,
    Stage,
    Commit,
    Remote,
    Push,
}

impl Step {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::Status => "status",
            Self::Stage => "add",
            Self::Commit => "commit",
            Self::Remote => "remote",
            Self::Push => "push",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A collaborator subprocess exited with a non-zero code.
#[derive(Debug, Error)]
#[error("{step} failed: `{command}` exited with code {exit_code}")]
pub struct CommandError {
    pub step: Step,
    pub command: String,
    pub exit_code: i32,
    pub output: String,
}

impl CommandError {
    /// Likely cause of the failure for this step.
    #[must_use]
    pub const fn hint(&self) -> &'static str {
        match self.step {
            Step::Init => "check that the target directory is writable",
            Step::Status => "check that the repository metadata is readable and not corrupted",
            Step::Stage => {
                "check file permissions and that no other git process holds the index lock"
            }
            Step::Commit => {
                "check that user.name and user.email are configured (git config --global) \
                 and that the repository is writable"
            }
            Step::Remote => "check the remote name and owner/repository URL",
            Step::Push => {
                "check that the credential has the `repo` scope and that the repository \
                 name is not already taken"
            }
        }
    }
}

// --- Config Errors ---

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Invalid configuration value.
    #[error("invalid value for '{key}' in section '[{section}]': {message}")]
    InvalidValue {
        section: String,
        key: String,
        message: String,
    },
}

// --- Process Errors ---

/// Process execution errors.
#[derive(Debug, Error)]
pub enum ProcessError {
    /// Failed to spawn process.
    #[error("failed to spawn process '{command}': {source}")]
    SpawnFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },
}
