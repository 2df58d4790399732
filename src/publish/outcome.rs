// repo-publish: publish a local project directory to GitHub
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Workflow states and the outcome of one invocation.

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

use crate::error::{EXIT_SUCCESS, PublishError};

/// States of the publish workflow, in the order they are reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum WorkflowState {
    Start,
    PathResolved,
    ToolsVerified,
    LogOpened,
    RepoReady,
    Clean,
    CommittedAfterConfirm,
    /// Dry run: changes were listed but not committed.
    CommitPlanned,
    CancelledByUser,
    BranchNormalized,
    CredentialChecked,
    Pushed,
    /// Dry run reached the end.
    Planned,
    Failed,
}

impl WorkflowState {
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(
            self,
            Self::CancelledByUser | Self::Pushed | Self::Planned | Self::Failed
        )
    }
}

impl fmt::Display for WorkflowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// How an invocation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FinalState {
    Pushed,
    /// Dry run completed; nothing was changed.
    Planned,
    CancelledByUser,
    MissingCredential,
    ToolMissing,
    PathInvalid,
    CommandFailed,
    /// Unexpected failure, including panics and invalid requests.
    Failed,
}

impl FinalState {
    /// Final state for a classified failure.
    #[must_use]
    pub const fn from_error(err: &PublishError) -> Self {
        match err {
            PublishError::UserCancelled => Self::CancelledByUser,
            PublishError::MissingCredential(_) => Self::MissingCredential,
            PublishError::ToolMissing(_) => Self::ToolMissing,
            PublishError::Path(_) => Self::PathInvalid,
            PublishError::Command(_) => Self::CommandFailed,
            _ => Self::Failed,
        }
    }
}

/// Result of [`Publisher::publish`](super::Publisher::publish).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishOutcome {
    pub exit_code: i32,
    pub final_state: FinalState,
    /// Where the publish log ended up; `None` only if it fell back to stderr.
    pub log_path: Option<PathBuf>,
    /// Every state reached, in order.
    pub transitions: Vec<WorkflowState>,
    /// Display text of the failure, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PublishOutcome {
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.exit_code == EXIT_SUCCESS
    }
}
