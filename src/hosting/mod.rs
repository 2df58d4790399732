// repo-publish: publish a local project directory to GitHub
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Remote hosting collaborator.
//!
//! ```text
//! RemoteHosting (trait)
//!        |
//!        v
//!      GhCli
//!   create --> gh repo create [owner/]name --public|--private
//!                 --source DIR --remote R --push [--description D]
//!   push   --> git -c credential.helper=
//!                  -c credential.helper=!gh auth git-credential
//!                  push -u R BRANCH
//!   login  --> gh api user --jq .login
//!
//! child env: GH_TOKEN=<secret>  GH_PROMPT_DISABLED=1  GIT_TERMINAL_PROMPT=0
//! ```
//!
//! The credential is exposed only when it is placed into the child's
//! environment, and any echo of it in tool output is masked.

use std::path::{Path, PathBuf};

use futures_util::future::BoxFuture;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;

use crate::config::types::Visibility;
use crate::core::process::builder::{ProcessBuilder, ProcessFlags, ProcessOutput};
use crate::error::Result;

/// Remote repository to create.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepositorySpec {
    pub name: String,
    /// Account or organization; `None` means the credential's own account.
    pub owner: Option<String>,
    pub visibility: Visibility,
    pub description: Option<String>,
    /// Local remote name that will point at the new repository.
    pub remote: String,
}

impl RepositorySpec {
    /// `owner/name`, or just `name` when no owner is set.
    #[must_use]
    pub fn full_name(&self) -> String {
        self.owner
            .as_deref()
            .map_or_else(|| self.name.clone(), |owner| format!("{owner}/{}", self.name))
    }
}

/// Operations the publish workflow needs from a hosting provider client.
pub trait RemoteHosting: Send + Sync {
    fn tool_name(&self) -> &str;

    fn is_available(&self) -> bool;

    /// Create the remote repository from `dir` and push its current branch.
    fn create<'a>(
        &'a self,
        dir: &'a Path,
        spec: &'a RepositorySpec,
        credential: &'a SecretString,
    ) -> BoxFuture<'a, Result<ProcessOutput>>;

    /// Push `branch` to an existing `remote` and set it as upstream.
    fn push<'a>(
        &'a self,
        dir: &'a Path,
        remote: &'a str,
        branch: &'a str,
        credential: &'a SecretString,
    ) -> BoxFuture<'a, Result<ProcessOutput>>;

    /// Account the credential belongs to; the login is the trimmed stdout.
    fn current_login<'a>(&'a self, credential: &'a SecretString)
    -> BoxFuture<'a, Result<ProcessOutput>>;

    /// Clone URL of an existing repository.
    fn remote_url(&self, owner: &str, name: &str) -> String;
}

/// Whether a failed create only hit a repository or remote that is
/// already there, so the existing one can be pushed to instead.
///
/// ```text
/// GraphQL: Name already exists on this account (createRepository)
/// error: remote origin already exists.
/// X Unable to add remote "origin"
/// ```
#[must_use]
pub fn reports_existing_repository(output: &ProcessOutput) -> bool {
    if output.success() {
        return false;
    }
    let text = output.combined().to_lowercase();
    text.contains("already exists") || text.contains("unable to add remote")
}

/// [`RemoteHosting`] over the GitHub CLI.
#[derive(Debug, Clone)]
pub struct GhCli {
    program: PathBuf,
    git: PathBuf,
}

impl Default for GhCli {
    fn default() -> Self {
        Self::new("gh", "git")
    }
}

impl GhCli {
    pub fn new(program: impl Into<PathBuf>, git: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            git: git.into(),
        }
    }

    /// Arguments for `gh repo create`.
    #[must_use]
    pub fn create_args(dir: &Path, spec: &RepositorySpec) -> Vec<String> {
        let mut args = vec![
            "repo".to_string(),
            "create".to_string(),
            spec.full_name(),
            spec.visibility.as_flag().to_string(),
            "--source".to_string(),
            dir.display().to_string(),
            "--remote".to_string(),
            spec.remote.clone(),
            "--push".to_string(),
        ];
        if let Some(description) = spec.description.as_deref().filter(|d| !d.trim().is_empty()) {
            args.push("--description".to_string());
            args.push(description.to_string());
        }
        args
    }

    /// Arguments for a push that authenticates through `gh`.
    ///
    /// The empty helper clears any helpers configured globally so the
    /// operator is never prompted.
    #[must_use]
    pub fn push_args(&self, remote: &str, branch: &str) -> Vec<String> {
        vec![
            "-c".to_string(),
            "credential.helper=".to_string(),
            "-c".to_string(),
            format!("credential.helper=!{} auth git-credential", self.program.display()),
            "push".to_string(),
            "-u".to_string(),
            remote.to_string(),
            branch.to_string(),
        ]
    }

    fn with_credential(builder: ProcessBuilder, credential: &SecretString) -> ProcessBuilder {
        builder
            .env_var("GH_TOKEN", credential.expose_secret())
            .env_var("GH_PROMPT_DISABLED", "1")
            .env_var("GIT_TERMINAL_PROMPT", "0")
            .env_var("GCM_INTERACTIVE", "never")
            .capture_output()
            .flag(ProcessFlags::ALLOW_FAILURE)
    }
}

impl RemoteHosting for GhCli {
    fn tool_name(&self) -> &str {
        self.program.to_str().unwrap_or("gh")
    }

    fn is_available(&self) -> bool {
        self.program.to_str().is_some_and(ProcessBuilder::exists)
    }

    fn create<'a>(
        &'a self,
        dir: &'a Path,
        spec: &'a RepositorySpec,
        credential: &'a SecretString,
    ) -> BoxFuture<'a, Result<ProcessOutput>> {
        Box::pin(async move {
            let builder = ProcessBuilder::new(&self.program)
                .args(Self::create_args(dir, spec))
                .cwd(dir)
                .name("gh");
            let output = Self::with_credential(builder, credential).run().await?;
            Ok(redact(output, credential))
        })
    }

    fn push<'a>(
        &'a self,
        dir: &'a Path,
        remote: &'a str,
        branch: &'a str,
        credential: &'a SecretString,
    ) -> BoxFuture<'a, Result<ProcessOutput>> {
        Box::pin(async move {
            let builder = ProcessBuilder::new(&self.git)
                .args(self.push_args(remote, branch))
                .cwd(dir)
                .name("git");
            let output = Self::with_credential(builder, credential).run().await?;
            Ok(redact(output, credential))
        })
    }

    fn current_login<'a>(
        &'a self,
        credential: &'a SecretString,
    ) -> BoxFuture<'a, Result<ProcessOutput>> {
        Box::pin(async move {
            let builder = ProcessBuilder::new(&self.program)
                .args(["api", "user", "--jq", ".login"])
                .name("gh");
            let output = Self::with_credential(builder, credential).run().await?;
            Ok(redact(output, credential))
        })
    }

    fn remote_url(&self, owner: &str, name: &str) -> String {
        format!("https://github.com/{owner}/{name}.git")
    }
}

/// Mask any occurrence of the credential in captured output.
#[must_use]
pub fn redact(output: ProcessOutput, credential: &SecretString) -> ProcessOutput {
    let secret = credential.expose_secret();
    if secret.is_empty() {
        return output;
    }
    let mask = |text: &str| text.replace(secret, "****");
    ProcessOutput::new(
        output.command(),
        output.exit_code(),
        mask(output.stdout()),
        mask(output.stderr()),
    )
}
