// repo-publish: publish a local project directory to GitHub
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Publish workflow controller.
//!
//! ```text
//! Start --> PathResolved --> ToolsVerified --> LogOpened --> RepoReady
//!       --> Clean | CommittedAfterConfirm | CancelledByUser (terminal)
//!       --> BranchNormalized --> CredentialChecked --> Pushed (terminal)
//!
//! any step --err--> Failed (terminal), exit code from PublishError
//! panic     ------> Failed, exit 1
//! ```
//!
//! Steps run strictly in order and each one is written to the publish log
//! before the next begins. The log is opened in the scratch directory
//! before anything else so that even a bad path leaves a trail; it moves
//! into the repository metadata directory once that exists.
//!
//! Every collaborator call is given the target directory explicitly.

pub mod outcome;
pub mod prompt;
pub mod request;

#[cfg(test)]
mod test_utils;
#[cfg(test)]
mod tests;

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::path::{Path, PathBuf};

use futures_util::FutureExt;
use secrecy::SecretString;
use tracing::{Level, debug};

use crate::config::types::PublishConfig;
use crate::core::process::builder::ProcessOutput;
use crate::error::{CommandError, EXIT_FAILURE, EXIT_SUCCESS, PublishError, Result, Step};
use crate::git::{RepositoryState, VersionControl};
use crate::hosting::{RemoteHosting, RepositorySpec, reports_existing_repository};
use crate::logging::{GIT_DIR_LOG_NAME, PublishLog};

pub use outcome::{FinalState, PublishOutcome, WorkflowState};
pub use prompt::{Prompt, StdioPrompt, TerminalPrompt};
pub use request::PublishRequest;

use request::{project_name, resolve_commit_message, resolve_target};

/// Drives one publish invocation against injected collaborators.
pub struct Publisher<'a> {
    vcs: &'a dyn VersionControl,
    hosting: &'a dyn RemoteHosting,
    prompt: &'a mut dyn Prompt,
    settings: &'a PublishConfig,
}

/// Log plus state history for one run.
struct Journal {
    log: PublishLog,
    transitions: Vec<WorkflowState>,
}

impl Journal {
    fn new(log: PublishLog) -> Self {
        Self {
            log,
            transitions: vec![WorkflowState::Start],
        }
    }

    fn advance(&mut self, to: WorkflowState) {
        let from = self
            .transitions
            .last()
            .copied()
            .unwrap_or(WorkflowState::Start);
        debug!(%from, %to, terminal = to.is_terminal(), "transition");
        self.transitions.push(to);
    }

    /// Log a finished collaborator command: command line, then its output.
    fn record(&mut self, output: &ProcessOutput) {
        self.log.info(format!("$ {}", output.command()));
        let text = output.combined();
        if !text.is_empty() {
            self.log.info(text);
        }
    }

    /// Record `output` and turn a non-zero exit into a [`CommandError`].
    fn check(&mut self, step: Step, output: ProcessOutput) -> Result<ProcessOutput> {
        self.record(&output);
        if output.success() {
            return Ok(output);
        }
        Err(PublishError::from(CommandError {
            step,
            command: output.command().to_string(),
            exit_code: output.exit_code(),
            output: output.combined(),
        })
        .into())
    }
}

impl<'a> Publisher<'a> {
    pub fn new(
        vcs: &'a dyn VersionControl,
        hosting: &'a dyn RemoteHosting,
        prompt: &'a mut dyn Prompt,
        settings: &'a PublishConfig,
    ) -> Self {
        Self {
            vcs,
            hosting,
            prompt,
            settings,
        }
    }

    /// Run the whole workflow. Never fails: every failure, including a
    /// panic inside a step, is classified into the outcome.
    pub async fn publish(&mut self, request: &PublishRequest) -> PublishOutcome {
        let primary = scratch_log_path(self.settings, &request.target_path);
        let mut journal = Journal::new(PublishLog::open_or_fallback(
            &primary,
            &self.settings.scratch_dir(),
        ));

        journal.log.info(format!(
            "repo-publish {} publishing {}",
            env!("CARGO_PKG_VERSION"),
            request.target_path.display()
        ));
        if request.dry_run {
            journal.log.info("dry run: nothing will be changed");
        }

        let result = AssertUnwindSafe(self.run(request, &mut journal))
            .catch_unwind()
            .await;

        let (final_state, exit_code, error) = match result {
            Ok(Ok(state)) => {
                let final_state = if state == WorkflowState::Planned {
                    FinalState::Planned
                } else {
                    FinalState::Pushed
                };
                (final_state, EXIT_SUCCESS, None)
            }
            Ok(Err(err)) => Self::report_error(&mut journal, &err),
            Err(panic) => {
                let message = panic_message(panic.as_ref());
                journal
                    .log
                    .error(format!("unexpected failure (panic): {message}"));
                journal.advance(WorkflowState::Failed);
                (FinalState::Failed, EXIT_FAILURE, Some(message))
            }
        };

        let log_path = journal.log.path().map(Path::to_path_buf);
        if let Some(path) = &log_path {
            journal.log.info(format!("log: {}", path.display()));
        }

        PublishOutcome {
            exit_code,
            final_state,
            log_path,
            transitions: journal.transitions,
            error,
        }
    }

    /// Log a failure with its hint and classify it.
    fn report_error(
        journal: &mut Journal,
        err: &anyhow::Error,
    ) -> (FinalState, i32, Option<String>) {
        let Some(publish_err) = err.downcast_ref::<PublishError>() else {
            journal.log.error(format!("unexpected failure: {err:?}"));
            journal.advance(WorkflowState::Failed);
            return (FinalState::Failed, EXIT_FAILURE, Some(format!("{err:#}")));
        };

        let final_state = FinalState::from_error(publish_err);
        if matches!(publish_err, PublishError::UserCancelled) {
            journal
                .log
                .warn("cancelled by user: nothing was committed or pushed");
            journal.advance(WorkflowState::CancelledByUser);
        } else {
            journal.log.error(publish_err.to_string());
            if let Some(hint) = publish_err.hint() {
                journal.log.error(format!("hint: {hint}"));
            }
            journal.advance(WorkflowState::Failed);
        }
        (
            final_state,
            publish_err.exit_code(),
            Some(publish_err.to_string()),
        )
    }

    async fn run(&mut self, request: &PublishRequest, journal: &mut Journal) -> Result<WorkflowState> {
        request.validate()?;

        let dir = resolve_target(&request.target_path)?;
        journal.log.info(format!("target: {}", dir.display()));
        journal.advance(WorkflowState::PathResolved);

        self.verify_tools(journal)?;
        journal.advance(WorkflowState::ToolsVerified);

        if let Some(path) = journal.log.path() {
            let line = format!("log opened at {}", path.display());
            journal.log.info(line);
        }
        journal.advance(WorkflowState::LogOpened);

        let initialized = self.ensure_repository(request, &dir, journal).await?;
        journal.advance(WorkflowState::RepoReady);

        let state = self.repository_state(request, &dir, initialized, journal).await?;
        let gate = self.commit_gate(request, &dir, &state, journal).await?;
        journal.advance(gate);

        self.normalize_branch(request, &dir, journal).await?;
        journal.advance(WorkflowState::BranchNormalized);

        let credential = self.check_credential(request, journal)?;
        journal.advance(WorkflowState::CredentialChecked);

        let done = self.create_and_push(request, &dir, credential, journal).await?;
        journal.advance(done);
        Ok(done)
    }

    fn verify_tools(&self, journal: &mut Journal) -> Result<()> {
        let mut missing = Vec::new();
        for (name, available) in [
            (self.vcs.tool_name(), self.vcs.is_available()),
            (self.hosting.tool_name(), self.hosting.is_available()),
        ] {
            if available {
                journal.log.info(format!("found {name}"));
            } else {
                missing.push(name.to_string());
            }
        }
        if missing.is_empty() {
            Ok(())
        } else {
            Err(PublishError::tool_missing(missing).into())
        }
    }

    /// Initialize the repository if needed. Returns true if it had to be.
    async fn ensure_repository(
        &self,
        request: &PublishRequest,
        dir: &Path,
        journal: &mut Journal,
    ) -> Result<bool> {
        if self.vcs.is_repository(dir).await? {
            journal.log.info("repository found");
            self.move_log_into_repository(request, dir, journal).await;
            return Ok(false);
        }

        if request.dry_run {
            journal.log.info(format!(
                "would initialize a repository with branch {}",
                self.settings.default_branch
            ));
            return Ok(true);
        }

        journal.log.info("no repository, initializing");
        let output = self.vcs.init(dir).await?;
        journal.check(Step::Init, output)?;

        // A fresh repository has no commits to lose; a failure here only
        // leaves the tool's own default branch name.
        let head = self.vcs.set_head(dir, &self.settings.default_branch).await?;
        journal.record(&head);
        if !head.success() {
            journal.log.warn(format!(
                "could not set the initial branch to {} (exit code {})",
                self.settings.default_branch,
                head.exit_code()
            ));
        }

        self.move_log_into_repository(request, dir, journal).await;
        Ok(true)
    }

    async fn move_log_into_repository(
        &self,
        request: &PublishRequest,
        dir: &Path,
        journal: &mut Journal,
    ) {
        if request.dry_run || !self.settings.log_in_git_dir || journal.log.path().is_none() {
            return;
        }
        let git_dir = match self.vcs.git_dir(dir).await {
            Ok(Some(path)) => path,
            Ok(None) => dir.join(".git"),
            Err(e) => {
                debug!("git dir lookup failed: {e:#}");
                dir.join(".git")
            }
        };
        let target = git_dir.join(GIT_DIR_LOG_NAME);
        match journal.log.relocate(&target) {
            Ok(()) => journal.log.info(format!("log moved to {}", target.display())),
            Err(e) => journal
                .log
                .warn(format!("log stays in scratch directory: {e:#}")),
        }
    }

    /// Query status and history. In a dry run on an unversioned directory,
    /// every entry of the directory counts as a change.
    async fn repository_state(
        &self,
        request: &PublishRequest,
        dir: &Path,
        initialized: bool,
        journal: &mut Journal,
    ) -> Result<RepositoryState> {
        if request.dry_run && initialized {
            let mut entries: Vec<String> = std::fs::read_dir(dir)?
                .filter_map(std::result::Result::ok)
                .map(|e| e.file_name().to_string_lossy().into_owned())
                .collect();
            entries.sort();
            return Ok(RepositoryState {
                is_version_controlled: false,
                has_uncommitted_changes: !entries.is_empty(),
                changed_paths: entries,
                has_any_commit: false,
            });
        }

        let output = self.vcs.status(dir).await?;
        let output = journal.check(Step::Status, output)?;
        let has_any_commit = self.vcs.has_head(dir).await?;
        Ok(RepositoryState::from_porcelain(
            true,
            has_any_commit,
            output.stdout(),
        ))
    }

    /// Returns the gate's state: clean, committed or (dry run) planned.
    async fn commit_gate(
        &mut self,
        request: &PublishRequest,
        dir: &Path,
        state: &RepositoryState,
        journal: &mut Journal,
    ) -> Result<WorkflowState> {
        if !state.has_uncommitted_changes {
            journal.log.info("clean, nothing to commit");
            return Ok(WorkflowState::Clean);
        }

        let count = state.changed_paths.len();
        let prompting = !request.dry_run && !request.auto_confirm;
        // The prompt lists the paths itself; keep them in the file only.
        let level = if prompting { Level::DEBUG } else { Level::INFO };
        journal.log.info(format!("{count} changed path(s):"));
        for path in &state.changed_paths {
            journal.log.append(level, format!("  {path}"));
        }

        if request.dry_run {
            let message = resolve_commit_message(
                request.commit_message.as_deref(),
                state.has_any_commit,
                self.settings,
            );
            journal
                .log
                .info(format!("would stage all changes and commit \"{message}\""));
            return Ok(WorkflowState::CommitPlanned);
        }

        let confirmed = request.auto_confirm
            || self.prompt.confirm(
                &format!("Commit these {count} change(s)?"),
                &state.changed_paths,
            );
        if !confirmed {
            return Err(PublishError::UserCancelled.into());
        }
        journal.log.info(if request.auto_confirm {
            "commit confirmed (--yes)"
        } else {
            "commit confirmed"
        });

        let input = match request.commit_message.as_deref() {
            Some(message) => message.to_string(),
            None if request.auto_confirm => String::new(),
            None => self
                .prompt
                .read_line("Commit message (blank for default): "),
        };
        let message = resolve_commit_message(Some(&input), state.has_any_commit, self.settings);

        let output = self.vcs.add_all(dir).await?;
        journal.check(Step::Stage, output)?;
        journal.log.info(format!("committing \"{message}\""));
        let output = self.vcs.commit(dir, &message).await?;
        journal.check(Step::Commit, output)?;

        Ok(WorkflowState::CommittedAfterConfirm)
    }

    /// A failed rename never blocks publication.
    async fn normalize_branch(
        &self,
        request: &PublishRequest,
        dir: &Path,
        journal: &mut Journal,
    ) -> Result<()> {
        let branch = &self.settings.default_branch;
        if request.dry_run {
            journal.log.info(format!("would rename the current branch to {branch}"));
            return Ok(());
        }

        let output = self.vcs.rename_branch(dir, branch).await?;
        journal.record(&output);
        if !output.success() {
            journal.log.warn(format!(
                "branch rename to {branch} failed (exit code {}), continuing",
                output.exit_code()
            ));
        }
        Ok(())
    }

    fn check_credential<'r>(
        &self,
        request: &'r PublishRequest,
        journal: &mut Journal,
    ) -> Result<&'r SecretString> {
        let Some(credential) = request.credential() else {
            return Err(PublishError::missing_credential(&self.settings.token_env).into());
        };
        journal.log.info(format!(
            "credential found in {}",
            self.settings.token_env
        ));
        Ok(credential)
    }

    async fn create_and_push(
        &self,
        request: &PublishRequest,
        dir: &Path,
        credential: &SecretString,
        journal: &mut Journal,
    ) -> Result<WorkflowState> {
        let name = request.repo_name(dir)?;
        let remote = &self.settings.remote_name;
        let branch = &self.settings.default_branch;

        let output = if request.skip_create {
            let owner = request
                .owner()
                .ok_or_else(|| PublishError::invalid_request("--skip-create needs --owner"))?;
            let url = self.hosting.remote_url(owner, &name);
            if request.dry_run {
                journal
                    .log
                    .info(format!("would push {branch} to {url} as {remote}"));
                return Ok(WorkflowState::Planned);
            }
            self.push_to_existing(dir, &url, credential, journal).await?
        } else {
            let spec = RepositorySpec {
                name,
                owner: request.owner().map(str::to_string),
                visibility: request.visibility,
                description: request.description.clone(),
                remote: remote.clone(),
            };
            if request.dry_run {
                journal.log.info(format!(
                    "would create {} repository {} and push {branch}",
                    spec.visibility,
                    spec.full_name()
                ));
                return Ok(WorkflowState::Planned);
            }

            journal.log.info(format!(
                "creating {} repository {} and pushing",
                spec.visibility,
                spec.full_name()
            ));
            let created = self.hosting.create(dir, &spec, credential).await?;
            if reports_existing_repository(&created) {
                journal.record(&created);
                journal.log.warn(format!(
                    "{} or its remote already exists, reusing it",
                    spec.full_name()
                ));
                let owner = match spec.owner {
                    Some(owner) => owner,
                    None => self.credential_login(credential, journal).await?,
                };
                let url = self.hosting.remote_url(&owner, &spec.name);
                self.push_to_existing(dir, &url, credential, journal).await?
            } else {
                created
            }
        };

        journal.check(Step::Push, output)?;
        journal.log.info("success");
        Ok(WorkflowState::Pushed)
    }

    /// Point the remote at `url` and push the default branch there.
    async fn push_to_existing(
        &self,
        dir: &Path,
        url: &str,
        credential: &SecretString,
        journal: &mut Journal,
    ) -> Result<ProcessOutput> {
        let remote = &self.settings.remote_name;
        let branch = &self.settings.default_branch;
        journal.log.info(format!("pointing {remote} at {url}"));
        let output = self.vcs.set_remote(dir, remote, url).await?;
        journal.check(Step::Remote, output)?;
        journal.log.info(format!("pushing {branch} to {remote}"));
        self.hosting.push(dir, remote, branch, credential).await
    }

    async fn credential_login(
        &self,
        credential: &SecretString,
        journal: &mut Journal,
    ) -> Result<String> {
        let output = self.hosting.current_login(credential).await?;
        let output = journal.check(Step::Push, output)?;
        let login = output.stdout().trim();
        if login.is_empty() {
            return Err(PublishError::invalid_request(
                "could not tell which account the credential belongs to, pass --owner",
            )
            .into());
        }
        Ok(login.to_string())
    }
}

/// Log path the controller opens first for `target`, before any step runs.
#[must_use]
pub fn scratch_log_path(settings: &PublishConfig, target: &Path) -> PathBuf {
    settings
        .scratch_dir()
        .join(format!("{}.log", project_name(target)))
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    panic
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| panic.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string())
}
