// repo-publish: publish a local project directory to GitHub
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Publish request and the small rules that resolve it.

use std::path::{Path, PathBuf};

use anyhow::Context;
use bon::Builder;
use regex::Regex;
use secrecy::{ExposeSecret, SecretString};

use crate::config::types::{PublishConfig, Visibility};
use crate::error::{PublishError, PublishResult, Result};

/// One "publish this directory" invocation. Immutable once built.
#[derive(Debug, Builder)]
pub struct PublishRequest {
    /// Directory to publish, as given by the operator.
    #[builder(into)]
    pub target_path: PathBuf,
    #[builder(default)]
    pub visibility: Visibility,
    /// Hosting credential, read from the environment by the caller.
    pub credential: Option<SecretString>,
    /// Push to an existing repository instead of creating one.
    #[builder(default)]
    pub skip_create: bool,
    /// Account or organization that owns the remote repository.
    #[builder(into)]
    pub owner: Option<String>,
    /// Remote repository name; defaults to the sanitized directory name.
    #[builder(into)]
    pub name: Option<String>,
    #[builder(into)]
    pub description: Option<String>,
    /// Operator-supplied commit message.
    #[builder(into)]
    pub commit_message: Option<String>,
    /// Commit outstanding changes without asking.
    #[builder(default)]
    pub auto_confirm: bool,
    /// Read-only steps only; log the plan.
    #[builder(default)]
    pub dry_run: bool,
}

impl PublishRequest {
    /// Reject combinations that cannot be published.
    ///
    /// # Errors
    ///
    /// Returns `PublishError::InvalidRequest` when `skip_create` has no owner
    /// or the explicit name is not a valid repository name.
    pub fn validate(&self) -> PublishResult<()> {
        if self.skip_create && self.owner().is_none() {
            return Err(PublishError::invalid_request(
                "--skip-create needs --owner to build the remote URL",
            ));
        }
        if let Some(name) = self.name.as_deref()
            && !is_valid_repo_name(name)
        {
            return Err(PublishError::invalid_request(format!(
                "'{name}' is not a valid repository name (allowed: A-Z a-z 0-9 . _ -)"
            )));
        }
        Ok(())
    }

    /// Owner, ignoring blank input.
    #[must_use]
    pub fn owner(&self) -> Option<&str> {
        self.owner.as_deref().map(str::trim).filter(|o| !o.is_empty())
    }

    /// Credential, ignoring an empty or whitespace-only value.
    #[must_use]
    pub fn credential(&self) -> Option<&SecretString> {
        self.credential
            .as_ref()
            .filter(|c| !c.expose_secret().trim().is_empty())
    }

    /// Remote repository name for the resolved target directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the name pattern fails to compile.
    pub fn repo_name(&self, target: &Path) -> Result<String> {
        match self.name.as_deref() {
            Some(name) => Ok(name.to_string()),
            None => sanitize_repo_name(&dir_name(target)),
        }
    }
}

/// Map a directory name onto GitHub's allowed repository name characters.
///
/// Runs of other characters become a single `-`; an empty result becomes
/// `project`.
///
/// # Errors
///
/// Returns an error if the name pattern fails to compile.
pub fn sanitize_repo_name(raw: &str) -> Result<String> {
    let regex =
        Regex::new(r"[^A-Za-z0-9._-]+").context("failed to compile repository name regex")?;

    let replaced = regex.replace_all(raw.trim(), "-");
    let trimmed = replaced.trim_matches('-');
    if trimmed.is_empty() || trimmed.chars().all(|c| c == '.') {
        Ok("project".to_string())
    } else {
        Ok(trimmed.to_string())
    }
}

/// Whether `name` can be used as-is for a remote repository.
#[must_use]
pub fn is_valid_repo_name(name: &str) -> bool {
    !name.is_empty()
        && !name.chars().all(|c| c == '.')
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
}

/// Commit message for the commit gate.
///
/// Blank (including whitespace-only) input falls back to the configured
/// default: `auto_message` once the repository has history, `init_message`
/// before that. Non-blank input is used trimmed.
#[must_use]
pub fn resolve_commit_message(
    input: Option<&str>,
    has_any_commit: bool,
    settings: &PublishConfig,
) -> String {
    match input.map(str::trim).filter(|m| !m.is_empty()) {
        Some(message) => message.to_string(),
        None if has_any_commit => settings.auto_message.clone(),
        None => settings.init_message.clone(),
    }
}

/// Resolve the target to an absolute, existing directory.
///
/// # Errors
///
/// Returns `PublishError::Path` if the path does not exist, cannot be made
/// absolute, or is not a directory.
pub fn resolve_target(path: &Path) -> PublishResult<PathBuf> {
    let display = path.display().to_string();
    let resolved = path
        .canonicalize()
        .map_err(|e| PublishError::path(&display, e.to_string()))?;
    if !resolved.is_dir() {
        return Err(PublishError::path(display, "not a directory"));
    }
    Ok(resolved)
}

/// Name used to key the scratch log, usable even when the path is invalid.
#[must_use]
pub fn project_name(path: &Path) -> String {
    let absolute = path
        .canonicalize()
        .or_else(|_| std::path::absolute(path))
        .unwrap_or_else(|_| path.to_path_buf());
    sanitize_repo_name(&dir_name(&absolute)).unwrap_or_else(|_| "project".to_string())
}

fn dir_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
