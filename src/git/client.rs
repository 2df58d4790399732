// repo-publish: publish a local project directory to GitHub
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! `VersionControl` trait and its git CLI implementation.

use std::path::{Path, PathBuf};

use futures_util::future::BoxFuture;
use tracing::debug;

use crate::core::process::builder::{ProcessBuilder, ProcessFlags, ProcessOutput};
use crate::error::Result;

/// Operations the publish workflow needs from a version control tool.
///
/// `Err` means the tool could not be run at all. A command that ran and
/// failed is reported through [`ProcessOutput::exit_code`].
pub trait VersionControl: Send + Sync {
    /// Executable name, for logs and tool-missing reports.
    fn tool_name(&self) -> &str;

    /// Whether the executable can be found.
    fn is_available(&self) -> bool;

    /// Whether `dir` is itself the top level of a repository.
    fn is_repository<'a>(&'a self, dir: &'a Path) -> BoxFuture<'a, Result<bool>>;

    fn init<'a>(&'a self, dir: &'a Path) -> BoxFuture<'a, Result<ProcessOutput>>;

    /// Point HEAD at `refs/heads/<branch>` (unborn branch in a fresh repository).
    fn set_head<'a>(&'a self, dir: &'a Path, branch: &'a str)
    -> BoxFuture<'a, Result<ProcessOutput>>;

    /// Absolute path of the repository's metadata directory.
    ///
    /// Not always `<dir>/.git`: in a worktree or submodule `.git` is a file
    /// pointing elsewhere. `None` when the tool cannot tell.
    fn git_dir<'a>(&'a self, dir: &'a Path) -> BoxFuture<'a, Result<Option<PathBuf>>>;

    /// Whether the repository has at least one commit.
    fn has_head<'a>(&'a self, dir: &'a Path) -> BoxFuture<'a, Result<bool>>;

    /// Working tree status in porcelain format.
    fn status<'a>(&'a self, dir: &'a Path) -> BoxFuture<'a, Result<ProcessOutput>>;

    fn add_all<'a>(&'a self, dir: &'a Path) -> BoxFuture<'a, Result<ProcessOutput>>;

    fn commit<'a>(&'a self, dir: &'a Path, message: &'a str)
    -> BoxFuture<'a, Result<ProcessOutput>>;

    /// Rename the current branch, replacing any branch of that name.
    fn rename_branch<'a>(
        &'a self,
        dir: &'a Path,
        branch: &'a str,
    ) -> BoxFuture<'a, Result<ProcessOutput>>;

    /// Add `remote` with `url`, or update its URL if it already exists.
    fn set_remote<'a>(
        &'a self,
        dir: &'a Path,
        remote: &'a str,
        url: &'a str,
    ) -> BoxFuture<'a, Result<ProcessOutput>>;
}

/// [`VersionControl`] over the `git` executable.
#[derive(Debug, Clone)]
pub struct GitCli {
    program: PathBuf,
}

impl Default for GitCli {
    fn default() -> Self {
        Self::new("git")
    }
}

impl GitCli {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Git command with the standard non-interactive environment.
    /// ALWAYS sets `GCM_INTERACTIVE=never` and `GIT_TERMINAL_PROMPT=0`.
    fn command<I, S>(&self, dir: &Path, args: I) -> ProcessBuilder
    where
        I: IntoIterator<Item = S>,
        S: AsRef<std::ffi::OsStr>,
    {
        ProcessBuilder::new(&self.program)
            .arg("-c")
            .arg("core.quotepath=false")
            .args(args)
            .cwd(dir)
            .env_var("GCM_INTERACTIVE", "never")
            .env_var("GIT_TERMINAL_PROMPT", "0")
            .name("git")
            .capture_output()
            .flag(ProcessFlags::ALLOW_FAILURE)
    }

    async fn remote_exists(&self, dir: &Path, remote: &str) -> Result<bool> {
        let output = self.command(dir, ["remote"]).run().await?;
        Ok(output.success() && output.stdout().lines().any(|l| l.trim() == remote))
    }

    async fn toplevel_matches(&self, dir: &Path) -> Result<bool> {
        let output = self
            .command(dir, ["rev-parse", "--show-toplevel"])
            .run()
            .await?;
        if !output.success() {
            return Ok(false);
        }

        let toplevel = PathBuf::from(output.stdout().trim());
        let same = match (toplevel.canonicalize(), dir.canonicalize()) {
            (Ok(a), Ok(b)) => a == b,
            _ => toplevel == dir,
        };
        if !same {
            debug!(dir = %dir.display(), toplevel = %toplevel.display(), "nested in another repository");
        }
        Ok(same)
    }
}

impl VersionControl for GitCli {
    fn tool_name(&self) -> &str {
        self.program.to_str().unwrap_or("git")
    }

    fn is_available(&self) -> bool {
        self.program.to_str().is_some_and(ProcessBuilder::exists)
    }

    fn is_repository<'a>(&'a self, dir: &'a Path) -> BoxFuture<'a, Result<bool>> {
        Box::pin(self.toplevel_matches(dir))
    }

    fn init<'a>(&'a self, dir: &'a Path) -> BoxFuture<'a, Result<ProcessOutput>> {
        Box::pin(self.command(dir, ["init"]).run())
    }

    fn set_head<'a>(
        &'a self,
        dir: &'a Path,
        branch: &'a str,
    ) -> BoxFuture<'a, Result<ProcessOutput>> {
        let reference = format!("refs/heads/{branch}");
        Box::pin(
            self.command(dir, ["symbolic-ref", "HEAD", reference.as_str()])
                .run(),
        )
    }

    fn git_dir<'a>(&'a self, dir: &'a Path) -> BoxFuture<'a, Result<Option<PathBuf>>> {
        Box::pin(async move {
            let output = self
                .command(dir, ["rev-parse", "--absolute-git-dir"])
                .run()
                .await?;
            let path = output.stdout().trim();
            Ok((output.success() && !path.is_empty()).then(|| PathBuf::from(path)))
        })
    }

    fn has_head<'a>(&'a self, dir: &'a Path) -> BoxFuture<'a, Result<bool>> {
        Box::pin(async move {
            let output = self
                .command(dir, ["rev-parse", "--verify", "--quiet", "HEAD"])
                .run()
                .await?;
            Ok(output.success())
        })
    }

    fn status<'a>(&'a self, dir: &'a Path) -> BoxFuture<'a, Result<ProcessOutput>> {
        Box::pin(self.command(dir, ["status", "--porcelain"]).run())
    }

    fn add_all<'a>(&'a self, dir: &'a Path) -> BoxFuture<'a, Result<ProcessOutput>> {
        Box::pin(self.command(dir, ["add", "-A"]).run())
    }

    fn commit<'a>(
        &'a self,
        dir: &'a Path,
        message: &'a str,
    ) -> BoxFuture<'a, Result<ProcessOutput>> {
        Box::pin(self.command(dir, ["commit", "-m", message]).run())
    }

    fn rename_branch<'a>(
        &'a self,
        dir: &'a Path,
        branch: &'a str,
    ) -> BoxFuture<'a, Result<ProcessOutput>> {
        Box::pin(self.command(dir, ["branch", "-M", branch]).run())
    }

    fn set_remote<'a>(
        &'a self,
        dir: &'a Path,
        remote: &'a str,
        url: &'a str,
    ) -> BoxFuture<'a, Result<ProcessOutput>> {
        Box::pin(async move {
            let args = if self.remote_exists(dir, remote).await? {
                ["remote", "set-url", remote, url]
            } else {
                ["remote", "add", remote, url]
            };
            self.command(dir, args).run().await
        })
    }
}
