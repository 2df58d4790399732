// repo-publish: publish a local project directory to GitHub
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Scripted collaborators for controller tests.

use std::collections::{BTreeMap, VecDeque};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use futures_util::future::BoxFuture;
use secrecy::SecretString;
use tracing::Level;
use tracing_subscriber::fmt::MakeWriter;

use crate::core::process::builder::ProcessOutput;
use crate::error::Result;
use crate::git::VersionControl;
use crate::hosting::{RemoteHosting, RepositorySpec};

use super::Prompt;

/// Shared, ordered record of every collaborator call.
pub type Calls = Arc<Mutex<Vec<String>>>;

pub fn calls_of(calls: &Calls) -> Vec<String> {
    calls.lock().unwrap_or_else(PoisonError::into_inner).clone()
}

fn push(calls: &Calls, call: String) {
    calls.lock().unwrap_or_else(PoisonError::into_inner).push(call);
}

fn output(command: &str, code: i32, text: &str) -> ProcessOutput {
    if code == 0 {
        ProcessOutput::new(command, code, text, "")
    } else {
        ProcessOutput::new(command, code, "", text)
    }
}

/// Version control fake. Exit codes default to 0 and can be scripted per
/// operation name (`init`, `commit`, `branch`, ...).
pub struct FakeVcs {
    pub calls: Calls,
    pub available: bool,
    pub repository: Mutex<bool>,
    pub has_head: bool,
    pub porcelain: String,
    pub codes: BTreeMap<&'static str, i32>,
    /// Operation that panics instead of returning.
    pub panic_on: Option<&'static str>,
}

impl FakeVcs {
    pub fn new(calls: &Calls) -> Self {
        Self {
            calls: Arc::clone(calls),
            available: true,
            repository: Mutex::new(true),
            has_head: true,
            porcelain: String::new(),
            codes: BTreeMap::new(),
            panic_on: None,
        }
    }

    /// A directory with no repository yet.
    pub fn unversioned(calls: &Calls) -> Self {
        let vcs = Self::new(calls);
        *vcs.repository.lock().unwrap_or_else(PoisonError::into_inner) = false;
        Self {
            has_head: false,
            ..vcs
        }
    }

    #[must_use]
    pub fn with_changes(mut self, porcelain: &str) -> Self {
        self.porcelain = porcelain.to_string();
        self
    }

    #[must_use]
    pub fn failing(mut self, op: &'static str, code: i32) -> Self {
        self.codes.insert(op, code);
        self
    }

    fn run(&self, op: &'static str, call: String) -> ProcessOutput {
        push(&self.calls, call.clone());
        assert!(self.panic_on != Some(op), "scripted panic in {op}");
        let code = self.codes.get(op).copied().unwrap_or(0);
        let text = if code == 0 { "" } else { "fatal: scripted failure" };
        output(&call, code, text)
    }
}

impl VersionControl for FakeVcs {
    fn tool_name(&self) -> &str {
        "git"
    }

    fn is_available(&self) -> bool {
        self.available
    }

    fn is_repository<'a>(&'a self, _dir: &'a Path) -> BoxFuture<'a, Result<bool>> {
        push(&self.calls, "git is-repository".to_string());
        let is_repo = *self.repository.lock().unwrap_or_else(PoisonError::into_inner);
        Box::pin(async move { Ok(is_repo) })
    }

    fn init<'a>(&'a self, _dir: &'a Path) -> BoxFuture<'a, Result<ProcessOutput>> {
        let out = self.run("init", "git init".to_string());
        if out.success() {
            *self.repository.lock().unwrap_or_else(PoisonError::into_inner) = true;
        }
        Box::pin(async move { Ok(out) })
    }

    fn set_head<'a>(
        &'a self,
        _dir: &'a Path,
        branch: &'a str,
    ) -> BoxFuture<'a, Result<ProcessOutput>> {
        let out = self.run("symbolic-ref", format!("git symbolic-ref HEAD refs/heads/{branch}"));
        Box::pin(async move { Ok(out) })
    }

    fn git_dir<'a>(&'a self, dir: &'a Path) -> BoxFuture<'a, Result<Option<PathBuf>>> {
        push(&self.calls, "git rev-parse --absolute-git-dir".to_string());
        let path = dir.join(".git");
        Box::pin(async move { Ok(Some(path)) })
    }

    fn has_head<'a>(&'a self, _dir: &'a Path) -> BoxFuture<'a, Result<bool>> {
        push(&self.calls, "git has-head".to_string());
        let has_head = self.has_head;
        Box::pin(async move { Ok(has_head) })
    }

    fn status<'a>(&'a self, _dir: &'a Path) -> BoxFuture<'a, Result<ProcessOutput>> {
        push(&self.calls, "git status --porcelain".to_string());
        let code = self.codes.get("status").copied().unwrap_or(0);
        let out = ProcessOutput::new("git status --porcelain", code, self.porcelain.clone(), "");
        Box::pin(async move { Ok(out) })
    }

    fn add_all<'a>(&'a self, _dir: &'a Path) -> BoxFuture<'a, Result<ProcessOutput>> {
        let out = self.run("add", "git add -A".to_string());
        Box::pin(async move { Ok(out) })
    }

    fn commit<'a>(
        &'a self,
        _dir: &'a Path,
        message: &'a str,
    ) -> BoxFuture<'a, Result<ProcessOutput>> {
        let out = self.run("commit", format!("git commit -m {message}"));
        Box::pin(async move { Ok(out) })
    }

    fn rename_branch<'a>(
        &'a self,
        _dir: &'a Path,
        branch: &'a str,
    ) -> BoxFuture<'a, Result<ProcessOutput>> {
        let out = self.run("branch", format!("git branch -M {branch}"));
        Box::pin(async move { Ok(out) })
    }

    fn set_remote<'a>(
        &'a self,
        _dir: &'a Path,
        remote: &'a str,
        url: &'a str,
    ) -> BoxFuture<'a, Result<ProcessOutput>> {
        let out = self.run("remote", format!("git remote add {remote} {url}"));
        Box::pin(async move { Ok(out) })
    }
}

/// Hosting fake. Create and push succeed unless scripted otherwise.
pub struct FakeHosting {
    pub calls: Calls,
    pub available: bool,
    pub create: (i32, String),
    pub push: (i32, String),
    /// Stdout of the login lookup.
    pub login: String,
}

impl FakeHosting {
    pub fn new(calls: &Calls) -> Self {
        Self {
            calls: Arc::clone(calls),
            available: true,
            create: (0, String::new()),
            push: (0, String::new()),
            login: "octocat\n".to_string(),
        }
    }

    /// Both create and push fail with `code` and `output`.
    #[must_use]
    pub fn failing(mut self, code: i32, output: &str) -> Self {
        self.create = (code, output.to_string());
        self.push = (code, output.to_string());
        self
    }

    /// Create fails the way it does for a name or remote already in use.
    #[must_use]
    pub fn existing(mut self, output: &str) -> Self {
        self.create = (1, output.to_string());
        self
    }
}

impl RemoteHosting for FakeHosting {
    fn tool_name(&self) -> &str {
        "gh"
    }

    fn is_available(&self) -> bool {
        self.available
    }

    fn create<'a>(
        &'a self,
        _dir: &'a Path,
        spec: &'a RepositorySpec,
        _credential: &'a SecretString,
    ) -> BoxFuture<'a, Result<ProcessOutput>> {
        let call = format!("gh repo create {} {}", spec.full_name(), spec.visibility.as_flag());
        push(&self.calls, call.clone());
        let out = output(&call, self.create.0, &self.create.1);
        Box::pin(async move { Ok(out) })
    }

    fn push<'a>(
        &'a self,
        _dir: &'a Path,
        remote: &'a str,
        branch: &'a str,
        _credential: &'a SecretString,
    ) -> BoxFuture<'a, Result<ProcessOutput>> {
        let call = format!("git push -u {remote} {branch}");
        push(&self.calls, call.clone());
        let out = output(&call, self.push.0, &self.push.1);
        Box::pin(async move { Ok(out) })
    }

    fn current_login<'a>(
        &'a self,
        _credential: &'a SecretString,
    ) -> BoxFuture<'a, Result<ProcessOutput>> {
        let call = "gh api user --jq .login";
        push(&self.calls, call.to_string());
        let out = ProcessOutput::new(call, 0, self.login.clone(), "");
        Box::pin(async move { Ok(out) })
    }

    fn remote_url(&self, owner: &str, name: &str) -> String {
        format!("https://github.com/{owner}/{name}.git")
    }
}

/// Prompt answering from a script; runs out as blank answers.
#[derive(Default)]
pub struct ScriptedPrompt {
    pub answers: VecDeque<String>,
    pub asked: Vec<String>,
    /// Details shown alongside each confirmation.
    pub shown: Vec<String>,
}

impl ScriptedPrompt {
    pub fn answering(answers: &[&str]) -> Self {
        Self {
            answers: answers.iter().map(|a| (*a).to_string()).collect(),
            ..Self::default()
        }
    }

    fn next(&mut self, question: &str) -> String {
        self.asked.push(question.to_string());
        self.answers.pop_front().unwrap_or_default()
    }
}

impl Prompt for ScriptedPrompt {
    fn confirm(&mut self, question: &str, details: &[String]) -> bool {
        self.shown.extend_from_slice(details);
        super::prompt::is_affirmative(&self.next(question))
    }

    fn read_line(&mut self, question: &str) -> String {
        self.next(question)
    }

    fn pause(&mut self, message: &str) {
        self.next(message);
    }
}

#[derive(Clone)]
struct BufferWriter {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl Write for BufferWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.buffer
            .lock()
            .map_err(|_| std::io::Error::other("buffer poisoned"))?
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[derive(Clone)]
struct BufferMakeWriter {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl<'a> MakeWriter<'a> for BufferMakeWriter {
    type Writer = BufferWriter;

    fn make_writer(&'a self) -> Self::Writer {
        BufferWriter {
            buffer: self.buffer.clone(),
        }
    }
}

/// Runs an async closure while capturing console tracing output.
pub async fn run_with_logs<F, Fut, T>(f: F) -> (T, String)
where
    F: FnOnce() -> Fut,
    Fut: std::future::Future<Output = T>,
{
    let buffer = Arc::new(Mutex::new(Vec::new()));
    let subscriber = tracing_subscriber::fmt::Subscriber::builder()
        .with_writer(BufferMakeWriter {
            buffer: buffer.clone(),
        })
        .with_max_level(Level::INFO)
        .with_ansi(false)
        .with_target(false)
        .with_level(false)
        .finish();

    let _guard = tracing::subscriber::set_default(subscriber);
    let value = f().await;

    let captured = buffer.lock().unwrap_or_else(PoisonError::into_inner);
    (value, String::from_utf8_lossy(&captured).to_string())
}
