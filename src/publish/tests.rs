// repo-publish: publish a local project directory to GitHub
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use secrecy::SecretString;
use tempfile::TempDir;

use super::test_utils::{
    Calls, FakeHosting, FakeVcs, ScriptedPrompt, calls_of, run_with_logs,
};
use super::{
    FinalState, Prompt, PublishOutcome, PublishRequest, Publisher, TerminalPrompt, WorkflowState,
    scratch_log_path,
};
use crate::config::types::{PublishConfig, Visibility};
use crate::logging::GIT_DIR_LOG_NAME;

struct Fixture {
    _root: TempDir,
    project: PathBuf,
    settings: PublishConfig,
}

/// A project directory named "my project" with one file, and a private
/// scratch directory for logs.
fn fixture() -> Fixture {
    let root = tempfile::tempdir().expect("failed to create temp dir");
    let project = root.path().join("my project");
    fs::create_dir_all(&project).expect("failed to create project dir");
    fs::write(project.join("a.txt"), "hello").expect("failed to write file");

    let settings = PublishConfig {
        log_dir: Some(root.path().join("scratch")),
        log_in_git_dir: false,
        ..PublishConfig::default()
    };
    Fixture {
        _root: root,
        project,
        settings,
    }
}

fn token() -> SecretString {
    SecretString::from("ghp_example".to_string())
}

fn new_calls() -> Calls {
    Arc::new(Mutex::new(Vec::new()))
}

async fn publish(
    vcs: &FakeVcs,
    hosting: &FakeHosting,
    prompt: &mut ScriptedPrompt,
    settings: &PublishConfig,
    request: &PublishRequest,
) -> PublishOutcome {
    Publisher::new(vcs, hosting, prompt, settings)
        .publish(request)
        .await
}

fn log_text(outcome: &PublishOutcome) -> String {
    let path = outcome.log_path.as_deref().expect("log should have a file");
    fs::read_to_string(path).expect("failed to read log")
}

fn position(log: &str, needle: &str) -> usize {
    log.find(needle)
        .unwrap_or_else(|| panic!("'{needle}' not in log:\n{log}"))
}

#[tokio::test]
async fn test_fresh_directory_is_initialized_committed_and_pushed() {
    let fx = fixture();
    let calls = new_calls();
    let vcs = FakeVcs::unversioned(&calls).with_changes("?? a.txt\n");
    let hosting = FakeHosting::new(&calls);
    let mut prompt = ScriptedPrompt::default();
    let request = PublishRequest::builder()
        .target_path(&fx.project)
        .credential(token())
        .auto_confirm(true)
        .build();

    let outcome = publish(&vcs, &hosting, &mut prompt, &fx.settings, &request).await;

    assert!(outcome.is_success(), "error: {:?}", outcome.error);
    assert_eq!(outcome.final_state, FinalState::Pushed);
    assert_eq!(
        calls_of(&calls),
        [
            "git is-repository",
            "git init",
            "git symbolic-ref HEAD refs/heads/main",
            "git status --porcelain",
            "git has-head",
            "git add -A",
            "git commit -m init commit",
            "git branch -M main",
            "gh repo create my-project --public",
        ]
    );
    assert!(prompt.asked.is_empty(), "--yes must never prompt");
    insta::assert_debug_snapshot!(outcome.transitions, @r"
    [
        Start,
        PathResolved,
        ToolsVerified,
        LogOpened,
        RepoReady,
        CommittedAfterConfirm,
        BranchNormalized,
        CredentialChecked,
        Pushed,
    ]
    ");
}

#[tokio::test]
async fn test_initialization_is_logged_before_status() {
    let fx = fixture();
    let calls = new_calls();
    let vcs = FakeVcs::unversioned(&calls).with_changes("?? a.txt\n");
    let hosting = FakeHosting::new(&calls);
    let mut prompt = ScriptedPrompt::default();
    let request = PublishRequest::builder()
        .target_path(&fx.project)
        .credential(token())
        .auto_confirm(true)
        .build();

    let outcome = publish(&vcs, &hosting, &mut prompt, &fx.settings, &request).await;
    let log = log_text(&outcome);

    assert!(position(&log, "$ git init") < position(&log, "$ git status --porcelain"));
    assert!(position(&log, "$ git commit") < position(&log, "success"));
}

#[tokio::test]
async fn test_missing_path_fails_before_any_command() {
    let fx = fixture();
    let calls = new_calls();
    let vcs = FakeVcs::new(&calls);
    let hosting = FakeHosting::new(&calls);
    let mut prompt = ScriptedPrompt::default();
    let request = PublishRequest::builder()
        .target_path(fx.project.join("does-not-exist"))
        .credential(token())
        .build();

    let outcome = publish(&vcs, &hosting, &mut prompt, &fx.settings, &request).await;

    assert_eq!(outcome.exit_code, 5);
    assert_eq!(outcome.final_state, FinalState::PathInvalid);
    assert!(calls_of(&calls).is_empty());
    assert_eq!(
        outcome.transitions,
        [WorkflowState::Start, WorkflowState::Failed]
    );
    let log = log_text(&outcome);
    assert!(log.contains("path error"), "log:\n{log}");
    assert!(log.contains("hint:"), "log:\n{log}");
}

#[tokio::test]
async fn test_declining_the_commit_gate_cancels() {
    let fx = fixture();
    let calls = new_calls();
    let vcs = FakeVcs::new(&calls).with_changes(" M a.txt\n?? b.txt\n");
    let hosting = FakeHosting::new(&calls);
    let mut prompt = ScriptedPrompt::answering(&["n"]);
    let request = PublishRequest::builder()
        .target_path(&fx.project)
        .credential(token())
        .build();

    let outcome = publish(&vcs, &hosting, &mut prompt, &fx.settings, &request).await;

    assert_eq!(outcome.exit_code, 2);
    assert!(!outcome.is_success());
    assert_eq!(outcome.final_state, FinalState::CancelledByUser);
    assert_eq!(outcome.transitions.last(), Some(&WorkflowState::CancelledByUser));
    assert_eq!(prompt.asked, ["Commit these 2 change(s)?"]);
    assert_eq!(prompt.shown, ["a.txt", "b.txt"]);
    let calls = calls_of(&calls);
    assert!(!calls.iter().any(|c| c.starts_with("git add") || c.starts_with("git commit")));
    assert!(!calls.iter().any(|c| c.starts_with("gh") || c.contains("push")));
}

#[tokio::test]
async fn test_blank_message_uses_auto_default_once_history_exists() {
    let fx = fixture();
    let calls = new_calls();
    let vcs = FakeVcs::new(&calls).with_changes(" M a.txt\n");
    let hosting = FakeHosting::new(&calls);
    let mut prompt = ScriptedPrompt::answering(&["y", ""]);
    let request = PublishRequest::builder()
        .target_path(&fx.project)
        .credential(token())
        .build();

    let outcome = publish(&vcs, &hosting, &mut prompt, &fx.settings, &request).await;

    assert_eq!(outcome.exit_code, 0, "error: {:?}", outcome.error);
    assert_eq!(prompt.asked.len(), 2);
    assert!(calls_of(&calls).contains(&"git commit -m auto commit".to_string()));
}

#[tokio::test]
async fn test_whitespace_message_is_treated_as_blank() {
    let fx = fixture();
    let calls = new_calls();
    let vcs = FakeVcs::new(&calls).with_changes(" M a.txt\n");
    let hosting = FakeHosting::new(&calls);
    let mut prompt = ScriptedPrompt::default();
    let request = PublishRequest::builder()
        .target_path(&fx.project)
        .credential(token())
        .commit_message("   ")
        .auto_confirm(true)
        .build();

    publish(&vcs, &hosting, &mut prompt, &fx.settings, &request).await;

    assert!(calls_of(&calls).contains(&"git commit -m auto commit".to_string()));
}

#[tokio::test]
async fn test_operator_message_is_trimmed() {
    let fx = fixture();
    let calls = new_calls();
    let vcs = FakeVcs::new(&calls).with_changes(" M a.txt\n");
    let hosting = FakeHosting::new(&calls);
    let mut prompt = ScriptedPrompt::answering(&["Y", "  fix typo  "]);
    let request = PublishRequest::builder()
        .target_path(&fx.project)
        .credential(token())
        .build();

    publish(&vcs, &hosting, &mut prompt, &fx.settings, &request).await;

    assert!(calls_of(&calls).contains(&"git commit -m fix typo".to_string()));
}

#[tokio::test]
async fn test_clean_tree_skips_the_commit_gate() {
    let fx = fixture();
    let calls = new_calls();
    let vcs = FakeVcs::new(&calls);
    let hosting = FakeHosting::new(&calls);
    let mut prompt = ScriptedPrompt::default();
    let request = PublishRequest::builder()
        .target_path(&fx.project)
        .credential(token())
        .build();

    let (v, h, p, s, r) = (&vcs, &hosting, &mut prompt, &fx.settings, &request);
    let (outcome, console) = run_with_logs(move || publish(v, h, p, s, r)).await;

    assert_eq!(outcome.exit_code, 0, "error: {:?}", outcome.error);
    assert!(outcome.transitions.contains(&WorkflowState::Clean));
    assert!(prompt.asked.is_empty());
    assert!(!calls_of(&calls).iter().any(|c| c.starts_with("git commit")));
    assert!(console.contains("clean, nothing to commit"), "console:\n{console}");
}

#[tokio::test]
async fn test_missing_credential_stops_before_hosting() {
    let fx = fixture();
    let calls = new_calls();
    let vcs = FakeVcs::new(&calls);
    let hosting = FakeHosting::new(&calls);
    let mut prompt = ScriptedPrompt::default();
    let request = PublishRequest::builder()
        .target_path(&fx.project)
        .credential(SecretString::from("  ".to_string()))
        .build();

    let outcome = publish(&vcs, &hosting, &mut prompt, &fx.settings, &request).await;

    assert_eq!(outcome.exit_code, 3);
    assert_eq!(outcome.final_state, FinalState::MissingCredential);
    assert!(!calls_of(&calls).iter().any(|c| c.starts_with("gh")));
    let log = log_text(&outcome);
    assert!(log.contains("export GITHUB_TOKEN="), "log:\n{log}");
}

#[tokio::test]
async fn test_branch_rename_failure_is_only_a_warning() {
    let fx = fixture();
    let calls = new_calls();
    let vcs = FakeVcs::new(&calls).failing("branch", 128);
    let hosting = FakeHosting::new(&calls);
    let mut prompt = ScriptedPrompt::default();
    let request = PublishRequest::builder()
        .target_path(&fx.project)
        .credential(token())
        .build();

    let outcome = publish(&vcs, &hosting, &mut prompt, &fx.settings, &request).await;

    assert_eq!(outcome.exit_code, 0, "error: {:?}", outcome.error);
    assert!(outcome.transitions.contains(&WorkflowState::BranchNormalized));
    let log = log_text(&outcome);
    assert!(log.contains("branch rename to main failed"), "log:\n{log}");
}

#[tokio::test]
async fn test_push_failure_passes_exit_code_and_output_through() {
    let fx = fixture();
    let calls = new_calls();
    let vcs = FakeVcs::new(&calls);
    let hosting = FakeHosting::new(&calls).failing(4, "HTTP 401: Bad credentials (https://api.github.com/graphql)");
    let mut prompt = ScriptedPrompt::default();
    let request = PublishRequest::builder()
        .target_path(&fx.project)
        .credential(token())
        .visibility(Visibility::Private)
        .build();

    let outcome = publish(&vcs, &hosting, &mut prompt, &fx.settings, &request).await;

    assert_eq!(outcome.exit_code, 4);
    assert_eq!(outcome.final_state, FinalState::CommandFailed);
    assert!(calls_of(&calls).contains(&"gh repo create my-project --private".to_string()));
    assert!(!calls_of(&calls).iter().any(|c| c.contains("push")));
    let log = log_text(&outcome);
    assert!(log.contains("HTTP 401: Bad credentials"), "log:\n{log}");
}

#[tokio::test]
async fn test_existing_repository_is_reused_under_credential_login() {
    let fx = fixture();
    let calls = new_calls();
    let vcs = FakeVcs::new(&calls);
    let hosting = FakeHosting::new(&calls)
        .existing("GraphQL: Name already exists on this account (createRepository)");
    let mut prompt = ScriptedPrompt::default();
    let request = PublishRequest::builder()
        .target_path(&fx.project)
        .credential(token())
        .build();

    let outcome = publish(&vcs, &hosting, &mut prompt, &fx.settings, &request).await;

    assert_eq!(outcome.exit_code, 0, "error: {:?}", outcome.error);
    assert_eq!(outcome.final_state, FinalState::Pushed);
    let calls = calls_of(&calls);
    assert_eq!(
        &calls[calls.len() - 4..],
        [
            "gh repo create my-project --public",
            "gh api user --jq .login",
            "git remote add origin https://github.com/octocat/my-project.git",
            "git push -u origin main",
        ]
    );
    let log = log_text(&outcome);
    assert!(log.contains("WARN  my-project or its remote already exists, reusing it"), "log:\n{log}");
}

#[tokio::test]
async fn test_existing_remote_is_repointed_at_given_owner() {
    let fx = fixture();
    let calls = new_calls();
    let vcs = FakeVcs::new(&calls);
    let hosting = FakeHosting::new(&calls).existing("X Unable to add remote \"origin\"");
    let mut prompt = ScriptedPrompt::default();
    let request = PublishRequest::builder()
        .target_path(&fx.project)
        .credential(token())
        .owner("octo-org")
        .build();

    let outcome = publish(&vcs, &hosting, &mut prompt, &fx.settings, &request).await;

    assert_eq!(outcome.exit_code, 0, "error: {:?}", outcome.error);
    let calls = calls_of(&calls);
    assert!(!calls.iter().any(|c| c.starts_with("gh api")), "{calls:?}");
    assert_eq!(
        &calls[calls.len() - 3..],
        [
            "gh repo create octo-org/my-project --public",
            "git remote add origin https://github.com/octo-org/my-project.git",
            "git push -u origin main",
        ]
    );
}

#[tokio::test]
async fn test_reuse_needs_an_account_for_the_remote_url() {
    let fx = fixture();
    let calls = new_calls();
    let vcs = FakeVcs::new(&calls);
    let hosting = FakeHosting {
        login: "\n".to_string(),
        ..FakeHosting::new(&calls).existing("GraphQL: Name already exists on this account")
    };
    let mut prompt = ScriptedPrompt::default();
    let request = PublishRequest::builder()
        .target_path(&fx.project)
        .credential(token())
        .build();

    let outcome = publish(&vcs, &hosting, &mut prompt, &fx.settings, &request).await;

    assert_eq!(outcome.exit_code, 1);
    assert_eq!(outcome.final_state, FinalState::Failed);
    assert!(!calls_of(&calls).iter().any(|c| c.contains("push")));
    assert!(outcome.error.as_deref().is_some_and(|e| e.contains("--owner")));
}

#[tokio::test]
async fn test_initial_branch_failure_is_only_a_warning() {
    let fx = fixture();
    let calls = new_calls();
    let vcs = FakeVcs::unversioned(&calls)
        .with_changes("?? a.txt\n")
        .failing("symbolic-ref", 128);
    let hosting = FakeHosting::new(&calls);
    let mut prompt = ScriptedPrompt::default();
    let request = PublishRequest::builder()
        .target_path(&fx.project)
        .credential(token())
        .auto_confirm(true)
        .build();

    let outcome = publish(&vcs, &hosting, &mut prompt, &fx.settings, &request).await;

    assert_eq!(outcome.exit_code, 0, "error: {:?}", outcome.error);
    assert_eq!(outcome.final_state, FinalState::Pushed);
    assert!(calls_of(&calls).contains(&"git commit -m init commit".to_string()));
    let log = log_text(&outcome);
    assert!(
        log.contains("WARN  could not set the initial branch to main (exit code 128)"),
        "log:\n{log}"
    );
}

#[tokio::test]
async fn test_commit_failure_reports_identity_hint() {
    let fx = fixture();
    let calls = new_calls();
    let vcs = FakeVcs::new(&calls)
        .with_changes("?? a.txt\n")
        .failing("commit", 128);
    let hosting = FakeHosting::new(&calls);
    let mut prompt = ScriptedPrompt::default();
    let request = PublishRequest::builder()
        .target_path(&fx.project)
        .credential(token())
        .auto_confirm(true)
        .build();

    let outcome = publish(&vcs, &hosting, &mut prompt, &fx.settings, &request).await;

    assert_eq!(outcome.exit_code, 6);
    assert!(!calls_of(&calls).iter().any(|c| c.starts_with("gh")));
    let log = log_text(&outcome);
    assert!(log.contains("scripted failure"), "log:\n{log}");
    assert!(log.contains("user.name"), "log:\n{log}");
}

#[tokio::test]
async fn test_init_failure_stops_before_status() {
    let fx = fixture();
    let calls = new_calls();
    let vcs = FakeVcs::unversioned(&calls).failing("init", 1);
    let hosting = FakeHosting::new(&calls);
    let mut prompt = ScriptedPrompt::default();
    let request = PublishRequest::builder()
        .target_path(&fx.project)
        .credential(token())
        .build();

    let outcome = publish(&vcs, &hosting, &mut prompt, &fx.settings, &request).await;

    assert_eq!(outcome.exit_code, 6);
    assert_eq!(calls_of(&calls), ["git is-repository", "git init"]);
}

#[tokio::test]
async fn test_missing_tools_are_all_reported() {
    let fx = fixture();
    let calls = new_calls();
    let vcs = FakeVcs {
        available: false,
        ..FakeVcs::new(&calls)
    };
    let hosting = FakeHosting {
        available: false,
        ..FakeHosting::new(&calls)
    };
    let mut prompt = ScriptedPrompt::default();
    let request = PublishRequest::builder()
        .target_path(&fx.project)
        .credential(token())
        .build();

    let outcome = publish(&vcs, &hosting, &mut prompt, &fx.settings, &request).await;

    assert_eq!(outcome.exit_code, 4);
    assert_eq!(outcome.final_state, FinalState::ToolMissing);
    assert_eq!(outcome.error.as_deref(), Some("required tool not found: git, gh"));
    assert!(calls_of(&calls).is_empty());
}

#[tokio::test]
async fn test_dry_run_plans_without_mutating() {
    let fx = fixture();
    let calls = new_calls();
    let vcs = FakeVcs::unversioned(&calls);
    let hosting = FakeHosting::new(&calls);
    let mut prompt = ScriptedPrompt::default();
    let request = PublishRequest::builder()
        .target_path(&fx.project)
        .credential(token())
        .dry_run(true)
        .build();

    let outcome = publish(&vcs, &hosting, &mut prompt, &fx.settings, &request).await;

    assert_eq!(outcome.exit_code, 0, "error: {:?}", outcome.error);
    assert_eq!(outcome.final_state, FinalState::Planned);
    assert_eq!(calls_of(&calls), ["git is-repository"]);
    assert!(outcome.transitions.contains(&WorkflowState::CommitPlanned));
    let log = log_text(&outcome);
    assert!(log.contains("a.txt"), "log:\n{log}");
    assert!(log.contains("would create public repository my-project"), "log:\n{log}");
}

#[tokio::test]
async fn test_dry_run_still_requires_credential() {
    let fx = fixture();
    let calls = new_calls();
    let vcs = FakeVcs::new(&calls);
    let hosting = FakeHosting::new(&calls);
    let mut prompt = ScriptedPrompt::default();
    let request = PublishRequest::builder()
        .target_path(&fx.project)
        .dry_run(true)
        .build();

    let outcome = publish(&vcs, &hosting, &mut prompt, &fx.settings, &request).await;

    assert_eq!(outcome.exit_code, 3);
}

#[tokio::test]
async fn test_skip_create_points_remote_and_pushes() {
    let fx = fixture();
    let calls = new_calls();
    let vcs = FakeVcs::new(&calls);
    let hosting = FakeHosting::new(&calls);
    let mut prompt = ScriptedPrompt::default();
    let request = PublishRequest::builder()
        .target_path(&fx.project)
        .credential(token())
        .skip_create(true)
        .owner("octo")
        .name("site")
        .build();

    let outcome = publish(&vcs, &hosting, &mut prompt, &fx.settings, &request).await;

    assert_eq!(outcome.exit_code, 0, "error: {:?}", outcome.error);
    let calls = calls_of(&calls);
    assert!(!calls.iter().any(|c| c.starts_with("gh repo create")));
    assert_eq!(
        &calls[calls.len() - 2..],
        [
            "git remote add origin https://github.com/octo/site.git",
            "git push -u origin main",
        ]
    );
}

#[tokio::test]
async fn test_skip_create_without_owner_is_rejected() {
    let fx = fixture();
    let calls = new_calls();
    let vcs = FakeVcs::new(&calls);
    let hosting = FakeHosting::new(&calls);
    let mut prompt = ScriptedPrompt::default();
    let request = PublishRequest::builder()
        .target_path(&fx.project)
        .credential(token())
        .skip_create(true)
        .build();

    let outcome = publish(&vcs, &hosting, &mut prompt, &fx.settings, &request).await;

    assert_eq!(outcome.exit_code, 1);
    assert_eq!(outcome.final_state, FinalState::Failed);
    assert!(calls_of(&calls).is_empty());
}

#[tokio::test]
async fn test_panic_in_collaborator_is_contained() {
    let fx = fixture();
    let calls = new_calls();
    let vcs = FakeVcs {
        panic_on: Some("commit"),
        ..FakeVcs::new(&calls).with_changes("?? a.txt\n")
    };
    let hosting = FakeHosting::new(&calls);
    let mut prompt = ScriptedPrompt::default();
    let request = PublishRequest::builder()
        .target_path(&fx.project)
        .credential(token())
        .auto_confirm(true)
        .build();

    let outcome = publish(&vcs, &hosting, &mut prompt, &fx.settings, &request).await;

    assert_eq!(outcome.exit_code, 1);
    assert_eq!(outcome.final_state, FinalState::Failed);
    assert!(
        outcome
            .error
            .as_deref()
            .is_some_and(|e| e.contains("scripted panic in commit"))
    );
    assert!(log_text(&outcome).contains("unexpected failure (panic)"));
}

#[tokio::test]
async fn test_log_moves_into_repository_metadata() {
    let mut fx = fixture();
    fx.settings.log_in_git_dir = true;
    let calls = new_calls();
    let vcs = FakeVcs::unversioned(&calls).with_changes("?? a.txt\n");
    let hosting = FakeHosting::new(&calls);
    let mut prompt = ScriptedPrompt::default();
    let request = PublishRequest::builder()
        .target_path(&fx.project)
        .credential(token())
        .auto_confirm(true)
        .build();
    let scratch_log = scratch_log_path(&fx.settings, &fx.project);

    let outcome = publish(&vcs, &hosting, &mut prompt, &fx.settings, &request).await;

    let expected = fx
        .project
        .canonicalize()
        .expect("project should exist")
        .join(".git")
        .join(GIT_DIR_LOG_NAME);
    assert_eq!(outcome.log_path.as_deref(), Some(expected.as_path()));
    assert!(!scratch_log.exists());
    // Lines written before the move are replayed.
    let log = log_text(&outcome);
    assert!(log.contains("$ git init"), "log:\n{log}");
    assert!(log.contains("success"), "log:\n{log}");
}

#[test]
fn test_scratch_log_is_named_after_project() {
    let settings = PublishConfig {
        log_dir: Some(PathBuf::from("/var/tmp/rp")),
        ..PublishConfig::default()
    };
    assert_eq!(
        scratch_log_path(&settings, Path::new("/nowhere/my project")),
        Path::new("/var/tmp/rp/my-project.log")
    );
}

#[test]
fn test_terminal_prompt_lists_details_before_question() {
    let mut output = Vec::new();
    let details = ["a.txt".to_string(), "docs/b.md".to_string()];

    let confirmed = TerminalPrompt::new(std::io::Cursor::new("Y\n"), &mut output)
        .confirm("Commit these 2 change(s)?", &details);

    assert!(confirmed);
    assert_eq!(
        String::from_utf8(output).unwrap(),
        "  a.txt\n  docs/b.md\nCommit these 2 change(s)? [y/N] "
    );
}

#[test]
fn test_terminal_prompt_end_of_input_declines() {
    let mut output = Vec::new();
    let mut prompt = TerminalPrompt::new(std::io::Cursor::new(""), &mut output);

    assert!(!prompt.confirm("Commit these 1 change(s)?", &["a.txt".to_string()]));
    assert_eq!(prompt.read_line("Commit message: "), "");
}
