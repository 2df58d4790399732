// repo-publish: publish a local project directory to GitHub
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Publish command: wires the real collaborators to the workflow.
//!
//! ```text
//! PublishArgs + Config --> PublishRequest
//! GitCli, GhCli, TerminalPrompt --> Publisher::publish --> PublishOutcome
//! --json: outcome on stdout, prompt on stderr
//! otherwise: prompt on stdout, optional pause on a terminal
//!
//! config unreadable --> record_startup_failure --> fallback log
//! ```

use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use anyhow::Context;
use secrecy::SecretString;
use tracing::debug;

use crate::cli::publish::PublishArgs;
use crate::config::Config;
use crate::error::Result;
use crate::git::GitCli;
use crate::hosting::GhCli;
use crate::logging::{FALLBACK_LOG_NAME, PublishLog};
use crate::publish::{Prompt, PublishOutcome, PublishRequest, Publisher, StdioPrompt};

/// Main handler for the publish command. Returns the process exit code.
///
/// # Errors
///
/// Returns an error only if the JSON outcome cannot be serialized; every
/// workflow failure is reported through the exit code.
pub async fn run_publish_command(args: &PublishArgs, config: &Config) -> Result<i32> {
    let credential = read_credential(&config.publish.token_env);
    let request = build_request(args, config, credential);
    debug!(?request, "publish request");

    let git = GitCli::new(&config.tools.git);
    let gh = GhCli::new(&config.tools.gh, &config.tools.git);
    let mut prompt = if args.json {
        StdioPrompt::stdio_to_stderr()
    } else {
        StdioPrompt::stdio()
    };

    let outcome = Publisher::new(&git, &gh, &mut prompt, &config.publish)
        .publish(&request)
        .await;

    if args.json {
        print_json(&outcome)?;
    } else if !(args.no_pause || config.global.no_pause) && std::io::stdin().is_terminal() {
        prompt.pause("Press Enter to close...");
    }

    Ok(outcome.exit_code)
}

/// Record a publish that failed before the workflow could start, such as
/// unreadable configuration, in the fallback log under `scratch`.
///
/// Returns the log path, or `None` if not even that file can be written.
pub fn record_startup_failure(scratch: &Path, err: &anyhow::Error) -> Option<PathBuf> {
    let mut log = PublishLog::create(scratch.join(FALLBACK_LOG_NAME)).ok()?;
    log.info(format!("repo-publish {} could not start", env!("CARGO_PKG_VERSION")));
    log.error(format!("{err:#}"));
    log.path().map(Path::to_path_buf)
}

/// Build the request from command-line arguments and configuration.
///
/// Command-line visibility wins over `publish.visibility`.
#[must_use]
pub fn build_request(
    args: &PublishArgs,
    config: &Config,
    credential: Option<SecretString>,
) -> PublishRequest {
    PublishRequest::builder()
        .target_path(&args.path)
        .visibility(args.visibility().unwrap_or(config.publish.visibility))
        .maybe_credential(credential)
        .skip_create(args.skip_create)
        .maybe_owner(args.owner.clone())
        .maybe_name(args.name.clone())
        .maybe_description(args.description.clone())
        .maybe_commit_message(args.message.clone())
        .auto_confirm(args.yes)
        .dry_run(config.global.dry)
        .build()
}

/// Read the hosting credential from `var`; blank counts as absent.
#[must_use]
pub fn read_credential(var: &str) -> Option<SecretString> {
    std::env::var(var)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .map(SecretString::from)
}

fn print_json(outcome: &PublishOutcome) -> Result<()> {
    let json = serde_json::to_string_pretty(outcome).context("failed to serialize outcome")?;
    println!("{json}");
    Ok(())
}
