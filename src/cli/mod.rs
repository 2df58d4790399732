// repo-publish: publish a local project directory to GitHub
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! CLI module for repo-publish using clap derive.
//!
//! # Command Structure
//!
//! ```text
//! repo-publish [global options] <command>
//! publish [PATH] [--private|--public] [--name N] [--owner O] [--skip-create]
//!         [--description D] [-m MSG] [-y] [--no-pause] [--json]
//! options
//! inis
//! version
//! ```

pub mod global;
pub mod publish;


use crate::cli::global::GlobalOptions;
use crate::cli::publish::PublishArgs;
use clap::{Parser, Subcommand};

/// Publish a local project directory to GitHub.
#[derive(Debug, Parser)]
#[command(
    name = "repo-publish",
    author,
    version,
    about = "Publish a local project directory to GitHub",
    long_about = "repo-publish Copyright (C) 2026 Romeo Ahmed\n\
                  This program comes with ABSOLUTELY NO WARRANTY\n\
                  This is free software, and you are welcome to redistribute it\n\
                  under certain conditions; see LICENSE for details.\n\n\
                  Turns a directory into a git repository if needed, commits\n\
                  outstanding changes after confirmation, creates the GitHub\n\
                  repository and pushes the default branch. Every step is\n\
                  written to a per-run publish log.",
    after_help = "CONFIGURATION:\n\n\
                  Settings are read from `repo-publish.toml` in the current\n\
                  directory if present, then from each --ini file in order, then\n\
                  from RPUB_* environment variables (e.g.\n\
                  RPUB_PUBLISH__DEFAULT_BRANCH=trunk), then from --set options.\n\n\
                  The GitHub credential is read from the variable named by\n\
                  publish/token_env (GITHUB_TOKEN by default).\n\n\
                  EXIT CODES:\n\n\
                  0 published (or dry run planned)   1 unexpected failure\n\
                  2 cancelled   3 missing credential   4 tool missing\n\
                  5 bad path   6 git command failed   push failure: gh's own code"
)]
pub struct Cli {
    /// Global options shared by all commands
    #[command(flatten)]
    pub global: GlobalOptions,

    /// Command to execute
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Shows the version.
    #[command(visible_alias = "-v")]
    Version,

    /// Lists all options and their values.
    Options,

    /// Lists the configuration files used.
    Inis,

    /// Publishes a directory to GitHub.
    Publish(PublishArgs),
}

/// Parses command-line arguments.
#[must_use]
pub fn parse() -> Cli {
    Cli::parse()
}
