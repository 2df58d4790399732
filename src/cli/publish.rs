// repo-publish: publish a local project directory to GitHub
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Publish command arguments.

use clap::Args;
use std::path::PathBuf;

use crate::config::types::Visibility;

/// Arguments for the publish command.
#[derive(Debug, Clone, Args)]
pub struct PublishArgs {
    /// Project directory to publish.
    #[arg(value_name = "PATH", default_value = ".")]
    pub path: PathBuf,

    /// Create a private repository.
    #[arg(long, conflicts_with = "public")]
    pub private: bool,

    /// Create a public repository (the default unless configured otherwise).
    #[arg(long)]
    pub public: bool,

    /// Remote repository name (defaults to the sanitized directory name).
    #[arg(long, value_name = "NAME")]
    pub name: Option<String>,

    /// Account or organization that owns the repository.
    #[arg(long, value_name = "OWNER")]
    pub owner: Option<String>,

    /// Push to an existing repository instead of creating one.
    #[arg(long, requires = "owner")]
    pub skip_create: bool,

    /// Repository description.
    #[arg(long, value_name = "TEXT")]
    pub description: Option<String>,

    /// Commit message for outstanding changes.
    #[arg(short = 'm', long = "message", value_name = "TEXT")]
    pub message: Option<String>,

    /// Commit outstanding changes without asking.
    #[arg(short = 'y', long = "yes")]
    pub yes: bool,

    /// Exit without waiting for Enter.
    #[arg(long)]
    pub no_pause: bool,

    /// Print the outcome as JSON on stdout.
    #[arg(long)]
    pub json: bool,
}

impl PublishArgs {
    /// Visibility chosen on the command line, if any.
    #[must_use]
    pub const fn visibility(&self) -> Option<Visibility> {
        if self.private {
            Some(Visibility::Private)
        } else if self.public {
            Some(Visibility::Public)
        } else {
            None
        }
    }
}
