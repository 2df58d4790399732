// repo-publish: publish a local project directory to GitHub
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Version control collaborator.
//!
//! ```text
//!        publish controller
//!                |
//!                v
//!   ,--------------------------,
//!   | VersionControl (trait)   |
//!   '------------+-------------'
//!                |
//!                v
//!             GitCli  --> git (subprocess, explicit cwd)
//!   is_repository  rev-parse --show-toplevel
//!   init           init
//!   set_head       symbolic-ref HEAD refs/heads/<b>
//!   has_head       rev-parse --verify HEAD
//!   status         status --porcelain
//!   add_all        add -A
//!   commit         commit -m <msg>
//!   rename_branch  branch -M <b>
//!   set_remote     remote add | remote set-url
//!
//! status.rs: porcelain text --> RepositoryState
//! ```
//!
//! Every call names its working directory; nothing changes the process cwd.
//! Non-zero exits are returned as data in [`ProcessOutput`] so the caller
//! decides what is fatal.
//!
//! [`ProcessOutput`]: crate::core::process::builder::ProcessOutput

pub mod client;
pub mod status;

pub use client::{GitCli, VersionControl};
pub use status::{RepositoryState, parse_porcelain};
