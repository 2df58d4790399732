// repo-publish: publish a local project directory to GitHub
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Library root.
//!
//! # Crate Architecture
//!
//! ```text
//!                        main.rs
//!                           |
//!                +----------+----------+
//!                v                     v
//!             cli (clap)          cmd (handlers)
//!                |              publish / config
//!                +----------+----------+
//!                           v
//!              ,---------------------------,
//!              |          config           |
//!              |   TOML, env, --set        |
//!              '-------------+-------------'
//!                            v
//!              ,---------------------------,
//!              |          publish          |
//!              |  workflow state machine   |
//!              '--+-----------+--------+---'
//!                 |           |        |
//!                 v           v        v
//!               git        hosting   prompt
//!            (git CLI)     (gh CLI)  (stdin)
//!
//!   +-----------------------------------------+
//!   |  core   process spawning                |
//!   +-----------------------------------------+
//!   |  foundation   error, logging            |
//!   +-----------------------------------------+
//! ```

pub mod cli;
pub mod cmd;
pub mod config;
pub mod core;
pub mod error;
pub mod git;
pub mod hosting;
pub mod logging;
pub mod publish;
