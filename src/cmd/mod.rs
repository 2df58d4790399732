// repo-publish: publish a local project directory to GitHub
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Command implementations.
//!
//! ```text
//! CLI args --> cmd::run_* handlers
//!   publish, config (options / inis)
//! ```

pub mod config;
pub mod publish;
