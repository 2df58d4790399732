// repo-publish: publish a local project directory to GitHub
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration management for repo-publish.
//!
//! # Configuration Hierarchy
//!
//! ```text
//! Priority (low → high)
//! 1. defaults
//! 2. repo-publish.toml (cwd, optional)
//! 3. --ini FILE (repeatable)
//! 4. RPUB_* env vars
//! 5. --set section/key=value
//! ```
//!
//! # Environment Variable Mapping
//!
//! ```text
//! RPUB_GLOBAL__DRY=true             → global.dry = true
//! RPUB_PUBLISH__DEFAULT_BRANCH=trunk → publish.default_branch = "trunk"
//! RPUB_TOOLS__GH=/opt/gh/bin/gh     → tools.gh = "/opt/gh/bin/gh"
//! ```

pub mod loader;
pub mod types;


use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::Result;

use loader::ConfigLoader;
use types::{GlobalConfig, PublishConfig, ToolsConfig};

/// Name of the configuration file picked up from the current directory.
pub const CONFIG_FILE_NAME: &str = "repo-publish.toml";

/// Prefix of configuration environment variables.
pub const ENV_PREFIX: &str = "RPUB";

/// Complete application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Global options.
    pub global: GlobalConfig,
    /// Publish workflow options.
    pub publish: PublishConfig,
    /// Tool paths.
    pub tools: ToolsConfig,
}

impl Config {
    /// Create a new configuration builder.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use repo_publish::config::Config;
    ///
    /// let config = Config::builder()
    ///     .add_toml_file_optional("repo-publish.toml")
    ///     .with_env_prefix("RPUB")
    ///     .build()?;
    /// # Ok::<(), anyhow::Error>(())
    /// ```
    #[must_use]
    pub fn builder() -> ConfigLoader {
        ConfigLoader::new()
    }

    /// Load configuration from a single TOML file (simple API).
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, contains invalid TOML, or
    /// does not match the `Config` structure.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::builder().add_toml_file(path).build()
    }

    /// Load configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the content is not valid TOML or does not match the
    /// `Config` structure.
    pub fn parse(content: &str) -> Result<Self> {
        Self::builder().add_toml_str(content).build()
    }

    /// Reject values that deserialize but cannot work.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError::InvalidValue` naming the offending key.
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("default_branch", &self.publish.default_branch),
            ("remote_name", &self.publish.remote_name),
            ("token_env", &self.publish.token_env),
            ("init_message", &self.publish.init_message),
            ("auto_message", &self.publish.auto_message),
        ];
        for (key, value) in required {
            if value.trim().is_empty() {
                return Err(crate::error::ConfigError::InvalidValue {
                    section: "publish".to_string(),
                    key: key.to_string(),
                    message: "must not be empty".to_string(),
                }
                .into());
            }
        }
        Ok(())
    }

    /// Format configuration options for display.
    ///
    /// Output is deterministically ordered using `BTreeMap`.
    #[must_use]
    pub fn format_options(&self) -> Vec<String> {
        let mut options = BTreeMap::new();
        self.format_global_options(&mut options);
        self.format_publish_options(&mut options);
        self.format_tools_options(&mut options);

        let max_key_len = options.keys().map(String::len).max().unwrap_or(0);

        options
            .into_iter()
            .map(|(key, value)| format!("{key:<max_key_len$} = {value}"))
            .collect()
    }

    fn format_global_options(&self, options: &mut BTreeMap<String, String>) {
        options.insert("global.dry".into(), self.global.dry.to_string());
        options.insert(
            "global.output_log_level".into(),
            self.global.output_log_level.as_u8().to_string(),
        );
        options.insert(
            "global.file_log_level".into(),
            self.global.file_log_level.as_u8().to_string(),
        );
        options.insert(
            "global.log_file".into(),
            self.global
                .log_file
                .as_ref()
                .map_or_else(String::new, |p| p.display().to_string()),
        );
        options.insert("global.no_pause".into(), self.global.no_pause.to_string());
    }

    fn format_publish_options(&self, options: &mut BTreeMap<String, String>) {
        let publish = &self.publish;
        options.insert(
            "publish.default_branch".into(),
            publish.default_branch.clone(),
        );
        options.insert("publish.visibility".into(), publish.visibility.to_string());
        options.insert("publish.remote_name".into(), publish.remote_name.clone());
        options.insert("publish.token_env".into(), publish.token_env.clone());
        options.insert("publish.init_message".into(), publish.init_message.clone());
        options.insert("publish.auto_message".into(), publish.auto_message.clone());
        options.insert(
            "publish.log_dir".into(),
            publish.scratch_dir().display().to_string(),
        );
        options.insert(
            "publish.log_in_git_dir".into(),
            publish.log_in_git_dir.to_string(),
        );
    }

    fn format_tools_options(&self, options: &mut BTreeMap<String, String>) {
        options.insert("tools.git".into(), self.tools.git.display().to_string());
        options.insert("tools.gh".into(), self.tools.gh.display().to_string());
    }
}
