// repo-publish: publish a local project directory to GitHub
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Entry point.
//!
//! ```text
//! cli::parse() --> Config --> Logging --> Command Dispatch
//!   Publish | Options | Inis | Version
//! ```

use std::process::ExitCode;

use repo_publish::cli::global::GlobalOptions;
use repo_publish::cli::{self, Command};
use repo_publish::cmd::config::{run_inis_command, run_options_command};
use repo_publish::cmd::publish::{record_startup_failure, run_publish_command};
use repo_publish::config::loader::ConfigLoader;
use repo_publish::config::types::PublishConfig;
use repo_publish::config::{CONFIG_FILE_NAME, Config, ENV_PREFIX};
use repo_publish::error::{EXIT_FAILURE, Result};
use repo_publish::logging::{LogConfig, LogLevel, init_logging};

use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = cli::parse();

    match &cli.command {
        Some(Command::Version) => {
            handle_version_command();
            return ExitCode::SUCCESS;
        }
        Some(Command::Inis) => {
            return match build_config_loader(&cli.global) {
                Ok(loader) => {
                    run_inis_command(&loader.format_loaded_files());
                    ExitCode::SUCCESS
                }
                Err(e) => failure(&e),
            };
        }
        None => {
            eprintln!("No command specified. Use --help for usage information.");
            return exit_code(EXIT_FAILURE);
        }
        Some(Command::Options | Command::Publish(_)) => {}
    }

    let config = match load_config(&cli.global) {
        Ok(config) => config,
        Err(e) => {
            let code = failure(&e);
            // Even a publish that never started leaves a log behind.
            if matches!(&cli.command, Some(Command::Publish(_)))
                && let Some(path) =
                    record_startup_failure(&PublishConfig::default().scratch_dir(), &e)
            {
                eprintln!("log: {}", path.display());
            }
            return code;
        }
    };

    // JSON output owns stdout.
    let quiet = matches!(&cli.command, Some(Command::Publish(args)) if args.json);
    let _log_guard = match init_logging(&build_log_config(&config, quiet)) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            return exit_code(EXIT_FAILURE);
        }
    };

    dispatch_command(&cli, &config).await
}

fn build_log_config(config: &Config, quiet: bool) -> LogConfig {
    let console_level = if quiet {
        LogLevel::SILENT
    } else {
        config.global.output_log_level
    };

    LogConfig::builder()
        .with_console_level(console_level)
        .with_file_level(config.global.file_log_level)
        .maybe_with_log_file(
            config
                .global
                .log_file
                .as_ref()
                .map(|p| p.display().to_string()),
        )
        .build()
}

async fn dispatch_command(cli: &cli::Cli, config: &Config) -> ExitCode {
    let result = match &cli.command {
        Some(Command::Options) => {
            run_options_command(config);
            Ok(0)
        }
        Some(Command::Publish(args)) => run_publish_command(args, config).await,
        _ => Ok(0),
    };

    match result {
        Ok(code) => exit_code(code),
        Err(e) => failure(&e),
    }
}

fn handle_version_command() {
    println!("{}", env!("CARGO_PKG_VERSION"));
}

/// Sources in increasing priority: `repo-publish.toml`, `--ini` files,
/// `RPUB_*` environment, then `--set` and the other global flags.
fn build_config_loader(global: &GlobalOptions) -> Result<ConfigLoader> {
    let mut loader = ConfigLoader::new().add_toml_file_optional(CONFIG_FILE_NAME);
    for ini_path in &global.inis {
        loader = loader.add_toml_file(ini_path);
    }
    loader = loader.with_env_prefix(ENV_PREFIX);
    for spec in global.to_config_overrides() {
        loader = loader.set_override(&spec)?;
    }
    Ok(loader)
}

fn load_config(global: &GlobalOptions) -> Result<Config> {
    build_config_loader(global)?.build()
}

fn failure(e: &anyhow::Error) -> ExitCode {
    eprintln!("Error: {e:#}");
    exit_code(EXIT_FAILURE)
}

fn exit_code(code: i32) -> ExitCode {
    ExitCode::from(u8::try_from(code).unwrap_or(1))
}
