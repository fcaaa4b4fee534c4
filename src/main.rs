// fleet-deploy: Bulk file deployment across repository fleets
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Entry point.
//!
//! ```text
//! cli::parse() --> ConfigLoader --> Logging --> Command Dispatch
//!   Version | Options | Configs | Deploy
//! ```

use std::process::ExitCode;

use fleet_deploy::cli::global::GlobalOptions;
use fleet_deploy::cli::{self, Command};
use fleet_deploy::cmd::config::{run_configs_command, run_options_command};
use fleet_deploy::cmd::deploy::run_deploy_command;
use fleet_deploy::config::Config;
use fleet_deploy::config::loader::ConfigLoader;
use fleet_deploy::logging::init_logging;
use fleet_deploy::logging::{LogConfig, LogLevel};

use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = cli::parse();

    let config = load_config(&cli.global);

    let log_config = build_log_config(&cli.global, config.as_ref().ok());
    let _log_guard = match init_logging(&log_config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            return ExitCode::FAILURE;
        }
    };

    dispatch_command(&cli, config).await
}

fn build_log_config(global: &GlobalOptions, config: Option<&Config>) -> LogConfig {
    let configured = config.map(|c| &c.global);

    let mut console_level = global
        .log_level
        .and_then(LogLevel::from_u8)
        .or_else(|| configured.map(|g| g.output_log_level))
        .unwrap_or(LogLevel::INFO);
    if global.debug || configured.is_some_and(|g| g.debug) {
        console_level = console_level.max(LogLevel::DEBUG);
    }

    let file_level = global
        .file_log_level
        .and_then(LogLevel::from_u8)
        .or_else(|| configured.map(|g| g.file_log_level))
        .unwrap_or(console_level);

    let log_file = global
        .log_file
        .clone()
        .or_else(|| configured.and_then(|g| g.log_file.clone()));

    LogConfig::builder()
        .with_console_level(console_level)
        .with_file_level(file_level)
        .maybe_with_log_file(log_file.map(|p| p.display().to_string()))
        .build()
}

async fn dispatch_command(
    cli: &cli::Cli,
    config: fleet_deploy::error::Result<Config>,
) -> ExitCode {
    let result = match &cli.command {
        Some(Command::Version) => {
            handle_version_command();
            Ok(())
        }
        Some(Command::Options) => config.map(|config| run_options_command(&config)),
        Some(Command::Configs) => {
            let loader = build_config_loader(&cli.global);
            run_configs_command(&loader.format_loaded_files());
            Ok(())
        }
        Some(Command::Deploy(args)) => match config {
            Ok(config) => run_deploy_command(args, &config).await,
            Err(e) => Err(e),
        },
        None => {
            eprintln!("No command specified. Use --help for usage information.");
            Err(anyhow::anyhow!("No command specified"))
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn handle_version_command() {
    println!("{}", env!("CARGO_PKG_VERSION"));
}

fn build_config_loader(global: &GlobalOptions) -> ConfigLoader {
    let mut loader = ConfigLoader::new().add_toml_file_optional("fleet.toml");
    for path in &global.configs {
        loader = loader.add_toml_file(path);
    }
    loader.with_env_prefix("FLEET")
}

fn apply_overrides(
    loader: ConfigLoader,
    global: &GlobalOptions,
) -> fleet_deploy::error::Result<ConfigLoader> {
    let workers = global.workers.and_then(|w| i64::try_from(w).ok());
    let loader = loader
        .set_opt("github.org", global.org.clone())?
        .set_opt("cohort.prefix", global.prefix.clone())?
        .set_opt("run.workers", workers)?
        .set_opt("run.max_attempts", global.max_attempts.map(i64::from))?;
    let loader = if global.dry {
        loader.set("global.dry", true)?
    } else {
        loader
    };
    if global.debug {
        loader.set("global.debug", true)
    } else {
        Ok(loader)
    }
}

fn load_config(global: &GlobalOptions) -> fleet_deploy::error::Result<Config> {
    apply_overrides(build_config_loader(global), global).and_then(ConfigLoader::build)
}
