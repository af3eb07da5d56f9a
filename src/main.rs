// decomp-forge: decompilation build pipeline
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Entry point.
//!
//! ```text
//! cli::parse() --> Logging --> Command Dispatch
//!   Configure | Progress | Options | Inis | Version
//! ```

use std::process::ExitCode;

use decomp_forge::cli::global::GlobalOptions;
use decomp_forge::cli::{self, Command};
use decomp_forge::cmd::build_config_loader;
use decomp_forge::cmd::config::{run_inis_command, run_options_command};
use decomp_forge::cmd::configure::run_configure_command;
use decomp_forge::cmd::progress::run_progress_command;
use decomp_forge::config::Config;
use decomp_forge::logging::init_logging;
use decomp_forge::logging::{LogConfig, LogLevel};

use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = cli::parse();

    let log_config = build_log_config(&cli.global);
    let _log_guard = match init_logging(&log_config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            return ExitCode::FAILURE;
        }
    };

    dispatch_command(&cli).await
}

fn build_log_config(global: &GlobalOptions) -> LogConfig {
    let console_level = global
        .log_level
        .and_then(LogLevel::from_u8)
        .unwrap_or(LogLevel::INFO);

    let file_level = global
        .file_log_level
        .and_then(LogLevel::from_u8)
        .unwrap_or(console_level);

    LogConfig::builder()
        .with_console_level(console_level)
        .with_file_level(file_level)
        .maybe_with_log_file(global.log_file.as_ref().map(|p| p.display().to_string()))
        .maybe_with_format(global.log_format)
        .build()
}

async fn dispatch_command(cli: &cli::Cli) -> ExitCode {
    let result = match &cli.command {
        Some(Command::Version) => {
            handle_version_command();
            Ok(())
        }
        Some(Command::Options) => {
            load_config(&cli.global).map(|config| run_options_command(&config))
        }
        Some(Command::Inis) => build_config_loader(&cli.global, None).map(|loader| {
            run_inis_command(&loader.format_loaded_files());
        }),
        Some(Command::Configure(args)) => run_configure_command(args, &cli.global).await,
        Some(Command::Progress(args)) => run_progress_command(args, &cli.global).await,
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

fn load_config(global: &GlobalOptions) -> decomp_forge::error::Result<Config> {
    build_config_loader(global, None)?.build().map_err(|e| {
        eprintln!("Failed to load config: {e}");
        e
    })
}
