// SPDX-FileCopyrightText: 2026 Herald Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Herald - a streaming, guardrailed representative gateway.
//!
//! This is the binary entry point.

mod serve;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use herald_config::{ConfigError, HeraldConfig};

/// Herald - a streaming, guardrailed representative gateway.
#[derive(Parser, Debug)]
#[command(name = "herald", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the standard locations.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
enum Commands {
    /// Start the HTTP gateway (default).
    Serve,
    /// Validate configuration and exit.
    CheckConfig,
}

fn load_config(path: Option<&Path>) -> Result<HeraldConfig, Vec<ConfigError>> {
    match path {
        Some(path) => herald_config::load_and_validate_path(path),
        None => herald_config::load_and_validate(),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(errors) => {
            herald_config::render_errors(&errors);
            return ExitCode::FAILURE;
        }
    };

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => match serve::run_serve(config).await {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("herald: {e}");
                ExitCode::FAILURE
            }
        },
        Commands::CheckConfig => {
            println!(
                "herald: config ok (listen {}:{}, model {}, content {})",
                config.server.host, config.server.port, config.provider.model, config.content.dir
            );
            ExitCode::SUCCESS
        }
    }
}
