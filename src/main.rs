use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use serde::Serialize;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use psmv::cli::{Cli, Commands};
use psmv::commands;
use psmv::config::{Config, VaultPaths};

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "command failed");
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Some(Commands::Search { query, limit }) => {
            let vault = vault_paths()?.into_vault();
            print_json(&commands::search(&vault, &query, limit).results)
        }
        Some(Commands::Jewel { name }) => {
            let vault = vault_paths()?.into_vault();
            print_json(&commands::get_jewel(&vault, &name)?)
        }
        Some(Commands::List { limit }) => {
            let vault = vault_paths()?.into_vault();
            print_json(&commands::list_jewels(&vault, limit).jewels)
        }
        Some(Commands::Stream { pattern, limit }) => {
            let vault = vault_paths()?.into_vault();
            print_json(&commands::get_stream(&vault, pattern.as_deref(), limit).entries)
        }
        #[cfg(feature = "mcp")]
        Some(Commands::Serve) => {
            tokio::runtime::Runtime::new()?.block_on(psmv::mcp::serve(vault_paths()?))
        }
        Some(Commands::Unknown(_)) | None => {
            Cli::command().print_help()?;
            Ok(())
        }
    }
}

fn vault_paths() -> anyhow::Result<VaultPaths> {
    Ok(Config::load()?.vault_paths())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Logs always go to stderr; stdout carries JSON and the MCP transport.
fn init_tracing(cli: &Cli) {
    if cli.quiet {
        return;
    }

    // The server has no other output channel, so it reports startup by default
    #[cfg(feature = "mcp")]
    let level = if matches!(cli.command, Some(Commands::Serve)) {
        cli.verbose.max(1)
    } else {
        cli.verbose
    };
    #[cfg(not(feature = "mcp"))]
    let level = cli.verbose;

    let filter = match level {
        0 => "warn",
        1 => "warn,psmv=info",
        2 => "info,psmv=debug",
        _ => "trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}
