//! mediagate CLI - register, resolve and inspect gated media uploads

mod cli;
mod commands;
mod error;
mod settings;

#[cfg(test)]
mod tests;

use std::time::Duration;

use clap::Parser;

use cli::{AssetCommands, Cli, Commands};
use commands::assets::{run_assets_add, run_assets_list, run_assets_remove};
use commands::completions::run_completions;
use commands::inspect::{run_inspect, InspectOptions};
use commands::resolve::run_resolve;
use commands::rewrite_rules::run_rewrite_rules;
use error::CliError;
use settings::Settings;

fn main() {
    if let Err(error) = run() {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), CliError> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("mediagate=info".parse().expect("valid directive")),
        )
        .init();

    let cli = Cli::parse();
    let settings = Settings::from_env(cli.db_path, cli.uploads_url, cli.uploads_dir);

    match cli.command {
        Commands::Assets { command } => match command {
            AssetCommands::Add { path, mime } => {
                run_assets_add(&path, mime.as_deref(), &settings)?;
            }
            AssetCommands::List { limit, json } => {
                run_assets_list(limit, json, &settings.db_path)?;
            }
            AssetCommands::Remove { id } => run_assets_remove(&id, &settings.db_path)?,
        },
        Commands::Resolve { path, json } => run_resolve(&path, json, &settings)?,
        Commands::Inspect {
            path,
            if_none_match,
            if_modified_since,
            max_age,
        } => run_inspect(
            &path,
            InspectOptions {
                if_none_match,
                if_modified_since,
                max_age: Duration::from_secs(max_age),
            },
            &settings,
        )?,
        Commands::RewriteRules { server, prefix } => {
            run_rewrite_rules(server, prefix.as_deref(), &settings)?;
        }
        Commands::Completions { shell, output } => run_completions(shell, output.as_deref())?,
    }

    Ok(())
}
