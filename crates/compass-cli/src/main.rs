use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use compass_cli::commands::{estimate, explain, forecast, sample};
use compass_cli::{Cli, Commands, Config, ErrorBody};

fn run(cli: &Cli, command: &Commands) -> Result<()> {
    let config = Config::load_from(cli.config.as_deref()).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    match command {
        Commands::Forecast { input, json } => forecast::run(input, *json, &config),
        Commands::Explain { date, input, json } => explain::run(*date, input, *json, &config),
        Commands::Estimate {
            title,
            priority,
            json,
        } => estimate::run(title, *priority, *json),
        Commands::Sample { today } => sample::run(*today, &config),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Logs go to stderr so JSON output on stdout stays parseable
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    let Some(command) = &cli.command else {
        Cli::command().print_help()?;
        println!();
        return Ok(());
    };

    let result = run(&cli, command);
    if let Err(err) = &result {
        if command.wants_json() {
            let body = serde_json::to_string_pretty(&ErrorBody::from_error(err))?;
            println!("{body}");
        }
    }
    result
}
