//! Command-line argument definitions.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use compass_core::Priority;
use compass_core::dates::parse_day_key;

/// Workload forecasting from calendar meetings and due-dated tasks.
///
/// Reads a JSON payload of events and tasks, spreads task hours over the
/// coming days and flags the days that are likely to overflow.
#[derive(Debug, Parser)]
#[command(name = "compass", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Forecast load and risk for each day of the window.
    Forecast {
        #[command(flatten)]
        input: InputArgs,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Explain what fills a single day of the forecast.
    Explain {
        /// The day to explain (YYYY-MM-DD).
        #[arg(value_parser = parse_day_key)]
        date: NaiveDate,

        #[command(flatten)]
        input: InputArgs,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Suggest an hour estimate for a task title.
    Estimate {
        /// The task title.
        title: String,

        /// Task priority (low, medium, high).
        #[arg(short, long, default_value = "medium")]
        priority: Priority,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Print a sample payload for the week starting today.
    Sample {
        /// Anchor date (YYYY-MM-DD).
        #[arg(long, value_parser = parse_day_key)]
        today: Option<NaiveDate>,
    },
}

impl Commands {
    /// Whether errors should be reported as a JSON body on stdout.
    pub const fn wants_json(&self) -> bool {
        match self {
            Self::Forecast { json, .. }
            | Self::Explain { json, .. }
            | Self::Estimate { json, .. } => *json,
            Self::Sample { .. } => false,
        }
    }
}

/// Where the payload comes from and which day the window starts on.
#[derive(Debug, Args)]
pub struct InputArgs {
    /// Payload file with `events`, `tasks` and `config`; `-` or absent reads stdin.
    pub input: Option<PathBuf>,

    /// First day of the window (YYYY-MM-DD); defaults to today in the
    /// configured timezone.
    #[arg(long, value_parser = parse_day_key)]
    pub today: Option<NaiveDate>,
}
