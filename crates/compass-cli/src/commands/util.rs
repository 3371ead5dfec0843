//! Shared utilities for CLI commands.

use std::io::{self, Read};
use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use chrono_tz::Tz;
use compass_core::dates::today_in;
use serde::Serialize;

/// Reads the payload from `path`, or from stdin when `path` is absent or `-`.
pub fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        _ => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("failed to read payload from stdin")?;
            Ok(buffer)
        }
    }
}

/// The explicit anchor date, or the current date in `tz`.
pub fn resolve_today(explicit: Option<NaiveDate>, tz: Tz) -> NaiveDate {
    explicit.unwrap_or_else(|| {
        let today = today_in(tz);
        tracing::debug!(%today, timezone = tz.name(), "anchoring forecast at current date");
        today
    })
}

/// Prints `value` as pretty JSON on stdout.
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let output = serde_json::to_string_pretty(value).context("failed to serialize output")?;
    println!("{output}");
    Ok(())
}

/// Generates a 10-character progress bar for a utilization ratio.
///
/// Ratios are capped at 1.0. Any non-zero ratio below 5% gets a single block
/// for visibility.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn progress_bar(ratio: f64) -> String {
    let filled = if ratio <= 0.0 || ratio.is_nan() {
        0
    } else if ratio < 0.05 {
        1
    } else {
        (ratio * 10.0).round().min(10.0) as usize
    };

    let empty = 10 - filled;
    format!("{}{}", "█".repeat(filled), "░".repeat(empty))
}
