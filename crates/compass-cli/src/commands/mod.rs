//! CLI subcommand implementations.

pub mod estimate;
pub mod explain;
pub mod forecast;
pub mod sample;
pub mod util;
