//! Capacity Compass CLI library.
//!
//! This crate provides the CLI interface for the forecasting engine: payload
//! parsing, configuration layering and report rendering.

mod cli;
pub mod commands;
mod config;
pub mod request;

pub use cli::{Cli, Commands, InputArgs};
pub use config::Config;
pub use request::{ErrorBody, ForecastRequest, RequestError};
