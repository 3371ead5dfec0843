//! Forecast request payloads.
//!
//! A payload is a JSON object `{ "events": [...], "tasks": [...], "config": {...} }`
//! where every key is optional. Parsing validates everything the engine
//! assumes, so a parsed request always forecasts without error.

use std::error::Error as _;

use compass_core::{CalendarEvent, CapacityConfig, PartialCapacityConfig, Task, ValidationError};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

/// Errors from parsing or validating a request payload.
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("payload is not valid JSON")]
    InvalidJson(#[source] serde_json::Error),

    #[error("payload must be a JSON object")]
    NotAnObject,

    /// `events` or `tasks` is present but not an array.
    #[error("{field} must be an array")]
    NotAnArray { field: &'static str },

    /// An entry could not be deserialized.
    #[error("invalid {field} entry at index {index}")]
    InvalidEntry {
        field: &'static str,
        index: usize,
        #[source]
        source: serde_json::Error,
    },

    /// An entry deserialized but holds values the engine cannot use.
    #[error("invalid {field} entry at index {index}")]
    InvalidValue {
        field: &'static str,
        index: usize,
        #[source]
        source: ValidationError,
    },

    #[error("invalid config")]
    InvalidConfigShape(#[source] serde_json::Error),

    #[error("invalid config")]
    InvalidConfig(#[source] ValidationError),
}

impl RequestError {
    /// The message followed by every underlying cause.
    pub fn details(&self) -> String {
        let mut details = self.to_string();
        let mut source = self.source();
        while let Some(cause) = source {
            details.push_str(": ");
            details.push_str(&cause.to_string());
            source = cause.source();
        }
        details
    }
}

/// Error body written to stdout in `--json` mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorBody {
    pub fn from_error(err: &anyhow::Error) -> Self {
        match err.downcast_ref::<RequestError>() {
            Some(RequestError::NotAnArray { field }) => Self {
                error: format!("{field} must be an array"),
                details: None,
            },
            Some(request) => Self {
                error: "Invalid request payload".to_string(),
                details: Some(request.details()),
            },
            None => Self {
                error: "Failed to generate forecast".to_string(),
                details: Some(format!("{err:#}")),
            },
        }
    }
}

/// A parsed and validated payload.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ForecastRequest {
    pub events: Vec<CalendarEvent>,
    pub tasks: Vec<Task>,
    pub config: PartialCapacityConfig,
}

impl ForecastRequest {
    pub fn parse(payload: &str) -> Result<Self, RequestError> {
        let value: Value = serde_json::from_str(payload).map_err(RequestError::InvalidJson)?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> Result<Self, RequestError> {
        let Value::Object(mut body) = value else {
            return Err(RequestError::NotAnObject);
        };

        let events: Vec<CalendarEvent> = parse_entries("events", body.remove("events"))?;
        let tasks: Vec<Task> = parse_entries("tasks", body.remove("tasks"))?;

        for (index, task) in tasks.iter().enumerate() {
            task.validate().map_err(|source| RequestError::InvalidValue {
                field: "tasks",
                index,
                source,
            })?;
        }
        for event in events.iter().filter(|e| e.end < e.start) {
            tracing::warn!(event_id = %event.id, "event ends before it starts; it adds no load");
        }

        let config = match body.remove("config") {
            None | Some(Value::Null) => PartialCapacityConfig::default(),
            Some(value) => {
                serde_json::from_value(value).map_err(RequestError::InvalidConfigShape)?
            }
        };

        tracing::debug!(
            events = events.len(),
            tasks = tasks.len(),
            "parsed forecast request"
        );
        Ok(Self {
            events,
            tasks,
            config,
        })
    }

    /// Layers the payload's config over `defaults` and validates the result.
    pub fn capacity_config(
        &self,
        defaults: PartialCapacityConfig,
    ) -> Result<CapacityConfig, RequestError> {
        let merged = defaults.merge(self.config.clone());
        CapacityConfig::from_partial(&merged).map_err(RequestError::InvalidConfig)
    }
}

/// Deserializes an optional array, reporting the index of the first bad entry.
fn parse_entries<T: DeserializeOwned>(
    field: &'static str,
    value: Option<Value>,
) -> Result<Vec<T>, RequestError> {
    let items = match value {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::Array(items)) => items,
        Some(_) => return Err(RequestError::NotAnArray { field }),
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            serde_json::from_value(item).map_err(|source| RequestError::InvalidEntry {
                field,
                index,
                source,
            })
        })
        .collect()
}
