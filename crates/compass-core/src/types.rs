//! Core input types with validation.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::dates;

/// Validation errors for engine inputs.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    /// The provided value was empty.
    #[error("{field} cannot be empty")]
    Empty { field: &'static str },

    /// An hours value was negative, NaN or infinite.
    #[error("{field} must be a finite, non-negative number, got {value}")]
    InvalidHours { field: &'static str, value: f64 },

    /// Daily capacity must be strictly positive.
    #[error("hoursPerDay must be a finite number greater than 0, got {value}")]
    NonPositiveCapacity { value: f64 },

    /// The forecast window must span at least one day.
    #[error("windowDays must be at least 1")]
    EmptyWindow,

    /// The forecast window is longer than [`CapacityConfig::MAX_WINDOW_DAYS`].
    #[error("windowDays must be at most {max}, got {value}")]
    WindowTooLarge { value: u32, max: u32 },

    /// The timezone is not a known IANA zone name.
    #[error("unknown timezone: {value}")]
    UnknownTimezone { value: String },

    /// Invalid priority value.
    #[error("invalid priority: {value}")]
    InvalidPriority { value: String },
}

/// Generates a validated string ID newtype with common trait implementations.
macro_rules! define_string_id {
    (
        $(#[$meta:meta])*
        $name:ident, $field_name:literal
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Creates a new ID after validation.
            pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
                let id = id.into();
                if id.trim().is_empty() {
                    return Err(ValidationError::Empty { field: $field_name });
                }
                Ok(Self(id))
            }

            /// Returns the ID as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = ValidationError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_string_id!(
    /// A validated calendar event identifier.
    EventId, "event ID"
);

define_string_id!(
    /// A validated task identifier.
    ///
    /// Task IDs key overflow entries and move suggestions, so they must be
    /// non-empty. Uniqueness is the caller's concern.
    TaskId, "task ID"
);

/// Task priority tier.
///
/// Variants are declared in ascending order so `Ord` ranks `High` highest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Priority {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(ValidationError::InvalidPriority {
                value: s.to_string(),
            }),
        }
    }
}

/// Category tag on a calendar event. Informational only; every event counts
/// as meeting load regardless of its kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Meeting,
    Focus,
    Personal,
}

/// A fixed calendar commitment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub id: EventId,
    pub title: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<EventKind>,
}

impl CalendarEvent {
    /// Duration in hours, never negative.
    pub fn duration_hours(&self) -> f64 {
        dates::duration_hours(self.start, self.end)
    }

    /// The day this event is booked on, by its start instant.
    pub fn day(&self, tz: Tz) -> NaiveDate {
        dates::day_of(self.start, tz)
    }
}

/// A flexible, due-dated work item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub due_date: NaiveDate,
    pub estimated_hours: f64,
    pub priority: Priority,
}

impl Task {
    /// Checks the preconditions the allocation engine relies on.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.estimated_hours.is_finite() || self.estimated_hours < 0.0 {
            return Err(ValidationError::InvalidHours {
                field: "estimatedHours",
                value: self.estimated_hours,
            });
        }
        Ok(())
    }
}

/// Capacity settings where every field is optional.
///
/// Layers merge with [`PartialCapacityConfig::merge`]; the result becomes a
/// [`CapacityConfig`] via [`CapacityConfig::from_partial`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartialCapacityConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hours_per_day: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub window_days: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
}

impl PartialCapacityConfig {
    /// Returns `self` with every field set in `overrides` replaced.
    #[must_use]
    pub fn merge(self, overrides: Self) -> Self {
        Self {
            hours_per_day: overrides.hours_per_day.or(self.hours_per_day),
            window_days: overrides.window_days.or(self.window_days),
            timezone: overrides.timezone.or(self.timezone),
        }
    }
}

/// Validated capacity settings.
///
/// Fields are private so a config with zero capacity or an empty window
/// cannot be constructed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CapacityConfig {
    hours_per_day: f64,
    window_days: u32,
    timezone: Tz,
}

impl CapacityConfig {
    pub const DEFAULT_HOURS_PER_DAY: f64 = 8.0;
    pub const DEFAULT_WINDOW_DAYS: u32 = 7;
    pub const DEFAULT_TIMEZONE: &'static str = "UTC";
    /// Longest accepted window: one leap year of days.
    pub const MAX_WINDOW_DAYS: u32 = 366;

    /// Creates a config after validation.
    pub fn new(
        hours_per_day: f64,
        window_days: u32,
        timezone: &str,
    ) -> Result<Self, ValidationError> {
        if !hours_per_day.is_finite() || hours_per_day <= 0.0 {
            return Err(ValidationError::NonPositiveCapacity {
                value: hours_per_day,
            });
        }
        if window_days == 0 {
            return Err(ValidationError::EmptyWindow);
        }
        if window_days > Self::MAX_WINDOW_DAYS {
            return Err(ValidationError::WindowTooLarge {
                value: window_days,
                max: Self::MAX_WINDOW_DAYS,
            });
        }
        let timezone = timezone
            .trim()
            .parse::<Tz>()
            .map_err(|_| ValidationError::UnknownTimezone {
                value: timezone.to_string(),
            })?;
        Ok(Self {
            hours_per_day,
            window_days,
            timezone,
        })
    }

    /// Fills unset fields with defaults, then validates.
    pub fn from_partial(partial: &PartialCapacityConfig) -> Result<Self, ValidationError> {
        Self::new(
            partial.hours_per_day.unwrap_or(Self::DEFAULT_HOURS_PER_DAY),
            partial.window_days.unwrap_or(Self::DEFAULT_WINDOW_DAYS),
            partial
                .timezone
                .as_deref()
                .unwrap_or(Self::DEFAULT_TIMEZONE),
        )
    }

    pub const fn hours_per_day(&self) -> f64 {
        self.hours_per_day
    }

    pub const fn window_days(&self) -> u32 {
        self.window_days
    }

    pub const fn timezone(&self) -> Tz {
        self.timezone
    }
}

impl Default for CapacityConfig {
    fn default() -> Self {
        Self {
            hours_per_day: Self::DEFAULT_HOURS_PER_DAY,
            window_days: Self::DEFAULT_WINDOW_DAYS,
            timezone: Tz::UTC,
        }
    }
}
