//! Utilization-based risk tiers.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Utilization at or above which a day is medium risk.
pub const MEDIUM_UTILIZATION: f64 = 0.7;

/// Utilization at or above which a day is high risk.
pub const HIGH_UTILIZATION: f64 = 0.9;

/// Utilization strictly above which a day is critical.
pub const CRITICAL_UTILIZATION: f64 = 1.1;

/// Risk tier of a day or a whole forecast.
///
/// Variants are declared from least to most severe, so `Ord` follows
/// severity.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    #[default]
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    /// Classifies a utilization ratio (`total hours / capacity hours`).
    ///
    /// `[0, 0.7)` low, `[0.7, 0.9)` medium, `[0.9, 1.1]` high, above 1.1
    /// critical.
    pub fn from_utilization(utilization: f64) -> Self {
        if utilization < MEDIUM_UTILIZATION {
            Self::Low
        } else if utilization < HIGH_UTILIZATION {
            Self::Medium
        } else if utilization <= CRITICAL_UTILIZATION {
            Self::High
        } else {
            Self::Critical
        }
    }

    /// High and critical days are candidates for rebalancing.
    pub const fn is_overloaded(self) -> bool {
        matches!(self, Self::High | Self::Critical)
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Rounds a ratio to a whole percentage, e.g. `0.875` to `88`.
#[allow(clippy::cast_possible_truncation)]
pub fn as_percent(ratio: f64) -> i64 {
    (ratio * 100.0).round() as i64
}

/// The most severe tier among `levels`, or `Low` when there are none.
pub fn overall_risk(levels: impl IntoIterator<Item = RiskLevel>) -> RiskLevel {
    levels.into_iter().max().unwrap_or_default()
}
