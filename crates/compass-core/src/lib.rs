//! Workload forecasting engine for Capacity Compass.
//!
//! This crate contains the pure forecasting logic:
//! - Allocation: folding meetings into daily load and placing task hours
//!   backward from their due dates
//! - Risk: classifying daily utilization into tiers
//! - Suggestions: proposing moves off overloaded days
//! - Insights and explanations: human-readable summaries of a forecast
//!
//! Nothing here performs I/O or reads the clock; "today" is always an input.

pub mod allocation;
pub mod capacity;
pub mod dates;
pub mod estimate;
pub mod explain;
pub mod forecast;
pub mod insights;
pub mod risk;
pub mod suggest;
pub mod types;

pub use allocation::{Allocation, OverflowTask, allocate};
pub use capacity::{CapacityWindow, DayCapacity, TaskAllocation};
pub use dates::DateError;
pub use estimate::{Estimate, estimate, estimate_task_hours};
pub use explain::{DayExplanation, explain_day};
pub use forecast::{DayForecast, ForecastResult, ForecastSummary, generate_forecast};
pub use insights::{CapacityInsight, InsightKind, Severity, generate_insights};
pub use risk::RiskLevel;
pub use suggest::SuggestedAction;
pub use types::{
    CalendarEvent, CapacityConfig, EventId, EventKind, PartialCapacityConfig, Priority, Task,
    TaskId, ValidationError,
};
