//! Keyword-based task duration estimates.
//!
//! Suggests an `estimatedHours` value from a task title and priority. The
//! engine never calls this; it only feeds task construction upstream.

use serde::Serialize;

use crate::types::Priority;

/// Estimate used when a title is empty.
pub const DEFAULT_ESTIMATE_HOURS: f64 = 2.0;

/// A size bucket with the keywords that select it.
#[derive(Debug)]
struct SizeCategory {
    keywords: &'static [&'static str],
    base_hours: f64,
    min_hours: f64,
    max_hours: f64,
}

const QUICK: SizeCategory = SizeCategory {
    keywords: &[
        "review", "sync", "reply", "email", "call", "follow-up", "check", "update", "fix bug",
    ],
    base_hours: 0.75,
    min_hours: 0.5,
    max_hours: 1.0,
};

const MEDIUM: SizeCategory = SizeCategory {
    keywords: &[
        "spec", "plan", "proposal", "design", "outline", "strategy", "document", "write",
        "prepare", "analyze",
    ],
    base_hours: 2.0,
    min_hours: 1.5,
    max_hours: 3.0,
};

const LARGE: SizeCategory = SizeCategory {
    keywords: &[
        "implement",
        "build",
        "integration",
        "refactor",
        "migrate",
        "feature",
        "develop",
        "create",
        "setup",
    ],
    base_hours: 4.0,
    min_hours: 3.0,
    max_hours: 6.0,
};

const VERY_LARGE: SizeCategory = SizeCategory {
    keywords: &[
        "architecture",
        "infrastructure",
        "system",
        "platform",
        "framework",
        "overhaul",
        "redesign",
    ],
    base_hours: 6.0,
    min_hours: 6.0,
    max_hours: 8.0,
};

/// Categories in tie-break order: on equal match counts the earlier wins.
const CATEGORIES: [&SizeCategory; 4] = [&QUICK, &MEDIUM, &LARGE, &VERY_LARGE];

const fn priority_multiplier(priority: Priority) -> f64 {
    match priority {
        Priority::Low => 0.85,
        Priority::Medium => 1.0,
        Priority::High => 1.15,
    }
}

/// A suggested duration with its explanation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Estimate {
    pub estimated_hours: f64,
    pub explanation: String,
}

/// Estimates hours and explains the estimate.
pub fn estimate(title: &str, priority: Priority) -> Estimate {
    Estimate {
        estimated_hours: estimate_task_hours(title, priority),
        explanation: estimation_explanation(title, priority),
    }
}

/// Suggested hours for a task, rounded to the nearest half hour.
///
/// The category with the most keyword hits sets the base; priority scales it
/// and the category range bounds it. Titles without hits are medium-sized.
pub fn estimate_task_hours(title: &str, priority: Priority) -> f64 {
    if title.trim().is_empty() {
        return DEFAULT_ESTIMATE_HOURS;
    }

    let lower = title.to_lowercase();
    let mut category = &MEDIUM;
    let mut best_matches = 0;
    for candidate in CATEGORIES {
        let matches = candidate
            .keywords
            .iter()
            .filter(|k| lower.contains(*k))
            .count();
        if matches > best_matches {
            best_matches = matches;
            category = candidate;
        }
    }

    let hours = (category.base_hours * priority_multiplier(priority))
        .clamp(category.min_hours, category.max_hours);
    (hours * 2.0).round() / 2.0
}

/// Why [`estimate_task_hours`] picked its value, e.g.
/// `Based on "implement", "feature" and high priority`.
pub fn estimation_explanation(title: &str, priority: Priority) -> String {
    let lower = title.to_lowercase();
    let matched: Vec<&str> = CATEGORIES
        .iter()
        .flat_map(|c| c.keywords.iter().copied())
        .filter(|k| lower.contains(k))
        .collect();

    if matched.is_empty() {
        return "Based on typical task duration".to_string();
    }

    let keywords = matched
        .iter()
        .take(2)
        .map(|k| format!("\"{k}\""))
        .collect::<Vec<_>>()
        .join(", ");
    if priority == Priority::Medium {
        format!("Based on {keywords}")
    } else {
        format!("Based on {keywords} and {priority} priority")
    }
}
