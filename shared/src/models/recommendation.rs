//! Recommendation models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An actionable suggestion tied to a hive
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Recommendation {
    pub id: String,
    /// Hive this applies to. Not checked against the hive registry.
    pub hive_id: String,
    pub priority: Priority,
    /// Imperative instruction (e.g. "INSPECT_HIVE")
    pub action: String,
    pub reason: String,
    /// Display label such as "2 hours ago"
    pub created_label: String,
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    completed: bool,
}

impl Recommendation {
    pub fn new(
        id: impl Into<String>,
        hive_id: impl Into<String>,
        priority: Priority,
        action: impl Into<String>,
        reason: impl Into<String>,
        created_label: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            hive_id: hive_id.into(),
            priority,
            action: action.into(),
            reason: reason.into(),
            created_label: created_label.into(),
            created_at: None,
            completed: false,
        }
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn is_active(&self) -> bool {
        !self.completed
    }

    pub fn state(&self) -> RecommendationState {
        if self.completed {
            RecommendationState::Completed
        } else {
            RecommendationState::Active
        }
    }

    /// Mark as completed. Returns `true` only if this call made the transition;
    /// a completed recommendation stays completed.
    pub fn complete(&mut self) -> bool {
        if self.completed {
            return false;
        }
        self.completed = true;
        true
    }

    /// Label relative to `now`, falling back to the stored label
    pub fn label_at(&self, now: DateTime<Utc>) -> String {
        match self.created_at {
            Some(created_at) => time_ago(created_at, now),
            None => self.created_label.clone(),
        }
    }
}

/// Recommendation priority
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    #[serde(alias = "critical")]
    High,
    Medium,
    Low,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::High, Priority::Medium, Priority::Low];
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Priority::High => write!(f, "High"),
            Priority::Medium => write!(f, "Medium"),
            Priority::Low => write!(f, "Low"),
        }
    }
}

impl std::str::FromStr for Priority {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "high" | "critical" => Ok(Priority::High),
            "medium" => Ok(Priority::Medium),
            "low" => Ok(Priority::Low),
            _ => Err("Priority must be high, medium or low"),
        }
    }
}

/// Lifecycle state: Active -> Completed, Completed is terminal
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationState {
    Active,
    Completed,
}

/// Human-readable age, e.g. "3 hours ago"
pub fn time_ago(created_at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let delta = now.signed_duration_since(created_at);

    let days = delta.num_days();
    let hours = delta.num_hours();
    let minutes = delta.num_minutes();

    if days > 0 {
        format!("{} day{} ago", days, plural(days))
    } else if hours > 0 {
        format!("{} hour{} ago", hours, plural(hours))
    } else if minutes > 0 {
        format!("{} minute{} ago", minutes, plural(minutes))
    } else {
        "Just now".to_string()
    }
}

fn plural(n: i64) -> &'static str {
    if n > 1 {
        "s"
    } else {
        ""
    }
}
