//! Hive health derivation
//!
//! Per-metric banding, the composite health score and the score-to-status
//! mapping. Everything here is a pure function of its inputs; callers
//! recompute on every read instead of storing results.
//!
//! Two threshold profiles exist because the fleet overview and the per-hive
//! detail view disagree on the optimal humidity band (55-65 % vs 50-70 %).
//! Both are kept explicit in [`HealthThresholds`] until product settles on one.

use serde::{Deserialize, Serialize};

use crate::models::HiveStatus;
use crate::types::Metric;

/// Scores on the per-metric ladder, best to worst
pub const SUB_SCORE_LADDER: [f64; 4] = [100.0, 80.0, 60.0, 40.0];

/// Score deducted for every open alert
pub const ALERT_PENALTY: f64 = 10.0;

pub const MIN_HEALTH_SCORE: f64 = 0.0;
pub const MAX_HEALTH_SCORE: f64 = 100.0;

/// Inclusive optimal range for a metric
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct OptimalRange {
    pub min: f64,
    pub max: f64,
}

impl OptimalRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// Distance from the nearest edge; zero inside the range.
    /// Non-finite readings are infinitely far away.
    pub fn distance(&self, value: f64) -> f64 {
        if !value.is_finite() {
            f64::INFINITY
        } else if value < self.min {
            self.min - value
        } else if value > self.max {
            value - self.max
        } else {
            0.0
        }
    }
}

/// Optimal range plus the width of each step down the score ladder
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct MetricBand {
    pub optimal: OptimalRange,
    pub step: f64,
}

impl MetricBand {
    pub const fn new(min: f64, max: f64, step: f64) -> Self {
        Self {
            optimal: OptimalRange::new(min, max),
            step,
        }
    }

    /// Score a reading on the 100 / 80 / 60 / 40 ladder
    pub fn sub_score(&self, value: f64) -> f64 {
        let distance = self.optimal.distance(value);
        if distance <= 0.0 {
            SUB_SCORE_LADDER[0]
        } else if distance <= self.step {
            SUB_SCORE_LADDER[1]
        } else if distance <= self.step * 2.0 {
            SUB_SCORE_LADDER[2]
        } else {
            SUB_SCORE_LADDER[3]
        }
    }

    pub fn classify(&self, value: f64) -> MetricStatus {
        if !value.is_finite() {
            MetricStatus::Invalid
        } else if value < self.optimal.min {
            MetricStatus::Low
        } else if value > self.optimal.max {
            MetricStatus::High
        } else {
            MetricStatus::Optimal
        }
    }
}

/// Bands for all three scored metrics under one view
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct MetricThresholds {
    pub temperature: MetricBand,
    pub humidity: MetricBand,
    pub weight: MetricBand,
}

impl MetricThresholds {
    pub fn band(&self, metric: Metric) -> &MetricBand {
        match metric {
            Metric::Temperature => &self.temperature,
            Metric::Humidity => &self.humidity,
            Metric::Weight => &self.weight,
        }
    }
}

/// Threshold profiles for the fleet overview and the per-hive detail view
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct HealthThresholds {
    pub fleet: MetricThresholds,
    pub detail: MetricThresholds,
}

pub const TEMPERATURE_BAND: MetricBand = MetricBand::new(32.0, 36.0, 2.0);
pub const FLEET_HUMIDITY_BAND: MetricBand = MetricBand::new(55.0, 65.0, 5.0);
pub const DETAIL_HUMIDITY_BAND: MetricBand = MetricBand::new(50.0, 70.0, 5.0);
pub const WEIGHT_BAND: MetricBand = MetricBand::new(40.0, 50.0, 2.0);

impl Default for HealthThresholds {
    fn default() -> Self {
        Self {
            fleet: MetricThresholds {
                temperature: TEMPERATURE_BAND,
                humidity: FLEET_HUMIDITY_BAND,
                weight: WEIGHT_BAND,
            },
            detail: MetricThresholds {
                temperature: TEMPERATURE_BAND,
                humidity: DETAIL_HUMIDITY_BAND,
                weight: WEIGHT_BAND,
            },
        }
    }
}

/// Qualitative status of a single reading
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MetricStatus {
    Low,
    Optimal,
    High,
    /// NaN or infinite reading
    Invalid,
}

impl std::fmt::Display for MetricStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MetricStatus::Low => write!(f, "Low"),
            MetricStatus::Optimal => write!(f, "Optimal"),
            MetricStatus::High => write!(f, "High"),
            MetricStatus::Invalid => write!(f, "Invalid"),
        }
    }
}

/// Display band for a health score
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum HealthBand {
    /// Below 60
    Poor,
    /// 60 to 79
    Fair,
    /// 80 and above
    Good,
}

impl HealthBand {
    pub fn from_score(score: f64) -> Self {
        let score = clamp_health_score(score);
        if score >= 80.0 {
            HealthBand::Good
        } else if score >= 60.0 {
            HealthBand::Fair
        } else {
            HealthBand::Poor
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            HealthBand::Good => "green",
            HealthBand::Fair => "amber",
            HealthBand::Poor => "red",
        }
    }

    pub fn status(&self) -> HiveStatus {
        match self {
            HealthBand::Good => HiveStatus::Healthy,
            HealthBand::Fair => HiveStatus::Warning,
            HealthBand::Poor => HiveStatus::Critical,
        }
    }
}

impl std::fmt::Display for HealthBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HealthBand::Good => write!(f, "Good"),
            HealthBand::Fair => write!(f, "Fair"),
            HealthBand::Poor => write!(f, "Poor"),
        }
    }
}

/// Clamp into [0, 100]; NaN collapses to 0
pub fn clamp_health_score(score: f64) -> f64 {
    if score.is_nan() {
        MIN_HEALTH_SCORE
    } else {
        score.clamp(MIN_HEALTH_SCORE, MAX_HEALTH_SCORE)
    }
}

/// Composite health score: mean of the three sub-scores minus the alert
/// penalty, clamped to [0, 100]
pub fn compute_health_score(
    temperature: f64,
    humidity: f64,
    weight: f64,
    alert_count: u32,
    thresholds: &MetricThresholds,
) -> f64 {
    let mean = (thresholds.temperature.sub_score(temperature)
        + thresholds.humidity.sub_score(humidity)
        + thresholds.weight.sub_score(weight))
        / 3.0;
    clamp_health_score(mean - ALERT_PENALTY * f64::from(alert_count))
}

/// Map a health score onto a hive status (>= 80 healthy, >= 60 warning)
pub fn status_for_score(score: f64) -> HiveStatus {
    HealthBand::from_score(score).status()
}
