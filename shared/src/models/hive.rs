//! Hive models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::health::{
    clamp_health_score, compute_health_score, HealthBand, MetricStatus, MetricThresholds,
};
use crate::types::{GpsCoordinates, Metric};

pub const DEFAULT_HEALTH_SCORE: f64 = 85.0;

/// A point-in-time snapshot of one hive's sensor readings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HiveRecord {
    pub id: String,
    pub name: String,
    pub location: String,
    pub coordinates: GpsCoordinates,
    pub status: HiveStatus,
    /// Brood temperature in °C
    pub temperature: f64,
    /// Relative humidity in %
    pub humidity: f64,
    /// Hive weight in kg
    pub weight: f64,
    pub alert_count: u32,
    pub queen_present: bool,
    /// Sound level in dB
    pub sound_level: f64,
    /// Reported health score (0-100)
    pub health_score: f64,
    /// Swarming probability (0-1)
    pub swarming_probability: f64,
    pub last_updated: Option<DateTime<Utc>>,
}

impl HiveRecord {
    /// Register a brand new hive with a fresh id and default readings
    pub fn register(
        name: impl Into<String>,
        location: impl Into<String>,
        coordinates: GpsCoordinates,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            location: location.into(),
            coordinates,
            status: HiveStatus::Healthy,
            temperature: 34.0,
            humidity: 60.0,
            weight: 45.0,
            alert_count: 0,
            queen_present: true,
            sound_level: 0.0,
            health_score: DEFAULT_HEALTH_SCORE,
            swarming_probability: 0.0,
            last_updated: Some(Utc::now()),
        }
    }

    /// Replace the reported health score, clamped into [0, 100]
    pub fn with_health_score(mut self, score: f64) -> Self {
        self.health_score = clamp_health_score(score);
        self
    }

    pub fn reading(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Temperature => self.temperature,
            Metric::Humidity => self.humidity,
            Metric::Weight => self.weight,
        }
    }

    pub fn metric_status(&self, metric: Metric, thresholds: &MetricThresholds) -> MetricStatus {
        thresholds.band(metric).classify(self.reading(metric))
    }

    pub fn temperature_status(&self, thresholds: &MetricThresholds) -> MetricStatus {
        self.metric_status(Metric::Temperature, thresholds)
    }

    pub fn humidity_status(&self, thresholds: &MetricThresholds) -> MetricStatus {
        self.metric_status(Metric::Humidity, thresholds)
    }

    pub fn weight_status(&self, thresholds: &MetricThresholds) -> MetricStatus {
        self.metric_status(Metric::Weight, thresholds)
    }

    pub fn is_optimal(&self, metric: Metric, thresholds: &MetricThresholds) -> bool {
        self.metric_status(metric, thresholds) == MetricStatus::Optimal
    }

    pub fn is_temperature_optimal(&self, thresholds: &MetricThresholds) -> bool {
        self.is_optimal(Metric::Temperature, thresholds)
    }

    pub fn is_humidity_optimal(&self, thresholds: &MetricThresholds) -> bool {
        self.is_optimal(Metric::Humidity, thresholds)
    }

    pub fn is_weight_optimal(&self, thresholds: &MetricThresholds) -> bool {
        self.is_optimal(Metric::Weight, thresholds)
    }

    /// Display band of the reported health score
    pub fn health_band(&self) -> HealthBand {
        HealthBand::from_score(self.health_score)
    }

    /// Health score derived from the current readings and alerts
    pub fn computed_health_score(&self, thresholds: &MetricThresholds) -> f64 {
        compute_health_score(
            self.temperature,
            self.humidity,
            self.weight,
            self.alert_count,
            thresholds,
        )
    }

    pub fn location_pin(&self) -> HiveLocation {
        HiveLocation {
            id: self.id.clone(),
            name: self.name.clone(),
            location: self.location.clone(),
            coordinates: self.coordinates,
            status: self.status,
        }
    }
}

/// Hive status as reported by the sensor feed
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum HiveStatus {
    Healthy,
    Warning,
    Critical,
    /// Status string the feed sent but we could not recognise
    #[serde(other)]
    Unknown,
}

impl HiveStatus {
    pub const CANONICAL: [HiveStatus; 3] =
        [HiveStatus::Healthy, HiveStatus::Warning, HiveStatus::Critical];

    /// Lenient parse: trims and ignores case, falls back to `Unknown`
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "healthy" => HiveStatus::Healthy,
            "warning" => HiveStatus::Warning,
            "critical" => HiveStatus::Critical,
            _ => HiveStatus::Unknown,
        }
    }

    /// Display severity: Critical > Warning > Healthy > Unknown.
    /// Never used to order fleet lists.
    pub fn severity(&self) -> u8 {
        match self {
            HiveStatus::Critical => 3,
            HiveStatus::Warning => 2,
            HiveStatus::Healthy => 1,
            HiveStatus::Unknown => 0,
        }
    }

    pub fn is_canonical(&self) -> bool {
        !matches!(self, HiveStatus::Unknown)
    }
}

impl std::fmt::Display for HiveStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HiveStatus::Healthy => write!(f, "Healthy"),
            HiveStatus::Warning => write!(f, "Warning"),
            HiveStatus::Critical => write!(f, "Critical"),
            HiveStatus::Unknown => write!(f, "Unknown"),
        }
    }
}

/// Map pin for a hive
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HiveLocation {
    pub id: String,
    pub name: String,
    pub location: String,
    pub coordinates: GpsCoordinates,
    pub status: HiveStatus,
}
