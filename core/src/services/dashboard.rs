//! Dashboard read model
//!
//! Joins the hive and recommendation registries at read time. Nothing is
//! cached: every call reads the registries as they are now.

use apiary_shared::{
    HealthBand, HealthThresholds, HiveLocation, HiveRecord, HiveStatus, Metric, MetricStatus,
    Priority, Recommendation,
};
use serde::Serialize;

use super::hive_registry::HiveRegistry;
use super::recommendation_registry::RecommendationRegistry;

/// Label shown for recommendations whose hive is not registered
pub const UNKNOWN_HIVE_LABEL: &str = "Unknown Hive";

/// Fleet counts for the summary header
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FleetStats {
    pub total_hives: usize,
    pub healthy_count: usize,
    pub warning_count: usize,
    pub critical_count: usize,
    /// Hives whose status the feed sent in an unrecognised form
    pub unknown_count: usize,
    pub alert_count: u64,
}

/// Fleet-wide metric means
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MetricAverages {
    pub temperature: f64,
    pub humidity: f64,
    pub weight: f64,
    /// False for an empty fleet, where the means are placeholders
    pub has_readings: bool,
}

/// Active recommendation counts by priority
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PriorityCounts {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

impl PriorityCounts {
    pub fn total(&self) -> usize {
        self.high + self.medium + self.low
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DashboardSummary {
    pub stats: FleetStats,
    pub averages: MetricAverages,
    pub recommendations: PriorityCounts,
    pub offline: bool,
    pub loading: bool,
}

/// How many hives sit inside each optimal band (fleet thresholds)
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FleetConditions {
    pub total_hives: usize,
    pub optimal_temperature: usize,
    pub optimal_humidity: usize,
    pub optimal_weight: usize,
}

/// Everything the hive detail screen shows (detail thresholds)
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct HiveDetail {
    pub hive: HiveRecord,
    pub temperature_status: MetricStatus,
    pub humidity_status: MetricStatus,
    pub weight_status: MetricStatus,
    pub computed_health_score: f64,
    pub health_band: HealthBand,
    pub recommendations: Vec<Recommendation>,
}

/// A recommendation with the name of the hive it targets
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RecommendationCard {
    pub recommendation: Recommendation,
    pub hive_name: String,
}

/// Read model over both registries
#[derive(Clone, Debug)]
pub struct Dashboard {
    hives: HiveRegistry,
    recommendations: RecommendationRegistry,
    thresholds: HealthThresholds,
}

impl Dashboard {
    pub fn new(
        hives: HiveRegistry,
        recommendations: RecommendationRegistry,
        thresholds: HealthThresholds,
    ) -> Self {
        Self {
            hives,
            recommendations,
            thresholds,
        }
    }

    pub fn thresholds(&self) -> &HealthThresholds {
        &self.thresholds
    }

    pub fn summary(&self) -> DashboardSummary {
        let stats = FleetStats {
            total_hives: self.hives.len(),
            healthy_count: self.hives.count_by_status(HiveStatus::Healthy),
            warning_count: self.hives.count_by_status(HiveStatus::Warning),
            critical_count: self.hives.count_by_status(HiveStatus::Critical),
            unknown_count: self.hives.count_by_status(HiveStatus::Unknown),
            alert_count: self.hives.total_alerts(),
        };
        let averages = MetricAverages {
            temperature: self.hives.average(Metric::Temperature),
            humidity: self.hives.average(Metric::Humidity),
            weight: self.hives.average(Metric::Weight),
            has_readings: stats.total_hives > 0,
        };
        let recommendations = PriorityCounts {
            high: self.recommendations.count_by_priority(Priority::High),
            medium: self.recommendations.count_by_priority(Priority::Medium),
            low: self.recommendations.count_by_priority(Priority::Low),
        };

        DashboardSummary {
            stats,
            averages,
            recommendations,
            offline: self.hives.is_offline(),
            loading: self.hives.is_loading(),
        }
    }

    pub fn fleet_conditions(&self) -> FleetConditions {
        let fleet = &self.thresholds.fleet;
        let hives = self.hives.list();
        let count = |metric: Metric| hives.iter().filter(|h| h.is_optimal(metric, fleet)).count();

        FleetConditions {
            total_hives: hives.len(),
            optimal_temperature: count(Metric::Temperature),
            optimal_humidity: count(Metric::Humidity),
            optimal_weight: count(Metric::Weight),
        }
    }

    /// Detail view for one hive; `None` renders the empty state
    pub fn hive_detail(&self, id: &str) -> Option<HiveDetail> {
        let hive = self.hives.get_by_id(id)?;
        let detail = &self.thresholds.detail;

        Some(HiveDetail {
            temperature_status: hive.temperature_status(detail),
            humidity_status: hive.humidity_status(detail),
            weight_status: hive.weight_status(detail),
            computed_health_score: hive.computed_health_score(detail),
            health_band: hive.health_band(),
            recommendations: self.recommendations.for_hive(id),
            hive,
        })
    }

    /// Active recommendations joined with hive names. Orphans are kept and
    /// labelled [`UNKNOWN_HIVE_LABEL`].
    pub fn recommendation_cards(&self, limit: usize) -> Vec<RecommendationCard> {
        self.recommendations
            .top_active(limit)
            .into_iter()
            .map(|recommendation| {
                let hive_name = self
                    .hives
                    .get_by_id(&recommendation.hive_id)
                    .map(|h| h.name)
                    .unwrap_or_else(|| UNKNOWN_HIVE_LABEL.to_string());
                RecommendationCard {
                    recommendation,
                    hive_name,
                }
            })
            .collect()
    }

    pub fn locations(&self) -> Vec<HiveLocation> {
        self.hives.list().iter().map(HiveRecord::location_pin).collect()
    }
}
