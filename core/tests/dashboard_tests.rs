//! Dashboard read model tests
//!
//! Covers the summary header, the fleet conditions card, the hive detail
//! view with its threshold profile, and recommendation cards for hives that
//! are no longer registered.

use apiary_core::services::dashboard::{HiveDetail, UNKNOWN_HIVE_LABEL};
use apiary_core::{ChangeNotifier, Dashboard, DemoFeed, HiveRegistry, RecommendationRegistry};
use apiary_shared::{
    GpsCoordinates, HealthBand, HealthThresholds, HiveRecord, HiveStatus, MetricStatus, Priority,
    Recommendation,
};

struct Fixture {
    hives: HiveRegistry,
    recommendations: RecommendationRegistry,
    dashboard: Dashboard,
}

fn fixture() -> Fixture {
    let notifier = ChangeNotifier::default();
    let hives = HiveRegistry::new(notifier.clone());
    let recommendations = RecommendationRegistry::new(notifier);
    let dashboard = Dashboard::new(
        hives.clone(),
        recommendations.clone(),
        HealthThresholds::default(),
    );
    Fixture {
        hives,
        recommendations,
        dashboard,
    }
}

/// The hive from the struggling-colony scenario: hot, dry, light, 3 alerts
fn struggling_hive() -> HiveRecord {
    let mut hive = HiveRecord::register("Hive E", "Sector E", GpsCoordinates::new(-1.92, 29.85));
    hive.id = "hive-5".to_string();
    hive.status = HiveStatus::Critical;
    hive.temperature = 38.0;
    hive.humidity = 52.0;
    hive.weight = 38.2;
    hive.alert_count = 3;
    hive.queen_present = false;
    hive.with_health_score(40.0)
}

fn rec(id: &str, hive_id: &str, priority: Priority) -> Recommendation {
    Recommendation::new(id, hive_id, priority, "INSPECT_HIVE", "Routine check", "Just now")
}

// ============================================================================
// Summary
// ============================================================================

#[cfg(test)]
mod summary {
    use super::*;

    #[test]
    fn empty_dashboard() {
        let f = fixture();
        let summary = f.dashboard.summary();

        assert_eq!(summary.stats.total_hives, 0);
        assert_eq!(summary.stats.healthy_count, 0);
        assert_eq!(summary.stats.alert_count, 0);
        assert!(!summary.averages.has_readings);
        assert_eq!(summary.averages.temperature, 0.0);
        assert_eq!(summary.recommendations.total(), 0);
        assert!(!summary.offline);
        assert!(!summary.loading);
        assert!(f.dashboard.recommendation_cards(3).is_empty());
    }

    #[tokio::test]
    async fn demo_fleet_summary() {
        let f = fixture();
        f.hives.refresh(&DemoFeed::new(5)).await;
        let summary = f.dashboard.summary();

        assert_eq!(summary.stats.total_hives, 5);
        assert_eq!(summary.stats.healthy_count, 3);
        assert_eq!(summary.stats.warning_count, 1);
        assert_eq!(summary.stats.critical_count, 1);
        assert_eq!(summary.stats.unknown_count, 0);
        assert_eq!(summary.stats.alert_count, 4);
        assert!(summary.averages.has_readings);
    }

    #[test]
    fn counts_active_recommendations_by_priority() {
        let f = fixture();
        f.recommendations.insert_batch(vec![
            rec("r1", "hive-1", Priority::High),
            rec("r2", "hive-1", Priority::Medium),
            rec("r3", "hive-2", Priority::High),
        ]);
        f.recommendations.complete("r3");

        let counts = f.dashboard.summary().recommendations;
        assert_eq!((counts.high, counts.medium, counts.low), (1, 1, 0));
        assert_eq!(counts.total(), 2);
    }

    #[tokio::test]
    async fn offline_flag_surfaces_in_summary() {
        let f = fixture();
        f.hives.refresh(&DemoFeed::new(2)).await;
        f.hives.refresh(&DemoFeed::new(2).failing()).await;

        let summary = f.dashboard.summary();
        assert!(summary.offline);
        assert_eq!(summary.stats.total_hives, 2);
    }
}

// ============================================================================
// Threshold profiles
// ============================================================================

#[cfg(test)]
mod profiles {
    use super::*;

    #[test]
    fn struggling_hive_detail() {
        let f = fixture();
        f.hives.upsert(struggling_hive());

        let HiveDetail {
            temperature_status,
            humidity_status,
            weight_status,
            computed_health_score,
            health_band,
            ..
        } = f.dashboard.hive_detail("hive-5").unwrap();

        assert_eq!(temperature_status, MetricStatus::High);
        assert_eq!(humidity_status, MetricStatus::Optimal);
        assert_eq!(weight_status, MetricStatus::Low);
        assert!(computed_health_score < 60.0);
        assert!((computed_health_score - 170.0 / 3.0).abs() < 1e-9);
        assert_eq!(health_band, HealthBand::Poor);
    }

    #[test]
    fn fleet_conditions_use_fleet_humidity() {
        let f = fixture();
        f.hives.upsert(struggling_hive());

        let conditions = f.dashboard.fleet_conditions();
        assert_eq!(conditions.total_hives, 1);
        assert_eq!(conditions.optimal_temperature, 0);
        assert_eq!(conditions.optimal_humidity, 0);
        assert_eq!(conditions.optimal_weight, 0);

        let fleet_score = struggling_hive().computed_health_score(&f.dashboard.thresholds().fleet);
        assert!((fleet_score - 50.0).abs() < 1e-9);
    }

    #[test]
    fn detail_for_unknown_hive_is_none() {
        let f = fixture();
        assert!(f.dashboard.hive_detail("nope").is_none());
    }

    #[test]
    fn detail_lists_active_recommendations_for_hive() {
        let f = fixture();
        f.hives.upsert(struggling_hive());
        f.recommendations.insert_batch(vec![
            rec("r1", "hive-5", Priority::High),
            rec("r2", "hive-5", Priority::Low),
            rec("r3", "hive-1", Priority::High),
        ]);
        f.recommendations.complete("r2");

        let detail = f.dashboard.hive_detail("hive-5").unwrap();
        let ids: Vec<_> = detail.recommendations.into_iter().map(|r| r.id).collect();
        assert_eq!(ids, ["r1"]);
    }

    #[test]
    fn detail_reflects_latest_readings() {
        let f = fixture();
        f.hives.upsert(struggling_hive());
        let before = f.dashboard.hive_detail("hive-5").unwrap().computed_health_score;

        let mut recovered = struggling_hive();
        recovered.temperature = 34.0;
        recovered.weight = 45.0;
        recovered.alert_count = 0;
        f.hives.upsert(recovered);

        let after = f.dashboard.hive_detail("hive-5").unwrap();
        assert!(after.computed_health_score > before);
        assert_eq!(after.temperature_status, MetricStatus::Optimal);
    }
}

// ============================================================================
// Recommendation cards and map pins
// ============================================================================

#[cfg(test)]
mod cards {
    use super::*;

    #[test]
    fn orphan_recommendation_shows_unknown_hive() {
        let f = fixture();
        f.hives.upsert(struggling_hive());
        f.recommendations.insert_batch(vec![
            rec("r1", "hive-5", Priority::High),
            rec("r2", "hive-gone", Priority::Medium),
        ]);

        let cards = f.dashboard.recommendation_cards(3);
        assert_eq!(cards.len(), 2);
        assert_eq!(cards[0].hive_name, "Hive E");
        assert_eq!(cards[1].hive_name, UNKNOWN_HIVE_LABEL);
    }

    #[test]
    fn removed_hive_leaves_its_recommendations() {
        let f = fixture();
        f.hives.upsert(struggling_hive());
        f.recommendations.insert_batch(vec![rec("r1", "hive-5", Priority::High)]);

        f.hives.remove("hive-5");

        assert_eq!(f.recommendations.for_hive("hive-5").len(), 1);
        assert_eq!(f.dashboard.recommendation_cards(3)[0].hive_name, UNKNOWN_HIVE_LABEL);
    }

    #[test]
    fn cards_respect_limit() {
        let f = fixture();
        f.recommendations.insert_batch(
            (1..=5)
                .map(|i| rec(&format!("r{}", i), "hive-1", Priority::Low))
                .collect(),
        );
        assert_eq!(f.dashboard.recommendation_cards(3).len(), 3);
    }

    #[test]
    fn advisor_fills_missing_recommendation() {
        let f = fixture();
        f.hives.upsert(struggling_hive());

        let suggestion = f.recommendations.advise(&struggling_hive(), chrono::Utc::now());
        assert_eq!(suggestion.action, "INTRODUCE_QUEEN");

        let cards = f.dashboard.recommendation_cards(3);
        assert_eq!(cards[0].recommendation.id, suggestion.id);
        assert_eq!(cards[0].hive_name, "Hive E");
    }

    #[tokio::test]
    async fn locations_follow_fleet() {
        let f = fixture();
        f.hives.refresh(&DemoFeed::new(3)).await;

        let pins = f.dashboard.locations();
        assert_eq!(pins.len(), 3);
        assert_eq!(pins[0].name, "Hive A");
    }
}
