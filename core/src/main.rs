//! Apiary Monitor - demo runner
//!
//! Loads configuration, refreshes the fleet from the demo feed, seeds
//! recommendations and logs the dashboard.

use apiary_core::{
    ChangeNotifier, Config, Dashboard, DemoFeed, HiveRegistry, RecommendationRegistry,
    RefreshOutcome,
};
use apiary_shared::Metric;
use chrono::Utc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Recommendation cards shown on the dashboard
const ACTIVE_CARD_LIMIT: usize = 3;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::load()?;

    // Initialize tracing
    let subscriber = tracing_subscriber::registry().with(
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| config.logging.filter.clone().into()),
    );
    if config.logging.json {
        subscriber
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        subscriber.with(tracing_subscriber::fmt::layer()).init();
    }

    tracing::info!("Starting Apiary Monitor");
    tracing::info!("Environment: {}", config.environment);

    let notifier = ChangeNotifier::new(config.notifications.capacity);
    let mut events = notifier.subscribe();
    let hives = HiveRegistry::from_config(&config, notifier.clone());
    let recommendations = RecommendationRegistry::new(notifier.clone());
    let dashboard = Dashboard::new(
        hives.clone(),
        recommendations.clone(),
        config.health_thresholds(),
    );

    let mut feed = DemoFeed::new(config.demo.hive_count);
    if config.demo.fail_refresh {
        feed = feed.failing();
    }

    match hives.refresh(&feed).await {
        RefreshOutcome::Applied { count, .. } => tracing::info!("Loaded {} hives", count),
        RefreshOutcome::Failed { error, .. } => {
            tracing::warn!("Sensor feed unavailable, showing last known data: {}", error)
        }
        RefreshOutcome::Superseded { .. } => {}
    }

    // Seed recommendations from the demo decision process
    let now = Utc::now();
    let hive_ids: Vec<String> = hives.list().into_iter().map(|h| h.id).collect();
    recommendations.ingest(feed.recommendations(&hive_ids, now), now)?;

    // Hives without any active recommendation get one from the advisor
    for hive in hives.list() {
        if recommendations.for_hive(&hive.id).is_empty() {
            let rec = recommendations.advise(&hive, now);
            tracing::debug!(hive_id = %hive.id, action = %rec.action, "Advisor suggestion");
        }
    }

    while let Ok(event) = events.try_recv() {
        tracing::debug!(?event, "Change event");
    }

    let summary = dashboard.summary();
    tracing::info!(
        total = summary.stats.total_hives,
        healthy = summary.stats.healthy_count,
        warning = summary.stats.warning_count,
        critical = summary.stats.critical_count,
        alerts = summary.stats.alert_count,
        offline = summary.offline,
        "Fleet summary"
    );
    if summary.averages.has_readings {
        let averages: Vec<String> = Metric::ALL
            .iter()
            .map(|metric| format!("{} {:.1}{}", metric, hives.average(*metric), metric.unit()))
            .collect();
        tracing::info!("Averages: {}", averages.join(", "));
    }

    let conditions = dashboard.fleet_conditions();
    tracing::info!(
        "Optimal conditions: temperature {}/{}, humidity {}/{}, weight {}/{}",
        conditions.optimal_temperature,
        conditions.total_hives,
        conditions.optimal_humidity,
        conditions.total_hives,
        conditions.optimal_weight,
        conditions.total_hives
    );

    for card in dashboard.recommendation_cards(ACTIVE_CARD_LIMIT) {
        tracing::info!(
            "[{}] {} - {}: {} ({})",
            card.recommendation.priority,
            card.hive_name,
            card.recommendation.action,
            card.recommendation.reason,
            card.recommendation.label_at(now)
        );
    }

    for pin in dashboard.locations() {
        if let Some(detail) = dashboard.hive_detail(&pin.id) {
            tracing::debug!(
                hive = %pin.name,
                status = %pin.status,
                computed_score = detail.computed_health_score,
                band = ?detail.health_band,
                "Hive detail"
            );
        }
    }

    Ok(())
}
