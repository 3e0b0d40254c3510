//! Deterministic demo feed
//!
//! Stands in for the sensor backend in the binary and in tests. Produces a
//! small fleet around Kigali with a fixed healthy/warning/critical mix, and
//! matching recommendations.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use apiary_shared::{HivePayload, RecommendationPayload};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::feed::HiveFeed;
use crate::error::{AppError, AppResult};

const BASE_LATITUDE: f64 = -1.9403;
const BASE_LONGITUDE: f64 = 29.8739;

const STATUS_CYCLE: [&str; 5] = ["healthy", "healthy", "healthy", "warning", "critical"];

const DEMO_ACTIONS: [(&str, &str, &str); 5] = [
    ("INSPECT_HIVE", "Temperature outside optimal range", "high"),
    ("HARVEST_HONEY", "Honey level at 85% - ready for harvest", "medium"),
    ("CHECK_QUEEN", "No queen detected in last inspection", "critical"),
    ("FEED_COLONY", "Weight decreased by 15% in last week", "high"),
    ("MONITOR_CLOSELY", "Swarming probability at 65%", "medium"),
];

/// Demo implementation of [`HiveFeed`]
#[derive(Debug)]
pub struct DemoFeed {
    hive_count: usize,
    fail: bool,
    latency: Duration,
    fetches: AtomicU64,
}

impl DemoFeed {
    pub fn new(hive_count: usize) -> Self {
        Self {
            hive_count,
            fail: false,
            latency: Duration::ZERO,
            fetches: AtomicU64::new(0),
        }
    }

    /// A feed whose every fetch fails as if the backend were unreachable
    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Number of fetches served so far
    pub fn fetch_count(&self) -> u64 {
        self.fetches.load(Ordering::Relaxed)
    }

    /// The fleet as of the given fetch generation
    pub fn snapshot(&self, generation: u64) -> Vec<HivePayload> {
        (0..self.hive_count)
            .map(|i| demo_hive(i, generation))
            .collect()
    }

    /// Recommendations for the given hives, one per hive up to five
    pub fn recommendations(
        &self,
        hive_ids: &[String],
        now: DateTime<Utc>,
    ) -> Vec<RecommendationPayload> {
        DEMO_ACTIONS
            .iter()
            .zip(hive_ids)
            .enumerate()
            .map(|(i, ((action, reason, priority), hive_id))| RecommendationPayload {
                id: format!("rec-{}", i + 1),
                hive_id: hive_id.clone(),
                priority: priority.to_string(),
                action: action.to_string(),
                reason: reason.to_string(),
                created_label: None,
                created_at: Some(now - chrono::Duration::hours(i as i64 + 1)),
            })
            .collect()
    }
}

#[async_trait]
impl HiveFeed for DemoFeed {
    async fn fetch_hives(&self) -> AppResult<Vec<HivePayload>> {
        let generation = self.fetches.fetch_add(1, Ordering::Relaxed);

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        if self.fail {
            return Err(AppError::FeedUnavailable(
                "demo feed configured to fail".to_string(),
            ));
        }

        Ok(self.snapshot(generation))
    }
}

fn demo_hive(index: usize, generation: u64) -> HivePayload {
    let status = STATUS_CYCLE[index % STATUS_CYCLE.len()];
    // Small drift between fetches so consecutive refreshes differ
    let drift = (generation % 3) as f64 * 0.1;
    let offset = (index as f64 - 2.0) * 0.01;

    let (temperature, humidity, weight, alerts, health_score) = match status {
        "warning" => (37.0, 68.0, 40.5, 1, 70.0),
        "critical" => (38.0, 52.0, 38.2, 3, 40.0),
        _ => (33.5 + index as f64 * 0.5, 60.0, 44.0 + index as f64, 0, 90.0),
    };

    HivePayload {
        id: format!("hive-{}", index + 1),
        name: format!("Hive {}", hive_letter(index)),
        location: format!("Sector {}", hive_letter(index)),
        latitude: BASE_LATITUDE + offset,
        longitude: BASE_LONGITUDE - offset,
        status: Some(status.to_string()),
        temperature: temperature + drift,
        humidity,
        weight,
        alert_count: alerts,
        queen_present: status != "critical",
        sound_level: 42.0 + index as f64,
        health_score: Some(health_score),
        swarming_probability: if status == "warning" { 0.65 } else { 0.1 },
        last_updated: Some(Utc::now()),
    }
}

fn hive_letter(index: usize) -> String {
    let letter = (b'A' + (index % 26) as u8) as char;
    if index < 26 {
        letter.to_string()
    } else {
        format!("{}{}", letter, index / 26)
    }
}
