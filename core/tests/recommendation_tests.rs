//! Recommendation registry tests
//!
//! Covers the Active -> Completed lifecycle, the active views, batch
//! ingestion from the decision process and completion notifications.

use apiary_core::{ChangeEvent, ChangeNotifier, RecommendationRegistry};
use apiary_shared::{Priority, Recommendation, RecommendationPayload};
use chrono::{Duration, Utc};
use proptest::prelude::*;
use tokio::sync::broadcast::error::TryRecvError;
use tokio_test::{assert_err, assert_ok};

fn rec(id: &str, hive_id: &str, priority: Priority) -> Recommendation {
    Recommendation::new(id, hive_id, priority, "INSPECT_HIVE", "Routine check", "1 hour ago")
}

fn registry() -> RecommendationRegistry {
    RecommendationRegistry::new(ChangeNotifier::default())
}

fn payload(id: &str, hive_id: &str, priority: &str) -> RecommendationPayload {
    RecommendationPayload {
        id: id.to_string(),
        hive_id: hive_id.to_string(),
        priority: priority.to_string(),
        action: "FEED_COLONY".to_string(),
        reason: "Weight decreased by 15% in last week".to_string(),
        created_label: None,
        created_at: None,
    }
}

// ============================================================================
// Lifecycle
// ============================================================================

#[cfg(test)]
mod lifecycle {
    use super::*;

    #[test]
    fn complete_removes_from_active_views() {
        let registry = registry();
        registry.insert_batch(vec![
            rec("r1", "hive-1", Priority::High),
            rec("r2", "hive-1", Priority::High),
        ]);

        assert!(registry.complete("r1"));

        let active: Vec<_> = registry.active().into_iter().map(|r| r.id).collect();
        assert_eq!(active, ["r2"]);
        assert_eq!(registry.count_by_priority(Priority::High), 1);
        assert!(registry.get("r1").map(|r| r.is_completed()).unwrap_or(false));
        assert_eq!(registry.all().len(), 2);
    }

    #[test]
    fn complete_is_idempotent() {
        let registry = registry();
        registry.insert_batch(vec![rec("r1", "hive-1", Priority::Low)]);

        assert!(registry.complete("r1"));
        let after_first = registry.all();
        assert!(!registry.complete("r1"));
        assert_eq!(registry.all(), after_first);
    }

    #[test]
    fn complete_unknown_id_is_noop() {
        let registry = registry();
        registry.insert_batch(vec![rec("r1", "hive-1", Priority::Low)]);

        assert!(!registry.complete("nope"));
        assert_eq!(registry.active_count(), 1);
    }

    #[test]
    fn completion_notifies_once() {
        let notifier = ChangeNotifier::default();
        let registry = RecommendationRegistry::new(notifier.clone());
        registry.insert_batch(vec![rec("r1", "hive-1", Priority::Medium)]);
        let mut rx = notifier.subscribe();

        registry.complete("r1");
        registry.complete("r1");
        registry.complete("ghost");

        assert_eq!(
            rx.try_recv().unwrap(),
            ChangeEvent::RecommendationCompleted { id: "r1".to_string() }
        );
        assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
    }
}

// ============================================================================
// Views
// ============================================================================

#[cfg(test)]
mod views {
    use super::*;

    #[test]
    fn by_priority_keeps_insertion_order() {
        let registry = registry();
        registry.insert_batch(vec![
            rec("r1", "hive-1", Priority::High),
            rec("r2", "hive-2", Priority::Low),
            rec("r3", "hive-3", Priority::High),
        ]);

        let high: Vec<_> = registry
            .by_priority(Priority::High)
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(high, ["r1", "r3"]);
    }

    #[test]
    fn for_hive_returns_active_only() {
        let registry = registry();
        registry.insert_batch(vec![
            rec("r1", "hive-1", Priority::High),
            rec("r2", "hive-1", Priority::Low),
            rec("r3", "hive-2", Priority::High),
        ]);
        registry.complete("r2");

        let for_hive: Vec<_> = registry.for_hive("hive-1").into_iter().map(|r| r.id).collect();
        assert_eq!(for_hive, ["r1"]);
        assert!(registry.for_hive("hive-9").is_empty());
    }

    #[test]
    fn top_active_limits_and_skips_completed() {
        let registry = registry();
        registry.insert_batch(
            (1..=5)
                .map(|i| rec(&format!("r{}", i), "hive-1", Priority::Medium))
                .collect(),
        );
        registry.complete("r2");

        let top: Vec<_> = registry.top_active(3).into_iter().map(|r| r.id).collect();
        assert_eq!(top, ["r1", "r3", "r4"]);
        assert!(registry.top_active(0).is_empty());
    }

    #[test]
    fn duplicate_ids_are_skipped() {
        let registry = registry();
        assert_eq!(registry.insert_batch(vec![rec("r1", "hive-1", Priority::High)]), 1);

        let inserted = registry.insert_batch(vec![
            rec("r1", "hive-2", Priority::Low),
            rec("r2", "hive-2", Priority::Low),
        ]);
        assert_eq!(inserted, 1);
        assert_eq!(registry.get("r1").map(|r| r.hive_id).as_deref(), Some("hive-1"));
    }
}

// ============================================================================
// Ingestion
// ============================================================================

#[cfg(test)]
mod ingestion {
    use super::*;

    #[test]
    fn ingest_maps_critical_to_high() {
        let registry = registry();
        let count = assert_ok!(registry.ingest(
            vec![payload("rec-1", "hive-1", "critical"), payload("rec-2", "hive-2", "medium")],
            Utc::now(),
        ));

        assert_eq!(count, 2);
        assert_eq!(registry.count_by_priority(Priority::High), 1);
        assert_eq!(registry.count_by_priority(Priority::Medium), 1);
    }

    #[test]
    fn ingest_rejects_whole_batch_on_bad_priority() {
        let registry = registry();
        assert_err!(registry.ingest(
            vec![payload("rec-1", "hive-1", "high"), payload("rec-2", "hive-2", "urgent")],
            Utc::now(),
        ));
        assert!(registry.all().is_empty());
    }

    #[test]
    fn ingest_labels_from_timestamp() {
        let registry = registry();
        let now = Utc::now();
        let mut p = payload("rec-1", "hive-1", "low");
        p.created_at = Some(now - Duration::hours(2));
        assert_ok!(registry.ingest(vec![p], now));

        let stored = registry.get("rec-1").unwrap();
        assert_eq!(stored.created_label, "2 hours ago");
    }

    #[test]
    fn insert_batch_notifies_with_count() {
        let notifier = ChangeNotifier::default();
        let mut rx = notifier.subscribe();
        let registry = RecommendationRegistry::new(notifier);

        registry.insert_batch(vec![
            rec("r1", "hive-1", Priority::High),
            rec("r2", "hive-1", Priority::Low),
        ]);
        registry.insert_batch(vec![rec("r1", "hive-1", Priority::High)]);

        assert_eq!(rx.try_recv().unwrap(), ChangeEvent::RecommendationsAdded { count: 2 });
        assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
    }
}

// ============================================================================
// Property tests
// ============================================================================

fn arb_priority() -> impl Strategy<Value = Priority> {
    prop_oneof![Just(Priority::High), Just(Priority::Medium), Just(Priority::Low)]
}

proptest! {
    /// Active recommendations are partitioned exactly by priority
    #[test]
    fn prop_priority_partition(
        entries in prop::collection::vec((arb_priority(), any::<bool>()), 0..30)
    ) {
        let registry = registry();
        registry.insert_batch(
            entries
                .iter()
                .enumerate()
                .map(|(i, (priority, _))| rec(&format!("r{}", i), "hive-1", *priority))
                .collect(),
        );
        for (i, (_, done)) in entries.iter().enumerate() {
            if *done {
                registry.complete(&format!("r{}", i));
            }
        }

        let partition: usize = Priority::ALL
            .iter()
            .map(|p| registry.by_priority(*p).len())
            .sum();
        prop_assert_eq!(partition, registry.active().len());

        let completed = entries.iter().filter(|(_, done)| *done).count();
        prop_assert_eq!(registry.active_count(), entries.len() - completed);
    }
}
