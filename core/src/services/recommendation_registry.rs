//! Recommendation registry
//!
//! Tracks recommendations from creation to completion. Completed items stay
//! in the store and drop out of every active view. All views keep insertion
//! order.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use apiary_shared::{
    recommendations_from_payloads, suggest, AdvisorInput, HiveRecord, Priority, Recommendation,
    RecommendationPayload,
};
use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::notify::{ChangeEvent, ChangeNotifier};
use crate::error::AppResult;

/// Registry of recommendations. Clones share the same store.
#[derive(Clone, Debug)]
pub struct RecommendationRegistry {
    items: Arc<RwLock<Vec<Recommendation>>>,
    notifier: ChangeNotifier,
}

impl RecommendationRegistry {
    pub fn new(notifier: ChangeNotifier) -> Self {
        Self {
            items: Arc::new(RwLock::new(Vec::new())),
            notifier,
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Vec<Recommendation>> {
        self.items.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<Recommendation>> {
        self.items.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn collect_active<P>(&self, predicate: P) -> Vec<Recommendation>
    where
        P: Fn(&Recommendation) -> bool,
    {
        self.read()
            .iter()
            .filter(|r| r.is_active() && predicate(r))
            .cloned()
            .collect()
    }

    /// Insert a batch. Ids already in the store are skipped.
    /// Returns how many were inserted.
    pub fn insert_batch(&self, recommendations: Vec<Recommendation>) -> usize {
        let inserted = {
            let mut items = self.write();
            let mut inserted = 0;
            for rec in recommendations {
                if items.iter().any(|existing| existing.id == rec.id) {
                    warn!(recommendation_id = %rec.id, "Duplicate recommendation skipped");
                    continue;
                }
                items.push(rec);
                inserted += 1;
            }
            inserted
        };

        if inserted > 0 {
            info!(count = inserted, "Recommendations added");
            self.notifier
                .publish(ChangeEvent::RecommendationsAdded { count: inserted });
        }
        inserted
    }

    /// Validate a batch from the decision process and insert it. Nothing is
    /// inserted if any payload is malformed.
    pub fn ingest(
        &self,
        payloads: Vec<RecommendationPayload>,
        now: DateTime<Utc>,
    ) -> AppResult<usize> {
        let recommendations = recommendations_from_payloads(payloads, now)?;
        Ok(self.insert_batch(recommendations))
    }

    /// Run the rule-based advisor for one hive and store its suggestion
    pub fn advise(&self, hive: &HiveRecord, now: DateTime<Utc>) -> Recommendation {
        let suggestion = suggest(&AdvisorInput::from_hive(hive));
        let recommendation = Recommendation::new(
            Uuid::new_v4().to_string(),
            hive.id.clone(),
            suggestion.priority,
            suggestion.action.code(),
            suggestion.reason,
            "Just now",
        )
        .with_created_at(now);

        self.insert_batch(vec![recommendation.clone()]);
        recommendation
    }

    pub fn get(&self, id: &str) -> Option<Recommendation> {
        self.read().iter().find(|r| r.id == id).cloned()
    }

    /// Everything, completed included
    pub fn all(&self) -> Vec<Recommendation> {
        self.read().clone()
    }

    pub fn active(&self) -> Vec<Recommendation> {
        self.collect_active(|_| true)
    }

    pub fn by_priority(&self, priority: Priority) -> Vec<Recommendation> {
        self.collect_active(|r| r.priority == priority)
    }

    /// Active recommendations for one hive. The hive need not exist.
    pub fn for_hive(&self, hive_id: &str) -> Vec<Recommendation> {
        self.collect_active(|r| r.hive_id == hive_id)
    }

    pub fn count_by_priority(&self, priority: Priority) -> usize {
        self.read()
            .iter()
            .filter(|r| r.is_active() && r.priority == priority)
            .count()
    }

    pub fn active_count(&self) -> usize {
        self.read().iter().filter(|r| r.is_active()).count()
    }

    /// First `limit` active recommendations, for the dashboard card
    pub fn top_active(&self, limit: usize) -> Vec<Recommendation> {
        self.read()
            .iter()
            .filter(|r| r.is_active())
            .take(limit)
            .cloned()
            .collect()
    }

    /// Mark a recommendation completed. Unknown or already-completed ids are
    /// a no-op. Returns `true` when this call completed it.
    pub fn complete(&self, id: &str) -> bool {
        let transitioned = {
            let mut items = self.write();
            items
                .iter_mut()
                .find(|r| r.id == id)
                .map(|r| r.complete())
                .unwrap_or(false)
        };

        if transitioned {
            info!(recommendation_id = %id, "Recommendation completed");
            self.notifier
                .publish(ChangeEvent::RecommendationCompleted { id: id.to_string() });
        } else {
            debug!(recommendation_id = %id, "Complete ignored");
        }
        transitioned
    }
}
