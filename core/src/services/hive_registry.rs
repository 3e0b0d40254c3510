//! Hive registry
//!
//! Owns the authoritative fleet of [`HiveRecord`]s. Aggregates are computed
//! from the live collection on every call, so they can never drift from it.
//!
//! Refreshes are numbered when issued. A completed refresh is applied only if
//! its number is newer than the last applied one, so a slow, older refresh can
//! never overwrite the result of a newer one. Dropping a refresh future before
//! it completes abandons it.

use std::collections::BTreeSet;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use apiary_shared::{
    clamp_health_score, clamp_probability, records_from_payloads, HivePayload, HiveRecord,
    HiveStatus, Metric,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::{debug, info, warn};

use super::notify::{ChangeEvent, ChangeNotifier};
use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::external::HiveFeed;

/// How a successful refresh is folded into the current fleet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RefreshMode {
    /// The fetched fleet replaces the current one
    #[default]
    Replace,
    /// Fetched hives replace same-id hives in place; new ids are appended;
    /// hives the feed did not mention are kept
    MergeById,
}

/// Result of one refresh
#[derive(Debug)]
pub enum RefreshOutcome {
    Applied { sequence: u64, count: usize },
    /// A newer refresh already settled; this result was discarded
    Superseded { sequence: u64, latest_applied: u64 },
    /// Fetch or ingestion failed; existing data kept, registry offline
    Failed { sequence: u64, error: AppError },
}

impl RefreshOutcome {
    pub fn sequence(&self) -> u64 {
        match self {
            RefreshOutcome::Applied { sequence, .. }
            | RefreshOutcome::Superseded { sequence, .. }
            | RefreshOutcome::Failed { sequence, .. } => *sequence,
        }
    }

    pub fn is_applied(&self) -> bool {
        matches!(self, RefreshOutcome::Applied { .. })
    }
}

#[derive(Debug, Default)]
struct HiveState {
    hives: Vec<HiveRecord>,
    offline: bool,
    last_issued: u64,
    last_applied: u64,
    pending: BTreeSet<u64>,
    last_refreshed: Option<DateTime<Utc>>,
}

impl HiveState {
    fn position(&self, id: &str) -> Option<usize> {
        self.hives.iter().position(|h| h.id == id)
    }

    fn merge(&mut self, records: Vec<HiveRecord>) {
        for record in records {
            match self.position(&record.id) {
                Some(pos) => self.hives[pos] = record,
                None => self.hives.push(record),
            }
        }
    }
}

fn read_state(state: &RwLock<HiveState>) -> RwLockReadGuard<'_, HiveState> {
    state.read().unwrap_or_else(PoisonError::into_inner)
}

fn write_state(state: &RwLock<HiveState>) -> RwLockWriteGuard<'_, HiveState> {
    state.write().unwrap_or_else(PoisonError::into_inner)
}

/// An issued, not yet settled refresh. Dropping it unsettled abandons the
/// refresh.
#[must_use = "an unsettled ticket abandons its refresh when dropped"]
#[derive(Debug)]
pub struct RefreshTicket {
    sequence: u64,
    state: Arc<RwLock<HiveState>>,
    settled: bool,
}

impl RefreshTicket {
    pub fn sequence(&self) -> u64 {
        self.sequence
    }
}

impl Drop for RefreshTicket {
    fn drop(&mut self) {
        if !self.settled {
            write_state(&self.state).pending.remove(&self.sequence);
            debug!(sequence = self.sequence, "Refresh abandoned");
        }
    }
}

/// Registry of the fleet's hives. Clones share the same fleet.
#[derive(Clone, Debug)]
pub struct HiveRegistry {
    state: Arc<RwLock<HiveState>>,
    notifier: ChangeNotifier,
    mode: RefreshMode,
    timeout: Option<Duration>,
}

impl HiveRegistry {
    pub fn new(notifier: ChangeNotifier) -> Self {
        Self {
            state: Arc::new(RwLock::new(HiveState::default())),
            notifier,
            mode: RefreshMode::Replace,
            timeout: None,
        }
    }

    pub fn from_config(config: &Config, notifier: ChangeNotifier) -> Self {
        Self::new(notifier)
            .with_mode(config.refresh.mode)
            .with_timeout(Duration::from_secs(config.refresh.timeout_secs))
    }

    pub fn with_mode(mut self, mode: RefreshMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn mode(&self) -> RefreshMode {
        self.mode
    }

    // ------------------------------------------------------------------
    // Reads
    // ------------------------------------------------------------------

    /// All hives in registration order
    pub fn list(&self) -> Vec<HiveRecord> {
        read_state(&self.state).hives.clone()
    }

    pub fn get_by_id(&self, id: &str) -> Option<HiveRecord> {
        let state = read_state(&self.state);
        state.hives.iter().find(|h| h.id == id).cloned()
    }

    pub fn len(&self) -> usize {
        read_state(&self.state).hives.len()
    }

    pub fn is_empty(&self) -> bool {
        read_state(&self.state).hives.is_empty()
    }

    pub fn count_by_status(&self, status: HiveStatus) -> usize {
        read_state(&self.state)
            .hives
            .iter()
            .filter(|h| h.status == status)
            .count()
    }

    pub fn total_alerts(&self) -> u64 {
        read_state(&self.state)
            .hives
            .iter()
            .map(|h| u64::from(h.alert_count))
            .sum()
    }

    /// Mean reading across the fleet. An empty fleet yields 0.0, which is not
    /// a real reading; check [`is_empty`](Self::is_empty) before showing it.
    pub fn average(&self, metric: Metric) -> f64 {
        let state = read_state(&self.state);
        if state.hives.is_empty() {
            return 0.0;
        }
        let total: f64 = state.hives.iter().map(|h| h.reading(metric)).sum();
        total / state.hives.len() as f64
    }

    /// True while any issued refresh is outstanding
    pub fn is_loading(&self) -> bool {
        !read_state(&self.state).pending.is_empty()
    }

    /// Sticky flag set by a failed refresh and cleared by a successful one
    pub fn is_offline(&self) -> bool {
        read_state(&self.state).offline
    }

    pub fn last_refreshed(&self) -> Option<DateTime<Utc>> {
        read_state(&self.state).last_refreshed
    }

    // ------------------------------------------------------------------
    // Mutations
    // ------------------------------------------------------------------

    /// Insert a new hive or replace the same-id hive in place.
    /// Returns `true` when the hive was new.
    ///
    /// Records built by hand or deserialized directly skip payload
    /// validation, so scores are clamped here before they are stored.
    pub fn upsert(&self, mut record: HiveRecord) -> bool {
        record.health_score = clamp_health_score(record.health_score);
        record.swarming_probability = clamp_probability(record.swarming_probability);
        let id = record.id.clone();
        let inserted = {
            let mut state = write_state(&self.state);
            match state.position(&id) {
                Some(pos) => {
                    state.hives[pos] = record;
                    false
                }
                None => {
                    state.hives.push(record);
                    true
                }
            }
        };

        debug!(hive_id = %id, inserted, "Hive upserted");
        self.notifier.publish(ChangeEvent::HiveUpserted { id });
        inserted
    }

    /// Deregister a hive. Unknown ids are a no-op.
    pub fn remove(&self, id: &str) -> Option<HiveRecord> {
        let removed = {
            let mut state = write_state(&self.state);
            state.position(id).map(|pos| state.hives.remove(pos))
        };

        match &removed {
            Some(_) => {
                debug!(hive_id = %id, "Hive removed");
                self.notifier.publish(ChangeEvent::HiveRemoved { id: id.to_string() });
            }
            None => debug!(hive_id = %id, "Remove ignored, hive not registered"),
        }
        removed
    }

    // ------------------------------------------------------------------
    // Refresh
    // ------------------------------------------------------------------

    /// Fetch the fleet from `feed` and apply it, subject to sequencing
    pub async fn refresh<F>(&self, feed: &F) -> RefreshOutcome
    where
        F: HiveFeed + ?Sized,
    {
        let ticket = self.begin_refresh();
        let fetched = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, feed.fetch_hives()).await {
                Ok(result) => result,
                Err(_) => Err(AppError::RefreshTimeout(
                    u64::try_from(limit.as_millis()).unwrap_or(u64::MAX),
                )),
            },
            None => feed.fetch_hives().await,
        };
        self.finish_refresh(ticket, fetched)
    }

    /// Issue a refresh and mark the registry loading
    pub fn begin_refresh(&self) -> RefreshTicket {
        let sequence = {
            let mut state = write_state(&self.state);
            state.last_issued += 1;
            let sequence = state.last_issued;
            state.pending.insert(sequence);
            sequence
        };
        debug!(sequence, "Refresh issued");

        RefreshTicket {
            sequence,
            state: Arc::clone(&self.state),
            settled: false,
        }
    }

    /// Settle a refresh with what the feed returned. The whole batch is
    /// validated before anything is applied.
    pub fn finish_refresh(
        &self,
        mut ticket: RefreshTicket,
        fetched: AppResult<Vec<HivePayload>>,
    ) -> RefreshOutcome {
        ticket.settled = true;
        let sequence = ticket.sequence;
        let converted =
            fetched.and_then(|payloads| records_from_payloads(payloads).map_err(AppError::from));

        let mut state = write_state(&self.state);
        state.pending.remove(&sequence);

        if sequence <= state.last_applied {
            let latest_applied = state.last_applied;
            drop(state);
            debug!(sequence, latest_applied, "Stale refresh result discarded");
            return RefreshOutcome::Superseded {
                sequence,
                latest_applied,
            };
        }
        state.last_applied = sequence;

        match converted {
            Ok(records) => {
                match self.mode {
                    RefreshMode::Replace => state.hives = records,
                    RefreshMode::MergeById => state.merge(records),
                }
                state.offline = false;
                state.last_refreshed = Some(Utc::now());
                let count = state.hives.len();
                drop(state);

                info!(sequence, count, mode = ?self.mode, "Hive refresh applied");
                self.notifier.publish(ChangeEvent::HivesRefreshed { count });
                RefreshOutcome::Applied { sequence, count }
            }
            Err(error) => {
                state.offline = true;
                drop(state);

                warn!(sequence, code = error.code(), "Hive refresh failed: {}", error);
                self.notifier.publish(ChangeEvent::RefreshFailed {
                    code: error.code(),
                    message: error.to_string(),
                });
                RefreshOutcome::Failed { sequence, error }
            }
        }
    }
}
