//! Sensor feed contract
//!
//! The registry never talks to the backend itself. Whatever delivers hive
//! snapshots (HTTP client, BLE gateway, fixture) implements [`HiveFeed`] and
//! returns the full current fleet on each call.

use apiary_shared::HivePayload;
use async_trait::async_trait;

use crate::error::AppResult;

/// Source of full-fleet hive snapshots
#[async_trait]
pub trait HiveFeed: Send + Sync {
    /// Fetch every hive the account owns. Partial results are not allowed;
    /// return an error instead.
    async fn fetch_hives(&self) -> AppResult<Vec<HivePayload>>;
}
