//! Apiary Monitor core
//!
//! In-memory hive and recommendation registries, the refresh path from the
//! sensor feed, change notifications, and the dashboard read model.

pub mod config;
pub mod error;
pub mod external;
pub mod services;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use external::{DemoFeed, HiveFeed};
pub use services::{
    ChangeEvent, ChangeNotifier, Dashboard, DashboardSummary, HiveRegistry,
    RecommendationRegistry, RefreshMode, RefreshOutcome, RefreshTicket,
};
