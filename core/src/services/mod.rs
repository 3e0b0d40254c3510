//! Registries and read models for the Apiary Monitor

pub mod dashboard;
pub mod hive_registry;
pub mod notify;
pub mod recommendation_registry;

pub use dashboard::{Dashboard, DashboardSummary, UNKNOWN_HIVE_LABEL};
pub use hive_registry::{HiveRegistry, RefreshMode, RefreshOutcome, RefreshTicket};
pub use notify::{ChangeEvent, ChangeNotifier};
pub use recommendation_registry::RecommendationRegistry;
