//! Shared types and models for the Apiary Monitor
//!
//! This crate contains the hive and recommendation value types, the pure
//! health derivations, and the ingestion payloads shared between the core
//! registries and the client (via WASM).

pub mod advisor;
pub mod health;
pub mod ingest;
pub mod models;
pub mod types;
pub mod validation;

pub use advisor::*;
pub use health::*;
pub use ingest::*;
pub use models::*;
pub use types::*;
pub use validation::*;
