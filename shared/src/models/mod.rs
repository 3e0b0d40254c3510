//! Domain models for the Apiary Monitor

mod hive;
mod recommendation;
mod settings;

pub use hive::*;
pub use recommendation::*;
pub use settings::*;
