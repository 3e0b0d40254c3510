//! Integrations with the sensor/ML backend

pub mod demo;
pub mod feed;

pub use demo::DemoFeed;
pub use feed::HiveFeed;
