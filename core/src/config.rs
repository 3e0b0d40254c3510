//! Configuration management for the Apiary Monitor
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (config/development.toml, config/production.toml)
//! 3. Environment variable overrides with APIARY_ prefix

use apiary_shared::{
    HealthThresholds, MetricBand, MetricThresholds, DETAIL_HUMIDITY_BAND, FLEET_HUMIDITY_BAND,
    TEMPERATURE_BAND, WEIGHT_BAND,
};
use config::{Environment, File};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::services::RefreshMode;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Log filter configuration
    pub logging: LoggingConfig,

    /// Sensor feed refresh behaviour
    pub refresh: RefreshConfig,

    /// Change notification channel
    pub notifications: NotificationConfig,

    /// Health banding thresholds
    pub thresholds: ThresholdConfig,

    /// Demo feed used by the binary
    pub demo: DemoConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    /// Default `EnvFilter` directive when RUST_LOG is unset
    pub filter: String,

    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RefreshConfig {
    /// Upper bound on a single feed fetch
    pub timeout_secs: u64,

    /// Replace the whole fleet or reconcile by hive id
    pub mode: RefreshMode,
}

#[derive(Debug, Deserialize, Clone)]
pub struct NotificationConfig {
    /// Broadcast buffer per subscriber
    pub capacity: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ThresholdConfig {
    pub temperature: BandConfig,

    /// Humidity band used by fleet-wide aggregates
    pub fleet_humidity: BandConfig,

    /// Humidity band used by the per-hive detail view
    pub detail_humidity: BandConfig,

    pub weight: BandConfig,
}

#[derive(Debug, Deserialize, Clone, Copy)]
pub struct BandConfig {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DemoConfig {
    /// Number of hives the demo feed produces
    pub hive_count: usize,

    /// Make every demo refresh fail (exercises the offline path)
    pub fail_refresh: bool,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> AppResult<Self> {
        let environment =
            std::env::var("APIARY_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("logging.filter", "apiary_monitor=debug,apiary_core=debug")?
            .set_default("logging.json", false)?
            .set_default("refresh.timeout_secs", 10)?
            .set_default("refresh.mode", "replace")?
            .set_default("notifications.capacity", 64)?
            .set_default("thresholds.temperature.min", TEMPERATURE_BAND.optimal.min)?
            .set_default("thresholds.temperature.max", TEMPERATURE_BAND.optimal.max)?
            .set_default("thresholds.temperature.step", TEMPERATURE_BAND.step)?
            .set_default("thresholds.fleet_humidity.min", FLEET_HUMIDITY_BAND.optimal.min)?
            .set_default("thresholds.fleet_humidity.max", FLEET_HUMIDITY_BAND.optimal.max)?
            .set_default("thresholds.fleet_humidity.step", FLEET_HUMIDITY_BAND.step)?
            .set_default("thresholds.detail_humidity.min", DETAIL_HUMIDITY_BAND.optimal.min)?
            .set_default("thresholds.detail_humidity.max", DETAIL_HUMIDITY_BAND.optimal.max)?
            .set_default("thresholds.detail_humidity.step", DETAIL_HUMIDITY_BAND.step)?
            .set_default("thresholds.weight.min", WEIGHT_BAND.optimal.min)?
            .set_default("thresholds.weight.max", WEIGHT_BAND.optimal.max)?
            .set_default("thresholds.weight.step", WEIGHT_BAND.step)?
            .set_default("demo.hive_count", 5)?
            .set_default("demo.fail_refresh", false)?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (APIARY_ prefix)
            .add_source(
                Environment::with_prefix("APIARY")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: Config = config.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject inverted ranges, non-positive ladder steps and zero limits
    pub fn validate(&self) -> AppResult<()> {
        if self.refresh.timeout_secs == 0 {
            return Err(AppError::Configuration(
                "refresh.timeout_secs must be at least 1".to_string(),
            ));
        }
        let bands = [
            ("temperature", &self.thresholds.temperature),
            ("fleet_humidity", &self.thresholds.fleet_humidity),
            ("detail_humidity", &self.thresholds.detail_humidity),
            ("weight", &self.thresholds.weight),
        ];
        for (name, band) in bands {
            if !(band.min <= band.max) {
                return Err(AppError::Configuration(format!(
                    "thresholds.{}: min {} exceeds max {}",
                    name, band.min, band.max
                )));
            }
            if !(band.step > 0.0) {
                return Err(AppError::Configuration(format!(
                    "thresholds.{}: step must be positive",
                    name
                )));
            }
        }
        if self.notifications.capacity == 0 {
            return Err(AppError::Configuration(
                "notifications.capacity must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Threshold profiles for the health derivations
    pub fn health_thresholds(&self) -> HealthThresholds {
        let t = &self.thresholds;
        HealthThresholds {
            fleet: MetricThresholds {
                temperature: t.temperature.band(),
                humidity: t.fleet_humidity.band(),
                weight: t.weight.band(),
            },
            detail: MetricThresholds {
                temperature: t.temperature.band(),
                humidity: t.detail_humidity.band(),
                weight: t.weight.band(),
            },
        }
    }
}

impl BandConfig {
    pub fn band(&self) -> MetricBand {
        MetricBand::new(self.min, self.max, self.step)
    }
}

impl From<MetricBand> for BandConfig {
    fn from(band: MetricBand) -> Self {
        Self {
            min: band.optimal.min,
            max: band.optimal.max,
            step: band.step,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            logging: LoggingConfig {
                filter: "apiary_monitor=debug,apiary_core=debug".to_string(),
                json: false,
            },
            refresh: RefreshConfig {
                timeout_secs: 10,
                mode: RefreshMode::Replace,
            },
            notifications: NotificationConfig { capacity: 64 },
            thresholds: ThresholdConfig {
                temperature: TEMPERATURE_BAND.into(),
                fleet_humidity: FLEET_HUMIDITY_BAND.into(),
                detail_humidity: DETAIL_HUMIDITY_BAND.into(),
                weight: WEIGHT_BAND.into(),
            },
            demo: DemoConfig {
                hive_count: 5,
                fail_refresh: false,
            },
        }
    }
}
