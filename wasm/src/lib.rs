//! WebAssembly module for the Apiary Monitor
//!
//! Provides client-side computation for:
//! - Hive health scoring and banding
//! - Metric classification against the fleet or detail thresholds
//! - Offline validation of sensor payloads
//! - Rule-based action suggestions

use wasm_bindgen::prelude::*;

// Re-export shared types for use in JavaScript
pub use apiary_shared::models::*;
pub use apiary_shared::types::*;
pub use apiary_shared::validation::*;

use apiary_shared::{
    compute_health_score, status_for_score, suggest, AdvisorInput, HealthBand, HealthThresholds,
    HivePayload, MetricThresholds,
};

fn thresholds_for(profile: &str) -> Result<MetricThresholds, JsValue> {
    let thresholds = HealthThresholds::default();
    match profile {
        "fleet" => Ok(thresholds.fleet),
        "detail" => Ok(thresholds.detail),
        other => Err(JsValue::from_str(&format!(
            "Unknown threshold profile '{}', expected 'fleet' or 'detail'",
            other
        ))),
    }
}

fn parse_metric(metric: &str) -> Result<Metric, JsValue> {
    Metric::ALL
        .into_iter()
        .find(|m| m.to_string().eq_ignore_ascii_case(metric))
        .ok_or_else(|| JsValue::from_str(&format!("Unknown metric '{}'", metric)))
}

/// Composite health score (0-100) for the given readings
#[wasm_bindgen]
pub fn calculate_health_score(
    temperature: f64,
    humidity: f64,
    weight: f64,
    alert_count: u32,
    profile: &str,
) -> Result<f64, JsValue> {
    let thresholds = thresholds_for(profile)?;
    Ok(compute_health_score(
        temperature,
        humidity,
        weight,
        alert_count,
        &thresholds,
    ))
}

/// Classify one reading as Low, Optimal, High or Invalid
#[wasm_bindgen]
pub fn classify_reading(metric: &str, value: f64, profile: &str) -> Result<String, JsValue> {
    let thresholds = thresholds_for(profile)?;
    let metric = parse_metric(metric)?;
    Ok(thresholds.band(metric).classify(value).to_string())
}

/// Classify a temperature reading (°C)
#[wasm_bindgen]
pub fn classify_temperature(value: f64, profile: &str) -> Result<String, JsValue> {
    classify_reading("temperature", value, profile)
}

/// Classify a humidity reading (%); the band differs between profiles
#[wasm_bindgen]
pub fn classify_humidity(value: f64, profile: &str) -> Result<String, JsValue> {
    classify_reading("humidity", value, profile)
}

/// Hive status implied by a health score
#[wasm_bindgen]
pub fn status_for_health_score(score: f64) -> String {
    status_for_score(score).to_string()
}

/// Badge color for a health score
#[wasm_bindgen]
pub fn health_band_color(score: f64) -> String {
    HealthBand::from_score(score).color().to_string()
}

/// Validate a hive payload offline; returns the normalized record as JSON
#[wasm_bindgen]
pub fn validate_hive_payload(payload_json: &str) -> Result<String, JsValue> {
    let payload: HivePayload = serde_json::from_str(payload_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid hive JSON: {}", e)))?;
    let record = payload
        .into_record()
        .map_err(|e| JsValue::from_str(&e.to_string()))?;

    serde_json::to_string(&record).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Suggest the most urgent action for the given readings, as JSON
#[wasm_bindgen]
pub fn suggest_hive_action(
    temperature: f64,
    humidity: f64,
    weight: f64,
    queenless_risk: f64,
) -> Result<String, JsValue> {
    let suggestion = suggest(&AdvisorInput {
        temperature,
        humidity,
        weight,
        queenless_risk,
    });
    serde_json::to_string(&suggestion).map_err(|e| JsValue::from_str(&e.to_string()))
}
