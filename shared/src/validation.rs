//! Validation utilities for sensor readings
//!
//! Plain checks used at the ingestion boundary. Each returns a static message
//! so callers can wrap it in their own error type.

// ============================================================================
// Sensor Reading Validations
// ============================================================================

/// Reject NaN and infinite readings
pub fn validate_reading(value: f64) -> Result<(), &'static str> {
    if !value.is_finite() {
        return Err("Reading must be a finite number");
    }
    Ok(())
}

/// Validate relative humidity is a percentage
pub fn validate_humidity(humidity: f64) -> Result<(), &'static str> {
    validate_reading(humidity)?;
    if !(0.0..=100.0).contains(&humidity) {
        return Err("Humidity must be between 0 and 100%");
    }
    Ok(())
}

/// Validate hive weight
pub fn validate_weight(weight: f64) -> Result<(), &'static str> {
    validate_reading(weight)?;
    if weight < 0.0 {
        return Err("Weight cannot be negative");
    }
    Ok(())
}

/// Validate latitude/longitude pair
pub fn validate_coordinates(latitude: f64, longitude: f64) -> Result<(), &'static str> {
    if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
        return Err("Latitude must be between -90 and 90");
    }
    if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
        return Err("Longitude must be between -180 and 180");
    }
    Ok(())
}

// ============================================================================
// Derived Value Checks
// ============================================================================

/// Clamp a probability into [0, 1]; NaN becomes 0
pub fn clamp_probability(p: f64) -> f64 {
    if p.is_nan() {
        0.0
    } else {
        p.clamp(0.0, 1.0)
    }
}
