//! Ingestion payloads
//!
//! Shapes delivered by the sensor feed and the recommendation producer.
//! Conversion into domain records is the only place malformed data is
//! rejected; registries receive records that already hold every invariant.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::Validate;

use crate::health::{clamp_health_score, status_for_score};
use crate::models::{
    time_ago, HiveRecord, HiveStatus, Priority, Recommendation, DEFAULT_HEALTH_SCORE,
};
use crate::types::GpsCoordinates;
use crate::validation::{
    clamp_probability, validate_coordinates, validate_humidity, validate_reading, validate_weight,
};

/// Errors raised while turning payloads into records
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Invalid hive payload {id}: {message}")]
    InvalidHive { id: String, message: String },

    #[error("Invalid recommendation payload {id}: {message}")]
    InvalidRecommendation { id: String, message: String },

    #[error("Duplicate {kind} id in batch: {id}")]
    DuplicateId { kind: &'static str, id: String },

    #[error("Malformed payload: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// One hive as delivered by the sensor/ML feed
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct HivePayload {
    #[validate(length(min = 1, message = "Hive id is required"))]
    pub id: String,
    #[validate(length(min = 1, message = "Hive name is required"))]
    pub name: String,
    #[serde(default)]
    pub location: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Free-form status string; derived from the health score when absent
    #[serde(default)]
    pub status: Option<String>,
    pub temperature: f64,
    #[validate(range(min = 0.0, max = 100.0))]
    pub humidity: f64,
    #[validate(range(min = 0.0))]
    pub weight: f64,
    #[serde(default, alias = "alerts", alias = "alertCount")]
    pub alert_count: u32,
    #[serde(default = "default_queen_present", alias = "queenPresent")]
    pub queen_present: bool,
    #[serde(default, alias = "soundLevel")]
    pub sound_level: f64,
    #[serde(default, alias = "healthScore")]
    pub health_score: Option<f64>,
    #[serde(default, alias = "swarmingProbability")]
    pub swarming_probability: f64,
    #[serde(default, alias = "lastUpdated")]
    pub last_updated: Option<DateTime<Utc>>,
}

fn default_queen_present() -> bool {
    true
}

impl HivePayload {
    /// Validate and convert into a record. Out-of-range health scores and
    /// swarming probabilities are clamped; everything else out of range is
    /// rejected.
    pub fn into_record(self) -> Result<HiveRecord, IngestError> {
        let invalid = |id: &str, message: String| IngestError::InvalidHive {
            id: id.to_string(),
            message,
        };

        self.validate()
            .map_err(|e| invalid(&self.id, e.to_string()))?;
        validate_coordinates(self.latitude, self.longitude)
            .and_then(|_| validate_reading(self.temperature))
            .and_then(|_| validate_humidity(self.humidity))
            .and_then(|_| validate_weight(self.weight))
            .and_then(|_| validate_reading(self.sound_level))
            .map_err(|msg| invalid(&self.id, msg.to_string()))?;

        let health_score = match self.health_score {
            Some(score) if score.is_nan() => {
                return Err(invalid(&self.id, "Health score must be a number".to_string()))
            }
            Some(score) => clamp_health_score(score),
            None => DEFAULT_HEALTH_SCORE,
        };
        let status = match self.status.as_deref() {
            Some(raw) => HiveStatus::parse(raw),
            None => status_for_score(health_score),
        };

        Ok(HiveRecord {
            id: self.id,
            name: self.name,
            location: self.location,
            coordinates: GpsCoordinates::new(self.latitude, self.longitude),
            status,
            temperature: self.temperature,
            humidity: self.humidity,
            weight: self.weight,
            alert_count: self.alert_count,
            queen_present: self.queen_present,
            sound_level: self.sound_level,
            health_score,
            swarming_probability: clamp_probability(self.swarming_probability),
            last_updated: self.last_updated,
        })
    }
}

/// Convert a whole batch; the first bad payload fails the batch
pub fn records_from_payloads(payloads: Vec<HivePayload>) -> Result<Vec<HiveRecord>, IngestError> {
    let mut seen = HashSet::with_capacity(payloads.len());
    let mut records = Vec::with_capacity(payloads.len());

    for payload in payloads {
        if !seen.insert(payload.id.clone()) {
            return Err(IngestError::DuplicateId {
                kind: "hive",
                id: payload.id,
            });
        }
        records.push(payload.into_record()?);
    }

    Ok(records)
}

/// Parse a JSON array of hive payloads into records
pub fn parse_hive_batch(json: &str) -> Result<Vec<HiveRecord>, IngestError> {
    let payloads: Vec<HivePayload> = serde_json::from_str(json)?;
    records_from_payloads(payloads)
}

/// One recommendation as delivered by the decision process
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RecommendationPayload {
    #[validate(length(min = 1, message = "Recommendation id is required"))]
    pub id: String,
    #[validate(length(min = 1, message = "Hive id is required"))]
    #[serde(alias = "hiveId")]
    pub hive_id: String,
    pub priority: String,
    #[validate(length(min = 1, message = "Action is required"))]
    pub action: String,
    #[serde(default)]
    pub reason: String,
    #[serde(default, alias = "time", alias = "createdLabel")]
    pub created_label: Option<String>,
    #[serde(default, alias = "createdAt")]
    pub created_at: Option<DateTime<Utc>>,
}

impl RecommendationPayload {
    /// Validate and convert; the label is derived from `created_at` when the
    /// producer did not send one
    pub fn into_recommendation(self, now: DateTime<Utc>) -> Result<Recommendation, IngestError> {
        let invalid = |id: &str, message: String| IngestError::InvalidRecommendation {
            id: id.to_string(),
            message,
        };

        self.validate()
            .map_err(|e| invalid(&self.id, e.to_string()))?;
        let priority: Priority = self
            .priority
            .parse()
            .map_err(|msg: &'static str| invalid(&self.id, msg.to_string()))?;

        let label = match (&self.created_label, self.created_at) {
            (Some(label), _) => label.clone(),
            (None, Some(created_at)) => time_ago(created_at, now),
            (None, None) => "Just now".to_string(),
        };

        let recommendation = Recommendation::new(
            self.id,
            self.hive_id,
            priority,
            self.action,
            self.reason,
            label,
        );
        Ok(match self.created_at {
            Some(created_at) => recommendation.with_created_at(created_at),
            None => recommendation,
        })
    }
}

/// Convert a whole recommendation batch; the first bad payload fails the batch
pub fn recommendations_from_payloads(
    payloads: Vec<RecommendationPayload>,
    now: DateTime<Utc>,
) -> Result<Vec<Recommendation>, IngestError> {
    let mut seen = HashSet::with_capacity(payloads.len());
    let mut recommendations = Vec::with_capacity(payloads.len());

    for payload in payloads {
        if !seen.insert(payload.id.clone()) {
            return Err(IngestError::DuplicateId {
                kind: "recommendation",
                id: payload.id,
            });
        }
        recommendations.push(payload.into_recommendation(now)?);
    }

    Ok(recommendations)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn payload(id: &str) -> HivePayload {
        HivePayload {
            id: id.to_string(),
            name: "Hive A".to_string(),
            location: "Sector A".to_string(),
            latitude: -1.94,
            longitude: 29.87,
            status: Some("healthy".to_string()),
            temperature: 34.0,
            humidity: 60.0,
            weight: 45.0,
            alert_count: 0,
            queen_present: true,
            sound_level: 0.0,
            health_score: Some(90.0),
            swarming_probability: 0.1,
            last_updated: None,
        }
    }

    #[test]
    fn test_absent_fields_take_defaults() {
        let json = r#"[{
            "id": "h1", "name": "Hive A", "latitude": -1.94, "longitude": 29.87,
            "temperature": 34.0, "humidity": 60.0, "weight": 45.0
        }]"#;

        let records = parse_hive_batch(json).unwrap();
        let hive = &records[0];

        assert!(hive.queen_present);
        assert_eq!(hive.sound_level, 0.0);
        assert_eq!(hive.health_score, DEFAULT_HEALTH_SCORE);
        assert_eq!(hive.alert_count, 0);
        assert_eq!(hive.status, HiveStatus::Healthy);
        assert_eq!(hive.location, "");
    }

    #[test]
    fn test_camel_case_aliases() {
        let json = r#"[{
            "id": "h1", "name": "Hive A", "latitude": 0.0, "longitude": 0.0,
            "status": "Warning", "temperature": 37.0, "humidity": 60.0, "weight": 45.0,
            "alertCount": 2, "queenPresent": false, "soundLevel": 48.5, "healthScore": 72.0
        }]"#;

        let hive = parse_hive_batch(json).unwrap().remove(0);

        assert_eq!(hive.alert_count, 2);
        assert!(!hive.queen_present);
        assert_eq!(hive.sound_level, 48.5);
        assert_eq!(hive.status, HiveStatus::Warning);
    }

    #[test]
    fn test_unrecognised_status_becomes_unknown() {
        let mut p = payload("h1");
        p.status = Some("purple".to_string());
        assert_eq!(p.into_record().unwrap().status, HiveStatus::Unknown);
    }

    #[test]
    fn test_out_of_range_score_is_clamped() {
        let mut p = payload("h1");
        p.health_score = Some(130.0);
        p.swarming_probability = 3.0;

        let hive = p.into_record().unwrap();
        assert_eq!(hive.health_score, 100.0);
        assert_eq!(hive.swarming_probability, 1.0);
    }

    #[test]
    fn test_rejects_bad_readings() {
        let mut p = payload("h1");
        p.humidity = 140.0;
        assert!(matches!(p.into_record(), Err(IngestError::InvalidHive { .. })));

        let mut p = payload("h2");
        p.temperature = f64::NAN;
        assert!(matches!(p.into_record(), Err(IngestError::InvalidHive { .. })));

        let mut p = payload("h3");
        p.name = String::new();
        assert!(matches!(p.into_record(), Err(IngestError::InvalidHive { .. })));
    }

    #[test]
    fn test_batch_is_all_or_nothing() {
        let mut bad = payload("h2");
        bad.weight = -1.0;

        let result = records_from_payloads(vec![payload("h1"), bad, payload("h3")]);
        assert!(result.is_err());
    }

    #[test]
    fn test_batch_rejects_duplicate_ids() {
        let result = records_from_payloads(vec![payload("h1"), payload("h1")]);
        assert!(matches!(result, Err(IngestError::DuplicateId { kind: "hive", .. })));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(parse_hive_batch("{not json"), Err(IngestError::Malformed(_))));
    }

    #[test]
    fn test_recommendation_payload_conversion() {
        let now = Utc::now();
        let json = r#"{
            "id": "r1", "hiveId": "h9", "priority": "critical",
            "action": "CHECK_QUEEN", "reason": "No queen detected in last inspection"
        }"#;
        let mut payload: RecommendationPayload = serde_json::from_str(json).unwrap();
        payload.created_at = Some(now - Duration::hours(5));

        let rec = payload.into_recommendation(now).unwrap();

        assert_eq!(rec.priority, Priority::High);
        assert_eq!(rec.hive_id, "h9");
        assert_eq!(rec.created_label, "5 hours ago");
        assert!(rec.is_active());
    }

    #[test]
    fn test_recommendation_rejects_unknown_priority() {
        let payload = RecommendationPayload {
            id: "r1".to_string(),
            hive_id: "h1".to_string(),
            priority: "urgent".to_string(),
            action: "INSPECT_HIVE".to_string(),
            reason: String::new(),
            created_label: None,
            created_at: None,
        };
        assert!(matches!(
            payload.into_recommendation(Utc::now()),
            Err(IngestError::InvalidRecommendation { .. })
        ));
    }
}
