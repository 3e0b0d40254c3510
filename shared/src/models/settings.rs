//! User preference models
//!
//! Owned by the preference store and the settings screen; the registries
//! never read them.

use serde::{Deserialize, Serialize};

/// Per-user monitoring and notification preferences
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct UserSettings {
    pub temperature_alerts: bool,
    pub weight_monitoring: bool,
    pub sound_analysis: bool,
    pub push_notifications: bool,
    pub email_alerts: bool,
    pub data_backup: bool,
    pub monitoring_frequency: String,
    pub alert_threshold: String,
    pub theme: ThemePreference,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            temperature_alerts: true,
            weight_monitoring: true,
            sound_analysis: true,
            push_notifications: true,
            email_alerts: false,
            data_backup: true,
            monitoring_frequency: "Every 15 minutes".to_string(),
            alert_threshold: "Medium and High priority".to_string(),
            theme: ThemePreference::System,
        }
    }
}

impl UserSettings {
    /// Apply only the fields present in `update`
    pub fn apply(&mut self, update: SettingsUpdate) {
        if let Some(v) = update.temperature_alerts {
            self.temperature_alerts = v;
        }
        if let Some(v) = update.weight_monitoring {
            self.weight_monitoring = v;
        }
        if let Some(v) = update.sound_analysis {
            self.sound_analysis = v;
        }
        if let Some(v) = update.push_notifications {
            self.push_notifications = v;
        }
        if let Some(v) = update.email_alerts {
            self.email_alerts = v;
        }
        if let Some(v) = update.data_backup {
            self.data_backup = v;
        }
        if let Some(v) = update.monitoring_frequency {
            self.monitoring_frequency = v;
        }
        if let Some(v) = update.alert_threshold {
            self.alert_threshold = v;
        }
        if let Some(v) = update.theme {
            self.theme = v;
        }
    }
}

/// Partial settings update
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SettingsUpdate {
    pub temperature_alerts: Option<bool>,
    pub weight_monitoring: Option<bool>,
    pub sound_analysis: Option<bool>,
    pub push_notifications: Option<bool>,
    pub email_alerts: Option<bool>,
    pub data_backup: Option<bool>,
    pub monitoring_frequency: Option<String>,
    pub alert_threshold: Option<String>,
    pub theme: Option<ThemePreference>,
}

/// App colour theme
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ThemePreference {
    #[default]
    System,
    Light,
    Dark,
}
