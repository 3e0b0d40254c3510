//! Rule-based hive advisor
//!
//! Fallback used when no learned policy is available: looks at the current
//! readings and picks the single most urgent action. Critical conditions are
//! checked first, then warnings, then routine work.

use serde::{Deserialize, Serialize};

use crate::models::{HiveRecord, Priority};

/// Weight above which honey is considered ready (kg)
pub const HARVEST_WEIGHT_THRESHOLD: f64 = 47.0;

/// Queenless risk (%) above which a new queen is needed
pub const QUEENLESS_RISK_THRESHOLD: f64 = 50.0;

/// Interventions the advisor can suggest
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HiveAction {
    InspectHive,
    AddFood,
    AdjustVentilation,
    ControlTemperature,
    IntroduceQueen,
    HarvestHoney,
}

impl HiveAction {
    /// Action code as shown on recommendation cards
    pub fn code(&self) -> &'static str {
        match self {
            HiveAction::InspectHive => "INSPECT_HIVE",
            HiveAction::AddFood => "ADD_FOOD",
            HiveAction::AdjustVentilation => "ADJUST_VENTILATION",
            HiveAction::ControlTemperature => "CONTROL_TEMPERATURE",
            HiveAction::IntroduceQueen => "INTRODUCE_QUEEN",
            HiveAction::HarvestHoney => "HARVEST_HONEY",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            HiveAction::InspectHive => "Visual inspection to assess colony status",
            HiveAction::AddFood => "Provide sugar syrup or pollen substitute",
            HiveAction::AdjustVentilation => "Modify hive entrance or add ventilation",
            HiveAction::ControlTemperature => "Add insulation or shading to regulate temperature",
            HiveAction::IntroduceQueen => "Add new queen to queenless colony",
            HiveAction::HarvestHoney => "Extract honey when production is sufficient",
        }
    }
}

/// Readings the advisor looks at
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdvisorInput {
    pub temperature: f64,
    pub humidity: f64,
    pub weight: f64,
    /// Queenless risk from audio analysis, 0-100
    pub queenless_risk: f64,
}

impl AdvisorInput {
    /// Build from a hive record; a missing queen counts as full risk
    pub fn from_hive(hive: &HiveRecord) -> Self {
        Self {
            temperature: hive.temperature,
            humidity: hive.humidity,
            weight: hive.weight,
            queenless_risk: if hive.queen_present { 0.0 } else { 100.0 },
        }
    }
}

/// The advisor's pick
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Suggestion {
    pub action: HiveAction,
    pub priority: Priority,
    /// What the action involves, for display next to the reason
    pub description: &'static str,
    pub reason: String,
}

/// Pick one action for the given readings
pub fn suggest(input: &AdvisorInput) -> Suggestion {
    let AdvisorInput {
        temperature: temp,
        humidity: hum,
        weight,
        queenless_risk,
    } = *input;

    let (action, priority) = if queenless_risk > QUEENLESS_RISK_THRESHOLD {
        (HiveAction::IntroduceQueen, Priority::High)
    } else if !(30.0..=38.0).contains(&temp) {
        (HiveAction::ControlTemperature, Priority::High)
    } else if weight < 38.0 {
        (HiveAction::AddFood, Priority::High)
    } else if !(32.0..=36.0).contains(&temp) {
        (HiveAction::ControlTemperature, Priority::Medium)
    } else if !(50.0..=70.0).contains(&hum) {
        (HiveAction::AdjustVentilation, Priority::Medium)
    } else if weight < 40.0 {
        (HiveAction::AddFood, Priority::Medium)
    } else if weight > HARVEST_WEIGHT_THRESHOLD {
        (HiveAction::HarvestHoney, Priority::Low)
    } else {
        (HiveAction::InspectHive, Priority::Low)
    };

    Suggestion {
        action,
        priority,
        description: action.description(),
        reason: reason_for(action, input),
    }
}

fn reason_for(action: HiveAction, input: &AdvisorInput) -> String {
    match action {
        HiveAction::InspectHive => "Routine inspection recommended".to_string(),
        HiveAction::AddFood => format!(
            "Weight at {:.1}kg, colony may need supplemental feeding",
            input.weight
        ),
        HiveAction::AdjustVentilation => format!(
            "Humidity at {:.0}%, ventilation adjustment needed",
            input.humidity
        ),
        HiveAction::ControlTemperature => format!(
            "Temperature outside optimal range (currently {:.1}°C)",
            input.temperature
        ),
        HiveAction::IntroduceQueen => format!(
            "Queenless risk at {:.1}%, colony needs new queen",
            input.queenless_risk
        ),
        HiveAction::HarvestHoney => format!(
            "Weight at {:.1}kg indicates honey ready for harvest",
            input.weight
        ),
    }
}
