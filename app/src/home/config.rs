use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::core::time::Time;
use crate::home::TrvId;

/// One room with a shared temperature sensor, an optional window sensor and
/// an ordered list of valves. Immutable; administrative edits produce a new
/// record.
#[derive(Debug, Clone, Deserialize)]
pub struct RoomConfig {
    pub name: String,
    pub temperature_sensor: String,
    pub window_sensor: Option<String>,
    pub trvs: Vec<ValveConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ValveConfig {
    pub climate_entity: TrvId,
    pub return_temp_sensor: String,

    /// Return temperature above which heating must stop.
    #[serde(default = "default_close_threshold")]
    pub close_threshold: f64,

    /// Return temperature below which the valve may fully reopen. Kept for
    /// administrative edits and validation, not used by the control loop.
    pub open_threshold: Option<f64>,

    #[serde(default = "default_max_valve_position")]
    pub max_valve_position: u8,

    #[serde(default)]
    pub min_valve_position: u8,

    /// Subtracted from the room-target gap so the valve starts closing
    /// before the target is reached.
    #[serde(default = "default_anticipatory_offset")]
    pub anticipatory_offset: f64,

    /// Temperature span over which the position scales from 0 to max.
    #[serde(default = "default_proportional_band")]
    pub proportional_band: f64,

    pub night_schedule: Option<NightSchedule>,
}

fn default_close_threshold() -> f64 {
    32.0
}

fn default_max_valve_position() -> u8 {
    100
}

fn default_anticipatory_offset() -> f64 {
    0.5
}

fn default_proportional_band() -> f64 {
    2.5
}

impl ValveConfig {
    pub fn with_thresholds(
        &self,
        close_threshold: Option<f64>,
        open_threshold: Option<f64>,
        max_valve_position: Option<u8>,
    ) -> Self {
        Self {
            close_threshold: close_threshold.unwrap_or(self.close_threshold),
            open_threshold: open_threshold.or(self.open_threshold),
            max_valve_position: max_valve_position.unwrap_or(self.max_valve_position),
            ..self.clone()
        }
    }

    pub fn validation_issues(&self) -> Vec<String> {
        let mut issues = vec![];

        if self.max_valve_position > 100 {
            issues.push(format!(
                "max_valve_position {} exceeds 100",
                self.max_valve_position
            ));
        }

        if self.min_valve_position > self.max_valve_position {
            issues.push(format!(
                "min_valve_position {} exceeds max_valve_position {}",
                self.min_valve_position, self.max_valve_position
            ));
        }

        if self.proportional_band <= 0.0 {
            issues.push(format!("proportional_band {} is not positive", self.proportional_band));
        }

        if let Some(open) = self.open_threshold {
            if open >= self.close_threshold {
                issues.push(format!(
                    "open_threshold {} is not below close_threshold {}",
                    open, self.close_threshold
                ));
            }
        }

        issues
    }
}

/// Weekly night-setback schedule. `enabled` switches the whole feature,
/// each weekday entry can be switched individually.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NightSchedule {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub days: HashMap<String, NightWindow>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NightWindow {
    #[serde(default)]
    pub enabled: bool,
    pub start_time: Time,
    pub end_time: Time,
    pub temp_reduction: f64,
}

impl NightSchedule {
    pub fn window_for(&self, weekday: chrono::Weekday) -> Option<&NightWindow> {
        if !self.enabled {
            return None;
        }

        self.days.get(weekday_name(weekday)).filter(|w| w.enabled)
    }
}

pub fn weekday_name(weekday: chrono::Weekday) -> &'static str {
    match weekday {
        chrono::Weekday::Mon => "monday",
        chrono::Weekday::Tue => "tuesday",
        chrono::Weekday::Wed => "wednesday",
        chrono::Weekday::Thu => "thursday",
        chrono::Weekday::Fri => "friday",
        chrono::Weekday::Sat => "saturday",
        chrono::Weekday::Sun => "sunday",
    }
}
