mod config;

pub use config::{NightSchedule, NightWindow, RoomConfig, ValveConfig};

use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// Entity id of a TRV climate actuator, e.g. `climate.livingroom_trv`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrvId(String);

impl TrvId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The bare device name, used for derived entity ids and MQTT topics.
    pub fn device_name(&self) -> &str {
        self.0.strip_prefix("climate.").unwrap_or(&self.0)
    }
}

impl From<&str> for TrvId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for TrvId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl Display for TrvId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HvacMode {
    Heat,
    Off,
}

impl HvacMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            HvacMode::Heat => "heat",
            HvacMode::Off => "off",
        }
    }

    pub fn from_state(value: &str) -> Option<Self> {
        match value {
            "heat" => Some(HvacMode::Heat),
            "off" => Some(HvacMode::Off),
            _ => None,
        }
    }
}

impl Display for HvacMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Running state as reported by the actuator itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RunningState {
    Heating,
    Idle,
    #[default]
    Unknown,
}

impl RunningState {
    pub fn from_state(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "idle" => RunningState::Idle,
            "heat" | "heating" => RunningState::Heating,
            _ => RunningState::Unknown,
        }
    }
}

/// Temperature-source selection on the actuator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorMode {
    Internal,
    External,
}

impl SensorMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SensorMode::Internal => "internal",
            SensorMode::External => "external",
        }
    }
}
