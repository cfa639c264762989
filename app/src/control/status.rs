use std::fmt::Display;

use serde::Serialize;

use crate::core::unit::{DegreeCelsius, ValvePosition};
use crate::home::HvacMode;

/// Room-level heating status, recomputed on every evaluation and never
/// stored. The order of the checks is the priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HeatingStatus {
    WindowOpen,
    Off,
    NoSensor,
    NoTarget,
    TargetReached,
    Heating,
}

impl Display for HeatingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            HeatingStatus::WindowOpen => "window_open",
            HeatingStatus::Off => "off",
            HeatingStatus::NoSensor => "no_sensor",
            HeatingStatus::NoTarget => "no_target",
            HeatingStatus::TargetReached => "target_reached",
            HeatingStatus::Heating => "heating",
        };
        write!(f, "{}", s)
    }
}

pub fn room_status(
    window_open: bool,
    hvac_mode: HvacMode,
    room_temp: Option<DegreeCelsius>,
    target_temp: Option<DegreeCelsius>,
) -> HeatingStatus {
    if window_open {
        return HeatingStatus::WindowOpen;
    }

    if hvac_mode == HvacMode::Off {
        return HeatingStatus::Off;
    }

    let Some(room) = room_temp else {
        return HeatingStatus::NoSensor;
    };

    let Some(target) = target_temp else {
        return HeatingStatus::NoTarget;
    };

    if room >= target {
        HeatingStatus::TargetReached
    } else {
        HeatingStatus::Heating
    }
}

/// Per-valve status with a human-readable reason, used only for external
/// reporting, never for control decisions.
#[derive(Debug, Clone, Serialize)]
pub struct TrvStatus {
    pub status: &'static str,
    pub reason: String,
}

pub struct TrvStatusInput {
    pub window_open: bool,
    pub hvac_mode: HvacMode,
    pub room_temp: Option<DegreeCelsius>,
    pub target_temp: Option<DegreeCelsius>,
    pub return_temp: Option<DegreeCelsius>,
    pub valve_position: ValvePosition,
    pub close_threshold: f64,
}

pub fn trv_status(input: &TrvStatusInput) -> TrvStatus {
    if input.hvac_mode == HvacMode::Off {
        return TrvStatus {
            status: "off",
            reason: "HVAC mode is off".to_string(),
        };
    }

    if input.window_open {
        return TrvStatus {
            status: "window_open",
            reason: "Window/door is open, heating disabled".to_string(),
        };
    }

    let Some(return_temp) = input.return_temp else {
        return TrvStatus {
            status: "no_sensor",
            reason: "Return temperature sensor not available".to_string(),
        };
    };

    let close = input.close_threshold;
    let buffer_start = close - 1.0;

    if return_temp.0 >= close {
        return TrvStatus {
            status: "return_high",
            reason: format!("Return temp {} >= {:.1} °C, heating stopped", return_temp, close),
        };
    }

    let in_buffer = return_temp.0 >= buffer_start;

    match (input.room_temp, input.target_temp) {
        (Some(room), Some(target)) if room >= target => TrvStatus {
            status: "target_reached",
            reason: format!(
                "Room {} >= target {}, valve at {}",
                room, target, input.valve_position
            ),
        },
        (Some(room), Some(target)) if in_buffer => TrvStatus {
            status: "conservative_heating",
            reason: format!(
                "Room {} < target {}, return {} in buffer zone ({:.1}-{:.1} °C), reduced valve {}",
                room, target, return_temp, buffer_start, close, input.valve_position
            ),
        },
        (Some(room), Some(target)) => TrvStatus {
            status: "heating",
            reason: format!(
                "Room {} < target {}, return {} safe, valve {}",
                room, target, return_temp, input.valve_position
            ),
        },
        _ => TrvStatus {
            status: if in_buffer { "conservative_heating" } else { "heating" },
            reason: format!(
                "No room temperature, return {}, conservative valve {}",
                return_temp, input.valve_position
            ),
        },
    }
}
