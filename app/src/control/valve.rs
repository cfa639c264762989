use crate::control::failsafe::FailsafeMonitor;
use crate::core::time::DateTime;
use crate::core::timeseries::DataPoint;
use crate::core::unit::{DegreeCelsius, ValvePosition};
use crate::home::{HvacMode, ValveConfig};

/// Width of the zone below the close threshold in which the maximum valve
/// position is reduced to avoid overshooting the safety cutoff.
const TEMP_BUFFER: f64 = 1.0;

/// Positions below this are snapped to 0 to avoid valve chatter.
const DEAD_BAND: i64 = 10;

#[derive(Debug, Clone, Copy)]
pub struct ControlInput {
    pub return_temp: Option<DataPoint<DegreeCelsius>>,
    pub room_temp: Option<DegreeCelsius>,
    /// Night-adjusted target.
    pub target_temp: Option<DegreeCelsius>,
    pub window_open: bool,
    pub hvac_mode: HvacMode,
    pub commanded_position: ValvePosition,
    pub now: DateTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    NoAction,
    /// Return data went stale while the room is cold: force the valve open,
    /// push the target through and nudge the actuator.
    Failsafe { position: ValvePosition },
    SetPosition(ValvePosition),
}

/// The per-valve control decision, short-circuiting in order: no data /
/// window open / HVAC off, failsafe, hard safety cutoff, proportional
/// control with buffer zone.
pub fn decide(input: &ControlInput, config: &ValveConfig, failsafe: &FailsafeMonitor) -> Decision {
    let Some(return_temp) = input.return_temp else {
        return Decision::NoAction;
    };

    if input.window_open || input.hvac_mode == HvacMode::Off {
        return Decision::NoAction;
    }

    if failsafe.should_force_heating(return_temp.timestamp, input.room_temp, input.target_temp, input.now) {
        return Decision::Failsafe {
            position: ValvePosition::new(config.max_valve_position),
        };
    }

    let desired = if return_temp.value.0 >= config.close_threshold {
        ValvePosition::CLOSED
    } else {
        match (input.room_temp, input.target_temp) {
            (Some(room), Some(target)) => proportional_position(room, target, return_temp.value, config),
            _ => conservative_fallback(return_temp.value, config),
        }
    };

    if desired == input.commanded_position {
        Decision::NoAction
    } else {
        Decision::SetPosition(desired)
    }
}

fn proportional_position(
    room: DegreeCelsius,
    target: DegreeCelsius,
    return_temp: DegreeCelsius,
    config: &ValveConfig,
) -> ValvePosition {
    let effective_max = effective_max_position(return_temp, config);

    let effective_diff = (target - room).0 - config.anticipatory_offset;
    if effective_diff <= 0.0 {
        return ValvePosition::CLOSED;
    }

    let raw = (effective_diff / config.proportional_band * effective_max as f64) as i64;
    let position = raw.clamp(0, effective_max);

    if position < DEAD_BAND {
        ValvePosition::CLOSED
    } else {
        ValvePosition::new(position as u8)
    }
}

/// Full maximum in the safe zone; inside the buffer below the close
/// threshold the maximum shrinks with the remaining margin, capped at 50%
/// and never below 10% so some flow remains.
fn effective_max_position(return_temp: DegreeCelsius, config: &ValveConfig) -> i64 {
    let max = config.max_valve_position as i64;

    if return_temp.0 < config.close_threshold - TEMP_BUFFER {
        return max;
    }

    let margin = config.close_threshold - return_temp.0;
    let reduced = (config.max_valve_position as f64 * (margin / TEMP_BUFFER) * 0.5) as i64;
    reduced.max(DEAD_BAND)
}

/// Used when room or target temperature is unknown: a fixed moderate
/// position instead of full proportional control.
fn conservative_fallback(return_temp: DegreeCelsius, config: &ValveConfig) -> ValvePosition {
    let position = if return_temp.0 >= config.close_threshold - TEMP_BUFFER {
        let margin = config.close_threshold - return_temp.0;
        let reduced = (config.max_valve_position as f64 * (margin / TEMP_BUFFER) * 0.3) as i64;
        reduced.max(DEAD_BAND)
    } else {
        (config.max_valve_position as f64 * 0.7) as i64
    };

    ValvePosition::new(position.clamp(0, 100) as u8)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::time::Duration;

    fn config() -> ValveConfig {
        ValveConfig {
            climate_entity: "climate.livingroom_trv".into(),
            return_temp_sensor: "sensor.livingroom_return_temp".to_string(),
            close_threshold: 32.0,
            open_threshold: None,
            max_valve_position: 100,
            min_valve_position: 0,
            anticipatory_offset: 0.5,
            proportional_band: 2.5,
            night_schedule: None,
        }
    }

    fn now() -> DateTime {
        DateTime::from_iso("2024-11-03T12:00:00Z").unwrap()
    }

    fn input(room: f64, target: f64, return_temp: f64) -> ControlInput {
        ControlInput {
            return_temp: Some(DataPoint::new(DegreeCelsius(return_temp), now())),
            room_temp: Some(DegreeCelsius(room)),
            target_temp: Some(DegreeCelsius(target)),
            window_open: false,
            hvac_mode: HvacMode::Heat,
            commanded_position: ValvePosition::CLOSED,
            now: now(),
        }
    }

    fn failsafe() -> FailsafeMonitor {
        FailsafeMonitor::default()
    }

    #[test]
    fn test_full_demand_opens_fully() {
        //effective_diff = 3.0 - 0.5 = 2.5 over a 2.5 band -> 100%
        let decision = decide(&input(20.0, 23.0, 27.0), &config(), &failsafe());
        assert_eq!(decision, Decision::SetPosition(ValvePosition::new(100)));
    }

    #[test]
    fn test_buffer_zone_caps_position() {
        //return 31.5 is inside the 1 °C buffer below 32: max(10, 100*0.5*0.5) = 25
        let decision = decide(&input(20.0, 23.0, 31.5), &config(), &failsafe());
        match decision {
            Decision::SetPosition(p) => assert!(p <= ValvePosition::new(25), "position was {}", p),
            other => panic!("expected SetPosition, got {:?}", other),
        }
    }

    #[test]
    fn test_close_threshold_forces_zero() {
        for return_temp in [32.0, 33.0, 40.0] {
            let mut input = input(15.0, 25.0, return_temp);
            input.commanded_position = ValvePosition::new(50);

            let decision = decide(&input, &config(), &failsafe());
            assert_eq!(decision, Decision::SetPosition(ValvePosition::CLOSED));
        }
    }

    #[test]
    fn test_no_demand_when_at_or_above_target() {
        for (room, target) in [(23.0, 23.0), (23.5, 23.0), (22.6, 23.0)] {
            let mut input = input(room, target, 27.0);
            input.commanded_position = ValvePosition::new(40);

            let decision = decide(&input, &config(), &failsafe());
            assert_eq!(decision, Decision::SetPosition(ValvePosition::CLOSED), "room {}", room);
        }
    }

    #[test]
    fn test_position_monotonic_in_demand() {
        let mut last = 0u8;
        for tenths in 0..40 {
            let target = 20.0 + tenths as f64 * 0.1;
            let decision = decide(&input(20.0, target, 27.0), &config(), &failsafe());

            let position = match decision {
                Decision::SetPosition(p) => p.value(),
                Decision::NoAction => last,
                other => panic!("unexpected {:?}", other),
            };
            assert!(position >= last, "position dropped from {} to {}", last, position);
            last = position;
        }
        assert_eq!(last, 100);
    }

    #[test]
    fn test_dead_band_snaps_to_zero() {
        //effective_diff 0.2 -> raw position 8, below the 10% dead band
        let decision = decide(&input(20.0, 20.7, 27.0), &config(), &failsafe());
        assert_eq!(decision, Decision::NoAction); //already commanded 0
    }

    #[test]
    fn test_position_clamped_to_effective_max() {
        //huge demand in the buffer zone still capped
        let decision = decide(&input(10.0, 30.0, 31.5), &config(), &failsafe());
        assert_eq!(decision, Decision::SetPosition(ValvePosition::new(25)));
    }

    #[test]
    fn test_no_action_without_return_temperature() {
        let mut input = input(20.0, 23.0, 27.0);
        input.return_temp = None;

        assert_eq!(decide(&input, &config(), &failsafe()), Decision::NoAction);
    }

    #[test]
    fn test_no_action_when_window_open() {
        let mut input = input(20.0, 23.0, 27.0);
        input.window_open = true;

        assert_eq!(decide(&input, &config(), &failsafe()), Decision::NoAction);
    }

    #[test]
    fn test_no_action_when_hvac_off() {
        let mut input = input(20.0, 23.0, 27.0);
        input.hvac_mode = HvacMode::Off;

        assert_eq!(decide(&input, &config(), &failsafe()), Decision::NoAction);
    }

    #[test]
    fn test_failsafe_overrides_proportional_control() {
        let mut input = input(18.0, 21.0, 27.0);
        input.return_temp = Some(DataPoint::new(DegreeCelsius(27.0), now() - Duration::minutes(90)));

        let decision = decide(&input, &config(), &failsafe());
        assert_eq!(
            decision,
            Decision::Failsafe {
                position: ValvePosition::new(100)
            }
        );
    }

    #[test]
    fn test_failsafe_not_triggered_while_window_open() {
        let mut input = input(18.0, 21.0, 27.0);
        input.return_temp = Some(DataPoint::new(DegreeCelsius(27.0), now() - Duration::minutes(90)));
        input.window_open = true;

        assert_eq!(decide(&input, &config(), &failsafe()), Decision::NoAction);
    }

    #[test]
    fn test_fallback_without_room_temperature() {
        let mut input = input(0.0, 0.0, 27.0);
        input.room_temp = None;
        input.target_temp = None;

        //safe zone: 70% of max
        let decision = decide(&input, &config(), &failsafe());
        assert_eq!(decision, Decision::SetPosition(ValvePosition::new(70)));
    }

    #[test]
    fn test_fallback_in_buffer_zone() {
        let mut input = input(0.0, 0.0, 31.5);
        input.room_temp = None;
        input.target_temp = None;

        //max(10, 100 * 0.5 * 0.3) = 15
        let decision = decide(&input, &config(), &failsafe());
        assert_eq!(decision, Decision::SetPosition(ValvePosition::new(15)));
    }

    #[test]
    fn test_redundant_command_suppressed() {
        let mut input = input(20.0, 23.0, 27.0);
        input.commanded_position = ValvePosition::new(100);

        assert_eq!(decide(&input, &config(), &failsafe()), Decision::NoAction);
    }

    #[test]
    fn test_truncation_toward_zero() {
        //effective_diff 1.24 / 2.5 * 100 = 49.6 -> 49
        let decision = decide(&input(20.0, 21.74, 27.0), &config(), &failsafe());
        assert_eq!(decision, Decision::SetPosition(ValvePosition::new(49)));
    }
}
