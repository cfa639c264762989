use crate::core::time::DateTime;
use crate::core::unit::DegreeCelsius;
use crate::home::{NightSchedule, NightWindow};

const MIN_TARGET: f64 = 5.0;
const MAX_TARGET: f64 = 30.0;
const MAX_REDUCTION: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NightAdjustment {
    pub active: bool,
    pub target: DegreeCelsius,
}

impl NightAdjustment {
    fn inactive(target: DegreeCelsius) -> Self {
        Self { active: false, target }
    }
}

/// Applies the weekly night setback to a target temperature. Without an
/// active window the target passes through unchanged.
pub fn adjusted_target(
    schedule: Option<&NightSchedule>,
    target: DegreeCelsius,
    now: DateTime,
) -> NightAdjustment {
    let Some(window) = schedule.and_then(|s| s.window_for(now.weekday())) else {
        return NightAdjustment::inactive(target);
    };

    if !is_in_window(window, now) {
        return NightAdjustment::inactive(target);
    }

    let reduction = window.temp_reduction.clamp(-MAX_REDUCTION, MAX_REDUCTION);
    let adjusted = (target + DegreeCelsius(reduction)).clamp(MIN_TARGET, MAX_TARGET);

    NightAdjustment {
        active: true,
        target: adjusted,
    }
}

fn is_in_window(window: &NightWindow, now: DateTime) -> bool {
    let time = now.time();

    if window.start_time < window.end_time {
        //same-day window
        window.start_time <= time && time < window.end_time
    } else {
        //window wraps midnight
        time >= window.start_time || time <= window.end_time
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::time::Time;
    use crate::home::NightSchedule;
    use std::collections::HashMap;

    fn schedule(start: &str, end: &str, reduction: f64) -> NightSchedule {
        let window = NightWindow {
            enabled: true,
            start_time: start.parse::<Time>().unwrap(),
            end_time: end.parse::<Time>().unwrap(),
            temp_reduction: reduction,
        };

        let days = [
            "monday",
            "tuesday",
            "wednesday",
            "thursday",
            "friday",
            "saturday",
            "sunday",
        ]
        .iter()
        .map(|day| (day.to_string(), window.clone()))
        .collect::<HashMap<_, _>>();

        NightSchedule { enabled: true, days }
    }

    //2024-11-04 is a Monday; constructed in local time so that time-of-day
    //comparisons are independent of the runner's timezone
    fn at(time: &str) -> DateTime {
        use chrono::TimeZone;

        let time: Time = time.parse().unwrap();
        chrono::Local
            .with_ymd_and_hms(2024, 11, 4, time.hour(), time.minute(), 0)
            .unwrap()
            .into()
    }

    #[test]
    fn test_midnight_wrap_inside() {
        let schedule = schedule("23:00", "06:00", -2.0);
        let adjustment = adjusted_target(Some(&schedule), DegreeCelsius(21.0), at("02:00"));

        assert!(adjustment.active);
        assert_eq!(adjustment.target, DegreeCelsius(19.0));
    }

    #[test]
    fn test_midnight_wrap_outside() {
        let schedule = schedule("23:00", "06:00", -2.0);
        let adjustment = adjusted_target(Some(&schedule), DegreeCelsius(21.0), at("12:00"));

        assert!(!adjustment.active);
        assert_eq!(adjustment.target, DegreeCelsius(21.0));
    }

    #[test]
    fn test_same_day_window_end_exclusive() {
        let schedule = schedule("01:00", "06:00", -2.0);

        assert!(adjusted_target(Some(&schedule), DegreeCelsius(21.0), at("01:00")).active);
        assert!(adjusted_target(Some(&schedule), DegreeCelsius(21.0), at("05:59")).active);
        assert!(!adjusted_target(Some(&schedule), DegreeCelsius(21.0), at("06:00")).active);
    }

    #[test]
    fn test_reduction_clamped() {
        let schedule = schedule("23:00", "06:00", -12.0);
        let adjustment = adjusted_target(Some(&schedule), DegreeCelsius(21.0), at("02:00"));

        //reduction limited to -5, result stays above the 5 °C floor
        assert_eq!(adjustment.target, DegreeCelsius(16.0));
    }

    #[test]
    fn test_adjusted_target_floor() {
        let schedule = schedule("23:00", "06:00", -5.0);
        let adjustment = adjusted_target(Some(&schedule), DegreeCelsius(7.0), at("02:00"));

        assert_eq!(adjustment.target, DegreeCelsius(5.0));
    }

    #[test]
    fn test_globally_disabled_schedule() {
        let mut schedule = schedule("23:00", "06:00", -2.0);
        schedule.enabled = false;

        let adjustment = adjusted_target(Some(&schedule), DegreeCelsius(21.0), at("02:00"));
        assert!(!adjustment.active);
    }

    #[test]
    fn test_day_disabled() {
        let mut schedule = schedule("23:00", "06:00", -2.0);
        schedule.days.get_mut("monday").unwrap().enabled = false;

        let adjustment = adjusted_target(Some(&schedule), DegreeCelsius(21.0), at("02:00"));
        assert!(!adjustment.active);
    }

    #[test]
    fn test_no_schedule() {
        let adjustment = adjusted_target(None, DegreeCelsius(21.0), at("02:00"));
        assert!(!adjustment.active);
        assert_eq!(adjustment.target, DegreeCelsius(21.0));
    }
}
