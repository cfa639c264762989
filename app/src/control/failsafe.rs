use crate::core::time::{DateTime, Duration};
use crate::core::unit::DegreeCelsius;

/// Guards against a dead return-temperature sensor silently starving the
/// room of heat: when return data went stale while the room is still below
/// target, normal control is overridden and the valve forced open.
#[derive(Debug, Clone)]
pub struct FailsafeMonitor {
    max_return_age: Duration,
}

impl Default for FailsafeMonitor {
    fn default() -> Self {
        Self {
            max_return_age: Duration::minutes(60),
        }
    }
}

impl FailsafeMonitor {
    pub fn should_force_heating(
        &self,
        return_temp_updated: DateTime,
        room_temp: Option<DegreeCelsius>,
        target_temp: Option<DegreeCelsius>,
        now: DateTime,
    ) -> bool {
        if now.elapsed_since(return_temp_updated) <= self.max_return_age {
            return false;
        }

        match (room_temp, target_temp) {
            (Some(room), Some(target)) => room < target,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> DateTime {
        DateTime::from_iso("2024-11-03T12:00:00Z").unwrap()
    }

    #[test]
    fn test_fires_on_stale_data_and_cold_room() {
        let monitor = FailsafeMonitor::default();

        assert!(monitor.should_force_heating(
            now() - Duration::minutes(61),
            Some(DegreeCelsius(18.0)),
            Some(DegreeCelsius(21.0)),
            now(),
        ));
    }

    #[test]
    fn test_does_not_fire_on_fresh_data_even_if_cold() {
        let monitor = FailsafeMonitor::default();

        assert!(!monitor.should_force_heating(
            now() - Duration::minutes(59),
            Some(DegreeCelsius(15.0)),
            Some(DegreeCelsius(21.0)),
            now(),
        ));
    }

    #[test]
    fn test_does_not_fire_when_room_at_target() {
        let monitor = FailsafeMonitor::default();

        assert!(!monitor.should_force_heating(
            now() - Duration::minutes(120),
            Some(DegreeCelsius(21.0)),
            Some(DegreeCelsius(21.0)),
            now(),
        ));
    }

    #[test]
    fn test_does_not_fire_without_room_temperature() {
        let monitor = FailsafeMonitor::default();

        assert!(!monitor.should_force_heating(
            now() - Duration::minutes(120),
            None,
            Some(DegreeCelsius(21.0)),
            now(),
        ));
    }

    #[test]
    fn test_exact_boundary_is_still_fresh() {
        let monitor = FailsafeMonitor::default();

        assert!(!monitor.should_force_heating(
            now() - Duration::minutes(60),
            Some(DegreeCelsius(18.0)),
            Some(DegreeCelsius(21.0)),
            now(),
        ));
    }
}
