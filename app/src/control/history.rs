use std::collections::VecDeque;

use crate::core::time::DateTime;
use crate::core::timeseries::DataPoint;
use crate::core::unit::DegreeCelsius;

const DEFAULT_CAPACITY: usize = 30;
const RATE_SAMPLE_COUNT: usize = 10;
const MIN_LEARNING_SAMPLES: usize = 5;
const MIN_LEARNING_SPAN_MINUTES: f64 = 15.0;

/// Bounded, insertion-ordered buffer of room-temperature samples. Oldest
/// samples are evicted first. Cleared only on restart.
#[derive(Debug)]
pub struct TemperatureHistory {
    samples: VecDeque<DataPoint<DegreeCelsius>>,
    capacity: usize,
}

impl Default for TemperatureHistory {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

impl TemperatureHistory {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, value: DegreeCelsius, timestamp: DateTime) {
        self.samples.push_back(DataPoint::new(value, timestamp));

        while self.samples.len() > self.capacity {
            self.samples.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }

    /// Temperature change rate in °C per hour over the most recent samples.
    /// Positive means heating, negative cooling. 0.0 while there is not
    /// enough data for a slope.
    pub fn heating_rate(&self) -> f64 {
        if self.samples.len() < 2 {
            return 0.0;
        }

        let skip = self.samples.len().saturating_sub(RATE_SAMPLE_COUNT);
        let first = &self.samples[skip];
        let last = self.samples.back().expect("len checked above");

        let span_hours = last.timestamp.elapsed_since(first.timestamp).as_hours_f64();
        if span_hours <= 0.0 {
            return 0.0;
        }

        (last.value - first.value).0 / span_hours
    }

    /// True while there is not yet enough data for a reliable heating rate.
    pub fn is_learning(&self) -> bool {
        if self.samples.len() < MIN_LEARNING_SAMPLES {
            return true;
        }

        self.span_minutes() < MIN_LEARNING_SPAN_MINUTES
    }

    /// Human-readable description of what is still missing while learning.
    pub fn learning_status(&self) -> Option<String> {
        if !self.is_learning() {
            return None;
        }

        let readings_needed = MIN_LEARNING_SAMPLES.saturating_sub(self.samples.len());
        if readings_needed > 0 {
            return Some(format!("Need {} more readings", readings_needed));
        }

        let minutes_needed = (MIN_LEARNING_SPAN_MINUTES - self.span_minutes()).ceil() as i64;
        Some(format!("Need {} more minutes", minutes_needed.max(0)))
    }

    fn span_minutes(&self) -> f64 {
        match (self.samples.front(), self.samples.back()) {
            (Some(first), Some(last)) => last.timestamp.elapsed_since(first.timestamp).as_minutes_f64(),
            _ => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::time::Duration;

    fn start() -> DateTime {
        DateTime::from_iso("2024-11-03T12:00:00Z").unwrap()
    }

    #[test]
    fn test_rate_needs_two_samples() {
        let mut history = TemperatureHistory::default();
        assert_eq!(history.heating_rate(), 0.0);

        history.push(DegreeCelsius(19.0), start());
        assert_eq!(history.heating_rate(), 0.0);
    }

    #[test]
    fn test_rate_is_degrees_per_hour() {
        let mut history = TemperatureHistory::default();
        history.push(DegreeCelsius(19.0), start());
        history.push(DegreeCelsius(20.0), start() + Duration::minutes(30));

        assert_eq!(history.heating_rate(), 2.0);
    }

    #[test]
    fn test_rate_uses_most_recent_ten_samples() {
        let mut history = TemperatureHistory::default();

        //old cold samples that must not contribute to the slope
        history.push(DegreeCelsius(5.0), start());
        history.push(DegreeCelsius(5.0), start() + Duration::minutes(1));

        for i in 0..10 {
            history.push(
                DegreeCelsius(20.0 + i as f64 * 0.1),
                start() + Duration::minutes(10 + i * 6),
            );
        }

        //0.9 °C over 54 minutes
        let rate = history.heating_rate();
        assert!((rate - 1.0).abs() < 0.01, "rate was {}", rate);
    }

    #[test]
    fn test_rate_zero_on_non_positive_span() {
        let mut history = TemperatureHistory::default();
        history.push(DegreeCelsius(19.0), start());
        history.push(DegreeCelsius(20.0), start());

        assert_eq!(history.heating_rate(), 0.0);
    }

    #[test]
    fn test_oldest_samples_evicted() {
        let mut history = TemperatureHistory::with_capacity(3);
        for i in 0..5 {
            history.push(DegreeCelsius(i as f64), start() + Duration::minutes(i));
        }

        assert_eq!(history.len(), 3);
        //slope over the surviving samples 2.0..4.0
        assert!(history.heating_rate() > 0.0);
    }

    #[test]
    fn test_learning_until_enough_samples_and_span() {
        let mut history = TemperatureHistory::default();
        assert!(history.is_learning());

        for i in 0..5 {
            history.push(DegreeCelsius(20.0), start() + Duration::minutes(i));
        }
        //5 samples but only 4 minutes of span
        assert!(history.is_learning());
        assert_eq!(history.learning_status(), Some("Need 11 more minutes".to_string()));

        history.push(DegreeCelsius(20.0), start() + Duration::minutes(20));
        assert!(!history.is_learning());
        assert_eq!(history.learning_status(), None);
    }
}
