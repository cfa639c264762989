use std::fmt::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Duration {
    delegate: chrono::Duration,
}

impl Duration {
    pub(super) fn new(delegate: chrono::Duration) -> Self {
        Self { delegate }
    }

    pub(super) fn into_delegate(self) -> chrono::Duration {
        self.delegate
    }

    pub fn minutes(mins: i64) -> Self {
        Self::new(chrono::Duration::minutes(mins))
    }

    pub fn as_minutes_f64(&self) -> f64 {
        self.delegate.num_seconds() as f64 / 60.0
    }

    pub fn as_hours_f64(&self) -> f64 {
        self.delegate.num_seconds() as f64 / 3600.0
    }
}

impl Display for Duration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}s", self.delegate.num_seconds())
    }
}
