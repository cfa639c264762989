use std::fmt::Display;

use derive_more::derive::AsRef;
use serde::{Deserialize, Serialize};

/// Valve opening in percent, always within 0..=100.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, AsRef, Serialize, Deserialize)]
pub struct ValvePosition(u8);

impl ValvePosition {
    pub const CLOSED: ValvePosition = ValvePosition(0);

    pub fn new(value: u8) -> Self {
        Self(value.min(100))
    }

    pub fn value(&self) -> u8 {
        self.0
    }

    pub fn is_open(&self) -> bool {
        self.0 > 0
    }
}

impl From<u8> for ValvePosition {
    fn from(value: u8) -> Self {
        Self::new(value)
    }
}

impl Display for ValvePosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}%", self.0)
    }
}
