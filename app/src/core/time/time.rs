use std::{fmt::Display, str::FromStr};

use anyhow::Context;
use chrono::Timelike;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Time {
    delegate: chrono::NaiveTime,
}

impl Time {
    pub fn hour(&self) -> u32 {
        self.delegate.hour()
    }

    pub fn minute(&self) -> u32 {
        self.delegate.minute()
    }
}

impl From<chrono::NaiveTime> for Time {
    fn from(delegate: chrono::NaiveTime) -> Self {
        Self { delegate }
    }
}

impl FromStr for Time {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let delegate = chrono::NaiveTime::parse_from_str(s, "%H:%M")
            .or_else(|_| chrono::NaiveTime::parse_from_str(s, "%H:%M:%S"))
            .with_context(|| format!("Error parsing time {:?}", s))?;
        Ok(Self { delegate })
    }
}

impl Display for Time {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.delegate.format("%H:%M"))
    }
}

impl<'de> serde::Deserialize<'de> for Time {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        value.parse().map_err(serde::de::Error::custom)
    }
}

impl serde::Serialize for Time {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hour_minute() {
        let time: Time = "23:15".parse().unwrap();
        assert_eq!(time.hour(), 23);
        assert_eq!(time.minute(), 15);
    }

    #[test]
    fn test_parse_invalid() {
        assert!("25:00".parse::<Time>().is_err());
        assert!("not a time".parse::<Time>().is_err());
    }
}
