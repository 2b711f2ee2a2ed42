//! Read-only value records supplied by the host's persistence layer.

use chrono::NaiveDate;
use serde::Deserialize;
use serde_with::DeserializeFromStr;
use std::convert::TryFrom;
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, ErrorKind};
use crate::growth::{Observation, Series};

/// Display color of a habit, stored as `#RRGGBB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, DeserializeFromStr)]
pub struct HexColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl FromStr for HexColor {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.trim().trim_start_matches('#');

        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(Error::new(
                ErrorKind::ColorParse,
                &format!("'{}' is not a #RRGGBB color", s),
            ));
        }

        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16);

        // all characters were checked above
        match (channel(0), channel(2), channel(4)) {
            (Ok(r), Ok(g), Ok(b)) => Ok(HexColor { r, g, b }),
            _ => Err(ErrorKind::ColorParse.into()),
        }
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl Default for HexColor {
    fn default() -> Self {
        HexColor {
            r: 0x34,
            g: 0xC7,
            b: 0x59,
        }
    }
}

/// Satisfaction rating attached to a log entry, 1 to 5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Deserialize)]
#[serde(try_from = "u8")]
pub struct Satisfaction(u8);

impl Satisfaction {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Satisfaction {
    type Error = Error;
    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Satisfaction(value))
        } else {
            Err(Error::new(
                ErrorKind::RatingOutOfRange,
                &format!("{} is not within {}..={}", value, Self::MIN, Self::MAX),
            ))
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LogEntry {
    pub date: NaiveDate,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub satisfaction: Option<Satisfaction>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MetricEntry {
    pub date: NaiveDate,
    pub value: f64,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub conditions: Option<String>,
}

impl MetricEntry {
    pub fn observation(&self) -> Observation {
        Observation::new(self.date, self.value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackingFrequency {
    Daily,
    Weekly,
    Monthly,
}

impl TrackingFrequency {
    /// Approximate length of one tracking period.
    pub fn period_days(&self) -> i64 {
        match self {
            TrackingFrequency::Daily => 1,
            TrackingFrequency::Weekly => 7,
            TrackingFrequency::Monthly => 30,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            TrackingFrequency::Daily => "daily",
            TrackingFrequency::Weekly => "weekly",
            TrackingFrequency::Monthly => "monthly",
        }
    }
}

impl Default for TrackingFrequency {
    fn default() -> Self {
        TrackingFrequency::Daily
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalDirection {
    Increase,
    Decrease,
    Maintain,
}

impl GoalDirection {
    pub fn icon(&self) -> &'static str {
        match self {
            GoalDirection::Increase => "↑",
            GoalDirection::Decrease => "↓",
            GoalDirection::Maintain => "→",
        }
    }
}

impl Default for GoalDirection {
    fn default() -> Self {
        GoalDirection::Increase
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MetricConfig {
    pub name: String,
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub frequency: TrackingFrequency,
    #[serde(default)]
    pub direction: GoalDirection,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Habit {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub color: HexColor,
    pub created: NaiveDate,
    #[serde(default)]
    pub logs: Vec<LogEntry>,
    #[serde(default)]
    pub metric: Option<MetricConfig>,
    #[serde(default)]
    pub metrics: Vec<MetricEntry>,
}

impl Habit {
    pub fn logged_on(&self, date: NaiveDate) -> bool {
        self.logs.iter().any(|log| log.date == date)
    }

    /// Metric observations in chronological order.
    pub fn series(&self) -> Series {
        self.metrics
            .iter()
            .map(MetricEntry::observation)
            .collect::<Series>()
            .sorted_ascending()
    }

    pub fn matches(&self, key: &str) -> bool {
        self.id == key || self.name.eq_ignore_ascii_case(key)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct System {
    pub id: String,
    pub name: String,
    #[serde(default, rename = "habit")]
    pub habits: Vec<Habit>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_color_accepts_optional_hash() {
        let with = "#34c759".parse::<HexColor>().unwrap();
        let without = "34C759".parse::<HexColor>().unwrap();

        assert_eq!(with, without);
        assert_eq!(with.to_string(), "#34C759");
    }

    #[test]
    fn hex_color_rejects_garbage() {
        assert!("#12345".parse::<HexColor>().is_err());
        assert!("#zzzzzz".parse::<HexColor>().is_err());
    }

    #[test]
    fn satisfaction_bounds() {
        assert!(Satisfaction::try_from(0).is_err());
        assert_eq!(Satisfaction::try_from(5).unwrap().get(), 5);
        assert!(Satisfaction::try_from(6).is_err());
    }

    #[test]
    fn habit_series_is_ascending() {
        let d = |day| NaiveDate::from_ymd_opt(2024, 3, day).unwrap();
        let habit = Habit {
            id: "run".to_owned(),
            name: "Running".to_owned(),
            color: HexColor::default(),
            created: d(1),
            logs: vec![],
            metric: None,
            metrics: vec![
                MetricEntry {
                    date: d(9),
                    value: 5.0,
                    notes: None,
                    conditions: None,
                },
                MetricEntry {
                    date: d(2),
                    value: 3.0,
                    notes: None,
                    conditions: None,
                },
            ],
        };

        let series = habit.series();
        assert_eq!(series.first().map(|o| o.date), Some(d(2)));
        assert_eq!(series.latest().map(|o| o.value), Some(5.0));
        assert!(habit.matches("running"));
    }
}
