use chrono::NaiveDate;
use itertools::Itertools;

use crate::growth::Series;
use crate::model::{GoalDirection, MetricConfig, MetricEntry};

/// Relative change below which two windows count as equal, in percent.
const STABLE_BAND_PERCENT: f64 = 1.0;
const TREND_WINDOW: usize = 3;
const CONSISTENT_RATE: f64 = 0.8;
const SPARSE_RATE: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    Improving,
    Declining,
    Stable,
    InsufficientData,
}

impl Trend {
    pub fn icon(&self) -> &'static str {
        match self {
            Trend::Improving => "↗",
            Trend::Declining => "↘",
            Trend::Stable => "→",
            Trend::InsufficientData => "·",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Trend::Improving => "improving",
            Trend::Declining => "declining",
            Trend::Stable => "stable",
            Trend::InsufficientData => "not enough data",
        }
    }
}

/// Summary figures over the metric entries of one habit.
pub struct MetricAnalytics<'a> {
    entries: Vec<&'a MetricEntry>,
    config: &'a MetricConfig,
    as_of: NaiveDate,
}

impl<'a> MetricAnalytics<'a> {
    pub fn new(entries: &'a [MetricEntry], config: &'a MetricConfig, as_of: NaiveDate) -> Self {
        let entries = entries.iter().sorted_by_key(|entry| entry.date).collect();

        MetricAnalytics {
            entries,
            config,
            as_of,
        }
    }

    pub fn config(&self) -> &MetricConfig {
        self.config
    }

    pub fn series(&self) -> Series {
        self.entries.iter().map(|entry| entry.observation()).collect()
    }

    pub fn latest_value(&self) -> Option<f64> {
        self.entries.last().map(|entry| entry.value)
    }

    pub fn best_value(&self) -> Option<f64> {
        let values = self.entries.iter().map(|entry| entry.value);

        match self.config.direction {
            GoalDirection::Increase => values.reduce(f64::max),
            GoalDirection::Decrease => values.reduce(f64::min),
            GoalDirection::Maintain => {
                let baseline = self.entries.first()?.value;
                values.min_by(|a, b| {
                    (a - baseline)
                        .abs()
                        .partial_cmp(&(b - baseline).abs())
                        .unwrap_or(std::cmp::Ordering::Equal)
                })
            }
        }
    }

    /// Percent change from the first to the latest entry.
    pub fn improvement(&self) -> Option<f64> {
        if self.entries.len() < 2 {
            return None;
        }

        let first = self.entries.first()?.value;
        let latest = self.entries.last()?.value;

        if first == 0.0 {
            None
        } else {
            Some((latest - first) / first.abs() * 100.0)
        }
    }

    /// Fraction of expected tracking periods with at least one entry.
    pub fn consistency_rate(&self) -> f64 {
        let first = match self.entries.first() {
            Some(entry) => entry.date,
            None => return 0.0,
        };

        let period = self.config.frequency.period_days();
        let elapsed = self.as_of.signed_duration_since(first).num_days().max(0);
        let expected = elapsed / period + 1;

        let logged = self
            .entries
            .iter()
            .map(|entry| entry.date.signed_duration_since(first).num_days() / period)
            .filter(|idx| *idx < expected)
            .unique()
            .count();

        (logged as f64 / expected as f64).clamp(0.0, 1.0)
    }

    pub fn trend(&self) -> Trend {
        let len = self.entries.len();
        if len < 2 {
            return Trend::InsufficientData;
        }

        let window = TREND_WINDOW.min(len / 2);
        let mean = |entries: &[&MetricEntry]| {
            entries.iter().map(|entry| entry.value).sum::<f64>() / entries.len() as f64
        };

        let recent = mean(&self.entries[len - window..]);
        let previous = mean(&self.entries[len - 2 * window..len - window]);

        // a zero baseline has no relative change, so any movement away from it counts
        let stable = if previous == 0.0 {
            recent == 0.0
        } else {
            ((recent - previous) / previous.abs() * 100.0).abs() <= STABLE_BAND_PERCENT
        };

        if stable {
            return Trend::Stable;
        }

        let rising = recent > previous;
        match self.config.direction {
            GoalDirection::Increase if rising => Trend::Improving,
            GoalDirection::Decrease if !rising => Trend::Improving,
            _ => Trend::Declining,
        }
    }

    pub fn consistency_correlation(&self) -> String {
        let rate = self.consistency_rate();
        let percent = (rate * 100.0).round();

        let trend = self.trend();
        if trend == Trend::InsufficientData {
            return "Log at least two entries to see how consistency relates to progress."
                .to_owned();
        }

        match (rate >= CONSISTENT_RATE, trend) {
            (true, Trend::Improving) => format!(
                "Tracking {:.0}% of the time goes along with steady progress.",
                percent
            ),
            (true, _) => format!(
                "Tracking is consistent ({:.0}%) but {} has been {} lately.",
                percent,
                self.config.name,
                trend.label()
            ),
            (false, Trend::Improving) => format!(
                "{} is improving even with {:.0}% consistency. More regular check-ins would confirm it.",
                self.config.name, percent
            ),
            (false, _) if rate < SPARSE_RATE => format!(
                "Only {:.0}% of check-ins were logged. Progress is hard to judge.",
                percent
            ),
            (false, _) => format!(
                "Consistency of {:.0}% and a {} trend. Logging more regularly may help.",
                percent,
                trend.label()
            ),
        }
    }
}
