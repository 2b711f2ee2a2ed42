//! Forward projection of a metric series.
//!
//! Despite the "compound effect" label used for this feature, the projection is a
//! linear extrapolation of an already computed aggregate improvement:
//!
//! ```text
//! days_tracked = max(1, as_of - first.date)
//! daily_rate   = improvement_percent / days_tracked
//! projected(h) = latest * (1 + daily_rate * h / 100)
//! ```
//!
//! The formula is kept as is so projected values stay comparable with previously
//! displayed ones.

use chrono::NaiveDate;
use derive_more::Constructor;
use std::cmp;
use std::collections::BTreeMap;
use std::iter::FromIterator;

pub const DEFAULT_HORIZONS: [u32; 2] = [30, 90];

#[derive(Debug, Clone, Copy, PartialEq, Constructor)]
pub struct Observation {
    pub date: NaiveDate,
    pub value: f64,
}

/// Observations in caller defined order. Duplicate dates are kept.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Series(Vec<Observation>);

impl Series {
    pub fn new(observations: Vec<Observation>) -> Self {
        Series(observations)
    }

    pub fn sorted_ascending(mut self) -> Self {
        self.0.sort_by_key(|o| o.date);
        self
    }

    pub fn sorted_descending(mut self) -> Self {
        self.0.sort_by(|a, b| b.date.cmp(&a.date));
        self
    }

    pub fn first(&self) -> Option<&Observation> {
        self.0.first()
    }

    pub fn latest(&self) -> Option<&Observation> {
        self.0.last()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// A projection needs at least two observations.
    pub fn can_project(&self) -> bool {
        self.0.len() >= 2
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Observation> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[Observation] {
        &self.0
    }
}

impl FromIterator<Observation> for Series {
    fn from_iter<I: IntoIterator<Item = Observation>>(iter: I) -> Self {
        Series(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Series {
    type Item = &'a Observation;
    type IntoIter = std::slice::Iter<'a, Observation>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    pub horizon_days: u32,
    pub value: f64,
}

/// Days between the first observation and `as_of`, never less than one.
pub fn days_tracked(first: NaiveDate, as_of: NaiveDate) -> i64 {
    cmp::max(1, as_of.signed_duration_since(first).num_days())
}

/// Projects the latest value of `series` to each horizon.
///
/// `series` must be ascending and hold at least two observations. Callers check
/// [`Series::can_project`] first; this function panics otherwise.
pub fn project(
    series: &Series,
    improvement_percent: f64,
    as_of: NaiveDate,
    horizons_days: &[u32],
) -> BTreeMap<u32, f64> {
    assert!(
        series.can_project(),
        "projection requires at least two observations, got {}",
        series.len()
    );

    let first = series.0[0];
    let latest = series.0[series.0.len() - 1];

    let daily_rate = improvement_percent / days_tracked(first.date, as_of) as f64;

    horizons_days
        .iter()
        .map(|&h| (h, latest.value * (1.0 + (daily_rate * h as f64 / 100.0))))
        .collect()
}

#[derive(Debug, Clone)]
pub struct GrowthProjector {
    horizons: Vec<u32>,
}

impl Default for GrowthProjector {
    fn default() -> Self {
        GrowthProjector {
            horizons: DEFAULT_HORIZONS.to_vec(),
        }
    }
}

impl GrowthProjector {
    pub fn new(horizons: &[u32]) -> Self {
        let mut horizons = horizons.to_vec();
        horizons.sort_unstable();
        horizons.dedup();

        GrowthProjector { horizons }
    }

    pub fn horizons(&self) -> &[u32] {
        &self.horizons
    }

    pub fn project(
        &self,
        series: &Series,
        improvement_percent: f64,
        as_of: NaiveDate,
    ) -> Vec<Projection> {
        project(series, improvement_percent, as_of, &self.horizons)
            .into_iter()
            .map(|(horizon_days, value)| Projection {
                horizon_days,
                value,
            })
            .collect()
    }

    /// Same as [`GrowthProjector::project`] but yields `None` whenever the
    /// projection section should be omitted.
    pub fn project_guarded(
        &self,
        series: &Series,
        improvement_percent: Option<f64>,
        as_of: NaiveDate,
    ) -> Option<Vec<Projection>> {
        if !series.can_project() {
            log::debug!(
                "Skipping projection: {} observation(s) available",
                series.len()
            );
            return None;
        }

        improvement_percent.map(|improvement| self.project(series, improvement, as_of))
    }
}
