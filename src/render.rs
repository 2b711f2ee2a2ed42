//! Plain text rendering for the terminal front end.

use chrono::{Datelike, NaiveDate, Weekday};
use itertools::Itertools;
use std::fmt::{self, Display};

use crate::analytics::MetricAnalytics;
use crate::calendar::{self, CalendarMonth, CompletionPredicate, ShadedCell};
use crate::config::Theme;
use crate::growth::{GrowthProjector, Projection};

pub struct DayCell<'a> {
    day_num: u32,
    completed: bool,
    is_today: bool,
    theme: &'a Theme,
}

impl<'a> DayCell<'a> {
    const CELL_WIDTH: usize = 4;

    fn new(day_num: u32, theme: &'a Theme) -> Self {
        DayCell {
            day_num,
            completed: false,
            is_today: false,
            theme,
        }
    }

    fn completed(mut self, completed: bool) -> Self {
        self.completed = completed;
        self
    }

    fn today(mut self, is_today: bool) -> Self {
        self.is_today = is_today;
        self
    }
}

impl Display for DayCell<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let arg_today = if self.is_today {
            self.theme.today_char.unwrap_or(' ')
        } else {
            ' '
        };

        let arg_done = if self.completed {
            self.theme.completed_char
        } else {
            ' '
        };

        write!(f, "{}{}{:>2}", arg_today, arg_done, self.day_num)
    }
}

/// A month laid out in weekday columns.
pub struct MonthGrid<'a> {
    month: CalendarMonth,
    week_start: Weekday,
    today: Option<NaiveDate>,
    cells: Vec<ShadedCell>,
    theme: &'a Theme,
}

impl<'a> MonthGrid<'a> {
    pub fn new<P>(
        month: CalendarMonth,
        week_start: Weekday,
        predicate: &P,
        theme: &'a Theme,
    ) -> Self
    where
        P: CompletionPredicate + ?Sized,
    {
        let cells = calendar::shade(
            &calendar::build_for_week_start(month, week_start),
            predicate,
        );

        MonthGrid {
            month,
            week_start,
            today: None,
            cells,
            theme,
        }
    }

    pub fn today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    pub fn completed_days(&self) -> usize {
        self.cells
            .iter()
            .filter(|cell| matches!(cell, ShadedCell::Day { completed: true, .. }))
            .count()
    }

    fn header(&self) -> String {
        itertools::iterate(self.week_start, |day| day.succ())
            .take(calendar::DAYS_PER_WEEK)
            .map(|day| format!("{:>width$}", day.to_string(), width = DayCell::CELL_WIDTH))
            .join("")
    }
}

impl Display for MonthGrid<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.month)?;

        if self.cells.is_empty() {
            return writeln!(f, "(no days)");
        }

        writeln!(f, "{}", self.header())?;

        for week in self.cells.chunks(calendar::DAYS_PER_WEEK) {
            for cell in week {
                match cell {
                    ShadedCell::Blank => write!(
                        f,
                        "{}",
                        self.theme.blank_char.to_string().repeat(DayCell::CELL_WIDTH)
                    )?,
                    ShadedCell::Day { date, completed } => write!(
                        f,
                        "{}",
                        DayCell::new(date.day(), self.theme)
                            .completed(*completed)
                            .today(self.today == Some(*date))
                    )?,
                }
            }
            writeln!(f)?;
        }

        Ok(())
    }
}

/// Why a card does or does not carry projections.
#[derive(Debug, Clone, PartialEq)]
enum ProjectionState {
    Ready(Vec<Projection>),
    TooFewEntries,
    NoBaseline,
    NoHorizons,
}

/// Metric summary with forward projections.
pub struct ProjectionCard<'a> {
    analytics: &'a MetricAnalytics<'a>,
    state: ProjectionState,
}

impl<'a> ProjectionCard<'a> {
    pub fn new(
        analytics: &'a MetricAnalytics<'a>,
        projector: &GrowthProjector,
        as_of: NaiveDate,
    ) -> Self {
        let series = analytics.series();

        let state = if projector.horizons().is_empty() {
            ProjectionState::NoHorizons
        } else if !series.can_project() {
            ProjectionState::TooFewEntries
        } else {
            match projector.project_guarded(&series, analytics.improvement(), as_of) {
                Some(projections) => ProjectionState::Ready(projections),
                None => ProjectionState::NoBaseline,
            }
        };

        ProjectionCard { analytics, state }
    }

    pub fn projections(&self) -> Option<&[Projection]> {
        match &self.state {
            ProjectionState::Ready(projections) => Some(projections.as_slice()),
            _ => None,
        }
    }
}

impl Display for ProjectionCard<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let config = self.analytics.config();
        let unit = &config.unit;
        let value = |v: Option<f64>| match v {
            Some(v) => format!("{:.2} {}", v, unit).trim_end().to_owned(),
            None => "-".to_owned(),
        };

        writeln!(
            f,
            "{} {} ({})",
            config.name,
            config.direction.icon(),
            config.frequency.name()
        )?;
        writeln!(f, "  latest:      {}", value(self.analytics.latest_value()))?;
        writeln!(f, "  best:        {}", value(self.analytics.best_value()))?;

        match self.analytics.improvement() {
            Some(improvement) => writeln!(f, "  improvement: {:+.1}%", improvement)?,
            None => writeln!(f, "  improvement: -")?,
        }

        writeln!(
            f,
            "  consistency: {:.0}%",
            self.analytics.consistency_rate() * 100.0
        )?;

        let trend = self.analytics.trend();
        writeln!(f, "  trend:       {} {}", trend.icon(), trend.label())?;
        writeln!(f, "  {}", self.analytics.consistency_correlation())?;

        match &self.state {
            ProjectionState::Ready(projections) => {
                writeln!(f, "Projection")?;
                for projection in projections {
                    writeln!(
                        f,
                        "  in {:>3} days: {}",
                        projection.horizon_days,
                        value(Some(projection.value))
                    )?;
                }
            }
            ProjectionState::TooFewEntries => {
                writeln!(f, "Projection needs at least two entries.")?
            }
            ProjectionState::NoBaseline => {
                writeln!(f, "Projection needs a non-zero starting value.")?
            }
            // nothing was asked for
            ProjectionState::NoHorizons => {}
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{GoalDirection, MetricConfig, MetricEntry, TrackingFrequency};
    use chrono::Month;

    #[test]
    fn day_cell_marks_today_and_completion() {
        let theme = Theme::default();

        assert_eq!(DayCell::new(7, &theme).to_string(), "   7");
        assert_eq!(
            DayCell::new(12, &theme).completed(true).today(true).to_string(),
            "*●12"
        );
    }

    #[test]
    fn grid_starts_on_configured_weekday() {
        let theme = Theme::default();
        let month = CalendarMonth::new(2024, Month::February);
        let none = |_: NaiveDate| false;

        let grid = MonthGrid::new(month, Weekday::Sun, &none, &theme).to_string();
        let lines: Vec<&str> = grid.lines().collect();

        assert_eq!(lines[0], "February 2024");
        assert_eq!(lines[1], " Sun Mon Tue Wed Thu Fri Sat");
        assert_eq!(lines[2], "                   1   2   3");
        assert_eq!(lines.len(), 2 + 5);
    }

    #[test]
    fn grid_counts_completed_days() {
        let theme = Theme::default();
        let month = CalendarMonth::new(2024, Month::April);
        let weekends = |date: NaiveDate| date.weekday().num_days_from_monday() >= 5;

        let grid = MonthGrid::new(month, Weekday::Mon, &weekends, &theme);
        assert_eq!(grid.completed_days(), 8);
    }

    #[test]
    fn card_omits_projection_for_single_entry() {
        let config = MetricConfig {
            name: "Weight".to_owned(),
            unit: "kg".to_owned(),
            frequency: TrackingFrequency::Weekly,
            direction: GoalDirection::Decrease,
        };
        let entries = vec![MetricEntry {
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            value: 80.0,
            notes: None,
            conditions: None,
        }];
        let as_of = NaiveDate::from_ymd_opt(2024, 1, 8).unwrap();
        let analytics = MetricAnalytics::new(&entries, &config, as_of);
        let card = ProjectionCard::new(&analytics, &GrowthProjector::default(), as_of);

        assert!(card.projections().is_none());
        assert!(card.to_string().contains("needs at least two entries"));
    }

    fn weight_config() -> MetricConfig {
        MetricConfig {
            name: "Weight".to_owned(),
            unit: "kg".to_owned(),
            frequency: TrackingFrequency::Daily,
            direction: GoalDirection::Increase,
        }
    }

    fn entries(values: &[(u32, f64)]) -> Vec<MetricEntry> {
        values
            .iter()
            .map(|&(day, value)| MetricEntry {
                date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
                value,
                notes: None,
                conditions: None,
            })
            .collect()
    }

    #[test]
    fn card_explains_zero_baseline() {
        let config = weight_config();
        let entries = entries(&[(1, 0.0), (2, 5.0), (3, 6.0)]);
        let as_of = NaiveDate::from_ymd_opt(2024, 1, 3).unwrap();
        let analytics = MetricAnalytics::new(&entries, &config, as_of);
        let text = ProjectionCard::new(&analytics, &GrowthProjector::default(), as_of)
            .to_string();

        assert!(text.contains("needs a non-zero starting value"));
        assert!(!text.contains("at least two entries"));
    }

    #[test]
    fn card_skips_projection_without_horizons() {
        let config = weight_config();
        let entries = entries(&[(1, 10.0), (2, 11.0)]);
        let as_of = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let analytics = MetricAnalytics::new(&entries, &config, as_of);
        let card = ProjectionCard::new(&analytics, &GrowthProjector::new(&[]), as_of);

        assert!(card.projections().is_none());
        assert!(!card.to_string().contains("Projection"));
    }

    #[test]
    fn card_lists_each_horizon() {
        let config = weight_config();
        let entries = entries(&[(1, 10.0), (2, 11.0)]);
        let as_of = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let analytics = MetricAnalytics::new(&entries, &config, as_of);
        let card = ProjectionCard::new(&analytics, &GrowthProjector::default(), as_of);

        assert_eq!(card.projections().map(|p| p.len()), Some(2));
        assert!(card.to_string().contains("in  90 days"));
    }
}
