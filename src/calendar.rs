use chrono::{Datelike, Month, Months, NaiveDate, Weekday};
use num_traits::FromPrimitive;
use std::cmp::Ordering;
use std::convert::TryFrom;
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, ErrorKind};
use crate::model::{Habit, LogEntry};

pub const DAYS_PER_WEEK: usize = 7;

/// A year and month pair. The year is not range checked on construction, so
/// day lookups may fail for years chrono cannot represent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarMonth {
    year: i32,
    month: Month,
}

impl CalendarMonth {
    pub fn new(year: i32, month: Month) -> Self {
        CalendarMonth { year, month }
    }

    pub fn from_ym(year: i32, month: u32) -> Option<Self> {
        Month::from_u32(month).map(|month| CalendarMonth { year, month })
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> Month {
        self.month
    }

    pub fn name(&self) -> &'static str {
        self.month.name()
    }

    pub fn first_day(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month.number_from_month(), 1)
    }

    pub fn last_day(&self) -> Option<NaiveDate> {
        self.first_day()?
            .checked_add_months(Months::new(1))?
            .pred_opt()
    }

    pub fn num_days(&self) -> Option<u32> {
        self.last_day().map(|date| date.day())
    }

    /// 1-based position of the first day of the month in a week that begins
    /// on `week_start`.
    pub fn first_weekday(&self, week_start: Weekday) -> Option<WeekdayIndex> {
        let weekday = self.first_day()?.weekday();
        let offset = (DAYS_PER_WEEK as u32 + weekday.num_days_from_monday()
            - week_start.num_days_from_monday())
            % DAYS_PER_WEEK as u32;

        WeekdayIndex::new(offset as u8 + 1)
    }

    pub fn contains(&self, date: &NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month.number_from_month()
    }

    pub fn next(&self) -> Self {
        let next_month = self.month.succ();

        CalendarMonth {
            month: next_month,
            year: if next_month == Month::January {
                self.year + 1
            } else {
                self.year
            },
        }
    }

    pub fn prev(&self) -> Self {
        let prev_month = self.month.pred();

        CalendarMonth {
            month: prev_month,
            year: if prev_month == Month::December {
                self.year - 1
            } else {
                self.year
            },
        }
    }
}

impl<T: Datelike> From<T> for CalendarMonth {
    fn from(date: T) -> Self {
        // month() of a valid date is always 1..=12
        CalendarMonth {
            year: date.year(),
            month: Month::from_u32(date.month()).unwrap_or(Month::January),
        }
    }
}

impl FromStr for CalendarMonth {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || {
            Error::new(
                ErrorKind::DateParse,
                &format!("'{}' is not a month, expected YYYY-MM", s),
            )
        };

        let (year, month) = s.trim().rsplit_once('-').ok_or_else(invalid)?;
        let year = year.parse::<i32>().map_err(|_| invalid())?;
        let month = month.parse::<u32>().map_err(|_| invalid())?;

        CalendarMonth::from_ym(year, month).ok_or_else(invalid)
    }
}

impl fmt::Display for CalendarMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name(), self.year)
    }
}

impl PartialOrd for CalendarMonth {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CalendarMonth {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.year, self.month.number_from_month())
            .cmp(&(other.year, other.month.number_from_month()))
    }
}

/// Weekday position within a week, 1 to 7.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct WeekdayIndex(u8);

impl WeekdayIndex {
    pub fn new(index: u8) -> Option<Self> {
        if (1..=DAYS_PER_WEEK as u8).contains(&index) {
            Some(WeekdayIndex(index))
        } else {
            None
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// Number of blank cells in front of the first day.
    pub fn padding(self) -> usize {
        self.0 as usize - 1
    }
}

impl TryFrom<u8> for WeekdayIndex {
    type Error = Error;
    fn try_from(value: u8) -> Result<Self, Self::Error> {
        WeekdayIndex::new(value).ok_or_else(|| {
            Error::new(
                ErrorKind::WeekdayOutOfRange,
                &format!("{} is not within 1..=7", value),
            )
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalendarCell {
    Blank,
    Day(NaiveDate),
}

impl CalendarCell {
    pub fn date(&self) -> Option<NaiveDate> {
        match self {
            CalendarCell::Blank => None,
            CalendarCell::Day(date) => Some(*date),
        }
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, CalendarCell::Blank)
    }
}

/// Decides whether a day counts as done.
pub trait CompletionPredicate {
    fn is_completed(&self, date: NaiveDate) -> bool;
}

impl<F> CompletionPredicate for F
where
    F: Fn(NaiveDate) -> bool,
{
    fn is_completed(&self, date: NaiveDate) -> bool {
        self(date)
    }
}

impl CompletionPredicate for [LogEntry] {
    fn is_completed(&self, date: NaiveDate) -> bool {
        self.iter().any(|log| log.date == date)
    }
}

impl CompletionPredicate for Habit {
    fn is_completed(&self, date: NaiveDate) -> bool {
        self.logged_on(date)
    }
}

/// Leading blanks followed by every day of `month`.
///
/// The trailing row is left ragged. Returns an empty grid if the month's first
/// or last day cannot be resolved.
pub fn build(month: CalendarMonth, first_weekday: WeekdayIndex) -> Vec<CalendarCell> {
    let (first, last) = match (month.first_day(), month.last_day()) {
        (Some(first), Some(last)) => (first, last),
        _ => {
            log::warn!("Cannot resolve the days of {}", month);
            return Vec::new();
        }
    };

    std::iter::repeat(CalendarCell::Blank)
        .take(first_weekday.padding())
        .chain(
            first
                .iter_days()
                .take_while(|date| *date <= last)
                .map(CalendarCell::Day),
        )
        .collect()
}

/// Builds the grid of `month` for a week that begins on `week_start`.
pub fn build_for_week_start(month: CalendarMonth, week_start: Weekday) -> Vec<CalendarCell> {
    match month.first_weekday(week_start) {
        Some(first_weekday) => build(month, first_weekday),
        None => {
            log::warn!("Cannot resolve the first weekday of {}", month);
            Vec::new()
        }
    }
}

pub fn weeks(cells: &[CalendarCell]) -> impl Iterator<Item = &[CalendarCell]> {
    cells.chunks(DAYS_PER_WEEK)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShadedCell {
    Blank,
    Day { date: NaiveDate, completed: bool },
}

pub fn shade<P>(cells: &[CalendarCell], predicate: &P) -> Vec<ShadedCell>
where
    P: CompletionPredicate + ?Sized,
{
    cells
        .iter()
        .map(|cell| match cell {
            CalendarCell::Blank => ShadedCell::Blank,
            CalendarCell::Day(date) => ShadedCell::Day {
                date: *date,
                completed: predicate.is_completed(*date),
            },
        })
        .collect()
}

pub fn days_of_month(month: &Month, year: i32) -> Option<u32> {
    CalendarMonth::new(year, *month).num_days()
}
