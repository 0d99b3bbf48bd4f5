use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};

/// The resolved `[start, end]` range a dashboard reports over, inclusive on
/// both ends. Callers must supply `start <= end`; this is a precondition,
/// not a runtime check.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        debug_assert!(start <= end, "window end precedes start");
        Self { start, end }
    }

    /// Fills in missing bounds: an absent start becomes day 1 of the
    /// reference date's month, an absent end becomes the last day of the
    /// resolved start's month. Absent inputs always produce a valid window.
    pub fn resolve(
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
        reference: NaiveDate,
    ) -> Self {
        let start = start.unwrap_or_else(|| first_day_of_month(reference));
        let end = end.unwrap_or_else(|| last_day_of_month(start.year(), start.month()));
        Self::new(start, end)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Number of calendar days in the window, counting both ends.
    pub fn num_days(&self) -> usize {
        (self.end - self.start).num_days() as usize + 1
    }

    /// Every calendar day in the window, ascending.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end;
        self.start.iter_days().take_while(move |day| *day <= end)
    }
}

pub fn first_day_of_month(date: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(date.year(), date.month(), 1).unwrap()
}

pub fn last_day_of_month(year: i32, month: u32) -> NaiveDate {
    let next_month = if month == 12 { 1 } else { month + 1 };
    let next_year = if month == 12 { year + 1 } else { year };

    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .unwrap()
        .checked_sub_days(Days::new(1))
        .unwrap()
}
