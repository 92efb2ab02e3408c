use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Externally supplied holiday dates.
///
/// Only the Friday-anchored helpers consult it; weekday enumeration never
/// filters holidays out.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<NaiveDate>", into = "Vec<NaiveDate>")]
pub struct HolidayCalendar {
    holidays: HashSet<NaiveDate>,
}

impl From<Vec<NaiveDate>> for HolidayCalendar {
    fn from(dates: Vec<NaiveDate>) -> Self {
        Self {
            holidays: dates.into_iter().collect(),
        }
    }
}

impl From<HolidayCalendar> for Vec<NaiveDate> {
    fn from(calendar: HolidayCalendar) -> Self {
        calendar.dates()
    }
}

impl FromIterator<NaiveDate> for HolidayCalendar {
    fn from_iter<I: IntoIterator<Item = NaiveDate>>(iter: I) -> Self {
        Self {
            holidays: iter.into_iter().collect(),
        }
    }
}

impl HolidayCalendar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a single holiday
    pub fn add_holiday(&mut self, date: NaiveDate) {
        self.holidays.insert(date);
    }

    pub fn add_holidays(&mut self, dates: &[NaiveDate]) {
        self.holidays.extend(dates);
    }

    /// Add the same date for every year in `start_year..=end_year`.
    /// Example: Nov 15 (Proclamação da República) for 2025-2030
    pub fn add_recurring_holiday(&mut self, month: u32, day: u32, start_year: i32, end_year: i32) {
        for year in start_year..=end_year {
            if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
                self.holidays.insert(date);
            }
        }
    }

    pub fn is_holiday(&self, date: NaiveDate) -> bool {
        self.holidays.contains(&date)
    }

    pub fn len(&self) -> usize {
        self.holidays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.holidays.is_empty()
    }

    /// Sorted copy of the holiday dates.
    pub fn dates(&self) -> Vec<NaiveDate> {
        let mut dates: Vec<NaiveDate> = self.holidays.iter().copied().collect();
        dates.sort();
        dates
    }

    /// A Friday stays put unless it is a holiday, in which case the task moves
    /// to the following Monday.
    pub fn resolve_task_date(&self, friday: NaiveDate) -> NaiveDate {
        if self.is_holiday(friday) {
            friday + Duration::days(3)
        } else {
            friday
        }
    }

    /// Friday-anchored due dates in `[start, deadline]` as `(date, adjusted)`.
    ///
    /// Walks week by week from the first Friday on or after `start`. A
    /// resolved date past `deadline` is dropped. When the range is too short to
    /// contain any due date a single entry on `deadline` is returned so the
    /// flow is never left without a task.
    pub fn next_due_dates(&self, start: NaiveDate, deadline: NaiveDate) -> Vec<(NaiveDate, bool)> {
        let mut dates = Vec::new();
        let mut candidate = next_friday_on_or_after(start);

        while candidate <= deadline {
            let adjusted = self.is_holiday(candidate);
            let due = self.resolve_task_date(candidate);
            if due <= deadline {
                dates.push((due, adjusted));
            }
            candidate = candidate + Duration::weeks(1);
        }

        if dates.is_empty() && start <= deadline {
            dates.push((deadline, false));
        }
        dates
    }
}

pub fn is_weekday(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// The same date when it already is a Friday.
pub fn next_friday_on_or_after(date: NaiveDate) -> NaiveDate {
    let from_monday = i64::from(date.weekday().num_days_from_monday());
    let delta = (4 - from_monday).rem_euclid(7);
    date + Duration::days(delta)
}

/// All Mon-Fri dates in `[start, end]`, both ends inclusive. Holidays are not
/// filtered; that decision belongs to the caller.
pub fn weekdays_in_range(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    let mut days = Vec::new();
    let mut current = start;

    while current <= end {
        if is_weekday(current) {
            days.push(current);
        }
        current = current + Duration::days(1);
    }
    days
}

pub fn count_weekdays(start: NaiveDate, end: NaiveDate) -> usize {
    weekdays_in_range(start, end).len()
}
