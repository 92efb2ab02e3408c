use crate::calendar::{HolidayCalendar, weekdays_in_range};
use crate::distribution::distribute_even;
use crate::task::{DailyTaskRecord, PLANNED_STATUS};
use chrono::NaiveDate;
use tracing::debug;

pub const DEFAULT_HOURS_PER_PERSON: f64 = 9.0;

const SHARE_DECIMALS: u32 = 1;

/// One record per weekday per collaborator, sharing 100% between them.
///
/// Records come out date-major, owner-minor. Holidays are not consulted: a
/// holiday on a weekday still gets its tasks.
pub fn distribute_daily(
    start: NaiveDate,
    deadline: NaiveDate,
    headcount: u32,
    hours_per_person: f64,
) -> Vec<DailyTaskRecord> {
    if headcount == 0 {
        return Vec::new();
    }
    let days = weekdays_in_range(start, deadline);
    if days.is_empty() {
        return Vec::new();
    }

    let total_tasks = days.len() * headcount as usize;
    let shares = distribute_even(100.0, total_tasks, SHARE_DECIMALS);

    let mut records = Vec::with_capacity(total_tasks);
    let mut shares = shares.into_iter();
    for day in days {
        for owner in 1..=headcount {
            let share = shares.next().unwrap_or_default();
            records.push(DailyTaskRecord {
                data: day,
                horas_previstas: hours_per_person,
                percentual_pendencia: share,
                status: PLANNED_STATUS.to_string(),
                ajustada_feriado: false,
                dono_idx: Some(owner),
                dono_total: Some(headcount),
            });
        }
    }
    debug!(%start, %deadline, headcount, records = records.len(), "distributed daily tasks");
    records
}

/// Legacy distributor: `total_hours` and 100% split evenly over every weekday
/// in range.
///
/// `holidays` is accepted for compatibility with the Friday-anchored flow but
/// deliberately not consulted, so `ajustada_feriado` is always false.
pub fn distribute_weekly(
    start: NaiveDate,
    deadline: NaiveDate,
    total_hours: f64,
    _holidays: &HolidayCalendar,
) -> Vec<DailyTaskRecord> {
    let dates = weekdays_in_range(start, deadline);
    let records = build_records(dates.into_iter().map(|d| (d, false)), total_hours);
    debug!(%start, %deadline, total_hours, records = records.len(), "distributed weekly tasks");
    records
}

/// Strictly Friday-anchored variant: one record per due date from
/// `HolidayCalendar::next_due_dates`, flagging dates moved off a holiday.
pub fn distribute_friday_anchored(
    start: NaiveDate,
    deadline: NaiveDate,
    total_hours: f64,
    holidays: &HolidayCalendar,
) -> Vec<DailyTaskRecord> {
    let due = holidays.next_due_dates(start, deadline);
    let records = build_records(due.into_iter(), total_hours);
    debug!(
        %start,
        %deadline,
        adjusted = records.iter().filter(|r| r.ajustada_feriado).count(),
        records = records.len(),
        "distributed friday-anchored tasks"
    );
    records
}

fn build_records<I>(dates: I, total_hours: f64) -> Vec<DailyTaskRecord>
where
    I: ExactSizeIterator<Item = (NaiveDate, bool)>,
{
    let n = dates.len();
    if n == 0 {
        return Vec::new();
    }
    let hours = distribute_even(total_hours, n, SHARE_DECIMALS);
    let shares = distribute_even(100.0, n, SHARE_DECIMALS);

    dates
        .zip(hours)
        .zip(shares)
        .map(|(((data, adjusted), horas), share)| DailyTaskRecord {
            data,
            horas_previstas: horas,
            percentual_pendencia: share,
            status: PLANNED_STATUS.to_string(),
            ajustada_feriado: adjusted,
            dono_idx: None,
            dono_total: None,
        })
        .collect()
}
