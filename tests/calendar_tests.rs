use chrono::{Datelike, NaiveDate, Weekday};
use wbs_hub::calendar::{
    HolidayCalendar, count_weekdays, is_weekday, next_friday_on_or_after, weekdays_in_range,
};

fn d(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn weekends_are_not_weekdays() {
    // 2024-01-06 is a Saturday, 2024-01-07 is a Sunday
    assert!(!is_weekday(d(2024, 1, 6)));
    assert!(!is_weekday(d(2024, 1, 7)));
    assert!(is_weekday(d(2024, 1, 8)));
}

#[test]
fn weekdays_in_range_is_inclusive_and_ignores_holidays() {
    let days = weekdays_in_range(d(2024, 1, 1), d(2024, 1, 14));
    assert_eq!(days.len(), 10);
    assert_eq!(days.first().copied().unwrap(), d(2024, 1, 1));
    assert_eq!(days.last().copied().unwrap(), d(2024, 1, 12));
    assert!(days.iter().all(|day| day.weekday() != Weekday::Sat && day.weekday() != Weekday::Sun));
    assert_eq!(count_weekdays(d(2024, 1, 1), d(2024, 1, 14)), 10);
}

#[test]
fn weekdays_in_reversed_range_is_empty() {
    assert!(weekdays_in_range(d(2024, 1, 10), d(2024, 1, 1)).is_empty());
}

#[test]
fn next_friday_keeps_friday_and_rolls_forward() {
    assert_eq!(next_friday_on_or_after(d(2024, 1, 5)), d(2024, 1, 5));
    assert_eq!(next_friday_on_or_after(d(2024, 1, 1)), d(2024, 1, 5));
    assert_eq!(next_friday_on_or_after(d(2024, 1, 6)), d(2024, 1, 12));
    assert_eq!(next_friday_on_or_after(d(2024, 1, 7)), d(2024, 1, 12));
}

#[test]
fn holiday_friday_resolves_to_monday() {
    let mut cal = HolidayCalendar::new();
    let friday = d(2024, 3, 29);
    assert_eq!(cal.resolve_task_date(friday), friday);

    cal.add_holiday(friday);
    assert_eq!(cal.resolve_task_date(friday), d(2024, 4, 1));
}

#[test]
fn next_due_dates_walks_weekly_and_flags_adjustments() {
    let cal: HolidayCalendar = [d(2024, 1, 12)].into_iter().collect();
    let due = cal.next_due_dates(d(2024, 1, 3), d(2024, 1, 26));
    assert_eq!(
        due,
        vec![
            (d(2024, 1, 5), false),
            (d(2024, 1, 15), true),
            (d(2024, 1, 19), false),
            (d(2024, 1, 26), false),
        ]
    );
}

#[test]
fn next_due_dates_drops_resolution_past_deadline() {
    let cal: HolidayCalendar = [d(2024, 1, 12)].into_iter().collect();
    let due = cal.next_due_dates(d(2024, 1, 1), d(2024, 1, 12));
    assert_eq!(due, vec![(d(2024, 1, 5), false)]);
}

#[test]
fn next_due_dates_falls_back_to_deadline() {
    let cal = HolidayCalendar::new();
    // Monday to Wednesday: no Friday in range
    assert_eq!(
        cal.next_due_dates(d(2024, 1, 1), d(2024, 1, 3)),
        vec![(d(2024, 1, 3), false)]
    );

    // The only Friday is a holiday pushed past the deadline
    let holiday: HolidayCalendar = [d(2024, 1, 5)].into_iter().collect();
    assert_eq!(
        holiday.next_due_dates(d(2024, 1, 5), d(2024, 1, 5)),
        vec![(d(2024, 1, 5), false)]
    );

    // Reversed range produces nothing at all
    assert!(cal.next_due_dates(d(2024, 1, 10), d(2024, 1, 1)).is_empty());
}

#[test]
fn recurring_holidays_and_serde_round_trip() {
    let mut cal = HolidayCalendar::new();
    cal.add_recurring_holiday(11, 15, 2025, 2026);
    cal.add_holidays(&[d(2025, 12, 25), d(2025, 12, 25)]);
    assert_eq!(cal.len(), 3);
    assert!(cal.is_holiday(d(2026, 11, 15)));

    let json = serde_json::to_string(&cal).unwrap();
    assert_eq!(json, r#"["2025-11-15","2025-12-25","2026-11-15"]"#);
    let back: HolidayCalendar = serde_json::from_str(&json).unwrap();
    assert_eq!(back, cal);
}
