//! Month grid computation.
//!
//! Pure date math with no state or side effects: given any reference date,
//! produce the complete weeks covering that date's month for a Sunday-first
//! display grid.

use chrono::{Datelike, Days, NaiveDate};

use crate::event::CourseEvent;

/// Compute the display grid for the month containing `reference`.
///
/// The first cell is the Sunday on or before the 1st of the month, the last
/// cell the Saturday on or after the month's last day. The result is always
/// a whole number of weeks (28, 35 or 42 days) with no gaps or duplicates.
pub fn month_grid(reference: NaiveDate) -> Vec<NaiveDate> {
    // Day 1 exists for every month
    let first = reference.with_day(1).unwrap();
    let last = last_day_of_month(first);

    let lead = first.weekday().num_days_from_sunday() as u64;
    let trail = 6 - last.weekday().num_days_from_sunday() as u64;

    let start = first - Days::new(lead);
    let end = last + Days::new(trail);

    let mut days = Vec::with_capacity(42);
    let mut day = start;
    while day <= end {
        days.push(day);
        day = day + Days::new(1);
    }
    days
}

/// Events whose calendar-day key equals `day`.
pub fn events_on(events: &[CourseEvent], day: NaiveDate) -> Vec<&CourseEvent> {
    events.iter().filter(|e| e.date == day).collect()
}

fn last_day_of_month(first: NaiveDate) -> NaiveDate {
    let (next_year, next_month) = if first.month() == 12 {
        (first.year() + 1, 1)
    } else {
        (first.year(), first.month() + 1)
    };
    // The 1st of the next month always exists
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .unwrap()
        .pred_opt()
        .unwrap()
}
