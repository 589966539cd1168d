//! Terminal rendering: month grid, event lines, spinners.

use chrono::{Datelike, NaiveDate};
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::{AnsiColors, OwoColorize};
use planner_core::grid::{events_on, month_grid};
use planner_core::{CourseEvent, EventColor};

pub fn create_spinner(message: String) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(message);
    spinner.enable_steady_tick(std::time::Duration::from_millis(80));
    spinner
}

fn ansi(color: EventColor) -> AnsiColors {
    match color {
        EventColor::Red => AnsiColors::Red,
        EventColor::Blue => AnsiColors::Blue,
        EventColor::Green => AnsiColors::Green,
        EventColor::Orange => AnsiColors::Yellow,
        EventColor::Purple => AnsiColors::Magenta,
        EventColor::Gray => AnsiColors::White,
    }
}

/// One agenda line: `09:00-10:30  ● Calc I (Building 4)  [a1b2c3d4]`
pub fn event_line(event: &CourseEvent) -> String {
    let dot = "●".color(ansi(event.color)).to_string();
    let location = event
        .location
        .as_deref()
        .map(|l| format!(" ({})", l))
        .unwrap_or_default();
    let short_id: String = event.id.chars().take(8).collect();
    let attachments = match event.attachments().len() {
        0 => String::new(),
        n => format!(" {}", format!("[{} attachment(s)]", n).dimmed()),
    };

    format!(
        "{}-{}  {} {}{}{}  {}",
        event.start_time,
        event.end_time,
        dot,
        event.title.bold(),
        location,
        attachments,
        format!("[{}]", short_id).dimmed(),
    )
}

/// Print the Sunday-first month grid with per-day event dots.
pub fn print_month(reference: NaiveDate, today: NaiveDate, events: &[CourseEvent]) {
    let grid = month_grid(reference);
    let month = reference.month();

    println!();
    println!("  {}", reference.format("%B %Y").to_string().bold());
    println!("  {}", "Su    Mo    Tu    We    Th    Fr    Sa".dimmed());

    for week in grid.chunks(7) {
        let mut numbers = String::from("  ");
        let mut dots = String::from("  ");

        for day in week {
            // Style after padding: ANSI codes would break format widths
            let label = format!("{:>2}", day.day());
            if *day == today {
                numbers.push_str(&label.reversed().to_string());
            } else if day.month() == month {
                numbers.push_str(&label);
            } else {
                numbers.push_str(&label.dimmed().to_string());
            }
            numbers.push_str("    ");

            let day_events = events_on(events, *day);
            let mut cell = String::new();
            for event in day_events.iter().take(3) {
                cell.push_str(&"●".color(ansi(event.color)).to_string());
            }
            // Pad by visible width, not byte length
            for _ in day_events.len().min(3)..3 {
                cell.push(' ');
            }
            dots.push_str(&cell);
            dots.push_str("   ");
        }

        println!("{}", numbers);
        println!("{}", dots);
    }
}
