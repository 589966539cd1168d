use anyhow::Result;
use owo_colors::OwoColorize;
use planner_core::grid::events_on;

use crate::commands::{parse_date, Context};
use crate::render::event_line;

pub async fn run(date: Option<String>) -> Result<()> {
    let mut ctx = Context::open_logged_in().await?;

    let day = parse_date(date.as_deref())?;
    let mut events = events_on(ctx.session.events(), day);
    events.sort_by(|a, b| a.start_time.cmp(&b.start_time));

    println!("{}", day.format("%A, %B %-d %Y").to_string().bold());
    if events.is_empty() {
        println!("{}", "No events.".dimmed());
    }

    for event in events {
        println!("{}", event_line(event));
        for attachment in event.attachments() {
            let short_id: String = attachment.id.chars().take(8).collect();
            println!(
                "    {} {} {}",
                "↳".dimmed(),
                attachment.name,
                format!("[{}]", short_id).dimmed()
            );
        }
    }

    ctx.print_pending_reports();
    Ok(())
}
