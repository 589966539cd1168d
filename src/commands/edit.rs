use anyhow::Result;
use owo_colors::OwoColorize;
use planner_core::EventColor;

use crate::commands::{parse_date, parse_time, resolve_event, Context};
use crate::render::event_line;

#[allow(clippy::too_many_arguments)]
pub async fn run(
    id: String,
    title: Option<String>,
    date: Option<String>,
    start: Option<String>,
    end: Option<String>,
    color: Option<EventColor>,
    location: Option<String>,
) -> Result<()> {
    let mut ctx = Context::open_logged_in().await?;

    let mut event = resolve_event(ctx.session.events(), &id)?.clone();

    if let Some(title) = title {
        event.title = title;
    }
    if let Some(date) = date {
        event.date = parse_date(Some(&date))?;
    }
    if let Some(start) = start {
        event.start_time = parse_time(&start)?;
    }
    if let Some(end) = end {
        event.end_time = parse_time(&end)?;
    }
    if let Some(color) = color {
        event.color = color;
    }
    if let Some(location) = location {
        event.location = Some(location);
    }

    ctx.session.update(event.clone()).await?;
    println!("{} {}", "Updated".green(), event_line(&event));

    ctx.finish_sync().await;
    Ok(())
}
