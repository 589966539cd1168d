use anyhow::Result;
use owo_colors::OwoColorize;
use planner_core::{CourseEvent, EventColor};

use crate::commands::{parse_date, parse_time, Context};
use crate::render::event_line;

pub async fn run(
    title: String,
    date: Option<String>,
    start: String,
    end: String,
    color: EventColor,
    location: Option<String>,
) -> Result<()> {
    let mut ctx = Context::open_logged_in().await?;

    let draft = CourseEvent {
        // The session assigns the id
        id: String::new(),
        title,
        location,
        date: parse_date(date.as_deref())?,
        start_time: parse_time(&start)?,
        end_time: parse_time(&end)?,
        color,
        attachments: None,
    };

    let created = ctx.session.create(draft).await?;
    println!("{} {}", "Added".green(), event_line(created));

    ctx.finish_sync().await;
    Ok(())
}
