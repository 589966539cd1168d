use anyhow::Result;
use owo_colors::OwoColorize;

use crate::commands::{resolve_event, Context};

pub async fn run(id: &str) -> Result<()> {
    let mut ctx = Context::open_logged_in().await?;

    let event = resolve_event(ctx.session.events(), id)?;
    let full_id = event.id.clone();
    let title = event.title.clone();

    ctx.session.delete(&full_id).await?;
    println!("{} {}", "Removed".green(), title.bold());

    ctx.finish_sync().await;
    Ok(())
}
