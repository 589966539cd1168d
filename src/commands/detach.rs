use anyhow::{bail, Result};
use owo_colors::OwoColorize;

use crate::commands::{resolve_event, Context};

pub async fn run(id: &str, attachment: &str) -> Result<()> {
    let mut ctx = Context::open_logged_in().await?;

    let mut event = resolve_event(ctx.session.events(), id)?.clone();

    let attachments = event.attachments.get_or_insert_with(Vec::new);
    let matches: Vec<usize> = attachments
        .iter()
        .enumerate()
        .filter(|(_, a)| a.id.starts_with(attachment))
        .map(|(i, _)| i)
        .collect();

    let index = match matches.as_slice() {
        [one] => *one,
        [] => bail!("No attachment with id '{}' on '{}'", attachment, event.title),
        _ => bail!("Attachment id '{}' is ambiguous", attachment),
    };

    let removed = attachments.remove(index);
    if attachments.is_empty() {
        event.attachments = None;
    }

    ctx.session.update(event.clone()).await?;
    println!(
        "{} {} {} {}",
        "Detached".green(),
        removed.name.bold(),
        "from".dimmed(),
        event.title
    );

    ctx.finish_sync().await;
    Ok(())
}
