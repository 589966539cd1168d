use std::path::Path;

use anyhow::{Context as _, Result};
use owo_colors::OwoColorize;
use planner_core::{Attachment, AttachmentKind};
use uuid::Uuid;

use crate::commands::{resolve_event, Context};

pub async fn run(id: &str, target: &str, name: Option<String>) -> Result<()> {
    let mut ctx = Context::open_logged_in().await?;

    let mut event = resolve_event(ctx.session.events(), id)?.clone();
    let attachment = build_attachment(target, name)?;
    let label = attachment.name.clone();

    event
        .attachments
        .get_or_insert_with(Vec::new)
        .push(attachment);

    ctx.session.update(event.clone()).await?;
    println!(
        "{} {} {} {}",
        "Attached".green(),
        label.bold(),
        "to".dimmed(),
        event.title
    );

    ctx.finish_sync().await;
    Ok(())
}

fn build_attachment(target: &str, name: Option<String>) -> Result<Attachment> {
    let is_link = target.starts_with("http://") || target.starts_with("https://");

    if is_link {
        Ok(Attachment {
            id: Uuid::new_v4().to_string(),
            name: name.unwrap_or_else(|| target.to_string()),
            kind: AttachmentKind::Link,
            path: target.to_string(),
            size: None,
        })
    } else {
        let path = Path::new(target);
        let metadata = std::fs::metadata(path)
            .with_context(|| format!("Cannot read file '{}'", target))?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| target.to_string());

        Ok(Attachment {
            id: Uuid::new_v4().to_string(),
            name: name.unwrap_or(file_name),
            kind: AttachmentKind::File,
            path: target.to_string(),
            size: Some(metadata.len()),
        })
    }
}
