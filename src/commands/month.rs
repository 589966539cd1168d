use anyhow::Result;
use chrono::Local;

use crate::commands::{parse_date, Context};
use crate::render::print_month;

pub async fn run(date: Option<String>) -> Result<()> {
    let mut ctx = Context::open_logged_in().await?;

    let reference = parse_date(date.as_deref())?;
    let today = Local::now().date_naive();

    print_month(reference, today, ctx.session.events());
    println!();

    ctx.print_pending_reports();
    Ok(())
}
