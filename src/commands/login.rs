use anyhow::{Context as _, Result};
use owo_colors::OwoColorize;
use planner_core::PlannerError;

use crate::commands::Context;
use crate::render::create_spinner;

pub async fn run(username: &str) -> Result<()> {
    let mut ctx = Context::open()?;

    let pin = rpassword::prompt_password("PIN: ").context("Failed to read PIN")?;

    let spinner = create_spinner("Logging in...".to_string());
    let result = ctx.session.login(username, &pin).await;
    spinner.finish_and_clear();

    match result {
        Ok(user) => {
            println!("Logged in as {}.", user.username.bold());
        }
        Err(PlannerError::InvalidCredentials) => {
            anyhow::bail!("Invalid PIN for '{}'.", username);
        }
        Err(e) => return Err(e).context("Login failed"),
    }

    let spinner = create_spinner("Loading events...".to_string());
    let result = ctx.session.load().await;
    spinner.finish_and_clear();
    result.context("Failed to load events")?;

    ctx.print_pending_reports();
    println!(
        "{} event(s) in your schedule.",
        ctx.session.events().len().to_string().bold()
    );
    Ok(())
}
