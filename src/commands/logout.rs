use anyhow::Result;
use owo_colors::OwoColorize;

use crate::commands::Context;

pub fn run() -> Result<()> {
    let mut ctx = Context::open()?;

    match ctx.session.restore()? {
        Some(user) => {
            let username = user.username.clone();
            ctx.session.logout()?;
            println!("Logged out {}.", username.bold());
        }
        None => println!("{}", "Nobody was logged in.".dimmed()),
    }
    Ok(())
}
