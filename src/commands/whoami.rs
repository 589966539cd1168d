use anyhow::Result;
use owo_colors::OwoColorize;

use crate::commands::Context;

pub fn run() -> Result<()> {
    let mut ctx = Context::open()?;

    match ctx.session.restore()? {
        Some(user) => {
            print!("{}", user.username.bold());
            match user.last_login {
                Some(at) => println!("  {}", format!("last login {}", at.format("%Y-%m-%d %H:%M UTC")).dimmed()),
                None => println!(),
            }
        }
        None => println!("{}", "Not logged in.".dimmed()),
    }
    Ok(())
}
