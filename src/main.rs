mod commands;
mod render;

use anyhow::Result;
use clap::{Parser, Subcommand};
use planner_core::EventColor;

#[derive(Parser)]
#[command(name = "planner")]
#[command(about = "Manage your personal schedule, stored locally and synced to an optional remote store")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in (registers on first login) and load your schedule
    Login { username: String },
    /// Log out and forget the current session
    Logout,
    /// Show who is logged in
    Whoami,
    /// Add an event
    Add {
        /// Event title
        title: String,

        /// Date (YYYY-MM-DD, defaults to today)
        #[arg(short, long)]
        date: Option<String>,

        /// Start time (HH:mm)
        #[arg(short, long)]
        start: String,

        /// End time (HH:mm)
        #[arg(short, long)]
        end: String,

        /// Color tag: red, blue, green, orange, purple or gray
        #[arg(short, long, default_value = "blue")]
        color: EventColor,

        /// Location
        #[arg(short, long)]
        location: Option<String>,
    },
    /// Edit an event (fields left out stay unchanged)
    Edit {
        /// Event id (a unique prefix is enough)
        id: String,

        #[arg(short, long)]
        title: Option<String>,

        /// Date (YYYY-MM-DD)
        #[arg(short, long)]
        date: Option<String>,

        /// Start time (HH:mm)
        #[arg(short, long)]
        start: Option<String>,

        /// End time (HH:mm)
        #[arg(short, long)]
        end: Option<String>,

        #[arg(short, long)]
        color: Option<EventColor>,

        #[arg(short, long)]
        location: Option<String>,
    },
    /// Remove an event
    Remove {
        /// Event id (a unique prefix is enough)
        id: String,
    },
    /// Attach a file or link to an event
    Attach {
        /// Event id (a unique prefix is enough)
        id: String,

        /// File path or URL
        target: String,

        /// Display name (defaults to the file name or URL)
        #[arg(short, long)]
        name: Option<String>,
    },
    /// Remove an attachment from an event
    Detach {
        /// Event id (a unique prefix is enough)
        id: String,

        /// Attachment id (a unique prefix is enough)
        attachment: String,
    },
    /// List events for a day
    List {
        /// Date (YYYY-MM-DD, defaults to today)
        #[arg(short, long)]
        date: Option<String>,
    },
    /// Show the month grid
    Month {
        /// Any date inside the month (YYYY-MM-DD, defaults to today)
        #[arg(short, long)]
        date: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Login { username } => commands::login::run(&username).await,
        Commands::Logout => commands::logout::run(),
        Commands::Whoami => commands::whoami::run(),
        Commands::Add {
            title,
            date,
            start,
            end,
            color,
            location,
        } => commands::add::run(title, date, start, end, color, location).await,
        Commands::Edit {
            id,
            title,
            date,
            start,
            end,
            color,
            location,
        } => commands::edit::run(id, title, date, start, end, color, location).await,
        Commands::Remove { id } => commands::remove::run(&id).await,
        Commands::Attach { id, target, name } => commands::attach::run(&id, &target, name).await,
        Commands::Detach { id, attachment } => commands::detach::run(&id, &attachment).await,
        Commands::List { date } => commands::list::run(date).await,
        Commands::Month { date } => commands::month::run(date).await,
    }
}
