//! CLI command implementations and shared session plumbing.

pub mod add;
pub mod attach;
pub mod detach;
pub mod edit;
pub mod list;
pub mod login;
pub mod logout;
pub mod month;
pub mod remove;
pub mod whoami;

use std::time::Duration;

use anyhow::{bail, Context as _, Result};
use chrono::{Local, NaiveDate};
use owo_colors::OwoColorize;
use planner_core::config::PlannerConfig;
use planner_core::store::remote::HttpRemote;
use planner_core::{CourseEvent, RemoteOp, Session, StorageService, SyncReport};
use tokio::sync::mpsc::UnboundedReceiver;

/// How long a mutating command waits for the background push report before
/// giving up on printing it. Matches the remote request timeout.
const SYNC_REPORT_WAIT: Duration = Duration::from_secs(10);

/// A restored session plus the channel the storage service reports
/// background sync outcomes on.
pub struct Context {
    pub session: Session<HttpRemote>,
    reports: UnboundedReceiver<SyncReport>,
    remote_configured: bool,
}

impl Context {
    /// Build the storage stack from configuration without touching a session.
    pub fn open() -> Result<Self> {
        let config = PlannerConfig::load().context("Failed to load configuration")?;
        let (service, reports) =
            StorageService::from_config(&config).context("Failed to open local storage")?;
        let remote_configured = service.remote_configured();

        Ok(Context {
            session: Session::new(service),
            reports,
            remote_configured,
        })
    }

    /// Restore the persisted session and load its events, failing with a
    /// hint when nobody is logged in.
    pub async fn open_logged_in() -> Result<Self> {
        let mut ctx = Self::open()?;

        if ctx.session.restore()?.is_none() {
            bail!("Not logged in. Run `planner login <username>` first.");
        }
        ctx.session.load().await.context("Failed to load events")?;
        ctx.print_pending_reports();

        Ok(ctx)
    }

    /// After a mutation: wait briefly for the detached push to report, then
    /// print whatever arrived. Purely diagnostic; the local save already
    /// succeeded by the time this runs.
    pub async fn finish_sync(&mut self) {
        if !self.remote_configured {
            return;
        }

        match tokio::time::timeout(SYNC_REPORT_WAIT, self.reports.recv()).await {
            Ok(Some(report)) => print_report(&report),
            Ok(None) | Err(_) => {
                println!("{}", "Remote sync still pending.".dimmed());
            }
        }
        self.print_pending_reports();
    }

    /// Print any reports that have already arrived (e.g. fetch fallbacks
    /// observed during load) without waiting.
    pub fn print_pending_reports(&mut self) {
        while let Ok(report) = self.reports.try_recv() {
            print_report(&report);
        }
    }
}

fn print_report(report: &SyncReport) {
    match (&report.op, &report.result) {
        (RemoteOp::Push, Ok(())) => println!("{}", "Synced to remote.".dimmed()),
        (RemoteOp::Push, Err(e)) => {
            println!(
                "{}",
                format!("Remote sync failed (changes are saved locally): {}", e).yellow()
            );
        }
        (RemoteOp::Fetch, Err(e)) => {
            println!(
                "{}",
                format!("Remote store unreachable, using local data: {}", e).yellow()
            );
        }
        (RemoteOp::Fetch, Ok(())) => {}
    }
}

/// Parse `YYYY-MM-DD`, defaulting to today.
pub fn parse_date(arg: Option<&str>) -> Result<NaiveDate> {
    match arg {
        Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .with_context(|| format!("Invalid date '{}' (expected YYYY-MM-DD)", raw)),
        None => Ok(Local::now().date_naive()),
    }
}

/// Validate an `HH:mm` wall-clock string, returning it unchanged.
///
/// Only the shape is checked; start/end ordering is deliberately not.
pub fn parse_time(raw: &str) -> Result<String> {
    let valid = raw.is_ascii()
        && raw.len() == 5
        && raw.as_bytes()[2] == b':'
        && raw[0..2].parse::<u8>().map(|h| h < 24).unwrap_or(false)
        && raw[3..5].parse::<u8>().map(|m| m < 60).unwrap_or(false);

    if !valid {
        bail!("Invalid time '{}' (expected HH:mm)", raw);
    }
    Ok(raw.to_string())
}

/// Resolve an event by id prefix, git-style. Exactly one match or an error.
pub fn resolve_event<'a>(events: &'a [CourseEvent], prefix: &str) -> Result<&'a CourseEvent> {
    let matches: Vec<&CourseEvent> = events
        .iter()
        .filter(|e| e.id.starts_with(prefix))
        .collect();

    match matches.as_slice() {
        [one] => Ok(one),
        [] => bail!("No event with id '{}'", prefix),
        _ => bail!("Id '{}' is ambiguous ({} matches)", prefix, matches.len()),
    }
}
