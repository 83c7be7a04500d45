pub mod commands;
pub mod context;
pub mod output;

use std::path::PathBuf;

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use clap::{Args, Parser, Subcommand};

use vievents::{EventFilter, Result, ViError};

/// Page through vSphere event history.
#[derive(Parser, Debug)]
#[command(name = "vievents", version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub connect: ConnectArgs,

    /// Verbose output (debug logging on stderr)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Quiet mode: only show errors and events
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// Where and how to connect.
#[derive(Args, Debug, Clone)]
pub struct ConnectArgs {
    /// Path to alternative config file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// SDK endpoint, e.g. https://vcenter.example.com/sdk
    #[arg(long, global = true, env = "VIEVENTS_SERVER")]
    pub server: Option<String>,

    /// User to log in as
    #[arg(short, long, global = true, env = "VIEVENTS_USERNAME")]
    pub username: Option<String>,

    /// Password (prefer the VIEVENTS_PASSWORD environment variable)
    #[arg(long, global = true, env = "VIEVENTS_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Accept invalid TLS certificates (self-signed lab hosts)
    #[arg(long, global = true)]
    pub insecure: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the server product and API version
    About,

    /// Walk the event history matching the filters
    History {
        #[command(flatten)]
        filter: FilterArgs,

        /// Events requested per read (default: collector.max_count from config)
        #[arg(long)]
        max_count: Option<String>,

        /// Walk from the newest event back to the oldest
        #[arg(long)]
        newest_first: bool,

        /// Stop after N events
        #[arg(long)]
        limit: Option<usize>,

        /// Print one JSON object per event
        #[arg(long)]
        json: bool,
    },

    /// Show the latest page of matching events
    Latest {
        #[command(flatten)]
        filter: FilterArgs,

        /// Resize the latest page before reading it
        #[arg(long)]
        page_size: Option<String>,

        /// Print one JSON object per event
        #[arg(long)]
        json: bool,
    },
}

/// Event filter flags shared by `history` and `latest`.
#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Only this event type, e.g. UserLoginSessionEvent (repeatable)
    #[arg(long = "type", value_name = "EVENT_TYPE")]
    pub types: Vec<String>,

    /// Only events by this user (repeatable)
    #[arg(long = "user", value_name = "USER")]
    pub users: Vec<String>,

    /// Include events generated by the system user
    #[arg(long)]
    pub system_user: bool,

    /// Only events at or after this time (RFC 3339 or YYYY-MM-DD)
    #[arg(long)]
    pub since: Option<String>,

    /// Only events at or before this time (RFC 3339 or YYYY-MM-DD, inclusive)
    #[arg(long)]
    pub until: Option<String>,
}

impl FilterArgs {
    /// Build the collector filter. A user filter is created as soon as
    /// `--user` or `--system-user` is given.
    pub fn to_filter(&self) -> Result<EventFilter> {
        let mut builder = EventFilter::builder().event_types(self.types.iter().cloned());

        if let Some(since) = &self.since {
            builder = builder.begin(parse_time(since, NaiveTime::default())?);
        }
        if let Some(until) = &self.until {
            let end_of_day = NaiveTime::from_hms_milli_opt(23, 59, 59, 999).unwrap_or_default();
            builder = builder.end(parse_time(until, end_of_day)?);
        }
        if !self.users.is_empty() || self.system_user {
            builder = builder.users(self.users.iter().cloned(), self.system_user);
        }

        Ok(builder.build())
    }
}

/// Parse RFC 3339, or a bare `YYYY-MM-DD` at `time_of_day` UTC.
fn parse_time(s: &str, time_of_day: NaiveTime) -> Result<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map(|d| Utc.from_utc_datetime(&d.and_time(time_of_day)))
        .map_err(|_| {
            ViError::parameter(format!(
                "Invalid time: '{s}'. Expected RFC 3339 (2026-01-15T08:00:00Z) or YYYY-MM-DD"
            ))
        })
}
