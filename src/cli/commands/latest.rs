use std::sync::Arc;

use crate::cli::commands::event_helpers;
use crate::cli::commands::session_helpers::{self, Connection};
use crate::cli::output;
use crate::cli::{ConnectArgs, FilterArgs};
use vievents::{AppConfig, EventFilter, EventHistoryCollector, MaxCount, Result, ViSession};

/// Execute the `vievents latest` command.
///
/// Shows the collector's latest page. The server keeps that page
/// unordered, so events are sorted by key for display.
pub fn execute(
    args: &ConnectArgs,
    filter: &FilterArgs,
    page_size: Option<&str>,
    json: bool,
) -> Result<()> {
    let config = AppConfig::discover(args.config.as_deref())?;
    let page_size = page_size.map(str::parse::<MaxCount>).transpose()?;
    let filter = filter.to_filter()?;
    let conn = Connection::resolve(args, config)?;

    let session = conn.open_session()?;
    let result = with_collector(&session, &filter, page_size, json);
    session_helpers::close_session(&session);
    result
}

fn with_collector(
    session: &Arc<ViSession>,
    filter: &EventFilter,
    page_size: Option<MaxCount>,
    json: bool,
) -> Result<()> {
    let mut collector = EventHistoryCollector::create(Arc::clone(session), filter)?;
    let result = read_latest(&mut collector, page_size, json);
    session_helpers::release_collector(&collector);
    result
}

fn read_latest(
    collector: &mut EventHistoryCollector,
    page_size: Option<MaxCount>,
    json: bool,
) -> Result<()> {
    if let Some(size) = page_size {
        collector.set_collector_page_size(size)?;
    }

    let mut events = collector.get_latest_events()?;
    events.sort_by_key(|e| e.key());

    if !json {
        output::header(&format!("vievents latest ({} events)", events.len()));
        if events.is_empty() {
            output::warning("The latest page is empty");
            return Ok(());
        }
    }

    for event in &events {
        event_helpers::print_event(event, json)?;
    }
    Ok(())
}
