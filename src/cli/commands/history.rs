use std::sync::Arc;

use indicatif::ProgressBar;

use crate::cli::commands::event_helpers;
use crate::cli::commands::session_helpers::{self, Connection};
use crate::cli::output;
use crate::cli::{ConnectArgs, FilterArgs};
use vievents::{
    AppConfig, EventFilter, EventHistoryCollector, EventRecord, MaxCount, ReadDirection, Result,
    ViSession,
};

/// How to walk the history.
pub struct WalkOptions {
    pub max_count: MaxCount,
    pub newest_first: bool,
    pub limit: Option<usize>,
    pub json: bool,
}

/// Execute the `vievents history` command.
///
/// Arguments are validated before connecting, so a bad `--max-count` or
/// date never reaches the server.
pub fn execute(
    args: &ConnectArgs,
    filter: &FilterArgs,
    max_count: Option<&str>,
    newest_first: bool,
    limit: Option<usize>,
    json: bool,
) -> Result<()> {
    let config = AppConfig::discover(args.config.as_deref())?;
    let max_count = match max_count {
        Some(raw) => raw.parse::<MaxCount>()?,
        None => MaxCount::try_from(config.collector.max_count)?,
    };
    let filter = filter.to_filter()?;
    let conn = Connection::resolve(args, config)?;

    let opts = WalkOptions {
        max_count,
        newest_first,
        limit,
        json,
    };

    let session = conn.open_session()?;
    let result = with_collector(&session, &filter, &opts);
    session_helpers::close_session(&session);
    result
}

fn with_collector(session: &Arc<ViSession>, filter: &EventFilter, opts: &WalkOptions) -> Result<()> {
    let mut collector = EventHistoryCollector::create(Arc::clone(session), filter)?;
    let sp = if opts.json {
        ProgressBar::hidden()
    } else {
        output::spinner("Reading event history...")
    };
    let result = walk(&mut collector, opts, |event| {
        sp.suspend(|| event_helpers::print_event(event, opts.json))
    });
    sp.finish_and_clear();
    session_helpers::release_collector(&collector);

    let shown = result?;
    if !opts.json {
        if shown == 0 {
            output::warning("No matching events");
        } else {
            output::success(&format!("{shown} events"));
        }
    }
    Ok(())
}

/// Hand events to `emit` in the requested order until the history or the
/// limit runs out. Returns how many were emitted.
///
/// Oldest first is a rewind followed by forward reads. Newest first
/// starts with the latest page (which a reset skips), newest key first,
/// then reads backward from just before it.
pub fn walk<F>(collector: &mut EventHistoryCollector, opts: &WalkOptions, mut emit: F) -> Result<usize>
where
    F: FnMut(&EventRecord) -> Result<()>,
{
    let mut shown = 0usize;
    let mut take = |events: &[EventRecord], shown: usize| -> Result<usize> {
        let room = opts.limit.map_or(usize::MAX, |l| l.saturating_sub(shown));
        let mut taken = 0;
        for event in events.iter().take(room) {
            emit(event)?;
            taken += 1;
        }
        Ok(taken)
    };

    let direction = if opts.newest_first {
        let mut latest = collector.get_latest_events()?;
        latest.sort_by_key(|e| std::cmp::Reverse(e.key()));
        shown += take(&latest, shown)?;
        collector.reset_collector()?;
        ReadDirection::Previous
    } else {
        collector.rewind_collector()?;
        ReadDirection::Next
    };

    loop {
        let request = match opts.limit {
            Some(limit) if shown >= limit => break,
            Some(limit) => opts.max_count.capped(limit - shown),
            None => opts.max_count,
        };
        let page = collector.read_events(request, direction)?;
        if page.is_empty() {
            break;
        }
        shown += take(&page, shown)?;
    }

    Ok(shown)
}
