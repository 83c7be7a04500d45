mod cli;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};

fn main() {
    let args = Cli::parse();
    init_tracing(args.verbose);
    cli::context::init(args.quiet);

    let result = match &args.command {
        Commands::About => cli::commands::about::execute(&args.connect),
        Commands::History {
            filter,
            max_count,
            newest_first,
            limit,
            json,
        } => cli::commands::history::execute(
            &args.connect,
            filter,
            max_count.as_deref(),
            *newest_first,
            *limit,
            *json,
        ),
        Commands::Latest {
            filter,
            page_size,
            json,
        } => cli::commands::latest::execute(&args.connect, filter, page_size.as_deref(), *json),
    };

    if let Err(e) = result {
        cli::output::error(&format!("Error: {e}"));
        std::process::exit(1);
    }
}

/// Log to stderr. `RUST_LOG` wins over `--verbose`.
fn init_tracing(verbose: bool) {
    let default = if verbose { "vievents=debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
