use crate::cli::ConnectArgs;
use crate::cli::commands::session_helpers::Connection;
use crate::cli::output;
use vievents::{AppConfig, Result};

/// Execute the `vievents about` command.
///
/// Connects without logging in and prints what the server reports
/// about itself.
pub fn execute(args: &ConnectArgs) -> Result<()> {
    let config = AppConfig::discover(args.config.as_deref())?;
    let conn = Connection::resolve(args, config)?;
    let session = conn.connect()?;
    let about = session.about();

    output::header(&format!("vievents about ({})", conn.url));
    println!("  Product:     {}", about.full_name);
    println!("  API version: {}", about.api_version);
    if let Some(uuid) = &about.instance_uuid {
        println!("  Instance:    {uuid}");
    }
    if session.event_manager().is_err() {
        output::warning("This server does not expose an EventManager");
    }

    Ok(())
}
