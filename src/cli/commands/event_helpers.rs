use colored::Colorize;

use vievents::{EventRecord, Result, ViError};

/// Render an event as one terminal row: time, type, user, message.
pub fn format_event(event: &EventRecord) -> String {
    let time = event
        .created_time()
        .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| "-".to_string());
    let user = event.user_name().unwrap_or("-");
    let message = event.message().unwrap_or_default().trim();

    format!(
        "  {} {} {} {} {}",
        time.dimmed(),
        "│".dimmed(),
        format_type(event.event_type()),
        user.cyan(),
        message,
    )
}

/// Render an event as a single JSON line.
pub fn format_event_json(event: &EventRecord) -> Result<String> {
    serde_json::to_string(event).map_err(|e| ViError::MalformedResponse {
        detail: format!("event {} cannot be written as JSON: {e}", event.key().unwrap_or(-1)),
    })
}

/// Print an event in the chosen format.
pub fn print_event(event: &EventRecord, json: bool) -> Result<()> {
    if json {
        println!("{}", format_event_json(event)?);
    } else {
        println!("{}", format_event(event));
    }
    Ok(())
}

/// Color event types by rough severity so failures stand out.
fn format_type(event_type: &str) -> String {
    let padded = format!("{event_type:<32}");
    if event_type.contains("Failed") || event_type.contains("Error") || event_type.contains("Bad") {
        padded.red().to_string()
    } else if event_type.contains("Warning") || event_type.contains("Alarm") {
        padded.yellow().to_string()
    } else if event_type.starts_with("UserLogin") || event_type.starts_with("UserLogout") {
        padded.blue().to_string()
    } else {
        padded.green().to_string()
    }
}
