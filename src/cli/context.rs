use std::sync::OnceLock;

static QUIET: OnceLock<bool> = OnceLock::new();

/// Record the global `--quiet` flag once at startup.
pub fn init(quiet: bool) {
    let _ = QUIET.set(quiet);
}

/// Whether status output (headers, success lines, spinners) is suppressed.
/// Events and errors are always printed.
pub fn is_quiet() -> bool {
    QUIET.get().copied().unwrap_or(false)
}
