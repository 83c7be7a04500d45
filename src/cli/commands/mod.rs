pub mod about;
pub mod event_helpers;
pub mod history;
pub mod latest;
pub mod session_helpers;
