pub mod event_history_collector;
pub mod property_view;
pub mod session;
