pub mod check_in_session;
pub mod entry_store;
pub mod metric_catalog;
pub mod profile_service;
pub mod progress_service;
pub mod settings_service;
