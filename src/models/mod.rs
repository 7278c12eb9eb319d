pub mod catalog;
pub mod entry;
pub mod profile;
pub mod progress;
pub mod session;
pub mod settings;
