pub mod local_storage_repository;
pub mod settings_repository;
