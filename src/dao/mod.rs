/// Session-scoped client for the party-games HTTP API.
pub mod api;
/// Preference backend persisted as a JSON file.
pub mod file_store;
/// In-memory preference backend for tests and private sessions.
pub mod memory_store;
/// Key/value storage abstraction behind the preference store.
pub mod storage;
