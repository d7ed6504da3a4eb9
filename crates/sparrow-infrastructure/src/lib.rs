//! Local storage layer for the MB-Sparrow console.
//!
//! Only configuration and the bearer token are persisted; chat data never
//! touches disk — sessions and messages live behind the backend API.

pub mod config_storage;
pub mod paths;
pub mod secret_storage;

pub use config_storage::ConfigStorage;
pub use paths::SparrowPaths;
pub use secret_storage::SecretStorage;
