//! Domain layer for the MB-Sparrow support console.
//!
//! This crate holds the API-facing data model, the shared error type, the
//! gateway traits implemented by the HTTP client layer, and configuration
//! shapes. It performs no I/O of its own.

pub mod agent;
pub mod analysis;
pub mod auth;
pub mod backend;
pub mod chat;
pub mod config;
pub mod error;
pub mod feedme;
pub mod gateway;

// Re-export common error type
pub use error::{Result, SparrowError};
