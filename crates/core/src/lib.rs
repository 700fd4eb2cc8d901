//! Core types and shared functionality for shelfmap.
//!
//! This crate provides:
//! - Persistent request cache with a JSON file backend
//! - Unified error types
//! - Configuration structures

pub mod cache;
pub mod config;
pub mod error;

pub use cache::{CacheEntry, CacheStorage, CacheStore, JsonFileStorage, MemoryStorage, PersistentCache};
pub use config::{AppConfig, ConfigError};
pub use error::Error;
