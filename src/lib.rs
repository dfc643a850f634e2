//! fanren-sync
//!
//! A small self-hosted service that lists, loads, saves, and deletes named
//! JSON archives in a local directory, guarded by one shared password.

pub mod auth;
pub mod config;
pub mod error;
pub mod middleware;
pub mod protocol;
pub mod server;
pub mod storage;

pub use config::ServerConfig;
pub use error::{ApiError, StartupError, StorageError};
pub use server::{AppState, Server, app};
pub use storage::{ArchiveName, ArchiveStore, sanitize_filename};
