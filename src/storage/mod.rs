//! Archive storage
//!
//! Name sanitization and CRUD operations over the archive directory.

pub mod filesystem;
pub mod operations;
pub mod validation;

pub use operations::ArchiveStore;
pub use validation::{ARCHIVE_NAME_KEY, ArchiveName, resolve_archive_name, sanitize_filename};
