//! Archive name validation
//!
//! Maps user-supplied archive names onto safe storage identifiers and
//! resolves which name a save request addresses.

use serde_json::Value;
use std::fmt;

use crate::error::StorageError;
use crate::storage::filesystem::TEMP_NAME_OVERHEAD;

/// Longest sanitized name, in characters.
pub const MAX_NAME_LENGTH: usize = 100;

/// Longest sanitized name, in UTF-8 bytes. Keeps `<name>.json` and its temp
/// sibling under the common 255-byte file name limit.
pub const MAX_NAME_BYTES: usize = 200;

const FILE_NAME_LIMIT: usize = 255;

const _: () = assert!(MAX_NAME_BYTES + ".json".len() + TEMP_NAME_OVERHEAD <= FILE_NAME_LIMIT);

/// Key inside a saved document that names the archive when the request
/// carries no top-level name.
pub const ARCHIVE_NAME_KEY: &str = "archive_name";

/// Sanitize a filename.
///
/// Keeps letters and digits of any script plus `_` and `-`, drops
/// everything else, then truncates to [`MAX_NAME_LENGTH`] characters or
/// [`MAX_NAME_BYTES`] bytes, whichever comes first. Truncation never splits
/// a character. The result may be empty.
pub fn sanitize_filename(filename: &str) -> String {
    let mut safe = String::new();
    for c in filename
        .chars()
        .filter(|c| is_permitted(*c))
        .take(MAX_NAME_LENGTH)
    {
        if safe.len() + c.len_utf8() > MAX_NAME_BYTES {
            break;
        }
        safe.push(c);
    }
    safe
}

fn is_permitted(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '-'
}

/// A sanitized, non-empty archive name. The only form used to address
/// files in the archive directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArchiveName(String);

impl ArchiveName {
    /// Sanitizes `raw` and rejects names with nothing left after sanitizing.
    pub fn parse(raw: &str) -> Result<Self, StorageError> {
        let safe = sanitize_filename(raw);
        if safe.is_empty() {
            return Err(StorageError::InvalidRequest(
                "archive name contains no usable characters".into(),
            ));
        }
        Ok(Self(safe))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Name of the file backing this archive.
    pub fn file_name(&self) -> String {
        format!("{}.json", self.0)
    }
}

impl fmt::Display for ArchiveName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Picks the archive name for a save.
///
/// A top-level name wins. Otherwise the document itself may carry the
/// name as a string under [`ARCHIVE_NAME_KEY`]. With neither, the request
/// is invalid.
pub fn resolve_archive_name(
    top_level: Option<&str>,
    data: &Value,
) -> Result<ArchiveName, StorageError> {
    let raw = top_level
        .or_else(|| data.get(ARCHIVE_NAME_KEY).and_then(Value::as_str))
        .ok_or_else(|| StorageError::InvalidRequest("missing archive name".into()))?;

    ArchiveName::parse(raw)
}
