//! Storage operations
//!
//! Handles the archive directory for the sync endpoints: list, load, save,
//! and delete. Every call goes to the filesystem; nothing is cached.

use log::{debug, error, info};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::error::StorageError;
use crate::storage::filesystem::{create_directory, read_if_exists, remove_if_exists, write_atomic};
use crate::storage::validation::ArchiveName;

const ARCHIVE_EXTENSION: &str = ".json";

/// A flat directory of `<name>.json` archives.
#[derive(Debug, Clone)]
pub struct ArchiveStore {
    root: PathBuf,
}

impl ArchiveStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn archive_path(&self, name: &ArchiveName) -> PathBuf {
        self.root.join(name.file_name())
    }

    /// Create the archive directory if it does not exist yet. Called once at startup.
    pub async fn ensure_root(&self) -> Result<(), StorageError> {
        create_directory(&self.root)
            .await
            .map_err(|e| StorageError::unavailable("create directory", &self.root, e))?;
        info!("Archive directory ready: {}", self.root.display());
        Ok(())
    }

    /// Lists archive names, sorted.
    pub async fn list(&self) -> Result<Vec<String>, StorageError> {
        let mut entries = fs::read_dir(&self.root).await.map_err(|e| {
            error!("Failed to list {}: {}", self.root.display(), e);
            StorageError::unavailable("list", &self.root, e)
        })?;

        let mut archives = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| StorageError::unavailable("list", &self.root, e))?
        {
            let file_name = entry.file_name().to_string_lossy().into_owned();
            let Some(name) = file_name.strip_suffix(ARCHIVE_EXTENSION) else {
                continue;
            };

            // Follows symlinks, so linked archives are listed too
            match fs::metadata(entry.path()).await {
                Ok(metadata) if metadata.is_file() => archives.push(name.to_string()),
                Ok(_) => {}
                Err(e) => debug!("Skipping {} in listing: {}", file_name, e),
            }
        }

        archives.sort();
        debug!("Listed {} archives in {}", archives.len(), self.root.display());
        Ok(archives)
    }

    /// Loads an archive's JSON document.
    pub async fn load(&self, name: &ArchiveName) -> Result<Value, StorageError> {
        let path = self.archive_path(name);
        let content = read_if_exists(&path)
            .await
            .map_err(|e| StorageError::unavailable("read", &path, e))?
            .ok_or_else(|| StorageError::NotFound(name.to_string()))?;

        let value = serde_json::from_str(&content).map_err(|source| StorageError::Corrupt {
            name: name.to_string(),
            source,
        })?;

        debug!("Loaded archive {} ({} bytes)", name, content.len());
        Ok(value)
    }

    /// Saves a document, fully replacing any archive with the same name.
    ///
    /// Output is pretty-printed with two-space indentation and non-ASCII
    /// characters written as-is.
    pub async fn save(&self, name: &ArchiveName, value: &Value) -> Result<(), StorageError> {
        let path = self.archive_path(name);
        let data = serde_json::to_string_pretty(value)
            .map_err(|e| StorageError::Unexpected(format!("failed to serialize {name}: {e}")))?;

        write_atomic(&path, data.as_bytes()).await.map_err(|e| {
            error!("Failed to write {}: {}", path.display(), e);
            StorageError::unavailable("write", &path, e)
        })?;

        info!("Saved archive {} ({} bytes)", name, data.len());
        Ok(())
    }

    /// Deletes an archive.
    pub async fn delete(&self, name: &ArchiveName) -> Result<(), StorageError> {
        let path = self.archive_path(name);
        let existed = remove_if_exists(&path).await.map_err(|e| {
            error!("Failed to delete {}: {}", path.display(), e);
            StorageError::unavailable("delete", &path, e)
        })?;

        if !existed {
            return Err(StorageError::NotFound(name.to_string()));
        }

        info!("Deleted archive {}", name);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashSet;
    use tempfile::TempDir;

    fn store() -> (TempDir, ArchiveStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = ArchiveStore::new(dir.path());
        (dir, store)
    }

    fn name(raw: &str) -> ArchiveName {
        ArchiveName::parse(raw).unwrap()
    }

    #[tokio::test]
    async fn load_returns_what_was_saved() {
        let (_dir, store) = store();
        let values = [
            json!({ "level": 12, "items": ["sword", "shield"], "hp": 99.5 }),
            json!([1, [2, [3, []]], {}]),
            json!(42),
            json!(-7.25),
            json!("plain string"),
            json!(true),
            json!(null),
            json!({ "玩家": "韩立", "emoji": "🗡️", "nested": { "deep": { "deeper": [null, false] } } }),
        ];

        for (i, value) in values.iter().enumerate() {
            let archive = name(&format!("slot{i}"));
            store.save(&archive, value).await.unwrap();
            assert_eq!(&store.load(&archive).await.unwrap(), value);
        }
    }

    #[tokio::test]
    async fn save_overwrites_previous_content() {
        let (dir, store) = store();
        let archive = name("slot");

        store.save(&archive, &json!({ "v": 1 })).await.unwrap();
        store.save(&archive, &json!({ "v": 2 })).await.unwrap();

        assert_eq!(store.load(&archive).await.unwrap(), json!({ "v": 2 }));
        let files: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(files.len(), 1);
    }

    #[tokio::test]
    async fn saved_file_is_pretty_printed_with_literal_unicode() {
        let (dir, store) = store();
        store
            .save(&name("slot"), &json!({ "name": "韩立", "tags": [1] }))
            .await
            .unwrap();

        let content = std::fs::read_to_string(dir.path().join("slot.json")).unwrap();
        assert_eq!(content, "{\n  \"name\": \"韩立\",\n  \"tags\": [\n    1\n  ]\n}");
    }

    #[tokio::test]
    async fn saving_identical_content_is_byte_stable() {
        let (dir, store) = store();
        let archive = name("slot");
        let value = json!({ "a": [1, 2, 3], "b": { "c": "d" } });

        store.save(&archive, &value).await.unwrap();
        let first = std::fs::read(dir.path().join("slot.json")).unwrap();
        store.save(&archive, &value).await.unwrap();
        let second = std::fs::read(dir.path().join("slot.json")).unwrap();

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn delete_then_load_is_not_found() {
        let (_dir, store) = store();
        let archive = name("slot");
        store.save(&archive, &json!({})).await.unwrap();

        store.delete(&archive).await.unwrap();

        assert!(matches!(
            store.load(&archive).await,
            Err(StorageError::NotFound(_))
        ));
        assert!(matches!(
            store.delete(&archive).await,
            Err(StorageError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn list_reflects_directory_contents() {
        let (dir, store) = store();
        for n in ["a", "b", "c"] {
            store.save(&name(n), &json!({ "n": n })).await.unwrap();
        }
        store.delete(&name("b")).await.unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();
        std::fs::create_dir(dir.path().join("folder.json")).unwrap();

        let listed: HashSet<String> = store.list().await.unwrap().into_iter().collect();
        let expected: HashSet<String> = ["a", "c"].iter().map(|s| s.to_string()).collect();
        assert_eq!(listed, expected);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn list_follows_symlinked_archives() {
        let (dir, store) = store();
        let elsewhere = tempfile::tempdir().unwrap();
        let target = elsewhere.path().join("shared.json");
        std::fs::write(&target, "{}").unwrap();
        std::os::unix::fs::symlink(&target, dir.path().join("linked.json")).unwrap();
        std::os::unix::fs::symlink(elsewhere.path().join("gone.json"), dir.path().join("dangling.json"))
            .unwrap();

        assert_eq!(store.list().await.unwrap(), vec!["linked".to_string()]);
        assert_eq!(store.load(&name("linked")).await.unwrap(), json!({}));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_saves_to_one_name_all_succeed() {
        let (dir, store) = store();
        let archive = name("slot");

        for round in 0..10 {
            let mut tasks = Vec::new();
            for writer in 0..16 {
                let store = store.clone();
                let archive = archive.clone();
                let value = json!({ "round": round, "writer": writer, "pad": vec![writer; 4096] });
                tasks.push(tokio::spawn(async move { store.save(&archive, &value).await }));
            }
            for task in tasks {
                task.await.unwrap().unwrap();
            }
        }

        let stored = store.load(&archive).await.unwrap();
        assert_eq!(stored["round"], json!(9));
        let files: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(files.len(), 1);
    }

    #[tokio::test]
    async fn longest_multibyte_names_can_be_stored() {
        let (_dir, store) = store();
        let archive = name(&"存".repeat(90));
        let value = json!({ "realm": "筑基" });

        store.save(&archive, &value).await.unwrap();

        assert_eq!(store.load(&archive).await.unwrap(), value);
        assert_eq!(store.list().await.unwrap(), vec![archive.as_str().to_string()]);
    }

    #[tokio::test]
    async fn colliding_names_share_one_file() {
        let (_dir, store) = store();
        store.save(&name("foo!bar"), &json!("first")).await.unwrap();
        store.save(&name("foobar"), &json!("second")).await.unwrap();

        assert_eq!(store.list().await.unwrap(), vec!["foobar".to_string()]);
        assert_eq!(store.load(&name("foo!bar")).await.unwrap(), json!("second"));
    }

    #[tokio::test]
    async fn traversal_names_stay_inside_root() {
        let (dir, store) = store();
        let archive = name("../../etc/passwd");
        assert_eq!(archive.as_str(), "etcpasswd");

        store.save(&archive, &json!({ "x": 1 })).await.unwrap();

        assert!(dir.path().join("etcpasswd.json").is_file());
    }

    #[tokio::test]
    async fn corrupt_file_is_reported() {
        let (dir, store) = store();
        std::fs::write(dir.path().join("broken.json"), "{ not json").unwrap();

        assert!(matches!(
            store.load(&name("broken")).await,
            Err(StorageError::Corrupt { .. })
        ));
    }

    #[tokio::test]
    async fn missing_directory_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArchiveStore::new(dir.path().join("missing"));

        assert!(matches!(
            store.list().await,
            Err(StorageError::StorageUnavailable { .. })
        ));

        store.ensure_root().await.unwrap();
        assert!(store.list().await.unwrap().is_empty());
    }
}
