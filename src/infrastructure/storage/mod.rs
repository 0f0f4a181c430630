//! File-based storage implementation

use async_trait::async_trait;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

use crate::domain::traits::Store;
use crate::domain::entities::{ListName, MessageId};
use crate::application::errors::StorageError;

const MESSAGE_ID_FILE: &str = "message_id.txt";

/// Plain text store: one file per list plus the board message id
pub struct FileStore {
    base_path: PathBuf,
}

impl FileStore {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    pub async fn init(&self) -> Result<(), StorageError> {
        tokio::fs::create_dir_all(&self.base_path).await?;
        Ok(())
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn path_for(&self, file: &str) -> PathBuf {
        self.base_path.join(file)
    }

    /// Returns `None` when the file does not exist.
    async fn read_optional(path: &Path) -> Result<Option<String>, StorageError> {
        match tokio::fs::read_to_string(path).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Replace `path` in one step so readers never see a half-written file
    async fn atomic_write(path: &Path, data: &[u8]) -> Result<(), StorageError> {
        let path = path.to_path_buf();
        let data = data.to_vec();
        tokio::task::spawn_blocking(move || write_replacing(&path, &data))
            .await
            .map_err(|e| StorageError::Io(std::io::Error::new(std::io::ErrorKind::Other, e)))?
    }
}

/// Write into a uniquely named temp file next to `path`, sync it, then move it into place
fn write_replacing(path: &Path, data: &[u8]) -> Result<(), StorageError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(data)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// One entry per line, each line terminated by a newline
pub fn encode_entries(entries: &[String]) -> String {
    let mut out = String::new();
    for entry in entries {
        out.push_str(entry);
        out.push('\n');
    }
    out
}

pub fn decode_entries(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

#[async_trait]
impl Store for FileStore {
    async fn load_list(&self, name: ListName) -> Result<Vec<String>, StorageError> {
        let path = self.path_for(name.file_name());
        let entries = Self::read_optional(&path)
            .await?
            .map(|content| decode_entries(&content))
            .unwrap_or_default();
        tracing::debug!("Loaded {} entries from {}", entries.len(), path.display());
        Ok(entries)
    }

    async fn save_list(&self, name: ListName, entries: &[String]) -> Result<(), StorageError> {
        let path = self.path_for(name.file_name());
        Self::atomic_write(&path, encode_entries(entries).as_bytes()).await
    }

    async fn load_message_id(&self) -> Result<Option<MessageId>, StorageError> {
        let Some(content) = Self::read_optional(&self.path_for(MESSAGE_ID_FILE)).await? else {
            return Ok(None);
        };
        let trimmed = content.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }
        trimmed
            .parse::<MessageId>()
            .map(Some)
            .map_err(|e| StorageError::Corrupt {
                file: MESSAGE_ID_FILE.to_string(),
                reason: e.to_string(),
            })
    }

    async fn save_message_id(&self, id: MessageId) -> Result<(), StorageError> {
        Self::atomic_write(&self.path_for(MESSAGE_ID_FILE), id.to_string().as_bytes()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn entries(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_missing_files_read_empty() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path());

        assert!(store.load_list(ListName::Ally).await.unwrap().is_empty());
        assert_eq!(store.load_message_id().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_list_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path());
        let saved = entries(&["Nyx", "Vex the Bold", "Nyx"]);

        store.save_list(ListName::Enemies, &saved).await.unwrap();

        assert_eq!(store.load_list(ListName::Enemies).await.unwrap(), saved);
        let raw = std::fs::read_to_string(dir.path().join("enemies_list.txt")).unwrap();
        assert_eq!(raw, "Nyx\nVex the Bold\nNyx\n");
        // The other list is untouched
        assert!(!dir.path().join("ally_list.txt").exists());
    }

    #[tokio::test]
    async fn test_save_ignores_leftover_temp_paths() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("ally_list.txt.tmp")).unwrap();
        std::fs::write(dir.path().join("message_id.txt.tmp"), "garbage").unwrap();
        let store = FileStore::new(dir.path());

        store.save_list(ListName::Ally, &entries(&["Nyx"])).await.unwrap();
        store.save_message_id(9001).await.unwrap();

        assert_eq!(store.load_list(ListName::Ally).await.unwrap(), entries(&["Nyx"]));
        assert_eq!(store.load_message_id().await.unwrap(), Some(9001));
        // Only the two targets and the two leftovers; no temp files linger
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 4);
    }

    #[tokio::test]
    async fn test_save_empty_list_truncates() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path());

        store.save_list(ListName::Ally, &entries(&["Nyx"])).await.unwrap();
        store.save_list(ListName::Ally, &[]).await.unwrap();

        let raw = std::fs::read_to_string(dir.path().join("ally_list.txt")).unwrap();
        assert_eq!(raw, "");
    }

    #[test]
    fn test_decode_tolerates_crlf_and_blank_lines() {
        assert_eq!(decode_entries("Nyx\r\n\r\n  Vex  \n"), entries(&["Nyx", "Vex"]));
    }

    #[tokio::test]
    async fn test_message_id_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path().join("nested"));

        store.save_message_id(1427685251135569950).await.unwrap();
        assert_eq!(store.load_message_id().await.unwrap(), Some(1427685251135569950));
    }

    #[tokio::test]
    async fn test_corrupt_message_id() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("message_id.txt"), "not-a-number\n").unwrap();
        let store = FileStore::new(dir.path());

        let err = store.load_message_id().await.unwrap_err();
        assert!(matches!(err, StorageError::Corrupt { .. }));
    }
}
