use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde_json::Value;
use tempfile::NamedTempFile;

use crate::io::lock::FileLock;
use crate::model::vault::Vault;
use crate::store::{StoreError, TableBackend};

/// Record store backed by one JSON file per table under
/// `keepsake/data/<owner>/`.
pub struct FileStore {
    vault_dir: PathBuf,
    data_dir: PathBuf,
    /// Held for the lifetime of a mutating command
    lock: Option<FileLock>,
}

impl FileStore {
    /// Open the owner's tables. The data directory is created on first write.
    pub fn open(vault: &Vault) -> Self {
        FileStore {
            vault_dir: vault.vault_dir.clone(),
            data_dir: vault.vault_dir.join("data").join(&vault.owner),
            lock: None,
        }
    }

    /// Take the vault write lock until this store is dropped, so a whole
    /// read-modify-write sequence runs without another writer in between.
    pub fn lock(&mut self) -> Result<(), StoreError> {
        if self.lock.is_none() {
            self.lock = Some(FileLock::acquire_default(&self.vault_dir)?);
        }
        Ok(())
    }

    pub fn table_path(&self, table: &str) -> PathBuf {
        self.data_dir.join(format!("{}.json", table))
    }
}

impl TableBackend for FileStore {
    fn read_rows(&self, table: &'static str) -> Result<Vec<Value>, StoreError> {
        let path = self.table_path(table);
        if !path.exists() {
            return Ok(Vec::new());
        }
        let text = fs::read_to_string(&path).map_err(|e| StoreError::Io {
            path: path.clone(),
            source: e,
        })?;
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(&text).map_err(|e| StoreError::Decode { table, source: e })
    }

    fn write_rows(&mut self, table: &'static str, rows: Vec<Value>) -> Result<(), StoreError> {
        // A store that was never locked still takes the lock for the write itself
        let _guard = match self.lock {
            Some(_) => None,
            None => Some(FileLock::acquire_default(&self.vault_dir)?),
        };

        let path = self.table_path(table);
        fs::create_dir_all(&self.data_dir).map_err(|e| StoreError::Io {
            path: self.data_dir.clone(),
            source: e,
        })?;
        let mut content =
            serde_json::to_string_pretty(&Value::Array(rows)).map_err(StoreError::Encode)?;
        content.push('\n');
        atomic_write(&path, content.as_bytes()).map_err(|e| StoreError::Io {
            path: path.clone(),
            source: e,
        })?;
        tracing::trace!(path = %path.display(), "table written");
        Ok(())
    }
}

/// Write `content` to `path` atomically using a temp file + rename.
pub fn atomic_write(path: &Path, content: &[u8]) -> io::Result<()> {
    let dir = path.parent().unwrap_or(Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::config::{DisplayConfig, LogConfig, VaultConfig, VaultInfo};
    use crate::model::message::{MessageStatus, ScheduledMessage};
    use crate::store::RecordStore;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn sample_vault(root: &Path, owner: &str) -> Vault {
        let vault_dir = root.join("keepsake");
        fs::create_dir_all(&vault_dir).unwrap();
        Vault {
            root: root.to_path_buf(),
            vault_dir,
            config: VaultConfig {
                vault: VaultInfo {
                    name: "test".into(),
                    owner: owner.into(),
                },
                display: DisplayConfig::default(),
                log: LogConfig::default(),
            },
            owner: owner.into(),
        }
    }

    fn sample_message() -> ScheduledMessage {
        ScheduledMessage {
            id: String::new(),
            recipient: "Nora".into(),
            subject: "For your wedding day".into(),
            content: "Be kind to each other.".into(),
            authored_on: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
            delivery_on: None,
            status: MessageStatus::Draft,
            tags: Vec::new(),
        }
    }

    #[test]
    fn test_missing_table_reads_empty() {
        let tmp = TempDir::new().unwrap();
        let store = FileStore::open(&sample_vault(tmp.path(), "robin"));
        assert!(store.list_all::<ScheduledMessage>().unwrap().is_empty());
    }

    #[test]
    fn test_insert_persists_to_owner_directory() {
        let tmp = TempDir::new().unwrap();
        let vault = sample_vault(tmp.path(), "robin");
        let mut store = FileStore::open(&vault);
        let saved = store.insert(sample_message()).unwrap();
        assert_eq!(saved.id, "MSG-001");

        let path = tmp.path().join("keepsake/data/robin/scheduled_messages.json");
        let text = fs::read_to_string(path).unwrap();
        assert!(text.contains("\"recipient\": \"Nora\""));
        assert!(text.contains("\"status\": \"draft\""));

        let reopened = FileStore::open(&vault);
        let all: Vec<ScheduledMessage> = reopened.list_all().unwrap();
        assert_eq!(all, vec![saved]);
    }

    #[test]
    fn test_owners_are_isolated() {
        let tmp = TempDir::new().unwrap();
        let mut robin = FileStore::open(&sample_vault(tmp.path(), "robin"));
        robin.insert(sample_message()).unwrap();
        let kit = FileStore::open(&sample_vault(tmp.path(), "kit"));
        assert!(kit.list_all::<ScheduledMessage>().unwrap().is_empty());
    }

    #[test]
    fn test_corrupt_table_is_decode_error() {
        let tmp = TempDir::new().unwrap();
        let vault = sample_vault(tmp.path(), "robin");
        let store = FileStore::open(&vault);
        let path = store.table_path("scheduled_messages");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "{not json").unwrap();
        assert!(matches!(
            store.list_all::<ScheduledMessage>(),
            Err(StoreError::Decode { .. })
        ));
    }

    #[test]
    fn test_locked_store_can_write() {
        let tmp = TempDir::new().unwrap();
        let mut store = FileStore::open(&sample_vault(tmp.path(), "robin"));
        store.lock().unwrap();
        store.insert(sample_message()).unwrap();
        store.insert(sample_message()).unwrap();
        assert_eq!(store.list_all::<ScheduledMessage>().unwrap().len(), 2);
    }
}
