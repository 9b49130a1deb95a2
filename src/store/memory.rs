use std::collections::HashMap;

use serde_json::Value;

use super::{StoreError, TableBackend};

/// In-process store, for tests and for embedding the engine without a vault.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: HashMap<&'static str, Vec<Value>>,
    /// When set, every write fails with `StoreError::Unavailable`
    fail_writes: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent writes fail, leaving the stored rows untouched.
    pub fn set_fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }
}

impl TableBackend for MemoryStore {
    fn read_rows(&self, table: &'static str) -> Result<Vec<Value>, StoreError> {
        Ok(self.tables.get(table).cloned().unwrap_or_default())
    }

    fn write_rows(&mut self, table: &'static str, rows: Vec<Value>) -> Result<(), StoreError> {
        if self.fail_writes {
            return Err(StoreError::Unavailable(format!("write to {} refused", table)));
        }
        self.tables.insert(table, rows);
        Ok(())
    }
}
