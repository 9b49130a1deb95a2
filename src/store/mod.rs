//! The storage collaborator the engine reads from and writes back to.
//!
//! Backends only move whole tables of JSON rows; the typed
//! `list`/`insert`/`update`/`delete` operations are provided on top of that
//! for every backend, so each mutating call is exactly one table read and
//! one table write.

mod memory;

pub use memory::MemoryStore;

use std::path::PathBuf;

use serde_json::Value;

use crate::io::lock::LockError;
use crate::model::entity::{Entity, next_id};

/// Error type for store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("{table}: record not found: {id}")]
    NotFound { table: &'static str, id: String },
    #[error("{table}: duplicate id: {id}")]
    Duplicate { table: &'static str, id: String },
    #[error("{table}: could not decode record: {source}")]
    Decode {
        table: &'static str,
        source: serde_json::Error,
    },
    #[error("{table}: invalid record: {reason}")]
    Invalid { table: &'static str, reason: String },
    #[error("could not encode record: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("could not access {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("store unavailable: {0}")]
    Unavailable(String),
    #[error(transparent)]
    Lock(#[from] LockError),
}

/// Raw table access implemented by each backend.
pub trait TableBackend {
    /// All rows of a table, in stored order. A missing table reads as empty.
    fn read_rows(&self, table: &'static str) -> Result<Vec<Value>, StoreError>;
    /// Replace a table's rows in one step.
    fn write_rows(&mut self, table: &'static str, rows: Vec<Value>) -> Result<(), StoreError>;
}

/// Typed record access, scoped to the owner the store was opened for.
pub trait RecordStore {
    fn list<T, F>(&self, filter: F) -> Result<Vec<T>, StoreError>
    where
        T: Entity,
        F: Fn(&T) -> bool;

    /// Insert a record. An empty id is replaced by the table's next id.
    fn insert<T: Entity>(&mut self, record: T) -> Result<T, StoreError>;

    /// Replace the record stored under `id`. The record's own id is forced to `id`.
    fn update<T: Entity>(&mut self, id: &str, record: T) -> Result<T, StoreError>;

    fn delete<T: Entity>(&mut self, id: &str) -> Result<(), StoreError>;

    fn list_all<T: Entity>(&self) -> Result<Vec<T>, StoreError> {
        self.list(|_: &T| true)
    }

    fn get<T: Entity>(&self, id: &str) -> Result<T, StoreError> {
        self.list(|r: &T| r.id() == id)?
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::NotFound {
                table: T::TABLE,
                id: id.to_string(),
            })
    }
}

fn decode<T: Entity>(row: Value) -> Result<T, StoreError> {
    let record: T = serde_json::from_value(row).map_err(|e| StoreError::Decode {
        table: T::TABLE,
        source: e,
    })?;
    record.check().map_err(|reason| StoreError::Invalid {
        table: T::TABLE,
        reason,
    })?;
    Ok(record)
}

fn encode<T: Entity>(record: &T) -> Result<Value, StoreError> {
    serde_json::to_value(record).map_err(StoreError::Encode)
}

fn row_id(row: &Value) -> Option<&str> {
    row.get("id").and_then(Value::as_str)
}

impl<B: TableBackend> RecordStore for B {
    fn list<T, F>(&self, filter: F) -> Result<Vec<T>, StoreError>
    where
        T: Entity,
        F: Fn(&T) -> bool,
    {
        let mut out = Vec::new();
        for row in self.read_rows(T::TABLE)? {
            let record: T = decode(row)?;
            if filter(&record) {
                out.push(record);
            }
        }
        Ok(out)
    }

    fn insert<T: Entity>(&mut self, mut record: T) -> Result<T, StoreError> {
        let mut rows = self.read_rows(T::TABLE)?;
        if record.id().is_empty() {
            record.set_id(next_id(T::ID_PREFIX, rows.iter().filter_map(row_id)));
        } else if rows.iter().any(|r| row_id(r) == Some(record.id())) {
            return Err(StoreError::Duplicate {
                table: T::TABLE,
                id: record.id().to_string(),
            });
        }
        rows.push(encode(&record)?);
        self.write_rows(T::TABLE, rows)?;
        tracing::debug!(table = T::TABLE, id = record.id(), "inserted");
        Ok(record)
    }

    fn update<T: Entity>(&mut self, id: &str, mut record: T) -> Result<T, StoreError> {
        let mut rows = self.read_rows(T::TABLE)?;
        let slot = rows
            .iter()
            .position(|r| row_id(r) == Some(id))
            .ok_or_else(|| StoreError::NotFound {
                table: T::TABLE,
                id: id.to_string(),
            })?;
        record.set_id(id.to_string());
        rows[slot] = encode(&record)?;
        self.write_rows(T::TABLE, rows)?;
        tracing::debug!(table = T::TABLE, id, "updated");
        Ok(record)
    }

    fn delete<T: Entity>(&mut self, id: &str) -> Result<(), StoreError> {
        let mut rows = self.read_rows(T::TABLE)?;
        let before = rows.len();
        rows.retain(|r| row_id(r) != Some(id));
        if rows.len() == before {
            return Err(StoreError::NotFound {
                table: T::TABLE,
                id: id.to_string(),
            });
        }
        self.write_rows(T::TABLE, rows)?;
        tracing::debug!(table = T::TABLE, id, "deleted");
        Ok(())
    }
}
