//! Pluggable persistence for the opening book.
//!
//! The book itself never touches the filesystem; it goes through a
//! [`BookStore`], so callers choose where the document lives.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use thiserror::Error;

/// The persisted book document: one top-level `openings` object keyed
/// by canonical position ID.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct BookData {
    pub openings: BTreeMap<String, Opening>,
}

/// One stored opening: the designated best reply, as a canonical ID.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Opening {
    pub best_child: String,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub trait BookStore {
    fn load(&self) -> Result<BookData, StoreError>;
    fn save(&mut self, data: &BookData) -> Result<(), StoreError>;
}

/// File-backed store in the book's JSON document format.
#[derive(Clone, Debug)]
pub struct JsonStore {
    path: PathBuf,
}

impl JsonStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl BookStore for JsonStore {
    fn load(&self) -> Result<BookData, StoreError> {
        let contents = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    fn save(&mut self, data: &BookData) -> Result<(), StoreError> {
        fs::write(&self.path, serde_json::to_string_pretty(data)?)?;
        Ok(())
    }
}

/// In-memory store, for tests and embedding.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    pub data: BookData,
}

impl BookStore for MemoryStore {
    fn load(&self) -> Result<BookData, StoreError> {
        Ok(self.data.clone())
    }

    fn save(&mut self, data: &BookData) -> Result<(), StoreError> {
        self.data = data.clone();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_format() {
        let mut data = BookData::default();
        data.openings.insert(
            "B00000008100000000000001008000000".into(),
            Opening {
                best_child: "W00000008100800000000001008040000".into(),
            },
        );

        let json = serde_json::to_string(&data).unwrap();
        assert_eq!(
            json,
            r#"{"openings":{"B00000008100000000000001008000000":{"best_child":"W00000008100800000000001008040000"}}}"#,
        );
        assert_eq!(serde_json::from_str::<BookData>(&json).unwrap(), data);
    }

    #[test]
    fn memory_store_round_trip() {
        let mut store = MemoryStore::default();
        let mut data = BookData::default();
        data.openings.insert(
            "key".into(),
            Opening {
                best_child: "value".into(),
            },
        );

        store.save(&data).unwrap();
        assert_eq!(store.load().unwrap(), data);
    }
}
