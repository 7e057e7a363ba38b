//! Storage Abstraction Layer
//!
//! The only thing the game persists is a single high score. The simulation
//! talks to a [`HighScoreStore`]; native builds back it with a RON file in
//! the user's data directory, WASM builds keep it in memory.
//!
//! Failures never stop the game: callers log them and carry on with an
//! in-memory value.

pub mod local;

pub use local::LocalStorage;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// File name of the persisted high score
pub const HIGH_SCORE_FILE: &str = "high_score.ron";

/// Storage error types
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StorageError {
    /// File or directory not found
    #[error("not found: {0}")]
    NotFound(String),
    /// Permission denied
    #[error("permission denied: {0}")]
    PermissionDenied(String),
    /// I/O error
    #[error("I/O error: {0}")]
    IoError(String),
    /// Serialization/deserialization error
    #[error("serialization error: {0}")]
    SerdeError(String),
}

impl From<std::io::Error> for StorageError {
    fn from(e: std::io::Error) -> Self {
        match e.kind() {
            std::io::ErrorKind::NotFound => StorageError::NotFound(e.to_string()),
            std::io::ErrorKind::PermissionDenied => StorageError::PermissionDenied(e.to_string()),
            _ => StorageError::IoError(e.to_string()),
        }
    }
}

impl From<ron::error::SpannedError> for StorageError {
    fn from(e: ron::error::SpannedError) -> Self {
        StorageError::SerdeError(e.to_string())
    }
}

impl From<ron::Error> for StorageError {
    fn from(e: ron::Error) -> Self {
        StorageError::SerdeError(e.to_string())
    }
}

/// Persistent scalar store for the best score
pub trait HighScoreStore {
    fn get_high_score(&self) -> Result<u64, StorageError>;
    fn set_high_score(&mut self, score: u64) -> Result<(), StorageError>;
}

/// On-disk representation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HighScoreFile {
    pub high_score: u64,
}

/// Volatile store; also the fallback when nothing else works
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    high_score: u64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl HighScoreStore for MemoryStore {
    fn get_high_score(&self) -> Result<u64, StorageError> {
        Ok(self.high_score)
    }

    fn set_high_score(&mut self, score: u64) -> Result<(), StorageError> {
        self.high_score = score;
        Ok(())
    }
}

/// Pick the store for this platform
pub fn default_store() -> Box<dyn HighScoreStore> {
    #[cfg(not(target_arch = "wasm32"))]
    {
        match LocalStorage::in_data_dir() {
            Some(storage) => return Box::new(storage),
            None => tracing::warn!("no data directory, high score will not be saved"),
        }
    }
    Box::new(MemoryStore::new())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store() {
        let mut store = MemoryStore::new();
        assert_eq!(store.get_high_score(), Ok(0));
        store.set_high_score(1234).unwrap();
        assert_eq!(store.get_high_score(), Ok(1234));
    }

    #[test]
    fn test_io_error_mapping() {
        let e = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        assert!(matches!(StorageError::from(e), StorageError::NotFound(_)));
        let e = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "no");
        assert!(matches!(StorageError::from(e), StorageError::PermissionDenied(_)));
        let e = std::io::Error::new(std::io::ErrorKind::Other, "disk on fire");
        let mapped = StorageError::from(e);
        assert_eq!(mapped.to_string(), "I/O error: disk on fire");
    }
}
