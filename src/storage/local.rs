//! Local filesystem storage backend
//!
//! Keeps the high score in a small RON file. All operations are synchronous;
//! the file is only touched at startup and when a run ends.

use super::{HighScoreFile, HighScoreStore, StorageError, HIGH_SCORE_FILE};
use std::path::PathBuf;

/// Local filesystem storage backend
#[derive(Debug, Clone)]
pub struct LocalStorage {
    /// Directory holding the save file
    base_dir: PathBuf,
}

impl LocalStorage {
    /// Create a local storage backend with a custom base directory
    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Store under the platform data directory (`~/.local/share/lava-runner`
    /// on Linux)
    #[cfg(not(target_arch = "wasm32"))]
    pub fn in_data_dir() -> Option<Self> {
        dirs::data_dir().map(|dir| Self::with_base_dir(dir.join("lava-runner")))
    }

    /// Resolve a path relative to the base directory
    fn resolve(&self, path: &str) -> PathBuf {
        self.base_dir.join(path)
    }

    /// Read a file
    pub fn read(&self, path: &str) -> Result<Vec<u8>, StorageError> {
        Ok(std::fs::read(self.resolve(path))?)
    }

    /// Write a file, creating parent directories as needed
    pub fn write(&self, path: &str, data: &[u8]) -> Result<(), StorageError> {
        let full_path = self.resolve(path);
        if let Some(parent) = full_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&full_path, data)?;
        Ok(())
    }
}

impl HighScoreStore for LocalStorage {
    /// A missing file is a fresh install, not an error
    fn get_high_score(&self) -> Result<u64, StorageError> {
        let bytes = match self.read(HIGH_SCORE_FILE) {
            Ok(bytes) => bytes,
            Err(StorageError::NotFound(_)) => return Ok(0),
            Err(e) => return Err(e),
        };
        let text = String::from_utf8(bytes).map_err(|e| StorageError::SerdeError(e.to_string()))?;
        let file: HighScoreFile = ron::from_str(&text)?;
        Ok(file.high_score)
    }

    fn set_high_score(&mut self, score: u64) -> Result<(), StorageError> {
        let text = ron::ser::to_string(&HighScoreFile { high_score: score })?;
        self.write(HIGH_SCORE_FILE, text.as_bytes())
    }
}
