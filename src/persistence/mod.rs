//! High score and config persistence
//!
//! Features:
//! - `Storage` trait the session talks to
//! - JSON files under the platform data directory, written atomically
//!   (tmp file then rename)
//! - In-memory backend for tests and for runs without a data directory

mod json_file;
mod memory;

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;

use crate::error::StorageError;
use crate::settings::Settings;

/// Where the high score and settings live.
///
/// `Ok(None)` means nothing has been stored yet; callers fall back to
/// defaults for that and for errors alike.
pub trait Storage {
    fn load_high_score(&self) -> Result<Option<u64>, StorageError>;
    fn save_high_score(&mut self, score: u64) -> Result<(), StorageError>;
    fn load_config(&self) -> Result<Option<Settings>, StorageError>;
    fn save_config(&mut self, settings: &Settings) -> Result<(), StorageError>;
}

impl<T: Storage + ?Sized> Storage for Box<T> {
    fn load_high_score(&self) -> Result<Option<u64>, StorageError> {
        (**self).load_high_score()
    }

    fn save_high_score(&mut self, score: u64) -> Result<(), StorageError> {
        (**self).save_high_score(score)
    }

    fn load_config(&self) -> Result<Option<Settings>, StorageError> {
        (**self).load_config()
    }

    fn save_config(&mut self, settings: &Settings) -> Result<(), StorageError> {
        (**self).save_config(settings)
    }
}
