use super::Storage;
use crate::error::StorageError;
use crate::settings::Settings;

/// Keeps everything in memory; nothing survives the process
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    pub high_score: Option<u64>,
    pub config: Option<Settings>,
}

impl Storage for MemoryStore {
    fn load_high_score(&self) -> Result<Option<u64>, StorageError> {
        Ok(self.high_score)
    }

    fn save_high_score(&mut self, score: u64) -> Result<(), StorageError> {
        self.high_score = Some(score);
        Ok(())
    }

    fn load_config(&self) -> Result<Option<Settings>, StorageError> {
        Ok(self.config.clone())
    }

    fn save_config(&mut self, settings: &Settings) -> Result<(), StorageError> {
        self.config = Some(settings.clone());
        Ok(())
    }
}
