use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::Storage;
use crate::error::StorageError;
use crate::settings::Settings;

const HIGH_SCORE_FILE: &str = "highscore.json";
const CONFIG_FILE: &str = "config.json";

#[derive(Serialize, Deserialize)]
struct HighScoreFile {
    high_score: u64,
}

/// JSON files in one directory
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    /// Store under the platform's local data directory
    pub fn open() -> Result<Self, StorageError> {
        let proj = ProjectDirs::from("com", "frog-crossing", "FrogCrossing")
            .ok_or(StorageError::NoDataDir)?;
        Self::at(proj.data_local_dir())
    }

    /// Store under an explicit directory, created if missing
    pub fn at(dir: impl AsRef<Path>) -> Result<Self, StorageError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        log::debug!("Storage directory {}", dir.display());
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn read<T: DeserializeOwned>(&self, name: &str) -> Result<Option<T>, StorageError> {
        let path = self.dir.join(name);
        match fs::read_to_string(&path) {
            Ok(s) => Ok(Some(serde_json::from_str(&s)?)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write<T: Serialize>(&self, name: &str, value: &T) -> Result<(), StorageError> {
        let path = self.dir.join(name);
        let tmp = path.with_extension("json.tmp");
        let data = serde_json::to_vec_pretty(value)?;
        fs::write(&tmp, data)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }
}

impl Storage for JsonFileStore {
    fn load_high_score(&self) -> Result<Option<u64>, StorageError> {
        Ok(self
            .read::<HighScoreFile>(HIGH_SCORE_FILE)?
            .map(|f| f.high_score))
    }

    fn save_high_score(&mut self, score: u64) -> Result<(), StorageError> {
        self.write(HIGH_SCORE_FILE, &HighScoreFile { high_score: score })
    }

    fn load_config(&self) -> Result<Option<Settings>, StorageError> {
        self.read(CONFIG_FILE)
    }

    fn save_config(&mut self, settings: &Settings) -> Result<(), StorageError> {
        self.write(CONFIG_FILE, settings)
    }
}
