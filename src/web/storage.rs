use web_sys::Storage;

use crate::engine::score::HighScoreStore;
use crate::error::ArcadeError;

/// High scores in `window.localStorage`, one decimal string per key.
pub struct LocalStorageStore {
    storage: Storage,
}

impl LocalStorageStore {
    pub fn open() -> Result<Self, ArcadeError> {
        let window = web_sys::window().ok_or(ArcadeError::MissingDom("window"))?;
        // private browsing modes may throw or return null here
        let storage = window
            .local_storage()
            .ok()
            .flatten()
            .ok_or(ArcadeError::StorageUnavailable)?;
        Ok(Self { storage })
    }
}

impl HighScoreStore for LocalStorageStore {
    fn read_high_score(&self, key: &str) -> Result<u32, ArcadeError> {
        let raw = self
            .storage
            .get_item(key)
            .map_err(|_| ArcadeError::StorageUnavailable)?;
        match raw {
            None => Ok(0),
            Some(value) => value.trim().parse().map_err(|_| ArcadeError::CorruptScore {
                key: key.to_owned(),
                value,
            }),
        }
    }

    fn write_high_score(&mut self, key: &str, value: u32) -> Result<(), ArcadeError> {
        self.storage
            .set_item(key, &value.to_string())
            .map_err(|_| ArcadeError::StorageWrite { key: key.to_owned() })
    }
}
