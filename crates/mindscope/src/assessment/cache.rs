use std::path::{Path, PathBuf};
use std::sync::Mutex;

use super::payload::ResultsPayload;

/// Holds the most recent results payload so a results view can be reloaded.
pub trait ResultsCache: Send + Sync {
    fn store(&self, payload: &ResultsPayload) -> Result<(), CacheError>;
    fn latest(&self) -> Result<Option<ResultsPayload>, CacheError>;
}

#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("results cache unavailable: {0}")]
    Unavailable(String),
    #[error("results cache I/O failed for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cached results are corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Process-local cache; the last stored payload wins.
#[derive(Debug, Default)]
pub struct InMemoryResultsCache {
    latest: Mutex<Option<ResultsPayload>>,
}

impl InMemoryResultsCache {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ResultsCache for InMemoryResultsCache {
    fn store(&self, payload: &ResultsPayload) -> Result<(), CacheError> {
        let mut guard = self
            .latest
            .lock()
            .map_err(|_| CacheError::Unavailable("in-memory cache lock poisoned".to_string()))?;
        *guard = Some(payload.clone());
        Ok(())
    }

    fn latest(&self) -> Result<Option<ResultsPayload>, CacheError> {
        let guard = self
            .latest
            .lock()
            .map_err(|_| CacheError::Unavailable("in-memory cache lock poisoned".to_string()))?;
        Ok(guard.clone())
    }
}

/// Keeps the latest payload as pretty JSON in a single file, replaced on every store.
#[derive(Debug)]
pub struct FileResultsCache {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileResultsCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> CacheError {
        CacheError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl ResultsCache for FileResultsCache {
    fn store(&self, payload: &ResultsPayload) -> Result<(), CacheError> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| CacheError::Unavailable("file cache lock poisoned".to_string()))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|err| self.io_error(err))?;
        }

        let json = serde_json::to_vec_pretty(payload)?;
        // write beside the target and rename so readers never see a partial file
        let staging = self.path.with_extension("tmp");
        std::fs::write(&staging, json).map_err(|err| self.io_error(err))?;
        std::fs::rename(&staging, &self.path).map_err(|err| self.io_error(err))?;
        Ok(())
    }

    fn latest(&self) -> Result<Option<ResultsPayload>, CacheError> {
        match std::fs::read(&self.path) {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(self.io_error(err)),
        }
    }
}
