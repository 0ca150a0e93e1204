use crate::domain::model::PidRecord;
use crate::domain::ports::PidStore;
use crate::utils::error::Result;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Keeps the launched child's identity in a small JSON file.
#[derive(Debug, Clone)]
pub struct FilePidStore {
    path: PathBuf,
}

impl FilePidStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PidStore for FilePidStore {
    async fn load(&self) -> Result<Option<PidRecord>> {
        let data = match tokio::fs::read(&self.path).await {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let record = serde_json::from_slice(&data)?;
        Ok(Some(record))
    }

    async fn save(&self, record: &PidRecord) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let data = serde_json::to_vec_pretty(record)?;
        tokio::fs::write(&self.path, data).await?;
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::ProcessIdentity;
    use crate::utils::error::LauncherError;
    use tempfile::TempDir;

    fn sample_record() -> PidRecord {
        let identity = ProcessIdentity {
            pid: 4242,
            image_name: "python".to_string(),
            start_time: Some(1_700_000_000),
        };
        PidRecord::new(&identity, "app.py", 8501)
    }

    #[tokio::test]
    async fn test_missing_file_loads_as_none() {
        let dir = TempDir::new().unwrap();
        let store = FilePidStore::new(dir.path().join("launcher.pid"));
        assert!(store.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_creates_parent_dirs_and_clear_removes() {
        let dir = TempDir::new().unwrap();
        let store = FilePidStore::new(dir.path().join("run").join("launcher.pid"));
        let record = sample_record();

        store.save(&record).await.unwrap();
        assert!(store.path().exists());
        assert_eq!(store.load().await.unwrap(), Some(record));

        store.clear().await.unwrap();
        assert!(!store.path().exists());
        // clearing twice is fine
        store.clear().await.unwrap();
    }

    #[tokio::test]
    async fn test_corrupt_record_is_serialization_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("launcher.pid");
        std::fs::write(&path, b"12345").unwrap();

        let store = FilePidStore::new(path);
        let err = store.load().await.unwrap_err();
        assert!(matches!(err, LauncherError::SerializationError(_)));
    }
}
