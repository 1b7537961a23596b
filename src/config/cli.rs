use crate::core::Storage;
use crate::utils::error::Result;
use std::path::PathBuf;

/// Writes artifacts below a base directory on the local disk.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }
}

impl Storage for LocalStorage {
    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let full_path = self.base_path.join(path);

        if let Some(parent) = full_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        tokio::fs::write(full_path, data).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_write_creates_directories() {
        let temp_dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(temp_dir.path().join("nested"));

        storage
            .write_file("layers/legend.json", b"[]")
            .await
            .unwrap();

        let written = temp_dir.path().join("nested/layers/legend.json");
        assert_eq!(std::fs::read(written).unwrap(), b"[]");
    }

    #[tokio::test]
    async fn test_write_into_file_path_is_io_error() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("blocker"), b"x").unwrap();
        let storage = LocalStorage::new(temp_dir.path().join("blocker"));

        let result = storage.write_file("map.json", b"{}").await;
        assert!(matches!(
            result,
            Err(crate::utils::error::MapError::IoError(_))
        ));
    }
}
