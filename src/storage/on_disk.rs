use std::path::PathBuf;
use tokio::fs::create_dir_all;
use tokio::io::AsyncWriteExt;

/// Key/value documents stored as `<root>/<prefix>/<key>` files.
pub(crate) struct OnDiskStorage {
    path: PathBuf,
}

impl OnDiskStorage {
    pub(crate) fn create(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub(crate) async fn get(
        &self,
        prefix: &str,
        key: &str,
    ) -> Result<Option<String>, std::io::Error> {
        let path = self.path.join(prefix).join(key);

        match tokio::fs::read_to_string(path).await {
            Ok(value) => Ok(Some(value)),
            Err(error) if matches!(error.kind(), std::io::ErrorKind::NotFound) => Ok(None),
            Err(error) => Err(error),
        }
    }

    pub(crate) async fn save(
        &self,
        prefix: &str,
        key: &str,
        value: &str,
    ) -> Result<(), std::io::Error> {
        let directory = self.path.join(prefix);

        create_dir_all(&directory).await?;

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(directory.join(key))
            .await?;

        file.write_all(value.as_bytes()).await?;
        file.flush().await?;

        Ok(())
    }
}
