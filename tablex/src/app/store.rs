use crate::{core::store::UploadStore, err, error::TablexError, map_err};
use std::path::PathBuf;
use tracing::{debug, info};

/// Simple FS based implementation of an [UploadStore](crate::core::store::UploadStore).
#[derive(Debug, Clone)]
pub struct FsUploadStore {
    /// The base directory to store the uploads in.
    base: PathBuf,
}

impl FsUploadStore {
    /// Create the store, creating the directory if it does not exist.
    pub fn new(path: &str) -> Self {
        std::fs::create_dir_all(path).expect("unable to create upload directory");

        let base = PathBuf::from(path)
            .canonicalize()
            .expect("unable to canonicalize");

        if !base.is_dir() {
            panic!("not a directory: {path}");
        }

        info!("Initialising fs upload store at {}", base.display());

        Self { base }
    }
}

#[async_trait::async_trait]
impl UploadStore for FsUploadStore {
    fn id(&self) -> &'static str {
        "fs"
    }

    async fn write(&self, name: &str, content: &[u8]) -> Result<String, TablexError> {
        let path = self.base.join(name).display().to_string();
        debug!("Writing {path}");
        match tokio::fs::metadata(&path).await {
            Ok(_) => err!(InvalidUpload, "file '{name}' already exists at {path}"),
            Err(e) => match e.kind() {
                std::io::ErrorKind::NotFound => {
                    map_err!(tokio::fs::write(&path, content).await);
                    Ok(path)
                }
                _ => Err(map_err!(Err(e))),
            },
        }
    }

    async fn read(&self, path: &str) -> Result<Vec<u8>, TablexError> {
        debug!("Reading {path}");
        Ok(map_err!(tokio::fs::read(path).await))
    }

    async fn delete(&self, path: &str) -> Result<(), TablexError> {
        debug!("Removing {path}");
        Ok(map_err!(tokio::fs::remove_file(path).await))
    }
}

#[cfg(test)]
mod tests {
    use super::{FsUploadStore, UploadStore};

    const CONTENT: &str = "Hello world.";

    #[tokio::test]
    async fn works() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("nested/uploads");

        let store = FsUploadStore::new(&nested.display().to_string());
        assert!(nested.is_dir());

        let path = store.write("foo.txt", CONTENT.as_bytes()).await.unwrap();

        let file = tokio::fs::read_to_string(&path).await.unwrap();
        assert_eq!(CONTENT, file);

        let read = store.read(&path).await.unwrap();
        assert_eq!(CONTENT.as_bytes(), read);

        assert!(store.write("foo.txt", b"again").await.is_err());

        store.delete(&path).await.unwrap();
        assert!(store.delete(&path).await.is_err());
        assert!(tokio::fs::metadata(&path).await.is_err());
    }
}
