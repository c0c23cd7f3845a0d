use crate::{
    core::{
        model::UploadedFile,
        store::UploadStore,
        upload::{storage_name, UploadPolicy},
    },
    error::TablexError,
};
use std::sync::Arc;
use tracing::{info, warn};

/// A file as received from the client, before it is stored.
#[derive(Debug)]
pub struct FileUpload<'a> {
    /// Form field the file was submitted under.
    pub field: &'a str,

    /// Name the client submitted the file with.
    pub name: &'a str,

    /// MIME type declared by the client.
    pub mime_type: &'a str,

    pub content: &'a [u8],
}

/// Validates and stores uploaded files.
#[derive(Clone)]
pub struct UploadService {
    store: Arc<dyn UploadStore + Send + Sync>,
    policy: UploadPolicy,
}

impl UploadService {
    pub fn new(store: Arc<dyn UploadStore + Send + Sync>, policy: UploadPolicy) -> Self {
        Self { store, policy }
    }

    pub fn policy(&self) -> &UploadPolicy {
        &self.policy
    }

    /// Validate `upload` against the policy and write it to the store
    /// under a freshly generated name.
    pub async fn store(&self, upload: FileUpload<'_>) -> Result<UploadedFile, TablexError> {
        let FileUpload {
            field,
            name,
            mime_type,
            content,
        } = upload;

        self.policy.check_type(name, mime_type)?;
        self.policy.check_size(name, content.len())?;

        let filename = storage_name(field, name);
        let path = self.store.write(&filename, content).await?;

        info!(
            "Stored '{name}' as '{filename}' ({} bytes) in {}",
            content.len(),
            self.store.id()
        );

        Ok(UploadedFile {
            filename,
            original_name: name.to_string(),
            size: content.len(),
            mime_type: mime_type.to_string(),
            path,
        })
    }

    /// Read the contents of a stored file.
    pub async fn read(&self, file: &UploadedFile) -> Result<Vec<u8>, TablexError> {
        self.store.read(&file.path).await
    }

    /// Best-effort removal of a stored file. Failures are logged and swallowed.
    pub async fn discard(&self, file: &UploadedFile) {
        if let Err(e) = self.store.delete(&file.path).await {
            warn!("Failed to remove uploaded file '{}': {e}", file.path);
        }
    }

    /// Best-effort removal of several stored files.
    pub async fn discard_all(&self, files: &[UploadedFile]) {
        for file in files {
            self.discard(file).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{app::store::FsUploadStore, error::TablexErr};

    fn service(dir: &tempfile::TempDir, max_file_size: usize) -> UploadService {
        let store = FsUploadStore::new(&dir.path().display().to_string());
        UploadService::new(Arc::new(store), UploadPolicy::new(max_file_size))
    }

    #[tokio::test]
    async fn stores_valid_files_under_unique_names() {
        let dir = tempfile::tempdir().unwrap();
        let service = service(&dir, 1024);

        let upload = || FileUpload {
            field: "files",
            name: "table.png",
            mime_type: "image/png",
            content: b"not really a png",
        };

        let a = service.store(upload()).await.unwrap();
        let b = service.store(upload()).await.unwrap();

        assert_ne!(a.filename, b.filename);
        assert!(a.filename.starts_with("files-"));
        assert_eq!("table.png", a.original_name);
        assert_eq!(16, a.size);
        assert_eq!(
            b"not really a png".to_vec(),
            tokio::fs::read(&a.path).await.unwrap()
        );
    }

    #[tokio::test]
    async fn rejects_before_writing() {
        let dir = tempfile::tempdir().unwrap();
        let service = service(&dir, 4);

        let err = service
            .store(FileUpload {
                field: "file",
                name: "chart.png",
                mime_type: "application/pdf",
                content: b"x",
            })
            .await
            .unwrap_err();
        assert!(matches!(err.error, TablexErr::InvalidFileType(_)));

        let err = service
            .store(FileUpload {
                field: "file",
                name: "scan.pdf",
                mime_type: "application/pdf",
                content: b"12345",
            })
            .await
            .unwrap_err();
        assert!(matches!(err.error, TablexErr::FileTooLarge(_)));

        let mut entries = tokio::fs::read_dir(dir.path()).await.unwrap();
        assert!(entries.next_entry().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn discard_tolerates_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        let service = service(&dir, 1024);

        let file = service
            .store(FileUpload {
                field: "file",
                name: "rows.json",
                mime_type: "application/json",
                content: b"{}",
            })
            .await
            .unwrap();

        service.discard(&file).await;
        assert!(tokio::fs::metadata(&file.path).await.is_err());

        // Second removal fails inside the store and is only logged.
        service.discard(&file).await;
    }
}
