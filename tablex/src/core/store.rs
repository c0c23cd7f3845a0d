use crate::error::TablexError;

/// Temporary storage for uploaded files.
/// Serves as indirection to decouple the services from the file system.
#[async_trait::async_trait]
pub trait UploadStore {
    fn id(&self) -> &'static str;

    /// Write `content` under `name`, returning the path it was written to.
    /// Fails if a file with the same name already exists.
    ///
    /// * `name`: Storage name of the file.
    /// * `content`: What to write.
    async fn write(&self, name: &str, content: &[u8]) -> Result<String, TablexError>;

    /// Read the file located at `path`.
    async fn read(&self, path: &str) -> Result<Vec<u8>, TablexError>;

    /// Delete the file located at `path`.
    async fn delete(&self, path: &str) -> Result<(), TablexError>;
}
