use serde::{ser::SerializeStruct, Serialize, Serializer};
use tablex_openrouter::models::Model;

/// A file accepted by the upload intake and written to the upload store.
/// Lives only as long as the request that created it.
#[derive(Debug, Clone, PartialEq, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadedFile {
    /// Name the file was stored under.
    pub filename: String,

    /// Name the file was submitted with.
    pub original_name: String,

    /// Size in bytes.
    pub size: usize,

    /// MIME type declared by the client.
    pub mime_type: String,

    /// Location in the upload store.
    pub path: String,
}

/// The outcome of sending a single file upstream.
///
/// Holds either the upstream text or an error message, never both.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionResult {
    pub filename: String,
    pub size: usize,
    pub mime_type: String,
    pub outcome: Result<String, String>,
}

impl ExtractionResult {
    pub fn new(file: &UploadedFile, outcome: Result<String, String>) -> Self {
        Self {
            filename: file.original_name.clone(),
            size: file.size,
            mime_type: file.mime_type.clone(),
            outcome,
        }
    }

    pub fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }
}

impl Serialize for ExtractionResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("ExtractionResult", 5)?;
        s.serialize_field("filename", &self.filename)?;
        s.serialize_field("size", &self.size)?;
        s.serialize_field("mimeType", &self.mime_type)?;
        s.serialize_field("success", &self.is_success())?;
        match &self.outcome {
            Ok(result) => s.serialize_field("result", result)?,
            Err(error) => s.serialize_field("error", error)?,
        }
        s.end()
    }
}

/// Aggregated results of processing a batch of uploaded files.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BatchReport {
    pub success: bool,
    pub total_files: usize,
    pub processed_files: usize,
    #[schema(value_type = Vec<Object>)]
    pub results: Vec<ExtractionResult>,
}

impl BatchReport {
    pub fn new(total_files: usize, results: Vec<ExtractionResult>) -> Self {
        Self {
            success: true,
            total_files,
            processed_files: results.len(),
            results,
        }
    }
}

/// The upstream model catalog with the subset suited for table extraction.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ModelCatalog {
    #[schema(value_type = Vec<Object>)]
    pub all: Vec<Model>,

    #[schema(value_type = Vec<Object>)]
    pub table_extraction: Vec<Model>,
}
