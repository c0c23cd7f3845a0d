use crate::{err, error::TablexError};
use chrono::Utc;
use rand::Rng;
use std::path::Path;

/// Maximum number of files accepted in a single multipart request.
pub const MAX_FILES_PER_REQUEST: usize = 10;

/// Headroom on top of the file data for the non-file fields of a form.
const FORM_FIELDS_ALLOWANCE: usize = 1024 * 1024;

/// Accepted extensions and the MIME type each of them must be declared with.
const ALLOWED_TYPES: &[(&str, &str)] = &[
    ("jpeg", "image/jpeg"),
    ("jpg", "image/jpeg"),
    ("png", "image/png"),
    ("gif", "image/gif"),
    ("pdf", "application/pdf"),
    ("doc", "application/msword"),
    (
        "docx",
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    ),
    ("txt", "text/plain"),
    ("json", "application/json"),
];

/// Rules every uploaded file has to satisfy before it is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadPolicy {
    /// Maximum size of a single file in bytes.
    pub max_file_size: usize,
}

impl UploadPolicy {
    pub fn new(max_file_size: usize) -> Self {
        Self { max_file_size }
    }

    /// Check the file name and the declared MIME type against the allow-list.
    /// Both have to be known and the MIME type has to belong to the extension,
    /// i.e. a `.png` declared as `application/pdf` is rejected.
    pub fn check_type(&self, file_name: &str, mime_type: &str) -> Result<(), TablexError> {
        let Some(ext) = extension(file_name) else {
            return err!(InvalidFileType, "{file_name} - missing extension");
        };

        let mime = normalize_mime(mime_type);

        let accepted = ALLOWED_TYPES
            .iter()
            .any(|(allowed_ext, allowed_mime)| *allowed_ext == ext && *allowed_mime == mime);

        if !accepted {
            return err!(
                InvalidFileType,
                "{file_name} ({mime_type}); allowed types are jpeg, jpg, png, gif, pdf, doc, docx, txt, json"
            );
        }

        Ok(())
    }

    /// Check a running or final byte count against the size ceiling.
    pub fn check_size(&self, file_name: &str, size: usize) -> Result<(), TablexError> {
        if size > self.max_file_size {
            return err!(
                FileTooLarge,
                "{file_name} exceeds the maximum of {} bytes",
                self.max_file_size
            );
        }
        Ok(())
    }

    /// The largest request body a multi file upload may need.
    pub fn max_request_size(&self) -> usize {
        self.max_file_size
            .saturating_mul(MAX_FILES_PER_REQUEST)
            .saturating_add(FORM_FIELDS_ALLOWANCE)
    }
}

/// Lower cased extension of `file_name`, if any.
pub fn extension(file_name: &str) -> Option<String> {
    Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_lowercase)
}

/// Lower cased MIME type without parameters, e.g. `text/plain; charset=utf-8` -> `text/plain`.
pub fn normalize_mime(mime_type: &str) -> String {
    mime_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_lowercase()
}

/// Generate the name a file is stored under: `<field>-<unix millis>-<random><.ext>`.
/// The original extension is kept as submitted.
pub fn storage_name(field: &str, original_name: &str) -> String {
    let ext = Path::new(original_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{ext}"))
        .unwrap_or_default();

    let millis = Utc::now().timestamp_millis();
    let suffix: u32 = rand::rng().random_range(0..1_000_000_000);

    format!("{field}-{millis}-{suffix}{ext}")
}
