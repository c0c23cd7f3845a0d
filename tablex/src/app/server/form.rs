//! Multipart form intake.

use crate::{
    core::{
        model::UploadedFile,
        service::upload::{FileUpload, UploadService},
    },
    err,
    error::TablexError,
    map_err,
};
use axum::extract::Multipart;
use std::collections::HashMap;

/// Files stored from a multipart form along with its text fields.
#[derive(Debug, Default)]
pub(super) struct UploadForm {
    pub files: Vec<UploadedFile>,
    fields: HashMap<String, String>,
}

impl UploadForm {
    /// Read the whole form, storing every file submitted under `file_field`.
    ///
    /// Types are checked before a file's content is read and sizes are checked on every
    /// chunk, so oversized files are never fully buffered. If anything in the form is
    /// invalid, the files stored so far are removed.
    pub async fn read(
        multipart: &mut Multipart,
        uploads: &UploadService,
        file_field: &str,
        max_files: usize,
    ) -> Result<Self, TablexError> {
        let mut form = Self::default();

        match form.read_fields(multipart, uploads, file_field, max_files).await {
            Ok(()) => Ok(form),
            Err(e) => {
                uploads.discard_all(&form.files).await;
                Err(e)
            }
        }
    }

    /// Get a text field, if it was submitted.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// Interpret a text field as a flag; `true` and `1` are truthy.
    pub fn flag(&self, name: &str) -> bool {
        self.text(name)
            .is_some_and(|value| matches!(value.trim(), "true" | "1"))
    }

    async fn read_fields(
        &mut self,
        multipart: &mut Multipart,
        uploads: &UploadService,
        file_field: &str,
        max_files: usize,
    ) -> Result<(), TablexError> {
        let policy = uploads.policy();

        while let Some(mut field) = map_err!(multipart.next_field().await) {
            let name = field.name().unwrap_or_default().to_string();

            let Some(file_name) = field.file_name().map(String::from) else {
                let value = map_err!(field.text().await);
                self.fields.insert(name, value);
                continue;
            };

            if name != file_field {
                return err!(
                    InvalidUpload,
                    "unexpected file field '{name}', expected '{file_field}'"
                );
            }

            if file_name.is_empty() {
                return err!(InvalidUpload, "file in field '{name}' has no name");
            }

            if self.files.len() >= max_files {
                return err!(
                    TooManyFiles,
                    "at most {max_files} file(s) can be uploaded at once"
                );
            }

            let mime_type = field
                .content_type()
                .unwrap_or("application/octet-stream")
                .to_string();

            policy.check_type(&file_name, &mime_type)?;

            let mut content = Vec::new();
            while let Some(chunk) = map_err!(field.chunk().await) {
                content.extend_from_slice(&chunk);
                policy.check_size(&file_name, content.len())?;
            }

            let file = uploads
                .store(FileUpload {
                    field: &name,
                    name: &file_name,
                    mime_type: &mime_type,
                    content: &content,
                })
                .await?;

            self.files.push(file);
        }

        Ok(())
    }
}
