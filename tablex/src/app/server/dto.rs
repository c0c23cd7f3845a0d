//! Http specific DTOs.

use crate::core::{model::UploadedFile, settings::SettingsView};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tablex_openrouter::chat::GenerationOptions;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct ServiceInfo {
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub environment: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct ConfigUpdateResponse {
    pub success: bool,
    pub config: SettingsView,
}

/// Used for extracting tables from a single inline file.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct ProcessFilePayload {
    /// OpenRouter model ID.
    pub model: String,

    /// Base64 encoded file content. A `data:` URL prefix is tolerated.
    pub file_content: String,

    /// MIME type of the file, `application/pdf` or `image/*`.
    pub file_type: String,

    /// Appended to the extraction instruction.
    pub custom_prompt: Option<String>,

    /// Ask the provider to route to the lowest latency endpoint.
    pub prefer_latency: Option<bool>,
}

impl ProcessFilePayload {
    pub fn options(&self) -> GenerationOptions {
        GenerationOptions {
            prefer_latency: self.prefer_latency.unwrap_or_default(),
            ..Default::default()
        }
    }

    /// The base64 payload without any data URL prefix.
    pub fn encoded_content(&self) -> &str {
        let content = self.file_content.trim();
        match content.strip_prefix("data:") {
            Some(rest) => rest.split_once(',').map_or(rest, |(_, data)| data),
            None => content,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct ProcessFileResponse {
    pub success: bool,

    /// The model's answer, as returned by the provider.
    pub result: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct UploadMultipleResponse {
    pub files: Vec<UploadedFile>,
}
