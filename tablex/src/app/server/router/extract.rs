use crate::{
    app::{
        server::{
            dto::{ProcessFilePayload, ProcessFileResponse},
            form::UploadForm,
        },
        state::AppState,
    },
    core::{
        model::{BatchReport, ModelCatalog},
        service::extraction::ExtractionParams,
        upload::MAX_FILES_PER_REQUEST,
    },
    err,
    error::TablexError,
    map_err,
};
use axum::{
    extract::{Multipart, State},
    Json,
};
use base64::{engine::general_purpose::STANDARD, Engine};
use tablex_openrouter::chat::GenerationOptions;

#[utoipa::path(
    get,
    path = "/api/models",
    responses(
        (status = 200, description = "All available models and the ones suited for table extraction", body = ModelCatalog),
        (status = 500, description = "Upstream error"),
    )
)]
pub(crate) async fn list_models(state: State<AppState>) -> Result<Json<ModelCatalog>, TablexError> {
    Ok(Json(state.services.extraction.list_models().await?))
}

#[utoipa::path(
    post,
    path = "/api/process-file",
    responses(
        (status = 200, description = "Extract tables from an inline base64 file", body = ProcessFileResponse),
        (status = 400, description = "Missing model, content or invalid base64"),
        (status = 422, description = "Unsupported file type"),
        (status = 500, description = "Missing API key or upstream error"),
    ),
    request_body = ProcessFilePayload
)]
pub(crate) async fn process_file(
    state: State<AppState>,
    Json(payload): Json<ProcessFilePayload>,
) -> Result<Json<ProcessFileResponse>, TablexError> {
    if payload.file_content.trim().is_empty() {
        return err!(MissingField, "fileContent is required");
    }

    if payload.file_type.trim().is_empty() {
        return err!(MissingField, "fileType is required");
    }

    let content = map_err!(STANDARD.decode(payload.encoded_content()));

    let params = ExtractionParams {
        model: &payload.model,
        custom_prompt: payload.custom_prompt.as_deref(),
        options: payload.options(),
    };

    let result = state
        .services
        .extraction
        .process_file(params, &content, &payload.file_type)
        .await?;

    Ok(Json(ProcessFileResponse {
        success: true,
        result,
    }))
}

#[utoipa::path(
    post,
    path = "/api/process-uploaded-files",
    responses(
        (status = 200, description = "Extract tables from each uploaded file; failures are reported per file", body = BatchReport),
        (status = 400, description = "Missing model, no files, too many files or invalid file type"),
        (status = 413, description = "File too large"),
    ),
    request_body(
        content_type = "multipart/form-data",
        description = "Up to 10 files under `files`, plus the `model`, `customPrompt` and `preferLatency` text fields"
    )
)]
pub(crate) async fn process_uploaded_files(
    state: State<AppState>,
    mut form: Multipart,
) -> Result<Json<BatchReport>, TablexError> {
    let services = &state.services;

    let form = UploadForm::read(&mut form, &services.upload, "files", MAX_FILES_PER_REQUEST).await?;

    let model = form.text("model").unwrap_or_default().to_string();
    let custom_prompt = form.text("customPrompt").map(String::from);
    let options = GenerationOptions {
        prefer_latency: form.flag("preferLatency"),
        ..Default::default()
    };

    let params = ExtractionParams {
        model: &model,
        custom_prompt: custom_prompt.as_deref(),
        options,
    };

    let report = services
        .extraction
        .process_uploaded(params, form.files)
        .await?;

    Ok(Json(report))
}
