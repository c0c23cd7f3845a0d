use crate::{
    app::{
        server::{dto::UploadMultipleResponse, form::UploadForm},
        state::AppState,
    },
    core::{model::UploadedFile, upload::MAX_FILES_PER_REQUEST},
    err,
    error::TablexError,
};
use axum::{
    extract::{Multipart, State},
    Json,
};

#[utoipa::path(
    post,
    path = "/upload",
    responses(
        (status = 200, description = "Store a single file", body = UploadedFile),
        (status = 400, description = "Invalid file type or no file"),
        (status = 413, description = "File too large"),
    ),
    request_body(content_type = "multipart/form-data", description = "A single file under the `file` field")
)]
pub(crate) async fn upload_file(
    state: State<AppState>,
    mut form: Multipart,
) -> Result<Json<UploadedFile>, TablexError> {
    let form = UploadForm::read(&mut form, &state.services.upload, "file", 1).await?;

    let Some(file) = form.files.into_iter().next() else {
        return err!(MissingField, "no file uploaded under 'file'");
    };

    Ok(Json(file))
}

#[utoipa::path(
    post,
    path = "/upload-multiple",
    responses(
        (status = 200, description = "Store up to 10 files", body = UploadMultipleResponse),
        (status = 400, description = "Invalid file type, too many files or no files"),
        (status = 413, description = "File too large"),
    ),
    request_body(content_type = "multipart/form-data", description = "Up to 10 files under the `files` field")
)]
pub(crate) async fn upload_files(
    state: State<AppState>,
    mut form: Multipart,
) -> Result<Json<UploadMultipleResponse>, TablexError> {
    let form = UploadForm::read(
        &mut form,
        &state.services.upload,
        "files",
        MAX_FILES_PER_REQUEST,
    )
    .await?;

    if form.files.is_empty() {
        return err!(MissingField, "no files uploaded under 'files'");
    }

    Ok(Json(UploadMultipleResponse { files: form.files }))
}
