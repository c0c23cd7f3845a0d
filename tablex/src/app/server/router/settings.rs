use crate::{
    app::{server::dto::ConfigUpdateResponse, state::AppState},
    core::settings::{SettingsUpdate, SettingsView},
    error::TablexError,
};
use axum::{extract::State, Json};

#[utoipa::path(
    get,
    path = "/api/config",
    responses(
        (status = 200, description = "Current upstream settings; the API key is never exposed", body = SettingsView),
    )
)]
pub(crate) async fn get_config(state: State<AppState>) -> Json<SettingsView> {
    Json(state.settings.snapshot().view())
}

#[utoipa::path(
    post,
    path = "/api/config",
    responses(
        (status = 200, description = "Update upstream settings", body = ConfigUpdateResponse),
        (status = 400, description = "Invalid API key or base URL"),
    ),
    request_body = SettingsUpdate
)]
pub(crate) async fn update_config(
    state: State<AppState>,
    Json(update): Json<SettingsUpdate>,
) -> Result<Json<ConfigUpdateResponse>, TablexError> {
    let settings = state.settings.update(update)?;
    Ok(Json(ConfigUpdateResponse {
        success: true,
        config: settings.view(),
    }))
}
