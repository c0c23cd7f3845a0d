use super::{api::ApiDoc, dto::ServiceInfo};
use crate::app::state::AppState;
use axum::{
    extract::{DefaultBodyLimit, State},
    http::{HeaderValue, Method},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use std::time::Duration;
use tower_http::{
    classify::ServerErrorsFailureClass,
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing::Span;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub(crate) mod extract;
pub(crate) mod settings;
pub(crate) mod upload;

pub fn router(state: AppState, origins: Vec<String>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(allow_origin(origins))
        .allow_headers(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST]);

    let body_limit = state.services.upload.policy().max_request_size();

    use extract::*;
    use settings::*;
    use upload::*;

    Router::new()
        .route("/", get(service_info))
        .route("/api/config", get(get_config).post(update_config))
        .route("/api/models", get(list_models))
        .route("/api/process-file", post(process_file))
        .route("/api/process-uploaded-files", post(process_uploaded_files))
        .route("/upload", post(upload_file))
        .route("/upload-multiple", post(upload_files))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
        .layer(
            TraceLayer::new_for_http()
                .on_request(|req: &axum::http::Request<_>, _span: &Span| {
                    let ctype = req
                        .headers()
                        .get("content-type")
                        .map(|v| v.to_str().unwrap_or("none"))
                        .unwrap_or("none");

                    tracing::info!(
                        "Processing request | {} {} | content-type: {ctype}",
                        req.method(),
                        req.uri().path()
                    );
                })
                .on_response(
                    |res: &axum::http::Response<_>, latency: Duration, _span: &Span| {
                        let status = res.status();
                        let ctype = res
                            .headers()
                            .get("content-type")
                            .map(|v| v.to_str().unwrap_or("none"))
                            .unwrap_or("none");

                        tracing::info!(
                            "Sending response | {status} | {}ms | {ctype}",
                            latency.as_millis()
                        );
                    },
                )
                .on_failure(
                    |error: ServerErrorsFailureClass, _latency: Duration, _span: &Span| {
                        tracing::error!("Error in request: {error}")
                    },
                ),
        )
        .layer(cors)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Has to go last to exclude all the tracing/cors layers
        .route("/_health", get(health_check))
}

/// `*` allows any origin, otherwise only the listed ones.
fn allow_origin(origins: Vec<String>) -> AllowOrigin {
    if origins.iter().any(|origin| origin == "*") {
        tracing::info!("Allowing all origins");
        return AllowOrigin::any();
    }

    let origins = origins.into_iter().filter_map(|origin| {
        match HeaderValue::from_str(&origin) {
            Ok(value) => {
                tracing::info!("Adding {origin} to allowed origins");
                Some(value)
            }
            Err(e) => {
                tracing::warn!("Skipping invalid origin '{origin}': {e}");
                None
            }
        }
    });

    AllowOrigin::list(origins)
}

#[utoipa::path(
    get,
    path = "/_health",
    responses(
        (status = 200, description = "Service is up", body = String),
    )
)]
pub(crate) async fn health_check() -> impl IntoResponse {
    "OK"
}

#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Service status", body = ServiceInfo),
    )
)]
pub(crate) async fn service_info(state: State<AppState>) -> Json<ServiceInfo> {
    Json(ServiceInfo {
        message: "Table extraction API is running".to_string(),
        timestamp: chrono::Utc::now(),
        environment: state.environment.clone(),
    })
}
