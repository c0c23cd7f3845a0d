use super::{TablexErr, TablexError};
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use tablex_openrouter::error::OpenRouterError;

impl TablexError {
    pub fn status(&self) -> StatusCode {
        use OpenRouterError as ORE;
        use StatusCode as SC;
        use TablexErr as E;
        match &self.error {
            E::InvalidFileType(_)
            | E::TooManyFiles(_)
            | E::MissingField(_)
            | E::InvalidUpload(_)
            | E::Validation(_)
            | E::Encoding(_) => SC::BAD_REQUEST,
            E::FileTooLarge(_) => SC::PAYLOAD_TOO_LARGE,
            E::UnsupportedFileType(_) => SC::UNPROCESSABLE_ENTITY,
            E::Multipart(e) => e.status(),
            E::OpenRouter(ORE::MissingModel) => SC::BAD_REQUEST,
            E::OpenRouter(
                ORE::MissingApiKey | ORE::Upstream { .. } | ORE::Reqwest(_) | ORE::Json(_),
            ) => SC::INTERNAL_SERVER_ERROR,
            E::IO(_) | E::SerdeJson(_) => SC::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Error response wrapper.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ResponseError<T: Serialize> {
    success: bool,
    error_type: ErrorType,
    error: T,
}

impl<T> ResponseError<T>
where
    T: Serialize,
{
    pub fn new(error_type: ErrorType, error: T) -> Self {
        Self {
            success: false,
            error_type,
            error,
        }
    }
}

#[derive(Debug, Serialize)]
enum ErrorType {
    Internal,
    Api,
}

impl<T> IntoResponse for ResponseError<T>
where
    T: Serialize,
{
    fn into_response(self) -> axum::response::Response {
        <Json<ResponseError<T>> as IntoResponse>::into_response(Json(self))
    }
}

impl IntoResponse for TablexError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();

        self.print();

        use ErrorType as ET;
        use TablexErr as TE;

        match self.error {
            TE::InvalidFileType(e)
            | TE::FileTooLarge(e)
            | TE::TooManyFiles(e)
            | TE::MissingField(e)
            | TE::InvalidUpload(e)
            | TE::UnsupportedFileType(e) => (status, ResponseError::new(ET::Api, e)).into_response(),

            TE::Validation(errors) => (status, ResponseError::new(ET::Api, errors)).into_response(),

            TE::Encoding(e) => (
                status,
                ResponseError::new(ET::Api, format!("Invalid base64 file content; {e}")),
            )
                .into_response(),

            TE::Multipart(e) => (status, ResponseError::new(ET::Api, e.body_text())).into_response(),

            // The upstream message is relayed as is.
            TE::OpenRouter(e @ (OpenRouterError::MissingModel | OpenRouterError::Upstream { .. })) => {
                (status, ResponseError::new(ET::Api, e.to_string())).into_response()
            }

            TE::OpenRouter(e @ OpenRouterError::MissingApiKey) => {
                (status, ResponseError::new(ET::Internal, e.to_string())).into_response()
            }

            TE::OpenRouter(OpenRouterError::Reqwest(_) | OpenRouterError::Json(_)) => (
                status,
                ResponseError::new(ET::Internal, "Upstream request failed".to_string()),
            )
                .into_response(),

            TE::IO(_) | TE::SerdeJson(_) => (
                status,
                ResponseError::new(ET::Internal, "Internal".to_string()),
            )
                .into_response(),
        }
    }
}
