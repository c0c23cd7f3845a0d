use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OpenRouterError {
    #[error("authentication required; missing API key")]
    MissingApiKey,

    #[error("model required")]
    MissingModel,

    /// The upstream responded with a non-2xx status.
    #[error("{message}")]
    Upstream { status: u16, message: String },

    #[error("http client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl OpenRouterError {
    /// Build an [OpenRouterError::Upstream] from a failed response body.
    /// Uses the message the upstream provided, if any.
    pub(crate) fn upstream(status: u16, body: &str) -> Self {
        let message = match serde_json::from_str::<ErrorEnvelope>(body) {
            Ok(ErrorEnvelope {
                error: ErrorBody::Detailed { message },
            }) => message,
            Ok(ErrorEnvelope {
                error: ErrorBody::Plain(message),
            }) => message,
            Err(_) => format!("HTTP {status}"),
        };
        Self::Upstream { status, message }
    }
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ErrorBody {
    Detailed { message: String },
    Plain(String),
}

#[cfg(test)]
mod tests {
    use super::OpenRouterError;

    fn message(status: u16, body: &str) -> String {
        match OpenRouterError::upstream(status, body) {
            OpenRouterError::Upstream { message, .. } => message,
            e => panic!("unexpected error: {e}"),
        }
    }

    #[test]
    fn upstream_message_is_extracted() {
        let body = r#"{"error":{"message":"rate limited","code":429}}"#;
        assert_eq!("rate limited", message(429, body));
    }

    #[test]
    fn plain_error_string_is_used() {
        assert_eq!("no credits", message(402, r#"{"error":"no credits"}"#));
    }

    #[test]
    fn unparsable_body_falls_back_to_status() {
        assert_eq!("HTTP 502", message(502, "<html>Bad Gateway</html>"));
        assert_eq!("HTTP 500", message(500, r#"{"detail":"boom"}"#));
    }
}
