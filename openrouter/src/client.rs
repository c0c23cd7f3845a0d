use crate::{
    chat::{ChatRequest, Completion},
    error::OpenRouterError,
    models::{Model, ModelsResponse},
};
use tracing::debug;

pub const DEFAULT_OPENROUTER_ENDPOINT: &str = "https://openrouter.ai/api/v1";

/// Connection settings for [OpenRouter].
#[derive(Clone, PartialEq)]
pub struct Settings {
    /// Base URL the API paths are appended to.
    pub endpoint: String,

    /// Bearer token. Chat requests are refused without one.
    pub api_key: Option<String>,

    /// Sent as `HTTP-Referer` for attribution on the upstream side.
    pub referer: String,

    /// Sent as `X-Title` for attribution on the upstream side.
    pub title: String,
}

impl Settings {
    fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|key| !key.trim().is_empty())
    }
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("endpoint", &self.endpoint)
            .field("api_key", &self.api_key().map(|_| "<redacted>"))
            .field("referer", &self.referer)
            .field("title", &self.title)
            .finish()
    }
}

pub struct OpenRouter {
    settings: Settings,
    client: reqwest::Client,
}

impl OpenRouter {
    pub fn new(settings: Settings) -> Self {
        Self::with_client(reqwest::Client::new(), settings)
    }

    /// Use an existing client so connections are pooled across instances.
    pub fn with_client(client: reqwest::Client, settings: Settings) -> Self {
        Self { settings, client }
    }

    /// Send a chat completion request and return the text of the answer.
    ///
    /// Fails without sending anything if the API key or the model is missing.
    pub async fn chat(&self, request: &ChatRequest) -> Result<String, OpenRouterError> {
        let Some(key) = self.settings.api_key() else {
            return Err(OpenRouterError::MissingApiKey);
        };

        if request.model.trim().is_empty() {
            return Err(OpenRouterError::MissingModel);
        }

        let response = match self
            .client
            .post(self.url("chat/completions"))
            .bearer_auth(key)
            .header("HTTP-Referer", &self.settings.referer)
            .header("X-Title", &self.settings.title)
            .json(request)
            .send()
            .await
        {
            Ok(res) => res,
            Err(e) => {
                tracing::error!("Error in OpenRouter request: {e}");
                return Err(OpenRouterError::Reqwest(e));
            }
        };

        let status = response.status();
        let url = response.url().to_string();
        let body = response.text().await?;

        if !status.is_success() {
            tracing::error!("Request to {url} failed with status {status}");
            tracing::error!("Response: {body}");
            return Err(OpenRouterError::upstream(status.as_u16(), &body));
        }

        let completion = Completion::from_body(&body);

        debug!(
            "Completion with '{}' received, {} byte(s)",
            request.model,
            body.len()
        );

        Ok(completion.into_text())
    }

    /// Fetch the upstream model catalog. The API key is sent if configured.
    pub async fn list_models(&self) -> Result<Vec<Model>, OpenRouterError> {
        let mut request = self.client.get(self.url("models"));

        if let Some(key) = self.settings.api_key() {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            tracing::error!(
                "Request to {} failed with status {status}",
                response.url()
            );
            let body = response.text().await?;
            return Err(OpenRouterError::upstream(status.as_u16(), &body));
        }

        let response: ModelsResponse = serde_json::from_str(&response.text().await?)?;

        debug!("Fetched {} model(s)", response.data.len());

        Ok(response.data)
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{path}", self.settings.endpoint.trim_end_matches('/'))
    }
}

impl std::fmt::Debug for OpenRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenRouter")
            .field("settings", &self.settings)
            .finish()
    }
}
