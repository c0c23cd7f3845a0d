use crate::{
    core::{extractor::TableExtractor, settings::UpstreamSettings},
    error::TablexError,
    map_err,
};
use tablex_openrouter::{
    chat::{ChatRequest, ContentPart, GenerationOptions},
    models::Model,
    OpenRouter,
};

/// [TableExtractor] backed by the OpenRouter API.
///
/// A client is built from the settings snapshot on every call,
/// the underlying connection pool is shared.
#[derive(Debug, Clone, Default)]
pub struct OpenRouterExtractor {
    http: reqwest::Client,
}

impl OpenRouterExtractor {
    pub fn new() -> Self {
        tracing::info!("Initializing OpenRouter extractor");
        Self::default()
    }

    fn client(&self, settings: &UpstreamSettings) -> OpenRouter {
        OpenRouter::with_client(self.http.clone(), settings.client_settings())
    }
}

#[async_trait::async_trait]
impl TableExtractor for OpenRouterExtractor {
    fn id(&self) -> &'static str {
        "openrouter"
    }

    async fn extract(
        &self,
        settings: &UpstreamSettings,
        model: &str,
        content: Vec<ContentPart>,
        options: &GenerationOptions,
    ) -> Result<String, TablexError> {
        let request = ChatRequest::new(model, content, options);
        Ok(map_err!(self.client(settings).chat(&request).await))
    }

    async fn list_models(&self, settings: &UpstreamSettings) -> Result<Vec<Model>, TablexError> {
        Ok(map_err!(self.client(settings).list_models().await))
    }
}
