use crate::{core::settings::UpstreamSettings, error::TablexError};
use tablex_openrouter::{
    chat::{ContentPart, GenerationOptions},
    models::Model,
};

/// Sends extraction messages to an AI provider.
///
/// Implementations receive the settings snapshot to use with every call
/// since the settings can change at runtime.
#[async_trait::async_trait]
pub trait TableExtractor {
    fn id(&self) -> &'static str;

    /// Send `content` to `model` and return the text of the answer.
    async fn extract(
        &self,
        settings: &UpstreamSettings,
        model: &str,
        content: Vec<ContentPart>,
        options: &GenerationOptions,
    ) -> Result<String, TablexError>;

    /// List the models the provider offers.
    async fn list_models(&self, settings: &UpstreamSettings) -> Result<Vec<Model>, TablexError>;
}
