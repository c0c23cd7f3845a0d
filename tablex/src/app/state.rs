use super::{extractor::openrouter::OpenRouterExtractor, store::FsUploadStore};
use crate::core::{
    extractor::TableExtractor,
    service::{extraction::ExtractionService, upload::UploadService},
    settings::{SettingsHandle, UpstreamSettings},
    store::UploadStore,
    upload::UploadPolicy,
};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Clone)]
pub struct AppState {
    /// Tablex services.
    pub services: ServiceState,

    /// Upstream settings, updatable at runtime.
    pub settings: SettingsHandle,

    /// Deployment environment name.
    pub environment: String,
}

impl AppState {
    /// Load the application state using the provided configuration.
    pub async fn new(args: &crate::config::StartArgs) -> Self {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from(args.log()))
            .init();

        let settings = SettingsHandle::new(UpstreamSettings {
            api_key: args.openrouter_api_key(),
            base_url: args.openrouter_base_url(),
            http_referer: args.http_referer(),
            app_title: args.app_title(),
        });

        if !settings.snapshot().has_api_key() {
            tracing::warn!(
                "No OpenRouter API key configured; set OPENROUTER_API_KEY or use POST /api/config"
            );
        }

        let store = Arc::new(FsUploadStore::new(&args.upload_path()));
        let extractor = Arc::new(OpenRouterExtractor::new());
        let policy = UploadPolicy::new(args.max_file_size());

        Self::from_parts(extractor, store, policy, settings, args.environment())
    }

    /// Assemble the state from already initialised providers.
    pub fn from_parts(
        extractor: Arc<dyn TableExtractor + Send + Sync>,
        store: Arc<dyn UploadStore + Send + Sync>,
        policy: UploadPolicy,
        settings: SettingsHandle,
        environment: String,
    ) -> Self {
        let upload = UploadService::new(store, policy);
        let extraction = ExtractionService::new(extractor, upload.clone(), settings.clone());

        Self {
            services: ServiceState { extraction, upload },
            settings,
            environment,
        }
    }
}

#[derive(Clone)]
pub struct ServiceState {
    pub extraction: ExtractionService,
    pub upload: UploadService,
}
