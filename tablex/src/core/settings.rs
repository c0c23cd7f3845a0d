use crate::{error::TablexError, map_err};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, PoisonError, RwLock};
use tablex_openrouter::Settings;
use validify::{schema_err, schema_validation, Validate, ValidationErrors};

const API_KEY_PREFIX: &str = "sk-or-";
const API_KEY_MIN_LEN: usize = 21;

/// Upstream connection settings shared by every request.
#[derive(Clone, PartialEq)]
pub struct UpstreamSettings {
    pub api_key: Option<String>,
    pub base_url: String,
    pub http_referer: String,
    pub app_title: String,
}

impl UpstreamSettings {
    pub fn has_api_key(&self) -> bool {
        self.api_key.as_deref().is_some_and(|key| !key.is_empty())
    }

    /// Settings for the OpenRouter client.
    pub fn client_settings(&self) -> Settings {
        Settings {
            endpoint: self.base_url.clone(),
            api_key: self.api_key.clone(),
            referer: self.http_referer.clone(),
            title: self.app_title.clone(),
        }
    }

    /// The publicly visible part of the settings. The key itself is never exposed.
    pub fn view(&self) -> SettingsView {
        SettingsView {
            has_api_key: self.has_api_key(),
            base_url: self.base_url.clone(),
            http_referer: self.http_referer.clone(),
        }
    }
}

impl std::fmt::Debug for UpstreamSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpstreamSettings")
            .field("has_api_key", &self.has_api_key())
            .field("base_url", &self.base_url)
            .field("http_referer", &self.http_referer)
            .field("app_title", &self.app_title)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SettingsView {
    pub has_api_key: bool,
    pub base_url: String,
    pub http_referer: String,
}

/// A partial update of the [UpstreamSettings]. Absent fields are left as they are.
#[derive(Debug, Default, Clone, Deserialize, Validate, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
#[validate(Self::validate_schema)]
pub struct SettingsUpdate {
    /// OpenRouter API key, `sk-or-...`.
    pub api_key: Option<String>,

    /// OpenRouter API base URL.
    pub base_url: Option<String>,

    /// Referer sent upstream.
    pub http_referer: Option<String>,
}

impl SettingsUpdate {
    #[schema_validation]
    fn validate_schema(&self) -> Result<(), ValidationErrors> {
        if let Some(ref key) = self.api_key {
            if !is_valid_api_key(key) {
                schema_err!(
                    "invalid_api_key",
                    "Invalid API key format; OpenRouter keys start with 'sk-or-'"
                );
            }
        }
        if let Some(ref url) = self.base_url {
            if !is_http_url(url) {
                schema_err!("invalid_base_url", "Base URL must be an http(s) URL");
            }
        }
    }
}

/// Whether `key` looks like an OpenRouter API key.
pub fn is_valid_api_key(key: &str) -> bool {
    key.len() >= API_KEY_MIN_LEN && key.starts_with(API_KEY_PREFIX)
}

fn is_http_url(url: &str) -> bool {
    ["http://", "https://"]
        .iter()
        .any(|scheme| url.len() > scheme.len() && url.starts_with(scheme))
}

/// Shared handle to the current [UpstreamSettings].
///
/// Readers get an immutable snapshot. Updates replace the settings as a whole,
/// the last writer wins and snapshots taken before an update are unaffected.
#[derive(Debug, Clone)]
pub struct SettingsHandle {
    current: Arc<RwLock<Arc<UpstreamSettings>>>,
}

impl SettingsHandle {
    pub fn new(settings: UpstreamSettings) -> Self {
        Self {
            current: Arc::new(RwLock::new(Arc::new(settings))),
        }
    }

    pub fn snapshot(&self) -> Arc<UpstreamSettings> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Validate and apply `update`, returning the resulting settings.
    pub fn update(&self, update: SettingsUpdate) -> Result<Arc<UpstreamSettings>, TablexError> {
        map_err!(update.validate());

        let mut current = self
            .current
            .write()
            .unwrap_or_else(PoisonError::into_inner);

        let mut next = UpstreamSettings::clone(&current);

        if let Some(api_key) = update.api_key {
            next.api_key = Some(api_key);
        }
        if let Some(base_url) = update.base_url {
            next.base_url = base_url;
        }
        if let Some(http_referer) = update.http_referer {
            next.http_referer = http_referer;
        }

        let next = Arc::new(next);
        *current = next.clone();

        tracing::info!("Upstream settings updated: {next:?}");

        Ok(next)
    }
}
