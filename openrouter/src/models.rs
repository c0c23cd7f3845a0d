use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Model identifiers containing any of these are assumed to handle documents and images.
const TABLE_EXTRACTION_KEYWORDS: &[&str] = &["vision", "gpt-4-vision", "claude-3", "gemini"];

/// Models with at least this much context are assumed to fit a table sized document.
const TABLE_EXTRACTION_MIN_CONTEXT: u64 = 8000;

/// A model from the upstream catalog. Fields not modelled here are kept in `extra`
/// and serialized back as they were received.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Model {
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_length: Option<u64>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Model {
    /// Heuristic check whether the model is worth offering for table extraction.
    /// This is a guess based on the name and context window, not a capability check.
    pub fn is_table_extraction_candidate(&self) -> bool {
        let id = self.id.to_lowercase();

        TABLE_EXTRACTION_KEYWORDS.iter().any(|kw| id.contains(kw))
            || self
                .context_length
                .is_some_and(|len| len >= TABLE_EXTRACTION_MIN_CONTEXT)
    }
}

/// Response of `GET /models`.
#[derive(Debug, Deserialize)]
pub(crate) struct ModelsResponse {
    pub data: Vec<Model>,
}

/// Select the models considered suitable for table extraction, preserving order.
pub fn table_extraction_models(models: &[Model]) -> Vec<Model> {
    models
        .iter()
        .filter(|m| m.is_table_extraction_candidate())
        .cloned()
        .collect()
}
