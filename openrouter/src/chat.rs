use serde::Serialize;
use serde_json::Value;

const DEFAULT_MAX_TOKENS: u32 = 4000;
const DEFAULT_TEMPERATURE: f64 = 0.1;

/// Body of a `POST /chat/completions` request.
#[derive(Debug, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
    pub temperature: f64,
    pub stream: bool,

    /// Provider routing preferences. Only sent when latency is prioritised.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<ProviderPreferences>,
}

impl ChatRequest {
    /// Create a request carrying a single user message with the given content.
    pub fn new(model: &str, content: Vec<ContentPart>, options: &GenerationOptions) -> Self {
        Self {
            model: model.to_string(),
            messages: vec![ChatMessage {
                role: Role::User,
                content,
            }],
            max_tokens: options.max_tokens,
            temperature: options.temperature,
            stream: false,
            provider: options.prefer_latency.then(ProviderPreferences::latency),
        }
    }
}

/// Tunable generation parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationOptions {
    pub max_tokens: u32,
    pub temperature: f64,

    /// If true, ask the upstream router to pick the lowest latency provider.
    pub prefer_latency: bool,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
            prefer_latency: false,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: Vec<ContentPart>,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
}

/// A single part of a multimodal message.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text { text: String },
    File { file: FilePart },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilePart {
    pub filename: String,

    /// The file contents as a `data:` URL.
    pub file_data: String,
}

#[derive(Debug, Serialize)]
pub struct ProviderPreferences {
    pub sort: String,
}

impl ProviderPreferences {
    pub fn latency() -> Self {
        Self {
            sort: "latency".to_string(),
        }
    }
}

/// The shapes a completion response is known to arrive in.
///
/// Shapes are matched in declaration order. Bodies matching none of them
/// are kept whole in [Completion::Unrecognized] so no output is lost.
#[derive(Debug, Clone, PartialEq)]
pub enum Completion {
    /// `{"choices": [{"message": {"content": ".."}}, ..]}`
    Choices(Vec<String>),

    /// `{"output": {"text": ".."}}`
    OutputText(String),

    /// `{"content": ".."}`
    Content(String),

    /// The body is a bare string.
    Raw(String),

    Unrecognized(Value),
}

impl Completion {
    /// Interpret a raw response body. Bodies that are not JSON are treated
    /// as raw text.
    pub fn from_body(body: &str) -> Self {
        match serde_json::from_str::<Value>(body) {
            Ok(value) => Self::from_value(value),
            Err(_) => Self::Raw(body.to_string()),
        }
    }

    pub fn from_value(value: Value) -> Self {
        if let Some(contents) = choice_contents(&value) {
            return Self::Choices(contents);
        }

        if let Some(text) = value
            .get("output")
            .and_then(|output| output.get("text"))
            .and_then(Value::as_str)
        {
            return Self::OutputText(text.to_string());
        }

        if let Some(content) = value.get("content").and_then(Value::as_str) {
            return Self::Content(content.to_string());
        }

        match value {
            Value::String(raw) => Self::Raw(raw),
            value => Self::Unrecognized(value),
        }
    }

    /// Flatten the completion to the text handed back to callers.
    pub fn into_text(self) -> String {
        match self {
            Self::Choices(contents) => contents.join("\n"),
            Self::OutputText(text) | Self::Content(text) | Self::Raw(text) => text,
            Self::Unrecognized(value) => value.to_string(),
        }
    }
}

/// Collect every `choices[].message.content` string. `None` if there are none.
fn choice_contents(value: &Value) -> Option<Vec<String>> {
    let contents: Vec<String> = value
        .get("choices")?
        .as_array()?
        .iter()
        .filter_map(|choice| choice.get("message")?.get("content")?.as_str())
        .map(String::from)
        .collect();

    (!contents.is_empty()).then_some(contents)
}
