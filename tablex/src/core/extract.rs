//! Building the multimodal message sent upstream for a single document.

use crate::{core::upload::normalize_mime, err, error::TablexError};
use base64::{engine::general_purpose::STANDARD, Engine};
use tablex_openrouter::chat::{ContentPart, FilePart};

/// The instruction every extraction request starts with.
pub const EXTRACTION_INSTRUCTION: &str = "\
You are a precise data extraction assistant. Extract every table contained in the attached \
document and return the result as JSON.

Rules:
- Respond with a single JSON object of the form {\"data\": [...]} and nothing else.
- Every table row becomes one object in the \"data\" array, in the order the rows appear.
- Use the column headers as keys. If a table has no headers, use \"column_1\", \"column_2\", ...
- Keep cell values exactly as written. Use null for empty cells.
- If the document contains several tables, append their rows to the same \"data\" array and \
add a \"table\" key holding the 1-based index of the table the row came from.
- If the document contains no table, respond with {\"data\": []}.";

/// The document families the upstream model is asked to read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceKind {
    Pdf,

    /// An image, holding the MIME subtype, e.g. `png`.
    Image(String),
}

impl SourceKind {
    /// Classify a MIME type. Anything other than PDF or an image is unsupported.
    pub fn classify(mime_type: &str) -> Result<Self, TablexError> {
        let mime = normalize_mime(mime_type);

        if mime == "application/pdf" {
            return Ok(Self::Pdf);
        }

        match mime.strip_prefix("image/") {
            Some(subtype) if !subtype.is_empty() => Ok(Self::Image(subtype.to_string())),
            _ => err!(
                UnsupportedFileType,
                "{mime_type}; only PDF documents and images can be processed"
            ),
        }
    }

    /// The file name the document is presented under. The original name is never sent.
    pub fn placeholder_name(&self) -> String {
        match self {
            Self::Pdf => "document.pdf".to_string(),
            Self::Image(subtype) => format!("image.{subtype}"),
        }
    }
}

/// Encode `content` as a `data:<mime>;base64,<payload>` URL.
pub fn data_url(mime_type: &str, content: &[u8]) -> String {
    format!("data:{mime_type};base64,{}", STANDARD.encode(content))
}

/// The instruction text, with `custom_prompt` appended if it is not blank.
pub fn instruction(custom_prompt: Option<&str>) -> String {
    match custom_prompt.filter(|p| !p.trim().is_empty()) {
        Some(custom) => format!("{EXTRACTION_INSTRUCTION}\n\nAdditional instructions:\n{custom}"),
        None => EXTRACTION_INSTRUCTION.to_string(),
    }
}

/// Build the content of the message asking the upstream model to extract the tables in
/// `content`. The result always holds the instruction followed by the file.
///
/// * `content`: Raw file bytes.
/// * `mime_type`: The declared MIME type of the file.
/// * `custom_prompt`: Optional caller instructions appended to the fixed instruction.
pub fn build_message(
    content: &[u8],
    mime_type: &str,
    custom_prompt: Option<&str>,
) -> Result<Vec<ContentPart>, TablexError> {
    let kind = SourceKind::classify(mime_type)?;

    Ok(vec![
        ContentPart::Text {
            text: instruction(custom_prompt),
        },
        ContentPart::File {
            file: FilePart {
                filename: kind.placeholder_name(),
                file_data: data_url(&normalize_mime(mime_type), content),
            },
        },
    ])
}
