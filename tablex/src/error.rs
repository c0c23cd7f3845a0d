use std::error::Error as _;
use tablex_openrouter::error::OpenRouterError;
use thiserror::Error;
use tracing::error;
use validify::ValidationErrors;

pub mod http;

#[derive(Debug, Error)]
pub enum TablexErr {
    #[error("Invalid file type; {0}")]
    InvalidFileType(String),

    #[error("File too large; {0}")]
    FileTooLarge(String),

    #[error("Too many files; {0}")]
    TooManyFiles(String),

    #[error("Missing field; {0}")]
    MissingField(String),

    #[error("Invalid upload; {0}")]
    InvalidUpload(String),

    #[error("Unsupported file type; {0}")]
    UnsupportedFileType(String),

    #[error("{0}")]
    OpenRouter(#[from] OpenRouterError),

    #[error("Validation; {0}")]
    Validation(#[from] ValidationErrors),

    #[error("Multipart; {0}")]
    Multipart(#[from] axum::extract::multipart::MultipartError),

    #[error("IO; {0}")]
    IO(#[from] std::io::Error),

    #[error("JSON error; {0}")]
    SerdeJson(#[from] serde_json::Error),

    #[error("encoding: {0}")]
    Encoding(#[from] base64::DecodeError),
}

#[derive(Debug, Error)]
#[error("{error}")]
pub struct TablexError {
    file: &'static str,
    line: u32,
    column: u32,
    pub error: TablexErr,
}

impl TablexError {
    pub fn new(file: &'static str, line: u32, column: u32, error: TablexErr) -> TablexError {
        TablexError {
            file,
            line,
            column,
            error,
        }
    }

    pub fn location(&self) -> String {
        format!("{}:{}:{}", self.file, self.line, self.column)
    }

    pub fn print(&self) {
        let location = self.location();

        error!("{location} | {self}");

        if self.error.source().is_some() {
            error!("Causes:");
        }

        let mut src = self.error.source();
        while let Some(source) = src {
            error!(" - {source}");
            src = source.source();
        }
    }
}

#[macro_export]
macro_rules! err {
    ($ty:ident $(, $l:literal $(,)? $($args:expr),* )?) => {
        Err($crate::error::TablexError::new(
            file!(),
            line!(),
            column!(),
            $crate::error::TablexErr::$ty $( (format!($l, $( $args, )*)) )?,
        ))
    };
}

#[macro_export]
macro_rules! map_err {
    ($ex:expr) => {
        $ex.map_err(|e| $crate::error::TablexError::new(file!(), line!(), column!(), e.into()))?
    };
}
