use clap::Parser;
use tablex_openrouter::DEFAULT_OPENROUTER_ENDPOINT;

/// The default directory uploaded files are written to.
const DEFAULT_UPLOAD_PATH: &str = "uploads";
/// The default address to listen on.
const DEFAULT_ADDRESS: &str = "0.0.0.0:3001";
/// The default maximum size of a single uploaded file, 10 MiB.
pub const DEFAULT_MAX_FILE_SIZE: usize = 10 * 1024 * 1024;
/// The default origin of the frontend, also used as the upstream referer.
const DEFAULT_FRONTEND_ORIGIN: &str = "http://localhost:3000";
/// The default application title sent upstream.
const DEFAULT_APP_TITLE: &str = "Table Extractor";

#[derive(Debug, Default, Parser)]
#[command(name = "tablex", version = "0.1", about = "Extract tables from documents", long_about = None)]
pub struct StartArgs {
    /// RUST_LOG string to use as the env filter.
    #[arg(short, long)]
    log: Option<String>,

    /// Directory uploaded files are temporarily stored in.
    #[arg(short, long)]
    upload_path: Option<String>,

    /// Address to listen on.
    #[arg(short, long)]
    address: Option<String>,

    /// Maximum size of a single uploaded file in bytes.
    #[arg(short, long)]
    max_file_size: Option<String>,

    /// Deployment environment name, reported on the index route.
    #[arg(short, long)]
    environment: Option<String>,

    /// CORS allowed origins.
    #[arg(long)]
    cors_allowed_origins: Option<String>,

    /// OpenRouter API key. Can also be set at runtime through the config API.
    #[arg(long)]
    openrouter_api_key: Option<String>,

    /// OpenRouter API base URL.
    #[arg(long)]
    openrouter_base_url: Option<String>,

    /// Referer sent to OpenRouter for attribution.
    #[arg(long)]
    http_referer: Option<String>,

    /// Application title sent to OpenRouter for attribution.
    #[arg(long)]
    app_title: Option<String>,
}

/// Implement a getter method on [StartArgs], using the `$var` environment variable as a fallback
/// and either default or return `None` if neither the argument nor the environment variable is set.
macro_rules! arg {
    ($id:ident, $var:literal, default $value:expr) => {
        impl StartArgs {
            pub fn $id(&self) -> String {
                match &self.$id {
                    Some(val) => val.to_string(),
                    None => match std::env::var($var) {
                        Ok(val) => val,
                        Err(_) => $value,
                    },
                }
            }
        }
    };
    ($id:ident, $var:literal, optional) => {
        impl StartArgs {
            pub fn $id(&self) -> Option<String> {
                match &self.$id {
                    Some(val) => Some(val.to_string()),
                    None => std::env::var($var).ok().filter(|val| !val.is_empty()),
                }
            }
        }
    };
}

impl StartArgs {
    pub fn allowed_origins(&self) -> Vec<String> {
        let origins = match &self.cors_allowed_origins {
            Some(origins) => origins.clone(),
            None => std::env::var("CORS_ALLOWED_ORIGINS")
                .unwrap_or_else(|_| DEFAULT_FRONTEND_ORIGIN.to_string()),
        };

        origins
            .split(',')
            .filter_map(|o| (!o.is_empty()).then_some(String::from(o.trim())))
            .collect()
    }

    pub fn max_file_size(&self) -> usize {
        let size = match &self.max_file_size {
            Some(size) => size.clone(),
            None => match std::env::var("MAX_FILE_SIZE") {
                Ok(size) => size,
                Err(_) => return DEFAULT_MAX_FILE_SIZE,
            },
        };

        match size.trim().parse() {
            Ok(size) => size,
            Err(e) => panic!(
                "Invalid max file size '{size}' ({e}); Pass --max-file-size or set MAX_FILE_SIZE in bytes"
            ),
        }
    }
}

arg!(log,                 "RUST_LOG",            default "info".to_string());
arg!(upload_path,         "UPLOAD_DIR",          default DEFAULT_UPLOAD_PATH.to_string());
arg!(address,             "ADDRESS",             default DEFAULT_ADDRESS.to_string());
arg!(environment,         "APP_ENV",             default "development".to_string());
arg!(openrouter_api_key,  "OPENROUTER_API_KEY",  optional);
arg!(openrouter_base_url, "OPENROUTER_BASE_URL", default DEFAULT_OPENROUTER_ENDPOINT.to_string());
arg!(http_referer,        "HTTP_REFERER",        default DEFAULT_FRONTEND_ORIGIN.to_string());
arg!(app_title,           "APP_TITLE",           default DEFAULT_APP_TITLE.to_string());
