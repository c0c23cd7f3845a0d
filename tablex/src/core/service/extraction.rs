use crate::{
    core::{
        batch::run_sequential,
        extract::build_message,
        extractor::TableExtractor,
        model::{BatchReport, ModelCatalog, UploadedFile},
        service::upload::UploadService,
        settings::{SettingsHandle, UpstreamSettings},
    },
    err,
    error::TablexError,
};
use std::{sync::Arc, time::Instant};
use tablex_openrouter::{chat::GenerationOptions, models::table_extraction_models};
use tracing::info;

/// What to extract with, shared by every file of a request.
#[derive(Debug, Clone, Copy)]
pub struct ExtractionParams<'a> {
    pub model: &'a str,
    pub custom_prompt: Option<&'a str>,
    pub options: GenerationOptions,
}

/// High level operations for table extraction.
#[derive(Clone)]
pub struct ExtractionService {
    extractor: Arc<dyn TableExtractor + Send + Sync>,
    uploads: UploadService,
    settings: SettingsHandle,
}

impl ExtractionService {
    pub fn new(
        extractor: Arc<dyn TableExtractor + Send + Sync>,
        uploads: UploadService,
        settings: SettingsHandle,
    ) -> Self {
        Self {
            extractor,
            uploads,
            settings,
        }
    }

    /// Extract tables from a single in-memory file.
    ///
    /// * `params`: Model, custom prompt and generation options.
    /// * `content`: Raw file bytes.
    /// * `mime_type`: Declared MIME type of the file.
    pub async fn process_file(
        &self,
        params: ExtractionParams<'_>,
        content: &[u8],
        mime_type: &str,
    ) -> Result<String, TablexError> {
        require_model(params.model)?;
        let settings = self.settings.snapshot();
        self.extract(&settings, params, content, mime_type).await
    }

    /// Extract tables from stored uploads, one file at a time.
    ///
    /// Each file yields one result regardless of the others failing and is removed
    /// from the store once processed. If the request itself is invalid, all files are
    /// removed and nothing is processed.
    pub async fn process_uploaded(
        &self,
        params: ExtractionParams<'_>,
        files: Vec<UploadedFile>,
    ) -> Result<BatchReport, TablexError> {
        if files.is_empty() {
            return err!(MissingField, "no files uploaded");
        }

        if let Err(e) = require_model(params.model) {
            self.uploads.discard_all(&files).await;
            return Err(e);
        }

        let __start = Instant::now();
        let total = files.len();
        let settings = self.settings.snapshot();

        info!("Processing {total} file(s) with '{}'", params.model);

        let results = run_sequential(files, |file| {
            let settings = settings.clone();
            async move {
                info!("Processing '{}' ({})", file.original_name, file.mime_type);

                let outcome = match self.uploads.read(&file).await {
                    Ok(content) => {
                        self.extract(&settings, params, &content, &file.mime_type)
                            .await
                    }
                    Err(e) => Err(e),
                };

                if let Err(ref e) = outcome {
                    e.print();
                }

                self.uploads.discard(&file).await;

                outcome
            }
        })
        .await;

        let report = BatchReport::new(total, results);

        info!(
            "Processed {}/{total} file(s) successfully, took {}ms",
            report.results.iter().filter(|r| r.is_success()).count(),
            Instant::now().duration_since(__start).as_millis()
        );

        Ok(report)
    }

    /// List the provider's models along with the ones suited for table extraction.
    pub async fn list_models(&self) -> Result<ModelCatalog, TablexError> {
        let settings = self.settings.snapshot();
        let all = self.extractor.list_models(&settings).await?;
        let table_extraction = table_extraction_models(&all);
        Ok(ModelCatalog {
            all,
            table_extraction,
        })
    }

    async fn extract(
        &self,
        settings: &UpstreamSettings,
        params: ExtractionParams<'_>,
        content: &[u8],
        mime_type: &str,
    ) -> Result<String, TablexError> {
        let message = build_message(content, mime_type, params.custom_prompt)?;
        self.extractor
            .extract(settings, params.model, message, &params.options)
            .await
    }
}

fn require_model(model: &str) -> Result<(), TablexError> {
    if model.trim().is_empty() {
        return err!(MissingField, "model is required");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        app::store::FsUploadStore,
        core::{
            extractor::mock::ScriptedExtractor,
            service::upload::FileUpload,
            settings::UpstreamSettings,
            upload::UploadPolicy,
        },
        error::TablexErr,
    };
    use tablex_openrouter::{chat::ContentPart, models::Model};
    use tracing_test::traced_test;

    struct Fixture {
        _dir: tempfile::TempDir,
        extractor: Arc<ScriptedExtractor>,
        uploads: UploadService,
        service: ExtractionService,
    }

    fn fixture(extractor: ScriptedExtractor) -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(FsUploadStore::new(&dir.path().display().to_string()));
        let uploads = UploadService::new(store, UploadPolicy::new(1024));
        let extractor = Arc::new(extractor);
        let settings = SettingsHandle::new(UpstreamSettings {
            api_key: Some("sk-or-xxxxxxxxxxxxxxxxxxxxxxx".to_string()),
            base_url: "http://localhost".to_string(),
            http_referer: "http://localhost:3000".to_string(),
            app_title: "tests".to_string(),
        });
        let service = ExtractionService::new(extractor.clone(), uploads.clone(), settings);
        Fixture {
            _dir: dir,
            extractor,
            uploads,
            service,
        }
    }

    fn params(model: &str) -> ExtractionParams<'_> {
        ExtractionParams {
            model,
            custom_prompt: None,
            options: GenerationOptions::default(),
        }
    }

    async fn upload(uploads: &UploadService, name: &str, mime: &str, content: &[u8]) -> UploadedFile {
        uploads
            .store(FileUpload {
                field: "files",
                name,
                mime_type: mime,
                content,
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn batch_reports_partial_failure() {
        let f = fixture(ScriptedExtractor::default());

        let files = vec![
            upload(&f.uploads, "one.pdf", "application/pdf", b"first").await,
            upload(&f.uploads, "two.png", "image/png", b"FAIL").await,
            upload(&f.uploads, "three.png", "image/png", b"third").await,
        ];
        let paths: Vec<_> = files.iter().map(|f| f.path.clone()).collect();

        let report = f
            .service
            .process_uploaded(params("google/gemini-pro-vision"), files)
            .await
            .unwrap();

        assert_eq!(3, report.total_files);
        assert_eq!(3, report.processed_files);
        assert!(report.results[0].is_success());
        assert!(!report.results[1].is_success());
        assert_eq!("two.png", report.results[1].filename);
        assert!(report.results[2].is_success());

        assert_eq!(3, f.extractor.calls().len());

        for path in paths {
            assert!(tokio::fs::metadata(path).await.is_err());
        }
    }

    #[tokio::test]
    async fn unsupported_types_fail_per_file() {
        let f = fixture(ScriptedExtractor::default());

        let files = vec![
            upload(&f.uploads, "notes.txt", "text/plain", b"a,b").await,
            upload(&f.uploads, "scan.pdf", "application/pdf", b"%PDF").await,
        ];

        let report = f.service.process_uploaded(params("m"), files).await.unwrap();

        let error = report.results[0].outcome.clone().unwrap_err();
        assert!(error.starts_with("Unsupported file type"));
        assert!(report.results[1].is_success());

        // The text file never reaches the provider.
        assert_eq!(1, f.extractor.calls().len());
    }

    #[tokio::test]
    async fn missing_model_aborts_and_cleans_up() {
        let f = fixture(ScriptedExtractor::default());

        let file = upload(&f.uploads, "scan.pdf", "application/pdf", b"%PDF").await;
        let path = file.path.clone();

        let err = f
            .service
            .process_uploaded(params(" "), vec![file])
            .await
            .unwrap_err();

        assert!(matches!(err.error, TablexErr::MissingField(_)));
        assert!(tokio::fs::metadata(path).await.is_err());
        assert!(f.extractor.calls().is_empty());

        let err = f.service.process_uploaded(params("m"), vec![]).await.unwrap_err();
        assert!(matches!(err.error, TablexErr::MissingField(_)));
    }

    #[tokio::test]
    #[traced_test]
    async fn cleanup_failures_are_only_logged() {
        let f = fixture(ScriptedExtractor::default());

        let file = upload(&f.uploads, "scan.pdf", "application/pdf", b"%PDF").await;
        let mut gone = file.clone();
        gone.path = format!("{}.missing", file.path);

        // Reading fails for the missing copy, removing fails for both the
        // missing copy and the already processed original.
        let report = f
            .service
            .process_uploaded(params("m"), vec![file.clone(), file, gone])
            .await
            .unwrap();

        assert_eq!(3, report.processed_files);
        assert!(report.results[0].is_success());
        assert!(!report.results[1].is_success());
        assert!(!report.results[2].is_success());
        assert!(logs_contain("Failed to remove uploaded file"));
    }

    #[tokio::test]
    async fn single_file_forwards_prompt_and_options() {
        let f = fixture(ScriptedExtractor::default());

        let params = ExtractionParams {
            model: "anthropic/claude-3-haiku",
            custom_prompt: Some("Skip the totals row."),
            options: GenerationOptions {
                prefer_latency: true,
                ..Default::default()
            },
        };

        let text = f
            .service
            .process_file(params, b"%PDF", "application/pdf")
            .await
            .unwrap();
        assert_eq!(r#"{"data":[{"file":"document.pdf"}]}"#, text);

        let calls = f.extractor.calls();
        let (model, content, options) = &calls[0];
        assert_eq!("anthropic/claude-3-haiku", model);
        assert!(options.prefer_latency);
        match &content[0] {
            ContentPart::Text { text } => assert!(text.ends_with("Skip the totals row.")),
            part => panic!("unexpected {part:?}"),
        }
    }

    #[tokio::test]
    async fn lists_catalog_with_extraction_subset() {
        let model = |id: &str, context_length| Model {
            id: id.to_string(),
            name: None,
            context_length,
            extra: Default::default(),
        };
        let f = fixture(ScriptedExtractor {
            models: vec![
                model("small/one", Some(2048)),
                model("google/gemini-flash", Some(2048)),
            ],
            ..Default::default()
        });

        let catalog = f.service.list_models().await.unwrap();

        assert_eq!(2, catalog.all.len());
        assert_eq!(1, catalog.table_extraction.len());
        assert_eq!("google/gemini-flash", catalog.table_extraction[0].id);
    }
}
