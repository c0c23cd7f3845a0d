//! Sequential processing of uploaded files.

use crate::core::model::{ExtractionResult, UploadedFile};
use std::future::Future;

/// Run `step` over every file, one at a time, in order.
///
/// Every file yields exactly one [ExtractionResult]. A failing step is recorded as a
/// failure for its file and processing continues with the next one.
pub async fn run_sequential<F, Fut, E>(files: Vec<UploadedFile>, mut step: F) -> Vec<ExtractionResult>
where
    F: FnMut(UploadedFile) -> Fut,
    Fut: Future<Output = Result<String, E>>,
    E: std::fmt::Display,
{
    let mut results = Vec::with_capacity(files.len());

    for file in files {
        let pending = ExtractionResult::new(&file, Ok(String::new()));
        let outcome = step(file).await.map_err(|e| e.to_string());
        results.push(ExtractionResult { outcome, ..pending });
    }

    results
}
