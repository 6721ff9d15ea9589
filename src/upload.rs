//! Batch metadata upload: create a batch, PUT each file, report results.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};

use crate::client::HubClient;
use crate::error::{HubError, Result};
use crate::queries;
use crate::types::{Batch, FileInput, UploadResult};

pub const METADATA_CONTENT_TYPE: &str = "text/tab-separated-values";

#[derive(Deserialize)]
struct CreateBatchResponse {
    #[serde(rename = "createBatch")]
    create_batch: Batch,
}

#[derive(Debug)]
pub struct BatchOutcome {
    pub batch_id: String,
    pub results: Vec<UploadResult>,
}

/// Describe local files for `createBatch`, failing on anything unreadable.
///
/// Signed URLs come back keyed by file name, so two paths sharing a name
/// are rejected.
pub fn file_inputs(paths: &[PathBuf]) -> Result<Vec<FileInput>> {
    let mut seen = HashSet::new();
    paths
        .iter()
        .map(|path| {
            if !path.exists() {
                return Err(HubError::FileNotFound(path.display().to_string()));
            }
            let name = file_name(path);
            if !seen.insert(name.clone()) {
                return Err(HubError::InvalidInput(format!(
                    "more than one file is named '{name}' ({})",
                    path.display()
                )));
            }
            let metadata = std::fs::metadata(path).map_err(|e| HubError::FileRead {
                path: path.display().to_string(),
                source: e,
            })?;
            Ok(FileInput {
                file_name: name,
                size: metadata.len(),
            })
        })
        .collect()
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("file")
        .to_string()
}

/// Upload metadata files into a new batch on `submission_id`.
///
/// Failed PUTs are recorded per file rather than aborting the batch, so the
/// portal always learns the outcome of every file it handed a URL for.
pub async fn upload_metadata(
    client: &HubClient,
    submission_id: &str,
    paths: &[PathBuf],
) -> Result<BatchOutcome> {
    let inputs = file_inputs(paths)?;

    let variables = json!({
        "submissionID": submission_id,
        "type": "metadata",
        "files": inputs,
    });
    let response: CreateBatchResponse = client
        .query(&queries::CREATE_BATCH, Some(variables))
        .await?;
    let batch = response.create_batch;
    info!(batch_id = %batch.id, files = batch.files.len(), "created batch");

    let mut results = Vec::with_capacity(paths.len());
    for path in paths {
        let name = file_name(path);
        let Some(target) = batch.files.iter().find(|f| f.file_name == name) else {
            warn!(file = %name, "batch returned no upload URL");
            results.push(UploadResult {
                file_name: name,
                succeeded: false,
                errors: Vec::new(),
                skipped: true,
            });
            continue;
        };

        let body = std::fs::read(path).map_err(|e| HubError::FileRead {
            path: path.display().to_string(),
            source: e,
        })?;

        let result = match client
            .upload(&target.signed_url, body, METADATA_CONTENT_TYPE)
            .await
        {
            Ok(()) => UploadResult {
                file_name: name,
                succeeded: true,
                errors: Vec::new(),
                skipped: false,
            },
            Err(e) => {
                warn!(file = %name, error = %e, "upload failed");
                UploadResult {
                    file_name: name,
                    succeeded: false,
                    errors: vec![e.to_string()],
                    skipped: false,
                }
            }
        };
        results.push(result);
    }

    let variables = json!({ "batchID": batch.id, "files": results });
    client
        .query::<serde_json::Value>(&queries::UPDATE_BATCH, Some(variables))
        .await?;

    Ok(BatchOutcome {
        batch_id: batch.id,
        results,
    })
}
