use serde::{Deserialize, Serialize};

#[derive(Deserialize, Debug)]
pub struct Batch {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub files: Vec<BatchFile>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct BatchFile {
    pub file_name: String,
    #[serde(rename = "signedURL")]
    pub signed_url: String,
}

/// File entry sent to `createBatch`.
#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct FileInput {
    pub file_name: String,
    pub size: u64,
}

/// Per-file outcome reported back through `updateBatch`.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UploadResult {
    pub file_name: String,
    pub succeeded: bool,
    pub errors: Vec<String>,
    pub skipped: bool,
}
