use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionNode {
    #[serde(rename = "nodeID")]
    pub node_id: String,
    pub node_type: String,
    pub status: Option<String>,
    pub props: Option<String>,
}

/// A node as it exists in released data, tagged with its submission.
#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ReleasedRecord {
    #[serde(rename = "submissionID")]
    pub submission_id: String,
    pub status: Option<String>,
    pub node_type: String,
    #[serde(rename = "nodeID")]
    pub node_id: String,
    /// JSON-encoded property map.
    pub props: String,
}
