//! Compare a submission's nodes with what is already released.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::{json, Map, Value};
use tracing::{debug, info};

use crate::client::HubClient;
use crate::error::{HubError, Result};
use crate::normalize::{has_errors, records_at, Table};
use crate::queries;
use crate::types::{ReleasedRecord, SubmissionNode};

pub const STATE_COLUMN: &str = "submission_state";
pub const SUBMISSION_COLUMN: &str = "submission_id";

const NODES_PATH: &[&str] = &["data", "getSubmissionNodes", "nodes"];
const RELEASED_PATH: &[&str] = &["data", "retrieveReleasedDataByID"];

/// YAML job description for a released-data diff run.
#[derive(Deserialize, Debug, Clone)]
pub struct DiffConfig {
    pub tier: String,
    pub subid: Vec<String>,
    pub nodelist: Vec<String>,
    #[serde(default = "default_severity")]
    pub severity: String,
    pub outputdirectory: PathBuf,
}

fn default_severity() -> String {
    "All".to_string()
}

impl DiffConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| HubError::FileRead {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::from_yaml(&contents).map_err(|e| HubError::DiffConfigParse {
            path: path.to_path_buf(),
            source: e,
        })
    }

    pub fn from_yaml(contents: &str) -> std::result::Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(contents)
    }

    pub fn output_path(&self, submission_id: &str, node_type: &str) -> PathBuf {
        self.outputdirectory
            .join(format!("{submission_id}_{node_type}_warning_diffs.tsv"))
    }
}

/// Rows whose properties appear in only one of the released versions.
///
/// Identical property sets cancel out entirely. Each surviving row is marked
/// `New` if it belongs to `current`, otherwise `Existing`.
pub fn released_diff(records: &[ReleasedRecord], current: &str) -> Result<Table> {
    let mut parsed: Vec<(String, Map<String, Value>)> = Vec::with_capacity(records.len());
    for record in records {
        let props: Map<String, Value> =
            serde_json::from_str(&record.props).map_err(HubError::Decode)?;
        parsed.push((record.submission_id.clone(), props));
    }

    let rows: Vec<Value> = parsed
        .iter()
        .enumerate()
        .filter(|(i, (_, props))| {
            !parsed
                .iter()
                .enumerate()
                .any(|(j, (_, other))| *i != j && other == props)
        })
        .map(|(_, (submission_id, props))| {
            let state = if submission_id == current { "New" } else { "Existing" };
            let mut row = Map::new();
            row.insert(STATE_COLUMN.to_string(), json!(state));
            row.insert(SUBMISSION_COLUMN.to_string(), json!(submission_id));
            for (key, value) in props {
                row.entry(key.clone()).or_insert_with(|| value.clone());
            }
            Value::Object(row)
        })
        .collect();

    Ok(Table::from_records(&rows))
}

/// Diff every node of one type in a submission against released data.
pub async fn diff_node_type(
    client: &HubClient,
    submission_id: &str,
    node_type: &str,
    severity: &str,
) -> Result<Table> {
    let variables = json!({
        "_id": submission_id,
        "nodeType": node_type,
        "status": severity,
        "first": -1,
        "offset": 0,
        "orderBy": "studyID",
        "sortDirection": "desc",
    });
    let response = client
        .execute(&queries::SUBMISSION_NODES, Some(variables))
        .await?;

    let nodes: Vec<SubmissionNode> = match records_at(&response, NODES_PATH) {
        Some(records) => serde_json::from_value(Value::Array(records.clone()))
            .map_err(HubError::Decode)?,
        None => return Ok(Table::default()),
    };
    debug!(submission_id, node_type, nodes = nodes.len(), "fetched submission nodes");

    let mut report = Table::default();
    for node in &nodes {
        let variables = json!({
            "submissionID": submission_id,
            "nodeType": node.node_type,
            "nodeID": node.node_id,
        });
        let response = client
            .execute(&queries::RETRIEVED_RELEASED_DATA, Some(variables))
            .await?;

        if has_errors(&response) {
            debug!(node_id = %node.node_id, "no released data");
            continue;
        }
        let Some(records) = records_at(&response, RELEASED_PATH) else {
            continue;
        };
        let released: Vec<ReleasedRecord> =
            serde_json::from_value(Value::Array(records.clone())).map_err(HubError::Decode)?;

        if released.len() < 2 {
            continue;
        }
        report = report.concat(&released_diff(&released, submission_id)?);
    }

    Ok(report)
}

/// Run the whole job, writing one TSV per submission and node type that
/// has differences. Returns the files written.
pub async fn run(client: &HubClient, config: &DiffConfig) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(&config.outputdirectory)?;

    let mut written = Vec::new();
    for submission_id in &config.subid {
        info!(submission_id = %submission_id, "processing submission");
        for node_type in &config.nodelist {
            let table = diff_node_type(client, submission_id, node_type, &config.severity).await?;
            if table.is_empty() {
                continue;
            }

            let path = config.output_path(submission_id, node_type);
            std::fs::write(&path, table.to_tsv())?;
            info!(path = %path.display(), rows = table.len(), "wrote diff");
            written.push(path);
        }
    }

    Ok(written)
}
