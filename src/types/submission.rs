use serde::{Deserialize, Serialize};

/// A data-upload submission as listed by the portal.
#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub status: Option<String>,
    pub submitter_name: Option<String>,
    pub data_commons: Option<String>,
    pub study_abbreviation: Option<String>,
    #[serde(rename = "studyID")]
    pub study_id: Option<String>,
    #[serde(rename = "dbGaPID")]
    pub dbgap_id: Option<String>,
    pub intention: Option<String>,
    pub data_type: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

/// Submission statuses that count as still being worked on.
pub const ACTIVE_STATUSES: [&str; 2] = ["New", "In Progress"];
