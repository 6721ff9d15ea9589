//! Open a new data submission on a study.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::client::HubClient;
use crate::error::{HubError, Result};
use crate::queries;
use crate::types::Submission;

/// Variables of the `createSubmission` mutation.
#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NewSubmission {
    #[serde(rename = "studyID")]
    pub study_id: String,
    #[serde(rename = "dbGaPID")]
    pub dbgap_id: String,
    pub data_commons: String,
    pub name: String,
    pub intention: String,
    pub data_type: String,
}

impl NewSubmission {
    fn validate(&self) -> Result<()> {
        let fields = [
            ("study ID", &self.study_id),
            ("dbGaP ID", &self.dbgap_id),
            ("data commons", &self.data_commons),
            ("name", &self.name),
            ("intention", &self.intention),
            ("data type", &self.data_type),
        ];
        match fields.iter().find(|(_, value)| value.trim().is_empty()) {
            Some((label, _)) => Err(HubError::InvalidInput(format!("{label} must not be empty"))),
            None => Ok(()),
        }
    }
}

#[derive(Deserialize)]
struct CreateSubmissionResponse {
    #[serde(rename = "createSubmission")]
    create_submission: Submission,
}

/// Create a submission and return it as the portal recorded it.
pub async fn create_submission(client: &HubClient, new: &NewSubmission) -> Result<Submission> {
    new.validate()?;

    let variables = serde_json::to_value(new).map_err(HubError::Decode)?;
    let response: CreateSubmissionResponse = client
        .query(&queries::CREATE_SUBMISSION, Some(variables))
        .await?;

    let submission = response.create_submission;
    info!(id = %submission.id, name = %submission.name, "created submission");
    Ok(submission)
}
