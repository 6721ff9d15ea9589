//! Reset the inactivity timer on every open submission.

use std::collections::BTreeSet;

use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info};

use crate::client::HubClient;
use crate::error::Result;
use crate::queries;
use crate::types::{Submission, ACTIVE_STATUSES};

#[derive(Deserialize)]
struct ListSubmissionsResponse {
    #[serde(rename = "listSubmissions")]
    list_submissions: SubmissionList,
}

#[derive(Deserialize)]
struct SubmissionList {
    #[serde(default)]
    submissions: Vec<Submission>,
}

#[derive(Deserialize)]
struct GetSubmissionResponse {
    #[serde(rename = "getSubmission")]
    get_submission: Option<Submission>,
}

/// Open (`New` / `In Progress`) submissions visible to the caller.
pub async fn active_submissions(client: &HubClient) -> Result<Vec<Submission>> {
    let variables = json!({ "status": ACTIVE_STATUSES, "first": -1 });
    let response: ListSubmissionsResponse = client
        .query(&queries::LIST_SUBMISSIONS, Some(variables))
        .await?;
    Ok(response.list_submissions.submissions)
}

/// Fetch each open submission once; reading a submission resets its timer.
pub async fn reset_timers(client: &HubClient) -> Result<Vec<Submission>> {
    let submissions = active_submissions(client).await?;
    let ids: BTreeSet<&str> = submissions.iter().map(|s| s.id.as_str()).collect();
    info!(count = ids.len(), "resetting submission timers");

    let mut touched = Vec::with_capacity(ids.len());
    for id in ids {
        let response: GetSubmissionResponse = client
            .query(&queries::GET_SUBMISSION, Some(json!({ "id": id })))
            .await?;
        if let Some(submission) = response.get_submission {
            debug!(id, name = %submission.name, "reset");
            touched.push(submission);
        }
    }

    Ok(touched)
}
