use chrono::Utc;
use serde_json::json;

use datahub_cli::client::HubClient;
use datahub_cli::error::Result;
use datahub_cli::normalize::INACTIVE_DAYS_COLUMN;
use datahub_cli::queries;
use datahub_cli::reports::submission_table;

use crate::cli::SubmissionListArgs;
use crate::output;

pub async fn list(client: &HubClient, args: SubmissionListArgs) -> Result<()> {
    let statuses = if args.status.is_empty() {
        vec!["All".to_string()]
    } else {
        args.status
    };

    let variables = json!({ "status": statuses, "first": -1 });
    let response = client
        .execute(&queries::LIST_SUBMISSIONS, Some(variables))
        .await?;

    let mut table = submission_table(&response, Utc::now());
    if let Some(study) = &args.study {
        table = table.filter_eq("studyAbbreviation", study);
    }

    if table.is_empty() {
        output::print_message("No submissions found");
        return Ok(());
    }

    output::print_table(&table.select(&[
        "_id",
        "name",
        "studyAbbreviation",
        "dataCommons",
        "status",
        "submitterName",
        "conciergeName",
        "updatedAt",
        INACTIVE_DAYS_COLUMN,
    ]));
    Ok(())
}
