use serde_json::json;

use datahub_cli::client::HubClient;
use datahub_cli::error::Result;
use datahub_cli::queries;
use datahub_cli::reports::stats_table;

use crate::output;

pub async fn show(client: &HubClient, submission: &str) -> Result<()> {
    let response = client
        .execute(&queries::SUBMISSION_STATS, Some(json!({ "id": submission })))
        .await?;

    let table = stats_table(&response);
    if table.is_empty() {
        output::print_message(&format!("No statistics for {submission}"));
        return Ok(());
    }

    output::print_table(&table);
    Ok(())
}
