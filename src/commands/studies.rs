use datahub_cli::client::HubClient;
use datahub_cli::error::Result;
use datahub_cli::queries;
use datahub_cli::reports::study_table;

use crate::output;

pub async fn list(client: &HubClient, org: bool) -> Result<()> {
    let query = if org {
        &queries::ORG_STUDIES
    } else {
        &queries::MY_STUDIES
    };
    let response = client.execute(query, None).await?;

    let table = study_table(&response);
    if table.is_empty() {
        output::print_message("No studies found");
        return Ok(());
    }

    output::print_table(&table.select(&["_id", "studyAbbreviation", "studyName", "dbGaPID"]));
    Ok(())
}
