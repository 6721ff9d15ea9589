use datahub_cli::client::HubClient;
use datahub_cli::error::Result;
use datahub_cli::upload::upload_metadata;

use crate::cli::UploadArgs;
use crate::output;

pub async fn run(client: &HubClient, args: UploadArgs) -> Result<()> {
    let outcome = upload_metadata(client, &args.submission, &args.files).await?;

    for result in &outcome.results {
        let state = if result.skipped {
            "skipped"
        } else if result.succeeded {
            "uploaded"
        } else {
            "failed"
        };
        output::print_message(&format!("{}: {state}", result.file_name));
    }

    let succeeded = outcome.results.iter().filter(|r| r.succeeded).count();
    output::print_message(&format!(
        "Batch {}: {succeeded}/{} files uploaded",
        outcome.batch_id,
        outcome.results.len()
    ));
    Ok(())
}
