use datahub_cli::client::HubClient;
use datahub_cli::create::{create_submission, NewSubmission};
use datahub_cli::error::Result;

use crate::cli::CreateArgs;
use crate::output;

impl From<CreateArgs> for NewSubmission {
    fn from(args: CreateArgs) -> Self {
        Self {
            study_id: args.study_id,
            dbgap_id: args.dbgap_id,
            data_commons: args.data_commons,
            name: args.name,
            intention: args.intention,
            data_type: args.data_type,
        }
    }
}

pub async fn run(client: &HubClient, args: CreateArgs) -> Result<()> {
    let submission = create_submission(client, &args.into()).await?;

    output::print_message(&format!(
        "Created submission {} ({}) on {}",
        submission.name,
        submission.id,
        client.tier()
    ));
    Ok(())
}
