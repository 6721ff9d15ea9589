use tabled::Tabled;

use datahub_cli::client::HubClient;
use datahub_cli::error::Result;
use datahub_cli::reset::reset_timers;
use datahub_cli::types::Submission;

use crate::output;

#[derive(Tabled)]
struct ResetRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Data Commons")]
    data_commons: String,
}

impl From<&Submission> for ResetRow {
    fn from(submission: &Submission) -> Self {
        Self {
            id: submission.id.clone(),
            name: submission.name.clone(),
            data_commons: submission.data_commons.clone().unwrap_or_default(),
        }
    }
}

pub async fn run(client: &HubClient) -> Result<()> {
    let touched = reset_timers(client).await?;

    if touched.is_empty() {
        output::print_message("No open submissions to reset");
        return Ok(());
    }

    output::print_rows(&touched, |s| ResetRow::from(s));
    output::print_message(&format!("Reset {} submission(s) on {}", touched.len(), client.tier()));
    Ok(())
}
