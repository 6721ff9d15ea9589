use std::path::Path;
use std::sync::Arc;

use datahub_cli::client::{HttpTransport, HubClient};
use datahub_cli::config::Config;
use datahub_cli::diff::{self, DiffConfig};
use datahub_cli::error::Result;

use crate::output;

/// The YAML file names its own tier, so this builds its own client.
pub async fn run(config: &Config, path: &Path) -> Result<()> {
    let job = DiffConfig::load(path)?;
    let transport = Arc::new(HttpTransport::new(config.timeout())?);
    let client = HubClient::connect(config, &job.tier, transport)?;

    let written = diff::run(&client, &job).await?;

    if written.is_empty() {
        output::print_message("No differences found");
    }
    for path in written {
        output::print_message(&format!("Wrote {}", path.display()));
    }
    Ok(())
}
