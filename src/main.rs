mod cli;
mod commands;
mod output;

use std::error::Error;
use std::io;
use std::sync::Arc;

use clap::{CommandFactory, Parser};
use clap_complete::generate;
use tracing_subscriber::{fmt, EnvFilter};

use cli::{Cli, Commands, QcCommands};
use datahub_cli::client::{HttpTransport, HubClient};
use datahub_cli::config::Config;
use datahub_cli::error::Result;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let verbose = cli.verbose > 0;

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e}");

        // Show error chain if verbose flag was passed
        if verbose {
            let mut source = e.source();
            while let Some(cause) = source {
                eprintln!("Caused by: {cause}");
                source = cause.source();
            }
        }

        std::process::exit(1);
    }
}

/// RUST_LOG wins; otherwise each -v raises the level from warn.
fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("datahub_cli={level},dhub={level}")));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    output::set_format(cli.format);
    output::set_quiet(cli.quiet);

    match cli.command {
        // Commands that don't require a tier
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "dhub", &mut io::stdout());
        }
        Commands::Init => {
            commands::init::run().await?;
        }
        Commands::Diff { config } => {
            commands::diff::run(&Config::load()?, &config).await?;
        }
        // Commands that require config and client
        command => {
            let config = Config::load()?;
            let tier = config.resolve_tier(cli.tier.as_deref())?;
            let endpoint = config.endpoint_from_env(tier)?;
            tracing::debug!(?endpoint, "resolved tier");

            let transport = Arc::new(HttpTransport::new(config.timeout())?);
            let client = HubClient::new(endpoint, transport);

            match command {
                Commands::Studies { org } => {
                    commands::studies::list(&client, org).await?;
                }
                Commands::Submissions(args) => {
                    commands::submissions::list(&client, args).await?;
                }
                Commands::Qc { action } => match action {
                    QcCommands::Summary(args) => {
                        commands::qc::summary(&client, args).await?;
                    }
                    QcCommands::Detail(args) => {
                        commands::qc::detail(&client, args).await?;
                    }
                    QcCommands::Aggregate(args) => {
                        commands::qc::aggregate(&client, args).await?;
                    }
                },
                Commands::Stats { submission } => {
                    commands::stats::show(&client, &submission).await?;
                }
                Commands::Reset => {
                    commands::reset::run(&client).await?;
                }
                Commands::Create(args) => {
                    commands::create::run(&client, args).await?;
                }
                Commands::Upload(args) => {
                    commands::upload::run(&client, args).await?;
                }
                Commands::Completions { .. } | Commands::Init | Commands::Diff { .. } => {
                    // Already handled above
                }
            }
        }
    }

    Ok(())
}
