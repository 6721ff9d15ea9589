use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};
use clap_complete::Shell;

use datahub_cli::types::Severity;

use crate::output::OutputFormat;

#[derive(Parser)]
#[command(name = "dhub")]
#[command(about = "Query the data submission portal and report on submissions", version)]
#[command(after_help = "EXAMPLES:
    dhub -t stage submissions                 List submissions with inactivity
    dhub -t stage qc summary <SUBMISSION_ID>  Error/warning counts per title
    dhub -t prod reset                        Reset timers on open submissions
    dhub diff -c diff.yml                     Diff nodes against released data")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Portal tier (dev2, stage, prod)
    #[arg(long, short, global = true, env = "DHUB_TIER")]
    pub tier: Option<String>,

    /// Output format (table, json, tsv)
    #[arg(long, short = 'o', global = true, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Suppress success messages
    #[arg(long, short, global = true)]
    pub quiet: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(long, short, global = true, action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List studies available to your account
    #[command(after_help = "EXAMPLES:
    dhub -t stage studies
    dhub -t stage studies --org")]
    Studies {
        /// List approved studies of your organization instead
        #[arg(long)]
        org: bool,
    },
    /// List submissions with days since last update
    #[command(
        alias = "subs",
        after_help = "EXAMPLES:
    dhub -t stage submissions
    dhub -t stage submissions --study CCDI --status New --status \"In Progress\""
    )]
    Submissions(SubmissionListArgs),
    /// Inspect validation (QC) results of a submission
    Qc {
        #[command(subcommand)]
        action: QcCommands,
    },
    /// Per-node validation statistics for a submission
    #[command(after_help = "EXAMPLES:
    dhub -t stage stats <SUBMISSION_ID>")]
    Stats {
        /// Submission ID
        submission: String,
    },
    /// Reset the inactivity timer on all New and In Progress submissions
    Reset,
    /// Create a new submission on an approved study
    #[command(after_help = "EXAMPLES:
    dhub -t dev2 create --study-id <STUDY_ID> --dbgap-id phs000001 --data-commons CDS --name \"Batch one\"")]
    Create(CreateArgs),
    /// Upload metadata files as a new batch
    #[command(after_help = "EXAMPLES:
    dhub -t dev2 upload <SUBMISSION_ID> participant.tsv sample.tsv")]
    Upload(UploadArgs),
    /// Diff submission nodes against released data, driven by a YAML file
    #[command(after_help = "EXAMPLES:
    dhub diff -c diff.yml")]
    Diff {
        /// YAML file listing tier, subid, nodelist, severity, outputdirectory
        #[arg(long, short)]
        config: PathBuf,
    },
    /// Generate shell completions
    #[command(after_help = "EXAMPLES:
    dhub completions bash > ~/.bash_completion.d/dhub
    dhub completions zsh > ~/.zfunc/_dhub")]
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
    /// Initialize configuration file interactively
    Init,
}

#[derive(Subcommand)]
pub enum QcCommands {
    /// Counts per error/warning title
    #[command(after_help = "EXAMPLES:
    dhub -t stage qc summary <SUBMISSION_ID> --severity error")]
    Summary(QcArgs),
    /// Every occurrence of one error/warning title
    #[command(after_help = "EXAMPLES:
    dhub -t stage qc detail <SUBMISSION_ID> --title \"Missing required property\"")]
    Detail(QcDetailArgs),
    /// Group issues by title and description with counts
    #[command(after_help = "EXAMPLES:
    dhub -t stage qc aggregate <SUBMISSION_ID> --severity warning
    dhub -t stage qc aggregate <SUBMISSION_ID> --by-title")]
    Aggregate(QcAggregateArgs),
}

#[derive(Args, Clone)]
pub struct SubmissionListArgs {
    /// Filter by study abbreviation
    #[arg(long)]
    pub study: Option<String>,

    /// Statuses to include (repeatable, default: All)
    #[arg(long)]
    pub status: Vec<String>,
}

#[derive(Args, Clone)]
pub struct QcArgs {
    /// Submission ID
    pub submission: String,

    /// Severity to include
    #[arg(long, value_enum, default_value = "all")]
    pub severity: Severity,
}

#[derive(Args, Clone)]
pub struct QcAggregateArgs {
    /// Submission ID
    pub submission: String,

    /// Severity to include
    #[arg(long, value_enum, default_value = "all")]
    pub severity: Severity,

    /// Count per title only, ignoring descriptions
    #[arg(long)]
    pub by_title: bool,
}

#[derive(Args, Clone)]
pub struct QcDetailArgs {
    /// Submission ID
    pub submission: String,

    /// Title of the error or warning to list
    #[arg(long)]
    pub title: String,

    /// Severity to include
    #[arg(long, value_enum, default_value = "all")]
    pub severity: Severity,
}

#[derive(Args)]
pub struct CreateArgs {
    /// Study ID (see `dhub studies`)
    #[arg(long)]
    pub study_id: String,

    /// dbGaP accession of the study
    #[arg(long)]
    pub dbgap_id: String,

    /// Data commons receiving the submission
    #[arg(long)]
    pub data_commons: String,

    /// Submission name
    #[arg(long)]
    pub name: String,

    /// Submission intention
    #[arg(long, default_value = "New/Update")]
    pub intention: String,

    /// Submission data type
    #[arg(long, default_value = "Metadata Only")]
    pub data_type: String,
}

#[derive(Args)]
pub struct UploadArgs {
    /// Submission ID
    pub submission: String,

    /// Metadata files (TSV)
    #[arg(required = true)]
    pub files: Vec<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_qc_detail() {
        let cli = Cli::parse_from([
            "dhub",
            "-t",
            "stage",
            "qc",
            "detail",
            "S1",
            "--title",
            "Missing",
            "--severity",
            "error",
        ]);
        assert_eq!(cli.tier.as_deref(), Some("stage"));
        match cli.command {
            Commands::Qc {
                action: QcCommands::Detail(args),
            } => {
                assert_eq!(args.submission, "S1");
                assert_eq!(args.severity, Severity::Error);
            }
            _ => panic!("wrong subcommand"),
        }
    }

    #[test]
    fn test_parse_qc_aggregate_by_title() {
        let cli = Cli::parse_from(["dhub", "qc", "aggregate", "S1", "--by-title"]);
        match cli.command {
            Commands::Qc {
                action: QcCommands::Aggregate(args),
            } => {
                assert!(args.by_title);
                assert_eq!(args.severity, Severity::All);
            }
            _ => panic!("wrong subcommand"),
        }
    }

    #[test]
    fn test_parse_create_defaults() {
        let cli = Cli::parse_from([
            "dhub",
            "create",
            "--study-id",
            "study-1",
            "--dbgap-id",
            "phs000001",
            "--data-commons",
            "CDS",
            "--name",
            "Batch one",
        ]);
        match cli.command {
            Commands::Create(args) => {
                assert_eq!(args.dbgap_id, "phs000001");
                assert_eq!(args.intention, "New/Update");
                assert_eq!(args.data_type, "Metadata Only");
            }
            _ => panic!("wrong subcommand"),
        }
    }

    #[test]
    fn test_verbosity_counts() {
        let cli = Cli::parse_from(["dhub", "-vv", "reset"]);
        assert_eq!(cli.verbose, 2);
    }
}
