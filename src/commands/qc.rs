use serde::Serialize;
use serde_json::{json, Value};
use tabled::Tabled;

use datahub_cli::client::HubClient;
use datahub_cli::error::Result;
use datahub_cli::normalize::{
    aggregate_table, count_by_title, display_value, CompactionRule, IssueCount, Table,
};
use datahub_cli::queries;
use datahub_cli::reports::{aggregated_qc_table, qc_issue_table};
use datahub_cli::types::Severity;

use crate::cli::{QcAggregateArgs, QcArgs, QcDetailArgs};
use crate::output;

#[derive(Clone, Serialize, Tabled)]
struct TitleCount {
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Count")]
    count: usize,
}

fn title_counts(issues: &Table) -> Vec<TitleCount> {
    let titles: Vec<String> = issues
        .column("title")
        .unwrap_or_default()
        .into_iter()
        .map(display_value)
        .collect();

    count_by_title(titles.iter().map(String::as_str))
        .into_iter()
        .map(|(title, count)| TitleCount { title, count })
        .collect()
}

fn summary_variables(submission: &str, severity: Severity) -> Value {
    json!({
        "submissionID": submission,
        "severity": severity.as_str(),
        "first": -1,
        "offset": 0,
        "sortDirection": "desc",
        "orderBy": "displayID",
    })
}

fn detail_variables(submission: &str, severity: Severity, issue_code: Option<&str>) -> Value {
    let mut variables = json!({
        "id": submission,
        "severities": severity.as_str(),
        "first": -1,
        "offset": 0,
        "orderBy": "displayID",
        "sortDirection": "desc",
    });
    if let Some(code) = issue_code {
        variables["issueCode"] = json!(code);
    }
    variables
}

pub async fn summary(client: &HubClient, args: QcArgs) -> Result<()> {
    let response = client
        .execute(
            &queries::AGGREGATED_QC_RESULTS,
            Some(summary_variables(&args.submission, args.severity)),
        )
        .await?;

    let table = aggregated_qc_table(&response);
    if table.is_empty() {
        output::print_message(&format!("No validation results for {}", args.submission));
        return Ok(());
    }

    output::print_table(&table.select(&["title", "severity", "code", "count"]));
    Ok(())
}

pub async fn detail(client: &HubClient, args: QcDetailArgs) -> Result<()> {
    let response = client
        .execute(
            &queries::AGGREGATED_QC_RESULTS,
            Some(summary_variables(&args.submission, Severity::All)),
        )
        .await?;

    let summary = aggregated_qc_table(&response).filter_eq("title", &args.title);
    let Some(code) = summary.cell(0, "code").map(display_value) else {
        output::print_message(&format!(
            "No \"{}\" results for {}",
            args.title, args.submission
        ));
        return Ok(());
    };

    let response = client
        .execute(
            &queries::SUBMISSION_QC_RESULTS,
            Some(detail_variables(&args.submission, args.severity, Some(&code))),
        )
        .await?;

    let table = qc_issue_table(&response, args.severity, Some(&args.title));
    if table.is_empty() {
        output::print_message(&format!("No \"{}\" results for {}", args.title, args.submission));
        return Ok(());
    }

    output::print_table(&table);
    Ok(())
}

pub async fn aggregate(client: &HubClient, args: QcAggregateArgs) -> Result<()> {
    let response = client
        .execute(
            &queries::SUBMISSION_QC_RESULTS,
            Some(detail_variables(&args.submission, args.severity, None)),
        )
        .await?;

    let issues = qc_issue_table(&response, args.severity, None);
    if issues.is_empty() {
        output::print_message(&format!("No validation results for {}", args.submission));
        return Ok(());
    }

    if args.by_title {
        output::print_rows(&title_counts(&issues), TitleCount::clone);
        return Ok(());
    }

    let counts = aggregate_table(&issues, &[CompactionRule::file_updates()?]);
    output::print_rows(&counts, IssueCount::clone);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detail_variables_only_carry_code_when_given() {
        let without = detail_variables("S1", Severity::Warning, None);
        assert!(without.get("issueCode").is_none());
        assert_eq!(without["severities"], json!("Warning"));

        let with = detail_variables("S1", Severity::All, Some("M018"));
        assert_eq!(with["issueCode"], json!("M018"));
    }

    #[test]
    fn test_title_counts_ignore_descriptions() {
        let issues = Table::from_records(&[
            json!({"title": "Invalid value", "description": "sex"}),
            json!({"title": "Missing required property", "description": "age"}),
            json!({"title": "Invalid value", "description": "race"}),
        ]);

        let counts = title_counts(&issues);
        assert_eq!(counts.len(), 2);
        assert_eq!(counts[0].title, "Invalid value");
        assert_eq!(counts[0].count, 2);
        assert_eq!(counts[1].count, 1);
    }

    #[test]
    fn test_title_counts_without_title_column() {
        assert!(title_counts(&Table::default()).is_empty());
    }
}
