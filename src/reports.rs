//! Tables built from specific portal queries.

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::normalize::{add_inactive_days, flatten_children, records_at, Table};
use crate::types::Severity;

pub const SUBMISSIONS_PATH: &[&str] = &["data", "listSubmissions", "submissions"];
pub const MY_STUDIES_PATH: &[&str] = &["data", "getMyUser", "studies"];
pub const ORG_STUDIES_PATH: &[&str] = &["data", "listApprovedStudiesOfMyOrganization"];
pub const AGGREGATED_QC_PATH: &[&str] = &["data", "aggregatedSubmissionQCResults", "results"];
pub const QC_RESULTS_PATH: &[&str] = &["data", "submissionQCResults", "results"];
pub const STATS_PATH: &[&str] = &["data", "submissionStats", "stats"];

/// Parent fields repeated on every flattened QC issue row.
pub const QC_CARRY_FIELDS: &[&str] = &["submissionID", "displayID", "type", "severity"];

/// Submissions with an `inactiveDays` column.
pub fn submission_table(response: &Value, now: DateTime<Utc>) -> Table {
    let mut table = Table::at_path(response, SUBMISSIONS_PATH);
    if !table.columns.is_empty() {
        add_inactive_days(&mut table, now);
    }
    table
}

/// Studies from either study query shape.
pub fn study_table(response: &Value) -> Table {
    match records_at(response, MY_STUDIES_PATH) {
        Some(records) => Table::from_records(records),
        None => Table::at_path(response, ORG_STUDIES_PATH),
    }
}

/// One row per QC error/warning, optionally limited to a single title.
///
/// A result can carry every issue found on its node, so title filtering
/// happens per issue rather than per result.
pub fn qc_issue_table(response: &Value, severity: Severity, title: Option<&str>) -> Table {
    let Some(results) = records_at(response, QC_RESULTS_PATH) else {
        return Table::default();
    };

    let mut records = Vec::new();
    for key in severity.child_keys() {
        records.extend(flatten_children(results, key, QC_CARRY_FIELDS).to_records());
    }

    let table = Table::from_records(&records);
    match title {
        Some(title) => table.filter_eq("title", title),
        None => table,
    }
}

/// The aggregated summary; a null `total` means nothing has been validated.
pub fn aggregated_qc_table(response: &Value) -> Table {
    let total_is_null = response
        .pointer("/data/aggregatedSubmissionQCResults/total")
        .map_or(true, Value::is_null);
    if total_is_null {
        return Table::default();
    }
    Table::at_path(response, AGGREGATED_QC_PATH)
}

/// Per-node validation counts. A node with a null count keeps its row.
pub fn stats_table(response: &Value) -> Table {
    Table::at_path(response, STATS_PATH)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::{elapsed_days, INACTIVE_DAYS_COLUMN};
    use serde_json::json;

    #[test]
    fn test_single_submission_gets_inactive_days() {
        let response = json!({"data":{"listSubmissions":{"submissions":[
            {"_id":"A","updatedAt":"2024-01-01T00:00:00Z"}
        ]}}});
        let now = Utc::now();

        let table = submission_table(&response, now);
        assert_eq!(table.len(), 1);
        let expected = elapsed_days("2024-01-01T00:00:00Z", now).unwrap();
        assert_eq!(table.cell(0, INACTIVE_DAYS_COLUMN), Some(&json!(expected)));
    }

    #[test]
    fn test_errors_without_submissions_is_empty() {
        let response = json!({"errors":[{"message":"Token expired"}]});
        let table = submission_table(&response, Utc::now());
        assert!(table.is_empty());
        assert!(table.columns.is_empty());
    }

    #[test]
    fn test_study_table_accepts_both_shapes() {
        let mine = json!({"data":{"getMyUser":{"studies":[{"_id":"1","studyAbbreviation":"A"}]}}});
        let org = json!({"data":{"listApprovedStudiesOfMyOrganization":[
            {"_id":"1","studyAbbreviation":"A"},{"_id":"2","studyAbbreviation":"B"}
        ]}});
        assert_eq!(study_table(&mine).len(), 1);
        assert_eq!(study_table(&org).len(), 2);
    }

    fn qc_response() -> Value {
        json!({"data":{"submissionQCResults":{"total":2,"results":[
            {"submissionID":"S","displayID":"P-1","type":"participant","severity":"Error",
             "errors":[
                {"title":"Missing required property","description":"age"},
                {"title":"Invalid value","description":"sex"}
             ],
             "warnings":[{"title":"Updating existing data","description":"P-1 will be updated"}]},
            {"submissionID":"S","displayID":"P-2","type":"participant","severity":"Error",
             "errors":[{"title":"Missing required property","description":"age"}],
             "warnings":[]}
        ]}}})
    }

    #[test]
    fn test_qc_issue_rows_follow_children() {
        let response = qc_response();
        assert_eq!(qc_issue_table(&response, Severity::Error, None).len(), 3);
        assert_eq!(qc_issue_table(&response, Severity::Warning, None).len(), 1);
        assert_eq!(qc_issue_table(&response, Severity::All, None).len(), 4);

        let table = qc_issue_table(&response, Severity::All, None);
        assert_eq!(&table.columns[..4], QC_CARRY_FIELDS);
    }

    #[test]
    fn test_qc_issue_title_filter() {
        let title = Some("Missing required property");
        let table = qc_issue_table(&qc_response(), Severity::Error, title);
        assert_eq!(table.len(), 2);
        assert_eq!(table.unique("displayID"), vec!["P-1", "P-2"]);
    }

    #[test]
    fn test_stats_keep_nodes_with_null_counts() {
        let response = json!({"data":{"submissionStats":{"stats":[
            {"nodeName":"participant","total":3,"new":1,"error":0,"warning":2,"passed":0},
            {"nodeName":"sample","total":2,"new":null,"error":1,"warning":0,"passed":1}
        ]}}});

        let table = stats_table(&response);
        assert_eq!(table.len(), 2);
        assert_eq!(table.unique("nodeName"), vec!["participant", "sample"]);
        assert_eq!(table.cell(1, "new"), Some(&Value::Null));
        assert_eq!(table.cell(1, "error"), Some(&json!(1)));
    }

    #[test]
    fn test_stats_with_errors_is_empty() {
        let response = json!({"errors":[{"message":"Not found"}],"data":{"submissionStats":null}});
        assert!(stats_table(&response).is_empty());
    }

    #[test]
    fn test_aggregated_null_total_is_empty() {
        let response = json!({"data":{"aggregatedSubmissionQCResults":{"total":null,"results":[]}}});
        assert!(aggregated_qc_table(&response).is_empty());

        let response = json!({"data":{"aggregatedSubmissionQCResults":{"total":1,"results":[
            {"code":"M018","severity":"Error","title":"Missing","count":4}
        ]}}});
        assert_eq!(aggregated_qc_table(&response).cell(0, "count"), Some(&json!(4)));
    }
}
