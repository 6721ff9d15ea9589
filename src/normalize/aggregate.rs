use std::collections::HashMap;

use regex::Regex;
use serde::Serialize;
use tabled::Tabled;

use super::table::{display_value, Table};
use crate::error::Result;

/// One (title, description) group with its number of occurrences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Tabled)]
pub struct IssueCount {
    #[tabled(rename = "Title")]
    pub title: String,
    #[tabled(rename = "Description")]
    pub description: String,
    #[tabled(rename = "Count")]
    pub count: usize,
}

const FILE_UPDATE_PATTERN: &str =
    r"(?i)\b(updating existing data|will be updated|updated? (existing )?(file|data|node))";

/// Collapses every row whose title matches `pattern` into one summary row.
///
/// The collapse only happens when more than `threshold` rows match; below
/// that the rows are grouped like any other.
#[derive(Debug, Clone)]
pub struct CompactionRule {
    pub name: &'static str,
    pub pattern: Regex,
    pub threshold: usize,
    pub summary_title: String,
}

impl CompactionRule {
    /// File-update warnings are counted, not enumerated.
    pub fn file_updates() -> Result<Self> {
        Ok(Self {
            name: "file-update warnings are counted, not enumerated",
            pattern: Regex::new(FILE_UPDATE_PATTERN)?,
            threshold: 1,
            summary_title: "Updating existing data".to_string(),
        })
    }

    fn matches(&self, title: &str) -> bool {
        self.pattern.is_match(title)
    }

    fn summary(&self, count: usize) -> IssueCount {
        IssueCount {
            title: self.summary_title.clone(),
            description: format!("{count} records will be updated"),
            count,
        }
    }
}

/// Group (title, description) pairs, apply compaction, sort by count descending.
///
/// Ties sort by title then description, so input order never affects output.
pub fn aggregate<'a, I>(issues: I, rules: &[CompactionRule]) -> Vec<IssueCount>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut groups: HashMap<(&str, &str), usize> = HashMap::new();
    let mut compacted: Vec<usize> = vec![0; rules.len()];
    let mut compacted_pairs: Vec<Vec<(&str, &str)>> = vec![Vec::new(); rules.len()];

    for (title, description) in issues {
        match rules.iter().position(|rule| rule.matches(title)) {
            Some(i) => {
                compacted[i] += 1;
                compacted_pairs[i].push((title, description));
            }
            None => *groups.entry((title, description)).or_insert(0) += 1,
        }
    }

    let mut counts: Vec<IssueCount> = Vec::new();
    for (i, rule) in rules.iter().enumerate() {
        if compacted[i] == 0 {
            continue;
        }
        if compacted[i] > rule.threshold {
            counts.push(rule.summary(compacted[i]));
        } else {
            for pair in &compacted_pairs[i] {
                *groups.entry(*pair).or_insert(0) += 1;
            }
        }
    }

    counts.extend(groups.into_iter().map(|((title, description), count)| IssueCount {
        title: title.to_string(),
        description: description.to_string(),
        count,
    }));

    counts.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| a.title.cmp(&b.title))
            .then_with(|| a.description.cmp(&b.description))
    });
    counts
}

/// Aggregate the `title`/`description` columns of a flattened QC table.
pub fn aggregate_table(table: &Table, rules: &[CompactionRule]) -> Vec<IssueCount> {
    let (Some(titles), Some(descriptions)) = (table.column("title"), table.column("description"))
    else {
        return Vec::new();
    };

    let pairs: Vec<(String, String)> = titles
        .into_iter()
        .zip(descriptions)
        .map(|(t, d)| (display_value(t), display_value(d)))
        .collect();

    aggregate(pairs.iter().map(|(t, d)| (t.as_str(), d.as_str())), rules)
}

/// Occurrences per title alone, largest first.
pub fn count_by_title<'a, I>(titles: I) -> Vec<(String, usize)>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for title in titles {
        *counts.entry(title).or_insert(0) += 1;
    }

    let mut counts: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(title, count)| (title.to_string(), count))
        .collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn issue(title: &str, description: &str, count: usize) -> IssueCount {
        IssueCount {
            title: title.to_string(),
            description: description.to_string(),
            count,
        }
    }

    #[test]
    fn test_matching_pairs_collapse_with_count() {
        let rows = [
            ("Missing required property", "age is required"),
            ("Missing required property", "age is required"),
            ("Invalid value", "sex must be one of ..."),
        ];
        let counts = aggregate(rows, &[]);
        assert_eq!(
            counts,
            vec![
                issue("Missing required property", "age is required", 2),
                issue("Invalid value", "sex must be one of ...", 1),
            ]
        );
    }

    #[test]
    fn test_same_title_different_description_stay_separate() {
        let rows = [("Invalid value", "a"), ("Invalid value", "b")];
        assert_eq!(aggregate(rows, &[]).len(), 2);
    }

    #[test]
    fn test_order_independent() {
        let rows = vec![
            ("B", "d1"),
            ("A", "d1"),
            ("B", "d1"),
            ("C", "d2"),
            ("A", "d1"),
            ("A", "d3"),
        ];
        let forward = aggregate(rows.iter().copied(), &[]);
        let backward = aggregate(rows.iter().rev().copied(), &[]);
        let mut rotated = rows.clone();
        rotated.rotate_left(2);
        let rotated = aggregate(rotated.iter().copied(), &[]);

        assert_eq!(forward, backward);
        assert_eq!(forward, rotated);
        assert_eq!(forward[0], issue("A", "d1", 2));
        assert_eq!(forward[1], issue("B", "d1", 2));
    }

    #[test]
    fn test_file_update_warnings_are_counted_not_enumerated() {
        let rule = CompactionRule::file_updates().unwrap();
        let rows = [
            ("Updating existing data", "participant P-1 will be updated"),
            ("Updating existing data", "participant P-2 will be updated"),
            ("Updating existing data", "sample S-9 will be updated"),
            ("Missing required property", "age is required"),
        ];

        let counts = aggregate(rows, &[rule]);
        assert_eq!(counts.len(), 2);
        assert_eq!(counts[0].title, "Updating existing data");
        assert_eq!(counts[0].count, 3);
        assert_eq!(counts[0].description, "3 records will be updated");
    }

    #[test]
    fn test_single_file_update_is_listed_as_is() {
        let rule = CompactionRule::file_updates().unwrap();
        let rows = [("Updating existing data", "participant P-1 will be updated")];

        let counts = aggregate(rows, &[rule]);
        assert_eq!(
            counts,
            vec![issue("Updating existing data", "participant P-1 will be updated", 1)]
        );
    }

    #[test]
    fn test_aggregate_table_uses_title_and_description() {
        let table = Table::from_records(&[
            json!({"submissionID": "S", "title": "T", "description": "D"}),
            json!({"submissionID": "S", "title": "T", "description": "D"}),
        ]);
        assert_eq!(aggregate_table(&table, &[]), vec![issue("T", "D", 2)]);
        assert!(aggregate_table(&Table::default(), &[]).is_empty());
    }

    #[test]
    fn test_count_by_title() {
        let counts = count_by_title(["x", "y", "x"]);
        assert_eq!(counts, vec![("x".to_string(), 2), ("y".to_string(), 1)]);
    }
}
