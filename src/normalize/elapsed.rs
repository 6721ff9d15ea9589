use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;

use super::Table;
use crate::error::{HubError, Result};

pub const INACTIVE_DAYS_COLUMN: &str = "inactiveDays";
pub const INACTIVE_DAYS_INDEX: usize = 8;

const SECONDS_PER_DAY: i64 = 86_400;

/// Parse an ISO-8601 timestamp. Values without zone information are UTC.
pub fn parse_timestamp(text: &str) -> Result<DateTime<Utc>> {
    let text = text.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Ok(dt.with_timezone(&Utc));
    }

    // Offsets written without a colon, e.g. +0000
    if let Ok(dt) = DateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f%z") {
        return Ok(dt.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Ok(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| HubError::InvalidTimestamp(text.to_string()))
}

/// Whole days from `timestamp` to `now`, rounded down.
pub fn elapsed_days(timestamp: &str, now: DateTime<Utc>) -> Result<i64> {
    let then = parse_timestamp(timestamp)?;
    Ok((now - then).num_seconds().div_euclid(SECONDS_PER_DAY))
}

/// Insert an elapsed-day column computed from `source`.
///
/// Rows whose timestamp is null or unparseable get a null cell.
pub fn add_elapsed_column(
    table: &mut Table,
    source: &str,
    name: &str,
    index: usize,
    now: DateTime<Utc>,
) {
    let values: Vec<Value> = match table.column(source) {
        Some(cells) => cells
            .into_iter()
            .map(|cell| {
                cell.as_str()
                    .and_then(|ts| elapsed_days(ts, now).ok())
                    .map(Value::from)
                    .unwrap_or(Value::Null)
            })
            .collect(),
        None => vec![Value::Null; table.len()],
    };

    table.insert_column(index, name, values);
}

/// `inactiveDays` from `updatedAt`, at the position dashboards expect.
pub fn add_inactive_days(table: &mut Table, now: DateTime<Utc>) {
    add_elapsed_column(table, "updatedAt", INACTIVE_DAYS_COLUMN, INACTIVE_DAYS_INDEX, now);
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use serde_json::json;

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    #[test]
    fn test_whole_days_round_down() {
        let now = at(2024, 1, 3, 23);
        assert_eq!(elapsed_days("2024-01-01T00:00:00Z", now).unwrap(), 2);
        assert_eq!(elapsed_days("2024-01-03T23:00:00Z", now).unwrap(), 0);
    }

    #[test]
    fn test_future_timestamp_is_negative() {
        let now = at(2024, 1, 1, 0);
        assert_eq!(elapsed_days("2024-01-01T12:00:00Z", now).unwrap(), -1);
    }

    #[test]
    fn test_offsets_are_converted_to_utc() {
        let now = at(2024, 1, 2, 1);
        // 2024-01-01T20:00-05:00 is 2024-01-02T01:00Z
        assert_eq!(elapsed_days("2024-01-01T20:00:00-05:00", now).unwrap(), 0);
    }

    #[test]
    fn test_offsets_without_colon() {
        let now = at(2024, 1, 3, 0);
        assert_eq!(elapsed_days("2024-01-01T00:00:00.000+0000", now).unwrap(), 2);
        // 2024-01-01T20:00-0500 is 2024-01-02T01:00Z
        assert_eq!(elapsed_days("2024-01-01T20:00:00-0500", now).unwrap(), 0);
    }

    #[test]
    fn test_naive_timestamps_are_utc() {
        let now = at(2024, 1, 11, 0);
        assert_eq!(elapsed_days("2024-01-01T00:00:00.250", now).unwrap(), 9);
        assert_eq!(elapsed_days("2024-01-01 00:00:00", now).unwrap(), 10);
        assert_eq!(elapsed_days("2024-01-01", now).unwrap(), 10);
    }

    #[test]
    fn test_garbage_is_invalid_timestamp() {
        assert!(matches!(
            elapsed_days("last tuesday", Utc::now()),
            Err(HubError::InvalidTimestamp(_))
        ));
    }

    #[test]
    fn test_repeatable_and_monotonic() {
        let ts = "2023-06-15T08:30:00Z";
        let mut now = at(2023, 6, 15, 0);
        let mut previous = elapsed_days(ts, now).unwrap();
        assert_eq!(previous, elapsed_days(ts, now).unwrap());

        for _ in 0..200 {
            now += Duration::hours(7);
            let current = elapsed_days(ts, now).unwrap();
            assert!(current >= previous);
            previous = current;
        }
    }

    #[test]
    fn test_inactive_days_column_position() {
        let record = json!({
            "_id": "A", "name": "n", "submitterName": "s", "dataCommons": "CDS",
            "studyAbbreviation": "X", "dbGaPID": "phs1", "modelVersion": "1",
            "status": "New", "conciergeName": "c", "createdAt": "2023-12-01T00:00:00Z",
            "updatedAt": "2024-01-01T00:00:00Z"
        });
        let mut table = Table::from_records(&[record]);
        add_inactive_days(&mut table, at(2024, 1, 31, 12));

        assert_eq!(table.columns[INACTIVE_DAYS_INDEX], INACTIVE_DAYS_COLUMN);
        assert_eq!(table.cell(0, INACTIVE_DAYS_COLUMN), Some(&json!(30)));
    }

    #[test]
    fn test_missing_or_bad_timestamps_become_null() {
        let mut table = Table::from_records(&[
            json!({"_id": "A", "updatedAt": null}),
            json!({"_id": "B", "updatedAt": "soon"}),
        ]);
        add_inactive_days(&mut table, Utc::now());
        assert_eq!(table.cell(0, INACTIVE_DAYS_COLUMN), Some(&Value::Null));
        assert_eq!(table.cell(1, INACTIVE_DAYS_COLUMN), Some(&Value::Null));
    }
}
