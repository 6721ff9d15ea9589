//! Turns nested GraphQL responses into flat tables.
//!
//! Everything here is a pure transform. A response that reports GraphQL
//! errors or lacks the expected path becomes an empty table, never a failure.

mod aggregate;
mod elapsed;
mod table;

pub use aggregate::{aggregate, aggregate_table, count_by_title, CompactionRule, IssueCount};
pub use elapsed::{
    add_elapsed_column, add_inactive_days, elapsed_days, parse_timestamp, INACTIVE_DAYS_COLUMN,
    INACTIVE_DAYS_INDEX,
};
pub use table::{display_value, flatten_children, has_errors, records_at, Table};
