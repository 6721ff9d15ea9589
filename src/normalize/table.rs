use std::collections::BTreeSet;

use serde::Serialize;
use serde_json::{Map, Value};

/// A rectangular view over JSON records.
///
/// Every row has exactly `columns.len()` cells; absent fields are `null`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

/// Walk `path` from the response root.
///
/// Returns `None` when the response reports GraphQL errors, when a key on
/// the path is missing or null, or when the target is not an array.
pub fn records_at<'a>(response: &'a Value, path: &[&str]) -> Option<&'a Vec<Value>> {
    if has_errors(response) {
        return None;
    }

    let mut current = response;
    for key in path {
        current = current.get(*key).filter(|v| !v.is_null())?;
    }
    current.as_array()
}

/// True when the response carries a non-empty GraphQL `errors` array.
pub fn has_errors(response: &Value) -> bool {
    response
        .get("errors")
        .and_then(Value::as_array)
        .is_some_and(|errors| !errors.is_empty())
}

impl Table {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Build from the records under `path`, or an empty table if there are none.
    pub fn at_path(response: &Value, path: &[&str]) -> Self {
        records_at(response, path)
            .map(|records| Self::from_records(records))
            .unwrap_or_default()
    }

    /// Columns are the union of keys across records, in first-seen order.
    pub fn from_records(records: &[Value]) -> Self {
        let objects: Vec<&Map<String, Value>> =
            records.iter().filter_map(Value::as_object).collect();

        let mut columns: Vec<String> = Vec::new();
        for object in &objects {
            for key in object.keys() {
                if !columns.iter().any(|c| c == key) {
                    columns.push(key.clone());
                }
            }
        }

        let rows = objects
            .iter()
            .map(|object| {
                columns
                    .iter()
                    .map(|c| object.get(c).cloned().unwrap_or(Value::Null))
                    .collect()
            })
            .collect();

        Self { columns, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn column(&self, name: &str) -> Option<Vec<&Value>> {
        let index = self.column_index(name)?;
        Some(self.rows.iter().map(|row| &row[index]).collect())
    }

    pub fn cell(&self, row: usize, name: &str) -> Option<&Value> {
        let index = self.column_index(name)?;
        self.rows.get(row).map(|r| &r[index])
    }

    /// Insert a column, clamping `index` to the end of the table.
    ///
    /// `values` shorter than the table are padded with `null`.
    pub fn insert_column(&mut self, index: usize, name: impl Into<String>, values: Vec<Value>) {
        let index = index.min(self.columns.len());
        self.columns.insert(index, name.into());

        let mut values = values.into_iter();
        for row in &mut self.rows {
            row.insert(index, values.next().unwrap_or(Value::Null));
        }
    }

    /// Keep rows for which `keep` returns true.
    pub fn filter<F>(&self, mut keep: F) -> Self
    where
        F: FnMut(&Table, &[Value]) -> bool,
    {
        let rows = self
            .rows
            .iter()
            .filter(|row| keep(self, row))
            .cloned()
            .collect();
        Self {
            columns: self.columns.clone(),
            rows,
        }
    }

    /// Rows where `column` equals the given string.
    pub fn filter_eq(&self, column: &str, value: &str) -> Self {
        let Some(index) = self.column_index(column) else {
            return Self::new(self.columns.clone());
        };
        self.filter(|_, row| row[index].as_str() == Some(value))
    }

    /// Distinct string values of a column, sorted.
    pub fn unique(&self, column: &str) -> Vec<String> {
        let values: BTreeSet<String> = self
            .column(column)
            .unwrap_or_default()
            .into_iter()
            .filter_map(|v| v.as_str().map(String::from))
            .collect();
        values.into_iter().collect()
    }

    /// Project onto the named columns, skipping names the table lacks.
    pub fn select(&self, names: &[&str]) -> Self {
        let indices: Vec<usize> = names
            .iter()
            .filter_map(|name| self.column_index(name))
            .collect();

        Self {
            columns: indices.iter().map(|&i| self.columns[i].clone()).collect(),
            rows: self
                .rows
                .iter()
                .map(|row| indices.iter().map(|&i| row[i].clone()).collect())
                .collect(),
        }
    }

    /// Append rows of another table, widening columns as needed.
    pub fn concat(&self, other: &Table) -> Self {
        let mut records = self.to_records();
        records.extend(other.to_records());
        let mut table = Self::from_records(&records);
        if table.is_empty() {
            table.columns = self.columns.clone();
            for column in &other.columns {
                if !table.columns.contains(column) {
                    table.columns.push(column.clone());
                }
            }
        }
        table
    }

    /// Tab-separated text with a header line. Tabs and newlines inside
    /// cells are replaced by spaces.
    pub fn to_tsv(&self) -> String {
        let clean = |s: String| s.replace(['\t', '\n', '\r'], " ");

        let mut out = self.columns.join("\t");
        out.push('\n');
        for row in &self.rows {
            let line: Vec<String> = row.iter().map(|v| clean(display_value(v))).collect();
            out.push_str(&line.join("\t"));
            out.push('\n');
        }
        out
    }

    /// Rows as JSON objects, the shape grid widgets consume.
    pub fn to_records(&self) -> Vec<Value> {
        self.rows
            .iter()
            .map(|row| {
                let object: Map<String, Value> = self
                    .columns
                    .iter()
                    .cloned()
                    .zip(row.iter().cloned())
                    .collect();
                Value::Object(object)
            })
            .collect()
    }
}

/// Unroll a child array on each parent into one row per child.
///
/// Parent fields named in `carry` lead each row, followed by the child's own
/// fields. Parents with a missing or null child array contribute no rows.
pub fn flatten_children(parents: &[Value], child_key: &str, carry: &[&str]) -> Table {
    let mut records = Vec::new();

    for parent in parents {
        let Some(children) = parent.get(child_key).and_then(Value::as_array) else {
            continue;
        };

        for child in children {
            let mut record = Map::new();
            for field in carry {
                record.insert(
                    (*field).to_string(),
                    parent.get(*field).cloned().unwrap_or(Value::Null),
                );
            }
            match child {
                Value::Object(fields) => {
                    for (key, value) in fields {
                        record.entry(key.clone()).or_insert_with(|| value.clone());
                    }
                }
                other => {
                    record.insert(child_key.to_string(), other.clone());
                }
            }
            records.push(Value::Object(record));
        }
    }

    let mut table = Table::from_records(&records);
    if table.is_empty() {
        table.columns = carry.iter().map(|c| c.to_string()).collect();
    }
    table
}

/// Render a cell for display: strings bare, null empty, everything else as JSON.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
