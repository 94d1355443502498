//! Rows, primary keys and partial-update descriptions.

use serde::{Deserialize, Serialize};

use crate::value::{ColumnValue, PrimaryKeyValue};

/// One named, typed primary-key column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrimaryKeyColumn {
    /// Column name.
    pub name: String,
    /// Column value, possibly a range sentinel.
    pub value: PrimaryKeyValue,
}

impl PrimaryKeyColumn {
    /// Creates a primary-key column.
    pub fn new(name: impl Into<String>, value: PrimaryKeyValue) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// An ordered sequence of primary-key columns identifying a row.
pub type PrimaryKey = Vec<PrimaryKeyColumn>;

/// One named attribute column, optionally pinned to a version timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    /// Column name.
    pub name: String,
    /// Column value.
    pub value: ColumnValue,
    /// Version timestamp, present in read results and explicit writes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
}

impl Column {
    /// Creates a column without an explicit timestamp.
    pub fn new(name: impl Into<String>, value: ColumnValue) -> Self {
        Self {
            name: name.into(),
            value,
            timestamp: None,
        }
    }

    /// Pins the column to a version timestamp.
    #[must_use]
    pub fn with_timestamp(mut self, timestamp: i64) -> Self {
        self.timestamp = Some(timestamp);
        self
    }
}

/// A full row: primary key plus attribute columns, both order-preserving.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row {
    /// Ordered primary-key columns.
    pub primary_key: PrimaryKey,
    /// Ordered attribute columns.
    pub attribute_columns: Vec<Column>,
}

impl Row {
    /// Creates a row.
    pub fn new(primary_key: PrimaryKey, attribute_columns: Vec<Column>) -> Self {
        Self {
            primary_key,
            attribute_columns,
        }
    }
}

/// Partial mutation of a row's attribute columns.
///
/// Sections apply in declaration order: puts, targeted version deletes,
/// whole-column deletes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RowUpdate {
    /// Columns to write.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub put: Vec<Column>,
    /// Column versions to delete; `None` timestamp deletes the latest.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub delete: Vec<(String, Option<i64>)>,
    /// Columns to delete entirely.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub delete_all: Vec<String>,
}

impl RowUpdate {
    /// Creates an empty update.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a column write.
    #[must_use]
    pub fn put(mut self, column: Column) -> Self {
        self.put.push(column);
        self
    }

    /// Adds a targeted version delete.
    #[must_use]
    pub fn delete(mut self, name: impl Into<String>, timestamp: Option<i64>) -> Self {
        self.delete.push((name.into(), timestamp));
        self
    }

    /// Adds a whole-column delete.
    #[must_use]
    pub fn delete_all(mut self, name: impl Into<String>) -> Self {
        self.delete_all.push(name.into());
        self
    }

    /// True when the update carries no mutation at all.
    pub fn is_empty(&self) -> bool {
        self.put.is_empty() && self.delete.is_empty() && self.delete_all.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_preserve_column_order() {
        let row = Row::new(
            vec![
                PrimaryKeyColumn::new("gid", PrimaryKeyValue::Integer(1)),
                PrimaryKeyColumn::new("uid", PrimaryKeyValue::Integer(101)),
            ],
            vec![
                Column::new("name", ColumnValue::String("John".into())),
                Column::new("address", ColumnValue::String("China".into())),
                Column::new("age", ColumnValue::Integer(20)),
            ],
        );
        let names: Vec<_> = row.attribute_columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["name", "address", "age"]);
        assert_eq!(row.primary_key[0].name, "gid");
    }

    #[test]
    fn test_should_build_row_update() {
        let update = RowUpdate::new()
            .put(Column::new("age", ColumnValue::Integer(21)))
            .delete("address", Some(1_234_567))
            .delete_all("mobile");
        assert!(!update.is_empty());
        assert_eq!(update.put.len(), 1);
        assert_eq!(update.delete[0].0, "address");
        assert_eq!(update.delete_all, ["mobile"]);
        assert!(RowUpdate::new().is_empty());
    }

    #[test]
    fn test_should_round_trip_row_through_json() {
        let row = Row::new(
            vec![PrimaryKeyColumn::new("pk", PrimaryKeyValue::String("a".into()))],
            vec![Column::new("v", ColumnValue::Double(2.5)).with_timestamp(1_700_000_000_000)],
        );
        let json = serde_json::to_string(&row).unwrap();
        let back: Row = serde_json::from_str(&json).unwrap();
        assert_eq!(back, row);
    }
}
