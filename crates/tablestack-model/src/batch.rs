//! Batch write and batch get request types.
//!
//! Item order is load-bearing: results come back positionally aligned with
//! the request, so every container here preserves insertion order within a
//! table and table order across the request.

use serde::{Deserialize, Serialize};

use crate::condition::{ColumnCondition, Condition};
use crate::error::ValidationError;
use crate::row::{PrimaryKey, Row, RowUpdate};

/// Kind tag of a write item, used to de-interleave mixed per-table results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RowChangeKind {
    /// Whole-row put.
    Put,
    /// Partial update.
    Update,
    /// Row delete.
    Delete,
}

/// One write item of a batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RowChange {
    /// Write a whole row.
    Put {
        /// Row to write.
        row: Row,
        /// Conditional-write condition.
        condition: Condition,
    },
    /// Apply a partial update to a row.
    Update {
        /// Primary key of the row.
        primary_key: PrimaryKey,
        /// Mutation to apply.
        update: RowUpdate,
        /// Conditional-write condition.
        condition: Condition,
    },
    /// Delete a row.
    Delete {
        /// Primary key of the row.
        primary_key: PrimaryKey,
        /// Conditional-write condition.
        condition: Condition,
    },
}

impl RowChange {
    /// Kind tag of this item.
    pub fn kind(&self) -> RowChangeKind {
        match self {
            Self::Put { .. } => RowChangeKind::Put,
            Self::Update { .. } => RowChangeKind::Update,
            Self::Delete { .. } => RowChangeKind::Delete,
        }
    }

    /// The item's condition.
    pub fn condition(&self) -> &Condition {
        match self {
            Self::Put { condition, .. }
            | Self::Update { condition, .. }
            | Self::Delete { condition, .. } => condition,
        }
    }
}

/// Ordered write items for one table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableInBatchWriteRowItem {
    /// Target table.
    pub table_name: String,
    /// Items in request order.
    pub row_changes: Vec<RowChange>,
}

impl TableInBatchWriteRowItem {
    /// Creates a per-table item list.
    pub fn new(table_name: impl Into<String>, row_changes: Vec<RowChange>) -> Self {
        Self {
            table_name: table_name.into(),
            row_changes,
        }
    }
}

/// A multi-table batch write request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchWriteRowRequest {
    /// Tables in the order they were added.
    pub tables: Vec<TableInBatchWriteRowItem>,
}

impl BatchWriteRowRequest {
    /// Creates an empty request.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a per-table item list. Re-adding a table extends its existing
    /// list instead of creating a duplicate entry.
    pub fn add(&mut self, item: TableInBatchWriteRowItem) {
        if let Some(existing) = self
            .tables
            .iter_mut()
            .find(|t| t.table_name == item.table_name)
        {
            existing.row_changes.extend(item.row_changes);
        } else {
            self.tables.push(item);
        }
    }

    /// Validates every item's condition.
    pub fn validate(&self) -> Result<(), ValidationError> {
        for table in &self.tables {
            for change in &table.row_changes {
                change.condition().validate()?;
            }
        }
        Ok(())
    }
}

/// Ordered get items for one table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableInBatchGetRowItem {
    /// Target table.
    pub table_name: String,
    /// Primary keys to fetch, in request order.
    pub primary_keys: Vec<PrimaryKey>,
    /// Projection; `None` fetches all columns.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub columns_to_get: Option<Vec<String>>,
    /// Server-side row filter.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column_filter: Option<ColumnCondition>,
    /// Max versions to return per column.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_version: Option<i32>,
}

impl TableInBatchGetRowItem {
    /// Creates a per-table get list fetching all columns, latest version.
    pub fn new(table_name: impl Into<String>, primary_keys: Vec<PrimaryKey>) -> Self {
        Self {
            table_name: table_name.into(),
            primary_keys,
            columns_to_get: None,
            column_filter: None,
            max_version: Some(1),
        }
    }

    /// Restricts the returned columns.
    #[must_use]
    pub fn columns_to_get(mut self, columns: Vec<String>) -> Self {
        self.columns_to_get = Some(columns);
        self
    }

    /// Attaches a server-side row filter.
    #[must_use]
    pub fn column_filter(mut self, filter: ColumnCondition) -> Self {
        self.column_filter = Some(filter);
        self
    }
}

/// A multi-table batch get request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchGetRowRequest {
    /// Tables in the order they were added.
    pub tables: Vec<TableInBatchGetRowItem>,
}

impl BatchGetRowRequest {
    /// Creates an empty request.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a per-table get list. Re-adding a table extends its key list.
    pub fn add(&mut self, item: TableInBatchGetRowItem) {
        if let Some(existing) = self
            .tables
            .iter_mut()
            .find(|t| t.table_name == item.table_name)
        {
            existing.primary_keys.extend(item.primary_keys);
        } else {
            self.tables.push(item);
        }
    }

    /// Validates every attached column filter.
    pub fn validate(&self) -> Result<(), ValidationError> {
        for table in &self.tables {
            if let Some(filter) = &table.column_filter {
                filter.validate()?;
            }
        }
        Ok(())
    }
}
