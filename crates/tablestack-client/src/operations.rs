//! Typed request and response envelopes for the row operations.

use serde::{Deserialize, Serialize};
use tablestack_model::{
    CapacityUnit, ColumnCondition, Condition, PrimaryKey, Row, RowUpdate,
};

/// Scan direction of a range read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Direction {
    /// Ascending primary-key order.
    Forward,
    /// Descending primary-key order.
    Backward,
}

/// `PutRow` request body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PutRowRequest {
    /// Target table.
    pub table_name: String,
    /// Row to write.
    pub row: Row,
    /// Conditional-write condition.
    pub condition: Condition,
}

/// `GetRow` request body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GetRowRequest {
    /// Target table.
    pub table_name: String,
    /// Primary key of the row.
    pub primary_key: PrimaryKey,
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

impl GetRowRequest {
    /// Creates a request fetching all columns, latest version only.
    pub fn new(table_name: impl Into<String>, primary_key: PrimaryKey) -> Self {
        Self {
            table_name: table_name.into(),
            primary_key,
            columns_to_get: None,
            column_filter: None,
            max_version: Some(1),
        }
    }
}

/// `UpdateRow` request body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateRowRequest {
    /// Target table.
    pub table_name: String,
    /// Primary key of the row.
    pub primary_key: PrimaryKey,
    /// Mutation to apply.
    pub update: RowUpdate,
    /// Conditional-write condition.
    pub condition: Condition,
}

/// `DeleteRow` request body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteRowRequest {
    /// Target table.
    pub table_name: String,
    /// Primary key of the row.
    pub primary_key: PrimaryKey,
    /// Conditional-write condition.
    pub condition: Condition,
}

/// Response of a single-row write (`PutRow`/`UpdateRow`/`DeleteRow`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WriteRowResponse {
    /// Capacity consumed.
    pub consumed: CapacityUnit,
}

/// Response of `GetRow`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowResponse {
    /// Capacity consumed.
    pub consumed: CapacityUnit,
    /// The row, absent when missing or fully filtered out.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub row: Option<Row>,
}

/// `GetRange` request body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GetRangeRequest {
    /// Target table.
    pub table_name: String,
    /// Scan direction.
    pub direction: Direction,
    /// Inclusive start bound; range sentinels allowed.
    pub inclusive_start_primary_key: PrimaryKey,
    /// Exclusive end bound; range sentinels allowed.
    pub exclusive_end_primary_key: PrimaryKey,
    /// Projection; `None` fetches all columns.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub columns_to_get: Option<Vec<String>>,
    /// Page-size cap per call.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<i32>,
    /// Server-side row filter.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column_filter: Option<ColumnCondition>,
    /// Max versions to return per column.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_version: Option<i32>,
}

impl GetRangeRequest {
    /// Creates a forward scan over `[start, end)` fetching all columns.
    pub fn new(
        table_name: impl Into<String>,
        inclusive_start_primary_key: PrimaryKey,
        exclusive_end_primary_key: PrimaryKey,
    ) -> Self {
        Self {
            table_name: table_name.into(),
            direction: Direction::Forward,
            inclusive_start_primary_key,
            exclusive_end_primary_key,
            columns_to_get: None,
            limit: None,
            column_filter: None,
            max_version: Some(1),
        }
    }

    /// Sets the scan direction.
    #[must_use]
    pub fn direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    /// Caps the page size per call.
    #[must_use]
    pub fn limit(mut self, limit: i32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Attaches a server-side row filter.
    #[must_use]
    pub fn column_filter(mut self, filter: ColumnCondition) -> Self {
        self.column_filter = Some(filter);
        self
    }
}

/// Response of one `GetRange` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GetRangeResponse {
    /// Capacity consumed by this page.
    pub consumed: CapacityUnit,
    /// Rows of this page, in scan order.
    pub rows: Vec<Row>,
    /// Continuation token; `None` means the range is exhausted.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub next_start_primary_key: Option<PrimaryKey>,
}
