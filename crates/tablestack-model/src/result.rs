//! Batch result types, wire response shapes and aggregate views.
//!
//! The wire carries one result slot per request item, per table, in request
//! order, with write kinds interleaved exactly as they were sent. The
//! aggregators here re-attach the request's kind tags so callers can slice
//! results by table, by kind, and by success without losing the positional
//! alignment.

use serde::{Deserialize, Serialize};

use crate::batch::{BatchGetRowRequest, BatchWriteRowRequest, RowChangeKind};
use crate::capacity::CapacityUnit;
use crate::error::ValidationError;
use crate::row::Row;

/// Error payload of one failed result slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireError {
    /// Tablestore error code.
    pub code: String,
    /// Human-readable message.
    pub message: String,
}

/// One result slot as decoded from the response body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireRowResult {
    /// Whether the item succeeded.
    pub is_ok: bool,
    /// Error payload when `is_ok` is false.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub error: Option<WireError>,
    /// Capacity consumed by the item.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub consumed: Option<CapacityUnit>,
    /// Returned row; absent for writes, missing rows and filtered-out rows.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub row: Option<Row>,
}

/// Per-table result slots, in request order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireTableResult {
    /// Table the slots belong to.
    pub table_name: String,
    /// One slot per request item, positionally aligned.
    pub rows: Vec<WireRowResult>,
}

/// Decoded batch-write response body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireBatchWriteRowResponse {
    /// Per-table slot lists.
    pub tables: Vec<WireTableResult>,
}

/// Decoded batch-get response body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireBatchGetRowResponse {
    /// Per-table slot lists.
    pub tables: Vec<WireTableResult>,
}

/// One batch-write item outcome, tagged with the request's kind and the
/// item's position within its table.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchWriteRowResultItem {
    /// Table the item targeted.
    pub table_name: String,
    /// Kind of the originating request item.
    pub kind: RowChangeKind,
    /// Position within the table's request item list.
    pub index: usize,
    /// Whether the item succeeded.
    pub is_ok: bool,
    /// Error code when the item failed.
    pub error_code: Option<String>,
    /// Error message when the item failed.
    pub error_message: Option<String>,
    /// Capacity consumed by the item.
    pub consumed: Option<CapacityUnit>,
}

/// Aggregated batch-write outcome.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchWriteRowResult {
    items: Vec<BatchWriteRowResultItem>,
}

impl BatchWriteRowResult {
    /// Re-associates a decoded response with the request that produced it.
    ///
    /// Each wire table must match a request table by name and carry exactly
    /// one slot per request item.
    pub fn from_wire(
        request: &BatchWriteRowRequest,
        response: WireBatchWriteRowResponse,
    ) -> Result<Self, ValidationError> {
        let mut items = Vec::new();
        for table in response.tables {
            let requested = request
                .tables
                .iter()
                .find(|t| t.table_name == table.table_name)
                .ok_or_else(|| ValidationError::UnknownResultTable(table.table_name.clone()))?;
            if requested.row_changes.len() != table.rows.len() {
                return Err(ValidationError::ResultCountMismatch(table.table_name));
            }
            for (index, (change, slot)) in
                requested.row_changes.iter().zip(table.rows).enumerate()
            {
                let (error_code, error_message) = match slot.error {
                    Some(e) => (Some(e.code), Some(e.message)),
                    None => (None, None),
                };
                items.push(BatchWriteRowResultItem {
                    table_name: table.table_name.clone(),
                    kind: change.kind(),
                    index,
                    is_ok: slot.is_ok,
                    error_code,
                    error_message,
                    consumed: slot.consumed,
                });
            }
        }
        Ok(Self { items })
    }

    fn of_kind(&self, kind: RowChangeKind) -> impl Iterator<Item = &BatchWriteRowResultItem> {
        self.items.iter().filter(move |i| i.kind == kind)
    }

    /// All item outcomes, in request order.
    pub fn items(&self) -> &[BatchWriteRowResultItem] {
        &self.items
    }

    /// True when every item in every table succeeded.
    pub fn is_all_succeed(&self) -> bool {
        self.items.iter().all(|i| i.is_ok)
    }

    /// Put outcomes for one table, in request order.
    pub fn get_put_by_table(&self, table_name: &str) -> Vec<&BatchWriteRowResultItem> {
        self.of_kind(RowChangeKind::Put)
            .filter(|i| i.table_name == table_name)
            .collect()
    }

    /// Update outcomes for one table, in request order.
    pub fn get_update_by_table(&self, table_name: &str) -> Vec<&BatchWriteRowResultItem> {
        self.of_kind(RowChangeKind::Update)
            .filter(|i| i.table_name == table_name)
            .collect()
    }

    /// Delete outcomes for one table, in request order.
    pub fn get_delete_by_table(&self, table_name: &str) -> Vec<&BatchWriteRowResultItem> {
        self.of_kind(RowChangeKind::Delete)
            .filter(|i| i.table_name == table_name)
            .collect()
    }

    /// Succeeded puts across all tables.
    pub fn get_succeed_of_put(&self) -> Vec<&BatchWriteRowResultItem> {
        self.of_kind(RowChangeKind::Put).filter(|i| i.is_ok).collect()
    }

    /// Failed puts across all tables.
    pub fn get_failed_of_put(&self) -> Vec<&BatchWriteRowResultItem> {
        self.of_kind(RowChangeKind::Put).filter(|i| !i.is_ok).collect()
    }

    /// Succeeded updates across all tables.
    pub fn get_succeed_of_update(&self) -> Vec<&BatchWriteRowResultItem> {
        self.of_kind(RowChangeKind::Update).filter(|i| i.is_ok).collect()
    }

    /// Failed updates across all tables.
    pub fn get_failed_of_update(&self) -> Vec<&BatchWriteRowResultItem> {
        self.of_kind(RowChangeKind::Update).filter(|i| !i.is_ok).collect()
    }

    /// Succeeded deletes across all tables.
    pub fn get_succeed_of_delete(&self) -> Vec<&BatchWriteRowResultItem> {
        self.of_kind(RowChangeKind::Delete).filter(|i| i.is_ok).collect()
    }

    /// Failed deletes across all tables.
    pub fn get_failed_of_delete(&self) -> Vec<&BatchWriteRowResultItem> {
        self.of_kind(RowChangeKind::Delete).filter(|i| !i.is_ok).collect()
    }
}

/// One batch-get item outcome.
///
/// A row that exists but was filtered out server-side comes back with
/// `is_ok = true` and `row = None`, same as a missing row.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchGetRowResultItem {
    /// Table the item targeted.
    pub table_name: String,
    /// Position within the table's request key list.
    pub index: usize,
    /// Whether the item succeeded.
    pub is_ok: bool,
    /// Error code when the item failed.
    pub error_code: Option<String>,
    /// Error message when the item failed.
    pub error_message: Option<String>,
    /// Capacity consumed by the item.
    pub consumed: Option<CapacityUnit>,
    /// The fetched row, when one matched.
    pub row: Option<Row>,
}

/// Aggregated batch-get outcome, grouped by table in request order.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchGetRowResult {
    tables: Vec<(String, Vec<BatchGetRowResultItem>)>,
}

impl BatchGetRowResult {
    /// Re-associates a decoded response with the request that produced it.
    pub fn from_wire(
        request: &BatchGetRowRequest,
        response: WireBatchGetRowResponse,
    ) -> Result<Self, ValidationError> {
        let mut tables = Vec::new();
        for table in response.tables {
            let requested = request
                .tables
                .iter()
                .find(|t| t.table_name == table.table_name)
                .ok_or_else(|| ValidationError::UnknownResultTable(table.table_name.clone()))?;
            if requested.primary_keys.len() != table.rows.len() {
                return Err(ValidationError::ResultCountMismatch(table.table_name));
            }
            let items = table
                .rows
                .into_iter()
                .enumerate()
                .map(|(index, slot)| {
                    let (error_code, error_message) = match slot.error {
                        Some(e) => (Some(e.code), Some(e.message)),
                        None => (None, None),
                    };
                    BatchGetRowResultItem {
                        table_name: table.table_name.clone(),
                        index,
                        is_ok: slot.is_ok,
                        error_code,
                        error_message,
                        consumed: slot.consumed,
                        row: slot.row,
                    }
                })
                .collect();
            tables.push((table.table_name, items));
        }
        Ok(Self { tables })
    }

    /// Outcomes for one table, positionally aligned with its request keys.
    pub fn get_result_by_table(&self, table_name: &str) -> &[BatchGetRowResultItem] {
        self.tables
            .iter()
            .find(|(name, _)| name == table_name)
            .map_or(&[], |(_, items)| items.as_slice())
    }

    /// Succeeded items across all tables, in request order.
    pub fn get_succeed_rows(&self) -> Vec<&BatchGetRowResultItem> {
        self.tables
            .iter()
            .flat_map(|(_, items)| items.iter().filter(|i| i.is_ok))
            .collect()
    }

    /// Failed items across all tables, in request order.
    pub fn get_failed_rows(&self) -> Vec<&BatchGetRowResultItem> {
        self.tables
            .iter()
            .flat_map(|(_, items)| items.iter().filter(|i| !i.is_ok))
            .collect()
    }

    /// True when every item in every table succeeded.
    pub fn is_all_succeed(&self) -> bool {
        self.tables.iter().all(|(_, items)| items.iter().all(|i| i.is_ok))
    }
}
