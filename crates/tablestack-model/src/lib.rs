//! Data model for the Tablestore wide-column protocol.
//!
//! Rows are an ordered primary key (a sequence of named, typed key columns)
//! plus ordered attribute columns. Conditional writes attach a [`Condition`]
//! combining a row-existence expectation with an optional boolean tree of
//! column conditions. Batch requests carry per-table ordered item lists and
//! batch results stay positionally aligned with them.

mod batch;
mod capacity;
mod condition;
mod error;
mod result;
mod row;
mod value;
mod vector;

pub use batch::{
    BatchGetRowRequest, BatchWriteRowRequest, RowChange, RowChangeKind, TableInBatchGetRowItem,
    TableInBatchWriteRowItem,
};
pub use capacity::CapacityUnit;
pub use condition::{
    CastType, ColumnCondition, ComparatorType, CompositeColumnCondition, Condition,
    LogicalOperator, RegexColumnCondition, RegexRule, RowExistenceExpectation,
    SingleColumnCondition,
};
pub use error::{ServiceError, ValidationError, error_codes};
pub use result::{
    BatchGetRowResult, BatchGetRowResultItem, BatchWriteRowResult, BatchWriteRowResultItem,
    WireBatchGetRowResponse, WireBatchWriteRowResponse, WireError, WireRowResult, WireTableResult,
};
pub use row::{Column, PrimaryKey, PrimaryKeyColumn, Row, RowUpdate};
pub use value::{ColumnValue, PrimaryKeyValue};
pub use vector::{bytes_to_floats, floats_to_bytes};
