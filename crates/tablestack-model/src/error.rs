//! Model validation errors and service error codes.

/// Errors raised by local validation, before anything touches the wire.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// A NOT combinator must wrap exactly one sub-condition.
    #[error("the number of sub-conditions of NOT operator must be 1")]
    NotArity(usize),

    /// AND/OR combinators need at least one sub-condition.
    #[error("the number of sub-conditions of {0} operator must be at least 1")]
    EmptyComposite(&'static str),

    /// Exist/NotExist comparators never carry a value.
    #[error("comparator {0} does not accept a value")]
    UnexpectedValue(&'static str),

    /// Relational comparators always carry a value.
    #[error("comparator {0} requires a value")]
    MissingValue(&'static str),

    /// Exist/NotExist only apply to regex conditions.
    #[error("comparator {0} is only valid on a regex condition")]
    ExistenceOnPlainColumn(&'static str),

    /// A batch response named a table the request never mentioned.
    #[error("response contains unknown table {0}")]
    UnknownResultTable(String),

    /// A batch response table carried a different slot count than requested.
    #[error("response row count for table {0} does not match the request")]
    ResultCountMismatch(String),

    /// A vector payload must carry at least one element.
    #[error("vector is empty")]
    EmptyVector,

    /// A vector byte payload must be a whole number of f32 values.
    #[error("vector byte length {0} is not a multiple of 4")]
    InvalidVectorLength(usize),
}

/// Well-known Tablestore error codes.
pub mod error_codes {
    /// A conditional write's condition did not hold (HTTP 403).
    pub const CONDITION_CHECK_FAIL: &str = "OTSConditionCheckFail";
    /// The row was expected to exist but does not (HTTP 404).
    pub const OBJECT_NOT_EXIST: &str = "OTSObjectNotExist";
    /// The row was expected not to exist but does (HTTP 409).
    pub const OBJECT_ALREADY_EXIST: &str = "OTSObjectAlreadyExist";
    /// A request parameter failed server-side validation (HTTP 400).
    pub const PARAMETER_INVALID: &str = "OTSParameterInvalid";
    /// The server timed the request out.
    pub const REQUEST_TIMEOUT: &str = "OTSRequestTimeout";
    /// The table partition is temporarily unavailable.
    pub const PARTITION_UNAVAILABLE: &str = "OTSPartitionUnavailable";
}

/// Message the server returns while a search index is still building its
/// base data; reads hitting it are transient.
const INDEX_BUILDING_MESSAGE: &str = "Disallow read index table in building base state";

/// A structured error decoded from a server error body.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{code}: {message} (status {status})")]
pub struct ServiceError {
    /// HTTP status the error arrived with.
    pub status: u16,
    /// Tablestore error code, e.g. `OTSConditionCheckFail`.
    pub code: String,
    /// Human-readable message.
    pub message: String,
}

impl ServiceError {
    /// Creates a service error.
    pub fn new(status: u16, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status,
            code: code.into(),
            message: message.into(),
        }
    }

    /// True when retrying the same request may succeed: server-side 5xx
    /// failures, server timeouts, and reads against a still-building index.
    pub fn is_retryable(&self) -> bool {
        self.status >= 500
            || self.code == error_codes::REQUEST_TIMEOUT
            || self.code == error_codes::PARTITION_UNAVAILABLE
            || self.message.contains(INDEX_BUILDING_MESSAGE)
    }
}
