//! Conditional-write conditions and column filters.
//!
//! A [`Condition`] pairs a row-existence expectation with an optional
//! boolean tree of column conditions. The tree is an ordered structure:
//! serialization emits fields in declaration order and children in insertion
//! order, so the same tree always produces the same bytes.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::value::ColumnValue;

/// Expectation about the row's existence before a write applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RowExistenceExpectation {
    /// Apply regardless of existence.
    Ignore,
    /// Fail with `OTSConditionCheckFail` unless the row exists.
    ExpectExist,
    /// Fail with `OTSConditionCheckFail` if the row exists.
    ExpectNotExist,
}

impl RowExistenceExpectation {
    /// Wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ignore => "IGNORE",
            Self::ExpectExist => "EXPECT_EXIST",
            Self::ExpectNotExist => "EXPECT_NOT_EXIST",
        }
    }
}

/// Comparator applied by a single-column condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ComparatorType {
    /// `=`
    Equal,
    /// `!=`
    NotEqual,
    /// `>`
    GreaterThan,
    /// `>=`
    GreaterEqual,
    /// `<`
    LessThan,
    /// `<=`
    LessEqual,
    /// The column has at least one version.
    Exist,
    /// The column has no version.
    NotExist,
}

impl ComparatorType {
    /// Wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Equal => "EQUAL",
            Self::NotEqual => "NOT_EQUAL",
            Self::GreaterThan => "GREATER_THAN",
            Self::GreaterEqual => "GREATER_EQUAL",
            Self::LessThan => "LESS_THAN",
            Self::LessEqual => "LESS_EQUAL",
            Self::Exist => "EXIST",
            Self::NotExist => "NOT_EXIST",
        }
    }

    /// True for the six relational comparators, which require a value.
    pub fn requires_value(self) -> bool {
        !matches!(self, Self::Exist | Self::NotExist)
    }
}

/// Combinator of a composite condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LogicalOperator {
    /// All children must hold.
    And,
    /// At least one child must hold.
    Or,
    /// The single child must not hold.
    Not,
}

impl LogicalOperator {
    /// Wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::And => "AND",
            Self::Or => "OR",
            Self::Not => "NOT",
        }
    }
}

/// Target type a regex capture is cast to before comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CastType {
    /// Cast the capture to an integer.
    VtInteger,
    /// Keep the capture as a string.
    VtString,
    /// Cast the capture to a double.
    VtDouble,
}

/// Extraction rule applied to a column before comparison: match `pattern`
/// against the column text and cast the capture to `cast_type`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegexRule {
    /// Regular expression with one capture group.
    pub pattern: String,
    /// Type the capture is cast to.
    pub cast_type: CastType,
}

impl RegexRule {
    /// Creates a regex rule.
    pub fn new(pattern: impl Into<String>, cast_type: CastType) -> Self {
        Self {
            pattern: pattern.into(),
            cast_type,
        }
    }
}

/// Leaf condition comparing one column against a value.
///
/// Only the six relational comparators are legal here; existence checks go
/// through a rule-less [`RegexColumnCondition`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SingleColumnCondition {
    /// Column the comparison reads.
    pub column_name: String,
    /// Comparator; relational only.
    pub comparator: ComparatorType,
    /// Comparison value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<ColumnValue>,
    /// Whether a missing column passes the condition.
    pub pass_if_missing: bool,
    /// Whether only the latest version is inspected.
    pub latest_version_only: bool,
}

impl SingleColumnCondition {
    /// Creates a relational leaf condition with defaults
    /// `pass_if_missing = true`, `latest_version_only = true`.
    pub fn new(
        column_name: impl Into<String>,
        comparator: ComparatorType,
        value: ColumnValue,
    ) -> Self {
        Self {
            column_name: column_name.into(),
            comparator,
            value: Some(value),
            pass_if_missing: true,
            latest_version_only: true,
        }
    }

    /// Overrides `pass_if_missing`.
    #[must_use]
    pub fn pass_if_missing(mut self, pass: bool) -> Self {
        self.pass_if_missing = pass;
        self
    }

    /// Overrides `latest_version_only`.
    #[must_use]
    pub fn latest_version_only(mut self, latest: bool) -> Self {
        self.latest_version_only = latest;
        self
    }

    fn validate(&self) -> Result<(), ValidationError> {
        if !self.comparator.requires_value() {
            return Err(ValidationError::ExistenceOnPlainColumn(
                self.comparator.as_str(),
            ));
        }
        if self.value.is_none() {
            return Err(ValidationError::MissingValue(self.comparator.as_str()));
        }
        Ok(())
    }
}

/// Leaf condition comparing a column, optionally through a regex capture,
/// against a value. This is also the only place Exist/NotExist are legal,
/// with or without an extraction rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegexColumnCondition {
    /// Column the condition reads.
    pub column_name: String,
    /// Comparator applied to the (possibly cast) value.
    pub comparator: ComparatorType,
    /// Comparison value; required for relational comparators.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<ColumnValue>,
    /// Extraction rule; `None` compares the raw column.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub regex_rule: Option<RegexRule>,
    /// Whether a missing column passes the condition.
    pub pass_if_missing: bool,
    /// Whether only the latest version is inspected.
    pub latest_version_only: bool,
}

impl RegexColumnCondition {
    /// Creates a regex leaf condition with defaults
    /// `pass_if_missing = true`, `latest_version_only = true`.
    pub fn new(
        column_name: impl Into<String>,
        comparator: ComparatorType,
        value: Option<ColumnValue>,
        regex_rule: Option<RegexRule>,
    ) -> Self {
        Self {
            column_name: column_name.into(),
            comparator,
            value,
            regex_rule,
            pass_if_missing: true,
            latest_version_only: true,
        }
    }

    /// Creates an existence check (Exist/NotExist), carrying no value and
    /// no extraction rule.
    pub fn existence(column_name: impl Into<String>, comparator: ComparatorType) -> Self {
        Self {
            column_name: column_name.into(),
            comparator,
            value: None,
            regex_rule: None,
            pass_if_missing: false,
            latest_version_only: true,
        }
    }

    fn validate(&self) -> Result<(), ValidationError> {
        if self.comparator.requires_value() {
            if self.value.is_none() {
                return Err(ValidationError::MissingValue(self.comparator.as_str()));
            }
        } else if self.value.is_some() {
            return Err(ValidationError::UnexpectedValue(self.comparator.as_str()));
        }
        Ok(())
    }
}

/// Composite condition combining ordered sub-conditions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositeColumnCondition {
    /// Combinator.
    pub combinator: LogicalOperator,
    /// Ordered children; order is preserved end to end.
    pub sub_conditions: Vec<ColumnCondition>,
}

impl CompositeColumnCondition {
    /// Creates an empty composite for `combinator`.
    pub fn new(combinator: LogicalOperator) -> Self {
        Self {
            combinator,
            sub_conditions: Vec::new(),
        }
    }

    /// Appends a sub-condition, keeping insertion order.
    pub fn add_sub_condition(&mut self, condition: ColumnCondition) {
        self.sub_conditions.push(condition);
    }

    fn validate(&self) -> Result<(), ValidationError> {
        match self.combinator {
            LogicalOperator::Not => {
                if self.sub_conditions.len() != 1 {
                    return Err(ValidationError::NotArity(self.sub_conditions.len()));
                }
            }
            LogicalOperator::And | LogicalOperator::Or => {
                if self.sub_conditions.is_empty() {
                    return Err(ValidationError::EmptyComposite(self.combinator.as_str()));
                }
            }
        }
        for sub in &self.sub_conditions {
            sub.validate()?;
        }
        Ok(())
    }
}

/// A node of the column-condition tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ColumnCondition {
    /// Plain column comparison.
    Single(SingleColumnCondition),
    /// Regex-extracted comparison.
    Regex(RegexColumnCondition),
    /// Boolean combination of children.
    Composite(CompositeColumnCondition),
}

impl ColumnCondition {
    /// Validates the whole tree; composite arity and value/comparator
    /// pairing are checked at every node.
    pub fn validate(&self) -> Result<(), ValidationError> {
        match self {
            Self::Single(c) => c.validate(),
            Self::Regex(c) => c.validate(),
            Self::Composite(c) => c.validate(),
        }
    }
}

/// Conditional-write condition attached to a mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    /// Row-existence expectation.
    pub row_existence: RowExistenceExpectation,
    /// Optional column-condition tree.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column_condition: Option<ColumnCondition>,
}

impl Condition {
    /// Creates a condition without a column tree.
    pub fn new(row_existence: RowExistenceExpectation) -> Self {
        Self {
            row_existence,
            column_condition: None,
        }
    }

    /// Shorthand for `IGNORE`.
    pub fn ignore() -> Self {
        Self::new(RowExistenceExpectation::Ignore)
    }

    /// Shorthand for `EXPECT_EXIST`.
    pub fn expect_exist() -> Self {
        Self::new(RowExistenceExpectation::ExpectExist)
    }

    /// Shorthand for `EXPECT_NOT_EXIST`.
    pub fn expect_not_exist() -> Self {
        Self::new(RowExistenceExpectation::ExpectNotExist)
    }

    /// Attaches a column-condition tree.
    #[must_use]
    pub fn with_column_condition(mut self, condition: ColumnCondition) -> Self {
        self.column_condition = Some(condition);
        self
    }

    /// Validates the attached column tree, if any.
    pub fn validate(&self) -> Result<(), ValidationError> {
        match &self.column_condition {
            Some(tree) => tree.validate(),
            None => Ok(()),
        }
    }
}
