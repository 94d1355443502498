//! Range-scan pagination cursor.
//!
//! [`RangeCursor`] is a transport-agnostic state machine: callers ask it for
//! the next page request, feed the response back in, and read the rows out.
//! Both the sync and async `xget_range` adapters drive it.

use tablestack_model::{CapacityUnit, Row};

use crate::error::ClientError;
use crate::operations::{GetRangeRequest, GetRangeResponse};

/// Cursor over a paginated range scan.
///
/// Range sentinels (`INF_MIN`/`INF_MAX`) are only legal in the initial
/// bounds; a continuation token containing one is rejected as a decode
/// failure. Dropping the cursor mid-scan is safe, pages already absorbed
/// stay consumed.
#[derive(Debug, Clone)]
pub struct RangeCursor {
    request: GetRangeRequest,
    exhausted: bool,
    consumed: CapacityUnit,
}

impl RangeCursor {
    /// Starts a cursor over `request`, validating any attached filter.
    pub fn new(request: GetRangeRequest) -> Result<Self, ClientError> {
        if let Some(filter) = &request.column_filter {
            filter.validate()?;
        }
        Ok(Self {
            request,
            exhausted: false,
            consumed: CapacityUnit::default(),
        })
    }

    /// True once the scanned range is exhausted.
    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// Capacity consumed by all pages absorbed so far.
    pub fn consumed(&self) -> CapacityUnit {
        self.consumed
    }

    /// The request for the next page, or `None` once exhausted.
    pub fn next_request(&self) -> Option<&GetRangeRequest> {
        if self.exhausted { None } else { Some(&self.request) }
    }

    /// Absorbs one page: accumulates capacity, advances the start bound to
    /// the continuation token (inclusive) or marks the cursor exhausted,
    /// and returns the page's rows.
    pub fn absorb(&mut self, response: GetRangeResponse) -> Result<Vec<Row>, ClientError> {
        self.consumed.add(&response.consumed);
        match response.next_start_primary_key {
            Some(token) => {
                if token.iter().any(|column| column.value.is_virtual()) {
                    self.exhausted = true;
                    return Err(ClientError::Codec(
                        "continuation token contains a range sentinel".to_string(),
                    ));
                }
                self.request.inclusive_start_primary_key = token;
            }
            None => self.exhausted = true,
        }
        Ok(response.rows)
    }
}
