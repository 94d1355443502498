//! Protocol clients for a Tablestore wide-column store.
//!
//! The clients in this crate own the full request lifecycle: typed request
//! encoding, protocol header assembly, V2/V4 signing, response parsing and
//! retries. They never open sockets. The HTTP exchange itself happens
//! behind the [`Transport`] / [`AsyncTransport`] traits, and bodies stay
//! opaque behind the [`WireCodec`] trait.

mod async_client;
mod client;
mod codec;
mod config;
mod error;
mod operations;
pub mod protocol;
mod range;
mod retry;
mod transport;
mod validate;

pub use async_client::AsyncTableStoreClient;
pub use client::{RangeIter, TableStoreClient};
pub use codec::{JsonCodec, WireCodec};
pub use config::{ClientOptions, SocketTimeout, TlsVersion, TransportOptions};
pub use error::ClientError;
pub use operations::{
    DeleteRowRequest, Direction, GetRangeRequest, GetRangeResponse, GetRowRequest, PutRowRequest,
    RowResponse, UpdateRowRequest, WriteRowResponse,
};
pub use range::RangeCursor;
pub use retry::{DefaultRetryPolicy, NoRetryPolicy, RetryPolicy};
pub use transport::{AsyncTransport, RawRequest, RawResponse, Transport};
