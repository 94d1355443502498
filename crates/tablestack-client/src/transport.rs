//! Transport boundary.
//!
//! The client never opens sockets. It hands a fully signed [`RawRequest`]
//! to a [`Transport`] (or [`AsyncTransport`]) and gets a [`RawResponse`]
//! back; anything HTTP-stack specific lives behind these traits.

use std::collections::BTreeMap;

use bytes::Bytes;
use http::{Method, StatusCode};

use crate::config::TransportOptions;
use crate::error::ClientError;

/// A signed, ready-to-send request.
#[derive(Debug, Clone)]
pub struct RawRequest {
    /// HTTP method; every Tablestore operation is a POST.
    pub method: Method,
    /// Operation path, e.g. `/PutRow`.
    pub path: String,
    /// All headers, signature included.
    pub headers: BTreeMap<String, String>,
    /// Encoded body.
    pub body: Bytes,
}

/// A raw response as the transport received it.
#[derive(Debug, Clone)]
pub struct RawResponse {
    /// HTTP status.
    pub status: StatusCode,
    /// Response headers.
    pub headers: BTreeMap<String, String>,
    /// Raw body.
    pub body: Bytes,
}

/// Blocking transport.
pub trait Transport: Send + Sync {
    /// Performs one HTTP exchange.
    fn send(
        &self,
        request: &RawRequest,
        options: &TransportOptions,
    ) -> Result<RawResponse, ClientError>;
}

/// Non-blocking transport.
#[async_trait::async_trait]
pub trait AsyncTransport: Send + Sync {
    /// Performs one HTTP exchange.
    async fn send(
        &self,
        request: &RawRequest,
        options: &TransportOptions,
    ) -> Result<RawResponse, ClientError>;

    /// Releases pooled connections. The default is a no-op.
    async fn close(&self) -> Result<(), ClientError> {
        Ok(())
    }
}
