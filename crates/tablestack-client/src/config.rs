//! Client construction options.

use std::sync::Arc;
use std::time::Duration;

use crate::retry::{DefaultRetryPolicy, RetryPolicy};

/// Socket timeout configuration handed to the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SocketTimeout {
    /// One timeout covering connect and read.
    Single(Duration),
    /// Separate connect and read timeouts.
    Pair {
        /// Connect timeout.
        connect: Duration,
        /// Read timeout.
        read: Duration,
    },
}

impl Default for SocketTimeout {
    fn default() -> Self {
        Self::Single(Duration::from_secs(50))
    }
}

/// Minimum TLS version the transport should negotiate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TlsVersion {
    /// TLS 1.2.
    Tls12,
    /// TLS 1.3.
    Tls13,
}

/// Connection-level settings the client forwards to the transport with
/// every request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TransportOptions {
    /// Socket timeouts.
    pub socket_timeout: SocketTimeout,
    /// Minimum TLS version, when the caller cares.
    pub tls_version: Option<TlsVersion>,
}

/// Options accepted at client construction.
///
/// A `region` selects V4 signing; without one the client signs with V2.
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Signing region; presence switches the client to V4 signing.
    pub region: Option<String>,
    /// Pinned V4 sign date (`YYYYMMDD`); `None` uses the current UTC date.
    pub sign_date: Option<String>,
    /// Re-derive the V4 key when the UTC date rolls over.
    pub auto_update_v4_sign: bool,
    /// STS session token sent as `x-ots-ststoken`.
    pub security_token: Option<String>,
    /// Socket timeouts forwarded to the transport.
    pub socket_timeout: SocketTimeout,
    /// Minimum TLS version forwarded to the transport.
    pub tls_version: Option<TlsVersion>,
    /// Retry policy consulted on retryable failures.
    pub retry_policy: Arc<dyn RetryPolicy>,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            region: None,
            sign_date: None,
            auto_update_v4_sign: true,
            security_token: None,
            socket_timeout: SocketTimeout::default(),
            tls_version: None,
            retry_policy: Arc::new(DefaultRetryPolicy::default()),
        }
    }
}

impl ClientOptions {
    /// The connection-level subset forwarded to the transport.
    pub fn transport_options(&self) -> TransportOptions {
        TransportOptions {
            socket_timeout: self.socket_timeout,
            tls_version: self.tls_version,
        }
    }
}
