//! Client error type.

use tablestack_auth::AuthError;
use tablestack_model::{ServiceError, ValidationError};

/// Any failure a client operation can surface.
///
/// Batch item failures never appear here: they land in their result slots.
/// Only whole-request failures become a `ClientError`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClientError {
    /// Local argument validation failed before anything was sent.
    #[error("{0}")]
    Validation(String),

    /// The server rejected the request with a structured error.
    #[error(transparent)]
    Service(#[from] ServiceError),

    /// The transport could not complete the exchange.
    #[error("transport error: {0}")]
    Transport(String),

    /// A body could not be encoded or decoded.
    #[error("codec error: {0}")]
    Codec(String),

    /// Signing or signature verification failed.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// A model-level validation failed.
    #[error(transparent)]
    Model(#[from] ValidationError),
}

impl ClientError {
    /// True when retrying the same request may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Service(err) => err.is_retryable(),
            Self::Transport(_) => true,
            Self::Validation(_) | Self::Codec(_) | Self::Auth(_) | Self::Model(_) => false,
        }
    }
}
