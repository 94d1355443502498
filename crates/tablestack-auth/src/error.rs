//! Error types for request authentication.

/// Errors raised while constructing a signer or verifying a signature.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// V4 signing requires a non-empty region.
    #[error("region is not str or is empty.")]
    EmptyRegion,

    /// The sign date is not an 8-digit `YYYYMMDD` string.
    #[error("invalid sign date: {0} (must be 8-digit YYYYMMDD)")]
    InvalidSignDate(String),

    /// A response signature did not match the locally computed one.
    #[error("response signature does not match")]
    SignatureMismatch,
}
