//! Tablestore request authentication for Tablestack.
//!
//! This crate implements the two mutually exclusive signing protocols the
//! Tablestore wire protocol accepts:
//!
//! - **V2**: the signing key is the raw access-key secret and request
//!   signatures are `Base64(HMAC-SHA1(key, string_to_sign))`.
//! - **V4**: the signing key is derived from the secret through a
//!   date/region-scoped HMAC-SHA256 chain, so a leaked derived key is only
//!   useful for one (date, region) pair. Request signatures use HMAC-SHA256.
//!
//! Response signatures are identical for both protocols (HMAC-SHA1 over a
//! response-specific string) and are verified in constant time.

mod canonical;
mod credentials;
mod error;
mod sign;

pub use canonical::{
    HEADER_PREFIX, HEADER_SIGN_DATE, HEADER_SIGN_REGION, HEADER_SIGNATURE, HEADER_SIGNATURE_V4,
    build_canonical_headers, build_request_string_to_sign, build_response_string_to_sign,
};
pub use credentials::{
    Credentials, CredentialsProvider, RotatingCredentialsProvider, StaticCredentialsProvider,
};
pub use error::AuthError;
pub use sign::{RequestSigner, SignerV2, SignerV4, hmac_sha1_base64, hmac_sha256_base64};
