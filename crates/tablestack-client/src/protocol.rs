//! Pure protocol-core functions shared by the sync and async clients:
//! header assembly, body checksums and response parsing. Everything here
//! operates on explicit inputs so both adapters stay thin.

use std::collections::BTreeMap;

use base64::{Engine as _, engine::general_purpose::STANDARD};
use chrono::{DateTime, Utc};
use md5::{Digest, Md5};
use serde::de::DeserializeOwned;

use crate::codec::WireCodec;
use crate::error::ClientError;
use crate::transport::RawResponse;

/// Wire API version sent with every request.
pub const API_VERSION: &str = "2015-12-31";

/// Request timestamp header.
pub const HEADER_DATE: &str = "x-ots-date";
/// API version header.
pub const HEADER_API_VERSION: &str = "x-ots-apiversion";
/// Access key id header.
pub const HEADER_ACCESS_KEY_ID: &str = "x-ots-accesskeyid";
/// Instance name header.
pub const HEADER_INSTANCE_NAME: &str = "x-ots-instancename";
/// STS session token header.
pub const HEADER_STS_TOKEN: &str = "x-ots-ststoken";
/// Body checksum header.
pub const HEADER_CONTENT_MD5: &str = "x-ots-contentmd5";

/// Computes `Base64(MD5(body))` for the checksum header.
pub fn content_md5(body: &[u8]) -> String {
    let mut hasher = Md5::new();
    hasher.update(body);
    STANDARD.encode(hasher.finalize())
}

/// Assembles the protocol headers every request carries, before signing.
pub fn build_headers(
    access_key_id: &str,
    instance_name: &str,
    security_token: Option<&str>,
    date: DateTime<Utc>,
    body: &[u8],
) -> BTreeMap<String, String> {
    let mut headers = BTreeMap::new();
    headers.insert(
        HEADER_DATE.to_string(),
        date.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string(),
    );
    headers.insert(HEADER_API_VERSION.to_string(), API_VERSION.to_string());
    headers.insert(
        HEADER_ACCESS_KEY_ID.to_string(),
        access_key_id.to_string(),
    );
    headers.insert(
        HEADER_INSTANCE_NAME.to_string(),
        instance_name.to_string(),
    );
    if let Some(token) = security_token {
        headers.insert(HEADER_STS_TOKEN.to_string(), token.to_string());
    }
    headers.insert(HEADER_CONTENT_MD5.to_string(), content_md5(body));
    headers
}

/// Turns a raw response into a typed one: 2xx bodies decode through the
/// codec, everything else becomes a structured service error.
pub fn parse_response<C: WireCodec, T: DeserializeOwned>(
    codec: &C,
    response: &RawResponse,
) -> Result<T, ClientError> {
    if response.status.is_success() {
        codec.decode(&response.body)
    } else {
        Err(ClientError::Service(codec.decode_error(
            response.status.as_u16(),
            &response.body,
        )))
    }
}
