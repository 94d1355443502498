//! Wire-codec boundary.

use bytes::Bytes;
use serde::{Serialize, de::DeserializeOwned};
use tablestack_model::ServiceError;

use crate::error::ClientError;

/// Encodes typed requests to body bytes and decodes body bytes back to
/// typed responses. The client treats bodies as opaque beyond this trait.
pub trait WireCodec: Send + Sync {
    /// MIME type advertised for encoded bodies.
    fn content_type(&self) -> &'static str;

    /// Encodes a typed request body.
    fn encode<T: Serialize>(&self, value: &T) -> Result<Bytes, ClientError>;

    /// Decodes a typed response body.
    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T, ClientError>;

    /// Decodes an error body into a structured service error. Unparseable
    /// bodies still produce a service error rather than a codec failure.
    fn decode_error(&self, status: u16, bytes: &[u8]) -> ServiceError;
}

/// Default JSON codec.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

#[derive(serde::Deserialize)]
struct ErrorBody {
    code: String,
    message: String,
}

impl WireCodec for JsonCodec {
    fn content_type(&self) -> &'static str {
        "application/json"
    }

    fn encode<T: Serialize>(&self, value: &T) -> Result<Bytes, ClientError> {
        let body = serde_json::to_vec(value).map_err(|e| ClientError::Codec(e.to_string()))?;
        Ok(Bytes::from(body))
    }

    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T, ClientError> {
        serde_json::from_slice(bytes).map_err(|e| ClientError::Codec(e.to_string()))
    }

    fn decode_error(&self, status: u16, bytes: &[u8]) -> ServiceError {
        match serde_json::from_slice::<ErrorBody>(bytes) {
            Ok(body) => ServiceError::new(status, body.code, body.message),
            Err(_) => ServiceError::new(
                status,
                "OTSUnknownError",
                String::from_utf8_lossy(bytes).into_owned(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_decode_structured_error_body() {
        let codec = JsonCodec;
        let err = codec.decode_error(
            403,
            br#"{"code":"OTSConditionCheckFail","message":"Condition check failed."}"#,
        );
        assert_eq!(err.status, 403);
        assert_eq!(err.code, "OTSConditionCheckFail");
        assert_eq!(err.message, "Condition check failed.");
    }

    #[test]
    fn test_should_fall_back_on_unparseable_error_body() {
        let codec = JsonCodec;
        let err = codec.decode_error(502, b"bad gateway");
        assert_eq!(err.code, "OTSUnknownError");
        assert_eq!(err.message, "bad gateway");
        assert!(err.is_retryable());
    }
}
