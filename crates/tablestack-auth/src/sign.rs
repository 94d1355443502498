//! V2 and V4 request signers.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use base64::{Engine as _, engine::general_purpose::STANDARD};
use chrono::Utc;
use hmac::{Hmac, KeyInit, Mac};
use parking_lot::RwLock;
use sha1::Sha1;
use sha2::Sha256;
use subtle::ConstantTimeEq;
use tracing::debug;

use crate::canonical::{
    HEADER_SIGN_DATE, HEADER_SIGN_REGION, HEADER_SIGNATURE, HEADER_SIGNATURE_V4,
    build_request_string_to_sign, build_response_string_to_sign,
};
use crate::credentials::CredentialsProvider;
use crate::error::AuthError;

type HmacSha1 = Hmac<Sha1>;
type HmacSha256 = Hmac<Sha256>;

const V4_KEY_PREFIX: &str = "aliyun_v4";
const V4_PRODUCT: &str = "ots";
const V4_TERMINATOR: &str = "aliyun_v4_request";

/// Computes `Base64(HMAC-SHA1(key, data))`.
pub fn hmac_sha1_base64(key: &[u8], data: &[u8]) -> String {
    let mut mac = HmacSha1::new_from_slice(key).expect("HMAC can accept keys of any length");
    mac.update(data);
    STANDARD.encode(mac.finalize().into_bytes())
}

/// Computes `Base64(HMAC-SHA256(key, data))`.
pub fn hmac_sha256_base64(key: &[u8], data: &[u8]) -> String {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC can accept keys of any length");
    mac.update(data);
    STANDARD.encode(mac.finalize().into_bytes())
}

fn current_utc_date() -> String {
    Utc::now().format("%Y%m%d").to_string()
}

fn hmac_sha256_raw(key: &[u8], data: &[u8]) -> Vec<u8> {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC can accept keys of any length");
    mac.update(data);
    mac.finalize().into_bytes().to_vec()
}

/// Signs outgoing requests and verifies response signatures.
pub trait RequestSigner: Send + Sync + fmt::Debug {
    /// Computes the request signature and inserts the signature header
    /// (and, for V4, the sign-region and sign-date headers) into `headers`.
    fn sign_request(&self, query: &str, headers: &mut BTreeMap<String, String>);

    /// Computes the expected signature for a response to `query`.
    fn response_signature(&self, query: &str, headers: &BTreeMap<String, String>) -> String;

    /// Verifies a response signature in constant time.
    fn verify_response(
        &self,
        query: &str,
        headers: &BTreeMap<String, String>,
        signature: &str,
    ) -> Result<(), AuthError> {
        let expected = self.response_signature(query, headers);
        if expected.as_bytes().ct_eq(signature.as_bytes()).into() {
            Ok(())
        } else {
            Err(AuthError::SignatureMismatch)
        }
    }
}

/// V2 signer: the signing key is the raw access-key secret and all
/// signatures are HMAC-SHA1.
#[derive(Debug, Clone)]
pub struct SignerV2 {
    provider: Arc<dyn CredentialsProvider>,
}

impl SignerV2 {
    /// Creates a V2 signer over a credentials source.
    pub fn new(provider: Arc<dyn CredentialsProvider>) -> Self {
        Self { provider }
    }
}

impl RequestSigner for SignerV2 {
    fn sign_request(&self, query: &str, headers: &mut BTreeMap<String, String>) {
        let secret = self.provider.credentials().access_key_secret;
        let string_to_sign = build_request_string_to_sign(query, headers);
        debug!(query, "signing request with V2");
        let signature = hmac_sha1_base64(secret.as_bytes(), string_to_sign.as_bytes());
        headers.insert(HEADER_SIGNATURE.to_string(), signature);
    }

    fn response_signature(&self, query: &str, headers: &BTreeMap<String, String>) -> String {
        let secret = self.provider.credentials().access_key_secret;
        let string_to_sign = build_response_string_to_sign(query, headers);
        hmac_sha1_base64(secret.as_bytes(), string_to_sign.as_bytes())
    }
}

#[derive(Debug, Clone)]
struct CachedKey {
    sign_date: String,
    access_key_id: String,
    /// Base64 of the derived key; the Base64 text bytes are the HMAC key.
    key: String,
}

/// V4 signer: the signing key is derived from the secret through a
/// date/region-scoped HMAC-SHA256 chain and cached until the scope changes.
pub struct SignerV4 {
    provider: Arc<dyn CredentialsProvider>,
    region: String,
    auto_update_sign_date: bool,
    cached: RwLock<Option<CachedKey>>,
    pinned_sign_date: String,
}

impl fmt::Debug for SignerV4 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignerV4")
            .field("region", &self.region)
            .field("auto_update_sign_date", &self.auto_update_sign_date)
            .field("pinned_sign_date", &self.pinned_sign_date)
            .finish_non_exhaustive()
    }
}

impl SignerV4 {
    /// Creates a V4 signer for `region`.
    ///
    /// When `sign_date` is `None` the current UTC date is captured at
    /// construction. With `auto_update_sign_date` the key is re-derived
    /// whenever the UTC date rolls over; without it, signing continues with
    /// the pinned date. A supplied `sign_date` must be an 8-digit
    /// `YYYYMMDD` string.
    pub fn new(
        provider: Arc<dyn CredentialsProvider>,
        region: impl Into<String>,
        sign_date: Option<&str>,
        auto_update_sign_date: bool,
    ) -> Result<Self, AuthError> {
        let region = region.into();
        if region.trim().is_empty() {
            return Err(AuthError::EmptyRegion);
        }
        if let Some(date) = sign_date {
            if date.len() != 8 || !date.bytes().all(|b| b.is_ascii_digit()) {
                return Err(AuthError::InvalidSignDate(date.to_string()));
            }
        }
        Ok(Self {
            provider,
            region,
            auto_update_sign_date,
            cached: RwLock::new(None),
            pinned_sign_date: sign_date
                .map_or_else(current_utc_date, ToString::to_string),
        })
    }

    /// Derives the Base64 signing key for `(secret, sign_date, region)`.
    pub fn derive_signing_key(secret: &str, sign_date: &str, region: &str) -> String {
        let first = format!("{V4_KEY_PREFIX}{secret}");
        let k1 = hmac_sha256_raw(first.as_bytes(), sign_date.as_bytes());
        let k2 = hmac_sha256_raw(&k1, region.as_bytes());
        let k3 = hmac_sha256_raw(&k2, V4_PRODUCT.as_bytes());
        let k4 = hmac_sha256_raw(&k3, V4_TERMINATOR.as_bytes());
        STANDARD.encode(k4)
    }

    fn effective_sign_date(&self) -> String {
        if self.auto_update_sign_date {
            // Auto-update tracks the wall clock even past a pinned start date.
            current_utc_date()
        } else {
            self.pinned_sign_date.clone()
        }
    }

    /// Returns the current `(sign_date, key)` pair, re-deriving when the
    /// sign date or the access key has changed since the cached derivation.
    fn signing_key(&self) -> (String, String) {
        let sign_date = self.effective_sign_date();
        let credentials = self.provider.credentials();
        {
            let cached = self.cached.read();
            if let Some(entry) = cached.as_ref() {
                if entry.sign_date == sign_date && entry.access_key_id == credentials.access_key_id
                {
                    return (entry.sign_date.clone(), entry.key.clone());
                }
            }
        }
        let key = Self::derive_signing_key(&credentials.access_key_secret, &sign_date, &self.region);
        debug!(sign_date, region = %self.region, "derived V4 signing key");
        *self.cached.write() = Some(CachedKey {
            sign_date: sign_date.clone(),
            access_key_id: credentials.access_key_id,
            key: key.clone(),
        });
        (sign_date, key)
    }
}

impl RequestSigner for SignerV4 {
    fn sign_request(&self, query: &str, headers: &mut BTreeMap<String, String>) {
        let (sign_date, key) = self.signing_key();
        headers.insert(HEADER_SIGN_REGION.to_string(), self.region.clone());
        headers.insert(HEADER_SIGN_DATE.to_string(), sign_date);
        let string_to_sign = format!("{}{V4_PRODUCT}", build_request_string_to_sign(query, headers));
        debug!(query, "signing request with V4");
        let signature = hmac_sha256_base64(key.as_bytes(), string_to_sign.as_bytes());
        headers.insert(HEADER_SIGNATURE_V4.to_string(), signature);
    }

    fn response_signature(&self, query: &str, headers: &BTreeMap<String, String>) -> String {
        let (_, key) = self.signing_key();
        let string_to_sign = build_response_string_to_sign(query, headers);
        hmac_sha1_base64(key.as_bytes(), string_to_sign.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::{Credentials, StaticCredentialsProvider};

    const SECRET: &str = "test_key";
    const REGION: &str = "test-region";
    const SIGN_DATE: &str = "20250410";
    const QUERY: &str = "test_query";

    fn provider() -> Arc<dyn CredentialsProvider> {
        Arc::new(StaticCredentialsProvider::new(Credentials::new(
            "test_id", SECRET,
        )))
    }

    fn test_headers() -> BTreeMap<String, String> {
        let mut h = BTreeMap::new();
        h.insert("x-ots-test".to_string(), "test".to_string());
        h
    }

    #[test]
    fn test_should_compute_hmac_sha1_signature() {
        assert_eq!(
            hmac_sha1_base64(SECRET.as_bytes(), b"test_signature_string"),
            "C845ef7UjNGL0gExNlQhp+3B/gY="
        );
    }

    #[test]
    fn test_should_compute_hmac_sha256_signature() {
        assert_eq!(
            hmac_sha256_base64(SECRET.as_bytes(), b"test_signature_string"),
            "c+lCAaaQVSCVlc0u0JBEPoIzyxplf4xEIBH8sdWUOjo="
        );
    }

    #[test]
    fn test_should_sign_request_with_v2() {
        let signer = SignerV2::new(provider());
        let mut headers = test_headers();
        signer.sign_request(QUERY, &mut headers);
        assert_eq!(
            headers.get(HEADER_SIGNATURE).map(String::as_str),
            Some("QDhzLv7VESBJtYQY4Li0IhSUOdg=")
        );
    }

    #[test]
    fn test_should_compute_v2_response_signature() {
        let signer = SignerV2::new(provider());
        let headers = test_headers();
        assert_eq!(
            signer.response_signature(QUERY, &headers),
            "UjJK/SWed0n9o6JYxvApHGaQABo="
        );
    }

    #[test]
    fn test_should_derive_v4_signing_key() {
        assert_eq!(
            SignerV4::derive_signing_key(SECRET, SIGN_DATE, REGION),
            "nToxlXrxgCm0L5J0nr/qq/GmtgN9GVBhiRLzdLaVUP0="
        );
    }

    #[test]
    fn test_should_sign_request_with_v4() {
        let signer = SignerV4::new(provider(), REGION, Some(SIGN_DATE), false)
            .expect("valid region and date");
        let mut headers = test_headers();
        signer.sign_request(QUERY, &mut headers);
        assert_eq!(
            headers.get(HEADER_SIGN_REGION).map(String::as_str),
            Some(REGION)
        );
        assert_eq!(
            headers.get(HEADER_SIGN_DATE).map(String::as_str),
            Some(SIGN_DATE)
        );
        assert_eq!(
            headers.get(HEADER_SIGNATURE_V4).map(String::as_str),
            Some("yXnOpODWaU1EYAlLP3l25ksj010uGHS7uxIt5Qiwz4o=")
        );
    }

    #[test]
    fn test_should_compute_v4_response_signature() {
        let signer = SignerV4::new(provider(), REGION, Some(SIGN_DATE), false)
            .expect("valid region and date");
        let headers = test_headers();
        assert_eq!(
            signer.response_signature(QUERY, &headers),
            "vIhaUGwv/JSg8ctLNyxbNeNv69A="
        );
    }

    #[test]
    fn test_should_verify_response_signature() {
        let signer = SignerV2::new(provider());
        let headers = test_headers();
        let good = signer.response_signature(QUERY, &headers);
        assert!(signer.verify_response(QUERY, &headers, &good).is_ok());
        assert!(matches!(
            signer.verify_response(QUERY, &headers, "bogus"),
            Err(AuthError::SignatureMismatch)
        ));
    }

    #[test]
    fn test_should_reject_empty_region() {
        assert!(matches!(
            SignerV4::new(provider(), "", None, true),
            Err(AuthError::EmptyRegion)
        ));
        assert!(matches!(
            SignerV4::new(provider(), "  ", None, true),
            Err(AuthError::EmptyRegion)
        ));
    }

    #[test]
    fn test_should_reject_malformed_sign_date() {
        assert!(matches!(
            SignerV4::new(provider(), REGION, Some("2025-04-10"), false),
            Err(AuthError::InvalidSignDate(_))
        ));
    }

    #[test]
    fn test_should_keep_pinned_sign_date_stable() {
        let signer = SignerV4::new(provider(), REGION, Some(SIGN_DATE), false)
            .expect("valid region and date");
        let mut headers = test_headers();
        signer.sign_request(QUERY, &mut headers);
        let first = headers.get(HEADER_SIGNATURE_V4).cloned();
        let mut headers = test_headers();
        signer.sign_request(QUERY, &mut headers);
        assert_eq!(headers.get(HEADER_SIGNATURE_V4).cloned(), first);
    }

    #[test]
    fn test_should_pin_construction_date_when_auto_update_is_off() {
        let before = current_utc_date();
        let signer =
            SignerV4::new(provider(), REGION, None, false).expect("valid region");
        let after = current_utc_date();

        let mut headers = test_headers();
        signer.sign_request(QUERY, &mut headers);
        let first_date = headers.get(HEADER_SIGN_DATE).cloned().unwrap();
        assert!(first_date == before || first_date == after);

        let mut headers = test_headers();
        signer.sign_request(QUERY, &mut headers);
        assert_eq!(headers.get(HEADER_SIGN_DATE), Some(&first_date));
    }

    #[test]
    fn test_should_rederive_key_after_credential_rotation() {
        use crate::credentials::RotatingCredentialsProvider;

        let rotating = Arc::new(RotatingCredentialsProvider::new(Credentials::new(
            "test_id", SECRET,
        )));
        let signer = SignerV4::new(rotating.clone(), REGION, Some(SIGN_DATE), false)
            .expect("valid region and date");
        let mut headers = test_headers();
        signer.sign_request(QUERY, &mut headers);
        let before = headers.get(HEADER_SIGNATURE_V4).cloned();

        rotating.set(Credentials::new("other_id", "other_secret"));
        let mut headers = test_headers();
        signer.sign_request(QUERY, &mut headers);
        assert_ne!(headers.get(HEADER_SIGNATURE_V4).cloned(), before);
    }
}
