//! Canonical string construction shared by the V2 and V4 signers.

use std::collections::BTreeMap;

/// Prefix of every header that participates in the canonical string.
pub const HEADER_PREFIX: &str = "x-ots-";
/// Header carrying the V2 request signature.
pub const HEADER_SIGNATURE: &str = "x-ots-signature";
/// Header carrying the V4 request signature.
pub const HEADER_SIGNATURE_V4: &str = "x-ots-signaturev4";
/// Header carrying the region the V4 signing key was derived for.
pub const HEADER_SIGN_REGION: &str = "x-ots-signregion";
/// Header carrying the date the V4 signing key was derived for.
pub const HEADER_SIGN_DATE: &str = "x-ots-signdate";

/// Builds the canonical header string: every `x-ots-` header except the
/// signature headers, formatted `name:trimmed-value`, sorted by name and
/// joined with `\n`.
pub fn build_canonical_headers(headers: &BTreeMap<String, String>) -> String {
    let mut lines: Vec<String> = headers
        .iter()
        .filter_map(|(name, value)| {
            let lower = name.to_ascii_lowercase();
            if lower.starts_with(HEADER_PREFIX)
                && lower != HEADER_SIGNATURE
                && lower != HEADER_SIGNATURE_V4
            {
                Some(format!("{lower}:{}", value.trim()))
            } else {
                None
            }
        })
        .collect();
    lines.sort();
    lines.join("\n")
}

/// Builds the request string-to-sign for a POST to `query`.
pub fn build_request_string_to_sign(query: &str, headers: &BTreeMap<String, String>) -> String {
    let canonical = build_canonical_headers(headers);
    format!("{query}\nPOST\n\n{canonical}\n")
}

/// Builds the response string-to-sign for a response to `query`.
pub fn build_response_string_to_sign(query: &str, headers: &BTreeMap<String, String>) -> String {
    let canonical = build_canonical_headers(headers);
    format!("{canonical}\n{query}")
}
