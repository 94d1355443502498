//! Construction-time argument validation shared by both clients.

use std::sync::Arc;

use tablestack_auth::{
    Credentials, CredentialsProvider, RequestSigner, SignerV2, SignerV4,
    StaticCredentialsProvider,
};

use crate::config::ClientOptions;
use crate::error::ClientError;

const ERR_ENDPOINT: &str = "end_point is not str or is empty.";
const ERR_PROTOCOL: &str =
    "protocol of end_point must be 'http' or 'https', e.g. https://instance.cn-hangzhou.ots.aliyun.com.";
const ERR_KEY_ID: &str = "access_key_id is not str or is empty.";
const ERR_KEY_SECRET: &str = "access_key_secret is not str or is empty.";
const ERR_INSTANCE: &str = "instance_name is not str or is empty.";
const ERR_REGION: &str = "region is not str or is empty.";

/// Validates constructor arguments in a fixed order so callers always see
/// the first problem: endpoint presence, endpoint scheme, key id, secret,
/// instance name, then region when one is supplied.
pub(crate) fn validate_args(
    endpoint: &str,
    access_key_id: &str,
    access_key_secret: &str,
    instance_name: &str,
    options: &ClientOptions,
) -> Result<(), ClientError> {
    if endpoint.trim().is_empty() {
        return Err(ClientError::Validation(ERR_ENDPOINT.to_string()));
    }
    if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
        return Err(ClientError::Validation(ERR_PROTOCOL.to_string()));
    }
    if access_key_id.trim().is_empty() {
        return Err(ClientError::Validation(ERR_KEY_ID.to_string()));
    }
    if access_key_secret.trim().is_empty() {
        return Err(ClientError::Validation(ERR_KEY_SECRET.to_string()));
    }
    if instance_name.trim().is_empty() {
        return Err(ClientError::Validation(ERR_INSTANCE.to_string()));
    }
    if let Some(region) = &options.region {
        if region.trim().is_empty() {
            return Err(ClientError::Validation(ERR_REGION.to_string()));
        }
    }
    Ok(())
}

/// Builds the credentials provider and the signer the options select:
/// a region switches to V4, otherwise V2.
pub(crate) fn build_signer(
    access_key_id: &str,
    access_key_secret: &str,
    options: &ClientOptions,
) -> Result<(Arc<dyn CredentialsProvider>, Arc<dyn RequestSigner>), ClientError> {
    let mut credentials = Credentials::new(access_key_id, access_key_secret);
    if let Some(token) = &options.security_token {
        credentials = credentials.with_security_token(token.clone());
    }
    let provider: Arc<dyn CredentialsProvider> =
        Arc::new(StaticCredentialsProvider::new(credentials));
    let signer: Arc<dyn RequestSigner> = match &options.region {
        Some(region) => Arc::new(SignerV4::new(
            provider.clone(),
            region.clone(),
            options.sign_date.as_deref(),
            options.auto_update_v4_sign,
        )?),
        None => Arc::new(SignerV2::new(provider.clone())),
    };
    Ok((provider, signer))
}
