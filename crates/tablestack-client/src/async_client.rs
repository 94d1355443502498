//! Non-blocking Tablestore client.
//!
//! Observable semantics match the blocking client operation for operation;
//! only the execution model differs. Concurrent operations interleave
//! freely and signing-key rotation stays safe under concurrency.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::Utc;
use http::Method;
use serde::{Serialize, de::DeserializeOwned};
use tablestack_auth::{CredentialsProvider, RequestSigner};
use tablestack_model::{
    BatchGetRowRequest, BatchGetRowResult, BatchWriteRowRequest, BatchWriteRowResult, Row,
    WireBatchGetRowResponse, WireBatchWriteRowResponse,
};
use tracing::debug;

use crate::codec::{JsonCodec, WireCodec};
use crate::config::{ClientOptions, TransportOptions};
use crate::error::ClientError;
use crate::operations::{
    DeleteRowRequest, GetRangeRequest, GetRangeResponse, GetRowRequest, PutRowRequest,
    RowResponse, UpdateRowRequest, WriteRowResponse,
};
use crate::protocol;
use crate::range::RangeCursor;
use crate::transport::{AsyncTransport, RawRequest};
use crate::validate::{build_signer, validate_args};

const ERR_CLOSED: &str = "client has been closed.";

/// Non-blocking client for the Tablestore row operations.
pub struct AsyncTableStoreClient<T: AsyncTransport, C: WireCodec = JsonCodec> {
    transport: T,
    codec: C,
    instance_name: String,
    credentials: Arc<dyn CredentialsProvider>,
    signer: Arc<dyn RequestSigner>,
    options: ClientOptions,
    transport_options: TransportOptions,
    closed: AtomicBool,
}

impl<T: AsyncTransport, C: WireCodec> fmt::Debug for AsyncTableStoreClient<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AsyncTableStoreClient")
            .field("instance_name", &self.instance_name)
            .field("options", &self.options)
            .field("closed", &self.closed)
            .finish_non_exhaustive()
    }
}

impl<T: AsyncTransport> AsyncTableStoreClient<T, JsonCodec> {
    /// Creates a client with the default JSON codec. Validation is
    /// identical to the blocking client and happens synchronously.
    pub fn new(
        transport: T,
        endpoint: &str,
        access_key_id: &str,
        access_key_secret: &str,
        instance_name: &str,
        options: ClientOptions,
    ) -> Result<Self, ClientError> {
        Self::with_codec(
            transport,
            JsonCodec,
            endpoint,
            access_key_id,
            access_key_secret,
            instance_name,
            options,
        )
    }
}

impl<T: AsyncTransport, C: WireCodec> AsyncTableStoreClient<T, C> {
    /// Creates a client with an explicit wire codec.
    pub fn with_codec(
        transport: T,
        codec: C,
        endpoint: &str,
        access_key_id: &str,
        access_key_secret: &str,
        instance_name: &str,
        options: ClientOptions,
    ) -> Result<Self, ClientError> {
        validate_args(endpoint, access_key_id, access_key_secret, instance_name, &options)?;
        let (credentials, signer) = build_signer(access_key_id, access_key_secret, &options)?;
        let transport_options = options.transport_options();
        Ok(Self {
            transport,
            codec,
            instance_name: instance_name.to_string(),
            credentials,
            signer,
            options,
            transport_options,
            closed: AtomicBool::new(false),
        })
    }

    /// Releases the transport. Further operations fail with a validation
    /// error.
    pub async fn close(&self) -> Result<(), ClientError> {
        self.closed.store(true, Ordering::SeqCst);
        self.transport.close().await
    }

    async fn call<Req, Resp>(
        &self,
        operation: &str,
        request: &Req,
        idempotent: bool,
    ) -> Result<Resp, ClientError>
    where
        Req: Serialize + Sync,
        Resp: DeserializeOwned,
    {
        if self.closed.load(Ordering::SeqCst) {
            return Err(ClientError::Validation(ERR_CLOSED.to_string()));
        }
        let body = self.codec.encode(request)?;
        let mut attempt = 0u32;
        loop {
            let credentials = self.credentials.credentials();
            let mut headers = protocol::build_headers(
                &credentials.access_key_id,
                &self.instance_name,
                credentials.security_token.as_deref(),
                Utc::now(),
                &body,
            );
            self.signer.sign_request(operation, &mut headers);
            let raw = RawRequest {
                method: Method::POST,
                path: operation.to_string(),
                headers,
                body: body.clone(),
            };
            debug!(operation, attempt, "sending request");
            let outcome = match self.transport.send(&raw, &self.transport_options).await {
                Ok(response) => protocol::parse_response(&self.codec, &response),
                Err(error) => Err(error),
            };
            match outcome {
                Ok(response) => return Ok(response),
                Err(error) => {
                    match self
                        .options
                        .retry_policy
                        .should_retry(attempt, &error, idempotent)
                    {
                        Some(delay) => {
                            debug!(operation, attempt, ?delay, "retrying after failure");
                            tokio::time::sleep(delay).await;
                            attempt += 1;
                        }
                        None => return Err(error),
                    }
                }
            }
        }
    }

    /// Writes a whole row.
    pub async fn put_row(&self, request: &PutRowRequest) -> Result<WriteRowResponse, ClientError> {
        request.condition.validate()?;
        self.call("/PutRow", request, false).await
    }

    /// Reads one row by primary key.
    pub async fn get_row(&self, request: &GetRowRequest) -> Result<RowResponse, ClientError> {
        if let Some(filter) = &request.column_filter {
            filter.validate()?;
        }
        self.call("/GetRow", request, true).await
    }

    /// Applies a partial update to a row.
    pub async fn update_row(
        &self,
        request: &UpdateRowRequest,
    ) -> Result<WriteRowResponse, ClientError> {
        request.condition.validate()?;
        self.call("/UpdateRow", request, false).await
    }

    /// Deletes a row.
    pub async fn delete_row(
        &self,
        request: &DeleteRowRequest,
    ) -> Result<WriteRowResponse, ClientError> {
        request.condition.validate()?;
        self.call("/DeleteRow", request, false).await
    }

    /// Executes a multi-table batch write.
    pub async fn batch_write_row(
        &self,
        request: &BatchWriteRowRequest,
    ) -> Result<BatchWriteRowResult, ClientError> {
        request.validate()?;
        let wire: WireBatchWriteRowResponse = self.call("/BatchWriteRow", request, false).await?;
        Ok(BatchWriteRowResult::from_wire(request, wire)?)
    }

    /// Executes a multi-table batch get.
    pub async fn batch_get_row(
        &self,
        request: &BatchGetRowRequest,
    ) -> Result<BatchGetRowResult, ClientError> {
        request.validate()?;
        let wire: WireBatchGetRowResponse = self.call("/BatchGetRow", request, true).await?;
        Ok(BatchGetRowResult::from_wire(request, wire)?)
    }

    /// Fetches one page of a range scan.
    pub async fn get_range(
        &self,
        request: &GetRangeRequest,
    ) -> Result<GetRangeResponse, ClientError> {
        if let Some(filter) = &request.column_filter {
            filter.validate()?;
        }
        self.call("/GetRange", request, true).await
    }

    /// Scans a whole range, following continuation tokens, and collects the
    /// rows. Stops at the first failing page.
    pub async fn xget_range(&self, request: GetRangeRequest) -> Result<Vec<Row>, ClientError> {
        let mut cursor = RangeCursor::new(request)?;
        let mut rows = Vec::new();
        while let Some(page_request) = cursor.next_request().cloned() {
            let response: GetRangeResponse = self.call("/GetRange", &page_request, true).await?;
            rows.extend(cursor.absorb(response)?);
        }
        Ok(rows)
    }
}
