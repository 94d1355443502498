//! Blocking Tablestore client.

use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

use chrono::Utc;
use http::Method;
use serde::{Serialize, de::DeserializeOwned};
use tablestack_auth::{CredentialsProvider, RequestSigner};
use tablestack_model::{
    BatchGetRowRequest, BatchGetRowResult, BatchWriteRowRequest, BatchWriteRowResult,
    CapacityUnit, Row, WireBatchGetRowResponse, WireBatchWriteRowResponse,
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
use crate::transport::{RawRequest, Transport};
use crate::validate::{build_signer, validate_args};

/// Blocking client for the Tablestore row operations.
///
/// The client owns no sockets: it encodes, signs and parses, and hands the
/// exchange itself to the supplied [`Transport`].
pub struct TableStoreClient<T: Transport, C: WireCodec = JsonCodec> {
    transport: T,
    codec: C,
    instance_name: String,
    credentials: Arc<dyn CredentialsProvider>,
    signer: Arc<dyn RequestSigner>,
    options: ClientOptions,
    transport_options: TransportOptions,
}

impl<T: Transport, C: WireCodec> fmt::Debug for TableStoreClient<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TableStoreClient")
            .field("instance_name", &self.instance_name)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl<T: Transport> TableStoreClient<T, JsonCodec> {
    /// Creates a client with the default JSON codec.
    ///
    /// Arguments are validated in order; the first failure is returned as a
    /// [`ClientError::Validation`] before anything touches the transport.
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

impl<T: Transport, C: WireCodec> TableStoreClient<T, C> {
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
        })
    }

    fn call<Req, Resp>(
        &self,
        operation: &str,
        request: &Req,
        idempotent: bool,
    ) -> Result<Resp, ClientError>
    where
        Req: Serialize,
        Resp: DeserializeOwned,
    {
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
            let outcome = self
                .transport
                .send(&raw, &self.transport_options)
                .and_then(|response| protocol::parse_response(&self.codec, &response));
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
                            std::thread::sleep(delay);
                            attempt += 1;
                        }
                        None => return Err(error),
                    }
                }
            }
        }
    }

    /// Writes a whole row.
    pub fn put_row(&self, request: &PutRowRequest) -> Result<WriteRowResponse, ClientError> {
        request.condition.validate()?;
        self.call("/PutRow", request, false)
    }

    /// Reads one row by primary key.
    pub fn get_row(&self, request: &GetRowRequest) -> Result<RowResponse, ClientError> {
        if let Some(filter) = &request.column_filter {
            filter.validate()?;
        }
        self.call("/GetRow", request, true)
    }

    /// Applies a partial update to a row.
    pub fn update_row(&self, request: &UpdateRowRequest) -> Result<WriteRowResponse, ClientError> {
        request.condition.validate()?;
        self.call("/UpdateRow", request, false)
    }

    /// Deletes a row.
    pub fn delete_row(&self, request: &DeleteRowRequest) -> Result<WriteRowResponse, ClientError> {
        request.condition.validate()?;
        self.call("/DeleteRow", request, false)
    }

    /// Executes a multi-table batch write. Item failures land in the
    /// result's slots; only whole-request failures return an error.
    pub fn batch_write_row(
        &self,
        request: &BatchWriteRowRequest,
    ) -> Result<BatchWriteRowResult, ClientError> {
        request.validate()?;
        let wire: WireBatchWriteRowResponse = self.call("/BatchWriteRow", request, false)?;
        Ok(BatchWriteRowResult::from_wire(request, wire)?)
    }

    /// Executes a multi-table batch get.
    pub fn batch_get_row(
        &self,
        request: &BatchGetRowRequest,
    ) -> Result<BatchGetRowResult, ClientError> {
        request.validate()?;
        let wire: WireBatchGetRowResponse = self.call("/BatchGetRow", request, true)?;
        Ok(BatchGetRowResult::from_wire(request, wire)?)
    }

    /// Fetches one page of a range scan.
    pub fn get_range(&self, request: &GetRangeRequest) -> Result<GetRangeResponse, ClientError> {
        if let Some(filter) = &request.column_filter {
            filter.validate()?;
        }
        self.call("/GetRange", request, true)
    }

    /// Scans a whole range, following continuation tokens page by page.
    pub fn xget_range(&self, request: GetRangeRequest) -> Result<RangeIter<'_, T, C>, ClientError> {
        Ok(RangeIter {
            client: self,
            cursor: RangeCursor::new(request)?,
            buffer: VecDeque::new(),
            failed: false,
        })
    }
}

/// Single-pass row iterator over a range scan.
///
/// Yields one `Err` and then ends if a page fails; dropping it early is
/// safe.
pub struct RangeIter<'a, T: Transport, C: WireCodec> {
    client: &'a TableStoreClient<T, C>,
    cursor: RangeCursor,
    buffer: VecDeque<Row>,
    failed: bool,
}

impl<T: Transport, C: WireCodec> fmt::Debug for RangeIter<'_, T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RangeIter")
            .field("cursor", &self.cursor)
            .field("failed", &self.failed)
            .finish_non_exhaustive()
    }
}

impl<T: Transport, C: WireCodec> RangeIter<'_, T, C> {
    /// Capacity consumed by the pages fetched so far.
    pub fn consumed(&self) -> CapacityUnit {
        self.cursor.consumed()
    }
}

impl<T: Transport, C: WireCodec> Iterator for RangeIter<'_, T, C> {
    type Item = Result<Row, ClientError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(row) = self.buffer.pop_front() {
                return Some(Ok(row));
            }
            if self.failed {
                return None;
            }
            let request = self.cursor.next_request()?.clone();
            let outcome = self
                .client
                .call::<_, GetRangeResponse>("/GetRange", &request, true)
                .and_then(|response| self.cursor.absorb(response));
            match outcome {
                // An empty page with a continuation token just loops on.
                Ok(rows) => self.buffer.extend(rows),
                Err(error) => {
                    self.failed = true;
                    return Some(Err(error));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::time::Duration;

    use bytes::Bytes;
    use http::StatusCode;
    use parking_lot::Mutex;
    use tablestack_model::{
        Column, ColumnValue, Condition, PrimaryKey, PrimaryKeyColumn, PrimaryKeyValue, RowChange,
        TableInBatchWriteRowItem, WireError, WireRowResult, WireTableResult,
    };

    use super::*;
    use crate::retry::DefaultRetryPolicy;
    use crate::transport::RawResponse;

    struct MockTransport {
        responses: Mutex<VecDeque<Result<RawResponse, ClientError>>>,
        requests: Mutex<Vec<RawRequest>>,
    }

    impl MockTransport {
        fn new(responses: Vec<Result<RawResponse, ClientError>>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
                requests: Mutex::new(Vec::new()),
            }
        }

        fn ok(body: &impl Serialize) -> Result<RawResponse, ClientError> {
            Ok(RawResponse {
                status: StatusCode::OK,
                headers: BTreeMap::new(),
                body: Bytes::from(serde_json::to_vec(body).unwrap()),
            })
        }

        fn error(status: u16, code: &str, message: &str) -> Result<RawResponse, ClientError> {
            Ok(RawResponse {
                status: StatusCode::from_u16(status).unwrap(),
                headers: BTreeMap::new(),
                body: Bytes::from(format!(r#"{{"code":"{code}","message":"{message}"}}"#)),
            })
        }
    }

    impl Transport for MockTransport {
        fn send(
            &self,
            request: &RawRequest,
            _options: &TransportOptions,
        ) -> Result<RawResponse, ClientError> {
            self.requests.lock().push(request.clone());
            self.responses
                .lock()
                .pop_front()
                .unwrap_or_else(|| Err(ClientError::Transport("script exhausted".into())))
        }
    }

    fn client(
        transport: MockTransport,
    ) -> TableStoreClient<MockTransport, JsonCodec> {
        TableStoreClient::new(
            transport,
            "https://instance.cn-hangzhou.ots.aliyun.com",
            "test_id",
            "test_key",
            "instance",
            ClientOptions::default(),
        )
        .unwrap()
    }

    fn pk(uid: i64) -> PrimaryKey {
        vec![PrimaryKeyColumn::new("uid", PrimaryKeyValue::Integer(uid))]
    }

    fn row(uid: i64) -> Row {
        Row::new(pk(uid), vec![Column::new("v", ColumnValue::Integer(uid))])
    }

    #[test]
    fn test_should_validate_constructor_arguments_in_order() {
        let cases = [
            (("", "id", "key", "i"), "end_point is not str or is empty."),
            (
                ("ftp://x", "id", "key", "i"),
                "protocol of end_point must be 'http' or 'https', e.g. https://instance.cn-hangzhou.ots.aliyun.com.",
            ),
            (("https://x", "", "key", "i"), "access_key_id is not str or is empty."),
            (("https://x", "id", "", "i"), "access_key_secret is not str or is empty."),
            (("https://x", "id", "key", ""), "instance_name is not str or is empty."),
        ];
        for ((endpoint, id, secret, instance), message) in cases {
            let err = TableStoreClient::new(
                MockTransport::new(vec![]),
                endpoint,
                id,
                secret,
                instance,
                ClientOptions::default(),
            )
            .unwrap_err();
            assert_eq!(err, ClientError::Validation(message.to_string()));
        }

        let err = TableStoreClient::new(
            MockTransport::new(vec![]),
            "https://x",
            "id",
            "key",
            "i",
            ClientOptions {
                region: Some(String::new()),
                ..ClientOptions::default()
            },
        )
        .unwrap_err();
        assert_eq!(
            err,
            ClientError::Validation("region is not str or is empty.".to_string())
        );
    }

    #[test]
    fn test_should_render_debug_without_credentials() {
        let client = client(MockTransport::new(vec![]));
        let rendered = format!("{client:?}");
        assert!(rendered.contains("TableStoreClient"));
        assert!(!rendered.contains("test_key"));
    }

    #[test]
    fn test_should_put_row_with_signed_headers() {
        let response = WriteRowResponse {
            consumed: CapacityUnit::new(0, 1),
        };
        let client = client(MockTransport::new(vec![MockTransport::ok(&response)]));

        let result = client
            .put_row(&PutRowRequest {
                table_name: "t0".into(),
                row: row(1),
                condition: Condition::expect_not_exist(),
            })
            .unwrap();
        assert_eq!(result.consumed, CapacityUnit::new(0, 1));

        let requests = client.transport.requests.lock();
        assert_eq!(requests.len(), 1);
        let sent = &requests[0];
        assert_eq!(sent.path, "/PutRow");
        assert_eq!(sent.method, Method::POST);
        assert!(sent.headers.contains_key("x-ots-signature"));
        assert_eq!(
            sent.headers.get("x-ots-apiversion").map(String::as_str),
            Some(protocol::API_VERSION)
        );
        assert_eq!(
            sent.headers.get("x-ots-contentmd5").map(String::as_str),
            Some(protocol::content_md5(&sent.body).as_str())
        );
    }

    #[test]
    fn test_should_sign_with_v4_when_region_is_set() {
        let response = WriteRowResponse {
            consumed: CapacityUnit::new(0, 1),
        };
        let transport = MockTransport::new(vec![MockTransport::ok(&response)]);
        let client = TableStoreClient::new(
            transport,
            "https://instance.cn-hangzhou.ots.aliyun.com",
            "test_id",
            "test_key",
            "instance",
            ClientOptions {
                region: Some("cn-hangzhou".into()),
                sign_date: Some("20250410".into()),
                auto_update_v4_sign: false,
                ..ClientOptions::default()
            },
        )
        .unwrap();

        client
            .delete_row(&DeleteRowRequest {
                table_name: "t0".into(),
                primary_key: pk(1),
                condition: Condition::ignore(),
            })
            .unwrap();

        let requests = client.transport.requests.lock();
        let sent = &requests[0];
        assert!(sent.headers.contains_key("x-ots-signaturev4"));
        assert!(!sent.headers.contains_key("x-ots-signature"));
        assert_eq!(
            sent.headers.get("x-ots-signdate").map(String::as_str),
            Some("20250410")
        );
        assert_eq!(
            sent.headers.get("x-ots-signregion").map(String::as_str),
            Some("cn-hangzhou")
        );
    }

    #[test]
    fn test_should_surface_condition_check_failure() {
        let client = client(MockTransport::new(vec![MockTransport::error(
            403,
            "OTSConditionCheckFail",
            "Condition check failed.",
        )]));
        let err = client
            .put_row(&PutRowRequest {
                table_name: "t0".into(),
                row: row(1),
                condition: Condition::expect_exist(),
            })
            .unwrap_err();
        match err {
            ClientError::Service(service) => {
                assert_eq!(service.status, 403);
                assert_eq!(service.code, "OTSConditionCheckFail");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_should_retry_transient_failures_of_reads() {
        let response = RowResponse {
            consumed: CapacityUnit::new(1, 0),
            row: Some(row(1)),
        };
        let transport = MockTransport::new(vec![
            MockTransport::error(503, "OTSServerBusy", "busy"),
            MockTransport::ok(&response),
        ]);
        let client = TableStoreClient::new(
            transport,
            "https://x",
            "id",
            "key",
            "i",
            ClientOptions {
                retry_policy: Arc::new(DefaultRetryPolicy {
                    base_delay: Duration::from_millis(1),
                    ..DefaultRetryPolicy::default()
                }),
                ..ClientOptions::default()
            },
        )
        .unwrap();

        let result = client.get_row(&GetRowRequest::new("t0", pk(1))).unwrap();
        assert_eq!(result.row, Some(row(1)));
        assert_eq!(client.transport.requests.lock().len(), 2);
    }

    #[test]
    fn test_should_not_retry_writes() {
        let client = client(MockTransport::new(vec![MockTransport::error(
            503,
            "OTSServerBusy",
            "busy",
        )]));
        let err = client
            .put_row(&PutRowRequest {
                table_name: "t0".into(),
                row: row(1),
                condition: Condition::ignore(),
            })
            .unwrap_err();
        assert!(err.is_retryable());
        assert_eq!(client.transport.requests.lock().len(), 1);
    }

    #[test]
    fn test_should_align_batch_write_results_with_request() {
        let wire = WireBatchWriteRowResponse {
            tables: vec![WireTableResult {
                table_name: "t0".into(),
                rows: vec![
                    WireRowResult {
                        is_ok: true,
                        error: None,
                        consumed: Some(CapacityUnit::new(0, 1)),
                        row: None,
                    },
                    WireRowResult {
                        is_ok: false,
                        error: Some(WireError {
                            code: "OTSConditionCheckFail".into(),
                            message: "Condition check failed.".into(),
                        }),
                        consumed: None,
                        row: None,
                    },
                ],
            }],
        };
        let client = client(MockTransport::new(vec![MockTransport::ok(&wire)]));

        let mut request = BatchWriteRowRequest::new();
        request.add(TableInBatchWriteRowItem::new(
            "t0",
            vec![
                RowChange::Put {
                    row: row(0),
                    condition: Condition::ignore(),
                },
                RowChange::Delete {
                    primary_key: pk(1),
                    condition: Condition::expect_exist(),
                },
            ],
        ));

        let result = client.batch_write_row(&request).unwrap();
        assert!(!result.is_all_succeed());
        assert_eq!(result.get_succeed_of_put().len(), 1);
        assert_eq!(result.get_failed_of_delete().len(), 1);
    }

    #[test]
    fn test_should_follow_range_continuation_tokens() {
        let page1 = GetRangeResponse {
            consumed: CapacityUnit::new(1, 0),
            rows: vec![row(0), row(1)],
            next_start_primary_key: Some(pk(2)),
        };
        let page2 = GetRangeResponse {
            consumed: CapacityUnit::new(1, 0),
            rows: vec![row(2)],
            next_start_primary_key: None,
        };
        let client = client(MockTransport::new(vec![
            MockTransport::ok(&page1),
            MockTransport::ok(&page2),
        ]));

        let request = GetRangeRequest::new(
            "t0",
            vec![PrimaryKeyColumn::new("uid", PrimaryKeyValue::InfMin)],
            vec![PrimaryKeyColumn::new("uid", PrimaryKeyValue::InfMax)],
        );
        let mut iter = client.xget_range(request).unwrap();
        let rows: Vec<Row> = iter.by_ref().map(Result::unwrap).collect();
        assert_eq!(rows, vec![row(0), row(1), row(2)]);
        assert_eq!(iter.consumed(), CapacityUnit::new(2, 0));

        // The second request must start at the continuation token.
        let requests = client.transport.requests.lock();
        assert_eq!(requests.len(), 2);
        let second: GetRangeRequest = serde_json::from_slice(&requests[1].body).unwrap();
        assert_eq!(second.inclusive_start_primary_key, pk(2));
    }

    #[test]
    fn test_should_yield_single_error_then_stop() {
        let client = client(MockTransport::new(vec![MockTransport::error(
            404,
            "OTSObjectNotExist",
            "Requested table not exist.",
        )]));
        let request = GetRangeRequest::new("t0", pk(0), pk(9));
        let mut iter = client.xget_range(request).unwrap();
        assert!(matches!(iter.next(), Some(Err(ClientError::Service(_)))));
        assert!(iter.next().is_none());
    }
}
