//! Single-request execution shared by both client façades.
//!
//! The [`RequestRunner`] owns the injected transport and the request tally,
//! and funnels every call through one code path: count the attempt, log it,
//! deliver it, then normalize the outcome into the crate's error taxonomy.
//!
//! Classification works the same on both surfaces, with one extra step for
//! the Admin API:
//!
//! * a transport-level failure becomes [`Error::Transport`] wrapping the
//!   cause;
//! * a non-2xx response with a parseable `{"Errors": {...}}` body becomes
//!   [`Error::Api`] carrying the server's description and code;
//! * a non-2xx response with any other body becomes [`Error::Transport`]
//!   carrying the status;
//! * a 2xx Admin envelope with `ok: false` becomes [`Error::Api`] carrying
//!   the server's `error` string verbatim;
//! * a 2xx body that does not decode becomes [`Error::Transport`].

use crate::error::{Error, Result};
use crate::stats::{RequestCounter, RequestStats};
use crate::transport::{HttpRequest, HttpResponse, Method, Transport};
use log::{debug, trace};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

/// Structured error body returned by the SCIM surface on non-2xx statuses.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(rename = "Errors")]
    errors: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    description: String,
    #[serde(default)]
    code: Option<u16>,
}

/// Append query parameters to a relative path, preserving the caller's order.
///
/// Keys and values are form-encoded, which is what both remote surfaces
/// expect for SCIM filter expressions and Admin token parameters alike.
pub(crate) fn build_url<I, K, V>(path: &str, params: I) -> String
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut serializer = url::form_urlencoded::Serializer::new(String::new());
    for (key, value) in params {
        serializer.append_pair(key.as_ref(), value.as_ref());
    }
    let query = serializer.finish();
    if query.is_empty() {
        path.to_string()
    } else {
        format!("{path}?{query}")
    }
}

/// Serialize a request body to the JSON string handed to the transport.
pub(crate) fn encode_body<T: serde::Serialize>(payload: &T) -> Result<String> {
    serde_json::to_string(payload)
        .map_err(|e| Error::transport(format!("failed to encode request body: {e}")))
}

/// Executes requests for one façade: counts, sends, classifies.
pub(crate) struct RequestRunner<T> {
    transport: T,
    counter: RequestCounter,
}

impl<T: Transport> RequestRunner<T> {
    pub(crate) fn new(transport: T) -> Self {
        Self {
            transport,
            counter: RequestCounter::new(),
        }
    }

    /// Snapshot of this façade's request tally.
    pub(crate) fn stats(&self) -> RequestStats {
        self.counter.snapshot()
    }

    /// Deliver one request, counting the attempt before the transport runs.
    async fn dispatch(
        &self,
        method: Method,
        url: String,
        body: Option<String>,
    ) -> Result<HttpResponse> {
        self.counter.record(method);
        debug!("{} {}", method, url);
        if let Some(body) = &body {
            trace!("request body: {}", body);
        }

        let response = self
            .transport
            .send(HttpRequest { method, url, body })
            .await
            .map_err(|source| Error::Transport {
                status: None,
                message: source.to_string(),
                source: Some(source),
            })?;

        trace!("response status {}", response.status);
        Ok(response)
    }

    /// Classify a delivered non-2xx response.
    fn classify_failure(response: &HttpResponse) -> Error {
        match serde_json::from_slice::<ErrorBody>(&response.body) {
            Ok(body) => Error::Api {
                message: body.errors.description,
                status: body.errors.code.or(Some(response.status)),
                source: None,
            },
            Err(_) => Error::transport_status(
                response.status,
                format!("invalid response code: {}", response.status),
            ),
        }
    }

    fn malformed(status: Option<u16>, error: serde_json::Error) -> Error {
        Error::Transport {
            status,
            message: format!("malformed response body: {error}"),
            source: Some(Box::new(error)),
        }
    }

    /// Run an Admin call through the `ok`/`error` envelope, returning the
    /// decoded body on success.
    async fn admin_call(
        &self,
        method: Method,
        url: String,
        body: Option<String>,
    ) -> Result<Value> {
        let response = self.dispatch(method, url, body).await?;
        if !response.is_success() {
            return Err(Self::classify_failure(&response));
        }

        let value: Value = serde_json::from_slice(&response.body)
            .map_err(|e| Self::malformed(Some(response.status), e))?;
        match value.get("ok").and_then(Value::as_bool) {
            Some(true) => Ok(value),
            Some(false) => {
                let message = value
                    .get("error")
                    .and_then(Value::as_str)
                    .unwrap_or("unknown error");
                Err(Error::api(message))
            }
            None => Err(Error::transport_status(
                response.status,
                "response envelope missing \"ok\" field",
            )),
        }
    }

    /// Admin call whose envelope carries a payload beyond the `ok` flag.
    pub(crate) async fn send_admin<R: DeserializeOwned>(
        &self,
        method: Method,
        url: String,
        body: Option<String>,
    ) -> Result<R> {
        let value = self.admin_call(method, url, body).await?;
        serde_json::from_value(value).map_err(|e| Self::malformed(None, e))
    }

    /// Admin call acknowledged by the `ok` flag alone.
    pub(crate) async fn send_admin_ok(
        &self,
        method: Method,
        url: String,
        body: Option<String>,
    ) -> Result<()> {
        self.admin_call(method, url, body).await.map(|_| ())
    }

    /// SCIM call returning a typed payload.
    pub(crate) async fn send_scim<R: DeserializeOwned>(
        &self,
        method: Method,
        url: String,
        body: Option<String>,
    ) -> Result<R> {
        let response = self.dispatch(method, url, body).await?;
        if !response.is_success() {
            return Err(Self::classify_failure(&response));
        }
        serde_json::from_slice(&response.body)
            .map_err(|e| Self::malformed(Some(response.status), e))
    }

    /// SCIM call where only the status class matters.
    pub(crate) async fn send_scim_ok(
        &self,
        method: Method,
        url: String,
        body: Option<String>,
    ) -> Result<()> {
        let response = self.dispatch(method, url, body).await?;
        if !response.is_success() {
            return Err(Self::classify_failure(&response));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::BoxError;
    use serde_json::json;
    use std::collections::VecDeque;
    use std::future::Future;
    use std::sync::Mutex;

    /// Scripted transport that replays queued outcomes in order.
    struct StubTransport {
        script: Mutex<VecDeque<std::result::Result<HttpResponse, String>>>,
        seen: Mutex<Vec<HttpRequest>>,
    }

    impl StubTransport {
        fn new(script: Vec<std::result::Result<HttpResponse, String>>) -> Self {
            Self {
                script: Mutex::new(script.into()),
                seen: Mutex::new(Vec::new()),
            }
        }

        fn ok(status: u16, body: Value) -> std::result::Result<HttpResponse, String> {
            Ok(HttpResponse {
                status,
                body: body.to_string().into_bytes(),
            })
        }

        fn requests(&self) -> Vec<HttpRequest> {
            self.seen.lock().unwrap().clone()
        }
    }

    impl Transport for StubTransport {
        fn send(
            &self,
            request: HttpRequest,
        ) -> impl Future<Output = std::result::Result<HttpResponse, BoxError>> + Send {
            self.seen.lock().unwrap().push(request);
            let next = self.script.lock().unwrap().pop_front();
            async move {
                match next {
                    Some(Ok(response)) => Ok(response),
                    Some(Err(message)) => Err(message.into()),
                    None => panic!("transport called more times than scripted"),
                }
            }
        }
    }

    #[test]
    fn test_build_url_encodes_and_preserves_order() {
        let url = build_url(
            "Users",
            [
                ("filter", "userName eq \"bob\""),
                ("startIndex", "1"),
                ("count", "500"),
            ],
        );
        assert_eq!(
            url,
            "Users?filter=userName+eq+%22bob%22&startIndex=1&count=500"
        );
    }

    #[test]
    fn test_build_url_without_params() {
        let url = build_url("admin.teams.list", std::iter::empty::<(&str, &str)>());
        assert_eq!(url, "admin.teams.list");
    }

    #[tokio::test]
    async fn test_admin_ok_envelope_decodes_payload() {
        #[derive(Debug, Deserialize)]
        struct Payload {
            team: String,
        }

        let transport = StubTransport::new(vec![StubTransport::ok(
            200,
            json!({"ok": true, "team": "T1234"}),
        )]);
        let runner = RequestRunner::new(transport);

        let payload: Payload = runner
            .send_admin(Method::Post, "admin.teams.create".into(), None)
            .await
            .unwrap();
        assert_eq!(payload.team, "T1234");
        assert_eq!(runner.stats().post, 1);
    }

    #[tokio::test]
    async fn test_admin_logical_failure_preserves_error_string() {
        let transport = StubTransport::new(vec![StubTransport::ok(
            200,
            json!({"ok": false, "error": "feature_not_enabled"}),
        )]);
        let runner = RequestRunner::new(transport);

        let result = runner
            .send_admin_ok(Method::Post, "admin.teams.create".into(), None)
            .await;
        match result {
            Err(Error::Api { message, .. }) => assert_eq!(message, "feature_not_enabled"),
            other => panic!("expected Api error, got {:?}", other),
        }
        // the attempt still counts
        assert_eq!(runner.stats().total, 1);
    }

    #[tokio::test]
    async fn test_scim_failure_body_becomes_api_error() {
        let transport = StubTransport::new(vec![StubTransport::ok(
            404,
            json!({"Errors": {"description": "User not found", "code": 404}}),
        )]);
        let runner = RequestRunner::new(transport);

        let result = runner
            .send_scim_ok(Method::Get, "Users/U404".into(), None)
            .await;
        match result {
            Err(Error::Api { message, status, .. }) => {
                assert_eq!(message, "User not found");
                assert_eq!(status, Some(404));
            }
            other => panic!("expected Api error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unparseable_failure_becomes_transport_error() {
        let transport = StubTransport::new(vec![Ok(HttpResponse {
            status: 502,
            body: b"<html>Bad Gateway</html>".to_vec(),
        })]);
        let runner = RequestRunner::new(transport);

        let result = runner
            .send_scim_ok(Method::Delete, "Groups/G1".into(), None)
            .await;
        match result {
            Err(Error::Transport { status, .. }) => assert_eq!(status, Some(502)),
            other => panic!("expected Transport error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_network_failure_wraps_cause_and_still_counts() {
        let transport = StubTransport::new(vec![Err("connection reset by peer".to_string())]);
        let runner = RequestRunner::new(transport);

        let result = runner
            .send_admin_ok(Method::Post, "admin.users.assign".into(), None)
            .await;
        match result {
            Err(Error::Transport {
                status,
                message,
                source,
            }) => {
                assert_eq!(status, None);
                assert!(message.contains("connection reset"));
                assert!(source.is_some());
            }
            other => panic!("expected Transport error, got {:?}", other),
        }
        assert_eq!(runner.stats().post, 1);
        assert_eq!(runner.stats().total, 1);
    }

    #[tokio::test]
    async fn test_envelope_without_ok_field_is_malformed() {
        let transport =
            StubTransport::new(vec![StubTransport::ok(200, json!({"unexpected": true}))]);
        let runner = RequestRunner::new(transport);

        let result = runner
            .send_admin_ok(Method::Get, "admin.teams.list".into(), None)
            .await;
        assert!(matches!(result, Err(Error::Transport { .. })));
    }

    #[tokio::test]
    async fn test_scim_payload_decodes_directly() {
        #[derive(Debug, Deserialize)]
        struct User {
            id: String,
        }

        let transport =
            StubTransport::new(vec![StubTransport::ok(200, json!({"id": "U0123"}))]);
        let runner = RequestRunner::new(transport);

        let user: User = runner
            .send_scim(Method::Get, "Users/U0123".into(), None)
            .await
            .unwrap();
        assert_eq!(user.id, "U0123");
    }

    #[tokio::test]
    async fn test_request_body_reaches_transport() {
        let transport = StubTransport::new(vec![StubTransport::ok(200, json!({"ok": true}))]);
        let runner = RequestRunner::new(transport);

        let body = encode_body(&json!({"userName": "clevelas"})).unwrap();
        runner
            .send_admin_ok(Method::Post, "admin.users.assign".into(), Some(body))
            .await
            .unwrap();

        let seen = runner.transport.requests();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].method, Method::Post);
        assert_eq!(
            seen[0].body.as_deref(),
            Some("{\"userName\":\"clevelas\"}")
        );
    }
}
