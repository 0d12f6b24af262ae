//! HTTP transport abstraction injected into the client façades.
//!
//! The library never opens a socket itself. Both façades drive an injected
//! [`Transport`] that delivers one request and hands back the raw status and
//! body; TLS, connection pooling, timeouts and socket-level retries all live
//! inside the implementation.
//!
//! The two façades configure their transports differently, and that asymmetry
//! is part of the wire contract:
//!
//! * the Admin façade sends its bearer token as a `token` query parameter on
//!   every call, so its transport needs no credentials — only the
//!   `https://slack.com/api/` base;
//! * the SCIM façade sends no token at all and expects the transport to be
//!   pre-configured with an `Authorization: Bearer` header and the
//!   `https://api.slack.com/scim/v1/` base.

use crate::error::Error;
use std::future::Future;

/// Error type raised by transports on network-level failure.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// HTTP verbs accepted by the Admin and SCIM APIs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    /// All supported verbs, in a stable order.
    pub const ALL: [Method; 5] = [
        Method::Get,
        Method::Post,
        Method::Put,
        Method::Patch,
        Method::Delete,
    ];

    /// Wire representation of the verb.
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Method {
    type Err = Error;

    /// Parse a verb, case-insensitively.
    ///
    /// Anything outside the five supported verbs is [`Error::InvalidMethod`];
    /// that failure is fatal and never reaches the transport or the stats
    /// counters.
    fn from_str(s: &str) -> Result<Self, Error> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(Method::Get),
            "POST" => Ok(Method::Post),
            "PUT" => Ok(Method::Put),
            "PATCH" => Ok(Method::Patch),
            "DELETE" => Ok(Method::Delete),
            _ => Err(Error::InvalidMethod(s.to_string())),
        }
    }
}

/// A single outbound request handed to the transport.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    /// Verb to send
    pub method: Method,
    /// Path plus query string, relative to the transport's configured base URL
    pub url: String,
    /// Pre-serialized JSON body, when the endpoint takes one
    pub body: Option<String>,
}

/// Raw response handed back by the transport.
///
/// Non-2xx statuses are responses, not errors; classification into the error
/// taxonomy happens in the request runner.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// Numeric HTTP status code
    pub status: u16,
    /// Response body bytes, possibly empty
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Whether the status code falls in the 2xx range.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// One-shot HTTP capability injected into both façades.
///
/// # Contract
///
/// Implementations must resolve the relative `url` against their configured
/// base, attach whatever headers they are responsible for (authorization for
/// the SCIM surface, content type for bodied requests), and return `Ok` for
/// any delivered response regardless of status class. `Err` is reserved for
/// network-level failures where no response envelope exists at all.
pub trait Transport: Send + Sync {
    /// Deliver one request, returning the raw status and body.
    fn send(
        &self,
        request: HttpRequest,
    ) -> impl Future<Output = std::result::Result<HttpResponse, BoxError>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_method_round_trip() {
        for method in Method::ALL {
            assert_eq!(Method::from_str(method.as_str()).unwrap(), method);
        }
    }

    #[test]
    fn test_method_parse_is_case_insensitive() {
        assert_eq!(Method::from_str("get").unwrap(), Method::Get);
        assert_eq!(Method::from_str("Patch").unwrap(), Method::Patch);
    }

    #[test]
    fn test_unsupported_method_is_rejected() {
        let result = Method::from_str("TRACE");
        match result {
            Err(Error::InvalidMethod(verb)) => assert_eq!(verb, "TRACE"),
            other => panic!("expected InvalidMethod, got {:?}", other),
        }
    }

    #[test]
    fn test_success_status_bounds() {
        let mut response = HttpResponse {
            status: 200,
            body: Vec::new(),
        };
        assert!(response.is_success());
        response.status = 299;
        assert!(response.is_success());
        response.status = 300;
        assert!(!response.is_success());
        response.status = 199;
        assert!(!response.is_success());
    }
}
