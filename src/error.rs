//! Error types for Slack Admin and SCIM client operations.
//!
//! Both client façades report failures through the same [`Error`] enum so
//! callers can match on the condition that was detected rather than on
//! server message text. Pre-flight input problems are carried separately in
//! [`ValidationError`] and are raised before any network traffic.

/// Main error type for Admin and SCIM operations.
///
/// Each variant corresponds to a distinct failure condition detected at a
/// specific point in the request lifecycle; none of them are retried by the
/// library.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Caller supplied an HTTP verb outside the five the remote APIs accept.
    #[error("invalid HTTP method: {0}")]
    InvalidMethod(String),

    /// Network-level failure, or a response whose body could not be decoded.
    ///
    /// Carries the numeric status code when one was received before the
    /// failure was detected.
    #[error("transport error: {message}")]
    Transport {
        /// HTTP status code, if a response envelope was received at all
        status: Option<u16>,
        /// Description of the failure
        message: String,
        /// Underlying cause, when one exists
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The service accepted the HTTP request but reported a logical failure.
    ///
    /// For the Admin API this is an `ok: false` envelope; for SCIM it is any
    /// non-2xx status. The server-supplied message is preserved verbatim.
    #[error("API error: {message}")]
    Api {
        /// Server-supplied error description
        message: String,
        /// Error code or HTTP status reported alongside the message
        status: Option<u16>,
        /// Underlying cause, when the failure wraps an earlier one
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A user lookup did not resolve to exactly one user.
    #[error("user not found: {lookup}")]
    UserNotFound {
        /// The name or id that was looked up
        lookup: String,
    },

    /// A group lookup did not resolve to exactly one group.
    #[error("group not found: {lookup}")]
    GroupNotFound {
        /// The name or id that was looked up
        lookup: String,
    },

    /// A client-side input failed a pre-flight check.
    ///
    /// Raised before any request is issued; the stats counters are not
    /// touched.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),
}

/// Input validation failures detected before any network call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// Team domain must be 1-21 lowercase letters, digits or hyphens and
    /// contain at least one letter.
    #[error("invalid team domain '{0}'")]
    InvalidTeamDomain(String),

    /// Team id must be `T` followed by 1-12 alphanumeric characters.
    #[error("invalid team id '{0}'")]
    InvalidTeamId(String),

    /// Team name must be non-empty and under 256 characters.
    #[error("invalid team name: must be 1-255 characters")]
    InvalidTeamName,

    /// Team description must be non-empty and under 256 characters.
    #[error("invalid team description: must be 1-255 characters")]
    InvalidTeamDescription,

    /// Discoverability must be one of the fixed set of settings.
    #[error("invalid discoverability '{0}', allowed values: open, closed, invite_only, unlisted")]
    InvalidDiscoverability(String),

    /// Session resets may target mobile sessions or web sessions, not both.
    #[error("cannot specify both mobile-only and web-only")]
    ConflictingSessionScope,

    /// A patch request carried no attributes to update.
    #[error("no attributes to update")]
    EmptyPatch,
}

// Convenience constructors, mirroring how call sites actually fail
impl Error {
    /// Transport failure with no response received.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            status: None,
            message: message.into(),
            source: None,
        }
    }

    /// Transport failure after a response with the given status arrived.
    pub fn transport_status(status: u16, message: impl Into<String>) -> Self {
        Self::Transport {
            status: Some(status),
            message: message.into(),
            source: None,
        }
    }

    /// Transport failure wrapping the error raised by the injected transport.
    pub fn transport_source<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Transport {
            status: None,
            message: error.to_string(),
            source: Some(Box::new(error)),
        }
    }

    /// Logical API failure with the server-supplied message.
    pub fn api(message: impl Into<String>) -> Self {
        Self::Api {
            message: message.into(),
            status: None,
            source: None,
        }
    }

    /// Logical API failure carrying a server error code.
    pub fn api_status(message: impl Into<String>, status: u16) -> Self {
        Self::Api {
            message: message.into(),
            status: Some(status),
            source: None,
        }
    }

    /// Logical API failure wrapping an earlier error.
    pub fn api_source(message: impl Into<String>, source: Error) -> Self {
        Self::Api {
            message: message.into(),
            status: None,
            source: Some(Box::new(source)),
        }
    }

    /// Failed user lookup.
    pub fn user_not_found(lookup: impl Into<String>) -> Self {
        Self::UserNotFound {
            lookup: lookup.into(),
        }
    }

    /// Failed group lookup.
    pub fn group_not_found(lookup: impl Into<String>) -> Self {
        Self::GroupNotFound {
            lookup: lookup.into(),
        }
    }

    /// The status code attached to this error, when one exists.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Transport { status, .. } | Self::Api { status, .. } => *status,
            _ => None,
        }
    }

    /// Whether this error is one of the not-found kinds.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::UserNotFound { .. } | Self::GroupNotFound { .. })
    }
}

/// Result type alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
