//! Validated inputs for workspace creation.
//!
//! The Admin API rejects malformed workspace parameters server-side, but
//! only after a round trip and with less precise messages. These value
//! objects run the same checks locally so a bad input fails before any
//! request is issued. [`AdminClient::create_team`](crate::AdminClient::create_team)
//! applies the creation checks and every team-scoped method applies
//! [`TeamId`]; the types are public so callers can validate form input
//! without touching the network.

use crate::error::ValidationError;
use std::fmt;
use std::str::FromStr;

/// A validated workspace domain, the first label of the workspace URL.
///
/// Domains are 1-21 characters of lowercase letters, digits and hyphens,
/// with at least one letter.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TeamDomain(String);

impl TeamDomain {
    /// Validate and wrap a domain.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let well_formed = !value.is_empty()
            && value.len() <= 21
            && value
                .bytes()
                .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-')
            && value.bytes().any(|b| b.is_ascii_lowercase());
        if well_formed {
            Ok(Self(value))
        } else {
            Err(ValidationError::InvalidTeamDomain(value))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for TeamDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for TeamDomain {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for TeamDomain {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// A validated team id: `T` followed by 1-12 alphanumeric characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TeamId(String);

impl TeamId {
    /// Validate and wrap a team id.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let rest = value.strip_prefix('T');
        let well_formed = matches!(
            rest,
            Some(rest) if (1..=12).contains(&rest.len())
                && rest.bytes().all(|b| b.is_ascii_alphanumeric())
        );
        if well_formed {
            Ok(Self(value))
        } else {
            Err(ValidationError::InvalidTeamId(value))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for TeamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for TeamId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for TeamId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// A validated workspace name, 1-255 bytes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TeamName(String);

impl TeamName {
    /// Validate and wrap a workspace name.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if value.is_empty() || value.len() > 255 {
            Err(ValidationError::InvalidTeamName)
        } else {
            Ok(Self(value))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for TeamName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for TeamName {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// A validated workspace description, 1-255 bytes.
///
/// An empty description is allowed at the façade level and simply sent
/// as-is; this type represents the non-empty case.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TeamDescription(String);

impl TeamDescription {
    /// Validate and wrap a workspace description.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if value.is_empty() || value.len() > 255 {
            Err(ValidationError::InvalidTeamDescription)
        } else {
            Ok(Self(value))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for TeamDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for TeamDescription {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// Who can find and join a workspace.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Discoverability {
    Open,
    Closed,
    InviteOnly,
    #[default]
    Unlisted,
}

impl Discoverability {
    /// Wire representation of the setting.
    pub fn as_str(&self) -> &'static str {
        match self {
            Discoverability::Open => "open",
            Discoverability::Closed => "closed",
            Discoverability::InviteOnly => "invite_only",
            Discoverability::Unlisted => "unlisted",
        }
    }
}

impl fmt::Display for Discoverability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Discoverability {
    type Err = ValidationError;

    /// Parse a wire value. Matching is exact; the allowed values are
    /// `open`, `closed`, `invite_only` and `unlisted`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "open" => Ok(Discoverability::Open),
            "closed" => Ok(Discoverability::Closed),
            "invite_only" => Ok(Discoverability::InviteOnly),
            "unlisted" => Ok(Discoverability::Unlisted),
            other => Err(ValidationError::InvalidDiscoverability(other.to_string())),
        }
    }
}
