//! Workspace administration over the enterprise Admin API.
//!
//! This surface manages workspaces and the users inside them: listing
//! workspaces and their admins and owners, creating workspaces, assigning
//! and removing users, changing user roles, and resetting sessions. It is
//! distinct from [SCIM provisioning](crate::scim), which manages the user
//! and group records themselves.
//!
//! Authentication is a query-string `token` attached to every call by
//! [`AdminClient`], so the transport is configured with the
//! `https://slack.com/api/` base and nothing else. The token comes from an
//! enterprise admin installing an app with the `admin.teams:read`,
//! `admin.teams:write` and `admin.users:write` scopes.

mod client;
mod types;
pub mod validation;

pub use client::AdminClient;
pub use types::{PrimaryOwner, Team};
pub use validation::{Discoverability, TeamDescription, TeamDomain, TeamId, TeamName};
