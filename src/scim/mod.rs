//! Identity provisioning over the SCIM 1.0 API.
//!
//! This surface manages the user and group records of the enterprise grid:
//! resolving users and groups by name or id, listing them, provisioning and
//! updating users, toggling account activation, and maintaining IDP group
//! membership. Workspace-level administration lives on the
//! [Admin surface](crate::admin).
//!
//! [`ScimClient`] keeps an internal cache of every user and group it has
//! resolved, because SCIM name lookups cost a filtered list call each. The
//! cache never expires entries; long-lived processes watching for remote
//! changes should use the `refresh_*` lookups or
//! [`clear_cache`](ScimClient::clear_cache).
//!
//! The transport must be pre-configured with the
//! `https://api.slack.com/scim/v1/` base and an `Authorization: Bearer`
//! header carrying an admin's OAuth token.

mod client;
mod types;

pub use client::ScimClient;
pub use types::{
    Email, GroupMember, Meta, Name, Photo, ScimGroup, ScimUser, UserGroup, SCHEMA_CORE,
    SCHEMA_ENTERPRISE,
};
