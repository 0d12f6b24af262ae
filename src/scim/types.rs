//! SCIM 1.0 resource types for the provisioning surface.
//!
//! Read models decode what the server sends and tolerate missing optional
//! blocks; write bodies are separate types that serialize exactly the shape
//! the endpoints expect, schema URNs included. Unrecognized response fields
//! (such as the enterprise extension block) are ignored at decode time.

use crate::pagination::OffsetPage;
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// Schema URN for core SCIM 1.0 resources.
pub const SCHEMA_CORE: &str = "urn:scim:schemas:core:1.0";

/// Schema URN for the enterprise user extension.
pub const SCHEMA_ENTERPRISE: &str = "urn:scim:schemas:extension:enterprise:1.0";

/// A provisioned user record.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScimUser {
    /// Server-assigned user id, e.g. `W012A3CDE`
    pub id: String,
    #[serde(default)]
    pub external_id: Option<String>,
    /// Login name; the lookup and cache key. Defaulted because listings
    /// occasionally contain records without one.
    #[serde(default)]
    pub user_name: String,
    #[serde(default)]
    pub nick_name: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub name: Option<Name>,
    #[serde(default)]
    pub emails: Vec<Email>,
    #[serde(default)]
    pub photos: Vec<Photo>,
    /// Groups the user belongs to, as reported on the user record
    #[serde(default)]
    pub groups: Vec<UserGroup>,
    /// Whether the account is active; deactivated accounts stay listed
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub timezone: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub meta: Option<Meta>,
}

/// Name components of a user record.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Name {
    #[serde(default)]
    pub given_name: Option<String>,
    #[serde(default)]
    pub family_name: Option<String>,
}

/// An email address attached to a user record.
#[derive(Debug, Clone, Deserialize)]
pub struct Email {
    pub value: String,
    #[serde(default)]
    pub primary: Option<bool>,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
}

/// A photo attached to a user record.
#[derive(Debug, Clone, Deserialize)]
pub struct Photo {
    pub value: String,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
}

/// Group membership as embedded in a user record.
#[derive(Debug, Clone, Deserialize)]
pub struct UserGroup {
    /// Group id
    #[serde(default)]
    pub value: Option<String>,
    /// Group display name
    #[serde(default)]
    pub display: Option<String>,
}

/// A provisioned IDP group.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScimGroup {
    /// Server-assigned group id, e.g. `S0123ABCD`
    pub id: String,
    /// Group name; the lookup and cache key
    pub display_name: String,
    #[serde(default)]
    pub members: Vec<GroupMember>,
    #[serde(default)]
    pub meta: Option<Meta>,
}

/// Member entry as embedded in a group record.
#[derive(Debug, Clone, Deserialize)]
pub struct GroupMember {
    /// User id of the member
    pub value: String,
    #[serde(default)]
    pub display: Option<String>,
}

/// Resource metadata block.
#[derive(Debug, Clone, Deserialize)]
pub struct Meta {
    #[serde(default)]
    pub created: Option<DateTime<FixedOffset>>,
    #[serde(default)]
    pub location: Option<String>,
}

fn default_start_index() -> u64 {
    1
}

/// One page of a SCIM listing, shared by list and filter endpoints.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ListResponse<T> {
    pub(crate) total_results: u64,
    #[serde(default)]
    pub(crate) items_per_page: u64,
    #[serde(default = "default_start_index")]
    pub(crate) start_index: u64,
    #[serde(rename = "Resources", default = "Vec::new")]
    pub(crate) resources: Vec<T>,
}

impl<T> OffsetPage for ListResponse<T> {
    type Item = T;

    fn total_results(&self) -> u64 {
        self.total_results
    }

    fn items_per_page(&self) -> u64 {
        self.items_per_page
    }

    fn start_index(&self) -> u64 {
        self.start_index
    }

    fn into_items(self) -> Vec<T> {
        self.resources
    }
}

// Write bodies. These serialize exactly what each endpoint expects;
// optional blocks are omitted rather than sent null.

#[derive(Debug, Serialize)]
pub(crate) struct WriteEmail<'a> {
    pub(crate) value: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct WritePhoto<'a> {
    #[serde(rename = "type")]
    pub(crate) kind: &'static str,
    pub(crate) value: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WriteName<'a> {
    pub(crate) family_name: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct WriteMember {
    pub(crate) value: String,
}

/// Request body for `POST Users`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UserWrite<'a> {
    pub(crate) schemas: Vec<&'static str>,
    pub(crate) user_name: &'a str,
    pub(crate) emails: Vec<WriteEmail<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) name: Option<WriteName<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) photos: Option<Vec<WritePhoto<'a>>>,
}

impl<'a> UserWrite<'a> {
    pub(crate) fn new(
        username: &'a str,
        email: &'a str,
        full_name: Option<&'a str>,
        photo_url: Option<&'a str>,
    ) -> Self {
        Self {
            schemas: vec![SCHEMA_CORE, SCHEMA_ENTERPRISE],
            user_name: username,
            emails: vec![WriteEmail { value: email }],
            name: full_name.map(|family_name| WriteName { family_name }),
            photos: photo_url.map(|value| {
                vec![WritePhoto {
                    kind: "photo",
                    value,
                }]
            }),
        }
    }
}

/// Request body for `PATCH Users/{id}`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UserPatch<'a> {
    pub(crate) schemas: Vec<&'static str>,
    pub(crate) id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) emails: Option<Vec<WriteEmail<'a>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) name: Option<WriteName<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) photos: Option<Vec<WritePhoto<'a>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) active: Option<bool>,
}

impl<'a> UserPatch<'a> {
    fn base(id: &'a str) -> Self {
        Self {
            schemas: vec![SCHEMA_CORE],
            id,
            emails: None,
            name: None,
            photos: None,
            active: None,
        }
    }

    /// Patch that updates the given profile attributes.
    pub(crate) fn attributes(
        id: &'a str,
        email: Option<&'a str>,
        full_name: Option<&'a str>,
        photo_url: Option<&'a str>,
    ) -> Self {
        let mut patch = Self::base(id);
        patch.emails = email.map(|value| vec![WriteEmail { value }]);
        patch.name = full_name.map(|family_name| WriteName { family_name });
        patch.photos = photo_url.map(|value| {
            vec![WritePhoto {
                kind: "photo",
                value,
            }]
        });
        patch
    }

    /// Patch that flips the `active` flag.
    pub(crate) fn activation(id: &'a str, active: bool) -> Self {
        let mut patch = Self::base(id);
        patch.active = Some(active);
        patch
    }
}

/// Request body for `POST Groups` and `PUT Groups/{id}`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GroupWrite<'a> {
    pub(crate) schemas: Vec<&'static str>,
    pub(crate) display_name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) members: Option<Vec<WriteMember>>,
}

impl<'a> GroupWrite<'a> {
    fn with_members(name: &'a str, members: Option<Vec<String>>) -> Self {
        Self {
            schemas: vec![SCHEMA_CORE],
            display_name: name,
            members: members
                .map(|ids| ids.into_iter().map(|value| WriteMember { value }).collect()),
        }
    }

    /// Body for group creation; an empty member list is omitted entirely.
    pub(crate) fn create(name: &'a str, member_ids: Vec<String>) -> Self {
        let members = if member_ids.is_empty() {
            None
        } else {
            Some(member_ids)
        };
        Self::with_members(name, members)
    }

    /// Body for full membership replacement; an empty list is sent
    /// explicitly so the server clears the group.
    pub(crate) fn replacement(name: &'a str, member_ids: Vec<String>) -> Self {
        Self::with_members(name, Some(member_ids))
    }
}
