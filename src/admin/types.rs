//! Decoded payloads for the Admin surface.
//!
//! These map the interesting fields of each `admin.*` response; everything
//! else in the envelope (including the `ok` flag, which the request runner
//! has already inspected) is ignored at decode time.

use crate::pagination::CursorPage;
use serde::Deserialize;

/// A workspace in the enterprise grid, as listed by `admin.teams.list`.
#[derive(Debug, Clone, Deserialize)]
pub struct Team {
    /// Team id, e.g. `TQ1234XYZ`
    pub id: String,
    /// Formal workspace name
    pub name: String,
    /// Discoverability setting as reported by the server
    #[serde(default)]
    pub discoverability: Option<String>,
    /// Primary owner contact, when the listing token can see it
    #[serde(default)]
    pub primary_owner: Option<PrimaryOwner>,
    /// Canonical workspace URL
    #[serde(default)]
    pub team_url: Option<String>,
}

/// Primary owner block attached to a listed team.
#[derive(Debug, Clone, Deserialize)]
pub struct PrimaryOwner {
    /// Enterprise user id of the owner
    pub user_id: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// Cursor block shared by the paged Admin list endpoints.
///
/// The server signals the last page with an empty `next_cursor` string or by
/// omitting the block entirely.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ResponseMetadata {
    #[serde(default)]
    next_cursor: Option<String>,
}

impl ResponseMetadata {
    fn cursor(this: &Option<Self>) -> Option<&str> {
        this.as_ref()?.next_cursor.as_deref()
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct TeamsPage {
    pub(crate) teams: Vec<Team>,
    #[serde(default)]
    response_metadata: Option<ResponseMetadata>,
}

impl CursorPage for TeamsPage {
    type Item = Team;

    fn next_cursor(&self) -> Option<&str> {
        ResponseMetadata::cursor(&self.response_metadata)
    }

    fn into_items(self) -> Vec<Team> {
        self.teams
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct OwnerIdsPage {
    pub(crate) owner_ids: Vec<String>,
    #[serde(default)]
    response_metadata: Option<ResponseMetadata>,
}

impl CursorPage for OwnerIdsPage {
    type Item = String;

    fn next_cursor(&self) -> Option<&str> {
        ResponseMetadata::cursor(&self.response_metadata)
    }

    fn into_items(self) -> Vec<String> {
        self.owner_ids
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct AdminIdsPage {
    pub(crate) admin_ids: Vec<String>,
    #[serde(default)]
    response_metadata: Option<ResponseMetadata>,
}

impl CursorPage for AdminIdsPage {
    type Item = String;

    fn next_cursor(&self) -> Option<&str> {
        ResponseMetadata::cursor(&self.response_metadata)
    }

    fn into_items(self) -> Vec<String> {
        self.admin_ids
    }
}

/// Acknowledgement from `admin.teams.create`.
///
/// The new id is optional at decode time; the client treats its absence as
/// a failed creation even when the envelope said `ok`.
#[derive(Debug, Deserialize)]
pub(crate) struct CreatedTeam {
    #[serde(default)]
    pub(crate) team: Option<String>,
}
