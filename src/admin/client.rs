//! Client façade for the Admin API.

use crate::admin::types::{AdminIdsPage, CreatedTeam, OwnerIdsPage, Team, TeamsPage};
use crate::admin::validation::{Discoverability, TeamDescription, TeamDomain, TeamId, TeamName};
use crate::error::{Error, Result, ValidationError};
use crate::pagination::{drain_cursor, CursorPage};
use crate::request::{build_url, RequestRunner};
use crate::stats::RequestStats;
use crate::transport::{Method, Transport};
use log::{debug, info};
use serde::de::DeserializeOwned;

/// Items requested per page from the cursor-paged list endpoints.
const DEFAULT_PAGE_LIMIT: u64 = 100;

fn flag(value: bool) -> &'static str {
    if value { "1" } else { "0" }
}

/// Client for the Slack enterprise Admin API.
///
/// Every call sends the bearer token as a `token` query parameter, so the
/// injected transport only needs the `https://slack.com/api/` base and no
/// credentials of its own. List endpoints are drained to completion before
/// returning; callers always see the full collection. Methods that take a
/// team id check its form locally and fail with
/// [`Error::Validation`](crate::Error::Validation) before any request goes
/// out.
///
/// The token requires the `admin.teams:read`, `admin.teams:write` and
/// `admin.users:write` scopes, granted to an app installed by an enterprise
/// admin.
pub struct AdminClient<T> {
    runner: RequestRunner<T>,
    token: String,
    page_limit: u64,
}

impl<T: Transport> AdminClient<T> {
    /// Build a client from a transport and an `xoxp-` admin token.
    pub fn new(transport: T, token: impl Into<String>) -> Self {
        Self {
            runner: RequestRunner::new(transport),
            token: token.into(),
            page_limit: DEFAULT_PAGE_LIMIT,
        }
    }

    /// Override the page size used when draining list endpoints.
    pub fn with_page_limit(mut self, limit: u64) -> Self {
        self.page_limit = limit;
        self
    }

    /// Snapshot of the requests this client has attempted so far.
    pub fn stats(&self) -> RequestStats {
        self.runner.stats()
    }

    /// List every workspace in the enterprise.
    ///
    /// Calls [`admin.teams.list`](https://api.slack.com/methods/admin.teams.list),
    /// following cursors until the listing is exhausted.
    pub async fn teams(&self) -> Result<Vec<Team>> {
        debug!("listing workspaces");
        let runner = &self.runner;
        let limit = self.page_limit.to_string();
        drain_cursor(move |cursor| {
            let mut params = vec![("token", self.token.clone()), ("limit", limit.clone())];
            if let Some(cursor) = cursor {
                params.push(("cursor", cursor));
            }
            runner.send_admin::<TeamsPage>(Method::Get, build_url("admin.teams.list", params), None)
        })
        .await
    }

    /// List the user ids of a workspace's owners.
    ///
    /// Calls [`admin.teams.owners.list`](https://api.slack.com/methods/admin.teams.owners.list).
    pub async fn team_owners(&self, team_id: &str) -> Result<Vec<String>> {
        debug!("listing owners of {}", team_id);
        self.role_holders::<OwnerIdsPage>("admin.teams.owners.list", team_id)
            .await
    }

    /// List the user ids of a workspace's admins, owners included.
    ///
    /// Calls [`admin.teams.admins.list`](https://api.slack.com/methods/admin.teams.admins.list).
    pub async fn team_admins(&self, team_id: &str) -> Result<Vec<String>> {
        debug!("listing admins of {}", team_id);
        self.role_holders::<AdminIdsPage>("admin.teams.admins.list", team_id)
            .await
    }

    async fn role_holders<P>(&self, endpoint: &str, team_id: &str) -> Result<Vec<String>>
    where
        P: CursorPage<Item = String> + DeserializeOwned,
    {
        let team_id = TeamId::new(team_id)?;
        let runner = &self.runner;
        let limit = self.page_limit.to_string();
        drain_cursor(move |cursor| {
            let mut params = vec![
                ("token", self.token.clone()),
                ("team_id", team_id.to_string()),
                ("limit", limit.clone()),
            ];
            if let Some(cursor) = cursor {
                params.push(("cursor", cursor));
            }
            runner.send_admin::<P>(Method::Get, build_url(endpoint, params), None)
        })
        .await
    }

    /// Create a workspace and return its new team id.
    ///
    /// Calls [`admin.teams.create`](https://api.slack.com/methods/admin.teams.create).
    /// The domain, name and description are validated locally first; a bad
    /// input fails with [`Error::Validation`](crate::Error::Validation)
    /// without touching the network. An empty description is allowed and
    /// sent as-is.
    pub async fn create_team(
        &self,
        domain: &str,
        name: &str,
        description: &str,
        discoverability: Discoverability,
    ) -> Result<String> {
        let domain = TeamDomain::new(domain)?;
        let name = TeamName::new(name)?;
        if !description.is_empty() {
            TeamDescription::new(description)?;
        }

        info!("creating workspace {} ({})", domain, discoverability);
        let url = build_url(
            "admin.teams.create",
            [
                ("token", self.token.as_str()),
                ("team_domain", domain.as_str()),
                ("team_name", name.as_str()),
                ("team_description", description),
                ("team_discoverability", discoverability.as_str()),
            ],
        );
        let created: CreatedTeam = self.runner.send_admin(Method::Post, url, None).await?;
        let Some(team) = created.team.filter(|team| !team.is_empty()) else {
            return Err(Error::api("unknown error creating team"));
        };
        info!("created workspace {} as {}", domain, team);
        Ok(team)
    }

    /// Add a user to a workspace.
    ///
    /// Calls [`admin.users.assign`](https://api.slack.com/methods/admin.users.assign).
    pub async fn assign_user(&self, user_id: &str, team_id: &str) -> Result<()> {
        info!("assigning {} to {}", user_id, team_id);
        self.user_team_call("admin.users.assign", user_id, team_id)
            .await
    }

    /// Remove a user from a workspace.
    ///
    /// Calls [`admin.users.remove`](https://api.slack.com/methods/admin.users.remove).
    pub async fn remove_user(&self, user_id: &str, team_id: &str) -> Result<()> {
        info!("removing {} from {}", user_id, team_id);
        self.user_team_call("admin.users.remove", user_id, team_id)
            .await
    }

    /// Promote a user to workspace admin.
    ///
    /// Calls [`admin.users.setAdmin`](https://api.slack.com/methods/admin.users.setAdmin).
    pub async fn set_admin(&self, user_id: &str, team_id: &str) -> Result<()> {
        info!("promoting {} to admin of {}", user_id, team_id);
        self.user_team_call("admin.users.setAdmin", user_id, team_id)
            .await
    }

    /// Promote a user to workspace owner.
    ///
    /// Calls [`admin.users.setOwner`](https://api.slack.com/methods/admin.users.setOwner).
    pub async fn set_owner(&self, user_id: &str, team_id: &str) -> Result<()> {
        info!("promoting {} to owner of {}", user_id, team_id);
        self.user_team_call("admin.users.setOwner", user_id, team_id)
            .await
    }

    /// Demote a user back to a regular member.
    ///
    /// Calls [`admin.users.setRegular`](https://api.slack.com/methods/admin.users.setRegular).
    pub async fn set_regular(&self, user_id: &str, team_id: &str) -> Result<()> {
        info!("demoting {} to regular member of {}", user_id, team_id);
        self.user_team_call("admin.users.setRegular", user_id, team_id)
            .await
    }

    async fn user_team_call(&self, endpoint: &str, user_id: &str, team_id: &str) -> Result<()> {
        let team_id = TeamId::new(team_id)?;
        let url = build_url(
            endpoint,
            [
                ("token", self.token.as_str()),
                ("team_id", team_id.as_str()),
                ("user_id", user_id),
            ],
        );
        self.runner.send_admin_ok(Method::Post, url, None).await
    }

    /// Sign a user out everywhere, or only on mobile or only on the web.
    ///
    /// Calls [`admin.users.session.reset`](https://api.slack.com/methods/admin.users.session.reset).
    /// Asking for both a mobile-only and a web-only reset is contradictory
    /// and fails validation without issuing a request.
    pub async fn reset_session(
        &self,
        user_id: &str,
        mobile_only: bool,
        web_only: bool,
    ) -> Result<()> {
        if mobile_only && web_only {
            return Err(ValidationError::ConflictingSessionScope.into());
        }

        info!("resetting sessions for {}", user_id);
        let url = build_url(
            "admin.users.session.reset",
            [
                ("token", self.token.as_str()),
                ("user_id", user_id),
                ("mobile_only", flag(mobile_only)),
                ("web_only", flag(web_only)),
            ],
        );
        self.runner.send_admin_ok(Method::Post, url, None).await
    }
}
