//! Client façade for the SCIM provisioning API.

use crate::cache::{EntityCache, MemberCache};
use crate::error::{Error, Result, ValidationError};
use crate::pagination::drain_offset;
use crate::request::{build_url, encode_body, RequestRunner};
use crate::scim::types::{
    GroupWrite, ListResponse, ScimGroup, ScimUser, UserPatch, UserWrite,
};
use crate::stats::RequestStats;
use crate::transport::{Method, Transport};
use log::{debug, info};

/// Resources requested per page when draining the list endpoints.
const DEFAULT_PAGE_SIZE: u64 = 1000;

/// Error raised when a membership write names users that are not provisioned.
const MISSING_MEMBERS: &str = "Some users don't exist in Slack yet. Create them first";

/// Client for the SCIM 1.0 provisioning API.
///
/// The injected transport must be pre-configured with the
/// `https://api.slack.com/scim/v1/` base and an `Authorization: Bearer`
/// header; unlike the Admin surface, no credential ever appears in a URL.
///
/// Name lookups cost a filtered list call on the wire, so resolved users and
/// groups are cached for the lifetime of the client, along with resolved
/// group member lists. Cached entries never expire: use the `refresh_*`
/// lookups when the remote state may have changed behind the cache, or
/// [`clear_cache`](Self::clear_cache) to start over.
pub struct ScimClient<T> {
    runner: RequestRunner<T>,
    users: EntityCache<ScimUser>,
    groups: EntityCache<ScimGroup>,
    members: MemberCache,
    page_size: u64,
}

impl<T: Transport> ScimClient<T> {
    /// Build a client from a pre-authorized transport.
    pub fn new(transport: T) -> Self {
        Self {
            runner: RequestRunner::new(transport),
            users: EntityCache::new(),
            groups: EntityCache::new(),
            members: MemberCache::new(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Override the page size used when draining list endpoints.
    pub fn with_page_size(mut self, page_size: u64) -> Self {
        self.page_size = page_size;
        self
    }

    /// Snapshot of the requests this client has attempted so far.
    pub fn stats(&self) -> RequestStats {
        self.runner.stats()
    }

    /// Drop every cached user, group and member list.
    pub async fn clear_cache(&self) {
        self.users.clear().await;
        self.groups.clear().await;
        self.members.clear().await;
    }

    // Lookups

    /// Fetch a user by login name, serving repeats from the cache.
    ///
    /// Fails with [`Error::UserNotFound`] unless the server reports exactly
    /// one match.
    pub async fn user_by_name(&self, username: &str) -> Result<ScimUser> {
        if let Some(user) = self.users.get_by_name(username).await {
            return Ok((*user).clone());
        }
        self.fetch_user_by_name(username).await
    }

    /// Fetch a user by login name straight from the server, overwriting any
    /// cached entry.
    pub async fn refresh_user_by_name(&self, username: &str) -> Result<ScimUser> {
        self.fetch_user_by_name(username).await
    }

    async fn fetch_user_by_name(&self, username: &str) -> Result<ScimUser> {
        debug!("looking up user {}", username);
        let url = build_url("Users", [("filter", format!("userName eq \"{username}\""))]);
        let page: ListResponse<ScimUser> = self.runner.send_scim(Method::Get, url, None).await?;

        if page.total_results != 1 {
            return Err(Error::user_not_found(username));
        }
        let Some(user) = page.resources.into_iter().next() else {
            return Err(Error::user_not_found(username));
        };
        self.cache_user(&user).await;
        Ok(user)
    }

    /// Fetch a user by id, serving repeats from the cache.
    pub async fn user_by_id(&self, id: &str) -> Result<ScimUser> {
        if let Some(user) = self.users.get_by_id(id).await {
            return Ok((*user).clone());
        }
        self.fetch_user_by_id(id).await
    }

    /// Fetch a user by id straight from the server, overwriting any cached
    /// entry.
    pub async fn refresh_user_by_id(&self, id: &str) -> Result<ScimUser> {
        self.fetch_user_by_id(id).await
    }

    async fn fetch_user_by_id(&self, id: &str) -> Result<ScimUser> {
        debug!("looking up user id {}", id);
        let user: ScimUser = self
            .runner
            .send_scim(Method::Get, format!("Users/{id}"), None)
            .await?;

        // a response for a different id means the record is not the one asked for
        if user.id != id {
            return Err(Error::user_not_found(id));
        }
        self.cache_user(&user).await;
        Ok(user)
    }

    /// Fetch a group by display name, serving repeats from the cache.
    ///
    /// Fails with [`Error::GroupNotFound`] unless the server reports exactly
    /// one match.
    pub async fn group_by_name(&self, name: &str) -> Result<ScimGroup> {
        if let Some(group) = self.groups.get_by_name(name).await {
            return Ok((*group).clone());
        }

        debug!("looking up group {}", name);
        let url = build_url("Groups", [("filter", format!("displayName eq \"{name}\""))]);
        let page: ListResponse<ScimGroup> = self.runner.send_scim(Method::Get, url, None).await?;

        if page.total_results != 1 {
            return Err(Error::group_not_found(name));
        }
        let Some(group) = page.resources.into_iter().next() else {
            return Err(Error::group_not_found(name));
        };
        self.cache_group(&group).await;
        Ok(group)
    }

    /// Fetch a group by id, serving repeats from the cache.
    pub async fn group_by_id(&self, id: &str) -> Result<ScimGroup> {
        if let Some(group) = self.groups.get_by_id(id).await {
            return Ok((*group).clone());
        }

        debug!("looking up group id {}", id);
        let group: ScimGroup = self
            .runner
            .send_scim(Method::Get, format!("Groups/{id}"), None)
            .await?;

        if group.id != id {
            return Err(Error::group_not_found(id));
        }
        self.cache_group(&group).await;
        Ok(group)
    }

    // Listings

    /// List the names of every provisioned user, paging until exhausted.
    ///
    /// Each user's display name is preferred, falling back to the login
    /// name; users with neither are skipped. Every named record is cached,
    /// so this is also the cheapest way to warm the cache before a batch of
    /// lookups.
    pub async fn user_names(&self) -> Result<Vec<String>> {
        debug!("listing users");
        let runner = &self.runner;
        let count = self.page_size.to_string();
        let resources = drain_offset(move |start| {
            let url = build_url(
                "Users",
                [("startIndex", start.to_string()), ("count", count.clone())],
            );
            runner.send_scim::<ListResponse<ScimUser>>(Method::Get, url, None)
        })
        .await?;

        let mut names = Vec::with_capacity(resources.len());
        for user in resources {
            let label = user
                .display_name
                .as_deref()
                .filter(|name| !name.is_empty())
                .or_else(|| (!user.user_name.is_empty()).then_some(user.user_name.as_str()));
            let Some(label) = label else { continue };
            names.push(label.to_string());
            self.cache_user(&user).await;
        }
        Ok(names)
    }

    /// List the names of every IDP group, paging until exhausted.
    ///
    /// Every listed group is cached.
    pub async fn group_names(&self) -> Result<Vec<String>> {
        debug!("listing groups");
        let runner = &self.runner;
        let count = self.page_size.to_string();
        let resources = drain_offset(move |start| {
            let url = build_url(
                "Groups",
                [("startIndex", start.to_string()), ("count", count.clone())],
            );
            runner.send_scim::<ListResponse<ScimGroup>>(Method::Get, url, None)
        })
        .await?;

        let mut names = Vec::with_capacity(resources.len());
        for group in resources {
            names.push(group.display_name.clone());
            self.cache_group(&group).await;
        }
        Ok(names)
    }

    /// Resolve a group's members to login names, serving repeats from the
    /// cache.
    ///
    /// The group record only carries member ids; each id is resolved through
    /// the user cache, costing one user lookup per member not already
    /// cached.
    pub async fn group_members(&self, group: &str) -> Result<Vec<String>> {
        if let Some(id) = self.groups.id_of(group).await {
            if let Some(members) = self.members.get(&id).await {
                debug!("serving members of {} from cache", group);
                return Ok((*members).clone());
            }
        }

        let detail = self.group_by_name(group).await?;
        let mut names = Vec::with_capacity(detail.members.len());
        for member in &detail.members {
            names.push(self.user_name(&member.value).await?);
        }
        self.members.insert(&detail.id, names.clone()).await;
        Ok(names)
    }

    // Id and name translations

    /// Resolve a group display name to its id.
    pub async fn group_id(&self, group: &str) -> Result<String> {
        if let Some(id) = self.groups.id_of(group).await {
            return Ok(id);
        }
        Ok(self.group_by_name(group).await?.id)
    }

    /// Resolve a group id to its display name.
    pub async fn group_name(&self, id: &str) -> Result<String> {
        if let Some(name) = self.groups.name_of(id).await {
            return Ok(name);
        }
        Ok(self.group_by_id(id).await?.display_name)
    }

    /// Resolve a user id to its login name.
    pub async fn user_name(&self, id: &str) -> Result<String> {
        if let Some(name) = self.users.name_of(id).await {
            return Ok(name);
        }
        Ok(self.user_by_id(id).await?.user_name)
    }

    /// Resolve a login name to its user id.
    pub async fn user_id(&self, username: &str) -> Result<String> {
        Ok(self.user_by_name(username).await?.id)
    }

    /// Resolve a batch of login names to user ids, failing on the first name
    /// that does not resolve.
    pub async fn user_ids<S: AsRef<str>>(&self, usernames: &[S]) -> Result<Vec<String>> {
        let mut ids = Vec::with_capacity(usernames.len());
        for username in usernames {
            ids.push(self.user_id(username.as_ref()).await?);
        }
        Ok(ids)
    }

    async fn resolve_members<S: AsRef<str>>(&self, usernames: &[S]) -> Result<Vec<String>> {
        match self.user_ids(usernames).await {
            Ok(ids) => Ok(ids),
            Err(source @ Error::UserNotFound { .. }) => {
                Err(Error::api_source(MISSING_MEMBERS, source))
            }
            Err(other) => Err(other),
        }
    }

    // Group writes

    /// Create an IDP group, optionally with initial members given as login
    /// names.
    ///
    /// Members are resolved to ids first; if any of them is missing the call
    /// fails before anything is sent, with the [`Error::UserNotFound`]
    /// retained as the error's source.
    pub async fn create_group<S: AsRef<str>>(&self, name: &str, members: &[S]) -> Result<()> {
        let member_ids = if members.is_empty() {
            Vec::new()
        } else {
            self.resolve_members(members).await?
        };

        info!("creating group {} with {} members", name, member_ids.len());
        let body = GroupWrite::create(name, member_ids);
        self.runner
            .send_scim_ok(Method::Post, "Groups".to_string(), Some(encode_body(&body)?))
            .await
    }

    /// Replace a group's entire membership with the given login names.
    ///
    /// An empty list clears the group. The cached group record and member
    /// list are dropped once the server accepts the replacement.
    pub async fn replace_group_members<S: AsRef<str>>(
        &self,
        group: &str,
        usernames: &[S],
    ) -> Result<()> {
        let id = self.group_id(group).await?;
        let member_ids = self.resolve_members(usernames).await?;
        self.put_membership(group, &id, member_ids).await
    }

    /// Replace a group's entire membership with the given user ids, skipping
    /// name resolution.
    pub async fn replace_group_members_by_id<S: AsRef<str>>(
        &self,
        group: &str,
        member_ids: &[S],
    ) -> Result<()> {
        let id = self.group_id(group).await?;
        let member_ids = member_ids
            .iter()
            .map(|member| member.as_ref().to_string())
            .collect();
        self.put_membership(group, &id, member_ids).await
    }

    async fn put_membership(&self, group: &str, id: &str, member_ids: Vec<String>) -> Result<()> {
        info!("replacing members of {} with {} users", group, member_ids.len());
        let body = GroupWrite::replacement(group, member_ids);
        self.runner
            .send_scim_ok(Method::Put, format!("Groups/{id}"), Some(encode_body(&body)?))
            .await?;
        // The cached group entity still lists the old members; drop both.
        self.groups.remove_by_id(id).await;
        self.members.remove(id).await;
        Ok(())
    }

    /// Delete an IDP group by display name.
    ///
    /// Fails with [`Error::GroupNotFound`] when the name does not resolve;
    /// on success the group and its member list are evicted from the cache.
    pub async fn delete_group(&self, group: &str) -> Result<()> {
        let id = self.group_id(group).await?;

        info!("deleting group {} ({})", group, id);
        self.runner
            .send_scim_ok(Method::Delete, format!("Groups/{id}"), None)
            .await?;
        self.groups.remove_by_id(&id).await;
        self.members.remove(&id).await;
        Ok(())
    }

    // User writes

    /// Provision an enterprise user.
    ///
    /// The family name and photo are optional and omitted from the request
    /// when absent.
    pub async fn create_user(
        &self,
        username: &str,
        email: &str,
        full_name: Option<&str>,
        photo_url: Option<&str>,
    ) -> Result<()> {
        info!("creating user {}", username);
        let body = UserWrite::new(username, email, full_name, photo_url);
        self.runner
            .send_scim_ok(Method::Post, "Users".to_string(), Some(encode_body(&body)?))
            .await
    }

    /// Update individual profile attributes of a user.
    ///
    /// At least one attribute must be given; otherwise the call fails
    /// validation without issuing a request. The cached record is not
    /// refreshed automatically - follow up with
    /// [`refresh_user_by_name`](Self::refresh_user_by_name) when the updated
    /// record is needed.
    pub async fn patch_user(
        &self,
        username: &str,
        email: Option<&str>,
        full_name: Option<&str>,
        photo_url: Option<&str>,
    ) -> Result<()> {
        if email.is_none() && full_name.is_none() && photo_url.is_none() {
            return Err(ValidationError::EmptyPatch.into());
        }

        let id = self.user_id(username).await?;
        info!("patching user {} ({})", username, id);
        let body = UserPatch::attributes(&id, email, full_name, photo_url);
        self.runner
            .send_scim_ok(Method::Patch, format!("Users/{id}"), Some(encode_body(&body)?))
            .await
    }

    /// Deactivate a user account.
    ///
    /// The record is re-fetched afterwards so the cache reflects the
    /// deactivated state.
    pub async fn deactivate_user(&self, username: &str) -> Result<()> {
        let id = self.user_id(username).await?;

        info!("deactivating user {} ({})", username, id);
        self.runner
            .send_scim_ok(Method::Delete, format!("Users/{id}"), None)
            .await?;
        self.refresh_user_by_name(username).await?;
        Ok(())
    }

    /// Reactivate a previously deactivated user account.
    ///
    /// The record is re-fetched afterwards so the cache reflects the
    /// reactivated state.
    pub async fn activate_user(&self, username: &str) -> Result<()> {
        let id = self.user_id(username).await?;

        info!("activating user {} ({})", username, id);
        let body = UserPatch::activation(&id, true);
        self.runner
            .send_scim_ok(Method::Patch, format!("Users/{id}"), Some(encode_body(&body)?))
            .await?;
        self.refresh_user_by_name(username).await?;
        Ok(())
    }

    /// Whether a user account is currently active.
    ///
    /// Served from the cache when the user is already resolved; combine with
    /// [`refresh_user_by_name`](Self::refresh_user_by_name) for a live
    /// answer.
    pub async fn is_user_active(&self, username: &str) -> Result<bool> {
        Ok(self.user_by_name(username).await?.active)
    }

    async fn cache_user(&self, user: &ScimUser) {
        if user.user_name.is_empty() {
            return;
        }
        self.users
            .insert(&user.user_name, &user.id, user.clone())
            .await;
    }

    async fn cache_group(&self, group: &ScimGroup) {
        self.groups
            .insert(&group.display_name, &group.id, group.clone())
            .await;
    }
}
