//! In-memory lookup caches for SCIM resources.
//!
//! SCIM lookups by name cost a filtered list call, so resolved users and
//! groups are cached for the lifetime of the client. Each cache keeps two
//! indexes over the same entries, one by display name and one by id, and
//! every mutation keeps the pair consistent: whenever an id maps to a name,
//! that name maps back to an entry holding the same id.
//!
//! Entries never expire. Callers that suspect staleness use the
//! force-refresh lookups on the façade, which overwrite the cached entry on
//! success.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Debug, Clone)]
struct Entry<T> {
    id: String,
    value: Arc<T>,
}

#[derive(Debug)]
struct Indexes<T> {
    by_name: HashMap<String, Entry<T>>,
    id_to_name: HashMap<String, String>,
}

/// Dual-indexed cache of resolved resources.
///
/// `insert` is rename-safe: re-inserting under a new name with the same id,
/// or under the same name with a new id, drops whichever stale entry would
/// otherwise leave the indexes disagreeing.
#[derive(Debug)]
pub(crate) struct EntityCache<T> {
    inner: RwLock<Indexes<T>>,
}

impl<T> EntityCache<T> {
    pub(crate) fn new() -> Self {
        Self {
            inner: RwLock::new(Indexes {
                by_name: HashMap::new(),
                id_to_name: HashMap::new(),
            }),
        }
    }

    /// Store `value` under both its name and its id.
    pub(crate) async fn insert(&self, name: &str, id: &str, value: T) {
        let mut indexes = self.inner.write().await;

        if let Some(previous) = indexes.by_name.get(name) {
            if previous.id != id {
                let stale = previous.id.clone();
                indexes.id_to_name.remove(&stale);
            }
        }
        if let Some(previous_name) = indexes.id_to_name.get(id) {
            if previous_name != name {
                let stale = previous_name.clone();
                indexes.by_name.remove(&stale);
            }
        }

        indexes.by_name.insert(
            name.to_string(),
            Entry {
                id: id.to_string(),
                value: Arc::new(value),
            },
        );
        indexes.id_to_name.insert(id.to_string(), name.to_string());
    }

    pub(crate) async fn get_by_name(&self, name: &str) -> Option<Arc<T>> {
        let indexes = self.inner.read().await;
        indexes.by_name.get(name).map(|entry| Arc::clone(&entry.value))
    }

    pub(crate) async fn get_by_id(&self, id: &str) -> Option<Arc<T>> {
        let indexes = self.inner.read().await;
        let name = indexes.id_to_name.get(id)?;
        indexes.by_name.get(name).map(|entry| Arc::clone(&entry.value))
    }

    /// Resolve an id to its cached name.
    pub(crate) async fn name_of(&self, id: &str) -> Option<String> {
        self.inner.read().await.id_to_name.get(id).cloned()
    }

    /// Resolve a name to its cached id.
    pub(crate) async fn id_of(&self, name: &str) -> Option<String> {
        let indexes = self.inner.read().await;
        indexes.by_name.get(name).map(|entry| entry.id.clone())
    }

    /// Drop the entry stored under `name`, clearing both indexes.
    pub(crate) async fn remove_by_name(&self, name: &str) -> Option<Arc<T>> {
        let mut indexes = self.inner.write().await;
        let entry = indexes.by_name.remove(name)?;
        indexes.id_to_name.remove(&entry.id);
        Some(entry.value)
    }

    /// Drop the entry stored under `id`, clearing both indexes.
    pub(crate) async fn remove_by_id(&self, id: &str) -> Option<Arc<T>> {
        let mut indexes = self.inner.write().await;
        let name = indexes.id_to_name.remove(id)?;
        indexes.by_name.remove(&name).map(|entry| entry.value)
    }

    /// Number of cached entries.
    pub(crate) async fn len(&self) -> usize {
        self.inner.read().await.by_name.len()
    }

    pub(crate) async fn clear(&self) {
        let mut indexes = self.inner.write().await;
        indexes.by_name.clear();
        indexes.id_to_name.clear();
    }
}

/// Cache of resolved group member names, keyed by group id.
///
/// Member lists are resolved with one user lookup per member, so they are
/// cached independently of the group entries themselves. Keying by id keeps
/// a renamed group attached to its member list.
#[derive(Debug)]
pub(crate) struct MemberCache {
    inner: RwLock<HashMap<String, Arc<Vec<String>>>>,
}

impl MemberCache {
    pub(crate) fn new() -> Self {
        Self {
            inner: RwLock::new(HashMap::new()),
        }
    }

    pub(crate) async fn insert(&self, group_id: &str, members: Vec<String>) {
        self.inner
            .write()
            .await
            .insert(group_id.to_string(), Arc::new(members));
    }

    pub(crate) async fn get(&self, group_id: &str) -> Option<Arc<Vec<String>>> {
        self.inner.read().await.get(group_id).map(Arc::clone)
    }

    pub(crate) async fn remove(&self, group_id: &str) {
        self.inner.write().await.remove(group_id);
    }

    pub(crate) async fn clear(&self) {
        self.inner.write().await.clear();
    }
}
