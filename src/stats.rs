//! Per-façade request statistics.
//!
//! Each client keeps its own tally of requests grouped by HTTP verb. A
//! request is counted the moment the façade commits to sending it — before
//! the transport runs — so a call that dies on the wire or comes back as a
//! logical failure still shows up in the tally. Calls rejected up front
//! (validation failures, unsupported verbs) never reach the counter.

use crate::transport::Method;
use std::sync::atomic::{AtomicU64, Ordering};

/// Internal tally shared by a façade and incremented on every attempted send.
#[derive(Debug, Default)]
pub(crate) struct RequestCounter {
    total: AtomicU64,
    get: AtomicU64,
    post: AtomicU64,
    put: AtomicU64,
    patch: AtomicU64,
    delete: AtomicU64,
}

impl RequestCounter {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Count one attempted send of `method`.
    pub(crate) fn record(&self, method: Method) {
        self.total.fetch_add(1, Ordering::Relaxed);
        self.slot(method).fetch_add(1, Ordering::Relaxed);
    }

    fn slot(&self, method: Method) -> &AtomicU64 {
        match method {
            Method::Get => &self.get,
            Method::Post => &self.post,
            Method::Put => &self.put,
            Method::Patch => &self.patch,
            Method::Delete => &self.delete,
        }
    }

    /// Capture a point-in-time copy of the tally.
    pub(crate) fn snapshot(&self) -> RequestStats {
        RequestStats {
            total: self.total.load(Ordering::Relaxed),
            get: self.get.load(Ordering::Relaxed),
            post: self.post.load(Ordering::Relaxed),
            put: self.put.load(Ordering::Relaxed),
            patch: self.patch.load(Ordering::Relaxed),
            delete: self.delete.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time snapshot of a façade's request tally.
///
/// Snapshots are plain values: once taken they do not track later requests,
/// and two snapshots from the same client can be compared to measure the
/// traffic a piece of code generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RequestStats {
    /// Requests attempted across all verbs
    pub total: u64,
    /// GET requests attempted
    pub get: u64,
    /// POST requests attempted
    pub post: u64,
    /// PUT requests attempted
    pub put: u64,
    /// PATCH requests attempted
    pub patch: u64,
    /// DELETE requests attempted
    pub delete: u64,
}

impl RequestStats {
    /// Tally for a single verb.
    pub fn by_method(&self, method: Method) -> u64 {
        match method {
            Method::Get => self.get,
            Method::Post => self.post,
            Method::Put => self.put,
            Method::Patch => self.patch,
            Method::Delete => self.delete,
        }
    }

    /// Whether no request has been attempted yet.
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}
