//! Shared test transport and payload builders.
//!
//! [`MockTransport`] replays scripted outcomes in FIFO order and records
//! every request it was handed, so tests can assert on exact URLs, methods
//! and bodies as well as on how many requests a call generated. The builder
//! functions produce wire-shaped JSON bodies for both surfaces.

#![allow(dead_code)]

use serde_json::{json, Value};
use slack_provision::{BoxError, HttpRequest, HttpResponse, Transport};
use std::collections::VecDeque;
use std::future::Future;
use std::sync::{Arc, Mutex};

enum Scripted {
    Respond(u16, Vec<u8>),
    Fail(String),
}

#[derive(Default)]
struct State {
    script: Mutex<VecDeque<Scripted>>,
    seen: Mutex<Vec<HttpRequest>>,
}

/// Scripted transport shared between a test and the client under test.
///
/// Clones share state: keep one handle for assertions and move the other
/// into the client.
#[derive(Clone, Default)]
pub struct MockTransport {
    state: Arc<State>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a 200 response with a JSON body.
    pub fn respond(&self, body: Value) -> &Self {
        self.respond_with(200, body)
    }

    /// Queue a response with an explicit status and JSON body.
    pub fn respond_with(&self, status: u16, body: Value) -> &Self {
        self.state
            .script
            .lock()
            .unwrap()
            .push_back(Scripted::Respond(status, body.to_string().into_bytes()));
        self
    }

    /// Queue a response whose body is not JSON.
    pub fn respond_raw(&self, status: u16, body: &str) -> &Self {
        self.state
            .script
            .lock()
            .unwrap()
            .push_back(Scripted::Respond(status, body.as_bytes().to_vec()));
        self
    }

    /// Queue a network-level failure.
    pub fn fail(&self, message: &str) -> &Self {
        self.state
            .script
            .lock()
            .unwrap()
            .push_back(Scripted::Fail(message.to_string()));
        self
    }

    /// Everything the client sent, in order.
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.state.seen.lock().unwrap().clone()
    }

    /// The URLs the client requested, in order.
    pub fn urls(&self) -> Vec<String> {
        self.requests().into_iter().map(|r| r.url).collect()
    }

    /// Number of requests the client sent.
    pub fn request_count(&self) -> usize {
        self.state.seen.lock().unwrap().len()
    }

    /// Number of scripted outcomes not yet consumed.
    pub fn remaining(&self) -> usize {
        self.state.script.lock().unwrap().len()
    }
}

impl Transport for MockTransport {
    fn send(
        &self,
        request: HttpRequest,
    ) -> impl Future<Output = Result<HttpResponse, BoxError>> + Send {
        self.state.seen.lock().unwrap().push(request);
        let next = self.state.script.lock().unwrap().pop_front();
        async move {
            match next {
                Some(Scripted::Respond(status, body)) => Ok(HttpResponse { status, body }),
                Some(Scripted::Fail(message)) => Err(message.into()),
                None => panic!("transport called more times than scripted"),
            }
        }
    }
}

/// Initialize logging once; run tests with RUST_LOG set to see client logs.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

// Admin payloads

/// A team record as returned by `admin.teams.list`.
pub fn team(id: &str, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "discoverability": "hidden",
        "primary_owner": {"user_id": "W0PRIMARY", "email": "owner@example.edu"},
        "team_url": format!("https://{}.slack.com/", id.to_lowercase())
    })
}

/// An `ok: true` page for a cursor-paged Admin listing.
///
/// `field` is the payload array's name (`teams`, `owner_ids`, `admin_ids`);
/// a `None` cursor omits the metadata block entirely.
pub fn admin_page(field: &str, items: Value, next_cursor: Option<&str>) -> Value {
    let mut body = json!({"ok": true, field: items});
    if let Some(cursor) = next_cursor {
        body["response_metadata"] = json!({"next_cursor": cursor});
    }
    body
}

// SCIM payloads

/// A minimal user record.
pub fn scim_user(id: &str, username: &str, active: bool) -> Value {
    json!({
        "schemas": ["urn:scim:schemas:core:1.0"],
        "id": id,
        "userName": username,
        "active": active
    })
}

/// A user record carrying a display name.
pub fn scim_named_user(id: &str, username: &str, display_name: &str) -> Value {
    json!({
        "schemas": ["urn:scim:schemas:core:1.0"],
        "id": id,
        "userName": username,
        "displayName": display_name,
        "active": true
    })
}

/// A group record whose members are the given user ids.
pub fn scim_group(id: &str, name: &str, member_ids: &[&str]) -> Value {
    let members: Vec<Value> = member_ids.iter().map(|id| json!({"value": id})).collect();
    json!({
        "schemas": ["urn:scim:schemas:core:1.0"],
        "id": id,
        "displayName": name,
        "members": members
    })
}

/// One page of a SCIM listing.
pub fn scim_page(total: u64, start: u64, resources: Vec<Value>) -> Value {
    json!({
        "totalResults": total,
        "itemsPerPage": resources.len(),
        "startIndex": start,
        "Resources": resources
    })
}

/// A single-result filter response.
pub fn scim_single(resource: Value) -> Value {
    scim_page(1, 1, vec![resource])
}

/// An empty filter response.
pub fn scim_empty() -> Value {
    scim_page(0, 1, Vec::new())
}

/// The structured error body both surfaces use on non-2xx statuses.
pub fn scim_error(description: &str, code: u16) -> Value {
    json!({"Errors": {"description": description, "code": code}})
}
