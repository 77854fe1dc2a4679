// tests/common/mod.rs
//! An in-memory Ryver organization for integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use ryver::{AppError, Session, Transport};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

pub const PREFIX: &str = "https://acme.ryver.com/api/1/odata.svc/";

#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub method: &'static str,
    pub url: String,
    pub body: Option<Value>,
}

/// Serves collections with `$skip`/`$top`, single records by exact
/// path, and canned replies for writes.
#[derive(Default)]
pub struct FakeRyver {
    collections: HashMap<String, Vec<Value>>,
    records: HashMap<String, Value>,
    writes: HashMap<String, Value>,
    requests: Mutex<Vec<Request>>,
}

impl FakeRyver {
    pub fn new() -> Self {
        Self::default()
    }

    /// `path` is everything before the `$skip` parameter, e.g. `forums`.
    pub fn collection(mut self, path: &str, items: Vec<Value>) -> Self {
        self.collections.insert(path.to_string(), items);
        self
    }

    pub fn record(mut self, path: &str, record: Value) -> Self {
        self.records
            .insert(path.to_string(), json!({"d": {"results": record}}));
        self
    }

    pub fn on_post(mut self, path: &str, reply: Value) -> Self {
        self.writes.insert(path.to_string(), reply);
        self
    }

    pub fn requests(&self) -> Vec<Request> {
        self.requests.lock().unwrap().clone()
    }

    pub fn into_session(self) -> (Session, Arc<FakeRyver>) {
        let fake = Arc::new(self);
        (Session::with_transport(fake.clone(), PREFIX), fake)
    }

    fn log(&self, method: &'static str, url: &str, body: Option<&Value>) {
        self.requests.lock().unwrap().push(Request {
            method,
            url: url.to_string(),
            body: body.cloned(),
        });
    }

    fn page(&self, path: &str) -> Option<Value> {
        let (base, query) = path.rsplit_once("$skip=")?;
        let base = base.trim_end_matches(['?', '&']);
        let items = self.collections.get(base)?;
        let (skip, top) = query.split_once("&$top=")?;
        let skip: usize = skip.parse().ok()?;
        // the service caps pages at 50
        let top = top.parse::<usize>().ok()?.min(50);
        let page: Vec<Value> = items.iter().skip(skip).take(top).cloned().collect();
        Some(json!({"d": {"results": page}}))
    }
}

#[async_trait]
impl Transport for FakeRyver {
    async fn get_json(&self, url: &str) -> Result<Value, AppError> {
        self.log("GET", url, None);
        let path = url.strip_prefix(PREFIX).unwrap_or(url);
        self.records
            .get(path)
            .cloned()
            .or_else(|| self.page(path))
            .ok_or_else(|| AppError::from_status(404, url, "Not Found"))
    }

    async fn post_json(&self, url: &str, body: Option<&Value>) -> Result<Value, AppError> {
        self.log("POST", url, body);
        let path = url.strip_prefix(PREFIX).unwrap_or(url);
        self.writes
            .get(path)
            .cloned()
            .ok_or_else(|| AppError::from_status(404, url, "Not Found"))
    }
}

pub fn numbered(count: usize) -> Vec<Value> {
    (0..count).map(|i| json!({"id": i})).collect()
}
