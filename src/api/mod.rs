// src/api/mod.rs
//! Ryver API interaction: moving raw records between the service and the
//! object model.
//!
//! The object model and [`Session`](crate::Session) only ever see the
//! [`Transport`] trait; HTTP details live in [`client`], page assembly in
//! [`pagination`], and the `{"d": …}` envelope in [`responses`].

pub mod cache;
pub mod client;
pub mod pagination;
pub mod responses;

use crate::error::AppError;
use serde_json::Value;

/// The ability to exchange JSON with the Ryver OData service.
///
/// Implementations must fail with a transport error on any non-2xx status
/// and must not retry. An empty success body decodes as `Value::Null`.
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    async fn get_json(&self, url: &str) -> Result<Value, AppError>;

    async fn post_json(&self, url: &str, body: Option<&Value>) -> Result<Value, AppError>;
}

pub use cache::ChatCache;
pub use client::RyverHttpClient;
pub use pagination::{fetch_all_records, QueryJoin};
