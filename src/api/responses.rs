// src/api/responses.rs
//! Response envelopes of the Ryver OData service.
//!
//! Every body arrives wrapped as `{"d": …}`. Records and pages sit under
//! `d.results`; a few actions answer with `d.id` or `d.count` instead.

use crate::error::AppError;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

/// The outer `{"d": …}` wrapper.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    pub d: T,
}

/// `d.results`: one record, or one page of records.
#[derive(Debug, Clone, Deserialize)]
pub struct Results<T> {
    pub results: T,
}

/// `d.id`: the id of a freshly posted chat message.
#[derive(Debug, Clone, Deserialize)]
pub struct Created {
    pub id: Value,
}

/// `d.count`: how many records a bulk action touched.
#[derive(Debug, Clone, Deserialize)]
pub struct Count {
    pub count: u64,
}

/// A single record response.
pub type RecordResponse = Envelope<Results<serde_json::Map<String, Value>>>;

/// One page of a collection.
pub type PageResponse = Envelope<Results<Vec<Value>>>;

/// Decodes an envelope, reporting which endpoint produced a bad shape.
pub fn parse_envelope<T>(body: Value, url: &str) -> Result<T, AppError>
where
    T: DeserializeOwned,
{
    serde_json::from_value(body).map_err(|e| {
        log::error!("Unexpected response shape from {}: {}", url, e);
        AppError::MalformedResponse(format!("{} (from {})", e, url))
    })
}
