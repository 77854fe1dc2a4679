// src/api/pagination.rs
//! Offset pagination over the Ryver OData service.
//!
//! The service hands out at most [`RYVER_API_PAGE_SIZE`] records per request
//! no matter what `$top` asks for, so a logical listing is rebuilt here from a
//! run of `$skip`/`$top` requests.

use super::responses::{parse_envelope, PageResponse};
use super::Transport;
use crate::constants::RYVER_API_PAGE_SIZE;
use crate::error::AppError;
use serde_json::Value;
use std::fmt;
use std::future::Future;

/// How the pagination parameters attach to an endpoint URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryJoin {
    /// The URL has no query string yet.
    First,
    /// The URL already carries query parameters.
    Append,
}

impl QueryJoin {
    pub fn separator(self) -> char {
        match self {
            QueryJoin::First => '?',
            QueryJoin::Append => '&',
        }
    }
}

impl fmt::Display for QueryJoin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.separator())
    }
}

/// Result of a pagination run.
#[derive(Debug, Clone)]
pub struct PaginationResult<T> {
    pub items: Vec<T>,
    pub pages_fetched: usize,
}

/// Drives `fetch_page(skip, top)` until the server runs dry or `top` records
/// have been collected.
///
/// `top == None` means unbounded. Records keep the order the server returned
/// them in. Only an empty page ends the run early: a short page may still be
/// followed by more records. The first error aborts the whole run.
pub async fn fetch_all_pages<T, F, Fut>(
    mut fetch_page: F,
    top: Option<usize>,
    skip: usize,
) -> Result<PaginationResult<T>, AppError>
where
    F: FnMut(usize, usize) -> Fut,
    Fut: Future<Output = Result<Vec<T>, AppError>>,
{
    let mut items = Vec::new();
    let mut pages_fetched = 0usize;

    if top == Some(0) {
        return Ok(PaginationResult {
            items,
            pages_fetched,
        });
    }

    let mut remaining = top;
    let mut offset = skip;

    loop {
        let page_size = remaining.map_or(RYVER_API_PAGE_SIZE, |r| r.min(RYVER_API_PAGE_SIZE));

        let mut page = fetch_page(offset, page_size).await?;
        pages_fetched += 1;

        // never keep more than was asked for
        page.truncate(page_size);
        let returned = page.len();
        log::debug!(
            "Page {} at offset {}: requested {}, got {}",
            pages_fetched,
            offset,
            page_size,
            returned
        );
        items.extend(page);

        if returned == 0 {
            break;
        }
        offset += returned;

        if let Some(r) = remaining.as_mut() {
            *r = r.saturating_sub(returned);
            if *r == 0 {
                break;
            }
        }
    }

    Ok(PaginationResult {
        items,
        pages_fetched,
    })
}

/// Fetches up to `top` raw records from a collection endpoint.
pub async fn fetch_all_records(
    transport: &dyn Transport,
    url: &str,
    join: QueryJoin,
    top: Option<usize>,
    skip: usize,
) -> Result<Vec<Value>, AppError> {
    let result = fetch_all_pages(
        |offset, page_size| async move {
            let page_url = format!("{}{}$skip={}&$top={}", url, join, offset, page_size);
            let body = transport.get_json(&page_url).await?;
            let page: PageResponse = parse_envelope(body, &page_url)?;
            Ok(page.d.results)
        },
        top,
        skip,
    )
    .await?;

    log::debug!(
        "Fetched {} records from {} in {} requests",
        result.items.len(),
        url,
        result.pages_fetched
    );
    Ok(result.items)
}
