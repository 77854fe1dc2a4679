// src/session.rs
//! The authenticated entry point to one Ryver organization.
//!
//! A [`Session`] owns the transport and the organization's URL prefix.
//! Every wrapper object holds a clone of the session that produced it and
//! goes back through it for anything not already in its record.

use crate::api::pagination::{fetch_all_records, QueryJoin};
use crate::api::responses::{parse_envelope, Count, Envelope, RecordResponse};
use crate::api::{RyverHttpClient, Transport};
use crate::error::{AppError, Result};
use crate::model::{AnyChat, Notification, Record, RyverObject, User};
use crate::types::{BasicCredentials, ObjectId, ObjectType, Organization};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Cheap to clone; all clones share one transport.
///
/// There is no identity cache: fetching the same entity twice yields two
/// independent wrappers.
#[derive(Clone)]
pub struct Session {
    inner: Arc<SessionInner>,
}

struct SessionInner {
    transport: Arc<dyn Transport>,
    url_prefix: String,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("url_prefix", &self.inner.url_prefix)
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Connects to `https://<org>.ryver.com` with HTTP basic auth.
    ///
    /// Nothing is sent until the first operation.
    pub fn new(organization: &Organization, credentials: &BasicCredentials) -> Result<Self> {
        let prefix = organization.api_prefix()?;
        let client = RyverHttpClient::new(credentials)?;
        log::info!(
            "Session for {} as {} at {}",
            organization,
            credentials.user(),
            prefix
        );
        Ok(Self::with_transport(Arc::new(client), prefix.as_str()))
    }

    /// A session over any transport. `url_prefix` must end with `/`.
    pub fn with_transport(transport: Arc<dyn Transport>, url_prefix: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(SessionInner {
                transport,
                url_prefix: url_prefix.into(),
            }),
        }
    }

    pub fn url_prefix(&self) -> &str {
        &self.inner.url_prefix
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.inner.url_prefix, path)
    }

    pub(crate) async fn get(&self, path: &str) -> Result<Value> {
        self.inner.transport.get_json(&self.url(path)).await
    }

    pub(crate) async fn post(&self, path: &str, body: Option<&Value>) -> Result<Value> {
        self.inner.transport.post_json(&self.url(path), body).await
    }

    /// One record from a `{"d": {"results": {...}}}` response.
    async fn fetch_record(&self, path: &str) -> Result<Record> {
        let body = self.get(path).await?;
        let response: RecordResponse = parse_envelope(body, path)?;
        Ok(Record::new(response.d.results))
    }

    /// All records of a paginated listing. See [`fetch_all_records`].
    pub(crate) async fn list_records(
        &self,
        path: &str,
        join: QueryJoin,
        top: Option<usize>,
        skip: usize,
    ) -> Result<Vec<Record>> {
        let url = self.url(path);
        fetch_all_records(self.inner.transport.as_ref(), &url, join, top, skip)
            .await?
            .into_iter()
            .map(Record::from_value)
            .collect()
    }

    /// Fetches one object by kind and id. Sends a request.
    pub async fn get_object(&self, kind: ObjectType, id: impl Into<ObjectId>) -> Result<RyverObject> {
        let path = format!("{}({})", kind.token(), id.into());
        let record = self.fetch_record(&path).await?;
        kind.wrap(self.clone(), record)
    }

    /// Fetches one user by id. Sends a request.
    pub async fn get_user(&self, id: impl Into<ObjectId>) -> Result<User> {
        User::try_from(self.get_object(ObjectType::User, id).await?)
    }

    /// Fetches one chat by kind and id. Sends a request.
    pub async fn get_chat(&self, kind: ObjectType, id: impl Into<ObjectId>) -> Result<AnyChat> {
        if !kind.is_chat() {
            return Err(AppError::NotAChat(kind));
        }
        self.get_object(kind, id).await?.into_chat()
    }

    /// Every chat of one kind. Sends one request per page.
    ///
    /// `top` of `None` fetches everything; `skip` drops that many first.
    pub async fn get_chats(
        &self,
        kind: ObjectType,
        top: Option<usize>,
        skip: usize,
    ) -> Result<Vec<AnyChat>> {
        if !kind.is_chat() {
            return Err(AppError::NotAChat(kind));
        }
        let records = self
            .list_records(kind.token(), QueryJoin::First, top, skip)
            .await?;
        records
            .into_iter()
            .map(|record| kind.wrap(self.clone(), record)?.into_chat())
            .collect()
    }

    /// The user's notifications, most recently modified first.
    /// Sends one request per page.
    pub async fn get_notifications(
        &self,
        unread_only: bool,
        top: Option<usize>,
        skip: usize,
    ) -> Result<Vec<Notification>> {
        let mut path = format!(
            "{}?$format=json&$orderby=modifyDate desc",
            ObjectType::Notification.token()
        );
        if unread_only {
            path.push_str("&$filter=((unread eq true))");
        }
        let records = self
            .list_records(&path, QueryJoin::Append, top, skip)
            .await?;
        records
            .into_iter()
            .map(|record| Notification::new(self.clone(), record))
            .collect()
    }

    /// Marks every notification read; returns how many changed.
    pub async fn mark_all_notifications_read(&self) -> Result<u64> {
        self.mark_all_notifications("MarkAllRead").await
    }

    /// Marks every notification seen; returns how many changed.
    pub async fn mark_all_notifications_seen(&self) -> Result<u64> {
        self.mark_all_notifications("MarkAllSeen").await
    }

    async fn mark_all_notifications(&self, action: &str) -> Result<u64> {
        let path = format!(
            "{}/UserNotification.{}()?$format=json",
            ObjectType::Notification.token(),
            action
        );
        let body = self.post(&path, None).await?;
        let count: Envelope<Count> = parse_envelope(body, &path)?;
        Ok(count.d.count)
    }
}
