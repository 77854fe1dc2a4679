// src/api/cache.rs
//! Disk-based cache of chat listings.
//!
//! Listing every user or forum of a large organization takes many
//! requests, so the raw records of a listing can be kept on disk as one
//! JSON array per chat kind. On a cache hit the records are re-wrapped
//! through [`ObjectType::wrap`], exactly like records from a live
//! response; the wrappers themselves are never serialized.

use crate::error::{AppError, Result};
use crate::model::{AnyChat, Object, Record};
use crate::session::Session;
use crate::types::ObjectType;
use std::path::{Path, PathBuf};

/// One `ryver.<token>.json` file per chat kind under a directory.
///
/// Files never expire; pass `force_update` to refresh one.
#[derive(Debug, Clone)]
pub struct ChatCache {
    cache_dir: PathBuf,
}

impl ChatCache {
    pub fn new(cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            cache_dir: cache_dir.into(),
        }
    }

    /// `$XDG_CACHE_HOME/ryver` (or `~/.cache/ryver`).
    pub fn default_cache_dir() -> PathBuf {
        std::env::var("XDG_CACHE_HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| {
                let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
                PathBuf::from(home).join(".cache")
            })
            .join("ryver")
    }

    pub fn path_for(&self, kind: ObjectType) -> PathBuf {
        self.cache_dir.join(format!("ryver.{}.json", kind.token()))
    }

    /// Chats of `kind`, from disk when cached, otherwise from the server.
    ///
    /// `top` and `skip` only apply to a fetch; a cache hit returns the
    /// whole file. A fetch overwrites the file.
    pub async fn load_or_fetch(
        &self,
        session: &Session,
        kind: ObjectType,
        force_update: bool,
        top: Option<usize>,
        skip: usize,
    ) -> Result<Vec<AnyChat>> {
        if !kind.is_chat() {
            return Err(AppError::NotAChat(kind));
        }

        let path = self.path_for(kind);
        if !force_update && tokio::fs::try_exists(&path).await? {
            log::debug!("Cache hit: {}", path.display());
            return self.load(session, kind, &path).await;
        }

        log::debug!("Cache miss: {}", path.display());
        let chats = session.get_chats(kind, top, skip).await?;
        self.store(&path, &chats).await?;
        Ok(chats)
    }

    async fn load(&self, session: &Session, kind: ObjectType, path: &Path) -> Result<Vec<AnyChat>> {
        let content = tokio::fs::read_to_string(path).await?;
        let records: Vec<Record> =
            serde_json::from_str(&content).map_err(|source| AppError::JsonParseError {
                path: path.to_path_buf(),
                source,
            })?;
        records
            .into_iter()
            .map(|record| kind.wrap(session.clone(), record)?.into_chat())
            .collect()
    }

    async fn store(&self, path: &Path, chats: &[AnyChat]) -> Result<()> {
        let records: Vec<&Record> = chats.iter().map(|chat| chat.raw_data()).collect();
        let json = serde_json::to_string(&records).map_err(|source| AppError::JsonParseError {
            path: path.to_path_buf(),
            source,
        })?;
        tokio::fs::create_dir_all(&self.cache_dir).await?;
        tokio::fs::write(path, json).await?;
        log::debug!("Cached {} chats in {}", chats.len(), path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::ScriptedTransport;
    use crate::model::Chat;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn setup(transport: ScriptedTransport) -> (Session, Arc<ScriptedTransport>) {
        let transport = Arc::new(transport);
        let session = Session::with_transport(transport.clone(), "https://x/");
        (session, transport)
    }

    fn users_page() -> serde_json::Value {
        json!({"d": {"results": [
            {"id": 1, "username": "alice"},
            {"id": 2, "username": "bob"}
        ]}})
    }

    #[tokio::test]
    async fn miss_fetches_and_writes_the_file() {
        let dir = TempDir::new().unwrap();
        let cache = ChatCache::new(dir.path().join("nested"));
        let (session, transport) =
            setup(ScriptedTransport::new().reply(users_page()).reply(json!({"d": {"results": []}})));

        let chats = cache
            .load_or_fetch(&session, ObjectType::User, false, None, 0)
            .await
            .unwrap();

        assert_eq!(chats.len(), 2);
        assert_eq!(transport.calls().len(), 2);
        let written = std::fs::read_to_string(cache.path_for(ObjectType::User)).unwrap();
        let written: serde_json::Value = serde_json::from_str(&written).unwrap();
        assert_eq!(written, json!([{"id": 1, "username": "alice"}, {"id": 2, "username": "bob"}]));
    }

    #[tokio::test]
    async fn hit_reads_without_requests() {
        let dir = TempDir::new().unwrap();
        let cache = ChatCache::new(dir.path());
        std::fs::write(
            dir.path().join("ryver.forums.json"),
            r#"[{"id": 7, "name": "General", "nickname": "general"}]"#,
        )
        .unwrap();
        let (session, transport) = setup(ScriptedTransport::new());

        let chats = cache
            .load_or_fetch(&session, ObjectType::Forum, false, Some(1), 5)
            .await
            .unwrap();

        assert_eq!(chats.len(), 1);
        assert_eq!(chats[0].endpoint(), "forums(7)");
        assert_eq!(chats[0].display_label().unwrap(), "General");
        assert!(transport.calls().is_empty());
    }

    #[tokio::test]
    async fn force_update_ignores_the_file() {
        let dir = TempDir::new().unwrap();
        let cache = ChatCache::new(dir.path());
        std::fs::write(cache.path_for(ObjectType::User), "[]").unwrap();
        let (session, transport) = setup(ScriptedTransport::new().reply(users_page()));

        let chats = cache
            .load_or_fetch(&session, ObjectType::User, true, Some(2), 0)
            .await
            .unwrap();

        assert_eq!(chats.len(), 2);
        assert_eq!(transport.calls().len(), 1);
    }

    #[tokio::test]
    async fn corrupt_file_names_the_path() {
        let dir = TempDir::new().unwrap();
        let cache = ChatCache::new(dir.path());
        std::fs::write(cache.path_for(ObjectType::Team), "not json").unwrap();
        let (session, _) = setup(ScriptedTransport::new());

        let err = cache
            .load_or_fetch(&session, ObjectType::Team, false, None, 0)
            .await
            .unwrap_err();

        match err {
            AppError::JsonParseError { path, .. } => {
                assert_eq!(path, cache.path_for(ObjectType::Team))
            }
            other => panic!("expected JsonParseError, got {:?}", other),
        }
    }
}
