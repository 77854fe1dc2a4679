//! User notifications.

use super::{ryver_object, Object, ObjectCore};
use crate::error::{AppError, Result};
use crate::types::{ObjectId, ObjectType};
use chrono::{DateTime, Utc};

/// Something that happened to the user: a mention, a comment, a task.
///
/// A notification points at its *source* (the message or reply that
/// caused it) and, for the supported source kinds, at the *location* of
/// that source (the chat or topic it lives in).
#[derive(Debug, Clone)]
pub struct Notification {
    core: ObjectCore,
}

ryver_object!(Notification, ObjectType::Notification);

impl Notification {
    /// E.g. `chat_mention`; see the `NOTIF_PREDICATE_*` constants.
    pub fn predicate(&self) -> Result<&str> {
        self.raw_data().str_at(&["predicate"])
    }

    pub fn source_entity_type(&self) -> Result<&str> {
        self.raw_data().str_at(&["viaType"])
    }

    pub fn source_type(&self) -> Result<ObjectType> {
        ObjectType::from_entity_type(self.source_entity_type()?)
    }

    /// Usually an integer; for chat messages a string.
    pub fn source_id(&self) -> Result<ObjectId> {
        self.raw_data().id_at(&["via", "id"])
    }

    /// The server-rendered summary of the source.
    pub fn message(&self) -> Result<&str> {
        self.raw_data().str_at(&["via", "__descriptor"])
    }

    pub fn modified_at(&self) -> Result<DateTime<Utc>> {
        let raw = self.raw_data().str_at(&["modifyDate"])?;
        DateTime::parse_from_rfc3339(raw)
            .map(|date| date.with_timezone(&Utc))
            .map_err(|_| AppError::MalformedRecord {
                field: "modifyDate".to_string(),
            })
    }

    pub fn is_unread(&self) -> Result<bool> {
        self.raw_data().bool_at(&["unread"])
    }

    /// Kind of the place the source lives in: the chat of a chat message,
    /// or the topic of a topic reply.
    pub fn source_location_type(&self) -> Result<ObjectType> {
        let container = self.location_container()?;
        let entity_type = self
            .raw_data()
            .str_at(&["via", container, "__metadata", "type"])?;
        ObjectType::from_entity_type(entity_type)
    }

    /// Id of the place the source lives in, as embedded in the record.
    pub fn source_location_id(&self) -> Result<ObjectId> {
        let container = self.location_container()?;
        self.raw_data().id_at(&["via", container, "id"])
    }

    /// Name of the `via` sub-record that embeds the location.
    fn location_container(&self) -> Result<&'static str> {
        let via_type = self.source_entity_type()?;
        match ObjectType::from_entity_type(via_type) {
            Ok(ObjectType::ChatMessage) => Ok("workroom"),
            Ok(ObjectType::TopicReply) => Ok("post"),
            _ => Err(AppError::UnimplementedSourceKind(via_type.to_string())),
        }
    }
}
