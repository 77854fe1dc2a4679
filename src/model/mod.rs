//! Typed views over Ryver records.
//!
//! Every wrapper owns one immutable [`Record`] plus a handle to the
//! [`Session`] that produced it. Field accessors are plain projections;
//! operations that need more data (an author, a chat, a reply) go back
//! through the session. Capabilities are traits: [`Object`] for all
//! wrappers, [`Message`] for things with a body and reactions, [`Chat`]
//! for things that receive messages and host topics.

mod chat;
mod message;
mod notification;
mod record;

pub use chat::{AnyChat, Chat, Forum, GroupChat, Team, User};
pub use message::{ChatMessage, Message, Topic, TopicReply};
pub use notification::Notification;
pub use record::Record;

use crate::error::{AppError, Result};
use crate::session::Session;
use crate::types::{ObjectId, ObjectType};
use serde_json::Value;

/// State shared by every wrapper: who it is, what it is, and its record.
#[derive(Debug, Clone)]
pub struct ObjectCore {
    session: Session,
    kind: ObjectType,
    id: ObjectId,
    record: Record,
}

impl ObjectCore {
    pub(crate) fn new(session: Session, kind: ObjectType, record: Record) -> Result<Self> {
        let id = record.id_at(&["id"])?;
        Ok(Self {
            session,
            kind,
            id,
            record,
        })
    }
}

/// Base capability of every wrapper.
pub trait Object {
    fn core(&self) -> &ObjectCore;

    /// Usually an integer; chat messages use strings.
    fn id(&self) -> &ObjectId {
        &self.core().id
    }

    fn object_type(&self) -> ObjectType {
        self.core().kind
    }

    fn entity_type(&self) -> &'static str {
        self.core().kind.entity_type()
    }

    /// The record exactly as parsed from the response.
    fn raw_data(&self) -> &Record {
        &self.core().record
    }

    fn session(&self) -> &Session {
        &self.core().session
    }
}

/// Implements construction and [`Object`] for a wrapper holding `core`.
macro_rules! ryver_object {
    ($wrapper:ident, $kind:expr) => {
        impl $wrapper {
            /// Wraps a record of this kind.
            pub fn new(
                session: $crate::session::Session,
                record: $crate::model::Record,
            ) -> $crate::error::Result<Self> {
                Ok(Self {
                    core: $crate::model::ObjectCore::new(session, $kind, record)?,
                })
            }
        }

        impl $crate::model::Object for $wrapper {
            fn core(&self) -> &$crate::model::ObjectCore {
                &self.core
            }
        }

        impl TryFrom<$crate::model::RyverObject> for $wrapper {
            type Error = $crate::error::AppError;

            fn try_from(object: $crate::model::RyverObject) -> Result<Self, Self::Error> {
                match object {
                    $crate::model::RyverObject::$wrapper(inner) => Ok(inner),
                    other => Err($crate::error::AppError::UnexpectedObjectType {
                        expected: $kind,
                        actual: other.object_type(),
                    }),
                }
            }
        }
    };
}
pub(crate) use ryver_object;

/// Any wrapper, tagged by kind. Produced by [`ObjectType::wrap`].
#[derive(Debug, Clone)]
pub enum RyverObject {
    User(User),
    Forum(Forum),
    Team(Team),
    Topic(Topic),
    ChatMessage(ChatMessage),
    TopicReply(TopicReply),
    Notification(Notification),
}

impl RyverObject {
    pub fn as_object(&self) -> &dyn Object {
        match self {
            RyverObject::User(o) => o,
            RyverObject::Forum(o) => o,
            RyverObject::Team(o) => o,
            RyverObject::Topic(o) => o,
            RyverObject::ChatMessage(o) => o,
            RyverObject::TopicReply(o) => o,
            RyverObject::Notification(o) => o,
        }
    }

    pub fn object_type(&self) -> ObjectType {
        self.as_object().object_type()
    }

    pub fn id(&self) -> &ObjectId {
        self.as_object().id()
    }

    pub fn raw_data(&self) -> &Record {
        self.as_object().raw_data()
    }

    pub fn as_message(&self) -> Option<&dyn Message> {
        match self {
            RyverObject::Topic(o) => Some(o),
            RyverObject::ChatMessage(o) => Some(o),
            RyverObject::TopicReply(o) => Some(o),
            _ => None,
        }
    }

    pub fn as_chat(&self) -> Option<&dyn Chat> {
        match self {
            RyverObject::User(o) => Some(o),
            RyverObject::Forum(o) => Some(o),
            RyverObject::Team(o) => Some(o),
            _ => None,
        }
    }

    pub fn into_chat(self) -> Result<AnyChat> {
        match self {
            RyverObject::User(o) => Ok(AnyChat::User(o)),
            RyverObject::Forum(o) => Ok(AnyChat::Forum(o)),
            RyverObject::Team(o) => Ok(AnyChat::Team(o)),
            other => Err(AppError::NotAChat(other.object_type())),
        }
    }
}

/// First object whose raw record has `field == value`.
///
/// Handy for picking a chat by nickname out of a listing.
pub fn find_by_field<'a, T: Object>(objects: &'a [T], field: &str, value: &Value) -> Option<&'a T> {
    objects
        .iter()
        .find(|object| object.raw_data().get(field) == Some(value))
}
