//! The closed registry of Ryver entity kinds.
//!
//! Every kind has a short token used in URLs (`users`) and a long entity
//! type string embedded in record metadata (`Entity.User`). The two are a
//! bijection over [`ObjectType::ALL`], and each kind maps to exactly one
//! wrapper constructor through [`ObjectType::wrap`].

use crate::error::{AppError, Result};
use crate::model::{
    ChatMessage, Forum, Notification, Record, RyverObject, Team, Topic, TopicReply, User,
};
use crate::session::Session;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectType {
    User,
    Forum,
    /// Called a "workroom" by the API.
    Team,
    /// Called a "post" by the API.
    Topic,
    /// Not a first-class entity on the server; modelled like one so
    /// messages resolve the same way as everything else.
    ChatMessage,
    /// Called a "post comment" by the API.
    TopicReply,
    Notification,
}

impl ObjectType {
    pub const ALL: [ObjectType; 7] = [
        ObjectType::User,
        ObjectType::Forum,
        ObjectType::Team,
        ObjectType::Topic,
        ObjectType::ChatMessage,
        ObjectType::TopicReply,
        ObjectType::Notification,
    ];

    /// Short token used to build URLs.
    pub fn token(self) -> &'static str {
        match self {
            ObjectType::User => "users",
            ObjectType::Forum => "forums",
            ObjectType::Team => "workrooms",
            ObjectType::Topic => "posts",
            ObjectType::ChatMessage => "messages",
            ObjectType::TopicReply => "postComments",
            ObjectType::Notification => "userNotifications",
        }
    }

    /// Entity type string found in `__metadata.type`.
    pub fn entity_type(self) -> &'static str {
        match self {
            ObjectType::User => "Entity.User",
            ObjectType::Forum => "Entity.Forum",
            ObjectType::Team => "Entity.Workroom",
            ObjectType::Topic => "Entity.Post",
            ObjectType::ChatMessage => "Entity.ChatMessage",
            ObjectType::TopicReply => "Entity.Post.Comment",
            ObjectType::Notification => "Entity.UserNotification",
        }
    }

    pub fn from_token(token: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.token() == token)
            .ok_or_else(|| AppError::UnknownObjectType(token.to_string()))
    }

    /// Inverse of [`entity_type`](Self::entity_type), used when decoding
    /// references embedded in other records.
    pub fn from_entity_type(entity_type: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.entity_type() == entity_type)
            .ok_or_else(|| AppError::UnknownEntityType(entity_type.to_string()))
    }

    /// Whether records of this kind can receive messages and host topics.
    pub fn is_chat(self) -> bool {
        matches!(self, ObjectType::User | ObjectType::Forum | ObjectType::Team)
    }

    /// Wraps a record of this kind in its typed view.
    pub fn wrap(self, session: Session, record: Record) -> Result<RyverObject> {
        Ok(match self {
            ObjectType::User => RyverObject::User(User::new(session, record)?),
            ObjectType::Forum => RyverObject::Forum(Forum::new(session, record)?),
            ObjectType::Team => RyverObject::Team(Team::new(session, record)?),
            ObjectType::Topic => RyverObject::Topic(Topic::new(session, record)?),
            ObjectType::ChatMessage => {
                RyverObject::ChatMessage(ChatMessage::new(session, record)?)
            }
            ObjectType::TopicReply => RyverObject::TopicReply(TopicReply::new(session, record)?),
            ObjectType::Notification => {
                RyverObject::Notification(Notification::new(session, record)?)
            }
        })
    }
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for ObjectType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_token(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_and_entity_type_round_trip() {
        for kind in ObjectType::ALL {
            assert_eq!(ObjectType::from_token(kind.token()).unwrap(), kind);
            assert_eq!(ObjectType::from_entity_type(kind.entity_type()).unwrap(), kind);
            let entity = kind.entity_type();
            let token = ObjectType::from_entity_type(entity).unwrap().token();
            assert_eq!(ObjectType::from_token(token).unwrap().entity_type(), entity);
        }
    }

    #[test]
    fn known_pairs() {
        assert_eq!(ObjectType::Team.token(), "workrooms");
        assert_eq!(ObjectType::Team.entity_type(), "Entity.Workroom");
        assert_eq!(ObjectType::TopicReply.entity_type(), "Entity.Post.Comment");
        assert_eq!(
            ObjectType::from_entity_type("Entity.ChatMessage").unwrap(),
            ObjectType::ChatMessage
        );
    }

    #[test]
    fn unknown_lookups_fail_loudly() {
        assert!(matches!(
            ObjectType::from_token("channels"),
            Err(AppError::UnknownObjectType(t)) if t == "channels"
        ));
        assert!(matches!(
            ObjectType::from_entity_type("Entity.Task"),
            Err(AppError::UnknownEntityType(t)) if t == "Entity.Task"
        ));
    }

    #[test]
    fn only_users_forums_and_teams_are_chats() {
        let chats: Vec<_> = ObjectType::ALL.into_iter().filter(|k| k.is_chat()).collect();
        assert_eq!(
            chats,
            vec![ObjectType::User, ObjectType::Forum, ObjectType::Team]
        );
    }
}
