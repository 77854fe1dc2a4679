//! Messages: topics, topic replies and chat messages.

use super::{ryver_object, AnyChat, Object, ObjectCore, Record, User};
use crate::api::pagination::QueryJoin;
use crate::api::responses::{parse_envelope, RecordResponse};
use crate::error::{AppError, Result};
use crate::types::{Creator, ObjectId, ObjectType};
use indexmap::IndexMap;
use serde_json::{json, Map, Value};

/// Anything with a body, an author and emoji reactions.
#[async_trait::async_trait]
pub trait Message: Object + Send + Sync {
    fn body(&self) -> Result<&str>;

    /// The alternate identity the message was posted under, if any.
    ///
    /// This is not the author: it only overrides the displayed name and
    /// avatar. `None` when the record carries no `createSource`.
    fn creator(&self) -> Result<Option<Creator>> {
        match self.raw_data().get("createSource") {
            None | Some(Value::Null) => Ok(None),
            Some(source) => serde_json::from_value(source.clone())
                .map(Some)
                .map_err(|_| AppError::MalformedRecord {
                    field: "createSource".to_string(),
                }),
        }
    }

    fn author_id(&self) -> Result<ObjectId>;

    /// Fetches the author. Sends a request.
    async fn author(&self) -> Result<User> {
        let author_id = self.author_id()?;
        self.session().get_user(author_id).await
    }

    /// Reacts with an emoji given by name (e.g. "thumbsup"). Sends a request.
    async fn react(&self, emoji: &str) -> Result<()> {
        let path = format!(
            "{}({})/React(reaction='{}')",
            self.object_type().token(),
            self.id(),
            emoji
        );
        self.session().post(&path, None).await?;
        Ok(())
    }

    /// `{emoji: [user ids]}` as the server reported it.
    fn reactions(&self) -> Result<&Map<String, Value>> {
        self.raw_data().object_at(&["__reactions"])
    }

    /// `{emoji: number of reactors}`, keeping every emoji key, even those
    /// with no reactors left.
    fn reaction_counts(&self) -> Result<IndexMap<String, usize>> {
        self.reactions()?
            .iter()
            .map(|(emoji, users)| {
                users
                    .as_array()
                    .map(|users| (emoji.clone(), users.len()))
                    .ok_or_else(|| AppError::MalformedRecord {
                        field: format!("__reactions.{}", emoji),
                    })
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Topic
// ---------------------------------------------------------------------------

/// A topic ("post") in a chat.
#[derive(Debug, Clone)]
pub struct Topic {
    core: ObjectCore,
}

ryver_object!(Topic, ObjectType::Topic);

impl Topic {
    pub fn subject(&self) -> Result<&str> {
        self.raw_data().str_at(&["subject"])
    }

    /// Replies to the topic. Sends a request.
    ///
    /// The server ignores `creator` on this endpoint; it is sent anyway so
    /// the call matches every other write.
    pub async fn reply(&self, message: &str, creator: Option<&Creator>) -> Result<TopicReply> {
        let path = format!("{}?$format=json", ObjectType::TopicReply.token());
        let mut data = json!({
            "comment": message,
            "post": {
                "id": self.id().to_json(),
            },
        });
        if let Some(creator) = creator {
            data["createSource"] = creator.to_json();
        }

        let body = self.session().post(&path, Some(&data)).await?;
        let response: RecordResponse = parse_envelope(body, &path)?;
        TopicReply::new(self.session().clone(), Record::new(response.d.results))
    }

    /// Replies to this topic, oldest first. Sends one request per page.
    ///
    /// `top` of `None` fetches everything; `skip` drops that many first.
    pub async fn replies(&self, top: Option<usize>, skip: usize) -> Result<Vec<TopicReply>> {
        let path = format!(
            "{}?$format=json&$filter=((post/id eq {}))",
            ObjectType::TopicReply.token(),
            self.id()
        );
        let records = self
            .session()
            .list_records(&path, QueryJoin::Append, top, skip)
            .await?;
        records
            .into_iter()
            .map(|record| TopicReply::new(self.session().clone(), record))
            .collect()
    }
}

#[async_trait::async_trait]
impl Message for Topic {
    fn body(&self) -> Result<&str> {
        self.raw_data().str_at(&["body"])
    }

    fn author_id(&self) -> Result<ObjectId> {
        self.raw_data().id_at(&["createUser", "id"])
    }
}

// ---------------------------------------------------------------------------
// TopicReply
// ---------------------------------------------------------------------------

/// A reply ("post comment") on a topic.
#[derive(Debug, Clone)]
pub struct TopicReply {
    core: ObjectCore,
}

ryver_object!(TopicReply, ObjectType::TopicReply);

const REPLY_AUTHOR_UNSUPPORTED: &str =
    "topic reply records carry no author, and the deferred author lookup always fails server-side";

impl TopicReply {
    /// The parent topic's id, when the record embeds it.
    pub fn topic_id(&self) -> Result<ObjectId> {
        self.raw_data().id_at(&["post", "id"])
    }
}

#[async_trait::async_trait]
impl Message for TopicReply {
    fn body(&self) -> Result<&str> {
        self.raw_data().str_at(&["comment"])
    }

    /// Always fails: see [`AppError::Unsupported`].
    fn author_id(&self) -> Result<ObjectId> {
        Err(AppError::Unsupported {
            operation: "TopicReply::author_id",
            reason: REPLY_AUTHOR_UNSUPPORTED,
        })
    }

    /// Always fails without sending anything.
    async fn author(&self) -> Result<User> {
        Err(AppError::Unsupported {
            operation: "TopicReply::author",
            reason: REPLY_AUTHOR_UNSUPPORTED,
        })
    }
}

// ---------------------------------------------------------------------------
// ChatMessage
// ---------------------------------------------------------------------------

/// A message sent to a user, forum or team chat. Its id is a string.
#[derive(Debug, Clone)]
pub struct ChatMessage {
    core: ObjectCore,
}

ryver_object!(ChatMessage, ObjectType::ChatMessage);

impl ChatMessage {
    /// Entity type string of the chat this was sent to.
    pub fn chat_entity_type(&self) -> Result<&str> {
        self.raw_data().str_at(&["to", "__metadata", "type"])
    }

    /// Kind of the chat this was sent to.
    pub fn chat_type(&self) -> Result<ObjectType> {
        ObjectType::from_entity_type(self.chat_entity_type()?)
    }

    /// Id of the chat this was sent to, straight from the record.
    ///
    /// Prefer this over [`chat`](Self::chat) when the id is all you need.
    pub fn chat_id(&self) -> Result<ObjectId> {
        self.raw_data().id_at(&["to", "id"])
    }

    /// Fetches the chat this was sent to. Sends a request.
    pub async fn chat(&self) -> Result<AnyChat> {
        self.session()
            .get_chat(self.chat_type()?, self.chat_id()?)
            .await
    }

    /// Deletes the message. Sends a request.
    pub async fn delete(&self) -> Result<()> {
        let path = format!(
            "{}/Chat.DeleteMessage()?$format=json",
            self.chat_endpoint()?
        );
        let data = json!({ "id": self.id().to_json() });
        self.session().post(&path, Some(&data)).await?;
        Ok(())
    }

    /// `<chat token>(<chat id>)`: chat messages are addressed through
    /// their chat, never by their own id.
    fn chat_endpoint(&self) -> Result<String> {
        Ok(format!("{}({})", self.chat_type()?.token(), self.chat_id()?))
    }
}

#[async_trait::async_trait]
impl Message for ChatMessage {
    fn body(&self) -> Result<&str> {
        self.raw_data().str_at(&["body"])
    }

    fn author_id(&self) -> Result<ObjectId> {
        self.raw_data().id_at(&["from", "id"])
    }

    async fn react(&self, emoji: &str) -> Result<()> {
        let path = format!("{}/Chat.React()", self.chat_endpoint()?);
        let data = json!({
            "id": self.id().to_json(),
            "reaction": emoji,
        });
        self.session().post(&path, Some(&data)).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::{Call, ScriptedTransport};
    use crate::session::Session;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    const PREFIX: &str = "https://acme.ryver.com/api/1/odata.svc/";

    fn setup(transport: ScriptedTransport) -> (Session, Arc<ScriptedTransport>) {
        let transport = Arc::new(transport);
        let session = Session::with_transport(transport.clone(), PREFIX);
        (session, transport)
    }

    fn record(value: Value) -> Record {
        Record::from_value(value).unwrap()
    }

    fn chat_message(session: Session) -> ChatMessage {
        ChatMessage::new(
            session,
            record(json!({
                "id": "5e8f0c1a",
                "body": "hello",
                "from": {"id": 3},
                "to": {"id": 42, "__metadata": {"type": "Entity.Workroom"}},
                "createSource": null,
                "__reactions": {"thumbsup": [1, 2], "smile": []}
            })),
        )
        .unwrap()
    }

    #[test]
    fn reaction_counts_keep_empty_emoji() {
        let (session, _) = setup(ScriptedTransport::new());
        let message = chat_message(session);

        let counts = message.reaction_counts().unwrap();
        assert_eq!(counts.get("thumbsup"), Some(&2));
        assert_eq!(counts.get("smile"), Some(&0));
        assert_eq!(counts.len(), 2);
    }

    #[test]
    fn creator_is_absent_unless_create_source_is_present() {
        let (session, _) = setup(ScriptedTransport::new());
        assert_eq!(chat_message(session.clone()).creator().unwrap(), None);

        let topic = Topic::new(
            session,
            record(json!({
                "id": 9,
                "createSource": {"displayName": "Bot", "avatar": "https://a/b.png"}
            })),
        )
        .unwrap();
        assert_eq!(
            topic.creator().unwrap(),
            Some(Creator::new("Bot", "https://a/b.png"))
        );
    }

    #[tokio::test]
    async fn topic_reply_author_is_unsupported_without_requests() {
        let (session, transport) = setup(ScriptedTransport::new());
        let reply = TopicReply::new(
            session,
            record(json!({"id": 5, "comment": "hi", "createUser": {"id": 3}})),
        )
        .unwrap();

        assert!(reply.author_id().unwrap_err().is_unsupported());
        assert!(reply.author().await.unwrap_err().is_unsupported());
        assert!(transport.calls().is_empty());
        assert_eq!(reply.body().unwrap(), "hi");
    }

    #[test]
    fn chat_message_decodes_its_destination() {
        let (session, _) = setup(ScriptedTransport::new());
        let message = chat_message(session);

        assert_eq!(message.chat_type().unwrap(), ObjectType::Team);
        assert_eq!(message.chat_id().unwrap(), ObjectId::Int(42));
        assert_eq!(message.author_id().unwrap(), ObjectId::Int(3));
        assert_eq!(message.body().unwrap(), "hello");
    }

    #[tokio::test]
    async fn chat_message_react_targets_the_chat() {
        let (session, transport) = setup(ScriptedTransport::new().reply(Value::Null));
        chat_message(session).react("thumbsup").await.unwrap();

        assert_eq!(
            transport.calls(),
            vec![Call::Post(
                format!("{}workrooms(42)/Chat.React()", PREFIX),
                Some(json!({"id": "5e8f0c1a", "reaction": "thumbsup"}))
            )]
        );
    }

    #[tokio::test]
    async fn generic_react_targets_the_message_itself() {
        let (session, transport) = setup(ScriptedTransport::new().reply(Value::Null));
        let topic = Topic::new(session, record(json!({"id": 9}))).unwrap();
        topic.react("tada").await.unwrap();

        assert_eq!(
            transport.calls(),
            vec![Call::Post(
                format!("{}posts(9)/React(reaction='tada')", PREFIX),
                None
            )]
        );
    }

    #[tokio::test]
    async fn chat_message_delete() {
        let (session, transport) = setup(ScriptedTransport::new().reply(Value::Null));
        chat_message(session).delete().await.unwrap();

        assert_eq!(
            transport.calls(),
            vec![Call::Post(
                format!("{}workrooms(42)/Chat.DeleteMessage()?$format=json", PREFIX),
                Some(json!({"id": "5e8f0c1a"}))
            )]
        );
    }

    #[tokio::test]
    async fn chat_message_fetches_its_chat() {
        let (session, transport) = setup(
            ScriptedTransport::new()
                .reply(json!({"d": {"results": {"id": 42, "name": "Dev", "nickname": "dev"}}})),
        );
        let chat = chat_message(session).chat().await.unwrap();

        assert!(matches!(chat, AnyChat::Team(_)));
        assert_eq!(chat.id(), &ObjectId::Int(42));
        assert_eq!(transport.calls(), vec![Call::Get(format!("{}workrooms(42)", PREFIX))]);
    }

    #[tokio::test]
    async fn topic_author_is_fetched_as_a_user() {
        let (session, transport) = setup(
            ScriptedTransport::new()
                .reply(json!({"d": {"results": {"id": 3, "username": "alice"}}})),
        );
        let topic = Topic::new(session, record(json!({"id": 9, "createUser": {"id": 3}}))).unwrap();

        let author = topic.author().await.unwrap();
        assert_eq!(author.username().unwrap(), "alice");
        assert_eq!(transport.calls(), vec![Call::Get(format!("{}users(3)", PREFIX))]);
    }

    #[tokio::test]
    async fn topic_reply_posts_a_comment() {
        let (session, transport) = setup(
            ScriptedTransport::new()
                .reply(json!({"d": {"results": {"id": 77, "comment": "thanks"}}})),
        );
        let topic = Topic::new(session, record(json!({"id": 9}))).unwrap();
        let creator = Creator::new("Bot", "https://a/b.png");

        let reply = topic.reply("thanks", Some(&creator)).await.unwrap();

        assert_eq!(reply.id(), &ObjectId::Int(77));
        assert_eq!(reply.body().unwrap(), "thanks");
        assert_eq!(
            transport.calls(),
            vec![Call::Post(
                format!("{}postComments?$format=json", PREFIX),
                Some(json!({
                    "comment": "thanks",
                    "post": {"id": 9},
                    "createSource": {"displayName": "Bot", "avatar": "https://a/b.png"}
                }))
            )]
        );
    }

    #[tokio::test]
    async fn topic_reply_without_creator_omits_create_source() {
        let (session, transport) = setup(
            ScriptedTransport::new()
                .reply(json!({"d": {"results": {"id": 78, "comment": "ok", "post": {"id": 9}}}})),
        );
        let topic = Topic::new(session, record(json!({"id": 9}))).unwrap();

        let reply = topic.reply("ok", None).await.unwrap();

        assert_eq!(reply.topic_id().unwrap(), ObjectId::Int(9));
        assert_eq!(reply.creator().unwrap(), None);
        assert_eq!(
            transport.calls(),
            vec![Call::Post(
                format!("{}postComments?$format=json", PREFIX),
                Some(json!({"comment": "ok", "post": {"id": 9}}))
            )]
        );
    }

    #[test]
    fn topic_reply_topic_id_needs_an_embedded_post() {
        let (session, _) = setup(ScriptedTransport::new());
        let embedded = TopicReply::new(
            session.clone(),
            record(json!({"id": 5, "comment": "hi", "post": {"id": 9}})),
        )
        .unwrap();
        assert_eq!(embedded.topic_id().unwrap(), ObjectId::Int(9));

        let bare = TopicReply::new(session, record(json!({"id": 6, "comment": "hi"}))).unwrap();
        assert!(matches!(
            bare.topic_id(),
            Err(AppError::MalformedRecord { .. })
        ));
    }

    #[tokio::test]
    async fn topic_replies_filter_by_topic() {
        let (session, transport) = setup(
            ScriptedTransport::new()
                .reply(json!({"d": {"results": [{"id": 1, "comment": "a"}]}}))
                .reply(json!({"d": {"results": []}})),
        );
        let topic = Topic::new(session, record(json!({"id": 9}))).unwrap();

        let replies = topic.replies(None, 0).await.unwrap();

        assert_eq!(replies.len(), 1);
        assert_eq!(
            transport.calls()[0],
            Call::Get(format!(
                "{}postComments?$format=json&$filter=((post/id eq 9))&$skip=0&$top=50",
                PREFIX
            ))
        );
    }
}
