//! Chats: users, forums and teams.

use super::{ryver_object, ChatMessage, Object, ObjectCore, Record, Topic};
use crate::api::pagination::QueryJoin;
use crate::api::responses::{parse_envelope, Created, Envelope, PageResponse, RecordResponse};
use crate::constants::{
    FIELD_NAME, FIELD_NICKNAME, FIELD_USER_DISPLAY_NAME, FIELD_USER_EMAIL_ADDR,
    FIELD_USER_USERNAME,
};
use crate::error::{AppError, Result};
use crate::types::{Creator, ObjectId, ObjectType};
use serde_json::json;

/// Anything that can receive messages and host topics.
#[async_trait::async_trait]
pub trait Chat: Object + Send + Sync {
    /// `<token>(<id>)`, the base of every chat endpoint.
    fn endpoint(&self) -> String {
        format!("{}({})", self.object_type().token(), self.id())
    }

    /// Sends a message and returns its (string) id. Sends a request.
    async fn send_message(&self, message: &str, creator: Option<&Creator>) -> Result<ObjectId> {
        let path = format!("{}/Chat.PostMessage()", self.endpoint());
        let mut data = json!({ "body": message });
        if let Some(creator) = creator {
            data["createSource"] = creator.to_json();
        }

        let body = self.session().post(&path, Some(&data)).await?;
        let created: Envelope<Created> = parse_envelope(body, &path)?;
        ObjectId::from_json(&created.d.id).ok_or_else(|| {
            AppError::MalformedResponse(format!("message id missing from {} response", path))
        })
    }

    /// Creates a topic in this chat and returns it. Sends a request.
    ///
    /// The topic belongs to the chat through the `outAssociations` link,
    /// not through anything in the subject or body.
    async fn create_topic(
        &self,
        subject: &str,
        body: &str,
        creator: Option<&Creator>,
    ) -> Result<Topic> {
        let path = ObjectType::Topic.token();
        let mut data = json!({
            "body": body,
            "subject": subject,
            "outAssociations": {
                "results": [
                    {
                        "inSecured": true,
                        "inType": self.entity_type(),
                        "inId": self.id().to_json(),
                    }
                ]
            },
            "recordType": "note",
        });
        if let Some(creator) = creator {
            data["createSource"] = creator.to_json();
        }

        let response = self.session().post(path, Some(&data)).await?;
        let response: RecordResponse = parse_envelope(response, path)?;
        Topic::new(self.session().clone(), Record::new(response.d.results))
    }

    /// Topics in this chat. Sends one request per page.
    ///
    /// `top` of `None` fetches everything; `skip` drops that many first.
    async fn topics(&self, archived: bool, top: Option<usize>, skip: usize) -> Result<Vec<Topic>> {
        let path = format!(
            "{}/Post.Stream(archived={})?$format=json",
            self.endpoint(),
            archived
        );
        let records = self
            .session()
            .list_records(&path, QueryJoin::Append, top, skip)
            .await?;
        records
            .into_iter()
            .map(|record| Topic::new(self.session().clone(), record))
            .collect()
    }

    /// The `count` most recent messages, newest first. Sends one request.
    async fn messages(&self, count: usize) -> Result<Vec<ChatMessage>> {
        let path = format!(
            "{}/Chat.History()?$format=json&$top={}",
            self.endpoint(),
            count
        );
        let body = self.session().get(&path).await?;
        let page: PageResponse = parse_envelope(body, &path)?;
        page.d
            .results
            .into_iter()
            .map(|value| ChatMessage::new(self.session().clone(), Record::from_value(value)?))
            .collect()
    }
}

/// Forums and teams share a name and a nickname.
pub trait GroupChat: Chat {
    fn name(&self) -> Result<&str> {
        self.raw_data().str_at(&[FIELD_NAME])
    }

    fn nickname(&self) -> Result<&str> {
        self.raw_data().str_at(&[FIELD_NICKNAME])
    }
}

/// A user; messaging a user is a direct message.
#[derive(Debug, Clone)]
pub struct User {
    core: ObjectCore,
}

ryver_object!(User, ObjectType::User);

impl User {
    pub fn username(&self) -> Result<&str> {
        self.raw_data().str_at(&[FIELD_USER_USERNAME])
    }

    pub fn display_name(&self) -> Result<&str> {
        self.raw_data().str_at(&[FIELD_USER_DISPLAY_NAME])
    }

    pub fn email_address(&self) -> Result<&str> {
        self.raw_data().str_at(&[FIELD_USER_EMAIL_ADDR])
    }

    /// Activates or deactivates the account. Requires admin. Sends a request.
    pub async fn set_activated(&self, activated: bool) -> Result<()> {
        let path = format!("{}/User.Active.Set(value='{}')", self.endpoint(), activated);
        self.session().post(&path, None).await?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl Chat for User {}

#[derive(Debug, Clone)]
pub struct Forum {
    core: ObjectCore,
}

ryver_object!(Forum, ObjectType::Forum);

#[async_trait::async_trait]
impl Chat for Forum {}

impl GroupChat for Forum {}

/// A team ("workroom").
#[derive(Debug, Clone)]
pub struct Team {
    core: ObjectCore,
}

ryver_object!(Team, ObjectType::Team);

#[async_trait::async_trait]
impl Chat for Team {}

impl GroupChat for Team {}

/// Any of the chat kinds, as returned by chat listings and lookups.
#[derive(Debug, Clone)]
pub enum AnyChat {
    User(User),
    Forum(Forum),
    Team(Team),
}

impl AnyChat {
    pub fn as_user(&self) -> Option<&User> {
        match self {
            AnyChat::User(user) => Some(user),
            _ => None,
        }
    }

    pub fn as_group(&self) -> Option<&dyn GroupChat> {
        match self {
            AnyChat::Forum(forum) => Some(forum),
            AnyChat::Team(team) => Some(team),
            AnyChat::User(_) => None,
        }
    }

    /// A human-readable label: the username for users, the name otherwise.
    pub fn display_label(&self) -> Result<&str> {
        match self {
            AnyChat::User(user) => user.username(),
            AnyChat::Forum(forum) => forum.name(),
            AnyChat::Team(team) => team.name(),
        }
    }
}

impl Object for AnyChat {
    fn core(&self) -> &ObjectCore {
        match self {
            AnyChat::User(user) => user.core(),
            AnyChat::Forum(forum) => forum.core(),
            AnyChat::Team(team) => team.core(),
        }
    }
}

#[async_trait::async_trait]
impl Chat for AnyChat {}
