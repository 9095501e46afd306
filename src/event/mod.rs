use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use crate::conversation::{self, model::ConversationDto};
use crate::message::model::MessageDto;
use crate::user;

pub mod service;

type Result<T> = std::result::Result<T, Error>;
pub type Service = Arc<dyn service::EventService + Send + Sync>;

/// Named channel a notification is published on.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Subject<'a> {
    /// Personal channel, one per user.
    User(&'a user::Email),
    Conversation(&'a conversation::Id),
}

impl Subject<'_> {
    /// Subjects are dot separated tokens; tokens may not be empty, contain
    /// whitespace or be wildcards.
    pub fn is_valid(&self) -> bool {
        let subject = self.to_string();
        subject.split('.').all(|token| {
            !token.is_empty()
                && !token.chars().any(char::is_whitespace)
                && !token.contains(['*', '>'])
        })
    }
}

impl fmt::Display for Subject<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Subject::User(email) => write!(f, "user.{email}"),
            Subject::Conversation(id) => write!(f, "conversation.{id}"),
        }
    }
}

#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(tag = "event", content = "data")]
pub enum Notification {
    #[serde(rename = "messages:new")]
    NewMessage(MessageDto),
    #[serde(rename = "conversation:update")]
    ConversationUpdate(ConversationUpdate),
    #[serde(rename = "conversation:new")]
    NewConversation(ConversationDto),
    #[serde(rename = "conversation:remove")]
    RemovedConversation(ConversationDto),
}

impl Notification {
    pub const fn name(&self) -> &'static str {
        match self {
            Notification::NewMessage(_) => "messages:new",
            Notification::ConversationUpdate(_) => "conversation:update",
            Notification::NewConversation(_) => "conversation:new",
            Notification::RemovedConversation(_) => "conversation:remove",
        }
    }
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct ConversationUpdate {
    pub id: conversation::Id,
    pub messages: Vec<MessageDto>,
}

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("invalid subject: {0}")]
    InvalidSubject(String),

    #[error(transparent)]
    _Publish(#[from] async_nats::PublishError),
    #[error(transparent)]
    _ParseJson(#[from] serde_json::Error),
}
