use chrono::{DateTime, Utc};
use diesel::prelude::{Insertable, Queryable, Selectable};
use serde::Serialize;

use crate::conversation;
use crate::template::{self, TemplateDto};
use crate::user::{self, model::UserDto};

use super::Id;

#[derive(Queryable, Selectable, Clone, Debug, PartialEq)]
#[diesel(table_name = crate::schema::messages)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Message {
    id: Id,
    conversation_id: conversation::Id,
    sender_id: user::Id,
    body: Option<String>,
    image: Option<String>,
    audio: Option<String>,
    from_template: bool,
    template_id: Option<template::Id>,
    created_at: DateTime<Utc>,
}

impl Message {
    pub const fn id(&self) -> &Id {
        &self.id
    }

    pub const fn conversation_id(&self) -> &conversation::Id {
        &self.conversation_id
    }

    pub const fn sender_id(&self) -> &user::Id {
        &self.sender_id
    }

    pub const fn template_id(&self) -> Option<&template::Id> {
        self.template_id.as_ref()
    }

    pub const fn created_at(&self) -> &DateTime<Utc> {
        &self.created_at
    }
}

#[cfg(test)]
impl From<&NewMessage<'_>> for Message {
    fn from(m: &NewMessage<'_>) -> Self {
        Self {
            id: m.id.clone(),
            conversation_id: m.conversation_id.clone(),
            sender_id: m.sender_id.clone(),
            body: m.body.map(String::from),
            image: m.image.map(String::from),
            audio: m.audio.map(String::from),
            from_template: m.from_template,
            template_id: m.template_id.cloned(),
            created_at: Utc::now(),
        }
    }
}

/// What a message carries. Blank parts count as absent.
#[derive(Clone, Debug, Default)]
pub struct Content {
    body: Option<String>,
    image: Option<String>,
    audio: Option<String>,
}

impl Content {
    pub fn new(body: Option<String>, image: Option<String>, audio: Option<String>) -> Self {
        let non_blank = |s: Option<String>| s.filter(|s| !s.trim().is_empty());
        Self {
            body: non_blank(body),
            image: non_blank(image),
            audio: non_blank(audio),
        }
    }

    #[cfg(test)]
    pub fn text(body: &str) -> Self {
        Self::new(Some(body.to_string()), None, None)
    }

    pub const fn is_empty(&self) -> bool {
        self.body.is_none() && self.image.is_none() && self.audio.is_none()
    }
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::messages)]
pub struct NewMessage<'a> {
    id: Id,
    conversation_id: &'a conversation::Id,
    sender_id: &'a user::Id,
    body: Option<&'a str>,
    image: Option<&'a str>,
    audio: Option<&'a str>,
    from_template: bool,
    template_id: Option<&'a template::Id>,
}

impl<'a> NewMessage<'a> {
    pub fn new(
        conversation_id: &'a conversation::Id,
        sender_id: &'a user::Id,
        content: &'a Content,
        template_id: Option<&'a template::Id>,
    ) -> Self {
        Self {
            id: Id::random(),
            conversation_id,
            sender_id,
            body: content.body.as_deref(),
            image: content.image.as_deref(),
            audio: content.audio.as_deref(),
            from_template: template_id.is_some(),
            template_id,
        }
    }

    pub const fn template_id(&self) -> Option<&template::Id> {
        self.template_id
    }
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::messages_seen)]
pub struct NewSeen<'a> {
    message_id: &'a Id,
    user_id: &'a user::Id,
}

impl<'a> NewSeen<'a> {
    pub fn new(message_id: &'a Id, user_id: &'a user::Id) -> Self {
        Self {
            message_id,
            user_id,
        }
    }
}

#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MessageDto {
    id: Id,
    conversation_id: conversation::Id,
    body: Option<String>,
    image: Option<String>,
    audio: Option<String>,
    created_at: DateTime<Utc>,
    from_template: bool,
    sender: UserDto,
    seen: Vec<UserDto>,
    message_template: Option<TemplateDto>,
}

impl MessageDto {
    pub fn new(
        m: Message,
        sender: UserDto,
        seen: Vec<UserDto>,
        template: Option<TemplateDto>,
    ) -> Self {
        Self {
            id: m.id,
            conversation_id: m.conversation_id,
            body: m.body,
            image: m.image,
            audio: m.audio,
            created_at: m.created_at,
            from_template: m.from_template,
            sender,
            seen,
            message_template: template,
        }
    }

    pub const fn id(&self) -> &Id {
        &self.id
    }
}

#[cfg(test)]
impl MessageDto {
    pub const fn sender(&self) -> &UserDto {
        &self.sender
    }

    pub fn seen(&self) -> &[UserDto] {
        &self.seen
    }

    pub fn body(&self) -> Option<&str> {
        self.body.as_deref()
    }

    pub const fn message_template(&self) -> Option<&TemplateDto> {
        self.message_template.as_ref()
    }
}
