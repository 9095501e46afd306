use chrono::{DateTime, Utc};
use diesel::prelude::{Identifiable, Insertable, Queryable, Selectable};
use serde::Serialize;

use crate::user::{
    self,
    model::{User, UserDto},
};

use super::Id;

#[derive(Queryable, Selectable, Identifiable, Clone, Debug, PartialEq)]
#[diesel(table_name = crate::schema::conversations)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Conversation {
    id: Id,
    name: Option<String>,
    is_group: bool,
    logo: Option<String>,
    created_at: DateTime<Utc>,
    last_message_at: DateTime<Utc>,
}

impl Conversation {
    pub const fn id(&self) -> &Id {
        &self.id
    }
}

#[cfg(test)]
impl Conversation {
    pub const fn is_group(&self) -> bool {
        self.is_group
    }

    pub const fn last_message_at(&self) -> &DateTime<Utc> {
        &self.last_message_at
    }

    pub fn new(id: Id, name: Option<&str>, is_group: bool) -> Self {
        let now = Utc::now();
        Self {
            id,
            name: name.map(String::from),
            is_group,
            logo: None,
            created_at: now,
            last_message_at: now,
        }
    }

    pub fn with_last_message_at(self, last_message_at: DateTime<Utc>) -> Self {
        Self {
            last_message_at,
            ..self
        }
    }
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::conversations)]
pub struct NewConversation<'a> {
    id: Id,
    name: Option<&'a str>,
    is_group: bool,
}

impl<'a> NewConversation<'a> {
    pub fn direct() -> Self {
        Self {
            id: Id::random(),
            name: None,
            is_group: false,
        }
    }

    pub fn group(name: &'a str) -> Self {
        Self {
            id: Id::random(),
            name: Some(name),
            is_group: true,
        }
    }

    pub const fn id(&self) -> &Id {
        &self.id
    }

    #[cfg(test)]
    pub const fn name(&self) -> Option<&str> {
        self.name
    }

    #[cfg(test)]
    pub const fn is_group(&self) -> bool {
        self.is_group
    }
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::conversations_users)]
pub struct NewMember<'a> {
    conversation_id: &'a Id,
    user_id: &'a user::Id,
}

impl<'a> NewMember<'a> {
    pub fn new(conversation_id: &'a Id, user_id: &'a user::Id) -> Self {
        Self {
            conversation_id,
            user_id,
        }
    }
}

/// A conversation together with everyone taking part in it.
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ConversationDto {
    id: Id,
    name: Option<String>,
    is_group: bool,
    logo: Option<String>,
    created_at: DateTime<Utc>,
    last_message_at: DateTime<Utc>,
    users: Vec<UserDto>,
}

impl ConversationDto {
    pub fn new(c: Conversation, users: Vec<User>) -> Self {
        Self {
            id: c.id,
            name: c.name,
            is_group: c.is_group,
            logo: c.logo,
            created_at: c.created_at,
            last_message_at: c.last_message_at,
            users: users.into_iter().map(UserDto::from).collect(),
        }
    }

    pub const fn id(&self) -> &Id {
        &self.id
    }

    pub fn users(&self) -> &[UserDto] {
        &self.users
    }

    pub fn has_member(&self, user_id: &user::Id) -> bool {
        self.users.iter().any(|u| u.id() == user_id)
    }
}
