use chrono::{DateTime, Utc};
use diesel::prelude::{Queryable, Selectable};
use serde::Serialize;

use super::{Email, Id};

#[derive(Queryable, Selectable, Clone, Debug, PartialEq)]
#[diesel(table_name = crate::schema::users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct User {
    id: Id,
    email: Email,
    name: Option<String>,
    image: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    last_seen: Option<DateTime<Utc>>,
}

impl User {
    pub const fn id(&self) -> &Id {
        &self.id
    }

    pub const fn email(&self) -> &Email {
        &self.email
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

#[cfg(test)]
impl User {
    pub fn new(id: Id, email: impl Into<String>, name: Option<&str>) -> Self {
        let now = Utc::now();
        Self {
            id,
            email: Email::new(email),
            name: name.map(String::from),
            image: None,
            created_at: now,
            updated_at: now,
            last_seen: None,
        }
    }
}

/// Public projection of a user. Never carries credentials.
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    id: Id,
    email: Email,
    name: Option<String>,
    image: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    last_seen: Option<DateTime<Utc>>,
}

impl UserDto {
    pub const fn id(&self) -> &Id {
        &self.id
    }

    pub const fn email(&self) -> &Email {
        &self.email
    }
}

impl From<User> for UserDto {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            email: u.email,
            name: u.name,
            image: u.image,
            created_at: u.created_at,
            updated_at: u.updated_at,
            last_seen: u.last_seen,
        }
    }
}
