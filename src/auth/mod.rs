use std::fmt;
use std::sync::Arc;

use axum::http::StatusCode;
use axum_extra::extract::cookie::Cookie;
use messenger_crm::{Raw, Redact};

use crate::user;

pub mod middleware;
pub mod service;

pub type Service = Arc<dyn service::AuthService + Send + Sync>;

/// Identity of the caller, resolved once per request from the session
/// cookie and handed explicitly to every service call.
#[derive(Clone, Debug)]
pub struct User {
    id: user::Id,
    email: user::Email,
    name: Option<String>,
}

impl User {
    pub fn new(id: user::Id, email: user::Email, name: Option<String>) -> Self {
        Self { id, email, name }
    }

    pub const fn id(&self) -> &user::Id {
        &self.id
    }

    pub const fn email(&self) -> &user::Email {
        &self.email
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

impl From<user::model::User> for User {
    fn from(u: user::model::User) -> Self {
        Self::new(
            u.id().clone(),
            u.email().clone(),
            u.name().map(String::from),
        )
    }
}

#[derive(PartialEq)]
pub struct Session(String);

impl Session {
    pub const ID: &str = "session_id";

    pub fn new(sid: impl Into<String>) -> Self {
        Self(sid.into())
    }
}

impl Redact for Session {}

impl Raw for Session {
    fn raw(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Session({})", self.redact())
    }
}

impl From<&Cookie<'_>> for Session {
    fn from(c: &Cookie<'_>) -> Self {
        Self::new(c.value())
    }
}

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("unauthorized to access the resource")]
    Unauthorized,
}

impl From<Error> for StatusCode {
    fn from(e: Error) -> Self {
        match e {
            Error::Unauthorized => Self::UNAUTHORIZED,
        }
    }
}
