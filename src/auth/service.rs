use async_trait::async_trait;
use log::warn;
use messenger_crm::Raw;
use uuid::Uuid;

use super::Session;

use crate::integration::cache;
use crate::user;

#[async_trait]
pub trait AuthService {
    /// Resolves the user bound to a session by the external authenticator.
    async fn find_user_id(&self, sid: &Session) -> Option<user::Id>;
}

#[derive(Clone)]
pub struct AuthServiceImpl {
    redis: cache::Redis,
}

impl AuthServiceImpl {
    pub fn new(redis: cache::Redis) -> Self {
        Self { redis }
    }
}

#[async_trait]
impl AuthService for AuthServiceImpl {
    async fn find_user_id(&self, sid: &Session) -> Option<user::Id> {
        let value = self
            .redis
            .get::<String>(cache::Key::Session(sid.raw()))
            .await?;

        match Uuid::parse_str(&value) {
            Ok(id) => Some(user::Id::from(id)),
            Err(e) => {
                warn!("malformed user id bound to {sid:?}: {e}");
                None
            }
        }
    }
}
