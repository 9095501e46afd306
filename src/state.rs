use std::sync::Arc;

use axum::extract::FromRef;

use crate::auth::service::AuthServiceImpl;
use crate::conversation::repository::PgConversationRepository;
use crate::conversation::service::ConversationServiceImpl;
use crate::event::service::NatsEventService;
use crate::integration::{self, cache, db};
use crate::message::repository::PgMessageRepository;
use crate::message::service::MessageServiceImpl;
use crate::user::repository::PgUserRepository;
use crate::user::service::UserServiceImpl;
use crate::{auth, conversation, message, user};

#[derive(Clone)]
pub struct AppState {
    pub auth_service: auth::Service,
    pub user_service: user::Service,
    pub conversation_service: conversation::Service,
    pub message_service: message::Service,
}

impl AppState {
    pub async fn init(config: &integration::Config) -> Self {
        let pool = db::init(&config.pg);
        let redis = cache::init(&config.redis).await;
        let pubsub = config.pubsub.connect().await;

        let event_service = Arc::new(NatsEventService::new(pubsub));
        let auth_service = Arc::new(AuthServiceImpl::new(redis));
        let user_service = Arc::new(UserServiceImpl::new(Arc::new(PgUserRepository::new(
            pool.clone(),
        ))));
        let conversation_service = Arc::new(ConversationServiceImpl::new(
            Arc::new(PgConversationRepository::new(pool.clone())),
            user_service.clone(),
            event_service.clone(),
        ));
        let message_service = Arc::new(MessageServiceImpl::new(
            Arc::new(PgMessageRepository::new(pool)),
            conversation_service.clone(),
            event_service,
        ));

        Self {
            auth_service,
            user_service,
            conversation_service,
            message_service,
        }
    }
}

impl FromRef<AppState> for auth::Service {
    fn from_ref(s: &AppState) -> Self {
        s.auth_service.clone()
    }
}

impl FromRef<AppState> for user::Service {
    fn from_ref(s: &AppState) -> Self {
        s.user_service.clone()
    }
}

impl FromRef<AppState> for conversation::Service {
    fn from_ref(s: &AppState) -> Self {
        s.conversation_service.clone()
    }
}

impl FromRef<AppState> for message::Service {
    fn from_ref(s: &AppState) -> Self {
        s.message_service.clone()
    }
}
