use std::sync::Arc;

use axum::{Router, routing::get};
use diesel::{deserialize::FromSqlRow, expression::AsExpression};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{state::AppState, user};

mod handler;
pub mod model;
pub mod repository;
pub mod service;

type Result<T> = std::result::Result<T, Error>;
pub type Repository = Arc<dyn repository::ConversationRepository + Send + Sync>;
pub type Service = Arc<dyn service::ConversationService + Send + Sync>;

pub fn api<S>(s: AppState) -> Router<S> {
    Router::new()
        .route(
            "/conversations",
            get(handler::api::find_all).post(handler::api::create),
        )
        .route(
            "/conversations/{id}",
            get(handler::api::find_one).delete(handler::api::delete),
        )
        .with_state(s)
}

#[derive(Clone, Debug, Deserialize, Serialize, Hash, PartialEq, Eq, FromSqlRow, AsExpression)]
#[diesel(sql_type = diesel::sql_types::Uuid)]
pub struct Id(Uuid);

messenger_crm::uuid_id!(Id);

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("conversation not found: {0:?}")]
    NotFound(Id),
    #[error("not enough members: {0}")]
    NotEnoughMembers(usize),
    #[error("missing group name")]
    MissingName,
    #[error("missing recipient")]
    MissingRecipient,
    #[error("cannot start a conversation with yourself")]
    SelfReference,
    #[error("selected user does not exist: {0}")]
    NonExistingUser(user::Id),

    #[error(transparent)]
    _User(#[from] user::Error),
    #[error(transparent)]
    _R2d2(#[from] r2d2::Error),
    #[error(transparent)]
    _Diesel(#[from] diesel::result::Error),
}
