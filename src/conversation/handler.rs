use axum::http::StatusCode;

impl From<super::Error> for StatusCode {
    fn from(e: super::Error) -> Self {
        match e {
            super::Error::NotFound(_) => Self::NOT_FOUND,
            super::Error::NotEnoughMembers(_)
            | super::Error::MissingName
            | super::Error::MissingRecipient
            | super::Error::SelfReference
            | super::Error::NonExistingUser(_) => Self::BAD_REQUEST,
            super::Error::_User(e) => e.into(),
            super::Error::_R2d2(_) | super::Error::_Diesel(_) => Self::INTERNAL_SERVER_ERROR,
        }
    }
}

pub(super) mod api {
    use axum::{
        Extension, Json,
        extract::{Path, State, rejection::JsonRejection},
    };
    use serde::{Deserialize, Serialize};

    use crate::{
        auth,
        conversation::{self, model::ConversationDto},
        user,
    };

    #[derive(Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CreateParams {
        user_id: Option<user::Id>,
        #[serde(default)]
        is_group: bool,
        #[serde(default)]
        members: Vec<user::Id>,
        name: Option<String>,
    }

    pub async fn create(
        Extension(auth_user): Extension<auth::User>,
        conversation_service: State<conversation::Service>,
        payload: Result<Json<CreateParams>, JsonRejection>,
    ) -> crate::Result<Json<ConversationDto>> {
        let Json(params) = payload?;

        let conversation = if params.is_group {
            let name = params.name.unwrap_or_default();
            conversation_service
                .create_group(&auth_user, &name, &params.members)
                .await?
        } else {
            conversation_service
                .create_direct(&auth_user, params.user_id.as_ref())
                .await?
        };

        Ok(Json(conversation))
    }

    pub async fn find_all(
        Extension(auth_user): Extension<auth::User>,
        conversation_service: State<conversation::Service>,
    ) -> crate::Result<Json<Vec<ConversationDto>>> {
        let conversations = conversation_service.find_all(&auth_user).await?;
        Ok(Json(conversations))
    }

    pub async fn find_one(
        Extension(auth_user): Extension<auth::User>,
        conversation_service: State<conversation::Service>,
        Path(id): Path<conversation::Id>,
    ) -> crate::Result<Json<ConversationDto>> {
        let conversation = conversation_service.find_one(&auth_user, &id).await?;
        Ok(Json(conversation))
    }

    #[derive(Serialize)]
    pub struct Deleted {
        count: usize,
    }

    pub async fn delete(
        Extension(auth_user): Extension<auth::User>,
        conversation_service: State<conversation::Service>,
        Path(id): Path<conversation::Id>,
    ) -> crate::Result<Json<Deleted>> {
        let count = conversation_service.delete(&auth_user, &id).await?;
        Ok(Json(Deleted { count }))
    }
}
