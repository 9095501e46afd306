use axum::http::StatusCode;

impl From<super::Error> for StatusCode {
    fn from(e: super::Error) -> Self {
        match e {
            super::Error::EmptyContent => Self::BAD_REQUEST,
            super::Error::TemplateNotFound(_) => Self::NOT_FOUND,
            super::Error::_Conversation(e) => e.into(),
            super::Error::_R2d2(_) | super::Error::_Diesel(_) => Self::INTERNAL_SERVER_ERROR,
        }
    }
}

pub(super) mod api {
    use axum::{
        Extension, Json,
        extract::{State, rejection::JsonRejection},
    };
    use axum_extra::extract::Query;
    use serde::Deserialize;

    use crate::{
        auth, conversation,
        error::Error,
        message::{self, model::Content, model::MessageDto},
        template,
    };

    #[derive(Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CreateParams {
        message: Option<String>,
        image: Option<String>,
        audio: Option<String>,
        conversation_id: conversation::Id,
        template_id: Option<template::Id>,
    }

    pub async fn create(
        Extension(auth_user): Extension<auth::User>,
        message_service: State<message::Service>,
        payload: Result<Json<CreateParams>, JsonRejection>,
    ) -> crate::Result<Json<MessageDto>> {
        let Json(params) = payload?;

        let content = Content::new(params.message, params.image, params.audio);
        let msg = message_service
            .create(
                &auth_user,
                &params.conversation_id,
                content,
                params.template_id.as_ref(),
            )
            .await?;

        Ok(Json(msg))
    }

    #[derive(Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct FindParams {
        conversation_id: Option<conversation::Id>,
    }

    pub async fn find_all(
        Extension(auth_user): Extension<auth::User>,
        message_service: State<message::Service>,
        Query(params): Query<FindParams>,
    ) -> crate::Result<Json<Vec<MessageDto>>> {
        let conversation_id = params
            .conversation_id
            .ok_or(Error::QueryParamRequired("conversationId".to_owned()))?;

        let messages = message_service
            .find_by_conversation(&auth_user, &conversation_id)
            .await?;

        Ok(Json(messages))
    }
}
