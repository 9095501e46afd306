use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use log::{debug, error};

use crate::{auth, conversation, message, user};

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("query parameter is required: {0}")]
    QueryParamRequired(String),

    #[error(transparent)]
    _Auth(#[from] auth::Error),
    #[error(transparent)]
    _Conversation(#[from] conversation::Error),
    #[error(transparent)]
    _Message(#[from] message::Error),
    #[error(transparent)]
    _User(#[from] user::Error),

    #[error(transparent)]
    _Json(#[from] JsonRejection),
}

impl From<Error> for StatusCode {
    fn from(e: Error) -> Self {
        match e {
            Error::QueryParamRequired(_) | Error::_Json(_) => StatusCode::BAD_REQUEST,
            Error::_Auth(e) => e.into(),
            Error::_Conversation(e) => e.into(),
            Error::_Message(e) => e.into(),
            Error::_User(e) => e.into(),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let message = self.to_string();
        let status = StatusCode::from(self);

        if status.is_server_error() {
            error!("{message}");
            return (status, "Internal server error").into_response();
        }

        debug!("{status}: {message}");
        (status, message).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_hide_details_of_server_errors() {
        let e = Error::from(user::Error::_Diesel(diesel::result::Error::NotFound));
        let res = e.into_response();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn should_map_domain_errors_to_status() {
        let cases: Vec<(Error, StatusCode)> = vec![
            (auth::Error::Unauthorized.into(), StatusCode::UNAUTHORIZED),
            (
                conversation::Error::NotEnoughMembers(1).into(),
                StatusCode::BAD_REQUEST,
            ),
            (
                conversation::Error::NotFound(conversation::Id::random()).into(),
                StatusCode::NOT_FOUND,
            ),
            (message::Error::EmptyContent.into(), StatusCode::BAD_REQUEST),
            (
                message::Error::_Conversation(conversation::Error::NotFound(
                    conversation::Id::random(),
                ))
                .into(),
                StatusCode::NOT_FOUND,
            ),
            (
                Error::QueryParamRequired("conversationId".into()),
                StatusCode::BAD_REQUEST,
            ),
        ];

        for (e, expected) in cases {
            assert_eq!(StatusCode::from(e), expected);
        }
    }
}
