use crate::api::v1::handler::ApiResponse;
use crate::application_port::*;
use crate::logger::*;
use serde::Serialize;
use std::convert::Infallible;
use thiserror::Error;
use warp::http::StatusCode;
use warp::{Rejection, reject};

pub async fn recover_error(err: Rejection) -> Result<impl warp::Reply, Infallible> {
    let error = if let Some(error) = err.find::<ApiError>() {
        error.clone()
    } else if err.is_not_found() {
        ApiError::from(ApiErrorCode::NotFound)
    } else if err.find::<reject::MethodNotAllowed>().is_some() {
        ApiError::from(ApiErrorCode::MethodNotAllowed)
    } else if let Some(e) = err.find::<warp::filters::body::BodyDeserializeError>() {
        ApiError::new(ApiErrorCode::InvalidInput, e.to_string())
    } else if let Some(e) = err.find::<reject::InvalidQuery>() {
        ApiError::new(ApiErrorCode::InvalidInput, e.to_string())
    } else if let Some(e) = err.find::<reject::InvalidHeader>() {
        ApiError::new(ApiErrorCode::InvalidInput, e.to_string())
    } else {
        error!("unhandled rejection: {:?}", err);
        ApiError::from(ApiErrorCode::InternalError)
    };

    let status = error.code.status();
    let json = warp::reply::json(&ApiResponse::<()>::err(error));
    Ok(warp::reply::with_status(json, status))
}

#[derive(Debug, Clone, Serialize)]
pub struct ApiError {
    pub code: ApiErrorCode,
    pub message: String,
}

impl ApiError {
    pub fn new(code: ApiErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }
}

impl reject::Reject for ApiError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApiErrorCode {
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("Missing or invalid token")]
    Unauthorized,
    #[error("Email already registered")]
    EmailTaken,
    #[error("Not found")]
    NotFound,
    #[error("Method not allowed")]
    MethodNotAllowed,
    #[error("Invalid input")]
    InvalidInput,
    #[error("Service temporarily unavailable")]
    Unavailable,
    #[error("Internal error")]
    InternalError,
}

impl ApiErrorCode {
    pub fn internal<E: std::fmt::Display>(error: E) -> ApiErrorCode {
        warn!("Internal error: {}", error);
        ApiErrorCode::InternalError
    }

    pub fn unavailable<E: std::fmt::Display>(error: E) -> ApiErrorCode {
        warn!("Backend unavailable: {}", error);
        ApiErrorCode::Unavailable
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiErrorCode::InvalidCredentials | ApiErrorCode::Unauthorized => {
                StatusCode::UNAUTHORIZED
            }
            ApiErrorCode::EmailTaken => StatusCode::CONFLICT,
            ApiErrorCode::NotFound => StatusCode::NOT_FOUND,
            ApiErrorCode::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiErrorCode::InvalidInput => StatusCode::BAD_REQUEST,
            ApiErrorCode::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
            ApiErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ApiErrorCode> for ApiError {
    fn from(code: ApiErrorCode) -> Self {
        ApiError::new(code, code.to_string())
    }
}

impl From<SessionError> for ApiError {
    fn from(error: SessionError) -> Self {
        let code = match error {
            SessionError::Unauthorized => ApiErrorCode::Unauthorized,
            SessionError::StoreUnavailable(e) => ApiErrorCode::unavailable(e),
            SessionError::Internal(e) => ApiErrorCode::internal(e),
        };
        ApiError::from(code)
    }
}

impl From<AuthError> for ApiError {
    fn from(error: AuthError) -> Self {
        let code = match error {
            AuthError::InvalidCredentials => ApiErrorCode::InvalidCredentials,
            AuthError::UserExists => ApiErrorCode::EmailTaken,
            AuthError::UserNotFound => ApiErrorCode::NotFound,
            AuthError::Unauthorized => ApiErrorCode::Unauthorized,
            AuthError::Validation(message) => {
                return ApiError::new(ApiErrorCode::InvalidInput, message);
            }
            AuthError::Store(e) => ApiErrorCode::unavailable(e),
            AuthError::InternalError(e) => ApiErrorCode::internal(e),
        };
        ApiError::from(code)
    }
}

impl From<UserError> for ApiError {
    fn from(error: UserError) -> Self {
        let code = match error {
            UserError::NotFound => ApiErrorCode::NotFound,
            UserError::EmailTaken => ApiErrorCode::EmailTaken,
            UserError::Validation(message) => {
                return ApiError::new(ApiErrorCode::InvalidInput, message);
            }
            UserError::Store(e) => ApiErrorCode::unavailable(e),
            UserError::InternalError(e) => ApiErrorCode::internal(e),
        };
        ApiError::from(code)
    }
}
