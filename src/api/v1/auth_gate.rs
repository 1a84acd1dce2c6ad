use super::error::*;
use crate::application_port::{SessionError, SessionManager};
use crate::domain_model::UserId;
use crate::logger::*;
use std::sync::Arc;
use warp::{Filter, reject};

/// Token from an `Authorization: Bearer <token>` value. Any other shape,
/// including extra segments, yields `None`.
pub fn bearer_token(header: Option<&str>) -> Option<&str> {
    let mut parts = header?.split(' ');
    match (parts.next(), parts.next(), parts.next()) {
        (Some("Bearer"), Some(token), None) if !token.is_empty() => Some(token),
        _ => None,
    }
}

fn authorization() -> impl Filter<Extract = (Option<String>,), Error = warp::Rejection> + Clone {
    warp::header::optional::<String>("authorization")
}

/// Extracts the caller's [`UserId`] or rejects with 401 before the handler runs.
pub fn with_auth(
    session_manager: Arc<dyn SessionManager>,
) -> impl Filter<Extract = (UserId,), Error = warp::Rejection> + Clone {
    authorization().and_then(move |header: Option<String>| {
        let session_manager = session_manager.clone();
        async move {
            let token = bearer_token(header.as_deref())
                .ok_or_else(|| reject::custom(ApiError::from(ApiErrorCode::Unauthorized)))?;
            session_manager
                .validate_access(token)
                .await
                .map_err(ApiError::from)
                .map_err(reject::custom)
        }
    })
}

/// Like [`with_auth`], but lets anonymous callers through as `None`.
pub fn with_optional_auth(
    session_manager: Arc<dyn SessionManager>,
) -> impl Filter<Extract = (Option<UserId>,), Error = warp::Rejection> + Clone {
    authorization().and_then(move |header: Option<String>| {
        let session_manager = session_manager.clone();
        async move {
            let Some(token) = bearer_token(header.as_deref()) else {
                return Ok::<_, warp::Rejection>(None);
            };
            match session_manager.validate_access(token).await {
                Ok(user_id) => Ok(Some(user_id)),
                Err(SessionError::Unauthorized) => Ok(None),
                Err(e) => {
                    warn!("treating caller as anonymous: {}", e);
                    Ok(None)
                }
            }
        }
    })
}
