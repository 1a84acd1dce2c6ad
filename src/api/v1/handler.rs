use super::error::*;
use crate::application_port::*;
use crate::domain_model::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use warp::http::StatusCode;
use warp::{self, reject};

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<Pagination>,
    pub error: Option<ApiError>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        ApiResponse {
            success: true,
            data: Some(data),
            meta: None,
            error: None,
        }
    }

    pub fn page(data: T, meta: Pagination) -> Self {
        ApiResponse {
            meta: Some(meta),
            ..Self::ok(data)
        }
    }

    pub fn err(error: ApiError) -> Self {
        ApiResponse {
            success: false,
            data: None,
            meta: None,
            error: Some(error),
        }
    }
}

fn json_ok<T: Serialize>(data: T) -> warp::reply::WithStatus<warp::reply::Json> {
    warp::reply::with_status(warp::reply::json(&ApiResponse::ok(data)), StatusCode::OK)
}

fn json_created<T: Serialize>(data: T) -> warp::reply::WithStatus<warp::reply::Json> {
    warp::reply::with_status(
        warp::reply::json(&ApiResponse::ok(data)),
        StatusCode::CREATED,
    )
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

pub async fn register(
    body: RegisterRequest,
    auth_service: Arc<dyn AuthService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let user = auth_service
        .register(RegisterInput {
            name: body.name,
            email: body.email,
            password: body.password,
        })
        .await
        .map_err(ApiError::from)
        .map_err(reject::custom)?;

    Ok(json_created(UserProfile::from(&user)))
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub user_id: UserId,
    #[serde(flatten)]
    pub tokens: TokenPair,
}

pub async fn login(
    body: LoginRequest,
    auth_service: Arc<dyn AuthService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let login_result = auth_service
        .login(LoginInput {
            email: body.email,
            password: body.password,
        })
        .await
        .map_err(ApiError::from)
        .map_err(reject::custom)?;

    Ok(json_ok(LoginResponse {
        user_id: login_result.user_id,
        tokens: login_result.tokens,
    }))
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub access_token: AccessToken,
}

pub async fn refresh(
    body: RefreshRequest,
    auth_service: Arc<dyn AuthService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let access_token = auth_service
        .refresh_token(&body.refresh_token)
        .await
        .map_err(ApiError::from)
        .map_err(reject::custom)?;

    Ok(json_ok(RefreshResponse { access_token }))
}

#[derive(Debug, Serialize)]
pub struct LogoutResponse;

pub async fn logout(
    user_id: UserId,
    auth_service: Arc<dyn AuthService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    auth_service
        .logout(user_id)
        .await
        .map_err(ApiError::from)
        .map_err(reject::custom)?;

    Ok(json_ok(LogoutResponse))
}

pub async fn my_profile(
    user_id: UserId,
    auth_service: Arc<dyn AuthService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let user = auth_service
        .profile(user_id)
        .await
        .map_err(ApiError::from)
        .map_err(reject::custom)?;

    Ok(json_ok(UserProfile::from(&user)))
}

pub async fn list_users(
    query: PageRequest,
    _user_id: UserId,
    user_service: Arc<dyn UserService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let page = user_service
        .list_users(query)
        .await
        .map_err(ApiError::from)
        .map_err(reject::custom)?;

    Ok(warp::reply::json(&ApiResponse::page(page.users, page.meta)))
}

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

pub async fn create_user(
    _user_id: UserId,
    body: CreateUserRequest,
    user_service: Arc<dyn UserService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let user = user_service
        .create_user(CreateUserInput {
            name: body.name,
            email: body.email,
            password: body.password,
        })
        .await
        .map_err(ApiError::from)
        .map_err(reject::custom)?;

    Ok(json_created(UserProfile::from(&user)))
}

/// Authenticated callers see the email, anonymous ones do not.
pub async fn get_user(
    id: UserId,
    caller: Option<UserId>,
    user_service: Arc<dyn UserService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let user = user_service
        .get_user(id)
        .await
        .map_err(ApiError::from)
        .map_err(reject::custom)?;

    let profile = match caller {
        Some(_) => UserProfile::from(&user),
        None => UserProfile::public(&user),
    };
    Ok(json_ok(profile))
}

#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub name: String,
    pub email: String,
}

pub async fn update_user(
    id: UserId,
    _user_id: UserId,
    body: UpdateUserRequest,
    user_service: Arc<dyn UserService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let user = user_service
        .update_user(
            id,
            UpdateUserInput {
                name: body.name,
                email: body.email,
            },
        )
        .await
        .map_err(ApiError::from)
        .map_err(reject::custom)?;

    Ok(json_ok(UserProfile::from(&user)))
}

#[derive(Debug, Serialize)]
pub struct DeleteUserResponse;

pub async fn delete_user(
    id: UserId,
    _user_id: UserId,
    auth_service: Arc<dyn AuthService>,
    user_service: Arc<dyn UserService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    // revoke first: a failed revoke leaves the account untouched
    auth_service
        .logout(id)
        .await
        .map_err(ApiError::from)
        .map_err(reject::custom)?;
    user_service
        .delete_user(id)
        .await
        .map_err(ApiError::from)
        .map_err(reject::custom)?;

    Ok(json_ok(DeleteUserResponse))
}
