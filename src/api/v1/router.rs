use super::auth_gate::*;
use super::handler;
use crate::domain_model::{PageRequest, UserId};
use crate::server::Server;
use std::convert::Infallible;
use std::sync::Arc;
use warp::Filter;

pub fn routes(
    server: Arc<Server>,
) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    let register = warp::post()
        .and(warp::path!("auth" / "register"))
        .and(warp::body::json())
        .and(with(server.auth_service.clone()))
        .and_then(handler::register);

    let login = warp::post()
        .and(warp::path!("auth" / "login"))
        .and(warp::body::json())
        .and(with(server.auth_service.clone()))
        .and_then(handler::login);

    let refresh = warp::post()
        .and(warp::path!("auth" / "refresh"))
        .and(warp::body::json())
        .and(with(server.auth_service.clone()))
        .and_then(handler::refresh);

    let logout = warp::post()
        .and(warp::path!("auth" / "logout"))
        .and(with_auth(server.session_manager.clone()))
        .and(with(server.auth_service.clone()))
        .and_then(handler::logout);

    let me = warp::get()
        .and(warp::path!("users" / "me"))
        .and(with_auth(server.session_manager.clone()))
        .and(with(server.auth_service.clone()))
        .and_then(handler::my_profile);

    let list_users = warp::get()
        .and(warp::path!("users"))
        .and(warp::query::<PageRequest>())
        .and(with_auth(server.session_manager.clone()))
        .and(with(server.user_service.clone()))
        .and_then(handler::list_users);

    let create_user = warp::post()
        .and(warp::path!("users"))
        .and(with_auth(server.session_manager.clone()))
        .and(warp::body::json())
        .and(with(server.user_service.clone()))
        .and_then(handler::create_user);

    let get_user = warp::get()
        .and(warp::path!("users" / UserId))
        .and(with_optional_auth(server.session_manager.clone()))
        .and(with(server.user_service.clone()))
        .and_then(handler::get_user);

    let update_user = warp::put()
        .and(warp::path!("users" / UserId))
        .and(with_auth(server.session_manager.clone()))
        .and(warp::body::json())
        .and(with(server.user_service.clone()))
        .and_then(handler::update_user);

    let delete_user = warp::delete()
        .and(warp::path!("users" / UserId))
        .and(with_auth(server.session_manager.clone()))
        .and(with(server.auth_service.clone()))
        .and(with(server.user_service.clone()))
        .and_then(handler::delete_user);

    register
        .or(login)
        .or(refresh)
        .or(logout)
        .or(me)
        .or(list_users)
        .or(create_user)
        .or(get_user)
        .or(update_user)
        .or(delete_user)
}

pub fn health() -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    warp::get()
        .and(warp::path!("health"))
        .map(|| "server is running")
}

fn with<ServiceType>(
    service: Arc<ServiceType>,
) -> impl Filter<Extract = (Arc<ServiceType>,), Error = Infallible> + Clone
where
    ServiceType: Send + Sync + ?Sized,
{
    warp::any().map(move || service.clone())
}
