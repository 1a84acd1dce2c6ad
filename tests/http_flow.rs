use serde_json::{Value, json};
use std::sync::Arc;
use usergate::api::v1::{recover_error, routes};
use usergate::server::Server;
use usergate::settings::parse_settings;
use warp::Filter;
use warp::http::StatusCode;

async fn api() -> impl Filter<Extract = (impl warp::Reply,), Error = std::convert::Infallible> + Clone
{
    let settings = parse_settings(Some("settings/dev.toml")).unwrap();
    let server = Arc::new(Server::try_new(&settings).await.unwrap());
    warp::path("api")
        .and(warp::path("v1"))
        .and(routes(server))
        .recover(recover_error)
}

fn body(resp: &warp::http::Response<warp::hyper::body::Bytes>) -> Value {
    serde_json::from_slice(resp.body()).unwrap()
}

fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}

#[tokio::test]
async fn register_login_refresh_logout() {
    let api = api().await;

    let resp = warp::test::request()
        .method("POST")
        .path("/api/v1/auth/register")
        .json(&json!({"name": "Ada", "email": " Ada@Example.com ", "password": "secret123"}))
        .reply(&api)
        .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let registered = body(&resp);
    assert_eq!(registered["success"], true);
    assert_eq!(registered["data"]["email"], "ada@example.com");
    assert!(registered["data"].get("password_hash").is_none());

    let resp = warp::test::request()
        .method("POST")
        .path("/api/v1/auth/register")
        .json(&json!({"name": "Ada", "email": "ada@example.com", "password": "secret123"}))
        .reply(&api)
        .await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    assert_eq!(body(&resp)["error"]["code"], "EMAIL_TAKEN");

    let resp = warp::test::request()
        .method("POST")
        .path("/api/v1/auth/login")
        .json(&json!({"email": "ada@example.com", "password": "wrong-password"}))
        .reply(&api)
        .await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body(&resp)["error"]["code"], "INVALID_CREDENTIALS");

    let resp = warp::test::request()
        .method("POST")
        .path("/api/v1/auth/login")
        .json(&json!({"email": "ada@example.com", "password": "secret123"}))
        .reply(&api)
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let login = body(&resp);
    let access = login["data"]["access_token"].as_str().unwrap().to_string();
    let refresh = login["data"]["refresh_token"].as_str().unwrap().to_string();
    assert_eq!(login["data"]["user_id"], registered["data"]["id"]);

    let resp = warp::test::request()
        .path("/api/v1/users/me")
        .header("authorization", bearer(&access))
        .reply(&api)
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body(&resp)["data"]["name"], "Ada");

    let resp = warp::test::request()
        .method("POST")
        .path("/api/v1/auth/refresh")
        .json(&json!({"refresh_token": refresh}))
        .reply(&api)
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let fresh = body(&resp)["data"]["access_token"]
        .as_str()
        .unwrap()
        .to_string();
    assert_ne!(fresh, access);

    // the refreshed access token supersedes the old one
    let resp = warp::test::request()
        .path("/api/v1/users/me")
        .header("authorization", bearer(&access))
        .reply(&api)
        .await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let resp = warp::test::request()
        .method("POST")
        .path("/api/v1/auth/logout")
        .header("authorization", bearer(&fresh))
        .reply(&api)
        .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = warp::test::request()
        .path("/api/v1/users/me")
        .header("authorization", bearer(&fresh))
        .reply(&api)
        .await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let resp = warp::test::request()
        .method("POST")
        .path("/api/v1/auth/refresh")
        .json(&json!({"refresh_token": refresh}))
        .reply(&api)
        .await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn user_routes_need_a_token_and_paginate() {
    let api = api().await;

    let resp = warp::test::request()
        .method("POST")
        .path("/api/v1/users")
        .json(&json!({"name": "Nobody", "email": "nobody@example.com", "password": "secret123"}))
        .reply(&api)
        .await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let resp = warp::test::request()
        .path("/api/v1/users")
        .header("authorization", "Token abc")
        .reply(&api)
        .await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    warp::test::request()
        .method("POST")
        .path("/api/v1/auth/register")
        .json(&json!({"name": "Root", "email": "root@example.com", "password": "secret123"}))
        .reply(&api)
        .await;
    let resp = warp::test::request()
        .method("POST")
        .path("/api/v1/auth/login")
        .json(&json!({"email": "root@example.com", "password": "secret123"}))
        .reply(&api)
        .await;
    let access = body(&resp)["data"]["access_token"]
        .as_str()
        .unwrap()
        .to_string();

    let mut created = Vec::new();
    for name in ["Bea", "Cy"] {
        let resp = warp::test::request()
            .method("POST")
            .path("/api/v1/users")
            .header("authorization", bearer(&access))
            .json(&json!({"name": name, "email": format!("{}@example.com", name.to_lowercase()), "password": "secret123"}))
            .reply(&api)
            .await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        created.push(body(&resp)["data"]["id"].as_str().unwrap().to_string());
    }

    let resp = warp::test::request()
        .path("/api/v1/users?page=2&limit=2")
        .header("authorization", bearer(&access))
        .reply(&api)
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let page = body(&resp);
    assert_eq!(page["data"].as_array().unwrap().len(), 1);
    assert_eq!(page["meta"]["total_items"], 3);
    assert_eq!(page["meta"]["total_pages"], 2);
    assert_eq!(page["meta"]["current_page"], 2);

    let resp = warp::test::request()
        .path(&format!("/api/v1/users/{}", created[0]))
        .reply(&api)
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let anonymous = body(&resp);
    assert_eq!(anonymous["data"]["name"], "Bea");
    assert!(anonymous["data"].get("email").is_none());

    let resp = warp::test::request()
        .path(&format!("/api/v1/users/{}", created[0]))
        .header("authorization", bearer(&access))
        .reply(&api)
        .await;
    assert_eq!(body(&resp)["data"]["email"], "bea@example.com");

    let resp = warp::test::request()
        .method("PUT")
        .path(&format!("/api/v1/users/{}", created[0]))
        .header("authorization", bearer(&access))
        .json(&json!({"name": "Bea", "email": "cy@example.com"}))
        .reply(&api)
        .await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    let resp = warp::test::request()
        .method("DELETE")
        .path(&format!("/api/v1/users/{}", created[1]))
        .header("authorization", bearer(&access))
        .reply(&api)
        .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = warp::test::request()
        .path(&format!("/api/v1/users/{}", created[1]))
        .reply(&api)
        .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
