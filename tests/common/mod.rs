#![allow(dead_code)]

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use cinetrack::config::Config;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

/// Fresh on-disk database per call so tests never share state.
pub fn test_config() -> Config {
    let path = std::env::temp_dir().join(format!("cinetrack-test-{}.db", uuid::Uuid::new_v4()));

    let mut config = Config::default();
    config.general.database_path = format!("sqlite:{}", path.display());
    config.general.seed_default_categories = false;
    config.observability.metrics_enabled = false;
    config.security.argon2_memory_cost_kib = 1024;
    config.security.argon2_time_cost = 1;
    config
}

pub async fn spawn_app() -> Router {
    let state = cinetrack::api::create_app_state_from_config(test_config(), None)
        .await
        .expect("Failed to create app state");
    cinetrack::api::router(state)
}

pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header("Content-Type", mime::APPLICATION_JSON.as_ref());
            Body::from(serde_json::to_vec(&json).unwrap())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    (status, json)
}

pub async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, "GET", uri, None).await
}

pub async fn post(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(app, "POST", uri, Some(body)).await
}

pub async fn put(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(app, "PUT", uri, Some(body)).await
}

pub async fn delete(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, "DELETE", uri, None).await
}

pub async fn create_category(app: &Router, name: &str) -> i64 {
    let (status, body) = post(app, "/api/categories", json!({ "name": name })).await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["data"]["id"].as_i64().unwrap()
}

pub fn movie_body(title: &str, category_id: i64, release_date: &str) -> Value {
    json!({
        "title": title,
        "description": format!("{title} description"),
        "synopsis": format!("{title} synopsis"),
        "releaseDate": release_date,
        "duration": 120,
        "rating": "PG-13",
        "director": "Christopher Nolan",
        "cast": ["Leonardo DiCaprio"],
        "genres": ["Sci-Fi", "Thriller"],
        "country": "USA",
        "language": "English",
        "categoryId": category_id
    })
}

pub async fn create_movie(
    app: &Router,
    title: &str,
    category_id: i64,
    release_date: &str,
) -> i64 {
    let body = movie_body(title, category_id, release_date);
    let (status, body) = post(app, "/api/movies", body).await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["data"]["id"].as_i64().unwrap()
}

pub fn user_body(first_name: &str, email: &str) -> Value {
    json!({
        "firstName": first_name,
        "lastName": "Pérez",
        "email": email,
        "password": "super-secret",
        "phoneNumber": "+57 300 123 4567",
        "dateOfBirth": "1990-05-15"
    })
}

pub async fn create_user(app: &Router, first_name: &str, email: &str) -> i64 {
    let (status, body) = post(app, "/api/users", user_body(first_name, email)).await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["data"]["id"].as_i64().unwrap()
}
