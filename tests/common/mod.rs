#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::Value;
use sqlx::AnyPool;
use tower::ServiceExt;

use trivia_api::db::queries::{categories::create_category, questions::create_question};
use trivia_api::db::{establish_connection, run_migrations, Backend, NewQuestion};
use trivia_api::server::{build_app, AppState};

pub const QUESTIONS_PER_PAGE: u32 = 10;

pub const CATEGORIES: [&str; 3] = ["Science", "Art", "History"];

/// Private store with the schema applied. Defaults to in-memory SQLite; set
/// `TRIVIA_TEST_DATABASE_URL=postgres://postgres@localhost:5432/trivia_test` to run the
/// suite against Postgres, where every call gets its own `trivia_test_*` schema.
pub async fn empty_db() -> (AnyPool, Backend) {
    let url = match std::env::var("TRIVIA_TEST_DATABASE_URL") {
        Ok(base) => isolated_url(&base).await,
        Err(_) => "sqlite::memory:".to_owned(),
    };
    let backend = Backend::from_url(&url).expect("unsupported test database url");
    let pool = establish_connection(&url, 1)
        .await
        .expect("failed to connect to test database");
    run_migrations(&pool, backend)
        .await
        .expect("failed to create schema");
    (pool, backend)
}

async fn isolated_url(base: &str) -> String {
    use std::sync::atomic::{AtomicU32, Ordering};
    static COUNTER: AtomicU32 = AtomicU32::new(0);

    if Backend::from_url(base).expect("unsupported test database url") == Backend::Sqlite {
        return base.to_owned();
    }
    let schema = format!(
        "trivia_test_{}_{}",
        std::process::id(),
        COUNTER.fetch_add(1, Ordering::SeqCst)
    );
    let admin = establish_connection(base, 1)
        .await
        .expect("failed to connect to test database");
    sqlx::query(&format!("DROP SCHEMA IF EXISTS {schema} CASCADE"))
        .execute(&admin)
        .await
        .expect("failed to drop leftover schema");
    sqlx::query(&format!("CREATE SCHEMA {schema}"))
        .execute(&admin)
        .await
        .expect("failed to create test schema");
    admin.close().await;

    let separator = if base.contains('?') { '&' } else { '?' };
    format!("{base}{separator}options[search_path]={schema}")
}

/// Three categories and 15 questions, so the listing spans two pages.
pub async fn seeded_db() -> AnyPool {
    let (pool, _) = empty_db().await;
    let mut category_ids = Vec::new();
    for name in CATEGORIES {
        category_ids.push(create_category(&pool, name).await.unwrap());
    }
    for i in 0..15_i64 {
        let question = format!("Question number {}?", i + 1);
        let answer = format!("Answer {}", i + 1);
        create_question(
            &pool,
            NewQuestion {
                question: &question,
                answer: &answer,
                category: category_ids[(i % 3) as usize],
                difficulty: i % 5 + 1,
            },
        )
        .await
        .unwrap();
    }
    pool
}

pub fn app(pool: AnyPool) -> Router {
    build_app(AppState::new(pool, QUESTIONS_PER_PAGE))
}

pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            request = request.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    let response = app
        .clone()
        .oneshot(request.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

pub async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, Method::GET, uri, None).await
}

pub async fn post(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(app, Method::POST, uri, Some(body)).await
}

pub async fn delete(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, Method::DELETE, uri, None).await
}

pub async fn post_raw(app: &Router, uri: &str, body: &'static str) -> StatusCode {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body))
        .unwrap();
    app.clone().oneshot(request).await.unwrap().status()
}
