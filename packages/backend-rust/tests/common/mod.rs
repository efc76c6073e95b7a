#![allow(dead_code)]

use std::net::{IpAddr, Ipv4Addr};
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use chrono::{TimeZone, Utc};
use serde_json::Value;
use sqlx::SqlitePool;
use tower::ServiceExt;

use tangocho_backend_rust::clock::FixedClock;
use tangocho_backend_rust::config::Config;
use tangocho_backend_rust::db;
use tangocho_backend_rust::state::AppState;

pub struct TestApp {
    pub router: Router,
    pub pool: SqlitePool,
    pub clock: FixedClock,
}

pub async fn create_test_app() -> TestApp {
    let pool = db::connect_in_memory()
        .await
        .expect("in-memory database");
    let clock = FixedClock::new(Utc.with_ymd_and_hms(2024, 4, 15, 9, 0, 0).unwrap());
    let state = AppState::with_clock(pool.clone(), Arc::new(clock.clone()));
    let router = tangocho_backend_rust::create_app(state, &test_config());

    TestApp {
        router,
        pool,
        clock,
    }
}

/// Fixed development config so results do not depend on the caller's env.
pub fn test_config() -> Config {
    Config {
        host: IpAddr::V4(Ipv4Addr::LOCALHOST),
        port: 0,
        log_level: "warn".to_string(),
        database_url: "sqlite::memory:".to_string(),
        frontend_url: "http://localhost:3000".to_string(),
        environment: "development".to_string(),
    }
}

impl TestApp {
    pub async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.request(Method::GET, uri, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, Some(body)).await
    }

    pub async fn put(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::PUT, uri, Some(body)).await
    }

    pub async fn delete(&self, uri: &str) -> (StatusCode, Value) {
        self.request(Method::DELETE, uri, None).await
    }

    pub async fn create_notebook(&self, name: &str) -> i64 {
        let (status, body) = self
            .post("/api/notebooks", serde_json::json!({ "name": name }))
            .await;
        assert_eq!(status, StatusCode::OK);
        body["id"].as_i64().unwrap()
    }

    pub async fn start_session(&self) -> i64 {
        let (status, body) = self.post("/api/sessions", serde_json::json!({})).await;
        assert_eq!(status, StatusCode::OK);
        body["id"].as_i64().unwrap()
    }
}
