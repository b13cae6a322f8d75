#![allow(dead_code)]

/// Common test utilities for API tests
///
/// This module provides shared infrastructure for the HTTP-level tests:
/// - An app wired to in-memory stores and cache
/// - Registration and login helpers
/// - Request builders and JSON body decoding
///
/// No external services are needed.

use axum::body::Body;
use axum::http::{header, Request, Response, StatusCode};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tasknest_api::app::{build_router, AppState};
use tasknest_api::config::Config;
use tasknest_shared::cache::memory::MemoryCache;
use tasknest_shared::cache::TaskCache;
use tasknest_shared::store::memory::{MemoryTaskStore, MemoryUserStore};
use tower::Service as _;

pub const JWT_SECRET: &str = "api-test-secret-key-at-least-32-bytes";

/// Test context containing the app and handles to its backing stores
pub struct TestContext {
    pub app: axum::Router,
    pub config: Config,
    pub users: MemoryUserStore,
    pub cache: MemoryCache,
}

impl TestContext {
    pub fn new() -> Self {
        let vars: HashMap<&str, &str> = [
            ("DATABASE_URL", "postgresql://unused/tasknest_test"),
            ("JWT_SECRET", JWT_SECRET),
        ]
        .into_iter()
        .collect();
        let config = Config::from_lookup(|key| vars.get(key).map(|v| v.to_string()))
            .expect("test config");

        let users = MemoryUserStore::new();
        let cache = MemoryCache::new();

        let state = AppState::new(
            config.clone(),
            Arc::new(users.clone()),
            Arc::new(MemoryTaskStore::new()),
            TaskCache::new(Arc::new(cache.clone())),
        )
        .expect("app state");

        Self {
            app: build_router(state),
            config,
            users,
            cache,
        }
    }

    /// Prefixed API path, e.g. `path("/tasks")` -> `/api/v1/tasks`
    pub fn path(&self, suffix: &str) -> String {
        format!("{}{}", self.config.api.prefix, suffix)
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.app.clone().call(request).await.unwrap()
    }

    /// Sends a JSON request, optionally with a bearer token
    pub async fn json(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }

        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.send(request).await;
        let status = response.status();
        (status, body_json(response).await)
    }

    /// Registers a user with username `name` and email `{name}@example.com`
    pub async fn register(&self, name: &str, password: &str) -> Value {
        let (status, body) = self
            .json(
                "POST",
                &self.path("/auth/register"),
                None,
                Some(serde_json::json!({
                    "email": format!("{}@example.com", name),
                    "username": name,
                    "password": password,
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "register failed: {}", body);
        body
    }

    /// Logs in through the form endpoint
    pub async fn login(&self, username: &str, password: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri(self.path("/auth/login"))
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(format!(
                "username={}&password={}",
                username, password
            )))
            .unwrap();

        let response = self.send(request).await;
        let status = response.status();
        (status, body_json(response).await)
    }

    /// Registers and logs in, returning the user's ID and bearer token
    pub async fn sign_up(&self, name: &str) -> (String, String) {
        let profile = self.register(name, "pw1").await;
        let (status, body) = self.login(name, "pw1").await;
        assert_eq!(status, StatusCode::OK, "login failed: {}", body);

        (
            profile["id"].as_str().unwrap().to_string(),
            body["access_token"].as_str().unwrap().to_string(),
        )
    }
}

/// Decodes a response body as JSON; empty bodies decode as `null`
pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    }
}
