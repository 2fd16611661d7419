/// Common test utilities for integration tests
///
/// This module provides shared infrastructure for integration tests:
/// - A fresh in-memory store and router per test
/// - A registered test user with a session token
/// - Request helpers that drive the router in-process

use axum::body::Body;
use axum::http::{header, HeaderMap, Method, Request, StatusCode};
use goalsetter_api::app::{build_router, AppState};
use goalsetter_api::config::{ApiConfig, Config, JwtConfig, LogFormat};
use goalsetter_shared::auth::password::HashParams;
use goalsetter_shared::models::user::{CreateUser, PublicUser};
use goalsetter_shared::store::DataStore;
use serde_json::Value;
use std::sync::Arc;
use tower::Service as _;
use uuid::Uuid;

pub const TEST_PASSWORD: &str = "correct horse battery staple";

/// Fast Argon2 parameters so tests do not spend seconds hashing
pub const CHEAP_HASH: HashParams = HashParams {
    memory_kib: 1024,
    iterations: 1,
    parallelism: 1,
};

/// Response status, headers and parsed JSON body (`Null` if empty)
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

/// Test context containing all necessary resources
pub struct TestContext {
    pub store: Arc<DataStore>,
    pub state: AppState,
    pub app: axum::Router,
    pub user: PublicUser,
    pub jwt_token: String,
}

impl TestContext {
    /// Creates a new test context with an empty store and one registered user
    pub async fn new() -> anyhow::Result<Self> {
        let config = test_config();
        let store = Arc::new(DataStore::new());
        let state = AppState::new(Arc::clone(&store), config).with_hash_params(CHEAP_HASH);
        let app = build_router(state.clone());

        let (user, jwt_token) = register_user(&store, &state, "Test User")?;

        Ok(TestContext {
            store,
            state,
            app,
            user,
            jwt_token,
        })
    }

    /// Registers another user and issues a token for them
    pub fn create_user(&self, name: &str) -> anyhow::Result<(PublicUser, String)> {
        register_user(&self.store, &self.state, name)
    }

    /// Returns authorization header value
    pub fn auth_header(&self) -> String {
        format!("Bearer {}", self.jwt_token)
    }

    /// Sends a request through the router
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        auth: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(auth) = auth {
            builder = builder.header(header::AUTHORIZATION, auth);
        }

        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.app.clone().call(request).await.unwrap();

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

        TestResponse {
            status,
            headers,
            body,
        }
    }

    /// Sends a request as the default test user
    pub async fn send_authed(&self, method: Method, uri: &str, body: Option<Value>) -> TestResponse {
        let auth = self.auth_header();
        self.send(method, uri, Some(&auth), body).await
    }
}

pub fn test_config() -> Config {
    Config {
        api: ApiConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            production: false,
            cors_origins: vec!["*".to_string()],
        },
        jwt: JwtConfig {
            secret: "integration-test-secret-at-least-32-bytes".to_string(),
            expires_in_days: 30,
        },
        log_format: LogFormat::Pretty,
    }
}

/// Creates a user directly in the store, bypassing the register route
fn register_user(
    store: &DataStore,
    state: &AppState,
    name: &str,
) -> anyhow::Result<(PublicUser, String)> {
    let password_hash = CHEAP_HASH.hash(TEST_PASSWORD)?;
    let user = store.create_user(CreateUser {
        name: name.to_string(),
        email: format!("test-{}@example.com", Uuid::new_v4()),
        password_hash,
    })?;

    let token = state.issue_token(&user.id)?;
    Ok((PublicUser::from(user), token))
}
