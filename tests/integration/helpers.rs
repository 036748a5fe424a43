//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::{Duration, Utc};
use serde_json::Value;
use tower::ServiceExt;

use repairdesk_api::{AppState, build_app};
use repairdesk_auth::JwtEncoder;
use repairdesk_cache::CacheManager;
use repairdesk_core::config::{AppConfig, CacheBackend, DatabaseBackend};
use repairdesk_database::store::UserStore;
use repairdesk_database::{MemoryStore, Stores};
use repairdesk_entity::user::{CreateUser, UserRole};

/// A principal with a signed token.
#[derive(Debug, Clone)]
pub struct TestUser {
    pub id: i64,
    pub username: String,
    pub token: String,
}

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Shared state, for reaching services directly
    pub state: AppState,
    /// The in-memory store behind every store trait
    pub store: Arc<MemoryStore>,
    /// Application config
    pub config: AppConfig,
    encoder: JwtEncoder,
}

impl TestApp {
    /// Full app over the in-memory store and cache. No external services.
    pub async fn new() -> Self {
        let mut config = AppConfig::default();
        config.database.backend = DatabaseBackend::Memory;
        config.cache.provider = CacheBackend::Memory;
        config.auth.jwt_secret = "integration-test-secret".to_string();
        config.sweeper.enabled = false;

        let store = Arc::new(MemoryStore::new());
        let cache = Arc::new(
            CacheManager::new(&config.cache)
                .await
                .expect("Failed to init cache"),
        );

        let state = AppState::new(config.clone(), Stores::memory(store.clone()), cache);
        let router = build_app(state.clone());
        let encoder = JwtEncoder::new(&config.auth);

        Self {
            router,
            state,
            store,
            config,
            encoder,
        }
    }

    /// Create an active user and sign a token for them.
    pub async fn create_user(&self, username: &str, role: UserRole) -> TestUser {
        let user = UserStore::create(
            self.store.as_ref(),
            &CreateUser {
                username: username.to_string(),
                password_hash: "not-used".to_string(),
                role,
                phone_number: None,
            },
        )
        .await
        .expect("Failed to create test user");

        TestUser {
            id: user.id,
            username: user.username.clone(),
            token: self.token(user.id, &user.username, role.as_str()),
        }
    }

    /// Sign a token with an arbitrary role name.
    pub fn token(&self, user_id: i64, username: &str, role: &str) -> String {
        self.encoder
            .issue(user_id, username, role, 3600)
            .expect("Failed to sign token")
    }

    /// Pretend `order_id` was filed `hours` ago.
    pub async fn backdate_order(&self, order_id: i64, hours: i64) {
        self.store
            .set_order_created_at(order_id, Utc::now() - Duration::hours(hours))
            .await
            .expect("Failed to backdate order");
    }

    /// File an order as `user` and return its id.
    pub async fn create_order(&self, user: &TestUser, title: &str) -> i64 {
        let response = self
            .request(
                "POST",
                "/api/orders",
                Some(serde_json::json!({
                    "title": title,
                    "description": "详细描述",
                    "location": "3号楼 402",
                })),
                Some(&user.token),
            )
            .await;
        assert_eq!(
            response.status,
            StatusCode::CREATED,
            "Create failed: {:?}",
            response.body
        );
        response.data()["orderId"]
            .as_i64()
            .expect("No orderId in create response")
    }

    /// Make an HTTP request to the test app
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json");

        if let Some(token) = token {
            req = req.header("Authorization", format!("Bearer {}", token));
        }

        let req = req
            .body(Body::from(body_str))
            .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Parsed JSON body
    pub body: Value,
}

impl TestResponse {
    /// The `data` member of a success envelope.
    pub fn data(&self) -> &Value {
        &self.body["data"]
    }
}
