//! Shared test helpers for integration tests.
//!
//! Tests run against a real PostgreSQL database named by
//! `WELLNESS_TEST_DATABASE_URL`. When the variable is unset every test
//! returns early. Tests share one database, so fixtures use unique
//! e-mails and names instead of truncating tables.

#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{Value, json};
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

use wellness_api::{AppState, build_app};
use wellness_core::config::AppConfig;
use wellness_entity::Pillar;
use wellness_entity::user::AppRole;
use wellness_service::user::CreateUserRequest;

/// Password used for every test account.
pub const PASSWORD: &str = "Tq8#mZv2!Lw6Rk";

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Database pool for direct queries
    pub db_pool: PgPool,
    /// Wired services
    pub state: AppState,
}

/// An account with a valid access token.
#[derive(Debug, Clone)]
pub struct TestUser {
    pub id: Uuid,
    pub email: String,
    pub token: String,
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
    /// The `data` field of a success envelope.
    pub fn data(&self) -> &Value {
        &self.body["data"]
    }

    /// The `message` field of an error body.
    pub fn message(&self) -> &str {
        self.body["message"].as_str().unwrap_or_default()
    }
}

impl TestApp {
    /// Build the app against the test database, or `None` when it is not configured.
    pub async fn try_new() -> Option<Self> {
        let Ok(url) = std::env::var("WELLNESS_TEST_DATABASE_URL") else {
            eprintln!("WELLNESS_TEST_DATABASE_URL not set; skipping");
            return None;
        };

        let mut config = AppConfig::default();
        config.database.url = url;
        config.database.max_connections = 10;
        config.database.min_connections = 1;
        config.auth.jwt_secret = "integration-test-secret".to_string();

        let db_pool = wellness_database::DatabasePool::connect(&config.database)
            .await
            .expect("Failed to connect to test database")
            .into_pool();

        wellness_database::migration::run_migrations(&db_pool)
            .await
            .expect("Failed to run migrations");

        let state = AppState::new(config, db_pool.clone());
        let router = build_app(state.clone());

        Some(Self {
            router,
            db_pool,
            state,
        })
    }

    /// Create an account directly through the user service and log it in.
    pub async fn create_user(&self, role: AppRole, company_id: Option<Uuid>) -> TestUser {
        let email = unique_email(&role.to_string());
        let user = self
            .state
            .user_service
            .create_user(CreateUserRequest {
                email: email.clone(),
                password: PASSWORD.to_string(),
                full_name: format!("Test {role}"),
                role: Some(role),
                company_id,
            })
            .await
            .expect("Failed to create test user");

        let token = self.login(&email, PASSWORD).await;
        TestUser {
            id: user.id,
            email,
            token,
        }
    }

    /// A fresh platform admin.
    pub async fn admin(&self) -> TestUser {
        self.create_user(AppRole::Admin, None).await
    }

    /// Login and return the access token.
    pub async fn login(&self, email: &str, password: &str) -> String {
        let response = self
            .request(
                "POST",
                "/api/auth/login",
                Some(json!({ "email": email, "password": password })),
                None,
            )
            .await;

        assert_eq!(response.status, StatusCode::OK, "Login failed: {:?}", response.body);

        response.data()["access_token"]
            .as_str()
            .expect("No access_token in login response")
            .to_string()
    }

    /// Create a company as `admin` and return its ID.
    pub async fn create_company(&self, admin: &TestUser, seat_limit: i32, sessions: i32) -> Uuid {
        let response = self
            .request(
                "POST",
                "/api/companies",
                Some(json!({
                    "name": format!("Company {}", Uuid::new_v4()),
                    "seat_limit": seat_limit,
                    "sessions_allocated": sessions,
                })),
                Some(&admin.token),
            )
            .await;

        assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
        parse_id(&response.data()["id"])
    }

    /// Issue an invite code for a company.
    pub async fn create_invite(&self, issuer: &TestUser, company_id: Uuid, sessions: i32) -> String {
        let response = self
            .request(
                "POST",
                &format!("/api/companies/{company_id}/invites"),
                Some(json!({ "sessions_allocated": sessions })),
                Some(&issuer.token),
            )
            .await;

        assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
        response.data()["code"]
            .as_str()
            .expect("No code in invite response")
            .to_string()
    }

    /// A plain user with no company yet.
    pub async fn registered_user(&self) -> TestUser {
        self.create_user(AppRole::User, None).await
    }

    /// Redeem `code` as `user`.
    pub async fn redeem(&self, user: &TestUser, code: &str) -> TestResponse {
        self.request(
            "POST",
            &format!("/api/invite-codes/{code}/redeem"),
            None,
            Some(&user.token),
        )
        .await
    }

    /// A user who joined `company_id` through an invite. The returned token
    /// carries the company.
    pub async fn employee(&self, issuer: &TestUser, company_id: Uuid, sessions: i32) -> TestUser {
        let code = self.create_invite(issuer, company_id, sessions).await;
        let mut user = self.registered_user().await;

        let response = self.redeem(&user, &code).await;
        assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);

        user.token = response.data()["tokens"]["access_token"]
            .as_str()
            .expect("No tokens in redeem response")
            .to_string();
        user
    }

    /// Register an approved provider serving `pillar`.
    pub async fn approved_provider(&self, admin: &TestUser, pillar: &str) -> Uuid {
        let response = self
            .request(
                "POST",
                "/api/providers",
                Some(json!({
                    "name": "Dr. Test",
                    "email": unique_email("provider"),
                    "pillars": [pillar],
                })),
                Some(&admin.token),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
        let id = parse_id(&response.data()["id"]);

        let response = self
            .request(
                "PUT",
                &format!("/api/providers/{id}/approval"),
                Some(json!({ "approved": true })),
                Some(&admin.token),
            )
            .await;
        assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);

        id
    }

    /// A `prestador` account linked to a new approved provider serving `pillars`.
    pub async fn provider_account(&self, admin: &TestUser, pillars: &[&str]) -> (TestUser, Uuid) {
        let account = self.create_user(AppRole::Prestador, None).await;

        let response = self
            .request(
                "POST",
                "/api/providers",
                Some(json!({
                    "name": "Dr. Linked",
                    "email": account.email,
                    "user_id": account.id,
                    "pillars": pillars,
                })),
                Some(&admin.token),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
        let id = parse_id(&response.data()["id"]);

        let response = self
            .request(
                "PUT",
                &format!("/api/providers/{id}/approval"),
                Some(json!({ "approved": true })),
                Some(&admin.token),
            )
            .await;
        assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);

        (account, id)
    }

    /// Take every existing provider of `pillar` out of rotation.
    pub async fn retire_providers(&self, pillar: &str) {
        sqlx::query(
            "UPDATE providers SET is_active = FALSE \
             WHERE id IN (SELECT provider_id FROM provider_pillars WHERE pillar = $1)",
        )
        .bind(pillar.parse::<Pillar>().expect("Unknown pillar"))
        .execute(&self.db_pool)
        .await
        .expect("Failed to retire providers");
    }

    /// Make an HTTP request to the test app
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        send(self.router.clone(), method, path, body, token).await
    }
}

/// Send one request through a router.
pub async fn send(
    router: Router,
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
        req = req.header("Authorization", format!("Bearer {token}"));
    }

    let req = req
        .body(Body::from(body_str))
        .expect("Failed to build request");

    let response = router.oneshot(req).await.expect("Failed to send request");

    let status = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("Failed to read body");

    let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

    TestResponse { status, body }
}

/// A unique, valid e-mail.
pub fn unique_email(prefix: &str) -> String {
    format!("{prefix}-{}@wellness.test", Uuid::new_v4().simple())
}

/// Parse a UUID from a JSON string value.
pub fn parse_id(value: &Value) -> Uuid {
    value
        .as_str()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| panic!("Expected a UUID, got {value}"))
}
