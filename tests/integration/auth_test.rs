//! Integration tests for registration, login and token refresh.

mod helpers;

use axum::http::StatusCode;
use serde_json::json;

#[tokio::test]
async fn test_register_and_login() {
    let Some(app) = helpers::TestApp::try_new().await else { return };
    let email = helpers::unique_email("register");

    let response = app
        .request(
            "POST",
            "/api/auth/register",
            Some(json!({ "email": email, "password": helpers::PASSWORD, "full_name": "New Person" })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
    assert_eq!(response.data()["role"], "user");
    assert!(response.data()["company_id"].is_null());
    assert!(response.data().get("password_hash").is_none());

    let response = app
        .request(
            "POST",
            "/api/auth/login",
            Some(json!({ "email": email, "password": helpers::PASSWORD })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["token_type"], "Bearer");
    assert!(response.data()["refresh_token"].is_string());
    assert_eq!(response.data()["user"]["email"], email);
}

#[tokio::test]
async fn test_register_duplicate_email_conflict() {
    let Some(app) = helpers::TestApp::try_new().await else { return };
    let existing = app.registered_user().await;

    let response = app
        .request(
            "POST",
            "/api/auth/register",
            Some(json!({ "email": existing.email, "password": helpers::PASSWORD, "full_name": "Twin" })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_register_weak_password_rejected() {
    let Some(app) = helpers::TestApp::try_new().await else { return };

    for password in ["short", "password1", "Password1!"] {
        let response = app
            .request(
                "POST",
                "/api/auth/register",
                Some(json!({
                    "email": helpers::unique_email("weak"),
                    "password": password,
                    "full_name": "Weak Password",
                })),
                None,
            )
            .await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST, "{password}");
        assert_eq!(response.body["error"], "VALIDATION_ERROR");
    }
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let Some(app) = helpers::TestApp::try_new().await else { return };
    let user = app.registered_user().await;

    let wrong_password = app
        .request(
            "POST",
            "/api/auth/login",
            Some(json!({ "email": user.email, "password": "Wrong-pass1" })),
            None,
        )
        .await;
    let unknown_user = app
        .request(
            "POST",
            "/api/auth/login",
            Some(json!({ "email": helpers::unique_email("ghost"), "password": helpers::PASSWORD })),
            None,
        )
        .await;

    assert_eq!(wrong_password.status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_user.status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_password.message(), unknown_user.message());
}

#[tokio::test]
async fn test_me_requires_token() {
    let Some(app) = helpers::TestApp::try_new().await else { return };
    let user = app.registered_user().await;

    let response = app.request("GET", "/api/auth/me", None, Some(&user.token)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["id"], user.id.to_string());
    assert_eq!(response.data()["roles"], json!(["user"]));

    let response = app.request("GET", "/api/auth/me", None, None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["error"], "UNAUTHORIZED");

    let response = app.request("GET", "/api/auth/me", None, Some("not-a-jwt")).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_refresh_issues_new_pair() {
    let Some(app) = helpers::TestApp::try_new().await else { return };
    let user = app.registered_user().await;

    let login = app
        .request(
            "POST",
            "/api/auth/login",
            Some(json!({ "email": user.email, "password": helpers::PASSWORD })),
            None,
        )
        .await;
    let refresh_token = login.data()["refresh_token"].as_str().unwrap().to_string();

    let response = app
        .request("POST", "/api/auth/refresh", Some(json!({ "refresh_token": refresh_token })), None)
        .await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    let access = response.data()["access_token"].as_str().unwrap();

    let me = app.request("GET", "/api/auth/me", None, Some(access)).await;
    assert_eq!(me.status, StatusCode::OK);

    // An access token is not accepted in place of a refresh token.
    let response = app
        .request("POST", "/api/auth/refresh", Some(json!({ "refresh_token": user.token })), None)
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_health_is_public() {
    let Some(app) = helpers::TestApp::try_new().await else { return };

    let response = app.request("GET", "/api/health", None, None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["status"], "ok");

    let admin = app.admin().await;
    let response = app
        .request("GET", "/api/health/detailed", None, Some(&admin.token))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["database"], "connected");
}
