//! Integration tests for invite issuance and redemption.

mod helpers;

use axum::http::StatusCode;
use serde_json::json;

use wellness_entity::user::AppRole;

#[tokio::test]
async fn test_redeem_once_creates_one_membership() {
    let Some(app) = helpers::TestApp::try_new().await else { return };
    let admin = app.admin().await;
    let company_id = app.create_company(&admin, 5, 20).await;
    let code = app.create_invite(&admin, company_id, 4).await;

    let first = app.registered_user().await;
    let response = app.redeem(&first, &code).await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    assert_eq!(response.data()["invite"]["status"], "accepted");
    assert_eq!(response.data()["invite"]["accepted_by"], first.id.to_string());
    assert_eq!(response.data()["employee"]["sessions_allocated"], 4);
    assert_eq!(response.data()["employee"]["is_active"], true);

    let second = app.registered_user().await;
    let response = app.redeem(&second, &code).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(response.message().contains("not pending"), "{}", response.message());

    let memberships: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM company_employees WHERE company_id = $1")
            .bind(company_id)
            .fetch_one(&app.db_pool)
            .await
            .unwrap();
    assert_eq!(memberships, 1);
}

#[tokio::test]
async fn test_expired_code_rejected() {
    let Some(app) = helpers::TestApp::try_new().await else { return };
    let admin = app.admin().await;
    let company_id = app.create_company(&admin, 5, 20).await;
    let code = app.create_invite(&admin, company_id, 2).await;

    sqlx::query("UPDATE invites SET expires_at = NOW() - INTERVAL '1 day' WHERE code = $1")
        .bind(&code)
        .execute(&app.db_pool)
        .await
        .unwrap();

    let user = app.registered_user().await;
    let response = app.redeem(&user, &code).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(response.message().contains("expired"), "{}", response.message());

    let lookup = app
        .request("GET", &format!("/api/invite-codes/{code}"), None, Some(&user.token))
        .await;
    assert_eq!(lookup.status, StatusCode::OK);
    assert_eq!(lookup.data()["status"], "pending");
    assert_eq!(lookup.data()["redeemable"], false);
}

#[tokio::test]
async fn test_expired_check_precedes_status_check() {
    let Some(app) = helpers::TestApp::try_new().await else { return };
    let admin = app.admin().await;
    let company_id = app.create_company(&admin, 5, 20).await;
    let code = app.create_invite(&admin, company_id, 2).await;

    sqlx::query(
        "UPDATE invites SET status = 'revoked', expires_at = NOW() - INTERVAL '1 hour' WHERE code = $1",
    )
    .bind(&code)
    .execute(&app.db_pool)
    .await
    .unwrap();

    let user = app.registered_user().await;
    let response = app.redeem(&user, &code).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(response.message().contains("expired"), "{}", response.message());
}

#[tokio::test]
async fn test_revoked_code_rejected() {
    let Some(app) = helpers::TestApp::try_new().await else { return };
    let admin = app.admin().await;
    let company_id = app.create_company(&admin, 5, 20).await;
    let hr = app.create_user(AppRole::Hr, Some(company_id)).await;

    let response = app
        .request(
            "POST",
            &format!("/api/companies/{company_id}/invites"),
            Some(json!({ "email": "new.hire@acme.test", "sessions_allocated": 3 })),
            Some(&hr.token),
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
    let invite_id = helpers::parse_id(&response.data()["id"]);
    let code = response.data()["code"].as_str().unwrap().to_string();

    let response = app
        .request("POST", &format!("/api/invites/{invite_id}/revoke"), None, Some(&hr.token))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["status"], "revoked");

    let user = app.registered_user().await;
    let response = app.redeem(&user, &code).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(response.message().contains("not pending"));
}

#[tokio::test]
async fn test_unknown_code_not_found() {
    let Some(app) = helpers::TestApp::try_new().await else { return };
    let user = app.registered_user().await;

    let response = app.redeem(&user, "NOSUCHCODE").await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_code_is_case_insensitive() {
    let Some(app) = helpers::TestApp::try_new().await else { return };
    let admin = app.admin().await;
    let company_id = app.create_company(&admin, 5, 20).await;
    let code = app.create_invite(&admin, company_id, 1).await;

    let user = app.registered_user().await;
    let response = app.redeem(&user, &code.to_lowercase()).await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
}

#[tokio::test]
async fn test_redeem_issues_tokens_with_company() {
    let Some(app) = helpers::TestApp::try_new().await else { return };
    let admin = app.admin().await;
    let company_id = app.create_company(&admin, 5, 20).await;
    let employee = app.employee(&admin, company_id, 6).await;

    let response = app.request("GET", "/api/balance/me", None, Some(&employee.token)).await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    assert_eq!(response.data()["company_id"], company_id.to_string());
    assert_eq!(response.data()["employee"]["allocated"], 6);
    assert_eq!(response.data()["bookable"], 6);
}

#[tokio::test]
async fn test_member_cannot_redeem_second_code_for_same_company() {
    let Some(app) = helpers::TestApp::try_new().await else { return };
    let admin = app.admin().await;
    let company_id = app.create_company(&admin, 5, 20).await;
    let employee = app.employee(&admin, company_id, 2).await;

    let code = app.create_invite(&admin, company_id, 2).await;
    let response = app.redeem(&employee, &code).await;
    assert_eq!(response.status, StatusCode::CONFLICT);

    let lookup = app
        .request("GET", &format!("/api/invite-codes/{code}"), None, Some(&employee.token))
        .await;
    assert_eq!(lookup.data()["status"], "pending");
}

#[tokio::test]
async fn test_hr_invite_grants_hr_role() {
    let Some(app) = helpers::TestApp::try_new().await else { return };
    let admin = app.admin().await;
    let company_id = app.create_company(&admin, 5, 20).await;

    let response = app
        .request(
            "POST",
            &format!("/api/companies/{company_id}/invites"),
            Some(json!({ "role": "hr" })),
            Some(&admin.token),
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED);
    let code = response.data()["code"].as_str().unwrap().to_string();

    let user = app.registered_user().await;
    let response = app.redeem(&user, &code).await;
    assert_eq!(response.status, StatusCode::OK);
    let token = response.data()["tokens"]["access_token"].as_str().unwrap().to_string();

    let me = app.request("GET", "/api/auth/me", None, Some(&token)).await;
    assert_eq!(me.data()["role"], "hr");
    let roles = me.data()["roles"].as_array().unwrap();
    assert!(roles.iter().any(|r| r == "hr"));

    let seats = app
        .request("GET", &format!("/api/companies/{company_id}/seats"), None, Some(&token))
        .await;
    assert_eq!(seats.status, StatusCode::OK);
}

#[tokio::test]
async fn test_hr_cannot_invite_into_other_company() {
    let Some(app) = helpers::TestApp::try_new().await else { return };
    let admin = app.admin().await;
    let own = app.create_company(&admin, 5, 20).await;
    let other = app.create_company(&admin, 5, 20).await;
    let hr = app.create_user(AppRole::Hr, Some(own)).await;

    let response = app
        .request(
            "POST",
            &format!("/api/companies/{other}/invites"),
            Some(json!({})),
            Some(&hr.token),
        )
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
}
