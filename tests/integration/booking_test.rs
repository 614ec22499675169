//! Integration tests for booking and cancelling sessions.

mod helpers;

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use serde_json::{Value, json};
use tokio::task::JoinSet;
use uuid::Uuid;

fn booking_body(days_ahead: i64) -> Value {
    pillar_booking_body("mental_health", days_ahead)
}

fn pillar_booking_body(pillar: &str, days_ahead: i64) -> Value {
    json!({
        "pillar": pillar,
        "scheduled_at": (Utc::now() + Duration::days(days_ahead)).to_rfc3339(),
        "notes": "First consultation",
    })
}

async fn record_outcome(
    app: &helpers::TestApp,
    actor: &helpers::TestUser,
    booking_id: Uuid,
    outcome: &str,
) -> helpers::TestResponse {
    app.request(
        "PUT",
        &format!("/api/bookings/{booking_id}/outcome"),
        Some(json!({ "outcome": outcome })),
        Some(&actor.token),
    )
    .await
}

async fn book(app: &helpers::TestApp, user: &helpers::TestUser) -> helpers::TestResponse {
    app.request("POST", "/api/bookings", Some(booking_body(3)), Some(&user.token))
        .await
}

async fn balance(app: &helpers::TestApp, user: &helpers::TestUser) -> Value {
    let response = app.request("GET", "/api/balance/me", None, Some(&user.token)).await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    response.data().clone()
}

#[tokio::test]
async fn test_booking_consumes_sessions_until_exhausted() {
    let Some(app) = helpers::TestApp::try_new().await else { return };
    let admin = app.admin().await;
    app.approved_provider(&admin, "mental_health").await;
    let company_id = app.create_company(&admin, 5, 20).await;
    let employee = app.employee(&admin, company_id, 2).await;

    let response = book(&app, &employee).await;
    assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
    assert_eq!(response.data()["status"], "scheduled");
    assert_eq!(response.data()["user_id"], employee.id.to_string());
    assert!(!response.data()["provider_id"].is_null());

    let after_one = balance(&app, &employee).await;
    assert_eq!(after_one["employee"]["used"], 1);
    assert_eq!(after_one["company"]["used"], 1);
    assert_eq!(after_one["bookable"], 1);

    assert_eq!(book(&app, &employee).await.status, StatusCode::CREATED);

    let response = book(&app, &employee).await;
    assert_eq!(response.status, StatusCode::CONFLICT);
    assert!(response.message().contains("No sessions remaining"));

    let exhausted = balance(&app, &employee).await;
    assert_eq!(exhausted["employee"]["used"], 2);
    assert_eq!(exhausted["employee"]["is_at_limit"], true);
    assert_eq!(exhausted["bookable"], 0);
}

#[tokio::test]
async fn test_cancel_restores_session() {
    let Some(app) = helpers::TestApp::try_new().await else { return };
    let admin = app.admin().await;
    app.approved_provider(&admin, "mental_health").await;
    let company_id = app.create_company(&admin, 5, 20).await;
    let employee = app.employee(&admin, company_id, 1).await;

    let response = book(&app, &employee).await;
    assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
    let booking_id = helpers::parse_id(&response.data()["id"]);
    assert_eq!(balance(&app, &employee).await["bookable"], 0);

    let response = app
        .request("POST", &format!("/api/bookings/{booking_id}/cancel"), None, Some(&employee.token))
        .await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    assert_eq!(response.data()["status"], "cancelled");

    let restored = balance(&app, &employee).await;
    assert_eq!(restored["employee"]["used"], 0);
    assert_eq!(restored["company"]["used"], 0);
    assert_eq!(restored["bookable"], 1);

    // A second cancel must not hand the session back twice.
    let response = app
        .request("POST", &format!("/api/bookings/{booking_id}/cancel"), None, Some(&employee.token))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(balance(&app, &employee).await["employee"]["used"], 0);
}

#[tokio::test]
async fn test_cannot_cancel_someone_elses_booking() {
    let Some(app) = helpers::TestApp::try_new().await else { return };
    let admin = app.admin().await;
    app.approved_provider(&admin, "mental_health").await;
    let company_id = app.create_company(&admin, 5, 20).await;
    let owner = app.employee(&admin, company_id, 2).await;
    let colleague = app.employee(&admin, company_id, 2).await;

    let response = book(&app, &owner).await;
    let booking_id = helpers::parse_id(&response.data()["id"]);

    let response = app
        .request("POST", &format!("/api/bookings/{booking_id}/cancel"), None, Some(&colleague.token))
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(balance(&app, &owner).await["employee"]["used"], 1);

    // The platform admin may cancel on the owner's behalf.
    let response = app
        .request("POST", &format!("/api/bookings/{booking_id}/cancel"), None, Some(&admin.token))
        .await;
    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn test_booking_in_the_past_rejected() {
    let Some(app) = helpers::TestApp::try_new().await else { return };
    let admin = app.admin().await;
    let company_id = app.create_company(&admin, 5, 20).await;
    let employee = app.employee(&admin, company_id, 2).await;

    let response = app
        .request("POST", "/api/bookings", Some(booking_body(-1)), Some(&employee.token))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(balance(&app, &employee).await["employee"]["used"], 0);
}

#[tokio::test]
async fn test_company_pool_exhaustion_blocks_booking() {
    let Some(app) = helpers::TestApp::try_new().await else { return };
    let admin = app.admin().await;
    app.approved_provider(&admin, "mental_health").await;
    let company_id = app.create_company(&admin, 5, 1).await;
    let first = app.employee(&admin, company_id, 3).await;
    let second = app.employee(&admin, company_id, 3).await;

    assert_eq!(book(&app, &first).await.status, StatusCode::CREATED);

    let response = book(&app, &second).await;
    assert_eq!(response.status, StatusCode::CONFLICT);

    let summary = balance(&app, &second).await;
    assert_eq!(summary["employee"]["used"], 0);
    assert_eq!(summary["company"]["is_at_limit"], true);
    assert_eq!(summary["bookable"], 0);
}

#[tokio::test]
async fn test_user_without_company_cannot_book() {
    let Some(app) = helpers::TestApp::try_new().await else { return };
    let user = app.registered_user().await;

    let response = book(&app, &user).await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_list_my_bookings() {
    let Some(app) = helpers::TestApp::try_new().await else { return };
    let admin = app.admin().await;
    app.approved_provider(&admin, "mental_health").await;
    let company_id = app.create_company(&admin, 5, 20).await;
    let employee = app.employee(&admin, company_id, 4).await;

    book(&app, &employee).await;
    book(&app, &employee).await;

    let response = app
        .request("GET", "/api/bookings/mine", None, Some(&employee.token))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    let items = response.data()["items"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert!(
        items
            .iter()
            .all(|b| helpers::parse_id(&b["user_id"]) == employee.id)
    );

    let unknown = Uuid::new_v4();
    let response = app
        .request("POST", &format!("/api/bookings/{unknown}/cancel"), None, Some(&employee.token))
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_no_show_keeps_session_consumed() {
    let Some(app) = helpers::TestApp::try_new().await else { return };
    let admin = app.admin().await;
    app.retire_providers("legal_assistance").await;
    let (provider_user, provider_id) = app.provider_account(&admin, &["legal_assistance"]).await;
    let company_id = app.create_company(&admin, 5, 20).await;
    let employee = app.employee(&admin, company_id, 2).await;

    let response = app
        .request(
            "POST",
            "/api/bookings",
            Some(pillar_booking_body("legal_assistance", 2)),
            Some(&employee.token),
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
    assert_eq!(helpers::parse_id(&response.data()["provider_id"]), provider_id);
    let booking_id = helpers::parse_id(&response.data()["id"]);

    let response = app
        .request("GET", "/api/bookings/assigned", None, Some(&provider_user.token))
        .await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    let items = response.data()["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(helpers::parse_id(&items[0]["id"]), booking_id);

    let response = record_outcome(&app, &provider_user, booking_id, "scheduled").await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let response = record_outcome(&app, &provider_user, booking_id, "no_show").await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    assert_eq!(response.data()["status"], "no_show");

    let after = balance(&app, &employee).await;
    assert_eq!(after["employee"]["used"], 1);
    assert_eq!(after["company"]["used"], 1);

    // Only scheduled bookings take an outcome or a cancellation.
    let response = record_outcome(&app, &provider_user, booking_id, "completed").await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    let response = app
        .request("POST", &format!("/api/bookings/{booking_id}/cancel"), None, Some(&employee.token))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(balance(&app, &employee).await["employee"]["used"], 1);
}

#[tokio::test]
async fn test_outcome_limited_to_assigned_provider() {
    let Some(app) = helpers::TestApp::try_new().await else { return };
    let admin = app.admin().await;
    app.retire_providers("financial_assistance").await;
    let (assigned, provider_id) = app.provider_account(&admin, &["financial_assistance"]).await;
    let (other, _) = app.provider_account(&admin, &[]).await;
    let company_id = app.create_company(&admin, 5, 20).await;
    let employee = app.employee(&admin, company_id, 2).await;

    let response = app
        .request(
            "POST",
            "/api/bookings",
            Some(pillar_booking_body("financial_assistance", 2)),
            Some(&employee.token),
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
    assert_eq!(helpers::parse_id(&response.data()["provider_id"]), provider_id);
    let booking_id = helpers::parse_id(&response.data()["id"]);

    let response = record_outcome(&app, &other, booking_id, "completed").await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let response = record_outcome(&app, &employee, booking_id, "completed").await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let response = app
        .request("GET", "/api/bookings/assigned", None, Some(&other.token))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["items"].as_array().unwrap().len(), 0);

    let response = app
        .request("GET", "/api/bookings/assigned", None, Some(&employee.token))
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);

    let response = record_outcome(&app, &assigned, booking_id, "completed").await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    assert_eq!(response.data()["status"], "completed");
}

#[tokio::test]
async fn test_concurrent_cancel_and_book_keep_counters_consistent() {
    let Some(app) = helpers::TestApp::try_new().await else { return };
    let admin = app.admin().await;
    app.approved_provider(&admin, "mental_health").await;
    let company_id = app.create_company(&admin, 5, 20).await;
    let employee = app.employee(&admin, company_id, 6).await;

    let mut booked = Vec::new();
    for _ in 0..3 {
        let response = book(&app, &employee).await;
        assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
        booked.push(helpers::parse_id(&response.data()["id"]));
    }

    let mut tasks = JoinSet::new();
    for booking_id in booked {
        let router = app.router.clone();
        let token = employee.token.clone();
        tasks.spawn(async move {
            let path = format!("/api/bookings/{booking_id}/cancel");
            helpers::send(router, "POST", &path, None, Some(&token)).await.status
        });
    }
    for _ in 0..3 {
        let router = app.router.clone();
        let token = employee.token.clone();
        tasks.spawn(async move {
            helpers::send(router, "POST", "/api/bookings", Some(booking_body(4)), Some(&token))
                .await
                .status
        });
    }

    while let Some(result) = tasks.join_next().await {
        let status = result.unwrap();
        assert!(status.is_success(), "{status}");
    }

    let after = balance(&app, &employee).await;
    assert_eq!(after["employee"]["used"], 3);
    assert_eq!(after["company"]["used"], 3);
}
