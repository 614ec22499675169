//! Integration tests for round-robin provider assignment.
//!
//! Each test owns one pillar and retires the providers earlier runs left
//! behind in it.

mod helpers;

use std::collections::HashMap;

use axum::http::StatusCode;
use serde_json::json;
use tokio::task::JoinSet;
use uuid::Uuid;

async fn set_count(app: &helpers::TestApp, provider_id: Uuid, count: i32) {
    sqlx::query("UPDATE provider_pillars SET assignment_count = $2 WHERE provider_id = $1")
        .bind(provider_id)
        .bind(count)
        .execute(&app.db_pool)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_least_assigned_provider_selected() {
    let Some(app) = helpers::TestApp::try_new().await else { return };
    let admin = app.admin().await;
    app.retire_providers("legal_assistance").await;

    let a = app.approved_provider(&admin, "legal_assistance").await;
    let b = app.approved_provider(&admin, "legal_assistance").await;
    let c = app.approved_provider(&admin, "legal_assistance").await;
    set_count(&app, a, 2).await;
    set_count(&app, b, 0).await;
    set_count(&app, c, 1).await;

    let response = app
        .request("POST", "/api/assignments/legal_assistance", None, Some(&admin.token))
        .await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    assert_eq!(helpers::parse_id(&response.data()["provider_id"]), b);
    assert_eq!(response.data()["assignment_count"], 1);
    assert!(!response.data()["last_assigned_at"].is_null());

    // b and c now tie on 1; c has never been assigned so it goes first.
    let response = app
        .request("POST", "/api/assignments/legal", None, Some(&admin.token))
        .await;
    assert_eq!(helpers::parse_id(&response.data()["provider_id"]), c);

    // Tie again, b was assigned longer ago.
    let response = app
        .request("POST", "/api/assignments/legal", None, Some(&admin.token))
        .await;
    assert_eq!(helpers::parse_id(&response.data()["provider_id"]), b);

    let candidates = app
        .request("GET", "/api/assignments/legal/candidates", None, Some(&admin.token))
        .await;
    assert_eq!(candidates.status, StatusCode::OK);
    let counts: HashMap<Uuid, i64> = candidates
        .data()
        .as_array()
        .unwrap()
        .iter()
        .map(|c| (helpers::parse_id(&c["provider_id"]), c["assignment_count"].as_i64().unwrap()))
        .collect();
    assert_eq!(counts.len(), 3);
    assert_eq!(counts[&a], 2);
    assert_eq!(counts[&b], 2);
    assert_eq!(counts[&c], 2);
}

#[tokio::test]
async fn test_no_eligible_provider_not_found() {
    let Some(app) = helpers::TestApp::try_new().await else { return };
    let admin = app.admin().await;
    app.retire_providers("financial_assistance").await;

    // Registered but never approved.
    let response = app
        .request(
            "POST",
            "/api/providers",
            Some(json!({
                "name": "Pending Advisor",
                "email": helpers::unique_email("advisor"),
                "pillars": ["financial_assistance"],
            })),
            Some(&admin.token),
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED);

    let response = app
        .request("POST", "/api/assignments/financial_assistance", None, Some(&admin.token))
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert!(response.message().contains("No eligible provider"));
}

#[tokio::test]
async fn test_concurrent_assignments_are_fair() {
    let Some(app) = helpers::TestApp::try_new().await else { return };
    let admin = app.admin().await;
    app.retire_providers("physical_wellness").await;

    let mut providers = Vec::new();
    for _ in 0..3 {
        providers.push(app.approved_provider(&admin, "physical_wellness").await);
    }

    let mut tasks = JoinSet::new();
    for _ in 0..9 {
        let router = app.router.clone();
        let token = admin.token.clone();
        tasks.spawn(async move {
            helpers::send(router, "POST", "/api/assignments/physical_wellness", None, Some(&token))
                .await
        });
    }

    let mut picks: HashMap<Uuid, usize> = HashMap::new();
    while let Some(result) = tasks.join_next().await {
        let response = result.unwrap();
        assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
        *picks
            .entry(helpers::parse_id(&response.data()["provider_id"]))
            .or_default() += 1;
    }

    for provider in &providers {
        assert_eq!(picks.get(provider), Some(&3), "uneven distribution: {picks:?}");
    }
}

#[tokio::test]
async fn test_unknown_pillar_rejected() {
    let Some(app) = helpers::TestApp::try_new().await else { return };
    let admin = app.admin().await;

    let response = app
        .request("POST", "/api/assignments/astrology", None, Some(&admin.token))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_employee_cannot_trigger_assignment() {
    let Some(app) = helpers::TestApp::try_new().await else { return };
    let user = app.registered_user().await;

    let response = app
        .request("POST", "/api/assignments/mental_health", None, Some(&user.token))
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
}
