//! Integration tests for seat accounting.

mod helpers;

use axum::http::StatusCode;
use serde_json::json;
use tokio::task::JoinSet;
use uuid::Uuid;

use wellness_entity::user::AppRole;

async fn seats(app: &helpers::TestApp, token: &str, company_id: Uuid) -> serde_json::Value {
    let response = app
        .request("GET", &format!("/api/companies/{company_id}/seats"), None, Some(token))
        .await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    response.data().clone()
}

async fn active_count(app: &helpers::TestApp, company_id: Uuid) -> i64 {
    sqlx::query_scalar(
        "SELECT COUNT(*) FROM company_employees WHERE company_id = $1 AND is_active",
    )
    .bind(company_id)
    .fetch_one(&app.db_pool)
    .await
    .unwrap()
}

#[tokio::test]
async fn test_seat_limit_below_active_count_rejected() {
    let Some(app) = helpers::TestApp::try_new().await else { return };
    let admin = app.admin().await;
    let company_id = app.create_company(&admin, 3, 10).await;
    let hr = app.create_user(AppRole::Hr, Some(company_id)).await;
    app.employee(&hr, company_id, 1).await;
    app.employee(&hr, company_id, 1).await;

    let response = app
        .request(
            "PUT",
            &format!("/api/companies/{company_id}/seats"),
            Some(json!({ "seat_limit": 1 })),
            Some(&hr.token),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "VALIDATION_ERROR");

    let response = app
        .request(
            "PUT",
            &format!("/api/companies/{company_id}/seats"),
            Some(json!({ "seat_limit": 5 })),
            Some(&hr.token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    assert_eq!(response.data()["seat_limit"], 5);
    assert_eq!(response.data()["seat_used"], 2);
    assert_eq!(response.data()["seat_available"], 3);
}

#[tokio::test]
async fn test_seat_limit_equal_to_active_count_accepted() {
    let Some(app) = helpers::TestApp::try_new().await else { return };
    let admin = app.admin().await;
    let company_id = app.create_company(&admin, 4, 10).await;
    app.employee(&admin, company_id, 1).await;
    app.employee(&admin, company_id, 1).await;

    let response = app
        .request(
            "PUT",
            &format!("/api/companies/{company_id}/seats"),
            Some(json!({ "seat_limit": 2 })),
            Some(&admin.token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["seat_available"], 0);
}

#[tokio::test]
async fn test_redeem_rejected_when_company_full() {
    let Some(app) = helpers::TestApp::try_new().await else { return };
    let admin = app.admin().await;
    let company_id = app.create_company(&admin, 1, 10).await;
    app.employee(&admin, company_id, 1).await;

    let code = app.create_invite(&admin, company_id, 1).await;
    let late = app.registered_user().await;
    let response = app.redeem(&late, &code).await;
    assert_eq!(response.status, StatusCode::CONFLICT);

    assert_eq!(active_count(&app, company_id).await, 1);
    let lookup = app
        .request("GET", &format!("/api/invite-codes/{code}"), None, Some(&late.token))
        .await;
    assert_eq!(lookup.data()["status"], "pending");
}

#[tokio::test]
async fn test_concurrent_redemptions_take_last_seat_once() {
    let Some(app) = helpers::TestApp::try_new().await else { return };
    let admin = app.admin().await;
    let company_id = app.create_company(&admin, 1, 10).await;

    let mut tasks = JoinSet::new();
    for _ in 0..4 {
        let code = app.create_invite(&admin, company_id, 1).await;
        let user = app.registered_user().await;
        let router = app.router.clone();
        tasks.spawn(async move {
            let path = format!("/api/invite-codes/{code}/redeem");
            helpers::send(router, "POST", &path, None, Some(&user.token))
                .await
                .status
        });
    }

    let mut statuses = Vec::new();
    while let Some(result) = tasks.join_next().await {
        statuses.push(result.unwrap());
    }

    assert_eq!(statuses.iter().filter(|s| **s == StatusCode::OK).count(), 1);
    assert_eq!(
        statuses.iter().filter(|s| **s == StatusCode::CONFLICT).count(),
        3
    );
    assert_eq!(active_count(&app, company_id).await, 1);
    assert_eq!(seats(&app, &admin.token, company_id).await["seat_used"], 1);
}

#[tokio::test]
async fn test_deactivation_frees_seat_and_reactivation_checks_limit() {
    let Some(app) = helpers::TestApp::try_new().await else { return };
    let admin = app.admin().await;
    let company_id = app.create_company(&admin, 1, 10).await;
    let hr = app.create_user(AppRole::Hr, Some(company_id)).await;
    let first = app.employee(&hr, company_id, 2).await;

    let response = app
        .request(
            "PUT",
            &format!("/api/companies/{company_id}/employees/{}/status", first.id),
            Some(json!({ "active": false })),
            Some(&hr.token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    assert_eq!(response.data()["employee"]["is_active"], false);
    assert_eq!(response.data()["seats"]["seat_used"], 0);
    assert_eq!(active_count(&app, company_id).await, 0);

    app.employee(&hr, company_id, 2).await;
    assert_eq!(seats(&app, &hr.token, company_id).await["seat_available"], 0);

    let response = app
        .request(
            "PUT",
            &format!("/api/companies/{company_id}/employees/{}/status", first.id),
            Some(json!({ "active": true })),
            Some(&hr.token),
        )
        .await;
    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(active_count(&app, company_id).await, 1);
}

async fn set_employee_active(
    app: &helpers::TestApp,
    actor: &helpers::TestUser,
    company_id: Uuid,
    user_id: Uuid,
    active: bool,
) -> StatusCode {
    app.request(
        "PUT",
        &format!("/api/companies/{company_id}/employees/{user_id}/status"),
        Some(json!({ "active": active })),
        Some(&actor.token),
    )
    .await
    .status
}

#[tokio::test]
async fn test_suspended_company_cannot_reactivate_employees() {
    let Some(app) = helpers::TestApp::try_new().await else { return };
    let admin = app.admin().await;
    let company_id = app.create_company(&admin, 5, 10).await;
    let hr = app.create_user(AppRole::Hr, Some(company_id)).await;
    let first = app.employee(&hr, company_id, 2).await;
    let second = app.employee(&hr, company_id, 2).await;

    assert_eq!(
        set_employee_active(&app, &hr, company_id, first.id, false).await,
        StatusCode::OK
    );

    let response = app
        .request(
            "PUT",
            &format!("/api/companies/{company_id}/status"),
            Some(json!({ "active": false })),
            Some(&admin.token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);

    // Freeing a seat still works; taking one does not.
    assert_eq!(
        set_employee_active(&app, &hr, company_id, second.id, false).await,
        StatusCode::OK
    );
    assert_eq!(
        set_employee_active(&app, &hr, company_id, first.id, true).await,
        StatusCode::CONFLICT
    );
    assert_eq!(active_count(&app, company_id).await, 0);

    let response = app
        .request(
            "PUT",
            &format!("/api/companies/{company_id}/status"),
            Some(json!({ "active": true })),
            Some(&admin.token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    assert_eq!(
        set_employee_active(&app, &hr, company_id, first.id, true).await,
        StatusCode::OK
    );
    assert_eq!(active_count(&app, company_id).await, 1);
}

#[tokio::test]
async fn test_seat_used_tracks_active_employees() {
    let Some(app) = helpers::TestApp::try_new().await else { return };
    let admin = app.admin().await;
    let company_id = app.create_company(&admin, 10, 10).await;

    let mut employees = Vec::new();
    for _ in 0..3 {
        employees.push(app.employee(&admin, company_id, 1).await);
    }
    let summary = seats(&app, &admin.token, company_id).await;
    assert_eq!(summary["seat_used"], 3);
    assert_eq!(summary["seat_available"], 7);

    let response = app
        .request(
            "PUT",
            &format!("/api/companies/{company_id}/employees/{}/status", employees[1].id),
            Some(json!({ "active": false })),
            Some(&admin.token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let summary = seats(&app, &admin.token, company_id).await;
    assert_eq!(summary["seat_used"], active_count(&app, company_id).await);
    assert_eq!(summary["seat_used"], 2);
}

#[tokio::test]
async fn test_hr_scoped_to_own_company() {
    let Some(app) = helpers::TestApp::try_new().await else { return };
    let admin = app.admin().await;
    let own = app.create_company(&admin, 2, 10).await;
    let other = app.create_company(&admin, 2, 10).await;
    let hr = app.create_user(AppRole::Hr, Some(own)).await;

    let response = app
        .request("GET", &format!("/api/companies/{other}/seats"), None, Some(&hr.token))
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let response = app
        .request(
            "PUT",
            &format!("/api/companies/{other}/seats"),
            Some(json!({ "seat_limit": 50 })),
            Some(&hr.token),
        )
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_employee_cannot_change_seats() {
    let Some(app) = helpers::TestApp::try_new().await else { return };
    let admin = app.admin().await;
    let company_id = app.create_company(&admin, 2, 10).await;
    let employee = app.employee(&admin, company_id, 1).await;

    let response = app
        .request(
            "PUT",
            &format!("/api/companies/{company_id}/seats"),
            Some(json!({ "seat_limit": 50 })),
            Some(&employee.token),
        )
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_employee_allocation_below_used_rejected() {
    let Some(app) = helpers::TestApp::try_new().await else { return };
    let admin = app.admin().await;
    let company_id = app.create_company(&admin, 2, 10).await;
    let employee = app.employee(&admin, company_id, 3).await;

    sqlx::query("UPDATE company_employees SET sessions_used = 2 WHERE user_id = $1")
        .bind(employee.id)
        .execute(&app.db_pool)
        .await
        .unwrap();

    let path = format!("/api/companies/{company_id}/employees/{}/sessions", employee.id);
    let response = app
        .request("PUT", &path, Some(json!({ "sessions_allocated": 1 })), Some(&admin.token))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let response = app
        .request("PUT", &path, Some(json!({ "sessions_allocated": 8 })), Some(&admin.token))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["sessions_allocated"], 8);
}
