//! Route definitions for the wellness HTTP API.
//!
//! All routes are organized by domain and mounted under `/api`.

use axum::Router;
use axum::routing::{delete, get, post, put};

use crate::handlers;
use crate::state::AppState;

/// Build the API router and attach the state.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(auth_routes())
        .merge(user_routes())
        .merge(company_routes())
        .merge(employee_routes())
        .merge(invite_routes())
        .merge(balance_routes())
        .merge(provider_routes())
        .merge(assignment_routes())
        .merge(booking_routes())
        .merge(health_routes());

    Router::new().nest("/api", api_routes).with_state(state)
}

/// Auth endpoints: register, login, refresh, me
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(handlers::auth::register))
        .route("/auth/login", post(handlers::auth::login))
        .route("/auth/refresh", post(handlers::auth::refresh))
        .route("/auth/me", get(handlers::auth::me))
}

fn user_routes() -> Router<AppState> {
    Router::new().route("/users", post(handlers::user::create_user))
}

/// Companies, seats and the company session pool
fn company_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/companies",
            get(handlers::company::list_companies).post(handlers::company::create_company),
        )
        .route("/companies/{id}", get(handlers::company::get_company))
        .route(
            "/companies/{id}/seats",
            get(handlers::company::seat_summary).put(handlers::company::update_seat_limit),
        )
        .route("/companies/{id}/sessions", put(handlers::company::allocate_sessions))
        .route("/companies/{id}/status", put(handlers::company::set_status))
        .route("/companies/{id}/balance", get(handlers::balance::company_balance))
}

/// Memberships within a company
fn employee_routes() -> Router<AppState> {
    Router::new()
        .route("/companies/{id}/employees", get(handlers::employee::list_employees))
        .route(
            "/companies/{id}/employees/{user_id}/status",
            put(handlers::employee::set_status),
        )
        .route(
            "/companies/{id}/employees/{user_id}/sessions",
            put(handlers::employee::allocate_sessions),
        )
        .route(
            "/companies/{id}/employees/{user_id}/balance",
            get(handlers::balance::employee_balance),
        )
}

/// Invite issuance (HR) and redemption (invitee)
fn invite_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/companies/{id}/invites",
            get(handlers::invite::list_invites).post(handlers::invite::create_invite),
        )
        .route("/invites/{id}/revoke", post(handlers::invite::revoke_invite))
        .route("/invite-codes/{code}", get(handlers::invite::lookup_code))
        .route("/invite-codes/{code}/redeem", post(handlers::invite::redeem_code))
}

fn balance_routes() -> Router<AppState> {
    Router::new().route("/balance/me", get(handlers::balance::my_balance))
}

/// Provider registry and pillar membership
fn provider_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/providers",
            get(handlers::provider::list_providers).post(handlers::provider::create_provider),
        )
        .route("/providers/{id}/approval", put(handlers::provider::set_approval))
        .route("/providers/{id}/status", put(handlers::provider::set_status))
        .route("/providers/{id}/pillars", post(handlers::provider::attach_pillar))
        .route(
            "/providers/{id}/pillars/{pillar}",
            delete(handlers::provider::detach_pillar),
        )
}

/// Round-robin assignment
fn assignment_routes() -> Router<AppState> {
    Router::new()
        .route("/assignments/{pillar}", post(handlers::provider::assign_next))
        .route(
            "/assignments/{pillar}/candidates",
            get(handlers::provider::candidates),
        )
}

fn booking_routes() -> Router<AppState> {
    Router::new()
        .route("/bookings", post(handlers::booking::book_session))
        .route("/bookings/mine", get(handlers::booking::list_mine))
        .route("/bookings/assigned", get(handlers::booking::list_assigned))
        .route("/bookings/{id}/cancel", post(handlers::booking::cancel))
        .route("/bookings/{id}/outcome", put(handlers::booking::record_outcome))
}

fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health::health))
        .route("/health/detailed", get(handlers::health::health_detailed))
}
