//! Application state shared across all handlers.

use std::sync::Arc;
use std::time::Instant;

use sqlx::PgPool;

use wellness_auth::jwt::{JwtDecoder, JwtEncoder};
use wellness_auth::password::{PasswordHasher, PasswordValidator};
use wellness_auth::rbac::RbacEnforcer;
use wellness_core::config::AppConfig;
use wellness_database::repositories::{
    AssignmentRepository, BookingRepository, CompanyRepository, EmployeeRepository,
    InviteRepository, ProviderRepository, UserRepository,
};
use wellness_service::{
    AuthService, BalanceService, BookingService, CompanyService, EmployeeService, InviteService,
    ProviderService, UserService,
};

/// Everything a handler may need, passed via `State<AppState>`.
///
/// All fields are `Arc`-wrapped or cheap to clone.
#[derive(Debug, Clone)]
pub struct AppState {
    // ── Configuration ────────────────────────────────────────
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// When the process started
    pub started_at: Instant,

    // ── Infrastructure ───────────────────────────────────────
    /// PostgreSQL connection pool
    pub db_pool: PgPool,

    // ── Auth ─────────────────────────────────────────────────
    /// JWT validator
    pub jwt_decoder: Arc<JwtDecoder>,
    /// Role-based access control enforcer
    pub rbac_enforcer: Arc<RbacEnforcer>,

    // ── Services ─────────────────────────────────────────────
    /// Login and tokens
    pub auth_service: Arc<AuthService>,
    /// Accounts
    pub user_service: Arc<UserService>,
    /// Companies and seats
    pub company_service: Arc<CompanyService>,
    /// Memberships
    pub employee_service: Arc<EmployeeService>,
    /// Session balances
    pub balance_service: Arc<BalanceService>,
    /// Invite codes
    pub invite_service: Arc<InviteService>,
    /// Providers and round-robin assignment
    pub provider_service: Arc<ProviderService>,
    /// Bookings
    pub booking_service: Arc<BookingService>,
}

impl AppState {
    /// Wire repositories, auth components and services over a pool.
    pub fn new(config: AppConfig, db_pool: PgPool) -> Self {
        // ── Repositories ─────────────────────────────────────
        let user_repo = Arc::new(UserRepository::new(db_pool.clone()));
        let company_repo = Arc::new(CompanyRepository::new(db_pool.clone()));
        let employee_repo = Arc::new(EmployeeRepository::new(db_pool.clone()));
        let invite_repo = Arc::new(InviteRepository::new(db_pool.clone()));
        let provider_repo = Arc::new(ProviderRepository::new(db_pool.clone()));
        let assignment_repo = Arc::new(AssignmentRepository::new(db_pool.clone()));
        let booking_repo = Arc::new(BookingRepository::new(db_pool.clone()));

        // ── Auth ─────────────────────────────────────────────
        let password_hasher = Arc::new(PasswordHasher::new());
        let password_validator = Arc::new(PasswordValidator::new(&config.auth));
        let jwt_encoder = Arc::new(JwtEncoder::new(&config.auth));
        let jwt_decoder = Arc::new(JwtDecoder::new(&config.auth));
        let rbac_enforcer = Arc::new(RbacEnforcer::new());

        // ── Services ─────────────────────────────────────────
        let user_service = Arc::new(UserService::new(
            Arc::clone(&user_repo),
            Arc::clone(&password_hasher),
            Arc::clone(&password_validator),
            Arc::clone(&rbac_enforcer),
        ));
        let auth_service = Arc::new(AuthService::new(
            Arc::clone(&user_repo),
            Arc::clone(&user_service),
            Arc::clone(&password_hasher),
            jwt_encoder,
            Arc::clone(&jwt_decoder),
        ));
        let company_service = Arc::new(CompanyService::new(
            Arc::clone(&company_repo),
            Arc::clone(&rbac_enforcer),
        ));
        let employee_service = Arc::new(EmployeeService::new(
            Arc::clone(&employee_repo),
            Arc::clone(&rbac_enforcer),
        ));
        let balance_service = Arc::new(BalanceService::new(
            Arc::clone(&employee_repo),
            Arc::clone(&company_repo),
            Arc::clone(&rbac_enforcer),
        ));
        let invite_service = Arc::new(InviteService::new(
            invite_repo,
            Arc::clone(&company_repo),
            Arc::clone(&rbac_enforcer),
            config.invites.clone(),
        ));
        let provider_service = Arc::new(ProviderService::new(
            Arc::clone(&provider_repo),
            assignment_repo,
            Arc::clone(&rbac_enforcer),
        ));
        let booking_service = Arc::new(BookingService::new(
            booking_repo,
            employee_repo,
            provider_repo,
            Arc::clone(&rbac_enforcer),
        ));

        Self {
            config: Arc::new(config),
            started_at: Instant::now(),
            db_pool,
            jwt_decoder,
            rbac_enforcer,
            auth_service,
            user_service,
            company_service,
            employee_service,
            balance_service,
            invite_service,
            provider_service,
            booking_service,
        }
    }
}
