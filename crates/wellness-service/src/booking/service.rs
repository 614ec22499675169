//! Booking, cancelling and listing consultations.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use wellness_auth::rbac::{RbacEnforcer, SystemPermission};
use wellness_core::error::AppError;
use wellness_core::types::pagination::{PageRequest, PageResponse};
use wellness_database::repositories::{BookingRepository, EmployeeRepository, ProviderRepository};
use wellness_entity::Pillar;
use wellness_entity::booking::{Booking, BookingStatus, CreateBooking};
use wellness_entity::user::AppRole;

use crate::context::RequestContext;

/// Books sessions and keeps the balances in step.
#[derive(Debug, Clone)]
pub struct BookingService {
    booking_repo: Arc<BookingRepository>,
    employee_repo: Arc<EmployeeRepository>,
    provider_repo: Arc<ProviderRepository>,
    rbac: Arc<RbacEnforcer>,
}

/// Request to book a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookSessionRequest {
    /// Pillar of the consultation.
    pub pillar: Pillar,
    /// When the consultation takes place.
    pub scheduled_at: DateTime<Utc>,
    /// Notes for the provider.
    pub notes: Option<String>,
}

impl BookingService {
    /// Create a new booking service.
    pub fn new(
        booking_repo: Arc<BookingRepository>,
        employee_repo: Arc<EmployeeRepository>,
        provider_repo: Arc<ProviderRepository>,
        rbac: Arc<RbacEnforcer>,
    ) -> Self {
        Self {
            booking_repo,
            employee_repo,
            provider_repo,
            rbac,
        }
    }

    /// Book a session in the caller's active company.
    pub async fn book(&self, ctx: &RequestContext, req: BookSessionRequest) -> Result<Booking, AppError> {
        self.rbac
            .require_permission(ctx.role, SystemPermission::BookingCreate)?;

        if req.scheduled_at <= ctx.request_time {
            return Err(AppError::validation("Sessions must be booked in the future"));
        }

        let membership = self
            .employee_repo
            .find_active_by_user(ctx.user_id)
            .await?
            .ok_or_else(|| AppError::authorization("You have no active company membership"))?;

        let notes = req
            .notes
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());

        self.booking_repo
            .create(&CreateBooking {
                user_id: ctx.user_id,
                company_id: membership.company_id,
                pillar: req.pillar,
                scheduled_at: req.scheduled_at,
                notes,
            })
            .await
    }

    /// Cancel a scheduled booking. Owners cancel their own; the admin any.
    pub async fn cancel(&self, ctx: &RequestContext, booking_id: Uuid) -> Result<Booking, AppError> {
        let override_owner = self
            .rbac
            .has_permission(ctx.role, SystemPermission::BookingManageAll);
        self.booking_repo
            .cancel(booking_id, ctx.user_id, override_owner)
            .await
    }

    /// The caller's bookings.
    pub async fn list_mine(
        &self,
        ctx: &RequestContext,
        page: PageRequest,
    ) -> Result<PageResponse<Booking>, AppError> {
        self.booking_repo.list_by_user(ctx.user_id, &page).await
    }

    /// Bookings assigned to the calling provider.
    pub async fn list_assigned(
        &self,
        ctx: &RequestContext,
        page: PageRequest,
    ) -> Result<PageResponse<Booking>, AppError> {
        let provider = self
            .provider_repo
            .find_by_user(ctx.user_id)
            .await?
            .ok_or_else(|| AppError::not_found("No provider profile linked to this account"))?;
        self.booking_repo.list_by_provider(provider.id, &page).await
    }

    /// Mark a booking completed or no-show.
    pub async fn record_outcome(
        &self,
        ctx: &RequestContext,
        booking_id: Uuid,
        outcome: BookingStatus,
    ) -> Result<Booking, AppError> {
        self.rbac
            .require_permission(ctx.role, SystemPermission::BookingRecordOutcome)?;

        if ctx.role == AppRole::Prestador {
            let booking = self
                .booking_repo
                .find_by_id(booking_id)
                .await?
                .ok_or_else(|| AppError::not_found(format!("Booking {booking_id} not found")))?;
            let provider = self.provider_repo.find_by_user(ctx.user_id).await?;
            if provider.map(|p| p.id) != Some(booking.provider_id) {
                return Err(AppError::authorization("Booking is assigned to another provider"));
            }
        }

        let booking = self.booking_repo.record_outcome(booking_id, outcome).await?;
        info!(booking_id = %booking_id, outcome = %outcome, "Booking outcome recorded");
        Ok(booking)
    }
}
