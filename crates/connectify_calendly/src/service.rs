// --- File: crates/connectify_calendly/src/service.rs ---
//! The scheduling provider seam.
//!
//! Business logic talks to Calendly only through [`SchedulingProvider`], so the
//! HTTP client can be swapped for the in-memory mock in tests.

use std::future::Future;
use std::pin::Pin;

use chrono::{DateTime, Utc};

use crate::error::CalendlyError;
use crate::models::{AvailableSlot, CalendlyUser, CreatedInvitee, EventType, InviteePayload};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Operations the booking flow needs from Calendly.
pub trait SchedulingProvider: Send + Sync {
    /// Bookable start times of an event type between `start` and `end`.
    fn available_times<'a>(
        &'a self,
        event_type_uri: &'a str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        timezone: &'a str,
    ) -> BoxFuture<'a, Result<Vec<AvailableSlot>, CalendlyError>>;

    /// The event type, including its custom questions.
    fn event_type<'a>(
        &'a self,
        event_type_uri: &'a str,
    ) -> BoxFuture<'a, Result<EventType, CalendlyError>>;

    /// Books an invitee. A 403 means the account's plan does not allow it.
    fn create_invitee<'a>(
        &'a self,
        payload: &'a InviteePayload,
    ) -> BoxFuture<'a, Result<CreatedInvitee, CalendlyError>>;

    /// The user the access token belongs to.
    fn current_user(&self) -> BoxFuture<'_, Result<CalendlyUser, CalendlyError>>;

    fn list_event_types<'a>(
        &'a self,
        user_uri: &'a str,
    ) -> BoxFuture<'a, Result<Vec<EventType>, CalendlyError>>;
}
