// --- File: crates/connectify_calendly/src/routes.rs ---

use crate::client::CalendlyClient;
use crate::error::CalendlyError;
use crate::handlers::{
    check_availability_handler, create_booking_handler, get_booking_fields_handler,
    list_event_types_handler, post_booking_fields_handler, CalendlyState,
};
use crate::service::SchedulingProvider;
use axum::{
    routing::{get, post},
    Router,
};
use connectify_config::AppConfig;
use std::sync::Arc;

/// Creates a router containing all routes for the Calendly feature,
/// talking to the Calendly API configured in `config.calendly`.
pub fn routes(config: Arc<AppConfig>) -> Result<Router, CalendlyError> {
    let calendly_config = config.calendly.as_ref().ok_or_else(|| {
        CalendlyError::ConfigError("Calendly config missing".to_string())
    })?;
    let client = CalendlyClient::from_config(calendly_config)?;
    Ok(routes_with_provider(config, Arc::new(client)))
}

/// Same routes backed by any [`SchedulingProvider`].
pub fn routes_with_provider(
    config: Arc<AppConfig>,
    provider: Arc<dyn SchedulingProvider>,
) -> Router {
    let calendly_state = Arc::new(CalendlyState { config, provider });

    Router::new()
        .route("/calendly/availability", post(check_availability_handler))
        .route(
            "/calendly/fields",
            get(get_booking_fields_handler).post(post_booking_fields_handler),
        )
        .route("/calendly/bookings", post(create_booking_handler))
        .route("/calendly/event-types", get(list_event_types_handler))
        .with_state(calendly_state)
}
