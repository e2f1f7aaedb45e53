// --- File: crates/connectify_calendly/src/handlers.rs ---
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use connectify_common::{config_error, map_json_error, ConnectifyError};
use connectify_config::{AppConfig, CalendlyConfig};
use std::sync::Arc;
use tracing::info;

use crate::logic::{
    check_availability, create_booking, get_booking_fields, list_event_types, Silent,
};
use crate::models::{
    AvailabilityResponse, BookingFieldsResponse, BookingOutcome, CreateBookingRequest,
    CreateBookingResponse, EventTypesResponse, FieldsQuery, SchedulingParams,
};
use crate::service::SchedulingProvider;

// --- State for Calendly Handlers ---
#[derive(Clone)]
pub struct CalendlyState {
    pub config: Arc<AppConfig>,
    pub provider: Arc<dyn SchedulingProvider>,
}

impl CalendlyState {
    /// The `calendly` section, provided the feature is switched on.
    fn calendly_config(&self) -> Result<&CalendlyConfig, Response> {
        if !self.config.use_calendly {
            return Err(
                ConnectifyError::ServiceUnavailable("Calendly service is disabled.".to_string())
                    .into_response(),
            );
        }
        self.config.calendly.as_ref().ok_or_else(|| {
            info!("Calendly configuration missing in AppConfig.");
            config_error("Calendly config missing.").into_response()
        })
    }
}

/// Open slots for a day or date range, and whether the requested time is free.
#[axum::debug_handler]
pub async fn check_availability_handler(
    State(state): State<Arc<CalendlyState>>,
    Json(params): Json<SchedulingParams>,
) -> Result<Json<AvailabilityResponse>, Response> {
    let config = state.calendly_config()?;
    let result = check_availability(state.provider.as_ref(), config, &params, &Silent).await;
    map_json_error(result, ConnectifyError::from)
}

/// Intake fields of an event, parameters in the query string.
#[axum::debug_handler]
pub async fn get_booking_fields_handler(
    State(state): State<Arc<CalendlyState>>,
    Query(query): Query<FieldsQuery>,
) -> Result<Json<BookingFieldsResponse>, Response> {
    let config = state.calendly_config()?;
    let params = SchedulingParams::from(query);
    let result = get_booking_fields(state.provider.as_ref(), config, &params, &Silent).await;
    map_json_error(result, ConnectifyError::from)
}

/// Intake fields of an event, parameters in a JSON body.
#[axum::debug_handler]
pub async fn post_booking_fields_handler(
    State(state): State<Arc<CalendlyState>>,
    Json(params): Json<SchedulingParams>,
) -> Result<Json<BookingFieldsResponse>, Response> {
    let config = state.calendly_config()?;
    let result = get_booking_fields(state.provider.as_ref(), config, &params, &Silent).await;
    map_json_error(result, ConnectifyError::from)
}

/// Books the invitee: 201 when Calendly confirmed, 200 with a pre-filled link otherwise.
#[axum::debug_handler]
pub async fn create_booking_handler(
    State(state): State<Arc<CalendlyState>>,
    Json(request): Json<CreateBookingRequest>,
) -> Result<(StatusCode, Json<CreateBookingResponse>), Response> {
    let config = state.calendly_config()?;
    let outcome = create_booking(state.provider.as_ref(), config, &request, &Silent)
        .await
        .map_err(|e| ConnectifyError::from(e).into_response())?;

    let status = match outcome {
        BookingOutcome::Booked { .. } => StatusCode::CREATED,
        BookingOutcome::LinkGenerated { .. } => StatusCode::OK,
    };
    Ok((
        status,
        Json(CreateBookingResponse {
            success: true,
            outcome,
        }),
    ))
}

/// Event types owned by the token's user.
#[axum::debug_handler]
pub async fn list_event_types_handler(
    State(state): State<Arc<CalendlyState>>,
) -> Result<Json<EventTypesResponse>, Response> {
    state.calendly_config()?;
    let result = list_event_types(state.provider.as_ref(), &Silent).await;
    map_json_error(result, ConnectifyError::from)
}
