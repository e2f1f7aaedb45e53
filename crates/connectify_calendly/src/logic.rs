// --- File: crates/connectify_calendly/src/logic.rs ---
//! Calendly operations: availability, intake fields, booking and event-type discovery.
//!
//! Every operation takes the provider, the `calendly` config section and a
//! [`ProgressSink`]. The sink receives short human-readable status lines;
//! the CLI prints them, HTTP handlers pass [`Silent`].

use chrono::{DateTime, NaiveDate, NaiveTime, SecondsFormat, Timelike, Utc};
use chrono_tz::Tz;
use connectify_config::{CalendlyConfig, EventConfig};
use tracing::{debug, info, warn};

use crate::error::CalendlyError;
use crate::fields::{self, FieldSchemaEntry, SourceField};
use crate::models::{
    AvailabilityResponse, AvailableSlot, BookingContext, BookingFieldsResponse, BookingOutcome,
    CheckedRange, CreateBookingRequest, EventDetails, EventTypeSummary, EventTypesResponse,
    InviteeIdentity, InviteePayload, SchedulingParams,
};
use crate::service::SchedulingProvider;

/// Receives progress messages while an operation runs.
pub trait ProgressSink: Send + Sync {
    fn progress(&self, message: &str);
}

/// Discards progress messages.
pub struct Silent;

impl ProgressSink for Silent {
    fn progress(&self, _message: &str) {}
}

impl<F> ProgressSink for F
where
    F: Fn(&str) + Send + Sync,
{
    fn progress(&self, message: &str) {
        self(message)
    }
}

// --- Input helpers ---

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

/// Finds the configured event whose name matches `event_name` after normalization.
pub fn find_event<'a>(
    config: &'a CalendlyConfig,
    event_name: Option<&str>,
) -> Result<&'a EventConfig, CalendlyError> {
    let name = non_blank(event_name)
        .ok_or_else(|| CalendlyError::InvalidInput("eventName is required".to_string()))?;
    let wanted = fields::normalize(name);

    config
        .events
        .iter()
        .find(|event| !wanted.is_empty() && fields::normalize(&event.event_name) == wanted)
        .ok_or_else(|| CalendlyError::EventNotFound(name.to_string()))
}

/// Full API URI of the event type; bare UUIDs are expanded against the API base URL.
pub fn event_type_uri(config: &CalendlyConfig, event: &EventConfig) -> String {
    let uri = event.event_uri.trim();
    if uri.starts_with("http") {
        uri.to_string()
    } else {
        format!(
            "{}/event_types/{}",
            config.api_base_url.trim_end_matches('/'),
            uri
        )
    }
}

/// Requested timezone or the configured default; must be an IANA name.
pub fn resolve_timezone(
    config: &CalendlyConfig,
    requested: Option<&str>,
) -> Result<String, CalendlyError> {
    let timezone = non_blank(requested).unwrap_or(config.default_timezone.as_str());
    timezone
        .parse::<Tz>()
        .map(|_| timezone.to_string())
        .map_err(|_| CalendlyError::InvalidInput(format!("Invalid timezone: {}", timezone)))
}

/// Accepts `YYYY-MM-DD` or a full RFC 3339 timestamp (its UTC date is used).
pub fn parse_date(value: &str) -> Result<NaiveDate, CalendlyError> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .or_else(|_| DateTime::parse_from_rfc3339(value).map(|dt| dt.with_timezone(&Utc).date_naive()))
        .map_err(|_| {
            CalendlyError::InvalidInput(format!("Invalid date '{}', expected YYYY-MM-DD", value))
        })
}

/// `HH:MM`, 24-hour.
pub fn parse_time(value: &str) -> Result<NaiveTime, CalendlyError> {
    let value = value.trim();
    NaiveTime::parse_from_str(value, "%H:%M")
        .map_err(|_| CalendlyError::InvalidInput(format!("Invalid time '{}', expected HH:MM", value)))
}

fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

fn end_of_day(date: NaiveDate) -> Result<DateTime<Utc>, CalendlyError> {
    date.and_hms_milli_opt(23, 59, 59, 999)
        .map(|dt| dt.and_utc())
        .ok_or_else(|| CalendlyError::InvalidInput(format!("Invalid date '{}'", date)))
}

/// UTC window to query: the whole `targetDate` if given, else the `checkWithRange` days.
pub fn availability_window(
    params: &SchedulingParams,
) -> Result<(DateTime<Utc>, DateTime<Utc>), CalendlyError> {
    if let Some(target_date) = non_blank(params.target_date.as_deref()) {
        let date = parse_date(target_date)?;
        return Ok((start_of_day(date), end_of_day(date)?));
    }

    match &params.check_with_range {
        Some(range) => {
            let from = parse_date(&range.from)?;
            let to = parse_date(&range.to)?;
            if to < from {
                return Err(CalendlyError::InvalidInput(
                    "checkWithRange.to must not be before checkWithRange.from".to_string(),
                ));
            }
            Ok((start_of_day(from), end_of_day(to)?))
        }
        None => Err(CalendlyError::InvalidInput(
            "Either targetDate or checkWithRange is required".to_string(),
        )),
    }
}

fn iso_millis(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Whether `slot` starts on `date` at `time`, both UTC.
fn slot_starts_at(slot: &AvailableSlot, date: NaiveDate, time: NaiveTime) -> bool {
    match DateTime::parse_from_rfc3339(&slot.start_time) {
        Ok(start) => {
            let start = start.with_timezone(&Utc);
            start.date_naive() == date
                && start.hour() == time.hour()
                && start.minute() == time.minute()
        }
        Err(_) => slot
            .start_time
            .contains(&format!("{}T{}", date.format("%Y-%m-%d"), time.format("%H:%M"))),
    }
}

// --- Schema loading ---

/// Custom questions of an event plus the booking page URL reported by Calendly, if fetched.
struct EventSchema {
    fields: Vec<FieldSchemaEntry>,
    provider_scheduling_url: Option<String>,
}

/// Configured custom fields win; without them the event type's questions are fetched.
async fn load_schema(
    provider: &dyn SchedulingProvider,
    event: &EventConfig,
    uri: &str,
    progress: &dyn ProgressSink,
) -> Result<EventSchema, CalendlyError> {
    if !event.custom_fields.is_empty() {
        let source: Vec<SourceField> = event.custom_fields.iter().map(SourceField::from).collect();
        return Ok(EventSchema {
            fields: fields::build_schema(&source),
            provider_scheduling_url: None,
        });
    }

    progress.progress(&format!(
        "No custom fields configured for \"{}\", asking Calendly",
        event.event_name
    ));
    let event_type = provider.event_type(uri).await?;
    let source = fields::source_fields_from_questions(&event_type.custom_questions);
    Ok(EventSchema {
        fields: fields::build_schema(&source),
        provider_scheduling_url: event_type.scheduling_url,
    })
}

// --- Operations ---

/// Lists open slots for an event and reports whether a specific time is among them.
pub async fn check_availability(
    provider: &dyn SchedulingProvider,
    config: &CalendlyConfig,
    params: &SchedulingParams,
    progress: &dyn ProgressSink,
) -> Result<AvailabilityResponse, CalendlyError> {
    info!(
        "[Calendly] Availability request: event={:?} target_date={:?} time={:?} range={:?}",
        params.event_name, params.target_date, params.time, params.check_with_range
    );

    let event = find_event(config, params.event_name.as_deref())?;
    let timezone = resolve_timezone(config, params.timezone.as_deref())?;
    let (start, end) = availability_window(params)?;
    let requested_time = non_blank(params.time.as_deref())
        .map(parse_time)
        .transpose()?;
    let target_date = non_blank(params.target_date.as_deref())
        .map(parse_date)
        .transpose()?;

    let uri = event_type_uri(config, event);
    progress.progress(&format!(
        "Checking availability for \"{}\" between {} and {}",
        event.event_name,
        iso_millis(start),
        iso_millis(end)
    ));

    let available_slots = provider.available_times(&uri, start, end, &timezone).await?;
    debug!("[Calendly] {} slots returned", available_slots.len());

    let is_specific_time_available = match (target_date, requested_time) {
        (Some(date), Some(time)) => available_slots
            .iter()
            .any(|slot| slot_starts_at(slot, date, time)),
        _ => false,
    };

    progress.progress(&format!(
        "Found {} available slot(s){}",
        available_slots.len(),
        match requested_time {
            Some(time) if is_specific_time_available => format!(", {} is free", time.format("%H:%M")),
            Some(time) => format!(", {} is not free", time.format("%H:%M")),
            None => String::new(),
        }
    ));

    Ok(AvailabilityResponse {
        success: true,
        is_specific_time_available,
        available_slots,
        range_checked: CheckedRange {
            from: iso_millis(start),
            to: iso_millis(end),
        },
    })
}

/// Custom intake questions of an event, keyed `a1`, `a2`, ... and without name/email.
pub async fn get_booking_fields(
    provider: &dyn SchedulingProvider,
    config: &CalendlyConfig,
    params: &SchedulingParams,
    progress: &dyn ProgressSink,
) -> Result<BookingFieldsResponse, CalendlyError> {
    info!(
        "[Calendly] Booking fields request: event={:?} target_date={:?} time={:?}",
        params.event_name, params.target_date, params.time
    );

    let event = find_event(config, params.event_name.as_deref())?;
    let timezone = resolve_timezone(config, params.timezone.as_deref())?;
    let uri = event_type_uri(config, event);
    let schema = load_schema(provider, event, &uri, progress).await?;

    progress.progress(&format!(
        "\"{}\" has {} custom question(s)",
        event.event_name,
        schema.fields.len()
    ));

    Ok(BookingFieldsResponse {
        success: true,
        event_details: EventDetails {
            name: event.event_name.clone(),
            uri,
            scheduling_url: event
                .scheduling_url
                .clone()
                .or(schema.provider_scheduling_url),
        },
        booking_context: BookingContext {
            timezone,
            target_date: params.target_date.clone(),
            time: params.time.clone(),
            check_with_range: params.check_with_range.clone(),
        },
        fields: schema
            .fields
            .iter()
            .map(FieldSchemaEntry::to_booking_field)
            .collect(),
    })
}

/// Books an invitee, or returns a pre-filled booking link when Calendly refuses with 403.
///
/// Answers are reconciled against the event's questions first; unanswered
/// required questions fail the whole call before anything is sent.
pub async fn create_booking(
    provider: &dyn SchedulingProvider,
    config: &CalendlyConfig,
    request: &CreateBookingRequest,
    progress: &dyn ProgressSink,
) -> Result<BookingOutcome, CalendlyError> {
    info!(
        "[Calendly] Booking request: event={:?} target_date={:?} time={:?}",
        request.event_name, request.target_date, request.time
    );

    let event = find_event(config, request.event_name.as_deref())?;
    let information = request.booking_information.as_ref().ok_or_else(|| {
        CalendlyError::InvalidInput("bookingInformation is required".to_string())
    })?;
    let name = information
        .invitee_name()
        .ok_or_else(|| CalendlyError::InvalidInput("Invitee name is required".to_string()))?;
    let email = information
        .invitee_email()
        .ok_or_else(|| CalendlyError::InvalidInput("Invitee email is required".to_string()))?;
    let date = non_blank(request.target_date.as_deref())
        .ok_or_else(|| CalendlyError::InvalidInput("targetDate is required".to_string()))
        .and_then(parse_date)?;
    let time = non_blank(request.time.as_deref())
        .ok_or_else(|| CalendlyError::InvalidInput("time is required".to_string()))
        .and_then(parse_time)?;
    let timezone = resolve_timezone(config, request.timezone.as_deref())?;

    let uri = event_type_uri(config, event);
    let schema = load_schema(provider, event, &uri, progress).await?;
    let answers = information.answer_entries();
    let reconciliation = fields::reconcile(&schema.fields, &answers)?;

    let date_text = date.format("%Y-%m-%d").to_string();
    let time_text = time.format("%H:%M").to_string();
    let payload = InviteePayload {
        event_type: uri,
        start_time: format!("{}T{}:00Z", date_text, time_text),
        invitee: InviteeIdentity {
            name: name.to_string(),
            email: email.to_string(),
            timezone,
        },
        location: event.location.clone(),
        questions_and_answers: reconciliation.questions_and_answers,
    };

    progress.progress(&format!(
        "Booking \"{}\" for {} at {}",
        event.event_name, name, payload.start_time
    ));

    match provider.create_invitee(&payload).await {
        Ok(created) => {
            progress.progress(&format!("Booked: {}", created.uri));
            Ok(BookingOutcome::Booked { uri: created.uri })
        }
        Err(err) if err.is_plan_restricted() => {
            warn!(
                "[Calendly] Direct booking refused for \"{}\" ({}), falling back to a pre-filled link",
                event.event_name, err
            );
            let scheduling_url = event
                .scheduling_url
                .clone()
                .or(schema.provider_scheduling_url)
                .ok_or_else(|| {
                    CalendlyError::ConfigError(format!(
                        "No scheduling_url configured for event \"{}\"",
                        event.event_name
                    ))
                })?;
            let booking_link = build_prefilled_link(
                &scheduling_url,
                name,
                email,
                &date_text,
                &time_text,
                &reconciliation.prefill,
            )?;
            progress.progress(&format!("Direct booking not allowed, use: {}", booking_link));
            Ok(BookingOutcome::LinkGenerated {
                booking_link,
                reason: err.to_string(),
            })
        }
        Err(err) => Err(err),
    }
}

/// Appends identity, slot and answer parameters to the booking page URL.
///
/// `prefill` holds `(answer_key, value)` pairs; a key may repeat for
/// multi-select answers.
pub fn build_prefilled_link(
    scheduling_url: &str,
    name: &str,
    email: &str,
    date: &str,
    time: &str,
    prefill: &[(String, String)],
) -> Result<String, CalendlyError> {
    let mut pairs: Vec<(&str, &str)> = vec![
        ("name", name),
        ("email", email),
        ("date", date),
        ("time", time),
    ];
    pairs.extend(prefill.iter().map(|(key, value)| (key.as_str(), value.as_str())));

    let query = serde_urlencoded::to_string(&pairs)
        .map_err(|e| CalendlyError::EncodingError(e.to_string()))?;
    let separator = if scheduling_url.contains('?') { '&' } else { '?' };
    Ok(format!("{}{}{}", scheduling_url, separator, query))
}

/// The token owner and their event types.
pub async fn list_event_types(
    provider: &dyn SchedulingProvider,
    progress: &dyn ProgressSink,
) -> Result<EventTypesResponse, CalendlyError> {
    let user = provider.current_user().await?;
    progress.progress(&format!("Authenticated as {} ({})", user.name, user.uri));

    let event_types = provider.list_event_types(&user.uri).await?;
    progress.progress(&format!("Found {} event type(s)", event_types.len()));

    Ok(EventTypesResponse {
        user,
        event_types: event_types
            .into_iter()
            .map(|et| EventTypeSummary {
                name: et.name,
                uri: et.uri,
                scheduling_url: et.scheduling_url,
                active: et.active,
            })
            .collect(),
    })
}
