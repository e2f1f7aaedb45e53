// File: crates/connectify_calendly/src/doc.rs

#![allow(dead_code)]
#![cfg(feature = "openapi")]
use utoipa::OpenApi;

use crate::models::{
    AnswerEntry, AvailabilityResponse, AvailableSlot, BookingContext, BookingField,
    BookingFieldsResponse, BookingInformation, BookingOutcome, CalendlyUser, CheckedRange,
    CreateBookingRequest, CreateBookingResponse, DateRange, EventDetails, EventTypeSummary,
    EventTypesResponse, FieldsQuery, SchedulingParams, SubmittedQuestionAnswer,
};
use connectify_config::FieldType;

#[utoipa::path(
    post,
    path = "/calendly/availability",
    request_body(content = SchedulingParams, example = json!({
        "eventName": "Test Event",
        "timezone": "Asia/Dhaka",
        "targetDate": "2026-01-30",
        "time": "14:00"
    })),
    responses(
        (status = 200, description = "Available slots for the day or range", body = AvailabilityResponse),
        (status = 400, description = "Missing event name, bad date, time or timezone"),
        (status = 404, description = "No configured event with that name"),
        (status = 503, description = "Calendly integration is disabled")
    ),
    tag = "Calendly"
)]
fn doc_check_availability_handler() {}

#[utoipa::path(
    get,
    path = "/calendly/fields",
    params(FieldsQuery),
    responses(
        (status = 200, description = "Custom intake questions with answer keys", body = BookingFieldsResponse),
        (status = 400, description = "Missing event name or bad timezone"),
        (status = 404, description = "No configured event with that name")
    ),
    tag = "Calendly"
)]
fn doc_get_booking_fields_handler() {}

#[utoipa::path(
    post,
    path = "/calendly/fields",
    request_body = SchedulingParams,
    responses(
        (status = 200, description = "Custom intake questions with answer keys", body = BookingFieldsResponse),
        (status = 400, description = "Missing event name or bad timezone"),
        (status = 404, description = "No configured event with that name")
    ),
    tag = "Calendly"
)]
fn doc_post_booking_fields_handler() {}

#[utoipa::path(
    post,
    path = "/calendly/bookings",
    request_body(content = CreateBookingRequest, example = json!({
        "eventName": "Test Event",
        "timezone": "Asia/Dhaka",
        "targetDate": "2026-01-30",
        "time": "14:00",
        "bookingInformation": {
            "full_name": "John Doe",
            "email": "john.doe@example.com",
            "answers": [
                { "answer_key": "a1", "value": "Hello" },
                { "question": "Phone Number input fields *", "value": "+8801700000000" },
                { "answer_key": "a4", "value": ["Option 1", "Option 3"] }
            ]
        }
    })),
    responses(
        (status = 201, description = "Invitee booked", body = CreateBookingResponse,
         example = json!({
             "success": true,
             "status": "booked",
             "uri": "https://api.calendly.com/scheduled_events/ABC/invitees/DEF"
         })
        ),
        (status = 200, description = "Direct booking not allowed on this plan; pre-filled link returned", body = CreateBookingResponse,
         example = json!({
             "success": true,
             "status": "link_generated",
             "booking_link": "https://calendly.com/acme/test-event?name=John+Doe&email=john.doe%40example.com&date=2026-01-30&time=14%3A00&a1=Hello",
             "reason": "Calendly API returned an error: Permission Denied (Status: 403)"
         })
        ),
        (status = 400, description = "Missing invitee data or required answers",
         example = json!({
             "error": {
                 "message": "Validation error: Missing required fields: Multiple lines, Phone Number input fields",
                 "code": 400
             }
         })
        ),
        (status = 404, description = "No configured event with that name")
    ),
    tag = "Calendly"
)]
fn doc_create_booking_handler() {}

#[utoipa::path(
    get,
    path = "/calendly/event-types",
    responses(
        (status = 200, description = "Token owner and their event types", body = EventTypesResponse),
        (status = 401, description = "Calendly rejected the access token")
    ),
    tag = "Calendly"
)]
fn doc_list_event_types_handler() {}

#[derive(OpenApi)]
#[openapi(
    paths(
        doc_check_availability_handler,
        doc_get_booking_fields_handler,
        doc_post_booking_fields_handler,
        doc_create_booking_handler,
        doc_list_event_types_handler
    ),
    components(
        schemas(
            SchedulingParams,
            DateRange,
            AvailabilityResponse,
            AvailableSlot,
            CheckedRange,
            BookingFieldsResponse,
            BookingField,
            BookingContext,
            EventDetails,
            FieldType,
            CreateBookingRequest,
            BookingInformation,
            AnswerEntry,
            SubmittedQuestionAnswer,
            CreateBookingResponse,
            BookingOutcome,
            EventTypesResponse,
            EventTypeSummary,
            CalendlyUser
        )
    ),
    tags(
        (name = "Calendly", description = "Calendly availability, intake fields and booking")
    )
)]
pub struct CalendlyApiDoc;
