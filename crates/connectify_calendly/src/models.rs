// --- File: crates/connectify_calendly/src/models.rs ---
use connectify_config::{FieldType, LocationConfig};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

// --- Calendly API wire types ---

/// `{"collection": [...]}` envelope used by Calendly list endpoints.
#[derive(Deserialize, Debug)]
pub(crate) struct Collection<T> {
    #[serde(default = "Vec::new")]
    pub collection: Vec<T>,
}

/// `{"resource": {...}}` envelope used by Calendly single-object endpoints.
#[derive(Deserialize, Debug)]
pub(crate) struct Resource<T> {
    pub resource: T,
}

/// One bookable start time returned by `/event_type_available_times`.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct AvailableSlot {
    #[serde(default)]
    pub status: Option<String>,
    #[cfg_attr(feature = "openapi", schema(example = "2026-01-30T14:00:00Z"))]
    pub start_time: String,
    #[serde(default)]
    pub invitees_remaining: Option<i64>,
    #[serde(default)]
    pub scheduling_url: Option<String>,
}

/// A custom intake question as Calendly declares it on an event type.
/// `name` is the question text shown to the invitee.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct CustomQuestion {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub position: i64,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub answer_choices: Vec<String>,
}

fn enabled_by_default() -> bool {
    true
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct EventType {
    pub uri: String,
    pub name: String,
    #[serde(default)]
    pub scheduling_url: Option<String>,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub custom_questions: Vec<CustomQuestion>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct CalendlyUser {
    pub uri: String,
    pub name: String,
    #[serde(default)]
    pub scheduling_url: Option<String>,
}

/// Body of `POST /invitees`.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct InviteePayload {
    pub event_type: String,
    pub start_time: String,
    pub invitee: InviteeIdentity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<LocationConfig>,
    pub questions_and_answers: Vec<QuestionAnswer>,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct InviteeIdentity {
    pub name: String,
    pub email: String,
    pub timezone: String,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct QuestionAnswer {
    /// Exact label as declared on the event type.
    pub question: String,
    pub answer: String,
    pub position: usize,
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CreatedInvitee {
    pub uri: String,
}

// --- Requests from our consumers ---

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct DateRange {
    #[cfg_attr(feature = "openapi", schema(example = "2026-01-26"))]
    pub from: String,
    #[cfg_attr(feature = "openapi", schema(example = "2026-01-30"))]
    pub to: String,
}

/// Which event, and which day or range, a caller is asking about.
#[derive(Deserialize, Debug, Clone, Default)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct SchedulingParams {
    #[serde(default, alias = "event_name")]
    #[cfg_attr(feature = "openapi", schema(example = "Test Event"))]
    pub event_name: Option<String>,
    #[serde(default)]
    #[cfg_attr(feature = "openapi", schema(example = "Asia/Dhaka"))]
    pub timezone: Option<String>,
    #[serde(default, alias = "target_date")]
    #[cfg_attr(feature = "openapi", schema(example = "2026-01-30"))]
    pub target_date: Option<String>,
    /// `HH:MM`, UTC.
    #[serde(default)]
    #[cfg_attr(feature = "openapi", schema(example = "14:00"))]
    pub time: Option<String>,
    #[serde(default, alias = "check_with_range")]
    pub check_with_range: Option<DateRange>,
}

/// Flat query-string variant of [`SchedulingParams`] for `GET /calendly/fields`.
#[derive(Deserialize, Debug, Clone, Default)]
#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams))]
pub struct FieldsQuery {
    #[serde(default, alias = "eventName")]
    pub event_name: Option<String>,
    #[serde(default)]
    pub timezone: Option<String>,
    #[serde(default, alias = "targetDate")]
    pub target_date: Option<String>,
    #[serde(default)]
    pub time: Option<String>,
}

impl From<FieldsQuery> for SchedulingParams {
    fn from(query: FieldsQuery) -> Self {
        SchedulingParams {
            event_name: query.event_name,
            timezone: query.timezone,
            target_date: query.target_date,
            time: query.time,
            check_with_range: None,
        }
    }
}

/// One caller-supplied answer. Any of `answer_key`, `name` or `question`
/// may identify the field it belongs to.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct AnswerEntry {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub question: Option<String>,
    #[serde(default)]
    #[cfg_attr(feature = "openapi", schema(example = "a1"))]
    pub answer_key: Option<String>,
    #[serde(default)]
    pub value: Value,
}

/// Answers in Calendly's own `questions_and_answers` shape.
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct SubmittedQuestionAnswer {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub question: Option<String>,
    #[serde(default)]
    pub answer_key: Option<String>,
    #[serde(default)]
    pub answer: Value,
}

impl From<SubmittedQuestionAnswer> for AnswerEntry {
    fn from(qa: SubmittedQuestionAnswer) -> Self {
        AnswerEntry {
            name: qa.name,
            question: qa.question,
            answer_key: qa.answer_key,
            value: qa.answer,
        }
    }
}

#[derive(Deserialize, Debug, Clone, Default)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct BookingInformation {
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    #[cfg_attr(feature = "openapi", schema(example = "John Doe"))]
    pub name: Option<String>,
    #[serde(default)]
    #[cfg_attr(feature = "openapi", schema(example = "john.doe@example.com"))]
    pub email: Option<String>,
    #[serde(default)]
    pub answers: Option<Vec<AnswerEntry>>,
    #[serde(default)]
    pub questions_and_answers: Option<Vec<SubmittedQuestionAnswer>>,
}

impl BookingInformation {
    /// `full_name` wins over `name`; blank values count as absent.
    pub fn invitee_name(&self) -> Option<&str> {
        [self.full_name.as_deref(), self.name.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|s| !s.is_empty())
    }

    pub fn invitee_email(&self) -> Option<&str> {
        self.email.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }

    /// `answers` if present (even when empty), else the converted
    /// `questions_and_answers`, else nothing.
    pub fn answer_entries(&self) -> Vec<AnswerEntry> {
        match (&self.answers, &self.questions_and_answers) {
            (Some(answers), _) => answers.clone(),
            (None, Some(qas)) => qas.iter().cloned().map(AnswerEntry::from).collect(),
            (None, None) => Vec::new(),
        }
    }
}

#[derive(Deserialize, Debug, Clone, Default)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    #[serde(default, alias = "event_name")]
    #[cfg_attr(feature = "openapi", schema(example = "Test Event"))]
    pub event_name: Option<String>,
    #[serde(default)]
    pub timezone: Option<String>,
    #[serde(default, alias = "target_date")]
    #[cfg_attr(feature = "openapi", schema(example = "2026-01-30"))]
    pub target_date: Option<String>,
    #[serde(default)]
    #[cfg_attr(feature = "openapi", schema(example = "14:00"))]
    pub time: Option<String>,
    #[serde(default, alias = "booking_information")]
    pub booking_information: Option<BookingInformation>,
}

// --- Responses to our consumers ---

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct CheckedRange {
    pub from: String,
    pub to: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct AvailabilityResponse {
    pub success: bool,
    pub is_specific_time_available: bool,
    pub available_slots: Vec<AvailableSlot>,
    pub range_checked: CheckedRange,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct EventDetails {
    pub name: String,
    pub uri: String,
    pub scheduling_url: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct BookingContext {
    pub timezone: String,
    pub target_date: Option<String>,
    pub time: Option<String>,
    pub check_with_range: Option<DateRange>,
}

/// A question as presented to the consumer, with its cleaned label and answer key.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct BookingField {
    #[cfg_attr(feature = "openapi", schema(example = "question_4"))]
    pub name: String,
    #[cfg_attr(feature = "openapi", schema(example = "Multiple lines"))]
    pub label: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub required: bool,
    pub options: Vec<String>,
    #[cfg_attr(feature = "openapi", schema(example = "a5"))]
    pub answer_key: String,
    pub position: usize,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct BookingFieldsResponse {
    pub success: bool,
    pub event_details: EventDetails,
    pub booking_context: BookingContext,
    pub fields: Vec<BookingField>,
}

/// What a booking attempt ended in.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BookingOutcome {
    /// Calendly accepted the invitee.
    Booked { uri: String },
    /// Calendly refused direct booking (plan restriction); the invitee
    /// finishes on the booking page with everything filled in.
    LinkGenerated { booking_link: String, reason: String },
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct CreateBookingResponse {
    pub success: bool,
    #[serde(flatten)]
    pub outcome: BookingOutcome,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct EventTypeSummary {
    pub name: String,
    pub uri: String,
    pub scheduling_url: Option<String>,
    pub active: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct EventTypesResponse {
    pub user: CalendlyUser,
    pub event_types: Vec<EventTypeSummary>,
}
