// --- File: crates/connectify_calendly/src/fields.rs ---
//! Intake field schema and answer reconciliation.
//!
//! Calendly identifies a custom question only by its exact label, while our
//! consumers send answers keyed by answer key (`a1`, `a2`, ...), by internal
//! field name, or by the question text in whatever shape their UI kept it.
//! This module turns the declared questions into a keyed schema and lines
//! caller answers up against it.

use std::collections::HashMap;

use connectify_config::{CustomFieldConfig, FieldOption, FieldType};
use serde_json::Value;

use crate::error::CalendlyError;
use crate::models::{AnswerEntry, BookingField, CustomQuestion, QuestionAnswer};

/// Single-select questions with at most this many choices render as radio buttons.
pub const RADIO_OPTION_LIMIT: usize = 4;

/// Normalized forms of the name and email fields Calendly collects itself.
const IDENTITY_KEYS: [&str; 4] = ["name", "fullname", "email", "emailaddress"];

/// A declared question before identity filtering and key assignment.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceField {
    pub name: String,
    pub label: String,
    pub field_type: FieldType,
    pub required: bool,
    pub options: Vec<String>,
}

impl From<&CustomFieldConfig> for SourceField {
    fn from(field: &CustomFieldConfig) -> Self {
        SourceField {
            name: field.name.clone(),
            label: field.label.clone(),
            field_type: field.field_type,
            required: field.required,
            options: field
                .options
                .iter()
                .map(FieldOption::label)
                .map(str::to_string)
                .collect(),
        }
    }
}

/// Maps Calendly's question type onto the field type shown to consumers.
pub fn provider_field_type(kind: &str, option_count: usize) -> FieldType {
    match kind {
        "string" => FieldType::Text,
        "text" => FieldType::Multiline,
        "multi_select" => FieldType::Checkbox,
        "phone_number" => FieldType::Phone,
        "single_select" if option_count <= RADIO_OPTION_LIMIT => FieldType::Radio,
        "single_select" => FieldType::Dropdown,
        "email" => FieldType::Email,
        "name" => FieldType::Name,
        _ => FieldType::Text,
    }
}

/// Source fields from the custom questions of a Calendly event type.
///
/// Disabled questions are dropped and the rest ordered by their position.
/// Calendly has no internal key for a question, so one is derived from the
/// position in the same `question_N` form the booking page uses.
pub fn source_fields_from_questions(questions: &[CustomQuestion]) -> Vec<SourceField> {
    let mut enabled: Vec<&CustomQuestion> = questions.iter().filter(|q| q.enabled).collect();
    enabled.sort_by_key(|q| q.position);

    enabled
        .into_iter()
        .map(|q| SourceField {
            name: format!("question_{}", q.position),
            label: q.name.clone(),
            field_type: provider_field_type(&q.kind, q.answer_choices.len()),
            required: q.required,
            options: q.answer_choices.clone(),
        })
        .collect()
}

/// Keeps ASCII letters and digits, lowercased.
///
/// `"Name *"`, `"Name\n*"` and `"name"` all normalize to `"name"`.
pub fn normalize(s: &str) -> String {
    s.chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Strips the required-marker decoration (`*`, real or escaped newlines) from a label.
pub fn clean_label(label: &str) -> String {
    label
        .replace("\\n", "")
        .replace(['\n', '\r', '*'], "")
        .trim()
        .to_string()
}

/// Name and email are sent as the invitee identity, never as custom answers.
pub fn is_identity_field(name: &str, label: &str) -> bool {
    let name = normalize(name);
    let label = normalize(label);
    IDENTITY_KEYS.contains(&name.as_str()) || IDENTITY_KEYS.contains(&label.as_str())
}

/// A custom question with its answer key.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSchemaEntry {
    pub name: String,
    /// Label exactly as declared; this is what Calendly matches answers on.
    pub label: String,
    pub field_type: FieldType,
    pub required: bool,
    pub options: Vec<String>,
    /// `a1`, `a2`, ... by position among the custom questions.
    pub answer_key: String,
    pub position: usize,
}

impl FieldSchemaEntry {
    /// Label fit for display and error messages.
    pub fn display_name(&self) -> String {
        let cleaned = clean_label(&self.label);
        if !cleaned.is_empty() {
            cleaned
        } else if !self.name.trim().is_empty() {
            self.name.clone()
        } else {
            format!("Field {}", self.position + 1)
        }
    }

    pub fn to_booking_field(&self) -> BookingField {
        let label = clean_label(&self.label);
        BookingField {
            name: self.name.clone(),
            label: if label.is_empty() {
                "Field".to_string()
            } else {
                label
            },
            field_type: self.field_type,
            required: self.required,
            options: self.options.clone(),
            answer_key: self.answer_key.clone(),
            position: self.position,
        }
    }
}

/// Drops identity fields and assigns answer keys in declaration order.
pub fn build_schema(fields: &[SourceField]) -> Vec<FieldSchemaEntry> {
    fields
        .iter()
        .filter(|f| !is_identity_field(&f.name, &f.label))
        .enumerate()
        .map(|(position, f)| FieldSchemaEntry {
            name: f.name.clone(),
            label: f.label.clone(),
            field_type: f.field_type,
            required: f.required,
            options: f.options.clone(),
            answer_key: format!("a{}", position + 1),
            position,
        })
        .collect()
}

fn is_answer_key(s: &str) -> bool {
    let mut chars = s.chars();
    matches!(chars.next(), Some('a' | 'A'))
        && s.len() > 1
        && chars.all(|c| c.is_ascii_digit())
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

/// Lookup tables over caller answers, one per matching rule.
///
/// Within a table a later entry in the caller's list replaces an earlier one.
pub struct AnswerIndex<'a> {
    by_key: HashMap<String, &'a AnswerEntry>,
    by_name: HashMap<&'a str, &'a AnswerEntry>,
    by_question: HashMap<&'a str, &'a AnswerEntry>,
    by_question_normalized: HashMap<String, &'a AnswerEntry>,
}

impl<'a> AnswerIndex<'a> {
    pub fn new(answers: &'a [AnswerEntry]) -> Self {
        let mut index = AnswerIndex {
            by_key: HashMap::new(),
            by_name: HashMap::new(),
            by_question: HashMap::new(),
            by_question_normalized: HashMap::new(),
        };

        for answer in answers {
            if let Some(key) = non_empty(&answer.answer_key) {
                index.by_key.insert(key.trim().to_ascii_lowercase(), answer);
            }
            if let Some(name) = non_empty(&answer.name) {
                index.by_name.insert(name, answer);
                // Consumers sometimes put the answer key in `name`.
                if is_answer_key(name) {
                    index.by_key.insert(name.to_ascii_lowercase(), answer);
                }
            }
            if let Some(question) = non_empty(&answer.question) {
                index.by_question.insert(question, answer);
                index
                    .by_question_normalized
                    .insert(normalize(question), answer);
            }
        }

        index
    }

    /// Answer for `field`: by answer key, then internal name, then exact
    /// label, then normalized label.
    pub fn find(&self, field: &FieldSchemaEntry) -> Option<&'a AnswerEntry> {
        self.by_key
            .get(&field.answer_key)
            .or_else(|| self.by_name.get(field.name.as_str()))
            .or_else(|| self.by_question.get(field.label.as_str()))
            .or_else(|| self.by_question_normalized.get(&normalize(&field.label)))
            .copied()
    }
}

/// Renders an answer value as Calendly expects it: text.
///
/// Lists (checkbox answers) are joined with "," and keep blank items.
pub fn stringify_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Array(items) => items
            .iter()
            .map(stringify_value)
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => value.to_string(),
    }
}

/// One URL parameter value per selected option for lists, one for everything else.
fn prefill_values(value: &Value) -> Vec<String> {
    let values = match value {
        Value::Array(items) => items.iter().map(stringify_value).collect(),
        other => vec![stringify_value(other)],
    };
    values
        .into_iter()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .collect()
}

/// Caller answers lined up against the schema.
#[derive(Debug, Clone, PartialEq)]
pub struct Reconciliation {
    /// In schema order, one entry per custom question.
    pub questions_and_answers: Vec<QuestionAnswer>,
    /// `(answer_key, value)` pairs for a pre-filled booking link.
    pub prefill: Vec<(String, String)>,
}

/// Matches `answers` to `schema` and checks that every required question is answered.
///
/// Fails with [`CalendlyError::MissingFields`] naming every required
/// question that has no answer or only whitespace.
pub fn reconcile(
    schema: &[FieldSchemaEntry],
    answers: &[AnswerEntry],
) -> Result<Reconciliation, CalendlyError> {
    let index = AnswerIndex::new(answers);
    let mut missing = Vec::new();
    let mut questions_and_answers = Vec::with_capacity(schema.len());
    let mut prefill = Vec::new();

    for field in schema {
        let matched = index.find(field);
        let answer = matched
            .map(|entry| stringify_value(&entry.value).trim().to_string())
            .unwrap_or_default();

        if field.required && answer.is_empty() {
            missing.push(field.display_name());
        }

        if let Some(entry) = matched {
            prefill.extend(
                prefill_values(&entry.value)
                    .into_iter()
                    .map(|value| (field.answer_key.clone(), value)),
            );
        }

        questions_and_answers.push(QuestionAnswer {
            question: field.label.clone(),
            answer,
            position: field.position,
        });
    }

    if !missing.is_empty() {
        return Err(CalendlyError::MissingFields(missing));
    }

    Ok(Reconciliation {
        questions_and_answers,
        prefill,
    })
}
