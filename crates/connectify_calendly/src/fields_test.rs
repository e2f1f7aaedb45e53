#[cfg(test)]
mod tests {
    use crate::error::CalendlyError;
    use crate::fields::*;
    use crate::models::{AnswerEntry, CustomQuestion};
    use connectify_config::FieldType;
    use serde_json::{json, Value};

    fn field(name: &str, label: &str, field_type: FieldType, required: bool) -> SourceField {
        SourceField {
            name: name.to_string(),
            label: label.to_string(),
            field_type,
            required,
            options: Vec::new(),
        }
    }

    // Mirrors the "Test Event" booking page: identity first, then six questions.
    fn test_event_fields() -> Vec<SourceField> {
        vec![
            field("full_name", "Name *", FieldType::Text, true),
            field("email", "Email *", FieldType::Email, true),
            field(
                "question_0",
                "Please share anything that will help prepare for our meeting.",
                FieldType::Multiline,
                false,
            ),
            field("question_1", "This is a dropdown", FieldType::Dropdown, false),
            field("question_2", "Checkbozes", FieldType::Checkbox, false),
            field("question_3", "Radio", FieldType::Radio, false),
            field("question_4", "Multiple lines\n*", FieldType::Multiline, true),
            field("question_5", "Phone Number input fields\n*", FieldType::Phone, true),
        ]
    }

    fn answer(name: Option<&str>, question: Option<&str>, key: Option<&str>, value: Value) -> AnswerEntry {
        AnswerEntry {
            name: name.map(str::to_string),
            question: question.map(str::to_string),
            answer_key: key.map(str::to_string),
            value,
        }
    }

    #[test]
    fn test_normalize_strips_decoration() {
        assert_eq!(normalize("Name *"), "name");
        assert_eq!(normalize("Name\n*"), "name");
        assert_eq!(normalize("name"), "name");
        assert_eq!(normalize("Email Address"), "emailaddress");
        assert_eq!(normalize("Phone Number input fields\n*"), "phonenumberinputfields");
        assert_eq!(normalize("Ünïcode"), "ncode");
    }

    #[test]
    fn test_clean_label() {
        assert_eq!(clean_label("Multiple lines\n*"), "Multiple lines");
        assert_eq!(clean_label("Multiple lines\\n*"), "Multiple lines");
        assert_eq!(clean_label("  Radio * "), "Radio");
        assert_eq!(clean_label("*"), "");
    }

    #[test]
    fn test_identity_detection() {
        assert!(is_identity_field("full_name", "Your name"));
        assert!(is_identity_field("question_9", "Name *"));
        assert!(is_identity_field("email_address", "Contact"));
        assert!(is_identity_field("q", "Email Address"));
        assert!(!is_identity_field("company_name", "Company name"));
        assert!(!is_identity_field("question_5", "Phone Number input fields\n*"));
    }

    #[test]
    fn test_schema_skips_identity_and_numbers_the_rest() {
        let schema = build_schema(&test_event_fields());

        assert_eq!(schema.len(), 6);
        let keys: Vec<&str> = schema.iter().map(|f| f.answer_key.as_str()).collect();
        assert_eq!(keys, ["a1", "a2", "a3", "a4", "a5", "a6"]);
        assert_eq!(schema[0].name, "question_0");
        assert_eq!(schema[5].name, "question_5");
        assert_eq!(schema[5].position, 5);
        // The raw label is kept, Calendly matches on it.
        assert_eq!(schema[4].label, "Multiple lines\n*");
    }

    #[test]
    fn test_booking_field_has_clean_label() {
        let schema = build_schema(&[
            field("question_4", "Multiple lines\n*", FieldType::Multiline, true),
            field("question_x", "*", FieldType::Text, false),
        ]);
        let fields: Vec<_> = schema.iter().map(FieldSchemaEntry::to_booking_field).collect();
        assert_eq!(fields[0].label, "Multiple lines");
        assert_eq!(fields[0].answer_key, "a1");
        assert_eq!(fields[1].label, "Field");
    }

    #[test]
    fn test_provider_field_types() {
        assert_eq!(provider_field_type("string", 0), FieldType::Text);
        assert_eq!(provider_field_type("text", 0), FieldType::Multiline);
        assert_eq!(provider_field_type("multi_select", 3), FieldType::Checkbox);
        assert_eq!(provider_field_type("phone_number", 0), FieldType::Phone);
        assert_eq!(provider_field_type("single_select", 4), FieldType::Radio);
        assert_eq!(provider_field_type("single_select", 5), FieldType::Dropdown);
        assert_eq!(provider_field_type("something_new", 0), FieldType::Text);
    }

    #[test]
    fn test_provider_questions_are_filtered_and_ordered() {
        let questions: Vec<CustomQuestion> = serde_json::from_value(json!([
            { "name": "Radio", "type": "single_select", "position": 3,
              "required": false, "answer_choices": ["radio1", "radio2"] },
            { "name": "Hidden", "type": "string", "position": 1, "enabled": false },
            { "name": "Please share anything", "type": "text", "position": 0 }
        ]))
        .unwrap();

        let source = source_fields_from_questions(&questions);
        assert_eq!(source.len(), 2);
        assert_eq!(source[0].name, "question_0");
        assert_eq!(source[0].field_type, FieldType::Multiline);
        assert_eq!(source[1].name, "question_3");
        assert_eq!(source[1].field_type, FieldType::Radio);
        assert_eq!(source[1].options, ["radio1", "radio2"]);
    }

    #[test]
    fn test_stringify_value() {
        assert_eq!(stringify_value(&Value::Null), "");
        assert_eq!(stringify_value(&json!("x")), "x");
        assert_eq!(stringify_value(&json!(42)), "42");
        assert_eq!(stringify_value(&json!(true)), "true");
        assert_eq!(stringify_value(&json!(["x", "y"])), "x,y");
        assert_eq!(stringify_value(&json!(["Check1", " ", null, "Check2"])), "Check1, ,,Check2");
        assert_eq!(stringify_value(&json!([["a", "b"], 3])), "a,b,3");
        assert_eq!(stringify_value(&json!({"a": 1})), r#"{"a":1}"#);
    }

    #[test]
    fn test_reconcile_by_name_and_label() {
        let schema = build_schema(&test_event_fields());
        let answers = vec![
            answer(Some("question_0"), None, None, json!("Integration test.")),
            answer(None, Some("This is a dropdown"), None, json!("Option 1")),
            answer(None, None, Some("A3"), json!(["Check1", "Check2"])),
            answer(Some("a4"), None, None, json!("radio1")),
            answer(None, Some("multiple lines"), None, json!("  Detailed research notes. ")),
            answer(None, Some("Phone Number input fields *"), None, json!("+8801711111111")),
        ];

        let result = reconcile(&schema, &answers).unwrap();
        let given: Vec<(&str, &str)> = result
            .questions_and_answers
            .iter()
            .map(|qa| (qa.question.as_str(), qa.answer.as_str()))
            .collect();
        assert_eq!(
            given,
            [
                ("Please share anything that will help prepare for our meeting.", "Integration test."),
                ("This is a dropdown", "Option 1"),
                ("Checkbozes", "Check1,Check2"),
                ("Radio", "radio1"),
                ("Multiple lines\n*", "Detailed research notes."),
                ("Phone Number input fields\n*", "+8801711111111"),
            ]
        );
        assert_eq!(result.questions_and_answers[3].position, 3);

        let checkbox: Vec<&str> = result
            .prefill
            .iter()
            .filter(|(key, _)| key == "a3")
            .map(|(_, value)| value.as_str())
            .collect();
        assert_eq!(checkbox, ["Check1", "Check2"]);
    }

    #[test]
    fn test_reconcile_names_every_missing_required_field() {
        let schema = build_schema(&test_event_fields());
        let answers = vec![
            answer(Some("question_0"), None, None, json!("Only this one")),
            answer(Some("question_4"), None, None, json!("   ")),
        ];

        match reconcile(&schema, &answers) {
            Err(CalendlyError::MissingFields(missing)) => {
                assert_eq!(missing, ["Multiple lines", "Phone Number input fields"]);
            }
            other => panic!("expected MissingFields, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_field_without_label_uses_name_then_position() {
        let schema = build_schema(&[
            field("question_7", "*", FieldType::Text, true),
            field("", "", FieldType::Text, true),
        ]);
        match reconcile(&schema, &[]) {
            Err(CalendlyError::MissingFields(missing)) => {
                assert_eq!(missing, ["question_7", "Field 2"]);
            }
            other => panic!("expected MissingFields, got {:?}", other),
        }
    }

    #[test]
    fn test_answer_key_beats_name_and_label() {
        let schema = build_schema(&[field("question_0", "Topic", FieldType::Text, false)]);
        let answers = vec![
            answer(None, Some("Topic"), None, json!("by label")),
            answer(Some("question_0"), None, None, json!("by name")),
            answer(None, None, Some("a1"), json!("by key")),
        ];
        let result = reconcile(&schema, &answers).unwrap();
        assert_eq!(result.questions_and_answers[0].answer, "by key");
    }

    #[test]
    fn test_last_entry_wins_within_a_rule() {
        let schema = build_schema(&[
            field("question_0", "Topic", FieldType::Text, false),
            field("question_1", "Budget", FieldType::Text, false),
            field("question_2", "Team", FieldType::Text, false),
        ]);
        let answers = vec![
            answer(Some("question_0"), None, None, json!("first")),
            answer(Some("question_0"), None, None, json!("second")),
            answer(None, None, Some("a2"), json!("small")),
            answer(Some("A2"), None, None, json!("large")),
            answer(None, Some("team"), None, json!("two")),
            answer(None, Some("TEAM"), None, json!("five")),
        ];
        let result = reconcile(&schema, &answers).unwrap();
        let given: Vec<&str> = result
            .questions_and_answers
            .iter()
            .map(|qa| qa.answer.as_str())
            .collect();
        assert_eq!(given, ["second", "large", "five"]);
    }

    #[test]
    fn test_label_without_letters_matches_question_without_letters() {
        let schema = build_schema(&[field("question_7", "*", FieldType::Text, true)]);
        let answers = vec![answer(None, Some(" ** "), None, json!("yes"))];
        let result = reconcile(&schema, &answers).unwrap();
        assert_eq!(result.questions_and_answers[0].question, "*");
        assert_eq!(result.questions_and_answers[0].answer, "yes");
    }

    #[test]
    fn test_unanswered_optional_fields_are_sent_empty() {
        let schema = build_schema(&[field("question_0", "Topic", FieldType::Text, false)]);
        let result = reconcile(&schema, &[]).unwrap();
        assert_eq!(result.questions_and_answers[0].answer, "");
        assert!(result.prefill.is_empty());
    }
}
