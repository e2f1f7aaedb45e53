#[cfg(test)]
mod tests {
    use crate::error::CalendlyError;
    use crate::fields::*;
    use crate::models::AnswerEntry;
    use connectify_config::FieldType;
    use proptest::prelude::*;
    use serde_json::json;

    // Helper to build a non-identity question
    fn custom_field(i: usize, required: bool) -> SourceField {
        SourceField {
            name: format!("question_{}", i),
            label: format!("Topic number {} *", i),
            field_type: FieldType::Text,
            required,
            options: Vec::new(),
        }
    }

    fn identity_fields() -> Vec<SourceField> {
        vec![
            SourceField {
                name: "full_name".to_string(),
                label: "Name *".to_string(),
                field_type: FieldType::Name,
                required: true,
                options: Vec::new(),
            },
            SourceField {
                name: "email".to_string(),
                label: "Email\n*".to_string(),
                field_type: FieldType::Email,
                required: true,
                options: Vec::new(),
            },
        ]
    }

    fn by_name(name: &str, value: &str) -> AnswerEntry {
        AnswerEntry {
            name: Some(name.to_string()),
            value: json!(value),
            ..Default::default()
        }
    }

    proptest! {
        // Normalizing twice changes nothing
        #[test]
        fn test_normalize_is_idempotent(s in ".*") {
            let once = normalize(&s);
            prop_assert_eq!(normalize(&once), once);
        }

        // Case and whitespace do not matter
        #[test]
        fn test_normalize_ignores_case_and_whitespace(
            s in "[A-Za-z0-9 *\n]{0,30}",
            pad in "[ \t\n]{0,4}",
        ) {
            let spaced: String = s.chars().flat_map(|c| [c, ' ']).collect();
            prop_assert_eq!(normalize(&s.to_ascii_uppercase()), normalize(&s));
            prop_assert_eq!(normalize(&format!("{}{}{}", pad, spaced, pad)), normalize(&s));
        }

        // Identity fields never consume an answer key, wherever they sit
        #[test]
        fn test_identity_fields_excluded_at_any_position(
            count in 0..8usize,
            name_at in 0..9usize,
            email_at in 0..10usize,
        ) {
            let mut source: Vec<SourceField> = (0..count).map(|i| custom_field(i, false)).collect();
            let identity = identity_fields();
            source.insert(name_at.min(source.len()), identity[0].clone());
            source.insert(email_at.min(source.len()), identity[1].clone());

            let schema = build_schema(&source);
            prop_assert_eq!(schema.len(), count);
            for (i, entry) in schema.iter().enumerate() {
                prop_assert_eq!(&entry.name, &format!("question_{}", i));
                prop_assert_eq!(&entry.answer_key, &format!("a{}", i + 1));
                prop_assert_eq!(entry.position, i);
            }
        }

        // The strongest rule wins however the caller ordered the answers
        #[test]
        fn test_matching_priority_is_order_independent(
            answers in Just(vec![
                AnswerEntry { question: Some("topic number 0".into()), value: json!("normalized"), ..Default::default() },
                AnswerEntry { question: Some("Topic number 0 *".into()), value: json!("exact"), ..Default::default() },
                by_name("question_0", "name"),
                AnswerEntry { answer_key: Some("a1".into()), value: json!("key"), ..Default::default() },
            ]).prop_shuffle(),
            rules in 1..=4usize,
        ) {
            // Keep only the `rules` weakest entries to exercise every tier.
            let kept: Vec<AnswerEntry> = answers
                .into_iter()
                .filter(|a| {
                    let strength = match a.value.as_str() {
                        Some("normalized") => 1,
                        Some("exact") => 2,
                        Some("name") => 3,
                        _ => 4,
                    };
                    strength <= rules
                })
                .collect();

            let schema = build_schema(&[custom_field(0, true)]);
            let result = reconcile(&schema, &kept).unwrap();
            let expected = ["normalized", "exact", "name", "key"][rules - 1];
            prop_assert_eq!(result.questions_and_answers[0].answer.as_str(), expected);
        }

        // Every unmet required field is reported, in schema order
        #[test]
        fn test_missing_fields_enumerated(
            flags in prop::collection::vec((any::<bool>(), any::<bool>()), 1..10),
        ) {
            let source: Vec<SourceField> = flags
                .iter()
                .enumerate()
                .map(|(i, (required, _))| custom_field(i, *required))
                .collect();
            let answers: Vec<AnswerEntry> = flags
                .iter()
                .enumerate()
                .filter(|(_, (_, answered))| *answered)
                .map(|(i, _)| by_name(&format!("question_{}", i), "yes"))
                .collect();
            let expected: Vec<String> = flags
                .iter()
                .enumerate()
                .filter(|(_, (required, answered))| *required && !*answered)
                .map(|(i, _)| format!("Topic number {}", i))
                .collect();

            let schema = build_schema(&source);
            match reconcile(&schema, &answers) {
                Ok(_) => prop_assert!(expected.is_empty()),
                Err(CalendlyError::MissingFields(missing)) => prop_assert_eq!(missing, expected),
                Err(other) => prop_assert!(false, "unexpected error: {}", other),
            }
        }

        // Submission follows schema order, not answer order
        #[test]
        fn test_submission_order_follows_schema(
            order in Just((0..6usize).collect::<Vec<_>>()).prop_shuffle(),
        ) {
            let source: Vec<SourceField> = (0..6).map(|i| custom_field(i, true)).collect();
            let answers: Vec<AnswerEntry> = order
                .iter()
                .map(|i| by_name(&format!("question_{}", i), &format!("answer {}", i)))
                .collect();

            let schema = build_schema(&source);
            let result = reconcile(&schema, &answers).unwrap();
            for (i, qa) in result.questions_and_answers.iter().enumerate() {
                prop_assert_eq!(&schema[i].answer_key, &format!("a{}", i + 1));
                prop_assert_eq!(&qa.question, &format!("Topic number {} *", i));
                prop_assert_eq!(&qa.answer, &format!("answer {}", i));
                prop_assert_eq!(qa.position, i);
            }
        }
    }
}
