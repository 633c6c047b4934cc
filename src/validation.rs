//! Validation engine: checks a candidate value against a field's rules
//!
//! The required check gates everything else: an empty value on a required
//! field produces exactly one violation. Past that gate every rule runs
//! independently and all violations are collected.

use crate::model::{FieldValue, FieldValues, FormField};
use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};
use std::fmt;

/// Default compiled-size limit for user-authored patterns
pub const DEFAULT_PATTERN_SIZE_LIMIT: usize = 64 * 1024;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex is valid")
});

/// Which rule a value broke
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViolationKind {
    Required,
    Empty,
    TooShort { min: usize },
    TooLong { max: usize },
    InvalidEmail,
    WeakPassword,
    PatternMismatch,
}

/// One human-readable reason a value fails a field's rules
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub field_id: String,
    pub label: String,
    pub kind: ViolationKind,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = &self.label;
        match &self.kind {
            ViolationKind::Required => write!(f, "{label} is required"),
            ViolationKind::Empty => write!(f, "{label} cannot be empty"),
            ViolationKind::TooShort { min } => {
                write!(f, "{label} must be at least {min} characters")
            }
            ViolationKind::TooLong { max } => {
                write!(f, "{label} must be no more than {max} characters")
            }
            ViolationKind::InvalidEmail => write!(f, "{label} must be a valid email address"),
            ViolationKind::WeakPassword => {
                write!(f, "{label} must contain uppercase, lowercase, and a number")
            }
            ViolationKind::PatternMismatch => {
                write!(f, "{label} does not match the required pattern")
            }
        }
    }
}

/// Runs field rules; holds the limits applied to user patterns
#[derive(Debug, Clone)]
pub struct Validator {
    pattern_size_limit: usize,
}

impl Default for Validator {
    fn default() -> Self {
        Self::new(DEFAULT_PATTERN_SIZE_LIMIT)
    }
}

impl Validator {
    pub fn new(pattern_size_limit: usize) -> Self {
        Self { pattern_size_limit }
    }

    /// Validate one value (`None` = no value entered) against `field`
    pub fn validate_field(&self, field: &FormField, value: Option<&FieldValue>) -> Vec<Violation> {
        let violation = |kind| Violation {
            field_id: field.id.clone(),
            label: field.label.clone(),
            kind,
        };

        if field.required && value.map_or(true, FieldValue::is_empty) {
            return vec![violation(ViolationKind::Required)];
        }

        let Some(rules) = &field.validation else {
            return Vec::new();
        };

        let mut violations = Vec::new();
        let text = value.and_then(FieldValue::as_str);
        let truthy = value.filter(|v| v.is_truthy());

        if rules.not_empty && text.is_some_and(|s| s.trim().is_empty()) {
            violations.push(violation(ViolationKind::Empty));
        }

        if let Some(s) = text {
            let len = s.chars().count();
            if let Some(min) = rules.min_length {
                if len < min {
                    violations.push(violation(ViolationKind::TooShort { min }));
                }
            }
            if let Some(max) = rules.max_length {
                if len > max {
                    violations.push(violation(ViolationKind::TooLong { max }));
                }
            }
        }

        if let Some(value) = truthy {
            let shown = value.display_value();

            if rules.email && !EMAIL_RE.is_match(&shown) {
                violations.push(violation(ViolationKind::InvalidEmail));
            }

            if rules.password_rule && !is_strong_password(&shown) {
                violations.push(violation(ViolationKind::WeakPassword));
            }

            if let Some(pattern) = rules.pattern.as_deref().filter(|p| !p.is_empty()) {
                match self.compile(pattern) {
                    Ok(re) => {
                        if !re.is_match(&shown) {
                            violations.push(violation(ViolationKind::PatternMismatch));
                        }
                    }
                    Err(err) => {
                        tracing::warn!(
                            field = %field.label,
                            pattern,
                            error = %err,
                            "Invalid regex in field, skipping pattern check"
                        );
                    }
                }
            }
        }

        violations
    }

    /// Validate every field in schema order and concatenate the violations
    pub fn validate_schema(&self, fields: &[FormField], values: &FieldValues) -> Vec<Violation> {
        fields
            .iter()
            .flat_map(|field| self.validate_field(field, values.get(&field.id)))
            .collect()
    }

    fn compile(&self, pattern: &str) -> Result<Regex, regex::Error> {
        RegexBuilder::new(pattern)
            .size_limit(self.pattern_size_limit)
            .build()
    }
}

/// Validate with the default pattern limits
pub fn validate(field: &FormField, value: Option<&FieldValue>) -> Vec<Violation> {
    Validator::default().validate_field(field, value)
}

/// Combined message shown when a submission is blocked
pub fn summarize(violations: &[Violation]) -> String {
    let lines: Vec<String> = violations.iter().map(ToString::to_string).collect();
    format!("Please fix the following issues:\n\n{}", lines.join("\n"))
}

/// At least one ASCII uppercase letter, lowercase letter and digit, on a
/// single line
fn is_strong_password(s: &str) -> bool {
    !s.is_empty()
        && !s.contains(['\n', '\r'])
        && s.chars().any(|c| c.is_ascii_uppercase())
        && s.chars().any(|c| c.is_ascii_lowercase())
        && s.chars().any(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FieldType, ValidationRules};
    use pretty_assertions::assert_eq;

    fn field_with(rules: ValidationRules) -> FormField {
        FormField::new("f1", "Name", FieldType::Text).with_rules(rules)
    }

    fn messages(violations: &[Violation]) -> Vec<String> {
        violations.iter().map(ToString::to_string).collect()
    }

    fn text(s: &str) -> FieldValue {
        FieldValue::from(s)
    }

    mod required {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_empty_values_trip_required() {
            let field = FormField::new("f1", "Name", FieldType::Text).required();
            let empties = [
                None,
                Some(text("")),
                Some(text("   ")),
                Some(FieldValue::List(vec![])),
                Some(FieldValue::Bool(false)),
            ];
            for value in empties {
                let violations = validate(&field, value.as_ref());
                assert_eq!(messages(&violations), vec!["Name is required"]);
            }
        }

        #[test]
        fn test_required_short_circuits_other_rules() {
            let field = field_with(ValidationRules {
                not_empty: true,
                min_length: Some(3),
                ..Default::default()
            })
            .required();
            let violations = validate(&field, Some(&text(" ")));
            assert_eq!(violations.len(), 1);
            assert_eq!(violations[0].kind, ViolationKind::Required);
        }

        #[test]
        fn test_filled_required_field_passes() {
            let field = FormField::new("f1", "Agree", FieldType::Checkbox).required();
            assert!(validate(&field, Some(&FieldValue::Bool(true))).is_empty());
        }

        #[test]
        fn test_optional_field_without_rules_passes() {
            let field = FormField::new("f1", "Name", FieldType::Text);
            assert!(validate(&field, None).is_empty());
        }
    }

    mod length {
        use super::*;
        use pretty_assertions::assert_eq;

        fn bounded() -> FormField {
            field_with(ValidationRules {
                min_length: Some(2),
                max_length: Some(4),
                ..Default::default()
            })
        }

        #[test]
        fn test_bounds_are_inclusive() {
            for s in ["ab", "abc", "abcd"] {
                assert!(validate(&bounded(), Some(&text(s))).is_empty(), "{s}");
            }
        }

        #[test]
        fn test_too_short_and_too_long() {
            assert_eq!(
                messages(&validate(&bounded(), Some(&text("a")))),
                vec!["Name must be at least 2 characters"]
            );
            assert_eq!(
                messages(&validate(&bounded(), Some(&text("abcde")))),
                vec!["Name must be no more than 4 characters"]
            );
        }

        #[test]
        fn test_counts_characters_not_bytes() {
            assert!(validate(&bounded(), Some(&text("äöü"))).is_empty());
        }

        #[test]
        fn test_non_strings_skip_length_checks() {
            assert!(validate(&bounded(), Some(&FieldValue::Number(1.0))).is_empty());
            assert!(validate(&bounded(), None).is_empty());
        }

        #[test]
        fn test_empty_optional_string_still_checked_against_min() {
            let violations = validate(&bounded(), Some(&text("")));
            assert_eq!(violations[0].kind, ViolationKind::TooShort { min: 2 });
        }
    }

    mod formats {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_email() {
            let field = field_with(ValidationRules {
                email: true,
                ..Default::default()
            });
            assert!(validate(&field, Some(&text("a@b.com"))).is_empty());
            assert_eq!(
                messages(&validate(&field, Some(&text("a@b")))),
                vec!["Name must be a valid email address"]
            );
            assert!(validate(&field, Some(&text(""))).is_empty());
        }

        #[test]
        fn test_password_rule() {
            let field = field_with(ValidationRules {
                password_rule: true,
                ..Default::default()
            });
            assert!(validate(&field, Some(&text("Secret1"))).is_empty());
            assert!(validate(&field, Some(&text("1aA!!!"))).is_empty());
            for weak in ["secret1", "SECRET1", "Secretly", "Sec\nret1"] {
                let violations = validate(&field, Some(&text(weak)));
                assert_eq!(violations[0].kind, ViolationKind::WeakPassword, "{weak}");
            }
        }

        #[test]
        fn test_pattern_is_unanchored_search() {
            let field = field_with(ValidationRules {
                pattern: Some("[0-9]{3}".into()),
                ..Default::default()
            });
            assert!(validate(&field, Some(&text("abc123"))).is_empty());
            assert_eq!(
                messages(&validate(&field, Some(&text("abc")))),
                vec!["Name does not match the required pattern"]
            );
        }

        #[test]
        fn test_invalid_pattern_is_skipped() {
            let field = field_with(ValidationRules {
                pattern: Some("([a-z".into()),
                ..Default::default()
            });
            assert!(validate(&field, Some(&text("anything"))).is_empty());
        }

        #[test]
        fn test_oversized_pattern_is_skipped() {
            let field = field_with(ValidationRules {
                pattern: Some("(?:a{100}){100}".into()),
                ..Default::default()
            });
            let validator = Validator::new(1024);
            assert!(validator
                .validate_field(&field, Some(&text("b")))
                .is_empty());
        }

        #[test]
        fn test_numbers_are_checked_by_their_text_form() {
            let field = field_with(ValidationRules {
                pattern: Some("^[0-9]+$".into()),
                ..Default::default()
            });
            assert!(validate(&field, Some(&FieldValue::Number(42.0))).is_empty());
        }
    }

    mod collection {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_all_rules_collected() {
            let field = field_with(ValidationRules {
                not_empty: true,
                min_length: Some(10),
                email: true,
                password_rule: true,
                pattern: Some("^x".into()),
                ..Default::default()
            });
            let kinds: Vec<_> = validate(&field, Some(&text("abc")))
                .into_iter()
                .map(|v| v.kind)
                .collect();
            assert_eq!(
                kinds,
                vec![
                    ViolationKind::TooShort { min: 10 },
                    ViolationKind::InvalidEmail,
                    ViolationKind::WeakPassword,
                    ViolationKind::PatternMismatch,
                ]
            );
        }

        #[test]
        fn test_not_empty_on_whitespace() {
            let field = field_with(ValidationRules {
                not_empty: true,
                ..Default::default()
            });
            assert_eq!(
                messages(&validate(&field, Some(&text("  ")))),
                vec!["Name cannot be empty"]
            );
        }

        #[test]
        fn test_schema_order_is_kept() {
            let fields = vec![
                FormField::new("a", "First", FieldType::Text).required(),
                FormField::new("b", "Second", FieldType::Text),
                FormField::new("c", "Third", FieldType::Text).required(),
            ];
            let values = FieldValues::new();
            let violations = Validator::default().validate_schema(&fields, &values);
            assert_eq!(
                messages(&violations),
                vec!["First is required", "Third is required"]
            );
            assert_eq!(violations[1].field_id, "c");
        }

        #[test]
        fn test_summary_lists_every_violation() {
            let fields = vec![FormField::new("a", "First", FieldType::Text).required()];
            let violations = Validator::default().validate_schema(&fields, &FieldValues::new());
            assert_eq!(
                summarize(&violations),
                "Please fix the following issues:\n\nFirst is required"
            );
        }
    }
}
