//! Non-blocking schema diagnostics shown by the builder

use super::field::FieldType;
use super::schema::FormSchema;
use std::collections::HashSet;
use std::fmt;

/// A problem in a schema definition that does not prevent saving
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LintIssue {
    LengthBoundsInverted { label: String, min: usize, max: usize },
    SelfReference { label: String },
    DanglingReference { label: String, missing: String },
    DuplicateId { id: String },
    MissingFormula { label: String },
    NoOptions { label: String },
}

impl fmt::Display for LintIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LengthBoundsInverted { label, min, max } => write!(
                f,
                "{label}: minimum length {min} is greater than maximum length {max}"
            ),
            Self::SelfReference { label } => write!(f, "{label} is derived from itself"),
            Self::DanglingReference { label, missing } => {
                write!(f, "{label} is derived from a removed field ({missing})")
            }
            Self::DuplicateId { id } => write!(f, "field id {id} is used more than once"),
            Self::MissingFormula { label } => write!(f, "{label} is derived but has no formula"),
            Self::NoOptions { label } => write!(f, "{label} has no options to choose from"),
        }
    }
}

/// Collect diagnostics for `schema`, in field order
pub fn lint(schema: &FormSchema) -> Vec<LintIssue> {
    let mut issues = Vec::new();
    let mut seen = HashSet::new();
    let known: HashSet<&str> = schema.fields.iter().map(|f| f.id.as_str()).collect();

    for field in &schema.fields {
        let label = field.display_label().to_string();

        if !seen.insert(field.id.as_str()) {
            issues.push(LintIssue::DuplicateId {
                id: field.id.clone(),
            });
        }

        if let Some(rules) = &field.validation {
            if let (Some(min), Some(max)) = (rules.min_length, rules.max_length) {
                if min > max {
                    issues.push(LintIssue::LengthBoundsInverted {
                        label: label.clone(),
                        min,
                        max,
                    });
                }
            }
        }

        let lists_options = matches!(field.field_type, FieldType::Select | FieldType::Radio);
        if lists_options && !field.is_derived && field.options.is_empty() {
            issues.push(LintIssue::NoOptions {
                label: label.clone(),
            });
        }

        if !field.is_derived {
            continue;
        }

        let has_formula = field
            .formula
            .as_deref()
            .is_some_and(|f| !f.trim().is_empty());
        if !has_formula {
            issues.push(LintIssue::MissingFormula {
                label: label.clone(),
            });
        }

        for source in &field.derived_from {
            if *source == field.id {
                issues.push(LintIssue::SelfReference {
                    label: label.clone(),
                });
            } else if !known.contains(source.as_str()) {
                issues.push(LintIssue::DanglingReference {
                    label: label.clone(),
                    missing: source.clone(),
                });
            }
        }
    }

    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::field::{FormField, ValidationRules};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_clean_schema_has_no_issues() {
        let schema = FormSchema::new("Ok")
            .append_field(FormField::new("a", "A", FieldType::Number))
            .append_field(FormField::new("b", "B", FieldType::Number).derived(["a"], "${a}"));
        assert!(lint(&schema).is_empty());
    }

    #[test]
    fn test_inverted_length_bounds() {
        let field = FormField::new("a", "Name", FieldType::Text).with_rules(ValidationRules {
            min_length: Some(5),
            max_length: Some(2),
            ..Default::default()
        });
        let issues = lint(&FormSchema::new("x").append_field(field));
        assert_eq!(
            issues,
            vec![LintIssue::LengthBoundsInverted {
                label: "Name".into(),
                min: 5,
                max: 2
            }]
        );
    }

    #[test]
    fn test_reference_problems() {
        let field = FormField::new("c", "Total", FieldType::Number).derived(["c", "gone"], "");
        let issues = lint(&FormSchema::new("x").append_field(field));
        assert_eq!(
            issues,
            vec![
                LintIssue::MissingFormula {
                    label: "Total".into()
                },
                LintIssue::SelfReference {
                    label: "Total".into()
                },
                LintIssue::DanglingReference {
                    label: "Total".into(),
                    missing: "gone".into()
                },
            ]
        );
    }

    #[test]
    fn test_duplicate_ids_and_missing_options() {
        let schema = FormSchema::new("x")
            .append_field(FormField::new("a", "One", FieldType::Select))
            .append_field(FormField::new("a", "Two", FieldType::Text));
        let issues = lint(&schema);
        assert!(issues.contains(&LintIssue::DuplicateId { id: "a".into() }));
        assert!(issues.contains(&LintIssue::NoOptions { label: "One".into() }));
        assert_eq!(
            LintIssue::NoOptions { label: "One".into() }.to_string(),
            "One has no options to choose from"
        );
    }
}
