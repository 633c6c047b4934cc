//! Field definitions: the schema of a single form field

use crate::error::SchemaError;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Ordinal used for generated field ids and default labels
static FIELD_COUNTER: AtomicU64 = AtomicU64::new(1);

/// The kind of input a field collects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    #[default]
    Text,
    Number,
    Email,
    Date,
    Textarea,
    Select,
    Radio,
    Checkbox,
}

impl FieldType {
    /// Every field type, in picker order
    pub const ALL: [FieldType; 8] = [
        FieldType::Text,
        FieldType::Number,
        FieldType::Email,
        FieldType::Date,
        FieldType::Textarea,
        FieldType::Select,
        FieldType::Radio,
        FieldType::Checkbox,
    ];

    /// Lower-case name as stored in a schema
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Number => "number",
            Self::Email => "email",
            Self::Date => "date",
            Self::Textarea => "textarea",
            Self::Select => "select",
            Self::Radio => "radio",
            Self::Checkbox => "checkbox",
        }
    }

    /// Capitalized name for labels
    pub fn label(&self) -> &'static str {
        match self {
            Self::Text => "Text",
            Self::Number => "Number",
            Self::Email => "Email",
            Self::Date => "Date",
            Self::Textarea => "Textarea",
            Self::Select => "Select",
            Self::Radio => "Radio",
            Self::Checkbox => "Checkbox",
        }
    }

    /// Types whose value is picked from `options`
    pub fn is_choice(&self) -> bool {
        matches!(self, Self::Select | Self::Radio | Self::Checkbox)
    }

    /// Next type in picker order (wraps around)
    pub fn next(&self) -> Self {
        let idx = Self::ALL.iter().position(|t| t == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Optional constraints checked when a form is submitted
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationRules {
    #[serde(default, skip_serializing_if = "is_false")]
    pub not_empty: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub email: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub password_rule: bool,
}

impl ValidationRules {
    /// True when no rule is switched on
    pub fn is_unset(&self) -> bool {
        *self == Self::default()
    }
}

fn is_false(b: &bool) -> bool {
    !*b
}

/// Definition of one field in a form schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormField {
    pub id: String,
    pub label: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation: Option<ValidationRules>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_derived: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub derived_from: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formula: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
}

impl FormField {
    /// Create a plain field with the given id, label and type
    pub fn new(id: impl Into<String>, label: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            field_type,
            required: false,
            default_value: None,
            validation: None,
            is_derived: false,
            derived_from: Vec::new(),
            formula: None,
            options: Vec::new(),
        }
    }

    /// Create a fresh field of `field_type` in a usable default state.
    ///
    /// The id is `field_<unix-millis>_<n>` with a process-wide counter, the
    /// label is `"<Type> Field <n>"`, and choice fields get one placeholder
    /// option so they render straight away.
    pub fn create(field_type: FieldType) -> Self {
        let ordinal = FIELD_COUNTER.fetch_add(1, Ordering::Relaxed);
        let id = format!(
            "field_{}_{}",
            chrono::Utc::now().timestamp_millis(),
            ordinal
        );
        let label = format!("{} Field {}", field_type.label(), ordinal);

        Self {
            default_value: Some(String::new()),
            validation: Some(ValidationRules::default()),
            formula: Some(String::new()),
            options: if field_type.is_choice() {
                vec!["Option 1".to_string()]
            } else {
                Vec::new()
            },
            ..Self::new(id, label, field_type)
        }
    }

    /// Create an unlabeled text field with a random UUID id
    pub fn blank() -> Self {
        Self {
            default_value: Some(String::new()),
            validation: Some(ValidationRules::default()),
            formula: Some(String::new()),
            ..Self::new(uuid::Uuid::new_v4().to_string(), "", FieldType::Text)
        }
    }

    /// Mark the field as required
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Attach validation rules
    pub fn with_rules(mut self, rules: ValidationRules) -> Self {
        self.validation = Some(rules);
        self
    }

    /// Turn the field into a derived field computed by `formula` over `sources`
    pub fn derived<I, S>(mut self, sources: I, formula: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.is_derived = true;
        self.derived_from = sources.into_iter().map(Into::into).collect();
        self.formula = Some(formula.into());
        self
    }

    /// Label for pickers; blank labels show as "(Unnamed Field)"
    pub fn display_label(&self) -> &str {
        let trimmed = self.label.trim();
        if trimmed.is_empty() {
            "(Unnamed Field)"
        } else {
            trimmed
        }
    }

    /// Formula text when the field is derived and has one
    pub fn active_formula(&self) -> Option<&str> {
        if !self.is_derived || self.derived_from.is_empty() {
            return None;
        }
        self.formula.as_deref().filter(|f| !f.trim().is_empty())
    }

    /// Mutable access to the validation rules, creating them if missing
    pub fn rules_mut(&mut self) -> &mut ValidationRules {
        self.validation.get_or_insert_with(ValidationRules::default)
    }

    /// Append an empty option
    pub fn add_option(&mut self) {
        self.options.push(String::new());
    }

    /// Replace the option at `index`
    pub fn set_option(&mut self, index: usize, value: impl Into<String>) -> Result<(), SchemaError> {
        let len = self.options.len();
        let slot = self
            .options
            .get_mut(index)
            .ok_or(SchemaError::OptionOutOfBounds { index, len })?;
        *slot = value.into();
        Ok(())
    }

    /// Remove the option at `index`
    pub fn remove_option(&mut self, index: usize) -> Result<String, SchemaError> {
        if index >= self.options.len() {
            return Err(SchemaError::OptionOutOfBounds {
                index,
                len: self.options.len(),
            });
        }
        Ok(self.options.remove(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    mod field_type {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_choice_types() {
            let choices: Vec<_> = FieldType::ALL.iter().filter(|t| t.is_choice()).collect();
            assert_eq!(
                choices,
                vec![&FieldType::Select, &FieldType::Radio, &FieldType::Checkbox]
            );
        }

        #[test]
        fn test_next_wraps() {
            assert_eq!(FieldType::Text.next(), FieldType::Number);
            assert_eq!(FieldType::Checkbox.next(), FieldType::Text);
        }

        #[test]
        fn test_serializes_lowercase() {
            let json = serde_json::to_string(&FieldType::Textarea).unwrap();
            assert_eq!(json, "\"textarea\"");
        }
    }

    mod create {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_ids_are_unique() {
            let a = FormField::create(FieldType::Text);
            let b = FormField::create(FieldType::Text);
            assert_ne!(a.id, b.id);
            assert!(a.id.starts_with("field_"));
        }

        #[test]
        fn test_label_uses_capitalized_type() {
            let field = FormField::create(FieldType::Email);
            assert!(field.label.starts_with("Email Field "));
            assert!(!field.required);
            assert!(!field.is_derived);
            assert_eq!(field.validation, Some(ValidationRules::default()));
        }

        #[test]
        fn test_choice_fields_get_placeholder_option() {
            for ty in [FieldType::Select, FieldType::Radio, FieldType::Checkbox] {
                let field = FormField::create(ty);
                assert_eq!(field.options, vec!["Option 1".to_string()]);
            }
            assert!(FormField::create(FieldType::Number).options.is_empty());
        }

        #[test]
        fn test_blank_field_has_uuid_id() {
            let field = FormField::blank();
            assert!(uuid::Uuid::parse_str(&field.id).is_ok());
            assert_eq!(field.label, "");
            assert_eq!(field.field_type, FieldType::Text);
        }
    }

    mod accessors {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_display_label_for_unnamed() {
            let field = FormField::new("a", "  ", FieldType::Text);
            assert_eq!(field.display_label(), "(Unnamed Field)");
        }

        #[test]
        fn test_active_formula_requires_derivation() {
            let plain = FormField::new("c", "C", FieldType::Number);
            assert_eq!(plain.active_formula(), None);

            let derived = plain.clone().derived(["a"], "${a} * 2");
            assert_eq!(derived.active_formula(), Some("${a} * 2"));

            let no_sources = plain.derived(Vec::<String>::new(), "1");
            assert_eq!(no_sources.active_formula(), None);
        }

        #[test]
        fn test_option_editing() {
            let mut field = FormField::create(FieldType::Radio);
            field.add_option();
            field.set_option(1, "Option 2").unwrap();
            assert_eq!(field.options, vec!["Option 1", "Option 2"]);
            assert_eq!(field.remove_option(0).unwrap(), "Option 1");
            assert_eq!(
                field.remove_option(5),
                Err(SchemaError::OptionOutOfBounds { index: 5, len: 1 })
            );
        }
    }

    mod serialization {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_camel_case_keys() {
            let field = FormField::new("id1", "Total", FieldType::Number)
                .derived(["a", "b"], "${a}+${b}");
            let json = serde_json::to_value(&field).unwrap();
            assert_eq!(json["type"], "number");
            assert_eq!(json["isDerived"], true);
            assert_eq!(json["derivedFrom"], serde_json::json!(["a", "b"]));
            assert!(json.get("options").is_none());
            assert!(json.get("defaultValue").is_none());
        }

        #[test]
        fn test_deserialize_minimal_field() {
            let json = r#"{"id":"x","label":"X","type":"date"}"#;
            let field: FormField = serde_json::from_str(json).unwrap();
            assert_eq!(field, FormField::new("x", "X", FieldType::Date));
        }

        #[test]
        fn test_rules_omit_unset_entries() {
            let rules = ValidationRules {
                min_length: Some(2),
                email: true,
                ..Default::default()
            };
            let json = serde_json::to_string(&rules).unwrap();
            assert_eq!(json, r#"{"minLength":2,"email":true}"#);
        }
    }
}
