//! Control descriptors consumed by whatever renders a form
//!
//! Each field maps to one [`Control`] variant; renderers match on the variant
//! instead of branching on the field type themselves.

use crate::model::{FieldType, FieldValue, FormField};
use crate::validation::Violation;

/// Input flavour of a single-line text control
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Text,
    Number,
    Email,
    Date,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Control {
    TextInput { kind: InputKind },
    TextArea,
    Select { options: Vec<String> },
    RadioGroup { options: Vec<String> },
    Checkbox,
    /// Computed value shown as plain text
    ReadOnly,
}

impl Control {
    /// Control used to fill in `field`. Derived fields are always read-only.
    pub fn for_field(field: &FormField) -> Self {
        if field.is_derived {
            return Control::ReadOnly;
        }
        match field.field_type {
            FieldType::Text => Control::TextInput {
                kind: InputKind::Text,
            },
            FieldType::Number => Control::TextInput {
                kind: InputKind::Number,
            },
            FieldType::Email => Control::TextInput {
                kind: InputKind::Email,
            },
            FieldType::Date => Control::TextInput {
                kind: InputKind::Date,
            },
            FieldType::Textarea => Control::TextArea,
            FieldType::Select => Control::Select {
                options: field.options.clone(),
            },
            FieldType::Radio => Control::RadioGroup {
                options: field.options.clone(),
            },
            FieldType::Checkbox => Control::Checkbox,
        }
    }

    /// Options a choice control cycles through
    pub fn options(&self) -> &[String] {
        match self {
            Control::Select { options } | Control::RadioGroup { options } => options,
            _ => &[],
        }
    }

    /// Whether typed characters edit the value
    pub fn accepts_text(&self) -> bool {
        matches!(self, Control::TextInput { .. } | Control::TextArea)
    }
}

/// Everything needed to render one field in fill mode
#[derive(Debug, Clone, PartialEq)]
pub struct FieldView {
    pub id: String,
    pub label: String,
    pub control: Control,
    pub required: bool,
    pub read_only: bool,
    pub value: FieldValue,
    pub violations: Vec<Violation>,
}

impl FieldView {
    pub fn new(field: &FormField, value: Option<&FieldValue>, violations: Vec<Violation>) -> Self {
        let control = Control::for_field(field);
        Self {
            id: field.id.clone(),
            label: field.label.clone(),
            required: field.required,
            read_only: control == Control::ReadOnly,
            control,
            value: value.cloned().unwrap_or_default(),
            violations,
        }
    }

    /// Value as shown to the user; checkboxes render as a tick box
    pub fn display_value(&self) -> String {
        match (&self.control, &self.value) {
            (Control::Checkbox, value) => {
                if value.is_truthy() && *value != FieldValue::from("false") {
                    "[x]".to_string()
                } else {
                    "[ ]".to_string()
                }
            }
            (_, value) => value.display_value(),
        }
    }
}
