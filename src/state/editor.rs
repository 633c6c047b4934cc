//! Field editor state: a draft copy of one field plus per-row input buffers

use formsmith::{FieldType, FormField, FormSchema};

/// Editable rows of the field editor, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorRow {
    Label,
    Type,
    Required,
    DefaultValue,
    Options,
    Derived,
    DerivedFrom,
    Formula,
    NotEmpty,
    MinLength,
    MaxLength,
    Pattern,
    Email,
    PasswordRule,
}

impl EditorRow {
    pub const ALL: [EditorRow; 14] = [
        EditorRow::Label,
        EditorRow::Type,
        EditorRow::Required,
        EditorRow::DefaultValue,
        EditorRow::Options,
        EditorRow::Derived,
        EditorRow::DerivedFrom,
        EditorRow::Formula,
        EditorRow::NotEmpty,
        EditorRow::MinLength,
        EditorRow::MaxLength,
        EditorRow::Pattern,
        EditorRow::Email,
        EditorRow::PasswordRule,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Label => "Label",
            Self::Type => "Type",
            Self::Required => "Required",
            Self::DefaultValue => "Default value",
            Self::Options => "Options (comma-separated)",
            Self::Derived => "Derived",
            Self::DerivedFrom => "Derived from (comma-separated ids)",
            Self::Formula => "Formula",
            Self::NotEmpty => "Not empty",
            Self::MinLength => "Min length",
            Self::MaxLength => "Max length",
            Self::Pattern => "Pattern (regex)",
            Self::Email => "Email format",
            Self::PasswordRule => "Strong password",
        }
    }

    /// Rows edited by typing
    pub fn is_text(&self) -> bool {
        matches!(
            self,
            Self::Label
                | Self::DefaultValue
                | Self::Options
                | Self::DerivedFrom
                | Self::Formula
                | Self::MinLength
                | Self::MaxLength
                | Self::Pattern
        )
    }
}

/// Draft of the field at `index` in the workspace
#[derive(Debug, Clone)]
pub struct FieldEditorForm {
    pub index: usize,
    pub draft: FormField,
    pub active_row: usize,
    label: String,
    default_value: String,
    options: String,
    derived_from: String,
    formula: String,
    min_length: String,
    max_length: String,
    pattern: String,
}

impl FieldEditorForm {
    pub fn from_field(index: usize, field: &FormField) -> Self {
        let rules = field.validation.clone().unwrap_or_default();
        Self {
            index,
            draft: field.clone(),
            active_row: 0,
            label: field.label.clone(),
            default_value: field.default_value.clone().unwrap_or_default(),
            options: field.options.join(", "),
            derived_from: field.derived_from.join(", "),
            formula: field.formula.clone().unwrap_or_default(),
            min_length: rules.min_length.map(|n| n.to_string()).unwrap_or_default(),
            max_length: rules.max_length.map(|n| n.to_string()).unwrap_or_default(),
            pattern: rules.pattern.unwrap_or_default(),
        }
    }

    pub fn row_count(&self) -> usize {
        EditorRow::ALL.len()
    }

    pub fn active(&self) -> EditorRow {
        EditorRow::ALL[self.active_row.min(EditorRow::ALL.len() - 1)]
    }

    pub fn next_row(&mut self) {
        self.active_row = (self.active_row + 1) % self.row_count();
    }

    pub fn prev_row(&mut self) {
        if self.active_row == 0 {
            self.active_row = self.row_count() - 1;
        } else {
            self.active_row -= 1;
        }
    }

    fn buffer_mut(&mut self, row: EditorRow) -> Option<&mut String> {
        match row {
            EditorRow::Label => Some(&mut self.label),
            EditorRow::DefaultValue => Some(&mut self.default_value),
            EditorRow::Options => Some(&mut self.options),
            EditorRow::DerivedFrom => Some(&mut self.derived_from),
            EditorRow::Formula => Some(&mut self.formula),
            EditorRow::MinLength => Some(&mut self.min_length),
            EditorRow::MaxLength => Some(&mut self.max_length),
            EditorRow::Pattern => Some(&mut self.pattern),
            _ => None,
        }
    }

    /// Push a character to the active text row
    pub fn input_char(&mut self, c: char) {
        let row = self.active();
        if let Some(buffer) = self.buffer_mut(row) {
            buffer.push(c);
        }
    }

    pub fn backspace(&mut self) {
        let row = self.active();
        if let Some(buffer) = self.buffer_mut(row) {
            buffer.pop();
        }
    }

    /// Toggle or cycle the active non-text row
    pub fn toggle(&mut self) {
        match self.active() {
            EditorRow::Type => {
                let next = self.draft.field_type.next();
                self.draft.field_type = next;
                if next.is_choice() && self.options.trim().is_empty() {
                    self.options = "Option 1".to_string();
                }
            }
            EditorRow::Required => self.draft.required = !self.draft.required,
            EditorRow::Derived => self.draft.is_derived = !self.draft.is_derived,
            EditorRow::NotEmpty => {
                let rules = self.draft.rules_mut();
                rules.not_empty = !rules.not_empty;
            }
            EditorRow::Email => {
                let rules = self.draft.rules_mut();
                rules.email = !rules.email;
            }
            EditorRow::PasswordRule => {
                let rules = self.draft.rules_mut();
                rules.password_rule = !rules.password_rule;
            }
            _ => {}
        }
    }

    /// Text shown for `row`
    pub fn display_value(&self, row: EditorRow) -> String {
        let flag = |on: bool| if on { "[x]" } else { "[ ]" }.to_string();
        let rules = self.draft.validation.clone().unwrap_or_default();
        match row {
            EditorRow::Label => self.label.clone(),
            EditorRow::Type => format!("< {} >", self.draft.field_type.label()),
            EditorRow::Required => flag(self.draft.required),
            EditorRow::DefaultValue => self.default_value.clone(),
            EditorRow::Options => self.options.clone(),
            EditorRow::Derived => flag(self.draft.is_derived),
            EditorRow::DerivedFrom => self.derived_from.clone(),
            EditorRow::Formula => self.formula.clone(),
            EditorRow::NotEmpty => flag(rules.not_empty),
            EditorRow::MinLength => self.min_length.clone(),
            EditorRow::MaxLength => self.max_length.clone(),
            EditorRow::Pattern => self.pattern.clone(),
            EditorRow::Email => flag(rules.email),
            EditorRow::PasswordRule => flag(rules.password_rule),
        }
    }

    /// Build the edited field from the draft and the input buffers.
    /// `schema` is the form the field belongs to; derived inputs must name
    /// other fields of it.
    pub fn build(&self, schema: &FormSchema) -> Result<FormField, String> {
        let mut field = self.draft.clone();
        field.label = self.label.clone();
        field.default_value = Some(self.default_value.clone());
        field.formula = Some(self.formula.clone());
        field.derived_from = split_list(&self.derived_from);
        check_derived_from(&field, schema)?;

        field.options = if field.field_type.is_choice() {
            split_list(&self.options)
        } else {
            Vec::new()
        };

        let min_length = parse_length("Min length", &self.min_length)?;
        let max_length = parse_length("Max length", &self.max_length)?;
        let pattern = self.pattern.trim();
        let rules = field.rules_mut();
        rules.min_length = min_length;
        rules.max_length = max_length;
        rules.pattern = (!pattern.is_empty()).then(|| pattern.to_string());

        Ok(field)
    }
}

fn check_derived_from(field: &FormField, schema: &FormSchema) -> Result<(), String> {
    let candidates = schema.derived_from_candidates(&field.id);
    for id in &field.derived_from {
        if *id == field.id {
            return Err(format!("{} cannot be derived from itself", field.label));
        }
        if !candidates.iter().any(|c| c.id == *id) {
            return Err(format!("{} is derived from an unknown field ({id})", field.label));
        }
    }
    Ok(())
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_length(name: &str, raw: &str) -> Result<Option<usize>, String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse()
        .map(Some)
        .map_err(|_| format!("{name} must be a whole number"))
}

/// Field types offered when adding a field
pub fn type_choices() -> &'static [FieldType] {
    &FieldType::ALL
}
