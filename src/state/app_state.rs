//! Application state definitions

use super::editor::FieldEditorForm;
use formsmith::model::SchemaSummary;
use formsmith::session::{FillSession, Workspace};
use std::collections::VecDeque;

/// Current view in the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    MyForms,
    Builder,
    FieldEditor,
    Preview,
}

/// Which part of the builder receives keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BuilderFocus {
    Name,
    #[default]
    Fields,
}

impl BuilderFocus {
    pub fn toggle(&mut self) {
        *self = match self {
            Self::Name => Self::Fields,
            Self::Fields => Self::Name,
        };
    }
}

/// A form being filled in from the preview view
#[derive(Debug, Clone)]
pub struct PreviewState {
    pub session: FillSession,
    pub active_field: usize,
    /// View to return to on Esc
    pub return_to: View,
}

impl PreviewState {
    pub fn new(session: FillSession, return_to: View) -> Self {
        Self {
            session,
            active_field: 0,
            return_to,
        }
    }

    pub fn next_field(&mut self) {
        let count = self.session.schema().fields.len();
        if count > 0 {
            self.active_field = (self.active_field + 1) % count;
        }
    }

    pub fn prev_field(&mut self) {
        let count = self.session.schema().fields.len();
        if count == 0 {
            return;
        }
        if self.active_field == 0 {
            self.active_field = count - 1;
        } else {
            self.active_field -= 1;
        }
    }

    pub fn active_field_id(&self) -> Option<String> {
        self.session
            .schema()
            .fields
            .get(self.active_field)
            .map(|f| f.id.clone())
    }
}

/// Delete awaiting confirmation in My Forms
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingDelete {
    pub name: String,
    /// true = Delete highlighted, false = Cancel highlighted
    pub selected_option: bool,
}

/// Main application state
#[derive(Debug, Default)]
pub struct AppState {
    // Navigation
    pub current_view: View,

    // My Forms
    pub forms: Vec<SchemaSummary>,
    pub selected_index: usize,
    pub pending_delete: Option<PendingDelete>,

    // Builder
    pub workspace: Workspace,
    pub builder_focus: BuilderFocus,
    pub selected_field: usize,
    /// Open type picker and its highlighted entry
    pub type_picker: Option<usize>,

    pub field_editor: Option<FieldEditorForm>,
    pub preview: Option<PreviewState>,

    // UI state
    pub errors: VecDeque<String>,
    pub status_message: Option<String>,
}

impl AppState {
    /// Queue an error for the error dialog
    pub fn push_error(&mut self, message: String) {
        self.errors.push_back(message);
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn current_error(&self) -> Option<&str> {
        self.errors.front().map(String::as_str)
    }

    pub fn dismiss_error(&mut self) {
        self.errors.pop_front();
    }

    /// Move selection down
    pub fn move_selection_down(&mut self, max: usize) {
        if max > 0 && self.selected_index < max - 1 {
            self.selected_index += 1;
        }
    }

    /// Move selection up
    pub fn move_selection_up(&mut self) {
        if self.selected_index > 0 {
            self.selected_index -= 1;
        }
    }

    /// Keep the form selection inside the list after it changed
    pub fn clamp_selection(&mut self) {
        self.selected_index = self.selected_index.min(self.forms.len().saturating_sub(1));
    }

    /// Keep the builder's field selection inside the field list
    pub fn clamp_selected_field(&mut self) {
        let len = self.workspace.fields().len();
        self.selected_field = self.selected_field.min(len.saturating_sub(1));
    }

    pub fn selected_form(&self) -> Option<&SchemaSummary> {
        self.forms.get(self.selected_index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use formsmith::{DerivationEngine, FieldType, FormField, FormSchema, Validator};

    #[test]
    fn test_error_queue_is_fifo() {
        let mut state = AppState::default();
        state.push_error("first".into());
        state.push_error("second".into());
        assert_eq!(state.current_error(), Some("first"));
        state.dismiss_error();
        assert_eq!(state.current_error(), Some("second"));
        state.dismiss_error();
        assert!(!state.has_errors());
    }

    #[test]
    fn test_selection_bounds() {
        let mut state = AppState::default();
        state.move_selection_up();
        assert_eq!(state.selected_index, 0);
        state.move_selection_down(2);
        state.move_selection_down(2);
        assert_eq!(state.selected_index, 1);
        state.clamp_selection();
        assert_eq!(state.selected_index, 0);
    }

    #[test]
    fn test_preview_field_cycle() {
        let schema = FormSchema::new("F")
            .append_field(FormField::new("a", "A", FieldType::Text))
            .append_field(FormField::new("b", "B", FieldType::Text));
        let session = FillSession::new(schema, DerivationEngine::default(), Validator::default());
        let mut preview = PreviewState::new(session, View::MyForms);

        preview.prev_field();
        assert_eq!(preview.active_field_id(), Some("b".to_string()));
        preview.next_field();
        assert_eq!(preview.active_field_id(), Some("a".to_string()));
    }

    #[test]
    fn test_builder_focus_toggle() {
        let mut focus = BuilderFocus::default();
        focus.toggle();
        assert_eq!(focus, BuilderFocus::Name);
    }
}
