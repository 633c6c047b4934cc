//! Application state and core logic

use crate::platform::is_save_key;
use crate::state::{
    type_choices, AppState, BuilderFocus, FieldEditorForm, PendingDelete, PreviewState, View,
};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use formsmith::model::MoveDirection;
use formsmith::presentation::{Control, FieldView};
use formsmith::session::{FillSession, Workspace};
use formsmith::store::{self, JsonFileStore, SchemaStore};
use formsmith::validation::summarize;
use formsmith::{AppConfig, FieldValue, FormSchema};

/// Main application struct
pub struct App {
    /// Current application state
    pub state: AppState,
    /// Saved forms
    store: Box<dyn SchemaStore>,
    config: AppConfig,
    /// Whether the app should quit
    quit: bool,
}

impl App {
    /// Create a new App backed by the configured file store
    pub fn new(config: AppConfig) -> Result<Self> {
        let store = JsonFileStore::open(config.store_path())?;
        Ok(Self::with_store(Box::new(store), config))
    }

    pub fn with_store(store: Box<dyn SchemaStore>, config: AppConfig) -> Self {
        let mut app = Self {
            state: AppState::default(),
            store,
            config,
            quit: false,
        };
        app.refresh_forms();
        app
    }

    /// Check if app should quit
    pub fn should_quit(&self) -> bool {
        self.quit
    }

    /// Push an error message to the error queue for display
    pub fn push_error(&mut self, message: impl Into<String>) {
        self.state.push_error(message.into());
    }

    fn refresh_forms(&mut self) {
        match store::list_schemas(self.store.as_ref()) {
            Ok(forms) => {
                self.state.forms = forms;
                self.state.clamp_selection();
            }
            Err(e) => self.push_error(format!("Failed to list forms: {e}")),
        }
    }

    /// Handle a key event
    pub fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        // Handle error dialog dismissal first (modal)
        if self.state.has_errors() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                self.state.dismiss_error();
            }
            return Ok(());
        }

        // Handle delete confirmation (modal)
        if self.state.pending_delete.is_some() {
            return self.handle_delete_dialog_key(key);
        }

        // Clear any status messages on key press
        self.state.status_message = None;

        match self.state.current_view {
            View::MyForms => self.handle_my_forms_key(key),
            View::Builder => self.handle_builder_key(key),
            View::FieldEditor => self.handle_field_editor_key(key),
            View::Preview => self.handle_preview_key(key),
        }
    }

    /// Handle keys in My Forms view
    fn handle_my_forms_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Char('q') => self.quit = true,
            KeyCode::Char('j') | KeyCode::Down => {
                self.state.move_selection_down(self.state.forms.len());
            }
            KeyCode::Char('k') | KeyCode::Up => self.state.move_selection_up(),
            KeyCode::Char('n') => {
                self.state.workspace.start_new("");
                self.state.selected_field = 0;
                self.state.builder_focus = BuilderFocus::Name;
                self.state.current_view = View::Builder;
            }
            KeyCode::Enter | KeyCode::Char('p') => {
                if let Some(schema) = self.load_selected()? {
                    self.open_preview(schema, View::MyForms);
                }
            }
            KeyCode::Char('e') => {
                if let Some(schema) = self.load_selected()? {
                    self.state.workspace = Workspace::open(schema);
                    self.state.selected_field = 0;
                    self.state.builder_focus = BuilderFocus::Fields;
                    self.state.current_view = View::Builder;
                }
            }
            KeyCode::Char('d') | KeyCode::Delete => {
                if let Some(form) = self.state.selected_form() {
                    self.state.pending_delete = Some(PendingDelete {
                        name: form.name.clone(),
                        selected_option: false,
                    });
                }
            }
            _ => {}
        }
        Ok(())
    }

    /// Load the schema highlighted in My Forms; failures go to the error
    /// dialog
    fn load_selected(&mut self) -> Result<Option<FormSchema>> {
        let Some(name) = self.state.selected_form().map(|f| f.name.clone()) else {
            return Ok(None);
        };
        match store::load_schema(self.store.as_ref(), &name) {
            Ok(Some(schema)) => Ok(Some(schema)),
            Ok(None) => {
                self.push_error(format!("Form '{name}' no longer exists"));
                self.refresh_forms();
                Ok(None)
            }
            Err(e) => {
                self.push_error(e.to_string());
                Ok(None)
            }
        }
    }

    fn handle_delete_dialog_key(&mut self, key: KeyEvent) -> Result<()> {
        let Some(pending) = self.state.pending_delete.as_mut() else {
            return Ok(());
        };
        match key.code {
            KeyCode::Up
            | KeyCode::Down
            | KeyCode::Char('j')
            | KeyCode::Char('k')
            | KeyCode::Tab => pending.selected_option = !pending.selected_option,
            KeyCode::Esc | KeyCode::Char('n') => self.state.pending_delete = None,
            KeyCode::Enter | KeyCode::Char('y') => {
                let confirmed = key.code == KeyCode::Char('y') || pending.selected_option;
                let name = pending.name.clone();
                self.state.pending_delete = None;
                if confirmed {
                    match store::delete_schema(self.store.as_mut(), &name) {
                        Ok(()) => self.state.status_message = Some(format!("Deleted '{name}'")),
                        Err(e) => self.push_error(format!("Failed to delete '{name}': {e}")),
                    }
                    self.refresh_forms();
                }
            }
            _ => {}
        }
        Ok(())
    }

    /// Handle keys in Builder view
    fn handle_builder_key(&mut self, key: KeyEvent) -> Result<()> {
        if self.state.type_picker.is_some() {
            self.handle_type_picker_key(key);
            return Ok(());
        }

        if is_save_key(&key) {
            self.save_workspace();
            return Ok(());
        }

        match key.code {
            KeyCode::Esc => {
                self.refresh_forms();
                self.state.current_view = View::MyForms;
            }
            KeyCode::Tab | KeyCode::BackTab => self.state.builder_focus.toggle(),
            _ => match self.state.builder_focus {
                BuilderFocus::Name => self.handle_builder_name_key(key),
                BuilderFocus::Fields => self.handle_builder_fields_key(key),
            },
        }
        Ok(())
    }

    fn handle_builder_name_key(&mut self, key: KeyEvent) {
        let mut name = self.state.workspace.schema().name.clone();
        match key.code {
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => name.push(c),
            KeyCode::Backspace => {
                name.pop();
            }
            KeyCode::Enter => {
                self.state.builder_focus = BuilderFocus::Fields;
                return;
            }
            _ => return,
        }
        self.state.workspace.rename(name);
    }

    fn handle_builder_fields_key(&mut self, key: KeyEvent) {
        let index = self.state.selected_field;
        let count = self.state.workspace.fields().len();

        let result = match key.code {
            KeyCode::Char('j') | KeyCode::Down if key.modifiers.contains(KeyModifiers::SHIFT) => {
                self.move_selected_field(MoveDirection::Down)
            }
            KeyCode::Char('k') | KeyCode::Up if key.modifiers.contains(KeyModifiers::SHIFT) => {
                self.move_selected_field(MoveDirection::Up)
            }
            KeyCode::Char('J') => self.move_selected_field(MoveDirection::Down),
            KeyCode::Char('K') => self.move_selected_field(MoveDirection::Up),
            KeyCode::Char('j') | KeyCode::Down => {
                if count > 0 && index + 1 < count {
                    self.state.selected_field += 1;
                }
                Ok(())
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.state.selected_field = index.saturating_sub(1);
                Ok(())
            }
            KeyCode::Char('a') => {
                self.state.type_picker = Some(0);
                Ok(())
            }
            KeyCode::Char('x') | KeyCode::Delete if count > 0 => {
                let result = self.state.workspace.remove_field(index);
                self.state.clamp_selected_field();
                result
            }
            KeyCode::Char('r') if count > 0 => self.state.workspace.toggle_required(index),
            KeyCode::Enter | KeyCode::Char('e') => {
                if let Some(field) = self.state.workspace.fields().get(index) {
                    self.state.field_editor = Some(FieldEditorForm::from_field(index, field));
                    self.state.current_view = View::FieldEditor;
                }
                Ok(())
            }
            KeyCode::Char('p') => {
                let schema = self.state.workspace.schema().clone();
                self.open_preview(schema, View::Builder);
                Ok(())
            }
            _ => Ok(()),
        };

        if let Err(e) = result {
            self.push_error(e.to_string());
        }
    }

    fn move_selected_field(
        &mut self,
        direction: MoveDirection,
    ) -> Result<(), formsmith::SchemaError> {
        let index = self.state.selected_field;
        if self.state.workspace.fields().is_empty() {
            return Ok(());
        }
        self.state.workspace.move_field(index, direction)?;
        let last = self.state.workspace.fields().len() - 1;
        self.state.selected_field = match direction {
            MoveDirection::Up => index.saturating_sub(1),
            MoveDirection::Down => (index + 1).min(last),
        };
        Ok(())
    }

    fn handle_type_picker_key(&mut self, key: KeyEvent) {
        let choices = type_choices();
        let Some(selected) = self.state.type_picker else {
            return;
        };
        match key.code {
            KeyCode::Esc => self.state.type_picker = None,
            KeyCode::Char('j') | KeyCode::Down => {
                self.state.type_picker = Some((selected + 1) % choices.len());
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.state.type_picker = Some((selected + choices.len() - 1) % choices.len());
            }
            KeyCode::Enter => {
                self.state.type_picker = None;
                let index = self.state.workspace.add_field(choices[selected]);
                self.state.selected_field = index;
            }
            _ => {}
        }
    }

    fn save_workspace(&mut self) {
        match self.state.workspace.save(self.store.as_mut()) {
            Ok(name) => {
                self.state.status_message = Some(format!("Form '{name}' saved"));
                self.state.selected_field = 0;
                self.refresh_forms();
                self.state.current_view = View::MyForms;
            }
            Err(e) => self.push_error(e.to_string()),
        }
    }

    /// Handle keys in Field Editor view
    fn handle_field_editor_key(&mut self, key: KeyEvent) -> Result<()> {
        let Some(editor) = self.state.field_editor.as_mut() else {
            self.state.current_view = View::Builder;
            return Ok(());
        };

        if is_save_key(&key) {
            let index = editor.index;
            match editor.build(self.state.workspace.schema()) {
                Ok(field) => match self.state.workspace.replace_field(index, field) {
                    Ok(()) => {
                        self.state.field_editor = None;
                        self.state.current_view = View::Builder;
                    }
                    Err(e) => self.push_error(e.to_string()),
                },
                Err(message) => self.push_error(message),
            }
            return Ok(());
        }

        let on_text_row = editor.active().is_text();
        match key.code {
            KeyCode::Esc => {
                self.state.field_editor = None;
                self.state.current_view = View::Builder;
            }
            KeyCode::Tab | KeyCode::Down => editor.next_row(),
            KeyCode::BackTab | KeyCode::Up => editor.prev_row(),
            KeyCode::Char(c) if on_text_row => editor.input_char(c),
            KeyCode::Backspace if on_text_row => editor.backspace(),
            KeyCode::Char(' ') | KeyCode::Enter | KeyCode::Left | KeyCode::Right => {
                editor.toggle()
            }
            _ => {}
        }
        Ok(())
    }

    fn open_preview(&mut self, schema: FormSchema, return_to: View) {
        let session = FillSession::new(
            schema,
            self.config.derivation_engine(),
            self.config.validator(),
        );
        self.state.preview = Some(PreviewState::new(session, return_to));
        self.state.current_view = View::Preview;
    }

    /// Handle keys in Preview view
    fn handle_preview_key(&mut self, key: KeyEvent) -> Result<()> {
        let Some(preview) = self.state.preview.as_mut() else {
            self.state.current_view = View::MyForms;
            return Ok(());
        };

        if is_save_key(&key) {
            match preview.session.submit() {
                Ok(_) => self.state.status_message = Some("Form submitted!".to_string()),
                Err(violations) => self.push_error(summarize(&violations)),
            }
            return Ok(());
        }

        match key.code {
            KeyCode::Esc => {
                self.state.current_view = preview.return_to;
                self.state.preview = None;
                return Ok(());
            }
            KeyCode::Tab | KeyCode::Down => {
                preview.next_field();
                return Ok(());
            }
            KeyCode::BackTab | KeyCode::Up => {
                preview.prev_field();
                return Ok(());
            }
            _ => {}
        }

        let Some(field_id) = preview.active_field_id() else {
            return Ok(());
        };
        let Some(view) = preview
            .session
            .views()
            .into_iter()
            .find(|v| v.id == field_id)
        else {
            return Ok(());
        };

        match (&view.control, key.code) {
            (Control::ReadOnly, _) => {}
            (Control::Checkbox, KeyCode::Char(' ') | KeyCode::Enter) => {
                preview.session.edit_value(&field_id, FieldValue::toggle);
            }
            (
                Control::Select { .. } | Control::RadioGroup { .. },
                KeyCode::Char(' ') | KeyCode::Enter | KeyCode::Right | KeyCode::Left,
            ) => {
                let step_back = key.code == KeyCode::Left;
                if let Some(choice) = cycle_option(&view, step_back) {
                    preview.session.set_value(&field_id, FieldValue::Text(choice));
                }
            }
            (Control::TextArea, KeyCode::Enter) => {
                preview.session.edit_value(&field_id, |v| v.push_char('\n'));
            }
            (control, KeyCode::Char(c)) if control.accepts_text() => {
                preview.session.edit_value(&field_id, |v| v.push_char(c));
            }
            (control, KeyCode::Backspace) if control.accepts_text() => {
                preview.session.edit_value(&field_id, FieldValue::pop_char);
            }
            _ => {}
        }
        Ok(())
    }
}

/// Next (or previous) option after the current value of a choice field
fn cycle_option(view: &FieldView, step_back: bool) -> Option<String> {
    let options = view.control.options();
    if options.is_empty() {
        return None;
    }
    let current = view.value.as_str().unwrap_or_default();
    let next = match options.iter().position(|o| o == current) {
        None => 0,
        Some(i) if step_back => (i + options.len() - 1) % options.len(),
        Some(i) => (i + 1) % options.len(),
    };
    Some(options[next].clone())
}
