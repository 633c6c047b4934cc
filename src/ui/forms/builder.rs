//! Form builder: the form name, its fields and schema diagnostics

use super::field_renderer::{draw_field, FieldBox};
use crate::app::App;
use crate::state::BuilderFocus;
use crate::ui::widgets::{render_scrollable_list, selection_style};
use formsmith::FormField;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame,
};

pub fn draw(frame: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Form name
            Constraint::Min(0),    // Fields and issues
        ])
        .split(area);

    let name_focused = app.state.builder_focus == BuilderFocus::Name;
    draw_field(
        frame,
        chunks[0],
        FieldBox::new("Form name", &app.state.workspace.schema().name, name_focused),
    );

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(30), Constraint::Length(36)])
        .split(chunks[1]);

    draw_field_list(frame, body[0], app, !name_focused);
    draw_issues(frame, body[1], app);
}

fn draw_field_list(frame: &mut Frame, area: Rect, app: &App, is_focused: bool) {
    let border_color = if is_focused {
        Color::Cyan
    } else {
        Color::DarkGray
    };
    let block = Block::default()
        .title(" Fields ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color));

    let fields = app.state.workspace.fields();
    if fields.is_empty() {
        let content = Paragraph::new("No fields yet.\nPress 'a' to add a field.")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(content, area);
        return;
    }

    let items: Vec<ListItem> = fields
        .iter()
        .enumerate()
        .map(|(idx, field)| {
            let is_selected = is_focused && idx == app.state.selected_field;
            ListItem::new(field_line(field, is_selected))
        })
        .collect();

    let list = List::new(items).block(block);
    render_scrollable_list(frame, area, list, app.state.selected_field);
}

fn field_line(field: &FormField, is_selected: bool) -> Line<'_> {
    let (prefix, style) = selection_style(is_selected);
    let mut spans = vec![
        Span::styled(prefix, style),
        Span::styled(field.display_label(), style),
        Span::styled(
            format!("  [{}]", field.field_type),
            Style::default().fg(Color::Cyan),
        ),
    ];
    if field.required {
        spans.push(Span::styled(" *", Style::default().fg(Color::Red)));
    }
    if let Some(formula) = field.active_formula() {
        spans.push(Span::styled(
            format!("  = {formula}"),
            Style::default().fg(Color::Yellow),
        ));
    }
    Line::from(spans)
}

fn draw_issues(frame: &mut Frame, area: Rect, app: &App) {
    let issues = app.state.workspace.lint();
    let block = Block::default()
        .title(" Issues ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));

    let content: Vec<Line> = if issues.is_empty() {
        vec![Line::from(Span::styled(
            "No issues",
            Style::default().fg(Color::Green),
        ))]
    } else {
        issues
            .iter()
            .map(|issue| {
                Line::from(Span::styled(
                    format!("• {issue}"),
                    Style::default().fg(Color::Yellow),
                ))
            })
            .collect()
    };

    let paragraph = Paragraph::new(content)
        .block(block)
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}
