//! The task creation form.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
};
use tracing::warn;

use crate::error::ValidationError;
use crate::input::TextInput;
use crate::task::{parse_tags, validate_title, NewTask, TaskStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormField {
    #[default]
    Title,
    Description,
    Tags,
    Status,
}

impl FormField {
    const ORDER: [FormField; 4] = [
        FormField::Title,
        FormField::Description,
        FormField::Tags,
        FormField::Status,
    ];

    pub fn next(self) -> Self {
        match self {
            FormField::Title => FormField::Description,
            FormField::Description => FormField::Tags,
            FormField::Tags => FormField::Status,
            FormField::Status => FormField::Title,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            FormField::Title => FormField::Status,
            FormField::Description => FormField::Title,
            FormField::Tags => FormField::Description,
            FormField::Status => FormField::Tags,
        }
    }
}

/// What a key press asked the form to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormOutcome {
    Ignored,
    Edited,
    Submitted(NewTask),
    Rejected(ValidationError),
}

#[derive(Debug, Default)]
pub struct TaskForm {
    pub title: TextInput,
    pub desc: TextInput,
    pub tags: TextInput,
    pub status: TaskStatus,
    pub field: FormField,
}

impl TaskForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates the draft. On success the drafts are reset; on failure they are kept.
    pub fn submit(&mut self) -> Result<NewTask, ValidationError> {
        let title = validate_title(self.title.value())?;
        let data = NewTask {
            title,
            desc: self.desc.value().to_string(),
            status: self.status,
            tags: parse_tags(self.tags.value()),
        };
        self.reset();
        Ok(data)
    }

    pub fn reset(&mut self) {
        self.title.clear();
        self.desc.clear();
        self.tags.clear();
        self.status = TaskStatus::default();
        self.field = FormField::Title;
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> FormOutcome {
        match key.code {
            KeyCode::Enter => match self.submit() {
                Ok(data) => FormOutcome::Submitted(data),
                Err(err) => {
                    warn!(%err, "task creation rejected");
                    FormOutcome::Rejected(err)
                }
            },
            KeyCode::Up => {
                self.field = self.field.prev();
                FormOutcome::Edited
            }
            KeyCode::Down => {
                self.field = self.field.next();
                FormOutcome::Edited
            }
            _ => {
                let edited = match self.field {
                    FormField::Title => self.title.handle_key(key),
                    FormField::Description => self.desc.handle_key(key),
                    FormField::Tags => self.tags.handle_key(key),
                    FormField::Status => match key.code {
                        KeyCode::Left => {
                            self.status = self.status.prev();
                            true
                        }
                        KeyCode::Right | KeyCode::Char(' ') => {
                            self.status = self.status.next();
                            true
                        }
                        _ => false,
                    },
                };
                if edited {
                    FormOutcome::Edited
                } else {
                    FormOutcome::Ignored
                }
            }
        }
    }

    /// One line per field; the focused field shows a caret when the form has focus.
    pub fn render(&self, focused: bool) -> Vec<Line<'static>> {
        FormField::ORDER
            .iter()
            .map(|&field| {
                let active = focused && field == self.field;
                let (label, placeholder, input) = match field {
                    FormField::Title => ("Title", "What's your task?", Some(&self.title)),
                    FormField::Description => {
                        ("Description", "What's your task about?", Some(&self.desc))
                    }
                    FormField::Tags => (
                        "Tags",
                        "separated by commas, eg: academics, health, food",
                        Some(&self.tags),
                    ),
                    FormField::Status => ("Status", "", None),
                };
                let hint = Style::default().fg(Color::DarkGray);
                let value = match input {
                    Some(input) if input.value().is_empty() && active => {
                        vec![Span::raw(input.with_caret()), Span::styled(placeholder, hint)]
                    }
                    Some(input) if input.value().is_empty() => vec![Span::styled(placeholder, hint)],
                    Some(input) if active => vec![Span::raw(input.with_caret())],
                    Some(input) => vec![Span::raw(input.value().to_string())],
                    None => vec![Span::raw(format!("< {} >", self.status.label()))],
                };
                let label_style = if active {
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                };
                let mut spans = vec![Span::styled(format!("{label:>12}: "), label_style)];
                spans.extend(value);
                Line::from(spans)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;
    use pretty_assertions::assert_eq;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_str(form: &mut TaskForm, s: &str) {
        for c in s.chars() {
            form.handle_key(key(KeyCode::Char(c)));
        }
    }

    #[test]
    fn submit_builds_task_and_resets_drafts() {
        let mut form = TaskForm::new();
        form.title.set("  Buy milk ");
        form.desc.set("semi-skimmed");
        form.tags.set("home, , errand,home");
        form.status = TaskStatus::Ongoing;
        form.field = FormField::Tags;

        let data = form.submit().unwrap();

        assert_eq!(
            data,
            NewTask {
                title: "  Buy milk ".into(),
                desc: "semi-skimmed".into(),
                status: TaskStatus::Ongoing,
                tags: vec!["home".into(), "errand".into(), "home".into()],
            }
        );
        assert_eq!(form.title.value(), "");
        assert_eq!(form.desc.value(), "");
        assert_eq!(form.tags.value(), "");
        assert_eq!(form.status, TaskStatus::NotStarted);
        assert_eq!(form.field, FormField::Title);
    }

    #[test]
    fn blank_title_is_rejected_and_drafts_survive() {
        let mut form = TaskForm::new();
        form.title.set("   ");
        form.desc.set("keep me");
        form.status = TaskStatus::Completed;

        assert_eq!(form.submit(), Err(ValidationError::EmptyTitle));
        assert_eq!(form.title.value(), "   ");
        assert_eq!(form.desc.value(), "keep me");
        assert_eq!(form.status, TaskStatus::Completed);
    }

    #[test]
    fn keys_fill_fields_and_enter_submits() {
        let mut form = TaskForm::new();
        type_str(&mut form, "Read book");
        form.handle_key(key(KeyCode::Down));
        form.handle_key(key(KeyCode::Down));
        type_str(&mut form, "leisure");
        form.handle_key(key(KeyCode::Down));
        assert_eq!(form.field, FormField::Status);
        form.handle_key(key(KeyCode::Right));
        form.handle_key(key(KeyCode::Right));

        let outcome = form.handle_key(key(KeyCode::Enter));

        assert_eq!(
            outcome,
            FormOutcome::Submitted(NewTask {
                title: "Read book".into(),
                desc: String::new(),
                status: TaskStatus::Completed,
                tags: vec!["leisure".into()],
            })
        );
    }

    #[test]
    fn enter_on_empty_form_reports_rejection() {
        let mut form = TaskForm::new();
        assert_eq!(
            form.handle_key(key(KeyCode::Enter)),
            FormOutcome::Rejected(ValidationError::EmptyTitle)
        );
    }

    #[test]
    fn up_wraps_to_status() {
        let mut form = TaskForm::new();
        form.handle_key(key(KeyCode::Up));
        assert_eq!(form.field, FormField::Status);
        assert_eq!(form.handle_key(key(KeyCode::Char('x'))), FormOutcome::Ignored);
    }

    #[test]
    fn render_shows_placeholders_until_typed() {
        let form = TaskForm::new();
        let lines = form.render(false);
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0].spans[1].content, "What's your task?");
        assert_eq!(lines[3].spans[1].content, "< Not Started >");
    }
}
