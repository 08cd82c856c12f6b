//! One task rendered as a card, with an inline editor.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
};
use tracing::warn;

use crate::app::Intent;
use crate::error::ValidationError;
use crate::form::FormField;
use crate::input::TextInput;
use crate::task::{join_tags, parse_tags, validate_title, Task, TaskId, TaskPatch, TaskStatus};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardOutcome {
    Ignored,
    Edited,
    Emit(Intent),
    Rejected(ValidationError),
}

#[derive(Debug)]
pub struct TaskCard {
    task: Task,
    is_editing: bool,
    title: TextInput,
    desc: TextInput,
    tags: TextInput,
    status: TaskStatus,
    field: FormField,
}

impl TaskCard {
    pub fn new(task: Task) -> Self {
        let mut card = Self {
            task,
            is_editing: false,
            title: TextInput::default(),
            desc: TextInput::default(),
            tags: TextInput::default(),
            status: TaskStatus::default(),
            field: FormField::Title,
        };
        card.seed_buffers();
        card
    }

    pub fn id(&self) -> TaskId {
        self.task.id
    }

    #[cfg(test)]
    pub fn task(&self) -> &Task {
        &self.task
    }

    pub fn is_editing(&self) -> bool {
        self.is_editing
    }

    /// Refreshes the snapshot after the board changed. Open edit buffers are kept.
    pub fn sync(&mut self, task: &Task) {
        if self.task != *task {
            self.task = task.clone();
        }
    }

    fn seed_buffers(&mut self) {
        self.title.set(self.task.title.as_str());
        self.desc.set(self.task.desc.as_str());
        self.tags.set(join_tags(&self.task.tags));
        self.status = self.task.status;
        self.field = FormField::Title;
    }

    pub fn enter_edit(&mut self) {
        self.seed_buffers();
        self.is_editing = true;
    }

    pub fn cancel_edit(&mut self) {
        self.is_editing = false;
    }

    pub fn save(&mut self) -> Result<Intent, ValidationError> {
        let title = validate_title(self.title.value())?;
        let patch = TaskPatch {
            title: Some(title),
            desc: Some(self.desc.value().to_string()),
            status: Some(self.status),
            tags: Some(parse_tags(self.tags.value())),
        };
        self.is_editing = false;
        Ok(Intent::Update(self.task.id, patch))
    }

    pub fn delete(&self) -> Intent {
        Intent::Delete(self.task.id)
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> CardOutcome {
        if !self.is_editing {
            return match key.code {
                KeyCode::Char('e') => {
                    self.enter_edit();
                    CardOutcome::Edited
                }
                KeyCode::Char('d') | KeyCode::Delete => CardOutcome::Emit(self.delete()),
                _ => CardOutcome::Ignored,
            };
        }

        match key.code {
            KeyCode::Enter => match self.save() {
                Ok(intent) => CardOutcome::Emit(intent),
                Err(err) => {
                    warn!(id = %self.task.id, %err, "task edit rejected");
                    CardOutcome::Rejected(err)
                }
            },
            KeyCode::Esc => {
                self.cancel_edit();
                CardOutcome::Edited
            }
            KeyCode::Up => {
                self.field = self.field.prev();
                CardOutcome::Edited
            }
            KeyCode::Down => {
                self.field = self.field.next();
                CardOutcome::Edited
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
                    CardOutcome::Edited
                } else {
                    CardOutcome::Ignored
                }
            }
        }
    }

    /// Rows the card needs when drawn `width` columns wide, borders included.
    /// Long titles and descriptions wrap, so this grows with the text.
    pub fn height(&self, selected: bool, width: u16) -> u16 {
        let rows = Paragraph::new(self.render(selected))
            .wrap(Wrap { trim: false })
            .line_count(width.saturating_sub(2))
            .max(1);
        u16::try_from(rows).unwrap_or(u16::MAX).saturating_add(2)
    }

    pub fn render(&self, selected: bool) -> Vec<Line<'static>> {
        if self.is_editing {
            self.render_edit(selected)
        } else {
            self.render_view()
        }
    }

    fn render_view(&self) -> Vec<Line<'static>> {
        let mut lines = vec![
            Line::from(Span::styled(
                self.task.title.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(self.task.desc.clone()),
            Line::from(vec![Span::raw("Status: "), status_badge(self.task.status)]),
        ];
        if !self.task.tags.is_empty() {
            let mut spans = vec![Span::raw("Tags: ")];
            for tag in &self.task.tags {
                spans.push(Span::styled(
                    format!(" {tag} "),
                    Style::default().fg(Color::White).bg(Color::Magenta),
                ));
                spans.push(Span::raw(" "));
            }
            lines.push(Line::from(spans));
        }
        lines.push(action_hints(&[("d", "Delete"), ("e", "Edit")]));
        lines
    }

    fn render_edit(&self, selected: bool) -> Vec<Line<'static>> {
        let field_line = |field: FormField, label: &str, value: String| {
            let style = if selected && self.field == field {
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            Line::from(vec![Span::styled(format!("{label:>6}: "), style), Span::raw(value)])
        };
        let text = |field: FormField, input: &TextInput| {
            if selected && self.field == field {
                input.with_caret()
            } else {
                input.value().to_string()
            }
        };
        vec![
            field_line(FormField::Title, "Title", text(FormField::Title, &self.title)),
            field_line(FormField::Description, "Desc", text(FormField::Description, &self.desc)),
            field_line(FormField::Tags, "Tags", text(FormField::Tags, &self.tags)),
            field_line(
                FormField::Status,
                "Status",
                format!("< {} >", self.status.label()),
            ),
            action_hints(&[("Enter", "Save"), ("Esc", "Cancel")]),
        ]
    }
}

pub fn status_badge(status: TaskStatus) -> Span<'static> {
    let bg = match status {
        TaskStatus::Completed => Color::Green,
        TaskStatus::Ongoing => Color::Yellow,
        TaskStatus::NotStarted => Color::Red,
    };
    Span::styled(
        format!(" {} ", status.label()),
        Style::default().fg(Color::Black).bg(bg),
    )
}

fn action_hints(actions: &[(&str, &str)]) -> Line<'static> {
    let mut spans = Vec::new();
    for (key, label) in actions {
        if !spans.is_empty() {
            spans.push(Span::raw("  "));
        }
        spans.push(Span::styled(format!("[{key}]"), Style::default().fg(Color::Cyan)));
        spans.push(Span::raw(format!(" {label}")));
    }
    Line::from(spans)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;
    use pretty_assertions::assert_eq;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn task() -> Task {
        Task {
            id: TaskId(42),
            title: "Buy milk".into(),
            desc: String::new(),
            status: TaskStatus::NotStarted,
            tags: Vec::new(),
        }
    }

    fn line_text(line: &Line<'_>) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn save_emits_full_replacement_and_leaves_edit_mode() {
        let mut card = TaskCard::new(task());
        card.enter_edit();
        card.tags.set("home, errand");
        card.status = TaskStatus::Completed;

        let intent = card.save().unwrap();

        assert_eq!(
            intent,
            Intent::Update(
                TaskId(42),
                TaskPatch {
                    title: Some("Buy milk".into()),
                    desc: Some(String::new()),
                    status: Some(TaskStatus::Completed),
                    tags: Some(vec!["home".into(), "errand".into()]),
                }
            )
        );
        assert!(!card.is_editing());
    }

    #[test]
    fn save_with_blank_title_stays_in_edit_mode() {
        let mut card = TaskCard::new(task());
        card.enter_edit();
        card.title.set("  ");

        assert_eq!(card.save(), Err(ValidationError::EmptyTitle));
        assert!(card.is_editing());
        assert_eq!(card.title.value(), "  ");
    }

    #[test]
    fn cancel_discards_unsaved_buffers() {
        let mut card = TaskCard::new(task());
        card.enter_edit();
        card.title.set("scribble");
        card.cancel_edit();
        assert!(!card.is_editing());

        card.enter_edit();
        assert_eq!(card.title.value(), "Buy milk");
    }

    #[test]
    fn entering_edit_reseeds_from_latest_snapshot() {
        let mut card = TaskCard::new(task());
        let mut changed = task();
        changed.title = "Buy oat milk".into();
        changed.tags = vec!["shop".into(), "weekly".into()];
        card.sync(&changed);

        card.enter_edit();

        assert_eq!(card.title.value(), "Buy oat milk");
        assert_eq!(card.tags.value(), "shop, weekly");
    }

    #[test]
    fn delete_is_immediate() {
        let mut card = TaskCard::new(task());
        assert_eq!(
            card.handle_key(key(KeyCode::Char('d'))),
            CardOutcome::Emit(Intent::Delete(TaskId(42)))
        );
    }

    #[test]
    fn keyboard_edit_session() {
        let mut card = TaskCard::new(task());
        assert_eq!(card.handle_key(key(KeyCode::Char('e'))), CardOutcome::Edited);
        assert!(card.is_editing());

        for _ in 0..3 {
            card.handle_key(key(KeyCode::Down));
        }
        card.handle_key(key(KeyCode::Left));
        let outcome = card.handle_key(key(KeyCode::Enter));

        match outcome {
            CardOutcome::Emit(Intent::Update(id, patch)) => {
                assert_eq!(id, TaskId(42));
                assert_eq!(patch.status, Some(TaskStatus::Completed));
            }
            other => panic!("unexpected outcome {other:?}"),
        }
    }

    #[test]
    fn view_mode_hides_tag_row_without_tags() {
        let card = TaskCard::new(task());
        let lines = card.render(true);
        assert_eq!(card.height(false, 80), lines.len() as u16 + 2);
        assert_eq!(line_text(&lines[2]), "Status:  Not Started ");
        assert!(lines.iter().all(|l| !line_text(l).starts_with("Tags:")));
        assert_eq!(line_text(&lines[3]), "[d] Delete  [e] Edit");
    }

    #[test]
    fn view_mode_shows_a_badge_per_tag() {
        let mut t = task();
        t.tags = vec!["home".into(), "errand".into()];
        let card = TaskCard::new(t);
        let lines = card.render(false);
        assert_eq!(card.height(false, 80), lines.len() as u16 + 2);
        assert_eq!(line_text(&lines[3]), "Tags:  home   errand  ");
    }

    #[test]
    fn long_description_makes_the_card_taller() {
        let mut t = task();
        t.desc = "word ".repeat(40);
        let card = TaskCard::new(t);
        let rows = card.render(false).len() as u16;
        assert_eq!(card.height(false, 400), rows + 2);
        assert!(card.height(false, 40) > rows + 2);
    }

    #[test]
    fn badges_differ_per_status() {
        let colors: Vec<_> = TaskStatus::ALL
            .iter()
            .map(|s| status_badge(*s).style.bg)
            .collect();
        assert_eq!(
            colors,
            vec![Some(Color::Red), Some(Color::Yellow), Some(Color::Green)]
        );
    }
}
