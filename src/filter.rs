//! Status filter and the button bar that selects it.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
};

use crate::task::{Task, TaskStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Filter {
    #[default]
    All,
    Status(TaskStatus),
}

impl Filter {
    pub const ALL: [Filter; 4] = [
        Filter::All,
        Filter::Status(TaskStatus::NotStarted),
        Filter::Status(TaskStatus::Ongoing),
        Filter::Status(TaskStatus::Completed),
    ];

    pub fn label(self) -> &'static str {
        match self {
            Filter::All => "All",
            Filter::Status(status) => status.label(),
        }
    }

    pub fn matches(self, task: &Task) -> bool {
        match self {
            Filter::All => true,
            Filter::Status(status) => task.status == status,
        }
    }

    fn position(self) -> usize {
        match self {
            Filter::All => 0,
            Filter::Status(TaskStatus::NotStarted) => 1,
            Filter::Status(TaskStatus::Ongoing) => 2,
            Filter::Status(TaskStatus::Completed) => 3,
        }
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.position() + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        Self::ALL[(self.position() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// Holds no state of its own: it reads the active filter and reports a new one.
pub struct FilterControl;

impl FilterControl {
    pub fn handle_key(active: Filter, key: KeyEvent) -> Option<Filter> {
        match key.code {
            KeyCode::Left => Some(active.prev()),
            KeyCode::Right => Some(active.next()),
            KeyCode::Char(c @ '1'..='4') => {
                let index = c as usize - '1' as usize;
                Some(Filter::ALL[index])
            }
            _ => None,
        }
    }

    pub fn render(active: Filter, focused: bool) -> Line<'static> {
        let mut spans = Vec::with_capacity(Filter::ALL.len() * 2);
        for (i, filter) in Filter::ALL.iter().enumerate() {
            if i > 0 {
                spans.push(Span::raw(" "));
            }
            let style = if *filter == active {
                let base = Style::default().fg(Color::Black).bg(Color::Blue);
                if focused {
                    base.add_modifier(Modifier::BOLD)
                } else {
                    base
                }
            } else {
                Style::default().fg(Color::Blue)
            };
            spans.push(Span::styled(format!("[{}] {}", i + 1, filter.label()), style));
        }
        Line::from(spans)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::TaskId;
    use crossterm::event::KeyModifiers;
    use rstest::rstest;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn task(status: TaskStatus) -> Task {
        Task {
            id: TaskId(1),
            title: "t".into(),
            desc: String::new(),
            status,
            tags: Vec::new(),
        }
    }

    #[test]
    fn labels_match_the_buttons() {
        let labels: Vec<_> = Filter::ALL.iter().map(|f| f.label()).collect();
        assert_eq!(labels, ["All", "Not Started", "Ongoing", "Completed"]);
    }

    #[test]
    fn all_matches_every_status() {
        for status in TaskStatus::ALL {
            assert!(Filter::All.matches(&task(status)));
        }
    }

    #[test]
    fn status_filter_matches_only_its_status() {
        let filter = Filter::Status(TaskStatus::Ongoing);
        assert!(filter.matches(&task(TaskStatus::Ongoing)));
        assert!(!filter.matches(&task(TaskStatus::NotStarted)));
        assert!(!filter.matches(&task(TaskStatus::Completed)));
    }

    #[test]
    fn arrows_wrap_around() {
        assert_eq!(
            FilterControl::handle_key(Filter::All, key(KeyCode::Left)),
            Some(Filter::Status(TaskStatus::Completed))
        );
        assert_eq!(
            FilterControl::handle_key(Filter::Status(TaskStatus::Completed), key(KeyCode::Right)),
            Some(Filter::All)
        );
    }

    #[rstest]
    #[case('1', Filter::All)]
    #[case('2', Filter::Status(TaskStatus::NotStarted))]
    #[case('3', Filter::Status(TaskStatus::Ongoing))]
    #[case('4', Filter::Status(TaskStatus::Completed))]
    fn digits_select_directly(#[case] digit: char, #[case] expected: Filter) {
        let chosen = FilterControl::handle_key(Filter::All, key(KeyCode::Char(digit)));
        assert_eq!(chosen, Some(expected));
    }

    #[test]
    fn other_keys_are_ignored() {
        assert_eq!(FilterControl::handle_key(Filter::All, key(KeyCode::Char('5'))), None);
        assert_eq!(FilterControl::handle_key(Filter::All, key(KeyCode::Enter)), None);
    }

    #[test]
    fn active_button_is_highlighted() {
        let line = FilterControl::render(Filter::Status(TaskStatus::Ongoing), false);
        let buttons: Vec<_> = line.spans.iter().filter(|s| s.content != " ").collect();
        assert_eq!(buttons.len(), 4);
        assert_eq!(buttons[2].content, "[3] Ongoing");
        assert_eq!(buttons[2].style.bg, Some(Color::Blue));
        assert_eq!(buttons[0].style.bg, None);
    }
}
