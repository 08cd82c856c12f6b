//! Application root: owns the task board and routes child intents into it.

use std::collections::HashMap;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::debug;

use crate::card::{CardOutcome, TaskCard};
use crate::filter::{Filter, FilterControl};
use crate::form::{FormOutcome, TaskForm};
use crate::task::{NewTask, TaskId, TaskPatch};
use crate::task_board::TaskBoard;

pub const FORM_EMPTY_TITLE: &str = "Task title cannot be empty!";
pub const CARD_EMPTY_TITLE: &str = "Title cannot be empty!";

/// Requests emitted by child components; only the root mutates state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    Create(NewTask),
    Update(TaskId, TaskPatch),
    Delete(TaskId),
    SetFilter(Filter),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    Filter,
    #[default]
    Form,
    Tasks,
}

impl Focus {
    fn next(self) -> Self {
        match self {
            Focus::Filter => Focus::Form,
            Focus::Form => Focus::Tasks,
            Focus::Tasks => Focus::Filter,
        }
    }

    fn prev(self) -> Self {
        match self {
            Focus::Filter => Focus::Tasks,
            Focus::Form => Focus::Filter,
            Focus::Tasks => Focus::Form,
        }
    }
}

#[derive(Debug, Default)]
pub struct App {
    board: TaskBoard,
    form: TaskForm,
    cards: Vec<TaskCard>,
    selected: usize,
    focus: Focus,
    notice: Option<String>,
    should_quit: bool,
}

impl App {
    pub fn new() -> Self {
        Self::with_board(TaskBoard::new())
    }

    pub fn with_board(board: TaskBoard) -> Self {
        let mut app = Self {
            board,
            form: TaskForm::new(),
            cards: Vec::new(),
            selected: 0,
            focus: Focus::Form,
            notice: None,
            should_quit: false,
        };
        app.reconcile_cards();
        app
    }

    pub fn board(&self) -> &TaskBoard {
        &self.board
    }

    pub fn form(&self) -> &TaskForm {
        &self.form
    }

    /// Cards for the filtered view, in display order.
    pub fn cards(&self) -> &[TaskCard] {
        &self.cards
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn dispatch(&mut self, intent: Intent) {
        match intent {
            Intent::Create(data) => {
                self.board.add_task(data);
            }
            Intent::Update(id, patch) => {
                self.board.update_task(id, patch);
            }
            Intent::Delete(id) => {
                self.board.delete_task(id);
            }
            Intent::SetFilter(filter) => self.board.set_filter(filter),
        }
        self.reconcile_cards();
    }

    /// Rebuilds the card list from the filtered view, keyed by task id.
    /// Cards that survive keep their local state and the selection stays on the
    /// same task; if that task is gone the selection keeps its position.
    fn reconcile_cards(&mut self) {
        let selected_id = self.cards.get(self.selected).map(TaskCard::id);
        let mut previous: HashMap<TaskId, TaskCard> =
            self.cards.drain(..).map(|card| (card.id(), card)).collect();
        self.cards = self
            .board
            .filtered_tasks()
            .into_iter()
            .map(|task| match previous.remove(&task.id) {
                Some(mut card) => {
                    card.sync(task);
                    card
                }
                None => TaskCard::new(task.clone()),
            })
            .collect();
        self.selected = selected_id
            .and_then(|id| self.cards.iter().position(|card| card.id() == id))
            .unwrap_or_else(|| self.selected.min(self.cards.len().saturating_sub(1)));
    }

    fn raise_notice(&mut self, message: &str) {
        self.notice = Some(message.to_string());
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        // The notice is modal: nothing else reacts until it is dismissed.
        if self.notice.is_some() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                self.notice = None;
            }
            return;
        }

        match key.code {
            KeyCode::Tab => {
                self.focus = self.focus.next();
                debug!(focus = ?self.focus, "focus moved");
                return;
            }
            KeyCode::BackTab => {
                self.focus = self.focus.prev();
                debug!(focus = ?self.focus, "focus moved");
                return;
            }
            _ => {}
        }

        match self.focus {
            Focus::Filter => self.handle_filter_key(key),
            Focus::Form => self.handle_form_key(key),
            Focus::Tasks => self.handle_tasks_key(key),
        }
    }

    fn handle_filter_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char('q') {
            self.should_quit = true;
        } else if let Some(filter) = FilterControl::handle_key(self.board.filter(), key) {
            self.dispatch(Intent::SetFilter(filter));
        }
    }

    fn handle_form_key(&mut self, key: KeyEvent) {
        match self.form.handle_key(key) {
            FormOutcome::Submitted(data) => self.dispatch(Intent::Create(data)),
            FormOutcome::Rejected(_) => self.raise_notice(FORM_EMPTY_TITLE),
            FormOutcome::Edited | FormOutcome::Ignored => {}
        }
    }

    fn handle_tasks_key(&mut self, key: KeyEvent) {
        let editing = self
            .cards
            .get(self.selected)
            .is_some_and(TaskCard::is_editing);

        if !editing {
            match key.code {
                KeyCode::Char('q') => {
                    self.should_quit = true;
                    return;
                }
                KeyCode::Up => {
                    self.selected = self.selected.saturating_sub(1);
                    return;
                }
                KeyCode::Down => {
                    if self.selected + 1 < self.cards.len() {
                        self.selected += 1;
                    }
                    return;
                }
                _ => {}
            }
        }

        let Some(card) = self.cards.get_mut(self.selected) else {
            return;
        };
        match card.handle_key(key) {
            CardOutcome::Emit(intent) => self.dispatch(intent),
            CardOutcome::Rejected(_) => self.raise_notice(CARD_EMPTY_TITLE),
            CardOutcome::Edited | CardOutcome::Ignored => {}
        }
    }
}
