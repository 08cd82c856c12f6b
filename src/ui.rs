use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, Focus};
use crate::filter::FilterControl;

pub const EMPTY_STATE: &str = "No tasks yet. Add one above!";

pub fn draw(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Length(6),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(f.area());

    let heading = Paragraph::new(Line::from(Span::styled(
        "Task Manager",
        Style::default().add_modifier(Modifier::BOLD),
    )))
    .alignment(Alignment::Center);
    f.render_widget(heading, chunks[0]);

    let filter_focused = app.focus() == Focus::Filter;
    let filters = Paragraph::new(FilterControl::render(app.board().filter(), filter_focused))
        .alignment(Alignment::Center)
        .block(pane("Filter", filter_focused));
    f.render_widget(filters, chunks[1]);

    let form_focused = app.focus() == Focus::Form;
    let form = Paragraph::new(app.form().render(form_focused))
        .block(pane("New Task (Enter to add)", form_focused));
    f.render_widget(form, chunks[2]);

    draw_tasks(f, app, chunks[3]);

    f.render_widget(
        Paragraph::new(Line::from(Span::styled(
            footer_help(app),
            Style::default().fg(Color::Gray),
        ))),
        chunks[4],
    );

    if let Some(message) = app.notice() {
        draw_notice(f, message);
    }
}

fn pane(title: &str, focused: bool) -> Block<'_> {
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(if focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default()
        })
}

fn draw_tasks(f: &mut Frame, app: &App, area: Rect) {
    let focused = app.focus() == Focus::Tasks;
    let title = format!("Tasks ({})", app.cards().len());
    let block = pane(&title, focused);
    let inner = block.inner(area);
    f.render_widget(block, area);

    if app.cards().is_empty() {
        let empty = Paragraph::new(Line::from(Span::styled(
            EMPTY_STATE,
            Style::default().fg(Color::DarkGray),
        )))
        .alignment(Alignment::Center);
        f.render_widget(empty, inner);
        return;
    }

    let heights: Vec<u16> = app
        .cards()
        .iter()
        .enumerate()
        .map(|(i, card)| card.height(focused && i == app.selected(), inner.width))
        .collect();
    let first = first_visible(&heights, app.selected(), inner.height);
    let bottom = inner.y + inner.height;
    let mut y = inner.y;

    for (i, card) in app.cards().iter().enumerate().skip(first) {
        if y >= bottom {
            break;
        }
        let selected = focused && i == app.selected();
        let rect = Rect::new(inner.x, y, inner.width, heights[i].min(bottom - y));
        let border = if selected {
            Style::default().fg(Color::Cyan)
        } else if i == app.selected() {
            Style::default().fg(Color::Gray)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let widget = Paragraph::new(card.render(selected))
            .wrap(Wrap { trim: false })
            .block(
                Block::default()
                    .title(format!("#{}", card.id()))
                    .borders(Borders::ALL)
                    .border_style(border),
            );
        f.render_widget(widget, rect);
        y = y.saturating_add(heights[i]);
    }
}

/// Smallest scroll offset that still shows the whole selected card.
fn first_visible(heights: &[u16], selected: usize, available: u16) -> usize {
    let selected = selected.min(heights.len().saturating_sub(1));
    let mut first = 0;
    let span = |first: usize| -> u32 {
        heights[first..=selected]
            .iter()
            .map(|&h| u32::from(h))
            .sum()
    };
    while first < selected && span(first) > u32::from(available) {
        first += 1;
    }
    first
}

fn footer_help(app: &App) -> &'static str {
    if app.notice().is_some() {
        return "Enter/Esc: dismiss";
    }
    match app.focus() {
        Focus::Filter => "←/→ or 1-4: filter  Tab: next pane  q: quit",
        Focus::Form => "Type to fill  ↑/↓: field  ←/→: status  Enter: add  Tab: next pane  Ctrl+C: quit",
        Focus::Tasks => {
            let editing = app
                .cards()
                .get(app.selected())
                .is_some_and(|c| c.is_editing());
            if editing {
                "↑/↓: field  Enter: save  Esc: cancel  Tab: next pane"
            } else {
                "↑/↓: select  e: edit  d: delete  Tab: next pane  q: quit"
            }
        }
    }
}

fn draw_notice(f: &mut Frame, message: &str) {
    let area = centered_rect(50, 5, f.area());
    let body = vec![
        Line::from(Span::styled(
            message.to_string(),
            Style::default()
                .fg(Color::LightRed)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from("Press Enter to continue"),
    ];
    let dialog = Paragraph::new(body).alignment(Alignment::Center).block(
        Block::default()
            .title("Notice")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::LightRed)),
    );
    f.render_widget(Clear, area);
    f.render_widget(dialog, area);
}

fn centered_rect(percent_x: u16, height: u16, r: Rect) -> Rect {
    let width = (r.width * percent_x / 100).max(30).min(r.width);
    let height = height.min(r.height);
    Rect::new(
        r.x + (r.width - width) / 2,
        r.y + (r.height - height) / 2,
        width,
        height,
    )
}
