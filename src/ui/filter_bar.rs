//! Filter input line.
//!
//! Greyed out with an explanatory placeholder until the evaluator has been
//! probed successfully.

use ratatui::{
    layout::{Position, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::app::{App, Focus};
use crate::filter::FilterStatus;
use crate::view::EvaluatorState;

use super::theme::{COLOR_ACCENT, COLOR_ACTIVE, COLOR_BORDER, COLOR_DIM, COLOR_ERROR, COLOR_FOCUS, COLOR_PENDING};

const PROMPT: &str = "jq> ";

pub fn render_filter_bar(frame: &mut Frame, area: Rect, app: &App) {
    let focused = app.focus == Focus::FilterBar;
    let enabled = app.view.evaluator_ready();

    let border_color = if focused { COLOR_FOCUS } else { COLOR_BORDER };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(border_color))
        .title(Span::styled(" filter ", Style::default().fg(COLOR_DIM)))
        .title_bottom(filter_state_line(app));

    let content = if !enabled {
        let reason = match app.view.evaluator_state() {
            EvaluatorState::NotReady => "starting jq...".to_string(),
            EvaluatorState::Unavailable(reason) => format!("filtering disabled: {}", reason),
            EvaluatorState::Ready => String::new(),
        };
        Line::from(Span::styled(
            reason,
            Style::default().fg(COLOR_DIM).add_modifier(Modifier::ITALIC),
        ))
    } else if app.filter_input.is_empty() && !focused {
        Line::from(vec![
            Span::styled(PROMPT, Style::default().fg(COLOR_DIM)),
            Span::styled("press / to filter, e.g. .type == \"TCP\"", Style::default().fg(COLOR_DIM)),
        ])
    } else {
        Line::from(vec![
            Span::styled(PROMPT, Style::default().fg(COLOR_DIM)),
            Span::styled(app.filter_input.as_str(), Style::default().fg(COLOR_ACCENT)),
        ])
    };

    let inner = block.inner(area);
    frame.render_widget(Paragraph::new(content).block(block), area);

    if focused && enabled && inner.width > 0 {
        let offset = (PROMPT.width() + app.filter_input.width()) as u16;
        let x = inner.x + offset.min(inner.width.saturating_sub(1));
        frame.set_cursor_position(Position::new(x, inner.y));
    }
}

/// Bottom border text describing the applied filter.
fn filter_state_line(app: &App) -> Line<'static> {
    let (text, color) = match app.view.filter_status() {
        FilterStatus::Unfiltered => return Line::default(),
        FilterStatus::Pending => (" evaluating... ".to_string(), COLOR_PENDING),
        FilterStatus::Applied { matched } => (format!(" {} matched ", matched), COLOR_ACTIVE),
        FilterStatus::Failed { message } => (format!(" {} ", message), COLOR_ERROR),
    };
    Line::from(Span::styled(text, Style::default().fg(color)))
}
