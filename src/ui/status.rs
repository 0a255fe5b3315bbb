//! One-line status bar: connection, counts, last error and key hints.

use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::app::{App, ConnectionStatus, Focus};

use super::theme::{COLOR_ACTIVE, COLOR_DIM, COLOR_ERROR, COLOR_PENDING};

pub fn render_status(frame: &mut Frame, area: Rect, app: &App) {
    let connection_color = match app.connection {
        ConnectionStatus::Connected => COLOR_ACTIVE,
        ConnectionStatus::Connecting | ConnectionStatus::Reconnecting { .. } => COLOR_PENDING,
        ConnectionStatus::Disconnected | ConnectionStatus::Failed(_) => COLOR_ERROR,
    };

    let mut spans = vec![
        Span::styled(format!(" ● {}", app.connection.label()), Style::default().fg(connection_color)),
        Span::styled(
            format!("  {} captured", app.view.store().len()),
            Style::default().fg(COLOR_DIM),
        ),
    ];

    if let Some(error) = &app.last_error {
        spans.push(Span::styled(format!("  {}", error), Style::default().fg(COLOR_ERROR)));
    } else {
        let hints = match app.focus {
            Focus::PacketList => "  ↑↓ move  enter expand  / filter  G follow  q quit",
            Focus::FilterBar => "  enter apply  esc back",
        };
        spans.push(Span::styled(hints, Style::default().fg(COLOR_DIM)));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
