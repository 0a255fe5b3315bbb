//! Packet table.
//!
//! Shows the visible window (at most the last K filtered records) with the
//! cursor row highlighted and the selected record marked.

use ratatui::{
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    text::Span,
    widgets::{Block, BorderType, Borders, Cell, Row, Table},
    Frame,
};

use crate::app::{App, Focus};
use crate::models::Record;

use super::theme::{
    COLOR_ACCENT, COLOR_BORDER, COLOR_DIM, COLOR_FOCUS, COLOR_HEADER, COLOR_HIGHLIGHT_BG,
    COLOR_SELECTED,
};

const COLUMNS: [&str; 6] = ["#", "Time", "Type", "Source", "Destination", "Info"];

const WIDTHS: [Constraint; 6] = [
    Constraint::Percentage(5),
    Constraint::Percentage(15),
    Constraint::Percentage(10),
    Constraint::Percentage(15),
    Constraint::Percentage(15),
    Constraint::Fill(1),
];

/// Table cells for one record.
pub fn record_cells(record: &Record) -> [String; 6] {
    [
        record.id.to_string(),
        record.timestamp_text(),
        record.kind.clone().unwrap_or_default(),
        record.source.clone().unwrap_or_default(),
        record.destination.clone().unwrap_or_default(),
        record.info.clone().unwrap_or_default(),
    ]
}

pub fn render_packet_list(frame: &mut Frame, area: Rect, app: &mut App) {
    let selected = app.view.selection();
    let visible = app.view.visible_records();
    let cursor = app.cursor_position(&visible);

    let rows: Vec<Row<'static>> = visible
        .iter()
        .map(|record| {
            let style = if Some(record.id) == selected {
                Style::default().fg(COLOR_SELECTED).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(COLOR_ACCENT)
            };
            Row::new(record_cells(record).map(Cell::from)).style(style)
        })
        .collect();

    let title = format!(
        " packets {}/{} ",
        visible.len(),
        app.view.store().len()
    );
    let border_color = if app.focus == Focus::PacketList {
        COLOR_FOCUS
    } else {
        COLOR_BORDER
    };

    let header = Row::new(COLUMNS).style(
        Style::default()
            .fg(COLOR_HEADER)
            .add_modifier(Modifier::BOLD),
    );

    let table = Table::new(rows, WIDTHS)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(border_color))
                .title(Span::styled(title, Style::default().fg(COLOR_DIM))),
        )
        .row_highlight_style(Style::default().bg(COLOR_HIGHLIGHT_BG));

    app.table_state.select(cursor);
    frame.render_stateful_widget(table, area, &mut app.table_state);
}
