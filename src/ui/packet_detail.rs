//! Detail pane for the selected record: flattened headers, then the hex dump.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

use crate::app::App;
use crate::dump::dump_lines;
use crate::flatten::flatten;
use crate::models::Record;

use super::theme::{COLOR_ACCENT, COLOR_BORDER, COLOR_DIM, COLOR_HEADER};

/// Lines shown for a record and its payload.
pub fn detail_lines(record: &Record, payload: &[u8]) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    for (index, header) in record.headers.iter().enumerate() {
        let title = header
            .summary()
            .map(str::to_string)
            .unwrap_or_else(|| format!("Header {}", index + 1));
        lines.push(Line::from(Span::styled(
            title,
            Style::default().fg(COLOR_HEADER).add_modifier(Modifier::BOLD),
        )));

        let rows = flatten(header);
        let key_width = rows.iter().map(|r| r.key.len()).max().unwrap_or(0);
        for row in rows {
            lines.push(Line::from(vec![
                Span::styled(
                    format!("  {:<width$}  ", row.key, width = key_width),
                    Style::default().fg(COLOR_DIM),
                ),
                Span::styled(row.value, Style::default().fg(COLOR_ACCENT)),
            ]));
        }
    }

    if !lines.is_empty() {
        lines.push(Line::default());
    }
    lines.push(Line::from(Span::styled(
        format!("Payload ({} bytes)", payload.len()),
        Style::default().fg(COLOR_HEADER).add_modifier(Modifier::BOLD),
    )));
    lines.extend(
        dump_lines(payload).map(|l| Line::from(Span::styled(l, Style::default().fg(COLOR_ACCENT)))),
    );
    lines
}

pub fn render_packet_detail(frame: &mut Frame, area: Rect, app: &mut App) {
    let Some((record, payload)) = app.view.selected_detail() else {
        return;
    };
    let lines = detail_lines(record, payload);
    let title = format!(" packet {} ", record.id);

    // Keep at least the last line on screen
    let max_scroll = lines.len().saturating_sub(1).min(u16::MAX as usize) as u16;
    app.detail_scroll = app.detail_scroll.min(max_scroll);

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(COLOR_BORDER))
                .title(Span::styled(title, Style::default().fg(COLOR_DIM))),
        )
        .scroll((app.detail_scroll, 0));
    frame.render_widget(paragraph, area);
}
