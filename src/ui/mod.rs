//! UI rendering for the packet viewer
//!
//! Layout, top to bottom:
//! - Filter bar (3 rows)
//! - Packet table, split with the detail pane while a record is selected
//! - Status line (1 row)

mod filter_bar;
mod packet_detail;
mod packet_list;
mod status;
mod theme;

pub use packet_detail::detail_lines;
pub use packet_list::record_cells;
pub use theme::{
    COLOR_ACCENT, COLOR_ACTIVE, COLOR_BORDER, COLOR_DIM, COLOR_ERROR, COLOR_FOCUS, COLOR_HEADER,
    COLOR_PENDING,
};

use ratatui::{
    layout::{Constraint, Direction, Layout},
    Frame,
};

use crate::app::App;
use filter_bar::render_filter_bar;
use packet_detail::render_packet_detail;
use packet_list::render_packet_list;
use status::render_status;

/// Render the whole screen
pub fn render(frame: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Filter bar
            Constraint::Min(3),    // Packets (+ detail)
            Constraint::Length(1), // Status
        ])
        .split(frame.area());

    render_filter_bar(frame, chunks[0], app);

    if app.view.selection().is_some() {
        let main = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(chunks[1]);
        render_packet_list(frame, main[0], app);
        render_packet_detail(frame, main[1], app);
    } else {
        render_packet_list(frame, chunks[1], app);
    }

    render_status(frame, chunks[2], app);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::{AppMessage, Focus};
    use crate::filter::EvaluationOutcome;
    use crate::models::{Header, RawRecord, Record};
    use ratatui::{backend::TestBackend, Terminal};

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        let width = buffer.area.width as usize;
        buffer
            .content()
            .chunks(width)
            .map(|row| row.iter().map(|c| c.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn draw(app: &mut App, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|f| render(f, app)).unwrap();
        buffer_text(&terminal)
    }

    fn sample_app() -> App {
        let mut app = App::new();
        let tcp = Record::new(1)
            .with_kind("TCP")
            .with_endpoints("10.0.0.1:443", "10.0.0.2:5000")
            .with_info("SYN")
            .with_header(Header::new().with("_summary", "Transmission Control").with("flags", "S"));
        let udp = Record::new(2).with_kind("UDP").with_endpoints("10.0.0.3:53", "10.0.0.2:6000");
        app.handle_message(AppMessage::PacketBatch(vec![
            RawRecord::new(tcp, b"GET / HTTP/1.1".to_vec()),
            RawRecord::new(udp, vec![0x00, 0x01]),
        ]));
        app
    }

    #[test]
    fn test_render_table_rows() {
        let mut app = sample_app();
        let screen = draw(&mut app, 120, 20);
        assert!(screen.contains("Destination"));
        assert!(screen.contains("10.0.0.1:443"));
        assert!(screen.contains("UDP"));
        assert!(screen.contains("packets 2/2"));
        assert!(screen.contains("starting jq"));
    }

    #[test]
    fn test_render_detail_pane() {
        let mut app = sample_app();
        app.view.toggle_selection(1);
        let screen = draw(&mut app, 120, 30);
        assert!(screen.contains("packet 1"));
        assert!(screen.contains("Transmission Control"));
        assert!(screen.contains("flags"));
        assert!(screen.contains("Payload (14 bytes)"));
        assert!(screen.contains("GET / HTTP/1.1"));
    }

    #[test]
    fn test_render_filtered_view() {
        let mut app = sample_app();
        app.handle_message(AppMessage::EvaluatorReady);
        app.filter_input = ".type == \"UDP\"".to_string();
        app.submit_filter();
        let generation = app.view.filter().generation();
        app.handle_message(AppMessage::FilterEvaluated(EvaluationOutcome {
            generation,
            start: 0,
            len: 2,
            result: Ok(vec![false, true]),
        }));

        let screen = draw(&mut app, 120, 20);
        assert!(screen.contains("packets 1/2"));
        assert!(screen.contains("1 matched"));
        assert!(!screen.contains("10.0.0.1:443"));
    }

    #[test]
    fn test_render_error_in_status() {
        let mut app = sample_app();
        app.handle_message(AppMessage::EvaluatorUnavailable("jq not found".to_string()));
        let screen = draw(&mut app, 120, 20);
        assert!(screen.contains("filtering disabled: jq not found"));
    }

    #[test]
    fn test_render_tiny_terminal() {
        let mut app = sample_app();
        app.focus = Focus::FilterBar;
        app.view.toggle_selection(2);
        app.detail_scroll = 500;
        // Must not panic
        draw(&mut app, 10, 5);
        assert!(app.detail_scroll < 500);
    }
}
