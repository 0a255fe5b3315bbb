//! Application state and logic.
//!
//! [`App`] owns the [`ViewController`] plus everything that only matters to
//! the terminal front end: the filter input line, focus, the table cursor and
//! the connection status. Async work (feed, evaluator) talks to it exclusively
//! through [`AppMessage`]s.

mod filter;
mod handlers;
mod messages;
mod types;
mod websocket;

pub use filter::{
    probe_evaluator, run_evaluation_worker, start_evaluator, EvaluationInbox, EvaluationQueue,
};
pub use messages::AppMessage;
pub use types::{ConnectionStatus, Focus};
pub use websocket::{route_feed, spawn_feed};

use ratatui::widgets::TableState;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::error::SnifferError;
use crate::filter::EvaluationRequest;
use crate::models::Record;
use crate::view::ViewController;

/// Main application state
pub struct App {
    /// Store, filter and selection
    pub view: ViewController,
    /// Text in the filter bar (not yet applied until submitted)
    pub filter_input: String,
    /// Which widget receives keys
    pub focus: Focus,
    /// Id of the highlighted row when not following the tail
    pub cursor: Option<u64>,
    /// Keep the highlight on the newest record
    pub follow_tail: bool,
    /// Table scroll state, kept across frames
    pub table_state: TableState,
    /// Detail pane scroll offset in lines
    pub detail_scroll: u16,
    /// Feed connection status
    pub connection: ConnectionStatus,
    /// Last error worth showing to the user
    pub last_error: Option<String>,
    /// Flag to track if the app should quit
    pub should_quit: bool,
    /// Dirty flag: redraw on the next loop iteration
    pub needs_redraw: bool,
    /// Tick counter for the main loop
    pub tick_count: u64,
    /// Receiver for async messages
    pub message_rx: Option<mpsc::UnboundedReceiver<AppMessage>>,
    /// Sender for async messages (clone this to pass to async tasks)
    pub message_tx: mpsc::UnboundedSender<AppMessage>,
    evaluations: Option<EvaluationQueue>,
}

impl App {
    pub fn new() -> Self {
        Self::with_view(ViewController::new())
    }

    pub fn with_view(view: ViewController) -> Self {
        let (message_tx, message_rx) = mpsc::unbounded_channel();
        Self {
            view,
            filter_input: String::new(),
            focus: Focus::PacketList,
            cursor: None,
            follow_tail: true,
            table_state: TableState::default(),
            detail_scroll: 0,
            connection: ConnectionStatus::Connecting,
            last_error: None,
            should_quit: false,
            needs_redraw: true,
            tick_count: 0,
            message_rx: Some(message_rx),
            message_tx,
            evaluations: None,
        }
    }

    /// Route evaluation requests to `queue`.
    pub fn attach_evaluations(&mut self, queue: EvaluationQueue) {
        self.evaluations = Some(queue);
    }

    pub fn mark_dirty(&mut self) {
        self.needs_redraw = true;
    }

    pub fn tick(&mut self) {
        self.tick_count = self.tick_count.wrapping_add(1);
    }

    /// Mark the app to quit
    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    fn dispatch(&mut self, request: Option<EvaluationRequest>) {
        let Some(request) = request else {
            return;
        };
        match &self.evaluations {
            Some(queue) => {
                if !queue.submit(request) {
                    warn!("Evaluation worker is gone, filter will not update");
                }
            }
            None => debug!("No evaluation worker attached, dropping request"),
        }
    }

    /// Log `err` and show it in the status line with a recovery hint.
    pub fn report_error(&mut self, err: impl Into<SnifferError>) {
        let err = err.into();
        warn!(
            "[{}] {} ({})",
            err.category(),
            err,
            err.error_code()
        );
        self.last_error = Some(format!("{} {}", err.user_message(), err.recovery_hint()));
    }

    /// Apply the filter bar text as the predicate.
    pub fn submit_filter(&mut self) {
        let text = self.filter_input.clone();
        match self.view.set_predicate(&text) {
            Ok(request) => {
                self.last_error = None;
                match request {
                    Some(request) => self.dispatch(Some(request)),
                    None => {
                        // Cleared: queued work for the old predicate is moot
                        if let Some(queue) = &self.evaluations {
                            queue.supersede(self.view.filter().generation());
                        }
                    }
                }
                self.focus = Focus::PacketList;
            }
            Err(e) => self.report_error(e),
        }
    }

    /// Index of the highlighted row within `visible`.
    pub fn cursor_position(&self, visible: &[&Record]) -> Option<usize> {
        if visible.is_empty() {
            return None;
        }
        let last = visible.len() - 1;
        if self.follow_tail {
            return Some(last);
        }
        let Some(id) = self.cursor else {
            return Some(last);
        };
        // The cursor record may have been filtered out; land on the next
        // visible record in arrival order
        let position = visible
            .iter()
            .position(|r| r.id == id)
            .or_else(|| {
                let store = self.view.store();
                let slot = store.resolve_by_id(id).ok()?;
                visible
                    .iter()
                    .position(|r| store.resolve_by_id(r.id).is_ok_and(|s| s > slot))
            })
            .unwrap_or(last);
        Some(position)
    }

    /// Move the highlight by `delta` rows. Leaves follow mode.
    pub fn move_cursor(&mut self, delta: isize) {
        let visible = self.view.visible_records();
        let Some(position) = self.cursor_position(&visible) else {
            return;
        };
        let target = position
            .saturating_add_signed(delta)
            .min(visible.len() - 1);
        self.cursor = Some(visible[target].id);
        self.follow_tail = false;
    }

    /// Highlight the newest record and keep following new arrivals.
    pub fn follow(&mut self) {
        self.follow_tail = true;
        self.cursor = None;
    }

    /// Id of the highlighted record.
    pub fn highlighted_id(&self) -> Option<u64> {
        let visible = self.view.visible_records();
        self.cursor_position(&visible).map(|i| visible[i].id)
    }

    /// Toggle selection of the highlighted record.
    pub fn toggle_highlighted(&mut self) {
        if let Some(id) = self.highlighted_id() {
            self.view.toggle_selection(id);
            self.detail_scroll = 0;
        }
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}
