//! Message and key handling for the App.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::{debug, info};

use crate::error::FilterError;
use crate::view::EvaluatorState;

use super::{App, AppMessage, ConnectionStatus, Focus};

/// Lines moved by PageUp/PageDown in the detail pane
const DETAIL_PAGE: u16 = 10;

impl App {
    /// Handle an incoming async message
    /// All message handlers mark the app as dirty since they update visible state.
    pub fn handle_message(&mut self, msg: AppMessage) {
        self.mark_dirty();
        match msg {
            AppMessage::PacketBatch(batch) => {
                debug!("Ingesting batch of {} packets", batch.len());
                let request = self.view.ingest(batch);
                self.dispatch(request);
            }
            AppMessage::WsConnected => {
                self.connection = ConnectionStatus::Connected;
            }
            AppMessage::WsDisconnected => {
                self.connection = ConnectionStatus::Disconnected;
            }
            AppMessage::WsReconnecting { attempt } => {
                self.connection = ConnectionStatus::Reconnecting { attempt };
            }
            AppMessage::FeedError(err) => {
                self.connection = ConnectionStatus::Failed(err.to_string());
                self.report_error(err);
            }
            AppMessage::EvaluatorReady => {
                info!("Filtering enabled");
                self.view.set_evaluator_state(EvaluatorState::Ready);
            }
            AppMessage::EvaluatorUnavailable(reason) => {
                self.report_error(FilterError::EvaluatorUnavailable {
                    reason: reason.clone(),
                });
                self.view
                    .set_evaluator_state(EvaluatorState::Unavailable(reason));
            }
            AppMessage::FilterEvaluated(outcome) => {
                self.view.apply_evaluation(outcome);
            }
        }
    }

    /// Handle a key press.
    pub fn handle_key(&mut self, key: KeyEvent) {
        self.mark_dirty();

        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.quit();
            return;
        }

        match self.focus {
            Focus::PacketList => self.handle_list_key(key),
            Focus::FilterBar => self.handle_filter_key(key),
        }
    }

    /// Handle a bracketed paste. Only the filter bar accepts text.
    pub fn handle_paste(&mut self, text: &str) {
        if self.focus != Focus::FilterBar {
            return;
        }
        self.mark_dirty();
        let line = text.replace(['\r', '\n'], " ");
        self.filter_input.push_str(&line);
    }

    fn handle_list_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.quit(),
            KeyCode::Up | KeyCode::Char('k') => self.move_cursor(-1),
            KeyCode::Down | KeyCode::Char('j') => self.move_cursor(1),
            KeyCode::End | KeyCode::Char('G') => self.follow(),
            KeyCode::Enter => self.toggle_highlighted(),
            KeyCode::Esc => self.view.clear_selection(),
            KeyCode::PageDown => {
                self.detail_scroll = self.detail_scroll.saturating_add(DETAIL_PAGE);
            }
            KeyCode::PageUp => {
                self.detail_scroll = self.detail_scroll.saturating_sub(DETAIL_PAGE);
            }
            KeyCode::Char('/') | KeyCode::Tab => self.focus = Focus::FilterBar,
            _ => {}
        }
    }

    fn handle_filter_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => self.submit_filter(),
            KeyCode::Esc | KeyCode::Tab => self.focus = Focus::PacketList,
            KeyCode::Backspace => {
                self.filter_input.pop();
            }
            KeyCode::Char(c) => self.filter_input.push(c),
            _ => {}
        }
    }
}
