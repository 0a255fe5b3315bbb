//! Small state types shared by the app and the UI.

use crate::websocket::WsConnectionState;

/// Which widget receives key input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    PacketList,
    FilterBar,
}

/// Feed connection status as shown in the status line
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ConnectionStatus {
    #[default]
    Connecting,
    Connected,
    Reconnecting { attempt: u8 },
    Disconnected,
    Failed(String),
}

impl From<WsConnectionState> for ConnectionStatus {
    fn from(state: WsConnectionState) -> Self {
        match state {
            WsConnectionState::Connected => ConnectionStatus::Connected,
            WsConnectionState::Reconnecting { attempt } => ConnectionStatus::Reconnecting { attempt },
            WsConnectionState::Disconnected => ConnectionStatus::Disconnected,
        }
    }
}

impl ConnectionStatus {
    pub fn label(&self) -> String {
        match self {
            ConnectionStatus::Connecting => "connecting".to_string(),
            ConnectionStatus::Connected => "connected".to_string(),
            ConnectionStatus::Reconnecting { attempt } => format!("reconnecting ({})", attempt),
            ConnectionStatus::Disconnected => "disconnected".to_string(),
            ConnectionStatus::Failed(_) => "offline".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_focus_default() {
        assert_eq!(Focus::default(), Focus::PacketList);
    }

    #[test]
    fn test_connection_status_from_ws_state() {
        assert_eq!(
            ConnectionStatus::from(WsConnectionState::Reconnecting { attempt: 2 }),
            ConnectionStatus::Reconnecting { attempt: 2 }
        );
        assert_eq!(
            ConnectionStatus::from(WsConnectionState::Connected).label(),
            "connected"
        );
        assert_eq!(
            ConnectionStatus::Reconnecting { attempt: 3 }.label(),
            "reconnecting (3)"
        );
    }
}
