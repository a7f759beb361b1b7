//! Shared WebSocket connection state

/// Connection state surfaced in the header bar.
#[derive(Clone, Debug)]
pub enum WsState {
    Connecting,
    Connected,
    Disconnected,
    Error(String),
}

impl WsState {
    #[allow(dead_code)]
    pub fn is_connected(&self) -> bool {
        matches!(self, WsState::Connected)
    }
}
