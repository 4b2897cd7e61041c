//! Server push over a WebSocket.
//!
//! ```text
//!   server ──frame──▶ WsConnection ──ServerMessage──▶ MessageHandler
//!                          │                             │ subscribers(msg, state)
//!                          │ WEBSOCKET_STATE             ▼
//!                          ▼                          Vec<Effect> ──spawn──▶ action creators
//!                        Store ◀──────────────────────────────────────────── dispatch
//! ```
//!
//! The connection only decodes frames and reports its own state. What a
//! message means is decided by the subscribers each resource registers,
//! and the follow-up work they ask for runs on its own task.

mod connection;
mod handler;

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::store::{Action, Reducer};

pub use connection::WsConnection;
pub use handler::{Effect, MessageHandler, Subscriber};

pub const SLICE: &str = "websocket";

pub const WEBSOCKET_STATE: &str = "baselayer/WEBSOCKET_STATE";

/// Connection state for the push socket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connecting,
    Connected,
    Reconnecting { attempt: u32 },
    Failed { reason: String },
}

impl ConnectionState {
    pub fn is_connected(&self) -> bool {
        matches!(self, ConnectionState::Connected)
    }

    pub fn is_connecting(&self) -> bool {
        matches!(
            self,
            ConnectionState::Connecting | ConnectionState::Reconnecting { .. }
        )
    }
}

/// Configuration for auto-reconnect behavior
#[derive(Debug, Clone, PartialEq)]
pub struct ReconnectConfig {
    /// Maximum number of reconnect attempts (0 = infinite)
    pub max_attempts: u32,
    /// Initial delay in milliseconds
    pub initial_delay_ms: u32,
    /// Maximum delay in milliseconds
    pub max_delay_ms: u32,
    /// Multiplier for exponential backoff
    pub backoff_multiplier: f32,
}

impl Default for ReconnectConfig {
    fn default() -> Self {
        Self {
            max_attempts: 10,
            initial_delay_ms: 1000,
            max_delay_ms: 30000,
            backoff_multiplier: 1.5,
        }
    }
}

impl ReconnectConfig {
    /// Calculate delay for a given attempt number
    pub fn delay_for_attempt(&self, attempt: u32) -> u32 {
        let delay = self.initial_delay_ms as f32 * self.backoff_multiplier.powi(attempt as i32);
        (delay as u32).min(self.max_delay_ms)
    }
}

pub fn connection_state(state: &ConnectionState) -> Action {
    Action::with_data(
        WEBSOCKET_STATE,
        serde_json::to_value(state).unwrap_or_default(),
    )
}

pub struct ConnectionReducer;

impl Reducer for ConnectionReducer {
    type State = ConnectionState;

    fn initial_state(&self) -> ConnectionState {
        ConnectionState::Disconnected
    }

    fn reduce(&self, state: &Arc<ConnectionState>, action: &Action) -> Arc<ConnectionState> {
        if !action.is(WEBSOCKET_STATE) {
            return Arc::clone(state);
        }
        match action.payload::<ConnectionState>() {
            Some(next) if next != **state => Arc::new(next),
            _ => Arc::clone(state),
        }
    }
}
