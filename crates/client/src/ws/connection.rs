//! The push socket: one tokio-tungstenite connection with auto-reconnect.

use std::time::Duration;

use futures_util::{Sink, SinkExt, StreamExt};
use skyportal_shared::{ServerMessage, SocketAuth};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_tungstenite::{connect_async, tungstenite::Message};

use super::{connection_state, ConnectionState, MessageHandler, ReconnectConfig};
use crate::context::ActionContext;

/// A managed connection to the portal's WebSocket endpoint.
///
/// Dropping it stops the loop the same way [`WsConnection::close`] does.
pub struct WsConnection {
    pub url: String,
    state: watch::Receiver<ConnectionState>,
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl WsConnection {
    /// Start the connection loop in a background task.
    ///
    /// Every state change is dispatched as `WEBSOCKET_STATE`; decoded
    /// messages go to `handler`.
    pub fn spawn(
        url: impl Into<String>,
        token: Option<String>,
        ctx: ActionContext,
        handler: MessageHandler,
        reconnect_config: ReconnectConfig,
    ) -> Self {
        let url = url.into();
        let (state_tx, state) = watch::channel(ConnectionState::Disconnected);
        let (shutdown, shutdown_rx) = watch::channel(false);

        let task = tokio::spawn(connection_loop(
            url.clone(),
            token,
            ctx,
            handler,
            reconnect_config,
            state_tx,
            shutdown_rx,
        ));

        Self {
            url,
            state,
            shutdown,
            task,
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state.borrow().clone()
    }

    pub fn watch_state(&self) -> watch::Receiver<ConnectionState> {
        self.state.clone()
    }

    /// Ask the loop to close the socket and stop reconnecting.
    pub fn close(&self) {
        let _ = self.shutdown.send(true);
    }

    /// Close and wait for the loop to finish.
    pub async fn shutdown(self) {
        self.close();
        if let Err(e) = self.task.await {
            tracing::error!(error = %e, "websocket task ended abnormally");
        }
    }
}

struct StateReporter {
    tx: watch::Sender<ConnectionState>,
    ctx: ActionContext,
}

impl StateReporter {
    fn set(&self, state: ConnectionState) {
        tracing::debug!(?state, "websocket state");
        self.ctx.dispatch(connection_state(&state));
        self.tx.send_replace(state);
    }
}

/// Send the token frame the server expects before anything else.
async fn authenticate<S>(write: &mut S, token: &str) -> anyhow::Result<()>
where
    S: Sink<Message> + Unpin,
    S::Error: std::error::Error + Send + Sync + 'static,
{
    let auth = SocketAuth {
        auth_token: token.to_owned(),
    };
    let json = serde_json::to_string(&auth)?;
    write.send(Message::Text(json.into())).await?;
    Ok(())
}

async fn connection_loop(
    url: String,
    token: Option<String>,
    ctx: ActionContext,
    handler: MessageHandler,
    reconnect_config: ReconnectConfig,
    state_tx: watch::Sender<ConnectionState>,
    mut shutdown: watch::Receiver<bool>,
) {
    let state = StateReporter {
        tx: state_tx,
        ctx: ctx.clone(),
    };
    let mut attempt = 0u32;

    loop {
        if *shutdown.borrow() {
            break;
        }

        if attempt == 0 {
            state.set(ConnectionState::Connecting);
        } else {
            state.set(ConnectionState::Reconnecting { attempt });
        }

        let delay = match connect_async(url.as_str()).await {
            Ok((ws_stream, _response)) => {
                state.set(ConnectionState::Connected);
                attempt = 0;
                tracing::info!(url = %url, "websocket connected");

                let (mut write, mut read) = ws_stream.split();

                let authenticated = match &token {
                    Some(token) => match authenticate(&mut write, token).await {
                        Ok(()) => true,
                        Err(e) => {
                            tracing::error!(error = %e, "websocket auth failed");
                            false
                        }
                    },
                    None => true,
                };

                while authenticated {
                    tokio::select! {
                        _ = shutdown.changed() => {
                            let _ = write.send(Message::Close(None)).await;
                            state.set(ConnectionState::Disconnected);
                            return;
                        }
                        frame = read.next() => match frame {
                            Some(Ok(Message::Text(text))) => {
                                match serde_json::from_str::<ServerMessage>(text.as_str()) {
                                    Ok(msg) => {
                                        tracing::debug!(action_type = %msg.action_type, "websocket received");
                                        handler.handle(&msg, &ctx);
                                    }
                                    Err(e) => tracing::warn!(error = %e, "dropping undecodable frame"),
                                }
                            }
                            Some(Ok(Message::Close(_))) => {
                                tracing::info!(url = %url, "websocket received close frame");
                                break;
                            }
                            Some(Ok(Message::Ping(data))) => {
                                // Pong is handled automatically by tungstenite
                                tracing::trace!(len = data.len(), "received ping");
                            }
                            Some(Ok(_)) => {}
                            Some(Err(e)) => {
                                tracing::error!(error = %e, "websocket read error");
                                break;
                            }
                            None => break,
                        }
                    }
                }

                tracing::info!(url = %url, "websocket closed");
                state.set(ConnectionState::Disconnected);
                reconnect_config.delay_for_attempt(0)
            }
            Err(e) => {
                tracing::error!(url = %url, error = %e, "websocket connect failed");

                if reconnect_config.max_attempts > 0 && attempt >= reconnect_config.max_attempts {
                    state.set(ConnectionState::Failed {
                        reason: format!(
                            "Max reconnect attempts ({}) exceeded",
                            reconnect_config.max_attempts
                        ),
                    });
                    return;
                }

                let delay = reconnect_config.delay_for_attempt(attempt);
                attempt += 1;
                delay
            }
        };

        tracing::info!(url = %url, delay_ms = delay, attempt, "reconnecting");
        tokio::select! {
            _ = shutdown.changed() => break,
            _ = tokio::time::sleep(Duration::from_millis(u64::from(delay))) => {}
        }
    }

    state.set(ConnectionState::Disconnected);
}
