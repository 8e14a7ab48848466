//! Live channel client
//!
//! 1. Connect to `/api/boards/{id}/live` (owner token as `?token=` when set)
//! 2. Forward every [`LiveMessage`] to the returned receiver
//! 3. Send `{"type":"ping"}` every `ping_interval`
//! 4. Reconnect with exponential backoff; after the last attempt park in
//!    [`ConnectionState::Exhausted`] until [`LiveHandle::retry`]

use futures::{SinkExt, StreamExt};
use shared::live::{LiveCommand, LiveMessage};
use std::sync::Arc;
use tokio::sync::{Notify, mpsc, watch};
use tokio_tungstenite::tungstenite::Message;
use tokio_util::sync::CancellationToken;

use crate::reconnect::{Backoff, ConnectionState};
use crate::{ClientConfig, LiveConfig, LiveError};

/// Buffered live messages before the consumer applies back-pressure
const MESSAGE_BUFFER: usize = 256;

/// Handle to a running live connection
pub struct LiveHandle {
    state: watch::Receiver<ConnectionState>,
    messages: mpsc::Receiver<LiveMessage>,
    retry: Arc<Notify>,
    shutdown: CancellationToken,
}

impl LiveHandle {
    pub fn state(&self) -> ConnectionState {
        *self.state.borrow()
    }

    /// Watch connection state changes
    pub fn subscribe_state(&self) -> watch::Receiver<ConnectionState> {
        self.state.clone()
    }

    /// Next live message; `None` once the connection task has stopped
    pub async fn recv(&mut self) -> Option<LiveMessage> {
        self.messages.recv().await
    }

    /// Manual retry after [`ConnectionState::Exhausted`]; resets the backoff
    pub fn retry(&self) {
        self.retry.notify_one();
    }

    pub fn close(&self) {
        self.shutdown.cancel();
    }
}

impl Drop for LiveHandle {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

/// Build the WebSocket URL for `board_id` from an http(s) base URL
pub fn live_url(base_url: &str, board_id: i64, token: Option<&str>) -> Result<String, LiveError> {
    let base = base_url.trim_end_matches('/');
    let ws_base = if let Some(rest) = base.strip_prefix("https://") {
        format!("wss://{rest}")
    } else if let Some(rest) = base.strip_prefix("http://") {
        format!("ws://{rest}")
    } else if base.starts_with("ws://") || base.starts_with("wss://") {
        base.to_string()
    } else {
        return Err(LiveError::InvalidUrl(base_url.to_string()));
    };

    let mut url = format!("{ws_base}/api/boards/{board_id}/live");
    if let Some(token) = token {
        url.push_str("?token=");
        url.push_str(token);
    }
    Ok(url)
}

/// Start the live connection task for `board_id`
pub fn connect(
    client: &ClientConfig,
    live: LiveConfig,
    board_id: i64,
) -> Result<LiveHandle, LiveError> {
    let url = live_url(&client.base_url, board_id, client.token.as_deref())?;
    let (state_tx, state_rx) = watch::channel(ConnectionState::Connecting);
    let (message_tx, message_rx) = mpsc::channel(MESSAGE_BUFFER);
    let retry = Arc::new(Notify::new());
    let shutdown = CancellationToken::new();

    let worker = LiveWorker {
        url,
        board_id,
        config: live,
        state: state_tx,
        messages: message_tx,
        retry: retry.clone(),
        shutdown: shutdown.clone(),
    };
    tokio::spawn(worker.run());

    Ok(LiveHandle {
        state: state_rx,
        messages: message_rx,
        retry,
        shutdown,
    })
}

struct LiveWorker {
    url: String,
    board_id: i64,
    config: LiveConfig,
    state: watch::Sender<ConnectionState>,
    messages: mpsc::Sender<LiveMessage>,
    retry: Arc<Notify>,
    shutdown: CancellationToken,
}

impl LiveWorker {
    async fn run(self) {
        let mut backoff = Backoff::from_config(&self.config);

        loop {
            if self.shutdown.is_cancelled() {
                break;
            }
            self.state.send_replace(ConnectionState::Connecting);

            match tokio_tungstenite::connect_async(self.url.as_str()).await {
                Ok((ws, _response)) => {
                    tracing::info!(board_id = self.board_id, "Live channel connected");
                    backoff.reset();
                    self.state.send_replace(ConnectionState::Connected);
                    if let Err(e) = self.run_session(ws).await {
                        tracing::warn!(board_id = self.board_id, "Live session ended: {e}");
                    }
                    if self.shutdown.is_cancelled() || self.messages.is_closed() {
                        break;
                    }
                }
                Err(e) => {
                    tracing::warn!(board_id = self.board_id, "Live connection failed: {e}");
                }
            }

            match backoff.next_delay() {
                Some(delay) => {
                    self.state.send_replace(ConnectionState::Reconnecting {
                        attempt: backoff.attempt(),
                        delay,
                    });
                    tokio::select! {
                        _ = self.shutdown.cancelled() => break,
                        _ = tokio::time::sleep(delay) => {},
                    }
                }
                None => {
                    tracing::warn!(board_id = self.board_id, "Live reconnect attempts exhausted");
                    self.state.send_replace(ConnectionState::Exhausted);
                    tokio::select! {
                        _ = self.shutdown.cancelled() => break,
                        _ = self.retry.notified() => backoff.reset(),
                    }
                }
            }
        }

        tracing::info!(board_id = self.board_id, "Live channel stopped");
    }

    /// Run one connection until it closes, errors or shutdown is requested
    async fn run_session<S>(&self, ws: S) -> Result<(), LiveError>
    where
        S: futures::Stream<Item = Result<Message, tokio_tungstenite::tungstenite::Error>>
            + futures::Sink<Message, Error = tokio_tungstenite::tungstenite::Error>
            + Unpin,
    {
        let (mut sink, mut stream) = ws.split();
        let ping = serde_json::to_string(&LiveCommand::Ping)?;

        let mut ping_interval = tokio::time::interval(self.config.ping_interval);
        ping_interval.tick().await; // skip immediate tick

        loop {
            tokio::select! {
                _ = self.shutdown.cancelled() => {
                    let _ = sink.close().await;
                    return Ok(());
                }

                _ = ping_interval.tick() => {
                    sink.send(Message::Text(ping.clone().into())).await?;
                }

                msg = stream.next() => {
                    match msg {
                        Some(Ok(Message::Text(text))) => {
                            match serde_json::from_str::<LiveMessage>(text.as_str()) {
                                Ok(message) => {
                                    if self.messages.send(message).await.is_err() {
                                        // Consumer dropped the handle
                                        return Ok(());
                                    }
                                }
                                Err(e) => {
                                    tracing::debug!(board_id = self.board_id, "Ignoring unknown live message: {e}");
                                }
                            }
                        }
                        Some(Ok(Message::Ping(data))) => {
                            let _ = sink.send(Message::Pong(data)).await;
                        }
                        Some(Ok(Message::Close(_))) | None => return Ok(()),
                        Some(Err(e)) => return Err(e.into()),
                        _ => {} // Binary, Pong
                    }
                }
            }
        }
    }
}
