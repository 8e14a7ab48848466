//! Board live channel
//!
//! GET /api/boards/{board_id}/live[?token=<JWT>]
//! Public boards accept anonymous viewers; private boards require the
//! owner's token as a query parameter (browsers cannot set headers on a
//! WebSocket upgrade). Only the owner receives the full stream; everyone
//! else gets the public projection (see [`LiveViewer`]).
//!
//! Protocol:
//! - Server → client: LiveMessage (position_update, status_update, feedback_animation, pong)
//! - Client → server: LiveCommand (ping)

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use serde::Deserialize;
use shared::live::{LiveCommand, LiveMessage};
use shared::AppError;
use tokio::sync::broadcast;
use tokio::time::{Duration, Instant};

use crate::auth::verify_token;
use crate::error::ServiceError;
use crate::live::{LiveViewer, PublicFeed, Subscription};
use crate::state::AppState;

/// Server ping period; two silent periods close the connection
const PING_INTERVAL: Duration = Duration::from_secs(30);

#[derive(Deserialize)]
pub struct LiveQuery {
    token: Option<String>,
}

pub async fn handle_board_ws(
    State(state): State<AppState>,
    Path(board_id): Path<i64>,
    Query(query): Query<LiveQuery>,
    ws: WebSocketUpgrade,
) -> Result<impl IntoResponse, ServiceError> {
    let board = state
        .bounded(state.store.find_board(board_id))
        .await?
        .ok_or_else(|| AppError::board_not_found(board_id))?;

    let viewer_id = match query.token {
        Some(ref token) => {
            let claims = verify_token(token, &state.jwt_secret).map_err(|e| {
                tracing::debug!(board_id, "Live channel JWT validation failed: {e}");
                e
            })?;
            if !board.is_owned_by(&claims.sub) && !board.is_public {
                return Err(AppError::permission_denied("Board is private")
                    .with_detail("boardId", board_id)
                    .into());
            }
            Some(claims.sub)
        }
        None if board.is_public => None,
        None => return Err(AppError::not_authenticated().into()),
    };

    // Register before upgrading so the cap is reported as an HTTP error
    let subscription = state.hub.register(board_id)?;

    // Snapshot after registering so no move slips between the two
    let viewer = if viewer_id.as_deref().is_some_and(|id| board.is_owned_by(id)) {
        LiveViewer::Owner
    } else {
        let ideas = state.bounded(state.store.list_ideas(board_id)).await?;
        LiveViewer::Public(PublicFeed::new(board, &ideas))
    };

    Ok(ws.on_upgrade(move |socket| board_ws_session(socket, subscription, viewer, viewer_id)))
}

async fn board_ws_session(
    socket: WebSocket,
    mut sub: Subscription,
    mut viewer: LiveViewer,
    viewer_id: Option<String>,
) {
    let board_id = sub.board_id();
    let (mut sink, mut stream) = socket.split();

    tracing::info!(
        board_id,
        viewer = viewer_id.as_deref().unwrap_or("anonymous"),
        owner = viewer.is_owner(),
        "Live channel connected"
    );

    let mut ping_interval = tokio::time::interval(PING_INTERVAL);
    ping_interval.tick().await; // skip immediate
    let mut last_seen = Instant::now();

    loop {
        tokio::select! {
            _ = ping_interval.tick() => {
                if last_seen.elapsed() >= PING_INTERVAL * 2 {
                    tracing::info!(board_id, "Live channel silent, closing");
                    let _ = sink.send(Message::Close(None)).await;
                    break;
                }
                if sink.send(Message::Ping(vec![].into())).await.is_err() {
                    break;
                }
            }

            event = sub.recv() => {
                match event {
                    Ok(msg) => {
                        if let Some(msg) = viewer.filter(msg)
                            && send_message(&mut sink, &msg).await.is_err()
                        {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        tracing::warn!(board_id, lagged = n, "Live subscriber lagged, messages dropped");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }

            msg = stream.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        last_seen = Instant::now();
                        match serde_json::from_str::<LiveCommand>(&text) {
                            Ok(LiveCommand::Ping) => {
                                if send_message(&mut sink, &LiveMessage::Pong).await.is_err() {
                                    break;
                                }
                            }
                            Err(e) => {
                                tracing::debug!(board_id, "Ignoring unknown live command: {e}");
                            }
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Err(_)) => break,
                    Some(Ok(_)) => last_seen = Instant::now(),
                }
            }
        }
    }

    tracing::info!(board_id, "Live channel disconnected");
    // `sub` drops here and deregisters the connection
}

async fn send_message<S>(sink: &mut S, msg: &LiveMessage) -> Result<(), ()>
where
    S: futures::Sink<Message, Error = axum::Error> + Unpin,
{
    let json = serde_json::to_string(msg).map_err(|_| ())?;
    sink.send(Message::Text(json.into())).await.map_err(|_| ())
}
