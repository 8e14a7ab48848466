//! BoardHub - live fan-out per board
//!
//! ```text
//! idea / reaction handler
//!       │ LiveMessage
//!       ▼
//! BoardHub
//!   └── boards: board_id → BoardChannel
//!         ├── tx: broadcast::Sender<LiveMessage>
//!         └── connections: live WS sessions holding a Subscription
//!               │
//!               ▼
//!         board WS handler (recv → send to socket)
//! ```
//!
//! Delivery is best-effort: no buffering for absent subscribers, no
//! ordering across boards, no retries. A receiver that falls behind the
//! channel capacity skips the missed messages.

mod viewer;

pub use viewer::{LiveViewer, PublicFeed};

use dashmap::DashMap;
use shared::error::{AppError, ErrorCode};
use shared::live::LiveMessage;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::broadcast;

/// Broadcast channel capacity per board
const BROADCAST_CAPACITY: usize = 256;

struct BoardChannel {
    tx: broadcast::Sender<LiveMessage>,
    connections: AtomicUsize,
}

impl BoardChannel {
    fn new() -> Self {
        let (tx, _) = broadcast::channel(BROADCAST_CAPACITY);
        Self {
            tx,
            connections: AtomicUsize::new(0),
        }
    }
}

#[derive(Clone)]
pub struct BoardHub {
    boards: Arc<DashMap<i64, BoardChannel>>,
    max_per_board: usize,
}

impl BoardHub {
    pub fn new(max_per_board: usize) -> Self {
        Self {
            boards: Arc::new(DashMap::new()),
            max_per_board,
        }
    }

    /// Register a live connection on `board_id`
    ///
    /// Fails with `ResourceLimitExceeded` once the board has
    /// `max_per_board` connections.
    pub fn register(&self, board_id: i64) -> Result<Subscription, AppError> {
        let entry = self.boards.entry(board_id).or_insert_with(BoardChannel::new);
        let prev = entry.connections.fetch_add(1, Ordering::SeqCst);
        if prev >= self.max_per_board {
            entry.connections.fetch_sub(1, Ordering::SeqCst);
            return Err(AppError::with_message(
                ErrorCode::ResourceLimitExceeded,
                format!(
                    "Too many live connections ({prev}/{})",
                    self.max_per_board
                ),
            )
            .with_detail("boardId", board_id));
        }
        let rx = entry.tx.subscribe();
        drop(entry);

        Ok(Subscription {
            hub: self.clone(),
            board_id,
            rx,
        })
    }

    /// Fan out `message` to every connection on `board_id`; returns the
    /// number of receivers reached (0 when nobody is watching).
    pub fn publish(&self, board_id: i64, message: LiveMessage) -> usize {
        match self.boards.get(&board_id) {
            Some(channel) => channel.tx.send(message).unwrap_or(0),
            None => 0,
        }
    }

    pub fn connection_count(&self, board_id: i64) -> usize {
        self.boards
            .get(&board_id)
            .map(|c| c.connections.load(Ordering::SeqCst))
            .unwrap_or(0)
    }

    pub fn board_count(&self) -> usize {
        self.boards.len()
    }

    fn deregister(&self, board_id: i64) {
        let remaining = match self.boards.get(&board_id) {
            Some(channel) => channel.connections.fetch_sub(1, Ordering::SeqCst) - 1,
            None => return,
        };
        if remaining == 0 {
            self.boards
                .remove_if(&board_id, |_, c| c.connections.load(Ordering::SeqCst) == 0);
        }
    }
}

/// Live registration; dropping it deregisters the connection
pub struct Subscription {
    hub: BoardHub,
    board_id: i64,
    rx: broadcast::Receiver<LiveMessage>,
}

impl Subscription {
    pub fn board_id(&self) -> i64 {
        self.board_id
    }

    pub async fn recv(&mut self) -> Result<LiveMessage, broadcast::error::RecvError> {
        self.rx.recv().await
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.hub.deregister(self.board_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::live::{FeedbackEvent, FeedbackKind, IdeaEvent};
    use shared::models::{Column, IdeaStatus};

    fn status_update(idea_id: i64) -> LiveMessage {
        LiveMessage::StatusUpdate(IdeaEvent {
            idea_id,
            board_id: 1,
            column: Column::Release,
            position: 1,
            status: Some(IdeaStatus::Done),
            in_progress: Some(false),
            origin: None,
        })
    }

    #[tokio::test]
    async fn publish_reaches_every_connection_of_the_board() {
        let hub = BoardHub::new(8);
        let mut a = hub.register(1).unwrap();
        let mut b = hub.register(1).unwrap();
        let mut other = hub.register(2).unwrap();

        assert_eq!(hub.publish(1, status_update(7)), 2);

        assert_eq!(a.recv().await.unwrap(), status_update(7));
        assert_eq!(b.recv().await.unwrap(), status_update(7));
        assert!(other.rx.try_recv().is_err());
    }

    #[test]
    fn publish_without_subscribers_is_a_noop() {
        let hub = BoardHub::new(8);
        assert_eq!(hub.publish(42, LiveMessage::Pong), 0);
        assert_eq!(hub.board_count(), 0);
    }

    #[test]
    fn drop_deregisters_and_removes_empty_board() {
        let hub = BoardHub::new(8);
        let a = hub.register(1).unwrap();
        let b = hub.register(1).unwrap();
        assert_eq!(hub.connection_count(1), 2);

        drop(a);
        assert_eq!(hub.connection_count(1), 1);
        assert_eq!(hub.board_count(), 1);

        drop(b);
        assert_eq!(hub.connection_count(1), 0);
        assert_eq!(hub.board_count(), 0);
    }

    #[test]
    fn per_board_cap() {
        let hub = BoardHub::new(2);
        let _a = hub.register(1).unwrap();
        let _b = hub.register(1).unwrap();

        let err = hub.register(1).err().unwrap();
        assert_eq!(err.code, ErrorCode::ResourceLimitExceeded);
        assert_eq!(hub.connection_count(1), 2);

        // Other boards are unaffected
        assert!(hub.register(2).is_ok());
    }

    #[tokio::test]
    async fn lagging_receiver_skips_and_continues() {
        let hub = BoardHub::new(8);
        let mut slow = hub.register(1).unwrap();

        for i in 0..(BROADCAST_CAPACITY as i64 + 10) {
            hub.publish(1, status_update(i));
        }

        match slow.recv().await {
            Err(broadcast::error::RecvError::Lagged(n)) => assert_eq!(n, 10),
            other => panic!("expected lag, got {other:?}"),
        }
        assert_eq!(slow.recv().await.unwrap(), status_update(10));

        let feedback = LiveMessage::FeedbackAnimation(FeedbackEvent {
            idea_id: 3,
            column: Column::Now,
            animation: FeedbackKind::Thumbsup,
            emoji: None,
            thumbs_up: Some(1),
            emoji_reactions: Some(vec![]),
        });
        hub.publish(1, feedback.clone());
        while let Ok(msg) = slow.recv().await {
            if msg == feedback {
                break;
            }
        }
    }
}
