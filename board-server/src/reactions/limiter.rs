//! Per-idea, per-IP feedback throttling
//!
//! One timestamp per `action:idea_id:ip` key. A call inside the window is
//! refused and does not extend it. A recorded call whose write then fails is
//! handed back with [`ReactionLimiter::release`]. Entries are dropped after
//! twice the window, both by a delayed task spawned on record and by
//! [`ReactionLimiter::cleanup`].

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

pub const THUMBS_UP_WINDOW: Duration = Duration::from_secs(5);
pub const EMOJI_WINDOW: Duration = Duration::from_secs(3);

/// Kind of feedback being throttled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackAction {
    ThumbsUp,
    Emoji,
}

impl FeedbackAction {
    pub const fn as_str(&self) -> &'static str {
        match self {
            FeedbackAction::ThumbsUp => "thumbsup",
            FeedbackAction::Emoji => "emoji",
        }
    }

    pub const fn window(&self) -> Duration {
        match self {
            FeedbackAction::ThumbsUp => THUMBS_UP_WINDOW,
            FeedbackAction::Emoji => EMOJI_WINDOW,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Entry {
    at: Instant,
    window: Duration,
}

#[derive(Clone, Default)]
pub struct ReactionLimiter {
    /// `action:idea_id:ip` -> last accepted call
    inner: Arc<Mutex<HashMap<String, Entry>>>,
}

impl ReactionLimiter {
    pub fn new() -> Self {
        Self::default()
    }

    fn key(action: FeedbackAction, idea_id: i64, ip: &str) -> String {
        format!("{}:{}:{}", action.as_str(), idea_id, ip)
    }

    /// `Ok(recorded_at)` records the call; `Err(remaining)` if still inside
    /// the window.
    pub async fn check(
        &self,
        action: FeedbackAction,
        idea_id: i64,
        ip: &str,
    ) -> Result<Instant, Duration> {
        let key = Self::key(action, idea_id, ip);
        let window = action.window();
        let now = Instant::now();

        {
            let mut map = self.inner.lock().await;
            if let Some(entry) = map.get(&key) {
                let elapsed = now.duration_since(entry.at);
                if elapsed < entry.window {
                    return Err(entry.window - elapsed);
                }
            }
            map.insert(key.clone(), Entry { at: now, window });
        }

        self.schedule_expiry(key, now, window * 2);
        Ok(now)
    }

    /// Undo the call recorded at `recorded_at`, if it is still the latest
    pub async fn release(&self, action: FeedbackAction, idea_id: i64, ip: &str, recorded_at: Instant) {
        let key = Self::key(action, idea_id, ip);
        let mut map = self.inner.lock().await;
        if map.get(&key).is_some_and(|e| e.at == recorded_at) {
            map.remove(&key);
        }
    }

    /// Remove `key` after `ttl` unless a newer call replaced it
    fn schedule_expiry(&self, key: String, recorded_at: Instant, ttl: Duration) {
        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            tokio::time::sleep(ttl).await;
            let mut map = inner.lock().await;
            if map.get(&key).is_some_and(|e| e.at == recorded_at) {
                map.remove(&key);
            }
        });
    }

    /// Drop every entry older than twice its window
    pub async fn cleanup(&self) {
        let now = Instant::now();
        let mut map = self.inner.lock().await;
        map.retain(|_, entry| now.duration_since(entry.at) < entry.window * 2);
    }

    pub async fn len(&self) -> usize {
        self.inner.lock().await.len()
    }
}
