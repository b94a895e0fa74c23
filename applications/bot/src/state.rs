/// Shared bot state
use std::collections::HashMap;

use sqlx::SqlitePool;
use teloxide::types::ChatId;
use tokio::sync::Mutex;
use watchq_extract::YtDlp;

/// A destructive command waiting for the user to confirm with a
/// playlist number
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingAction {
    Delete,
    Restart,
}

/// State shared by every handler.
///
/// The only in-memory state besides the connection pool is the
/// per-conversation confirmation flag; everything durable lives in the
/// store.
pub struct AppState {
    pub pool: SqlitePool,
    pub extractor: YtDlp,
    pending: Mutex<HashMap<ChatId, PendingAction>>,
}

impl AppState {
    pub fn new(pool: SqlitePool, extractor: YtDlp) -> Self {
        Self {
            pool,
            extractor,
            pending: Mutex::new(HashMap::new()),
        }
    }

    /// Arm a confirmation for this chat, replacing any previous one
    pub async fn arm(&self, chat_id: ChatId, action: PendingAction) {
        self.pending.lock().await.insert(chat_id, action);
    }

    /// Whether this chat has a confirmation armed
    pub async fn has_pending(&self, chat_id: ChatId) -> bool {
        self.pending.lock().await.contains_key(&chat_id)
    }

    /// Peek at the armed confirmation without clearing it
    pub async fn pending(&self, chat_id: ChatId) -> Option<PendingAction> {
        self.pending.lock().await.get(&chat_id).copied()
    }

    /// Clear and return the armed confirmation
    pub async fn take_pending(&self, chat_id: ChatId) -> Option<PendingAction> {
        self.pending.lock().await.remove(&chat_id)
    }
}
