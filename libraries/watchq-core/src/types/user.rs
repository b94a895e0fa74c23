/// User domain type
use serde::{Deserialize, Serialize};

use crate::types::UserId;

/// User account, created on first contact with the bot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique user identifier
    pub id: UserId,

    /// Stable Telegram user id
    pub telegram_id: i64,

    /// Display name as seen at first contact
    pub username: Option<String>,
}
