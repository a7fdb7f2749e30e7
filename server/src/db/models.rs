//! Database Models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Room token record.
///
/// One row per (room, inviter) pair. Immutable once written; normal
/// operation never updates or deletes it.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct RoomToken {
    pub room_id: String,
    pub contact_id: String,
    pub token: String,
    pub created_at: DateTime<Utc>,
}
