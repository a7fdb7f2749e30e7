//! Database Queries
//!
//! Runtime queries (no compile-time `DATABASE_URL` required).
//!
//! All query functions include error context logging to aid debugging.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::error;

use super::models::RoomToken;

/// Log and return a database error with context.
///
/// This helper ensures all database errors are logged with relevant context
/// before being propagated, making production debugging easier.
macro_rules! db_error {
    ($query:expr, $($field:tt)*) => {
        |e| {
            error!(query = $query, $($field)*, error = %e, "Database query failed");
            e
        }
    };
}

/// Find the token record for a (room, inviter) pair.
pub async fn find_room_token(
    pool: &SqlitePool,
    room_id: &str,
    contact_id: &str,
) -> sqlx::Result<Option<RoomToken>> {
    sqlx::query_as::<_, RoomToken>(
        "SELECT room_id, contact_id, token, created_at
         FROM room_tokens
         WHERE room_id = ? AND contact_id = ?",
    )
    .bind(room_id)
    .bind(contact_id)
    .fetch_optional(pool)
    .await
    .map_err(db_error!("find_room_token", room_id = %room_id, contact_id = %contact_id))
}

/// Reverse lookup: find the record a token points at.
pub async fn find_room_token_by_token(
    pool: &SqlitePool,
    token: &str,
) -> sqlx::Result<Option<RoomToken>> {
    sqlx::query_as::<_, RoomToken>(
        "SELECT room_id, contact_id, token, created_at
         FROM room_tokens
         WHERE token = ?",
    )
    .bind(token)
    .fetch_optional(pool)
    .await
    .map_err(db_error!("find_room_token_by_token", token = %token))
}

/// Insert a token record for a (room, inviter) pair.
///
/// The insert is conditional at the store layer: on a primary-key conflict
/// it is a no-op, so two racing creators persist exactly one record. Callers
/// must read the row back to learn which token won.
pub async fn insert_room_token(
    pool: &SqlitePool,
    room_id: &str,
    contact_id: &str,
    token: &str,
) -> sqlx::Result<()> {
    sqlx::query(
        "INSERT INTO room_tokens (room_id, contact_id, token, created_at)
         VALUES (?, ?, ?, ?)
         ON CONFLICT(room_id, contact_id) DO NOTHING",
    )
    .bind(room_id)
    .bind(contact_id)
    .bind(token)
    .bind(Utc::now())
    .execute(pool)
    .await
    .map_err(db_error!("insert_room_token", room_id = %room_id, contact_id = %contact_id))?;

    Ok(())
}

/// Count all token records. Used by tests to pin the uniqueness invariant.
pub async fn count_room_tokens(pool: &SqlitePool) -> sqlx::Result<i64> {
    let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM room_tokens")
        .fetch_one(pool)
        .await?;

    Ok(row.0)
}
