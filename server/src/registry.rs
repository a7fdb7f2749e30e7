//! Token Registry
//!
//! Maps opaque bearer tokens to chat destinations, in both directions.
//!
//! Room tokens are random and persisted; they are minted lazily on the
//! first join event for a (room, inviter) pair and never change afterwards.
//! Contact tokens are pure functions of the contact's display name
//! (`base64(name)`) and are recomputed on every resolution, so renaming
//! yourself invalidates your token.

use std::sync::Arc;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use sqlx::SqlitePool;
use tracing::{debug, info};
use uuid::Uuid;

use crate::db::{self, RoomToken};
use crate::network::{ChatNetwork, Contact, NetworkError};

/// Errors surfaced by token resolution.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("network error: {0}")]
    Network(#[from] NetworkError),
}

/// Derive a contact token from a display name.
///
/// Standard base64 with padding. Stable as long as the contact keeps their
/// display name.
pub fn contact_token(name: &str) -> String {
    BASE64.encode(name.as_bytes())
}

/// Token registry over the destination store and the live directory.
#[derive(Clone)]
pub struct TokenRegistry {
    db: SqlitePool,
    network: Arc<dyn ChatNetwork>,
}

impl TokenRegistry {
    pub fn new(db: SqlitePool, network: Arc<dyn ChatNetwork>) -> Self {
        Self { db, network }
    }

    /// Find or create the token for a (room, inviter) pair.
    ///
    /// Creation is race-free: the insert is a conditional no-op on conflict
    /// and the row is read back afterwards, so concurrent callers for the
    /// same pair all observe the single persisted token.
    pub async fn room_token(&self, room_id: &str, contact_id: &str) -> Result<String, RegistryError> {
        if let Some(existing) = db::find_room_token(&self.db, room_id, contact_id).await? {
            return Ok(existing.token);
        }

        let candidate = Uuid::new_v4().to_string();
        db::insert_room_token(&self.db, room_id, contact_id, &candidate).await?;

        // Read back: a concurrent creator may have won the insert.
        let record = db::find_room_token(&self.db, room_id, contact_id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)?;

        if record.token == candidate {
            info!(room_id = %room_id, contact_id = %contact_id, "Minted room token");
        } else {
            debug!(room_id = %room_id, contact_id = %contact_id, "Lost token insert race, reusing winner");
        }

        Ok(record.token)
    }

    /// Reverse lookup: the room record a token addresses, if any.
    pub async fn find_room_by_token(&self, token: &str) -> Result<Option<RoomToken>, RegistryError> {
        Ok(db::find_room_token_by_token(&self.db, token).await?)
    }

    /// Resolve a contact token back to a live contact.
    ///
    /// Decodes the token to a display name and asks the directory. An
    /// undecodable token resolves to no contact, same as a name nobody
    /// carries. Duplicate display names resolve to the directory's first
    /// match; that ambiguity is a documented property of name-keyed tokens.
    pub async fn find_contact_by_token(
        &self,
        token: &str,
    ) -> Result<Option<Contact>, RegistryError> {
        let name = match BASE64.decode(token).map(String::from_utf8) {
            Ok(Ok(name)) => name,
            _ => {
                debug!(token = %token, "Contact token is not base64 text");
                return Ok(None);
            }
        };

        Ok(self.network.find_contact_by_name(&name).await?)
    }
}
