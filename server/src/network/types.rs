//! Core network types and the `ChatNetwork` capability.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A person on the chat network.
///
/// `id` is the network's stable identifier; `name` is the human-assigned
/// display name. Contact tokens key off `name`, not `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub id: String,
    pub name: String,
}

/// A group chat on the network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub id: String,
}

/// A message target: either a contact or a room, by network id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    Contact(String),
    Room(String),
}

impl Destination {
    /// Network id of the target, whichever kind it is.
    pub fn id(&self) -> &str {
        match self {
            Self::Contact(id) | Self::Room(id) => id,
        }
    }
}

/// Outbound message content.
///
/// Media is delivered by reference: the network client fetches the URL and
/// attaches the result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutboundContent {
    Text(String),
    Image { url: String },
}

/// Errors surfaced by the chat-network collaborator.
#[derive(Debug, thiserror::Error)]
pub enum NetworkError {
    #[error("transport error: {0}")]
    Transport(String),
}

/// Abstract capability over the chat-network client.
///
/// Implementations own the session (login, reconnects, protocol transport)
/// and emit [`super::NetworkEvent`]s through an mpsc channel they hand out at
/// connect time.
#[async_trait]
pub trait ChatNetwork: Send + Sync {
    /// Network id of the bot's own account, for self-detection in
    /// room-join events.
    fn self_id(&self) -> &str;

    /// Look up a live contact by display name.
    ///
    /// Display names are not unique; when several contacts share one, the
    /// first match wins. That ambiguity is inherent to name-keyed lookups
    /// and is surfaced to callers as-is.
    async fn find_contact_by_name(&self, name: &str) -> Result<Option<Contact>, NetworkError>;

    /// Accept an incoming friend request.
    async fn accept_friendship(&self, request_id: &str) -> Result<(), NetworkError>;

    /// Accept an invitation to join a room.
    async fn accept_room_invite(&self, invite_id: &str) -> Result<(), NetworkError>;

    /// Deliver a message to a contact or room.
    async fn say(
        &self,
        destination: &Destination,
        content: &OutboundContent,
    ) -> Result<(), NetworkError>;
}
