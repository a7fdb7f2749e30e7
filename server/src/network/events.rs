//! Inbound network events.

use super::types::{Contact, Room};

/// Events the chat network pushes at the relay.
///
/// A single enum so the automation handler is one routing function and unit
/// tests can synthesize events without a live connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NetworkEvent {
    /// Someone asked to be our friend. Carries the opaque request id used
    /// to accept.
    FriendRequest { request_id: String },

    /// A friend request went through; `contact` is the new friend.
    FriendConfirmed { contact: Contact },

    /// Members were added to a room. `invitees` may include the bot itself.
    RoomJoin {
        room: Room,
        invitees: Vec<Contact>,
        inviter: Contact,
    },

    /// The bot was invited to a room. Carries the opaque invitation id.
    RoomInvite { invite_id: String },

    /// An inbound text message from a contact.
    Message { sender: Contact, text: String },
}
