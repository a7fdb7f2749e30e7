//! Chat-network collaborator contracts.
//!
//! The relay never speaks the chat protocol itself. Everything it needs from
//! the network (directory lookups, accepting requests, delivering messages,
//! the inbound event stream) goes through the [`ChatNetwork`] capability, so
//! protocol clients plug in from outside and tests run against a mock.

pub mod console;
pub mod events;
pub mod types;

pub use console::ConsoleNetwork;
pub use events::NetworkEvent;
pub use types::{ChatNetwork, Contact, Destination, NetworkError, OutboundContent, Room};

#[cfg(test)]
pub mod mock;
