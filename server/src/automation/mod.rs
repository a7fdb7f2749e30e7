//! Event Automation Handler
//!
//! Reacts to inbound network events: auto-accepts friend requests and room
//! invitations, and hands out webhook addresses as relationships form.

mod handler;


pub use handler::{Automation, AutomationError};
