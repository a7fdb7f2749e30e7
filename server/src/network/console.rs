//! Console network adapter.
//!
//! A development stand-in for a real protocol client: sends are logged
//! instead of delivered, the directory is empty, and no events are emitted.
//! Real clients implement [`ChatNetwork`] outside this crate and wire in
//! through the same constructor shape.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::info;

use super::events::NetworkEvent;
use super::types::{ChatNetwork, Contact, Destination, NetworkError, OutboundContent};

/// Capacity of the event channel handed to the automation loop.
const EVENT_BUFFER: usize = 64;

pub struct ConsoleNetwork {
    self_id: String,
    // Held so the receiver side stays open for the process lifetime even
    // though this adapter never emits.
    _events_tx: mpsc::Sender<NetworkEvent>,
}

impl ConsoleNetwork {
    /// "Connect" to the console: returns the adapter and the (silent)
    /// event stream for the automation loop.
    pub fn connect() -> (Arc<Self>, mpsc::Receiver<NetworkEvent>) {
        let (tx, rx) = mpsc::channel(EVENT_BUFFER);
        let adapter = Arc::new(Self {
            self_id: "console-self".to_string(),
            _events_tx: tx,
        });
        info!("Console network adapter connected (sends are logged, not delivered)");
        (adapter, rx)
    }
}

#[async_trait]
impl ChatNetwork for ConsoleNetwork {
    fn self_id(&self) -> &str {
        &self.self_id
    }

    async fn find_contact_by_name(&self, name: &str) -> Result<Option<Contact>, NetworkError> {
        info!(name = %name, "Console directory lookup (always empty)");
        Ok(None)
    }

    async fn accept_friendship(&self, request_id: &str) -> Result<(), NetworkError> {
        info!(request_id = %request_id, "Console accept friendship");
        Ok(())
    }

    async fn accept_room_invite(&self, invite_id: &str) -> Result<(), NetworkError> {
        info!(invite_id = %invite_id, "Console accept room invite");
        Ok(())
    }

    async fn say(
        &self,
        destination: &Destination,
        content: &OutboundContent,
    ) -> Result<(), NetworkError> {
        match content {
            OutboundContent::Text(text) => {
                info!(destination = ?destination, text = %text, "Console send");
            }
            OutboundContent::Image { url } => {
                info!(destination = ?destination, url = %url, "Console send (image)");
            }
        }
        Ok(())
    }
}
