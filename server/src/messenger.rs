//! Outbound Messenger
//!
//! Thin send abstraction over contacts and rooms. Every delivery is bounded
//! by a timeout so a stalled transport cannot wedge the event loop. Failures
//! propagate to the caller; there is no retry.

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::network::{ChatNetwork, Destination, NetworkError, OutboundContent};

/// Errors surfaced by an outbound send.
#[derive(Debug, thiserror::Error)]
pub enum MessengerError {
    #[error("transport error: {0}")]
    Transport(#[from] NetworkError),

    #[error("send timed out after {0:?}")]
    Timeout(Duration),
}

#[derive(Clone)]
pub struct Messenger {
    network: Arc<dyn ChatNetwork>,
    send_timeout: Duration,
}

impl Messenger {
    pub fn new(network: Arc<dyn ChatNetwork>, send_timeout: Duration) -> Self {
        Self {
            network,
            send_timeout,
        }
    }

    /// Send plain text to a contact or room.
    pub async fn send_text(
        &self,
        destination: &Destination,
        text: impl Into<String>,
    ) -> Result<(), MessengerError> {
        self.deliver(destination, OutboundContent::Text(text.into()))
            .await
    }

    /// Send an image by URL; the network client fetches and attaches it.
    pub async fn send_media(
        &self,
        destination: &Destination,
        image_url: impl Into<String>,
    ) -> Result<(), MessengerError> {
        self.deliver(
            destination,
            OutboundContent::Image {
                url: image_url.into(),
            },
        )
        .await
    }

    async fn deliver(
        &self,
        destination: &Destination,
        content: OutboundContent,
    ) -> Result<(), MessengerError> {
        debug!(destination = ?destination, "Delivering outbound message");
        tokio::time::timeout(self.send_timeout, self.network.say(destination, &content))
            .await
            .map_err(|_| MessengerError::Timeout(self.send_timeout))??;

        Ok(())
    }
}
