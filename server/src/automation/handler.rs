//! Event dispatch and the per-event automation behaviors.

use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use tokio::sync::mpsc;
use tracing::{debug, error, info};

use crate::config::Config;
use crate::messenger::{Messenger, MessengerError};
use crate::network::{ChatNetwork, Contact, Destination, NetworkError, NetworkEvent, Room};
use crate::registry::{contact_token, RegistryError, TokenRegistry};

/// Inbound message bodies that trigger a webhook-address reply.
const WEBHOOK_COMMANDS: [&str; 2] = ["webhook", "推送地址"];

/// Announcement posted to a room right after the bot is added.
const ROOM_GREETING: &str = "大家好,我是推送精灵, 通过接口可以控制我发送消息到群上.";

/// Errors surfaced by a single event handler.
#[derive(Debug, thiserror::Error)]
pub enum AutomationError {
    #[error("network error: {0}")]
    Network(#[from] NetworkError),

    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),

    #[error("send error: {0}")]
    Send(#[from] MessengerError),
}

/// The automation agent: one instance per bot account, driven by the
/// network's event stream.
pub struct Automation {
    registry: TokenRegistry,
    messenger: Messenger,
    network: Arc<dyn ChatNetwork>,
    config: Arc<Config>,
}

impl Automation {
    pub fn new(
        registry: TokenRegistry,
        messenger: Messenger,
        network: Arc<dyn ChatNetwork>,
        config: Arc<Config>,
    ) -> Self {
        Self {
            registry,
            messenger,
            network,
            config,
        }
    }

    /// Consume the event stream until the network closes it.
    ///
    /// Handler failures are logged and the loop keeps going; nothing an
    /// individual event does may take the automation down.
    pub async fn run(self, mut events: mpsc::Receiver<NetworkEvent>) {
        while let Some(event) = events.recv().await {
            if let Err(e) = self.handle_event(event).await {
                error!(error = %e, "Event handler failed");
            }
        }
        info!("Network event stream closed, automation stopped");
    }

    /// Route a single event to its behavior.
    pub async fn handle_event(&self, event: NetworkEvent) -> Result<(), AutomationError> {
        match event {
            NetworkEvent::FriendRequest { request_id } => self.on_friend_request(&request_id).await,
            NetworkEvent::FriendConfirmed { contact } => self.send_webhook_address(&contact).await,
            NetworkEvent::RoomJoin {
                room,
                invitees,
                inviter,
            } => self.on_room_join(&room, &invitees, &inviter).await,
            NetworkEvent::RoomInvite { invite_id } => self.on_room_invite(&invite_id).await,
            NetworkEvent::Message { sender, text } => self.on_message(&sender, &text).await,
        }
    }

    /// Auto-accept a friend request after a randomized delay.
    ///
    /// The delay (1.2-3.2s by default) keeps acceptance from looking
    /// machine-instant to the network's anti-automation heuristics.
    async fn on_friend_request(&self, request_id: &str) -> Result<(), AutomationError> {
        let delay = {
            let mut rng = rand::thread_rng();
            Duration::from_millis(rng.gen_range(
                self.config.accept_delay_min_ms..=self.config.accept_delay_max_ms,
            ))
        };
        debug!(request_id = %request_id, delay_ms = delay.as_millis() as u64, "Delaying friend accept");
        tokio::time::sleep(delay).await;

        self.network.accept_friendship(request_id).await?;
        info!(request_id = %request_id, "Accepted friend request");
        Ok(())
    }

    /// Accept a room invitation immediately.
    async fn on_room_invite(&self, invite_id: &str) -> Result<(), AutomationError> {
        self.network.accept_room_invite(invite_id).await?;
        info!(invite_id = %invite_id, "Accepted room invitation");
        Ok(())
    }

    /// Greet the room and hand the inviter its webhook address.
    ///
    /// Only the bot's own join triggers anything; other invitees in the
    /// same event are ignored.
    async fn on_room_join(
        &self,
        room: &Room,
        invitees: &[Contact],
        inviter: &Contact,
    ) -> Result<(), AutomationError> {
        for invitee in invitees {
            if invitee.id != self.network.self_id() {
                continue;
            }

            self.messenger
                .send_text(&Destination::Room(room.id.clone()), ROOM_GREETING)
                .await?;

            let token = self.registry.room_token(&room.id, &inviter.id).await?;
            let address = format!("{}/room/{}?msg=xxx", self.config.domain, token);
            self.messenger
                .send_text(
                    &Destination::Contact(inviter.id.clone()),
                    format!("发送地址: {address}"),
                )
                .await?;
            info!(room_id = %room.id, inviter_id = %inviter.id, "Sent room webhook address");
        }
        Ok(())
    }

    /// Reply with the webhook address when a contact asks for it.
    async fn on_message(&self, sender: &Contact, text: &str) -> Result<(), AutomationError> {
        if WEBHOOK_COMMANDS.contains(&text) {
            return self.send_webhook_address(sender).await;
        }
        Ok(())
    }

    /// Send a contact its personal webhook address.
    async fn send_webhook_address(&self, contact: &Contact) -> Result<(), AutomationError> {
        let token = contact_token(&contact.name);
        let address = format!("{}/send/{}?msg=xxx", self.config.domain, token);
        self.messenger
            .send_text(
                &Destination::Contact(contact.id.clone()),
                format!("发送地址: {address}"),
            )
            .await?;
        info!(contact_id = %contact.id, "Sent contact webhook address");
        Ok(())
    }
}
