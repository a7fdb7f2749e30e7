//! Recording mock of the chat network for tests.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::types::{ChatNetwork, Contact, Destination, NetworkError, OutboundContent};

/// In-memory `ChatNetwork` that records every call for assertions.
#[derive(Default)]
pub struct MockNetwork {
    self_id: String,
    contacts: Mutex<Vec<Contact>>,
    sent: Mutex<Vec<(Destination, OutboundContent)>>,
    accepted_friendships: Mutex<Vec<String>>,
    accepted_invites: Mutex<Vec<String>>,
    fail_sends: AtomicBool,
}

impl MockNetwork {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            self_id: "bot-self".to_string(),
            ..Self::default()
        })
    }

    /// Mock with a pre-populated contact directory.
    pub fn with_contacts(contacts: Vec<Contact>) -> Arc<Self> {
        let mock = Self::new();
        *mock.contacts.lock().unwrap() = contacts;
        mock
    }

    /// Make every subsequent `say` fail with a transport error.
    pub fn fail_sends(&self) {
        self.fail_sends.store(true, Ordering::SeqCst);
    }

    pub fn sent(&self) -> Vec<(Destination, OutboundContent)> {
        self.sent.lock().unwrap().clone()
    }

    pub fn accepted_friendships(&self) -> Vec<String> {
        self.accepted_friendships.lock().unwrap().clone()
    }

    pub fn accepted_invites(&self) -> Vec<String> {
        self.accepted_invites.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatNetwork for MockNetwork {
    fn self_id(&self) -> &str {
        &self.self_id
    }

    async fn find_contact_by_name(&self, name: &str) -> Result<Option<Contact>, NetworkError> {
        // First match wins, like the real directory.
        Ok(self
            .contacts
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.name == name)
            .cloned())
    }

    async fn accept_friendship(&self, request_id: &str) -> Result<(), NetworkError> {
        self.accepted_friendships
            .lock()
            .unwrap()
            .push(request_id.to_string());
        Ok(())
    }

    async fn accept_room_invite(&self, invite_id: &str) -> Result<(), NetworkError> {
        self.accepted_invites
            .lock()
            .unwrap()
            .push(invite_id.to_string());
        Ok(())
    }

    async fn say(
        &self,
        destination: &Destination,
        content: &OutboundContent,
    ) -> Result<(), NetworkError> {
        if self.fail_sends.load(Ordering::SeqCst) {
            return Err(NetworkError::Transport("mock send failure".to_string()));
        }
        self.sent
            .lock()
            .unwrap()
            .push((destination.clone(), content.clone()));
        Ok(())
    }
}
