//! Relay endpoint handlers.

use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::payload::extract_message;
use super::AppState;
use crate::network::{Destination, OutboundContent};

/// Logical outcome of a relay request. Always served with HTTP 200; the
/// `status` field is the contract.
#[derive(Debug, Serialize)]
pub struct SendOutcome {
    pub status: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub msg: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SendOutcome {
    const fn ok() -> Self {
        Self {
            status: true,
            msg: None,
            error: None,
        }
    }

    const fn failure(msg: &'static str) -> Self {
        Self {
            status: false,
            msg: Some(msg),
            error: None,
        }
    }

    fn error(err: impl std::fmt::Display) -> Self {
        Self {
            status: false,
            msg: None,
            error: Some(err.to_string()),
        }
    }
}

/// Query parameters accepted by the relay endpoints.
#[derive(Debug, Deserialize)]
pub struct SendQuery {
    pub msg: Option<String>,
    pub property: Option<String>,
}

/// GET /send/:token
/// Send the `msg` query parameter as text to the token's contact.
pub async fn contact_send(
    State(state): State<AppState>,
    Path(token): Path<String>,
    Query(query): Query<SendQuery>,
) -> Json<SendOutcome> {
    let Some(msg) = query.msg else {
        return Json(SendOutcome::failure("unsupported msg type"));
    };
    deliver_to_contact(&state, &token, OutboundContent::Text(msg)).await
}

/// POST /send/:token
/// Extract the message from the query or the JSON body (dot-path via
/// `property`, default "msg") and send it to the token's contact.
pub async fn contact_send_body(
    State(state): State<AppState>,
    Path(token): Path<String>,
    Query(query): Query<SendQuery>,
    body: Bytes,
) -> Json<SendOutcome> {
    let property = query.property.as_deref().unwrap_or("msg");
    let Some(content) = extract_message(query.msg.as_deref(), property, &body) else {
        return Json(SendOutcome::failure("unsupported msg type"));
    };
    deliver_to_contact(&state, &token, content).await
}

/// GET /room/:token
/// Send the `msg` query parameter as text to the token's room. The send is
/// awaited before responding, the same contract as the contact endpoint.
pub async fn room_send(
    State(state): State<AppState>,
    Path(token): Path<String>,
    Query(query): Query<SendQuery>,
) -> Json<SendOutcome> {
    let Some(msg) = query.msg else {
        return Json(SendOutcome::failure("unsupported msg type"));
    };

    let record = match state.registry.find_room_by_token(&token).await {
        Ok(Some(record)) => record,
        Ok(None) => return Json(SendOutcome::failure("room token not exists")),
        Err(e) => {
            warn!(token = %token, error = %e, "Room token resolution failed");
            return Json(SendOutcome::error(e));
        }
    };

    let destination = Destination::Room(record.room_id);
    match state.messenger.send_text(&destination, msg).await {
        Ok(()) => Json(SendOutcome::ok()),
        Err(e) => {
            warn!(token = %token, error = %e, "Room send failed");
            Json(SendOutcome::error(e))
        }
    }
}

/// Resolve a contact token and deliver the content, mapping every failure
/// to its logical payload.
async fn deliver_to_contact(
    state: &AppState,
    token: &str,
    content: OutboundContent,
) -> Json<SendOutcome> {
    let contact = match state.registry.find_contact_by_token(token).await {
        Ok(Some(contact)) => contact,
        Ok(None) => return Json(SendOutcome::failure("token not exists")),
        Err(e) => {
            warn!(token = %token, error = %e, "Contact token resolution failed");
            return Json(SendOutcome::error(e));
        }
    };

    let destination = Destination::Contact(contact.id);
    let result = match content {
        OutboundContent::Text(text) => state.messenger.send_text(&destination, text).await,
        OutboundContent::Image { url } => state.messenger.send_media(&destination, url).await,
    };

    match result {
        Ok(()) => Json(SendOutcome::ok()),
        Err(e) => {
            warn!(token = %token, error = %e, "Contact send failed");
            Json(SendOutcome::error(e))
        }
    }
}
