//! Message extraction protocol for POST requests.
//!
//! A `msg` query parameter wins outright. Otherwise the JSON body is walked
//! by a dot-path (`property`, default `"msg"`) and the value at the path is
//! classified as text or typed media.
//!
//! Path resolution is explicit about misses but deliberately lenient: a
//! missing segment stops the walk and the value reached so far is still
//! classified. That keeps the common shape of posting a bare
//! `{"type":"image","url":...}` body (no `msg` field) working, at the cost
//! of sometimes sending a value the caller did not point at. The partial
//! walk is logged.

use serde_json::Value;
use tracing::warn;

use crate::network::OutboundContent;

/// Outcome of walking a dot-path through a JSON body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathResolution<'a, 'p> {
    /// Every segment resolved; this is the value at the path.
    Resolved(&'a Value),
    /// `missing` did not exist; `value` is where the walk stopped.
    Partial {
        value: &'a Value,
        missing: &'p str,
    },
}

/// Walk a dot-path (`"data.text"`) through nested JSON objects.
pub fn resolve_path<'a, 'p>(body: &'a Value, path: &'p str) -> PathResolution<'a, 'p> {
    let mut current = body;
    for segment in path.split('.') {
        match current.get(segment) {
            Some(next) => current = next,
            None => {
                return PathResolution::Partial {
                    value: current,
                    missing: segment,
                }
            }
        }
    }
    PathResolution::Resolved(current)
}

/// Classify an extracted JSON value as outbound content.
///
/// Strings are text; `{"type":"image","url":...}` objects are media;
/// everything else is unsupported.
pub fn classify(value: &Value) -> Option<OutboundContent> {
    if let Value::String(text) = value {
        return Some(OutboundContent::Text(text.clone()));
    }

    if let Some(obj) = value.as_object() {
        if obj.get("type").and_then(Value::as_str) == Some("image") {
            if let Some(url) = obj.get("url").and_then(Value::as_str) {
                return Some(OutboundContent::Image {
                    url: url.to_string(),
                });
            }
        }
    }

    None
}

/// Extract the outbound message from a POST request.
///
/// `query_msg` is the verbatim `msg` query parameter; `body` is the raw
/// request body, only parsed when the query parameter is absent. `None`
/// means no sendable message could be extracted.
pub fn extract_message(
    query_msg: Option<&str>,
    property: &str,
    body: &[u8],
) -> Option<OutboundContent> {
    if let Some(msg) = query_msg {
        return Some(OutboundContent::Text(msg.to_string()));
    }

    let body: Value = serde_json::from_slice(body).ok()?;
    let value = match resolve_path(&body, property) {
        PathResolution::Resolved(value) => value,
        PathResolution::Partial { value, missing } => {
            warn!(
                property = %property,
                missing = %missing,
                "Dot-path segment missing from request body, using partially-resolved value"
            );
            value
        }
    };
    classify(value)
}
