//! Decoding of search responses.
//!
//! The body is decoded into a [`serde_json::Value`] first. The envelope
//! fields are read from that tree, and the `hits.hit` and `facets`
//! subtrees are handed to [`hit_mapper`] and [`facet_reader`], which decode
//! them independently for the caller's document type.

pub mod facet_reader;
pub mod hit_mapper;

use crate::document::SearchDocument;
use crate::error::{CloudSearchError, Result};
use crate::result::{Info, Message, SearchResult};
use serde::de::DeserializeOwned;
use serde_json::Value;

pub use facet_reader::read_facets;
pub use hit_mapper::{map_hit, read_hits, wire_fields, wire_values, WireFields};

/// Decode a search response body.
///
/// A body that is not a JSON object is an error. A service-reported error
/// (an `error` field or `status: "error"`) gives a result with `is_error`
/// set and the service's message in `error`; hits are not mapped then.
pub fn decode_search_response<D: SearchDocument>(body: &str) -> Result<SearchResult<D>> {
    let envelope: Value = serde_json::from_str(body)
        .map_err(|e| CloudSearchError::MalformedResponse(e.to_string()))?;
    if !envelope.is_object() {
        return Err(CloudSearchError::MalformedResponse(
            "response is not a JSON object".to_string(),
        ));
    }

    let hits = envelope.get("hits");
    let messages: Vec<Message> = field(&envelope, "messages").unwrap_or_default();

    let mut result = SearchResult {
        rank: field(&envelope, "rank"),
        match_expr: field(&envelope, "match-expr"),
        found: hits.and_then(|h| h.get("found")).and_then(Value::as_u64).unwrap_or(0),
        start: hits.and_then(|h| h.get("start")).and_then(Value::as_u64).unwrap_or(0),
        facets: read_facets(envelope.get("facets")),
        info: info(&envelope),
        error: service_error(&envelope, &messages),
        messages,
        ..SearchResult::default()
    };

    if result.error.is_some() {
        result.is_error = true;
        return Ok(result);
    }

    result.hits = read_hits(hits.and_then(|h| h.get("hit")));
    tracing::debug!(
        found = result.found,
        returned = result.hits.len(),
        facets = result.facets.len(),
        "decoded search response"
    );
    Ok(result)
}

fn field<T: DeserializeOwned>(envelope: &Value, name: &str) -> Option<T> {
    let value = envelope.get(name)?;
    if value.is_null() {
        return None;
    }
    match serde_json::from_value(value.clone()) {
        Ok(decoded) => Some(decoded),
        Err(e) => {
            tracing::warn!(field = name, error = %e, "ignoring malformed response field");
            None
        }
    }
}

fn info(envelope: &Value) -> Option<Info> {
    let has_info = ["rid", "time-ms", "cpu-time-ms"]
        .iter()
        .any(|key| envelope.get(*key).is_some());
    if let Some(info) = field::<Info>(envelope, "info") {
        return Some(info);
    }
    // older responses put the timing at the top level
    has_info.then(|| serde_json::from_value(envelope.clone()).unwrap_or_default())
}

fn service_error(envelope: &Value, messages: &[Message]) -> Option<String> {
    if let Some(error) = envelope.get("error").filter(|e| !e.is_null()) {
        return Some(match error {
            Value::String(message) => message.clone(),
            other => other.to_string(),
        });
    }

    let failed = envelope.get("status").and_then(Value::as_str) == Some("error");
    failed.then(|| {
        messages
            .first()
            .map(|m| m.message.clone())
            .unwrap_or_else(|| "unknown error".to_string())
    })
}
