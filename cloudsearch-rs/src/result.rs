//! Results returned by searches and document batches.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

// ============================================================================
// Search results
// ============================================================================

/// One matched document.
#[derive(Debug, Clone, PartialEq)]
pub struct Hit<D> {
    pub id: String,
    pub data: D,
}

/// One value of a facet and how many matches carry it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Constraint {
    #[serde(deserialize_with = "string_or_number")]
    pub value: String,
    #[serde(default)]
    pub count: u64,
}

/// The constraints returned for one requested facet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetResult {
    pub name: String,
    pub constraints: Vec<Constraint>,
}

/// Request timing reported by the service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Info {
    pub rid: String,
    #[serde(rename = "time-ms")]
    pub time_ms: u64,
    #[serde(rename = "cpu-time-ms")]
    pub cpu_time_ms: u64,
}

/// A diagnostic attached to a search response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Message {
    pub severity: String,
    pub code: String,
    pub message: String,
}

/// Outcome of a search.
///
/// `is_error` is set when the request failed or the service reported an
/// error; `error` then holds the message.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult<D> {
    pub is_error: bool,
    pub error: Option<String>,
    pub rank: Option<String>,
    pub match_expr: Option<String>,
    pub found: u64,
    pub start: u64,
    pub hits: Vec<Hit<D>>,
    pub facets: Vec<FacetResult>,
    pub info: Option<Info>,
    pub messages: Vec<Message>,
}

impl<D> SearchResult<D> {
    /// An empty result carrying only an error message.
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            is_error: true,
            error: Some(message.into()),
            ..Self::default()
        }
    }

    /// Constraints of the facet called `name`, if it was returned.
    pub fn facet(&self, name: &str) -> Option<&[Constraint]> {
        self.facets
            .iter()
            .find(|facet| facet.name == name)
            .map(|facet| facet.constraints.as_slice())
    }

    /// The documents of every hit, in rank order.
    pub fn documents(&self) -> impl Iterator<Item = &D> {
        self.hits.iter().map(|hit| &hit.data)
    }
}

impl<D> Default for SearchResult<D> {
    fn default() -> Self {
        Self {
            is_error: false,
            error: None,
            rank: None,
            match_expr: None,
            found: 0,
            start: 0,
            hits: Vec::new(),
            facets: Vec::new(),
            info: None,
            messages: Vec::new(),
        }
    }
}

// ============================================================================
// Document batch results
// ============================================================================

/// An error entry of a document batch response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ErrorMessage {
    pub message: String,
}

/// Outcome of an add, update or delete batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentResult {
    #[serde(skip)]
    pub is_error: bool,
    pub status: String,
    pub errors: Vec<ErrorMessage>,
    pub adds: u64,
    pub deletes: u64,
}

pub type AddResult = DocumentResult;
pub type UpdateResult = DocumentResult;
pub type DeleteResult = DocumentResult;

impl DocumentResult {
    /// A failed result with one error entry.
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            is_error: true,
            status: "error".to_string(),
            errors: vec![ErrorMessage {
                message: message.into(),
            }],
            ..Self::default()
        }
    }

    /// Decode a batch response body; `status: "error"` sets `is_error`.
    pub fn from_body(body: &str) -> crate::error::Result<Self> {
        let mut result: DocumentResult = serde_json::from_str(body)?;
        result.is_error = result.status == "error";
        Ok(result)
    }

    /// Fold the result of a later batch into this one.
    pub fn merge(&mut self, other: DocumentResult) {
        self.is_error |= other.is_error;
        self.adds += other.adds;
        self.deletes += other.deletes;
        self.errors.extend(other.errors);
        if self.status.is_empty() || other.is_error {
            self.status = other.status;
        }
    }

    /// Error messages joined for display.
    pub fn error_summary(&self) -> String {
        self.errors
            .iter()
            .map(|error| error.message.as_str())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

fn string_or_number<'de, De>(deserializer: De) -> std::result::Result<String, De::Error>
where
    De: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Null => Ok(String::new()),
        other => Ok(other.to_string()),
    }
}
