//! Document batch envelopes for add, update and delete.

use crate::document::SearchDocument;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Kind of document mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionType {
    Add,
    Delete,
}

/// One entry of a document batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentAction {
    #[serde(rename = "type")]
    pub action: ActionType,
    pub id: String,
    pub version: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<Map<String, Value>>,
}

/// Current Unix time in seconds, used as the default document version.
pub fn current_version() -> i64 {
    chrono::Utc::now().timestamp()
}

/// Builds [`DocumentAction`]s for one language.
#[derive(Debug, Clone)]
pub struct ActionBuilder {
    lang: String,
}

impl ActionBuilder {
    pub fn new(lang: impl Into<String>) -> Self {
        Self { lang: lang.into() }
    }

    /// Add (or replace) `document` at `version`.
    pub fn add_action_with_version<D: SearchDocument>(
        &self,
        document: &D,
        version: i64,
    ) -> DocumentAction {
        DocumentAction {
            action: ActionType::Add,
            id: document.id().to_string(),
            version,
            lang: Some(self.lang.clone()),
            fields: Some(document.to_fields_map()),
        }
    }

    pub fn add_action<D: SearchDocument>(&self, document: &D) -> DocumentAction {
        self.add_action_with_version(document, current_version())
    }

    /// Delete the document `id` at `version`.
    pub fn delete_action_with_version(&self, id: &str, version: i64) -> DocumentAction {
        DocumentAction {
            action: ActionType::Delete,
            id: id.to_string(),
            version,
            lang: None,
            fields: None,
        }
    }

    pub fn delete_action(&self, id: &str) -> DocumentAction {
        self.delete_action_with_version(id, current_version())
    }
}

impl Default for ActionBuilder {
    fn default() -> Self {
        Self::new("en")
    }
}

/// Serialized size of one action, in bytes.
pub fn document_size(action: &DocumentAction) -> Result<usize> {
    Ok(serde_json::to_string(action)?.len())
}

/// Split actions into batches whose JSON arrays stay under `max_bytes`.
///
/// An action larger than the ceiling on its own still gets a batch to itself.
/// Order is preserved.
pub fn split_batches(
    actions: Vec<DocumentAction>,
    max_bytes: usize,
) -> Result<Vec<Vec<DocumentAction>>> {
    let mut batches = Vec::new();
    let mut current: Vec<DocumentAction> = Vec::new();
    // "[" + "]"
    let mut current_bytes = 2;

    for action in actions {
        let size = document_size(&action)?;
        // a comma separates every element after the first
        let added = if current.is_empty() { size } else { size + 1 };

        if !current.is_empty() && current_bytes + added > max_bytes {
            batches.push(std::mem::take(&mut current));
            current_bytes = 2;
        }

        if current.is_empty() && size + 2 > max_bytes {
            tracing::warn!(
                id = %action.id,
                size,
                max_bytes,
                "document exceeds the batch size limit; sending it alone"
            );
        }

        current_bytes += if current.is_empty() { size } else { size + 1 };
        current.push(action);
    }

    if !current.is_empty() {
        batches.push(current);
    }

    Ok(batches)
}

#[cfg(test)]
mod tests {
    use super::*;

    crate::search_document! {
        #[derive(Debug, Default, Clone)]
        struct Movie {
            title: String,
            year: Option<i64>,
            actor: Vec<String>,
        }
    }

    fn movie(id: &str, title: &str) -> Movie {
        Movie {
            id: id.to_string(),
            title: title.to_string(),
            year: Some(2012),
            actor: vec!["good actor1".into(), "good actor2".into()],
        }
    }

    #[test]
    fn test_add_action_json() {
        let builder = ActionBuilder::default();
        let action = builder.add_action_with_version(&movie("m1", "simple title"), 42);
        let json = serde_json::to_value(&action).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "type": "add",
                "id": "m1",
                "version": 42,
                "lang": "en",
                "fields": {
                    "title": "simple title",
                    "year": 2012,
                    "actor": ["good actor1", "good actor2"]
                }
            })
        );
    }

    #[test]
    fn test_delete_action_json() {
        let builder = ActionBuilder::default();
        let action = builder.delete_action_with_version("m1", 7);
        assert_eq!(
            serde_json::to_string(&action).unwrap(),
            r#"{"type":"delete","id":"m1","version":7}"#
        );
    }

    #[test]
    fn test_default_version_is_current_timestamp() {
        let before = current_version();
        let action = ActionBuilder::default().delete_action("x");
        assert!(action.version >= before);
    }

    #[test]
    fn test_document_size() {
        let builder = ActionBuilder::default();
        let a = builder.add_action_with_version(&movie("some id", "t"), 1);
        let b = builder.add_action_with_version(&movie("some id", "t"), 1);
        let c = builder.add_action_with_version(&movie("some different id", "t"), 1);
        assert_eq!(document_size(&a).unwrap(), document_size(&b).unwrap());
        assert_ne!(document_size(&a).unwrap(), document_size(&c).unwrap());
    }

    #[test]
    fn test_split_batches_respects_ceiling() {
        let builder = ActionBuilder::default();
        let actions: Vec<DocumentAction> = (0..10)
            .map(|i| builder.delete_action_with_version(&format!("doc-{}", i), 1))
            .collect();
        let one = document_size(&actions[0]).unwrap();
        // room for three actions plus brackets and two commas
        let max = 2 + one * 3 + 2;

        let batches = split_batches(actions.clone(), max).unwrap();
        assert_eq!(
            batches.iter().map(Vec::len).collect::<Vec<_>>(),
            vec![3, 3, 3, 1]
        );
        for batch in &batches {
            assert!(serde_json::to_string(batch).unwrap().len() <= max);
        }
        let flattened: Vec<DocumentAction> = batches.into_iter().flatten().collect();
        assert_eq!(flattened, actions);
    }

    #[test]
    fn test_oversized_action_goes_alone() {
        let builder = ActionBuilder::default();
        let actions = vec![
            builder.delete_action_with_version("a", 1),
            builder.add_action_with_version(&movie("big", &"x".repeat(500)), 1),
            builder.delete_action_with_version("b", 1),
        ];
        let batches = split_batches(actions, 100).unwrap();
        assert_eq!(batches.len(), 3);
        assert_eq!(batches[1][0].id, "big");
    }

    #[test]
    fn test_split_empty() {
        assert!(split_batches(Vec::new(), 10).unwrap().is_empty());
    }
}
