//! The search client.

use crate::builder::action_builder::{split_batches, ActionBuilder, DocumentAction};
use crate::builder::query_builder::QueryBuilder;
use crate::config::CloudSearchSettings;
use crate::document::SearchDocument;
use crate::error::{CloudSearchError, Result};
use crate::query::condition::Condition;
use crate::query::search_query::SearchQuery;
use crate::result::{AddResult, DeleteResult, DocumentResult, SearchResult, UpdateResult};
use crate::serialization::decode_search_response;
use crate::transport::{HttpTransport, Transport};
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

/// Client for one search domain holding documents of type `D`.
///
/// Search methods apply the persistent conditions from the settings to a
/// copy of the caller's query. Document methods never fail: problems are
/// reported through [`DocumentResult::is_error`].
pub struct CloudSearch<D> {
    settings: CloudSearchSettings,
    query_builder: QueryBuilder,
    action_builder: ActionBuilder,
    transport: Arc<dyn Transport>,
    _document: PhantomData<fn() -> D>,
}

impl<D: SearchDocument> CloudSearch<D> {
    /// A client using HTTP. Fails when the settings name no domain.
    pub fn new(settings: CloudSearchSettings) -> Result<Self> {
        settings.validate()?;
        let transport = HttpTransport::new(settings.timeout())?;
        Ok(Self::with_transport(settings, Arc::new(transport)))
    }

    pub fn with_transport(settings: CloudSearchSettings, transport: Arc<dyn Transport>) -> Self {
        Self {
            query_builder: QueryBuilder::new(settings.search_uri()),
            action_builder: ActionBuilder::new(settings.lang.clone()),
            settings,
            transport,
            _document: PhantomData,
        }
    }

    pub fn settings(&self) -> &CloudSearchSettings {
        &self.settings
    }

    pub fn persistent_conditions(&self) -> &[Condition] {
        &self.settings.persistent_conditions
    }

    // ========================================================================
    // Search
    // ========================================================================

    /// A copy of `query` with the persistent conditions appended.
    pub fn apply_persistent_conditions(&self, query: &SearchQuery<D>) -> SearchQuery<D> {
        let mut query = query.clone();
        query
            .boolean_query
            .extend(self.settings.persistent_conditions.iter().cloned());
        query
    }

    /// The URL [`CloudSearch::search`] would request.
    pub fn search_url(&self, query: &SearchQuery<D>) -> String {
        self.query_builder
            .build_search_url(&self.apply_persistent_conditions(query))
    }

    /// Run a search. Failures come back as a result with `is_error` set.
    pub fn search(&self, query: &SearchQuery<D>) -> SearchResult<D> {
        match self.fetch(query) {
            Ok(result) => result,
            Err(e) => {
                tracing::warn!(error = %e, "search failed");
                SearchResult::failed(format!("An error occurred: {}", e))
            }
        }
    }

    /// Run a search, returning transport, decoding and service errors as `Err`.
    pub fn try_search(&self, query: &SearchQuery<D>) -> Result<SearchResult<D>> {
        let result = self.fetch(query)?;
        match (result.is_error, result.error) {
            (true, Some(message)) => Err(CloudSearchError::Service(message)),
            (true, None) => Err(CloudSearchError::Service("unknown error".to_string())),
            (false, error) => Ok(SearchResult { error, ..result }),
        }
    }

    fn fetch(&self, query: &SearchQuery<D>) -> Result<SearchResult<D>> {
        let url = self.search_url(query);
        let body = self.transport.get(&url)?;
        decode_search_response(&body)
    }

    // ========================================================================
    // Documents
    // ========================================================================

    pub fn add(&self, document: &D) -> AddResult {
        self.submit(vec![self.action_builder.add_action(document)])
    }

    /// Add documents, split into as many batches as the size ceiling needs.
    pub fn add_many(&self, documents: &[D]) -> AddResult {
        let version = crate::builder::current_version();
        let actions = documents
            .iter()
            .map(|document| self.action_builder.add_action_with_version(document, version))
            .collect();
        self.submit(actions)
    }

    /// Replace a document. Same as [`CloudSearch::add`] with a fresh version.
    pub fn update(&self, document: &D) -> UpdateResult {
        self.add(document)
    }

    pub fn delete(&self, document: &D) -> DeleteResult {
        self.delete_by_id(document.id())
    }

    pub fn delete_by_id(&self, id: &str) -> DeleteResult {
        self.submit(vec![self.action_builder.delete_action(id)])
    }

    pub fn delete_many<I, S>(&self, ids: I) -> DeleteResult
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let version = crate::builder::current_version();
        let actions = ids
            .into_iter()
            .map(|id| self.action_builder.delete_action_with_version(id.as_ref(), version))
            .collect();
        self.submit(actions)
    }

    /// Send prepared actions, batching by `max_batch_bytes`, and merge the
    /// per-batch results.
    pub fn submit(&self, actions: Vec<DocumentAction>) -> DocumentResult {
        let count = actions.len();
        let batches = match split_batches(actions, self.settings.max_batch_bytes) {
            Ok(batches) => batches,
            Err(e) => return DocumentResult::failed(e.to_string()),
        };
        tracing::debug!(actions = count, batches = batches.len(), "submitting documents");

        let mut total: Option<DocumentResult> = None;
        for batch in &batches {
            let result = self.post_batch(batch);
            match total.as_mut() {
                Some(total) => total.merge(result),
                None => total = Some(result),
            }
        }
        total.unwrap_or_else(|| DocumentResult {
            status: "success".to_string(),
            ..DocumentResult::default()
        })
    }

    fn post_batch(&self, batch: &[DocumentAction]) -> DocumentResult {
        let outcome = serde_json::to_string(batch)
            .map_err(CloudSearchError::from)
            .and_then(|body| self.transport.post(&self.settings.document_uri(), &body))
            .and_then(|body| DocumentResult::from_body(&body));

        match outcome {
            Ok(result) => {
                if result.is_error {
                    tracing::warn!(errors = %result.error_summary(), "document batch rejected");
                }
                result
            }
            Err(e) => {
                tracing::warn!(error = %e, "document batch failed");
                DocumentResult::failed(e.to_string())
            }
        }
    }
}

impl<D> fmt::Debug for CloudSearch<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CloudSearch")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}
