//! `url` and `search` commands.

use crate::cli::args::QueryArgs;
use crate::cli::output::Output;
use crate::cli::query::{build_query, HitId};
use crate::client::CloudSearch;
use crate::error::Result;
use crate::result::{FacetResult, Message};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct UrlResponse {
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub found: u64,
    pub start: u64,
    pub ids: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub facets: Vec<FacetResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rank: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub messages: Vec<Message>,
}

/// Print the URL a search would request.
pub fn url(client: &CloudSearch<HitId>, args: &QueryArgs, output: &Output) -> Result<()> {
    let query = build_query(args)?;
    output.print(&UrlResponse {
        url: client.search_url(&query),
    })
}

pub fn run(client: &CloudSearch<HitId>, args: &QueryArgs, output: &Output) -> Result<()> {
    let query = build_query(args)?;
    let result = client.try_search(&query)?;

    if result.found == 0 {
        output.info("No documents matched.");
    }
    for message in &result.messages {
        output.warn(&format!("[{}] {}: {}", message.severity, message.code, message.message));
    }

    output.print(&SearchResponse {
        found: result.found,
        start: result.start,
        ids: result.hits.into_iter().map(|hit| hit.id).collect(),
        facets: result.facets,
        rank: result.rank,
        messages: result.messages,
    })
}
