//! Assembles a [`SearchQuery`] into the search URL.
//!
//! Parameters are produced in a fixed order (keyword, boolean expression,
//! facets, return fields, size, start, rank). Each parameter is rendered on
//! its own and [`QueryBuilder::build_query_string`] is the only place that
//! writes `&` between them.

use crate::query::compiler::{compile, BooleanQuery};
use crate::query::condition::escape_literal;
use crate::query::facet::Facet;
use crate::query::search_query::{Direction, Order, SearchQuery};

/// Turns search queries into request URLs for one search endpoint.
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    search_uri: String,
}

impl QueryBuilder {
    pub fn new(search_uri: impl Into<String>) -> Self {
        Self {
            search_uri: search_uri.into(),
        }
    }

    pub fn search_uri(&self) -> &str {
        &self.search_uri
    }

    /// The full request URL: `<search_uri>?<query string>`.
    pub fn build_search_url<D>(&self, query: &SearchQuery<D>) -> String {
        let url = format!("{}?{}", self.search_uri, build_query_string(query));
        tracing::debug!(%url, "built search url");
        url
    }

    /// See [`build_query_string`].
    pub fn build_query_string<D>(&self, query: &SearchQuery<D>) -> String {
        build_query_string(query)
    }
}

/// Render every parameter of `query` and join them with `&`.
pub fn build_query_string<D>(query: &SearchQuery<D>) -> String {
    let mut params: Vec<String> = Vec::new();

    match &query.public_query {
        Some(raw) => params.extend(public_query_param(raw)),
        None => {
            params.extend(keyword_param(query.keyword.as_deref()));
            params.extend(boolean_param(&query.boolean_query));
        }
    }
    params.extend(facet_params(&query.facets));
    params.extend(fields_param(&query.fields));
    params.extend(query.size.map(|size| format!("size={}", size)));
    params.push(format!("start={}", query.start));
    params.extend(query.order.as_ref().map(rank_param));

    params.join("&")
}

/// `q=<escaped keyword>`, absent for an empty or missing keyword.
pub fn keyword_param(keyword: Option<&str>) -> Option<String> {
    match keyword {
        Some(keyword) if !keyword.is_empty() => Some(format!("q={}", escape_literal(keyword))),
        _ => None,
    }
}

/// `bq=<compiled expression>`, absent when nothing compiles.
pub fn boolean_param(boolean_query: &BooleanQuery) -> Option<String> {
    compile(boolean_query).map(|expression| format!("bq={}", expression))
}

/// A caller-supplied query string fragment, trimmed of stray separators.
fn public_query_param(raw: &str) -> Option<String> {
    let trimmed = raw.trim().trim_start_matches('?').trim_matches('&');
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// `facet=a,b` followed by each facet's `top-n` and `constraints`.
pub fn facet_params(facets: &[Facet]) -> Vec<String> {
    let named: Vec<&Facet> = facets.iter().filter(|f| !f.name.is_empty()).collect();
    if named.is_empty() {
        return Vec::new();
    }

    let names: Vec<String> = named.iter().map(|f| escape_literal(&f.name)).collect();
    let mut params = vec![format!("facet={}", names.join(","))];

    for facet in named {
        let name = escape_literal(&facet.name);
        if let Some(top) = facet.top_result {
            params.push(format!("facet-{}-top-n={}", name, top));
        }
        if let Some(constraints) = facet
            .constraint
            .as_ref()
            .and_then(|constraint| constraint.request_param())
        {
            params.push(format!("facet-{}-constraints={}", name, constraints));
        }
    }

    params
}

/// `return-fields=a%2Cb`, absent for an empty list.
pub fn fields_param(fields: &[String]) -> Option<String> {
    if fields.is_empty() {
        return None;
    }
    let escaped: Vec<String> = fields.iter().map(|f| escape_literal(f)).collect();
    Some(format!("return-fields={}", escaped.join("%2C")))
}

/// `rank=field` or `rank=-field`, with the field name escaped.
pub fn rank_param(order: &Order) -> String {
    let field = escape_literal(&order.field);
    match order.direction {
        Direction::Ascending => format!("rank={}", field),
        Direction::Descending => format!("rank=-{}", field),
    }
}
