//! Turning command-line filters into a search query.

use crate::cli::args::QueryArgs;
use crate::error::{CloudSearchError, Result};
use crate::query::{Conjunction, Facet, IntCondition, IntegerRange, Order, SearchQuery, StringCondition};

crate::search_document! {
    /// Document type used by the CLI: hits are reported by id only.
    #[derive(Debug, Default, Clone)]
    pub struct HitId {}
}

/// Build the query described by `args`.
pub fn build_query(args: &QueryArgs) -> Result<SearchQuery<HitId>> {
    let mut query = SearchQuery::<HitId>::new().with_start(args.start);

    if let Some(keyword) = &args.keyword {
        query = query.with_keyword(keyword.clone());
    }
    for filter in &args.and_filters {
        let (field, value) = split_filter(filter)?;
        query = query.with_condition(StringCondition::new(field, value));
    }
    for filter in &args.or_filters {
        let (field, value) = split_filter(filter)?;
        query = query
            .with_condition(StringCondition::new(field, value).with_conjunction(Conjunction::Or));
    }
    for filter in &args.int_filters {
        query = query.with_condition(int_condition(filter)?);
    }
    for name in &args.facets {
        query = query.with_facet(Facet::new(name.clone()));
    }
    if !args.return_fields.is_empty() {
        query = query.with_fields(args.return_fields.iter().cloned());
    }
    if let Some(size) = args.size {
        query = query.with_size(size);
    }
    if let Some(rank) = &args.rank {
        query = query.with_order(Order::parse(rank));
    }
    if let Some(raw) = &args.raw {
        query = query.with_public_query(raw.clone());
    }

    Ok(query)
}

fn split_filter(filter: &str) -> Result<(&str, &str)> {
    match filter.split_once('=') {
        Some((field, value)) if !field.trim().is_empty() => Ok((field.trim(), value)),
        _ => Err(CloudSearchError::Other(format!(
            "Invalid filter '{}': expected FIELD=VALUE",
            filter
        ))),
    }
}

fn int_condition(filter: &str) -> Result<IntCondition> {
    let (field, value) = split_filter(filter)?;
    if value.contains("..") {
        return Ok(IntCondition::range(field, value.parse::<IntegerRange>()?));
    }
    let number = value.trim().parse::<i64>().map_err(|e| {
        CloudSearchError::Other(format!("Invalid integer in '{}': {}", filter, e))
    })?;
    Ok(IntCondition::equals(field, number))
}
