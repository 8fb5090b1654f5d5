//! A full search request for one document type.

use crate::document::SearchDocument;
use crate::query::compiler::BooleanQuery;
use crate::query::condition::Condition;
use crate::query::facet::Facet;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;

/// Sort direction for [`Order`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Ascending,
    Descending,
}

/// Rank expression: `rank=field` or `rank=-field`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub field: String,
    #[serde(default)]
    pub direction: Direction,
}

impl Order {
    pub fn ascending(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: Direction::Ascending,
        }
    }

    pub fn descending(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: Direction::Descending,
        }
    }

    /// Parse `field` or `-field`.
    pub fn parse(spec: &str) -> Self {
        match spec.strip_prefix('-') {
            Some(field) => Self::descending(field),
            None => Self::ascending(spec),
        }
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.direction {
            Direction::Ascending => write!(f, "{}", self.field),
            Direction::Descending => write!(f, "-{}", self.field),
        }
    }
}

/// Everything needed to issue one search for documents of type `D`.
///
/// `fields` starts out as every field of `D`. Setting `public_query`
/// replaces the keyword and boolean expression with a caller-supplied query
/// string fragment.
pub struct SearchQuery<D> {
    pub keyword: Option<String>,
    pub boolean_query: BooleanQuery,
    pub facets: Vec<Facet>,
    pub fields: Vec<String>,
    pub start: u32,
    pub size: Option<u32>,
    pub order: Option<Order>,
    pub public_query: Option<String>,
    _document: PhantomData<fn() -> D>,
}

impl<D: SearchDocument> SearchQuery<D> {
    pub fn new() -> Self {
        Self {
            keyword: None,
            boolean_query: BooleanQuery::new(),
            facets: Vec::new(),
            fields: D::field_names().into_iter().map(String::from).collect(),
            start: 0,
            size: None,
            order: None,
            public_query: None,
            _document: PhantomData,
        }
    }
}

impl<D: SearchDocument> Default for SearchQuery<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D> SearchQuery<D> {
    pub fn with_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.keyword = Some(keyword.into());
        self
    }

    pub fn with_condition(mut self, condition: impl Into<Condition>) -> Self {
        self.boolean_query.add(condition);
        self
    }

    pub fn with_boolean_query(mut self, boolean_query: BooleanQuery) -> Self {
        self.boolean_query = boolean_query;
        self
    }

    pub fn with_facet(mut self, facet: Facet) -> Self {
        self.facets.push(facet);
        self
    }

    /// Replace the returned field list.
    pub fn with_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_start(mut self, start: u32) -> Self {
        self.start = start;
        self
    }

    pub fn with_size(mut self, size: u32) -> Self {
        self.size = Some(size);
        self
    }

    pub fn with_order(mut self, order: Order) -> Self {
        self.order = Some(order);
        self
    }

    pub fn with_public_query(mut self, query: impl Into<String>) -> Self {
        self.public_query = Some(query.into());
        self
    }
}

impl<D> Clone for SearchQuery<D> {
    fn clone(&self) -> Self {
        Self {
            keyword: self.keyword.clone(),
            boolean_query: self.boolean_query.clone(),
            facets: self.facets.clone(),
            fields: self.fields.clone(),
            start: self.start,
            size: self.size,
            order: self.order.clone(),
            public_query: self.public_query.clone(),
            _document: PhantomData,
        }
    }
}

impl<D> fmt::Debug for SearchQuery<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchQuery")
            .field("keyword", &self.keyword)
            .field("boolean_query", &self.boolean_query)
            .field("facets", &self.facets)
            .field("fields", &self.fields)
            .field("start", &self.start)
            .field("size", &self.size)
            .field("order", &self.order)
            .field("public_query", &self.public_query)
            .finish()
    }
}
