//! Request builders: search URLs and document batches.

pub mod action_builder;
pub mod query_builder;

pub use action_builder::{
    current_version, document_size, split_batches, ActionBuilder, ActionType, DocumentAction,
};
pub use query_builder::{build_query_string, QueryBuilder};
