//! Structured search queries and their wire rendering.

pub mod compiler;
pub mod condition;
pub mod facet;
pub mod range;
pub mod search_query;

pub use compiler::{compile, BooleanQuery};
pub use condition::{
    Condition, Conjunction, GroupedCondition, IntCondition, IntListCondition, IntValue,
    StringCondition, StringListCondition,
};
pub use facet::{Facet, FacetConstraint, IntFacetConstraints, StringFacetConstraints};
pub use range::IntegerRange;
pub use search_query::{Direction, Order, SearchQuery};
