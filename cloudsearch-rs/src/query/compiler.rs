//! Compiles a [`BooleanQuery`] into the value of the `bq` parameter.
//!
//! Conditions are split into an AND bucket and an OR bucket by their
//! conjunction, keeping encounter order inside each bucket:
//!
//! ```text
//! AND bucket [A1, A2]          -> and+A1+A2
//! OR bucket  [O1]              -> or+O1
//! OR bucket  [O1, O2, ...]     -> and+(or+O1)+(or+O2)+...
//! ```
//!
//! Each resulting clause is wrapped in parentheses and the clauses are
//! joined with `+`, AND clause first. Only this module writes separators
//! between condition fragments.

use crate::query::condition::{Condition, Conjunction};
use serde::{Deserialize, Serialize};

/// An ordered list of top-level conditions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BooleanQuery {
    pub conditions: Vec<Condition>,
}

impl BooleanQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a condition.
    pub fn add(&mut self, condition: impl Into<Condition>) {
        self.conditions.push(condition.into());
    }

    /// Builder-style [`BooleanQuery::add`].
    pub fn with(mut self, condition: impl Into<Condition>) -> Self {
        self.add(condition);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    /// Compile into the `bq` value. See [`compile`].
    pub fn compile(&self) -> Option<String> {
        compile(self)
    }
}

impl FromIterator<Condition> for BooleanQuery {
    fn from_iter<I: IntoIterator<Item = Condition>>(iter: I) -> Self {
        Self {
            conditions: iter.into_iter().collect(),
        }
    }
}

impl Extend<Condition> for BooleanQuery {
    fn extend<I: IntoIterator<Item = Condition>>(&mut self, iter: I) {
        self.conditions.extend(iter);
    }
}

/// Rendered fragments of a query, split by bucket.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SplitConditions {
    pub and: Vec<String>,
    pub or: Vec<String>,
}

/// Render every condition and sort the fragments into buckets.
///
/// Empty fragments (for example an empty list condition) are dropped.
pub fn split_conditions(query: &BooleanQuery) -> SplitConditions {
    let mut split = SplitConditions::default();

    for condition in &query.conditions {
        let fragment = condition.param();
        if fragment.is_empty() {
            tracing::debug!(?condition, "skipping condition with empty fragment");
            continue;
        }
        match condition.conjunction() {
            Conjunction::And => split.and.push(fragment),
            Conjunction::Or => split.or.push(fragment),
        }
    }

    split
}

fn and_clause(fragments: &[String]) -> Option<String> {
    if fragments.is_empty() {
        return None;
    }
    Some(format!("and+{}", fragments.join("+")))
}

fn or_clause(fragments: &[String]) -> Option<String> {
    match fragments {
        [] => None,
        [single] => Some(format!("or+{}", single)),
        many => {
            let wrapped: Vec<String> = many
                .iter()
                .map(|fragment| format!("(or+{})", fragment))
                .collect();
            Some(format!("and+{}", wrapped.join("+")))
        }
    }
}

/// Compile a query into the `bq` parameter value.
///
/// Returns `None` when nothing would be rendered, in which case the caller
/// omits the parameter entirely. Pure: compiling twice yields the same
/// string.
pub fn compile(query: &BooleanQuery) -> Option<String> {
    let split = split_conditions(query);

    let clauses: Vec<String> = [and_clause(&split.and), or_clause(&split.or)]
        .into_iter()
        .flatten()
        .map(|clause| format!("({})", clause))
        .collect();

    if clauses.is_empty() {
        None
    } else {
        Some(clauses.join("+"))
    }
}
