//! Facet requests and constraint serialization.

use crate::query::condition::escape_literal;
use crate::query::range::IntegerRange;
use serde::{Deserialize, Serialize};

/// A requested facet over one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Facet {
    pub name: String,
    /// Emitted as `facet-<name>-top-n`.
    #[serde(default)]
    pub top_result: Option<u32>,
    #[serde(default)]
    pub constraint: Option<FacetConstraint>,
}

impl Facet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            top_result: None,
            constraint: None,
        }
    }

    pub fn with_top_result(mut self, top: u32) -> Self {
        self.top_result = Some(top);
        self
    }

    pub fn with_constraint(mut self, constraint: impl Into<FacetConstraint>) -> Self {
        self.constraint = Some(constraint.into());
        self
    }
}

/// Restricts the buckets a facet reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FacetConstraint {
    Int(IntFacetConstraints),
    Text(StringFacetConstraints),
}

impl FacetConstraint {
    /// Comma-joined constraint list, or `None` when there are no constraints.
    pub fn request_param(&self) -> Option<String> {
        match self {
            FacetConstraint::Int(c) => c.request_param(),
            FacetConstraint::Text(c) => c.request_param(),
        }
    }
}

/// Integer ranges, rendered as `from..to` and comma-joined.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntFacetConstraints {
    pub ranges: Vec<IntegerRange>,
}

impl IntFacetConstraints {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_range(&mut self, range: IntegerRange) {
        self.ranges.push(range);
    }

    pub fn add_interval(&mut self, from: i64, to: i64) {
        self.add_range(IntegerRange::between(from, to));
    }

    pub fn add_from(&mut self, from: i64) {
        self.add_range(IntegerRange::at_least(from));
    }

    pub fn add_to(&mut self, to: i64) {
        self.add_range(IntegerRange::at_most(to));
    }

    pub fn request_param(&self) -> Option<String> {
        if self.ranges.is_empty() {
            return None;
        }
        Some(
            self.ranges
                .iter()
                .map(IntegerRange::to_string)
                .collect::<Vec<_>>()
                .join(","),
        )
    }
}

/// Literal values, rendered as `'value'` and comma-joined.
///
/// The quotes delimit the literal; the value inside is percent-escaped so a
/// comma or space in a value cannot be read as a separator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StringFacetConstraints {
    pub values: Vec<String>,
}

impl StringFacetConstraints {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_constraint(&mut self, value: impl Into<String>) {
        self.values.push(value.into());
    }

    pub fn request_param(&self) -> Option<String> {
        if self.values.is_empty() {
            return None;
        }
        Some(
            self.values
                .iter()
                .map(|value| format!("'{}'", escape_literal(value)))
                .collect::<Vec<_>>()
                .join(","),
        )
    }
}

impl From<IntFacetConstraints> for FacetConstraint {
    fn from(c: IntFacetConstraints) -> Self {
        FacetConstraint::Int(c)
    }
}

impl From<StringFacetConstraints> for FacetConstraint {
    fn from(c: StringFacetConstraints) -> Self {
        FacetConstraint::Text(c)
    }
}

impl<S: Into<String>> FromIterator<S> for StringFacetConstraints {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl FromIterator<IntegerRange> for IntFacetConstraints {
    fn from_iter<I: IntoIterator<Item = IntegerRange>>(iter: I) -> Self {
        Self {
            ranges: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_int_constraints() {
        let mut c = IntFacetConstraints::new();
        c.add_from(1950);
        c.add_interval(1980, 2012);
        c.add_to(1900);
        assert_eq!(c.request_param().unwrap(), "1950..,1980..2012,..1900");
    }

    #[test]
    fn test_string_constraints() {
        let mut c = StringFacetConstraints::new();
        c.add_constraint("Sci-Fi");
        c.add_constraint("Fantasy");
        c.add_constraint("Action");
        assert_eq!(c.request_param().unwrap(), "'Sci-Fi','Fantasy','Action'");
    }

    #[test]
    fn test_string_constraint_escaping() {
        let c: StringFacetConstraints = ["Film Noir", "a,b"].into_iter().collect();
        assert_eq!(c.request_param().unwrap(), "'Film%20Noir','a%2Cb'");
    }

    #[test]
    fn test_empty_constraints_are_absent() {
        assert_eq!(IntFacetConstraints::new().request_param(), None);
        assert_eq!(StringFacetConstraints::new().request_param(), None);
        assert_eq!(
            FacetConstraint::from(StringFacetConstraints::new()).request_param(),
            None
        );
    }

    #[test]
    fn test_facet_builder() {
        let facet = Facet::new("genre")
            .with_top_result(2)
            .with_constraint(["Sci-Fi"].into_iter().collect::<StringFacetConstraints>());
        assert_eq!(facet.top_result, Some(2));
        assert_eq!(
            facet.constraint.unwrap().request_param().unwrap(),
            "'Sci-Fi'"
        );
    }
}
