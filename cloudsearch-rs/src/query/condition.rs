//! Boolean conditions and their rendering into the `bq` expression grammar.
//!
//! Every condition renders a *fragment*: a piece of the expression with no
//! leading or trailing `+`. Separators between fragments are written only by
//! the compiler (see [`crate::query::compiler`]).
//!
//! Fragment shapes:
//! ```text
//! text        field%3A'value'          ('value' alone when field is absent)
//! int         field%3A1977 | field%3A2000..2004
//! text list   field%3A'a'+field%3A'b'
//! int list    field%3A1+field%3A2
//! group       (and+<left>+<right>) | (or+<left>+<right>)
//! negated     (not+<fragment>)
//! negated list (not+(or+field%3A'a'+field%3A'b'))
//! ```
//!
//! Empty lists, and groups whose children are all empty, render nothing.

use crate::query::range::IntegerRange;
use serde::{Deserialize, Serialize};

/// Which bucket a top-level condition joins, or the operator of a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Conjunction {
    #[default]
    And,
    Or,
}

impl Conjunction {
    /// The grammar keyword for this conjunction.
    pub fn keyword(self) -> &'static str {
        match self {
            Conjunction::And => "and",
            Conjunction::Or => "or",
        }
    }
}

fn or_conjunction() -> Conjunction {
    Conjunction::Or
}

// ============================================================================
// Escaping
// ============================================================================

/// Percent-encode a field name or literal value.
///
/// Everything outside the unreserved set (`A-Z a-z 0-9 - _ . ~`) is escaped,
/// so `:` becomes `%3A`, a space `%20` and `+` `%2B`. A raw `+` can therefore
/// only ever appear as a grammar separator.
pub fn escape_literal(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

fn field_prefix(field: &str) -> String {
    format!("{}%3A", escape_literal(field))
}

fn quoted(value: &str) -> String {
    format!("'{}'", escape_literal(value))
}

fn apply_negation(fragment: String, negate: bool) -> String {
    if negate && !fragment.is_empty() {
        format!("(not+{})", fragment)
    } else {
        fragment
    }
}

/// Join list terms with `+`. `not` takes a single operand, so a negated list
/// of several terms is first grouped under its bucket's keyword.
fn join_terms(terms: Vec<String>, conjunction: Conjunction, negate: bool) -> String {
    let fragment = terms.join("+");
    if negate && terms.len() > 1 {
        format!("(not+({}+{}))", conjunction.keyword(), fragment)
    } else {
        apply_negation(fragment, negate)
    }
}

// ============================================================================
// Condition variants
// ============================================================================

/// Equality on a text field: `field:'value'`.
///
/// Joins the AND bucket unless told otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StringCondition {
    /// Field name. `None` renders the quoted literal alone.
    #[serde(default)]
    pub field: Option<String>,
    pub value: String,
    #[serde(default)]
    pub conjunction: Conjunction,
    #[serde(default)]
    pub negate: bool,
}

impl StringCondition {
    pub fn new(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            field: Some(field.into()),
            value: value.into(),
            conjunction: Conjunction::And,
            negate: false,
        }
    }

    /// A bare quoted literal with no field prefix.
    pub fn literal(value: impl Into<String>) -> Self {
        Self {
            field: None,
            value: value.into(),
            conjunction: Conjunction::And,
            negate: false,
        }
    }

    pub fn param(&self) -> String {
        let fragment = match &self.field {
            Some(field) => format!("{}{}", field_prefix(field), quoted(&self.value)),
            None => quoted(&self.value),
        };
        apply_negation(fragment, self.negate)
    }
}

/// Value side of an integer condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IntValue {
    Exact(i64),
    Range(IntegerRange),
}

impl IntValue {
    fn render(&self) -> String {
        match self {
            IntValue::Exact(n) => n.to_string(),
            IntValue::Range(range) => range.to_string(),
        }
    }
}

/// Equality or range on an integer field: `field:1977`, `field:2000..2004`.
///
/// Joins the OR bucket unless told otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntCondition {
    pub field: String,
    pub value: IntValue,
    #[serde(default = "or_conjunction")]
    pub conjunction: Conjunction,
    #[serde(default)]
    pub negate: bool,
}

impl IntCondition {
    pub fn equals(field: impl Into<String>, value: i64) -> Self {
        Self {
            field: field.into(),
            value: IntValue::Exact(value),
            conjunction: Conjunction::Or,
            negate: false,
        }
    }

    pub fn range(field: impl Into<String>, range: IntegerRange) -> Self {
        Self {
            field: field.into(),
            value: IntValue::Range(range),
            conjunction: Conjunction::Or,
            negate: false,
        }
    }

    /// Replace the value with `from..`.
    pub fn set_from(&mut self, from: i64) {
        self.value = IntValue::Range(IntegerRange::at_least(from));
    }

    /// Replace the value with `..to`.
    pub fn set_to(&mut self, to: i64) {
        self.value = IntValue::Range(IntegerRange::at_most(to));
    }

    /// Replace the value with `from..to`.
    pub fn set_interval(&mut self, from: i64, to: i64) {
        self.value = IntValue::Range(IntegerRange::between(from, to));
    }

    pub fn param(&self) -> String {
        let fragment = format!("{}{}", field_prefix(&self.field), self.value.render());
        apply_negation(fragment, self.negate)
    }
}

/// Expands to one `field:'value'` term per value.
///
/// The terms are not wrapped; the bucket the condition lands in decides how
/// they combine. Joins the OR bucket unless told otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StringListCondition {
    pub field: String,
    pub values: Vec<String>,
    #[serde(default = "or_conjunction")]
    pub conjunction: Conjunction,
    #[serde(default)]
    pub negate: bool,
}

impl StringListCondition {
    pub fn new<I, S>(field: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            field: field.into(),
            values: values.into_iter().map(Into::into).collect(),
            conjunction: Conjunction::Or,
            negate: false,
        }
    }

    pub fn param(&self) -> String {
        let prefix = field_prefix(&self.field);
        let terms = self
            .values
            .iter()
            .map(|value| format!("{}{}", prefix, quoted(value)))
            .collect();
        join_terms(terms, self.conjunction, self.negate)
    }
}

/// Expands to one `field:n` term per value. Joins the OR bucket unless told
/// otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntListCondition {
    pub field: String,
    pub values: Vec<i64>,
    #[serde(default = "or_conjunction")]
    pub conjunction: Conjunction,
    #[serde(default)]
    pub negate: bool,
}

impl IntListCondition {
    pub fn new(field: impl Into<String>, values: impl IntoIterator<Item = i64>) -> Self {
        Self {
            field: field.into(),
            values: values.into_iter().collect(),
            conjunction: Conjunction::Or,
            negate: false,
        }
    }

    pub fn param(&self) -> String {
        let prefix = field_prefix(&self.field);
        let terms = self
            .values
            .iter()
            .map(|value| format!("{}{}", prefix, value))
            .collect();
        join_terms(terms, self.conjunction, self.negate)
    }
}

/// Two conditions combined under one operator: `(op+left+right)`.
///
/// The operator is independent of `conjunction`, which only picks the
/// top-level bucket (AND unless told otherwise).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupedCondition {
    pub left: Box<Condition>,
    pub operator: Conjunction,
    pub right: Box<Condition>,
    #[serde(default)]
    pub conjunction: Conjunction,
    #[serde(default)]
    pub negate: bool,
}

impl GroupedCondition {
    pub fn new(
        left: impl Into<Condition>,
        operator: Conjunction,
        right: impl Into<Condition>,
    ) -> Self {
        Self {
            left: Box::new(left.into()),
            operator,
            right: Box::new(right.into()),
            conjunction: Conjunction::And,
            negate: false,
        }
    }

    /// Empty children are skipped. With no child left the group renders
    /// nothing, so the compiler drops it like an empty list.
    pub fn param(&self) -> String {
        let children: Vec<String> = [self.left.param(), self.right.param()]
            .into_iter()
            .filter(|fragment| !fragment.is_empty())
            .collect();
        if children.is_empty() {
            return String::new();
        }
        let fragment = format!("({}+{})", self.operator.keyword(), children.join("+"));
        apply_negation(fragment, self.negate)
    }
}

macro_rules! impl_condition_flags {
    ($($ty:ty),* $(,)?) => {
        $(
            impl $ty {
                /// Put this condition in the given top-level bucket.
                pub fn with_conjunction(mut self, conjunction: Conjunction) -> Self {
                    self.conjunction = conjunction;
                    self
                }

                /// Wrap the rendered fragment in `(not+...)`. A list with
                /// several values is grouped under its bucket's keyword first.
                pub fn negated(mut self) -> Self {
                    self.negate = true;
                    self
                }
            }
        )*
    };
}

impl_condition_flags!(
    StringCondition,
    IntCondition,
    StringListCondition,
    IntListCondition,
    GroupedCondition,
);

// ============================================================================
// Condition
// ============================================================================

/// Any boolean condition accepted by a [`crate::query::BooleanQuery`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Condition {
    Text(StringCondition),
    Int(IntCondition),
    TextList(StringListCondition),
    IntList(IntListCondition),
    Group(GroupedCondition),
}

impl Condition {
    /// Render this condition's expression fragment.
    pub fn param(&self) -> String {
        match self {
            Condition::Text(c) => c.param(),
            Condition::Int(c) => c.param(),
            Condition::TextList(c) => c.param(),
            Condition::IntList(c) => c.param(),
            Condition::Group(c) => c.param(),
        }
    }

    /// The top-level bucket this condition belongs to.
    pub fn conjunction(&self) -> Conjunction {
        match self {
            Condition::Text(c) => c.conjunction,
            Condition::Int(c) => c.conjunction,
            Condition::TextList(c) => c.conjunction,
            Condition::IntList(c) => c.conjunction,
            Condition::Group(c) => c.conjunction,
        }
    }

    pub fn is_list(&self) -> bool {
        matches!(self, Condition::TextList(_) | Condition::IntList(_))
    }
}

impl From<StringCondition> for Condition {
    fn from(c: StringCondition) -> Self {
        Condition::Text(c)
    }
}

impl From<IntCondition> for Condition {
    fn from(c: IntCondition) -> Self {
        Condition::Int(c)
    }
}

impl From<StringListCondition> for Condition {
    fn from(c: StringListCondition) -> Self {
        Condition::TextList(c)
    }
}

impl From<IntListCondition> for Condition {
    fn from(c: IntListCondition) -> Self {
        Condition::IntList(c)
    }
}

impl From<GroupedCondition> for Condition {
    fn from(c: GroupedCondition) -> Self {
        Condition::Group(c)
    }
}
