//! Integer intervals used by range conditions and facet constraints.

use crate::error::{CloudSearchError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A closed or half-open integer interval, rendered as `from..to`.
///
/// At least one bound is always present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawRange")]
pub struct IntegerRange {
    #[serde(skip_serializing_if = "Option::is_none")]
    from: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    to: Option<i64>,
}

#[derive(Deserialize)]
struct RawRange {
    #[serde(default)]
    from: Option<i64>,
    #[serde(default)]
    to: Option<i64>,
}

impl TryFrom<RawRange> for IntegerRange {
    type Error = CloudSearchError;

    fn try_from(raw: RawRange) -> Result<Self> {
        IntegerRange::new(raw.from, raw.to)
    }
}

impl IntegerRange {
    /// Build a range from optional bounds. Fails when both are absent.
    pub fn new(from: Option<i64>, to: Option<i64>) -> Result<Self> {
        if from.is_none() && to.is_none() {
            return Err(CloudSearchError::InvalidRange(
                "at least one of from/to must be set".to_string(),
            ));
        }
        Ok(Self { from, to })
    }

    /// `from..to`
    pub fn between(from: i64, to: i64) -> Self {
        Self {
            from: Some(from),
            to: Some(to),
        }
    }

    /// `from..`
    pub fn at_least(from: i64) -> Self {
        Self {
            from: Some(from),
            to: None,
        }
    }

    /// `..to`
    pub fn at_most(to: i64) -> Self {
        Self {
            from: None,
            to: Some(to),
        }
    }

    pub fn lower(&self) -> Option<i64> {
        self.from
    }

    pub fn upper(&self) -> Option<i64> {
        self.to
    }
}

impl fmt::Display for IntegerRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(from) = self.from {
            write!(f, "{}", from)?;
        }
        f.write_str("..")?;
        if let Some(to) = self.to {
            write!(f, "{}", to)?;
        }
        Ok(())
    }
}

impl FromStr for IntegerRange {
    type Err = CloudSearchError;

    /// Parses `a..b`, `a..` or `..b`.
    fn from_str(s: &str) -> Result<Self> {
        let (from, to) = s
            .split_once("..")
            .ok_or_else(|| CloudSearchError::InvalidRange(format!("missing '..' in '{}'", s)))?;

        let parse_bound = |bound: &str| -> Result<Option<i64>> {
            let bound = bound.trim();
            if bound.is_empty() {
                return Ok(None);
            }
            bound
                .parse::<i64>()
                .map(Some)
                .map_err(|e| CloudSearchError::InvalidRange(format!("'{}': {}", bound, e)))
        };

        IntegerRange::new(parse_bound(from)?, parse_bound(to)?)
    }
}
