//! Conversions between Rust field types and the wire format.
//!
//! Hits carry every field as a list of strings. Scalars take the first
//! element; lists convert element by element. A value that does not parse
//! never fails the hit:
//!
//! - scalar integers and dates fall back to their default (`0`, `None`, epoch)
//! - `Vec<i64>`, `Vec<i32>` and `Vec<DateTime<Utc>>` skip bad elements
//! - `Vec<Option<i64>>` keeps the position and stores `None`

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// What kind of value a field holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Text,
    NullableText,
    TextList,
    Int,
    NullableInt,
    IntList,
    NullableIntList,
    Date,
    NullableDate,
    DateList,
}

impl FieldKind {
    pub fn is_list(self) -> bool {
        matches!(
            self,
            FieldKind::TextList | FieldKind::IntList | FieldKind::NullableIntList | FieldKind::DateList
        )
    }
}

/// A Rust type that can be stored in a document field.
pub trait FieldType: Sized {
    const KIND: FieldKind;

    /// Build the value from a hit's string list.
    fn from_wire(values: &[String]) -> Self;

    /// JSON form used in add batches.
    fn to_json(&self) -> Value;
}

/// Parse a date as the service returns it.
///
/// Accepts RFC 3339, `YYYY-MM-DDTHH:MM:SS`, `YYYY-MM-DD HH:MM:SS`,
/// `YYYY-MM-DD` and integer Unix seconds. Naive values are taken as UTC.
pub fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|naive| Utc.from_utc_datetime(&naive));
    }
    raw.parse::<i64>()
        .ok()
        .and_then(|secs| Utc.timestamp_opt(secs, 0).single())
}

fn date_to_json(date: &DateTime<Utc>) -> Value {
    Value::String(date.to_rfc3339_opts(SecondsFormat::Secs, true))
}

// ============================================================================
// Text
// ============================================================================

impl FieldType for String {
    const KIND: FieldKind = FieldKind::Text;

    fn from_wire(values: &[String]) -> Self {
        values.first().cloned().unwrap_or_default()
    }

    fn to_json(&self) -> Value {
        Value::String(self.clone())
    }
}

impl FieldType for Option<String> {
    const KIND: FieldKind = FieldKind::NullableText;

    fn from_wire(values: &[String]) -> Self {
        values.first().cloned()
    }

    fn to_json(&self) -> Value {
        self.as_ref().map_or(Value::Null, |s| Value::String(s.clone()))
    }
}

impl FieldType for Vec<String> {
    const KIND: FieldKind = FieldKind::TextList;

    fn from_wire(values: &[String]) -> Self {
        values.to_vec()
    }

    fn to_json(&self) -> Value {
        Value::from(self.clone())
    }
}

// ============================================================================
// Integers
// ============================================================================

macro_rules! impl_int_field {
    ($($int:ty),*) => {
        $(
            impl FieldType for $int {
                const KIND: FieldKind = FieldKind::Int;

                fn from_wire(values: &[String]) -> Self {
                    values
                        .first()
                        .and_then(|v| v.trim().parse().ok())
                        .unwrap_or_default()
                }

                fn to_json(&self) -> Value {
                    Value::from(*self)
                }
            }

            impl FieldType for Option<$int> {
                const KIND: FieldKind = FieldKind::NullableInt;

                fn from_wire(values: &[String]) -> Self {
                    values.first().and_then(|v| v.trim().parse().ok())
                }

                fn to_json(&self) -> Value {
                    self.map_or(Value::Null, Value::from)
                }
            }

            impl FieldType for Vec<$int> {
                const KIND: FieldKind = FieldKind::IntList;

                fn from_wire(values: &[String]) -> Self {
                    values.iter().filter_map(|v| v.trim().parse().ok()).collect()
                }

                fn to_json(&self) -> Value {
                    Value::from(self.clone())
                }
            }
        )*
    };
}

impl_int_field!(i32, i64);

impl FieldType for Vec<Option<i64>> {
    const KIND: FieldKind = FieldKind::NullableIntList;

    fn from_wire(values: &[String]) -> Self {
        values.iter().map(|v| v.trim().parse().ok()).collect()
    }

    fn to_json(&self) -> Value {
        Value::Array(
            self.iter()
                .map(|v| v.map_or(Value::Null, Value::from))
                .collect(),
        )
    }
}

// ============================================================================
// Dates
// ============================================================================

impl FieldType for DateTime<Utc> {
    const KIND: FieldKind = FieldKind::Date;

    fn from_wire(values: &[String]) -> Self {
        values
            .first()
            .and_then(|v| parse_date(v))
            .unwrap_or_default()
    }

    fn to_json(&self) -> Value {
        date_to_json(self)
    }
}

impl FieldType for Option<DateTime<Utc>> {
    const KIND: FieldKind = FieldKind::NullableDate;

    fn from_wire(values: &[String]) -> Self {
        values.first().and_then(|v| parse_date(v))
    }

    fn to_json(&self) -> Value {
        self.as_ref().map_or(Value::Null, date_to_json)
    }
}

impl FieldType for Vec<DateTime<Utc>> {
    const KIND: FieldKind = FieldKind::DateList;

    fn from_wire(values: &[String]) -> Self {
        values.iter().filter_map(|v| parse_date(v)).collect()
    }

    fn to_json(&self) -> Value {
        Value::Array(self.iter().map(date_to_json).collect())
    }
}
