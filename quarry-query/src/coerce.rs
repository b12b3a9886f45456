//! Value Coercion.
//!
//! Query parameters arrive as strings. A [`FieldClassification`] says which
//! field names hold dates, booleans or numbers, and [`FieldClassification::coerce`]
//! converts raw values accordingly. Conversion never fails: text that does
//! not parse as the expected type is kept as a string.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use indexmap::IndexSet;
use serde_json::Value;
use smol_str::SmolStr;
use tracing::trace;

use quarry_schema::ast::{ModelDescriptor, ScalarType};
use quarry_schema::config::FieldListsConfig;

use crate::filter::FilterValue;

/// Coercion category of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldCategory {
    /// Parsed as a timestamp.
    Date,
    /// Compared case-insensitively with `"true"`.
    Boolean,
    /// Parsed as an integer or decimal.
    Numeric,
    /// Kept as-is.
    Other,
}

/// Field names grouped by coercion category.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldClassification {
    dates: IndexSet<SmolStr>,
    booleans: IndexSet<SmolStr>,
    numerics: IndexSet<SmolStr>,
}

impl FieldClassification {
    /// Create an empty classification: every field is `Other`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start building a classification.
    pub fn builder() -> FieldClassificationBuilder {
        FieldClassificationBuilder::default()
    }

    /// Derive a classification from a model's scalar field types.
    pub fn from_model(model: &ModelDescriptor) -> Self {
        let mut classification = Self::new();
        for field in model.scalar_fields() {
            let Some(scalar) = field.scalar_type() else {
                continue;
            };
            let name = field.name.clone();
            match scalar {
                ScalarType::DateTime | ScalarType::Date | ScalarType::Time => {
                    classification.dates.insert(name);
                }
                ScalarType::Boolean => {
                    classification.booleans.insert(name);
                }
                ScalarType::Int | ScalarType::BigInt | ScalarType::Float | ScalarType::Decimal => {
                    classification.numerics.insert(name);
                }
                _ => {}
            }
        }
        classification
    }

    /// Build a classification from the `[filter.fields]` config table.
    pub fn from_config(fields: &FieldListsConfig) -> Self {
        Self {
            dates: fields.date.iter().map(SmolStr::new).collect(),
            booleans: fields.boolean.iter().map(SmolStr::new).collect(),
            numerics: fields.numeric.iter().map(SmolStr::new).collect(),
        }
    }

    /// Add every name from `other`.
    pub fn merge(mut self, other: &FieldClassification) -> Self {
        self.dates.extend(other.dates.iter().cloned());
        self.booleans.extend(other.booleans.iter().cloned());
        self.numerics.extend(other.numerics.iter().cloned());
        self
    }

    /// Check whether no field is classified.
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty() && self.booleans.is_empty() && self.numerics.is_empty()
    }

    /// Category of a field. Date wins over boolean, boolean over numeric.
    pub fn category(&self, field: &str) -> FieldCategory {
        if self.dates.contains(field) {
            FieldCategory::Date
        } else if self.booleans.contains(field) {
            FieldCategory::Boolean
        } else if self.numerics.contains(field) {
            FieldCategory::Numeric
        } else {
            FieldCategory::Other
        }
    }

    /// Convert a raw value for `field`.
    ///
    /// Only strings are converted; other JSON values pass through unchanged.
    pub fn coerce(&self, field: &str, value: &Value) -> FilterValue {
        match value {
            Value::String(s) => self.coerce_str(field, s),
            other => FilterValue::from(other.clone()),
        }
    }

    /// Convert a raw string for `field`.
    pub fn coerce_str(&self, field: &str, raw: &str) -> FilterValue {
        match self.category(field) {
            FieldCategory::Date => parse_date(raw).map_or_else(
                || {
                    trace!(field, raw, "date coercion failed, keeping string");
                    FilterValue::String(raw.to_string())
                },
                FilterValue::DateTime,
            ),
            FieldCategory::Boolean => FilterValue::Bool(raw.eq_ignore_ascii_case("true")),
            FieldCategory::Numeric => parse_number(raw).unwrap_or_else(|| {
                trace!(field, raw, "numeric coercion failed, keeping string");
                FilterValue::String(raw.to_string())
            }),
            FieldCategory::Other => FilterValue::String(raw.to_string()),
        }
    }
}

/// Builder for [`FieldClassification`].
#[derive(Debug, Clone, Default)]
pub struct FieldClassificationBuilder {
    inner: FieldClassification,
}

impl FieldClassificationBuilder {
    /// Classify fields as dates.
    pub fn dates<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.inner.dates.extend(fields.into_iter().map(|f| SmolStr::new(f.as_ref())));
        self
    }

    /// Classify fields as booleans.
    pub fn booleans<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.inner.booleans.extend(fields.into_iter().map(|f| SmolStr::new(f.as_ref())));
        self
    }

    /// Classify fields as numbers.
    pub fn numerics<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.inner.numerics.extend(fields.into_iter().map(|f| SmolStr::new(f.as_ref())));
        self
    }

    /// Finish building.
    pub fn build(self) -> FieldClassification {
        self.inner
    }
}

/// Parse a timestamp: RFC 3339, a naive date-time taken as UTC, or a bare
/// date at midnight UTC.
pub fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Parse an integer, or failing that a finite decimal.
pub fn parse_number(raw: &str) -> Option<FilterValue> {
    let trimmed = raw.trim();
    if let Ok(i) = trimmed.parse::<i64>() {
        return Some(FilterValue::Int(i));
    }
    trimmed
        .parse::<f64>()
        .ok()
        .filter(|f| f.is_finite())
        .map(FilterValue::Float)
}
