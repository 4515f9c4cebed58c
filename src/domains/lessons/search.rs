//! Free-text lesson search.
//!
//! A query matches a lesson when it occurs, ignoring case, anywhere in the
//! subject, the location, or the decimal text of the price or remaining spaces.
//! The query is always taken literally: regex metacharacters are escaped.

use regex::{Regex, RegexBuilder};
use serde_json::{Number, Value};
use std::borrow::Cow;

use super::error::LessonError;
use crate::domains::store::Document;

/// Fields a query is matched against, in order.
pub const SEARCH_FIELDS: [&str; 4] = ["subject", "location", "price", "spaces"];

/// Case-insensitive literal matcher for one query.
#[derive(Debug, Clone)]
pub struct SearchMatcher {
    pattern: Regex,
}

impl SearchMatcher {
    /// Compile `query`. Returns `Ok(None)` for an empty query, which matches nothing.
    pub fn new(query: &str) -> Result<Option<Self>, LessonError> {
        if query.is_empty() {
            return Ok(None);
        }

        let pattern = RegexBuilder::new(&regex::escape(query))
            .case_insensitive(true)
            .build()
            .map_err(|e| LessonError::invalid_query(e.to_string()))?;

        Ok(Some(Self { pattern }))
    }

    /// True when any searchable field contains the query.
    pub fn matches(&self, document: &Document) -> bool {
        SEARCH_FIELDS.iter().any(|field| {
            document
                .get(*field)
                .and_then(field_text)
                .is_some_and(|text| self.pattern.is_match(&text))
        })
    }

    /// Keep the matching documents, preserving their order.
    pub fn filter(&self, documents: Vec<Document>) -> Vec<Document> {
        documents
            .into_iter()
            .filter(|document| self.matches(document))
            .collect()
    }
}

/// Text a field is searched as: strings as-is, numbers in canonical decimal form.
fn field_text(value: &Value) -> Option<Cow<'_, str>> {
    match value {
        Value::String(text) => Some(Cow::Borrowed(text)),
        Value::Number(number) => Some(Cow::Owned(canonical_number(number))),
        _ => None,
    }
}

/// Decimal text of a number, with integral floats rendered without a fraction.
pub fn canonical_number(number: &Number) -> String {
    if let Some(i) = number.as_i64() {
        return i.to_string();
    }
    if let Some(u) = number.as_u64() {
        return u.to_string();
    }

    match number.as_f64() {
        Some(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e15 => {
            format!("{}", f as i64)
        }
        Some(f) => f.to_string(),
        None => number.to_string(),
    }
}
