//! Document model shared by every store backend.
//!
//! Documents travel through the service as JSON objects. The store-native
//! identifier lives under [`ID_FIELD`] and is always rendered as a 24-character
//! hex string once it leaves a backend.

use bson::oid::ObjectId;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

use super::error::StoreError;

/// A schemaless document as stored in a collection.
pub type Document = Map<String, Value>;

/// Field holding the store-native identifier.
pub const ID_FIELD: &str = "_id";

/// Store-native document identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DocumentId(ObjectId);

impl DocumentId {
    /// Generate a fresh identifier.
    pub fn new() -> Self {
        Self(ObjectId::new())
    }

    /// Parse an identifier from its hex representation.
    pub fn parse(raw: &str) -> Result<Self, StoreError> {
        ObjectId::parse_str(raw)
            .map(Self)
            .map_err(|_| StoreError::malformed_identifier(raw))
    }

    /// Hex representation used on the wire.
    pub fn to_hex(&self) -> String {
        self.0.to_hex()
    }
}

impl Default for DocumentId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for DocumentId {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for DocumentId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

/// Selects the single document an update applies to.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// Match on the store-native identifier.
    Id(DocumentId),

    /// Match on an application field holding exactly `value`.
    FieldEquals { field: String, value: Value },
}

impl Filter {
    pub fn by_id(id: DocumentId) -> Self {
        Self::Id(id)
    }

    pub fn field_equals(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::FieldEquals {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Evaluate the filter against an in-memory document.
    pub fn matches(&self, document: &Document) -> bool {
        match self {
            Self::Id(id) => document
                .get(ID_FIELD)
                .and_then(Value::as_str)
                .is_some_and(|stored| stored.eq_ignore_ascii_case(&id.to_hex())),
            Self::FieldEquals { field, value } => document
                .get(field)
                .is_some_and(|stored| values_equal(stored, value)),
        }
    }
}

/// Equality where numbers compare by value (`3 == 3.0`), like the store does.
pub fn values_equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => match (a.as_i64(), b.as_i64()) {
            (Some(a), Some(b)) => a == b,
            _ => a.as_f64() == b.as_f64(),
        },
        _ => left == right,
    }
}

/// Outcome of a single-document insert.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertOutcome {
    pub acknowledged: bool,
    pub inserted_id: Value,
}

/// Outcome of a single-document update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOutcome {
    pub acknowledged: bool,
    pub matched_count: u64,
    pub modified_count: u64,
}

impl UpdateOutcome {
    /// No document matched the filter.
    pub fn unmatched() -> Self {
        Self {
            acknowledged: true,
            matched_count: 0,
            modified_count: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: Value) -> Document {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_parse_valid_identifier() {
        let id = DocumentId::parse("65a1f0c2e4b0a1b2c3d4e5f6").unwrap();
        assert_eq!(id.to_hex(), "65a1f0c2e4b0a1b2c3d4e5f6");
        assert_eq!(id.to_string(), "65a1f0c2e4b0a1b2c3d4e5f6");
    }

    #[test]
    fn test_parse_malformed_identifier() {
        for raw in ["", "not-an-id", "65a1f0c2e4b0a1b2c3d4e5f", "zz a1f0c2e4b0a1b2c3d4e5f6"] {
            let err = DocumentId::parse(raw).unwrap_err();
            assert!(matches!(err, StoreError::MalformedIdentifier(_)), "{raw}");
        }
    }

    #[test]
    fn test_identifier_serializes_as_hex() {
        let id = DocumentId::new();
        assert_eq!(serde_json::to_value(id).unwrap(), json!(id.to_hex()));
    }

    #[test]
    fn test_filter_by_id() {
        let id = DocumentId::new();
        let filter = Filter::by_id(id);
        assert!(filter.matches(&doc(json!({ "_id": id.to_hex() }))));
        assert!(!filter.matches(&doc(json!({ "_id": DocumentId::new().to_hex() }))));
        assert!(!filter.matches(&doc(json!({ "id": 1 }))));
    }

    #[test]
    fn test_filter_field_equals_compares_numbers_by_value() {
        let filter = Filter::field_equals("id", 3);
        assert!(filter.matches(&doc(json!({ "id": 3 }))));
        assert!(filter.matches(&doc(json!({ "id": 3.0 }))));
        assert!(!filter.matches(&doc(json!({ "id": "3" }))));
        assert!(!filter.matches(&doc(json!({ "id": 4 }))));
    }

    #[test]
    fn test_outcomes_use_store_field_names() {
        let insert = InsertOutcome {
            acknowledged: true,
            inserted_id: json!("abc"),
        };
        assert_eq!(
            serde_json::to_value(insert).unwrap(),
            json!({ "acknowledged": true, "insertedId": "abc" })
        );

        assert_eq!(
            serde_json::to_value(UpdateOutcome::unmatched()).unwrap(),
            json!({ "acknowledged": true, "matchedCount": 0, "modifiedCount": 0 })
        );
    }
}
