//! Collection records and their JSON codec.

use crate::error::{WireError, WireResult};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;

/// Server-assigned record identifier.
///
/// Record IDs are allocated by the remote collection and never change for
/// the lifetime of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RecordId(pub u64);

impl RecordId {
    /// Creates a new record ID.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw ID value.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Named string fields of a record, ordered by field name.
pub type FieldMap = BTreeMap<String, String>;

/// A row of the remote collection.
///
/// Identity is `id`; every other member is a mutable string field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// Server-assigned identity.
    pub id: RecordId,
    /// Named string fields (name, email, website, ...).
    pub fields: FieldMap,
}

impl Record {
    /// Creates a record from an id and field pairs.
    pub fn new<K, V>(id: RecordId, fields: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            id,
            fields: fields
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Returns a field value by name.
    pub fn field(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    /// Sets a field value, inserting the field if absent.
    pub fn set_field(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(key.into(), value.into());
    }

    /// Decodes a record from a JSON object.
    ///
    /// The object must carry a non-negative integer `id`. String-valued
    /// members become fields; members of any other type are dropped.
    pub fn from_json(value: &Value) -> WireResult<Self> {
        let object = value.as_object().ok_or(WireError::ExpectedObject)?;

        let id = match object.get("id") {
            Some(raw) => raw.as_u64().map(RecordId::new).ok_or(WireError::InvalidId)?,
            None => return Err(WireError::MissingId),
        };

        let fields = object
            .iter()
            .filter(|(key, _)| key.as_str() != "id")
            .filter_map(|(key, val)| val.as_str().map(|s| (key.clone(), s.to_owned())))
            .collect();

        Ok(Self { id, fields })
    }

    /// Encodes the full record, including its id, as a JSON object.
    pub fn to_json(&self) -> Value {
        let mut object = Map::new();
        object.insert("id".into(), Value::from(self.id.as_u64()));
        for (key, val) in &self.fields {
            object.insert(key.clone(), Value::from(val.clone()));
        }
        Value::Object(object)
    }
}

/// A record that has not been created on the server yet: fields without id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordDraft {
    /// Named string fields.
    pub fields: FieldMap,
}

impl RecordDraft {
    /// Creates an empty draft.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a draft from field pairs.
    pub fn from_fields<K, V>(fields: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            fields: fields
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Returns a field value by name.
    pub fn field(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    /// Sets a field value.
    pub fn set_field(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(key.into(), value.into());
    }

    /// Encodes the draft as a JSON object without an id.
    pub fn to_json(&self) -> Value {
        let mut object = Map::new();
        for (key, val) in &self.fields {
            object.insert(key.clone(), Value::from(val.clone()));
        }
        Value::Object(object)
    }

    /// Materializes the draft into a record under a server-assigned id.
    #[must_use]
    pub fn into_record(self, id: RecordId) -> Record {
        Record {
            id,
            fields: self.fields,
        }
    }
}

/// Decodes a page body: a JSON array of record objects, server order kept.
pub fn decode_page(body: &str) -> WireResult<Vec<Record>> {
    let value: Value = serde_json::from_str(body)?;
    let array = value.as_array().ok_or(WireError::ExpectedArray)?;
    array.iter().map(Record::from_json).collect()
}

/// Decodes a single-record body, as returned by create and update calls.
pub fn decode_record(body: &str) -> WireResult<Record> {
    let value: Value = serde_json::from_str(body)?;
    Record::from_json(&value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn from_json_keeps_string_fields() {
        let value = json!({
            "id": 3,
            "name": "Clementine Bauch",
            "email": "Nathan@yesenia.net",
            "website": "ramiro.info",
            "address": { "city": "McKenziehaven" },
            "phone_verified": true
        });

        let record = Record::from_json(&value).unwrap();
        assert_eq!(record.id, RecordId::new(3));
        assert_eq!(record.field("name"), Some("Clementine Bauch"));
        assert_eq!(record.field("email"), Some("Nathan@yesenia.net"));
        // Non-string members are dropped
        assert_eq!(record.field("address"), None);
        assert_eq!(record.field("phone_verified"), None);
        assert_eq!(record.fields.len(), 3);
    }

    #[test]
    fn from_json_missing_id() {
        let value = json!({ "name": "nobody" });
        assert!(matches!(
            Record::from_json(&value),
            Err(WireError::MissingId)
        ));
    }

    #[test]
    fn from_json_invalid_id() {
        let value = json!({ "id": "three", "name": "nobody" });
        assert!(matches!(
            Record::from_json(&value),
            Err(WireError::InvalidId)
        ));

        let value = json!({ "id": -4 });
        assert!(matches!(
            Record::from_json(&value),
            Err(WireError::InvalidId)
        ));
    }

    #[test]
    fn from_json_rejects_non_object() {
        assert!(matches!(
            Record::from_json(&json!([1, 2, 3])),
            Err(WireError::ExpectedObject)
        ));
    }

    #[test]
    fn record_round_trip() {
        let record = Record::new(
            RecordId::new(7),
            [("name", "Kurtis Weissnat"), ("email", "Telly.Hoeger@billy.biz")],
        );

        let decoded = Record::from_json(&record.to_json()).unwrap();
        assert_eq!(decoded, record);
    }

    #[test]
    fn draft_json_has_no_id() {
        let draft = RecordDraft::from_fields([("name", "Ervin Howell")]);
        let value = draft.to_json();
        assert!(value.get("id").is_none());
        assert_eq!(value.get("name"), Some(&Value::from("Ervin Howell")));
    }

    #[test]
    fn draft_into_record() {
        let draft = RecordDraft::from_fields([("name", "Ervin Howell")]);
        let record = draft.into_record(RecordId::new(11));
        assert_eq!(record.id.as_u64(), 11);
        assert_eq!(record.field("name"), Some("Ervin Howell"));
    }

    #[test]
    fn decode_page_preserves_order() {
        let body = r#"[
            {"id": 2, "name": "b"},
            {"id": 1, "name": "a"},
            {"id": 3, "name": "c"}
        ]"#;

        let page = decode_page(body).unwrap();
        let ids: Vec<u64> = page.iter().map(|r| r.id.as_u64()).collect();
        assert_eq!(ids, vec![2, 1, 3]);
    }

    #[test]
    fn decode_page_rejects_object_body() {
        assert!(matches!(
            decode_page(r#"{"id": 1}"#),
            Err(WireError::ExpectedArray)
        ));
    }

    #[test]
    fn decode_record_single() {
        let record = decode_record(r#"{"id": 11, "name": "new"}"#).unwrap();
        assert_eq!(record.id.as_u64(), 11);
    }

    #[test]
    fn decode_malformed_json() {
        assert!(matches!(decode_page("not json"), Err(WireError::Json(_))));
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        fn field_map_strategy() -> impl Strategy<Value = Vec<(String, String)>> {
            prop::collection::vec(
                (
                    prop::string::string_regex("[a-z][a-z_]{0,15}")
                        .expect("Invalid regex")
                        .prop_filter("id is reserved", |k| k != "id"),
                    ".{0,40}",
                ),
                0..6,
            )
        }

        proptest! {
            #[test]
            fn json_round_trip(id in any::<u64>(), fields in field_map_strategy()) {
                let record = Record::new(RecordId::new(id), fields);
                let decoded = Record::from_json(&record.to_json()).unwrap();
                prop_assert_eq!(decoded, record);
            }
        }
    }
}
