use mongodb::bson::{Bson, Document as BsonDocument};
use serde_json::{Map, Value};

use crate::error::ApiError;

/// Field the store attaches to every inserted document.
pub const ID_FIELD: &str = "_id";

/// An opaque stored document. There is deliberately no schema: any JSON object
/// is accepted and handed back as-is, minus the store identifier.
pub type JsonDocument = Map<String, Value>;

/// Accepts a parsed request body as a document.
///
/// Only the top-level shape is checked; nested values are never inspected.
pub fn from_json(value: Value) -> Result<JsonDocument, ApiError> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(ApiError::validation(format!(
            "Request body must be a JSON object, got {}",
            json_type_name(&other)
        ))),
    }
}

/// JSON object -> BSON for the driver.
///
/// Walks the value tree by hand instead of going through the bson serializer,
/// which would read `$`-prefixed keys such as `$numberLong` or `$date` as
/// extended JSON and store something other than what was posted.
pub fn to_bson(document: &JsonDocument) -> Result<BsonDocument, ApiError> {
    let mut converted = BsonDocument::new();
    for (key, value) in document {
        converted.insert(key.clone(), json_to_bson(value)?);
    }
    Ok(converted)
}

fn json_to_bson(value: &Value) -> Result<Bson, ApiError> {
    Ok(match value {
        Value::Null => Bson::Null,
        Value::Bool(b) => Bson::Boolean(*b),
        Value::Number(n) => number_to_bson(n)?,
        Value::String(s) => Bson::String(s.clone()),
        Value::Array(items) => Bson::Array(
            items
                .iter()
                .map(json_to_bson)
                .collect::<Result<Vec<_>, _>>()?,
        ),
        Value::Object(map) => Bson::Document(to_bson(map)?),
    })
}

// Small integers as Int32, the rest as Int64; anything fractional as Double.
fn number_to_bson(n: &serde_json::Number) -> Result<Bson, ApiError> {
    if let Some(i) = n.as_i64() {
        return Ok(match i32::try_from(i) {
            Ok(small) => Bson::Int32(small),
            Err(_) => Bson::Int64(i),
        });
    }

    if n.is_u64() {
        return Err(ApiError::validation(format!(
            "Document cannot be stored: integer {} exceeds the signed 64-bit range",
            n
        )));
    }

    n.as_f64()
        .map(Bson::Double)
        .ok_or_else(|| ApiError::validation(format!("Document cannot be stored: unsupported number {}", n)))
}

/// BSON from the driver -> JSON object, identifier removed.
///
/// Types a JSON body can produce map back one to one. BSON-only types
/// (ObjectId, dates, binary, ...) written by other clients fall back to
/// relaxed extended JSON.
pub fn from_bson(document: BsonDocument) -> JsonDocument {
    let mut converted = JsonDocument::new();
    for (key, value) in document {
        if key != ID_FIELD {
            converted.insert(key, bson_to_json(value));
        }
    }
    converted
}

fn bson_to_json(value: Bson) -> Value {
    match value {
        Bson::Null => Value::Null,
        Bson::Boolean(b) => Value::Bool(b),
        Bson::Int32(i) => Value::from(i),
        Bson::Int64(i) => Value::from(i),
        Bson::Double(f) if f.is_finite() => Value::from(f),
        Bson::String(s) => Value::String(s),
        Bson::Array(items) => Value::Array(items.into_iter().map(bson_to_json).collect()),
        Bson::Document(inner) => {
            let mut map = JsonDocument::new();
            for (key, value) in inner {
                map.insert(key, bson_to_json(value));
            }
            Value::Object(map)
        }
        other => other.into_relaxed_extjson(),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::{doc, oid::ObjectId};
    use serde_json::json;

    #[test]
    fn test_from_json_accepts_objects() {
        let document = from_json(json!({"name": "a", "value": 1})).expect("object should be accepted");
        assert_eq!(document.get("name"), Some(&json!("a")));
        assert_eq!(document.get("value"), Some(&json!(1)));

        let empty = from_json(json!({})).expect("empty object should be accepted");
        assert!(empty.is_empty());
    }

    #[test]
    fn test_from_json_rejects_non_objects() {
        for value in [json!([1, 2]), json!("text"), json!(42), json!(null), json!(true)] {
            let err = from_json(value).unwrap_err();
            assert!(matches!(err, ApiError::Validation(_)));
        }

        let err = from_json(json!([{"name": "a"}])).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Validation error: Request body must be a JSON object, got an array"
        );
    }

    #[test]
    fn test_bson_conversion_keeps_shape() {
        let original = from_json(json!({
            "name": "a",
            "value": 1,
            "ratio": 0.5,
            "negative": -7,
            "active": true,
            "missing": null,
            "tags": ["x", "y"],
            "nested": {"depth": {"level": 2}}
        }))
        .unwrap();

        let stored = to_bson(&original).expect("document should convert to BSON");
        assert_eq!(stored.get_str("name").unwrap(), "a");

        let returned = from_bson(stored);
        assert_eq!(Value::Object(returned), Value::Object(original));
    }

    #[test]
    fn test_dollar_prefixed_keys_are_stored_literally() {
        let original = from_json(json!({
            "a": {"$numberLong": "5"},
            "when": {"$date": "2024-01-01T00:00:00Z"},
            "$top": [{"$oid": "not-an-id"}]
        }))
        .unwrap();

        let stored = to_bson(&original).unwrap();
        let inner = stored.get_document("a").expect("nested object should stay a document");
        assert_eq!(inner.get_str("$numberLong").unwrap(), "5");
        assert!(stored.get_document("when").is_ok());

        assert_eq!(Value::Object(from_bson(stored)), Value::Object(original));
    }

    #[test]
    fn test_number_widths() {
        let document = from_json(json!({
            "small": 7,
            "large": 5_000_000_000_i64,
            "min": i64::MIN,
            "fraction": 1.25
        }))
        .unwrap();

        let stored = to_bson(&document).unwrap();
        assert_eq!(stored.get("small"), Some(&Bson::Int32(7)));
        assert_eq!(stored.get("large"), Some(&Bson::Int64(5_000_000_000)));
        assert_eq!(stored.get("min"), Some(&Bson::Int64(i64::MIN)));
        assert_eq!(stored.get("fraction"), Some(&Bson::Double(1.25)));
    }

    #[test]
    fn test_from_bson_strips_object_id() {
        let stored = doc! { "_id": ObjectId::new(), "name": "a", "value": 1_i32 };
        let returned = from_bson(stored);

        assert_eq!(Value::Object(returned), json!({"name": "a", "value": 1}));
    }

    #[test]
    fn test_to_bson_rejects_out_of_range_integers() {
        let document = from_json(json!({"big": u64::MAX})).unwrap();
        let err = to_bson(&document).unwrap_err();

        assert!(matches!(err, ApiError::Validation(_)));
    }
}
