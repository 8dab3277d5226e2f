// Response-shape normalization
//
// The backend is inconsistent about how it returns records: a bare object,
// an object wrapped under its concept name (`{community: {...}}`), an array
// of either, or an array of single-key wrappers. These helpers collapse all
// of them into one canonical shape per call so stores never branch on it.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::Error;

/// Extract an id from `{<field>: "<id>"}`.
///
/// Also accepts `{<field>: {"_id": "<id>"}}`, numeric ids, and the same
/// shapes wrapped in a one-element array.
pub fn id_field(value: &Value, field: &'static str) -> Result<String, Error> {
    let target = match value {
        Value::Array(items) => items.first(),
        other => Some(other),
    };
    let raw = target
        .and_then(|v| v.get(field))
        .ok_or(Error::MissingField { field })?;
    match raw {
        Value::String(s) if !s.is_empty() => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Object(map) => map
            .get("_id")
            .and_then(Value::as_str)
            .map(String::from)
            .ok_or(Error::MissingField { field }),
        _ => Err(Error::MissingField { field }),
    }
}

/// Normalize a query result that names at most one record.
///
/// `null`, `{}`, an empty array, and `{<field>: null}` all mean "no record".
pub fn single<T: DeserializeOwned>(value: Value, field: &str) -> Result<Option<T>, Error> {
    unwrap_record(value, field).map(decode).transpose()
}

/// Normalize a query result that names a list of records.
///
/// Accepts a bare array (of records or `{<field>: record}` wrappers), a
/// container object (`{<field>: [...]}` or `{<field>s: [...]}`), a single
/// record, or `null`.
pub fn list<T: DeserializeOwned>(value: Value, field: &str) -> Result<Vec<T>, Error> {
    match value {
        Value::Null => Ok(Vec::new()),
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| unwrap_record(item, field))
            .map(decode)
            .collect(),
        Value::Object(mut map) => {
            let plural = format!("{field}s");
            let inner = match map.remove(field) {
                Some(inner @ Value::Array(_)) => Some(inner),
                Some(other) => {
                    map.insert(field.to_owned(), other);
                    map.remove(&plural)
                }
                None => map.remove(&plural),
            };
            match inner {
                Some(inner) => list(inner, field),
                None => unwrap_record(Value::Object(map), field)
                    .map(decode)
                    .into_iter()
                    .collect(),
            }
        }
        other => Ok(vec![decode(other)?]),
    }
}

/// Peel array and `{<field>: ...}` wrappers off a single record.
fn unwrap_record(value: Value, field: &str) -> Option<Value> {
    match value {
        Value::Null => None,
        Value::Array(items) => items
            .into_iter()
            .next()
            .and_then(|v| unwrap_record(v, field)),
        Value::Object(map) if map.is_empty() => None,
        Value::Object(mut map) => {
            if map.contains_key(field) && !map.contains_key("_id") {
                map.remove(field).and_then(|v| unwrap_record(v, field))
            } else {
                Some(Value::Object(map))
            }
        }
        other => Some(other),
    }
}

fn decode<T: DeserializeOwned>(value: Value) -> Result<T, Error> {
    serde_json::from_value(value.clone()).map_err(|e| Error::Deserialization {
        message: e.to_string(),
        body: value.to_string(),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Rec {
        #[serde(rename = "_id")]
        id: String,
        #[serde(default)]
        name: String,
    }

    #[test]
    fn id_field_reads_plain_and_nested_ids() {
        assert_eq!(id_field(&json!({"community": "c1"}), "community").unwrap(), "c1");
        assert_eq!(
            id_field(&json!({"community": {"_id": "c2", "name": "x"}}), "community").unwrap(),
            "c2"
        );
        assert_eq!(id_field(&json!([{"reply": "r9"}]), "reply").unwrap(), "r9");
    }

    #[test]
    fn id_field_missing_is_an_error() {
        let err = id_field(&json!({}), "community").unwrap_err();
        assert!(matches!(err, Error::MissingField { field: "community" }));
        assert_eq!(err.to_string(), "No community ID returned from API");
    }

    #[test]
    fn single_accepts_every_wrapping() {
        let shapes = [
            json!({"_id": "c1", "name": "A"}),
            json!({"community": {"_id": "c1", "name": "A"}}),
            json!([{"community": {"_id": "c1", "name": "A"}}]),
            json!([{"_id": "c1", "name": "A"}]),
        ];
        for shape in shapes {
            let rec: Rec = single(shape, "community").unwrap().unwrap();
            assert_eq!(rec.id, "c1");
            assert_eq!(rec.name, "A");
        }
    }

    #[test]
    fn single_treats_empty_shapes_as_none() {
        assert!(single::<Rec>(Value::Null, "profile").unwrap().is_none());
        assert!(single::<Rec>(json!([]), "profile").unwrap().is_none());
        assert!(single::<Rec>(json!({"profile": null}), "profile").unwrap().is_none());
    }

    #[test]
    fn list_accepts_arrays_containers_and_wrappers() {
        let bare: Vec<Rec> = list(json!([{"_id": "a"}, {"_id": "b"}]), "term").unwrap();
        assert_eq!(bare.len(), 2);

        let wrapped: Vec<Rec> =
            list(json!([{"term": {"_id": "a"}}, {"term": {"_id": "b"}}]), "term").unwrap();
        assert_eq!(wrapped[1].id, "b");

        let plural: Vec<Rec> = list(json!({"terms": [{"_id": "a"}]}), "term").unwrap();
        assert_eq!(plural[0].id, "a");

        let empty: Vec<Rec> = list(Value::Null, "term").unwrap();
        assert!(empty.is_empty());
    }

    #[test]
    fn record_with_id_is_not_unwrapped_by_same_named_field() {
        // A posting record legitimately carries a `community` field.
        let rec: Option<serde_json::Value> =
            single(json!({"_id": "p1", "community": "c1"}), "community").unwrap();
        assert_eq!(rec.unwrap()["_id"], "p1");
    }
}
