//! Tera filters for building resource name lists.

use std::collections::HashMap;

use heck::ToKebabCase;
use tera::{Result, Tera, Value};

pub(super) fn register(tera: &mut Tera) {
    tera.register_filter("csv", csv);
    tera.register_filter("keys", keys);
    tera.register_filter("kebab_case", kebab_case);
}

/// Join an array of scalars with commas: `["a", "b"]` becomes `a,b`.
pub(crate) fn csv(value: &Value, _args: &HashMap<String, Value>) -> Result<Value> {
    match value {
        Value::String(s) => Ok(Value::String(s.clone())),
        Value::Null => Ok(Value::String(String::new())),
        Value::Array(items) => {
            let names = items
                .iter()
                .map(scalar_to_string)
                .collect::<Result<Vec<_>>>()?;
            Ok(Value::String(names.join(",")))
        }
        _ => Err(tera::Error::msg(
            "csv filter expects an array of scalars or a string",
        )),
    }
}

/// Sorted keys of an object, e.g. `observed.resources | keys | csv`.
pub(crate) fn keys(value: &Value, _args: &HashMap<String, Value>) -> Result<Value> {
    let object = value
        .as_object()
        .ok_or_else(|| tera::Error::msg("keys filter expects an object"))?;
    let mut names: Vec<&String> = object.keys().collect();
    names.sort();
    Ok(Value::Array(
        names.into_iter().cloned().map(Value::String).collect(),
    ))
}

pub(crate) fn kebab_case(value: &Value, _args: &HashMap<String, Value>) -> Result<Value> {
    let s = value
        .as_str()
        .ok_or_else(|| tera::Error::msg("kebab_case filter expects a string"))?;
    Ok(Value::String(s.to_kebab_case()))
}

fn scalar_to_string(value: &Value) -> Result<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        _ => Err(tera::Error::msg("csv filter expects scalar array items")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn apply(filter: fn(&Value, &HashMap<String, Value>) -> Result<Value>, input: Value) -> Value {
        filter(&input, &HashMap::new()).unwrap()
    }

    #[test]
    fn test_csv_joins_arrays() {
        assert_eq!(apply(csv, json!(["cache", "queue"])), json!("cache,queue"));
        assert_eq!(apply(csv, json!(["db", 2, true])), json!("db,2,true"));
        assert_eq!(apply(csv, json!([])), json!(""));
    }

    #[test]
    fn test_csv_passes_strings_and_null() {
        assert_eq!(apply(csv, json!("a,b")), json!("a,b"));
        assert_eq!(apply(csv, Value::Null), json!(""));
    }

    #[test]
    fn test_csv_rejects_nested_values() {
        assert!(csv(&json!([{"name": "a"}]), &HashMap::new()).is_err());
        assert!(csv(&json!({"name": "a"}), &HashMap::new()).is_err());
    }

    #[test]
    fn test_keys_sorted() {
        let value = json!({"resourceTwo": {}, "resourceOne": {}});
        assert_eq!(apply(keys, value), json!(["resourceOne", "resourceTwo"]));
    }

    #[test]
    fn test_keys_rejects_non_object() {
        assert!(keys(&json!(["a"]), &HashMap::new()).is_err());
    }

    #[test]
    fn test_kebab_case() {
        assert_eq!(apply(kebab_case, json!("ReadReplica")), json!("read-replica"));
        assert_eq!(apply(kebab_case, json!("read_replica")), json!("read-replica"));
        assert!(kebab_case(&json!(42), &HashMap::new()).is_err());
    }
}
