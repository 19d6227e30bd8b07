//! Typed decoding of composite resource metadata.
//!
//! Only the fields the switcher reads are modelled; other metadata fields are
//! ignored. Fields that are present must have the Kubernetes shape, so a
//! non-string annotation value is a decode error rather than a silent default.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{SwitchError, SwitchResult};

/// The subset of Kubernetes `ObjectMeta` the switcher reads: the name for
/// log context and the annotations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotations: Option<BTreeMap<String, String>>,
}

impl ObjectMeta {
    /// Annotations, or an empty map when the object has none.
    pub fn annotations(&self) -> &BTreeMap<String, String> {
        static EMPTY: BTreeMap<String, String> = BTreeMap::new();
        self.annotations.as_ref().unwrap_or(&EMPTY)
    }
}

/// Decode the `metadata` of a composite resource object.
///
/// A missing or `null` composite, or a composite without `metadata`, decodes
/// to empty metadata. Anything else must have the object metadata shape.
pub fn decode_composite_metadata(composite: Option<&Value>) -> SwitchResult<ObjectMeta> {
    let metadata = match composite {
        None | Some(Value::Null) => return Ok(ObjectMeta::default()),
        Some(Value::Object(object)) => object.get("metadata"),
        Some(_) => return Err(not_an_object("composite resource")),
    };

    match metadata {
        None | Some(Value::Null) => Ok(ObjectMeta::default()),
        Some(value @ Value::Object(_)) => Ok(ObjectMeta::deserialize(value)?),
        Some(_) => Err(not_an_object("composite resource metadata")),
    }
}

// Serde would also accept a JSON array for a struct, so the object shape is
// checked up front.
fn not_an_object(what: &str) -> SwitchError {
    SwitchError::MetadataDecode {
        source: serde::de::Error::custom(format!("{what} is not an object")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_annotations() {
        let composite = json!({
            "apiVersion": "example.org/v1",
            "kind": "XR",
            "metadata": {
                "name": "my-xr",
                "annotations": {
                    "switcher.fn.kndp.io/disabled": "resourceTwo"
                },
                "managedFields": [{"manager": "crossplane"}]
            }
        });
        let meta = decode_composite_metadata(Some(&composite)).unwrap();
        assert_eq!(meta.name.as_deref(), Some("my-xr"));
        assert_eq!(
            meta.annotations().get("switcher.fn.kndp.io/disabled"),
            Some(&"resourceTwo".to_string())
        );
    }

    #[test]
    fn test_unread_fields_are_ignored() {
        let composite = json!({
            "metadata": {
                "name": "my-xr",
                "labels": ["not", "a", "map"],
                "uid": 42,
                "annotations": {"switcher.fn.kndp.io/enabled": "a"}
            }
        });
        let meta = decode_composite_metadata(Some(&composite)).unwrap();
        assert_eq!(meta.name.as_deref(), Some("my-xr"));
        assert_eq!(meta.annotations().len(), 1);
    }

    #[test]
    fn test_missing_composite_is_empty() {
        let meta = decode_composite_metadata(None).unwrap();
        assert!(meta.annotations().is_empty());
        let meta = decode_composite_metadata(Some(&Value::Null)).unwrap();
        assert_eq!(meta, ObjectMeta::default());
    }

    #[test]
    fn test_missing_or_null_metadata_is_empty() {
        let meta = decode_composite_metadata(Some(&json!({"kind": "XR"}))).unwrap();
        assert!(meta.annotations().is_empty());
        let meta = decode_composite_metadata(Some(&json!({"metadata": null}))).unwrap();
        assert!(meta.annotations().is_empty());
    }

    #[test]
    fn test_null_annotations_are_empty() {
        let composite = json!({"metadata": {"annotations": null}});
        let meta = decode_composite_metadata(Some(&composite)).unwrap();
        assert!(meta.annotations().is_empty());
    }

    #[test]
    fn test_non_string_annotation_is_decode_error() {
        let composite = json!({
            "metadata": {"annotations": {"switcher.fn.kndp.io/enabled": 3}}
        });
        let result = decode_composite_metadata(Some(&composite));
        assert!(matches!(result, Err(SwitchError::MetadataDecode { .. })));
    }

    #[test]
    fn test_non_object_metadata_is_decode_error() {
        let composite = json!({"metadata": ["annotations"]});
        let result = decode_composite_metadata(Some(&composite));
        assert!(matches!(result, Err(SwitchError::MetadataDecode { .. })));
    }

    #[test]
    fn test_non_object_composite_is_decode_error() {
        let result = decode_composite_metadata(Some(&json!("composite")));
        assert!(matches!(result, Err(SwitchError::MetadataDecode { .. })));
    }
}
