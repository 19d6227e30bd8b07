//! End-to-end tests for the decode → collect → filter pipeline.
//!
//! Builds request-shaped JSON the way a composition function receives it and
//! runs the three stages the orchestrator wires together.

use std::collections::BTreeMap;

use serde_json::{json, Value};
use switcher_core::{
    collect_switches, decode_composite_metadata, filter_desired, RenderContext, SwitchError,
    SwitchStage,
};

fn request(annotations: Value) -> Value {
    json!({
        "meta": {"tag": "v1"},
        "observed": {
            "composite": {
                "resource": {
                    "apiVersion": "example.org/v1",
                    "kind": "XR",
                    "metadata": {"name": "my-xr", "annotations": annotations},
                    "spec": {
                        "tier": "dev",
                        "extras": ["resourceThree"]
                    }
                }
            }
        },
        "desired": {
            "resources": {
                "resourceOne": {"resource": {"apiVersion": "example.org/v1", "kind": "Resource"}},
                "resourceTwo": {"resource": {"apiVersion": "example.org/v1", "kind": "Resource"}},
                "resourceThree": {"resource": {"apiVersion": "example.org/v1", "kind": "Resource"}}
            }
        }
    })
}

fn desired(request: &Value) -> BTreeMap<String, Value> {
    serde_json::from_value(request["desired"]["resources"].clone()).unwrap()
}

/// Run the pipeline and return the surviving resource names.
fn run(request: &Value) -> Result<Vec<String>, SwitchError> {
    let composite = request.pointer("/observed/composite/resource");
    let meta = decode_composite_metadata(composite)?;
    let context = RenderContext::from_value(request.clone())?;
    let switches = collect_switches(meta.annotations(), &context)?;

    let mut resources = desired(request);
    filter_desired(&mut resources, switches.disabled(), switches.enabled());
    Ok(resources.into_keys().collect())
}

#[test]
fn test_disabled_annotation_removes_resource() {
    let req = request(json!({"switcher.fn.kndp.io/disabled": "resourceTwo"}));
    assert_eq!(run(&req).unwrap(), vec!["resourceOne", "resourceThree"]);
}

#[test]
fn test_enabled_annotation_keeps_only_named() {
    let req = request(json!({"switcher.fn.kndp.io/enabled": "resourceTwo"}));
    assert_eq!(run(&req).unwrap(), vec!["resourceTwo"]);
}

#[test]
fn test_no_switch_annotations_keeps_everything() {
    let req = request(json!({"crossplane.io/composition-resource-name": "xr"}));
    assert_eq!(
        run(&req).unwrap(),
        vec!["resourceOne", "resourceThree", "resourceTwo"]
    );
}

#[test]
fn test_templated_annotation_uses_request_fields() {
    let req = request(json!({
        "switcher.fn.kndp.io/disabled":
            "{% if observed.composite.resource.spec.tier == 'dev' %}resourceOne{% endif %}",
        "switcher.fn.kndp.io/disabled-extras":
            "{{ observed.composite.resource.spec.extras | csv }}"
    }));
    assert_eq!(run(&req).unwrap(), vec!["resourceTwo"]);
}

#[test]
fn test_enable_all_desired_via_keys_filter() {
    let req = request(json!({
        "switcher.fn.kndp.io/enabled": "{{ desired.resources | keys | csv }}",
        "switcher.fn.kndp.io/disabled": "resourceOne"
    }));
    assert_eq!(run(&req).unwrap(), vec!["resourceThree", "resourceTwo"]);
}

#[test]
fn test_empty_enabled_value_removes_everything() {
    let req = request(json!({"switcher.fn.kndp.io/enabled": ""}));
    assert!(run(&req).unwrap().is_empty());
}

#[test]
fn test_malformed_template_aborts_pipeline() {
    let req = request(json!({
        "switcher.fn.kndp.io/disabled": "resourceTwo",
        "switcher.fn.kndp.io/enabled": "{{ observed.composite.resource.spec.tier"
    }));
    let err = run(&req).unwrap_err();
    assert_eq!(err.stage(), SwitchStage::Render);
}

#[test]
fn test_missing_template_field_aborts_pipeline() {
    let req = request(json!({
        "switcher.fn.kndp.io/disabled": "{{ observed.composite.resource.spec.nope }}"
    }));
    let err = run(&req).unwrap_err();
    assert!(matches!(err, SwitchError::Render { .. }));
}

#[test]
fn test_ill_typed_annotations_fail_decode() {
    let req = request(json!(["switcher.fn.kndp.io/disabled"]));
    let err = run(&req).unwrap_err();
    assert_eq!(err.stage(), SwitchStage::MetadataDecode);
}
