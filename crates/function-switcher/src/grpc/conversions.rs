//! Conversions between the generated protobuf types and the serde envelope model.
//!
//! Inbound conversion cannot fail: every protobuf value has a JSON form.
//! Outbound conversion fails when a payload is not an object or a connection
//! detail is not valid base64.

use std::collections::{BTreeMap, HashMap};

use base64::prelude::{Engine as _, BASE64_STANDARD};
use serde_json::Value;

use crate::proto::v1beta1 as proto;
use crate::request::{
    CredentialData, Credentials, FunctionResult, Ready, RequestMeta, Resource, Resources,
    RunFunctionRequest, RunFunctionResponse, Severity, State,
};

/// Largest integer an `f64` represents exactly.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_992.0;

#[derive(Debug, thiserror::Error)]
pub enum ConversionError {
    #[error("{field} must be a JSON object")]
    NotAnObject { field: String },

    #[error("connection detail '{key}' is not valid base64: {source}")]
    ConnectionDetail {
        key: String,
        source: base64::DecodeError,
    },

    #[error("ttl is out of range for google.protobuf.Duration")]
    Ttl,
}

// ============================================================================
// JSON/Struct Conversions
// ============================================================================

/// Convert prost_types::Struct to serde_json::Value.
pub fn proto_struct_to_json(s: prost_types::Struct) -> Value {
    Value::Object(
        s.fields
            .into_iter()
            .map(|(k, v)| (k, prost_value_to_json(v)))
            .collect(),
    )
}

fn prost_value_to_json(value: prost_types::Value) -> Value {
    use prost_types::value::Kind;
    match value.kind {
        Some(Kind::NullValue(_)) | None => Value::Null,
        Some(Kind::BoolValue(b)) => Value::Bool(b),
        Some(Kind::NumberValue(n)) => number_to_json(n),
        Some(Kind::StringValue(s)) => Value::String(s),
        Some(Kind::ListValue(l)) => {
            Value::Array(l.values.into_iter().map(prost_value_to_json).collect())
        }
        Some(Kind::StructValue(s)) => proto_struct_to_json(s),
    }
}

/// Whole numbers render as integers in templates (`3`, not `3.0`).
fn number_to_json(n: f64) -> Value {
    if n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER {
        Value::from(n as i64)
    } else {
        serde_json::Number::from_f64(n).map_or(Value::Null, Value::Number)
    }
}

/// Convert a JSON object to prost_types::Struct.
pub fn json_to_proto_struct(
    value: Value,
    field: &str,
) -> Result<prost_types::Struct, ConversionError> {
    match value {
        Value::Object(map) => Ok(prost_types::Struct {
            fields: map
                .into_iter()
                .map(|(k, v)| (k, json_to_prost_value(v)))
                .collect(),
        }),
        _ => Err(ConversionError::NotAnObject {
            field: field.to_string(),
        }),
    }
}

fn json_to_prost_value(value: Value) -> prost_types::Value {
    use prost_types::value::Kind;
    let kind = match value {
        Value::Null => Kind::NullValue(prost_types::NullValue::NullValue as i32),
        Value::Bool(b) => Kind::BoolValue(b),
        Value::Number(n) => Kind::NumberValue(n.as_f64().unwrap_or_default()),
        Value::String(s) => Kind::StringValue(s),
        Value::Array(items) => Kind::ListValue(prost_types::ListValue {
            values: items.into_iter().map(json_to_prost_value).collect(),
        }),
        Value::Object(map) => Kind::StructValue(prost_types::Struct {
            fields: map
                .into_iter()
                .map(|(k, v)| (k, json_to_prost_value(v)))
                .collect(),
        }),
    };
    prost_types::Value { kind: Some(kind) }
}

// ============================================================================
// Resource Conversions
// ============================================================================

fn ready_from_proto(ready: i32) -> Ready {
    match proto::Ready::try_from(ready) {
        Ok(proto::Ready::True) => Ready::True,
        Ok(proto::Ready::False) => Ready::False,
        _ => Ready::Unspecified,
    }
}

fn ready_to_proto(ready: Ready) -> i32 {
    match ready {
        Ready::Unspecified => proto::Ready::Unspecified as i32,
        Ready::True => proto::Ready::True as i32,
        Ready::False => proto::Ready::False as i32,
    }
}

fn severity_to_proto(severity: Severity) -> i32 {
    match severity {
        Severity::Unspecified => proto::Severity::Unspecified as i32,
        Severity::Fatal => proto::Severity::Fatal as i32,
        Severity::Warning => proto::Severity::Warning as i32,
        Severity::Normal => proto::Severity::Normal as i32,
    }
}

pub fn resource_from_proto(resource: proto::Resource) -> Resource {
    Resource {
        resource: resource.resource.map(proto_struct_to_json),
        connection_details: resource
            .connection_details
            .into_iter()
            .map(|(k, v)| (k, BASE64_STANDARD.encode(v)))
            .collect(),
        ready: ready_from_proto(resource.ready),
    }
}

pub fn resource_to_proto(
    resource: Resource,
    name: &str,
) -> Result<proto::Resource, ConversionError> {
    let payload = resource
        .resource
        .map(|value| json_to_proto_struct(value, name))
        .transpose()?;

    let connection_details = resource
        .connection_details
        .into_iter()
        .map(|(key, encoded)| match BASE64_STANDARD.decode(&encoded) {
            Ok(bytes) => Ok((key, bytes)),
            Err(source) => Err(ConversionError::ConnectionDetail { key, source }),
        })
        .collect::<Result<_, _>>()?;

    Ok(proto::Resource {
        resource: payload,
        connection_details,
        ready: ready_to_proto(resource.ready),
    })
}

fn state_from_proto(state: proto::State) -> State {
    State {
        composite: state.composite.map(resource_from_proto),
        resources: state
            .resources
            .into_iter()
            .map(|(name, r)| (name, resource_from_proto(r)))
            .collect::<BTreeMap<_, _>>(),
    }
}

fn state_to_proto(state: State) -> Result<proto::State, ConversionError> {
    let composite = state
        .composite
        .map(|c| resource_to_proto(c, "composite"))
        .transpose()?;
    let resources = state
        .resources
        .into_iter()
        .map(|(name, r)| {
            let converted = resource_to_proto(r, &name)?;
            Ok((name, converted))
        })
        .collect::<Result<_, ConversionError>>()?;
    Ok(proto::State {
        composite,
        resources,
    })
}

// ============================================================================
// Envelope Conversions
// ============================================================================

/// Convert an inbound protobuf request to the envelope model.
pub fn request_from_proto(request: proto::RunFunctionRequest) -> RunFunctionRequest {
    RunFunctionRequest {
        meta: request.meta.map(|m| RequestMeta { tag: m.tag }),
        observed: request.observed.map(state_from_proto),
        desired: request.desired.map(state_from_proto),
        input: request.input.map(proto_struct_to_json),
        context: request.context.map(proto_struct_to_json),
        extra_resources: resources_map_from_proto(request.extra_resources),
        credentials: request
            .credentials
            .into_iter()
            .map(|(name, c)| (name, credentials_from_proto(c)))
            .collect(),
        required_resources: resources_map_from_proto(request.required_resources),
        extra: BTreeMap::new(),
    }
}

fn resources_map_from_proto(
    resources: HashMap<String, proto::Resources>,
) -> BTreeMap<String, Resources> {
    resources
        .into_iter()
        .map(|(name, r)| {
            let items = r.items.into_iter().map(resource_from_proto).collect();
            (name, Resources { items })
        })
        .collect()
}

fn credentials_from_proto(credentials: proto::Credentials) -> Credentials {
    let credential_data = credentials.source.map(|source| match source {
        proto::credentials::Source::CredentialData(data) => CredentialData {
            data: data
                .data
                .into_iter()
                .map(|(k, v)| (k, BASE64_STANDARD.encode(v)))
                .collect(),
        },
    });
    Credentials { credential_data }
}

/// Convert an envelope response to its protobuf form.
pub fn response_to_proto(
    response: RunFunctionResponse,
) -> Result<proto::RunFunctionResponse, ConversionError> {
    let meta = response
        .meta
        .map(|m| {
            let ttl = m
                .ttl
                .map(prost_types::Duration::try_from)
                .transpose()
                .map_err(|_| ConversionError::Ttl)?;
            Ok::<_, ConversionError>(proto::ResponseMeta { tag: m.tag, ttl })
        })
        .transpose()?;

    Ok(proto::RunFunctionResponse {
        meta,
        desired: response.desired.map(state_to_proto).transpose()?,
        results: response.results.into_iter().map(result_to_proto).collect(),
        context: response
            .context
            .map(|c| json_to_proto_struct(c, "context"))
            .transpose()?,
    })
}

fn result_to_proto(result: FunctionResult) -> proto::Result {
    proto::Result {
        severity: severity_to_proto(result.severity),
        message: result.message,
        reason: result.reason,
    }
}
