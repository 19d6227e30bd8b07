//! # Function Request and Response Model
//!
//! Serde model of the composition function envelope in its canonical JSON
//! form: lowerCamelCase field names, enums as their protobuf names, durations
//! as `"60s"` strings and empty fields omitted. Serializing a request yields
//! the render context that switch annotation templates see.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use switcher_core::{SwitchError, SwitchResult};

/// A request to run the function once.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunFunctionRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<RequestMeta>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observed: Option<State>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desired: Option<State>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<Value>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra_resources: BTreeMap<String, Resources>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub credentials: BTreeMap<String, Credentials>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub required_resources: BTreeMap<String, Resources>,

    /// Request fields not modelled above, preserved for the render context.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestMeta {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub tag: String,
}

/// Observed or desired state of the composite and its composed resources.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct State {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub composite: Option<Resource>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub resources: BTreeMap<String, Resource>,
}

/// A composite or composed resource. The payload is never interpreted here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource: Option<Value>,

    /// Connection details, values base64-encoded as in protobuf JSON.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub connection_details: BTreeMap<String, String>,

    #[serde(default, skip_serializing_if = "Ready::is_unspecified")]
    pub ready: Ready,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Resources {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<Resource>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credential_data: Option<CredentialData>,
}

/// Credential values, base64-encoded as in protobuf JSON.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialData {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub data: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Ready {
    #[default]
    #[serde(rename = "READY_UNSPECIFIED")]
    Unspecified,
    #[serde(rename = "READY_TRUE")]
    True,
    #[serde(rename = "READY_FALSE")]
    False,
}

impl Ready {
    pub fn is_unspecified(&self) -> bool {
        matches!(self, Ready::Unspecified)
    }
}

/// The function's answer to a [`RunFunctionRequest`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunFunctionResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<ResponseMeta>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desired: Option<State>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub results: Vec<FunctionResult>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseMeta {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub tag: String,

    #[serde(default, skip_serializing_if = "Option::is_none", with = "duration_json")]
    pub ttl: Option<Duration>,
}

/// A result reported back to the caller, e.g. a fatal error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionResult {
    pub severity: Severity,

    #[serde(default)]
    pub message: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    #[default]
    #[serde(rename = "SEVERITY_UNSPECIFIED")]
    Unspecified,
    #[serde(rename = "SEVERITY_FATAL")]
    Fatal,
    #[serde(rename = "SEVERITY_WARNING")]
    Warning,
    #[serde(rename = "SEVERITY_NORMAL")]
    Normal,
}

impl RunFunctionRequest {
    /// Request tag, empty when the caller sent none.
    pub fn tag(&self) -> &str {
        self.meta.as_ref().map_or("", |m| m.tag.as_str())
    }

    /// Payload of the observed composite resource, if any.
    pub fn observed_composite_resource(&self) -> Option<&Value> {
        self.observed
            .as_ref()
            .and_then(|s| s.composite.as_ref())
            .and_then(|c| c.resource.as_ref())
    }

    /// Desired composed resources keyed by name.
    ///
    /// Every payload that is present must be a resource object.
    pub fn desired_composed_resources(&self) -> SwitchResult<BTreeMap<String, Resource>> {
        let Some(desired) = self.desired.as_ref() else {
            return Ok(BTreeMap::new());
        };

        for (name, resource) in &desired.resources {
            match &resource.resource {
                None | Some(Value::Object(_)) => {}
                Some(_) => {
                    return Err(SwitchError::upstream_read(
                        name,
                        "resource payload is not an object",
                    ))
                }
            }
        }

        Ok(desired.resources.clone())
    }
}

impl RunFunctionResponse {
    /// Start a response from a request: tag, TTL, desired state and context
    /// carry over unchanged.
    pub fn to(request: &RunFunctionRequest, ttl: Duration) -> Self {
        Self {
            meta: Some(ResponseMeta {
                tag: request.tag().to_string(),
                ttl: Some(ttl),
            }),
            desired: request.desired.clone(),
            results: Vec::new(),
            context: request.context.clone(),
        }
    }

    /// Record a fatal result. Callers treat the run as failed.
    pub fn fatal(&mut self, message: impl Into<String>) {
        self.results.push(FunctionResult {
            severity: Severity::Fatal,
            message: message.into(),
            reason: None,
        });
    }

    pub fn has_fatal(&self) -> bool {
        self.results.iter().any(|r| r.severity == Severity::Fatal)
    }

    /// Replace the desired composed resources, creating the desired state if needed.
    pub fn set_desired_composed_resources(&mut self, resources: BTreeMap<String, Resource>) {
        self.desired.get_or_insert_with(State::default).resources = resources;
    }
}

/// Protobuf JSON encoding of `google.protobuf.Duration`: seconds with an `s`
/// suffix and up to nine fractional digits.
mod duration_json {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub(super) fn serialize<S: Serializer>(
        value: &Option<Duration>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(duration) => serializer.serialize_str(&format(*duration)),
            None => serializer.serialize_none(),
        }
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Duration>, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        raw.map(|s| parse(&s).map_err(serde::de::Error::custom))
            .transpose()
    }

    pub(super) fn format(duration: Duration) -> String {
        let nanos = duration.subsec_nanos();
        if nanos == 0 {
            return format!("{}s", duration.as_secs());
        }
        let fraction = format!("{nanos:09}");
        format!("{}.{}s", duration.as_secs(), fraction.trim_end_matches('0'))
    }

    pub(super) fn parse(raw: &str) -> Result<Duration, String> {
        let seconds = raw
            .strip_suffix('s')
            .ok_or_else(|| format!("duration '{raw}' must end with 's'"))?;
        let (whole, fraction) = seconds.split_once('.').unwrap_or((seconds, ""));
        let secs: u64 = whole
            .parse()
            .map_err(|_| format!("invalid duration seconds in '{raw}'"))?;
        if fraction.len() > 9 || !fraction.chars().all(|c| c.is_ascii_digit()) {
            return Err(format!("invalid duration fraction in '{raw}'"));
        }
        let nanos: u32 = if fraction.is_empty() {
            0
        } else {
            format!("{fraction:0<9}")
                .parse()
                .map_err(|_| format!("invalid duration fraction in '{raw}'"))?
        };
        Ok(Duration::new(secs, nanos))
    }
}
