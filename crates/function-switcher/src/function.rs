//! # Run Orchestrator
//!
//! Wires one function invocation: read the desired composed resources,
//! decode the composite's metadata, render and collect the switch
//! annotations, prune the desired resources and write them back.
//!
//! Failures never produce a half-filtered response. The response carries a
//! fatal result and the desired state exactly as the request sent it.

use std::collections::BTreeMap;

use switcher_core::{collect_switches, decode_composite_metadata, RenderContext, SwitchResult};
use tracing::{debug, error, info};

use crate::config::FunctionConfig;
use crate::request::{Resource, RunFunctionRequest, RunFunctionResponse};

/// The switcher composition function.
///
/// Holds only immutable configuration, so one instance serves concurrent
/// requests.
#[derive(Debug, Clone, Default)]
pub struct SwitcherFunction {
    config: FunctionConfig,
}

impl SwitcherFunction {
    pub fn new(config: FunctionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &FunctionConfig {
        &self.config
    }

    /// Run the function once.
    pub fn run(&self, request: &RunFunctionRequest) -> RunFunctionResponse {
        info!(tag = %request.tag(), "Running function");

        let mut response = RunFunctionResponse::to(request, self.config.default_ttl());

        match self.switch_desired(request) {
            Ok(desired) => response.set_desired_composed_resources(desired),
            Err(e) => {
                error!(
                    stage = %e.stage(),
                    error = %e,
                    "Cannot switch desired composed resources"
                );
                response.fatal(format!("{} stage failed: {e}", e.stage()));
            }
        }

        response
    }

    fn switch_desired(
        &self,
        request: &RunFunctionRequest,
    ) -> SwitchResult<BTreeMap<String, Resource>> {
        let mut desired = request.desired_composed_resources()?;

        let meta = decode_composite_metadata(request.observed_composite_resource())?;
        let context = RenderContext::from_serialize(request)?;
        let switches = collect_switches(meta.annotations(), &context)?;

        let composite = meta.name.as_deref().unwrap_or_default();
        if switches.is_pass_through() {
            debug!(composite, "No switch annotations on composite resource");
            return Ok(desired);
        }

        let removed = switches.apply(&mut desired);
        debug!(
            composite,
            ?removed,
            kept = desired.len(),
            "Switched off desired composed resources"
        );

        Ok(desired)
    }
}
