//! `FunctionRunnerService` implementation.

use std::sync::Arc;

use tonic::{Request, Response, Status};
use tracing::{debug, error};

use super::conversions::{request_from_proto, response_to_proto};
use crate::function::SwitcherFunction;
use crate::proto::v1beta1::function_runner_service_server::FunctionRunnerService;
use crate::proto::v1beta1::{RunFunctionRequest, RunFunctionResponse};

/// gRPC handler that delegates to a shared [`SwitcherFunction`].
#[derive(Debug, Clone)]
pub struct FunctionRunner {
    function: Arc<SwitcherFunction>,
}

impl FunctionRunner {
    pub fn new(function: SwitcherFunction) -> Self {
        Self {
            function: Arc::new(function),
        }
    }
}

#[tonic::async_trait]
impl FunctionRunnerService for FunctionRunner {
    async fn run_function(
        &self,
        request: Request<RunFunctionRequest>,
    ) -> Result<Response<RunFunctionResponse>, Status> {
        debug!(remote = ?request.remote_addr(), "RunFunction");

        let request = request_from_proto(request.into_inner());
        let response = self.function.run(&request);

        let response = response_to_proto(response).map_err(|e| {
            error!(error = %e, "Cannot encode function response");
            Status::internal(format!("cannot encode response: {e}"))
        })?;

        Ok(Response::new(response))
    }
}
