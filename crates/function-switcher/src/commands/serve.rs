//! Serve the function over gRPC.

use std::process::ExitCode;

use function_switcher::{grpc, SwitcherConfig, SwitcherFunction};
use tracing::info;

pub(crate) async fn handle_serve_command(config: &SwitcherConfig) -> anyhow::Result<ExitCode> {
    let function = SwitcherFunction::new(config.function.clone());

    info!(
        version = env!("CARGO_PKG_VERSION"),
        address = %config.server.address,
        default_ttl_seconds = function.config().default_ttl_seconds,
        "Starting function-switcher"
    );

    grpc::serve(&config.server, function).await?;

    Ok(ExitCode::SUCCESS)
}
