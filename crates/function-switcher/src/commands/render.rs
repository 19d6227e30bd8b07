//! Run a single request from a file and print the response.

use std::io::{self, Read, Write};
use std::path::Path;
use std::process::ExitCode;

use anyhow::Context;
use function_switcher::{
    RunFunctionRequest, RunFunctionResponse, SwitcherConfig, SwitcherFunction,
};
use tracing::warn;

use crate::OutputFormat;

pub(crate) fn handle_render_command(
    config: &SwitcherConfig,
    request_path: &Path,
    output: OutputFormat,
) -> anyhow::Result<ExitCode> {
    let source = read_source(request_path)?;
    // YAML is a superset of JSON, so one parser covers both.
    let request: RunFunctionRequest = serde_yaml::from_str(&source)
        .with_context(|| format!("failed to parse request {}", request_path.display()))?;

    let function = SwitcherFunction::new(config.function.clone());
    let response = function.run(&request);

    write_response(&response, output)?;

    if response.has_fatal() {
        warn!("Function returned a fatal result");
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

fn read_source(path: &Path) -> anyhow::Result<String> {
    if path == Path::new("-") {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("failed to read request from stdin")?;
        return Ok(buffer);
    }
    std::fs::read_to_string(path)
        .with_context(|| format!("failed to read request {}", path.display()))
}

fn write_response(response: &RunFunctionResponse, output: OutputFormat) -> anyhow::Result<()> {
    let rendered = match output {
        OutputFormat::Yaml => serde_yaml::to_string(response)?,
        OutputFormat::Json => {
            let mut json = serde_json::to_string_pretty(response)?;
            json.push('\n');
            json
        }
    };
    io::stdout()
        .lock()
        .write_all(rendered.as_bytes())
        .context("failed to write response")?;
    Ok(())
}
