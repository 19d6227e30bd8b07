//! function-switcher
//!
//! Composition function that removes desired composed resources named by the
//! composite's `switcher.fn.kndp.io/enabled` and `switcher.fn.kndp.io/disabled`
//! annotations.

mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};

use function_switcher::config::LogFormat;
use function_switcher::logging::init_tracing;
use function_switcher::SwitcherConfig;

#[derive(Debug, Parser)]
#[command(name = "function-switcher", version)]
#[command(about = "Switch composed resources on and off from composite annotations")]
struct Cli {
    /// Configuration file (TOML)
    #[arg(long, global = true, env = "SWITCHER_CONFIG")]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true, env = "SWITCHER_DEBUG")]
    debug: bool,

    /// Log output format
    #[arg(long, global = true, value_enum, env = "SWITCHER_LOG_FORMAT")]
    log_format: Option<LogFormat>,

    /// TTL set on every response, in seconds
    #[arg(long, global = true, env = "SWITCHER_DEFAULT_TTL_SECONDS")]
    default_ttl_seconds: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run one request read from a YAML or JSON file and print the response
    Render {
        /// Request file, or `-` for stdin
        #[arg(short, long)]
        request: PathBuf,

        /// Response output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Yaml)]
        output: OutputFormat,
    },

    /// Serve FunctionRunnerService over gRPC
    #[cfg(feature = "grpc")]
    Serve {
        /// Listen address
        #[arg(long, env = "SWITCHER_ADDRESS")]
        address: Option<String>,

        /// Directory containing tls.crt, tls.key and ca.crt
        #[arg(long, env = "TLS_SERVER_CERTS_DIR")]
        tls_certs_dir: Option<PathBuf>,

        /// Serve plaintext gRPC without mutual TLS
        #[arg(long, env = "SWITCHER_INSECURE")]
        insecure: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Yaml,
    Json,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let mut config = SwitcherConfig::load(cli.config.as_deref())?;
    if cli.debug {
        config.logging.debug = true;
    }
    if let Some(format) = cli.log_format {
        config.logging.format = format;
    }
    if let Some(ttl) = cli.default_ttl_seconds {
        config.function.default_ttl_seconds = ttl;
    }

    init_tracing(&config.logging);

    match cli.command {
        Commands::Render { request, output } => {
            commands::handle_render_command(&config, &request, output)
        }

        #[cfg(feature = "grpc")]
        Commands::Serve {
            address,
            tls_certs_dir,
            insecure,
        } => {
            if let Some(address) = address {
                config.server.address = address;
            }
            if tls_certs_dir.is_some() {
                config.server.tls_certs_dir = tls_certs_dir;
            }
            if insecure {
                config.server.insecure = true;
            }
            commands::handle_serve_command(&config).await
        }
    }
}
