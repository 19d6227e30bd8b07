//! gRPC server lifecycle: listener, mutual TLS and graceful shutdown.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use tokio::signal;
use tonic::transport::{Certificate, Identity, Server, ServerTlsConfig};
use tracing::{info, warn};

use super::service::FunctionRunner;
use crate::config::ServerConfig;
use crate::function::SwitcherFunction;
use crate::proto::v1beta1::function_runner_service_server::FunctionRunnerServiceServer;

const SERVER_CERT_FILE: &str = "tls.crt";
const SERVER_KEY_FILE: &str = "tls.key";
const CA_CERT_FILE: &str = "ca.crt";

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("invalid listen address '{address}': {source}")]
    Address {
        address: String,
        source: std::net::AddrParseError,
    },

    #[error("failed to read TLS material {}: {source}", path.display())]
    Tls {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("no TLS certificates directory configured; pass --tls-certs-dir or --insecure")]
    TlsRequired,

    #[error("gRPC transport error: {0}")]
    Transport(#[from] tonic::transport::Error),
}

/// Serve `function` until Ctrl+C or SIGTERM.
pub async fn serve(config: &ServerConfig, function: SwitcherFunction) -> Result<(), ServerError> {
    let addr: SocketAddr = config.address.parse().map_err(|e| ServerError::Address {
        address: config.address.clone(),
        source: e,
    })?;

    let mut builder = Server::builder();
    if config.insecure {
        warn!("Serving plaintext gRPC, mutual TLS is disabled");
    } else {
        let dir = config
            .tls_certs_dir
            .as_deref()
            .ok_or(ServerError::TlsRequired)?;
        builder = builder.tls_config(load_tls_config(dir)?)?;
        info!(certs_dir = %dir.display(), "Mutual TLS enabled");
    }

    let service = FunctionRunnerServiceServer::new(FunctionRunner::new(function));

    info!(%addr, "Function server listening");
    builder
        .add_service(service)
        .serve_with_shutdown(addr, shutdown_signal())
        .await?;
    info!("Function server stopped");

    Ok(())
}

fn load_tls_config(dir: &Path) -> Result<ServerTlsConfig, ServerError> {
    let cert = read_pem(&dir.join(SERVER_CERT_FILE))?;
    let key = read_pem(&dir.join(SERVER_KEY_FILE))?;
    let ca = read_pem(&dir.join(CA_CERT_FILE))?;

    Ok(ServerTlsConfig::new()
        .identity(Identity::from_pem(cert, key))
        .client_ca_root(Certificate::from_pem(ca)))
}

fn read_pem(path: &Path) -> Result<Vec<u8>, ServerError> {
    std::fs::read(path).map_err(|e| ServerError::Tls {
        path: path.to_path_buf(),
        source: e,
    })
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C");
        },
        _ = terminate => {
            info!("Received SIGTERM");
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_invalid_address_is_rejected() {
        let config = ServerConfig {
            address: "not-an-address".to_string(),
            insecure: true,
            ..Default::default()
        };
        let result = serve(&config, SwitcherFunction::default()).await;
        assert!(matches!(result, Err(ServerError::Address { .. })));
    }

    #[tokio::test]
    async fn test_tls_required_unless_insecure() {
        let config = ServerConfig {
            address: "127.0.0.1:0".to_string(),
            ..Default::default()
        };
        let result = serve(&config, SwitcherFunction::default()).await;
        assert!(matches!(result, Err(ServerError::TlsRequired)));
    }

    #[test]
    fn test_missing_tls_material_names_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_tls_config(dir.path()).unwrap_err();
        match err {
            ServerError::Tls { path, .. } => assert!(path.ends_with(SERVER_CERT_FILE)),
            other => panic!("unexpected error: {other}"),
        }
    }
}
