//! Composition function that switches desired composed resources on and off.
//!
//! The switching itself lives in `switcher_core`; this crate is the runtime
//! around it.
//!
//! # Modules
//!
//! - [`request`]: Serde model of the function request and response envelope
//! - [`function`]: The run orchestrator
//! - [`config`]: TOML configuration with defaults
//! - [`logging`]: Tracing subscriber setup
//! - `grpc`: `FunctionRunnerService` server (feature `grpc`)

pub mod config;
pub mod function;
pub mod logging;
pub mod request;

#[cfg(feature = "grpc")]
pub mod grpc;
#[cfg(feature = "grpc")]
pub mod proto;

pub use config::{ConfigError, FunctionConfig, SwitcherConfig};
pub use function::SwitcherFunction;
pub use request::{RunFunctionRequest, RunFunctionResponse};
