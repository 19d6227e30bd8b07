//! gRPC transport for the function.
//!
//! Serves `apiextensions.fn.proto.v1beta1.FunctionRunnerService`. Requests are
//! converted into the serde envelope model, run through [`SwitcherFunction`],
//! and converted back.
//!
//! [`SwitcherFunction`]: crate::function::SwitcherFunction

pub mod conversions;
pub mod server;
pub mod service;

pub use conversions::ConversionError;
pub use server::{serve, ServerError};
pub use service::FunctionRunner;
