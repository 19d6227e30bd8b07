//! Command handlers for the function-switcher CLI

pub(crate) mod render;
#[cfg(feature = "grpc")]
pub(crate) mod serve;

pub(crate) use render::handle_render_command;
#[cfg(feature = "grpc")]
pub(crate) use serve::handle_serve_command;
