//! Generated composition function protocol types.

#[allow(missing_debug_implementations, clippy::all)]
pub mod v1beta1 {
    tonic::include_proto!("apiextensions.fn.proto.v1beta1");
}
