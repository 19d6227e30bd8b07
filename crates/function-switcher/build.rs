//! Build script for function-switcher
//!
//! Compiles the composition function Protocol Buffer definitions when the
//! `grpc` feature is enabled. Generated code is included via `tonic::include_proto!`
//! in `src/proto.rs`.
//!
//! # Protocol Buffer Compiler
//!
//! This build script requires the `protoc` compiler to be installed on the system.
//! On macOS, install via: `brew install protobuf`

fn main() -> Result<(), Box<dyn std::error::Error>> {
    #[cfg(feature = "grpc")]
    {
        use std::path::PathBuf;

        let manifest_dir = PathBuf::from(std::env::var("CARGO_MANIFEST_DIR")?);
        let proto_root = manifest_dir.join("proto");
        let proto_file = proto_root.join("apiextensions/fn/proto/v1beta1/run_function.proto");

        if !proto_file.exists() {
            return Err(format!("Proto file not found: {}", proto_file.display()).into());
        }

        // Server only; the CLI never calls other functions
        tonic_prost_build::configure()
            .build_server(true)
            .build_client(false)
            .build_transport(true)
            .emit_rerun_if_changed(true)
            .compile_protos(&[proto_file], std::slice::from_ref(&proto_root))?;

        println!("cargo:rerun-if-changed={}", proto_root.display());
    }

    Ok(())
}
