use std::path::PathBuf;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let protoc = protoc_bin_vendored::protoc_bin_path()?;
    let well_known: PathBuf = protoc_bin_vendored::include_path()?;
    std::env::set_var("PROTOC", protoc);

    tonic_build::configure()
        .build_server(true)
        .build_client(true)
        .compile_protos(&["proto/ports.proto"], &[PathBuf::from("proto"), well_known])?;

    println!("cargo:rerun-if-changed=proto/ports.proto");

    Ok(())
}
