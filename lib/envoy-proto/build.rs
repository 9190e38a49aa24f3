use std::{
    io::{Error, ErrorKind},
    path::PathBuf,
};

fn main() -> Result<(), Error> {
    // Prefer a system `protoc` when the caller provides one.
    if std::env::var_os("PROTOC").is_none() {
        let protoc = protoc_bin_vendored::protoc_bin_path()
            .map_err(|error| Error::new(ErrorKind::NotFound, error.to_string()))?;
        std::env::set_var("PROTOC", protoc);
    }
    let well_known = protoc_bin_vendored::include_path()
        .map_err(|error| Error::new(ErrorKind::NotFound, error.to_string()))?;

    let protos: Vec<PathBuf> = [
        "proto/envoy/config/core/v3/base.proto",
        "proto/envoy/data/accesslog/v3/accesslog.proto",
        "proto/envoy/service/accesslog/v3/als.proto",
    ]
    .into_iter()
    .map(PathBuf::from)
    .collect();
    for proto in &protos {
        println!("cargo:rerun-if-changed={}", proto.display());
    }

    tonic_build::configure()
        .build_server(true)
        .build_client(true)
        .compile(&protos, &[PathBuf::from("proto"), well_known])?;

    Ok(())
}
