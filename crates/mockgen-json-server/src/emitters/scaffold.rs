use minijinja::context;
use mockgen_core::GeneratedFile;
use mockgen_core::config::Scheme;
use mockgen_core::error::GeneratorError;

use super::{CERT_FILE, KEY_FILE, file_stem, render};
use crate::generator::JsonServerOptions;

/// Emit `package.json` with a start script for the server file.
pub fn emit_package_json(options: &JsonServerOptions) -> Result<String, GeneratorError> {
    render(
        "package.json.j2",
        context! {
            name => &options.name,
            server_file => &options.server.server_file,
        },
    )
}

/// Emit `Dockerfile` and `compose.yaml`. The https image creates its own
/// self-signed certificate for the compose service name.
pub fn emit_docker(options: &JsonServerOptions) -> Result<Vec<GeneratedFile>, GeneratorError> {
    let server = &options.server;
    let service = file_stem(&server.server_file);
    let https = server.scheme == Scheme::Https;

    let dockerfile = render(
        "Dockerfile.j2",
        context! {
            https => https,
            db_file => &server.db_file,
            port => server.port,
            host => service,
            key_file => KEY_FILE,
            cert_file => CERT_FILE,
        },
    )?;
    let compose = render(
        "compose.yaml.j2",
        context! {
            service => service,
            port => server.port,
        },
    )?;

    Ok(vec![
        GeneratedFile {
            path: "Dockerfile".to_string(),
            content: dockerfile,
        },
        GeneratedFile {
            path: "compose.yaml".to_string(),
            content: compose,
        },
    ])
}

/// Emit a `Makefile` with install, run and docker targets.
pub fn emit_makefile(options: &JsonServerOptions) -> Result<String, GeneratorError> {
    render(
        "Makefile.j2",
        context! {
            name => &options.name,
            https => options.server.scheme == Scheme::Https,
            key_file => KEY_FILE,
            cert_file => CERT_FILE,
        },
    )
}
