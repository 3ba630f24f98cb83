use heck::ToKebabCase;
use log::debug;
use mockgen_core::config::ServerConfig;
use mockgen_core::error::GeneratorError;
use mockgen_core::ir::CompiledRoutes;
use mockgen_core::{CodeGenerator, GeneratedFile};

use crate::emitters;

/// Options for one rendered json-server project.
#[derive(Debug, Clone)]
pub struct JsonServerOptions {
    /// npm package and docker image name.
    pub name: String,
    pub server: ServerConfig,
}

/// Renders compiled routes into a runnable json-server project.
pub struct JsonServerGenerator;

impl JsonServerGenerator {
    /// Options named after the API title, falling back to the server file
    /// stem when the title has no usable characters.
    pub fn build_options(title: &str, server: &ServerConfig) -> JsonServerOptions {
        let name = match title.to_kebab_case() {
            name if name.is_empty() => emitters::file_stem(&server.server_file).to_string(),
            name => name,
        };
        JsonServerOptions {
            name,
            server: server.clone(),
        }
    }
}

impl CodeGenerator for JsonServerGenerator {
    type Config = JsonServerOptions;
    type Error = GeneratorError;

    fn generate(
        &self,
        routes: &CompiledRoutes,
        config: &JsonServerOptions,
    ) -> Result<Vec<GeneratedFile>, GeneratorError> {
        let server = &config.server;
        let mut files = vec![
            GeneratedFile {
                path: server.server_file.clone(),
                content: emitters::server::emit_server(routes, server)?,
            },
            GeneratedFile {
                path: server.db_file.clone(),
                content: emitters::database::emit_database(routes)?,
            },
            GeneratedFile {
                path: "package.json".to_string(),
                content: emitters::scaffold::emit_package_json(config)?,
            },
        ];

        if server.docker {
            files.extend(emitters::scaffold::emit_docker(config)?);
        }
        if server.makefile {
            files.push(GeneratedFile {
                path: "Makefile".to_string(),
                content: emitters::scaffold::emit_makefile(config)?,
            });
        }

        debug!("rendered {} files for {}", files.len(), config.name);
        Ok(files)
    }
}
