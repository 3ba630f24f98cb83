use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;

/// Top-level project configuration loaded from `.mockgen.yaml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MockgenConfig {
    pub input: String,
    pub output: String,
    pub compile: CompileConfig,
    pub server: ServerConfig,
}

impl Default for MockgenConfig {
    fn default() -> Self {
        Self {
            input: "openapi.yaml".to_string(),
            output: ".".to_string(),
            compile: CompileConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

/// Knobs for route compilation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CompileConfig {
    /// How far referenced, array-item and nested schemas are expanded.
    /// `0` keeps bodies to their first level.
    pub max_recursion_depth: usize,
    /// Fill leaves with random example data instead of zero values.
    pub generate_examples: bool,
    /// Fixed seed for reproducible example data.
    pub seed: Option<u64>,
}

/// Which transport the generated mock server listens on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scheme {
    #[default]
    Http,
    Https,
}

impl Scheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scheme::Http => "http",
            Scheme::Https => "https",
        }
    }
}

/// Options for the rendered json-server project.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub scheme: Scheme,
    pub port: u16,
    pub db_file: String,
    pub server_file: String,
    /// Emit `Dockerfile` and `compose.yaml`.
    pub docker: bool,
    /// Emit a `Makefile` with install/run/docker targets.
    pub makefile: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            scheme: Scheme::Http,
            port: 5000,
            db_file: "db.json".to_string(),
            server_file: "server.js".to_string(),
            docker: true,
            makefile: true,
        }
    }
}

/// Default config file name.
pub const CONFIG_FILE_NAME: &str = ".mockgen.yaml";

/// Load config from a YAML file. Returns `None` if the file doesn't exist.
pub fn load_config(path: &Path) -> Result<Option<MockgenConfig>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.display().to_string(),
        source,
    })?;
    let config = serde_yaml_ng::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.display().to_string(),
        source,
    })?;
    Ok(Some(config))
}

/// Generate the default config file content.
pub fn default_config_content() -> &'static str {
    r#"# mockgen configuration
input: openapi.yaml
output: .

compile:
  max_recursion_depth: 0    # how deep nested/referenced schemas are expanded
  generate_examples: false  # random example data instead of zero values
  # seed: 42                # fixed seed for reproducible examples

server:
  scheme: http              # http | https
  port: 5000
  db_file: db.json
  server_file: server.js
  docker: true              # Dockerfile + compose.yaml
  makefile: true
"#
}
