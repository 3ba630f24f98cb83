pub mod info;
pub mod openapi;
pub mod reference;
pub mod swagger;

use serde::Deserialize;

use crate::error::ParseError;
use info::Info;
use openapi::OpenApiSpec;
use swagger::SwaggerSpec;

/// A parsed API description in either supported dialect.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiDocument {
    /// Swagger 2.x.
    Swagger(SwaggerSpec),
    /// OpenAPI 3.x.
    OpenApi(OpenApiSpec),
}

impl ApiDocument {
    /// The declared `swagger` / `openapi` version string.
    pub fn version(&self) -> &str {
        match self {
            ApiDocument::Swagger(spec) => &spec.swagger,
            ApiDocument::OpenApi(spec) => &spec.openapi,
        }
    }

    pub fn info(&self) -> &Info {
        match self {
            ApiDocument::Swagger(spec) => &spec.info,
            ApiDocument::OpenApi(spec) => &spec.info,
        }
    }

    pub fn path_count(&self) -> usize {
        match self {
            ApiDocument::Swagger(spec) => spec.paths.len(),
            ApiDocument::OpenApi(spec) => spec.paths.len(),
        }
    }

    /// Number of entries in the schema definition registry.
    pub fn definition_count(&self) -> usize {
        match self {
            ApiDocument::Swagger(spec) => spec.definitions.len(),
            ApiDocument::OpenApi(spec) => spec
                .components
                .as_ref()
                .map_or(0, |components| components.schemas.len()),
        }
    }
}

/// Just enough of the document to pick a dialect.
#[derive(Debug, Deserialize)]
struct VersionProbe {
    swagger: Option<String>,
    openapi: Option<String>,
}

enum Dialect {
    Swagger,
    OpenApi,
}

fn detect_dialect(probe: VersionProbe) -> Result<Dialect, ParseError> {
    match (probe.swagger, probe.openapi) {
        (_, Some(version)) if version.starts_with("3.") => Ok(Dialect::OpenApi),
        (Some(version), None) if version.starts_with("2.") => Ok(Dialect::Swagger),
        (_, Some(version)) | (Some(version), None) => {
            Err(ParseError::UnsupportedVersion(version))
        }
        (None, None) => Err(ParseError::MissingField("openapi or swagger".to_string())),
    }
}

/// Parse an API description from YAML.
pub fn from_yaml(input: &str) -> Result<ApiDocument, ParseError> {
    let probe: VersionProbe = serde_yaml_ng::from_str(input)?;
    let document = match detect_dialect(probe)? {
        Dialect::Swagger => ApiDocument::Swagger(serde_yaml_ng::from_str(input)?),
        Dialect::OpenApi => ApiDocument::OpenApi(serde_yaml_ng::from_str(input)?),
    };
    Ok(document)
}

/// Parse an API description from JSON.
pub fn from_json(input: &str) -> Result<ApiDocument, ParseError> {
    let probe: VersionProbe = serde_json::from_str(input)?;
    let document = match detect_dialect(probe)? {
        Dialect::Swagger => ApiDocument::Swagger(serde_json::from_str(input)?),
        Dialect::OpenApi => ApiDocument::OpenApi(serde_json::from_str(input)?),
    };
    Ok(document)
}
