//! Swagger 2.0 document model.

pub mod operation;
pub mod schema;

use indexmap::IndexMap;
use log::warn;
use serde::{Deserialize, Serialize};

use super::info::Info;
use super::reference::reference_name;
pub use operation::{
    Operation, Parameter, ParameterLocation, ParameterOrRef, PathItem, Response, ResponseOrRef,
};
pub use schema::{Schema, SchemaOrRef, SchemaType};

/// Top-level Swagger 2.0 specification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwaggerSpec {
    pub swagger: String,

    pub info: Info,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,

    #[serde(rename = "basePath", skip_serializing_if = "Option::is_none")]
    pub base_path: Option<String>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub paths: IndexMap<String, PathItem>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub definitions: IndexMap<String, SchemaOrRef>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub parameters: IndexMap<String, Parameter>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub responses: IndexMap<String, Response>,
}

impl SwaggerSpec {
    /// Resolve a parameter, following a `$ref` into `#/parameters`.
    pub fn parameter<'a>(&'a self, param: &'a ParameterOrRef) -> Option<&'a Parameter> {
        match param {
            ParameterOrRef::Parameter(p) => Some(p),
            ParameterOrRef::Ref { ref_path } => {
                let found = self.parameters.get(reference_name(ref_path));
                if found.is_none() {
                    warn!("unresolved parameter reference {ref_path}");
                }
                found
            }
        }
    }

    /// Resolve a response, following a `$ref` into `#/responses`.
    pub fn response<'a>(&'a self, response: &'a ResponseOrRef) -> Option<&'a Response> {
        match response {
            ResponseOrRef::Response(r) => Some(r),
            ResponseOrRef::Ref { ref_path } => {
                let found = self.responses.get(reference_name(ref_path));
                if found.is_none() {
                    warn!("unresolved response reference {ref_path}");
                }
                found
            }
        }
    }
}
