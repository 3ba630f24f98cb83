//! OpenAPI 3.x document model.

pub mod operation;
pub mod schema;

use indexmap::IndexMap;
use log::warn;
use serde::{Deserialize, Serialize};

use super::info::Info;
use super::reference::reference_name;
pub use operation::{
    MediaType, Operation, Parameter, ParameterLocation, ParameterOrRef, PathItem, RequestBody,
    RequestBodyOrRef, Response, ResponseOrRef, first_content_schema,
};
pub use schema::{Schema, SchemaOrRef, SchemaType, TypeSet};

/// Top-level OpenAPI 3.x specification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenApiSpec {
    pub openapi: String,

    pub info: Info,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub paths: IndexMap<String, PathItem>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub components: Option<Components>,
}

/// Components object holding reusable definitions.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Components {
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub schemas: IndexMap<String, SchemaOrRef>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub responses: IndexMap<String, ResponseOrRef>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub parameters: IndexMap<String, ParameterOrRef>,

    #[serde(
        rename = "requestBodies",
        default,
        skip_serializing_if = "IndexMap::is_empty"
    )]
    pub request_bodies: IndexMap<String, RequestBodyOrRef>,
}

impl OpenApiSpec {
    /// The schema registry `$ref`s into `#/components/schemas` are looked up in.
    pub fn schemas(&self) -> Option<&IndexMap<String, SchemaOrRef>> {
        self.components.as_ref().map(|c| &c.schemas)
    }

    /// Resolve a parameter, following a single `$ref` into components.
    /// Unknown targets yield `None` so the caller can skip them.
    pub fn parameter<'a>(&'a self, param: &'a ParameterOrRef) -> Option<&'a Parameter> {
        match param {
            ParameterOrRef::Parameter(p) => Some(p),
            ParameterOrRef::Ref { ref_path } => {
                let found = self
                    .components
                    .as_ref()
                    .and_then(|c| c.parameters.get(reference_name(ref_path)))
                    .and_then(|p| match p {
                        ParameterOrRef::Parameter(p) => Some(p),
                        ParameterOrRef::Ref { .. } => None,
                    });
                if found.is_none() {
                    warn!("unresolved parameter reference {ref_path}");
                }
                found
            }
        }
    }

    pub fn request_body<'a>(&'a self, body: &'a RequestBodyOrRef) -> Option<&'a RequestBody> {
        match body {
            RequestBodyOrRef::RequestBody(rb) => Some(rb),
            RequestBodyOrRef::Ref { ref_path } => {
                let found = self
                    .components
                    .as_ref()
                    .and_then(|c| c.request_bodies.get(reference_name(ref_path)))
                    .and_then(|rb| match rb {
                        RequestBodyOrRef::RequestBody(rb) => Some(rb),
                        RequestBodyOrRef::Ref { .. } => None,
                    });
                if found.is_none() {
                    warn!("unresolved request body reference {ref_path}");
                }
                found
            }
        }
    }

    pub fn response<'a>(&'a self, response: &'a ResponseOrRef) -> Option<&'a Response> {
        match response {
            ResponseOrRef::Response(r) => Some(r),
            ResponseOrRef::Ref { ref_path } => {
                let found = self
                    .components
                    .as_ref()
                    .and_then(|c| c.responses.get(reference_name(ref_path)))
                    .and_then(|r| match r {
                        ResponseOrRef::Response(r) => Some(r),
                        ResponseOrRef::Ref { .. } => None,
                    });
                if found.is_none() {
                    warn!("unresolved response reference {ref_path}");
                }
                found
            }
        }
    }
}
