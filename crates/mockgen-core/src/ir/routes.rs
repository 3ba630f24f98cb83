use std::fmt;

use indexmap::{IndexMap, IndexSet};
use serde::Serialize;

use super::example::ExampleValue;

/// HTTP method of a mock route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Options,
    Head,
    Trace,
}

impl HttpMethod {
    /// Lower-case verb, as used for json-server handler names.
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "get",
            HttpMethod::Post => "post",
            HttpMethod::Put => "put",
            HttpMethod::Delete => "delete",
            HttpMethod::Patch => "patch",
            HttpMethod::Options => "options",
            HttpMethod::Head => "head",
            HttpMethod::Trace => "trace",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One compiled mock endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteRecord {
    /// Normalized path (`/orders/:orderId`). Query variants carry the
    /// decorated literal `/orders/:orderId?status=` instead.
    pub path: String,
    pub method: HttpMethod,
    /// Backing-store collection name derived from the path.
    pub storage_key: String,
    /// First success status code, as declared.
    pub response_status: Option<String>,
    pub response_body: Option<ExampleValue>,
    /// Path parameter names, hyphens removed, in path order.
    pub path_parameters: Vec<String>,
    pub request_body: Option<ExampleValue>,
    /// Set on query variants only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query_parameter: Option<String>,
}

impl RouteRecord {
    /// The routable path this record is grouped under. Strips the
    /// `?name=` decoration of query variants.
    pub fn route_path(&self) -> &str {
        match self.query_parameter {
            Some(_) => self
                .path
                .split_once('?')
                .map_or(self.path.as_str(), |(path, _)| path),
            None => &self.path,
        }
    }

    pub fn is_query_variant(&self) -> bool {
        self.query_parameter.is_some()
    }

    /// Backing-store path: `/` + storage key + one `:param` per path parameter.
    pub fn backing_path(&self) -> String {
        let mut path = format!("/{}", self.storage_key);
        for param in &self.path_parameters {
            path.push_str("/:");
            path.push_str(param);
        }
        path
    }
}

/// Routes grouped by method, then by routable path, in document order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RouteTable {
    routes: IndexMap<HttpMethod, IndexMap<String, Vec<RouteRecord>>>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record to its (method, route path) bucket.
    pub fn push(&mut self, record: RouteRecord) {
        self.routes
            .entry(record.method)
            .or_default()
            .entry(record.route_path().to_string())
            .or_default()
            .push(record);
    }

    pub fn get(&self, method: HttpMethod, path: &str) -> Option<&[RouteRecord]> {
        self.routes
            .get(&method)
            .and_then(|paths| paths.get(path))
            .map(Vec::as_slice)
    }

    pub fn methods(&self) -> impl Iterator<Item = HttpMethod> + '_ {
        self.routes.keys().copied()
    }

    /// Every record, methods first, then paths, then records.
    pub fn records(&self) -> impl Iterator<Item = &RouteRecord> {
        self.routes
            .values()
            .flat_map(|paths| paths.values())
            .flatten()
    }

    /// Total number of records, query variants included.
    pub fn len(&self) -> usize {
        self.records().count()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

/// The route table plus everything derived from it for code generation.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CompiledRoutes {
    pub table: RouteTable,
    /// One entry per distinct (backing path, method), first record wins.
    pub backing_routes: Vec<RouteRecord>,
    /// Original path literal to backing path, in visit order.
    pub rewrites: IndexMap<String, String>,
    /// Every storage key, in first-seen order.
    pub collections: IndexSet<String>,
}
