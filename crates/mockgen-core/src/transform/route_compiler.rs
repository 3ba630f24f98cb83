use std::collections::HashSet;

use indexmap::{IndexMap, IndexSet};
use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::CompileConfig;
use crate::ir::{CompiledRoutes, RouteTable};
use crate::parse::ApiDocument;

use super::example_synthesizer::Synthesizer;
use super::route_extractor::{extract_openapi, extract_swagger};

/// Options for compiling a document into routes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompileOptions {
    pub max_recursion_depth: usize,
    pub generate_examples: bool,
    /// Seed for example data. Entropy is used when absent.
    pub seed: Option<u64>,
}

impl From<&CompileConfig> for CompileOptions {
    fn from(config: &CompileConfig) -> Self {
        Self {
            max_recursion_depth: config.max_recursion_depth,
            generate_examples: config.generate_examples,
            seed: config.seed,
        }
    }
}

/// Compile a parsed document into routes.
pub fn compile_document(document: &ApiDocument, options: &CompileOptions) -> CompiledRoutes {
    let rng = match options.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    compile_document_with_rng(document, options, rng)
}

/// Compile with an explicit random source for example data.
pub fn compile_document_with_rng<R: Rng>(
    document: &ApiDocument,
    options: &CompileOptions,
    rng: R,
) -> CompiledRoutes {
    compile(extract_routes(document, options, rng))
}

/// Run route extraction for whichever dialect the document is in.
pub fn extract_routes<R: Rng>(
    document: &ApiDocument,
    options: &CompileOptions,
    rng: R,
) -> RouteTable {
    let mut synthesizer = Synthesizer::new(rng, options.generate_examples);
    match document {
        ApiDocument::Swagger(spec) => {
            extract_swagger(spec, &mut synthesizer, options.max_recursion_depth)
        }
        ApiDocument::OpenApi(spec) => {
            extract_openapi(spec, &mut synthesizer, options.max_recursion_depth)
        }
    }
}

/// Derive the backing-store routes, rewrite table and collections from a
/// route table.
///
/// Records are visited methods first, then paths, then records. The first
/// record seen for a (backing path, method) pair becomes its backing route;
/// every record's path literal is mapped to its backing path.
pub fn compile(table: RouteTable) -> CompiledRoutes {
    let mut seen = HashSet::new();
    let mut backing_routes = Vec::new();
    let mut rewrites = IndexMap::new();
    let mut collections = IndexSet::new();

    for record in table.records() {
        let backing_path = record.backing_path();
        collections.insert(record.storage_key.clone());
        rewrites
            .entry(record.path.clone())
            .or_insert_with(|| backing_path.clone());
        if seen.insert((backing_path, record.method)) {
            backing_routes.push(record.clone());
        }
    }
    debug!(
        "{} records, {} backing routes, {} collections",
        table.len(),
        backing_routes.len(),
        collections.len()
    );

    CompiledRoutes {
        table,
        backing_routes,
        rewrites,
        collections,
    }
}
