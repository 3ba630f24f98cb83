pub mod body_builder;
pub mod example_synthesizer;
pub mod path_template;
pub mod route_compiler;
pub mod route_extractor;
pub mod schema_resolver;

pub use route_compiler::{CompileOptions, compile, compile_document, compile_document_with_rng};
