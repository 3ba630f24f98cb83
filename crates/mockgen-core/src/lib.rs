pub mod config;
pub mod error;
pub mod ir;
pub mod parse;
pub mod transform;

/// A generated file with path and content.
#[derive(Debug, Clone)]
pub struct GeneratedFile {
    pub path: String,
    pub content: String,
}

/// Trait for renderers that turn a compiled route table into files.
pub trait CodeGenerator {
    type Config;
    type Error: std::error::Error;
    fn generate(
        &self,
        routes: &ir::CompiledRoutes,
        config: &Self::Config,
    ) -> Result<Vec<GeneratedFile>, Self::Error>;
}
