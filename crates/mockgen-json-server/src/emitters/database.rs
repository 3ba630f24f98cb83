use indexmap::IndexMap;
use mockgen_core::error::GeneratorError;
use mockgen_core::ir::CompiledRoutes;

/// Emit the seed database: one empty collection per storage key.
pub fn emit_database(routes: &CompiledRoutes) -> Result<String, GeneratorError> {
    let collections: IndexMap<&str, Vec<serde_json::Value>> = routes
        .collections
        .iter()
        .map(|key| (key.as_str(), Vec::new()))
        .collect();
    let mut content = serde_json::to_string_pretty(&collections)?;
    content.push('\n');
    Ok(content)
}
