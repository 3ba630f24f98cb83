use indexmap::IndexMap;
use log::warn;

use crate::parse::openapi::{self, SchemaType, TypeSet};
use crate::parse::reference::reference_name;
use crate::parse::swagger;

/// Primitive kind a schema node dispatches on when building bodies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SchemaKind {
    String,
    Integer,
    Number,
    Boolean,
    Array,
    Object,
    Null,
    #[default]
    Unknown,
}

/// Leaf constraints consumed by the example synthesizer.
#[derive(Debug, Clone, Copy, Default)]
pub struct LeafConstraints<'a> {
    pub kind: SchemaKind,
    pub format: Option<&'a str>,
    pub enum_values: &'a [serde_json::Value],
    pub minimum: Option<f64>,
    pub maximum: Option<f64>,
}

/// What the body builder needs to know about one schema dialect.
///
/// Both v2 and v3 schemas are walked by the same builder; each dialect only
/// answers these questions about its own node type.
pub trait SchemaDialect {
    type Node;

    /// The `$ref` of a reference node.
    fn reference<'n>(&self, node: &'n Self::Node) -> Option<&'n str>;

    /// Look up a definition by registry key.
    fn definition(&self, name: &str) -> Option<&Self::Node>;

    fn kind(&self, node: &Self::Node) -> SchemaKind;

    fn leaf<'n>(&self, node: &'n Self::Node) -> LeafConstraints<'n>;

    /// Declared properties, in declaration order.
    fn properties<'n>(&self, node: &'n Self::Node) -> Vec<(&'n str, &'n Self::Node)>;

    fn item_schema<'n>(&self, node: &'n Self::Node) -> Option<&'n Self::Node>;

    /// `allOf` branches.
    fn composition<'n>(&self, node: &'n Self::Node) -> &'n [Self::Node];
}

/// Follow `$ref` indirection to the underlying node.
///
/// Resolution never fails: a reference whose target is missing, or a chain
/// of references that loops back on itself, resolves to the node it started
/// from. `allOf` is left for the caller to walk.
pub fn resolve<'a, D: SchemaDialect>(dialect: &'a D, node: &'a D::Node) -> &'a D::Node {
    let mut current = node;
    let mut followed: Vec<&'a str> = Vec::new();
    while let Some(ref_path) = dialect.reference(current) {
        if followed.contains(&ref_path) {
            warn!("reference loop through {ref_path}");
            return node;
        }
        followed.push(ref_path);
        match dialect.definition(reference_name(ref_path)) {
            Some(target) => current = target,
            None => {
                warn!("unresolved schema reference {ref_path}");
                return node;
            }
        }
    }
    current
}

/// OpenAPI 3.x schemas, registry `#/components/schemas`.
#[derive(Debug, Clone, Copy)]
pub struct OpenApiDialect<'doc> {
    schemas: Option<&'doc IndexMap<String, openapi::SchemaOrRef>>,
}

impl<'doc> OpenApiDialect<'doc> {
    pub fn new(schemas: Option<&'doc IndexMap<String, openapi::SchemaOrRef>>) -> Self {
        Self { schemas }
    }
}

impl SchemaDialect for OpenApiDialect<'_> {
    type Node = openapi::SchemaOrRef;

    fn reference<'n>(&self, node: &'n Self::Node) -> Option<&'n str> {
        match node {
            openapi::SchemaOrRef::Ref { ref_path } => Some(ref_path),
            openapi::SchemaOrRef::Schema(_) => None,
        }
    }

    fn definition(&self, name: &str) -> Option<&Self::Node> {
        self.schemas.and_then(|schemas| schemas.get(name))
    }

    fn kind(&self, node: &Self::Node) -> SchemaKind {
        let openapi::SchemaOrRef::Schema(schema) = node else {
            return SchemaKind::Unknown;
        };
        match schema.schema_type.as_ref().and_then(TypeSet::primary) {
            Some(SchemaType::String) => SchemaKind::String,
            Some(SchemaType::Integer) => SchemaKind::Integer,
            Some(SchemaType::Number) => SchemaKind::Number,
            Some(SchemaType::Boolean) => SchemaKind::Boolean,
            Some(SchemaType::Array) => SchemaKind::Array,
            Some(SchemaType::Object) => SchemaKind::Object,
            Some(SchemaType::Null) => SchemaKind::Null,
            None => untyped_kind(
                !schema.properties.is_empty() || !schema.all_of.is_empty(),
                schema.items.is_some(),
            ),
        }
    }

    fn leaf<'n>(&self, node: &'n Self::Node) -> LeafConstraints<'n> {
        let kind = self.kind(node);
        match node {
            openapi::SchemaOrRef::Schema(schema) => LeafConstraints {
                kind,
                format: schema.format.as_deref(),
                enum_values: &schema.enum_values,
                minimum: schema.minimum,
                maximum: schema.maximum,
            },
            openapi::SchemaOrRef::Ref { .. } => LeafConstraints::default(),
        }
    }

    fn properties<'n>(&self, node: &'n Self::Node) -> Vec<(&'n str, &'n Self::Node)> {
        match node {
            openapi::SchemaOrRef::Schema(schema) => schema
                .properties
                .iter()
                .map(|(name, prop)| (name.as_str(), prop))
                .collect(),
            openapi::SchemaOrRef::Ref { .. } => Vec::new(),
        }
    }

    fn item_schema<'n>(&self, node: &'n Self::Node) -> Option<&'n Self::Node> {
        match node {
            openapi::SchemaOrRef::Schema(schema) => schema.items.as_deref(),
            openapi::SchemaOrRef::Ref { .. } => None,
        }
    }

    fn composition<'n>(&self, node: &'n Self::Node) -> &'n [Self::Node] {
        match node {
            openapi::SchemaOrRef::Schema(schema) => &schema.all_of,
            openapi::SchemaOrRef::Ref { .. } => &[],
        }
    }
}

/// Swagger 2.0 schemas, registry `#/definitions`.
#[derive(Debug, Clone, Copy)]
pub struct SwaggerDialect<'doc> {
    definitions: &'doc IndexMap<String, swagger::SchemaOrRef>,
}

impl<'doc> SwaggerDialect<'doc> {
    pub fn new(definitions: &'doc IndexMap<String, swagger::SchemaOrRef>) -> Self {
        Self { definitions }
    }
}

impl SchemaDialect for SwaggerDialect<'_> {
    type Node = swagger::SchemaOrRef;

    fn reference<'n>(&self, node: &'n Self::Node) -> Option<&'n str> {
        match node {
            swagger::SchemaOrRef::Ref { ref_path } => Some(ref_path),
            swagger::SchemaOrRef::Schema(_) => None,
        }
    }

    fn definition(&self, name: &str) -> Option<&Self::Node> {
        self.definitions.get(name)
    }

    fn kind(&self, node: &Self::Node) -> SchemaKind {
        let swagger::SchemaOrRef::Schema(schema) = node else {
            return SchemaKind::Unknown;
        };
        match schema.schema_type {
            Some(swagger::SchemaType::String) => SchemaKind::String,
            Some(swagger::SchemaType::Integer) => SchemaKind::Integer,
            Some(swagger::SchemaType::Number) => SchemaKind::Number,
            Some(swagger::SchemaType::Boolean) => SchemaKind::Boolean,
            Some(swagger::SchemaType::Array) => SchemaKind::Array,
            Some(swagger::SchemaType::Object) => SchemaKind::Object,
            Some(swagger::SchemaType::File) => SchemaKind::Unknown,
            None => untyped_kind(
                !schema.properties.is_empty() || !schema.all_of.is_empty(),
                schema.items.is_some(),
            ),
        }
    }

    fn leaf<'n>(&self, node: &'n Self::Node) -> LeafConstraints<'n> {
        let kind = self.kind(node);
        match node {
            swagger::SchemaOrRef::Schema(schema) => LeafConstraints {
                kind,
                format: schema.format.as_deref(),
                enum_values: &schema.enum_values,
                minimum: schema.minimum,
                maximum: schema.maximum,
            },
            swagger::SchemaOrRef::Ref { .. } => LeafConstraints::default(),
        }
    }

    fn properties<'n>(&self, node: &'n Self::Node) -> Vec<(&'n str, &'n Self::Node)> {
        match node {
            swagger::SchemaOrRef::Schema(schema) => schema
                .properties
                .iter()
                .map(|(name, prop)| (name.as_str(), prop))
                .collect(),
            swagger::SchemaOrRef::Ref { .. } => Vec::new(),
        }
    }

    fn item_schema<'n>(&self, node: &'n Self::Node) -> Option<&'n Self::Node> {
        match node {
            swagger::SchemaOrRef::Schema(schema) => schema.items.as_deref(),
            swagger::SchemaOrRef::Ref { .. } => None,
        }
    }

    fn composition<'n>(&self, node: &'n Self::Node) -> &'n [Self::Node] {
        match node {
            swagger::SchemaOrRef::Schema(schema) => &schema.all_of,
            swagger::SchemaOrRef::Ref { .. } => &[],
        }
    }
}

/// Kind of a schema without a `type` keyword, inferred from its shape.
fn untyped_kind(has_members: bool, has_items: bool) -> SchemaKind {
    if has_members {
        SchemaKind::Object
    } else if has_items {
        SchemaKind::Array
    } else {
        SchemaKind::Unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry(yaml: &str) -> IndexMap<String, openapi::SchemaOrRef> {
        serde_yaml_ng::from_str(yaml).unwrap()
    }

    fn reference(target: &str) -> openapi::SchemaOrRef {
        openapi::SchemaOrRef::Ref {
            ref_path: format!("#/components/schemas/{target}"),
        }
    }

    #[test]
    fn test_resolves_by_final_segment() {
        let schemas = registry("Pet:\n  type: object\n  properties:\n    name:\n      type: string\n");
        let dialect = OpenApiDialect::new(Some(&schemas));
        let node = reference("Pet");
        let resolved = resolve(&dialect, &node);
        assert_eq!(dialect.kind(resolved), SchemaKind::Object);
        assert_eq!(dialect.properties(resolved)[0].0, "name");
    }

    #[test]
    fn test_missing_reference_degrades_to_original_node() {
        let schemas = registry("Pet:\n  type: string\n");
        let dialect = OpenApiDialect::new(Some(&schemas));
        let node = reference("Missing");
        let resolved = resolve(&dialect, &node);
        assert!(std::ptr::eq(resolved, &node));
        assert!(dialect.properties(resolved).is_empty());
        assert_eq!(dialect.kind(resolved), SchemaKind::Unknown);
    }

    #[test]
    fn test_missing_registry_degrades() {
        let dialect = OpenApiDialect::new(None);
        let node = reference("Pet");
        assert!(std::ptr::eq(resolve(&dialect, &node), &node));
    }

    #[test]
    fn test_follows_reference_chains() {
        let schemas = registry(
            "Alias:\n  $ref: '#/components/schemas/Pet'\nPet:\n  type: object\n  properties:\n    id:\n      type: integer\n",
        );
        let dialect = OpenApiDialect::new(Some(&schemas));
        let node = reference("Alias");
        let resolved = resolve(&dialect, &node);
        assert_eq!(dialect.properties(resolved)[0].0, "id");
    }

    #[test]
    fn test_reference_loop_terminates() {
        let schemas = registry(
            "A:\n  $ref: '#/components/schemas/B'\nB:\n  $ref: '#/components/schemas/A'\n",
        );
        let dialect = OpenApiDialect::new(Some(&schemas));
        let node = reference("A");
        assert!(std::ptr::eq(resolve(&dialect, &node), &node));
    }

    #[test]
    fn test_swagger_definitions() {
        let definitions: IndexMap<String, swagger::SchemaOrRef> = serde_yaml_ng::from_str(
            "Product:\n  properties:\n    sku:\n      type: string\n      format: uuid\n",
        )
        .unwrap();
        let dialect = SwaggerDialect::new(&definitions);
        let node = swagger::SchemaOrRef::Ref {
            ref_path: "#/definitions/Product".to_string(),
        };
        let resolved = resolve(&dialect, &node);
        // No `type`, but it has properties.
        assert_eq!(dialect.kind(resolved), SchemaKind::Object);
        let (name, sku) = dialect.properties(resolved)[0];
        assert_eq!(name, "sku");
        let leaf = dialect.leaf(sku);
        assert_eq!(leaf.kind, SchemaKind::String);
        assert_eq!(leaf.format, Some("uuid"));
    }
}
