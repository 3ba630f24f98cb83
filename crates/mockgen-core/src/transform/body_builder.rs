use indexmap::IndexMap;
use log::{trace, warn};
use rand::Rng;

use crate::ir::ExampleValue;

use super::example_synthesizer::Synthesizer;
use super::schema_resolver::{SchemaDialect, SchemaKind, resolve};

/// Walks a schema graph into an example body.
///
/// Depth counts the referenced properties and array items between a body's
/// root and the node being expanded. Inline object properties and `allOf`
/// branches stay at the depth of their parent. Anything deeper than
/// `max_depth` is cut off.
pub struct BodyBuilder<'a, 'r, D, R> {
    dialect: &'a D,
    synthesizer: &'r mut Synthesizer<R>,
    max_depth: usize,
}

impl<'a, 'r, D: SchemaDialect, R: Rng> BodyBuilder<'a, 'r, D, R> {
    pub fn new(dialect: &'a D, synthesizer: &'r mut Synthesizer<R>, max_depth: usize) -> Self {
        Self {
            dialect,
            synthesizer,
            max_depth,
        }
    }

    /// Example for a whole request or response body. A top-level array
    /// yields a list of at most one item; other schemas are built as
    /// objects and yield `None` when nothing could be expanded.
    pub fn build_body(&mut self, node: &'a D::Node) -> Option<ExampleValue> {
        let resolved = resolve(self.dialect, node);
        match self.dialect.kind(resolved) {
            SchemaKind::Array => Some(self.build_array(resolved, 0)),
            _ => self.build(node, 0),
        }
    }

    /// Expand an object schema at `depth`. `None` when the depth bound is
    /// exceeded or the schema has no reachable properties.
    pub fn build(&mut self, node: &'a D::Node, depth: usize) -> Option<ExampleValue> {
        self.build_object(node, depth, &mut Vec::new())
    }

    fn build_object(
        &mut self,
        node: &'a D::Node,
        depth: usize,
        composing: &mut Vec<&'a str>,
    ) -> Option<ExampleValue> {
        let mut fields = IndexMap::new();
        self.merge_into(node, &mut fields, depth, composing);
        if fields.is_empty() {
            return None;
        }
        Some(ExampleValue::Object(fields))
    }

    /// Fold `node`, its `allOf` branches first, into `fields`. Later writes
    /// replace earlier values but keep the first position.
    ///
    /// `composing` holds the references being expanded at this depth; a
    /// reference reached again before it is finished is a cycle.
    fn merge_into(
        &mut self,
        node: &'a D::Node,
        fields: &mut IndexMap<String, ExampleValue>,
        depth: usize,
        composing: &mut Vec<&'a str>,
    ) {
        if depth > self.max_depth {
            trace!("depth {depth} exceeds limit {}", self.max_depth);
            return;
        }
        let reference = self.dialect.reference(node);
        if let Some(ref_path) = reference {
            if composing.contains(&ref_path) {
                warn!("composition cycle through {ref_path}");
                return;
            }
            composing.push(ref_path);
        }

        let resolved = resolve(self.dialect, node);
        for branch in self.dialect.composition(resolved) {
            self.merge_into(branch, fields, depth, composing);
        }
        for (name, property) in self.dialect.properties(resolved) {
            let value = self.property_value(property, depth, composing);
            fields.insert(name.to_string(), value);
        }

        if reference.is_some() {
            composing.pop();
        }
    }

    fn property_value(
        &mut self,
        property: &'a D::Node,
        depth: usize,
        composing: &mut Vec<&'a str>,
    ) -> ExampleValue {
        let resolved = resolve(self.dialect, property);
        match self.dialect.kind(resolved) {
            SchemaKind::String | SchemaKind::Integer | SchemaKind::Boolean => {
                self.synthesizer.synthesize(&self.dialect.leaf(resolved))
            }
            SchemaKind::Array => self.build_array(resolved, depth),
            SchemaKind::Object => {
                let nested = if self.dialect.reference(property).is_some() {
                    self.build(property, depth + 1)
                } else {
                    self.build_object(property, depth, composing)
                };
                nested.unwrap_or_else(ExampleValue::empty_object)
            }
            SchemaKind::Number | SchemaKind::Null | SchemaKind::Unknown => ExampleValue::Null,
        }
    }

    /// Zero or one example item, built one level below `depth`.
    fn build_array(&mut self, node: &'a D::Node, depth: usize) -> ExampleValue {
        let item = self
            .dialect
            .item_schema(node)
            .and_then(|item| self.build_item(item, depth + 1));
        ExampleValue::Array(item.into_iter().collect())
    }

    fn build_item(&mut self, item: &'a D::Node, depth: usize) -> Option<ExampleValue> {
        if depth > self.max_depth {
            trace!("array item at depth {depth} exceeds limit {}", self.max_depth);
            return None;
        }
        let resolved = resolve(self.dialect, item);
        match self.dialect.kind(resolved) {
            SchemaKind::String | SchemaKind::Integer | SchemaKind::Boolean => {
                Some(self.synthesizer.synthesize(&self.dialect.leaf(resolved)))
            }
            SchemaKind::Array => Some(self.build_array(resolved, depth)),
            SchemaKind::Object | SchemaKind::Unknown => self.build(item, depth),
            SchemaKind::Number | SchemaKind::Null => None,
        }
    }
}
