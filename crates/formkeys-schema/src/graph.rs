use crate::pointer::{escape_token, ref_target, RefTarget};
use crate::shape::{PropertyMap, SchemaShape};
use crate::SchemaError;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// Index of a node inside a compiled [`Schema`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct SchemaNode {
    pointer: String,
    properties: Option<BTreeMap<String, NodeId>>,
    items: Option<NodeId>,
}

/// A compiled schema graph.
///
/// Every distinct schema location is compiled once. `$ref` locations share the
/// node of their target, so recursive schemas become cyclic graphs rather than
/// infinite trees.
#[derive(Debug, Clone)]
pub struct Schema {
    nodes: Vec<SchemaNode>,
    locations: HashMap<String, NodeId>,
    entry: NodeId,
}

impl Schema {
    /// Compile a schema document from its root.
    pub fn compile(document: &Value) -> Result<Self, SchemaError> {
        Self::compile_at(document, "")
    }

    /// Compile the schema found at `pointer` inside `document`.
    ///
    /// References are resolved against the whole document, so a request-body
    /// schema under `/definitions/...` can still point at its siblings.
    pub fn compile_at(document: &Value, pointer: &str) -> Result<Self, SchemaError> {
        if document.pointer(pointer).is_none() {
            return Err(SchemaError::MissingPointer(pointer.to_owned()));
        }

        let mut compiler = Compiler {
            document,
            nodes: Vec::new(),
            locations: HashMap::new(),
        };
        let entry = compiler.node_for(pointer, &mut Vec::new())?;
        debug!(
            "compiled schema at '{pointer}': {} nodes",
            compiler.nodes.len()
        );

        Ok(Self {
            nodes: compiler.nodes,
            locations: compiler.locations,
            entry,
        })
    }

    /// Parse and compile a JSON schema document from its root.
    pub fn parse(input: &str) -> Result<Self, SchemaError> {
        Self::compile(&parse_document(input)?)
    }

    /// Read and compile a JSON schema file from its root.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SchemaError> {
        Self::compile(&load_document(path)?)
    }

    /// Handle to the node compilation started from.
    pub fn root(&self) -> SchemaRef<'_> {
        self.handle(self.entry)
    }

    /// Handle to the node compiled for `pointer`, if that location was reached.
    pub fn node(&self, pointer: &str) -> Option<SchemaRef<'_>> {
        self.locations.get(pointer).map(|&id| self.handle(id))
    }

    pub fn get(&self, id: NodeId) -> Option<SchemaRef<'_>> {
        (id.0 < self.nodes.len()).then(|| self.handle(id))
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Every compiled node, once each, in compilation order.
    pub fn iter(&self) -> impl Iterator<Item = SchemaRef<'_>> {
        (0..self.nodes.len()).map(move |index| self.handle(NodeId(index)))
    }

    fn handle(&self, id: NodeId) -> SchemaRef<'_> {
        SchemaRef { schema: self, id }
    }
}

pub fn parse_document(input: &str) -> Result<Value, SchemaError> {
    Ok(serde_json::from_str(input)?)
}

pub fn load_document(path: impl AsRef<Path>) -> Result<Value, SchemaError> {
    let content = fs::read_to_string(path)?;
    parse_document(&content)
}

/// Cheap, copyable handle to one node of a compiled [`Schema`].
#[derive(Debug, Clone, Copy)]
pub struct SchemaRef<'a> {
    schema: &'a Schema,
    id: NodeId,
}

impl<'a> SchemaRef<'a> {
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Canonical JSON Pointer of the location this node was compiled from.
    pub fn pointer(&self) -> &'a str {
        &self.node().pointer
    }

    pub fn property(&self, name: &str) -> Option<SchemaRef<'a>> {
        let id = *self.node().properties.as_ref()?.get(name)?;
        Some(self.schema.handle(id))
    }

    pub fn property_names(&self) -> impl Iterator<Item = &'a str> {
        self.node()
            .properties
            .iter()
            .flat_map(|props| props.keys().map(String::as_str))
    }

    fn node(&self) -> &'a SchemaNode {
        let schema: &'a Schema = self.schema;
        &schema.nodes[self.id.0]
    }
}

impl PartialEq for SchemaRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.schema, other.schema) && self.id == other.id
    }
}

impl Eq for SchemaRef<'_> {}

impl SchemaShape for SchemaRef<'_> {
    fn declared_properties(&self) -> Option<PropertyMap<Self>> {
        let properties = self.node().properties.as_ref()?;
        Some(
            properties
                .iter()
                .map(|(name, &id)| (name.clone(), self.schema.handle(id)))
                .collect(),
        )
    }

    fn item_schema(&self) -> Option<Self> {
        self.node().items.map(|id| self.schema.handle(id))
    }
}

struct Compiler<'a> {
    document: &'a Value,
    nodes: Vec<SchemaNode>,
    locations: HashMap<String, NodeId>,
}

impl Compiler<'_> {
    /// Compile the location at `pointer`. `chain` holds the `$ref` locations
    /// followed to get here without passing through a real node.
    fn node_for(&mut self, pointer: &str, chain: &mut Vec<String>) -> Result<NodeId, SchemaError> {
        if let Some(&id) = self.locations.get(pointer) {
            return Ok(id);
        }

        let document = self.document;
        let value = document
            .pointer(pointer)
            .ok_or_else(|| SchemaError::MissingPointer(pointer.to_owned()))?;

        if let Some(reference) = value.get("$ref").and_then(Value::as_str) {
            match ref_target(reference) {
                RefTarget::Local(target) => {
                    if chain.iter().any(|seen| seen == pointer) {
                        return Err(SchemaError::RefCycle(reference.to_owned()));
                    }
                    if document.pointer(&target).is_none() {
                        return Err(SchemaError::UnresolvedRef {
                            reference: reference.to_owned(),
                            location: pointer.to_owned(),
                        });
                    }
                    chain.push(pointer.to_owned());
                    let id = self.node_for(&target, chain)?;
                    chain.pop();
                    self.locations.insert(pointer.to_owned(), id);
                    return Ok(id);
                }
                RefTarget::External => {
                    warn!("unsupported reference '{reference}' at '{pointer}', treating as unconstrained");
                    return Ok(self.alloc(pointer));
                }
            }
        }

        let id = self.alloc(pointer);

        if let Some(properties) = value.get("properties").and_then(Value::as_object) {
            let mut compiled = BTreeMap::new();
            for name in properties.keys() {
                let child = format!("{pointer}/properties/{}", escape_token(name));
                compiled.insert(name.clone(), self.node_for(&child, &mut Vec::new())?);
            }
            self.nodes[id.0].properties = Some(compiled);
        }

        if value
            .get("items")
            .is_some_and(|items| items.is_object() || items.is_boolean())
        {
            let items = self.node_for(&format!("{pointer}/items"), &mut Vec::new())?;
            self.nodes[id.0].items = Some(items);
        }

        Ok(id)
    }

    fn alloc(&mut self, pointer: &str) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(SchemaNode {
            pointer: pointer.to_owned(),
            ..SchemaNode::default()
        });
        self.locations.insert(pointer.to_owned(), id);
        id
    }
}
