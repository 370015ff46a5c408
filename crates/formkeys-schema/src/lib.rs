//! Compiled JSON-Schema graph for formkeys.
//!
//! This crate turns a JSON-Schema document into an arena of nodes (`Schema`)
//! addressed by `NodeId`, resolving local `$ref` indirections once at compile
//! time. Consumers read the graph through the `SchemaShape` capability
//! interface, which only exposes declared object properties and the item
//! schema of arrays.

pub mod graph;
mod pointer;
pub mod shape;

pub use graph::{load_document, parse_document, NodeId, Schema, SchemaRef};
pub use shape::{PropertyMap, SchemaShape};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("failed to read schema file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse schema: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("schema location '{0}' does not exist")]
    MissingPointer(String),
    #[error("unresolved reference '{reference}' at '{location}'")]
    UnresolvedRef { reference: String, location: String },
    #[error("reference cycle through '{0}'")]
    RefCycle(String),
}
