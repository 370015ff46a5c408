//! Bracket-notation key normalization for form-encoded request bodies.
//!
//! Form fields named `field[]` reach the application as `field` once the web
//! stack has decoded them, while the request-body schema still declares
//! `field[]`. This crate rewrites such keys back to their schema names
//! (`Normalizer`), gated on the request's content-type classification
//! (`ContentType`) and tuned by an optional TOML configuration
//! (`NormalizerConfig`). Normalization never fails: anything it cannot
//! interpret passes through unchanged and is left to schema validation.

pub mod config;
pub mod content_type;
pub mod normalize;

pub use config::{ConfigError, NormalizerConfig};
pub use content_type::{ContentType, FormEncoding};
pub use formkeys_schema::{PropertyMap, Schema, SchemaRef, SchemaShape};
pub use normalize::{bracket_mapping, normalize, Normalizer, BRACKET_SUFFIX};
