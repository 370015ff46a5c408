use crate::config::NormalizerConfig;
use crate::content_type::ContentType;
use formkeys_schema::{PropertyMap, SchemaShape};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use tracing::{debug, trace, warn};

/// Suffix marking a multi-valued form field in a schema property name.
pub const BRACKET_SUFFIX: &str = "[]";

/// Map each bracket-suffixed property's base name to the full property name.
///
/// `{"tags[]": .., "name": ..}` yields `{"tags" => "tags[]"}`.
pub fn bracket_mapping<N>(properties: &PropertyMap<N>) -> BTreeMap<&str, &str> {
    properties
        .keys()
        .filter_map(|name| {
            name.strip_suffix(BRACKET_SUFFIX)
                .map(|base| (base, name.as_str()))
        })
        .collect()
}

/// Normalize `body` with the default configuration.
pub fn normalize<S: SchemaShape>(
    body: Value,
    content_type: &ContentType,
    schema: Option<S>,
) -> Value {
    Normalizer::default().normalize(body, content_type, schema)
}

/// Rewrites bracket-less form keys back to the bracket-suffixed names the
/// request-body schema declares.
///
/// Only object keys are renamed, and only where the schema licenses it. Keys
/// and elements are never added, dropped, or reordered, and values are never
/// converted. Anything the normalizer cannot interpret passes through.
#[derive(Debug, Clone, Copy, Default)]
pub struct Normalizer {
    config: NormalizerConfig,
}

impl Normalizer {
    pub fn new(config: NormalizerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &NormalizerConfig {
        &self.config
    }

    /// Entry point used right before schema validation.
    ///
    /// Returns `body` untouched unless the content type is one of the two form
    /// encodings, the body is an object, and the schema declares properties.
    pub fn normalize<S: SchemaShape>(
        &self,
        body: Value,
        content_type: &ContentType,
        schema: Option<S>,
    ) -> Value {
        let Some(encoding) = content_type.form_encoding() else {
            trace!("{content_type} body is not form-encoded, skipping key normalization");
            return body;
        };
        if !body.is_object() {
            trace!("{encoding} body is not an object, skipping key normalization");
            return body;
        }
        let Some(properties) = schema.and_then(|node| node.declared_properties()) else {
            trace!("no object schema for {encoding} body, skipping key normalization");
            return body;
        };

        self.rewrite_object_at(body, Some(&properties), 0)
    }

    /// Rename the keys of one object level and descend into its values.
    ///
    /// Without `properties`, or for a non-object `body`, the input is returned
    /// as is.
    pub fn rewrite_object<S: SchemaShape>(
        &self,
        body: Value,
        properties: Option<&PropertyMap<S>>,
    ) -> Value {
        self.rewrite_object_at(body, properties, 0)
    }

    /// Rewrite a single value under the guidance of its schema node.
    pub fn rewrite_value<S: SchemaShape>(&self, value: Value, schema: Option<&S>) -> Value {
        self.rewrite_value_at(value, schema, 0)
    }

    fn rewrite_object_at<S: SchemaShape>(
        &self,
        body: Value,
        properties: Option<&PropertyMap<S>>,
        depth: usize,
    ) -> Value {
        let Some(properties) = properties else {
            return body;
        };
        let Value::Object(entries) = body else {
            return body;
        };
        if self.too_deep(depth) {
            return Value::Object(entries);
        }

        let renames = bracket_mapping(properties);
        let mut rewritten = Map::new();

        for (key, value) in entries {
            // A key the schema declares verbatim is never reinterpreted, even
            // when a bracketed sibling exists.
            let (key, child) = if let Some(child) = properties.get(&key) {
                (key, Some(child))
            } else if let Some(&bracketed) = renames.get(key.as_str()) {
                debug!("renaming form key '{key}' to '{bracketed}'");
                (bracketed.to_owned(), properties.get(bracketed))
            } else {
                (key, None)
            };

            let value = self.rewrite_value_at(value, child, depth + 1);
            rewritten.insert(key, value);
        }

        Value::Object(rewritten)
    }

    fn rewrite_value_at<S: SchemaShape>(
        &self,
        value: Value,
        schema: Option<&S>,
        depth: usize,
    ) -> Value {
        match value {
            Value::Object(_) => {
                let properties = schema.and_then(SchemaShape::declared_properties);
                self.rewrite_object_at(value, properties.as_ref(), depth)
            }
            Value::Array(elements) => {
                let Some(items) = schema.and_then(SchemaShape::item_schema) else {
                    return Value::Array(elements);
                };
                if self.too_deep(depth) {
                    return Value::Array(elements);
                }
                Value::Array(
                    elements
                        .into_iter()
                        .map(|element| self.rewrite_value_at(element, Some(&items), depth + 1))
                        .collect(),
                )
            }
            other => other,
        }
    }

    fn too_deep(&self, depth: usize) -> bool {
        if depth < self.config.max_depth {
            return false;
        }
        warn!(
            "form body nested deeper than {} levels, leaving the rest as is",
            self.config.max_depth
        );
        true
    }
}
