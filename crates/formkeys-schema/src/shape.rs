use serde_json::Value;
use std::collections::BTreeMap;

/// Declared properties of an object schema, keyed by canonical property name.
pub type PropertyMap<N> = BTreeMap<String, N>;

/// Read-only view of a schema node.
///
/// A node may expose object properties, an item schema, both, or neither.
/// Absence of either fact means "no further structure" to the caller.
pub trait SchemaShape: Sized {
    /// Named sub-schemas declared by the node's `properties` keyword.
    fn declared_properties(&self) -> Option<PropertyMap<Self>>;

    /// The single schema applied to every element of an array.
    fn item_schema(&self) -> Option<Self>;
}

/// Raw schema documents without `$ref` indirection can be walked directly.
impl<'a> SchemaShape for &'a Value {
    fn declared_properties(&self) -> Option<PropertyMap<Self>> {
        let node: &'a Value = *self;
        let properties = node.get("properties")?.as_object()?;
        Some(
            properties
                .iter()
                .map(|(name, child)| (name.clone(), child))
                .collect(),
        )
    }

    fn item_schema(&self) -> Option<Self> {
        let node: &'a Value = *self;
        node.get("items")
            .filter(|items| items.is_object() || items.is_boolean())
    }
}
