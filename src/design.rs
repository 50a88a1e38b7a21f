//! Typed design-tree input and component discovery.
//!
//! The design tool exports a hierarchical JSON document; nodes whose `type`
//! is `INSTANCE` reference reusable, named library components. The only
//! structural operation the engine performs on the tree is collecting those
//! names (deduplicated) so the documentation sources can be queried for
//! them.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;

/// Node type marking a reusable-component reference.
pub const INSTANCE_TYPE: &str = "INSTANCE";

/// One node of the design tree.
///
/// Unknown fields in the export are ignored; everything here defaults so
/// that partial documents still deserialize.
///
/// # Examples
///
/// ```rust
/// use uiforge::design::DesignNode;
/// use serde_json::json;
///
/// let tree: DesignNode = serde_json::from_value(json!({
///     "type": "FRAME",
///     "name": "Hero",
///     "children": [
///         {"type": "INSTANCE", "name": "Button"},
///         {"type": "INSTANCE", "name": "Button"},
///         {"type": "INSTANCE", "name": "Card"}
///     ]
/// })).unwrap();
///
/// let names = tree.component_names();
/// assert_eq!(names.len(), 2);
/// assert!(names.contains("Button"));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DesignNode {
    /// Node type from the design tool (`FRAME`, `TEXT`, `INSTANCE`, ...).
    #[serde(rename = "type", default)]
    pub node_type: String,
    /// Node name; for instance nodes this is the library component name.
    #[serde(default)]
    pub name: String,
    /// Child nodes.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<DesignNode>,
    /// Component properties of an instance node, passed through verbatim
    /// to the generation prompt.
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub component_properties: Value,
}

impl DesignNode {
    /// A tree with no type, no name, and no children carries nothing to
    /// generate from and fails validation.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.node_type.is_empty() && self.name.is_empty() && self.children.is_empty()
    }

    /// Walk the tree and collect the names of all instance nodes.
    ///
    /// Duplicate instances of the same component collapse to one entry;
    /// discovery order is irrelevant, so the result is an ordered set.
    #[must_use]
    pub fn component_names(&self) -> BTreeSet<String> {
        let mut names = BTreeSet::new();
        self.collect_component_names(&mut names);
        names
    }

    fn collect_component_names(&self, names: &mut BTreeSet<String>) {
        if self.node_type == INSTANCE_TYPE && !self.name.is_empty() {
            names.insert(self.name.clone());
        }
        for child in &self.children {
            child.collect_component_names(names);
        }
    }
}
