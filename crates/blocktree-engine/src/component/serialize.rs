//! Terminal projection of a component tree into a JSON-ready shape.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{Component, casing::camel_case_keys};

/// The serialized form of a [`Component`]: `{name, config, children}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SerializedComponent {
    pub name: String,
    pub config: Map<String, Value>,
    pub children: Vec<SerializedComponent>,
}

impl Component {
    /// Projects this node and its subtree without mutating it.
    ///
    /// Config keys are camelCased, values are copied untouched, and empty
    /// children are skipped.
    pub fn to_serializable(&self) -> SerializedComponent {
        SerializedComponent {
            name: self.name.clone(),
            config: camel_case_keys(&self.config, &self.whitelist, &self.preserve_inner_keys),
            children: self
                .children
                .iter()
                .filter(|child| !child.is_empty())
                .map(Component::to_serializable)
                .collect(),
        }
    }
}

/// Serializes a list of root nodes.
pub fn serialize_all(nodes: &[Component]) -> Vec<SerializedComponent> {
    nodes
        .iter()
        .filter(|node| !node.is_empty())
        .map(Component::to_serializable)
        .collect()
}
