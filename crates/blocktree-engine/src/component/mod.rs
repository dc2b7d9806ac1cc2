//! # Component Tree Model
//!
//! A generic, mutable node with a name, a configuration map and ordered
//! children. Nodes are built by the block converter and then projected into
//! a [`SerializedComponent`] for the rendering layer.
//!
//! ## Key Invariants
//!
//! - `children` never holds empty entries: every child mutator filters out
//!   absent children and empty nodes before touching the list
//! - `config` always exists (empty map by default)
//! - Trees are acyclic: each child is owned by exactly one parent

pub mod casing;
pub mod serialize;

use std::collections::BTreeSet;

use serde_json::{Map, Value};

pub use casing::{camel_case_key, camel_case_keys};
pub use serialize::{SerializedComponent, serialize_all};

/// Configuration map of a component. Keys are snake_case at construction time.
pub type Config = Map<String, Value>;

/// Config key holding the markup of a raw-markup node.
pub const MARKUP_CONTENT_KEY: &str = "content";

/// Marks nodes that the converter treats specially.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ComponentKind {
    /// Plain named node; the default for structural blocks.
    #[default]
    Generic,
    /// Raw markup. Adjacent markup nodes are merged during conversion.
    Markup,
    /// Embedded third-party content.
    Embed,
}

/// A node in the component tree.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Component {
    name: String,
    kind: ComponentKind,
    config: Config,
    children: Vec<Component>,
    whitelist: BTreeSet<String>,
    preserve_inner_keys: BTreeSet<String>,
}

impl Component {
    /// Creates a generic node. An empty name denotes an anonymous node.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_kind(name, ComponentKind::Generic)
    }

    pub fn with_kind(name: impl Into<String>, kind: ComponentKind) -> Self {
        Self {
            name: name.into(),
            kind,
            ..Self::default()
        }
    }

    /// Creates a raw-markup node holding `content`.
    pub fn markup(content: impl Into<String>) -> Self {
        let mut node = Self::with_kind("html", ComponentKind::Markup);
        node.set_config(MARKUP_CONTENT_KEY, Value::String(content.into()));
        node
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> &mut Self {
        self.name = name.into();
        self
    }

    pub fn kind(&self) -> ComponentKind {
        self.kind
    }

    pub fn is_markup(&self) -> bool {
        self.kind == ComponentKind::Markup
    }

    /// Returns the markup of a raw-markup node.
    pub fn markup_content(&self) -> Option<&str> {
        if !self.is_markup() {
            return None;
        }
        self.config.get(MARKUP_CONTENT_KEY).and_then(Value::as_str)
    }

    /// A raw-markup node whose only config is its content and which has no
    /// children. Only these merge into neighbouring markup.
    pub fn is_plain_markup(&self) -> bool {
        self.markup_content().is_some() && self.config.len() == 1 && self.children.is_empty()
    }

    /// Appends markup to this node's content in place.
    pub fn push_markup(&mut self, markup: &str) {
        match self.config.get_mut(MARKUP_CONTENT_KEY) {
            Some(Value::String(content)) => content.push_str(markup),
            _ => {
                self.config.insert(
                    MARKUP_CONTENT_KEY.to_string(),
                    Value::String(markup.to_string()),
                );
            }
        }
    }

    /// A node with no name, no config and no children carries nothing to render.
    pub fn is_empty(&self) -> bool {
        self.name.is_empty() && self.config.is_empty() && self.children.is_empty()
    }

    // Config

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn get_config(&self, key: &str) -> Option<&Value> {
        self.config.get(key)
    }

    /// Sets a single config entry, replacing any existing value for `key`.
    pub fn set_config(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.config.insert(key.into(), value.into());
        self
    }

    /// Replaces the whole config map.
    pub fn replace_config(&mut self, config: Config) -> &mut Self {
        self.config = config;
        self
    }

    /// Merges `incoming` into the config. Existing keys win: incoming values
    /// only fill keys that are not set yet.
    pub fn merge_config(&mut self, incoming: Config) -> &mut Self {
        for (key, value) in incoming {
            self.config.entry(key).or_insert(value);
        }
        self
    }

    // Serialization filters

    pub fn whitelist(&self) -> &BTreeSet<String> {
        &self.whitelist
    }

    /// Restricts which config keys survive serialization. Entries may be given
    /// in either snake_case or camelCase form.
    pub fn set_whitelist<I, S>(&mut self, keys: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.whitelist = keys.into_iter().map(Into::into).collect();
        self
    }

    pub fn preserve_inner_keys(&self) -> &BTreeSet<String> {
        &self.preserve_inner_keys
    }

    /// Config keys whose nested map keys are serialized verbatim.
    pub fn set_preserve_inner_keys<I, S>(&mut self, keys: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.preserve_inner_keys = keys.into_iter().map(Into::into).collect();
        self
    }

    // Children

    pub fn children(&self) -> &[Component] {
        &self.children
    }

    /// Replaces the children, or appends to them when `append` is set.
    pub fn set_children<I>(&mut self, children: I, append: bool) -> &mut Self
    where
        I: IntoIterator,
        I::Item: Into<Option<Component>>,
    {
        if !append {
            self.children.clear();
        }
        self.children.extend(non_empty(children));
        self
    }

    pub fn append_children<I>(&mut self, children: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: Into<Option<Component>>,
    {
        self.set_children(children, true)
    }

    pub fn prepend_children<I>(&mut self, children: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: Into<Option<Component>>,
    {
        let mut merged: Vec<Component> = non_empty(children).collect();
        merged.append(&mut self.children);
        self.children = merged;
        self
    }

    pub fn append_child(&mut self, child: impl Into<ChildInput>) -> &mut Self {
        self.append_children(child.into().into_children())
    }

    pub fn prepend_child(&mut self, child: impl Into<ChildInput>) -> &mut Self {
        self.prepend_children(child.into().into_children())
    }

    /// Replaces each child with `f(child)`, keeping order and count.
    pub fn map_children<F>(&mut self, f: F) -> &mut Self
    where
        F: FnMut(Component) -> Component,
    {
        self.children = std::mem::take(&mut self.children)
            .into_iter()
            .map(f)
            .collect();
        self
    }
}

/// Argument accepted by [`Component::append_child`] and
/// [`Component::prepend_child`].
///
/// A freshly converted block arrives as a node sequence; a one-element
/// sequence is unwrapped to its node, longer ones are attached in order.
#[derive(Debug, Clone, PartialEq)]
pub enum ChildInput {
    One(Option<Component>),
    Many(Vec<Component>),
}

impl ChildInput {
    pub fn into_children(self) -> Vec<Component> {
        match self {
            ChildInput::One(child) => child.into_iter().collect(),
            ChildInput::Many(children) => children,
        }
    }
}

impl From<Component> for ChildInput {
    fn from(child: Component) -> Self {
        ChildInput::One(Some(child))
    }
}

impl From<Option<Component>> for ChildInput {
    fn from(child: Option<Component>) -> Self {
        ChildInput::One(child)
    }
}

impl From<Vec<Component>> for ChildInput {
    fn from(children: Vec<Component>) -> Self {
        ChildInput::Many(children)
    }
}

fn non_empty<I>(children: I) -> impl Iterator<Item = Component>
where
    I: IntoIterator,
    I::Item: Into<Option<Component>>,
{
    children
        .into_iter()
        .filter_map(Into::<Option<Component>>::into)
        .filter(|child| !child.is_empty())
}
