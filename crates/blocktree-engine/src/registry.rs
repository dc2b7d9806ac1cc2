//! Block name to component factory mapping.

use std::{collections::HashMap, fmt};

use crate::component::Component;

type Factory = Box<dyn Fn() -> Component>;

/// Maps block names to factories producing specialized nodes.
///
/// Blocks without an entry become generic nodes named after the block.
#[derive(Default)]
pub struct ComponentRegistry {
    factories: HashMap<String, Factory>,
}

impl ComponentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `factory` for `block_name`, replacing any earlier entry.
    pub fn register<F>(&mut self, block_name: impl Into<String>, factory: F) -> &mut Self
    where
        F: Fn() -> Component + 'static,
    {
        self.factories.insert(block_name.into(), Box::new(factory));
        self
    }

    /// Registers a factory producing a generic node called `component_name`.
    pub fn register_name(
        &mut self,
        block_name: impl Into<String>,
        component_name: impl Into<String>,
    ) -> &mut Self {
        let component_name = component_name.into();
        self.register(block_name, move || Component::new(component_name.clone()))
    }

    /// Registers every `(block_name, component_name)` pair.
    pub fn extend_names<I, K, V>(&mut self, names: I) -> &mut Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (block_name, component_name) in names {
            self.register_name(block_name, component_name);
        }
        self
    }

    pub fn contains(&self, block_name: &str) -> bool {
        self.factories.contains_key(block_name)
    }

    /// Builds a fresh node for `block_name`, if one is registered.
    pub fn create(&self, block_name: &str) -> Option<Component> {
        self.factories.get(block_name).map(|factory| factory())
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

impl fmt::Debug for ComponentRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("ComponentRegistry")
            .field("blocks", &names)
            .finish()
    }
}
