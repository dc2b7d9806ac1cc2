use crate::component::Component;

/// The growing node list a conversion folds blocks into.
///
/// # Invariants
///
/// - Plain markup is never stored directly after a raw-markup node
/// - Every other node is stored as pushed, anonymous ones included
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Accumulator {
    nodes: Vec<Component>,
}

impl Accumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a node. Plain markup merges into a trailing markup node; markup
    /// nodes carrying extra config or children stay separate.
    pub fn push(&mut self, node: Component) {
        if node.is_plain_markup()
            && let Some(markup) = node.markup_content()
            && let Some(last) = self.nodes.last_mut()
            && last.is_markup()
        {
            last.push_markup(markup);
            return;
        }
        self.nodes.push(node);
    }

    /// Consolidation rule: extend a trailing markup node in place, or start a
    /// new one.
    pub fn push_markup(&mut self, markup: &str) {
        match self.nodes.last_mut() {
            Some(last) if last.is_markup() => {
                log::trace!("merging {} bytes into trailing markup node", markup.len());
                last.push_markup(markup);
            }
            _ => self.nodes.push(Component::markup(markup)),
        }
    }

    /// Splices `nodes` in order at the end.
    pub fn extend<I>(&mut self, nodes: I)
    where
        I: IntoIterator<Item = Component>,
    {
        for node in nodes {
            self.push(node);
        }
    }

    pub fn last(&self) -> Option<&Component> {
        self.nodes.last()
    }

    pub fn last_mut(&mut self) -> Option<&mut Component> {
        self.nodes.last_mut()
    }

    pub fn nodes(&self) -> &[Component] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn into_nodes(self) -> Vec<Component> {
        self.nodes
    }
}
