//! # External Collaborators
//!
//! The converter delegates everything outside block-to-component folding to
//! injected strategies: parsing content into blocks, rendering a block to
//! markup, text filtering, reference lookup and per-block hooks.
//!
//! Each trait is implemented for closures of the matching shape, so callers
//! can pass a function instead of a type. Failures are reported as
//! `anyhow::Error` and surface to the caller unchanged, wrapped in
//! [`ConvertError::Collaborator`](crate::ConvertError::Collaborator).

use std::collections::HashMap;

use crate::{RawBlock, convert::Accumulator};

/// Turns a content string into an ordered block list.
pub trait BlockSource {
    fn parse(&self, content: &str) -> anyhow::Result<Vec<RawBlock>>;
}

/// Text transform applied to freeform markup.
pub trait ContentFilter {
    fn filter(&self, html: &str) -> anyhow::Result<String>;
}

/// Produces markup for a block from its name, attributes and children.
pub trait BlockRenderer {
    fn render(&self, block: &RawBlock) -> anyhow::Result<String>;
}

/// Second-pass text transform on rendered block markup.
pub trait ShortcodeExpander {
    fn expand(&self, html: &str) -> anyhow::Result<String>;
}

/// Looks up externally stored content by identifier.
pub trait ReferenceResolver {
    fn resolve(&self, id: &str) -> anyhow::Result<Option<String>>;
}

/// Called once per block, before classification, with the nodes converted
/// so far at the current nesting level.
pub trait ConversionHook {
    fn before_block(&self, block: &RawBlock, nodes: &mut Accumulator) -> anyhow::Result<()>;
}

impl<F> BlockSource for F
where
    F: Fn(&str) -> anyhow::Result<Vec<RawBlock>>,
{
    fn parse(&self, content: &str) -> anyhow::Result<Vec<RawBlock>> {
        self(content)
    }
}

impl<F> ContentFilter for F
where
    F: Fn(&str) -> anyhow::Result<String>,
{
    fn filter(&self, html: &str) -> anyhow::Result<String> {
        self(html)
    }
}

impl<F> BlockRenderer for F
where
    F: Fn(&RawBlock) -> anyhow::Result<String>,
{
    fn render(&self, block: &RawBlock) -> anyhow::Result<String> {
        self(block)
    }
}

impl<F> ShortcodeExpander for F
where
    F: Fn(&str) -> anyhow::Result<String>,
{
    fn expand(&self, html: &str) -> anyhow::Result<String> {
        self(html)
    }
}

impl<F> ReferenceResolver for F
where
    F: Fn(&str) -> anyhow::Result<Option<String>>,
{
    fn resolve(&self, id: &str) -> anyhow::Result<Option<String>> {
        self(id)
    }
}

impl<F> ConversionHook for F
where
    F: Fn(&RawBlock, &mut Accumulator) -> anyhow::Result<()>,
{
    fn before_block(&self, block: &RawBlock, nodes: &mut Accumulator) -> anyhow::Result<()> {
        self(block, nodes)
    }
}

/// Leaves text unchanged. Default content filter and shortcode expander.
#[derive(Debug, Clone, Copy, Default)]
pub struct Identity;

impl ContentFilter for Identity {
    fn filter(&self, html: &str) -> anyhow::Result<String> {
        Ok(html.to_string())
    }
}

impl ShortcodeExpander for Identity {
    fn expand(&self, html: &str) -> anyhow::Result<String> {
        Ok(html.to_string())
    }
}

/// Re-serializes a block from its `innerContent`, rendering each inner block
/// into the `null` slot reserved for it.
///
/// Blocks without `innerContent` render as their `innerHTML`.
#[derive(Debug, Clone, Copy, Default)]
pub struct InnerContentRenderer;

impl BlockRenderer for InnerContentRenderer {
    fn render(&self, block: &RawBlock) -> anyhow::Result<String> {
        if block.inner_content.is_empty() {
            return Ok(block.inner_html.clone());
        }

        let mut inner = block.inner_blocks.iter();
        let mut out = String::new();
        for chunk in &block.inner_content {
            match chunk {
                Some(markup) => out.push_str(markup),
                None => {
                    if let Some(child) = inner.next() {
                        out.push_str(&self.render(child)?);
                    }
                }
            }
        }
        Ok(out)
    }
}

/// Reads content as a JSON array of block records.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonBlockSource;

impl BlockSource for JsonBlockSource {
    fn parse(&self, content: &str) -> anyhow::Result<Vec<RawBlock>> {
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(RawBlock::list_from_str(content)?)
    }
}

/// In-memory identifier to content map.
#[derive(Debug, Clone, Default)]
pub struct MemoryReferences {
    entries: HashMap<String, String>,
}

impl MemoryReferences {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: impl Into<String>, content: impl Into<String>) -> &mut Self {
        self.entries.insert(id.into(), content.into());
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for MemoryReferences
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(id, content)| (id.into(), content.into()))
                .collect(),
        }
    }
}

impl ReferenceResolver for MemoryReferences {
    fn resolve(&self, id: &str) -> anyhow::Result<Option<String>> {
        Ok(self.entries.get(id).cloned())
    }
}
