//! # Block Conversion
//!
//! Folds a block list into component nodes.
//!
//! ## Algorithm
//!
//! 1. **Pre-filter**: nameless blocks with no inner blocks and whitespace-only
//!    markup are dropped
//! 2. **Fold**: remaining blocks are classified left to right, first match
//!    wins:
//!    - freeform markup goes through the content filter and is consolidated
//!    - embed blocks become a dedicated embed node
//!    - named blocks with markup (outside the render exceptions) are rendered,
//!      shortcode-expanded, whitespace-normalized and consolidated
//!    - reference blocks are resolved, converted and spliced in place
//!    - everything else becomes a node (registry factory or generic) whose
//!      children are the converted inner blocks
//!
//! Consolidation keeps the output free of adjacent raw-markup nodes.

mod accumulator;

use std::{collections::BTreeSet, fmt};

use serde::{Deserialize, Serialize};

pub use accumulator::Accumulator;

use crate::{
    RawBlock,
    collaborators::{
        BlockRenderer, BlockSource, ContentFilter, ConversionHook, Identity, InnerContentRenderer,
        JsonBlockSource, MemoryReferences, ReferenceResolver, ShortcodeExpander,
    },
    component::Component,
    embed::embed_component,
    error::{Collaborator, ConvertError},
    registry::ComponentRegistry,
};

/// Tunables of the conversion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConverterOptions {
    /// Named blocks that are never rendered directly: their markup is
    /// re-derived from their children instead.
    pub render_exceptions: BTreeSet<String>,
    /// Block name prefixes identifying embed blocks.
    pub embed_prefixes: Vec<String>,
    /// Fail with [`ConvertError::ReferenceCycle`] when a reference is
    /// re-entered during its own expansion.
    pub guard_reference_cycles: bool,
}

impl Default for ConverterOptions {
    fn default() -> Self {
        Self {
            render_exceptions: ["core/columns", "core/column", "core/group"]
                .into_iter()
                .map(String::from)
                .collect(),
            embed_prefixes: vec!["core-embed/".to_string(), "core/embed".to_string()],
            guard_reference_cycles: false,
        }
    }
}

/// How a single block is turned into nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockClass<'a> {
    /// Nameless block with markup.
    Markup,
    /// Block whose name starts with `prefix`.
    Embed { prefix: &'a str },
    /// Named block rendered straight to markup.
    Static,
    /// Indirection to externally stored content.
    Reference { id: String },
    /// Node with converted inner blocks as children.
    Structural,
}

/// Drops parser noise: nameless blocks without inner blocks whose markup is
/// blank.
pub fn prefilter<'a, I>(blocks: I) -> Vec<&'a RawBlock>
where
    I: IntoIterator<Item = &'a RawBlock>,
{
    blocks.into_iter().filter(|block| !block.is_blank()).collect()
}

/// Block sources may report malformed records as [`ConvertError`]; those
/// surface as-is, anything else is a block source failure.
fn source_failed(err: anyhow::Error) -> ConvertError {
    match err.downcast::<ConvertError>() {
        Ok(err) => err,
        Err(err) => Collaborator::BlockSource.failed()(err),
    }
}

/// Replaces each newline, tab and carriage return with a single space.
pub fn normalize_whitespace(markup: &str) -> String {
    markup.replace(['\n', '\t', '\r'], " ")
}

/// Block-to-component converter with its injected collaborators.
pub struct Converter {
    options: ConverterOptions,
    source: Box<dyn BlockSource>,
    content_filter: Box<dyn ContentFilter>,
    renderer: Box<dyn BlockRenderer>,
    shortcodes: Box<dyn ShortcodeExpander>,
    references: Box<dyn ReferenceResolver>,
    registry: ComponentRegistry,
    hooks: Vec<Box<dyn ConversionHook>>,
}

impl Converter {
    pub fn new(options: ConverterOptions) -> Self {
        Self {
            options,
            source: Box::new(JsonBlockSource),
            content_filter: Box::new(Identity),
            renderer: Box::new(InnerContentRenderer),
            shortcodes: Box::new(Identity),
            references: Box::new(MemoryReferences::new()),
            registry: ComponentRegistry::new(),
            hooks: Vec::new(),
        }
    }

    pub fn builder() -> ConverterBuilder {
        ConverterBuilder {
            converter: Self::default(),
        }
    }

    pub fn options(&self) -> &ConverterOptions {
        &self.options
    }

    pub fn registry(&self) -> &ComponentRegistry {
        &self.registry
    }

    /// Parses `content` with the block source and converts the result.
    pub fn convert_content(&self, content: &str) -> Result<Vec<Component>, ConvertError> {
        let blocks = self.source.parse(content).map_err(source_failed)?;
        self.convert_blocks(&blocks)
    }

    /// Converts an ordered block list into root nodes.
    pub fn convert_blocks(&self, blocks: &[RawBlock]) -> Result<Vec<Component>, ConvertError> {
        let mut expanding = Vec::new();
        self.fold(blocks, &mut expanding)
    }

    /// Decides which conversion rule applies to `block`.
    pub fn classify(&self, block: &RawBlock) -> BlockClass<'_> {
        let name = block.name();
        let has_markup = !block.inner_html.trim().is_empty();

        if name.is_empty() && has_markup {
            return BlockClass::Markup;
        }
        if !name.is_empty()
            && let Some(prefix) = self
                .options
                .embed_prefixes
                .iter()
                .find(|prefix| name.starts_with(prefix.as_str()))
        {
            return BlockClass::Embed {
                prefix: prefix.as_str(),
            };
        }
        if !name.is_empty() && has_markup && !self.options.render_exceptions.contains(name) {
            return BlockClass::Static;
        }
        if let Some(id) = block.reference() {
            return BlockClass::Reference { id };
        }
        BlockClass::Structural
    }

    /// `expanding` holds the reference ids currently being expanded, outermost
    /// first.
    fn fold(
        &self,
        blocks: &[RawBlock],
        expanding: &mut Vec<String>,
    ) -> Result<Vec<Component>, ConvertError> {
        let mut acc = Accumulator::new();
        for block in prefilter(blocks) {
            for hook in &self.hooks {
                hook.before_block(block, &mut acc)
                    .map_err(Collaborator::Hook.failed())?;
            }
            self.convert_block(block, &mut acc, expanding)?;
        }
        Ok(acc.into_nodes())
    }

    fn convert_block(
        &self,
        block: &RawBlock,
        acc: &mut Accumulator,
        expanding: &mut Vec<String>,
    ) -> Result<(), ConvertError> {
        let class = self.classify(block);
        log::debug!("block {:?} classified as {class:?}", block.name());

        match class {
            BlockClass::Markup => {
                let filtered = self
                    .content_filter
                    .filter(&block.inner_html)
                    .map_err(Collaborator::ContentFilter.failed())?;
                acc.push_markup(&filtered);
            }
            BlockClass::Embed { prefix } => {
                acc.push(embed_component(block, prefix));
            }
            BlockClass::Static => {
                let rendered = self
                    .renderer
                    .render(block)
                    .map_err(Collaborator::BlockRenderer.failed())?;
                let expanded = self
                    .shortcodes
                    .expand(&rendered)
                    .map_err(Collaborator::ShortcodeExpander.failed())?;
                acc.push_markup(&normalize_whitespace(&expanded));
            }
            BlockClass::Reference { id } => {
                self.expand_reference(id, acc, expanding)?;
            }
            BlockClass::Structural => {
                let children = self.fold(&block.inner_blocks, expanding)?;
                let name = block.name();
                let mut node = self
                    .registry
                    .create(name)
                    .unwrap_or_else(|| Component::new(name));
                node.merge_config(block.attrs.clone());
                node.append_children(children);
                acc.push(node);
            }
        }

        Ok(())
    }

    /// Converts the referenced content and splices its nodes into `acc`.
    /// Missing or blank targets produce nothing.
    fn expand_reference(
        &self,
        id: String,
        acc: &mut Accumulator,
        expanding: &mut Vec<String>,
    ) -> Result<(), ConvertError> {
        if self.options.guard_reference_cycles && expanding.contains(&id) {
            return Err(ConvertError::ReferenceCycle { id });
        }

        let content = self
            .references
            .resolve(&id)
            .map_err(Collaborator::ReferenceResolver.failed())?;
        let Some(content) = content.filter(|c| !c.trim().is_empty()) else {
            log::debug!("reference {id} has no content, skipping");
            return Ok(());
        };

        let blocks = self.source.parse(&content).map_err(source_failed)?;

        expanding.push(id);
        let nodes = self.fold(&blocks, expanding);
        let id = expanding.pop();
        let nodes = nodes?;

        log::trace!("splicing {} nodes from reference {id:?}", nodes.len());
        acc.extend(nodes);
        Ok(())
    }
}

impl Default for Converter {
    fn default() -> Self {
        Self::new(ConverterOptions::default())
    }
}

impl fmt::Debug for Converter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Converter")
            .field("options", &self.options)
            .field("registry", &self.registry)
            .field("hooks", &self.hooks.len())
            .finish_non_exhaustive()
    }
}

/// Assembles a [`Converter`]; unset collaborators keep their defaults.
pub struct ConverterBuilder {
    converter: Converter,
}

impl ConverterBuilder {
    pub fn options(mut self, options: ConverterOptions) -> Self {
        self.converter.options = options;
        self
    }

    pub fn block_source(mut self, source: impl BlockSource + 'static) -> Self {
        self.converter.source = Box::new(source);
        self
    }

    pub fn content_filter(mut self, filter: impl ContentFilter + 'static) -> Self {
        self.converter.content_filter = Box::new(filter);
        self
    }

    pub fn renderer(mut self, renderer: impl BlockRenderer + 'static) -> Self {
        self.converter.renderer = Box::new(renderer);
        self
    }

    pub fn shortcode_expander(mut self, expander: impl ShortcodeExpander + 'static) -> Self {
        self.converter.shortcodes = Box::new(expander);
        self
    }

    pub fn references(mut self, references: impl ReferenceResolver + 'static) -> Self {
        self.converter.references = Box::new(references);
        self
    }

    pub fn registry(mut self, registry: ComponentRegistry) -> Self {
        self.converter.registry = registry;
        self
    }

    /// Adds a hook; hooks run in registration order.
    pub fn hook(mut self, hook: impl ConversionHook + 'static) -> Self {
        self.converter.hooks.push(Box::new(hook));
        self
    }

    pub fn build(self) -> Converter {
        self.converter
    }
}
