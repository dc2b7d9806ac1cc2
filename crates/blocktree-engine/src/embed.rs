//! Embed node construction.
//!
//! Embed blocks skip rendering and markup consolidation: the consuming side
//! gets the embedded resource as structured config instead.

use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;

use crate::{
    RawBlock,
    component::{Component, ComponentKind},
};

/// Attributes consumed into dedicated config keys.
const CONSUMED_ATTRS: [&str; 3] = ["url", "type", "providerNameSlug"];

/// Builds the embed node for `block`, whose name matched `prefix`.
///
/// Config keys: `url`, `provider`, `type`, `caption` (each only when known),
/// followed by the remaining block attributes.
pub fn embed_component(block: &RawBlock, prefix: &str) -> Component {
    let mut node = Component::with_kind("embed", ComponentKind::Embed);

    let url = attr_str(block, "url")
        .map(str::to_string)
        .or_else(|| first_url(&block.inner_html));
    if let Some(url) = url {
        node.set_config("url", url);
    }

    let provider = attr_str(block, "providerNameSlug").or_else(|| {
        let suffix = block.name().strip_prefix(prefix)?.trim_matches('/');
        (!suffix.is_empty()).then_some(suffix)
    });
    if let Some(provider) = provider {
        node.set_config("provider", provider);
    }

    if let Some(kind) = block.attrs.get("type") {
        node.set_config("type", kind.clone());
    }

    if let Some(caption) = caption(&block.inner_html) {
        node.set_config("caption", caption);
    }

    let rest = block
        .attrs
        .iter()
        .filter(|(key, _)| !CONSUMED_ATTRS.contains(&key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();
    node.merge_config(rest);

    node
}

fn attr_str<'a>(block: &'a RawBlock, key: &str) -> Option<&'a str> {
    block
        .attrs
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

fn first_url(html: &str) -> Option<String> {
    static URL_REGEX: OnceLock<Regex> = OnceLock::new();
    let url_regex = URL_REGEX
        .get_or_init(|| Regex::new(r#"https?://[^\s<>"'\[\]]+"#).expect("Invalid URL regex"));

    url_regex.find(html).map(|m| m.as_str().to_string())
}

/// Plain text of the first `<figcaption>`, entities decoded.
fn caption(html: &str) -> Option<String> {
    static CAPTION_REGEX: OnceLock<Regex> = OnceLock::new();
    static TAG_REGEX: OnceLock<Regex> = OnceLock::new();
    let caption_regex = CAPTION_REGEX.get_or_init(|| {
        Regex::new(r"(?is)<figcaption[^>]*>(.*?)</figcaption>").expect("Invalid caption regex")
    });
    let tag_regex = TAG_REGEX.get_or_init(|| Regex::new(r"<[^>]*>").expect("Invalid tag regex"));

    let inner = caption_regex.captures(html)?.get(1)?.as_str();
    let text = tag_regex.replace_all(inner, "");
    let decoded = html_escape::decode_html_entities(&text);
    let trimmed = decoded.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
