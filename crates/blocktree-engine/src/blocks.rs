//! # Raw Block Records
//!
//! Blocks as produced by the external block parser, in its JSON wire shape
//! (`blockName`, `innerHTML`, `attrs`, `innerBlocks`, `innerContent`).
//! The converter only reads them.

use serde::{Deserialize, Deserializer, Serialize, de};
use serde_json::{Map, Value};

use crate::error::ConvertError;

/// A single parsed block.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawBlock {
    /// `None` (or empty) for freeform markup between named blocks.
    #[serde(default)]
    pub block_name: Option<String>,
    #[serde(rename = "innerHTML")]
    pub inner_html: String,
    #[serde(default, deserialize_with = "attrs_map")]
    pub attrs: Map<String, Value>,
    #[serde(default)]
    pub inner_blocks: Vec<RawBlock>,
    /// Markup chunks interleaved with `null` placeholders, one per inner block.
    #[serde(default)]
    pub inner_content: Vec<Option<String>>,
}

impl RawBlock {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            block_name: Some(name.into()),
            ..Self::default()
        }
    }

    /// A nameless block carrying only markup.
    pub fn freeform(html: impl Into<String>) -> Self {
        Self {
            inner_html: html.into(),
            ..Self::default()
        }
    }

    pub fn with_html(mut self, html: impl Into<String>) -> Self {
        self.inner_html = html.into();
        self
    }

    /// Sets attributes from a JSON object; non-object values clear them.
    pub fn with_attrs(mut self, attrs: Value) -> Self {
        self.attrs = match attrs {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        self
    }

    pub fn with_inner_blocks(mut self, inner_blocks: Vec<RawBlock>) -> Self {
        self.inner_blocks = inner_blocks;
        self
    }

    pub fn with_inner_content(mut self, inner_content: Vec<Option<String>>) -> Self {
        self.inner_content = inner_content;
        self
    }

    /// Block name, empty for freeform markup.
    pub fn name(&self) -> &str {
        self.block_name.as_deref().unwrap_or("")
    }

    /// Parser noise: no name, no inner blocks and whitespace-only markup.
    ///
    /// Named blocks are never blank; dynamic blocks legitimately carry no
    /// markup.
    pub fn is_blank(&self) -> bool {
        self.name().is_empty()
            && self.inner_blocks.is_empty()
            && self.inner_html.trim().is_empty()
    }

    /// Identifier of the externally stored content this block points at.
    ///
    /// `null`, `false`, `0`, `""` and `"0"` all mean no reference.
    pub fn reference(&self) -> Option<String> {
        match self.attrs.get("ref")? {
            Value::String(id) if !id.is_empty() && id != "0" => Some(id.clone()),
            Value::Number(n) if n.as_f64() != Some(0.0) => Some(n.to_string()),
            _ => None,
        }
    }

    pub fn from_value(value: Value) -> Result<Self, ConvertError> {
        Ok(serde_json::from_value(value)?)
    }

    pub fn list_from_value(value: Value) -> Result<Vec<Self>, ConvertError> {
        Ok(serde_json::from_value(value)?)
    }

    /// Parses a JSON array of block records.
    pub fn list_from_str(json: &str) -> Result<Vec<Self>, ConvertError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Accepts an object, `null`, or the empty array some encoders emit for an
/// empty attribute map.
fn attrs_map<'de, D>(deserializer: D) -> Result<Map<String, Value>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(Map::new()),
        Value::Array(items) if items.is_empty() => Ok(Map::new()),
        other => Err(de::Error::custom(format!(
            "expected attrs to be an object, found {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn parses_parser_output() {
        let block = RawBlock::from_value(json!({
            "blockName": "core/columns",
            "attrs": {"verticalAlignment": "top"},
            "innerBlocks": [
                {"blockName": "core/column", "attrs": [], "innerBlocks": [], "innerHTML": "<div></div>", "innerContent": ["<div></div>"]}
            ],
            "innerHTML": "<div class=\"wp-block-columns\"></div>",
            "innerContent": ["<div class=\"wp-block-columns\">", null, "</div>"]
        }))
        .unwrap();

        assert_eq!(block.name(), "core/columns");
        assert_eq!(block.attrs.get("verticalAlignment"), Some(&json!("top")));
        assert_eq!(block.inner_blocks.len(), 1);
        assert!(block.inner_blocks[0].attrs.is_empty());
        assert_eq!(block.inner_content[1], None);
    }

    #[test]
    fn null_block_name_is_freeform() {
        let block = RawBlock::from_value(json!({"blockName": null, "innerHTML": "<p>x</p>"}))
            .unwrap();
        assert_eq!(block.name(), "");
        assert!(block.attrs.is_empty());
        assert!(block.inner_blocks.is_empty());
    }

    #[test]
    fn missing_inner_html_is_malformed() {
        let err = RawBlock::from_value(json!({"blockName": "core/paragraph"})).unwrap_err();
        assert!(matches!(err, ConvertError::MalformedBlock { .. }));
        assert!(err.to_string().contains("innerHTML"));
    }

    #[test]
    fn scalar_attrs_are_malformed() {
        let err = RawBlock::from_value(json!({"innerHTML": "", "attrs": 7})).unwrap_err();
        assert!(matches!(err, ConvertError::MalformedBlock { .. }));
    }

    #[test]
    fn blank_detection() {
        assert!(RawBlock::freeform("  \n\t").is_blank());
        assert!(!RawBlock::new("core/latest-posts").is_blank());
        assert!(!RawBlock::freeform("<p>A</p>").is_blank());
        assert!(
            !RawBlock::freeform(" ")
                .with_inner_blocks(vec![RawBlock::freeform("<p>A</p>")])
                .is_blank()
        );
    }

    #[test]
    fn reference_identifiers() {
        let numeric = RawBlock::new("core/block").with_attrs(json!({"ref": 42}));
        let text = RawBlock::new("core/block").with_attrs(json!({"ref": "footer"}));
        let zero = RawBlock::new("core/block").with_attrs(json!({"ref": 0}));
        let empty = RawBlock::new("core/block").with_attrs(json!({"ref": ""}));
        let flag = RawBlock::new("core/block").with_attrs(json!({"ref": false}));

        assert_eq!(numeric.reference().as_deref(), Some("42"));
        assert_eq!(text.reference().as_deref(), Some("footer"));
        assert_eq!(zero.reference(), None);
        assert_eq!(empty.reference(), None);
        assert_eq!(flag.reference(), None);
        assert_eq!(RawBlock::new("core/block").reference(), None);
    }

    #[test]
    fn list_from_str_rejects_non_arrays() {
        assert!(RawBlock::list_from_str("{}").is_err());
        assert!(RawBlock::list_from_str("[]").unwrap().is_empty());
    }
}
