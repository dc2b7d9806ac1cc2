//! camelCase projection of component config keys.

use std::collections::BTreeSet;

use serde_json::{Map, Value};

/// Converts a snake_case key to camelCase.
///
/// Each underscore-separated fragment gets an upper-cased first character,
/// then the first character of the joined result is lower-cased. The rest of
/// every fragment is left as is, so `post_ID` becomes `postID`.
pub fn camel_case_key(key: &str) -> String {
    let joined: String = key.split('_').map(upper_first).collect();
    lower_first(&joined)
}

/// Projects a config map into camelCased keys.
///
/// - A non-empty `whitelist` drops keys that match neither their original
///   nor their camelCased form
/// - Map values are recursed into unless their original key is listed in
///   `preserve_inner_keys`; the key itself is still transformed
/// - Sequences and scalars are copied untouched
pub fn camel_case_keys(
    config: &Map<String, Value>,
    whitelist: &BTreeSet<String>,
    preserve_inner_keys: &BTreeSet<String>,
) -> Map<String, Value> {
    let mut out = Map::with_capacity(config.len());

    for (key, value) in config {
        let camel = camel_case_key(key);
        if !whitelist.is_empty() && !whitelist.contains(key) && !whitelist.contains(&camel) {
            continue;
        }

        let value = match value {
            Value::Object(inner) if !preserve_inner_keys.contains(key) => {
                Value::Object(camel_case_keys(inner, whitelist, preserve_inner_keys))
            }
            other => other.clone(),
        };
        out.insert(camel, value);
    }

    out
}

fn upper_first(fragment: &str) -> String {
    let mut chars = fragment.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn lower_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    fn map(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    fn set(keys: &[&str]) -> BTreeSet<String> {
        keys.iter().map(|k| k.to_string()).collect()
    }

    #[rstest]
    #[case("post_id", "postId")]
    #[case("id", "id")]
    #[case("align_wide_full", "alignWideFull")]
    #[case("className", "className")]
    #[case("Title", "title")]
    #[case("post_ID", "postID")]
    #[case("_private", "private")]
    #[case("double__underscore", "doubleUnderscore")]
    #[case("", "")]
    fn converts_keys(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(camel_case_key(input), expected);
    }

    #[test]
    fn recurses_into_nested_maps() {
        let config = map(json!({
            "post_id": 5,
            "style_data": {"font_size": 12, "line_height": {"unit_name": "em"}}
        }));

        let out = camel_case_keys(&config, &BTreeSet::new(), &BTreeSet::new());

        assert_eq!(
            Value::Object(out),
            json!({
                "postId": 5,
                "styleData": {"fontSize": 12, "lineHeight": {"unitName": "em"}}
            })
        );
    }

    #[test]
    fn preserved_keys_keep_inner_keys() {
        let config = map(json!({"html_attrs": {"data_id": 1, "aria_label": "x"}}));

        let out = camel_case_keys(&config, &BTreeSet::new(), &set(&["html_attrs"]));

        assert_eq!(
            Value::Object(out),
            json!({"htmlAttrs": {"data_id": 1, "aria_label": "x"}})
        );
    }

    #[test]
    fn sequences_are_opaque() {
        let config = map(json!({"gallery_items": [{"image_id": 1}, {"image_id": 2}]}));

        let out = camel_case_keys(&config, &BTreeSet::new(), &BTreeSet::new());

        assert_eq!(
            Value::Object(out),
            json!({"galleryItems": [{"image_id": 1}, {"image_id": 2}]})
        );
    }

    #[test]
    fn whitelist_drops_unlisted_keys() {
        let config = map(json!({"post_id": 5, "other": 9}));

        let out = camel_case_keys(&config, &set(&["postId"]), &BTreeSet::new());

        assert_eq!(Value::Object(out), json!({"postId": 5}));
    }

    #[test]
    fn whitelist_accepts_original_key_form() {
        let config = map(json!({"post_id": 5, "other": 9}));

        let out = camel_case_keys(&config, &set(&["post_id"]), &BTreeSet::new());

        assert_eq!(Value::Object(out), json!({"postId": 5}));
    }

    #[test]
    fn whitelist_applies_at_nested_levels() {
        let config = map(json!({"meta": {"title": "t", "secret": "s"}}));

        let out = camel_case_keys(&config, &set(&["meta", "title"]), &BTreeSet::new());

        assert_eq!(Value::Object(out), json!({"meta": {"title": "t"}}));
    }

    #[test]
    fn keeps_insertion_order() {
        let config = map(json!({"z_key": 1, "a_key": 2, "m_key": 3}));

        let out = camel_case_keys(&config, &BTreeSet::new(), &BTreeSet::new());

        let keys: Vec<&str> = out.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["zKey", "aKey", "mKey"]);
    }
}
