//! Token document model and loader.
//!
//! [`TokenTree::from_json`] turns a parsed JSON document into a tree of
//! [`TokenNode`]s. Whether a node is a leaf is decided here, once: an
//! object with a `value` field is a leaf, any other object is a group.
//! Member order follows the document.

use crate::error::DocumentError;
use crate::naming::join_path;
use crate::types::{self, TokenType};
use indexmap::IndexMap;
use rust_decimal::Decimal;
use serde_json::Value;

/// A parsed token document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TokenTree {
    root: TokenGroup,
}

/// A named collection of tokens and groups.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TokenGroup {
    pub children: IndexMap<String, TokenNode>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TokenNode {
    Group(TokenGroup),
    Leaf(TokenLeaf),
}

#[derive(Debug, Clone, PartialEq)]
pub struct TokenLeaf {
    /// The declared `type` tag (`"scalar"` when the document has none).
    pub type_tag: String,
    pub value: TokenValue,
}

impl TokenLeaf {
    pub fn token_type(&self) -> Option<TokenType> {
        match &self.value {
            TokenValue::Scalar(_) => Some(TokenType::Scalar),
            TokenValue::Color(_) => Some(TokenType::Color),
            TokenValue::Typography(_) => Some(TokenType::Typography),
            TokenValue::BoxShadow(_) => Some(TokenType::BoxShadow),
            TokenValue::Unknown { .. } => None,
        }
    }

    /// Whether a bare-number value of this leaf takes a `px` unit.
    pub fn takes_px(&self) -> bool {
        !types::UNITLESS_TAGS.contains(&self.type_tag.as_str())
    }
}

/// A leaf value, shaped by the leaf's declared type.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenValue {
    Scalar(String),
    Color(String),
    Typography(TypographyValue),
    BoxShadow(Vec<ShadowLayer>),
    /// A `type` tag no transformer handles. Kept so the build can report it
    /// against the leaf's path.
    Unknown { tag: String },
}

#[derive(Debug, Clone, PartialEq)]
pub enum TypographyValue {
    /// Field name -> raw value, in document order.
    Fields(IndexMap<String, String>),
    /// `"{typography.body}"`: the fields of another typography token.
    Reference(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ShadowLayer {
    pub x: String,
    pub y: String,
    pub blur: String,
    pub spread: String,
    pub color: String,
    pub inner: bool,
}

impl TokenTree {
    /// Build a tree from a whole document.
    pub fn from_json(doc: &Value) -> Result<TokenTree, DocumentError> {
        let obj = doc.as_object().ok_or(DocumentError::RootNotObject)?;
        Ok(TokenTree {
            root: parse_group(obj, "")?,
        })
    }

    /// Build a tree from one top-level set of a multi-set document
    /// (`{"global": {...}, "dark": {...}}`).
    pub fn from_json_set(doc: &Value, set: &str) -> Result<TokenTree, DocumentError> {
        let obj = doc.as_object().ok_or(DocumentError::RootNotObject)?;
        let selected = obj
            .get(set)
            .ok_or_else(|| DocumentError::MissingSet(set.to_owned()))?;
        TokenTree::from_json(selected)
    }

    pub fn root(&self) -> &TokenGroup {
        &self.root
    }

    /// Node at a dotted path.
    pub fn get(&self, path: &str) -> Option<&TokenNode> {
        let mut segments = path.split('.');
        let first = segments.next()?;
        let mut node = self.root.children.get(first)?;
        for segment in segments {
            match node {
                TokenNode::Group(group) => node = group.children.get(segment)?,
                TokenNode::Leaf(_) => return None,
            }
        }
        Some(node)
    }

    /// Leaf at a dotted path; `None` if any segment is missing or the path
    /// ends on a group.
    pub fn leaf(&self, path: &str) -> Option<&TokenLeaf> {
        match self.get(path)? {
            TokenNode::Leaf(leaf) => Some(leaf),
            TokenNode::Group(_) => None,
        }
    }

    /// Number of leaves in the tree.
    pub fn leaf_count(&self) -> usize {
        fn count(group: &TokenGroup) -> usize {
            group
                .children
                .values()
                .map(|n| match n {
                    TokenNode::Leaf(_) => 1,
                    TokenNode::Group(g) => count(g),
                })
                .sum()
        }
        count(&self.root)
    }
}

// ── Parsing helpers ─────────────────────────────────────────────────

fn parse_group(
    obj: &serde_json::Map<String, Value>,
    path: &str,
) -> Result<TokenGroup, DocumentError> {
    let mut children = IndexMap::with_capacity(obj.len());
    for (key, value) in obj {
        // `$themes`, `$metadata` and friends describe the document, not tokens.
        if key.starts_with('$') {
            continue;
        }
        let child_path = join_path(path, key);
        let member = value.as_object().ok_or_else(|| DocumentError::NotAToken {
            path: child_path.clone(),
        })?;
        let node = if member.contains_key("value") {
            TokenNode::Leaf(parse_leaf(member, &child_path)?)
        } else {
            TokenNode::Group(parse_group(member, &child_path)?)
        };
        children.insert(key.clone(), node);
    }
    Ok(TokenGroup { children })
}

fn parse_leaf(
    obj: &serde_json::Map<String, Value>,
    path: &str,
) -> Result<TokenLeaf, DocumentError> {
    let raw = obj.get("value").unwrap_or(&Value::Null);
    let tag = match obj.get("type") {
        None | Some(Value::Null) => types::SCALAR,
        Some(Value::String(s)) => s.as_str(),
        Some(_) => {
            return Err(DocumentError::InvalidValue {
                path: path.to_owned(),
                message: "'type' must be a string".to_string(),
            })
        }
    };

    let value = match TokenType::from_tag(tag) {
        Some(TokenType::Scalar) => TokenValue::Scalar(text_value(raw, path, "value")?),
        Some(TokenType::Color) => TokenValue::Color(text_value(raw, path, "value")?),
        Some(TokenType::Typography) => TokenValue::Typography(parse_typography(raw, path)?),
        Some(TokenType::BoxShadow) => TokenValue::BoxShadow(parse_shadow(raw, path)?),
        None => TokenValue::Unknown {
            tag: tag.to_owned(),
        },
    };

    Ok(TokenLeaf {
        type_tag: tag.to_owned(),
        value,
    })
}

/// Strings are taken as-is; numbers are printed in their JSON form.
fn text_value(raw: &Value, path: &str, field: &str) -> Result<String, DocumentError> {
    match raw {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => number_text(n, path),
        other => Err(DocumentError::InvalidValue {
            path: path.to_owned(),
            message: format!(
                "'{}' must be a string or number, got {}",
                field,
                json_kind(other)
            ),
        }),
    }
}

/// serde_json prints large and small floats in exponent form (`1e+21`),
/// which would read as arithmetic. Expand those to plain decimals.
fn number_text(n: &serde_json::Number, path: &str) -> Result<String, DocumentError> {
    let text = n.to_string();
    if !text.contains(['e', 'E']) {
        return Ok(text);
    }
    Decimal::from_scientific(&text.replace("e+", "e").replace("E+", "E"))
        .map(|d| d.normalize().to_string())
        .map_err(|_| DocumentError::InvalidValue {
            path: path.to_owned(),
            message: format!("number {} is out of range", text),
        })
}

fn parse_typography(raw: &Value, path: &str) -> Result<TypographyValue, DocumentError> {
    match raw {
        Value::String(s) => Ok(TypographyValue::Reference(s.clone())),
        Value::Object(fields) => {
            let mut out = IndexMap::with_capacity(fields.len());
            for (name, v) in fields {
                out.insert(name.clone(), text_value(v, path, name)?);
            }
            Ok(TypographyValue::Fields(out))
        }
        other => Err(DocumentError::InvalidValue {
            path: path.to_owned(),
            message: format!(
                "typography value must be an object or a reference, got {}",
                json_kind(other)
            ),
        }),
    }
}

fn parse_shadow(raw: &Value, path: &str) -> Result<Vec<ShadowLayer>, DocumentError> {
    match raw {
        Value::Array(layers) => layers.iter().map(|l| parse_shadow_layer(l, path)).collect(),
        Value::Object(_) => Ok(vec![parse_shadow_layer(raw, path)?]),
        other => Err(DocumentError::InvalidValue {
            path: path.to_owned(),
            message: format!(
                "boxShadow value must be a list of layers, got {}",
                json_kind(other)
            ),
        }),
    }
}

fn parse_shadow_layer(raw: &Value, path: &str) -> Result<ShadowLayer, DocumentError> {
    let obj = raw.as_object().ok_or_else(|| DocumentError::InvalidValue {
        path: path.to_owned(),
        message: format!("shadow layer must be an object, got {}", json_kind(raw)),
    })?;

    let length = |field: &str| -> Result<String, DocumentError> {
        match obj.get(field) {
            None => Ok("0".to_string()),
            Some(v) => text_value(v, path, field),
        }
    };

    let color = match obj.get("color") {
        Some(v) => text_value(v, path, "color")?,
        None => {
            return Err(DocumentError::InvalidValue {
                path: path.to_owned(),
                message: "shadow layer is missing 'color'".to_string(),
            })
        }
    };

    Ok(ShadowLayer {
        x: length("x")?,
        y: length("y")?,
        blur: length("blur")?,
        spread: length("spread")?,
        color,
        inner: obj.get("type").and_then(|t| t.as_str()) == Some(types::INNER_SHADOW),
    })
}

fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn exponent_numbers_load_as_plain_decimals() {
        let tree = TokenTree::from_json(&json!({
            "big": { "value": 1e21 },
            "small": { "value": 1.5e-7 },
            "plain": { "value": 2.5 }
        }))
        .unwrap();
        assert_eq!(
            tree.leaf("big").unwrap().value,
            TokenValue::Scalar("1000000000000000000000".to_string())
        );
        assert_eq!(
            tree.leaf("small").unwrap().value,
            TokenValue::Scalar("0.00000015".to_string())
        );
        assert_eq!(
            tree.leaf("plain").unwrap().value,
            TokenValue::Scalar("2.5".to_string())
        );
    }

    #[test]
    fn objects_with_value_are_leaves() {
        let tree = TokenTree::from_json(&json!({
            "spacing": {
                "base": { "value": "8" },
                "nested": { "deeper": { "value": 4, "type": "spacing" } }
            }
        }))
        .unwrap();

        assert_eq!(
            tree.leaf("spacing.base").unwrap().value,
            TokenValue::Scalar("8".to_string())
        );
        assert_eq!(
            tree.leaf("spacing.nested.deeper").unwrap().value,
            TokenValue::Scalar("4".to_string())
        );
        assert!(matches!(tree.get("spacing.nested"), Some(TokenNode::Group(_))));
        assert!(tree.leaf("spacing.nested").is_none());
        assert!(tree.leaf("spacing.base.extra").is_none());
        assert!(tree.leaf("missing").is_none());
        assert_eq!(tree.leaf_count(), 2);
    }

    #[test]
    fn member_order_follows_document() {
        let tree = TokenTree::from_json(&json!({
            "zeta": { "value": "1" },
            "alpha": { "value": "2" },
            "mid": { "value": "3" }
        }))
        .unwrap();
        let keys: Vec<&str> = tree.root().children.keys().map(|k| k.as_str()).collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn typed_values_are_shaped_at_load() {
        let tree = TokenTree::from_json(&json!({
            "c": { "value": "#ffffff", "type": "color" },
            "t": { "value": { "fontSize": 16, "fontFamily": "Inter" }, "type": "typography" },
            "s": { "value": { "x": 0, "y": 2, "blur": 4, "color": "#000000", "type": "innerShadow" }, "type": "boxShadow" },
            "u": { "value": "x", "type": "composition" }
        }))
        .unwrap();

        assert_eq!(
            tree.leaf("c").unwrap().value,
            TokenValue::Color("#ffffff".to_string())
        );
        match &tree.leaf("t").unwrap().value {
            TokenValue::Typography(TypographyValue::Fields(f)) => {
                assert_eq!(f.get("fontSize").map(String::as_str), Some("16"));
            }
            other => panic!("expected typography fields, got {:?}", other),
        }
        match &tree.leaf("s").unwrap().value {
            TokenValue::BoxShadow(layers) => {
                assert_eq!(layers.len(), 1);
                assert_eq!(layers[0].spread, "0");
                assert!(layers[0].inner);
            }
            other => panic!("expected shadow, got {:?}", other),
        }
        assert_eq!(tree.leaf("u").unwrap().token_type(), None);
    }

    #[test]
    fn dollar_keys_are_skipped() {
        let tree = TokenTree::from_json(&json!({
            "$themes": [],
            "$metadata": { "tokenSetOrder": ["global"] },
            "a": { "value": "1" }
        }))
        .unwrap();
        assert_eq!(tree.leaf_count(), 1);
    }

    #[test]
    fn malformed_documents_are_rejected() {
        assert_eq!(
            TokenTree::from_json(&json!([1, 2])),
            Err(DocumentError::RootNotObject)
        );
        assert_eq!(
            TokenTree::from_json(&json!({ "a": { "b": 3 } })),
            Err(DocumentError::NotAToken {
                path: "a.b".to_string()
            })
        );
        assert!(matches!(
            TokenTree::from_json(&json!({ "a": { "value": true } })),
            Err(DocumentError::InvalidValue { .. })
        ));
        assert!(matches!(
            TokenTree::from_json(&json!({ "s": { "value": [{ "x": 1 }], "type": "boxShadow" } })),
            Err(DocumentError::InvalidValue { .. })
        ));
    }

    #[test]
    fn set_selection() {
        let doc = json!({ "global": { "a": { "value": "1" } }, "dark": {} });
        let tree = TokenTree::from_json_set(&doc, "global").unwrap();
        assert!(tree.leaf("a").is_some());
        assert_eq!(
            TokenTree::from_json_set(&doc, "light"),
            Err(DocumentError::MissingSet("light".to_string()))
        );
    }
}
