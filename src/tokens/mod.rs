//! In-memory model of design token files.
//!
//! A token file is a nested JSON object. Any object carrying `$value` is a
//! [`Token`]; every other object is a group of further nodes. Keys beginning
//! with `$` at group level are metadata and never become nodes.

use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use thiserror::Error;

mod path;

pub use path::TokenPath;

const VALUE_KEY: &str = "$value";
const TYPE_KEY: &str = "$type";
const DESCRIPTION_KEY: &str = "$description";
const EXTENSIONS_KEY: &str = "$extensions";

/// Token sets generated on every run. Layout output is switched off until
/// every reference in `layout.json` resolves through the mode and theme layers.
pub const ENABLED_TOKEN_SETS: &[TokenSet] = &[TokenSet::Component];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct TreeError {
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenType {
    Color,
    Number,
    Text,
    Other,
}

impl TokenType {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "color" => Self::Color,
            "number" => Self::Number,
            "text" => Self::Text,
            _ => Self::Other,
        }
    }

}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenValue {
    Literal(String),
    Reference(TokenPath),
    /// A `$value` that is not a string, number or bool. Kept in the tree so
    /// the token is reported on its own instead of failing the whole file.
    Invalid(String),
}

impl TokenValue {
    fn from_json(path: &TokenPath, raw: &Value) -> Self {
        match raw {
            Value::String(text) => TokenPath::from_reference(text)
                .map(Self::Reference)
                .unwrap_or_else(|| Self::Literal(text.clone())),
            Value::Number(number) => Self::Literal(number.to_string()),
            Value::Bool(flag) => Self::Literal(flag.to_string()),
            Value::Null | Value::Array(_) | Value::Object(_) => {
                let reason = format!("`$value` must be a string, number or bool, found {raw}");
                tracing::warn!(token = %path, "{reason}");
                Self::Invalid(reason)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub value: TokenValue,
    pub token_type: Option<TokenType>,
    pub description: Option<String>,
    pub extensions: Option<Value>,
}

impl Token {
    pub fn literal(value: impl Into<String>, token_type: TokenType) -> Self {
        Self {
            value: TokenValue::Literal(value.into()),
            token_type: Some(token_type),
            description: None,
            extensions: None,
        }
    }

    pub fn reference(target: &str, token_type: TokenType) -> Self {
        Self {
            value: TokenValue::Reference(TokenPath::parse(target)),
            token_type: Some(token_type),
            description: None,
            extensions: None,
        }
    }

    fn from_json(path: &TokenPath, raw_value: &Value, object: &Map<String, Value>) -> Self {
        Self {
            value: TokenValue::from_json(path, raw_value),
            token_type: object
                .get(TYPE_KEY)
                .and_then(Value::as_str)
                .map(TokenType::parse),
            description: object
                .get(DESCRIPTION_KEY)
                .and_then(Value::as_str)
                .map(str::to_string),
            extensions: object.get(EXTENSIONS_KEY).cloned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TokenNode {
    Token(Token),
    Group(TokenTree),
}

/// Ordered mapping of keys to nodes. Order follows the source file and only
/// matters for emitted declaration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TokenTree {
    entries: Vec<(String, TokenNode)>,
}

impl TokenTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(raw: &Value) -> Result<Self, TreeError> {
        let Some(object) = raw.as_object() else {
            return Err(TreeError {
                message: format!("token file root must be a JSON object, found {raw}"),
            });
        };
        Ok(Self::from_object(&TokenPath::root(), object))
    }

    fn from_object(prefix: &TokenPath, object: &Map<String, Value>) -> Self {
        let mut tree = Self::new();
        for (key, value) in object {
            if key.starts_with('$') {
                continue;
            }
            let path = prefix.child(key);
            let Some(child) = value.as_object() else {
                tracing::debug!(token = %path, "skipping non-object entry in token tree");
                continue;
            };
            let node = match child.get(VALUE_KEY) {
                Some(raw_value) => TokenNode::Token(Token::from_json(&path, raw_value, child)),
                None => TokenNode::Group(Self::from_object(&path, child)),
            };
            tree.entries.push((key.clone(), node));
        }
        tree
    }

    /// Builder used by tests and callers assembling trees in code.
    pub fn with(mut self, key: impl Into<String>, node: TokenNode) -> Self {
        self.insert(key, node);
        self
    }

    /// Insert or replace `key`, keeping the original position on replace.
    pub fn insert(&mut self, key: impl Into<String>, node: TokenNode) {
        let key = key.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == key) {
            Some((_, slot)) => *slot = node,
            None => self.entries.push((key, node)),
        }
    }

    fn child(&self, key: &str) -> Option<&TokenNode> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, node)| node)
    }

    /// Find the token at `path`. Paths ending on a group are not tokens.
    pub fn lookup(&self, path: &TokenPath) -> Option<&Token> {
        let (last, parents) = path.segments().split_last()?;
        let mut group = self;
        for segment in parents {
            match group.child(segment)? {
                TokenNode::Group(next) => group = next,
                TokenNode::Token(_) => return None,
            }
        }
        match group.child(last)? {
            TokenNode::Token(token) => Some(token),
            TokenNode::Group(_) => None,
        }
    }

    /// Every token in depth-first, file order, paired with its full path.
    pub fn leaves(&self) -> Vec<(TokenPath, &Token)> {
        let mut out = Vec::new();
        self.collect_leaves(&TokenPath::root(), &mut out);
        out
    }

    fn collect_leaves<'a>(&'a self, prefix: &TokenPath, out: &mut Vec<(TokenPath, &'a Token)>) {
        for (key, node) in &self.entries {
            let path = prefix.child(key);
            match node {
                TokenNode::Token(token) => out.push((path, token)),
                TokenNode::Group(group) => group.collect_leaves(&path, out),
            }
        }
    }
}

/// Token trees that can be turned into CSS, one output file each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenSet {
    Component,
    Layout,
}

impl TokenSet {
    pub fn name(self) -> &'static str {
        match self {
            Self::Component => "component",
            Self::Layout => "layout",
        }
    }

    /// Location of the set's source file inside the tokens directory.
    pub fn source_path(self, tokens_dir: &Path) -> PathBuf {
        match self {
            Self::Component => tokens_dir.join("components").join("component.json"),
            Self::Layout => tokens_dir.join("layouts").join("layout.json"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn from_json_distinguishes_tokens_from_groups() {
        let raw = json!({
            "$type": "color",
            "Color": {
                "$description": "group metadata is skipped",
                "Base": {
                    "Background": {
                        "default": { "$value": "#ffffff", "$type": "color" },
                        "hover": { "$value": "{Color.Base.Background.default}", "$type": "color" }
                    }
                }
            },
            "Spacing": { "small": { "$value": 8, "$type": "number" } }
        });

        let tree = TokenTree::from_json(&raw).unwrap();
        let default = tree
            .lookup(&TokenPath::parse("Color.Base.Background.default"))
            .unwrap();
        assert_eq!(default.value, TokenValue::Literal("#ffffff".to_string()));
        assert_eq!(default.token_type, Some(TokenType::Color));

        let hover = tree
            .lookup(&TokenPath::parse("Color.Base.Background.hover"))
            .unwrap();
        assert_eq!(
            hover.value,
            TokenValue::Reference(TokenPath::parse("Color.Base.Background.default"))
        );

        let small = tree.lookup(&TokenPath::parse("Spacing.small")).unwrap();
        assert_eq!(small.value, TokenValue::Literal("8".to_string()));
        assert_eq!(small.token_type, Some(TokenType::Number));
    }

    #[test]
    fn lookup_on_group_or_missing_path_is_none() {
        let raw = json!({ "Color": { "Base": { "default": { "$value": "#000" } } } });
        let tree = TokenTree::from_json(&raw).unwrap();
        assert!(tree.lookup(&TokenPath::parse("Color.Base")).is_none());
        assert!(tree.lookup(&TokenPath::parse("Color.Base.default.deeper")).is_none());
        assert!(tree.lookup(&TokenPath::parse("Missing")).is_none());
        assert!(tree.lookup(&TokenPath::parse("")).is_none());
    }

    #[test]
    fn empty_string_value_is_still_a_token() {
        let raw = json!({ "Label": { "$value": "", "$type": "text" } });
        let tree = TokenTree::from_json(&raw).unwrap();
        let token = tree.lookup(&TokenPath::parse("Label")).unwrap();
        assert_eq!(token.value, TokenValue::Literal(String::new()));
    }

    #[test]
    fn leaves_follow_file_order() {
        let raw = json!({
            "Zeta": { "$value": "1" },
            "Alpha": { "Inner": { "$value": "2" } },
            "Mid": { "$value": "3" }
        });
        let tree = TokenTree::from_json(&raw).unwrap();
        let paths: Vec<String> = tree.leaves().iter().map(|(path, _)| path.dotted()).collect();
        assert_eq!(paths, vec!["Zeta", "Alpha.Inner", "Mid"]);
    }

    #[test]
    fn malformed_values_stay_as_invalid_leaves() {
        let raw = json!({
            "Color": {
                "broken": { "$value": null },
                "list": { "$value": ["#fff"] },
                "ok": { "$value": "#000" }
            }
        });
        let tree = TokenTree::from_json(&raw).unwrap();

        let broken = tree.lookup(&TokenPath::parse("Color.broken")).unwrap();
        assert!(matches!(&broken.value, TokenValue::Invalid(reason) if reason.contains("found null")));
        let list = tree.lookup(&TokenPath::parse("Color.list")).unwrap();
        assert!(matches!(list.value, TokenValue::Invalid(_)));
        assert_eq!(tree.leaves().len(), 3);
    }

    #[test]
    fn root_must_be_object() {
        assert!(TokenTree::from_json(&json!(["not", "a", "tree"])).is_err());
    }

    #[test]
    fn layout_set_is_disabled() {
        assert_eq!(ENABLED_TOKEN_SETS, &[TokenSet::Component]);
        assert_eq!(
            TokenSet::Layout.source_path(Path::new("/data")),
            PathBuf::from("/data/layouts/layout.json")
        );
    }
}
