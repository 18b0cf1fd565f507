//! Runtime side of the pipeline: the consolidated resolved-token artifact and
//! the single `:root` stylesheet that the UI swaps on every mode change.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock, PoisonError};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::css::CssDeclaration;

/// Identity of the injected style element. There is never more than one.
pub const STYLE_ELEMENT_ID: &str = "cascade-token-css-vars";

pub type ModeVariables = serde_json::Map<String, Value>;

#[derive(Debug, Error)]
pub enum InjectError {
    #[error("failed to read resolved tokens: {path}")]
    Read { path: PathBuf, source: io::Error },
    #[error("invalid resolved tokens in {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

pub type InjectResult<T> = std::result::Result<T, InjectError>;

/// `theme -> mode -> { "--Var-Name": "value" }`, declaration order preserved.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResolvedTokens {
    themes: BTreeMap<String, BTreeMap<String, ModeVariables>>,
}

impl ResolvedTokens {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(path: &Path) -> InjectResult<Self> {
        let serialized = fs::read_to_string(path).map_err(|source| InjectError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&serialized).map_err(|source| InjectError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Append declarations to `theme`/`mode`; later sets extend earlier ones.
    pub fn insert_mode<'a>(
        &mut self,
        theme: &str,
        mode: &str,
        declarations: impl IntoIterator<Item = &'a CssDeclaration>,
    ) {
        let variables = declarations.into_iter().map(|declaration| {
            (
                declaration.name.clone(),
                Value::String(declaration.value.clone()),
            )
        });
        self.themes
            .entry(theme.to_string())
            .or_default()
            .entry(mode.to_string())
            .or_default()
            .extend(variables);
    }

    pub fn variables(&self, theme: &str, mode: &str) -> Option<&ModeVariables> {
        self.themes.get(theme)?.get(mode)
    }
}

/// `:root { ... }` with one declaration per variable.
pub fn root_block(variables: Option<&ModeVariables>) -> String {
    let mut css = String::from(":root {\n");
    for (name, value) in variables.into_iter().flatten() {
        let value = value
            .as_str()
            .map(str::to_string)
            .unwrap_or_else(|| value.to_string());
        css.push_str(&format!("  {name}: {value};\n"));
    }
    css.push('}');
    css
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleElement {
    pub id: String,
    pub css: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InjectAction {
    Created,
    Replaced,
}

/// Minimal model of a document head holding style elements keyed by id.
#[derive(Debug, Default)]
pub struct StyleDocument {
    styles: Vec<StyleElement>,
}

impl StyleDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn styles(&self) -> &[StyleElement] {
        &self.styles
    }

    pub fn style(&self, id: &str) -> Option<&StyleElement> {
        self.styles.iter().find(|style| style.id == id)
    }

    /// Create the element if absent, otherwise swap its content in place.
    pub fn upsert_style(&mut self, id: &str, css: String) -> InjectAction {
        match self.styles.iter_mut().find(|style| style.id == id) {
            Some(existing) => {
                existing.css = css;
                InjectAction::Replaced
            }
            None => {
                self.styles.push(StyleElement {
                    id: id.to_string(),
                    css,
                });
                InjectAction::Created
            }
        }
    }

    pub fn remove_style(&mut self, id: &str) -> bool {
        let before = self.styles.len();
        self.styles.retain(|style| style.id != id);
        self.styles.len() != before
    }
}

/// Inject `mode`'s variables for `theme` as the document's token stylesheet.
/// Unknown themes or modes inject an empty `:root` block.
pub fn inject_token_css_vars(
    document: &mut StyleDocument,
    tokens: &ResolvedTokens,
    theme: &str,
    mode: &str,
) -> InjectAction {
    let variables = tokens.variables(theme, mode);
    if variables.is_none() {
        tracing::warn!(theme, mode, "no resolved tokens for mode; injecting empty block");
    }
    let action = document.upsert_style(STYLE_ELEMENT_ID, root_block(variables));
    tracing::debug!(theme, mode, ?action, "token stylesheet injected");
    action
}

/// Process-wide document the UI layer injects into.
pub fn active_document() -> &'static Mutex<StyleDocument> {
    static ACTIVE: OnceLock<Mutex<StyleDocument>> = OnceLock::new();
    ACTIVE.get_or_init(|| Mutex::new(StyleDocument::new()))
}

pub fn inject_active(tokens: &ResolvedTokens, theme: &str, mode: &str) -> InjectAction {
    let mut document = active_document()
        .lock()
        .unwrap_or_else(PoisonError::into_inner);
    inject_token_css_vars(&mut document, tokens, theme, mode)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn declaration(name: &str, value: &str) -> CssDeclaration {
        CssDeclaration {
            name: name.to_string(),
            value: value.to_string(),
            resolved: true,
        }
    }

    fn sample_tokens() -> ResolvedTokens {
        let mut tokens = ResolvedTokens::new();
        tokens.insert_mode(
            "dive",
            "light",
            &[
                declaration("--Surface", "#ffffff"),
                declaration("--Gap", "8px"),
            ],
        );
        tokens.insert_mode("dive", "dark", &[declaration("--Surface", "#000000")]);
        tokens
    }

    #[test]
    fn root_block_keeps_declaration_order() {
        let tokens = sample_tokens();
        assert_eq!(
            root_block(tokens.variables("dive", "light")),
            ":root {\n  --Surface: #ffffff;\n  --Gap: 8px;\n}"
        );
    }

    #[test]
    fn mode_switch_replaces_instead_of_duplicating() {
        let tokens = sample_tokens();
        let mut document = StyleDocument::new();

        let first = inject_token_css_vars(&mut document, &tokens, "dive", "light");
        let second = inject_token_css_vars(&mut document, &tokens, "dive", "dark");

        assert_eq!(first, InjectAction::Created);
        assert_eq!(second, InjectAction::Replaced);
        assert_eq!(document.styles().len(), 1);
        assert_eq!(
            document.style(STYLE_ELEMENT_ID).map(|style| style.css.as_str()),
            Some(":root {\n  --Surface: #000000;\n}")
        );
    }

    #[test]
    fn unknown_mode_injects_empty_root() {
        let tokens = sample_tokens();
        let mut document = StyleDocument::new();
        inject_token_css_vars(&mut document, &tokens, "dive", "sepia");
        assert_eq!(
            document.style(STYLE_ELEMENT_ID).map(|style| style.css.as_str()),
            Some(":root {\n}")
        );
    }

    #[test]
    fn other_styles_are_left_alone() {
        let tokens = sample_tokens();
        let mut document = StyleDocument::new();
        document.upsert_style("app-styles", "body {}".to_string());
        inject_token_css_vars(&mut document, &tokens, "dive", "light");

        assert_eq!(document.styles().len(), 2);
        assert!(document.remove_style(STYLE_ELEMENT_ID));
        assert_eq!(document.styles()[0].id, "app-styles");
    }

    #[test]
    fn active_document_holds_a_single_token_stylesheet() {
        let tokens = sample_tokens();
        inject_active(&tokens, "dive", "light");
        inject_active(&tokens, "dive", "dark");

        let document = active_document()
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let count = document
            .styles()
            .iter()
            .filter(|style| style.id == STYLE_ELEMENT_ID)
            .count();
        assert_eq!(count, 1);
    }

    #[test]
    fn artifact_serializes_theme_mode_variable_nesting() {
        let tokens = sample_tokens();
        let json = serde_json::to_value(&tokens).unwrap();
        assert_eq!(json["dive"]["light"]["--Gap"], "8px");

        let parsed: ResolvedTokens = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, tokens);
    }
}
