use serde::{Deserialize, Serialize};
use thiserror::Error;

const MANIFEST_BANNER: &str = "// Auto-generated by cascade-tokens";

pub type ThemeResult<T> = std::result::Result<T, ThemeError>;

#[derive(Debug, Error)]
pub enum ThemeError {
    #[error("failed to serialize theme manifest")]
    Serialize(#[from] serde_json::Error),
}

/// One published theme: its modes and the stylesheet that imports them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeEntry {
    pub name: String,
    pub modes: Vec<String>,
    pub css: String,
}

impl ThemeEntry {
    pub fn new(name: &str, modes: &[String], css_base: &str) -> Self {
        Self {
            name: name.to_string(),
            modes: modes.to_vec(),
            css: theme_index_href(css_base, name),
        }
    }
}

/// Path of a theme's `index.css` as seen by consumers of the manifest.
pub fn theme_index_href(css_base: &str, theme: &str) -> String {
    let base = css_base.trim_end_matches('/');
    if base.is_empty() {
        return format!("{theme}/index.css");
    }
    format!("{base}/{theme}/index.css")
}

/// ES module exporting `themes`, the list Storybook registers.
pub fn render_manifest(entries: &[ThemeEntry]) -> ThemeResult<String> {
    let themes = serde_json::to_string_pretty(entries)?;
    Ok(format!("{MANIFEST_BANNER}\nexport const themes = {themes};\n"))
}
