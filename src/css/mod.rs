//! CSS custom property emission for one token tree and one mode.

use std::collections::HashSet;
use std::ops::AddAssign;

use crate::resolver::{ResolveError, TokenResolver};
use crate::tokens::TokenTree;

mod format;

pub use format::{css_var_name, format_css_value, mode_selector};

/// Written in place of a value that could not be resolved.
pub const UNRESOLVED_PLACEHOLDER: &str = "/* unresolved */";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CssDeclaration {
    pub name: String,
    pub value: String,
    pub resolved: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EmitStats {
    pub variables: usize,
    pub unresolved: usize,
    pub duplicates: usize,
}

impl AddAssign for EmitStats {
    fn add_assign(&mut self, other: Self) {
        self.variables += other.variables;
        self.unresolved += other.unresolved;
        self.duplicates += other.duplicates;
    }
}

#[derive(Debug, Clone)]
pub struct ModeBlock {
    pub mode: String,
    pub declarations: Vec<CssDeclaration>,
    pub stats: EmitStats,
    pub errors: Vec<ResolveError>,
}

impl ModeBlock {
    pub fn to_css(&self) -> String {
        let mut css = format!("{} {{\n", mode_selector(&self.mode));
        for declaration in &self.declarations {
            css.push_str(&format!("  {}: {};\n", declaration.name, declaration.value));
        }
        css.push('}');
        css
    }

    /// Successfully resolved declarations, in emission order.
    pub fn resolved(&self) -> impl Iterator<Item = &CssDeclaration> {
        self.declarations.iter().filter(|declaration| declaration.resolved)
    }
}

/// Walk `tree` depth-first and resolve every token through `resolver`.
///
/// A failed resolution never aborts the walk: the declaration is emitted with
/// [`UNRESOLVED_PLACEHOLDER`] and counted. Colliding variable names are
/// counted as duplicates and both declarations are kept.
pub fn emit_mode_block(tree: &TokenTree, resolver: &mut TokenResolver<'_>) -> ModeBlock {
    let mode = resolver.mode().to_string();
    let mut declarations = Vec::new();
    let mut stats = EmitStats::default();
    let mut errors = Vec::new();
    let mut seen = HashSet::new();

    for (path, token) in tree.leaves() {
        let name = css_var_name(&path);
        if !seen.insert(name.clone()) {
            tracing::warn!(variable = %name, token = %path, mode = %mode, "duplicate css variable");
            stats.duplicates += 1;
        }

        match resolver.resolve(&path) {
            Ok(resolved) => {
                let value = format_css_value(&resolved.value, token.token_type.or(resolved.token_type));
                tracing::debug!(variable = %name, value = %value, mode = %mode, "resolved");
                stats.variables += 1;
                declarations.push(CssDeclaration {
                    name,
                    value,
                    resolved: true,
                });
            }
            Err(err) => {
                tracing::error!("{err}");
                stats.unresolved += 1;
                errors.push(err);
                declarations.push(CssDeclaration {
                    name,
                    value: UNRESOLVED_PLACEHOLDER.to_string(),
                    resolved: false,
                });
            }
        }
    }

    ModeBlock {
        mode,
        declarations,
        stats,
        errors,
    }
}
