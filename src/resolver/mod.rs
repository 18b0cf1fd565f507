//! Cascading token resolution.
//!
//! A [`TokenResolver`] owns an ordered list of layers (local token set, then
//! mode, then theme) and turns a [`TokenPath`] into a literal value by
//! following `{Reference}` hops through the same cascade. Results are
//! memoized per path for the lifetime of the resolver.

use std::collections::HashMap;

use thiserror::Error;

use crate::tokens::{TokenPath, TokenSet, TokenTree, TokenType, TokenValue};

mod layer;

pub use layer::{Layer, LayerKind, TokenLayer};

pub type ResolveResult<T> = std::result::Result<T, ResolveError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("circular reference detected in mode `{mode}`: {}", format_chain(.chain))]
    CircularReference { chain: Vec<TokenPath>, mode: String },
    #[error("unresolved token `{path}` in mode `{mode}`{}", format_requester(.requested_by))]
    Unresolved {
        path: TokenPath,
        requested_by: Option<TokenPath>,
        mode: String,
    },
    #[error("invalid token `{path}` in mode `{mode}`: {reason}")]
    InvalidValue {
        path: TokenPath,
        reason: String,
        mode: String,
    },
}

fn format_chain(chain: &[TokenPath]) -> String {
    chain
        .iter()
        .map(TokenPath::dotted)
        .collect::<Vec<_>>()
        .join(" -> ")
}

fn format_requester(requested_by: &Option<TokenPath>) -> String {
    requested_by
        .as_ref()
        .map(|path| format!(" (referenced by `{path}`)"))
        .unwrap_or_default()
}

/// Terminal literal after all reference hops, tagged with the token type used
/// for CSS formatting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedValue {
    pub value: String,
    pub token_type: Option<TokenType>,
}

pub struct TokenResolver<'a> {
    mode: String,
    layers: Vec<Box<dyn TokenLayer + 'a>>,
    cache: HashMap<TokenPath, ResolvedValue>,
    in_progress: Vec<TokenPath>,
    layer_lookups: usize,
}

impl<'a> TokenResolver<'a> {
    /// `layers` are consulted in the given order; the first hit wins.
    pub fn new(mode: impl Into<String>, layers: Vec<Box<dyn TokenLayer + 'a>>) -> Self {
        Self {
            mode: mode.into(),
            layers,
            cache: HashMap::new(),
            in_progress: Vec::new(),
            layer_lookups: 0,
        }
    }

    /// Standard cascade for one (token set, mode, theme) combination.
    pub fn for_token_set(
        token_set: TokenSet,
        local: &'a TokenTree,
        mode: &str,
        mode_tree: &'a TokenTree,
        theme_tree: &'a TokenTree,
    ) -> Self {
        let local_kind = match token_set {
            TokenSet::Component => LayerKind::Component,
            TokenSet::Layout => LayerKind::Layout,
        };
        Self::new(
            mode,
            vec![
                Box::new(Layer::new(local_kind, local)),
                Box::new(Layer::new(LayerKind::Mode, mode_tree)),
                Box::new(Layer::new(LayerKind::Theme, theme_tree)),
            ],
        )
    }

    pub fn mode(&self) -> &str {
        &self.mode
    }

    /// Number of individual layer lookups performed so far.
    pub fn layer_lookups(&self) -> usize {
        self.layer_lookups
    }

    pub fn resolve(&mut self, path: &TokenPath) -> ResolveResult<ResolvedValue> {
        self.resolve_from(path, None)
    }

    fn resolve_from(
        &mut self,
        path: &TokenPath,
        requested_by: Option<&TokenPath>,
    ) -> ResolveResult<ResolvedValue> {
        if let Some(hit) = self.cache.get(path) {
            return Ok(hit.clone());
        }

        if self.in_progress.contains(path) {
            let mut chain = self.in_progress.clone();
            chain.push(path.clone());
            return Err(ResolveError::CircularReference {
                chain,
                mode: self.mode.clone(),
            });
        }

        let (value, token_type) = self.find_in_layers(path).ok_or_else(|| {
            ResolveError::Unresolved {
                path: path.clone(),
                requested_by: requested_by.cloned(),
                mode: self.mode.clone(),
            }
        })?;

        self.in_progress.push(path.clone());
        let outcome = match value {
            TokenValue::Literal(value) => Ok(ResolvedValue { value, token_type }),
            TokenValue::Reference(target) => {
                self.resolve_from(&target, Some(path)).map(|resolved| ResolvedValue {
                    token_type: resolved.token_type.or(token_type),
                    value: resolved.value,
                })
            }
            TokenValue::Invalid(reason) => Err(ResolveError::InvalidValue {
                path: path.clone(),
                reason,
                mode: self.mode.clone(),
            }),
        };
        self.in_progress.pop();

        let resolved = outcome?;
        self.cache.insert(path.clone(), resolved.clone());
        Ok(resolved)
    }

    fn find_in_layers(&mut self, path: &TokenPath) -> Option<(TokenValue, Option<TokenType>)> {
        let mut lookups = 0;
        let found = self.layers.iter().find_map(|layer| {
            lookups += 1;
            let token = layer.lookup(path)?;
            tracing::trace!(token = %path, layer = layer.kind().as_str(), "token found");
            Some((token.value.clone(), token.token_type))
        });
        self.layer_lookups += lookups;
        found
    }
}
