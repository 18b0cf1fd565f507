use crate::tokens::{Token, TokenPath, TokenTree};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerKind {
    Layout,
    Component,
    Mode,
    Theme,
}

impl LayerKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Layout => "layout",
            Self::Component => "component",
            Self::Mode => "mode",
            Self::Theme => "theme",
        }
    }
}

/// One step of the cascade. The resolver asks each layer in priority order
/// and stops at the first one that defines the path.
pub trait TokenLayer {
    fn kind(&self) -> LayerKind;
    fn lookup(&self, path: &TokenPath) -> Option<&Token>;
}

/// A layer backed by a borrowed token tree.
#[derive(Debug, Clone, Copy)]
pub struct Layer<'a> {
    kind: LayerKind,
    tree: &'a TokenTree,
}

impl<'a> Layer<'a> {
    pub const fn new(kind: LayerKind, tree: &'a TokenTree) -> Self {
        Self { kind, tree }
    }
}

impl TokenLayer for Layer<'_> {
    fn kind(&self) -> LayerKind {
        self.kind
    }

    fn lookup(&self, path: &TokenPath) -> Option<&Token> {
        self.tree.lookup(path)
    }
}
