use std::fmt;

/// Dot-separated key sequence addressing a token inside a tree,
/// e.g. `Color.Base.Background.default`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TokenPath {
    segments: Vec<String>,
}

impl TokenPath {
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            segments: segments.into_iter().map(Into::into).collect(),
        }
    }

    pub fn root() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    /// Split a dotted string. Empty input yields an empty path.
    pub fn parse(dotted: &str) -> Self {
        if dotted.is_empty() {
            return Self::root();
        }
        Self::new(dotted.split('.'))
    }

    /// Parse a `{Some.Path}` reference. Anything else is a literal and yields `None`.
    pub fn from_reference(raw: &str) -> Option<Self> {
        let inner = raw.strip_prefix('{')?.strip_suffix('}')?;
        if inner.is_empty() {
            return None;
        }
        Some(Self::parse(inner))
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn child(&self, key: &str) -> Self {
        let mut segments = self.segments.clone();
        segments.push(key.to_string());
        Self { segments }
    }

    pub fn dotted(&self) -> String {
        self.segments.join(".")
    }
}

impl fmt::Display for TokenPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.dotted())
    }
}

impl From<&str> for TokenPath {
    fn from(value: &str) -> Self {
        Self::parse(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_splits_on_dots_and_keeps_case() {
        let path = TokenPath::parse("Color.Base.Background.default");
        assert_eq!(
            path.segments(),
            &["Color", "Base", "Background", "default"]
        );
        assert_eq!(path.to_string(), "Color.Base.Background.default");
    }

    #[test]
    fn from_reference_requires_braces() {
        assert_eq!(
            TokenPath::from_reference("{Spacing.small}"),
            Some(TokenPath::parse("Spacing.small"))
        );
        assert_eq!(TokenPath::from_reference("#ffffff"), None);
        assert_eq!(TokenPath::from_reference("{Spacing.small"), None);
        assert_eq!(TokenPath::from_reference("{}"), None);
    }

    #[test]
    fn child_appends_without_mutating_parent() {
        let parent = TokenPath::parse("Color.Base");
        let child = parent.child("Primary Background");
        assert_eq!(parent.segments().len(), 2);
        assert_eq!(child.segments().last().map(String::as_str), Some("Primary Background"));
    }
}
