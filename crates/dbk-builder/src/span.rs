//! Inline span kinds and their DocBook elements.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Abstract inline emphasis kind.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum SpanKind {
    Bold,
    Strong,
    Citation,
    Code,
    Deleted,
    Emphasis,
    Inserted,
    Underlined,
    Italic,
    Quote,
    Span,
    Subscript,
    Superscript,
    Monospace,
    /// Hyperlink; the target is read from the span's `href` attribute.
    Link,
    /// A kind with no DocBook mapping. Rendered as `phrase`.
    Other(String),
}

/// Output element for a mapped span kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct SpanElement {
    pub name: &'static str,
    pub role: Option<&'static str>,
}

impl SpanElement {
    const fn plain(name: &'static str) -> Self {
        Self { name, role: None }
    }

    const fn emphasis(role: &'static str) -> Self {
        Self {
            name: "emphasis",
            role: Some(role),
        }
    }
}

/// Element used for kinds without a mapping.
pub(crate) const FALLBACK: SpanElement = SpanElement::plain("phrase");

impl SpanKind {
    /// Canonical kebab-case name.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Bold => "bold",
            Self::Strong => "strong",
            Self::Citation => "citation",
            Self::Code => "code",
            Self::Deleted => "deleted",
            Self::Emphasis => "emphasis",
            Self::Inserted => "inserted",
            Self::Underlined => "underlined",
            Self::Italic => "italic",
            Self::Quote => "quote",
            Self::Span => "span",
            Self::Subscript => "subscript",
            Self::Superscript => "superscript",
            Self::Monospace => "monospace",
            Self::Link => "link",
            Self::Other(name) => name,
        }
    }

    /// Element for this kind. `None` for links, which depend on their
    /// target, and for unmapped kinds.
    pub(crate) fn element(&self) -> Option<SpanElement> {
        let element = match self {
            Self::Bold | Self::Strong => SpanElement::emphasis("bold"),
            Self::Citation => SpanElement::plain("citation"),
            Self::Code => SpanElement::plain("code"),
            Self::Deleted => SpanElement::emphasis("del"),
            Self::Emphasis => SpanElement::plain("emphasis"),
            Self::Inserted => SpanElement::emphasis("ins"),
            Self::Underlined => SpanElement::emphasis("underline"),
            Self::Italic => SpanElement::emphasis("italic"),
            Self::Quote => SpanElement::plain("quote"),
            Self::Span => SpanElement::plain("phrase"),
            Self::Subscript => SpanElement::plain("subscript"),
            Self::Superscript => SpanElement::plain("superscript"),
            Self::Monospace => SpanElement::plain("literal"),
            Self::Link | Self::Other(_) => return None,
        };
        Some(element)
    }
}

impl FromStr for SpanKind {
    type Err = Infallible;

    /// Parse a span kind name. Case and `_`/`-` separators are ignored;
    /// unknown names become [`SpanKind::Other`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let kind = match s.to_ascii_lowercase().replace('_', "-").as_str() {
            "bold" => Self::Bold,
            "strong" => Self::Strong,
            "citation" => Self::Citation,
            "code" => Self::Code,
            "deleted" => Self::Deleted,
            "emphasis" => Self::Emphasis,
            "inserted" => Self::Inserted,
            "underlined" => Self::Underlined,
            "italic" => Self::Italic,
            "quote" => Self::Quote,
            "span" => Self::Span,
            "subscript" => Self::Subscript,
            "superscript" => Self::Superscript,
            "monospace" => Self::Monospace,
            "link" => Self::Link,
            _ => Self::Other(s.to_owned()),
        };
        Ok(kind)
    }
}

impl fmt::Display for SpanKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
