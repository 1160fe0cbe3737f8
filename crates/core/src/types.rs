//! Shared token definitions: type tags, font weights, unit rules.
//!
//! The loader, the resolver and the transformers all read from these
//! tables so the tag set cannot drift between them.

use std::fmt;

/// The transformer a leaf is routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenType {
    Color,
    Typography,
    BoxShadow,
    Scalar,
}

impl TokenType {
    /// Map a document `type` tag to a transformer. `None` means the tag is
    /// not one this engine knows how to emit.
    pub fn from_tag(tag: &str) -> Option<TokenType> {
        match tag {
            COLOR => Some(TokenType::Color),
            TYPOGRAPHY => Some(TokenType::Typography),
            BOX_SHADOW => Some(TokenType::BoxShadow),
            t if SCALAR_TAGS.contains(&t) => Some(TokenType::Scalar),
            _ => None,
        }
    }

    pub fn tag(self) -> &'static str {
        match self {
            TokenType::Color => COLOR,
            TokenType::Typography => TYPOGRAPHY,
            TokenType::BoxShadow => BOX_SHADOW,
            TokenType::Scalar => SCALAR,
        }
    }
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

pub const COLOR: &str = "color";
pub const TYPOGRAPHY: &str = "typography";
pub const BOX_SHADOW: &str = "boxShadow";
pub const SCALAR: &str = "scalar";

/// Tags emitted as a single resolved value. Tokens Studio exports use the
/// finer-grained names; they all share the scalar transformer.
pub const SCALAR_TAGS: &[&str] = &[
    SCALAR,
    "sizing",
    "spacing",
    "dimension",
    "borderRadius",
    "borderWidth",
    "opacity",
    "fontFamilies",
    "fontWeights",
    "fontSizes",
    "lineHeights",
    "letterSpacing",
    "paragraphSpacing",
    "textCase",
    "textDecoration",
    "number",
    "other",
];

/// Scalar tags whose bare numbers stay unitless when emitted as variables.
pub const UNITLESS_TAGS: &[&str] = &["fontWeights", "opacity", "number"];

/// Named font weights and their numeric values.
pub const FONT_WEIGHTS: &[(&str, u16)] = &[
    ("Thin", 100),
    ("Extra Light", 200),
    ("Light", 300),
    ("Normal", 400),
    ("Regular", 400),
    ("Medium", 500),
    ("Semi Bold", 600),
    ("Bold", 700),
    ("Extra Bold", 800),
];

pub fn font_weight(name: &str) -> Option<u16> {
    FONT_WEIGHTS
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, w)| *w)
}

/// CSS properties that take a `px` unit when their value is a bare number.
pub const PROPERTIES_IN_PX: &[&str] = &["font-size", "line-height", "letter-spacing"];

/// Typography fields that are never written to CSS.
pub const EXCLUDED_TYPOGRAPHY_FIELDS: &[&str] = &["paragraphSpacing", "textCase"];

pub const DEFAULT_DIGITS_SUFFIX: &str = "digits";

pub const DEFAULT_PASTE_AS_VAR: &[&str] = &["palette"];

/// Box-shadow layer `type` that renders as `inset`.
pub const INNER_SHADOW: &str = "innerShadow";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_studio_tags_are_scalar() {
        assert_eq!(TokenType::from_tag("spacing"), Some(TokenType::Scalar));
        assert_eq!(TokenType::from_tag("borderRadius"), Some(TokenType::Scalar));
        assert_eq!(TokenType::from_tag("boxShadow"), Some(TokenType::BoxShadow));
        assert_eq!(TokenType::from_tag("composition"), None);
    }

    #[test]
    fn font_weight_lookup_is_exact() {
        assert_eq!(font_weight("Semi Bold"), Some(600));
        assert_eq!(font_weight("Regular"), Some(400));
        assert_eq!(font_weight("bold"), None);
    }
}
