//! tokencss-core: design-token resolution and CSS generation.
//!
//! Turns a token document (colors, typography, shadows, scalar
//! measurements) into a stylesheet of `:root` custom properties and
//! typography classes.
//!
//! # Public API
//!
//! - [`TokenTree::from_json()`] -- load a parsed JSON document
//! - [`Builder`] -- one build: [`Builder::build()`], [`Builder::render()`],
//!   plus the individual transformers ([`Builder::resolve()`],
//!   [`Builder::parse_color()`], [`Builder::parse_typography()`],
//!   [`Builder::parse_shadow()`])
//! - [`build_stylesheet()`] -- load-free convenience: build and render
//! - [`BuildConfig`] -- paste-as-variable prefixes, digits suffix, depth limit
//! - [`BuildError`], [`DocumentError`]
//!
//! The [`naming`] and [`color`] modules are stateless helpers and can be
//! used on their own.

pub mod arithmetic;
pub mod build;
pub mod color;
pub mod config;
pub mod error;
pub mod naming;
mod resolve;
pub mod stylesheet;
mod transform;
pub mod tree;
pub mod types;

// ── Convenience re-exports ───────────────────────────────────────────

pub use build::{build_stylesheet, Builder};
pub use config::BuildConfig;
pub use error::{BuildError, DocumentError};
pub use stylesheet::Stylesheet;
pub use tree::{ShadowLayer, TokenGroup, TokenLeaf, TokenNode, TokenTree, TokenValue, TypographyValue};
pub use types::TokenType;
