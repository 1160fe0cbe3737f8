//! Token walker: traverses the tree and fills the stylesheet.
//!
//! [`Builder`] owns one build. Reference resolution lives in
//! `resolve.rs` and the per-type transformers in `transform.rs`; both are
//! further `impl Builder` blocks.

use crate::config::BuildConfig;
use crate::error::BuildError;
use crate::naming::{add_px_suffix, css_class_name, css_var_name, join_path};
use crate::resolve::Chain;
use crate::stylesheet::Stylesheet;
use crate::tree::{TokenGroup, TokenLeaf, TokenNode, TokenTree};
use crate::types::TokenType;
use log::debug;
use std::collections::HashSet;

/// Builds one stylesheet from one token tree.
///
/// `build()` runs the traversal once; later calls return the same
/// stylesheet without appending to it. A failed build leaves the
/// stylesheet empty.
pub struct Builder<'a> {
    pub(crate) tree: &'a TokenTree,
    pub(crate) config: &'a BuildConfig,
    pub(crate) sheet: Stylesheet,
    /// Referenced paths whose digits variable is already in `sheet`.
    pub(crate) digits_emitted: HashSet<String>,
    built: bool,
}

impl<'a> Builder<'a> {
    pub fn new(tree: &'a TokenTree, config: &'a BuildConfig) -> Self {
        Builder {
            tree,
            config,
            sheet: Stylesheet::new(),
            digits_emitted: HashSet::new(),
            built: false,
        }
    }

    pub fn build(&mut self) -> Result<&Stylesheet, BuildError> {
        if self.built {
            debug!("stylesheet already built; skipping traversal");
            return Ok(&self.sheet);
        }
        let tree = self.tree;
        if let Err(e) = self.walk_group(tree.root(), "") {
            self.sheet.clear();
            self.digits_emitted.clear();
            return Err(e);
        }
        self.built = true;
        debug!(
            "built {} custom properties and {} classes",
            self.sheet.variable_count(),
            self.sheet.class_count()
        );
        Ok(&self.sheet)
    }

    /// Build (if needed) and render the stylesheet text.
    pub fn render(&mut self) -> Result<String, BuildError> {
        Ok(self.build()?.render())
    }

    pub fn stylesheet(&self) -> &Stylesheet {
        &self.sheet
    }

    fn walk_group(&mut self, group: &'a TokenGroup, prefix: &str) -> Result<(), BuildError> {
        for (key, node) in &group.children {
            let path = join_path(prefix, key);
            match node {
                TokenNode::Group(child) => self.walk_group(child, &path)?,
                TokenNode::Leaf(leaf) => self.add_leaf(&path, leaf)?,
            }
        }
        Ok(())
    }

    fn add_leaf(&mut self, path: &str, leaf: &'a TokenLeaf) -> Result<(), BuildError> {
        let mut chain = Chain::new(path, self.config.max_reference_depth);
        let text = self.resolve_leaf(leaf, &mut chain)?;
        if leaf.token_type() == Some(TokenType::Typography) {
            debug!("class .{} from '{}'", css_class_name(path), path);
            self.sheet.add_class(path, text);
        } else {
            let value = if leaf.takes_px() {
                add_px_suffix(&text)
            } else {
                text
            };
            debug!("{} = {}", css_var_name(path), value);
            self.sheet.add_variable(path, value);
        }
        Ok(())
    }
}

/// Build and render in one step.
pub fn build_stylesheet(tree: &TokenTree, config: &BuildConfig) -> Result<String, BuildError> {
    Builder::new(tree, config).render()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn tree(doc: serde_json::Value) -> TokenTree {
        TokenTree::from_json(&doc).unwrap()
    }

    #[test]
    fn scalars_become_px_variables() {
        let t = tree(json!({
            "spacing": {
                "base": { "value": "8" },
                "double": { "value": "{spacing.base}*2" },
                "relative": { "value": "1.5rem" }
            },
            "weight": { "value": "Bold", "type": "fontWeights" },
            "fade": { "value": "0.4", "type": "opacity" }
        }));
        let cfg = BuildConfig::default();
        let mut b = Builder::new(&t, &cfg);
        let sheet = b.build().unwrap();
        assert_eq!(sheet.variable("--spacing-base"), Some("8px"));
        assert_eq!(sheet.variable("--spacing-double"), Some("16px"));
        assert_eq!(sheet.variable("--spacing-relative"), Some("1.5rem"));
        assert_eq!(sheet.variable("--weight"), Some("700"));
        assert_eq!(sheet.variable("--fade"), Some("0.4"));
    }

    #[test]
    fn typography_becomes_class() {
        let t = tree(json!({
            "heading": {
                "h1": {
                    "type": "typography",
                    "value": { "fontFamily": "Inter", "fontSize": "32" }
                }
            }
        }));
        let cfg = BuildConfig::default();
        let mut b = Builder::new(&t, &cfg);
        let sheet = b.build().unwrap();
        assert_eq!(sheet.variable_count(), 0);
        assert_eq!(
            sheet.class("heading-h1"),
            Some("font-family: Inter;\n    font-size: 32px;")
        );
    }

    #[test]
    fn second_build_is_a_no_op() {
        let t = tree(json!({
            "palette": { "primary": { "type": "color", "value": "#112233" } },
            "bg": { "type": "color", "value": "{palette.primary}80" }
        }));
        let cfg = BuildConfig::default();
        let mut b = Builder::new(&t, &cfg);
        let first = b.render().unwrap();
        let len = b.stylesheet().len();
        let second = b.render().unwrap();
        assert_eq!(first, second);
        assert_eq!(b.stylesheet().len(), len);
    }

    #[test]
    fn failed_build_leaves_nothing_behind() {
        let t = tree(json!({
            "palette": { "primary": { "type": "color", "value": "#112233" } },
            "a": { "type": "color", "value": "{palette.primary}" },
            "b": { "value": "{missing}" }
        }));
        let cfg = BuildConfig::default();
        let mut b = Builder::new(&t, &cfg);
        let err = b.build().unwrap_err();
        assert_eq!(
            err,
            BuildError::UnresolvedReference {
                path: "b".to_string(),
                reference: "missing".to_string()
            }
        );
        assert!(b.stylesheet().is_empty());
        // The tree is still broken, so a retry fails the same way.
        assert_eq!(b.build().unwrap_err(), err);
    }

    #[test]
    fn unknown_type_reports_leaf_path() {
        let t = tree(json!({ "fx": { "blur": { "type": "composition", "value": "x" } } }));
        let cfg = BuildConfig::default();
        assert_eq!(
            build_stylesheet(&t, &cfg).unwrap_err(),
            BuildError::UnknownTokenType {
                path: "fx.blur".to_string(),
                token_type: "composition".to_string()
            }
        );
    }

    #[test]
    fn empty_tree_renders_empty_root() {
        let t = TokenTree::default();
        let cfg = BuildConfig::default();
        assert_eq!(build_stylesheet(&t, &cfg).unwrap(), ":root {\n}\n");
    }
}
