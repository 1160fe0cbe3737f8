//! Reference resolution: `{dotted.path}` substitution inside raw values.
//!
//! Every reference target is resolved through the same type dispatch as a
//! top-level leaf before it is substituted, so references nest
//! transitively. A [`Chain`] of the paths being resolved is threaded
//! through each top-level leaf to catch cycles.

use crate::arithmetic;
use crate::build::Builder;
use crate::error::BuildError;
use crate::tree::{TokenLeaf, TokenValue};
use crate::types::{font_weight, SCALAR};
use log::trace;
use regex::Regex;
use std::sync::LazyLock;

/// `{path}` anywhere in a value. Stops at the first closing brace.
static REFERENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([^{}]+)\}").expect("reference pattern is valid"));

/// The paths currently being resolved for one top-level leaf.
#[derive(Debug, Clone)]
pub(crate) struct Chain {
    root: String,
    stack: Vec<String>,
    max_depth: usize,
}

impl Chain {
    pub(crate) fn new(root: &str, max_depth: usize) -> Self {
        Chain {
            root: root.to_owned(),
            stack: vec![root.to_owned()],
            max_depth,
        }
    }

    /// A chain for a value that is not itself a leaf of the tree. `label`
    /// is only used in error messages.
    pub(crate) fn detached(label: &str, max_depth: usize) -> Self {
        Chain {
            root: label.to_owned(),
            stack: Vec::new(),
            max_depth,
        }
    }

    /// Path of the leaf this chain started from.
    pub(crate) fn root(&self) -> &str {
        &self.root
    }

    pub(crate) fn enter(&mut self, path: &str) -> Result<(), BuildError> {
        if self.stack.iter().any(|p| p == path) || self.stack.len() >= self.max_depth {
            let mut chain = self.stack.clone();
            chain.push(path.to_owned());
            return Err(BuildError::CyclicReference {
                path: self.root.clone(),
                chain,
            });
        }
        self.stack.push(path.to_owned());
        Ok(())
    }

    pub(crate) fn leave(&mut self) {
        self.stack.pop();
    }
}

/// The path inside a value that is exactly one reference, e.g.
/// `"{typography.body}"`.
pub(crate) fn whole_reference(raw: &str) -> Option<&str> {
    let inner = raw.trim().strip_prefix('{')?.strip_suffix('}')?;
    if inner.contains(['{', '}']) || inner.trim().is_empty() {
        return None;
    }
    Some(inner.trim())
}

impl<'a> Builder<'a> {
    /// Resolve a raw value that is not part of the tree: substitute its
    /// references, map font-weight names and evaluate arithmetic.
    pub fn resolve(&mut self, raw: &str) -> Result<String, BuildError> {
        let mut chain = Chain::detached(raw, self.config.max_reference_depth);
        self.resolve_text(raw, &mut chain)
    }

    /// The fully resolved value of the leaf at `path`, as `{path}` would
    /// substitute it.
    pub fn resolve_path(&mut self, path: &str) -> Result<String, BuildError> {
        let mut chain = Chain::detached(path, self.config.max_reference_depth);
        self.resolve_reference(path, &mut chain)
    }

    /// Look up the leaf a reference points at.
    pub(crate) fn lookup(&self, reference: &str, chain: &Chain) -> Result<&'a TokenLeaf, BuildError> {
        self.tree
            .leaf(reference)
            .ok_or_else(|| BuildError::UnresolvedReference {
                path: chain.root().to_owned(),
                reference: reference.to_owned(),
            })
    }

    /// Resolve one `{reference}` to its final text. A typography token
    /// has no single value and cannot be substituted.
    pub(crate) fn resolve_reference(
        &mut self,
        reference: &str,
        chain: &mut Chain,
    ) -> Result<String, BuildError> {
        let leaf = self.lookup(reference, chain)?;
        if matches!(leaf.value, TokenValue::Typography(_)) {
            return Err(BuildError::TypeMismatch {
                path: chain.root().to_owned(),
                reference: reference.to_owned(),
                expected: SCALAR,
            });
        }
        chain.enter(reference)?;
        trace!("{}: resolving {{{}}}", chain.root(), reference);
        let resolved = self.resolve_leaf(leaf, chain);
        chain.leave();
        resolved
    }

    /// Type dispatch shared by the walker and reference resolution.
    pub(crate) fn resolve_leaf(
        &mut self,
        leaf: &'a TokenLeaf,
        chain: &mut Chain,
    ) -> Result<String, BuildError> {
        match &leaf.value {
            TokenValue::Scalar(raw) => self.resolve_text(raw, chain),
            TokenValue::Color(raw) => self.color_in(raw, chain),
            TokenValue::Typography(value) => self.typography_in(value, chain),
            TokenValue::BoxShadow(layers) => self.shadow_in(layers, chain),
            TokenValue::Unknown { tag } => Err(BuildError::UnknownTokenType {
                path: chain.root().to_owned(),
                token_type: tag.clone(),
            }),
        }
    }

    /// Scalar rules: substitute every reference, then map a font-weight
    /// name to its number or evaluate arithmetic.
    pub(crate) fn resolve_text(&mut self, raw: &str, chain: &mut Chain) -> Result<String, BuildError> {
        let mut out = String::with_capacity(raw.len());
        let mut last = 0;
        for caps in REFERENCE.captures_iter(raw) {
            let (Some(whole), Some(path)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            out.push_str(&raw[last..whole.start()]);
            out.push_str(&self.resolve_reference(path.as_str().trim(), chain)?);
            last = whole.end();
        }
        out.push_str(&raw[last..]);

        if let Some(weight) = font_weight(&out) {
            return Ok(weight.to_string());
        }

        if arithmetic::needs_evaluation(&out) {
            return arithmetic::evaluate(&out).map_err(|e| {
                BuildError::InvalidArithmeticExpression {
                    path: chain.root().to_owned(),
                    expression: out.clone(),
                    message: e.message,
                }
            });
        }

        Ok(out)
    }
}
