//! Build configuration.
//!
//! Every field has a default, so an empty TOML file is a valid config:
//!
//! ```toml
//! # Top-level set of the document to build (whole document when absent).
//! root = "global"
//! # Path prefixes whose colors are referenced through channel variables.
//! paste_as_var = ["palette"]
//! digits_suffix = "digits"
//! max_reference_depth = 64
//! ```

use crate::types::{DEFAULT_DIGITS_SUFFIX, DEFAULT_PASTE_AS_VAR};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BuildConfig {
    pub root: Option<String>,
    pub paste_as_var: Vec<String>,
    pub digits_suffix: String,
    /// Longest reference chain followed before the build gives up with a
    /// cyclic-reference error.
    pub max_reference_depth: usize,
}

impl Default for BuildConfig {
    fn default() -> Self {
        BuildConfig {
            root: None,
            paste_as_var: DEFAULT_PASTE_AS_VAR.iter().map(|s| s.to_string()).collect(),
            digits_suffix: DEFAULT_DIGITS_SUFFIX.to_string(),
            max_reference_depth: 64,
        }
    }
}

impl BuildConfig {
    /// True when colors referencing `path` go through a digits variable.
    pub fn is_paste_as_var(&self, path: &str) -> bool {
        self.paste_as_var.iter().any(|prefix| {
            path == prefix
                || path
                    .strip_prefix(prefix.as_str())
                    .is_some_and(|rest| rest.starts_with('.'))
        })
    }
}
