//! Error types for loading and building a token document.

/// A failure while building the stylesheet. Every variant carries the path
/// of the leaf whose build was in progress.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    /// A `{path}` reference names no leaf in the tree.
    #[error("{path}: unresolved reference '{{{reference}}}'")]
    UnresolvedReference { path: String, reference: String },

    /// A reference chain revisits a path, or nests deeper than the
    /// configured limit.
    #[error("{path}: cyclic reference detected: {}", .chain.join(" \u{2192} "))]
    CyclicReference { path: String, chain: Vec<String> },

    /// A color value is not `#RRGGBB`, `#RRGGBBAA` or `{ref}` with an
    /// optional two-digit alpha suffix.
    #[error("{path}: invalid color '{value}'")]
    InvalidColorFormat { path: String, value: String },

    /// A value containing arithmetic operators could not be evaluated.
    #[error("{path}: invalid arithmetic expression '{expression}': {message}")]
    InvalidArithmeticExpression {
        path: String,
        expression: String,
        message: String,
    },

    /// The leaf declares a `type` no transformer handles.
    #[error("{path}: unknown token type '{token_type}'")]
    UnknownTokenType { path: String, token_type: String },

    /// A whole-value reference points at a token of the wrong type, e.g. a
    /// typography value of `"{spacing.base}"`.
    #[error("{path}: '{{{reference}}}' is not a {expected} token")]
    TypeMismatch {
        path: String,
        reference: String,
        expected: &'static str,
    },
}

impl BuildError {
    /// Path of the leaf whose build failed.
    pub fn path(&self) -> &str {
        match self {
            BuildError::UnresolvedReference { path, .. }
            | BuildError::CyclicReference { path, .. }
            | BuildError::InvalidColorFormat { path, .. }
            | BuildError::InvalidArithmeticExpression { path, .. }
            | BuildError::UnknownTokenType { path, .. }
            | BuildError::TypeMismatch { path, .. } => path,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            BuildError::UnresolvedReference { .. } => "UnresolvedReference",
            BuildError::CyclicReference { .. } => "CyclicReference",
            BuildError::InvalidColorFormat { .. } => "InvalidColorFormat",
            BuildError::InvalidArithmeticExpression { .. } => "InvalidArithmeticExpression",
            BuildError::UnknownTokenType { .. } => "UnknownTokenType",
            BuildError::TypeMismatch { .. } => "TypeMismatch",
        }
    }

    /// Machine-readable form used by `--output json`.
    pub fn to_json_value(&self) -> serde_json::Value {
        serde_json::json!({
            "kind":    self.kind(),
            "path":    self.path(),
            "message": self.to_string(),
        })
    }
}

/// A token document whose shape cannot be turned into a token tree.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DocumentError {
    /// The document root (or the selected set) is not a JSON object.
    #[error("document root must be an object")]
    RootNotObject,

    /// `--root` named a set the document does not have.
    #[error("document has no top-level set '{0}'")]
    MissingSet(String),

    /// A group member is neither an object nor a leaf.
    #[error("{path}: expected a token group or a token with a 'value' field")]
    NotAToken { path: String },

    /// A leaf's `value` has the wrong JSON shape for its type.
    #[error("{path}: {message}")]
    InvalidValue { path: String, message: String },
}

impl DocumentError {
    pub fn to_json_value(&self) -> serde_json::Value {
        let path = match self {
            DocumentError::NotAToken { path } | DocumentError::InvalidValue { path, .. } => {
                Some(path.as_str())
            }
            _ => None,
        };
        serde_json::json!({
            "kind":    "Document",
            "path":    path,
            "message": self.to_string(),
        })
    }
}
