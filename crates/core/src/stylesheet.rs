//! Ordered accumulation of custom properties and classes.

use crate::naming::{css_class_name, css_var_name};
use indexmap::IndexMap;
use log::warn;

/// Indentation of declarations inside a rule.
pub const INDENT: &str = "    ";

/// The generated stylesheet: `:root` custom properties followed by
/// classes, both in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stylesheet {
    variables: IndexMap<String, String>,
    classes: IndexMap<String, String>,
}

impl Stylesheet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `--<path>: value;`. Returns false (and keeps the first value) if
    /// the identifier is already present.
    pub fn add_variable(&mut self, path: &str, value: impl Into<String>) -> bool {
        let name = css_var_name(path);
        if self.variables.contains_key(&name) {
            warn!("ignoring duplicate custom property {} from '{}'", name, path);
            return false;
        }
        self.variables.insert(name, value.into());
        true
    }

    /// Add `.<path> { block }`. `block` holds the declarations, already
    /// joined with a newline and [`INDENT`].
    pub fn add_class(&mut self, path: &str, block: impl Into<String>) -> bool {
        let name = css_class_name(path);
        if self.classes.contains_key(&name) {
            warn!("ignoring duplicate class .{} from '{}'", name, path);
            return false;
        }
        self.classes.insert(name, block.into());
        true
    }

    /// Custom properties as `(--name, value)`.
    pub fn variables(&self) -> impl Iterator<Item = (&str, &str)> {
        self.variables.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Classes as `(name, block)`.
    pub fn classes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.classes.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn variable(&self, name: &str) -> Option<&str> {
        self.variables.get(name).map(String::as_str)
    }

    pub fn class(&self, name: &str) -> Option<&str> {
        self.classes.get(name).map(String::as_str)
    }

    pub fn variable_count(&self) -> usize {
        self.variables.len()
    }

    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    pub fn len(&self) -> usize {
        self.variables.len() + self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&mut self) {
        self.variables.clear();
        self.classes.clear();
    }

    /// Render the stylesheet text.
    pub fn render(&self) -> String {
        let mut out = String::from(":root {\n");
        for (name, value) in &self.variables {
            out.push_str(&format!("{}{}: {};\n", INDENT, name, value));
        }
        out.push_str("}\n");
        for (name, block) in &self.classes {
            out.push_str(&format!("\n.{} {{\n{}{}\n}}\n", name, INDENT, block));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_root_then_classes_in_insertion_order() {
        let mut sheet = Stylesheet::new();
        sheet.add_variable("spacing.lg", "24px");
        sheet.add_variable("spacing.base", "8px");
        sheet.add_class(
            "heading.h1",
            "font-family: Inter;\n    font-size: 32px;",
        );
        sheet.add_class("body", "font-weight: 400;");

        assert_eq!(
            sheet.render(),
            ":root {\n    --spacing-lg: 24px;\n    --spacing-base: 8px;\n}\n\n\
             .heading-h1 {\n    font-family: Inter;\n    font-size: 32px;\n}\n\n\
             .body {\n    font-weight: 400;\n}\n"
        );
    }

    #[test]
    fn empty_sheet_renders_empty_root() {
        assert_eq!(Stylesheet::new().render(), ":root {\n}\n");
    }

    #[test]
    fn duplicate_identifiers_keep_first_value() {
        let mut sheet = Stylesheet::new();
        assert!(sheet.add_variable("a.bC", "1px"));
        assert!(!sheet.add_variable("a.b-c", "2px"));
        assert_eq!(sheet.variable("--a-b-c"), Some("1px"));
        assert_eq!(sheet.variable_count(), 1);
    }

    #[test]
    fn variables_and_classes_are_disjoint() {
        let mut sheet = Stylesheet::new();
        assert!(sheet.add_variable("type.body", "x"));
        assert!(sheet.add_class("type.body", "font-size: 1px;"));
        assert_eq!(sheet.len(), 2);
        assert!(sheet.variable("--type-body").is_some());
        assert!(sheet.class("type-body").is_some());
        sheet.clear();
        assert!(sheet.is_empty());
    }
}
