//! Naming and unit helpers: token paths to CSS identifiers, case
//! conversion, `px` suffix rules.

use crate::types::PROPERTIES_IN_PX;

/// Append `key` to a dotted path.
pub fn join_path(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_owned()
    } else {
        format!("{}.{}", parent, key)
    }
}

/// `fontSize` -> `font-size`. An uppercase letter at the start of a word is
/// lowered without a leading dash; whitespace becomes a dash.
pub fn to_kebab_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 4);
    for c in text.chars() {
        if c.is_whitespace() {
            out.push('-');
        } else if c.is_ascii_uppercase() {
            if !out.is_empty() && !out.ends_with('-') {
                out.push('-');
            }
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// `heading.h1.fontSize` -> `heading-h1-font-size`.
pub fn path_to_kebab(path: &str) -> String {
    to_kebab_case(&path.replace('.', "-"))
}

/// `primary-dark` -> `PrimaryDark`.
pub fn kebab_to_pascal(text: &str) -> String {
    text.split('-')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}

/// Custom property name for a token path: `a.b.c` -> `--a-b-c`.
pub fn css_var_name(path: &str) -> String {
    format!("--{}", path_to_kebab(path))
}

/// `var(--a-b-c)` for a token path.
pub fn css_var_ref(path: &str) -> String {
    format!("var({})", css_var_name(path))
}

/// Class selector name for a token path (no leading dot).
pub fn css_class_name(path: &str) -> String {
    path_to_kebab(path)
}

/// Path of the channel-triple variable derived from a color path:
/// `palette.primary` + `digits` -> `palette.primaryDigits`.
pub fn digits_path(path: &str, suffix: &str) -> String {
    format!("{}{}", path, kebab_to_pascal(suffix))
}

/// True for an integer or decimal with no unit, optionally negative.
pub fn is_plain_number(text: &str) -> bool {
    let digits = text.strip_prefix('-').unwrap_or(text);
    !digits.is_empty()
        && digits.chars().any(|c| c.is_ascii_digit())
        && digits.chars().all(|c| c.is_ascii_digit() || c == '.')
        && digits.matches('.').count() <= 1
}

/// Add `px` to a bare number; anything else is returned untouched.
pub fn add_px_suffix(text: &str) -> String {
    if is_plain_number(text) {
        format!("{}px", text)
    } else {
        text.to_owned()
    }
}

/// One `name: value;` declaration. `name` is a camelCase field name.
pub fn css_property(name: &str, value: &str) -> String {
    let property = to_kebab_case(name);
    let value = if PROPERTIES_IN_PX.contains(&property.as_str()) {
        add_px_suffix(value)
    } else {
        value.to_owned()
    };
    format!("{}: {};", property, value)
}
