//! Build configuration file loading.
//!
//! An explicit `--config FILE` must exist. Without one, `tokencss.toml` in
//! the working directory is used when present; otherwise every setting
//! takes its default.

use std::path::{Path, PathBuf};

use log::debug;
use tokencss_core::BuildConfig;

pub(crate) const DEFAULT_CONFIG_FILE: &str = "tokencss.toml";

/// Read and parse a TOML build configuration.
///
/// Returns a human-readable error string on failure.
pub(crate) fn read_config(path: &Path) -> Result<BuildConfig, String> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("could not read '{}': {}", path.display(), e))?;

    toml::from_str(&content).map_err(|e| format!("could not parse '{}': {}", path.display(), e))
}

/// The config for one invocation, before command-line overrides.
pub(crate) fn load_config(explicit: Option<&Path>) -> Result<BuildConfig, String> {
    if let Some(path) = explicit {
        debug!("loading config from {}", path.display());
        return read_config(path);
    }
    let implicit = PathBuf::from(DEFAULT_CONFIG_FILE);
    if implicit.is_file() {
        debug!("loading config from ./{}", DEFAULT_CONFIG_FILE);
        return read_config(&implicit);
    }
    Ok(BuildConfig::default())
}

/// Apply command-line flags on top of file values.
pub(crate) fn apply_overrides(
    mut config: BuildConfig,
    root: Option<String>,
    paste_as_var: Vec<String>,
) -> BuildConfig {
    if root.is_some() {
        config.root = root;
    }
    if !paste_as_var.is_empty() {
        config.paste_as_var = paste_as_var;
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn read_config_parses_fields() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "root = \"global\"\ndigits_suffix = \"rgb\"").unwrap();
        let cfg = read_config(file.path()).unwrap();
        assert_eq!(cfg.root.as_deref(), Some("global"));
        assert_eq!(cfg.digits_suffix, "rgb");
        assert_eq!(cfg.paste_as_var, vec!["palette".to_string()]);
    }

    #[test]
    fn read_config_rejects_unknown_keys() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "pasteAsVar = []").unwrap();
        let err = read_config(file.path()).unwrap_err();
        assert!(err.starts_with("could not parse"), "{}", err);
    }

    #[test]
    fn missing_explicit_config_is_an_error() {
        let err = load_config(Some(Path::new("does/not/exist.toml"))).unwrap_err();
        assert!(err.contains("does/not/exist.toml"));
    }

    #[test]
    fn flags_override_file_values() {
        let file = BuildConfig {
            root: Some("global".into()),
            ..BuildConfig::default()
        };
        let cfg = apply_overrides(file.clone(), None, Vec::new());
        assert_eq!(cfg, file);

        let cfg = apply_overrides(file, Some("dark".into()), vec!["base".into()]);
        assert_eq!(cfg.root.as_deref(), Some("dark"));
        assert_eq!(cfg.paste_as_var, vec!["base".to_string()]);
    }
}
