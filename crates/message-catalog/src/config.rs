//! Registry configuration.
//!
//! Configuration is optional; every key has a default. Example:
//!
//! ```toml
//! fallback-template = "no message text for id %d"
//! fallback-includes-arguments = false
//! argument-mismatch = "ignore"
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CatalogError, Result};
use crate::template::Template;

/// Default text used when a message id has no registered template.
pub const DEFAULT_FALLBACK_TEMPLATE: &str = "message not found for id %d";

/// What to do when a caller supplies the wrong number of arguments.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ArgumentMismatch {
    /// Render leniently without logging
    Ignore,
    /// Render leniently and log a warning
    #[default]
    Warn,
}

/// Behaviour knobs for a [`crate::MessageRegistry`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct RegistryConfig {
    /// Text for unregistered ids. Its single placeholder receives the id.
    pub fallback_template: String,

    /// Append the supplied arguments to the fallback text.
    pub fallback_includes_arguments: bool,

    pub argument_mismatch: ArgumentMismatch,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            fallback_template: DEFAULT_FALLBACK_TEMPLATE.to_string(),
            fallback_includes_arguments: true,
            argument_mismatch: ArgumentMismatch::Warn,
        }
    }
}

impl RegistryConfig {
    /// Parse and validate a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::InvalidConfig`] for malformed TOML, unknown
    /// keys, or an unusable fallback template.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: RegistryConfig =
            toml::from_str(text).map_err(|e| CatalogError::InvalidConfig(e.to_string()))?;
        config.fallback()?;
        Ok(config)
    }

    /// Read and validate a TOML configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::ConfigIo`] when the file cannot be read, and
    /// the errors of [`RegistryConfig::from_toml_str`] otherwise.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| CatalogError::ConfigIo {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_toml_str(&text)
    }

    /// The parsed fallback template.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::InvalidConfig`] unless the template parses,
    /// refers to exactly one argument, and prints it in full as a plain `%s`
    /// or `%d`.
    pub fn fallback(&self) -> Result<Template> {
        let template = Template::parse(&self.fallback_template).map_err(|e| {
            CatalogError::InvalidConfig(format!("fallback-template: {}", e))
        })?;
        if template.arity() != 1 {
            return Err(CatalogError::InvalidConfig(format!(
                "fallback-template must contain exactly one placeholder for the id, found {}",
                template.arity()
            )));
        }
        if !template.renders_arguments_verbatim() {
            return Err(CatalogError::InvalidConfig(
                "fallback-template must print the id with a plain %s or %d".to_string(),
            ));
        }
        Ok(template)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_gives_defaults() {
        let config = RegistryConfig::from_toml_str("").unwrap();
        assert_eq!(config, RegistryConfig::default());
        assert_eq!(config.fallback().unwrap().as_str(), DEFAULT_FALLBACK_TEMPLATE);
    }

    #[test]
    fn test_all_keys() {
        let config = RegistryConfig::from_toml_str(
            r#"
            fallback-template = "no text for %s"
            fallback-includes-arguments = false
            argument-mismatch = "ignore"
            "#,
        )
        .unwrap();
        assert_eq!(config.fallback_template, "no text for %s");
        assert!(!config.fallback_includes_arguments);
        assert_eq!(config.argument_mismatch, ArgumentMismatch::Ignore);
    }

    #[test]
    fn test_unknown_key_rejected() {
        let err = RegistryConfig::from_toml_str("duplicate-policy = \"replace\"").unwrap_err();
        assert!(matches!(err, CatalogError::InvalidConfig(_)));
        assert!(err.to_string().contains("duplicate-policy"), "Got: {}", err);
    }

    #[test]
    fn test_fallback_needs_one_placeholder() {
        let err = RegistryConfig::from_toml_str("fallback-template = \"missing\"").unwrap_err();
        assert!(err.to_string().contains("exactly one placeholder"), "Got: {}", err);

        let err = RegistryConfig::from_toml_str("fallback-template = \"%s and %s\"").unwrap_err();
        assert!(err.to_string().contains("found 2"), "Got: {}", err);

        let err = RegistryConfig::from_toml_str("fallback-template = \"100%\"").unwrap_err();
        assert!(err.to_string().contains("dangling"), "Got: {}", err);
    }

    #[test]
    fn test_fallback_must_show_the_decimal_id() {
        for template in [
            "no text for %x",
            "no text for %X",
            "no text for %o",
            "no text for %S",
            "no text for %.2s",
        ] {
            let toml = format!("fallback-template = \"{}\"", template);
            let err = RegistryConfig::from_toml_str(&toml).unwrap_err();
            assert!(err.to_string().contains("plain %s or %d"), "{}: {}", template, err);
        }

        let config =
            RegistryConfig::from_toml_str("fallback-template = \"no text for [%12d]\"").unwrap();
        let rendered = config.fallback().unwrap().render(&[&10747935u32]).text;
        assert_eq!(rendered, "no text for [    10747935]");
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("messages.toml");
        std::fs::write(&path, "argument-mismatch = \"warn\"\n").unwrap();
        let config = RegistryConfig::load(&path).unwrap();
        assert_eq!(config.argument_mismatch, ArgumentMismatch::Warn);

        let err = RegistryConfig::load(dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, CatalogError::ConfigIo { .. }));
    }
}
