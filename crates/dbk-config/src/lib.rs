//! Configuration management for the DocBook builder.
//!
//! Parses `dbk.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! ```toml
//! [output]
//! namespace = "http://docbook.org/ns/docbook"
//! indent = true
//! indent_width = 2
//! preserve_whitespace = ["programlisting", "code", "literal*"]
//!
//! [glossary]
//! automatic = true
//!
//! [links]
//! base_url = "https://example.com/docs"
//! ```

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "dbk.toml";

/// Default DocBook 5 namespace.
pub const DOCBOOK_NAMESPACE: &str = "http://docbook.org/ns/docbook";

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Output stream configuration.
    pub output: OutputConfig,
    /// Glossary appendix configuration.
    pub glossary: GlossaryConfig,
    /// Link and image URL configuration.
    pub links: LinksConfig,

    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// Output stream configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Namespace declared on the first top-level element.
    pub namespace: String,
    /// Whether nested elements are indented.
    pub indent: bool,
    /// Spaces per indentation level.
    pub indent_width: usize,
    /// Element name patterns whose whitespace is kept verbatim.
    /// A trailing `*` matches by prefix.
    pub preserve_whitespace: Vec<String>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            namespace: DOCBOOK_NAMESPACE.to_owned(),
            indent: false,
            indent_width: 2,
            preserve_whitespace: vec![
                "programlisting".to_owned(),
                "code".to_owned(),
                "literal*".to_owned(),
            ],
        }
    }
}

/// Glossary appendix configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct GlossaryConfig {
    /// Append a glossary of used acronyms at the end of the document.
    pub automatic: bool,
}

impl Default for GlossaryConfig {
    fn default() -> Self {
        Self { automatic: true }
    }
}

/// Link and image URL configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LinksConfig {
    /// Base URL that relative image references are resolved against.
    pub base_url: Option<String>,
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
}

impl Config {
    /// Load configuration.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `dbk.toml` in current directory and parents,
    /// falling back to defaults when none is found.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist or parsing fails.
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            return Self::load_from_file(path);
        }
        match Self::discover_config() {
            Some(discovered) => Self::load_from_file(&discovered),
            None => Ok(Self::default()),
        }
    }

    /// Parse and validate configuration from a TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.output.namespace.trim().is_empty() {
            return Err(ConfigError::Validation(
                "output.namespace cannot be empty".to_owned(),
            ));
        }
        if self.output.indent && self.output.indent_width == 0 {
            return Err(ConfigError::Validation(
                "output.indent_width must be greater than 0 when indent is enabled".to_owned(),
            ));
        }
        if let Some(base_url) = &self.links.base_url {
            require_scheme(base_url, "links.base_url")?;
        }
        Ok(())
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config = Self::from_toml_str(&content)?;
        config.config_path = Some(path.to_path_buf());
        Ok(config)
    }
}

/// Require a URL field to carry a `scheme://` prefix.
fn require_scheme(url: &str, field: &str) -> Result<(), ConfigError> {
    let has_scheme = url.split_once("://").is_some_and(|(scheme, _)| {
        !scheme.is_empty() && scheme.chars().all(|c| c.is_ascii_alphabetic())
    });
    if !has_scheme {
        return Err(ConfigError::Validation(format!(
            "{field} must be an absolute URL (scheme://...)"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.output.namespace, DOCBOOK_NAMESPACE);
        assert!(!config.output.indent);
        assert_eq!(config.output.indent_width, 2);
        assert_eq!(
            config.output.preserve_whitespace,
            vec!["programlisting", "code", "literal*"]
        );
        assert!(config.glossary.automatic);
        assert!(config.links.base_url.is_none());
        assert!(config.config_path.is_none());
    }

    #[test]
    fn test_parse_minimal_config() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config.output.namespace, DOCBOOK_NAMESPACE);
        assert!(config.glossary.automatic);
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
[output]
namespace = "urn:example:docbook"
indent = true
indent_width = 4
preserve_whitespace = ["screen"]

[glossary]
automatic = false

[links]
base_url = "https://example.com/docs"
"#;
        let config = Config::from_toml_str(toml).unwrap();
        assert_eq!(config.output.namespace, "urn:example:docbook");
        assert!(config.output.indent);
        assert_eq!(config.output.indent_width, 4);
        assert_eq!(config.output.preserve_whitespace, vec!["screen"]);
        assert!(!config.glossary.automatic);
        assert_eq!(
            config.links.base_url.as_deref(),
            Some("https://example.com/docs")
        );
    }

    #[test]
    fn test_empty_namespace_rejected() {
        let err = Config::from_toml_str("[output]\nnamespace = \"\"\n").unwrap_err();
        assert!(
            matches!(err, ConfigError::Validation(_)),
            "Expected ConfigError::Validation, got {err:?}"
        );
        assert!(err.to_string().contains("output.namespace"));
    }

    #[test]
    fn test_zero_indent_width_rejected() {
        let toml = "[output]\nindent = true\nindent_width = 0\n";
        let err = Config::from_toml_str(toml).unwrap_err();
        assert!(err.to_string().contains("indent_width"));
    }

    #[test]
    fn test_zero_indent_width_allowed_without_indent() {
        let config = Config::from_toml_str("[output]\nindent_width = 0\n").unwrap();
        assert_eq!(config.output.indent_width, 0);
    }

    #[test]
    fn test_relative_base_url_rejected() {
        let err = Config::from_toml_str("[links]\nbase_url = \"docs/images\"\n").unwrap_err();
        assert!(err.to_string().contains("links.base_url"));
    }

    #[test]
    fn test_invalid_toml() {
        let err = Config::from_toml_str("[output\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "[glossary]\nautomatic = false\n").unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert!(!config.glossary.automatic);
        assert_eq!(config.config_path, Some(path));
    }

    #[test]
    fn test_load_missing_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.toml");

        let err = Config::load(Some(&path)).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(p) if p == path));
    }
}
