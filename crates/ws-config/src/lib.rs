//! Configuration management for workshop rendering.
//!
//! Parses `workshops.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories. Every section and
//! key is optional; a missing file yields [`Config::default`].
//!
//! ```toml
//! [markdown]
//! smart_punctuation = true
//! autolink = true
//!
//! [emoji]
//! path = "${EMOJI_CDN:-/images/emoji}"
//!
//! [emoji.custom]
//! shipit = "shipit.png"
//!
//! [highlight]
//! enabled = true
//! class_prefix = "hl-"
//! ```
//!
//! ## Environment Variable Expansion
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `emoji.path`

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "workshops.toml";

/// Default URL directory for emoji images.
const DEFAULT_EMOJI_PATH: &str = "/images/emoji";

/// Rendering configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Markdown parsing options.
    pub markdown: MarkdownConfig,
    /// Emoji shortcode images.
    pub emoji: EmojiConfig,
    /// Code fence highlighting.
    pub highlight: HighlightConfig,

    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// Markdown parsing options.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct MarkdownConfig {
    /// Smart quotes, dashes and ellipses.
    pub smart_punctuation: bool,
    /// Link bare URLs and email addresses.
    pub autolink: bool,
}

impl Default for MarkdownConfig {
    fn default() -> Self {
        Self {
            smart_punctuation: true,
            autolink: true,
        }
    }
}

/// Emoji configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct EmojiConfig {
    /// URL directory emoji images are served from.
    pub path: String,
    /// Custom emoji: shortcode name to image filename inside `path`.
    pub custom: HashMap<String, String>,
}

impl Default for EmojiConfig {
    fn default() -> Self {
        Self {
            path: DEFAULT_EMOJI_PATH.to_owned(),
            custom: HashMap::new(),
        }
    }
}

/// Syntax highlighting configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    /// Whether fenced code is highlighted.
    pub enabled: bool,
    /// Prefix for every CSS class emitted by the highlighter.
    pub class_prefix: String,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            class_prefix: String::new(),
        }
    }
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
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`emoji.path`").
        field: String,
        /// Error message (e.g., "${`EMOJI_CDN`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Whether `name` can appear between the colons of a shortcode.
fn is_shortcode_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '+' | '-'))
}

impl Config {
    /// Load configuration from file.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `workshops.toml` in current directory and
    /// parents, falling back to defaults when none exists.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, or if reading,
    /// parsing, expansion or validation fails.
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse configuration from TOML text.
    ///
    /// Environment variables are expanded and the result is validated.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let mut config: Self = toml::from_str(content)?;
        config.expand_env_vars()?;
        config.validate()?;
        Ok(config)
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

    /// Validate configuration values.
    ///
    /// Called automatically after loading from file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_emoji()?;
        self.validate_highlight()?;
        Ok(())
    }

    /// Validate emoji configuration.
    fn validate_emoji(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.emoji.path, "emoji.path")?;

        // Sorted so the reported entry does not depend on hash order
        let mut custom: Vec<_> = self.emoji.custom.iter().collect();
        custom.sort();
        for (name, filename) in custom {
            if !is_shortcode_name(name) {
                return Err(ConfigError::Validation(format!(
                    "emoji.custom key {name:?} is not a valid shortcode name"
                )));
            }
            require_non_empty(filename, &format!("emoji.custom.{name}"))?;
        }

        Ok(())
    }

    /// Validate highlight configuration.
    fn validate_highlight(&self) -> Result<(), ConfigError> {
        let prefix = &self.highlight.class_prefix;
        if !prefix
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_'))
        {
            return Err(ConfigError::Validation(format!(
                "highlight.class_prefix {prefix:?} may only contain ASCII letters, digits, '-' and '_'"
            )));
        }
        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        self.emoji.path = expand_vars(&self.emoji.path, "emoji.path", |name| {
            std::env::var(name).ok()
        })?;
        Ok(())
    }
}

/// Expand `${VAR}` references in `value`, reading variables through `var`.
///
/// Strings without `${` are returned unchanged.
fn expand_vars<F>(value: &str, field: &str, var: F) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if !value.contains("${") {
        return Ok(value.to_owned());
    }

    shellexpand::env_with_context(value, |name: &str| {
        var(name).map(Some).ok_or_else(|| name.to_owned())
    })
    .map(std::borrow::Cow::into_owned)
    .map_err(|e| ConfigError::EnvVar {
        field: field.to_owned(),
        message: format!("${{{}}} not set", e.cause),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.markdown.smart_punctuation);
        assert!(config.markdown.autolink);
        assert_eq!(config.emoji.path, "/images/emoji");
        assert!(config.emoji.custom.is_empty());
        assert!(config.highlight.enabled);
        assert_eq!(config.highlight.class_prefix, "");
        assert!(config.config_path.is_none());
    }

    #[test]
    fn test_parse_minimal_config() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.emoji.path, "/images/emoji");
        assert!(config.highlight.enabled);
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
[markdown]
smart_punctuation = false
autolink = false

[emoji]
path = "/static/emoji"

[emoji.custom]
shipit = "shipit.png"
orpheus = "custom/orpheus.png"

[highlight]
enabled = false
class_prefix = "hl-"
"#;
        let config = Config::from_toml_str(toml).unwrap();
        assert!(!config.markdown.smart_punctuation);
        assert!(!config.markdown.autolink);
        assert_eq!(config.emoji.path, "/static/emoji");
        assert_eq!(
            config.emoji.custom.get("orpheus"),
            Some(&"custom/orpheus.png".to_owned())
        );
        assert!(!config.highlight.enabled);
        assert_eq!(config.highlight.class_prefix, "hl-");
    }

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        let toml = r"
[markdown]
autolink = false
";
        let config = Config::from_toml_str(toml).unwrap();
        assert!(config.markdown.smart_punctuation);
        assert!(!config.markdown.autolink);
    }

    #[test]
    fn test_parse_error() {
        let result = Config::from_toml_str("[markdown]\nautolink = \"yes\"\n");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    fn vars(name: &str) -> Option<String> {
        match name {
            "EMOJI_HOST" => Some("cdn.example.com".to_owned()),
            "EMOJI_DIR" => Some("emoji".to_owned()),
            _ => None,
        }
    }

    #[test]
    fn test_expand_vars_substitutes_each_reference() {
        assert_eq!(
            expand_vars("https://${EMOJI_HOST}/${EMOJI_DIR}", "emoji.path", vars).unwrap(),
            "https://cdn.example.com/emoji"
        );
    }

    #[test]
    fn test_expand_vars_default_only_when_unset() {
        assert_eq!(
            expand_vars("${EMOJI_DIR:-fallback}", "emoji.path", vars).unwrap(),
            "emoji"
        );
        assert_eq!(
            expand_vars("${NOT_SET:-/images/emoji}", "emoji.path", vars).unwrap(),
            "/images/emoji"
        );
    }

    #[test]
    fn test_expand_vars_reports_unset_variable() {
        let err = expand_vars("/${NOT_SET}/x", "emoji.path", vars).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Environment variable error in emoji.path: ${NOT_SET} not set"
        );
    }

    #[test]
    fn test_expand_vars_leaves_plain_dollars() {
        assert_eq!(
            expand_vars("/images/$emoji", "emoji.path", |_| None).unwrap(),
            "/images/$emoji"
        );
    }

    #[test]
    fn test_expand_env_vars_emoji_path() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("TEST_EMOJI_CDN", "https://cdn.example.com/emoji");
        }

        let toml = r#"
[emoji]
path = "${TEST_EMOJI_CDN}"
"#;
        let config = Config::from_toml_str(toml).unwrap();
        assert_eq!(config.emoji.path, "https://cdn.example.com/emoji");

        unsafe {
            std::env::remove_var("TEST_EMOJI_CDN");
        }
    }

    #[test]
    fn test_expand_env_vars_missing_required_var() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("MISSING_EMOJI_VAR_CONFIG_TEST");
        }

        let toml = r#"
[emoji]
path = "${MISSING_EMOJI_VAR_CONFIG_TEST}"
"#;
        let err = Config::from_toml_str(toml).unwrap_err();
        assert!(matches!(err, ConfigError::EnvVar { .. }));
        assert!(err.to_string().contains("MISSING_EMOJI_VAR_CONFIG_TEST"));
        assert!(err.to_string().contains("emoji.path"));
    }

    #[test]
    fn test_load_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("workshops.toml");
        std::fs::write(&path, "[highlight]\nclass_prefix = \"code-\"\n").unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.highlight.class_prefix, "code-");
        assert_eq!(config.config_path, Some(path));
    }

    #[test]
    fn test_load_missing_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.toml");

        let err = Config::load(Some(&path)).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
        assert!(err.to_string().contains("missing.toml"));
    }

    #[test]
    fn test_load_validates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("workshops.toml");
        std::fs::write(&path, "[emoji]\npath = \"\"\n").unwrap();

        let err = Config::load(Some(&path)).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    // Validation tests

    /// Assert that validation fails with expected substrings in the error message.
    fn assert_validation_error(config: &Config, expected_substrings: &[&str]) {
        let result = config.validate();
        assert!(result.is_err(), "Expected validation to fail");
        let err = result.unwrap_err();
        assert!(
            matches!(err, ConfigError::Validation(_)),
            "Expected ConfigError::Validation, got {err:?}"
        );
        let msg = err.to_string();
        for s in expected_substrings {
            assert!(
                msg.contains(s),
                "Expected error to contain '{s}', got: {msg}"
            );
        }
    }

    #[test]
    fn test_validate_default_config_passes() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validate_emoji_path_empty() {
        let mut config = Config::default();
        config.emoji.path = String::new();
        assert_validation_error(&config, &["emoji.path", "cannot be empty"]);
    }

    #[test]
    fn test_validate_custom_emoji_name() {
        let mut config = Config::default();
        config
            .emoji
            .custom
            .insert("ship it".to_owned(), "shipit.png".to_owned());
        assert_validation_error(&config, &["emoji.custom", "ship it"]);
    }

    #[test]
    fn test_validate_custom_emoji_filename_empty() {
        let mut config = Config::default();
        config
            .emoji
            .custom
            .insert("shipit".to_owned(), String::new());
        assert_validation_error(&config, &["emoji.custom.shipit", "cannot be empty"]);
    }

    #[test]
    fn test_validate_custom_emoji_valid_names() {
        let mut config = Config::default();
        for name in ["shipit", "+1", "hack-club", "two_words"] {
            config
                .emoji
                .custom
                .insert(name.to_owned(), format!("{name}.png"));
        }
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_class_prefix() {
        let mut config = Config::default();
        config.highlight.class_prefix = "hl\" onload=\"".to_owned();
        assert_validation_error(&config, &["highlight.class_prefix"]);

        config.highlight.class_prefix = "hl-".to_owned();
        assert!(config.validate().is_ok());
    }
}
