//! Engine configuration (`remodel.toml`)
//!
//! ```toml
//! [rules]
//! preserve_initial_state = true
//!
//! [rules.prop_table]
//! Chip = ["label", "onDelete"]
//!
//! [print]
//! quote = "double"
//!
//! [engine]
//! verify_output = true
//! default_rules = ["fix-react-imports"]
//! ```
//!
//! Every table and field is optional.

use std::path::Path;

use remodel_rules::RuleConfig;
use remodel_syntax::PrintOptions;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Runner settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Re-parse printed output before returning it
    pub verify_output: bool,
    /// File extensions picked up when walking directories
    pub extensions: Vec<String>,
    /// Directory names never descended into
    pub skip_dirs: Vec<String>,
    /// Rules applied when none are named on the command line
    pub default_rules: Vec<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            verify_output: true,
            extensions: ["js", "jsx", "ts", "tsx", "mjs", "cjs"]
                .into_iter()
                .map(String::from)
                .collect(),
            skip_dirs: ["node_modules", ".git", ".next", "build", "dist"]
                .into_iter()
                .map(String::from)
                .collect(),
            default_rules: Vec::new(),
        }
    }
}

impl EngineConfig {
    /// Check if a path has one of the configured extensions
    #[must_use]
    pub fn accepts(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
    }

    /// Check if a directory name is skipped
    #[must_use]
    pub fn skips(&self, dir_name: &str) -> bool {
        self.skip_dirs.iter().any(|d| d == dir_name)
    }
}

/// Complete configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Settings handed to every rule
    pub rules: RuleConfig,
    /// Output style
    pub print: PrintOptions,
    /// Runner settings
    pub engine: EngineConfig,
}

impl Config {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse from TOML text
    ///
    /// # Errors
    /// Returns [`ConfigError::Toml`] for malformed input and
    /// [`ConfigError::Invalid`] for unusable values.
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a file
    ///
    /// # Errors
    /// Returns [`ConfigError::Io`] if the file cannot be read, otherwise as
    /// [`Config::from_toml`].
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))?;
        let config = Self::from_toml(&text)?;
        tracing::debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// With rule settings
    #[inline]
    #[must_use]
    pub fn with_rules(mut self, rules: RuleConfig) -> Self {
        self.rules = rules;
        self
    }

    /// With print options
    #[inline]
    #[must_use]
    pub fn with_print(mut self, print: PrintOptions) -> Self {
        self.print = print;
        self
    }

    /// With output verification on or off
    #[inline]
    #[must_use]
    pub fn with_verify_output(mut self, verify: bool) -> Self {
        self.engine.verify_output = verify;
        self
    }

    /// Check values serde cannot
    ///
    /// # Errors
    /// Returns [`ConfigError::Invalid`] describing the first bad value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.print.use_tabs && self.print.tab_width == 0 {
            return Err(ConfigError::invalid("print.tab_width must be at least 1"));
        }
        if self.print.max_line_width == 0 {
            return Err(ConfigError::invalid("print.max_line_width must be at least 1"));
        }
        if self.engine.extensions.is_empty() {
            return Err(ConfigError::invalid("engine.extensions must not be empty"));
        }
        if self.rules.react_namespace.is_empty() {
            return Err(ConfigError::invalid("rules.react_namespace must not be empty"));
        }
        Ok(())
    }
}
