//! Engine error types
//!
//! [`TransformError`] covers one rule application on one file;
//! [`ConfigError`] covers loading `remodel.toml`.

use std::path::PathBuf;

use remodel_rules::RuleError;
use remodel_syntax::{ParseError, SerializeError};

/// Errors while transforming one file
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransformError {
    /// Input is not syntactically valid
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// Rule refused the tree; nothing was printed
    #[error("rule error: {0}")]
    Rule(#[from] RuleError),

    /// Mutated tree could not be printed
    #[error("serialization error: {0}")]
    Serialize(#[from] SerializeError),

    /// Printed output does not parse again
    #[error("serialization error: output does not re-parse: {0}")]
    Verification(ParseError),
}

impl TransformError {
    /// Short category name used in reports
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Parse(_) => "parse",
            Self::Rule(_) => "rule",
            Self::Serialize(_) | Self::Verification(_) => "serialize",
        }
    }

    /// Check if the input itself was rejected
    #[inline]
    #[must_use]
    pub fn is_parse(&self) -> bool {
        matches!(self, Self::Parse(_))
    }
}

/// Errors while loading configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File could not be read
    #[error("failed to read config {path}: {source}")]
    Io {
        /// Config file path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Not valid TOML or wrong field types
    #[error("invalid config: {0}")]
    Toml(#[from] toml::de::Error),

    /// Well-formed but unusable values
    #[error("invalid config: {0}")]
    Invalid(String),
}

impl ConfigError {
    /// Create I/O error for a config path
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create invalid value error
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transform_error_kinds() {
        let parse = TransformError::from(ParseError::syntax(1, 1, "unexpected '}'"));
        assert_eq!(parse.kind(), "parse");
        assert!(parse.is_parse());

        let rule = TransformError::from(RuleError::invariant("hooks-to-lifecycle", "bad state"));
        assert_eq!(rule.kind(), "rule");
        assert_eq!(rule.to_string(), "rule error: hooks-to-lifecycle: bad state");

        let verify = TransformError::Verification(ParseError::ParseFailed);
        assert_eq!(verify.kind(), "serialize");
        assert!(verify.to_string().starts_with("serialization error"));
    }

    #[test]
    fn config_io_error_names_path() {
        let err = ConfigError::io(
            "remodel.toml",
            std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        );
        assert!(err.to_string().contains("remodel.toml"));
    }
}
