//! Error types for parsing and printing
//!
//! - [`ParseError`]: source text → [`Program`](crate::Program)
//! - [`SerializeError`]: [`Program`](crate::Program) → source text

use crate::ast::NodeKind;

/// Errors while turning source text into a syntax tree
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// Source is not syntactically valid
    #[error("syntax error at {line}:{column}: {message}")]
    Syntax {
        /// 1-based line of the first offending node
        line: usize,
        /// 1-based column of the first offending node
        column: usize,
        /// What the parser found there
        message: String,
    },

    /// Grammar could not be loaded into the parser
    #[error("failed to initialise {language} parser: {message}")]
    ParserInit {
        /// Grammar name
        language: &'static str,
        /// Underlying error text
        message: String,
    },

    /// Parser produced no tree
    #[error("parser produced no tree")]
    ParseFailed,
}

impl ParseError {
    /// Create syntax error at a 1-based position
    pub fn syntax(line: usize, column: usize, message: impl Into<String>) -> Self {
        Self::Syntax {
            line,
            column,
            message: message.into(),
        }
    }
}

/// Errors while printing a syntax tree
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SerializeError {
    /// Node violates a structural invariant
    #[error("invalid {kind} node: {message}")]
    InvalidNode {
        /// Offending node kind
        kind: NodeKind,
        /// What is wrong with it
        message: String,
    },

    /// Two import specifiers bind the same local name
    #[error("duplicate import binding '{local}' from '{source_module}'")]
    DuplicateImport {
        /// Local name bound twice
        local: String,
        /// Module of the second binding
        source_module: String,
    },

    /// Writing the output failed
    #[error("format error: {0}")]
    Format(String),
}

impl SerializeError {
    /// Create invalid node error
    pub fn invalid(kind: NodeKind, message: impl Into<String>) -> Self {
        Self::InvalidNode {
            kind,
            message: message.into(),
        }
    }
}

impl From<std::fmt::Error> for SerializeError {
    fn from(err: std::fmt::Error) -> Self {
        Self::Format(err.to_string())
    }
}
