//! Rule trait and per-application context
//!
//! Provides the [`Rule`] trait every rewrite implements. A rule receives a
//! freshly parsed tree it owns exclusively for the duration of the call and
//! reports whether it changed anything.

use std::path::Path;

use remodel_syntax::Program;

use crate::config::RuleConfig;
use crate::error::RuleError;

/// Result of a successful rule application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Tree was modified
    Changed,
    /// No pattern matched; the tree is untouched
    Unchanged,
}

impl Outcome {
    /// Build from a "did anything change" flag
    #[inline]
    #[must_use]
    pub fn from_changed(changed: bool) -> Self {
        if changed {
            Self::Changed
        } else {
            Self::Unchanged
        }
    }

    /// Check for [`Outcome::Changed`]
    #[inline]
    #[must_use]
    pub fn is_changed(self) -> bool {
        self == Self::Changed
    }

    /// Combine the outcomes of two consecutive steps
    #[inline]
    #[must_use]
    pub fn or(self, other: Self) -> Self {
        Self::from_changed(self.is_changed() || other.is_changed())
    }
}

/// What a rule knows about the file it rewrites
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'a> {
    path: &'a Path,
    config: &'a RuleConfig,
}

impl<'a> RuleContext<'a> {
    /// Create context for one file
    #[inline]
    #[must_use]
    pub fn new(path: &'a Path, config: &'a RuleConfig) -> Self {
        Self { path, config }
    }

    /// File path as given by the caller
    #[inline]
    #[must_use]
    pub fn path(&self) -> &'a Path {
        self.path
    }

    /// Rule configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &'a RuleConfig {
        self.config
    }

    /// File name up to its first `.` (`_document` for `pages/_document.page.js`)
    #[must_use]
    pub fn logical_name(&self) -> &'a str {
        let name = self
            .path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default();
        name.split('.').next().unwrap_or(name)
    }
}

/// Source-to-source rewrite over a syntax tree
///
/// # Contract
/// - `apply` returns [`Outcome::Unchanged`] exactly when it left the tree
///   untouched.
/// - On `Err` the caller discards the tree; partial mutation is allowed.
pub trait Rule: Send + Sync + std::fmt::Debug {
    /// Registry name (`functional-to-class`, ...)
    fn name(&self) -> &'static str;

    /// One-line summary for listings
    fn description(&self) -> &'static str;

    /// Rewrite the tree in place
    ///
    /// # Errors
    /// Returns [`RuleError::Invariant`] when the tree has a shape the rule
    /// cannot rewrite safely.
    fn apply(&self, program: &mut Program, ctx: &RuleContext<'_>) -> Result<Outcome, RuleError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logical_name_strips_every_extension() {
        let config = RuleConfig::default();
        let ctx = RuleContext::new(Path::new("pages/_document.page.js"), &config);
        assert_eq!(ctx.logical_name(), "_document");
        let ctx = RuleContext::new(Path::new("widget.tsx"), &config);
        assert_eq!(ctx.logical_name(), "widget");
        let ctx = RuleContext::new(Path::new(""), &config);
        assert_eq!(ctx.logical_name(), "");
    }

    #[test]
    fn outcome_combines() {
        assert_eq!(Outcome::Unchanged.or(Outcome::Changed), Outcome::Changed);
        assert_eq!(Outcome::Unchanged.or(Outcome::Unchanged), Outcome::Unchanged);
        assert!(Outcome::from_changed(true).is_changed());
    }
}
