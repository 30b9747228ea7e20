//! Single-file transformation
//!
//! [`Engine::apply`] runs exactly one rule over one source file:
//!
//! 1. parse the text (language from the file extension)
//! 2. hand the freshly parsed tree to the rule
//! 3. print the tree, then parse the printed text again when
//!    `verify_output` is on
//!
//! The tree belongs to the call. A rule error drops it before anything is
//! printed, so callers see either complete output or an error.

use std::path::{Path, PathBuf};

use remodel_rules::{Outcome, Rule, RuleContext};
use remodel_syntax::{parse, print, Language};

use crate::config::Config;
use crate::error::TransformError;

/// One input file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Path as given by the caller; only its name and extension are used
    pub path: PathBuf,
    /// Full source text
    pub text: String,
}

impl SourceFile {
    /// Create source file
    #[inline]
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            text: text.into(),
        }
    }

    /// Language picked from the extension
    #[inline]
    #[must_use]
    pub fn language(&self) -> Language {
        Language::from_path(&self.path)
    }
}

/// Output of a successful application
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transformed {
    /// Resulting text; the input text byte-for-byte when unchanged
    pub text: String,
    /// Whether any rule changed the tree
    pub outcome: Outcome,
    /// Rules that changed the file, in application order
    pub applied: Vec<&'static str>,
}

impl Transformed {
    fn unchanged(text: &str) -> Self {
        Self {
            text: text.to_string(),
            outcome: Outcome::Unchanged,
            applied: Vec::new(),
        }
    }

    /// Check for [`Outcome::Changed`]
    #[inline]
    #[must_use]
    pub fn is_changed(&self) -> bool {
        self.outcome.is_changed()
    }
}

/// Transformation runner
#[derive(Debug, Clone, Default)]
pub struct Engine {
    config: Config,
}

impl Engine {
    /// Create engine with configuration
    #[inline]
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Current configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Apply one rule to one file
    ///
    /// # Errors
    /// - [`TransformError::Parse`] if the input does not parse
    /// - [`TransformError::Rule`] if the rule rejects the tree
    /// - [`TransformError::Serialize`] if the mutated tree cannot be printed
    /// - [`TransformError::Verification`] if the printed text does not parse
    pub fn apply(&self, rule: &dyn Rule, file: &SourceFile) -> Result<Transformed, TransformError> {
        let span = tracing::debug_span!("apply", path = %file.path.display(), rule = rule.name());
        let _enter = span.enter();

        let language = file.language();
        let mut program = parse(&file.text, language)?;
        let ctx = RuleContext::new(&file.path, &self.config.rules);

        let outcome = rule.apply(&mut program, &ctx).map_err(|e| {
            tracing::warn!(error = %e, "rule failed, tree discarded");
            e
        })?;
        if !outcome.is_changed() {
            tracing::trace!("no match");
            return Ok(Transformed::unchanged(&file.text));
        }

        let text = print(&program, &self.config.print)?;
        if self.config.engine.verify_output {
            verify(&text, language)?;
        }
        tracing::debug!(bytes = text.len(), "rewritten");

        Ok(Transformed {
            text,
            outcome,
            applied: vec![rule.name()],
        })
    }

    /// Apply rules in order, feeding each output to the next rule
    ///
    /// # Errors
    /// The first error of any step; earlier steps' output is dropped with it.
    pub fn apply_chain(
        &self,
        rules: &[&dyn Rule],
        file: &SourceFile,
    ) -> Result<Transformed, TransformError> {
        let mut current = Transformed::unchanged(&file.text);
        for rule in rules {
            let step = self.apply(*rule, &SourceFile::new(file.path.clone(), current.text))?;
            current = Transformed {
                text: step.text,
                outcome: current.outcome.or(step.outcome),
                applied: current.applied,
            };
            current.applied.extend(step.applied);
        }
        Ok(current)
    }

    /// Apply one rule to bare text, named by `path`
    ///
    /// # Errors
    /// As [`Engine::apply`].
    pub fn apply_text(
        &self,
        rule: &dyn Rule,
        path: &Path,
        text: &str,
    ) -> Result<String, TransformError> {
        self.apply(rule, &SourceFile::new(path, text))
            .map(|t| t.text)
    }
}

fn verify(text: &str, language: Language) -> Result<(), TransformError> {
    parse(text, language).map(drop).map_err(|e| {
        tracing::error!(error = %e, "printed output does not parse");
        TransformError::Verification(e)
    })
}
