//! Rule errors

/// Errors raised while selecting or applying a rule
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuleError {
    /// No rule registered under this name
    #[error("unknown rule: '{0}'")]
    UnknownRule(String),

    /// Rule found the tree in a shape it cannot rewrite safely
    #[error("{rule}: {message}")]
    Invariant {
        /// Rule name
        rule: &'static str,
        /// What precondition failed
        message: String,
    },
}

impl RuleError {
    /// Create invariant violation for a rule
    pub fn invariant(rule: &'static str, message: impl Into<String>) -> Self {
        Self::Invariant {
            rule,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_rule_display() {
        let err = RuleError::UnknownRule("class-to-hooks".to_string());
        assert_eq!(err.to_string(), "unknown rule: 'class-to-hooks'");
    }

    #[test]
    fn invariant_display() {
        let err = RuleError::invariant("hooks-to-lifecycle", "state field is not an object");
        assert_eq!(
            err.to_string(),
            "hooks-to-lifecycle: state field is not an object"
        );
    }
}
