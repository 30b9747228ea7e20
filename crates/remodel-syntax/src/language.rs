//! Source language detection and grammar selection

use std::path::Path;

/// Supported source languages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Language {
    /// JavaScript with JSX
    #[default]
    JavaScript,
    /// TypeScript with JSX (TSX grammar)
    TypeScript,
}

impl Language {
    /// Get file extensions for this language
    #[inline]
    #[must_use]
    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            Language::JavaScript => &["js", "jsx", "mjs", "cjs"],
            Language::TypeScript => &["ts", "tsx", "mts", "cts"],
        }
    }

    /// Get human-readable name
    #[inline]
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Language::JavaScript => "javascript",
            Language::TypeScript => "typescript",
        }
    }

    /// Detect language from a file extension (without the dot)
    #[must_use]
    pub fn from_extension(ext: &str) -> Option<Self> {
        [Language::JavaScript, Language::TypeScript]
            .into_iter()
            .find(|lang| lang.extensions().iter().any(|e| e.eq_ignore_ascii_case(ext)))
    }

    /// Detect language from a path, defaulting to JavaScript
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
            .unwrap_or_default()
    }

    /// Get the tree-sitter grammar for this language
    #[must_use]
    pub fn tree_sitter_language(self) -> tree_sitter::Language {
        match self {
            Language::JavaScript => tree_sitter_javascript::LANGUAGE.into(),
            Language::TypeScript => tree_sitter_typescript::LANGUAGE_TSX.into(),
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_language_from_path() {
        assert_eq!(Language::from_path(Path::new("pages/_app.js")), Language::JavaScript);
        assert_eq!(Language::from_path(Path::new("Widget.JSX")), Language::JavaScript);
        assert_eq!(Language::from_path(Path::new("src/App.tsx")), Language::TypeScript);
        assert_eq!(Language::from_path(Path::new("README")), Language::JavaScript);
    }

    #[test]
    fn unknown_extension_is_none() {
        assert_eq!(Language::from_extension("rs"), None);
        assert_eq!(Language::from_extension("ts"), Some(Language::TypeScript));
    }
}
