//! Remodel syntax layer
//!
//! Typed JavaScript/JSX syntax tree shared by every rewrite rule:
//!
//! - [`parse`]: source text → [`Program`] (tree-sitter backed)
//! - [`print`]: [`Program`] → source text in a fixed style
//! - [`Visit`] / [`VisitMut`]: read-only and in-place traversal
//!
//! # Example
//!
//! ```
//! use remodel_syntax::{parse, print, Language, PrintOptions};
//!
//! let program = parse("const a = \"x\"", Language::JavaScript).unwrap();
//! let text = print(&program, &PrintOptions::default()).unwrap();
//! assert_eq!(text, "const a = 'x';\n");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod ast;
mod builders;
pub mod error;
pub mod language;
pub mod parse;
pub mod print;
pub mod visit;

pub use ast::*;
pub use error::{ParseError, SerializeError};
pub use language::Language;
pub use parse::{is_valid, parse};
pub use print::{is_identifier, print, PrintOptions, QuoteStyle};
pub use visit::{Visit, VisitMut};
