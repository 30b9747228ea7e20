//! Remodel transformation engine
//!
//! Parses source text, applies one rule, prints and verifies the result:
//!
//! - [`Engine`]: single file, one rule ([`Engine::apply`]) or a chain
//! - [`BatchRunner`]: many files in parallel with per-file failure isolation
//! - [`Config`]: `remodel.toml` (rules, print style, runner settings)
//!
//! The engine does no file I/O; callers read and write files.
//!
//! # Example
//!
//! ```
//! use remodel_engine::{Engine, SourceFile};
//! use remodel_rules::FixNextjsImports;
//!
//! let engine = Engine::default();
//! let file = SourceFile::new("widget.js", "export function Bar() {}\n");
//! let result = engine.apply(&FixNextjsImports, &file).unwrap();
//! assert_eq!(result.text, "export default function Bar() {}\n");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod batch;
pub mod config;
pub mod engine;
pub mod error;

pub use batch::{BatchReport, BatchRunner, FileReport, FileStatus, Totals};
pub use config::{Config, EngineConfig};
pub use engine::{Engine, SourceFile, Transformed};
pub use error::{ConfigError, TransformError};
