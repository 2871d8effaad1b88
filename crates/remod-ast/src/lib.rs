//! Program representation for module-output rewriting.
//!
//! The parser hands this stage an ordered list of top-level statements in
//! which import and export declarations are already resolved into records
//! (`ImportRecord`/`ExportRecord`). The formatter strategies consume that
//! tree, synthesize replacement statements, and hand the same program back
//! with its body rewritten. Pretty-printing lives downstream and never sees
//! anything but these nodes.

pub mod hoist;
pub mod ir;
pub mod records;
pub mod scope;

pub use ir::{Expr, Ident, Program, Span, Stmt};
pub use records::{ExportKind, ExportRecord, ExportSpecifier, ImportRecord, ImportSpecifier};
pub use scope::{Scope, ScopeId};
