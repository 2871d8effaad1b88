//! Resolved import/export records.
//!
//! The parser has already classified every import/export clause into these
//! shapes; the formatter strategies never see raw syntax.

use crate::ir::{Ident, Span, Stmt};

/// `import ... from "source";`
#[derive(Debug, Clone, PartialEq)]
pub struct ImportRecord {
    pub span: Span,
    /// The literal module specifier string, e.g. `"./utils"`.
    pub source: String,
    /// Empty for a bare side-effect import (`import "m";`).
    pub specifiers: Vec<ImportSpecifier>,
}

impl ImportRecord {
    pub fn new(span: Span, source: impl Into<String>, specifiers: Vec<ImportSpecifier>) -> Self {
        ImportRecord {
            span,
            source: source.into(),
            specifiers,
        }
    }
}

/// One binding introduced by an import clause.
///
/// Invariant: the local name is unique within the importing scope.
#[derive(Debug, Clone, PartialEq)]
pub enum ImportSpecifier {
    /// `import x from "m"`
    Default(Ident),
    /// `import * as x from "m"`
    Namespace(Ident),
    /// `import { imported as local } from "m"`
    Named { imported: Ident, local: Ident },
}

impl ImportSpecifier {
    pub fn local(&self) -> &Ident {
        match self {
            ImportSpecifier::Default(local) | ImportSpecifier::Namespace(local) => local,
            ImportSpecifier::Named { local, .. } => local,
        }
    }

    pub fn is_default(&self) -> bool {
        matches!(self, ImportSpecifier::Default(_))
    }

    pub fn is_namespace(&self) -> bool {
        matches!(self, ImportSpecifier::Namespace(_))
    }
}

/// `export ...;`
#[derive(Debug, Clone, PartialEq)]
pub struct ExportRecord {
    pub span: Span,
    pub kind: ExportKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExportKind {
    /// `export { local as exported }` and, with a source,
    /// `export { local as exported } from "m"` (a re-export).
    Specifiers {
        specifiers: Vec<ExportSpecifier>,
        source: Option<String>,
    },
    /// `export function foo() {}` / `export default function () {}`:
    /// an export attached to a local declaration.
    Declaration {
        declaration: Box<Stmt>,
        default: bool,
    },
}

impl ExportRecord {
    pub fn specifiers(span: Span, specifiers: Vec<ExportSpecifier>, source: Option<String>) -> Self {
        ExportRecord {
            span,
            kind: ExportKind::Specifiers { specifiers, source },
        }
    }

    pub fn declaration(span: Span, declaration: Stmt, default: bool) -> Self {
        ExportRecord {
            span,
            kind: ExportKind::Declaration {
                declaration: Box::new(declaration),
                default,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExportSpecifier {
    pub local: Ident,
    pub exported: Ident,
}

impl ExportSpecifier {
    pub fn new(local: impl Into<String>, exported: impl Into<String>) -> Self {
        ExportSpecifier {
            local: Ident::new(local),
            exported: Ident::new(exported),
        }
    }

    /// `export { foo }` with no rename.
    pub fn shorthand(name: impl Into<String>) -> Self {
        let local = Ident::new(name);
        ExportSpecifier {
            exported: local.clone(),
            local,
        }
    }
}
