//! The formatter strategy interface.
//!
//! Concrete strategies share one data model (reference table, remap table,
//! hoist-tagged statements) and most of one algorithm; they differ in how
//! the final wrapped program is assembled. Trait defaults supply the base
//! formatter behavior: module-name resolution, generic export handling, and
//! plain reference generation. A strategy that overrides nothing,
//! [`crate::IgnoreFormatter`], leaves the program untouched.

use remod_ast::hoist::Tagged;
use remod_ast::{ExportKind, ExportRecord, Expr, Ident, ImportRecord, ImportSpecifier, Program, Scope, Span, Stmt};

use crate::common::CommonFormat;
use crate::error::FormatError;
use crate::file::SourceFile;
use crate::helpers::Helpers;
use crate::options::ModuleOptions;
use crate::state::FormatterState;
use crate::template;

/// Everything one formatting pass reads and mutates, threaded explicitly
/// through the strategy hooks. Owned for the duration of a single module's
/// formatting; the statement list has exactly one writer while `transform`
/// runs.
pub struct FormatContext<'a> {
    pub file: &'a SourceFile,
    pub options: &'a ModuleOptions,
    pub scope: &'a mut Scope,
    pub helpers: &'a mut Helpers,
    pub state: FormatterState,
}

/// Module identifier derived from file identity; the base fallback used by
/// every strategy's `module_name`.
pub fn default_module_name(cx: &FormatContext<'_>) -> String {
    cx.file.default_module_name()
}

pub trait ModuleFormatter {
    /// One-time pass over the program before any wrapping. The base
    /// strategy has nothing to prepare.
    fn setup(&mut self, _cx: &mut FormatContext<'_>, _program: &Program) -> Result<(), FormatError> {
        Ok(())
    }

    /// Rewrite the program's statement list in place. The base strategy is
    /// a pass-through.
    fn transform(
        &mut self,
        _cx: &mut FormatContext<'_>,
        _program: &mut Program,
    ) -> Result<(), FormatError> {
        Ok(())
    }

    /// Whether this convention writes exported default values onto the
    /// exports object; gates default-export interop.
    fn exports_default_on_object(&self) -> bool {
        false
    }

    /// Module identifier for the wrapper call. The base behavior computes
    /// it from file identity unconditionally.
    fn module_name(&self, cx: &FormatContext<'_>) -> Option<String> {
        Some(default_module_name(cx))
    }

    /// Resolve the generated reference for a source module, memoized in the
    /// reference table. The base behavior generates a uid seeded with the
    /// source string and emits no side statements.
    fn external_reference(
        &mut self,
        cx: &mut FormatContext<'_>,
        source: &str,
        _out: &mut Vec<Tagged>,
    ) -> Ident {
        let FormatContext { scope, state, .. } = cx;
        state.refs.resolve_with(source, || scope.generate_uid(source))
    }

    /// Hook for an import declaration with no specifiers (`import "m";`).
    fn import_declaration(
        &mut self,
        _cx: &mut FormatContext<'_>,
        _record: &ImportRecord,
        _out: &mut Vec<Tagged>,
    ) -> Result<(), FormatError> {
        Ok(())
    }

    /// Rewrite one import specifier. Defaults to the shared classification
    /// policy.
    fn import_specifier(
        &mut self,
        cx: &mut FormatContext<'_>,
        specifier: &ImportSpecifier,
        record: &ImportRecord,
        out: &mut Vec<Tagged>,
    ) -> Result<(), FormatError> {
        CommonFormat::import_specifier(self, cx, specifier, record, out)
    }

    /// Rewrite one export specifier. Applies default-export interop when
    /// the strategy calls for it, then falls through to the shared generic
    /// handling.
    fn export_specifier(
        &mut self,
        cx: &mut FormatContext<'_>,
        specifier: &remod_ast::ExportSpecifier,
        source: Option<&str>,
        span: Span,
        out: &mut Vec<Tagged>,
    ) -> Result<(), FormatError> {
        let is_default = specifier.exported.name == "default";
        if self.exports_default_on_object() && is_default && source.is_none() {
            cx.state.pass_module_arg = true;
            if specifier.exported != specifier.local {
                // renamed binding with no declaration attached
                out.push(Tagged::untagged(template::exports_default_assign(
                    Expr::Ident(specifier.local.clone()),
                )));
                return Ok(());
            }
        }
        CommonFormat::export_specifier(self, cx, specifier, source, span, out)
    }

    /// Rewrite a declaration export. Applies default-export interop when
    /// the strategy calls for it, otherwise the generic base handling.
    fn export_declaration(
        &mut self,
        cx: &mut FormatContext<'_>,
        record: &ExportRecord,
        out: &mut Vec<Tagged>,
    ) -> Result<(), FormatError> {
        let ExportKind::Declaration {
            declaration,
            default,
        } = &record.kind
        else {
            return Err(FormatError::malformed_export(
                record.span,
                "expected a declaration export",
            ));
        };

        if self.exports_default_on_object() && *default {
            cx.state.pass_module_arg = true;

            let is_function = matches!(declaration.as_ref(), Stmt::FunctionDecl { .. });
            let value = push_statement(cx, declaration.as_ref().clone(), record.span, out)?;
            let assign = template::exports_default_assign(value);
            // the assignment may sort above ordinary statements; function
            // hoisting keeps the declaration observable either way
            let priority = is_function.then_some(remod_ast::hoist::DECLARATION_ADJACENT);
            out.push(Tagged { stmt: assign, priority });
            return Ok(());
        }

        export_declaration_fallback(cx, record, out)
    }
}

/// Generic declaration-export handling: emit the declaration, then assign
/// its runtime value onto the exports object under its exported name.
pub(crate) fn export_declaration_fallback(
    cx: &mut FormatContext<'_>,
    record: &ExportRecord,
    out: &mut Vec<Tagged>,
) -> Result<(), FormatError> {
    let ExportKind::Declaration {
        declaration,
        default,
    } = &record.kind
    else {
        return Err(FormatError::malformed_export(
            record.span,
            "expected a declaration export",
        ));
    };

    let exported = if *default {
        Ident::new("default")
    } else {
        declared_name(declaration).ok_or_else(|| {
            FormatError::malformed_export(record.span, "named export declaration has no binding name")
        })?
    };

    let value = push_statement(cx, declaration.as_ref().clone(), record.span, out)?;
    out.push(Tagged::untagged(template::exports_assign(exported, value)));
    Ok(())
}

/// Split a declaration export into a preceding statement plus the expression
/// naming its runtime value. Anonymous declarations are given a generated
/// name first so the statement form stays valid.
pub(crate) fn push_statement(
    cx: &mut FormatContext<'_>,
    declaration: Stmt,
    span: Span,
    out: &mut Vec<Tagged>,
) -> Result<Expr, FormatError> {
    match declaration {
        Stmt::FunctionDecl { name, params, body } => {
            let name = name.unwrap_or_else(|| cx.scope.generate_uid("default"));
            out.push(Tagged::untagged(Stmt::FunctionDecl {
                name: Some(name.clone()),
                params,
                body,
            }));
            Ok(Expr::Ident(name))
        }
        Stmt::ClassDecl { name } => {
            let name = name.unwrap_or_else(|| cx.scope.generate_uid("default"));
            out.push(Tagged::untagged(Stmt::ClassDecl {
                name: Some(name.clone()),
            }));
            Ok(Expr::Ident(name))
        }
        Stmt::VarDecl { name, init } => {
            out.push(Tagged::untagged(Stmt::VarDecl {
                name: name.clone(),
                init,
            }));
            Ok(Expr::Ident(name))
        }
        _ => Err(FormatError::malformed_export(
            span,
            "declaration export does not introduce a binding",
        )),
    }
}

fn declared_name(declaration: &Stmt) -> Option<Ident> {
    match declaration {
        Stmt::FunctionDecl { name, .. } | Stmt::ClassDecl { name } => name.clone(),
        Stmt::VarDecl { name, .. } => Some(name.clone()),
        _ => None,
    }
}
