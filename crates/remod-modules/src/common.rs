//! Strategy-agnostic scan and rewrite logic, plus the synchronous-require
//! formatter built directly on it.
//!
//! The scan/rewrite core and the import/export policies live here as
//! standalone functions so any strategy can call them by reference: the
//! asynchronous-definition and universal-wrapper strategies reuse this
//! logic directly rather than re-deriving it.

use remod_ast::hoist::{self, Tagged};
use remod_ast::{
    ExportKind, ExportRecord, ExportSpecifier, Expr, Ident, ImportRecord, ImportSpecifier,
    Program, Span, Stmt,
};

use crate::error::FormatError;
use crate::file::ModuleType;
use crate::formatter::{FormatContext, ModuleFormatter};
use crate::helpers::Helper;
use crate::template;

/// Names every wrapper convention claims for itself; generated references
/// must never collide with them.
const RESERVED_WRAPPER_NAMES: [&str; 4] = ["exports", "module", "require", "define"];

/// The mutually exclusive import dispositions. Exactly one applies to any
/// specifier; they are tested in this order and the first match wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ImportCase {
    Absolute,
    AbsoluteDefault,
    Namespace,
    InteropDefault,
    Named,
}

fn classify(cx: &FormatContext<'_>, specifier: &ImportSpecifier, source: &str) -> ImportCase {
    if cx.file.is_module_type(source, ModuleType::Absolute) {
        ImportCase::Absolute
    } else if cx.file.is_module_type(source, ModuleType::AbsoluteDefault) {
        ImportCase::AbsoluteDefault
    } else if specifier.is_namespace() {
        ImportCase::Namespace
    } else if specifier.is_default()
        && !cx.options.dynamic_import_sources.contains(source)
        && !cx.options.no_interop_require_import
    {
        ImportCase::InteropDefault
    } else {
        ImportCase::Named
    }
}

/// Shared setup and policy functions usable by every strategy.
pub struct CommonFormat;

impl CommonFormat {
    /// Single forward pass over the top-level import/export declarations,
    /// run once before any wrapping: reserves the wrapper names, validates
    /// record shapes, records every referenced source module and default
    /// binding, and computes the non-default-exports flag (seeded with the
    /// calling strategy's requirement).
    #[tracing::instrument(level = "trace", skip_all)]
    pub fn scan(
        cx: &mut FormatContext<'_>,
        program: &Program,
        seed: bool,
    ) -> Result<(), FormatError> {
        for name in RESERVED_WRAPPER_NAMES {
            cx.scope.add_binding(name);
        }

        let mut has_non_default = seed;
        for stmt in &program.body {
            match stmt {
                Stmt::Import(record) => {
                    validate_import(record)?;
                    cx.state.imported_sources.insert(record.source.clone());
                    for specifier in &record.specifiers {
                        if specifier.is_default() || specifier.is_namespace() {
                            cx.state
                                .default_ids
                                .insert(record.source.clone(), specifier.local().clone());
                        }
                    }
                }
                Stmt::Export(record) => {
                    validate_export(record)?;
                    match &record.kind {
                        ExportKind::Specifiers { specifiers, source } => {
                            if let Some(source) = source {
                                cx.state.imported_sources.insert(source.clone());
                            }
                            has_non_default |=
                                specifiers.iter().any(|s| s.exported.name != "default");
                        }
                        ExportKind::Declaration { default, .. } => {
                            has_non_default |= !default;
                        }
                    }
                }
                _ => {}
            }
        }

        cx.state.has_non_default_exports = has_non_default;
        tracing::debug!(
            modules = cx.state.imported_sources.len(),
            has_non_default_exports = has_non_default,
            "module scan complete"
        );
        Ok(())
    }

    /// Drive the per-record strategy hooks over the program body, replacing
    /// import/export statements with their synthesized forms, then apply
    /// the layout ordering. Populates the remap table as a side effect.
    pub fn rewrite<F>(
        strategy: &mut F,
        cx: &mut FormatContext<'_>,
        program: &mut Program,
    ) -> Result<(), FormatError>
    where
        F: ModuleFormatter + ?Sized,
    {
        let statements = std::mem::take(&mut program.body);
        let mut out: Vec<Tagged> = Vec::with_capacity(statements.len());

        for stmt in statements {
            match stmt {
                Stmt::Import(record) => {
                    let mut nodes = Vec::new();
                    if record.specifiers.is_empty() {
                        strategy.import_declaration(cx, &record, &mut nodes)?;
                    } else {
                        for specifier in &record.specifiers {
                            strategy.import_specifier(cx, specifier, &record, &mut nodes)?;
                        }
                    }
                    out.append(&mut nodes);
                }
                Stmt::Export(record) => {
                    let mut nodes = Vec::new();
                    match &record.kind {
                        ExportKind::Specifiers { specifiers, source } => {
                            for specifier in specifiers {
                                strategy.export_specifier(
                                    cx,
                                    specifier,
                                    source.as_deref(),
                                    record.span,
                                    &mut nodes,
                                )?;
                            }
                        }
                        ExportKind::Declaration { .. } => {
                            strategy.export_declaration(cx, &record, &mut nodes)?;
                        }
                    }
                    out.append(&mut nodes);
                }
                other => out.push(Tagged::untagged(other)),
            }
        }

        program.body = hoist::reorder(out);
        Ok(())
    }

    /// The shared import classification policy. Resolves the module
    /// reference through the strategy, applies exactly one disposition, and
    /// records the binding remap.
    pub fn import_specifier<F>(
        strategy: &mut F,
        cx: &mut FormatContext<'_>,
        specifier: &ImportSpecifier,
        record: &ImportRecord,
        out: &mut Vec<Tagged>,
    ) -> Result<(), FormatError>
    where
        F: ModuleFormatter + ?Sized,
    {
        let source = record.source.as_str();
        let mut reference = Expr::Ident(strategy.external_reference(cx, source, out));

        let case = classify(cx, specifier, source);
        tracing::trace!(?case, source, local = %specifier.local(), "classified import specifier");

        match case {
            ImportCase::Absolute => {
                // reference used as-is
            }
            ImportCase::AbsoluteDefault => {
                // the table keeps the bare module object; this site reads
                // `.default` off it
                reference = Expr::member(reference, Ident::new("default"));
            }
            ImportCase::Namespace => {
                // the local binding aliases the module object directly
            }
            ImportCase::InteropDefault => {
                let local = specifier.local().name.clone();
                let fresh = cx.scope.generate_uid(&local);
                let helper = {
                    let FormatContext { scope, helpers, .. } = cx;
                    helpers.add(Helper::InteropRequireDefault, scope)
                };
                out.push(Tagged::untagged(template::var_decl(
                    fresh.clone(),
                    Expr::call(Expr::Ident(helper), vec![reference]),
                )));
                reference = Expr::member(Expr::Ident(fresh), Ident::new("default"));
            }
            ImportCase::Named => {
                let imported = match specifier {
                    ImportSpecifier::Named { imported, .. } => imported.clone(),
                    // a default binding reaching the generic case reads the
                    // conventional property
                    _ => Ident::new("default"),
                };
                reference = Expr::member(reference, imported);
            }
        }

        let scope_id = cx.scope.id();
        cx.state
            .remaps
            .add(scope_id, &specifier.local().name, reference);
        Ok(())
    }

    /// Generic export-specifier handling: assign the local binding (or the
    /// re-exported member) onto the exports object under its exported name.
    pub fn export_specifier<F>(
        strategy: &mut F,
        cx: &mut FormatContext<'_>,
        specifier: &ExportSpecifier,
        source: Option<&str>,
        _span: Span,
        out: &mut Vec<Tagged>,
    ) -> Result<(), FormatError>
    where
        F: ModuleFormatter + ?Sized,
    {
        let value = match source {
            Some(source) => {
                let reference = Expr::Ident(strategy.external_reference(cx, source, out));
                Expr::member(reference, specifier.local.clone())
            }
            None => Expr::Ident(specifier.local.clone()),
        };
        out.push(Tagged::untagged(template::exports_assign(
            specifier.exported.clone(),
            value,
        )));
        Ok(())
    }
}

fn validate_import(record: &ImportRecord) -> Result<(), FormatError> {
    if record.source.is_empty() {
        return Err(FormatError::malformed_import(
            record.span,
            "import has an empty source specifier",
        ));
    }
    for specifier in &record.specifiers {
        if specifier.local().name.is_empty() {
            return Err(FormatError::malformed_import(
                record.span,
                "import specifier has an empty local binding",
            ));
        }
        if let ImportSpecifier::Named { imported, .. } = specifier {
            if imported.name.is_empty() {
                return Err(FormatError::malformed_import(
                    record.span,
                    "named import specifier has an empty imported name",
                ));
            }
        }
    }
    Ok(())
}

fn validate_export(record: &ExportRecord) -> Result<(), FormatError> {
    match &record.kind {
        ExportKind::Specifiers { specifiers, .. } => {
            for specifier in specifiers {
                if specifier.local.name.is_empty() || specifier.exported.name.is_empty() {
                    return Err(FormatError::malformed_export(
                        record.span,
                        "export specifier lacks a local or exported name",
                    ));
                }
            }
        }
        ExportKind::Declaration {
            declaration,
            default,
        } => {
            let has_binding = matches!(
                declaration.as_ref(),
                Stmt::FunctionDecl { .. } | Stmt::ClassDecl { .. } | Stmt::VarDecl { .. }
            );
            if !has_binding {
                return Err(FormatError::malformed_export(
                    record.span,
                    "declaration export does not introduce a binding",
                ));
            }
            let is_anonymous = matches!(
                declaration.as_ref(),
                Stmt::FunctionDecl { name: None, .. } | Stmt::ClassDecl { name: None }
            );
            if is_anonymous && !default {
                return Err(FormatError::malformed_export(
                    record.span,
                    "named export declaration has no binding name",
                ));
            }
        }
    }
    Ok(())
}

/// Synchronous-require formatter: imports become hoisted `require` variable
/// declarations; the program is not wrapped.
pub struct CommonJsFormatter;

impl CommonJsFormatter {
    pub fn new() -> Self {
        CommonJsFormatter
    }
}

impl ModuleFormatter for CommonJsFormatter {
    fn setup(&mut self, cx: &mut FormatContext<'_>, program: &Program) -> Result<(), FormatError> {
        let seed = cx.state.has_non_default_exports;
        CommonFormat::scan(cx, program, seed)
    }

    fn transform(
        &mut self,
        cx: &mut FormatContext<'_>,
        program: &mut Program,
    ) -> Result<(), FormatError> {
        CommonFormat::rewrite(self, cx, program)
    }

    fn exports_default_on_object(&self) -> bool {
        true
    }

    /// First resolution emits `var <ref> = require("<source>");`, hoisted
    /// above ordinary statements. The reference is named after the default
    /// binding when the module is imported default-style.
    fn external_reference(
        &mut self,
        cx: &mut FormatContext<'_>,
        source: &str,
        out: &mut Vec<Tagged>,
    ) -> Ident {
        let FormatContext { scope, state, .. } = cx;
        if let Some(existing) = state.refs.get(source) {
            return existing.clone();
        }
        let hint = state
            .default_ids
            .get(source)
            .map_or(source, |binding| binding.name.as_str());
        let reference = scope.generate_uid(hint);
        state.refs.insert(source, reference.clone());
        out.push(Tagged::with_priority(
            template::var_decl(
                reference.clone(),
                Expr::call(Expr::ident("require"), vec![Expr::string(source)]),
            ),
            hoist::EARLY,
        ));
        reference
    }

    fn import_declaration(
        &mut self,
        cx: &mut FormatContext<'_>,
        record: &ImportRecord,
        out: &mut Vec<Tagged>,
    ) -> Result<(), FormatError> {
        // side-effect imports still require the module
        let _ = self.external_reference(cx, &record.source, out);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file::SourceFile;
    use crate::helpers::Helpers;
    use crate::options::ModuleOptions;
    use crate::state::FormatterState;
    use remod_ast::{Scope, ScopeId};

    fn specifier_default() -> ImportSpecifier {
        ImportSpecifier::Default(Ident::new("d"))
    }

    fn specifier_namespace() -> ImportSpecifier {
        ImportSpecifier::Namespace(Ident::new("ns"))
    }

    fn specifier_named() -> ImportSpecifier {
        ImportSpecifier::Named {
            imported: Ident::new("a"),
            local: Ident::new("a"),
        }
    }

    struct Fixture {
        file: SourceFile,
        options: ModuleOptions,
        scope: Scope,
        helpers: Helpers,
    }

    impl Fixture {
        fn new() -> Self {
            Fixture {
                file: SourceFile::new("src/mod.js"),
                options: ModuleOptions::default(),
                scope: Scope::new(ScopeId(0)),
                helpers: Helpers::new(),
            }
        }

        fn cx(&mut self) -> FormatContext<'_> {
            FormatContext {
                file: &self.file,
                options: &self.options,
                scope: &mut self.scope,
                helpers: &mut self.helpers,
                state: FormatterState::default(),
            }
        }
    }

    #[test]
    fn every_specifier_classifies_to_exactly_one_expected_case() {
        let mut fixture = Fixture::new();
        fixture.file.mark_module_type("abs", ModuleType::Absolute);
        fixture
            .file
            .mark_module_type("absd", ModuleType::AbsoluteDefault);
        fixture.options.dynamic_import_sources.insert("dyn".to_string());
        let cx = fixture.cx();

        let cases = [
            (specifier_default(), "abs", ImportCase::Absolute),
            (specifier_namespace(), "abs", ImportCase::Absolute),
            (specifier_default(), "absd", ImportCase::AbsoluteDefault),
            (specifier_namespace(), "m", ImportCase::Namespace),
            (specifier_default(), "m", ImportCase::InteropDefault),
            (specifier_default(), "dyn", ImportCase::Named),
            (specifier_named(), "m", ImportCase::Named),
        ];
        for (specifier, source, expected) in cases {
            assert_eq!(
                classify(&cx, &specifier, source),
                expected,
                "{specifier:?} from {source:?}"
            );
        }
    }

    #[test]
    fn disabling_interop_downgrades_default_imports_to_named() {
        let mut fixture = Fixture::new();
        fixture.options.no_interop_require_import = true;
        let cx = fixture.cx();
        assert_eq!(classify(&cx, &specifier_default(), "m"), ImportCase::Named);
    }

    #[test]
    fn scan_records_sources_flags_and_default_bindings() {
        let mut fixture = Fixture::new();
        let mut cx = fixture.cx();
        let program = Program::new(vec![
            Stmt::Import(ImportRecord::new(
                Span::new(0, 20),
                "m",
                vec![specifier_default()],
            )),
            Stmt::Export(ExportRecord::declaration(
                Span::new(25, 55),
                Stmt::FunctionDecl {
                    name: Some(Ident::new("foo")),
                    params: vec![],
                    body: vec![],
                },
                true,
            )),
        ]);

        CommonFormat::scan(&mut cx, &program, false).unwrap();

        assert!(cx.state.imported_sources.contains("m"));
        assert_eq!(cx.state.default_ids.get("m"), Some(&Ident::new("d")));
        // a default declaration export alone does not set the flag
        assert!(!cx.state.has_non_default_exports);
        assert!(cx.scope.has_binding("exports"));
        assert!(cx.scope.has_binding("module"));
    }

    #[test]
    fn scan_keeps_the_strategy_seed() {
        let mut fixture = Fixture::new();
        let mut cx = fixture.cx();
        CommonFormat::scan(&mut cx, &Program::default(), true).unwrap();
        assert!(cx.state.has_non_default_exports);
    }

    #[test]
    fn scan_counts_named_declaration_exports_as_non_default() {
        let mut fixture = Fixture::new();
        let mut cx = fixture.cx();
        let program = Program::new(vec![Stmt::Export(ExportRecord::declaration(
            Span::new(0, 25),
            Stmt::VarDecl {
                name: Ident::new("x"),
                init: None,
            },
            false,
        ))]);
        CommonFormat::scan(&mut cx, &program, false).unwrap();
        assert!(cx.state.has_non_default_exports);
    }
}
