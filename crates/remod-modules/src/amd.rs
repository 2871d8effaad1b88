//! Asynchronous-module-definition formatter.
//!
//! Wraps the entire rewritten body in a `define` call:
//!
//! ```javascript
//! import { a } from "m";
//! export default function foo() {}
//! ```
//!
//! becomes
//!
//! ```javascript
//! define(["exports", "module", "m"], function (exports, module, _m) {
//!     exports.default = foo;
//!     function foo() {}
//! });
//! ```
//!
//! The dependency-name array and the wrapper-parameter list are built from
//! the same first-seen ordering and must stay index-aligned.

use remod_ast::hoist::Tagged;
use remod_ast::{Expr, Ident, ImportRecord, Program, Stmt};

use crate::common::CommonFormat;
use crate::error::FormatError;
use crate::formatter::{FormatContext, ModuleFormatter, default_module_name};

/// Dependency-name array: `"exports"`, `"module"` when the wrapper takes a
/// module object, then every source specifier in first-seen order.
pub(crate) fn dependency_names(cx: &FormatContext<'_>) -> Vec<Expr> {
    let mut names = vec![Expr::string("exports")];
    if cx.state.pass_module_arg {
        names.push(Expr::string("module"));
    }
    names.extend(cx.state.refs.sources().map(Expr::string));
    names
}

/// Wrapper parameters, index-aligned with [`dependency_names`].
pub(crate) fn dependency_params(cx: &FormatContext<'_>) -> Vec<Ident> {
    let mut params = vec![Ident::new("exports")];
    if cx.state.pass_module_arg {
        params.push(Ident::new("module"));
    }
    params.extend(cx.state.refs.entries().map(|(_, reference)| reference.clone()));
    params
}

/// Module-id literal for the wrapper call, present only when module ids are
/// enabled.
pub(crate) fn module_name(cx: &FormatContext<'_>) -> Option<String> {
    cx.options.module_ids.then(|| default_module_name(cx))
}

pub struct AmdFormatter;

impl AmdFormatter {
    pub fn new() -> Self {
        AmdFormatter
    }
}

impl ModuleFormatter for AmdFormatter {
    fn setup(&mut self, cx: &mut FormatContext<'_>, program: &Program) -> Result<(), FormatError> {
        let seed = cx.state.has_non_default_exports;
        CommonFormat::scan(cx, program, seed)
    }

    fn exports_default_on_object(&self) -> bool {
        true
    }

    fn module_name(&self, cx: &FormatContext<'_>) -> Option<String> {
        module_name(cx)
    }

    fn import_declaration(
        &mut self,
        cx: &mut FormatContext<'_>,
        record: &ImportRecord,
        out: &mut Vec<Tagged>,
    ) -> Result<(), FormatError> {
        // side-effect imports still claim a dependency slot
        let _ = self.external_reference(cx, &record.source, out);
        Ok(())
    }

    /// Wrap the entire body in a `define` wrapper.
    #[tracing::instrument(level = "debug", skip_all)]
    fn transform(
        &mut self,
        cx: &mut FormatContext<'_>,
        program: &mut Program,
    ) -> Result<(), FormatError> {
        CommonFormat::rewrite(self, cx, program)?;

        let body = std::mem::take(&mut program.body);

        let names = dependency_names(cx);
        let params = dependency_params(cx);
        debug_assert_eq!(names.len(), params.len(), "dependency/parameter misalignment");

        let container = Expr::function(None, params, body);

        let mut arguments = Vec::with_capacity(3);
        if let Some(name) = self.module_name(cx) {
            arguments.push(Expr::string(name));
        }
        arguments.push(Expr::array(names));
        arguments.push(container);

        tracing::debug!(
            dependencies = cx.state.refs.len(),
            pass_module_arg = cx.state.pass_module_arg,
            "assembled define wrapper"
        );
        program.body = vec![Stmt::Expr(Expr::call(Expr::ident("define"), arguments))];
        Ok(())
    }
}
