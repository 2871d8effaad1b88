//! Universal-wrapper formatter.
//!
//! Produces a factory closure dispatched at runtime between the
//! synchronous-require and asynchronous-definition loaders:
//!
//! ```javascript
//! (function (_factory) {
//!     if (typeof module === "object" && typeof module.exports === "object") {
//!         _factory(exports, require("m"));
//!     } else if (typeof define === "function" && define.amd) {
//!         define(["exports", "m"], _factory);
//!     }
//! })(function (exports, _m) {
//!     // rewritten body
//! });
//! ```
//!
//! Scan, policy, and the dependency/parameter builders are reused from the
//! asynchronous-definition strategy; only the outer shell differs.

use remod_ast::{Expr, Ident, Program, Stmt};

use crate::amd;
use crate::common::CommonFormat;
use crate::error::FormatError;
use crate::formatter::{FormatContext, ModuleFormatter};

pub struct UmdFormatter;

impl UmdFormatter {
    pub fn new() -> Self {
        UmdFormatter
    }
}

fn type_of_is(expr: Expr, expected: &str) -> Expr {
    Expr::binary(Expr::unary("typeof", expr), "===", Expr::string(expected))
}

impl ModuleFormatter for UmdFormatter {
    fn setup(&mut self, cx: &mut FormatContext<'_>, program: &Program) -> Result<(), FormatError> {
        let seed = cx.state.has_non_default_exports;
        CommonFormat::scan(cx, program, seed)
    }

    fn exports_default_on_object(&self) -> bool {
        true
    }

    fn module_name(&self, cx: &FormatContext<'_>) -> Option<String> {
        amd::module_name(cx)
    }

    fn import_declaration(
        &mut self,
        cx: &mut FormatContext<'_>,
        record: &remod_ast::ImportRecord,
        out: &mut Vec<remod_ast::hoist::Tagged>,
    ) -> Result<(), FormatError> {
        let _ = self.external_reference(cx, &record.source, out);
        Ok(())
    }

    #[tracing::instrument(level = "debug", skip_all)]
    fn transform(
        &mut self,
        cx: &mut FormatContext<'_>,
        program: &mut Program,
    ) -> Result<(), FormatError> {
        CommonFormat::rewrite(self, cx, program)?;

        let body = std::mem::take(&mut program.body);
        let names = amd::dependency_names(cx);
        let params = amd::dependency_params(cx);
        debug_assert_eq!(names.len(), params.len(), "dependency/parameter misalignment");

        let factory = cx.scope.generate_uid("factory");

        // synchronous-require branch: factory(exports, module?, require("dep")...)
        let mut factory_args = vec![Expr::ident("exports")];
        if cx.state.pass_module_arg {
            factory_args.push(Expr::ident("module"));
        }
        factory_args.extend(cx.state.refs.sources().map(|source| {
            Expr::call(Expr::ident("require"), vec![Expr::string(source)])
        }));
        let commonjs_call = Stmt::Expr(Expr::call(Expr::Ident(factory.clone()), factory_args));

        // loader-definition branch: define(id?, [names], factory)
        let mut define_args = Vec::with_capacity(3);
        if let Some(name) = self.module_name(cx) {
            define_args.push(Expr::string(name));
        }
        define_args.push(Expr::array(names));
        define_args.push(Expr::Ident(factory.clone()));
        let amd_call = Stmt::Expr(Expr::call(Expr::ident("define"), define_args));

        let commonjs_test = Expr::binary(
            type_of_is(Expr::ident("module"), "object"),
            "&&",
            type_of_is(
                Expr::member(Expr::ident("module"), Ident::new("exports")),
                "object",
            ),
        );
        let amd_test = Expr::binary(
            type_of_is(Expr::ident("define"), "function"),
            "&&",
            Expr::member(Expr::ident("define"), Ident::new("amd")),
        );

        let dispatch = Stmt::If {
            test: commonjs_test,
            consequent: vec![commonjs_call],
            alternate: Some(vec![Stmt::If {
                test: amd_test,
                consequent: vec![amd_call],
                alternate: None,
            }]),
        };

        let shell = Expr::function(None, vec![factory], vec![dispatch]);
        let container = Expr::function(None, params, body);

        tracing::debug!(dependencies = cx.state.refs.len(), "assembled universal wrapper");
        program.body = vec![Stmt::Expr(Expr::call(shell, vec![container]))];
        Ok(())
    }
}
