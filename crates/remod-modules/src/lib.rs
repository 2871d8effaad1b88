//! Module-output stage of the remod source-to-source compiler.
//!
//! Given a parsed program whose top-level statements include resolved
//! import/export records, this stage rewrites the program into an
//! equivalent one expressed in a chosen module-loading convention. The
//! strategies share one intermediate representation (a generated-reference
//! table, a binding-remap table, and hoist-tagged statements) and differ
//! only in how the final wrapped program is assembled.
//!
//! ```javascript
//! import d from "m";
//! ```
//!
//! under the asynchronous-definition convention becomes
//!
//! ```javascript
//! define(["exports", "m"], function (exports, _m) {
//!     var _d = _interopRequireDefault(_m);
//! });
//! ```
//!
//! with the use sites of `d` recorded in the remap table for the downstream
//! name-rewrite pass.
//!
//! Formatting is single-threaded and runs each module to completion; all
//! tables and flags are private to one pass, so the driver may parallelize
//! across independent modules without any sharing discipline here.

pub mod amd;
pub mod common;
pub mod error;
pub mod file;
pub mod formatter;
pub mod helpers;
pub mod ignore;
pub mod options;
pub mod state;
pub mod template;
pub mod umd;

pub use amd::AmdFormatter;
pub use common::{CommonFormat, CommonJsFormatter};
pub use error::FormatError;
pub use file::{ModuleType, SourceFile};
pub use formatter::{FormatContext, ModuleFormatter};
pub use helpers::{Helper, Helpers};
pub use ignore::IgnoreFormatter;
pub use options::ModuleOptions;
pub use state::{FormatterState, ModuleRefs, RemapTable};
pub use umd::UmdFormatter;

use remod_ast::{Program, Scope};

/// The module-loading conventions this stage can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleFormatKind {
    /// Asynchronous module definition (`define` wrapper).
    Amd,
    /// Synchronous require (no wrapper).
    CommonJs,
    /// Universal wrapper dispatching between the two.
    Umd,
    /// Leave module syntax untouched.
    Ignore,
}

/// What a formatting pass hands back to the driver alongside the rewritten
/// program.
#[derive(Debug, Clone)]
pub struct FormatOutcome {
    /// Binding remaps for the downstream name-rewrite pass.
    pub remaps: RemapTable,
    /// Source specifiers in first-seen order.
    pub dependencies: Vec<String>,
    pub pass_module_arg: bool,
    pub has_non_default_exports: bool,
}

/// Format one module: run the chosen strategy's `setup` then `transform`
/// over the program, rewriting its statement list in place.
#[tracing::instrument(level = "debug", skip_all, fields(file = %file.filename, format = ?kind))]
pub fn format_module(
    kind: ModuleFormatKind,
    program: &mut Program,
    file: &SourceFile,
    options: &ModuleOptions,
    scope: &mut Scope,
    helpers: &mut Helpers,
) -> Result<FormatOutcome, FormatError> {
    let mut cx = FormatContext {
        file,
        options,
        scope,
        helpers,
        state: FormatterState::default(),
    };

    match kind {
        ModuleFormatKind::Amd => run(AmdFormatter::new(), &mut cx, program)?,
        ModuleFormatKind::CommonJs => run(CommonJsFormatter::new(), &mut cx, program)?,
        ModuleFormatKind::Umd => run(UmdFormatter::new(), &mut cx, program)?,
        ModuleFormatKind::Ignore => run(IgnoreFormatter, &mut cx, program)?,
    }

    let dependencies: Vec<String> = cx.state.refs.sources().map(str::to_string).collect();
    Ok(FormatOutcome {
        dependencies,
        pass_module_arg: cx.state.pass_module_arg,
        has_non_default_exports: cx.state.has_non_default_exports,
        remaps: cx.state.remaps,
    })
}

fn run<F: ModuleFormatter>(
    mut strategy: F,
    cx: &mut FormatContext<'_>,
    program: &mut Program,
) -> Result<(), FormatError> {
    strategy.setup(cx, program)?;
    strategy.transform(cx, program)
}
