//! Formatting options.
//!
//! The option set is closed: configs are rejected when they carry keys this
//! stage does not recognize. Options are read-only for the duration of a
//! formatting pass.

use rustc_hash::FxHashSet;
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct ModuleOptions {
    /// Include a literal module-name argument in the wrapper call.
    pub module_ids: bool,

    /// Suppress default-import interop; default imports resolve through a
    /// plain `.default` member access instead of the runtime helper.
    pub no_interop_require_import: bool,

    /// Source specifiers whose import sites originate from a runtime/dynamic
    /// import form and are therefore excluded from interop.
    pub dynamic_import_sources: FxHashSet<String>,
}

impl ModuleOptions {
    /// Parse options from a JSON config fragment.
    pub fn from_json_str(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}
