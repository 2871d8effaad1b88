//! Pass-through strategy for files that opt out of module rewriting.

use crate::formatter::ModuleFormatter;

/// Leaves the program untouched; only the base fallbacks apply.
pub struct IgnoreFormatter;

impl ModuleFormatter for IgnoreFormatter {}
