//! Runtime-helper references.
//!
//! Helper bodies are injected elsewhere in the pipeline; this stage only
//! resolves a deduplicated reference per compilation unit and calls the
//! helper by that reference.

use remod_ast::{Ident, Scope};
use rustc_hash::FxHashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Helper {
    /// Adapts a module authored with a default-value-centric export
    /// convention for property-on-object consumption.
    InteropRequireDefault,
}

impl Helper {
    pub const fn name(self) -> &'static str {
        match self {
            Helper::InteropRequireDefault => "interop-require-default",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Helpers {
    refs: FxHashMap<Helper, Ident>,
}

impl Helpers {
    pub fn new() -> Self {
        Helpers {
            refs: FxHashMap::default(),
        }
    }

    /// Resolve the reference for a helper, generating it on first use.
    pub fn add(&mut self, helper: Helper, scope: &mut Scope) -> Ident {
        if let Some(existing) = self.refs.get(&helper) {
            return existing.clone();
        }
        let reference = scope.generate_uid(helper.name());
        self.refs.insert(helper, reference.clone());
        reference
    }

    pub fn is_needed(&self, helper: Helper) -> bool {
        self.refs.contains_key(&helper)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use remod_ast::ScopeId;

    #[test]
    fn helper_references_are_deduplicated() {
        let mut scope = Scope::new(ScopeId(0));
        let mut helpers = Helpers::new();
        let first = helpers.add(Helper::InteropRequireDefault, &mut scope);
        let second = helpers.add(Helper::InteropRequireDefault, &mut scope);
        assert_eq!(first, second);
        assert_eq!(first.name, "_interopRequireDefault");
        assert!(helpers.is_needed(Helper::InteropRequireDefault));
    }

    #[test]
    fn unused_helpers_are_not_needed() {
        let helpers = Helpers::new();
        assert!(!helpers.is_needed(Helper::InteropRequireDefault));
    }
}
