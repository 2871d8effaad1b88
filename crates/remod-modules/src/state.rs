//! Tables and flags owned by one formatting pass.
//!
//! Every mutation of these tables happens in the scan/rewrite pass; nothing
//! here survives past a single module's formatting (the remap table is moved
//! out to the caller when the pass completes).

use indexmap::IndexMap;
use remod_ast::{Expr, Ident, ScopeId};
use rustc_hash::{FxHashMap, FxHashSet};

/// Order-preserving, deduplicating map from source-module specifier to its
/// generated reference.
///
/// Insertion order is first-encounter order and is load-bearing: it fixes
/// both the dependency-name array and the wrapper-parameter list, which must
/// stay index-aligned.
#[derive(Debug, Clone, Default)]
pub struct ModuleRefs {
    entries: IndexMap<String, Ident>,
}

impl ModuleRefs {
    pub fn new() -> Self {
        ModuleRefs {
            entries: IndexMap::new(),
        }
    }

    /// Memoizing resolve: the first call for a source stores `make()`'s
    /// result; every later call returns the stored identifier unchanged.
    pub fn resolve_with(&mut self, source: &str, make: impl FnOnce() -> Ident) -> Ident {
        if let Some(found) = self.entries.get(source) {
            return found.clone();
        }
        let reference = make();
        self.entries.insert(source.to_string(), reference.clone());
        reference
    }

    pub fn get(&self, source: &str) -> Option<&Ident> {
        self.entries.get(source)
    }

    /// Store a reference for a source seen for the first time. Entries are
    /// never overwritten once set.
    pub fn insert(&mut self, source: &str, reference: Ident) {
        debug_assert!(
            !self.entries.contains_key(source),
            "module reference for {source:?} resolved twice"
        );
        self.entries.entry(source.to_string()).or_insert(reference);
    }

    /// Entries in first-seen order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &Ident)> {
        self.entries.iter().map(|(source, id)| (source.as_str(), id))
    }

    pub fn sources(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Scope-qualified mapping from an original local binding to its replacement
/// expression, consumed by the downstream name-rewrite pass. Entries are
/// add-only for the duration of a formatting pass.
#[derive(Debug, Clone, Default)]
pub struct RemapTable {
    entries: FxHashMap<(ScopeId, String), Expr>,
}

impl RemapTable {
    pub fn new() -> Self {
        RemapTable {
            entries: FxHashMap::default(),
        }
    }

    pub fn add(&mut self, scope: ScopeId, local: &str, replacement: Expr) {
        debug_assert!(
            !self.entries.contains_key(&(scope, local.to_string())),
            "binding {local:?} remapped twice in the same scope"
        );
        self.entries
            .entry((scope, local.to_string()))
            .or_insert(replacement);
    }

    pub fn get(&self, scope: ScopeId, local: &str) -> Option<&Expr> {
        self.entries.get(&(scope, local.to_string()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ScopeId, &str, &Expr)> {
        self.entries
            .iter()
            .map(|((scope, local), expr)| (*scope, local.as_str(), expr))
    }
}

/// The explicit state object threaded through one formatting pass.
#[derive(Debug, Clone, Default)]
pub struct FormatterState {
    /// Source module → generated reference, first-seen order.
    pub refs: ModuleRefs,
    /// Source module → local default/namespace binding; recognizes modules
    /// imported for default-style interop.
    pub default_ids: FxHashMap<String, Ident>,
    /// Original local binding → replacement expression.
    pub remaps: RemapTable,
    /// Every distinct source module the program references.
    pub imported_sources: FxHashSet<String>,
    /// The wrapper must accept a module-object parameter in addition to the
    /// exports object.
    pub pass_module_arg: bool,
    /// The program exports at least one non-default binding.
    pub has_non_default_exports: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use remod_ast::{Scope, ScopeId};

    #[test]
    fn resolve_is_idempotent_and_memoizing() {
        let mut scope = Scope::new(ScopeId(0));
        let mut refs = ModuleRefs::new();
        let first = refs.resolve_with("m", || scope.generate_uid("m"));
        let second = refs.resolve_with("m", || scope.generate_uid("m"));
        assert_eq!(first, second);
        assert_eq!(refs.len(), 1);
    }

    #[test]
    fn entries_preserve_first_seen_order() {
        let mut scope = Scope::new(ScopeId(0));
        let mut refs = ModuleRefs::new();
        for source in ["c", "a", "b", "a"] {
            refs.resolve_with(source, || scope.generate_uid(source));
        }
        let order: Vec<&str> = refs.sources().collect();
        assert_eq!(order, ["c", "a", "b"]);
    }

    #[test]
    fn remap_entries_are_scope_qualified() {
        let mut remaps = RemapTable::new();
        remaps.add(ScopeId(0), "a", Expr::ident("_m"));
        assert!(remaps.get(ScopeId(0), "a").is_some());
        assert!(remaps.get(ScopeId(1), "a").is_none());
        assert_eq!(remaps.len(), 1);
    }
}
