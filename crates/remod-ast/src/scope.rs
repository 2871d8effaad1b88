//! Binding scope with unique-identifier generation.
//!
//! The module-output stage synthesizes fresh bindings (wrapper parameters,
//! interop temporaries, helper references) that must never collide with
//! anything visible in the program. The scope tracks every live binding,
//! including previously generated ones, and derives readable names from a
//! hint: `"./utils"` yields `_utils`, then `_utils2` on collision.

use crate::ir::Ident;
use rustc_hash::FxHashSet;

/// Identity of a scope, used to qualify binding-remap entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeId(pub u32);

#[derive(Debug, Clone)]
pub struct Scope {
    id: ScopeId,
    bindings: FxHashSet<String>,
}

impl Scope {
    pub fn new(id: ScopeId) -> Self {
        Scope {
            id,
            bindings: FxHashSet::default(),
        }
    }

    pub fn with_bindings<I, S>(id: ScopeId, bindings: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Scope {
            id,
            bindings: bindings.into_iter().map(Into::into).collect(),
        }
    }

    pub fn id(&self) -> ScopeId {
        self.id
    }

    pub fn has_binding(&self, name: &str) -> bool {
        self.bindings.contains(name)
    }

    /// Register a binding that must not be shadowed by generated names.
    pub fn add_binding(&mut self, name: &str) {
        self.bindings.insert(name.to_string());
    }

    /// Generate an identifier distinct from every visible binding, derived
    /// from `hint` for readability. The result is registered so later calls
    /// cannot collide with it. Exhausting the representable names is fatal.
    pub fn generate_uid(&mut self, hint: &str) -> Ident {
        let base = sanitize_hint(hint);
        let mut candidate = format!("_{base}");
        let mut attempt: u32 = 2;
        while self.bindings.contains(&candidate) {
            candidate = format!("_{base}{attempt}");
            attempt = attempt
                .checked_add(1)
                .expect("identifier space exhausted while generating a unique name");
        }
        self.bindings.insert(candidate.clone());
        Ident::new(candidate)
    }
}

/// Reduce an arbitrary hint (often a module specifier) to identifier
/// characters, camel-casing at separators: `"interop-require-default"`
/// becomes `interopRequireDefault`, `"./utils"` becomes `utils`.
fn sanitize_hint(hint: &str) -> String {
    let mut out = String::with_capacity(hint.len());
    let mut upper_next = false;
    for ch in hint.chars() {
        if ch.is_ascii_alphanumeric() || ch == '_' || ch == '$' {
            if out.is_empty() && ch.is_ascii_digit() {
                // identifiers cannot start with a digit
                out.push('n');
            }
            if upper_next && !out.is_empty() {
                out.extend(ch.to_uppercase());
            } else {
                out.push(ch);
            }
            upper_next = false;
        } else {
            upper_next = !out.is_empty();
        }
    }
    if out.is_empty() { "ref".to_string() } else { out }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uid_is_prefixed_and_registered() {
        let mut scope = Scope::new(ScopeId(0));
        let id = scope.generate_uid("m");
        assert_eq!(id.name, "_m");
        assert!(scope.has_binding("_m"));
    }

    #[test]
    fn uid_suffixes_on_collision() {
        let mut scope = Scope::with_bindings(ScopeId(0), ["_d"]);
        assert_eq!(scope.generate_uid("d").name, "_d2");
        assert_eq!(scope.generate_uid("d").name, "_d3");
    }

    #[test]
    fn generated_names_never_collide_with_each_other() {
        let mut scope = Scope::new(ScopeId(0));
        let a = scope.generate_uid("mod");
        let b = scope.generate_uid("mod");
        assert_ne!(a, b);
    }

    #[test]
    fn hints_are_sanitized_to_identifier_characters() {
        assert_eq!(sanitize_hint("./utils"), "utils");
        assert_eq!(sanitize_hint("interop-require-default"), "interopRequireDefault");
        assert_eq!(sanitize_hint("lodash/fp"), "lodashFp");
        assert_eq!(sanitize_hint("404-module"), "n404Module");
        assert_eq!(sanitize_hint("!!!"), "ref");
    }
}
