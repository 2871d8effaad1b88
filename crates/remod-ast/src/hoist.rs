//! Statement layout ordering.
//!
//! Synthesized statements carry an optional priority; the layout pass moves
//! tagged statements ahead of untagged ones, highest priority first, while
//! keeping the relative order of equal-priority statements. Statement
//! construction stays free of layout concerns: strategies only attach a
//! priority, this module decides placement.

use crate::ir::Stmt;

/// Statements that must land next to hoisted declarations, above ordinary
/// code, like the export assignment paired with an exported function
/// declaration, which stays observable through function hoisting.
pub const DECLARATION_ADJACENT: u8 = 3;

/// Statements lifted above ordinary code but below declaration-adjacent
/// ones, like synchronous-require module loads.
pub const EARLY: u8 = 2;

/// A statement paired with its layout priority. `None` means the statement
/// keeps its natural position after all tagged statements.
#[derive(Debug, Clone, PartialEq)]
pub struct Tagged {
    pub stmt: Stmt,
    pub priority: Option<u8>,
}

impl Tagged {
    pub fn untagged(stmt: Stmt) -> Self {
        Tagged {
            stmt,
            priority: None,
        }
    }

    pub fn with_priority(stmt: Stmt, priority: u8) -> Self {
        Tagged {
            stmt,
            priority: Some(priority),
        }
    }
}

/// Stable-sort by descending priority; untagged statements keep their
/// relative order after every tagged one.
pub fn reorder(mut statements: Vec<Tagged>) -> Vec<Stmt> {
    statements.sort_by_key(|tagged| std::cmp::Reverse(tagged.priority.unwrap_or(0)));
    statements.into_iter().map(|tagged| tagged.stmt).collect()
}
