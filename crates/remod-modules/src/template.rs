//! Fixed statement shapes filled from named slots.

use remod_ast::{Expr, Ident, Stmt};

/// `exports.default = VALUE;`
pub fn exports_default_assign(value: Expr) -> Stmt {
    exports_assign(Ident::new("default"), value)
}

/// `exports.NAME = VALUE;`
pub fn exports_assign(name: Ident, value: Expr) -> Stmt {
    Stmt::Expr(Expr::assign(
        Expr::member(Expr::ident("exports"), name),
        value,
    ))
}

/// `var NAME = INIT;`
pub fn var_decl(name: Ident, init: Expr) -> Stmt {
    Stmt::VarDecl {
        name,
        init: Some(init),
    }
}
