//! Coverage for the universal wrapper.

use remod_ast::{
    Expr, Ident, ImportRecord, ImportSpecifier, Program, Scope, ScopeId, Span, Stmt,
};
use remod_modules::{Helpers, ModuleFormatKind, ModuleOptions, SourceFile, format_module};

fn import(source: &str, specifiers: Vec<ImportSpecifier>) -> Stmt {
    Stmt::Import(ImportRecord::new(Span::new(0, 20), source, specifiers))
}

fn named(name: &str) -> ImportSpecifier {
    ImportSpecifier::Named {
        imported: Ident::new(name),
        local: Ident::new(name),
    }
}

fn format_umd(program: &mut Program, options: &ModuleOptions) {
    let file = SourceFile::new("src/mod.js");
    let mut scope = Scope::new(ScopeId(0));
    let mut helpers = Helpers::new();
    format_module(
        ModuleFormatKind::Umd,
        program,
        &file,
        options,
        &mut scope,
        &mut helpers,
    )
    .expect("formatting should succeed");
}

struct Universal {
    factory_param: String,
    commonjs_args: Vec<Expr>,
    define_args: Vec<Expr>,
    container_params: Vec<String>,
}

/// Pick apart `(function (f) { if (...) f(...); else if (...) define(...); })(function (params) {...})`.
fn universal(program: &Program) -> Universal {
    assert_eq!(program.body.len(), 1);
    let Stmt::Expr(Expr::Call { callee, arguments }) = &program.body[0] else {
        panic!("expected the outer call, got {:?}", program.body[0]);
    };
    let Expr::FunctionExpr { params, body, .. } = callee.as_ref() else {
        panic!("expected the dispatch closure, got {callee:?}");
    };
    let [factory_param] = params.as_slice() else {
        panic!("dispatch closure takes the factory only, got {params:?}");
    };

    let [Stmt::If {
        consequent,
        alternate: Some(alternate),
        ..
    }] = body.as_slice()
    else {
        panic!("expected the two-branch dispatch, got {body:?}");
    };
    let [Stmt::Expr(Expr::Call {
        arguments: commonjs_args,
        ..
    })] = consequent.as_slice()
    else {
        panic!("expected the factory call branch, got {consequent:?}");
    };
    let [Stmt::If {
        consequent: define_branch,
        ..
    }] = alternate.as_slice()
    else {
        panic!("expected the define branch, got {alternate:?}");
    };
    let [Stmt::Expr(Expr::Call {
        callee: define_callee,
        arguments: define_args,
    })] = define_branch.as_slice()
    else {
        panic!("expected the define call, got {define_branch:?}");
    };
    assert_eq!(define_callee.as_ref(), &Expr::ident("define"));

    let [Expr::FunctionExpr {
        params: container_params,
        ..
    }] = arguments.as_slice()
    else {
        panic!("the outer call takes the factory function, got {arguments:?}");
    };

    Universal {
        factory_param: factory_param.name.clone(),
        commonjs_args: commonjs_args.clone(),
        define_args: define_args.clone(),
        container_params: container_params.iter().map(|p| p.name.clone()).collect(),
    }
}

fn dependency_names(define_args: &[Expr]) -> Vec<String> {
    let array = define_args
        .iter()
        .find_map(|arg| match arg {
            Expr::ArrayLiteral(elements) => Some(elements),
            _ => None,
        })
        .expect("define must receive the dependency-name array");
    array
        .iter()
        .map(|element| match element {
            Expr::StringLiteral(name) => name.clone(),
            other => panic!("dependency names must be string literals, got {other:?}"),
        })
        .collect()
}

#[test]
fn both_branches_stay_index_aligned_with_the_factory_params() {
    let mut program = Program::new(vec![
        import("a", vec![named("x")]),
        import("b", vec![named("y")]),
        Stmt::Export(remod_ast::ExportRecord::declaration(
            Span::new(40, 70),
            Stmt::FunctionDecl {
                name: Some(Ident::new("foo")),
                params: vec![],
                body: vec![],
            },
            true,
        )),
    ]);
    format_umd(&mut program, &ModuleOptions::default());

    let u = universal(&program);
    assert_eq!(u.container_params, ["exports", "module", "_a", "_b"]);
    assert_eq!(
        dependency_names(&u.define_args),
        ["exports", "module", "a", "b"]
    );
    assert_eq!(*u.define_args.last().unwrap(), Expr::ident(u.factory_param.clone()));

    // factory(exports, module, require("a"), require("b"))
    assert_eq!(u.commonjs_args.len(), u.container_params.len());
    assert_eq!(u.commonjs_args[0], Expr::ident("exports"));
    assert_eq!(u.commonjs_args[1], Expr::ident("module"));
    assert_eq!(
        u.commonjs_args[2],
        Expr::call(Expr::ident("require"), vec![Expr::string("a")])
    );
    assert_eq!(
        u.commonjs_args[3],
        Expr::call(Expr::ident("require"), vec![Expr::string("b")])
    );
}

#[test]
fn module_id_appears_only_in_the_define_branch() {
    let options = ModuleOptions::from_json_str(r#"{"moduleIds": true}"#).unwrap();
    let mut program = Program::new(vec![import("a", vec![named("x")])]);
    format_umd(&mut program, &options);

    let u = universal(&program);
    assert_eq!(u.define_args.len(), 3);
    assert_eq!(u.define_args[0], Expr::string("src/mod"));
    // the synchronous branch has no use for the id
    assert!(u.commonjs_args.iter().all(|arg| *arg != Expr::string("src/mod")));
}

#[test]
fn no_module_argument_without_default_export_interop() {
    let mut program = Program::new(vec![import("a", vec![named("x")])]);
    format_umd(&mut program, &ModuleOptions::default());

    let u = universal(&program);
    assert_eq!(u.container_params, ["exports", "_a"]);
    assert_eq!(dependency_names(&u.define_args), ["exports", "a"]);
    assert_eq!(u.commonjs_args.len(), 2);
}
