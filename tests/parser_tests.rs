// tests/parser_tests.rs

use logic_lint::ast::{
    BinOp, Expr, ExprId, ForHead, LogicalOp, NodeRef, Program, Stmt, UnaryOp,
};
use logic_lint::parser::{ParseError, parse, parse_expression_source};

fn expr(source: &str) -> (Program, ExprId) {
    parse_expression_source(source).unwrap()
}

// ============================================================================
// Expressions
// ============================================================================

#[test]
fn test_comparison() {
    let (program, id) = expr("price > 100");
    assert!(matches!(
        program.expr(id).kind,
        Expr::Binary {
            op: BinOp::GreaterThan,
            ..
        }
    ));
}

#[test]
fn test_parentheses() {
    let (program, id) = expr("(1 + 2) * 3");

    // Should be: Multiply(Add(1, 2), 3)
    match program.expr(id).kind {
        Expr::Binary {
            op: BinOp::Multiply,
            left,
            ..
        } => {
            assert!(matches!(
                program.expr(left).kind,
                Expr::Binary { op: BinOp::Add, .. }
            ));
            assert!(program.expr(left).is_parenthesized());
            assert_eq!(program.expr_text(left), "1 + 2");
            assert_eq!(program.expr_source(left), "(1 + 2)");
        }
        _ => panic!("Expected multiplication"),
    }
}

#[test]
fn test_logical_precedence() {
    let (program, id) = expr("a || b && c");

    // Should be: Or(a, And(b, c))
    match program.expr(id).kind {
        Expr::Logical {
            op: LogicalOp::Or,
            right,
            ..
        } => assert!(matches!(
            program.expr(right).kind,
            Expr::Logical {
                op: LogicalOp::And,
                ..
            }
        )),
        _ => panic!("Expected ||"),
    }
}

#[test]
fn test_exponent_is_right_associative() {
    let (program, id) = expr("2 ** 3 ** 2");
    match program.expr(id).kind {
        Expr::Binary {
            op: BinOp::Exponent,
            left,
            right,
        } => {
            assert_eq!(program.expr_text(left), "2");
            assert_eq!(program.expr_text(right), "3 ** 2");
        }
        _ => panic!("Expected **"),
    }
}

#[test]
fn test_negated_group_spans() {
    let (program, id) = expr("!(foo && 24)");
    let Expr::Unary {
        op: UnaryOp::Not,
        argument,
    } = program.expr(id).kind
    else {
        panic!("Expected !");
    };
    assert_eq!(program.expr_text(id), "!(foo && 24)");
    assert_eq!(program.expr_text(argument), "foo && 24");
    assert_eq!(program.parent(NodeRef::Expr(argument)), Some(NodeRef::Expr(id)));
}

#[test]
fn test_conditional_and_nullish() {
    let (program, id) = expr("a ? b ?? null : c");
    match program.expr(id).kind {
        Expr::Conditional { consequent, .. } => assert!(matches!(
            program.expr(consequent).kind,
            Expr::Logical {
                op: LogicalOp::Nullish,
                ..
            }
        )),
        _ => panic!("Expected conditional"),
    }
}

#[test]
fn test_arrow_functions() {
    for source in ["x => x + 1", "(a, b = 2) => { return a; }", "async (a) => a", "() => ({})"] {
        let (program, id) = expr(source);
        assert!(
            matches!(program.expr(id).kind, Expr::Function { arrow: true, .. }),
            "Failed for input: {}",
            source
        );
    }
}

#[test]
fn test_member_call_chain() {
    let (program, id) = expr("a?.b[c](d).e");
    assert!(matches!(program.expr(id).kind, Expr::Member { .. }));
    assert_eq!(program.expr_text(id), "a?.b[c](d).e");
    assert!(!program.is_pure(id));
}

#[test]
fn test_references_and_purity() {
    let (program, id) = expr("this.a['b'].c");
    assert!(program.is_reference(id));
    assert!(program.is_pure(id));

    let (program, id) = expr("a[b()]");
    assert!(!program.is_reference(id));
    assert!(!program.is_pure(id));
}

#[test]
fn test_object_literal() {
    let (program, id) = expr("({ a, b: 1, [c]: 2, ...d, get e() { return 1; }, 'f': g })");
    match &program.expr(id).kind {
        Expr::Object(members) => assert_eq!(members.len(), 6),
        other => panic!("Expected object literal, got {:?}", other),
    }
}

#[test]
fn test_new_expression() {
    let (program, id) = expr("new Foo.Bar(1, 2)");
    match &program.expr(id).kind {
        Expr::New { callee, arguments } => {
            assert_eq!(program.expr_text(*callee), "Foo.Bar");
            assert_eq!(arguments.len(), 2);
        }
        other => panic!("Expected new, got {:?}", other),
    }
}

// ============================================================================
// Statements
// ============================================================================

#[test]
fn test_if_else_statement() {
    let program = parse("if (cond) return 'ok'; else foo();").unwrap();
    let [stmt] = program.body() else {
        panic!("Expected one statement");
    };
    match program.stmt(*stmt).kind {
        Stmt::If {
            consequent,
            alternate: Some(alternate),
            ..
        } => {
            assert_eq!(program.stmt_text(consequent), "return 'ok';");
            assert_eq!(program.stmt_text(alternate), "foo();");
        }
        _ => panic!("Expected if/else"),
    }
}

#[test]
fn test_automatic_semicolon_insertion() {
    let program = parse("a = 1\nb = 2\nfoo()").unwrap();
    assert_eq!(program.body().len(), 3);
}

#[test]
fn test_return_restricted_production() {
    let program = parse("function f() {\n  return\n  value\n}").unwrap();
    let Stmt::FunctionDeclaration { body, .. } = &program.stmt(program.body()[0]).kind else {
        panic!("Expected function");
    };
    assert_eq!(body.len(), 2);
    assert!(matches!(program.stmt(body[0]).kind, Stmt::Return(None)));
}

#[test]
fn test_for_heads() {
    let program = parse(
        "for (let i = 0; i < n; i++) {}\n\
         for (const k in obj) {}\n\
         for (x of xs) {}\n\
         for (;;) break;",
    )
    .unwrap();
    let kinds: Vec<&Stmt> = program.body().iter().map(|s| &program.stmt(*s).kind).collect();

    assert!(matches!(kinds[0], Stmt::For { init: Some(_), test: Some(_), update: Some(_), .. }));
    assert!(matches!(
        kinds[1],
        Stmt::ForIn {
            left: ForHead::Declaration(_),
            ..
        }
    ));
    assert!(matches!(
        kinds[2],
        Stmt::ForOf {
            left: ForHead::Pattern(_),
            ..
        }
    ));
    assert!(matches!(kinds[3], Stmt::For { test: None, .. }));
}

#[test]
fn test_try_catch_finally() {
    let program = parse("try { a(); } catch { b(); } finally { c(); }").unwrap();
    match &program.stmt(program.body()[0]).kind {
        Stmt::Try {
            handler: Some(handler),
            finalizer: Some(_),
            ..
        } => assert!(handler.param.is_none()),
        other => panic!("Expected try, got {:?}", other),
    }
}

#[test]
fn test_switch_and_labels() {
    let program = parse("outer: for (;;) { switch (x) { case 1: break outer; default: continue; } }")
        .unwrap();
    assert!(matches!(
        program.stmt(program.body()[0]).kind,
        Stmt::Labeled { .. }
    ));
}

#[test]
fn test_class_and_modules_are_opaque() {
    let program = parse(
        "import x from 'y'\n\
         export const a = 1;\n\
         class A extends B { static x = 1; m() { return 1; } }\n\
         export default function () {}",
    )
    .unwrap();
    assert_eq!(program.body().len(), 4);
    assert!(program
        .body()
        .iter()
        .all(|s| matches!(program.stmt(*s).kind, Stmt::Opaque)));
    // the method and the default export still count as function bodies
    assert_eq!(program.function_bodies().len(), 2);
}

#[test]
fn test_with_statement_is_opaque() {
    let program = parse("with (o) {}\nwith (Math) if (a) return x; else y();\nz();").unwrap();
    assert_eq!(program.body().len(), 3);
    assert!(matches!(program.stmt(program.body()[0]).kind, Stmt::Opaque));
    assert_eq!(
        program.stmt_text(program.body()[1]),
        "with (Math) if (a) return x; else y();"
    );
    assert!(matches!(program.stmt(program.body()[2]).kind, Stmt::Expression(_)));

    // the body of `with` is not a statement list
    let inner = program
        .stmt_ids()
        .find(|s| matches!(program.stmt(*s).kind, Stmt::If { .. }))
        .unwrap();
    assert!(!program.in_statement_list(inner));
}

#[test]
fn test_statement_list_position() {
    let program = parse("if (a) { if (b) x(); } while (c) if (d) y();").unwrap();
    let ifs: Vec<_> = program
        .stmt_ids()
        .filter(|s| matches!(program.stmt(*s).kind, Stmt::If { .. }))
        .collect();

    // inner `if (b)` sits in a block, `if (a)` at top level, `if (d)` is a loop body
    let listed: Vec<bool> = ifs.iter().map(|s| program.in_statement_list(*s)).collect();
    assert_eq!(listed.iter().filter(|b| **b).count(), 2);
    assert!(ifs.iter().any(|s| program.stmt_text(*s) == "if (d) y();"
        && !program.in_statement_list(*s)));
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_missing_paren_error() {
    let err = parse("if (a { }").unwrap_err();
    assert!(matches!(err, ParseError::Expected { .. }));
    assert!(err.to_string().contains("')'"));
}

#[test]
fn test_unexpected_eof() {
    let err = parse("foo(").unwrap_err();
    assert!(err.to_string().contains("end of input"));
}

#[test]
fn test_lex_error_is_wrapped() {
    let err = parse("'open").unwrap_err();
    assert!(matches!(err, ParseError::Lex(_)));
}

// ============================================================================
// Positions
// ============================================================================

#[test]
fn test_line_col() {
    let program = parse("a;\n  b;").unwrap();
    let second = program.stmt(program.body()[1]).span.start;
    assert_eq!(program.line_col(second), (2, 3));
    assert_eq!(program.indent_at(second), "  ");
}
