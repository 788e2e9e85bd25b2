use logic_lint::{
    ast::{Program, Stmt, StmtId},
    control_flow::{find_duplicate_returns, find_shared_tail, fix_dead_else, fix_try_catch_tail},
    parser::parse,
};

fn find(program: &Program, pred: impl Fn(&Stmt) -> bool) -> StmtId {
    program
        .stmt_ids()
        .find(|id| pred(&program.stmt(*id).kind))
        .expect("statement not found")
}

fn first_if(program: &Program) -> StmtId {
    find(program, |s| matches!(s, Stmt::If { .. }))
}

fn first_try(program: &Program) -> StmtId {
    find(program, |s| matches!(s, Stmt::Try { .. }))
}

fn dead_else(source: &str) -> Option<String> {
    let program = parse(source).unwrap();
    // outermost `if` comes first in source order, not necessarily in the arena
    let id = program
        .stmt_ids()
        .filter(|id| matches!(program.stmt(*id).kind, Stmt::If { .. }))
        .min_by_key(|id| program.stmt(*id).span.start)?;
    fix_dead_else(&program, id).map(|fix| fix.apply(source))
}

fn hoisted(source: &str) -> Option<String> {
    let program = parse(source).unwrap();
    let id = first_try(&program);
    let shared = find_shared_tail(&program, id)?;
    fix_try_catch_tail(&program, id, &shared).map(|fix| fix.apply(source))
}

// ============================================================================
// Dead else
// ============================================================================

#[test]
fn test_dead_else_same_line() {
    assert_eq!(
        dead_else("if (cond) return 'ok'; else foo();").as_deref(),
        Some("if (cond) return 'ok'; foo();")
    );
    assert_eq!(
        dead_else("if (a) { return 1; } else { b(); c(); }").as_deref(),
        Some("if (a) { return 1; } b(); c();")
    );
}

#[test]
fn test_dead_else_empty_block_removed() {
    assert_eq!(
        dead_else("if (a) { return 1; } else {}").as_deref(),
        Some("if (a) { return 1; }")
    );
}

#[test]
fn test_dead_else_var_is_moved() {
    assert_eq!(
        dead_else("if (a) return 1; else var v = 2;").as_deref(),
        Some("if (a) return 1; var v = 2;")
    );
}

#[test]
fn test_dead_else_declined() {
    // not directly in a statement list
    assert_eq!(dead_else("while (c) if (a) return 1; else b();"), None);
    // a comment would be lost
    assert_eq!(dead_else("if (a) return 1; /* keep */ else b();"), None);
    // block-scoped names would leak
    assert_eq!(dead_else("if (a) return 1; else { const b = 2; use(b); }"), None);
    assert_eq!(dead_else("if (a) return 1; else function g() {}"), None);
    assert_eq!(dead_else("if (a) return 1; else class C {}"), None);
    // the body of `with` is not a statement list
    assert_eq!(dead_else("with (o) if (a) return 1; else b();"), None);
}

#[test]
fn test_dead_else_multi_line_reindent() {
    let source = "\
function f() {
    if (a) {
        return 1;
    } else {
        if (b) {
            c();
        }
    }
}";
    let expected = "\
function f() {
    if (a) {
        return 1;
    }
    if (b) {
        c();
    }
}";
    assert_eq!(dead_else(source).as_deref(), Some(expected));
}

#[test]
fn test_dead_else_without_semicolons() {
    // `[` on the next line would index `x` without the `;`
    let source = "function f(a, x, g){\n  if (a) return x\n  else [1, 2].forEach(g)\n}";
    assert_eq!(
        dead_else(source).as_deref(),
        Some("function f(a, x, g){\n  if (a) return x\n  ;[1, 2].forEach(g)\n}")
    );
    assert_eq!(
        dead_else("if (a) return function () {}\nelse `${b}`").as_deref(),
        Some("if (a) return function () {}\n;`${b}`")
    );
    assert_eq!(
        dead_else("if (a) for (;;) return c\nelse -d").as_deref(),
        Some("if (a) for (;;) return c\n;-d")
    );
}

#[test]
fn test_dead_else_closed_statement_needs_no_separator() {
    assert_eq!(
        dead_else("if (a) return x;\nelse [1].map(g)").as_deref(),
        Some("if (a) return x;\n[1].map(g)")
    );
    assert_eq!(
        dead_else("if (a) { return 1 } else (b)()").as_deref(),
        Some("if (a) { return 1 } (b)()")
    );
    assert_eq!(
        dead_else("if (a) return x\nelse b()").as_deref(),
        Some("if (a) return x\nb()")
    );
}

// ============================================================================
// Duplicate returns
// ============================================================================

#[test]
fn test_duplicate_return_with_pure_test() {
    let source = "function f(a) { if (a) { foo(); return 1; } foo(); return 1; }";
    let program = parse(source).unwrap();
    let body = program.function_bodies()[0];
    let found = find_duplicate_returns(&program, body);

    assert_eq!(found.len(), 1);
    assert_eq!(found[0].guard, first_if(&program));
    assert_eq!(program.text(found[0].tail), "foo(); return 1;");
    assert_eq!(
        found[0].suggestion.apply(source),
        "function f(a) { foo(); return 1; }"
    );
}

#[test]
fn test_duplicate_return_ignores_trailing_bare_return() {
    let source = "function f() { if (x) { g(); return; } g(); }";
    let program = parse(source).unwrap();
    assert_eq!(
        find_duplicate_returns(&program, program.function_bodies()[0]).len(),
        1
    );
}

#[test]
fn test_duplicate_return_keeps_object_test_as_statement() {
    let source = "function f() { if ({ a: 1 }) return 1; return 1; }";
    let program = parse(source).unwrap();
    let found = find_duplicate_returns(&program, program.function_bodies()[0]);
    assert_eq!(
        found[0].suggestion.apply(source),
        "function f() { ({ a: 1 }); return 1; }"
    );
}

#[test]
fn test_no_duplicate_return() {
    let test_cases = vec![
        "function f(a) { if (a) return 1; return 2; }",
        "function f(a) { if (a) foo(); foo(); }",
        "function f(a) { if (a) return 1; else return 1; }",
        "function f(a) { if (a) return 1; }",
    ];

    for source in test_cases {
        let program = parse(source).unwrap();
        assert!(
            find_duplicate_returns(&program, program.function_bodies()[0]).is_empty(),
            "Unexpected duplicate in {}",
            source
        );
    }
}

// ============================================================================
// try/catch tail
// ============================================================================

#[test]
fn test_shared_tail_declined() {
    let test_cases = vec![
        "try { a(); return x; } catch (e) { return x; }",
        "try { throw a; } catch { throw a; }",
        "try { let y = 1; } catch { let y = 1; }",
        "try { a(); } catch { b(); }",
        "try { a(); } finally { a(); }",
        "try {} catch {}",
    ];

    for source in test_cases {
        let program = parse(source).unwrap();
        assert_eq!(
            find_shared_tail(&program, first_try(&program)),
            None,
            "Unexpected tail in {}",
            source
        );
    }
}

#[test]
fn test_hoist_into_existing_finally() {
    assert_eq!(
        hoisted("try { a(); done(); } catch { done(); } finally { close(); }").as_deref(),
        Some("try { a(); } catch {} finally { close(); done(); }")
    );
    assert_eq!(
        hoisted("try { a(); done(); } catch { done(); } finally {}").as_deref(),
        Some("try { a(); } catch {} finally { done(); }")
    );
}

#[test]
fn test_hoist_into_new_multi_line_finally() {
    let source = "\
try {
  a();
  done();
} catch (e) {
  log(e);
  done();
}";
    let expected = "\
try {
  a();
} catch (e) {
  log(e);
} finally {
  done();
}";
    assert_eq!(hoisted(source).as_deref(), Some(expected));
}

#[test]
fn test_hoist_after_existing_multi_line_finally() {
    let source = "\
try {
  a();
  done();
} catch {
  done();
} finally {
  close();
}";
    let expected = "\
try {
  a();
} catch {} finally {
  close();
  done();
}";
    assert_eq!(hoisted(source).as_deref(), Some(expected));
}

#[test]
fn test_hoist_declined_for_catch_binding() {
    assert_eq!(
        hoisted("try { log(message); } catch ({ message }) { log(message); }"),
        None
    );
    assert_eq!(
        hoisted("try { a(); /* why */ done(); } catch { done(); }"),
        None
    );
}

#[test]
fn test_hoist_without_semicolons() {
    // `(b)()` after `d()` would call its result without the `;`
    let source = "\
try {
  a()
  ;(b)()
} catch {
  c()
  ;(b)()
} finally {
  d()
}";
    let expected = "\
try {
  a()
  ;
} catch {
  c()
  ;
} finally {
  d()
  ;(b)()
}";
    assert_eq!(hoisted(source).as_deref(), Some(expected));

    assert_eq!(
        hoisted("try { a(); [b].map(f) } catch { [b].map(f) } finally { d() }").as_deref(),
        Some("try { a(); } catch {} finally { d() ;[b].map(f) }")
    );
    assert_eq!(
        hoisted("try { a(); [b].map(f) } catch { [b].map(f) } finally { d(); }").as_deref(),
        Some("try { a(); } catch {} finally { d(); [b].map(f) }")
    );
}

#[test]
fn test_hoist_lone_tail_empties_blocks() {
    assert_eq!(
        hoisted("try { done(); } catch { done(); }").as_deref(),
        Some("try {} catch {} finally { done(); }")
    );
    assert_eq!(
        hoisted("try {\n  ;(b)()\n} catch {\n  ;(b)()\n}").as_deref(),
        Some("try {} catch {} finally {\n  (b)()\n}")
    );
    // stray `;` before the tail goes with it
    assert_eq!(
        hoisted("try { a();; done(); } catch { done(); }").as_deref(),
        Some("try { a(); } catch {} finally { done(); }")
    );
}

#[test]
fn test_empty_statement_is_not_a_shared_tail() {
    let program = parse("try { a();; } catch { b();; }").unwrap();
    assert_eq!(find_shared_tail(&program, first_try(&program)), None);
}
