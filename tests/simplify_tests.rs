use logic_lint::{
    Law, Linter, Value,
    evaluator::check_equivalence,
    fix::apply_fixes,
    parser::parse_expression_source,
    simplify::{Simplification, simplify},
};

fn simplified(source: &str) -> Option<Simplification> {
    let (program, id) = parse_expression_source(source).unwrap();
    simplify(&program, id)
}

#[test]
fn test_simplification_shapes() {
    let test_cases = vec![
        ("foo || foo", Law::Tautology, "foo"),
        ("a && a", Law::Tautology, "a"),
        ("a ?? a", Law::Tautology, "a"),
        ("quux || (quux && fnord)", Law::Absorption, "quux"),
        ("a && (a || b)", Law::Absorption, "a"),
        ("x.y || (x.y && z)", Law::Absorption, "x.y"),
        ("(a && b) || (a && c)", Law::Distribution, "a && (b || c)"),
        ("(a || b) && (a || c)", Law::Distribution, "a || (b && c)"),
        ("(a ?? b) || (a ?? c)", Law::Distribution, "a ?? (b || c)"),
        (
            "(q ? a : null) || (q ? b : null)",
            Law::TernaryFold,
            "q ? (a || b) : null",
        ),
        (
            "(q ? a : null) || (!q ? b : null)",
            Law::TernaryFold,
            "q ? (a || null) : b",
        ),
        (
            "(q ? a : undefined) ?? (!q ? b : undefined)",
            Law::TernaryFold,
            "q ? (a ?? undefined) : b",
        ),
        (
            "(!q ? a : null) || (q ? b : null)",
            Law::TernaryFold,
            "q ? b : (a || null)",
        ),
        (
            "(!(x > 1) ? a : undefined) ?? (x > 1 ? b : undefined)",
            Law::TernaryFold,
            "x > 1 ? b : (a ?? undefined)",
        ),
        (
            "(p ? a : null) || (q ? b : null)",
            Law::TernaryFold,
            "p && a ? a : q ? b : null",
        ),
    ];

    for (input, law, expected) in test_cases {
        let result = simplified(input).unwrap_or_else(|| panic!("no match for {}", input));
        assert_eq!(result.law, law, "Failed for input: {}", input);
        assert_eq!(result.replacement, expected, "Failed for input: {}", input);
    }
}

#[test]
fn test_no_match() {
    let test_cases = vec![
        "foo && 24",
        "a || b",
        "'x' || 'x'",
        "next() || (next() && x)",
        "a || (b && a)",
        "(a && b) || (a || c)",
        "(q ? a : 0) || (q ? b : 0)",
        "(q ? a : null) || (q ? b : undefined)",
        "(f() ? a : null) || (f() ? b : null)",
        "(q ? a : null) && (!q ? b : null)",
        "(!q ? a : null) && (q ? b : null)",
        "(p ? a : null) && (q ? b : null)",
        "a === a",
    ];

    for input in test_cases {
        assert_eq!(simplified(input), None, "Unexpected match for {}", input);
    }
}

#[test]
fn test_message_ids() {
    assert_eq!(Law::Tautology.message_id(), "tautology");
    assert_eq!(Law::Absorption.message_id(), "absorption");
    assert_eq!(Law::Distribution.message_id(), "distribution");
    assert_eq!(Law::TernaryFold.message_id(), "ternary-fold");
}

#[test]
fn test_replacement_is_single_line() {
    let result = simplified("(a &&\n  b) ||\n(a &&\n  c)").unwrap();
    assert_eq!(result.replacement, "a && (b || c)");
}

/// Every rewrite agrees with its input on all valuations of the free
/// variables over the standard domain (falsy values of every type, `NaN`,
/// truthy strings and numbers).
#[test]
fn test_rewrites_are_sound() {
    let domain = Value::standard_domain();
    let convoluted = vec![
        "quux || (quux && fnord)",
        "a && (a || b)",
        "(a && b) || (a && c)",
        "(a || b) && (a || c)",
        "(a ?? b) || (a ?? c)",
        "(a && b) ?? (a && c)",
        "(q ? a : null) || (q ? b : null)",
        "(q ? a : null) && (q ? b : null)",
        "(q ? a : null) || (!q ? b : null)",
        "(q ? a : undefined) ?? (!q ? b : undefined)",
        "(!q ? a : null) || (q ? b : null)",
        "(!q ? a : undefined) ?? (q ? b : undefined)",
        "(p ? a : null) || (q ? b : null)",
    ];

    for source in convoluted {
        let result = simplified(source).unwrap_or_else(|| panic!("no match for {}", source));
        let counterexample = check_equivalence(source, &result.replacement, &domain).unwrap();
        assert!(
            counterexample.is_none(),
            "{} → {} is unsound: {}",
            source,
            result.replacement,
            counterexample.unwrap()
        );
    }
}

#[test]
fn test_replacement_grouped_in_looser_context() {
    let source = "(q ? a : null) || (q ? b : null) || z;";
    let reports = Linter::default().lint_source(source).unwrap();
    let fixes: Vec<_> = reports.into_iter().filter_map(|r| r.fix).collect();
    assert_eq!(apply_fixes(source, &fixes).0, "(q ? (a || b) : null) || z;");
}
