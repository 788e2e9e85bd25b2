use logic_lint::{
    Evaluator, Value,
    evaluator::check_equivalence,
    negate::{is_negatable, negate},
    parser::parse_expression_source,
};
use proptest::prelude::*;

fn negated(source: &str) -> String {
    let (program, id) = parse_expression_source(source).unwrap();
    negate(&program, id)
}

fn negatable(source: &str) -> bool {
    let (program, id) = parse_expression_source(source).unwrap();
    is_negatable(&program, id)
}

#[test]
fn test_negation_shapes() {
    let test_cases = vec![
        ("!foo", "foo"),
        ("!(a + 1)", "(a + 1)"),
        ("a === b", "a !== b"),
        ("a != b", "a == b"),
        ("a > b", "a <= b"),
        ("a <= b", "a > b"),
        ("foo && 24", "(!(foo) || !(24))"),
        ("!foo && bar > 24", "(foo || bar <= 24)"),
        ("a && b || c", "((!(a) || !(b)) && !(c))"),
        ("(a || b) && !c", "((!(a) && !(b)) || c)"),
        ("f(x)", "!(f(x))"),
        ("a ? b : c", "!(a ? b : c)"),
    ];

    for (input, expected) in test_cases {
        assert_eq!(negated(input), expected, "Failed for input: {}", input);
    }
}

#[test]
fn test_non_negatable_operators() {
    assert!(!negatable("a ?? b"));
    assert!(!negatable("a + b"));
    assert!(!negatable("k in o"));
    assert!(!negatable("a instanceof B"));
    assert!(negatable("a < b"));
    assert!(negatable("a && b"));
    assert!(negatable("foo"));

    // the fallback still produces a valid negation
    assert_eq!(negated("a ?? b"), "!(a ?? b)");
}

#[test]
fn test_nested_nullish_operand_stays_grouped() {
    assert_eq!(negated("(a ?? b) && c"), "(!(a ?? b) || !(c))");
}

#[test]
fn test_relational_complement_differs_under_nan() {
    let domain = vec![Value::Number(1.0), Value::Number(f64::NAN)];
    let counterexample = check_equivalence("!(a < b)", "a >= b", &domain)
        .unwrap()
        .expect("NaN makes both comparisons false");
    assert_eq!(counterexample.before, Value::Boolean(true));
    assert_eq!(counterexample.after, Value::Boolean(false));
}

// ============================================================================
// Property: negate(e) is truthy exactly when e is falsy
// ============================================================================

const VARIABLES: [&str; 3] = ["a", "b", "c"];

fn leaf() -> impl Strategy<Value = String> {
    prop_oneof![
        4 => prop::sample::select(VARIABLES.to_vec()).prop_map(String::from),
        1 => prop::sample::select(vec!["null", "0", "undefined", "true", "''"]).prop_map(String::from),
    ]
}

fn boolean_tree(comparisons: &'static [&'static str]) -> impl Strategy<Value = String> {
    leaf().prop_recursive(4, 24, 2, move |inner| {
        prop_oneof![
            inner.clone().prop_map(|e| format!("!{}", e)),
            (inner.clone(), inner.clone()).prop_map(|(l, r)| format!("({} && {})", l, r)),
            (inner.clone(), inner.clone()).prop_map(|(l, r)| format!("({} || {})", l, r)),
            (
                prop::sample::select(VARIABLES.to_vec()),
                prop::sample::select(comparisons.to_vec()),
                prop::sample::select(VARIABLES.to_vec()),
            )
                .prop_map(|(l, op, r)| format!("({} {} {})", l, op, r)),
        ]
    })
}

fn check_negation(source: &str, domain: &[Value]) -> Result<(), TestCaseError> {
    let (program, id) = parse_expression_source(source).unwrap();
    let flipped = negate(&program, id);
    let (flipped_program, flipped_id) = parse_expression_source(&flipped).unwrap();

    for a in domain {
        for b in domain {
            for c in domain {
                let mut evaluator = Evaluator::new();
                evaluator.bind("a", a.clone());
                evaluator.bind("b", b.clone());
                evaluator.bind("c", c.clone());

                let before = evaluator.eval(&program, id).unwrap().is_truthy();
                let after = evaluator.eval(&flipped_program, flipped_id).unwrap().is_truthy();
                prop_assert_eq!(
                    after,
                    !before,
                    "{} negated to {} with a = {}, b = {}, c = {}",
                    source,
                    flipped,
                    a,
                    b,
                    c
                );
            }
        }
    }
    Ok(())
}

fn ordered_domain() -> Vec<Value> {
    vec![
        Value::Null,
        Value::Boolean(false),
        Value::Boolean(true),
        Value::Number(-1.0),
        Value::Number(0.0),
        Value::Number(2.5),
        Value::Number(f64::INFINITY),
    ]
}

proptest! {
    #[test]
    fn negation_flips_truth_with_equality(source in boolean_tree(&["===", "!==", "==", "!="])) {
        check_negation(&source, &Value::standard_domain())?;
    }

    // relational complements only hold when neither side converts to NaN
    #[test]
    fn negation_flips_truth_with_ordering(source in boolean_tree(&["<", ">", "<=", ">="])) {
        check_negation(&source, &ordered_domain())?;
    }
}
