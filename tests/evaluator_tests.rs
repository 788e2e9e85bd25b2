use logic_lint::{
    EvalError, Evaluator, Value,
    evaluator::{MAX_VARIABLES, check_equivalence},
    parser::parse_expression_source,
};

fn eval(source: &str) -> Result<Value, EvalError> {
    let (program, id) = parse_expression_source(source)?;
    Evaluator::new().eval(&program, id)
}

fn eval_with(source: &str, bindings: &[(&str, Value)]) -> Value {
    let (program, id) = parse_expression_source(source).unwrap();
    let mut evaluator = Evaluator::new();
    for (name, value) in bindings {
        evaluator.bind(*name, value.clone());
    }
    evaluator.eval(&program, id).unwrap()
}

#[test]
fn test_coercions() {
    let test_cases = vec![
        ("1 + '2'", Value::String("12".into())),
        ("'3' * '4'", Value::Number(12.0)),
        ("true + 1", Value::Number(2.0)),
        ("null + 1", Value::Number(1.0)),
        ("'a' + null", Value::String("anull".into())),
        ("typeof null", Value::String("object".into())),
        ("typeof undefined", Value::String("undefined".into())),
        ("void 0", Value::Undefined),
        ("-'5'", Value::Number(-5.0)),
        ("~5", Value::Number(-6.0)),
        ("-1 >>> 28", Value::Number(15.0)),
        ("1 << 33", Value::Number(2.0)),
        ("2 ** 10", Value::Number(1024.0)),
        ("7 % 3", Value::Number(1.0)),
    ];

    for (input, expected) in test_cases {
        assert_eq!(eval(input).unwrap(), expected, "Failed for input: {}", input);
    }
}

#[test]
fn test_equality() {
    let test_cases = vec![
        ("null == undefined", true),
        ("null === undefined", false),
        ("null == 0", false),
        ("0 == ''", true),
        ("'1' == 1", true),
        ("true == 1", true),
        ("NaN == NaN", false),
        ("NaN !== NaN", true),
        ("'a' === \"a\"", true),
    ];

    for (input, expected) in test_cases {
        assert_eq!(
            eval(input).unwrap(),
            Value::Boolean(expected),
            "Failed for input: {}",
            input
        );
    }
}

#[test]
fn test_relational() {
    let test_cases = vec![
        ("1 < 2", true),
        ("'10' < '9'", true),
        ("'10' < 9", false),
        ("null >= 0", true),
        ("undefined >= 0", false),
        ("undefined < 0", false),
        ("NaN <= NaN", false),
    ];

    for (input, expected) in test_cases {
        assert_eq!(
            eval(input).unwrap(),
            Value::Boolean(expected),
            "Failed for input: {}",
            input
        );
    }
}

#[test]
fn test_short_circuit_returns_operand() {
    let a = Value::Number(0.0);
    let b = Value::String("b".into());
    let bindings = [("a", a.clone()), ("b", b.clone())];

    assert_eq!(eval_with("a && b", &bindings), a);
    assert_eq!(eval_with("a || b", &bindings), b);
    assert_eq!(eval_with("a ?? b", &bindings), a);
    assert_eq!(eval_with("a ? 1 : b", &bindings), b);
    assert_eq!(eval_with("(a, b)", &bindings), b);
}

#[test]
fn test_short_circuit_skips_unbound_right() {
    // `b` is never evaluated
    assert_eq!(eval("false && b").unwrap(), Value::Boolean(false));
    assert!(matches!(eval("true && b"), Err(EvalError::Unbound(name)) if name == "b"));
}

#[test]
fn test_unsupported_expressions() {
    for source in ["f()", "a.b", "x = 1", "[1]", "`t`", "new A()", "k in o"] {
        assert!(
            matches!(eval(source), Err(EvalError::Unsupported(_)) | Err(EvalError::Unbound(_))),
            "Failed for input: {}",
            source
        );
    }
    assert!(matches!(eval("f()"), Err(EvalError::Unsupported(text)) if text == "f()"));
}

#[test]
fn test_check_equivalence() {
    let domain = Value::standard_domain();

    assert_eq!(check_equivalence("!(a && b)", "!a || !b", &domain).unwrap(), None);
    assert_eq!(check_equivalence("a === b", "!(a !== b)", &domain).unwrap(), None);

    let counterexample = check_equivalence("a && b", "b && a", &domain)
        .unwrap()
        .unwrap();
    assert_eq!(counterexample.bindings.len(), 2);
    assert!(counterexample.to_string().starts_with("with a = "));
}

#[test]
fn test_check_equivalence_limits() {
    let domain = Value::standard_domain();
    let names: Vec<String> = (0..=MAX_VARIABLES).map(|i| format!("v{}", i)).collect();
    let wide = names.join(" || ");

    assert_eq!(
        check_equivalence(&wide, &wide, &domain),
        Err(EvalError::TooManyVariables(MAX_VARIABLES + 1))
    );
    assert!(matches!(
        check_equivalence("a ||", "a", &domain),
        Err(EvalError::Parse(_))
    ));
}

#[test]
fn test_value_display() {
    assert_eq!(Value::String("a\"b".into()).to_string(), "\"a\\\"b\"");
    assert_eq!(Value::Number(f64::NAN).to_string(), "NaN");
    assert_eq!(Value::Number(-0.0).to_string(), "0");
    assert_eq!(Value::Number(1.5).to_string(), "1.5");
    assert_eq!(Value::Undefined.to_string(), "undefined");
}
