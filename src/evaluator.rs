use std::{
    collections::{BTreeSet, HashMap},
    fmt,
};

use thiserror::Error;
use tracing::trace;

use crate::{
    ast::{BinOp, Expr, ExprId, Literal, LogicalOp, Program, UnaryOp},
    parser::{ParseError, parse_expression_source},
    value::Value,
};

/// Errors raised by the reference evaluator.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Expression kind outside the evaluated subset
    #[error("cannot evaluate `{0}`")]
    Unsupported(String),

    #[error("no value bound to `{0}`")]
    Unbound(String),

    #[error("{0} free variables are too many to enumerate")]
    TooManyVariables(usize),
}

/// Most free variables [`check_equivalence`] will enumerate.
pub const MAX_VARIABLES: usize = 6;

/// Evaluates side-effect-free expressions over primitive values, following
/// JavaScript semantics: truthiness, `==`/`===`, abstract relational
/// comparison, `+` concatenation, short-circuiting `&&`/`||`/`??`.
///
/// # Examples
///
/// ```
/// use logic_lint::{Evaluator, Value, parser::parse_expression_source};
///
/// let (program, expr) = parse_expression_source("a ?? b").unwrap();
/// let mut evaluator = Evaluator::new();
/// evaluator.bind("a", Value::Null);
/// evaluator.bind("b", Value::Number(0.0));
/// assert_eq!(evaluator.eval(&program, expr).unwrap(), Value::Number(0.0));
/// ```
#[derive(Debug, Default)]
pub struct Evaluator {
    bindings: HashMap<String, Value>,
}

impl Evaluator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind(&mut self, name: impl Into<String>, value: Value) {
        self.bindings.insert(name.into(), value);
    }

    pub fn eval(&self, program: &Program, id: ExprId) -> Result<Value, EvalError> {
        let unsupported = || EvalError::Unsupported(program.expr_text(id).to_string());

        match &program.expr(id).kind {
            Expr::Identifier(name) => match self.bindings.get(name) {
                Some(value) => Ok(value.clone()),
                None => match name.as_str() {
                    "undefined" => Ok(Value::Undefined),
                    "NaN" => Ok(Value::Number(f64::NAN)),
                    "Infinity" => Ok(Value::Number(f64::INFINITY)),
                    _ => Err(EvalError::Unbound(name.clone())),
                },
            },

            Expr::Literal(literal) => match literal {
                Literal::Null => Ok(Value::Null),
                Literal::Boolean(b) => Ok(Value::Boolean(*b)),
                Literal::Number { value, .. } => Ok(Value::Number(*value)),
                Literal::String(s) => Ok(Value::String(s.clone())),
                Literal::Regex | Literal::Template => Err(unsupported()),
            },

            Expr::Unary { op, argument } => {
                let value = self.eval(program, *argument)?;
                match op {
                    UnaryOp::Not => Ok(Value::Boolean(!value.is_truthy())),
                    UnaryOp::Minus => Ok(Value::Number(-value.to_number())),
                    UnaryOp::Plus => Ok(Value::Number(value.to_number())),
                    UnaryOp::BitNot => Ok(Value::Number(f64::from(!to_int32(value.to_number())))),
                    UnaryOp::TypeOf => Ok(Value::String(value.type_of().to_string())),
                    UnaryOp::Void => Ok(Value::Undefined),
                    UnaryOp::Delete | UnaryOp::Await => Err(unsupported()),
                }
            }

            Expr::Binary { op, left, right } => {
                let left = self.eval(program, *left)?;
                let right = self.eval(program, *right)?;
                apply_binop(*op, &left, &right).ok_or_else(unsupported)
            }

            Expr::Logical { op, left, right } => {
                let left_value = self.eval(program, *left)?;
                let short_circuits = match op {
                    LogicalOp::And => !left_value.is_truthy(),
                    LogicalOp::Or => left_value.is_truthy(),
                    LogicalOp::Nullish => !left_value.is_nullish(),
                };
                if short_circuits {
                    Ok(left_value)
                } else {
                    self.eval(program, *right)
                }
            }

            Expr::Conditional {
                test,
                consequent,
                alternate,
            } => {
                if self.eval(program, *test)?.is_truthy() {
                    self.eval(program, *consequent)
                } else {
                    self.eval(program, *alternate)
                }
            }

            Expr::Sequence(items) => {
                let mut last = Value::Undefined;
                for item in items {
                    last = self.eval(program, *item)?;
                }
                Ok(last)
            }

            Expr::This
            | Expr::Update { .. }
            | Expr::Assignment { .. }
            | Expr::Member { .. }
            | Expr::Call { .. }
            | Expr::New { .. }
            | Expr::Array(_)
            | Expr::Object(_)
            | Expr::Function { .. }
            | Expr::Spread(_)
            | Expr::Opaque => Err(unsupported()),
        }
    }
}

/// `ToInt32`
fn to_int32(n: f64) -> i32 {
    if !n.is_finite() {
        return 0;
    }
    n.trunc().rem_euclid(4_294_967_296.0) as u32 as i32
}

fn apply_binop(op: BinOp, left: &Value, right: &Value) -> Option<Value> {
    use BinOp::*;

    let number =
        |f: fn(f64, f64) -> f64| Some(Value::Number(f(left.to_number(), right.to_number())));
    let int32 = |f: fn(i32, i32) -> i32| {
        let result = f(to_int32(left.to_number()), to_int32(right.to_number()));
        Some(Value::Number(f64::from(result)))
    };
    let shift_count = (to_int32(right.to_number()) as u32) & 31;

    match op {
        StrictEqual => Some(Value::Boolean(left.strict_equals(right))),
        StrictNotEqual => Some(Value::Boolean(!left.strict_equals(right))),
        Equal => Some(Value::Boolean(left.loose_equals(right))),
        NotEqual => Some(Value::Boolean(!left.loose_equals(right))),
        LessThan => Some(Value::Boolean(left.less_than(right) == Some(true))),
        GreaterThan => Some(Value::Boolean(right.less_than(left) == Some(true))),
        LessEqual => Some(Value::Boolean(right.less_than(left) == Some(false))),
        GreaterEqual => Some(Value::Boolean(left.less_than(right) == Some(false))),

        Add => match (left, right) {
            (Value::String(_), _) | (_, Value::String(_)) => Some(Value::String(format!(
                "{}{}",
                left.to_js_string(),
                right.to_js_string()
            ))),
            _ => number(|a, b| a + b),
        },
        Subtract => number(|a, b| a - b),
        Multiply => number(|a, b| a * b),
        Divide => number(|a, b| a / b),
        Modulo => number(|a, b| a % b),
        Exponent => number(|a, b| {
            if b.is_nan() || (a.abs() == 1.0 && b.is_infinite()) {
                f64::NAN
            } else {
                a.powf(b)
            }
        }),

        BitAnd => int32(|a, b| a & b),
        BitOr => int32(|a, b| a | b),
        BitXor => int32(|a, b| a ^ b),
        ShiftLeft => Some(Value::Number(f64::from(
            to_int32(left.to_number()).wrapping_shl(shift_count),
        ))),
        ShiftRight => Some(Value::Number(f64::from(
            to_int32(left.to_number()).wrapping_shr(shift_count),
        ))),
        UnsignedShiftRight => Some(Value::Number(f64::from(
            (to_int32(left.to_number()) as u32).wrapping_shr(shift_count),
        ))),

        In | InstanceOf => None,
    }
}

/// Valuation under which two expressions disagree.
#[derive(Debug, Clone, PartialEq)]
pub struct Counterexample {
    pub bindings: Vec<(String, Value)>,
    pub before: Value,
    pub after: Value,
}

impl fmt::Display for Counterexample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bindings: Vec<String> = self
            .bindings
            .iter()
            .map(|(name, value)| format!("{} = {}", name, value))
            .collect();
        write!(
            f,
            "with {} the original gives {} but the rewrite gives {}",
            bindings.join(", "),
            self.before,
            self.after
        )
    }
}

fn free_variables(program: &Program, names: &mut BTreeSet<String>) {
    for id in program.expr_ids() {
        if let Expr::Identifier(name) = &program.expr(id).kind {
            if !matches!(name.as_str(), "undefined" | "NaN" | "Infinity") {
                names.insert(name.clone());
            }
        }
    }
}

/// Evaluate `before` and `after` under every assignment of `domain` values
/// to their free identifiers and return the first valuation where the
/// results differ, or `None` when they always agree.
///
/// # Examples
///
/// ```
/// use logic_lint::{Value, evaluator::check_equivalence};
///
/// let domain = Value::standard_domain();
/// assert_eq!(check_equivalence("quux || (quux && fnord)", "quux", &domain).unwrap(), None);
/// assert!(check_equivalence("a || b", "b || a", &domain).unwrap().is_some());
/// ```
pub fn check_equivalence(
    before: &str,
    after: &str,
    domain: &[Value],
) -> Result<Option<Counterexample>, EvalError> {
    let (before_program, before_expr) = parse_expression_source(before)?;
    let (after_program, after_expr) = parse_expression_source(after)?;

    let mut names = BTreeSet::new();
    free_variables(&before_program, &mut names);
    free_variables(&after_program, &mut names);
    let names: Vec<String> = names.into_iter().collect();
    if names.len() > MAX_VARIABLES {
        return Err(EvalError::TooManyVariables(names.len()));
    }
    if domain.is_empty() && !names.is_empty() {
        return Ok(None);
    }

    // odometer over domain^names
    let mut digits = vec![0usize; names.len()];
    loop {
        let mut evaluator = Evaluator::new();
        for (name, digit) in names.iter().zip(&digits) {
            evaluator.bind(name.clone(), domain[*digit].clone());
        }
        let left = evaluator.eval(&before_program, before_expr)?;
        let right = evaluator.eval(&after_program, after_expr)?;
        if !left.same_value(&right) {
            let bindings = names
                .iter()
                .zip(&digits)
                .map(|(name, digit)| (name.clone(), domain[*digit].clone()))
                .collect();
            trace!(before, after, "counterexample found");
            return Ok(Some(Counterexample {
                bindings,
                before: left,
                after: right,
            }));
        }

        let mut position = 0;
        loop {
            if position == digits.len() {
                return Ok(None);
            }
            digits[position] += 1;
            if digits[position] < domain.len() {
                break;
            }
            digits[position] = 0;
            position += 1;
        }
    }
}
