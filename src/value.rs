use std::fmt;

/// A primitive JavaScript value, as far as the reference evaluator needs.
///
/// Objects never appear: the evaluator only runs side-effect-free boolean
/// and arithmetic expressions over primitive bindings.
///
/// # Examples
///
/// ```
/// use logic_lint::Value;
///
/// assert!(!Value::Number(f64::NAN).is_truthy());
/// assert!(Value::String("a".into()).is_truthy());
/// assert!(Value::Null.loose_equals(&Value::Undefined));
/// assert!(!Value::Null.strict_equals(&Value::Undefined));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Undefined,

    Null,

    Boolean(bool),

    /// IEEE double, `NaN` included
    Number(f64),

    String(String),
}

impl Value {
    /// Values used to enumerate valuations when checking two expressions
    /// for equivalence: every falsy kind, a truthy value of each type, and
    /// `NaN`.
    pub fn standard_domain() -> Vec<Value> {
        vec![
            Value::Undefined,
            Value::Null,
            Value::Boolean(true),
            Value::Boolean(false),
            Value::Number(0.0),
            Value::Number(1.0),
            Value::Number(f64::NAN),
            Value::String(String::new()),
            Value::String("a".to_string()),
        ]
    }

    /// `ToBoolean`
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Undefined | Value::Null => false,
            Value::Boolean(b) => *b,
            Value::Number(n) => *n != 0.0 && !n.is_nan(),
            Value::String(s) => !s.is_empty(),
        }
    }

    pub fn is_nullish(&self) -> bool {
        matches!(self, Value::Undefined | Value::Null)
    }

    /// `ToNumber`
    pub fn to_number(&self) -> f64 {
        match self {
            Value::Undefined => f64::NAN,
            Value::Null => 0.0,
            Value::Boolean(b) => f64::from(u8::from(*b)),
            Value::Number(n) => *n,
            Value::String(s) => string_to_number(s),
        }
    }

    /// `ToString`, used by `+` when either side is a string.
    pub fn to_js_string(&self) -> String {
        match self {
            Value::Undefined => "undefined".to_string(),
            Value::Null => "null".to_string(),
            Value::Boolean(b) => b.to_string(),
            Value::Number(n) => number_to_string(*n),
            Value::String(s) => s.clone(),
        }
    }

    pub fn type_of(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Null => "object",
            Value::Boolean(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
        }
    }

    /// `===`
    pub fn strict_equals(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            _ => false,
        }
    }

    /// `==`
    pub fn loose_equals(&self, other: &Value) -> bool {
        match (self, other) {
            (a, b) if a.is_nullish() || b.is_nullish() => a.is_nullish() && b.is_nullish(),
            (Value::Boolean(_), _) | (_, Value::Boolean(_)) => {
                self.to_number() == other.to_number()
            }
            (Value::Number(_), Value::String(_)) | (Value::String(_), Value::Number(_)) => {
                self.to_number() == other.to_number()
            }
            _ => self.strict_equals(other),
        }
    }

    /// Abstract relational comparison `self < other`; `None` when either
    /// side converts to `NaN`.
    pub fn less_than(&self, other: &Value) -> Option<bool> {
        if let (Value::String(a), Value::String(b)) = (self, other) {
            return Some(a.encode_utf16().lt(b.encode_utf16()));
        }
        let (a, b) = (self.to_number(), other.to_number());
        if a.is_nan() || b.is_nan() {
            None
        } else {
            Some(a < b)
        }
    }

    /// Same value for the purpose of equivalence checking: `NaN` equals
    /// itself, everything else compares with `===`.
    pub fn same_value(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) if a.is_nan() && b.is_nan() => true,
            _ => self.strict_equals(other),
        }
    }
}

fn string_to_number(s: &str) -> f64 {
    let trimmed = s.trim();
    match trimmed {
        "" => 0.0,
        "Infinity" | "+Infinity" => f64::INFINITY,
        "-Infinity" => f64::NEG_INFINITY,
        _ if trimmed.starts_with("0x") || trimmed.starts_with("0X") => {
            u64::from_str_radix(&trimmed[2..], 16).map_or(f64::NAN, |v| v as f64)
        }
        _ if trimmed.contains(|c: char| c.is_ascii_alphabetic() && c != 'e' && c != 'E') => {
            f64::NAN
        }
        _ => trimmed.parse().unwrap_or(f64::NAN),
    }
}

fn number_to_string(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string()
    } else if n == 0.0 {
        "0".to_string()
    } else {
        n.to_string()
    }
}

/// JavaScript literal notation.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => write!(f, "{:?}", s),
            other => f.write_str(&other.to_js_string()),
        }
    }
}
