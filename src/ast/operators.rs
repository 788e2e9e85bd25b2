/// Binary operators other than the short-circuiting ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    // Comparison
    /// Strict equal (`===`)
    StrictEqual,
    /// Strict not equal (`!==`)
    StrictNotEqual,
    /// Loose equal (`==`)
    Equal,
    /// Loose not equal (`!=`)
    NotEqual,
    /// Less than (`<`)
    LessThan,
    /// Greater than (`>`)
    GreaterThan,
    /// Less than or equal (`<=`)
    LessEqual,
    /// Greater than or equal (`>=`)
    GreaterEqual,

    // Arithmetic
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    /// Exponentiation (`**`)
    Exponent,

    // Bitwise
    BitAnd,
    BitOr,
    BitXor,
    ShiftLeft,
    ShiftRight,
    UnsignedShiftRight,

    // Relational keywords
    In,
    InstanceOf,
}

impl BinOp {
    pub fn from_text(text: &str) -> Option<BinOp> {
        use BinOp::*;
        let op = match text {
            "===" => StrictEqual,
            "!==" => StrictNotEqual,
            "==" => Equal,
            "!=" => NotEqual,
            "<" => LessThan,
            ">" => GreaterThan,
            "<=" => LessEqual,
            ">=" => GreaterEqual,
            "+" => Add,
            "-" => Subtract,
            "*" => Multiply,
            "/" => Divide,
            "%" => Modulo,
            "**" => Exponent,
            "&" => BitAnd,
            "|" => BitOr,
            "^" => BitXor,
            "<<" => ShiftLeft,
            ">>" => ShiftRight,
            ">>>" => UnsignedShiftRight,
            "in" => In,
            "instanceof" => InstanceOf,
            _ => return None,
        };
        Some(op)
    }

    pub fn as_str(self) -> &'static str {
        use BinOp::*;
        match self {
            StrictEqual => "===",
            StrictNotEqual => "!==",
            Equal => "==",
            NotEqual => "!=",
            LessThan => "<",
            GreaterThan => ">",
            LessEqual => "<=",
            GreaterEqual => ">=",
            Add => "+",
            Subtract => "-",
            Multiply => "*",
            Divide => "/",
            Modulo => "%",
            Exponent => "**",
            BitAnd => "&",
            BitOr => "|",
            BitXor => "^",
            ShiftLeft => "<<",
            ShiftRight => ">>",
            UnsignedShiftRight => ">>>",
            In => "in",
            InstanceOf => "instanceof",
        }
    }

    /// Complementary comparison operator, `None` for every non-comparison.
    ///
    /// ```text
    /// === / !==    == / !=    >= / <    > / <=
    /// ```
    pub fn complement(self) -> Option<BinOp> {
        use BinOp::*;
        match self {
            StrictEqual => Some(StrictNotEqual),
            StrictNotEqual => Some(StrictEqual),
            Equal => Some(NotEqual),
            NotEqual => Some(Equal),
            GreaterEqual => Some(LessThan),
            LessThan => Some(GreaterEqual),
            GreaterThan => Some(LessEqual),
            LessEqual => Some(GreaterThan),
            Add | Subtract | Multiply | Divide | Modulo | Exponent | BitAnd | BitOr | BitXor
            | ShiftLeft | ShiftRight | UnsignedShiftRight | In | InstanceOf => None,
        }
    }

    pub fn is_comparison(self) -> bool {
        self.complement().is_some()
    }

    pub fn precedence(self) -> Precedence {
        use BinOp::*;
        match self {
            StrictEqual | StrictNotEqual | Equal | NotEqual => Precedence::Equality,
            LessThan | GreaterThan | LessEqual | GreaterEqual | In | InstanceOf => {
                Precedence::Relational
            }
            Add | Subtract => Precedence::Additive,
            Multiply | Divide | Modulo => Precedence::Multiplicative,
            Exponent => Precedence::Exponent,
            BitAnd => Precedence::BitAnd,
            BitOr => Precedence::BitOr,
            BitXor => Precedence::BitXor,
            ShiftLeft | ShiftRight | UnsignedShiftRight => Precedence::Shift,
        }
    }
}

/// Short-circuiting operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOp {
    /// `&&`
    And,
    /// `||`
    Or,
    /// `??`
    Nullish,
}

impl LogicalOp {
    pub fn from_text(text: &str) -> Option<LogicalOp> {
        match text {
            "&&" => Some(LogicalOp::And),
            "||" => Some(LogicalOp::Or),
            "??" => Some(LogicalOp::Nullish),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LogicalOp::And => "&&",
            LogicalOp::Or => "||",
            LogicalOp::Nullish => "??",
        }
    }

    /// De Morgan dual. `??` has none.
    pub fn dual(self) -> Option<LogicalOp> {
        match self {
            LogicalOp::And => Some(LogicalOp::Or),
            LogicalOp::Or => Some(LogicalOp::And),
            LogicalOp::Nullish => None,
        }
    }

    pub fn precedence(self) -> Precedence {
        match self {
            LogicalOp::And => Precedence::LogicalAnd,
            LogicalOp::Or => Precedence::LogicalOr,
            LogicalOp::Nullish => Precedence::Coalesce,
        }
    }
}

/// Prefix operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    /// `!`
    Not,
    /// `-`
    Minus,
    /// `+`
    Plus,
    /// `~`
    BitNot,
    TypeOf,
    Void,
    Delete,
    Await,
}

impl UnaryOp {
    pub fn from_text(text: &str) -> Option<UnaryOp> {
        let op = match text {
            "!" => UnaryOp::Not,
            "-" => UnaryOp::Minus,
            "+" => UnaryOp::Plus,
            "~" => UnaryOp::BitNot,
            "typeof" => UnaryOp::TypeOf,
            "void" => UnaryOp::Void,
            "delete" => UnaryOp::Delete,
            "await" => UnaryOp::Await,
            _ => return None,
        };
        Some(op)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            UnaryOp::Not => "!",
            UnaryOp::Minus => "-",
            UnaryOp::Plus => "+",
            UnaryOp::BitNot => "~",
            UnaryOp::TypeOf => "typeof",
            UnaryOp::Void => "void",
            UnaryOp::Delete => "delete",
            UnaryOp::Await => "await",
        }
    }
}

/// Binding strength of an expression, loosest first.
///
/// `Coalesce` sits apart from the `&&`/`||` ladder: JavaScript refuses to mix
/// `??` with either of them unless one side is parenthesised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
    Sequence,
    Assignment,
    Conditional,
    Coalesce,
    LogicalOr,
    LogicalAnd,
    BitOr,
    BitXor,
    BitAnd,
    Equality,
    Relational,
    Shift,
    Additive,
    Multiplicative,
    Exponent,
    Unary,
    Postfix,
    Call,
    Primary,
}

impl Precedence {
    pub fn is_short_circuit(self) -> bool {
        matches!(
            self,
            Precedence::Coalesce | Precedence::LogicalOr | Precedence::LogicalAnd
        )
    }
}

/// Whether an operand with precedence `operand` has to be parenthesised to
/// sit directly under an operator of precedence `parent`.
///
/// `right` is set for right-hand operands of left-associative operators,
/// which need grouping at equal precedence too.
pub fn needs_parens(operand: Precedence, parent: Precedence, right: bool) -> bool {
    let mixes_coalesce = (operand == Precedence::Coalesce && parent.is_short_circuit()
        || parent == Precedence::Coalesce && operand.is_short_circuit())
        && operand != parent;
    mixes_coalesce || operand < parent || (right && operand == parent)
}
