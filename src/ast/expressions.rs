use crate::ast::{BinOp, LogicalOp, Span, StmtId, UnaryOp};

/// Index of an expression node in [`Program`](crate::ast::Program)'s arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ExprId(pub u32);

impl ExprId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Literal values.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Null,
    Boolean(bool),
    /// Numeric literal; `raw` keeps the written form (`0x10`, `1e3`, `5n`)
    Number { value: f64, raw: String },
    /// String literal with its decoded value
    String(String),
    Regex,
    Template,
}

/// Property key of a member access.
#[derive(Debug, Clone, PartialEq)]
pub enum MemberProperty {
    /// `a.b`, `a?.b`, `a.#b`
    Static(String),
    /// `a[b]`
    Computed(ExprId),
}

/// Entry of an object literal.
#[derive(Debug, Clone, PartialEq)]
pub enum ObjectMember {
    /// `key: value`, `[key]: value`, shorthand `key`, and methods
    Property { key: PropertyKey, value: ExprId },
    /// `...rest`
    Spread(ExprId),
}

#[derive(Debug, Clone, PartialEq)]
pub enum PropertyKey {
    Named(String),
    Computed(ExprId),
}

/// Body of a function-like expression.
#[derive(Debug, Clone, PartialEq)]
pub enum FunctionBody {
    Block(Vec<StmtId>),
    /// Concise arrow body
    Expression(ExprId),
}

/// Expression node kinds.
///
/// Children are arena indices; the node's source range lives in
/// [`ExprNode`].
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Identifier reference
    ///
    /// # Example
    /// ```text
    /// foo
    /// undefined
    /// ```
    Identifier(String),

    Literal(Literal),

    This,

    /// Prefix operation
    ///
    /// # Example
    /// ```text
    /// !ready
    /// typeof x
    /// ```
    Unary { op: UnaryOp, argument: ExprId },

    /// `++x`, `x--`
    Update { increment: bool, prefix: bool, argument: ExprId },

    /// Non short-circuit binary operation
    ///
    /// # Example
    /// ```text
    /// bar > 24
    /// key in table
    /// ```
    Binary { op: BinOp, left: ExprId, right: ExprId },

    /// `&&`, `||` and `??`
    Logical { op: LogicalOp, left: ExprId, right: ExprId },

    /// Ternary
    ///
    /// # Example
    /// ```text
    /// ok ? value : null
    /// ```
    Conditional {
        test: ExprId,
        consequent: ExprId,
        alternate: ExprId,
    },

    /// `target = value`, `target += value`, ...
    Assignment { op: String, target: ExprId, value: ExprId },

    Member {
        object: ExprId,
        property: MemberProperty,
        optional: bool,
    },

    Call {
        callee: ExprId,
        arguments: Vec<ExprId>,
        optional: bool,
    },

    New { callee: ExprId, arguments: Vec<ExprId> },

    /// Array literal; holes are `None`
    Array(Vec<Option<ExprId>>),

    Object(Vec<ObjectMember>),

    /// Function expression, arrow function or method
    Function {
        name: Option<String>,
        params: Vec<ExprId>,
        body: FunctionBody,
        arrow: bool,
    },

    /// Comma expression
    Sequence(Vec<ExprId>),

    /// `...value` in calls, arrays and parameter lists
    Spread(ExprId),

    /// Construct kept only as text (class expressions, `import(...)` meta)
    Opaque,
}

/// An expression together with its source ranges.
#[derive(Debug, Clone, PartialEq)]
pub struct ExprNode {
    pub kind: Expr,
    /// Range of the expression itself
    pub span: Span,
    /// Range including any enclosing parentheses
    pub outer: Span,
}

impl ExprNode {
    pub fn is_parenthesized(&self) -> bool {
        self.outer != self.span
    }
}
