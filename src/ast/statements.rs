use crate::ast::{ExprId, Span};

/// Index of a statement node in [`Program`](crate::ast::Program)'s arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StmtId(pub u32);

impl StmtId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclKind {
    Var,
    Let,
    Const,
}

impl DeclKind {
    pub fn as_str(self) -> &'static str {
        match self {
            DeclKind::Var => "var",
            DeclKind::Let => "let",
            DeclKind::Const => "const",
        }
    }
}

/// One `pattern = init` entry of a variable declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct Declarator {
    pub pattern: ExprId,
    pub init: Option<ExprId>,
}

/// Left-hand side of a `for-in` / `for-of` head.
#[derive(Debug, Clone, PartialEq)]
pub enum ForHead {
    /// `for (const x of xs)`; the declaration statement has no trailing `;`
    Declaration(StmtId),
    /// `for (x of xs)`
    Pattern(ExprId),
}

/// `catch (param) { ... }`
#[derive(Debug, Clone, PartialEq)]
pub struct CatchClause {
    pub param: Option<ExprId>,
    /// Always a [`Stmt::Block`]
    pub body: StmtId,
}

/// `case test:` or `default:` with its statements.
#[derive(Debug, Clone, PartialEq)]
pub struct SwitchCase {
    pub test: Option<ExprId>,
    pub consequent: Vec<StmtId>,
}

/// Statement node kinds.
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    /// Expression followed by an (optional) semicolon
    ///
    /// # Example
    /// ```text
    /// foo();
    /// ```
    Expression(ExprId),

    VariableDeclaration {
        kind: DeclKind,
        declarators: Vec<Declarator>,
    },

    /// `function name(params) { body }`
    FunctionDeclaration {
        name: String,
        params: Vec<ExprId>,
        body: Vec<StmtId>,
    },

    /// `return;` or `return value;`
    Return(Option<ExprId>),

    /// Conditional statement
    ///
    /// # Example
    /// ```text
    /// if (cond) return 'ok'; else foo();
    /// ```
    If {
        test: ExprId,
        consequent: StmtId,
        alternate: Option<StmtId>,
    },

    /// `{ ... }`
    Block(Vec<StmtId>),

    For {
        init: Option<StmtId>,
        test: Option<ExprId>,
        update: Option<ExprId>,
        body: StmtId,
    },

    ForIn {
        left: ForHead,
        right: ExprId,
        body: StmtId,
    },

    ForOf {
        left: ForHead,
        right: ExprId,
        body: StmtId,
    },

    While { test: ExprId, body: StmtId },

    DoWhile { body: StmtId, test: ExprId },

    /// `try { } catch (e) { } finally { }`
    Try {
        /// Always a [`Stmt::Block`]
        block: StmtId,
        handler: Option<CatchClause>,
        /// Always a [`Stmt::Block`] when present
        finalizer: Option<StmtId>,
    },

    Throw(ExprId),

    Break(Option<String>),

    Continue(Option<String>),

    Switch {
        discriminant: ExprId,
        cases: Vec<SwitchCase>,
    },

    Labeled { label: String, body: StmtId },

    /// Lone `;`
    Empty,

    /// Statement kept only as text (class declarations, imports, exports,
    /// `with`)
    Opaque,
}

/// A statement together with its source range (trailing `;` included).
#[derive(Debug, Clone, PartialEq)]
pub struct StmtNode {
    pub kind: Stmt,
    pub span: Span,
}
