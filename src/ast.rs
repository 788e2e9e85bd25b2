//! # Syntax tree for the analysed JavaScript sources
//!
//! The tree is an arena: [`Program`] owns every expression and statement
//! node, addressed by [`ExprId`] and [`StmtId`], together with the source
//! text, the token stream and the comments.
//!
//! ## Architecture Overview
//!
//! - **[tokens]** - Lexical tokens, spans and comments
//! - **[expressions]** - Expression nodes
//! - **[operators]** - Operator enums, the comparison complement table and
//!   the precedence ladder used when synthesising replacement text
//! - **[statements]** - Statement nodes
//! - **[program]** - The arena, parent side-table and text accessors
//!
//! ## Ranges
//!
//! Every expression has two ranges: `span` covers the expression proper and
//! `outer` additionally covers any parentheses written around it.
//!
//! ```text
//! !(foo && 24)
//!   ^^^^^^^^^    span of the logical expression
//!  ^^^^^^^^^^^   outer
//! ```
//!
//! Statement ranges include the terminating semicolon when one is written.
pub mod expressions;
pub mod operators;
pub mod program;
pub mod statements;
pub mod tokens;

pub use expressions::{
    Expr, ExprId, ExprNode, FunctionBody, Literal, MemberProperty, ObjectMember, PropertyKey,
};
pub use operators::{BinOp, LogicalOp, Precedence, UnaryOp, needs_parens};
pub use program::{NodeRef, Program};
pub use statements::{
    CatchClause, DeclKind, Declarator, ForHead, Stmt, StmtId, StmtNode, SwitchCase,
};
pub use tokens::{Comment, Span, Token, TokenKind};
