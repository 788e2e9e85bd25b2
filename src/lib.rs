pub mod ast;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod control_flow;
pub mod equivalence;
pub mod evaluator;
pub mod fix;
pub mod lexer;
pub mod lint;
pub mod negate;
pub mod output;
pub mod parser;
pub mod returns;
pub mod simplify;
pub mod value;

pub use ast::{BinOp, Expr, ExprId, LogicalOp, Program, Span, Stmt, StmtId, Token};
pub use config::{ConfigError, LintConfig};
pub use evaluator::{Counterexample, EvalError, Evaluator, check_equivalence};
pub use fix::{Fix, TextEdit, apply_fixes};
pub use lexer::{LexError, Lexer};
pub use lint::{FixOutcome, Linter, Report, RuleId};
pub use negate::{is_negatable, negate};
pub use parser::{ParseError, Parser, parse, parse_expression_source};
pub use returns::{always_returns, guard_always_returns};
pub use simplify::{Law, Simplification, simplify};
pub use value::Value;
