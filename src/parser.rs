use thiserror::Error;

use crate::{
    ast::{
        BinOp, CatchClause, DeclKind, Declarator, Expr, ExprId, ForHead, FunctionBody, Literal,
        LogicalOp, MemberProperty, ObjectMember, Program, PropertyKey, Span, Stmt, StmtId,
        SwitchCase, Token, TokenKind, UnaryOp,
    },
    lexer::{LexError, Lexer, numeric_value},
};

/// Errors raised while building the syntax tree.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error(transparent)]
    Lex(#[from] LexError),

    #[error("expected {expected}, found {found} at offset {offset}")]
    Expected {
        expected: String,
        found: String,
        offset: usize,
    },

    #[error("unexpected {found} at offset {offset}")]
    Unexpected { found: String, offset: usize },
}

const ASSIGNMENT_OPERATORS: &[&str] = &[
    "=", "+=", "-=", "*=", "/=", "%=", "**=", "<<=", ">>=", ">>>=", "&=", "|=", "^=", "&&=",
    "||=", "??=",
];

/// Binding power of binary operators for precedence climbing.
fn binary_power(token: &Token, no_in: bool) -> Option<u8> {
    let power = match (&token.kind, token.text.as_str()) {
        (TokenKind::Punctuator, "??") => 1,
        (TokenKind::Punctuator, "||") => 2,
        (TokenKind::Punctuator, "&&") => 3,
        (TokenKind::Punctuator, "|") => 4,
        (TokenKind::Punctuator, "^") => 5,
        (TokenKind::Punctuator, "&") => 6,
        (TokenKind::Punctuator, "==" | "!=" | "===" | "!==") => 7,
        (TokenKind::Punctuator, "<" | ">" | "<=" | ">=") => 8,
        (TokenKind::Keyword, "instanceof") => 8,
        (TokenKind::Keyword, "in") if !no_in => 8,
        (TokenKind::Punctuator, "<<" | ">>" | ">>>") => 9,
        (TokenKind::Punctuator, "+" | "-") => 10,
        (TokenKind::Punctuator, "*" | "/" | "%") => 11,
        (TokenKind::Punctuator, "**") => 12,
        _ => return None,
    };
    Some(power)
}

/// Parse a complete source file.
pub fn parse(source: &str) -> Result<Program, ParseError> {
    Parser::new(Lexer::new(source))?.parse_program()
}

/// Parse a source consisting of a single expression.
pub fn parse_expression_source(source: &str) -> Result<(Program, ExprId), ParseError> {
    let mut parser = Parser::new(Lexer::new(source))?;
    let expr = parser.parse_expression()?;
    parser.eat_punct(";");
    parser.expect_eof()?;
    let start = parser.program.expr(expr).outer.start;
    let stmt = parser.finish_stmt(Stmt::Expression(expr), start);
    let program = parser.finish(vec![stmt]);
    Ok((program, expr))
}

pub struct Parser {
    tokens: Vec<Token>,
    position: usize,
    program: Program,
    /// Inside a `for (...)` head, where `in` ends the initialiser
    no_in: bool,
}

impl Parser {
    pub fn new(lexer: Lexer<'_>) -> Result<Self, ParseError> {
        let source = lexer.source();
        let (tokens, comments) = lexer.tokenize()?;
        Ok(Parser {
            tokens,
            position: 0,
            program: Program::new(source, comments),
            no_in: false,
        })
    }

    fn current(&self) -> &Token {
        self.peek(0)
    }

    fn peek(&self, offset: usize) -> &Token {
        let last = self.tokens.len() - 1;
        &self.tokens[(self.position + offset).min(last)]
    }

    fn bump(&mut self) -> Token {
        let token = self.current().clone();
        if token.kind != TokenKind::Eof {
            self.position += 1;
        }
        token
    }

    fn prev_end(&self) -> usize {
        match self.position.checked_sub(1) {
            Some(i) => self.tokens[i].span.end,
            None => 0,
        }
    }

    fn at_punct(&self, text: &str) -> bool {
        self.current().is_punct(text)
    }

    fn at_keyword(&self, text: &str) -> bool {
        self.current().is_keyword(text)
    }

    fn at_eof(&self) -> bool {
        self.current().kind == TokenKind::Eof
    }

    fn eat_punct(&mut self, text: &str) -> bool {
        if self.at_punct(text) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn expect_punct(&mut self, text: &str) -> Result<Token, ParseError> {
        if self.at_punct(text) {
            Ok(self.bump())
        } else {
            Err(self.expected(&format!("'{}'", text)))
        }
    }

    fn expect_keyword(&mut self, text: &str) -> Result<Token, ParseError> {
        if self.at_keyword(text) {
            Ok(self.bump())
        } else {
            Err(self.expected(&format!("'{}'", text)))
        }
    }

    fn expect_eof(&self) -> Result<(), ParseError> {
        if self.at_eof() {
            Ok(())
        } else {
            Err(self.expected("end of input"))
        }
    }

    fn describe(token: &Token) -> String {
        match token.kind {
            TokenKind::Eof => "end of input".to_string(),
            _ => format!("'{}'", token.text),
        }
    }

    fn expected(&self, expected: &str) -> ParseError {
        ParseError::Expected {
            expected: expected.to_string(),
            found: Self::describe(self.current()),
            offset: self.current().span.start,
        }
    }

    fn unexpected(&self) -> ParseError {
        ParseError::Unexpected {
            found: Self::describe(self.current()),
            offset: self.current().span.start,
        }
    }

    /// Automatic semicolon insertion: a `;`, a closing brace, the end of
    /// input or a line break ends the statement.
    fn consume_semicolon(&mut self) -> Result<(), ParseError> {
        if self.eat_punct(";") || self.at_punct("}") || self.at_eof() {
            return Ok(());
        }
        if self.current().newline_before {
            return Ok(());
        }
        Err(self.expected("';'"))
    }

    fn finish_expr(&mut self, kind: Expr, start: usize) -> ExprId {
        let end = self.prev_end();
        self.program.push_expr(kind, Span::new(start, end))
    }

    fn finish_stmt(&mut self, kind: Stmt, start: usize) -> StmtId {
        let end = self.prev_end();
        self.program.push_stmt(kind, Span::new(start, end))
    }

    fn outer_start(&self, id: ExprId) -> usize {
        self.program.expr(id).outer.start
    }

    fn finish(mut self, body: Vec<StmtId>) -> Program {
        self.program.finish(body, self.tokens);
        self.program
    }

    /// Parse the whole token stream as a program.
    pub fn parse_program(mut self) -> Result<Program, ParseError> {
        let mut body = Vec::new();
        while !self.at_eof() {
            body.push(self.parse_statement()?);
        }
        Ok(self.finish(body))
    }

    // ------------------------------------------------------------------
    // Statements
    // ------------------------------------------------------------------

    fn parse_statement(&mut self) -> Result<StmtId, ParseError> {
        let start = self.current().span.start;
        let token = self.current().clone();

        match (&token.kind, token.text.as_str()) {
            (TokenKind::Punctuator, "{") => self.parse_block(),
            (TokenKind::Punctuator, ";") => {
                self.bump();
                Ok(self.finish_stmt(Stmt::Empty, start))
            }
            (TokenKind::Keyword, "var" | "let" | "const") => {
                let stmt = self.parse_variable_declaration(false)?;
                Ok(stmt)
            }
            (TokenKind::Keyword, "function") => self.parse_function_declaration(start),
            (TokenKind::Identifier, "async")
                if self.peek(1).is_keyword("function") && !self.peek(1).newline_before =>
            {
                self.bump();
                self.parse_function_declaration(start)
            }
            (TokenKind::Keyword, "if") => self.parse_if(),
            (TokenKind::Keyword, "for") => self.parse_for(),
            (TokenKind::Keyword, "while") => {
                self.bump();
                self.expect_punct("(")?;
                let test = self.parse_expression()?;
                self.expect_punct(")")?;
                let body = self.parse_statement()?;
                Ok(self.finish_stmt(Stmt::While { test, body }, start))
            }
            (TokenKind::Keyword, "do") => {
                self.bump();
                let body = self.parse_statement()?;
                self.expect_keyword("while")?;
                self.expect_punct("(")?;
                let test = self.parse_expression()?;
                self.expect_punct(")")?;
                self.eat_punct(";");
                Ok(self.finish_stmt(Stmt::DoWhile { body, test }, start))
            }
            (TokenKind::Keyword, "return") => {
                self.bump();
                let argument = if self.at_punct(";")
                    || self.at_punct("}")
                    || self.at_eof()
                    || self.current().newline_before
                {
                    None
                } else {
                    Some(self.parse_expression()?)
                };
                self.consume_semicolon()?;
                Ok(self.finish_stmt(Stmt::Return(argument), start))
            }
            (TokenKind::Keyword, "throw") => {
                self.bump();
                let argument = self.parse_expression()?;
                self.consume_semicolon()?;
                Ok(self.finish_stmt(Stmt::Throw(argument), start))
            }
            (TokenKind::Keyword, "break" | "continue") => {
                self.bump();
                let label = if self.current().kind == TokenKind::Identifier
                    && !self.current().newline_before
                {
                    Some(self.bump().text)
                } else {
                    None
                };
                self.consume_semicolon()?;
                let kind = if token.text == "break" {
                    Stmt::Break(label)
                } else {
                    Stmt::Continue(label)
                };
                Ok(self.finish_stmt(kind, start))
            }
            (TokenKind::Keyword, "try") => self.parse_try(),
            (TokenKind::Keyword, "switch") => self.parse_switch(),
            (TokenKind::Keyword, "class") => {
                self.parse_class()?;
                Ok(self.finish_stmt(Stmt::Opaque, start))
            }
            (TokenKind::Keyword, "import")
                if !self.peek(1).is_punct("(") && !self.peek(1).is_punct(".") =>
            {
                self.skip_to_statement_end();
                Ok(self.finish_stmt(Stmt::Opaque, start))
            }
            (TokenKind::Keyword, "export") => self.parse_export(),
            (TokenKind::Keyword, "with") => {
                self.bump();
                self.expect_punct("(")?;
                self.parse_expression()?;
                self.expect_punct(")")?;
                self.parse_statement()?;
                Ok(self.finish_stmt(Stmt::Opaque, start))
            }
            (TokenKind::Keyword, "debugger") => {
                self.bump();
                self.consume_semicolon()?;
                Ok(self.finish_stmt(Stmt::Opaque, start))
            }
            (TokenKind::Identifier, _) if self.peek(1).is_punct(":") => {
                let label = self.bump().text;
                self.bump();
                let body = self.parse_statement()?;
                Ok(self.finish_stmt(Stmt::Labeled { label, body }, start))
            }
            _ => {
                let expression = self.parse_expression()?;
                self.consume_semicolon()?;
                Ok(self.finish_stmt(Stmt::Expression(expression), start))
            }
        }
    }

    fn parse_block(&mut self) -> Result<StmtId, ParseError> {
        let start = self.current().span.start;
        let body = self.parse_statement_list()?;
        Ok(self.finish_stmt(Stmt::Block(body), start))
    }

    /// `{ statement* }`
    fn parse_statement_list(&mut self) -> Result<Vec<StmtId>, ParseError> {
        self.expect_punct("{")?;
        let mut body = Vec::new();
        while !self.at_punct("}") {
            if self.at_eof() {
                return Err(self.expected("'}'"));
            }
            body.push(self.parse_statement()?);
        }
        self.bump();
        Ok(body)
    }

    fn parse_variable_declaration(&mut self, in_for_head: bool) -> Result<StmtId, ParseError> {
        let start = self.current().span.start;
        let kind = match self.bump().text.as_str() {
            "var" => DeclKind::Var,
            "let" => DeclKind::Let,
            _ => DeclKind::Const,
        };

        let mut declarators = Vec::new();
        loop {
            let pattern = self.parse_binding_target()?;
            let init = if self.eat_punct("=") {
                Some(self.parse_assignment()?)
            } else {
                None
            };
            declarators.push(Declarator { pattern, init });
            if !self.eat_punct(",") {
                break;
            }
        }

        if !in_for_head {
            self.consume_semicolon()?;
        }
        Ok(self.finish_stmt(Stmt::VariableDeclaration { kind, declarators }, start))
    }

    fn parse_binding_target(&mut self) -> Result<ExprId, ParseError> {
        if self.at_punct("{") || self.at_punct("[") {
            return self.parse_primary();
        }
        if self.current().kind == TokenKind::Identifier {
            let token = self.bump();
            return Ok(self
                .program
                .push_expr(Expr::Identifier(token.text), token.span));
        }
        Err(self.expected("binding name"))
    }

    fn parse_function_declaration(&mut self, start: usize) -> Result<StmtId, ParseError> {
        self.expect_keyword("function")?;
        self.eat_punct("*");
        let name = match self.current().kind {
            TokenKind::Identifier => self.bump().text,
            _ => return Err(self.expected("function name")),
        };
        let params = self.parse_params()?;
        let body = self.parse_statement_list()?;
        Ok(self.finish_stmt(Stmt::FunctionDeclaration { name, params, body }, start))
    }

    fn parse_if(&mut self) -> Result<StmtId, ParseError> {
        let start = self.bump().span.start;
        self.expect_punct("(")?;
        let test = self.parse_expression()?;
        self.expect_punct(")")?;
        let consequent = self.parse_statement()?;
        let alternate = if self.at_keyword("else") {
            self.bump();
            Some(self.parse_statement()?)
        } else {
            None
        };
        Ok(self.finish_stmt(
            Stmt::If {
                test,
                consequent,
                alternate,
            },
            start,
        ))
    }

    fn parse_for(&mut self) -> Result<StmtId, ParseError> {
        let start = self.bump().span.start;
        if self.current().is_identifier("await") {
            self.bump();
        }
        self.expect_punct("(")?;

        let saved = self.no_in;
        self.no_in = true;
        let head = if self.at_punct(";") {
            None
        } else if self.at_keyword("var") || self.at_keyword("let") || self.at_keyword("const") {
            Some(ForHead::Declaration(self.parse_variable_declaration(true)?))
        } else {
            Some(ForHead::Pattern(self.parse_expression()?))
        };
        self.no_in = saved;

        if let Some(left) = head.clone() {
            if self.at_keyword("in") {
                self.bump();
                let right = self.parse_expression()?;
                self.expect_punct(")")?;
                let body = self.parse_statement()?;
                return Ok(self.finish_stmt(Stmt::ForIn { left, right, body }, start));
            }
            if self.current().is_identifier("of") {
                self.bump();
                let right = self.parse_assignment()?;
                self.expect_punct(")")?;
                let body = self.parse_statement()?;
                return Ok(self.finish_stmt(Stmt::ForOf { left, right, body }, start));
            }
        }

        let init = match head {
            None => None,
            Some(ForHead::Declaration(decl)) => Some(decl),
            Some(ForHead::Pattern(expr)) => {
                let expr_start = self.outer_start(expr);
                let span = Span::new(expr_start, self.program.expr(expr).outer.end);
                Some(self.program.push_stmt(Stmt::Expression(expr), span))
            }
        };
        self.expect_punct(";")?;
        let test = if self.at_punct(";") {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.expect_punct(";")?;
        let update = if self.at_punct(")") {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.expect_punct(")")?;
        let body = self.parse_statement()?;
        Ok(self.finish_stmt(
            Stmt::For {
                init,
                test,
                update,
                body,
            },
            start,
        ))
    }

    fn parse_try(&mut self) -> Result<StmtId, ParseError> {
        let start = self.bump().span.start;
        let block = self.parse_block()?;

        let handler = if self.at_keyword("catch") {
            self.bump();
            let param = if self.eat_punct("(") {
                let param = self.parse_binding_target()?;
                self.expect_punct(")")?;
                Some(param)
            } else {
                None
            };
            let body = self.parse_block()?;
            Some(CatchClause { param, body })
        } else {
            None
        };

        let finalizer = if self.at_keyword("finally") {
            self.bump();
            Some(self.parse_block()?)
        } else {
            None
        };

        if handler.is_none() && finalizer.is_none() {
            return Err(self.expected("'catch' or 'finally'"));
        }
        Ok(self.finish_stmt(
            Stmt::Try {
                block,
                handler,
                finalizer,
            },
            start,
        ))
    }

    fn parse_switch(&mut self) -> Result<StmtId, ParseError> {
        let start = self.bump().span.start;
        self.expect_punct("(")?;
        let discriminant = self.parse_expression()?;
        self.expect_punct(")")?;
        self.expect_punct("{")?;

        let mut cases = Vec::new();
        while !self.eat_punct("}") {
            let test = if self.at_keyword("case") {
                self.bump();
                Some(self.parse_expression()?)
            } else {
                self.expect_keyword("default")?;
                None
            };
            self.expect_punct(":")?;
            let mut consequent = Vec::new();
            while !self.at_keyword("case") && !self.at_keyword("default") && !self.at_punct("}")
            {
                if self.at_eof() {
                    return Err(self.expected("'}'"));
                }
                consequent.push(self.parse_statement()?);
            }
            cases.push(SwitchCase { test, consequent });
        }
        Ok(self.finish_stmt(
            Stmt::Switch {
                discriminant,
                cases,
            },
            start,
        ))
    }

    fn parse_export(&mut self) -> Result<StmtId, ParseError> {
        let start = self.bump().span.start;
        if self.at_keyword("default") {
            self.bump();
            if self.at_keyword("function") || self.at_keyword("class") {
                self.parse_statement_or_anonymous()?;
            } else {
                self.parse_assignment()?;
                self.consume_semicolon()?;
            }
        } else if self.at_punct("{") || self.at_punct("*") {
            self.skip_to_statement_end();
        } else {
            self.parse_statement()?;
        }
        Ok(self.finish_stmt(Stmt::Opaque, start))
    }

    /// `export default function () {}` may omit the name.
    fn parse_statement_or_anonymous(&mut self) -> Result<(), ParseError> {
        let named = self.peek(1).kind == TokenKind::Identifier
            || (self.peek(1).is_punct("*") && self.peek(2).kind == TokenKind::Identifier);
        if named {
            self.parse_statement()?;
        } else {
            self.parse_primary()?;
        }
        Ok(())
    }

    /// Skip an import/export clause up to its end.
    fn skip_to_statement_end(&mut self) {
        let mut depth = 0usize;
        let mut consumed = false;
        while !self.at_eof() {
            let token = self.current();
            if depth == 0 && consumed {
                if token.is_punct(";") {
                    self.bump();
                    return;
                }
                if token.newline_before || token.is_punct("}") {
                    return;
                }
            }
            let token = self.bump();
            consumed = true;
            match token.text.as_str() {
                "(" | "[" | "{" if token.kind == TokenKind::Punctuator => depth += 1,
                ")" | "]" | "}" if token.kind == TokenKind::Punctuator => {
                    depth = depth.saturating_sub(1)
                }
                _ => {}
            }
        }
    }

    // ------------------------------------------------------------------
    // Expressions
    // ------------------------------------------------------------------

    /// Comma-separated expression.
    pub fn parse_expression(&mut self) -> Result<ExprId, ParseError> {
        let first = self.parse_assignment()?;
        if !self.at_punct(",") {
            return Ok(first);
        }
        let start = self.outer_start(first);
        let mut items = vec![first];
        while self.eat_punct(",") {
            items.push(self.parse_assignment()?);
        }
        Ok(self.finish_expr(Expr::Sequence(items), start))
    }

    fn parse_assignment(&mut self) -> Result<ExprId, ParseError> {
        if self.arrow_ahead() {
            return self.parse_arrow_function();
        }
        if self.at_keyword("yield") {
            let start = self.bump().span.start;
            self.eat_punct("*");
            let ends = self.at_punct(")")
                || self.at_punct("]")
                || self.at_punct("}")
                || self.at_punct(",")
                || self.at_punct(";")
                || self.at_eof()
                || self.current().newline_before;
            if !ends {
                self.parse_assignment()?;
            }
            return Ok(self.finish_expr(Expr::Opaque, start));
        }

        let target = self.parse_conditional()?;
        let token = self.current();
        if token.kind == TokenKind::Punctuator && ASSIGNMENT_OPERATORS.contains(&token.text.as_str())
        {
            let op = self.bump().text;
            let value = self.parse_assignment()?;
            let start = self.outer_start(target);
            return Ok(self.finish_expr(Expr::Assignment { op, target, value }, start));
        }
        Ok(target)
    }

    /// Is the upcoming construct an arrow function?
    fn arrow_ahead(&self) -> bool {
        let mut offset = 0;
        if self.current().is_identifier("async")
            && !self.peek(1).newline_before
            && (self.peek(1).kind == TokenKind::Identifier || self.peek(1).is_punct("("))
        {
            offset = 1;
        }
        let head = self.peek(offset);
        if head.kind == TokenKind::Identifier {
            return self.peek(offset + 1).is_punct("=>");
        }
        if !head.is_punct("(") {
            return false;
        }
        let mut depth = 0usize;
        let mut index = offset;
        loop {
            let token = self.peek(index);
            match (&token.kind, token.text.as_str()) {
                (TokenKind::Eof, _) => return false,
                (TokenKind::Punctuator, "(" | "[" | "{") => depth += 1,
                (TokenKind::Punctuator, ")" | "]" | "}") => {
                    depth -= 1;
                    if depth == 0 {
                        let next = self.peek(index + 1);
                        return next.is_punct("=>") && !next.newline_before;
                    }
                }
                _ => {}
            }
            index += 1;
        }
    }

    fn parse_arrow_function(&mut self) -> Result<ExprId, ParseError> {
        let start = self.current().span.start;
        if self.current().is_identifier("async") && !self.peek(1).is_punct("=>") {
            self.bump();
        }
        let params = if self.current().kind == TokenKind::Identifier {
            let token = self.bump();
            vec![self.program.push_expr(Expr::Identifier(token.text), token.span)]
        } else {
            self.parse_params()?
        };
        self.expect_punct("=>")?;

        let saved = self.no_in;
        self.no_in = false;
        let body = if self.at_punct("{") {
            FunctionBody::Block(self.parse_statement_list()?)
        } else {
            FunctionBody::Expression(self.parse_assignment()?)
        };
        self.no_in = saved;

        Ok(self.finish_expr(
            Expr::Function {
                name: None,
                params,
                body,
                arrow: true,
            },
            start,
        ))
    }

    /// `( param, param = default, ...rest )`
    fn parse_params(&mut self) -> Result<Vec<ExprId>, ParseError> {
        self.expect_punct("(")?;
        let saved = self.no_in;
        self.no_in = false;
        let mut params = Vec::new();
        while !self.at_punct(")") {
            if self.at_punct("...") {
                let start = self.bump().span.start;
                let target = self.parse_binding_target()?;
                params.push(self.finish_expr(Expr::Spread(target), start));
            } else {
                params.push(self.parse_assignment()?);
            }
            if !self.at_punct(")") {
                self.expect_punct(",")?;
            }
        }
        self.bump();
        self.no_in = saved;
        Ok(params)
    }

    fn parse_conditional(&mut self) -> Result<ExprId, ParseError> {
        let test = self.parse_binary(0)?;
        if !self.at_punct("?") {
            return Ok(test);
        }
        self.bump();

        let saved = self.no_in;
        self.no_in = false;
        let consequent = self.parse_assignment()?;
        self.no_in = saved;

        self.expect_punct(":")?;
        let alternate = self.parse_assignment()?;
        let start = self.outer_start(test);
        Ok(self.finish_expr(
            Expr::Conditional {
                test,
                consequent,
                alternate,
            },
            start,
        ))
    }

    /// Precedence climbing over every binary operator, `??` and `||`
    /// included. `**` is right-associative.
    fn parse_binary(&mut self, min_power: u8) -> Result<ExprId, ParseError> {
        let mut left = self.parse_unary()?;

        while let Some(power) = binary_power(self.current(), self.no_in) {
            if power < min_power {
                break;
            }
            let op_text = self.bump().text;
            let next_min = if op_text == "**" { power } else { power + 1 };
            let right = self.parse_binary(next_min)?;

            let kind = match LogicalOp::from_text(&op_text) {
                Some(op) => Expr::Logical { op, left, right },
                None => match BinOp::from_text(&op_text) {
                    Some(op) => Expr::Binary { op, left, right },
                    None => unreachable!("binary_power admitted unknown operator {op_text}"),
                },
            };
            let start = self.outer_start(left);
            left = self.finish_expr(kind, start);
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<ExprId, ParseError> {
        let token = self.current().clone();
        let start = token.span.start;

        let unary = match token.kind {
            TokenKind::Punctuator | TokenKind::Keyword => UnaryOp::from_text(&token.text)
                .filter(|op| !matches!(op, UnaryOp::Await)),
            TokenKind::Identifier if token.text == "await" && self.await_is_operator() => {
                Some(UnaryOp::Await)
            }
            _ => None,
        };
        if let Some(op) = unary {
            self.bump();
            let argument = self.parse_unary()?;
            return Ok(self.finish_expr(Expr::Unary { op, argument }, start));
        }

        if token.is_punct("++") || token.is_punct("--") {
            self.bump();
            let argument = self.parse_unary()?;
            return Ok(self.finish_expr(
                Expr::Update {
                    increment: token.text == "++",
                    prefix: true,
                    argument,
                },
                start,
            ));
        }

        let expr = self.parse_call_member()?;
        let next = self.current();
        if (next.is_punct("++") || next.is_punct("--")) && !next.newline_before {
            let increment = self.bump().text == "++";
            let start = self.outer_start(expr);
            return Ok(self.finish_expr(
                Expr::Update {
                    increment,
                    prefix: false,
                    argument: expr,
                },
                start,
            ));
        }
        Ok(expr)
    }

    fn await_is_operator(&self) -> bool {
        let next = self.peek(1);
        if next.newline_before {
            return false;
        }
        match next.kind {
            TokenKind::Identifier
            | TokenKind::Keyword
            | TokenKind::Number
            | TokenKind::String(_)
            | TokenKind::Template
            | TokenKind::Regex => true,
            TokenKind::Punctuator => matches!(next.text.as_str(), "[" | "!" | "~" | "{"),
            TokenKind::Eof => false,
        }
    }

    fn parse_call_member(&mut self) -> Result<ExprId, ParseError> {
        let mut expr = if self.at_keyword("new") {
            self.parse_new()?
        } else {
            self.parse_primary()?
        };
        let start = self.outer_start(expr);

        loop {
            if self.eat_punct(".") {
                let name = self.parse_property_name()?;
                expr = self.finish_expr(
                    Expr::Member {
                        object: expr,
                        property: MemberProperty::Static(name),
                        optional: false,
                    },
                    start,
                );
            } else if self.eat_punct("?.") {
                if self.at_punct("(") {
                    let arguments = self.parse_arguments()?;
                    expr = self.finish_expr(
                        Expr::Call {
                            callee: expr,
                            arguments,
                            optional: true,
                        },
                        start,
                    );
                } else if self.eat_punct("[") {
                    let key = self.parse_expression()?;
                    self.expect_punct("]")?;
                    expr = self.finish_expr(
                        Expr::Member {
                            object: expr,
                            property: MemberProperty::Computed(key),
                            optional: true,
                        },
                        start,
                    );
                } else {
                    let name = self.parse_property_name()?;
                    expr = self.finish_expr(
                        Expr::Member {
                            object: expr,
                            property: MemberProperty::Static(name),
                            optional: true,
                        },
                        start,
                    );
                }
            } else if self.at_punct("[") {
                self.bump();
                let saved = self.no_in;
                self.no_in = false;
                let key = self.parse_expression()?;
                self.no_in = saved;
                self.expect_punct("]")?;
                expr = self.finish_expr(
                    Expr::Member {
                        object: expr,
                        property: MemberProperty::Computed(key),
                        optional: false,
                    },
                    start,
                );
            } else if self.at_punct("(") {
                let arguments = self.parse_arguments()?;
                expr = self.finish_expr(
                    Expr::Call {
                        callee: expr,
                        arguments,
                        optional: false,
                    },
                    start,
                );
            } else if self.current().kind == TokenKind::Template {
                // tagged template
                self.bump();
                expr = self.finish_expr(Expr::Opaque, start);
            } else {
                break;
            }
        }
        Ok(expr)
    }

    fn parse_new(&mut self) -> Result<ExprId, ParseError> {
        let start = self.bump().span.start;
        if self.eat_punct(".") {
            self.parse_property_name()?;
            return Ok(self.finish_expr(Expr::Opaque, start));
        }

        let mut callee = if self.at_keyword("new") {
            self.parse_new()?
        } else {
            self.parse_primary()?
        };
        let callee_start = self.outer_start(callee);
        loop {
            if self.eat_punct(".") {
                let name = self.parse_property_name()?;
                callee = self.finish_expr(
                    Expr::Member {
                        object: callee,
                        property: MemberProperty::Static(name),
                        optional: false,
                    },
                    callee_start,
                );
            } else if self.eat_punct("[") {
                let key = self.parse_expression()?;
                self.expect_punct("]")?;
                callee = self.finish_expr(
                    Expr::Member {
                        object: callee,
                        property: MemberProperty::Computed(key),
                        optional: false,
                    },
                    callee_start,
                );
            } else {
                break;
            }
        }

        let arguments = if self.at_punct("(") {
            self.parse_arguments()?
        } else {
            Vec::new()
        };
        Ok(self.finish_expr(Expr::New { callee, arguments }, start))
    }

    fn parse_property_name(&mut self) -> Result<String, ParseError> {
        match self.current().kind {
            TokenKind::Identifier | TokenKind::Keyword => Ok(self.bump().text),
            _ => Err(self.expected("property name")),
        }
    }

    fn parse_arguments(&mut self) -> Result<Vec<ExprId>, ParseError> {
        self.expect_punct("(")?;
        let saved = self.no_in;
        self.no_in = false;
        let mut arguments = Vec::new();
        while !self.at_punct(")") {
            if self.at_punct("...") {
                let start = self.bump().span.start;
                let value = self.parse_assignment()?;
                arguments.push(self.finish_expr(Expr::Spread(value), start));
            } else {
                arguments.push(self.parse_assignment()?);
            }
            if !self.at_punct(")") {
                self.expect_punct(",")?;
            }
        }
        self.bump();
        self.no_in = saved;
        Ok(arguments)
    }

    /// Primary expressions (atoms): literals, identifiers, grouping, array
    /// and object literals, function and class expressions.
    fn parse_primary(&mut self) -> Result<ExprId, ParseError> {
        let token = self.current().clone();
        let start = token.span.start;

        match (&token.kind, token.text.as_str()) {
            (TokenKind::Identifier, "async")
                if self.peek(1).is_keyword("function") && !self.peek(1).newline_before =>
            {
                self.bump();
                self.parse_function_expression(start)
            }
            (TokenKind::Identifier, _) => {
                self.bump();
                Ok(self.finish_expr(Expr::Identifier(token.text.clone()), start))
            }
            (TokenKind::Number, raw) => {
                self.bump();
                let literal = Literal::Number {
                    value: numeric_value(raw),
                    raw: raw.to_string(),
                };
                Ok(self.finish_expr(Expr::Literal(literal), start))
            }
            (TokenKind::String(value), _) => {
                self.bump();
                Ok(self.finish_expr(Expr::Literal(Literal::String(value.clone())), start))
            }
            (TokenKind::Template, _) => {
                self.bump();
                Ok(self.finish_expr(Expr::Literal(Literal::Template), start))
            }
            (TokenKind::Regex, _) => {
                self.bump();
                Ok(self.finish_expr(Expr::Literal(Literal::Regex), start))
            }
            (TokenKind::Keyword, "null") => {
                self.bump();
                Ok(self.finish_expr(Expr::Literal(Literal::Null), start))
            }
            (TokenKind::Keyword, "true" | "false") => {
                self.bump();
                let literal = Literal::Boolean(token.text == "true");
                Ok(self.finish_expr(Expr::Literal(literal), start))
            }
            (TokenKind::Keyword, "this") => {
                self.bump();
                Ok(self.finish_expr(Expr::This, start))
            }
            (TokenKind::Keyword, "super" | "import") => {
                self.bump();
                Ok(self.finish_expr(Expr::Identifier(token.text.clone()), start))
            }
            (TokenKind::Keyword, "function") => self.parse_function_expression(start),
            (TokenKind::Keyword, "class") => {
                self.parse_class()?;
                Ok(self.finish_expr(Expr::Opaque, start))
            }
            (TokenKind::Punctuator, "(") => {
                self.bump();
                let saved = self.no_in;
                self.no_in = false;
                let inner = self.parse_expression()?;
                self.no_in = saved;
                let close = self.expect_punct(")")?;
                self.program.set_outer(inner, Span::new(start, close.span.end));
                Ok(inner)
            }
            (TokenKind::Punctuator, "[") => self.parse_array_literal(),
            (TokenKind::Punctuator, "{") => self.parse_object_literal(),
            _ => Err(self.unexpected()),
        }
    }

    fn parse_function_expression(&mut self, start: usize) -> Result<ExprId, ParseError> {
        self.expect_keyword("function")?;
        self.eat_punct("*");
        let name = if self.current().kind == TokenKind::Identifier {
            Some(self.bump().text)
        } else {
            None
        };
        let params = self.parse_params()?;
        let body = FunctionBody::Block(self.parse_statement_list()?);
        Ok(self.finish_expr(
            Expr::Function {
                name,
                params,
                body,
                arrow: false,
            },
            start,
        ))
    }

    fn parse_array_literal(&mut self) -> Result<ExprId, ParseError> {
        let start = self.expect_punct("[")?.span.start;
        let saved = self.no_in;
        self.no_in = false;
        let mut elements = Vec::new();
        while !self.at_punct("]") {
            if self.at_punct(",") {
                self.bump();
                elements.push(None);
                continue;
            }
            let element = if self.at_punct("...") {
                let spread_start = self.bump().span.start;
                let value = self.parse_assignment()?;
                self.finish_expr(Expr::Spread(value), spread_start)
            } else {
                self.parse_assignment()?
            };
            elements.push(Some(element));
            if !self.at_punct("]") {
                self.expect_punct(",")?;
            }
        }
        self.bump();
        self.no_in = saved;
        Ok(self.finish_expr(Expr::Array(elements), start))
    }

    fn parse_object_literal(&mut self) -> Result<ExprId, ParseError> {
        let start = self.expect_punct("{")?.span.start;
        let saved = self.no_in;
        self.no_in = false;
        let mut members = Vec::new();

        while !self.at_punct("}") {
            if self.at_punct("...") {
                let spread_start = self.bump().span.start;
                let value = self.parse_assignment()?;
                let spread = self.finish_expr(Expr::Spread(value), spread_start);
                members.push(ObjectMember::Spread(spread));
            } else {
                members.push(self.parse_object_property()?);
            }
            if !self.at_punct("}") {
                self.expect_punct(",")?;
            }
        }
        self.bump();
        self.no_in = saved;
        Ok(self.finish_expr(Expr::Object(members), start))
    }

    fn parse_object_property(&mut self) -> Result<ObjectMember, ParseError> {
        let member_start = self.current().span.start;
        self.skip_method_modifiers();

        let key_token = self.current().clone();
        let key = match &key_token.kind {
            TokenKind::Identifier | TokenKind::Keyword | TokenKind::Number => {
                self.bump();
                PropertyKey::Named(key_token.text.clone())
            }
            TokenKind::String(value) => {
                self.bump();
                PropertyKey::Named(value.clone())
            }
            TokenKind::Punctuator if key_token.text == "[" => {
                self.bump();
                let key = self.parse_assignment()?;
                self.expect_punct("]")?;
                PropertyKey::Computed(key)
            }
            _ => return Err(self.expected("property key")),
        };

        let value = if self.at_punct("(") {
            let params = self.parse_params()?;
            let body = FunctionBody::Block(self.parse_statement_list()?);
            self.finish_expr(
                Expr::Function {
                    name: None,
                    params,
                    body,
                    arrow: false,
                },
                member_start,
            )
        } else if self.eat_punct(":") {
            self.parse_assignment()?
        } else {
            // shorthand, possibly with a default inside a destructuring pattern
            let target = self
                .program
                .push_expr(Expr::Identifier(key_token.text.clone()), key_token.span);
            if self.eat_punct("=") {
                let value = self.parse_assignment()?;
                self.finish_expr(
                    Expr::Assignment {
                        op: "=".to_string(),
                        target,
                        value,
                    },
                    key_token.span.start,
                )
            } else {
                target
            }
        };
        Ok(ObjectMember::Property { key, value })
    }

    /// `get`, `set`, `async`, `static` and `*` in front of a method name.
    fn skip_method_modifiers(&mut self) {
        loop {
            let token = self.current();
            let is_modifier = matches!(
                (&token.kind, token.text.as_str()),
                (TokenKind::Identifier, "get" | "set" | "async" | "static")
            );
            let next = self.peek(1);
            let names_follow = !matches!(next.text.as_str(), "(" | "," | ":" | "}" | "=" | ";")
                || next.kind != TokenKind::Punctuator;
            if is_modifier && names_follow && next.kind != TokenKind::Eof {
                self.bump();
            } else if token.is_punct("*") {
                self.bump();
            } else {
                return;
            }
        }
    }

    /// `class Name extends Base { members }`; members are parsed so that
    /// method bodies land in the arena, the class itself stays opaque.
    fn parse_class(&mut self) -> Result<(), ParseError> {
        self.expect_keyword("class")?;
        if self.current().kind == TokenKind::Identifier {
            self.bump();
        }
        if self.at_keyword("extends") {
            self.bump();
            self.parse_call_member()?;
        }
        self.expect_punct("{")?;
        while !self.eat_punct("}") {
            if self.at_eof() {
                return Err(self.expected("'}'"));
            }
            if self.eat_punct(";") {
                continue;
            }
            if self.current().is_identifier("static") && self.peek(1).is_punct("{") {
                self.bump();
                self.parse_block()?;
                continue;
            }
            let member_start = self.current().span.start;
            self.skip_method_modifiers();
            match self.current().kind {
                TokenKind::Identifier
                | TokenKind::Keyword
                | TokenKind::Number
                | TokenKind::String(_) => {
                    self.bump();
                }
                TokenKind::Punctuator if self.at_punct("[") => {
                    self.bump();
                    self.parse_assignment()?;
                    self.expect_punct("]")?;
                }
                _ => return Err(self.expected("class member")),
            }
            if self.at_punct("(") {
                let params = self.parse_params()?;
                let body = FunctionBody::Block(self.parse_statement_list()?);
                self.finish_expr(
                    Expr::Function {
                        name: None,
                        params,
                        body,
                        arrow: false,
                    },
                    member_start,
                );
            } else {
                if self.eat_punct("=") {
                    self.parse_assignment()?;
                }
                self.consume_semicolon()?;
            }
        }
        Ok(())
    }
}
