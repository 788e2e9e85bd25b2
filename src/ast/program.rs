use crate::ast::{
    Comment, Expr, ExprId, ExprNode, ForHead, FunctionBody, Literal, MemberProperty, ObjectMember,
    Precedence, PropertyKey, Span, Stmt, StmtId, StmtNode, Token, TokenKind, UnaryOp,
    needs_parens,
};

/// Reference to any node in the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeRef {
    Expr(ExprId),
    Stmt(StmtId),
}

/// A parsed source file.
///
/// Nodes live in two arenas addressed by [`ExprId`] and [`StmtId`]. Parent
/// links are kept in a side-table filled once parsing is finished, so nodes
/// never point at each other.
#[derive(Debug, Clone)]
pub struct Program {
    source: String,
    tokens: Vec<Token>,
    comments: Vec<Comment>,
    exprs: Vec<ExprNode>,
    stmts: Vec<StmtNode>,
    expr_parents: Vec<Option<NodeRef>>,
    stmt_parents: Vec<Option<NodeRef>>,
    body: Vec<StmtId>,
    line_starts: Vec<usize>,
}

impl Program {
    pub(crate) fn new(source: &str, comments: Vec<Comment>) -> Self {
        let line_starts = std::iter::once(0)
            .chain(source.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        Program {
            source: source.to_string(),
            tokens: Vec::new(),
            comments,
            exprs: Vec::new(),
            stmts: Vec::new(),
            expr_parents: Vec::new(),
            stmt_parents: Vec::new(),
            body: Vec::new(),
            line_starts,
        }
    }

    pub(crate) fn push_expr(&mut self, kind: Expr, span: Span) -> ExprId {
        let id = ExprId(self.exprs.len() as u32);
        self.exprs.push(ExprNode {
            kind,
            span,
            outer: span,
        });
        id
    }

    pub(crate) fn push_stmt(&mut self, kind: Stmt, span: Span) -> StmtId {
        let id = StmtId(self.stmts.len() as u32);
        self.stmts.push(StmtNode { kind, span });
        id
    }

    /// Record that `id` was written inside the parentheses covering `outer`.
    pub(crate) fn set_outer(&mut self, id: ExprId, outer: Span) {
        self.exprs[id.index()].outer = outer;
    }

    pub(crate) fn finish(&mut self, body: Vec<StmtId>, mut tokens: Vec<Token>) {
        tokens.retain(|t| t.kind != TokenKind::Eof);
        self.tokens = tokens;
        self.body = body;
        self.expr_parents = vec![None; self.exprs.len()];
        self.stmt_parents = vec![None; self.stmts.len()];

        let nodes = (0..self.exprs.len())
            .map(|i| NodeRef::Expr(ExprId(i as u32)))
            .chain((0..self.stmts.len()).map(|i| NodeRef::Stmt(StmtId(i as u32))));
        for parent in nodes.collect::<Vec<_>>() {
            for child in self.children(parent) {
                match child {
                    NodeRef::Expr(id) => self.expr_parents[id.index()] = Some(parent),
                    NodeRef::Stmt(id) => self.stmt_parents[id.index()] = Some(parent),
                }
            }
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Top-level statements.
    pub fn body(&self) -> &[StmtId] {
        &self.body
    }

    /// Every token except the end-of-input marker, comments excluded.
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    pub fn expr(&self, id: ExprId) -> &ExprNode {
        &self.exprs[id.index()]
    }

    pub fn stmt(&self, id: StmtId) -> &StmtNode {
        &self.stmts[id.index()]
    }

    pub fn expr_ids(&self) -> impl Iterator<Item = ExprId> + '_ {
        (0..self.exprs.len()).map(|i| ExprId(i as u32))
    }

    pub fn stmt_ids(&self) -> impl Iterator<Item = StmtId> + '_ {
        (0..self.stmts.len()).map(|i| StmtId(i as u32))
    }

    pub fn parent(&self, node: NodeRef) -> Option<NodeRef> {
        match node {
            NodeRef::Expr(id) => self.expr_parents.get(id.index()).copied().flatten(),
            NodeRef::Stmt(id) => self.stmt_parents.get(id.index()).copied().flatten(),
        }
    }

    pub fn span_of(&self, node: NodeRef) -> Span {
        match node {
            NodeRef::Expr(id) => self.expr(id).span,
            NodeRef::Stmt(id) => self.stmt(id).span,
        }
    }

    pub fn text(&self, span: Span) -> &str {
        &self.source[span.start..span.end]
    }

    /// Source of the expression without enclosing parentheses.
    pub fn expr_text(&self, id: ExprId) -> &str {
        self.text(self.expr(id).span)
    }

    /// Source of the expression including enclosing parentheses.
    pub fn expr_source(&self, id: ExprId) -> &str {
        self.text(self.expr(id).outer)
    }

    pub fn stmt_text(&self, id: StmtId) -> &str {
        self.text(self.stmt(id).span)
    }

    /// Tokens lying entirely inside `span`.
    pub fn tokens_in(&self, span: Span) -> &[Token] {
        let first = self.tokens.partition_point(|t| t.span.start < span.start);
        let last = self.tokens.partition_point(|t| t.span.end <= span.end);
        if first >= last {
            &[]
        } else {
            &self.tokens[first..last]
        }
    }

    /// First token starting at or after `offset`.
    pub fn token_at_or_after(&self, offset: usize) -> Option<&Token> {
        let index = self.tokens.partition_point(|t| t.span.start < offset);
        self.tokens.get(index)
    }

    /// Last token ending at or before `offset`.
    pub fn token_before(&self, offset: usize) -> Option<&Token> {
        let index = self.tokens.partition_point(|t| t.span.end <= offset);
        index.checked_sub(1).and_then(|i| self.tokens.get(i))
    }

    pub fn has_comments_in(&self, span: Span) -> bool {
        self.comments.iter().any(|c| span.contains(c.span))
    }

    /// 1-based line and column of a byte offset.
    pub fn line_col(&self, offset: usize) -> (usize, usize) {
        let line = self.line_starts.partition_point(|&start| start <= offset);
        let start = self.line_starts[line - 1];
        let column = self.source[start..offset.min(self.source.len())].chars().count();
        (line, column + 1)
    }

    pub fn line_start(&self, offset: usize) -> usize {
        let line = self.line_starts.partition_point(|&start| start <= offset);
        self.line_starts[line - 1]
    }

    /// Leading whitespace of the line holding `offset`.
    pub fn indent_at(&self, offset: usize) -> &str {
        let start = self.line_start(offset);
        let rest = &self.source[start..];
        let width = rest.len() - rest.trim_start_matches([' ', '\t']).len();
        &rest[..width]
    }

    /// Binding strength of the expression as written, parentheses included.
    pub fn precedence(&self, id: ExprId) -> Precedence {
        let node = self.expr(id);
        if node.is_parenthesized() {
            return Precedence::Primary;
        }
        match &node.kind {
            Expr::Identifier(_)
            | Expr::Literal(_)
            | Expr::This
            | Expr::Array(_)
            | Expr::Object(_)
            | Expr::Opaque => Precedence::Primary,
            Expr::Function { arrow, .. } => {
                if *arrow {
                    Precedence::Assignment
                } else {
                    Precedence::Primary
                }
            }
            Expr::Unary { .. } => Precedence::Unary,
            Expr::Update { prefix, .. } => {
                if *prefix {
                    Precedence::Unary
                } else {
                    Precedence::Postfix
                }
            }
            Expr::Binary { op, .. } => op.precedence(),
            Expr::Logical { op, .. } => op.precedence(),
            Expr::Conditional { .. } => Precedence::Conditional,
            Expr::Assignment { .. } | Expr::Spread(_) => Precedence::Assignment,
            Expr::Member { .. } | Expr::Call { .. } | Expr::New { .. } => Precedence::Call,
            Expr::Sequence(_) => Precedence::Sequence,
        }
    }

    /// Would text binding with `replacement` strength need parentheses to
    /// stand in for `id` at its current position?
    pub fn replacement_needs_parens(&self, id: ExprId, replacement: Precedence) -> bool {
        if self.expr(id).is_parenthesized() {
            return false;
        }
        let Some(NodeRef::Expr(parent)) = self.parent(NodeRef::Expr(id)) else {
            return false;
        };
        match &self.expr(parent).kind {
            Expr::Binary { op, right, .. } => {
                // `**` groups to the right
                let on_right = (*right == id) != (op.precedence() == Precedence::Exponent);
                needs_parens(replacement, op.precedence(), on_right)
            }
            Expr::Logical { op, right, .. } => {
                needs_parens(replacement, op.precedence(), *right == id)
            }
            Expr::Unary { .. } | Expr::Update { .. } => replacement < Precedence::Unary,
            Expr::Member { object, .. } => *object == id && replacement < Precedence::Call,
            Expr::Call { callee, .. } | Expr::New { callee, .. } => {
                *callee == id && replacement < Precedence::Call
            }
            Expr::Conditional { test, .. } => {
                if *test == id {
                    replacement <= Precedence::Conditional
                } else {
                    replacement < Precedence::Assignment
                }
            }
            Expr::Assignment { .. }
            | Expr::Array(_)
            | Expr::Object(_)
            | Expr::Spread(_)
            | Expr::Function { .. }
            | Expr::Sequence(_) => replacement < Precedence::Assignment,
            Expr::Identifier(_) | Expr::Literal(_) | Expr::This | Expr::Opaque => false,
        }
    }

    /// `null` or the identifier `undefined`.
    pub fn is_nullish_literal(&self, id: ExprId) -> bool {
        match &self.expr(id).kind {
            Expr::Literal(Literal::Null) => true,
            Expr::Identifier(name) => name == "undefined",
            _ => false,
        }
    }

    /// Identifier, `this`, or a member chain over them with static or
    /// literal keys.
    pub fn is_reference(&self, id: ExprId) -> bool {
        match &self.expr(id).kind {
            Expr::Identifier(_) | Expr::This => true,
            Expr::Member {
                object, property, ..
            } => {
                let key_ok = match property {
                    MemberProperty::Static(_) => true,
                    MemberProperty::Computed(key) => {
                        matches!(self.expr(*key).kind, Expr::Literal(_))
                    }
                };
                key_ok && self.is_reference(*object)
            }
            _ => false,
        }
    }

    /// Evaluating the expression has no observable effect besides its value.
    ///
    /// Property reads count as pure; calls, assignments, updates, `new`,
    /// `delete` and `await` do not.
    pub fn is_pure(&self, id: ExprId) -> bool {
        match &self.expr(id).kind {
            Expr::Identifier(_) | Expr::This => true,
            Expr::Literal(literal) => !matches!(literal, Literal::Template),
            Expr::Unary { op, argument } => {
                !matches!(op, UnaryOp::Delete | UnaryOp::Await) && self.is_pure(*argument)
            }
            Expr::Binary { left, right, .. } | Expr::Logical { left, right, .. } => {
                self.is_pure(*left) && self.is_pure(*right)
            }
            Expr::Conditional {
                test,
                consequent,
                alternate,
            } => self.is_pure(*test) && self.is_pure(*consequent) && self.is_pure(*alternate),
            Expr::Member {
                object, property, ..
            } => {
                self.is_pure(*object)
                    && match property {
                        MemberProperty::Static(_) => true,
                        MemberProperty::Computed(key) => self.is_pure(*key),
                    }
            }
            Expr::Sequence(items) => items.iter().all(|item| self.is_pure(*item)),
            Expr::Function { .. } => true,
            Expr::Array(_)
            | Expr::Object(_)
            | Expr::Update { .. }
            | Expr::Assignment { .. }
            | Expr::Call { .. }
            | Expr::New { .. }
            | Expr::Spread(_)
            | Expr::Opaque => false,
        }
    }

    /// Statement sequences that form function bodies.
    pub fn function_bodies(&self) -> Vec<&[StmtId]> {
        let declared = self.stmts.iter().filter_map(|node| match &node.kind {
            Stmt::FunctionDeclaration { body, .. } => Some(body.as_slice()),
            _ => None,
        });
        let expressed = self.exprs.iter().filter_map(|node| match &node.kind {
            Expr::Function {
                body: FunctionBody::Block(body),
                ..
            } => Some(body.as_slice()),
            _ => None,
        });
        declared.chain(expressed).collect()
    }

    /// The statement sits directly in a statement list (program, block,
    /// function body or switch case), as opposed to being the body of a
    /// loop, an `if` branch or a label.
    pub fn in_statement_list(&self, id: StmtId) -> bool {
        match self.parent(NodeRef::Stmt(id)) {
            // statements under an opaque one have no parent either
            None => self.body.contains(&id),
            Some(NodeRef::Stmt(parent)) => matches!(
                self.stmt(parent).kind,
                Stmt::Block(_) | Stmt::FunctionDeclaration { .. } | Stmt::Switch { .. }
            ),
            Some(NodeRef::Expr(parent)) => {
                matches!(self.expr(parent).kind, Expr::Function { .. })
            }
        }
    }

    /// Direct children of a node, in source order.
    pub fn children(&self, node: NodeRef) -> Vec<NodeRef> {
        let mut out = Vec::new();
        match node {
            NodeRef::Expr(id) => self.expr_children(id, &mut out),
            NodeRef::Stmt(id) => self.stmt_children(id, &mut out),
        }
        out
    }

    fn expr_children(&self, id: ExprId, out: &mut Vec<NodeRef>) {
        let e = NodeRef::Expr;
        match &self.expr(id).kind {
            Expr::Identifier(_) | Expr::Literal(_) | Expr::This | Expr::Opaque => {}
            Expr::Unary { argument, .. } | Expr::Update { argument, .. } => out.push(e(*argument)),
            Expr::Binary { left, right, .. } | Expr::Logical { left, right, .. } => {
                out.extend([e(*left), e(*right)])
            }
            Expr::Conditional {
                test,
                consequent,
                alternate,
            } => out.extend([e(*test), e(*consequent), e(*alternate)]),
            Expr::Assignment { target, value, .. } => out.extend([e(*target), e(*value)]),
            Expr::Member {
                object, property, ..
            } => {
                out.push(e(*object));
                if let MemberProperty::Computed(key) = property {
                    out.push(e(*key));
                }
            }
            Expr::Call {
                callee, arguments, ..
            }
            | Expr::New { callee, arguments } => {
                out.push(e(*callee));
                out.extend(arguments.iter().map(|a| e(*a)));
            }
            Expr::Array(items) => out.extend(items.iter().flatten().map(|a| e(*a))),
            Expr::Object(members) => {
                for member in members {
                    match member {
                        ObjectMember::Property { key, value } => {
                            if let PropertyKey::Computed(key) = key {
                                out.push(e(*key));
                            }
                            out.push(e(*value));
                        }
                        ObjectMember::Spread(value) => out.push(e(*value)),
                    }
                }
            }
            Expr::Function { params, body, .. } => {
                out.extend(params.iter().map(|p| e(*p)));
                match body {
                    FunctionBody::Block(stmts) => {
                        out.extend(stmts.iter().map(|s| NodeRef::Stmt(*s)))
                    }
                    FunctionBody::Expression(value) => out.push(e(*value)),
                }
            }
            Expr::Sequence(items) => out.extend(items.iter().map(|a| e(*a))),
            Expr::Spread(value) => out.push(e(*value)),
        }
    }

    fn stmt_children(&self, id: StmtId, out: &mut Vec<NodeRef>) {
        let e = NodeRef::Expr;
        let s = NodeRef::Stmt;
        match &self.stmt(id).kind {
            Stmt::Expression(value) | Stmt::Throw(value) => out.push(e(*value)),
            Stmt::VariableDeclaration { declarators, .. } => {
                for declarator in declarators {
                    out.push(e(declarator.pattern));
                    out.extend(declarator.init.map(e));
                }
            }
            Stmt::FunctionDeclaration { params, body, .. } => {
                out.extend(params.iter().map(|p| e(*p)));
                out.extend(body.iter().map(|b| s(*b)));
            }
            Stmt::Return(value) => out.extend(value.map(e)),
            Stmt::If {
                test,
                consequent,
                alternate,
            } => {
                out.push(e(*test));
                out.push(s(*consequent));
                out.extend(alternate.map(s));
            }
            Stmt::Block(stmts) => out.extend(stmts.iter().map(|b| s(*b))),
            Stmt::For {
                init,
                test,
                update,
                body,
            } => {
                out.extend(init.map(s));
                out.extend(test.map(e));
                out.extend(update.map(e));
                out.push(s(*body));
            }
            Stmt::ForIn { left, right, body } | Stmt::ForOf { left, right, body } => {
                out.push(match left {
                    ForHead::Declaration(decl) => s(*decl),
                    ForHead::Pattern(pattern) => e(*pattern),
                });
                out.push(e(*right));
                out.push(s(*body));
            }
            Stmt::While { test, body } => out.extend([e(*test), s(*body)]),
            Stmt::DoWhile { body, test } => out.extend([s(*body), e(*test)]),
            Stmt::Try {
                block,
                handler,
                finalizer,
            } => {
                out.push(s(*block));
                if let Some(handler) = handler {
                    out.extend(handler.param.map(e));
                    out.push(s(handler.body));
                }
                out.extend(finalizer.map(s));
            }
            Stmt::Switch {
                discriminant,
                cases,
            } => {
                out.push(e(*discriminant));
                for case in cases {
                    out.extend(case.test.map(e));
                    out.extend(case.consequent.iter().map(|c| s(*c)));
                }
            }
            Stmt::Labeled { body, .. } => out.push(s(*body)),
            Stmt::Break(_) | Stmt::Continue(_) | Stmt::Empty | Stmt::Opaque => {}
        }
    }
}
