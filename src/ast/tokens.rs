use std::borrow::Cow;

use serde::Serialize;

/// Half-open byte range into the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord, Serialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Span { start, end }
    }

    /// Smallest span covering both `self` and `other`.
    pub fn cover(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    pub fn contains(&self, other: Span) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }
}

/// Lexical category of a token.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    /// Identifier, including contextual words such as `of`, `async` or `undefined`
    Identifier,

    /// Reserved word
    ///
    /// # Examples
    /// ```text
    /// return
    /// typeof
    /// null
    /// ```
    Keyword,

    /// Numeric literal, kept as written (`0x1f`, `1e3`, `10n`)
    Number,

    /// String literal in single or double quotes
    ///
    /// Holds the decoded value, so `'foo'` and `"foo"` carry the same payload
    /// while their `text` differs.
    String(String),

    /// Whole template literal, substitutions included
    Template,

    /// Regular expression literal with its flags
    Regex,

    /// Operator or delimiter
    Punctuator,

    /// End of input
    Eof,
}

/// A lexical token.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    /// Raw source text of the token
    pub text: String,
    pub span: Span,
    /// A line terminator sits between this token and the previous one
    pub newline_before: bool,
}

impl Token {
    pub fn is_punct(&self, text: &str) -> bool {
        self.kind == TokenKind::Punctuator && self.text == text
    }

    pub fn is_keyword(&self, text: &str) -> bool {
        self.kind == TokenKind::Keyword && self.text == text
    }

    pub fn is_identifier(&self, text: &str) -> bool {
        self.kind == TokenKind::Identifier && self.text == text
    }

    /// The value this token is compared by: decoded contents for strings,
    /// raw text for everything else.
    pub fn comparable(&self) -> Cow<'_, str> {
        match &self.kind {
            TokenKind::String(value) => Cow::Borrowed(value.as_str()),
            _ => Cow::Borrowed(self.text.as_str()),
        }
    }
}

/// A line or block comment. Comments never enter the token stream.
#[derive(Debug, Clone, PartialEq)]
pub struct Comment {
    pub block: bool,
    pub text: String,
    pub span: Span,
}
