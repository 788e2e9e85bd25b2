use thiserror::Error;

use crate::ast::{Comment, Span, Token, TokenKind};

/// Errors raised while splitting source text into tokens.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LexError {
    #[error("unterminated string literal starting at offset {0}")]
    UnterminatedString(usize),

    #[error("unterminated template literal starting at offset {0}")]
    UnterminatedTemplate(usize),

    #[error("unterminated block comment starting at offset {0}")]
    UnterminatedComment(usize),

    #[error("unterminated regular expression starting at offset {0}")]
    UnterminatedRegex(usize),

    #[error("unexpected character '{ch}' at offset {offset}")]
    UnexpectedChar { ch: char, offset: usize },
}

const KEYWORDS: &[&str] = &[
    "break", "case", "catch", "class", "const", "continue", "debugger", "default", "delete", "do",
    "else", "export", "extends", "false", "finally", "for", "function", "if", "import", "in",
    "instanceof", "let", "new", "null", "return", "super", "switch", "this", "throw", "true",
    "try", "typeof", "var", "void", "while", "with", "yield",
];

/// Longest first, so the first match wins.
const PUNCTUATORS: &[&str] = &[
    ">>>=", "...", "===", "!==", "**=", "<<=", ">>=", ">>>", "&&=", "||=", "??=", "=>", "==",
    "!=", "<=", ">=", "&&", "||", "??", "?.", "++", "--", "+=", "-=", "*=", "/=", "%=", "&=",
    "|=", "^=", "**", "<<", ">>", "{", "}", "(", ")", "[", "]", ";", ",", "<", ">", "+", "-",
    "*", "/", "%", "&", "|", "^", "!", "~", "?", ":", "=", ".", "@",
];

/// Keywords after which a `/` starts a regular expression rather than a division.
const REGEX_AFTER_KEYWORD: &[&str] = &[
    "return", "typeof", "instanceof", "in", "new", "delete", "void", "throw", "case", "do",
    "else", "yield",
];

pub struct Lexer<'a> {
    source: &'a str,
    position: usize,
    comments: Vec<Comment>,
    newline_before: bool,
    regex_allowed: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Lexer {
            source,
            position: 0,
            comments: Vec::new(),
            newline_before: false,
            regex_allowed: true,
        }
    }

    pub fn source(&self) -> &'a str {
        self.source
    }

    fn current_char(&self) -> Option<char> {
        self.source[self.position..].chars().next()
    }

    fn peek_char(&self, offset: usize) -> Option<char> {
        self.source[self.position..].chars().nth(offset)
    }

    fn advance(&mut self) {
        if let Some(ch) = self.current_char() {
            self.position += ch.len_utf8();
        }
    }

    fn starts_with(&self, text: &str) -> bool {
        self.source[self.position..].starts_with(text)
    }

    /// Skip whitespace and comments, recording comments and line breaks.
    fn skip_trivia(&mut self) -> Result<(), LexError> {
        while let Some(ch) = self.current_char() {
            if ch == '\n' || ch == '\r' || ch == '\u{2028}' || ch == '\u{2029}' {
                self.newline_before = true;
                self.advance();
            } else if ch.is_whitespace() || ch == '\u{feff}' {
                self.advance();
            } else if self.starts_with("//") {
                let start = self.position;
                while let Some(c) = self.current_char() {
                    if c == '\n' || c == '\r' {
                        break;
                    }
                    self.advance();
                }
                self.push_comment(false, start);
            } else if self.starts_with("/*") {
                let start = self.position;
                match self.source[start + 2..].find("*/") {
                    Some(end) => {
                        let stop = start + 2 + end + 2;
                        if self.source[start..stop].contains('\n') {
                            self.newline_before = true;
                        }
                        self.position = stop;
                        self.push_comment(true, start);
                    }
                    None => return Err(LexError::UnterminatedComment(start)),
                }
            } else {
                break;
            }
        }
        Ok(())
    }

    fn push_comment(&mut self, block: bool, start: usize) {
        self.comments.push(Comment {
            block,
            text: self.source[start..self.position].to_string(),
            span: Span::new(start, self.position),
        });
    }

    fn read_identifier(&mut self) -> String {
        let start = self.position;
        if self.current_char() == Some('#') {
            self.advance();
        }
        while let Some(ch) = self.current_char() {
            if is_id_continue(ch) {
                self.advance();
            } else {
                break;
            }
        }
        self.source[start..self.position].to_string()
    }

    /// Reads a quoted string and returns its decoded value.
    fn read_string(&mut self, quote: char) -> Result<String, LexError> {
        let start = self.position;
        let mut result = String::new();
        self.advance(); // opening quote

        while let Some(ch) = self.current_char() {
            match ch {
                c if c == quote => {
                    self.advance();
                    return Ok(result);
                }
                '\n' | '\r' => break,
                '\\' => {
                    self.advance();
                    let Some(escaped) = self.current_char() else {
                        break;
                    };
                    self.advance();
                    match escaped {
                        'n' => result.push('\n'),
                        't' => result.push('\t'),
                        'r' => result.push('\r'),
                        'b' => result.push('\u{8}'),
                        'f' => result.push('\u{c}'),
                        'v' => result.push('\u{b}'),
                        '0' if !self.current_char().is_some_and(|c| c.is_ascii_digit()) => {
                            result.push('\0')
                        }
                        'x' => {
                            let decoded = self.read_hex_digits(2);
                            result.push(decoded.unwrap_or('x'));
                        }
                        'u' => {
                            let decoded = if self.current_char() == Some('{') {
                                self.advance();
                                let code = self.read_hex_until('}');
                                code.and_then(char::from_u32)
                            } else {
                                self.read_hex_digits(4)
                            };
                            result.push(decoded.unwrap_or('u'));
                        }
                        '\r' => {
                            // line continuation, `\r\n` counts once
                            if self.current_char() == Some('\n') {
                                self.advance();
                            }
                        }
                        '\n' | '\u{2028}' | '\u{2029}' => {}
                        other => result.push(other),
                    }
                }
                _ => {
                    result.push(ch);
                    self.advance();
                }
            }
        }

        Err(LexError::UnterminatedString(start))
    }

    fn read_hex_digits(&mut self, count: usize) -> Option<char> {
        let digits: String = self.source[self.position..].chars().take(count).collect();
        if digits.len() != count || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        self.position += count;
        u32::from_str_radix(&digits, 16).ok().and_then(char::from_u32)
    }

    fn read_hex_until(&mut self, close: char) -> Option<u32> {
        let rest = &self.source[self.position..];
        let end = rest.find(close)?;
        let code = u32::from_str_radix(&rest[..end], 16).ok()?;
        self.position += end + close.len_utf8();
        Some(code)
    }

    fn read_number(&mut self) {
        let radix_prefix = self.current_char() == Some('0')
            && matches!(
                self.peek_char(1),
                Some('x' | 'X' | 'o' | 'O' | 'b' | 'B')
            );
        if radix_prefix {
            self.advance();
            self.advance();
            while self
                .current_char()
                .is_some_and(|c| c.is_ascii_hexdigit() || c == '_')
            {
                self.advance();
            }
        } else {
            let mut is_float = false;
            while let Some(ch) = self.current_char() {
                if ch.is_ascii_digit() || ch == '_' {
                    self.advance();
                } else if ch == '.' && !is_float {
                    is_float = true;
                    self.advance();
                } else {
                    break;
                }
            }
            if matches!(self.current_char(), Some('e' | 'E')) {
                let sign = matches!(self.peek_char(1), Some('+' | '-'));
                let digit_at = if sign { 2 } else { 1 };
                if self.peek_char(digit_at).is_some_and(|c| c.is_ascii_digit()) {
                    for _ in 0..digit_at {
                        self.advance();
                    }
                    while self.current_char().is_some_and(|c| c.is_ascii_digit()) {
                        self.advance();
                    }
                }
            }
        }
        if self.current_char() == Some('n') {
            self.advance();
        }
    }

    fn skip_template(&mut self) -> Result<(), LexError> {
        let start = self.position;
        self.advance(); // opening backtick
        while let Some(ch) = self.current_char() {
            match ch {
                '`' => {
                    self.advance();
                    return Ok(());
                }
                '\\' => {
                    self.advance();
                    self.advance();
                }
                '$' if self.peek_char(1) == Some('{') => {
                    self.advance();
                    self.advance();
                    self.skip_substitution(start)?;
                }
                _ => self.advance(),
            }
        }
        Err(LexError::UnterminatedTemplate(start))
    }

    fn skip_substitution(&mut self, template_start: usize) -> Result<(), LexError> {
        let mut depth = 1;
        while let Some(ch) = self.current_char() {
            match ch {
                '{' => {
                    depth += 1;
                    self.advance();
                }
                '}' => {
                    depth -= 1;
                    self.advance();
                    if depth == 0 {
                        return Ok(());
                    }
                }
                '`' => self.skip_template()?,
                '\'' | '"' => {
                    self.read_string(ch)?;
                }
                _ => self.advance(),
            }
        }
        Err(LexError::UnterminatedTemplate(template_start))
    }

    fn skip_regex(&mut self) -> Result<(), LexError> {
        let start = self.position;
        self.advance(); // opening slash
        let mut in_class = false;
        loop {
            match self.current_char() {
                None | Some('\n') | Some('\r') => return Err(LexError::UnterminatedRegex(start)),
                Some('\\') => {
                    self.advance();
                    self.advance();
                }
                Some('[') => {
                    in_class = true;
                    self.advance();
                }
                Some(']') => {
                    in_class = false;
                    self.advance();
                }
                Some('/') if !in_class => {
                    self.advance();
                    break;
                }
                Some(_) => self.advance(),
            }
        }
        while self.current_char().is_some_and(is_id_continue) {
            self.advance();
        }
        Ok(())
    }

    pub fn next_token(&mut self) -> Result<Token, LexError> {
        self.newline_before = false;
        self.skip_trivia()?;
        let start = self.position;

        let kind = match self.current_char() {
            None => TokenKind::Eof,
            Some(ch) if is_id_start(ch) || ch == '#' => {
                let ident = self.read_identifier();
                if KEYWORDS.contains(&ident.as_str()) {
                    TokenKind::Keyword
                } else {
                    TokenKind::Identifier
                }
            }
            Some(ch) if ch.is_ascii_digit() => {
                self.read_number();
                TokenKind::Number
            }
            Some('.') if self.peek_char(1).is_some_and(|c| c.is_ascii_digit()) => {
                self.read_number();
                TokenKind::Number
            }
            Some(quote @ ('"' | '\'')) => TokenKind::String(self.read_string(quote)?),
            Some('`') => {
                self.skip_template()?;
                TokenKind::Template
            }
            Some('/') if self.regex_allowed => {
                self.skip_regex()?;
                TokenKind::Regex
            }
            Some(ch) => {
                let punct = PUNCTUATORS
                    .iter()
                    .find(|p| self.starts_with(p))
                    // `a?.5:b` is a conditional, not optional chaining
                    .filter(|p| {
                        **p != "?."
                            || !self.peek_char(2).is_some_and(|c| c.is_ascii_digit())
                    });
                let punct = match punct {
                    Some(p) => *p,
                    None if self.starts_with("?.") => "?",
                    None => return Err(LexError::UnexpectedChar { ch, offset: start }),
                };
                self.position += punct.len();
                TokenKind::Punctuator
            }
        };

        let text = self.source[start..self.position].to_string();
        self.regex_allowed = match &kind {
            TokenKind::Punctuator => !matches!(text.as_str(), ")" | "]" | "}"),
            TokenKind::Keyword => REGEX_AFTER_KEYWORD.contains(&text.as_str()),
            _ => false,
        };

        Ok(Token {
            kind,
            text,
            span: Span::new(start, self.position),
            newline_before: self.newline_before,
        })
    }

    /// Lex the whole input. The returned tokens end with an `Eof` token.
    pub fn tokenize(mut self) -> Result<(Vec<Token>, Vec<Comment>), LexError> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let done = token.kind == TokenKind::Eof;
            tokens.push(token);
            if done {
                break;
            }
        }
        Ok((tokens, self.comments))
    }
}

fn is_id_start(ch: char) -> bool {
    ch.is_alphabetic() || ch == '_' || ch == '$'
}

fn is_id_continue(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_' || ch == '$' || ch == '\u{200c}' || ch == '\u{200d}'
}

/// Numeric value of a number token as JavaScript reads it.
pub fn numeric_value(raw: &str) -> f64 {
    let cleaned: String = raw
        .chars()
        .filter(|c| *c != '_' && *c != 'n')
        .collect();
    let radix = match cleaned.get(..2) {
        Some("0x" | "0X") => 16,
        Some("0o" | "0O") => 8,
        Some("0b" | "0B") => 2,
        _ => 10,
    };
    if radix == 10 {
        cleaned.parse::<f64>().unwrap_or(f64::NAN)
    } else {
        u64::from_str_radix(&cleaned[2..], radix)
            .map(|v| v as f64)
            .unwrap_or(f64::NAN)
    }
}

#[test]
fn test_keywords_and_identifiers() {
    let (tokens, _) = Lexer::new("return undefined of null").tokenize().unwrap();
    assert_eq!(tokens[0].kind, TokenKind::Keyword);
    assert_eq!(tokens[1].kind, TokenKind::Identifier);
    assert_eq!(tokens[2].kind, TokenKind::Identifier);
    assert_eq!(tokens[3].kind, TokenKind::Keyword);
    assert_eq!(tokens[4].kind, TokenKind::Eof);
}

#[test]
fn test_logical_operators() {
    let (tokens, _) = Lexer::new("a&&b||c??d").tokenize().unwrap();
    let texts: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();
    assert_eq!(texts, vec!["a", "&&", "b", "||", "c", "??", "d", ""]);
}

#[test]
fn test_numeric_value() {
    assert_eq!(numeric_value("0xff"), 255.0);
    assert_eq!(numeric_value("1_000"), 1000.0);
}
