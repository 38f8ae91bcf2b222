//! Tokenizer for the argument list of an `egal(...)` call.
//!
//! The lexer never fails. Characters it has no use for become
//! [`TokenKind::Delim`] tokens and are rejected later by the parser, which
//! keeps every byte of the input covered by exactly one token.

use std::ops::Range;

use smallvec::SmallVec;

/// Tokens of one call. Most calls have fewer than sixteen.
pub type Tokens = SmallVec<[Token; 16]>;

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    /// Spaces, tabs and line breaks.
    Whitespace,
    Comma,
    Slash,
    /// A `%` not directly preceded by a number.
    Percent,
    OpenParen,
    CloseParen,
    Number(f64),
    /// A number directly followed by `%`, not yet divided by 100.
    Percentage(f64),
    /// A number directly followed by an identifier, such as `90deg`.
    Dimension(f64, String),
    /// Identifier. Dots between alphanumerics are kept, so `rec.2020` is
    /// one token.
    Ident(String),
    /// Quoted string with `\<quote>` unescaped. Every other escape is kept
    /// as written so JSON escapes survive.
    Str {
        quote: char,
        value: String,
        terminated: bool,
    },
    Delim(char),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    /// Byte range in the tokenized text.
    pub span: Range<usize>,
}

impl Token {
    #[must_use]
    pub fn is_separator(&self) -> bool {
        matches!(self.kind, TokenKind::Whitespace | TokenKind::Comma)
    }
}

struct Lexer<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Lexer<'a> {
    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn peek_nth(&self, n: usize) -> Option<char> {
        self.src[self.pos..].chars().nth(n)
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn eat_while(&mut self, pred: impl Fn(char) -> bool) -> &'a str {
        let start = self.pos;
        while self.peek().is_some_and(&pred) {
            self.bump();
        }
        &self.src[start..self.pos]
    }

    fn starts_number(&self) -> bool {
        match (self.peek(), self.peek_nth(1), self.peek_nth(2)) {
            (Some(c), _, _) if c.is_ascii_digit() => true,
            (Some('.'), Some(d), _) if d.is_ascii_digit() => true,
            (Some('+' | '-'), Some(d), _) if d.is_ascii_digit() => true,
            (Some('+' | '-'), Some('.'), Some(d)) if d.is_ascii_digit() => true,
            _ => false,
        }
    }

    fn starts_ident(&self) -> bool {
        match (self.peek(), self.peek_nth(1)) {
            (Some('-'), Some(c)) => is_ident_start(c) || c == '-',
            (Some(c), _) => is_ident_start(c),
            _ => false,
        }
    }

    fn number(&mut self) -> f64 {
        let start = self.pos;
        if matches!(self.peek(), Some('+' | '-')) {
            self.bump();
        }
        self.eat_while(|c| c.is_ascii_digit());
        if self.peek() == Some('.') {
            self.bump();
            self.eat_while(|c| c.is_ascii_digit());
        }
        self.src[start..self.pos].parse().unwrap_or(f64::NAN)
    }

    fn ident(&mut self) -> String {
        let mut ident = String::new();
        while let Some(c) = self.peek() {
            let dotted = c == '.' && self.peek_nth(1).is_some_and(char::is_alphanumeric);
            if is_ident_char(c) || dotted {
                ident.push(c);
                self.bump();
            } else {
                break;
            }
        }
        ident
    }

    fn string(&mut self, quote: char) -> TokenKind {
        self.bump();
        let mut value = String::new();
        while let Some(c) = self.bump() {
            match c {
                '\\' => match self.bump() {
                    Some(next) if next == quote => value.push(quote),
                    Some(next) => {
                        value.push('\\');
                        value.push(next);
                    }
                    None => value.push('\\'),
                },
                c if c == quote => {
                    return TokenKind::Str {
                        quote,
                        value,
                        terminated: true,
                    };
                }
                c => value.push(c),
            }
        }
        TokenKind::Str {
            quote,
            value,
            terminated: false,
        }
    }

    fn next_kind(&mut self) -> Option<TokenKind> {
        let c = self.peek()?;
        let kind = if c.is_whitespace() {
            self.eat_while(char::is_whitespace);
            TokenKind::Whitespace
        } else if self.starts_number() {
            let value = self.number();
            if self.peek() == Some('%') {
                self.bump();
                TokenKind::Percentage(value)
            } else if self.starts_ident() {
                TokenKind::Dimension(value, self.ident())
            } else {
                TokenKind::Number(value)
            }
        } else if self.starts_ident() {
            TokenKind::Ident(self.ident())
        } else if c == '\'' || c == '"' {
            self.string(c)
        } else {
            self.bump();
            match c {
                ',' => TokenKind::Comma,
                '/' => TokenKind::Slash,
                '%' => TokenKind::Percent,
                '(' => TokenKind::OpenParen,
                ')' => TokenKind::CloseParen,
                other => TokenKind::Delim(other),
            }
        };
        Some(kind)
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || !c.is_ascii()
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-' || !c.is_ascii()
}

/// Split `src` into tokens.
#[must_use]
pub fn tokenize(src: &str) -> Tokens {
    let mut lexer = Lexer { src, pos: 0 };
    let mut tokens = Tokens::new();
    loop {
        let start = lexer.pos;
        let Some(kind) = lexer.next_kind() else {
            break;
        };
        tokens.push(Token {
            kind,
            span: start..lexer.pos,
        });
    }
    tokens
}
