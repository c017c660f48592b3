//! Logos-based lexer for SystemTap front end output
//!
//! Only the tokens needed to recognize declaration headers are distinct;
//! everything else lexes as `Other`. Comments and string literals are
//! single tokens so their contents can never open a bogus declaration.

use logos::Logos;

/// Token kinds seen by the declaration recognizer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Function,
    Ident,
    LParen,
    RParen,
    Comma,
    Colon,
    Newline,
    Comment,
    Str,
    Other,
}

/// A token with its text and 1-based line number
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    pub line: usize,
}

#[derive(Logos, Debug, Clone, Copy, PartialEq)]
#[logos(skip r"[ \t\r\f]+")]
enum LogosToken {
    #[token("function")]
    Function,

    #[regex(r"[A-Za-z_][A-Za-z0-9_]*")]
    Ident,

    #[token("(")]
    LParen,

    #[token(")")]
    RParen,

    #[token(",")]
    Comma,

    #[token(":")]
    Colon,

    #[token("\n")]
    Newline,

    #[regex(r"#[^\n]*")]
    #[regex(r"//[^\n]*")]
    #[regex(r"/\*([^*]|\*+[^*/])*\*+/")]
    Comment,

    #[regex(r#""([^"\\\n]|\\.)*""#)]
    Str,
}

impl From<LogosToken> for TokenKind {
    fn from(token: LogosToken) -> Self {
        match token {
            LogosToken::Function => TokenKind::Function,
            LogosToken::Ident => TokenKind::Ident,
            LogosToken::LParen => TokenKind::LParen,
            LogosToken::RParen => TokenKind::RParen,
            LogosToken::Comma => TokenKind::Comma,
            LogosToken::Colon => TokenKind::Colon,
            LogosToken::Newline => TokenKind::Newline,
            LogosToken::Comment => TokenKind::Comment,
            LogosToken::Str => TokenKind::Str,
        }
    }
}

/// Lexer wrapping the logos-generated tokenizer, tracking line numbers
pub struct Lexer<'a> {
    inner: logos::Lexer<'a, LogosToken>,
    line: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            inner: LogosToken::lexer(input),
            line: 1,
        }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let logos_token = self.inner.next()?;
        let text = self.inner.slice();
        let line = self.line;

        // block comments may span lines
        self.line += text.matches('\n').count();

        let kind = match logos_token {
            Ok(t) => t.into(),
            Err(()) => TokenKind::Other,
        };

        Some(Token { kind, text, line })
    }
}

/// Tokenize an entire string into a Vec
pub fn tokenize(input: &str) -> Vec<Token<'_>> {
    Lexer::new(input).collect()
}
