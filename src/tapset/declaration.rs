//! Recursive-descent recognizer for declaration headers.
//!
//! Grammar of the subset we need (comments and line breaks are trivia
//! inside a header):
//!
//! ```text
//! declaration := "function" IDENT [":" IDENT] "(" [param ("," param)*] ")"
//! param       := IDENT [":" IDENT]
//! ```
//!
//! A declaration must start a line. Anything that does not fit is skipped up
//! to the next line break; recognition never aborts.

use super::lexer::{tokenize, Token, TokenKind};
use log::debug;

/// One recognized declaration header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub name: String,
    pub return_type: Option<String>,
    pub params: Vec<String>,

    /// Line of the keyword
    pub line: usize,

    /// Line of the closing parenthesis
    pub end_line: usize,
}

#[derive(Debug)]
struct Malformed {
    line: usize,
    reason: &'static str,
}

/// Iterator over the declarations of a text
pub struct Declarations<'a> {
    tokens: Vec<Token<'a>>,
    pos: usize,
    at_line_start: bool,
}

impl<'a> Declarations<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            tokens: tokenize(text),
            pos: 0,
            at_line_start: true,
        }
    }

    /// Next token that is not a comment or a line break
    fn peek_significant(&mut self) -> Option<&Token<'a>> {
        while let Some(token) = self.tokens.get(self.pos) {
            match token.kind {
                TokenKind::Newline | TokenKind::Comment => self.pos += 1,
                _ => break,
            }
        }
        self.tokens.get(self.pos)
    }

    fn eat(&mut self, kind: TokenKind) -> bool {
        if self.peek_significant().map(|t| t.kind) == Some(kind) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: TokenKind, reason: &'static str) -> Result<&Token<'a>, Malformed> {
        let line = self.current_line();
        if self.peek_significant().map(|t| t.kind) == Some(kind) {
            self.pos += 1;
            Ok(&self.tokens[self.pos - 1])
        } else {
            Err(Malformed { line, reason })
        }
    }

    fn expect_ident(&mut self, reason: &'static str) -> Result<String, Malformed> {
        self.expect(TokenKind::Ident, reason).map(|t| t.text.to_string())
    }

    fn current_line(&self) -> usize {
        self.tokens
            .get(self.pos)
            .or_else(|| self.tokens.last())
            .map_or(0, |t| t.line)
    }

    /// Parse the header following a `function` keyword on `line`
    fn declaration(&mut self, line: usize) -> Result<Declaration, Malformed> {
        let name = self.expect_ident("expected declaration name")?;

        let return_type = if self.eat(TokenKind::Colon) {
            Some(self.expect_ident("expected return type")?)
        } else {
            None
        };

        self.expect(TokenKind::LParen, "expected '('")?;

        let mut params = Vec::new();
        if !self.eat(TokenKind::RParen) {
            loop {
                params.push(self.expect_ident("expected parameter name")?);
                if self.eat(TokenKind::Colon) {
                    self.expect_ident("expected parameter type")?;
                }
                if self.eat(TokenKind::Comma) {
                    continue;
                }
                self.expect(TokenKind::RParen, "expected ',' or ')'")?;
                break;
            }
        }

        Ok(Declaration {
            name,
            return_type,
            params,
            line,
            end_line: self.tokens[self.pos - 1].line,
        })
    }

    /// Resume right after `keyword_pos`, at the next line break
    fn skip_line(&mut self, keyword_pos: usize) {
        self.pos = keyword_pos + 1;
        while let Some(token) = self.tokens.get(self.pos) {
            if token.kind == TokenKind::Newline {
                break;
            }
            self.pos += 1;
        }
    }
}

impl<'a> Iterator for Declarations<'a> {
    type Item = Declaration;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(token) = self.tokens.get(self.pos) {
            match token.kind {
                TokenKind::Newline => {
                    self.at_line_start = true;
                    self.pos += 1;
                }
                TokenKind::Comment => self.pos += 1,
                TokenKind::Function if self.at_line_start => {
                    let keyword_pos = self.pos;
                    let line = token.line;
                    self.pos += 1;
                    self.at_line_start = false;

                    match self.declaration(line) {
                        Ok(decl) => return Some(decl),
                        Err(e) => {
                            debug!(
                                "Skipping malformed declaration at line {} ({}, near line {})",
                                line, e.reason, e.line
                            );
                            self.skip_line(keyword_pos);
                        }
                    }
                }
                _ => {
                    self.at_line_start = false;
                    self.pos += 1;
                }
            }
        }
        None
    }
}

/// Collect every declaration of a text
///
/// **Public** - convenience over [`Declarations`]
///
/// # Returns
/// Declarations in source order; malformed headers are skipped
pub fn parse_declarations(text: &str) -> Vec<Declaration> {
    Declarations::new(text).collect()
}
