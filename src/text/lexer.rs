//! A small character-class-driven lexer over the text-form input. Not a
//! separate tokenizing pass: the parser pulls characters through this
//! cursor directly rather than through an intermediate token stream.

use crate::error::{CodecError, TextPos};

pub struct Cursor<'a> {
    input: &'a str,
    bytes: &'a [u8],
    pos: usize,
    line: usize,
    column: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            bytes: input.as_bytes(),
            pos: 0,
            line: 1,
            column: 1,
        }
    }

    pub fn text_pos(&self) -> TextPos {
        TextPos {
            offset: self.pos,
            line: self.line,
            column: self.column,
        }
    }

    pub fn error(&self, message: impl Into<String>) -> CodecError {
        CodecError::parse(self.text_pos(), message)
    }

    pub fn is_eof(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    pub fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    pub fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    pub fn peek_at(&self, offset: usize) -> Option<char> {
        self.rest().chars().nth(offset)
    }

    pub fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    /// Consumes `c` if it's next, returning whether it matched.
    pub fn eat(&mut self, c: char) -> bool {
        if self.peek() == Some(c) {
            self.bump();
            true
        } else {
            false
        }
    }

    pub fn expect(&mut self, c: char) -> crate::error::Result<()> {
        if self.eat(c) {
            Ok(())
        } else {
            Err(self.error(format!("expected '{c}', found {:?}", self.peek())))
        }
    }

    pub fn expect_str(&mut self, s: &str) -> crate::error::Result<()> {
        if self.rest().starts_with(s) {
            for _ in 0..s.chars().count() {
                self.bump();
            }
            Ok(())
        } else {
            Err(self.error(format!("expected {s:?}")))
        }
    }

    /// Consumes characters while `pred` holds, returning the consumed
    /// slice.
    pub fn take_while(&mut self, pred: impl Fn(char) -> bool) -> &'a str {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if !pred(c) {
                break;
            }
            self.bump();
        }
        &self.input[start..self.pos]
    }

    pub fn skip_ws(&mut self) {
        self.take_while(|c| c.is_ascii_whitespace());
    }
}

/// Unreserved characters per RFC 3986 that need no percent-encoding.
pub fn is_unreserved(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | '_' | '~')
}

/// NCName-like identifier start/continue classes for symbolic object and
/// field names.
pub fn is_name_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

pub fn is_name_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '-')
}
