//! Scanning the string representation.
//!
//! Both the DN and RDN parsers walk their input character by character,
//! often looking one or two characters ahead. The [`Scanner`] provides this
//! with explicit bounds: running out of input is simply a `None` from
//! [`Scanner::peek`] and friends.

use super::chars::{is_hex_digit, is_special_char};
use super::error::SyntaxError;
use alloc::vec::Vec;

//------------ Scanner -------------------------------------------------------

/// A cursor over a string.
#[derive(Clone, Debug)]
pub(super) struct Scanner<'a> {
    /// The complete input.
    src: &'a str,

    /// The byte index of the next character.
    pos: usize,
}

impl<'a> Scanner<'a> {
    /// Creates a scanner at the start of `src`.
    pub fn new(src: &'a str) -> Self {
        Scanner { src, pos: 0 }
    }

    /// Returns the byte index of the next character.
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Returns the remaining input.
    pub fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    /// Returns the input from byte index `start` up to the current position.
    pub fn since(&self, start: usize) -> &'a str {
        &self.src[start..self.pos]
    }

    /// Returns whether the input has been exhausted.
    pub fn is_empty(&self) -> bool {
        self.pos >= self.src.len()
    }

    /// Returns the next character without consuming it.
    pub fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    /// Returns the character after the next without consuming anything.
    pub fn peek_second(&self) -> Option<char> {
        self.rest().chars().nth(1)
    }

    /// Consumes and returns the next character.
    pub fn next_char(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    /// Consumes the next character if it is `ch`.
    pub fn eat(&mut self, ch: char) -> bool {
        if self.peek() == Some(ch) {
            self.pos += ch.len_utf8();
            true
        } else {
            false
        }
    }

    /// Consumes the next character if it fulfills `op`.
    pub fn eat_if(&mut self, op: impl FnOnce(char) -> bool) -> Option<char> {
        match self.peek() {
            Some(ch) if op(ch) => {
                self.pos += ch.len_utf8();
                Some(ch)
            }
            _ => None,
        }
    }

    /// Consumes characters as long as they fulfill `op`.
    pub fn skip_while(&mut self, mut op: impl FnMut(char) -> bool) {
        while self.eat_if(&mut op).is_some() {}
    }

    /// Consumes all spaces at the current position.
    pub fn skip_spaces(&mut self) {
        self.skip_while(|ch| ch == ' ')
    }

    /// Consumes `count` bytes worth of ASCII input.
    pub fn advance(&mut self, count: usize) {
        self.pos = usize::min(self.pos + count, self.src.len());
    }
}

//------------ Escape Sequences ----------------------------------------------

/// Decodes an escape sequence in an attribute value.
///
/// The backslash has already been consumed. The sequence is either two hex
/// digits, which become a single raw octet, or a special character or a
/// space, which is taken literally. The decoded data is appended to
/// `target`.
///
/// Because a hex escape produces a raw octet, a multibyte UTF-8 character
/// can be given as a sequence of escapes, one per octet.
pub(super) fn unescape(
    scanner: &mut Scanner,
    target: &mut Vec<u8>,
) -> Result<(), SyntaxError> {
    let ch = scanner.next_char().ok_or(SyntaxError::IllegalEscape)?;
    if is_hex_digit(ch) {
        let low = scanner
            .eat_if(is_hex_digit)
            .ok_or(SyntaxError::IllegalEscape)?;
        target.push(hex_value(ch) << 4 | hex_value(low));
        Ok(())
    } else if is_special_char(ch) || ch == ' ' {
        push_char(target, ch);
        Ok(())
    } else {
        Err(SyntaxError::IllegalEscape)
    }
}

/// Appends the UTF-8 encoding of `ch` to `target`.
pub(super) fn push_char(target: &mut Vec<u8>, ch: char) {
    let mut buf = [0u8; 4];
    target.extend_from_slice(ch.encode_utf8(&mut buf).as_bytes());
}

/// Returns the value of a hex digit.
fn hex_value(ch: char) -> u8 {
    // Only called for hex digits, so the conversion can’t fail.
    ch.to_digit(16).unwrap_or(0) as u8
}

//============ Testing =======================================================
