// Copyright (c) 2025-2026 Zensical and contributors

// SPDX-License-Identifier: MIT
// All contributions are certified under the DCO

// Permission is hereby granted, free of charge, to any person obtaining a copy
// of this software and associated documentation files (the "Software"), to
// deal in the Software without restriction, including without limitation the
// rights to use, copy, modify, merge, publish, distribute, sublicense, and/or
// sell copies of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:

// The above copyright notice and this permission notice shall be included in
// all copies or substantial portions of the Software.

// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NON-INFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING
// FROM, OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS
// IN THE SOFTWARE.

// ----------------------------------------------------------------------------

//! Turns already-validated bytes into a [`Value`] tree.
//!
//! [`Checker`](crate::automaton::Checker) only answers "is this well
//! formed"; this module does the second pass that actually builds the
//! tree callers want to inspect. It re-derives the grammar with a plain
//! recursive descent rather than reusing the automaton, since a caller
//! may hand it bytes straight from a buffer without ever having run them
//! through a [`Checker`].

use crate::error::Error;
use crate::value::Value;

// ----------------------------------------------------------------------------
// Functions
// ----------------------------------------------------------------------------

/// Parses a complete JSON document into a [`Value`].
pub fn parse(input: &[u8]) -> Result<Value, Error> {
    let mut cursor = Cursor { input, pos: 0 };
    cursor.skip_whitespace();
    let value = cursor.parse_value()?;
    cursor.skip_whitespace();
    if cursor.pos != cursor.input.len() {
        return Err(Error::syntax(cursor.pos, "trailing data after value"));
    }
    Ok(value)
}

// ----------------------------------------------------------------------------
// Structs
// ----------------------------------------------------------------------------

struct Cursor<'a> {
    input: &'a [u8],
    pos: usize,
}

// ----------------------------------------------------------------------------
// Implementations
// ----------------------------------------------------------------------------

impl Cursor<'_> {
    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<u8> {
        let byte = self.peek()?;
        self.pos += 1;
        Some(byte)
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(b' ' | b'\t' | b'\n' | b'\r')) {
            self.pos += 1;
        }
    }

    fn expect(&mut self, byte: u8) -> Result<(), Error> {
        if self.bump() == Some(byte) {
            Ok(())
        } else {
            Err(Error::syntax(self.pos, "unexpected byte"))
        }
    }

    fn parse_value(&mut self) -> Result<Value, Error> {
        match self.peek() {
            Some(b'{') => self.parse_object(),
            Some(b'[') => self.parse_array(),
            Some(b'"') => Ok(Value::String(self.parse_string()?)),
            Some(b't') => {
                self.expect_literal(b"true")?;
                Ok(Value::Bool(true))
            }
            Some(b'f') => {
                self.expect_literal(b"false")?;
                Ok(Value::Bool(false))
            }
            Some(b'n') => {
                self.expect_literal(b"null")?;
                Ok(Value::Null)
            }
            Some(b'-' | b'0'..=b'9') => self.parse_number(),
            _ => Err(Error::syntax(self.pos, "expected a value")),
        }
    }

    fn expect_literal(&mut self, literal: &[u8]) -> Result<(), Error> {
        for &byte in literal {
            self.expect(byte)?;
        }
        Ok(())
    }

    fn parse_object(&mut self) -> Result<Value, Error> {
        self.expect(b'{')?;
        let mut members = Vec::new();
        self.skip_whitespace();
        if self.peek() == Some(b'}') {
            self.pos += 1;
            return Ok(Value::Object(members));
        }
        loop {
            self.skip_whitespace();
            let key = self.parse_string()?;
            self.skip_whitespace();
            self.expect(b':')?;
            self.skip_whitespace();
            let value = self.parse_value()?;
            members.push((key, value));
            self.skip_whitespace();
            match self.bump() {
                Some(b',') => continue,
                Some(b'}') => break,
                _ => return Err(Error::syntax(self.pos, "expected ',' or '}'")),
            }
        }
        Ok(Value::Object(members))
    }

    fn parse_array(&mut self) -> Result<Value, Error> {
        self.expect(b'[')?;
        let mut items = Vec::new();
        self.skip_whitespace();
        if self.peek() == Some(b']') {
            self.pos += 1;
            return Ok(Value::Array(items));
        }
        loop {
            self.skip_whitespace();
            items.push(self.parse_value()?);
            self.skip_whitespace();
            match self.bump() {
                Some(b',') => continue,
                Some(b']') => break,
                _ => return Err(Error::syntax(self.pos, "expected ',' or ']'")),
            }
        }
        Ok(Value::Array(items))
    }

    fn parse_string(&mut self) -> Result<String, Error> {
        self.expect(b'"')?;
        let mut out = String::new();
        loop {
            match self.bump() {
                Some(b'"') => return Ok(out),
                Some(b'\\') => match self.bump() {
                    Some(b'"') => out.push('"'),
                    Some(b'\\') => out.push('\\'),
                    Some(b'/') => out.push('/'),
                    Some(b'b') => out.push('\u{8}'),
                    Some(b'f') => out.push('\u{c}'),
                    Some(b'n') => out.push('\n'),
                    Some(b'r') => out.push('\r'),
                    Some(b't') => out.push('\t'),
                    Some(b'u') => {
                        let cp = self.parse_hex4()?;
                        out.push(self.decode_unicode_escape(cp)?);
                    }
                    _ => return Err(Error::syntax(self.pos, "invalid escape sequence")),
                },
                Some(byte) if byte < 0x20 => {
                    return Err(Error::syntax(self.pos, "unescaped control character"));
                }
                Some(byte) => {
                    // Multi-byte UTF-8 sequences pass through verbatim; the
                    // validator already confirmed each individual byte is
                    // unescaped-control-free, and `str::push` only sees
                    // complete, valid codepoints reassembled below.
                    let start = self.pos - 1;
                    let width = utf8_width(byte);
                    let end = start + width;
                    let slice = self
                        .input
                        .get(start..end)
                        .ok_or_else(|| Error::syntax(start, "truncated UTF-8 sequence"))?;
                    let text = std::str::from_utf8(slice)
                        .map_err(|_| Error::syntax(start, "invalid UTF-8 sequence"))?;
                    out.push_str(text);
                    self.pos = end;
                }
                None => return Err(Error::syntax(self.pos, "unterminated string")),
            }
        }
    }

    fn parse_hex4(&mut self) -> Result<u16, Error> {
        let mut value: u16 = 0;
        for _ in 0..4 {
            let digit = self
                .bump()
                .and_then(|b| (b as char).to_digit(16))
                .ok_or_else(|| Error::syntax(self.pos, "invalid \\u escape"))?;
            value = value * 16 + u16::try_from(digit).unwrap_or(0);
        }
        Ok(value)
    }

    fn decode_unicode_escape(&mut self, high: u16) -> Result<char, Error> {
        if (0xD800..=0xDBFF).contains(&high) {
            self.expect(b'\\')?;
            self.expect(b'u')?;
            let low = self.parse_hex4()?;
            if !(0xDC00..=0xDFFF).contains(&low) {
                return Err(Error::syntax(self.pos, "invalid surrogate pair"));
            }
            let combined = 0x10000 + ((u32::from(high) - 0xD800) << 10) + (u32::from(low) - 0xDC00);
            char::from_u32(combined).ok_or_else(|| Error::syntax(self.pos, "invalid codepoint"))
        } else {
            char::from_u32(u32::from(high)).ok_or_else(|| Error::syntax(self.pos, "invalid codepoint"))
        }
    }

    fn parse_number(&mut self) -> Result<Value, Error> {
        let start = self.pos;
        if self.peek() == Some(b'-') {
            self.pos += 1;
        }
        match self.peek() {
            Some(b'0') => self.pos += 1,
            Some(b'1'..=b'9') => {
                while matches!(self.peek(), Some(b'0'..=b'9')) {
                    self.pos += 1;
                }
            }
            _ => return Err(Error::syntax(self.pos, "expected digit")),
        }
        if self.peek() == Some(b'.') {
            self.pos += 1;
            let digits_start = self.pos;
            while matches!(self.peek(), Some(b'0'..=b'9')) {
                self.pos += 1;
            }
            if self.pos == digits_start {
                return Err(Error::syntax(self.pos, "expected digit after '.'"));
            }
        }
        if matches!(self.peek(), Some(b'e' | b'E')) {
            self.pos += 1;
            if matches!(self.peek(), Some(b'+' | b'-')) {
                self.pos += 1;
            }
            let digits_start = self.pos;
            while matches!(self.peek(), Some(b'0'..=b'9')) {
                self.pos += 1;
            }
            if self.pos == digits_start {
                return Err(Error::syntax(self.pos, "expected digit in exponent"));
            }
        }
        let text = std::str::from_utf8(&self.input[start..self.pos])
            .expect("number bytes are always ASCII");
        text.parse::<f64>()
            .map(Value::Number)
            .map_err(|_| Error::syntax(start, "number out of range"))
    }
}

/// Number of bytes in the UTF-8 sequence starting with `lead`.
fn utf8_width(lead: u8) -> usize {
    if lead & 0x80 == 0 {
        1
    } else if lead & 0xE0 == 0xC0 {
        2
    } else if lead & 0xF0 == 0xE0 {
        3
    } else {
        4
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_nested_structures_preserving_key_order() {
        let value = parse(br#"{"b":1,"a":[1,2,3],"c":{"d":null}}"#).unwrap();
        let Value::Object(members) = value else {
            panic!("expected object");
        };
        let keys: Vec<_> = members.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, ["b", "a", "c"]);
    }

    #[test]
    fn parses_raw_utf8_bytes_in_strings() {
        let value = parse(b"\"A\xF0\x9F\x98\x80\"").unwrap();
        assert_eq!(value, Value::String("A\u{1F600}".to_string()));
    }

    #[test]
    fn parses_surrogate_pair_escapes() {
        let json: &[u8] = &[
            b'"', b'\\', b'u', b'd', b'8', b'3', b'd', b'\\', b'u', b'd', b'e', b'0', b'0', b'"',
        ];
        let value = parse(json).unwrap();
        assert_eq!(value, Value::String("\u{1f600}".to_string()));
    }

    #[test]
    fn parses_numbers() {
        assert_eq!(parse(b"-12.5e2").unwrap(), Value::Number(-1250.0));
        assert_eq!(parse(b"0").unwrap(), Value::Number(0.0));
    }

    #[test]
    fn rejects_trailing_garbage() {
        assert!(parse(b"1 2").is_err());
    }

    #[test]
    fn rejects_lone_surrogate() {
        assert!(parse(br#""\ud83d""#).is_err());
    }
}
