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

//! A byte-at-a-time pushdown automaton that accepts exactly the strict JSON
//! grammar, with no lookahead beyond the single byte it is handed.
//!
//! The automaton tracks two things: a bounded stack of open containers
//! (`[` or `{`), and what it currently expects to see. A separate
//! [`Token`] tracks progress through a multi-byte value (a string, number,
//! or literal) that spans more than one call to [`Checker::feed`].
//!
//! Numbers are the one construct whose end can't be recognized by looking
//! at the byte that ends it — `"12"` and `"123"` only diverge once a third
//! byte arrives that isn't a digit. When that happens at the top level
//! (nothing left open on the stack), the automaton can't tell whether the
//! byte belongs to trailing whitespace or to the next message, so it
//! reports it back to the caller unconsumed via [`Signal::Boundary`]
//! instead of guessing.

use crate::error::Error;

// ----------------------------------------------------------------------------
// Constants
// ----------------------------------------------------------------------------

/// Default bound on container nesting depth.
///
/// Without a bound, a peer could hold a worker thread hostage forever by
/// streaming an unbounded run of `[` bytes; this caps the stack at a size
/// no real envelope in this protocol comes close to needing.
pub const DEFAULT_MAX_DEPTH: usize = 128;

// ----------------------------------------------------------------------------
// Enums
// ----------------------------------------------------------------------------

/// What the automaton reports after consuming (or refusing) one byte.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Signal {
    /// The byte was consumed and belongs to the in-progress message.
    Continue,
    /// The byte was consumed and was the final byte of a complete message.
    Done,
    /// The byte does not belong to this message; the caller must not
    /// consume it and should treat the message as already complete.
    Boundary,
}

/// An open container on the stack.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Frame {
    Array,
    Object,
}

/// What byte (class) is legal next, given where we are in the grammar.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Expect {
    /// A value must start (top-level start, after `:`, after array `,`).
    Value,
    /// Just opened `[`: a value or the closing `]`.
    ArrayStart,
    /// Just consumed array `,`: a value is required.
    ArrayNext,
    /// A comma or the closing `]` may follow an array element.
    ArrayClose,
    /// Just opened `{`: a key string or the closing `}`.
    ObjectStart,
    /// Just consumed object `,`: a key string is required.
    ObjectNext,
    /// A colon must follow an object key.
    Colon,
    /// A comma or the closing `}` may follow an object value.
    ObjectClose,
    /// The top-level value is complete; nothing more belongs to it.
    Done,
}

/// Which kind of string is being scanned, so closing it resumes correctly.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum StringRole {
    Key,
    Value,
}

/// Progress through a number's sub-grammar.
///
/// States marked terminal below are those where the number parsed so far
/// is already a complete, valid number.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum NumberState {
    /// Just consumed the leading `-`; a digit must follow. Not terminal.
    Minus,
    /// Integer part is a single `0`. Terminal.
    Zero,
    /// Integer part has one or more nonzero-led digits. Terminal.
    Int,
    /// Just consumed `.`; a digit must follow. Not terminal.
    FractionStart,
    /// One or more fraction digits consumed. Terminal.
    Fraction,
    /// Just consumed `e`/`E`; a sign or digit must follow. Not terminal.
    ExponentStart,
    /// Just consumed the exponent sign; a digit must follow. Not terminal.
    ExponentSigned,
    /// One or more exponent digits consumed. Terminal.
    Exponent,
}

/// An in-progress multi-byte token.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Token {
    String {
        role: StringRole,
        escaped: bool,
        /// Remaining hex digits expected for a `\uXXXX` escape, else 0.
        unicode_remaining: u8,
        /// Hex digits of the current `\uXXXX` accumulated so far.
        unicode_value: u16,
        /// Set to the high surrogate's value once one is seen, until its
        /// paired `\uXXXX` low surrogate is confirmed; a lone surrogate
        /// (unpaired high, or any low surrogate on its own) is rejected
        /// here so the validator and the parser agree on every string the
        /// validator lets through.
        pending_high_surrogate: Option<u16>,
    },
    Number(NumberState),
    /// Remaining bytes expected to complete `true`, `false`, or `null`.
    Literal(&'static [u8]),
}

/// Outcome of processing a single byte against the current token/expect
/// state. [`StepOutcome::Reprocess`] means the byte didn't belong to the
/// value that just closed and must be re-run against the new state.
enum StepOutcome {
    Consumed,
    ConsumedDone,
    Boundary,
    Reprocess,
}

// ----------------------------------------------------------------------------
// Structs
// ----------------------------------------------------------------------------

/// A strict JSON syntax checker, fed one byte at a time.
#[derive(Clone, Debug)]
pub struct Checker {
    stack: Vec<Frame>,
    expect: Expect,
    token: Option<Token>,
    max_depth: usize,
    offset: usize,
}

// ----------------------------------------------------------------------------
// Implementations
// ----------------------------------------------------------------------------

impl Checker {
    /// Creates a checker bounded by [`DEFAULT_MAX_DEPTH`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_max_depth(DEFAULT_MAX_DEPTH)
    }

    /// Creates a checker with an explicit nesting bound.
    #[must_use]
    pub fn with_max_depth(max_depth: usize) -> Self {
        Self {
            stack: Vec::new(),
            expect: Expect::Value,
            token: None,
            max_depth,
            offset: 0,
        }
    }

    /// Feeds one byte to the automaton.
    ///
    /// Returns [`Signal::Boundary`] if the byte does not belong to the
    /// message; the caller must present that same byte again once it
    /// starts reading the next message.
    pub fn feed(&mut self, byte: u8) -> Result<Signal, Error> {
        loop {
            let outcome = self.step(byte)?;
            self.offset += 1;
            match outcome {
                StepOutcome::Consumed => return Ok(Signal::Continue),
                StepOutcome::ConsumedDone => return Ok(Signal::Done),
                StepOutcome::Boundary => {
                    self.offset -= 1;
                    return Ok(Signal::Boundary);
                }
                StepOutcome::Reprocess => {
                    self.offset -= 1;
                    continue;
                }
            }
        }
    }

    /// Confirms the message ended in a valid, complete state.
    ///
    /// Must be called when the stream closes with no further bytes
    /// available, to reject a message that was cut off mid-value (for
    /// instance a bare number with no trailing delimiter is fine, but a
    /// dangling `{"a":` is not).
    pub fn finish(&mut self) -> Result<(), Error> {
        if let Some(Token::Number(state)) = self.token {
            if is_number_terminal(state) && self.stack.is_empty() {
                self.token = None;
                self.expect = Expect::Done;
                return Ok(());
            }
        }
        if self.token.is_none() && self.expect == Expect::Done {
            return Ok(());
        }
        Err(Error::syntax(self.offset, "message ended mid-value"))
    }

    /// Processes one byte, returning whether it was consumed.
    fn step(&mut self, byte: u8) -> Result<StepOutcome, Error> {
        match self.token {
            Some(Token::String {
                role,
                escaped,
                unicode_remaining,
                unicode_value,
                pending_high_surrogate,
            }) => self.step_string(byte, role, escaped, unicode_remaining, unicode_value, pending_high_surrogate),
            Some(Token::Number(state)) => self.step_number(byte, state),
            Some(Token::Literal(rest)) => self.step_literal(byte, rest),
            None => self.step_start(byte),
        }
    }

    /// No token is in progress; `byte` must start one, close a container,
    /// or be a separator permitted by `self.expect`.
    fn step_start(&mut self, byte: u8) -> Result<StepOutcome, Error> {
        if self.expect == Expect::Done {
            return Ok(StepOutcome::Boundary);
        }
        if is_whitespace(byte) {
            return Ok(StepOutcome::Consumed);
        }
        match (self.expect, byte) {
            (Expect::Value | Expect::ArrayStart | Expect::ArrayNext, b'{') => {
                self.push(Frame::Object, Expect::ObjectStart)
            }
            (Expect::Value | Expect::ArrayStart | Expect::ArrayNext, b'[') => {
                self.push(Frame::Array, Expect::ArrayStart)
            }
            (Expect::Value | Expect::ArrayStart | Expect::ArrayNext, b'"') => {
                self.token = Some(Token::String {
                    role: StringRole::Value,
                    escaped: false,
                    unicode_remaining: 0,
                    unicode_value: 0,
                    pending_high_surrogate: None,
                });
                Ok(StepOutcome::Consumed)
            }
            (Expect::ObjectStart | Expect::ObjectNext, b'"') => {
                self.token = Some(Token::String {
                    role: StringRole::Key,
                    escaped: false,
                    unicode_remaining: 0,
                    unicode_value: 0,
                    pending_high_surrogate: None,
                });
                Ok(StepOutcome::Consumed)
            }
            (Expect::Value | Expect::ArrayStart | Expect::ArrayNext, b'-') => {
                self.token = Some(Token::Number(NumberState::Minus));
                Ok(StepOutcome::Consumed)
            }
            (Expect::Value | Expect::ArrayStart | Expect::ArrayNext, b'0') => {
                self.token = Some(Token::Number(NumberState::Zero));
                Ok(StepOutcome::Consumed)
            }
            (Expect::Value | Expect::ArrayStart | Expect::ArrayNext, b'1'..=b'9') => {
                self.token = Some(Token::Number(NumberState::Int));
                Ok(StepOutcome::Consumed)
            }
            (Expect::Value | Expect::ArrayStart | Expect::ArrayNext, b't') => {
                self.token = Some(Token::Literal(b"rue"));
                Ok(StepOutcome::Consumed)
            }
            (Expect::Value | Expect::ArrayStart | Expect::ArrayNext, b'f') => {
                self.token = Some(Token::Literal(b"alse"));
                Ok(StepOutcome::Consumed)
            }
            (Expect::Value | Expect::ArrayStart | Expect::ArrayNext, b'n') => {
                self.token = Some(Token::Literal(b"ull"));
                Ok(StepOutcome::Consumed)
            }
            (Expect::ArrayStart, b']') | (Expect::ArrayClose, b']') => self.close(Frame::Array),
            (Expect::ObjectStart, b'}') | (Expect::ObjectClose, b'}') => self.close(Frame::Object),
            (Expect::ArrayClose, b',') => {
                self.expect = Expect::ArrayNext;
                Ok(StepOutcome::Consumed)
            }
            (Expect::ObjectClose, b',') => {
                self.expect = Expect::ObjectNext;
                Ok(StepOutcome::Consumed)
            }
            (Expect::Colon, b':') => {
                self.expect = Expect::Value;
                Ok(StepOutcome::Consumed)
            }
            _ => Err(Error::syntax(self.offset, "unexpected byte")),
        }
    }

    fn push(&mut self, frame: Frame, expect: Expect) -> Result<StepOutcome, Error> {
        if self.stack.len() >= self.max_depth {
            return Err(Error::syntax(self.offset, "container nesting too deep"));
        }
        self.stack.push(frame);
        self.expect = expect;
        Ok(StepOutcome::Consumed)
    }

    fn close(&mut self, expected: Frame) -> Result<StepOutcome, Error> {
        match self.stack.pop() {
            Some(frame) if frame == expected => {
                self.after_value();
                Ok(if self.expect == Expect::Done {
                    StepOutcome::ConsumedDone
                } else {
                    StepOutcome::Consumed
                })
            }
            _ => Err(Error::syntax(self.offset, "mismatched closing bracket")),
        }
    }

    /// Sets `expect` for whatever comes after a value just completed.
    fn after_value(&mut self) {
        self.expect = match self.stack.last() {
            Some(Frame::Object) => Expect::ObjectClose,
            Some(Frame::Array) => Expect::ArrayClose,
            None => Expect::Done,
        };
    }

    fn step_string(
        &mut self,
        byte: u8,
        role: StringRole,
        escaped: bool,
        unicode_remaining: u8,
        unicode_value: u16,
        pending_high_surrogate: Option<u16>,
    ) -> Result<StepOutcome, Error> {
        if unicode_remaining > 0 {
            let Some(digit) = (byte as char).to_digit(16) else {
                return Err(Error::syntax(self.offset, "invalid \\u escape"));
            };
            let value = unicode_value * 16 + u16::try_from(digit).unwrap_or(0);
            if unicode_remaining > 1 {
                self.token = Some(Token::String {
                    role,
                    escaped: false,
                    unicode_remaining: unicode_remaining - 1,
                    unicode_value: value,
                    pending_high_surrogate,
                });
                return Ok(StepOutcome::Consumed);
            }
            return self.finish_unicode_escape(role, value, pending_high_surrogate);
        }
        if escaped {
            if let Some(high) = pending_high_surrogate {
                return match byte {
                    b'u' => {
                        self.token = Some(Token::String {
                            role,
                            escaped: false,
                            unicode_remaining: 4,
                            unicode_value: 0,
                            pending_high_surrogate: Some(high),
                        });
                        Ok(StepOutcome::Consumed)
                    }
                    _ => Err(Error::syntax(self.offset, "unpaired high surrogate")),
                };
            }
            return match byte {
                b'"' | b'\\' | b'/' | b'b' | b'f' | b'n' | b'r' | b't' => {
                    self.token = Some(Token::String {
                        role,
                        escaped: false,
                        unicode_remaining: 0,
                        unicode_value: 0,
                        pending_high_surrogate: None,
                    });
                    Ok(StepOutcome::Consumed)
                }
                b'u' => {
                    self.token = Some(Token::String {
                        role,
                        escaped: false,
                        unicode_remaining: 4,
                        unicode_value: 0,
                        pending_high_surrogate: None,
                    });
                    Ok(StepOutcome::Consumed)
                }
                _ => Err(Error::syntax(self.offset, "invalid escape sequence")),
            };
        }
        if pending_high_surrogate.is_some() {
            return match byte {
                b'\\' => {
                    self.token = Some(Token::String {
                        role,
                        escaped: true,
                        unicode_remaining: 0,
                        unicode_value: 0,
                        pending_high_surrogate,
                    });
                    Ok(StepOutcome::Consumed)
                }
                _ => Err(Error::syntax(self.offset, "unpaired high surrogate")),
            };
        }
        match byte {
            b'"' => {
                self.token = None;
                match role {
                    StringRole::Key => {
                        self.expect = Expect::Colon;
                        Ok(StepOutcome::Consumed)
                    }
                    StringRole::Value => {
                        self.after_value();
                        Ok(if self.expect == Expect::Done {
                            StepOutcome::ConsumedDone
                        } else {
                            StepOutcome::Consumed
                        })
                    }
                }
            }
            b'\\' => {
                self.token = Some(Token::String {
                    role,
                    escaped: true,
                    unicode_remaining: 0,
                    unicode_value: 0,
                    pending_high_surrogate: None,
                });
                Ok(StepOutcome::Consumed)
            }
            0x00..=0x1F => Err(Error::syntax(self.offset, "unescaped control character")),
            _ => Ok(StepOutcome::Consumed),
        }
    }

    /// Called once the fourth hex digit of a `\uXXXX` escape is consumed.
    ///
    /// Mirrors `parser::decode_unicode_escape`'s surrogate handling so the
    /// validator never accepts a string the parser would then reject: a
    /// high surrogate must be immediately paired with a low surrogate
    /// escape, and a low surrogate can never appear unpaired.
    fn finish_unicode_escape(
        &mut self,
        role: StringRole,
        value: u16,
        pending_high_surrogate: Option<u16>,
    ) -> Result<StepOutcome, Error> {
        if pending_high_surrogate.is_some() {
            if !(0xDC00..=0xDFFF).contains(&value) {
                return Err(Error::syntax(self.offset, "invalid surrogate pair"));
            }
        } else if (0xDC00..=0xDFFF).contains(&value) {
            return Err(Error::syntax(self.offset, "unpaired low surrogate"));
        }
        let pending_high_surrogate = if pending_high_surrogate.is_none() && (0xD800..=0xDBFF).contains(&value) {
            Some(value)
        } else {
            None
        };
        self.token = Some(Token::String {
            role,
            escaped: false,
            unicode_remaining: 0,
            unicode_value: 0,
            pending_high_surrogate,
        });
        Ok(StepOutcome::Consumed)
    }

    fn step_literal(&mut self, byte: u8, rest: &'static [u8]) -> Result<StepOutcome, Error> {
        let Some((&expected, tail)) = rest.split_first() else {
            unreachable!("a Literal token is never stored with an empty tail")
        };
        if byte != expected {
            return Err(Error::syntax(self.offset, "invalid literal"));
        }
        if tail.is_empty() {
            self.token = None;
            self.after_value();
            Ok(if self.expect == Expect::Done {
                StepOutcome::ConsumedDone
            } else {
                StepOutcome::Consumed
            })
        } else {
            self.token = Some(Token::Literal(tail));
            Ok(StepOutcome::Consumed)
        }
    }

    fn step_number(&mut self, byte: u8, state: NumberState) -> Result<StepOutcome, Error> {
        use NumberState::{
            Exponent, ExponentSigned, ExponentStart, Fraction, FractionStart, Int, Minus, Zero,
        };
        let next = match (state, byte) {
            (Minus, b'0') => Some(Zero),
            (Minus, b'1'..=b'9') => Some(Int),
            (Int, b'0'..=b'9') => Some(Int),
            (Zero, b'.') | (Int, b'.') => Some(FractionStart),
            (Zero, b'e' | b'E') | (Int, b'e' | b'E') => Some(ExponentStart),
            (FractionStart, b'0'..=b'9') => Some(Fraction),
            (Fraction, b'0'..=b'9') => Some(Fraction),
            (Fraction, b'e' | b'E') => Some(ExponentStart),
            (ExponentStart, b'+' | b'-') => Some(ExponentSigned),
            (ExponentStart, b'0'..=b'9') => Some(Exponent),
            (ExponentSigned, b'0'..=b'9') => Some(Exponent),
            (Exponent, b'0'..=b'9') => Some(Exponent),
            _ => None,
        };
        if let Some(next) = next {
            self.token = Some(Token::Number(next));
            return Ok(StepOutcome::Consumed);
        }
        if !is_number_terminal(state) {
            return Err(Error::syntax(self.offset, "incomplete number"));
        }
        self.token = None;
        self.after_value();
        if self.expect == Expect::Done {
            Ok(StepOutcome::Boundary)
        } else {
            Ok(StepOutcome::Reprocess)
        }
    }
}

/// Whether a number state represents a complete, valid number.
fn is_number_terminal(state: NumberState) -> bool {
    matches!(
        state,
        NumberState::Zero | NumberState::Int | NumberState::Fraction | NumberState::Exponent
    )
}

/// RFC 8259 insignificant whitespace: space, tab, line feed, carriage
/// return.
fn is_whitespace(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\n' | b'\r')
}

// ----------------------------------------------------------------------------
// Trait implementations
// ----------------------------------------------------------------------------

impl Default for Checker {
    fn default() -> Self {
        Self::new()
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn run(bytes: &[u8]) -> Result<Vec<Signal>, Error> {
        let mut checker = Checker::new();
        let mut signals = Vec::new();
        for &byte in bytes {
            signals.push(checker.feed(byte)?);
        }
        checker.finish()?;
        Ok(signals)
    }

    #[test]
    fn accepts_a_flat_object() {
        assert!(run(br#"{"a":1,"b":true}"#).is_ok());
    }

    #[test]
    fn accepts_nested_arrays_and_objects() {
        assert!(run(br#"{"a":[1,2,{"b":null}],"c":[]}"#).is_ok());
    }

    #[test]
    fn rejects_trailing_comma() {
        assert!(run(br#"{"a":1,}"#).is_err());
        assert!(run(br"[1,2,]").is_err());
    }

    #[test]
    fn rejects_unquoted_keys() {
        assert!(run(br"{a:1}").is_err());
    }

    #[test]
    fn rejects_mismatched_brackets() {
        assert!(run(br#"{"a":1]"#).is_err());
    }

    #[test]
    fn accepts_unicode_and_simple_escapes() {
        assert!(run(br#""A\n\t\"""#).is_ok());
    }

    #[test]
    fn rejects_unescaped_control_character_in_string() {
        let mut checker = Checker::new();
        assert!(checker.feed(b'"').is_ok());
        assert!(checker.feed(0x01).is_err());
    }

    #[test]
    fn accepts_numeric_formats() {
        for literal in ["0", "-0", "123", "-123", "1.5", "1e10", "1E-10", "1.5e+2"] {
            assert!(run(literal.as_bytes()).is_ok(), "{literal} should parse");
        }
    }

    #[test]
    fn rejects_leading_zero_in_multidigit_integer() {
        // A bare top-level "01" is indistinguishable from two consecutive
        // single-digit messages without a delimiter between them, so the
        // rejection is only observable where a delimiter bounds the number.
        assert!(run(b"[01]").is_err());
    }

    #[test]
    fn number_followed_by_comma_in_array_reprocesses_correctly() {
        assert!(run(br"[1,2,3]").is_ok());
    }

    #[test]
    fn bare_number_at_top_level_signals_boundary_on_trailing_byte() {
        let mut checker = Checker::new();
        assert_eq!(checker.feed(b'4').unwrap(), Signal::Continue);
        assert_eq!(checker.feed(b'2').unwrap(), Signal::Continue);
        assert_eq!(checker.feed(b' ').unwrap(), Signal::Boundary);
    }

    #[test]
    fn bare_number_at_eof_is_accepted() {
        let mut checker = Checker::new();
        assert_eq!(checker.feed(b'4').unwrap(), Signal::Continue);
        assert_eq!(checker.feed(b'2').unwrap(), Signal::Continue);
        assert!(checker.finish().is_ok());
    }

    #[test]
    fn object_closing_brace_signals_done_immediately() {
        let mut checker = Checker::new();
        let message = br#"{"a":1}"#;
        let mut last = Signal::Continue;
        for &byte in message {
            last = checker.feed(byte).unwrap();
        }
        assert_eq!(last, Signal::Done);
    }

    #[test]
    fn deeply_nested_array_past_bound_is_rejected() {
        let mut checker = Checker::with_max_depth(4);
        for _ in 0..4 {
            assert!(checker.feed(b'[').is_ok());
        }
        assert!(checker.feed(b'[').is_err());
    }

    #[test]
    fn truncated_object_at_eof_is_rejected() {
        let mut checker = Checker::new();
        for &byte in br#"{"a":"# {
            checker.feed(byte).unwrap();
        }
        assert!(checker.finish().is_err());
    }

    #[test]
    fn accepts_a_properly_paired_surrogate_escape() {
        assert!(run(br#""😀""#).is_ok());
    }

    #[test]
    fn rejects_a_lone_high_surrogate() {
        assert!(run(br#""\ud83d""#).is_err());
    }

    #[test]
    fn rejects_a_lone_low_surrogate() {
        assert!(run(br#""\ude00""#).is_err());
    }

    #[test]
    fn rejects_a_high_surrogate_followed_by_a_non_surrogate_escape() {
        assert!(run(br#""\ud83d\n""#).is_err());
    }

    #[test]
    fn rejects_a_high_surrogate_followed_by_plain_text() {
        assert!(run(br#""\ud83dA""#).is_err());
    }

    #[test]
    fn rejects_a_high_surrogate_paired_with_another_high_surrogate() {
        assert!(run(br#""\ud83d\ud83d""#).is_err());
    }
}
