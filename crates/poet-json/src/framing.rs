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

//! Reads one JSON message at a time off a byte stream.
//!
//! There is no length-prefix header on the wire: a message's own balanced
//! structure is its delimiter, exactly as a human pasting JSON into a
//! socket would expect. [`read_message`] drives a
//! [`Checker`](crate::automaton::Checker) one byte at a time and stops the
//! instant the document is complete, leaving any following bytes (the
//! start of the next message) for the caller's next call.

use std::io::Read;

use crate::automaton::{Checker, Signal};
use crate::error::Error;
use crate::value::Value;

// ----------------------------------------------------------------------------
// Constants
// ----------------------------------------------------------------------------

/// Refuses messages larger than this many bytes, so a peer that never
/// closes its brackets can't grow the receive buffer without bound.
pub const DEFAULT_MAX_MESSAGE_BYTES: usize = 1 << 20;

// ----------------------------------------------------------------------------
// Enums
// ----------------------------------------------------------------------------

/// One message read off the stream.
#[derive(Debug)]
pub enum Frame {
    /// A complete, syntactically valid JSON document.
    Message(Value),
    /// The stream closed with no bytes belonging to a new message.
    Eof,
}

// ----------------------------------------------------------------------------
// Structs
// ----------------------------------------------------------------------------

/// Reads successive JSON messages from an underlying byte stream.
///
/// Holds at most one byte of look-ahead: the byte that turned out to
/// belong to the *next* message is buffered here until the next call to
/// [`Reader::read_message`].
pub struct Reader<R> {
    stream: R,
    pushback: Option<u8>,
    max_message_bytes: usize,
}

// ----------------------------------------------------------------------------
// Implementations
// ----------------------------------------------------------------------------

impl<R: Read> Reader<R> {
    /// Wraps a stream, bounding messages to [`DEFAULT_MAX_MESSAGE_BYTES`].
    pub fn new(stream: R) -> Self {
        Self::with_max_message_bytes(stream, DEFAULT_MAX_MESSAGE_BYTES)
    }

    /// Wraps a stream with an explicit message size bound.
    pub fn with_max_message_bytes(stream: R, max_message_bytes: usize) -> Self {
        Self {
            stream,
            pushback: None,
            max_message_bytes,
        }
    }

    /// Reads and parses the next message, or reports a clean EOF.
    pub fn read_message(&mut self) -> Result<Frame, Error> {
        let mut checker = Checker::new();
        let mut buffer = Vec::new();

        loop {
            let Some(byte) = self.next_byte()? else {
                if buffer.is_empty() {
                    return Ok(Frame::Eof);
                }
                checker.finish()?;
                break;
            };
            match checker.feed(byte)? {
                Signal::Continue => {
                    buffer.push(byte);
                    if buffer.len() > self.max_message_bytes {
                        return Err(Error::syntax(buffer.len(), "message too large"));
                    }
                }
                Signal::Done => {
                    buffer.push(byte);
                    break;
                }
                Signal::Boundary => {
                    self.pushback = Some(byte);
                    checker.finish()?;
                    break;
                }
            }
        }

        crate::parser::parse(&buffer).map(Frame::Message)
    }

    /// Returns the next byte, consulting the one-byte pushback first.
    fn next_byte(&mut self) -> Result<Option<u8>, Error> {
        if let Some(byte) = self.pushback.take() {
            return Ok(Some(byte));
        }
        let mut single = [0u8; 1];
        match self.stream.read(&mut single) {
            Ok(0) => Ok(None),
            Ok(_) => Ok(Some(single[0])),
            Err(err) => Err(Error::Transport(err)),
        }
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn reads_a_single_object_message() {
        let mut reader = Reader::new(Cursor::new(br#"{"a":1}"#.to_vec()));
        let Frame::Message(value) = reader.read_message().unwrap() else {
            panic!("expected a message");
        };
        assert_eq!(value.get("a").and_then(Value::as_u64), Some(1));
    }

    #[test]
    fn reads_two_back_to_back_object_messages() {
        let mut reader = Reader::new(Cursor::new(br#"{"a":1}{"b":2}"#.to_vec()));
        let Frame::Message(first) = reader.read_message().unwrap() else {
            panic!("expected a message");
        };
        let Frame::Message(second) = reader.read_message().unwrap() else {
            panic!("expected a message");
        };
        assert_eq!(first.get("a").and_then(Value::as_u64), Some(1));
        assert_eq!(second.get("b").and_then(Value::as_u64), Some(2));
    }

    #[test]
    fn reads_whitespace_separated_bare_numbers() {
        let mut reader = Reader::new(Cursor::new(b"42 7".to_vec()));
        let Frame::Message(first) = reader.read_message().unwrap() else {
            panic!("expected a message");
        };
        let Frame::Message(second) = reader.read_message().unwrap() else {
            panic!("expected a message");
        };
        assert_eq!(first.as_u64(), Some(42));
        assert_eq!(second.as_u64(), Some(7));
    }

    #[test]
    fn reports_clean_eof_between_messages() {
        let mut reader = Reader::new(Cursor::new(br#"{"a":1}"#.to_vec()));
        reader.read_message().unwrap();
        assert!(matches!(reader.read_message().unwrap(), Frame::Eof));
    }

    #[test]
    fn rejects_malformed_message() {
        let mut reader = Reader::new(Cursor::new(br#"{"a":}"#.to_vec()));
        assert!(reader.read_message().is_err());
    }

    #[test]
    fn enforces_the_message_size_bound() {
        let mut payload = Vec::from(*b"[");
        payload.extend(std::iter::repeat_n(b'1', 64));
        payload.extend_from_slice(b",1]");
        let mut reader = Reader::with_max_message_bytes(Cursor::new(payload), 8);
        assert!(reader.read_message().is_err());
    }
}
