// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Relaxed JSON decoding for SyncThru `.json` endpoints.
//!
//! The firmware builds these documents with string concatenation, so the
//! output routinely contains trailing commas, raw newlines inside strings,
//! single-quoted strings, bare object keys and JavaScript literals such as
//! `undefined`. [`decode`] accepts all of these and produces an ordinary
//! [`serde_json::Value`].

use serde_json::{Map, Number, Value};

use crate::error::ParseError;

/// Nesting limit for objects and arrays.
const MAX_DEPTH: usize = 128;

/// Decodes a relaxed JSON document.
///
/// # Errors
///
/// Returns [`ParseError::MalformedResponse`] for input that is not even
/// relaxed JSON: unterminated strings or comments, unbalanced brackets,
/// unknown bare words, or trailing content after the top-level value.
///
/// # Examples
///
/// ```
/// use syncthru::parser::decode;
///
/// let tree = decode("{status: {hrDeviceStatus: 2, status1: 'Ready',},}")?;
/// assert_eq!(tree["status"]["hrDeviceStatus"], 2);
/// assert_eq!(tree["status"]["status1"], "Ready");
///
/// assert!(decode("<html></html>").is_err());
/// # Ok::<(), syncthru::ParseError>(())
/// ```
pub fn decode(text: &str) -> Result<Value, ParseError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut parser = Parser {
        src: text,
        bytes: text.as_bytes(),
        pos: 0,
        depth: 0,
    };

    parser.skip_trivia()?;
    if parser.at_end() {
        return Err(ParseError::malformed(0, "empty document"));
    }
    let value = parser.value()?;
    parser.skip_trivia()?;
    if !parser.at_end() {
        return Err(parser.error("unexpected content after document"));
    }
    Ok(value)
}

struct Parser<'a> {
    src: &'a str,
    bytes: &'a [u8],
    pos: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn at_end(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn error(&self, message: &str) -> ParseError {
        ParseError::malformed(self.pos, message)
    }

    /// Skips whitespace and `//` / `/* */` comments.
    fn skip_trivia(&mut self) -> Result<(), ParseError> {
        loop {
            match self.peek() {
                Some(b) if b.is_ascii_whitespace() => self.pos += 1,
                Some(b'/') => match self.bytes.get(self.pos + 1) {
                    Some(b'/') => {
                        while let Some(b) = self.peek() {
                            if b == b'\n' {
                                break;
                            }
                            self.pos += 1;
                        }
                    }
                    Some(b'*') => {
                        let start = self.pos;
                        let rest = &self.src[self.pos + 2..];
                        match rest.find("*/") {
                            Some(end) => self.pos += end + 4,
                            None => {
                                return Err(ParseError::malformed(start, "unterminated comment"));
                            }
                        }
                    }
                    _ => return Ok(()),
                },
                _ => return Ok(()),
            }
        }
    }

    fn value(&mut self) -> Result<Value, ParseError> {
        match self.peek() {
            Some(b'{') => self.nested(Self::object),
            Some(b'[') => self.nested(Self::array),
            Some(quote @ (b'"' | b'\'')) => self.string(quote).map(Value::String),
            Some(b'-' | b'+' | b'.' | b'0'..=b'9') => self.number(),
            Some(b) if is_word_byte(b) => self.literal(),
            Some(_) => Err(self.error("unexpected character")),
            None => Err(self.error("unexpected end of input")),
        }
    }

    fn nested(
        &mut self,
        parse: fn(&mut Self) -> Result<Value, ParseError>,
    ) -> Result<Value, ParseError> {
        if self.depth >= MAX_DEPTH {
            return Err(self.error("nesting too deep"));
        }
        self.depth += 1;
        let value = parse(self);
        self.depth -= 1;
        value
    }

    fn object(&mut self) -> Result<Value, ParseError> {
        let open = self.pos;
        self.pos += 1;
        let mut map = Map::new();

        loop {
            self.skip_trivia()?;
            match self.peek() {
                Some(b'}') => {
                    self.pos += 1;
                    return Ok(Value::Object(map));
                }
                None => return Err(ParseError::malformed(open, "unclosed object")),
                _ => {}
            }

            let key = self.key()?;
            self.skip_trivia()?;
            if self.peek() != Some(b':') {
                return Err(self.error("expected ':' after object key"));
            }
            self.pos += 1;
            self.skip_trivia()?;
            let value = self.value()?;
            map.insert(key, value);

            self.skip_trivia()?;
            match self.peek() {
                Some(b',') => self.pos += 1,
                Some(b'}') => {}
                None => return Err(ParseError::malformed(open, "unclosed object")),
                Some(_) => return Err(self.error("expected ',' or '}'")),
            }
        }
    }

    fn key(&mut self) -> Result<String, ParseError> {
        match self.peek() {
            Some(quote @ (b'"' | b'\'')) => self.string(quote),
            Some(b) if is_word_byte(b) => Ok(self.word().to_string()),
            _ => Err(self.error("expected object key")),
        }
    }

    fn array(&mut self) -> Result<Value, ParseError> {
        let open = self.pos;
        self.pos += 1;
        let mut items = Vec::new();

        loop {
            self.skip_trivia()?;
            match self.peek() {
                Some(b']') => {
                    self.pos += 1;
                    return Ok(Value::Array(items));
                }
                None => return Err(ParseError::malformed(open, "unclosed array")),
                _ => {}
            }

            items.push(self.value()?);

            self.skip_trivia()?;
            match self.peek() {
                Some(b',') => self.pos += 1,
                Some(b']') => {}
                None => return Err(ParseError::malformed(open, "unclosed array")),
                Some(_) => return Err(self.error("expected ',' or ']'")),
            }
        }
    }

    /// Reads a quoted string. Raw control characters are kept verbatim.
    fn string(&mut self, quote: u8) -> Result<String, ParseError> {
        let open = self.pos;
        self.pos += 1;
        let mut out = String::new();
        let mut run = self.pos;

        loop {
            let Some(b) = self.peek() else {
                return Err(ParseError::malformed(open, "unterminated string"));
            };
            if b == quote {
                out.push_str(&self.src[run..self.pos]);
                self.pos += 1;
                return Ok(out);
            }
            if b == b'\\' {
                out.push_str(&self.src[run..self.pos]);
                self.pos += 1;
                self.escape(&mut out)?;
                run = self.pos;
            } else {
                self.pos += 1;
            }
        }
    }

    fn escape(&mut self, out: &mut String) -> Result<(), ParseError> {
        let Some(b) = self.peek() else {
            return Err(self.error("unterminated escape"));
        };
        match b {
            b'n' => out.push('\n'),
            b't' => out.push('\t'),
            b'r' => out.push('\r'),
            b'b' => out.push('\u{8}'),
            b'f' => out.push('\u{c}'),
            b'u' => {
                self.pos += 1;
                let c = self.unicode_escape()?;
                out.push(c);
                return Ok(());
            }
            _ => {
                // Unknown escapes (`\'`, `\/`, `\"`, `\\`, `\x`...) keep the
                // escaped character.
                let c = self.src[self.pos..]
                    .chars()
                    .next()
                    .ok_or_else(|| self.error("unterminated escape"))?;
                out.push(c);
                self.pos += c.len_utf8();
                return Ok(());
            }
        }
        self.pos += 1;
        Ok(())
    }

    fn hex4(&mut self) -> Result<u32, ParseError> {
        let digits = self
            .src
            .get(self.pos..self.pos + 4)
            .ok_or_else(|| self.error("truncated unicode escape"))?;
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(self.error("invalid unicode escape"));
        }
        let code =
            u32::from_str_radix(digits, 16).map_err(|_| self.error("invalid unicode escape"))?;
        self.pos += 4;
        Ok(code)
    }

    fn unicode_escape(&mut self) -> Result<char, ParseError> {
        let high = self.hex4()?;
        if (0xD800..0xDC00).contains(&high) && self.src[self.pos..].starts_with("\\u") {
            let save = self.pos;
            self.pos += 2;
            let low = self.hex4()?;
            if (0xDC00..0xE000).contains(&low) {
                let combined = 0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00);
                return Ok(char::from_u32(combined).unwrap_or(char::REPLACEMENT_CHARACTER));
            }
            self.pos = save;
        }
        Ok(char::from_u32(high).unwrap_or(char::REPLACEMENT_CHARACTER))
    }

    fn number(&mut self) -> Result<Value, ParseError> {
        let start = self.pos;
        while let Some(b'0'..=b'9' | b'-' | b'+' | b'.' | b'e' | b'E') = self.peek() {
            self.pos += 1;
        }
        let token = &self.src[start..self.pos];
        let is_integer = !token.contains(['.', 'e', 'E']);

        if is_integer {
            if let Ok(n) = token.parse::<i64>() {
                return Ok(Value::from(n));
            }
            if let Ok(n) = token.trim_start_matches('+').parse::<u64>() {
                return Ok(Value::from(n));
            }
        }
        token
            .parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map(Value::Number)
            .ok_or_else(|| ParseError::malformed(start, format!("invalid number '{token}'")))
    }

    fn word(&mut self) -> &'a str {
        let src = self.src;
        let start = self.pos;
        while self.peek().is_some_and(is_word_byte) {
            self.pos += 1;
        }
        &src[start..self.pos]
    }

    fn literal(&mut self) -> Result<Value, ParseError> {
        let start = self.pos;
        match self.word() {
            "true" => Ok(Value::Bool(true)),
            "false" => Ok(Value::Bool(false)),
            "null" | "undefined" | "NaN" => Ok(Value::Null),
            other => Err(ParseError::malformed(
                start,
                format!("unexpected word '{other}'"),
            )),
        }
    }
}

fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'$'
}
