// Copyright (C) 2020-2026  The Blockhouse Technology Limited (TBTL).
//
// This program is free software: you can redistribute it and/or modify it
// under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or (at your
// option) any later version.
//
// This program is distributed in the hope that it will be useful, but
// WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU Affero General Public
// License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

use crate::{ParseError, SyntaxError};

/// Default maximum nesting depth of objects and arrays.
pub const DEFAULT_MAX_DEPTH: usize = 32;

/// Default maximum number of string bytes delivered in a single
/// [`Event::ValueChunk`] or [`Event::ValueComplete`].
pub const DEFAULT_CHUNK_LEN: usize = 254;

/// Resource limits applied by the [`Tokenizer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// Maximum nesting depth of objects and arrays.
    pub max_depth: usize,
    /// Maximum number of string bytes delivered per event. Longer strings are
    /// split over several [`Event::ValueChunk`]s.
    pub chunk_len: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            chunk_len: DEFAULT_CHUNK_LEN,
        }
    }
}

/// A scalar value which is not a string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scalar<'a> {
    /// A number, as its raw JSON text.
    Number(&'a str),
    /// `true` or `false`.
    Bool(bool),
    /// `null`.
    Null,
}

/// An event pushed by the [`Tokenizer`] into the [`EventHandler`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event<'a> {
    /// `{` was seen.
    ObjectStart,
    /// `}` was seen.
    ObjectEnd,
    /// `[` was seen.
    ArrayStart,
    /// `]` was seen.
    ArrayEnd,
    /// A string value starts.
    ValueStart,
    /// A part of a string value, unescaped. More parts follow.
    ValueChunk(&'a [u8]),
    /// The last part of a string value, unescaped. May be empty.
    ValueComplete(&'a [u8]),
    /// A number, boolean or `null` value.
    Scalar(Scalar<'a>),
    /// The whole document was parsed successfully. Always the last event.
    Complete,
}

/// Position information accompanying every [`Event`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Context<'a> {
    path: &'a str,
    path_match: Option<usize>,
}

impl<'a> Context<'a> {
    /// The dotted path of the current position.
    ///
    /// Object members are joined with `.` and array elements are denoted by
    /// `[]`, so the `kty` member of the objects inside the top-level `keys`
    /// array has the path `keys[].kty`. The top-level value has the empty
    /// path.
    pub fn path(&self) -> &'a str {
        self.path
    }

    /// Index of [`Context::path`] in the table the [`Tokenizer`] was
    /// constructed with, or [`None`] if the path is not in the table.
    ///
    /// Always [`None`] at or below a member whose name is empty or contains
    /// `.`, `[` or `]`, since the dotted path of such a member may read the
    /// same as a different position. A top-level member named `keys[]`
    /// never matches the elements of the `keys` array.
    pub fn path_match(&self) -> Option<usize> {
        self.path_match
    }
}

/// Receiver of the events produced by the [`Tokenizer`].
pub trait EventHandler {
    /// Error type with which the handler may abort the parse.
    type Error;

    /// Called for every event, in document order.
    ///
    /// Returning an error stops the parse immediately; the error is handed
    /// back to the caller as [`ParseError::Handler`].
    fn on_event(&mut self, ctx: &Context<'_>, event: Event<'_>) -> Result<(), Self::Error>;
}

/// Streaming JSON tokenizer matching positions against a table of paths.
#[derive(Debug, Clone)]
pub struct Tokenizer<'t> {
    paths: &'t [&'t str],
    limits: Limits,
}

impl<'t> Tokenizer<'t> {
    /// Creates a tokenizer reporting matches against `paths`, with default
    /// [`Limits`].
    pub fn new(paths: &'t [&'t str]) -> Self {
        Self::with_limits(paths, Limits::default())
    }

    /// Creates a tokenizer reporting matches against `paths`, with the given
    /// [`Limits`].
    pub fn with_limits(paths: &'t [&'t str], limits: Limits) -> Self {
        let limits = Limits {
            chunk_len: limits.chunk_len.max(1),
            ..limits
        };
        Self { paths, limits }
    }

    /// The table of paths positions are matched against.
    pub fn paths(&self) -> &'t [&'t str] {
        self.paths
    }

    /// Parses a whole JSON document, pushing its events into `handler`.
    ///
    /// The last event of a successful parse is [`Event::Complete`]. The parse
    /// stops at the first syntax error or handler error.
    pub fn parse<H>(&self, input: &[u8], handler: &mut H) -> Result<(), ParseError<H::Error>>
    where
        H: EventHandler,
    {
        let text = match std::str::from_utf8(input) {
            Ok(text) => text,
            Err(_) => return syntax(SyntaxError::InvalidUtf8),
        };

        let mut run = Run {
            text,
            input,
            pos: 0,
            depth: 0,
            path: String::new(),
            ambiguous: 0,
            chunk: Vec::with_capacity(self.limits.chunk_len),
            paths: self.paths,
            limits: self.limits,
            handler,
        };

        run.document()
    }
}

#[track_caller]
fn syntax<T, E>(error: SyntaxError) -> Result<T, ParseError<E>> {
    Err(ParseError::Syntax(bherror::Error::root(error)))
}

/// Returns `true` for member names whose dotted path cannot be told apart
/// from the path of another position.
fn is_ambiguous_name(name: &str) -> bool {
    name.is_empty() || name.contains(&['.', '[', ']'][..])
}

fn emit<H: EventHandler>(
    handler: &mut H,
    paths: &[&str],
    ambiguous: usize,
    path: &str,
    event: Event<'_>,
) -> Result<(), ParseError<H::Error>> {
    let path_match = match ambiguous {
        0 => paths.iter().position(|candidate| *candidate == path),
        _ => None,
    };
    let ctx = Context { path, path_match };
    handler.on_event(&ctx, event).map_err(ParseError::Handler)
}

/// State of a single [`Tokenizer::parse`] call.
struct Run<'i, 'h, H: EventHandler> {
    text: &'i str,
    input: &'i [u8],
    pos: usize,
    depth: usize,
    path: String,
    /// Number of ambiguous member names on the current path.
    ambiguous: usize,
    chunk: Vec<u8>,
    paths: &'i [&'i str],
    limits: Limits,
    handler: &'h mut H,
}

type RunResult<T, H> = Result<T, ParseError<<H as EventHandler>::Error>>;

impl<H: EventHandler> Run<'_, '_, H> {
    fn document(&mut self) -> RunResult<(), H> {
        self.skip_whitespace();
        self.value()?;
        self.skip_whitespace();

        if self.pos != self.input.len() {
            return syntax(SyntaxError::TrailingData(self.pos));
        }

        self.emit(Event::Complete)
    }

    fn emit(&mut self, event: Event<'_>) -> RunResult<(), H> {
        emit(
            &mut *self.handler,
            self.paths,
            self.ambiguous,
            &self.path,
            event,
        )
    }

    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn next_byte(&mut self) -> RunResult<u8, H> {
        match self.peek() {
            Some(b) => {
                self.pos += 1;
                Ok(b)
            }
            None => syntax(SyntaxError::UnexpectedEof),
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(b' ' | b'\t' | b'\n' | b'\r') = self.peek() {
            self.pos += 1;
        }
    }

    fn expect(&mut self, expected: u8) -> RunResult<(), H> {
        match self.peek() {
            Some(b) if b == expected => {
                self.pos += 1;
                Ok(())
            }
            Some(_) => syntax(SyntaxError::UnexpectedByte(self.pos)),
            None => syntax(SyntaxError::UnexpectedEof),
        }
    }

    fn value(&mut self) -> RunResult<(), H> {
        match self.peek() {
            None => syntax(SyntaxError::UnexpectedEof),
            Some(b'{') => self.object(),
            Some(b'[') => self.array(),
            Some(b'"') => self.string_value(),
            Some(b't') => self.literal("true", Scalar::Bool(true)),
            Some(b'f') => self.literal("false", Scalar::Bool(false)),
            Some(b'n') => self.literal("null", Scalar::Null),
            Some(b'-' | b'0'..=b'9') => self.number(),
            Some(_) => syntax(SyntaxError::UnexpectedByte(self.pos)),
        }
    }

    fn enter(&mut self) -> RunResult<(), H> {
        self.depth += 1;
        if self.depth > self.limits.max_depth {
            return syntax(SyntaxError::NestingTooDeep(self.limits.max_depth));
        }
        Ok(())
    }

    fn object(&mut self) -> RunResult<(), H> {
        self.enter()?;
        self.pos += 1;
        self.emit(Event::ObjectStart)?;

        self.skip_whitespace();
        if self.peek() == Some(b'}') {
            self.pos += 1;
        } else {
            loop {
                self.skip_whitespace();
                self.expect(b'"')?;
                let name = self.member_name()?;
                self.skip_whitespace();
                self.expect(b':')?;
                self.skip_whitespace();

                let ambiguous = is_ambiguous_name(&name);
                let parent_len = self.path.len();
                if parent_len != 0 {
                    self.path.push('.');
                }
                self.path.push_str(&name);
                self.ambiguous += usize::from(ambiguous);
                self.value()?;
                self.ambiguous -= usize::from(ambiguous);
                self.path.truncate(parent_len);

                self.skip_whitespace();
                match self.next_byte()? {
                    b',' => continue,
                    b'}' => break,
                    _ => return syntax(SyntaxError::UnexpectedByte(self.pos - 1)),
                }
            }
        }

        self.depth -= 1;
        self.emit(Event::ObjectEnd)
    }

    fn array(&mut self) -> RunResult<(), H> {
        self.enter()?;
        self.pos += 1;
        self.emit(Event::ArrayStart)?;

        self.skip_whitespace();
        if self.peek() == Some(b']') {
            self.pos += 1;
        } else {
            let parent_len = self.path.len();
            self.path.push_str("[]");
            loop {
                self.skip_whitespace();
                self.value()?;
                self.skip_whitespace();
                match self.next_byte()? {
                    b',' => continue,
                    b']' => break,
                    _ => return syntax(SyntaxError::UnexpectedByte(self.pos - 1)),
                }
            }
            self.path.truncate(parent_len);
        }

        self.depth -= 1;
        self.emit(Event::ArrayEnd)
    }

    /// Reads an object member name; the opening quote is already consumed.
    fn member_name(&mut self) -> RunResult<String, H> {
        let mut name = String::new();
        loop {
            match self.next_byte()? {
                b'"' => return Ok(name),
                b'\\' => name.push(self.escape()?),
                b if b < 0x20 => return syntax(SyntaxError::UnexpectedByte(self.pos - 1)),
                _ => {
                    // Copy the whole UTF-8 sequence starting at this byte.
                    let start = self.pos - 1;
                    let end = self.text[start..]
                        .char_indices()
                        .nth(1)
                        .map_or(self.text.len(), |(offset, _)| start + offset);
                    name.push_str(&self.text[start..end]);
                    self.pos = end;
                }
            }
        }
    }

    fn string_value(&mut self) -> RunResult<(), H> {
        self.pos += 1;
        self.emit(Event::ValueStart)?;
        self.chunk.clear();

        loop {
            match self.next_byte()? {
                b'"' => break,
                b'\\' => {
                    let c = self.escape()?;
                    let mut utf8 = [0u8; 4];
                    for &b in c.encode_utf8(&mut utf8).as_bytes() {
                        self.push_value_byte(b)?;
                    }
                }
                b if b < 0x20 => return syntax(SyntaxError::UnexpectedByte(self.pos - 1)),
                b => self.push_value_byte(b)?,
            }
        }

        emit(
            &mut *self.handler,
            self.paths,
            self.ambiguous,
            &self.path,
            Event::ValueComplete(&self.chunk),
        )?;
        self.chunk.clear();
        Ok(())
    }

    /// Appends a byte to the pending chunk, flushing the chunk first if it is
    /// full.
    fn push_value_byte(&mut self, b: u8) -> RunResult<(), H> {
        if self.chunk.len() >= self.limits.chunk_len {
            emit(
                &mut *self.handler,
                self.paths,
                self.ambiguous,
                &self.path,
                Event::ValueChunk(&self.chunk),
            )?;
            self.chunk.clear();
        }
        self.chunk.push(b);
        Ok(())
    }

    /// Decodes an escape sequence; the `\` is already consumed.
    fn escape(&mut self) -> RunResult<char, H> {
        let at = self.pos - 1;
        let c = match self.next_byte()? {
            b'"' => '"',
            b'\\' => '\\',
            b'/' => '/',
            b'b' => '\u{8}',
            b'f' => '\u{c}',
            b'n' => '\n',
            b'r' => '\r',
            b't' => '\t',
            b'u' => return self.unicode_escape(at),
            _ => return syntax(SyntaxError::InvalidEscape(at)),
        };
        Ok(c)
    }

    fn unicode_escape(&mut self, at: usize) -> RunResult<char, H> {
        let high = self.hex4(at)?;
        let code = match high {
            0xD800..=0xDBFF => {
                if self.input.get(self.pos..self.pos + 2) != Some(b"\\u".as_slice()) {
                    return syntax(SyntaxError::InvalidUnicodeEscape(at));
                }
                self.pos += 2;
                let low = self.hex4(at)?;
                if !(0xDC00..=0xDFFF).contains(&low) {
                    return syntax(SyntaxError::InvalidUnicodeEscape(at));
                }
                0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00)
            }
            0xDC00..=0xDFFF => return syntax(SyntaxError::InvalidUnicodeEscape(at)),
            _ => high,
        };

        match char::from_u32(code) {
            Some(c) => Ok(c),
            None => syntax(SyntaxError::InvalidUnicodeEscape(at)),
        }
    }

    fn hex4(&mut self, at: usize) -> RunResult<u32, H> {
        let mut code = 0;
        for _ in 0..4 {
            let digit = match (self.next_byte()? as char).to_digit(16) {
                Some(digit) => digit,
                None => return syntax(SyntaxError::InvalidUnicodeEscape(at)),
            };
            code = code * 16 + digit;
        }
        Ok(code)
    }

    fn literal(&mut self, literal: &str, scalar: Scalar<'static>) -> RunResult<(), H> {
        if !self.input[self.pos..].starts_with(literal.as_bytes()) {
            return syntax(SyntaxError::UnexpectedByte(self.pos));
        }
        self.pos += literal.len();
        self.emit(Event::Scalar(scalar))
    }

    fn skip_digits(&mut self) -> usize {
        let start = self.pos;
        while let Some(b'0'..=b'9') = self.peek() {
            self.pos += 1;
        }
        self.pos - start
    }

    fn number(&mut self) -> RunResult<(), H> {
        let start = self.pos;
        if self.peek() == Some(b'-') {
            self.pos += 1;
        }

        match self.peek() {
            Some(b'0') => self.pos += 1,
            Some(b'1'..=b'9') => {
                self.skip_digits();
            }
            _ => return syntax(SyntaxError::InvalidNumber(start)),
        }

        if self.peek() == Some(b'.') {
            self.pos += 1;
            if self.skip_digits() == 0 {
                return syntax(SyntaxError::InvalidNumber(start));
            }
        }

        if let Some(b'e' | b'E') = self.peek() {
            self.pos += 1;
            if let Some(b'+' | b'-') = self.peek() {
                self.pos += 1;
            }
            if self.skip_digits() == 0 {
                return syntax(SyntaxError::InvalidNumber(start));
            }
        }

        let text = self.text;
        self.emit(Event::Scalar(Scalar::Number(&text[start..self.pos])))
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    /// Owned copy of an [`Event`] together with its path information.
    #[derive(Debug, Clone, PartialEq)]
    enum Recorded {
        ObjectStart,
        ObjectEnd,
        ArrayStart,
        ArrayEnd,
        ValueStart,
        ValueChunk(String),
        ValueComplete(String),
        Number(String),
        Bool(bool),
        Null,
        Complete,
    }

    #[derive(Default)]
    struct Recorder {
        events: Vec<(String, Option<usize>, Recorded)>,
        fail_on: Option<&'static str>,
    }

    impl EventHandler for Recorder {
        type Error = &'static str;

        fn on_event(&mut self, ctx: &Context<'_>, event: Event<'_>) -> Result<(), Self::Error> {
            if self.fail_on == Some(ctx.path()) {
                return Err("handler says no");
            }

            let recorded = match event {
                Event::ObjectStart => Recorded::ObjectStart,
                Event::ObjectEnd => Recorded::ObjectEnd,
                Event::ArrayStart => Recorded::ArrayStart,
                Event::ArrayEnd => Recorded::ArrayEnd,
                Event::ValueStart => Recorded::ValueStart,
                Event::ValueChunk(bytes) => {
                    Recorded::ValueChunk(String::from_utf8_lossy(bytes).into_owned())
                }
                Event::ValueComplete(bytes) => {
                    Recorded::ValueComplete(String::from_utf8_lossy(bytes).into_owned())
                }
                Event::Scalar(Scalar::Number(n)) => Recorded::Number(n.to_owned()),
                Event::Scalar(Scalar::Bool(b)) => Recorded::Bool(b),
                Event::Scalar(Scalar::Null) => Recorded::Null,
                Event::Complete => Recorded::Complete,
            };
            self.events
                .push((ctx.path().to_owned(), ctx.path_match(), recorded));
            Ok(())
        }
    }

    fn record(paths: &[&str], input: &str) -> Vec<(String, Option<usize>, Recorded)> {
        let mut recorder = Recorder::default();
        Tokenizer::new(paths)
            .parse(input.as_bytes(), &mut recorder)
            .unwrap();
        recorder.events
    }

    fn syntax_error(input: &str) -> SyntaxError {
        let mut recorder = Recorder::default();
        match Tokenizer::new(&[]).parse(input.as_bytes(), &mut recorder) {
            Err(ParseError::Syntax(error)) => error.error,
            other => panic!("expected a syntax error, got {other:?}"),
        }
    }

    #[test]
    fn test_paths_and_matches() {
        let paths = ["keys[]", "keys[].kty", "keys[].key_ops[]"];
        let events = record(
            &paths,
            r#"{"keys":[{"kty":"EC","key_ops":["sign"]}],"other":1}"#,
        );

        let expected = vec![
            ("".to_owned(), None, Recorded::ObjectStart),
            ("keys".to_owned(), None, Recorded::ArrayStart),
            ("keys[]".to_owned(), Some(0), Recorded::ObjectStart),
            ("keys[].kty".to_owned(), Some(1), Recorded::ValueStart),
            (
                "keys[].kty".to_owned(),
                Some(1),
                Recorded::ValueComplete("EC".to_owned()),
            ),
            ("keys[].key_ops".to_owned(), None, Recorded::ArrayStart),
            ("keys[].key_ops[]".to_owned(), Some(2), Recorded::ValueStart),
            (
                "keys[].key_ops[]".to_owned(),
                Some(2),
                Recorded::ValueComplete("sign".to_owned()),
            ),
            ("keys[].key_ops".to_owned(), None, Recorded::ArrayEnd),
            ("keys[]".to_owned(), Some(0), Recorded::ObjectEnd),
            ("keys".to_owned(), None, Recorded::ArrayEnd),
            ("other".to_owned(), None, Recorded::Number("1".to_owned())),
            ("".to_owned(), None, Recorded::ObjectEnd),
            ("".to_owned(), None, Recorded::Complete),
        ];

        assert_eq!(events, expected);
    }

    #[test]
    fn test_root_object_matches_empty_path() {
        let events = record(&["", "kty"], r#" { "kty" : "oct" } "#);

        assert_eq!(events[0], ("".to_owned(), Some(0), Recorded::ObjectStart));
        assert_eq!(
            events[2],
            (
                "kty".to_owned(),
                Some(1),
                Recorded::ValueComplete("oct".to_owned())
            )
        );
        assert_eq!(events.last().unwrap().2, Recorded::Complete);
    }

    #[test]
    fn test_ambiguous_member_names_never_match() {
        let paths = ["", "keys[]", "keys[].kty", "a.b"];
        let events = record(
            &paths,
            r#"{"keys[]":{"kty":"oct"},"":{"x":1},"a.b":true,"a":{"b":null}}"#,
        );

        let matches: Vec<_> = events
            .iter()
            .map(|(path, path_match, _)| (path.as_str(), *path_match))
            .collect();

        assert_eq!(
            matches,
            [
                ("", Some(0)),
                ("keys[]", None),
                ("keys[].kty", None),
                ("keys[].kty", None),
                ("keys[]", None),
                ("", None),
                ("x", None),
                ("", None),
                ("a.b", None),
                ("a", None),
                ("a.b", Some(3)),
                ("a", None),
                ("", Some(0)),
                ("", Some(0)),
            ]
        );
    }

    #[test]
    fn test_ambiguous_name_inside_array() {
        let events = record(
            &["keys[]", "keys[].kty"],
            r#"{"keys":[{"kty":"EC","[]":{"kty":"oct"}}]}"#,
        );

        let kty_matches: Vec<_> = events
            .iter()
            .filter(|(path, _, _)| path.ends_with("kty"))
            .map(|(path, path_match, _)| (path.as_str(), *path_match))
            .collect();

        assert_eq!(
            kty_matches,
            [
                ("keys[].kty", Some(1)),
                ("keys[].kty", Some(1)),
                ("keys[].[].kty", None),
                ("keys[].[].kty", None),
            ]
        );
    }

    #[test]
    fn test_long_string_is_chunked() {
        let mut recorder = Recorder::default();
        let limits = Limits {
            chunk_len: 4,
            ..Limits::default()
        };
        Tokenizer::with_limits(&[], limits)
            .parse(br#"{"n":"abcdefghij"}"#, &mut recorder)
            .unwrap();

        let values: Vec<_> = recorder
            .events
            .into_iter()
            .filter(|(path, _, _)| path == "n")
            .map(|(_, _, recorded)| recorded)
            .collect();

        assert_eq!(
            values,
            vec![
                Recorded::ValueStart,
                Recorded::ValueChunk("abcd".to_owned()),
                Recorded::ValueChunk("efgh".to_owned()),
                Recorded::ValueComplete("ij".to_owned()),
            ]
        );
    }

    #[test]
    fn test_empty_string_completes_empty() {
        let events = record(&[], r#"[""]"#);
        assert_eq!(events[2].2, Recorded::ValueComplete(String::new()));
        assert_eq!(events[2].0, "[]");
    }

    #[test]
    fn test_escapes_are_decoded() {
        let events = record(
            &[],
            r#"{"a\"b":"q\"\\\/\b\f\n\r\té😀"}"#,
        );

        assert_eq!(events[1].0, "a\"b");
        assert_eq!(
            events[2].2,
            Recorded::ValueComplete("q\"\\/\u{8}\u{c}\n\r\t\u{e9}\u{1f600}".to_owned())
        );
    }

    #[test]
    fn test_non_ascii_member_name() {
        let events = record(&["žaba"], r#"{"žaba":true}"#);
        assert_eq!(events[1], ("žaba".to_owned(), Some(0), Recorded::Bool(true)));
    }

    #[test]
    fn test_scalars() {
        let events = record(&[], r#"[-0.5e+10, 0, 12, false, null]"#);
        let scalars: Vec<_> = events.into_iter().map(|(_, _, r)| r).collect();

        assert_eq!(
            scalars,
            vec![
                Recorded::ArrayStart,
                Recorded::Number("-0.5e+10".to_owned()),
                Recorded::Number("0".to_owned()),
                Recorded::Number("12".to_owned()),
                Recorded::Bool(false),
                Recorded::Null,
                Recorded::ArrayEnd,
                Recorded::Complete,
            ]
        );
    }

    #[test]
    fn test_syntax_errors() {
        assert_eq!(syntax_error(""), SyntaxError::UnexpectedEof);
        assert_eq!(syntax_error(r#"{"a":1"#), SyntaxError::UnexpectedEof);
        assert_eq!(syntax_error(r#"{"a":1,}"#), SyntaxError::UnexpectedByte(7));
        assert_eq!(syntax_error(r#"{"a" 1}"#), SyntaxError::UnexpectedByte(5));
        assert_eq!(syntax_error(r#"["\x"]"#), SyntaxError::InvalidEscape(2));
        assert_eq!(
            syntax_error(r#"["\ud800"]"#),
            SyntaxError::InvalidUnicodeEscape(2)
        );
        assert_eq!(
            syntax_error(r#"["\udc00"]"#),
            SyntaxError::InvalidUnicodeEscape(2)
        );
        assert_eq!(syntax_error("[01]"), SyntaxError::UnexpectedByte(2));
        assert_eq!(syntax_error("[1.]"), SyntaxError::InvalidNumber(1));
        assert_eq!(syntax_error("[-]"), SyntaxError::InvalidNumber(1));
        assert_eq!(syntax_error("[tru]"), SyntaxError::UnexpectedByte(1));
        assert_eq!(syntax_error("{} {}"), SyntaxError::TrailingData(3));
        assert_eq!(syntax_error("[\"a\nb\"]"), SyntaxError::UnexpectedByte(3));
    }

    #[test]
    fn test_invalid_utf8_is_rejected() {
        let mut recorder = Recorder::default();
        let result = Tokenizer::new(&[]).parse(b"[\"\xff\"]", &mut recorder);

        assert_matches!(result, Err(ParseError::Syntax(error)) if error.error == SyntaxError::InvalidUtf8);
        assert!(recorder.events.is_empty());
    }

    #[test]
    fn test_nesting_limit() {
        let limits = Limits {
            max_depth: 3,
            ..Limits::default()
        };
        let mut recorder = Recorder::default();
        let tokenizer = Tokenizer::with_limits(&[], limits);

        assert!(tokenizer.parse(b"[[[]]]", &mut recorder).is_ok());

        let result = tokenizer.parse(b"[[[[]]]]", &mut recorder);
        assert_matches!(result, Err(ParseError::Syntax(error)) if error.error == SyntaxError::NestingTooDeep(3));
    }

    #[test]
    fn test_handler_error_stops_parse() {
        let mut recorder = Recorder {
            fail_on: Some("b"),
            ..Recorder::default()
        };
        let result = Tokenizer::new(&[]).parse(br#"{"a":1,"b":2,"c":3}"#, &mut recorder);

        assert_matches!(result, Err(ParseError::Handler("handler says no")));
        assert!(recorder.events.iter().all(|(path, _, _)| path != "c"));
    }
}
