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

/// Error in the JSON text itself.
///
/// The `usize` carried by most variants is the byte offset at which the
/// problem was detected.
#[derive(strum_macros::Display, Debug, PartialEq, Clone)]
pub enum SyntaxError {
    /// The input is not valid UTF-8.
    #[strum(to_string = "Input is not valid UTF-8")]
    InvalidUtf8,
    /// The input ended in the middle of a value.
    #[strum(to_string = "Unexpected end of input")]
    UnexpectedEof,
    /// A byte that cannot appear at this position.
    #[strum(to_string = "Unexpected byte at offset {0}")]
    UnexpectedByte(usize),
    /// An unknown `\` escape inside a string.
    #[strum(to_string = "Invalid escape sequence at offset {0}")]
    InvalidEscape(usize),
    /// A malformed `\u` escape, or an unpaired surrogate.
    #[strum(to_string = "Invalid unicode escape at offset {0}")]
    InvalidUnicodeEscape(usize),
    /// A number not following the JSON number grammar.
    #[strum(to_string = "Invalid number at offset {0}")]
    InvalidNumber(usize),
    /// Objects and arrays are nested deeper than the configured limit.
    #[strum(to_string = "Nesting deeper than {0} levels")]
    NestingTooDeep(usize),
    /// Something other than whitespace follows the top-level value.
    #[strum(to_string = "Trailing data at offset {0}")]
    TrailingData(usize),
}

impl bherror::BhError for SyntaxError {}

/// Error returned by [`Tokenizer::parse`](crate::Tokenizer::parse).
///
/// Errors raised by the [`EventHandler`](crate::EventHandler) are handed back
/// untouched in the [`ParseError::Handler`] variant, so that the caller can
/// tell a rejection of the JSON text from a rejection of its content.
#[derive(Debug)]
pub enum ParseError<E> {
    /// The input is not well-formed JSON.
    Syntax(bherror::Error<SyntaxError>),
    /// The event handler stopped the parse.
    Handler(E),
}

impl<E> ParseError<E> {
    /// Returns the handler error, if this is one.
    pub fn into_handler_error(self) -> Option<E> {
        match self {
            Self::Handler(error) => Some(error),
            Self::Syntax(_) => None,
        }
    }
}
