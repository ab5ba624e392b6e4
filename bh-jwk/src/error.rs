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

/// Error while importing a JWK.
///
/// The `&'static str` carried by many variants is the name of the member
/// that caused the error.
#[derive(strum_macros::Display, Debug, PartialEq, Clone)]
pub enum ImportError {
    /// The text is not well-formed JSON.
    #[strum(to_string = "Malformed JSON")]
    Syntax,
    /// `kty` names a key type this library does not know.
    #[strum(to_string = "Unknown key type {0}")]
    UnknownKeyType(String),
    /// The member cannot belong to any key type still possible given the
    /// members seen before it.
    #[strum(to_string = "Member {0} is inconsistent with every possible key type")]
    FieldTypeMismatch(&'static str),
    /// A member mandatory for the key type is absent.
    #[strum(to_string = "Missing mandatory member {0}")]
    MissingMandatoryField(&'static str),
    /// A member appears more than once in the same key.
    #[strum(to_string = "Duplicate member {0}")]
    DuplicateField(&'static str),
    /// A member holds a number, boolean, `null` or object instead of a
    /// string.
    #[strum(to_string = "Member {0} must be a string")]
    NonStringValue(&'static str),
    /// A member value exceeds the size limit of its kind.
    #[strum(to_string = "Member {0} is too large")]
    OversizedValue(&'static str),
    /// A member value is not valid `base64url`, `base64` or UTF-8.
    #[strum(to_string = "Member {0} is not correctly encoded")]
    MalformedEncoding(&'static str),
    /// An RSA key has some, but not all, of `d`, `p` and `q`.
    #[strum(to_string = "RSA private keys require all of d, p and q")]
    IncompletePrivateTriplet,
    /// An RSA key has some, but not all, of `dp`, `dq` and `qi`.
    #[strum(to_string = "RSA dp, dq and qi must all appear or none")]
    IncompleteCrtTriplet,
    /// An RSA key has `dp`, `dq` and `qi` without the private key.
    #[strum(to_string = "RSA dp, dq and qi can appear only with the private key")]
    CrtWithoutPrivateKey,
    /// The per-key callback asked to stop the import.
    ///
    /// This is not a problem with the data; see [`ImportError::is_halt`].
    #[strum(to_string = "Import halted by the per-key callback")]
    CallbackHalted,
    /// The key file could not be read.
    #[strum(to_string = "Reading the key file failed")]
    Io,
}

impl bherror::BhError for ImportError {}

impl ImportError {
    /// Returns `true` if the import stopped because the caller asked it to,
    /// rather than because of bad input.
    ///
    /// A halt still travels as a root [`bherror::Error`], so it is logged as a
    /// warning when created, like any other import error.
    pub fn is_halt(&self) -> bool {
        matches!(self, Self::CallbackHalted)
    }
}

/// Error while exporting a JWK.
#[derive(strum_macros::Display, Debug, PartialEq, Clone)]
pub enum ExportError {
    /// The output does not fit the capacity provided by the caller.
    ///
    /// Carries the number of bytes needed followed by the capacity.
    #[strum(to_string = "Export needs {0} bytes, but only {1} are available")]
    ExportCapacityExceeded(usize, usize),
    /// The key file could not be written.
    #[strum(to_string = "Writing the key file failed")]
    Io,
}

impl bherror::BhError for ExportError {}
