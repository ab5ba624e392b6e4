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

//! Size limits applied while importing a JWK.
//!
//! Every member value is bounded twice: its encoded text is bounded while it
//! is being accumulated, and the decoded bytes of binary members are bounded
//! again after decoding.

/// Maximum decoded size of a single key element, e.g. an RSA modulus.
///
/// Enough for 4096-bit RSA keys.
pub const MAX_KEY_ELEMENT_BYTES: usize = 4096 / 8;

/// Maximum decoded size of a single `x5c` certificate.
pub const MAX_CERTIFICATE_BYTES: usize = 8192;

/// Maximum size of an opaque text member such as `kid`, `alg` or `crv`.
pub const MAX_TEXT_BYTES: usize = 1024;

/// Number of base64 characters needed to encode `len` bytes, with padding.
pub const fn base64_len(len: usize) -> usize {
    len.div_ceil(3) * 4
}

/// Maximum encoded length of a `base64url` key element.
pub const MAX_ENCODED_KEY_ELEMENT_LEN: usize = base64_len(MAX_KEY_ELEMENT_BYTES);

/// Maximum encoded length of a `base64` certificate.
pub const MAX_ENCODED_CERTIFICATE_LEN: usize = base64_len(MAX_CERTIFICATE_BYTES);

/// Capacity of the per-session value buffer: the largest encoded length any
/// member may have.
pub const VALUE_BUFFER_CAPACITY: usize = {
    let mut max = MAX_ENCODED_KEY_ELEMENT_LEN;
    if MAX_ENCODED_CERTIFICATE_LEN > max {
        max = MAX_ENCODED_CERTIFICATE_LEN;
    }
    if MAX_TEXT_BYTES > max {
        max = MAX_TEXT_BYTES;
    }
    max
};
