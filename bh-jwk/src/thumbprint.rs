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

//! JWK Thumbprints as defined in [RFC 7638][1].
//!
//! [1]: https://datatracker.ietf.org/doc/html/rfc7638

use openssl::sha::sha256;
use serde_json::Value;

use crate::{utils::base64_url_encode, ExportOptions, Jwk, KeyType};

impl Jwk {
    /// Names of the members hashed into the thumbprint, in lexicographic
    /// order.
    fn thumbprint_members(&self) -> &'static [&'static str] {
        match self.key_type() {
            KeyType::Oct => &["k", "kty"],
            KeyType::Rsa => &["e", "kty", "n"],
            KeyType::Ec => &["crv", "kty", "x", "y"],
        }
    }

    /// Computes the _JWK SHA-256 Thumbprint_ of the key.
    ///
    /// Only the required members of the public key take part, so a private
    /// key and its public part have the same thumbprint.
    pub fn thumbprint_sha256(&self) -> [u8; 32] {
        let required = self.thumbprint_members();
        let mut object = self.to_json_object(&ExportOptions::public());
        object.retain(|name, _| required.contains(&name.as_str()));

        sha256(Value::Object(object).to_string().as_bytes())
    }

    /// The SHA-256 thumbprint, `base64url`-encoded without padding.
    pub fn thumbprint_sha256_b64(&self) -> String {
        base64_url_encode(self.thumbprint_sha256())
    }
}
