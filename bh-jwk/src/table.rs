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

//! The table of legal JWK members.

use crate::{
    limits::{MAX_ENCODED_CERTIFICATE_LEN, MAX_ENCODED_KEY_ELEMENT_LEN, MAX_TEXT_BYTES},
    KeyTypeSet,
};

/// Key material members.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Element {
    /// Symmetric key value.
    K,
    /// RSA public exponent.
    E,
    /// RSA modulus.
    N,
    /// RSA private exponent or EC private key.
    D,
    /// RSA first prime factor.
    P,
    /// RSA second prime factor.
    Q,
    /// RSA first factor CRT exponent.
    Dp,
    /// RSA second factor CRT exponent.
    Dq,
    /// RSA first CRT coefficient.
    Qi,
    /// EC curve name.
    Crv,
    /// EC x coordinate.
    X,
    /// EC y coordinate.
    Y,
}

impl Element {
    /// Number of elements.
    pub const COUNT: usize = 12;

    /// Index of the element, below [`Element::COUNT`].
    pub const fn index(self) -> usize {
        self as usize
    }

    /// The member name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::K => "k",
            Self::E => "e",
            Self::N => "n",
            Self::D => "d",
            Self::P => "p",
            Self::Q => "q",
            Self::Dp => "dp",
            Self::Dq => "dq",
            Self::Qi => "qi",
            Self::Crv => "crv",
            Self::X => "x",
            Self::Y => "y",
        }
    }

    /// Returns `true` for elements which are part of a private key only.
    pub const fn is_private(self) -> bool {
        matches!(
            self,
            Self::D | Self::P | Self::Q | Self::Dp | Self::Dq | Self::Qi
        )
    }
}

/// Metadata members, shared by every key type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Meta {
    /// Key type.
    Kty,
    /// Key ID.
    Kid,
    /// Public key use.
    Use,
    /// Key operations.
    KeyOps,
    /// X.509 certificate chain.
    X5c,
    /// Algorithm.
    Alg,
}

impl Meta {
    /// The member name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Kty => "kty",
            Self::Kid => "kid",
            Self::Use => "use",
            Self::KeyOps => "key_ops",
            Self::X5c => "x5c",
            Self::Alg => "alg",
        }
    }

    /// Returns `true` for members which hold a JSON array of strings.
    pub const fn is_list(self) -> bool {
        matches!(self, Self::KeyOps | Self::X5c)
    }
}

/// Where a member is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    /// Key material.
    Element(Element),
    /// Metadata.
    Meta(Meta),
}

impl Slot {
    /// The member name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Element(element) => element.name(),
            Self::Meta(meta) => meta.name(),
        }
    }
}

/// How the string value of a member is encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Encoding {
    /// Binary data, `base64url` encoded.
    Base64Url,
    /// Binary data, `base64` encoded with the standard alphabet, as used for
    /// certificates.
    Base64Cert,
    /// Text taken as is.
    Text,
}

/// Legality rules of a JWK member.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// The member name.
    pub name: &'static str,
    /// The key types allowed to carry the member.
    pub owners: KeyTypeSet,
    /// Whether every key of the owning types must carry the member.
    pub mandatory: bool,
    /// How the value is encoded.
    pub encoding: Encoding,
    /// Where the value is stored.
    pub slot: Slot,
    /// Whether this entry stands for one element of the JSON array form of
    /// a list member, rather than for the member itself.
    pub array_element: bool,
}

impl FieldSpec {
    const fn new(
        owners: KeyTypeSet,
        mandatory: bool,
        encoding: Encoding,
        slot: Slot,
        array_element: bool,
    ) -> Self {
        Self {
            name: slot.name(),
            owners,
            mandatory,
            encoding,
            slot,
            array_element,
        }
    }

    const fn element(owners: KeyTypeSet, mandatory: bool, element: Element) -> Self {
        let encoding = match element {
            Element::Crv => Encoding::Text,
            _ => Encoding::Base64Url,
        };
        Self::new(owners, mandatory, encoding, Slot::Element(element), false)
    }

    const fn meta(encoding: Encoding, meta: Meta, array_element: bool) -> Self {
        let mandatory = matches!(meta, Meta::Kty);
        Self::new(
            KeyTypeSet::ALL,
            mandatory,
            encoding,
            Slot::Meta(meta),
            array_element,
        )
    }

    /// Returns `true` for metadata members.
    pub const fn is_metadata(&self) -> bool {
        matches!(self.slot, Slot::Meta(_))
    }

    /// The maximum length of the encoded value.
    pub const fn max_encoded_len(&self) -> usize {
        match self.encoding {
            Encoding::Base64Url => MAX_ENCODED_KEY_ELEMENT_LEN,
            Encoding::Base64Cert => MAX_ENCODED_CERTIFICATE_LEN,
            Encoding::Text => MAX_TEXT_BYTES,
        }
    }
}

const RSA: KeyTypeSet = KeyTypeSet::RSA;
const EC: KeyTypeSet = KeyTypeSet::EC;
const OCT: KeyTypeSet = KeyTypeSet::OCT;
const RSA_EC: KeyTypeSet = KeyTypeSet::RSA.union(KeyTypeSet::EC);

/// Every legal JWK member.
///
/// Entry `i` corresponds to entry `i + 1` of [`DETACHED_PATHS`] and
/// [`KEYS_ARRAY_PATHS`], whose entry `0` is the key object itself.
pub static FIELDS: [FieldSpec; 20] = [
    FieldSpec::element(RSA, true, Element::E),
    FieldSpec::element(RSA, true, Element::N),
    FieldSpec::element(RSA_EC, false, Element::D),
    FieldSpec::element(RSA, false, Element::P),
    FieldSpec::element(RSA, false, Element::Q),
    FieldSpec::element(RSA, false, Element::Dp),
    FieldSpec::element(RSA, false, Element::Dq),
    FieldSpec::element(RSA, false, Element::Qi),
    FieldSpec::meta(Encoding::Text, Meta::Kty, false),
    FieldSpec::element(OCT, true, Element::K),
    FieldSpec::element(EC, true, Element::Crv),
    FieldSpec::element(EC, true, Element::X),
    FieldSpec::element(EC, true, Element::Y),
    FieldSpec::meta(Encoding::Text, Meta::Kid, false),
    FieldSpec::meta(Encoding::Text, Meta::Use, false),
    FieldSpec::meta(Encoding::Text, Meta::KeyOps, false),
    FieldSpec::meta(Encoding::Text, Meta::KeyOps, true),
    FieldSpec::meta(Encoding::Base64Cert, Meta::X5c, false),
    FieldSpec::meta(Encoding::Base64Cert, Meta::X5c, true),
    FieldSpec::meta(Encoding::Text, Meta::Alg, false),
];

/// Path match index of the key object itself.
pub const KEY_OBJECT_MATCH: usize = 0;

/// Paths of the members of a detached JWK, i.e. one which is the top-level
/// JSON object.
pub static DETACHED_PATHS: [&str; 21] = [
    "",
    "e",
    "n",
    "d",
    "p",
    "q",
    "dp",
    "dq",
    "qi",
    "kty",
    "k",
    "crv",
    "x",
    "y",
    "kid",
    "use",
    "key_ops",
    "key_ops[]",
    "x5c",
    "x5c[]",
    "alg",
];

/// Paths of the members of the JWKs in a JWK Set, i.e. a `{"keys":[...]}`
/// document.
pub static KEYS_ARRAY_PATHS: [&str; 21] = [
    "keys[]",
    "keys[].e",
    "keys[].n",
    "keys[].d",
    "keys[].p",
    "keys[].q",
    "keys[].dp",
    "keys[].dq",
    "keys[].qi",
    "keys[].kty",
    "keys[].k",
    "keys[].crv",
    "keys[].x",
    "keys[].y",
    "keys[].kid",
    "keys[].use",
    "keys[].key_ops",
    "keys[].key_ops[]",
    "keys[].x5c",
    "keys[].x5c[]",
    "keys[].alg",
];

/// The member a path match index refers to, or [`None`] for the key object
/// itself and for indices outside the table.
pub fn field_for_match(path_match: usize) -> Option<&'static FieldSpec> {
    FIELDS.get(path_match.checked_sub(1)?)
}
