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

use std::str::FromStr;

use bherror::Error;

use crate::{FieldSpec, ImportError};

/// The key types a JWK may have, as named by its `kty` member.
///
/// See [RFC 7518, Section 6.1][1].
///
/// [1]: https://datatracker.ietf.org/doc/html/rfc7518#section-6.1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyType {
    /// Octet sequence, i.e. a symmetric key.
    Oct,
    /// RSA key pair or public key.
    Rsa,
    /// Elliptic curve key pair or public key.
    Ec,
}

/// JWK `"kty"` value for symmetric keys.
pub const KTY_OCT: &str = "oct";
/// JWK `"kty"` value for RSA keys.
pub const KTY_RSA: &str = "RSA";
/// JWK `"kty"` value for elliptic curve keys.
pub const KTY_EC: &str = "EC";

impl KeyType {
    /// The `kty` name of the key type.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Oct => KTY_OCT,
            Self::Rsa => KTY_RSA,
            Self::Ec => KTY_EC,
        }
    }

    /// Returns `true` for key types with a public and a private part.
    pub fn is_asymmetric(&self) -> bool {
        match self {
            Self::Oct => false,
            Self::Rsa | Self::Ec => true,
        }
    }
}

impl FromStr for KeyType {
    type Err = Error<ImportError>;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            KTY_OCT => Ok(Self::Oct),
            KTY_RSA => Ok(Self::Rsa),
            KTY_EC => Ok(Self::Ec),
            _ => Err(Error::root(ImportError::UnknownKeyType(value.to_string()))),
        }
    }
}

impl std::fmt::Display for KeyType {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A set of [`KeyType`]s.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct KeyTypeSet(u8);

impl KeyTypeSet {
    /// The empty set.
    pub const EMPTY: Self = Self(0);
    /// Only [`KeyType::Oct`].
    pub const OCT: Self = Self::of(KeyType::Oct);
    /// Only [`KeyType::Rsa`].
    pub const RSA: Self = Self::of(KeyType::Rsa);
    /// Only [`KeyType::Ec`].
    pub const EC: Self = Self::of(KeyType::Ec);
    /// Every key type.
    pub const ALL: Self = Self::OCT.union(Self::RSA).union(Self::EC);

    const fn bit(kty: KeyType) -> u8 {
        match kty {
            KeyType::Oct => 1,
            KeyType::Rsa => 2,
            KeyType::Ec => 4,
        }
    }

    /// The set containing only `kty`.
    pub const fn of(kty: KeyType) -> Self {
        Self(Self::bit(kty))
    }

    /// Key types in either set.
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Key types in both sets.
    pub const fn intersect(self, other: Self) -> Self {
        Self(self.0 & other.0)
    }

    /// Returns `true` if no key type is in the set.
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Returns `true` if `kty` is in the set.
    pub const fn contains(self, kty: KeyType) -> bool {
        self.0 & Self::bit(kty) != 0
    }

    /// The key type, if it is the only one in the set.
    pub fn single(self) -> Option<KeyType> {
        let mut iter = self.iter();
        match (iter.next(), iter.next()) {
            (Some(kty), None) => Some(kty),
            _ => None,
        }
    }

    /// Iterates over the key types in the set.
    pub fn iter(self) -> impl Iterator<Item = KeyType> {
        [KeyType::Oct, KeyType::Rsa, KeyType::Ec]
            .into_iter()
            .filter(move |kty| self.contains(*kty))
    }
}

impl std::fmt::Debug for KeyTypeSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

/// Tracks which key types a JWK may still have while its members arrive.
///
/// JSON does not order object members, and some producers order them
/// alphabetically, which places `kty` after `crv` or `e`. Each member seen
/// therefore narrows the candidates down to the key types allowed to carry
/// it, and `kty` finally picks one of the remaining candidates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Possibilities {
    candidates: KeyTypeSet,
    declared: Option<KeyType>,
}

impl Default for Possibilities {
    fn default() -> Self {
        Self::new()
    }
}

impl Possibilities {
    /// Every key type is possible and none is declared.
    pub fn new() -> Self {
        Self {
            candidates: KeyTypeSet::ALL,
            declared: None,
        }
    }

    /// Starts over for a new key object.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// The key types still possible.
    pub fn candidates(&self) -> KeyTypeSet {
        self.candidates
    }

    /// The key type named by `kty`, once seen.
    pub fn declared(&self) -> Option<KeyType> {
        self.declared
    }

    /// Narrows the candidates to those allowed to carry `field`.
    pub fn narrow(&mut self, field: &FieldSpec) -> bherror::Result<(), ImportError> {
        let narrowed = self.candidates.intersect(field.owners);
        if narrowed.is_empty() {
            return Err(Error::root(ImportError::FieldTypeMismatch(field.name))
                .ctx(format!("{} is possible only for {:?}", field.name, field.owners))
                .ctx(format!("remaining candidates were {:?}", self.candidates)));
        }
        self.candidates = narrowed;
        Ok(())
    }

    /// Records the key type named by `kty`, which must still be a candidate.
    pub fn declare(&mut self, kty: KeyType) -> bherror::Result<(), ImportError> {
        if !self.candidates.contains(kty) {
            return Err(Error::root(ImportError::FieldTypeMismatch("kty"))
                .ctx(format!("kty is {kty}, but the members seen allow only {:?}", self.candidates)));
        }
        self.candidates = KeyTypeSet::of(kty);
        self.declared = Some(kty);
        Ok(())
    }

    /// The key type of the finished key object.
    pub fn finish(&self) -> bherror::Result<KeyType, ImportError> {
        match self.declared {
            Some(kty) if self.candidates.single() == Some(kty) => Ok(kty),
            _ => Err(Error::root(ImportError::MissingMandatoryField("kty"))),
        }
    }
}
