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

use crate::{Element, KeyType};

/// The bytes of a single key element, e.g. an RSA modulus.
///
/// The [`Debug`] representation shows the length only, so that key material
/// does not end up in logs.
#[derive(Clone, PartialEq, Eq)]
pub struct KeyElement(Vec<u8>);

impl KeyElement {
    /// Wraps the given bytes.
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// The element bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Number of bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the element has no bytes.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Unwraps the bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }
}

impl From<Vec<u8>> for KeyElement {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl From<&[u8]> for KeyElement {
    fn from(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }
}

impl std::fmt::Debug for KeyElement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "KeyElement({} bytes)", self.0.len())
    }
}

/// Parameters of a symmetric key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OctParams {
    /// The key value.
    pub k: KeyElement,
}

/// Parameters of an RSA key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RsaParams {
    /// Modulus.
    pub n: KeyElement,
    /// Public exponent.
    pub e: KeyElement,
    /// The private part, absent for public keys.
    pub private: Option<RsaPrivate>,
}

/// The private part of an RSA key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RsaPrivate {
    /// Private exponent.
    pub d: KeyElement,
    /// First prime factor.
    pub p: KeyElement,
    /// Second prime factor.
    pub q: KeyElement,
    /// Precomputed CRT terms, if present.
    pub crt: Option<RsaCrt>,
}

/// Precomputed Chinese Remainder Theorem terms of an RSA private key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RsaCrt {
    /// First factor CRT exponent.
    pub dp: KeyElement,
    /// Second factor CRT exponent.
    pub dq: KeyElement,
    /// First CRT coefficient.
    pub qi: KeyElement,
}

/// Parameters of an elliptic curve key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EcParams {
    /// Curve name, e.g. `P-256`.
    pub crv: String,
    /// x coordinate.
    pub x: KeyElement,
    /// y coordinate.
    pub y: KeyElement,
    /// The private key, absent for public keys.
    pub d: Option<KeyElement>,
}

/// Key material of a [`Jwk`], one variant per key type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyParams {
    /// Symmetric key.
    Oct(OctParams),
    /// RSA key.
    Rsa(RsaParams),
    /// Elliptic curve key.
    Ec(EcParams),
}

/// Members shared by every key type, other than `kty`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metadata {
    /// Key ID (`kid`).
    pub kid: Option<String>,
    /// Public key use (`use`), e.g. `sig` or `enc`.
    pub key_use: Option<String>,
    /// Key operations (`key_ops`), e.g. `sign` or `verify`.
    ///
    /// Both `use` and `key_ops` may be present, even though RFC 7517 says
    /// they should not be used together.
    pub key_ops: Option<Vec<String>>,
    /// X.509 certificate chain (`x5c`), DER encoded.
    pub x5c: Option<Vec<Vec<u8>>>,
    /// Algorithm (`alg`).
    pub alg: Option<String>,
}

/// A JSON Web Key, as defined in [RFC 7517][1].
///
/// Values of this type always satisfy the structural rules of the format:
/// RSA private keys carry all of `d`, `p` and `q`, and the CRT terms come all
/// together and only with a private key.
///
/// [1]: https://datatracker.ietf.org/doc/html/rfc7517
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Jwk {
    /// Key material.
    pub params: KeyParams,
    /// Metadata.
    pub meta: Metadata,
}

impl Jwk {
    /// Constructs a key without metadata.
    pub fn new(params: KeyParams) -> Self {
        Self {
            params,
            meta: Metadata::default(),
        }
    }

    /// The key type.
    pub fn key_type(&self) -> KeyType {
        match self.params {
            KeyParams::Oct(_) => KeyType::Oct,
            KeyParams::Rsa(_) => KeyType::Rsa,
            KeyParams::Ec(_) => KeyType::Ec,
        }
    }

    /// Returns `true` for RSA and EC keys holding their private part.
    ///
    /// Symmetric keys are never flagged private.
    pub fn is_private(&self) -> bool {
        match &self.params {
            KeyParams::Oct(_) => false,
            KeyParams::Rsa(rsa) => rsa.private.is_some(),
            KeyParams::Ec(ec) => ec.d.is_some(),
        }
    }

    /// Returns a copy of the key with the private part removed.
    pub fn to_public(&self) -> Self {
        let params = match &self.params {
            KeyParams::Oct(oct) => KeyParams::Oct(oct.clone()),
            KeyParams::Rsa(rsa) => KeyParams::Rsa(RsaParams {
                private: None,
                ..rsa.clone()
            }),
            KeyParams::Ec(ec) => KeyParams::Ec(EcParams {
                d: None,
                ..ec.clone()
            }),
        };

        Self {
            params,
            meta: self.meta.clone(),
        }
    }

    /// The binary key element, if the key has it.
    ///
    /// Returns [`None`] for [`Element::Crv`], which is text; see
    /// [`EcParams::crv`].
    pub fn element(&self, element: Element) -> Option<&KeyElement> {
        match (&self.params, element) {
            (KeyParams::Oct(oct), Element::K) => Some(&oct.k),
            (KeyParams::Rsa(rsa), Element::N) => Some(&rsa.n),
            (KeyParams::Rsa(rsa), Element::E) => Some(&rsa.e),
            (KeyParams::Rsa(rsa), Element::D) => rsa.private.as_ref().map(|private| &private.d),
            (KeyParams::Rsa(rsa), Element::P) => rsa.private.as_ref().map(|private| &private.p),
            (KeyParams::Rsa(rsa), Element::Q) => rsa.private.as_ref().map(|private| &private.q),
            (KeyParams::Rsa(rsa), Element::Dp) => rsa_crt(rsa).map(|crt| &crt.dp),
            (KeyParams::Rsa(rsa), Element::Dq) => rsa_crt(rsa).map(|crt| &crt.dq),
            (KeyParams::Rsa(rsa), Element::Qi) => rsa_crt(rsa).map(|crt| &crt.qi),
            (KeyParams::Ec(ec), Element::X) => Some(&ec.x),
            (KeyParams::Ec(ec), Element::Y) => Some(&ec.y),
            (KeyParams::Ec(ec), Element::D) => ec.d.as_ref(),
            _ => None,
        }
    }
}

fn rsa_crt(rsa: &RsaParams) -> Option<&RsaCrt> {
    rsa.private.as_ref().and_then(|private| private.crt.as_ref())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn element(bytes: &[u8]) -> KeyElement {
        KeyElement::from(bytes)
    }

    fn rsa_private() -> Jwk {
        Jwk::new(KeyParams::Rsa(RsaParams {
            n: element(&[1, 2, 3]),
            e: element(&[1, 0, 1]),
            private: Some(RsaPrivate {
                d: element(&[4]),
                p: element(&[5]),
                q: element(&[6]),
                crt: Some(RsaCrt {
                    dp: element(&[7]),
                    dq: element(&[8]),
                    qi: element(&[9]),
                }),
            }),
        }))
    }

    #[test]
    fn test_is_private() {
        let rsa = rsa_private();
        assert!(rsa.is_private());
        assert!(!rsa.to_public().is_private());

        let oct = Jwk::new(KeyParams::Oct(OctParams { k: element(b"secret") }));
        assert!(!oct.is_private());
        assert_eq!(oct.key_type(), KeyType::Oct);
    }

    #[test]
    fn test_to_public_keeps_metadata() {
        let mut ec = Jwk::new(KeyParams::Ec(EcParams {
            crv: "P-256".to_owned(),
            x: element(&[1]),
            y: element(&[2]),
            d: Some(element(&[3])),
        }));
        ec.meta.kid = Some("1".to_owned());

        let public = ec.to_public();

        assert!(ec.is_private());
        assert!(!public.is_private());
        assert_eq!(public.meta, ec.meta);
        assert_eq!(public.element(Element::X), ec.element(Element::X));
        assert_eq!(public.element(Element::D), None);
    }

    #[test]
    fn test_element_lookup() {
        let rsa = rsa_private();

        assert_eq!(rsa.element(Element::Qi).unwrap().as_bytes(), [9]);
        assert_eq!(rsa.element(Element::N).unwrap().len(), 3);
        assert_eq!(rsa.element(Element::X), None);
        assert_eq!(rsa.element(Element::Crv), None);
    }

    #[test]
    fn test_debug_hides_key_material() {
        let debug = format!("{:?}", element(&[0xAA; 32]));
        assert_eq!(debug, "KeyElement(32 bytes)");
    }
}
