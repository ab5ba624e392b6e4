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

use bherror::Error;
use serde_json::{Map, Value};

use crate::{
    utils::{base64_encode, base64_url_encode},
    Element, ExportError, Jwk, KeyParams, KeyType, Meta, Slot,
};

/// A JWK as a JSON object, with members in canonical order.
pub type JsonObject = Map<String, Value>;

/// Operations needing the private part of an asymmetric key.
const PRIVATE_OPERATIONS: [&str; 2] = ["sign", "encrypt"];

/// Members of symmetric keys, in lexicographic order.
const OCT_MEMBERS: &[Slot] = &[
    Slot::Meta(Meta::Alg),
    Slot::Element(Element::K),
    Slot::Meta(Meta::KeyOps),
    Slot::Meta(Meta::Kid),
    Slot::Meta(Meta::Kty),
    Slot::Meta(Meta::Use),
    Slot::Meta(Meta::X5c),
];

/// Members of RSA keys, in lexicographic order.
const RSA_MEMBERS: &[Slot] = &[
    Slot::Meta(Meta::Alg),
    Slot::Element(Element::D),
    Slot::Element(Element::Dp),
    Slot::Element(Element::Dq),
    Slot::Element(Element::E),
    Slot::Meta(Meta::KeyOps),
    Slot::Meta(Meta::Kid),
    Slot::Meta(Meta::Kty),
    Slot::Element(Element::N),
    Slot::Element(Element::P),
    Slot::Element(Element::Q),
    Slot::Element(Element::Qi),
    Slot::Meta(Meta::Use),
    Slot::Meta(Meta::X5c),
];

/// Members of elliptic curve keys, in lexicographic order.
const EC_MEMBERS: &[Slot] = &[
    Slot::Meta(Meta::Alg),
    Slot::Element(Element::Crv),
    Slot::Element(Element::D),
    Slot::Meta(Meta::KeyOps),
    Slot::Meta(Meta::Kid),
    Slot::Meta(Meta::Kty),
    Slot::Meta(Meta::Use),
    Slot::Element(Element::X),
    Slot::Meta(Meta::X5c),
    Slot::Element(Element::Y),
];

/// What to include in an exported JWK.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExportOptions {
    /// Export the private part of RSA and EC keys.
    ///
    /// Without it, `use` is omitted and `sign` and `encrypt` are removed from
    /// `key_ops` of RSA and EC keys, since only the private key can perform
    /// them.
    pub include_private: bool,
    /// Terminate the output with a newline.
    pub trailing_newline: bool,
}

impl ExportOptions {
    /// Public export on a single line.
    pub const fn public() -> Self {
        Self {
            include_private: false,
            trailing_newline: false,
        }
    }

    /// Private export on a single line.
    pub const fn private() -> Self {
        Self {
            include_private: true,
            trailing_newline: false,
        }
    }

    /// The same options, terminating the output with a newline.
    pub const fn with_trailing_newline(self) -> Self {
        Self {
            trailing_newline: true,
            ..self
        }
    }
}

impl Jwk {
    /// The members of this key type, in the order of [RFC 7638][1].
    ///
    /// [1]: https://datatracker.ietf.org/doc/html/rfc7638#section-3
    pub(crate) fn canonical_members(&self) -> &'static [Slot] {
        match self.key_type() {
            KeyType::Oct => OCT_MEMBERS,
            KeyType::Rsa => RSA_MEMBERS,
            KeyType::Ec => EC_MEMBERS,
        }
    }

    fn member_value(&self, slot: Slot, options: &ExportOptions) -> Option<Value> {
        let redact = !options.include_private && self.key_type().is_asymmetric();

        match slot {
            Slot::Element(element) if element.is_private() && !options.include_private => None,
            Slot::Element(Element::Crv) => match &self.params {
                KeyParams::Ec(ec) => Some(Value::String(ec.crv.clone())),
                _ => None,
            },
            Slot::Element(element) => self
                .element(element)
                .map(|value| Value::String(base64_url_encode(value.as_bytes()))),
            Slot::Meta(Meta::Kty) => Some(Value::String(self.key_type().to_string())),
            Slot::Meta(Meta::Use) if redact => None,
            Slot::Meta(Meta::Use) => self.meta.key_use.clone().map(Value::String),
            Slot::Meta(Meta::Kid) => self.meta.kid.clone().map(Value::String),
            Slot::Meta(Meta::Alg) => self.meta.alg.clone().map(Value::String),
            Slot::Meta(Meta::KeyOps) => self.meta.key_ops.as_ref().map(|ops| {
                ops.iter()
                    .filter(|op| !redact || !PRIVATE_OPERATIONS.contains(&op.as_str()))
                    .map(|op| Value::String(op.clone()))
                    .collect()
            }),
            Slot::Meta(Meta::X5c) => self.meta.x5c.as_ref().map(|chain| {
                chain
                    .iter()
                    .map(|certificate| Value::String(base64_encode(certificate)))
                    .collect()
            }),
        }
    }

    /// The key as a JSON object, with members in canonical order.
    ///
    /// Binary members are `base64url` encoded without padding, `x5c`
    /// certificates are `base64` encoded, and `key_ops` and `x5c` are arrays.
    pub fn to_json_object(&self, options: &ExportOptions) -> JsonObject {
        self.canonical_members()
            .iter()
            .filter_map(|slot| {
                self.member_value(*slot, options)
                    .map(|value| (slot.name().to_owned(), value))
            })
            .collect()
    }

    /// The canonical JSON text of the key.
    ///
    /// Members are sorted as required by [RFC 7638][1] and no whitespace is
    /// added, apart from the optional trailing newline.
    ///
    /// # Examples
    ///
    /// ```
    /// use bh_jwk::{ExportOptions, Jwk};
    ///
    /// let jwk = Jwk::import(r#"{"kty":"oct","kid":"k1","k":"AQAB"}"#).unwrap();
    ///
    /// assert_eq!(
    ///     jwk.canonical_json(&ExportOptions::public()),
    ///     r#"{"k":"AQAB","kid":"k1","kty":"oct"}"#
    /// );
    /// ```
    ///
    /// [1]: https://datatracker.ietf.org/doc/html/rfc7638#section-3
    pub fn canonical_json(&self, options: &ExportOptions) -> String {
        let mut text = Value::Object(self.to_json_object(options)).to_string();
        if options.trailing_newline {
            text.push('\n');
        }
        text
    }

    /// Exports the key, failing if the text is longer than `capacity` bytes.
    ///
    /// The error reports the number of bytes needed.
    pub fn export(
        &self,
        options: &ExportOptions,
        capacity: usize,
    ) -> bherror::Result<String, ExportError> {
        let text = self.canonical_json(options);
        check_capacity(text.len(), capacity)?;
        Ok(text)
    }

    /// Exports the key into `buf`, returning the number of bytes written.
    ///
    /// Nothing is written if the text does not fit.
    pub fn export_into(
        &self,
        options: &ExportOptions,
        buf: &mut [u8],
    ) -> bherror::Result<usize, ExportError> {
        let text = self.canonical_json(options);
        check_capacity(text.len(), buf.len())?;
        buf[..text.len()].copy_from_slice(text.as_bytes());
        Ok(text.len())
    }
}

fn check_capacity(needed: usize, capacity: usize) -> bherror::Result<(), ExportError> {
    if needed > capacity {
        return Err(Error::root(ExportError::ExportCapacityExceeded(
            needed, capacity,
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    const RSA_PRIVATE: &str = r#"{"kty":"RSA","use":"sig","key_ops":["sign","verify"],
        "kid":"r1","alg":"RS256","n":"AQID","e":"AQAB","d":"BAUG","p":"BwgJ","q":"CgsM",
        "dp":"AQAB","dq":"AQID","qi":"BAUG","x5c":["3q2+7w=="]}"#;

    #[test]
    fn test_rsa_private_export_order() {
        let jwk = Jwk::import(RSA_PRIVATE).unwrap();

        assert_eq!(
            jwk.canonical_json(&ExportOptions::private()),
            concat!(
                r#"{"alg":"RS256","d":"BAUG","dp":"AQAB","dq":"AQID","e":"AQAB","#,
                r#""key_ops":["sign","verify"],"kid":"r1","kty":"RSA","n":"AQID","#,
                r#""p":"BwgJ","q":"CgsM","qi":"BAUG","use":"sig","x5c":["3q2+7w=="]}"#
            )
        );
    }

    #[test]
    fn test_rsa_public_export_is_redacted() {
        let jwk = Jwk::import(RSA_PRIVATE).unwrap();

        assert_eq!(
            jwk.canonical_json(&ExportOptions::public()),
            concat!(
                r#"{"alg":"RS256","e":"AQAB","key_ops":["verify"],"kid":"r1","#,
                r#""kty":"RSA","n":"AQID","x5c":["3q2+7w=="]}"#
            )
        );
    }

    #[test]
    fn test_redacted_key_ops_may_be_empty() {
        let jwk = Jwk::import(
            r#"{"kty":"EC","crv":"P-256","x":"AQAB","y":"AQID","key_ops":["sign"]}"#,
        )
        .unwrap();

        assert_eq!(
            jwk.canonical_json(&ExportOptions::public()),
            r#"{"crv":"P-256","key_ops":[],"kty":"EC","x":"AQAB","y":"AQID"}"#
        );
    }

    #[test]
    fn test_symmetric_keys_are_not_redacted() {
        let jwk = Jwk::import(r#"{"kty":"oct","k":"AQAB","use":"sig","key_ops":["sign"]}"#)
            .unwrap();

        assert_eq!(
            jwk.canonical_json(&ExportOptions::public()),
            r#"{"k":"AQAB","key_ops":["sign"],"kty":"oct","use":"sig"}"#
        );
    }

    #[test]
    fn test_ec_export_order() {
        let jwk = Jwk::import(
            r#"{"y":"AQID","x":"AQAB","kty":"EC","d":"BAUG","crv":"P-384","use":"enc","kid":"e"}"#,
        )
        .unwrap();

        assert_eq!(
            jwk.canonical_json(&ExportOptions::private()),
            r#"{"crv":"P-384","d":"BAUG","kid":"e","kty":"EC","use":"enc","x":"AQAB","y":"AQID"}"#
        );
        assert_eq!(
            jwk.canonical_json(&ExportOptions::public()),
            r#"{"crv":"P-384","kid":"e","kty":"EC","x":"AQAB","y":"AQID"}"#
        );
    }

    #[test]
    fn test_binary_members_are_unpadded() {
        let jwk = Jwk::import(r#"{"kty":"oct","k":"AQ=="}"#).unwrap();
        assert_eq!(
            jwk.canonical_json(&ExportOptions::public()),
            r#"{"k":"AQ","kty":"oct"}"#
        );
    }

    #[test]
    fn test_text_members_are_escaped() {
        let jwk = Jwk::import(r#"{"kty":"oct","k":"AQAB","kid":"a\"b\\c"}"#).unwrap();
        assert_eq!(
            jwk.canonical_json(&ExportOptions::public()),
            r#"{"k":"AQAB","kid":"a\"b\\c","kty":"oct"}"#
        );
    }

    #[test]
    fn test_trailing_newline() {
        let jwk = Jwk::import(r#"{"kty":"oct","k":"AQAB"}"#).unwrap();
        let text = jwk.canonical_json(&ExportOptions::private().with_trailing_newline());
        assert_eq!(text, "{\"k\":\"AQAB\",\"kty\":\"oct\"}\n");
    }

    #[test]
    fn test_round_trip() {
        let jwk = Jwk::import(RSA_PRIVATE).unwrap();
        let exported = jwk.canonical_json(&ExportOptions::private());

        assert_eq!(Jwk::import(&exported).unwrap(), jwk);

        let public = Jwk::import(&jwk.canonical_json(&ExportOptions::public())).unwrap();
        assert!(!public.is_private());
        assert_eq!(public.params, jwk.to_public().params);
    }

    #[test]
    fn test_round_trip_every_key_type() {
        let keys = [
            r#"{"kty":"EC","crv":"P-256","x":"AQAB","y":"AQID","d":"BAUG","kid":"ec"}"#,
            r#"{"kty":"oct","k":"AQAB","alg":"HS256","key_ops":["sign","verify"],
                "x5c":["3q2+7w=="]}"#,
            RSA_PRIVATE,
        ];

        for text in keys {
            let jwk = Jwk::import(text).unwrap();

            for options in [ExportOptions::private(), ExportOptions::public()] {
                let exported = jwk.canonical_json(&options);
                assert_eq!(jwk.canonical_json(&options), exported, "{text}");

                let reimported = Jwk::import(&exported).unwrap();
                assert_eq!(reimported.canonical_json(&options), exported, "{text}");
            }

            let exported = jwk.canonical_json(&ExportOptions::private());
            assert_eq!(Jwk::import(&exported).unwrap(), jwk, "{text}");
        }
    }

    #[test]
    fn test_export_capacity() {
        let jwk = Jwk::import(r#"{"kty":"oct","k":"AQAB"}"#).unwrap();
        let needed = r#"{"k":"AQAB","kty":"oct"}"#.len();

        let error = jwk.export(&ExportOptions::public(), needed - 1).unwrap_err();
        assert_matches!(error.error, ExportError::ExportCapacityExceeded(n, c) if n == needed && c == needed - 1);

        let text = jwk.export(&ExportOptions::public(), needed).unwrap();
        assert_eq!(text.len(), needed);
    }

    #[test]
    fn test_export_into() {
        let jwk = Jwk::import(r#"{"kty":"oct","k":"AQAB"}"#).unwrap();

        let mut small = [0u8; 8];
        let error = jwk
            .export_into(&ExportOptions::public(), &mut small)
            .unwrap_err();
        assert_matches!(error.error, ExportError::ExportCapacityExceeded(24, 8));
        assert_eq!(small, [0u8; 8]);

        let mut buf = [0u8; 64];
        let written = jwk.export_into(&ExportOptions::public(), &mut buf).unwrap();
        assert_eq!(&buf[..written], br#"{"k":"AQAB","kty":"oct"}"#);
    }

    #[test]
    fn test_to_json_object() {
        let jwk = Jwk::import(RSA_PRIVATE).unwrap();
        let object = jwk.to_json_object(&ExportOptions::public());

        let names: Vec<&str> = object.keys().map(String::as_str).collect();
        assert_eq!(names, ["alg", "e", "key_ops", "kid", "kty", "n", "x5c"]);
        assert_eq!(object["kty"], "RSA");
    }
}
