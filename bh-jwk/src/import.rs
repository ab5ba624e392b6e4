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

use std::ops::ControlFlow;

use bh_json_events::{Context, Event, EventHandler, ParseError, Tokenizer};
use bherror::{
    traits::{ErrorContext as _, ForeignError as _, PropagateError as _},
    Error,
};

use crate::{
    field_for_match,
    limits::{MAX_CERTIFICATE_BYTES, MAX_KEY_ELEMENT_BYTES},
    utils::{base64_decode, base64_url_decode},
    EcParams, Element, Encoding, FieldSpec, ImportError, Jwk, KeyElement, KeyParams, KeyType,
    Meta, Metadata, OctParams, Possibilities, RsaCrt, RsaParams, RsaPrivate, Slot,
    ValueAccumulator, DETACHED_PATHS, FIELDS, KEYS_ARRAY_PATHS, KEY_OBJECT_MATCH,
};

/// Callback receiving every key of a JWK Set, see [`Jwk::import_many`].
pub type PerKeyCallback<'c> = dyn FnMut(Jwk) -> ControlFlow<()> + 'c;

/// Members of a key object collected so far, before its key type is known.
#[derive(Debug, Default)]
struct KeyBuilder {
    elements: [Option<Vec<u8>>; Element::COUNT],
    kty: Option<KeyType>,
    meta: Metadata,
}

impl KeyBuilder {
    fn has(&self, slot: Slot) -> bool {
        match slot {
            Slot::Element(element) => self.elements[element.index()].is_some(),
            Slot::Meta(Meta::Kty) => self.kty.is_some(),
            Slot::Meta(Meta::Kid) => self.meta.kid.is_some(),
            Slot::Meta(Meta::Use) => self.meta.key_use.is_some(),
            Slot::Meta(Meta::KeyOps) => self.meta.key_ops.is_some(),
            Slot::Meta(Meta::X5c) => self.meta.x5c.is_some(),
            Slot::Meta(Meta::Alg) => self.meta.alg.is_some(),
        }
    }

    /// Starts the JSON array form of a list member.
    fn start_list(&mut self, field: &FieldSpec) -> bherror::Result<(), ImportError> {
        if self.has(field.slot) {
            return Err(Error::root(ImportError::DuplicateField(field.name)));
        }
        match field.slot {
            Slot::Meta(Meta::KeyOps) => self.meta.key_ops = Some(Vec::new()),
            Slot::Meta(Meta::X5c) => self.meta.x5c = Some(Vec::new()),
            _ => return Err(Error::root(ImportError::NonStringValue(field.name))),
        }
        Ok(())
    }

    /// Decodes a complete member value and stores it.
    fn store(
        &mut self,
        field: &FieldSpec,
        value: &[u8],
        possible: &mut Possibilities,
    ) -> bherror::Result<(), ImportError> {
        if field.slot == Slot::Meta(Meta::Kty) {
            let kty = decode_text(field, value)?.parse::<KeyType>()?;
            possible.declare(kty)?;
        }
        possible.narrow(field)?;

        if !field.array_element && self.has(field.slot) {
            return Err(Error::root(ImportError::DuplicateField(field.name)));
        }

        match (field.slot, field.encoding) {
            (Slot::Meta(Meta::Kty), _) => self.kty = possible.declared(),
            (Slot::Meta(Meta::Kid), _) => self.meta.kid = Some(decode_text(field, value)?),
            (Slot::Meta(Meta::Use), _) => self.meta.key_use = Some(decode_text(field, value)?),
            (Slot::Meta(Meta::Alg), _) => self.meta.alg = Some(decode_text(field, value)?),
            (Slot::Meta(Meta::KeyOps), _) => {
                let text = decode_text(field, value)?;
                let ops = self.meta.key_ops.get_or_insert_with(Vec::new);
                if field.array_element {
                    ops.push(text);
                } else {
                    // Legacy form, operations separated by spaces.
                    ops.extend(text.split(' ').filter(|op| !op.is_empty()).map(str::to_owned));
                }
            }
            (Slot::Meta(Meta::X5c), _) => {
                let certificate = decode_binary(field, value, MAX_CERTIFICATE_BYTES)?;
                self.meta
                    .x5c
                    .get_or_insert_with(Vec::new)
                    .push(certificate);
            }
            (Slot::Element(element), Encoding::Text) => {
                self.elements[element.index()] = Some(decode_text(field, value)?.into_bytes());
            }
            (Slot::Element(element), _) => {
                self.elements[element.index()] =
                    Some(decode_binary(field, value, MAX_KEY_ELEMENT_BYTES)?);
            }
        }

        Ok(())
    }

    fn take(&mut self, element: Element) -> Option<KeyElement> {
        self.elements[element.index()].take().map(KeyElement::new)
    }

    fn require(&mut self, element: Element) -> bherror::Result<KeyElement, ImportError> {
        self.take(element)
            .ok_or_else(|| Error::root(ImportError::MissingMandatoryField(element.name())))
    }

    /// Checks the whole key object and turns it into a [`Jwk`].
    fn finish(mut self, possible: &Possibilities) -> bherror::Result<Jwk, ImportError> {
        let kty = possible.finish()?;

        if let Some(missing) = FIELDS
            .iter()
            .find(|field| field.mandatory && field.owners.contains(kty) && !self.has(field.slot))
        {
            return Err(Error::root(ImportError::MissingMandatoryField(missing.name))
                .ctx(format!("{} is mandatory for {kty} keys", missing.name)));
        }

        let params = match kty {
            KeyType::Oct => KeyParams::Oct(OctParams {
                k: self.require(Element::K)?,
            }),
            KeyType::Rsa => KeyParams::Rsa(self.rsa_params()?),
            KeyType::Ec => KeyParams::Ec(self.ec_params()?),
        };

        if self.meta.key_use.is_some() && self.meta.key_ops.is_some() {
            tracing::debug!("JWK carries both use and key_ops");
        }

        Ok(Jwk {
            params,
            meta: self.meta,
        })
    }

    fn rsa_params(&mut self) -> bherror::Result<RsaParams, ImportError> {
        let n = self.require(Element::N)?;
        let e = self.require(Element::E)?;

        let private = match (
            self.take(Element::D),
            self.take(Element::P),
            self.take(Element::Q),
        ) {
            (None, None, None) => None,
            (Some(d), Some(p), Some(q)) => Some(RsaPrivate { d, p, q, crt: None }),
            _ => return Err(Error::root(ImportError::IncompletePrivateTriplet)),
        };

        let crt = match (
            self.take(Element::Dp),
            self.take(Element::Dq),
            self.take(Element::Qi),
        ) {
            (None, None, None) => None,
            (Some(dp), Some(dq), Some(qi)) => Some(RsaCrt { dp, dq, qi }),
            _ => return Err(Error::root(ImportError::IncompleteCrtTriplet)),
        };

        let private = match (private, crt) {
            (private, None) => private,
            (Some(private), crt @ Some(_)) => Some(RsaPrivate { crt, ..private }),
            (None, Some(_)) => return Err(Error::root(ImportError::CrtWithoutPrivateKey)),
        };

        Ok(RsaParams { n, e, private })
    }

    fn ec_params(&mut self) -> bherror::Result<EcParams, ImportError> {
        let crv = self.require(Element::Crv)?.into_bytes();
        // Stored from validated UTF-8 text.
        let crv = String::from_utf8(crv).foreign_err(|| ImportError::MalformedEncoding("crv"))?;

        Ok(EcParams {
            crv,
            x: self.require(Element::X)?,
            y: self.require(Element::Y)?,
            d: self.take(Element::D),
        })
    }
}

fn decode_text(field: &FieldSpec, value: &[u8]) -> bherror::Result<String, ImportError> {
    String::from_utf8(value.to_vec()).foreign_err(|| ImportError::MalformedEncoding(field.name))
}

fn decode_binary(
    field: &FieldSpec,
    value: &[u8],
    max_len: usize,
) -> bherror::Result<Vec<u8>, ImportError> {
    let bytes = match field.encoding {
        Encoding::Base64Cert => base64_decode(value),
        _ => base64_url_decode(value),
    }
    .foreign_err(|| ImportError::MalformedEncoding(field.name))?;

    if bytes.len() > max_len {
        return Err(Error::root(ImportError::OversizedValue(field.name))
            .ctx(format!("{} bytes decoded, at most {max_len} allowed", bytes.len())));
    }

    Ok(bytes)
}

/// Whether an array may start at the path of `field`.
fn accepts_list(field: &FieldSpec) -> bool {
    matches!(field.slot, Slot::Meta(meta) if meta.is_list()) && !field.array_element
}

/// State of a single import.
///
/// Every import owns its session; nothing is shared between imports.
struct ImportSession<'c> {
    builder: KeyBuilder,
    possible: Possibilities,
    accumulator: ValueAccumulator,
    per_key: Option<&'c mut PerKeyCallback<'c>>,
    imported: Option<Jwk>,
    key_count: usize,
}

impl<'c> ImportSession<'c> {
    fn new(per_key: Option<&'c mut PerKeyCallback<'c>>) -> Self {
        Self {
            builder: KeyBuilder::default(),
            possible: Possibilities::new(),
            accumulator: ValueAccumulator::new(),
            per_key,
            imported: None,
            key_count: 0,
        }
    }

    fn paths(&self) -> &'static [&'static str] {
        match self.per_key {
            Some(_) => &KEYS_ARRAY_PATHS,
            None => &DETACHED_PATHS,
        }
    }

    fn run(&mut self, text: &str) -> bherror::Result<(), ImportError> {
        match Tokenizer::new(self.paths()).parse(text.as_bytes(), self) {
            Ok(()) => Ok(()),
            Err(ParseError::Handler(error)) => Err(error),
            Err(ParseError::Syntax(error)) => Err(error).with_err(|| ImportError::Syntax),
        }
    }

    fn key_object_started(&mut self) {
        self.builder = KeyBuilder::default();
        self.possible.reset();
        self.accumulator.reset();
    }

    fn key_object_finished(&mut self) -> bherror::Result<(), ImportError> {
        let jwk = std::mem::take(&mut self.builder)
            .finish(&self.possible)
            .ctx(|| format!("key #{}", self.key_count))?;
        self.key_count += 1;
        tracing::debug!(kty = %jwk.key_type(), private = jwk.is_private(), "JWK imported");

        match self.per_key.as_mut() {
            Some(per_key) => {
                if per_key(jwk).is_break() {
                    tracing::info!(keys = self.key_count, "per-key callback halts import");
                    return Err(Error::root(ImportError::CallbackHalted));
                }
            }
            None => self.imported = Some(jwk),
        }

        Ok(())
    }

    /// A document without any key object carries no `kty` at all.
    fn parse_complete(&self) -> bherror::Result<(), ImportError> {
        if self.key_count == 0 {
            return Err(Error::root(ImportError::MissingMandatoryField("kty"))
                .ctx("no JWK object in the document"));
        }
        tracing::debug!(keys = self.key_count, "JWK import complete");
        Ok(())
    }

    fn member_event(
        &mut self,
        field: &'static FieldSpec,
        event: Event<'_>,
    ) -> bherror::Result<(), ImportError> {
        match event {
            Event::ValueStart => self.accumulator.reset(),
            Event::ValueChunk(chunk) => self.accumulator.push(field, chunk)?,
            Event::ValueComplete(chunk) => {
                self.accumulator.push(field, chunk)?;
                self.builder
                    .store(field, self.accumulator.as_bytes(), &mut self.possible)?;
                self.accumulator.reset();
            }
            Event::ArrayStart if accepts_list(field) => {
                self.possible.narrow(field)?;
                self.builder.start_list(field)?;
            }
            Event::ArrayEnd | Event::ObjectEnd => {}
            Event::ArrayStart | Event::ObjectStart | Event::Scalar(_) => {
                return Err(Error::root(ImportError::NonStringValue(field.name)));
            }
            Event::Complete => {}
        }
        Ok(())
    }
}

impl EventHandler for ImportSession<'_> {
    type Error = Error<ImportError>;

    fn on_event(&mut self, ctx: &Context<'_>, event: Event<'_>) -> Result<(), Self::Error> {
        match (ctx.path_match(), event) {
            (_, Event::Complete) => self.parse_complete(),
            (Some(KEY_OBJECT_MATCH), Event::ObjectStart) => {
                self.key_object_started();
                Ok(())
            }
            (Some(KEY_OBJECT_MATCH), Event::ObjectEnd) => self.key_object_finished(),
            (Some(path_match), event) => match field_for_match(path_match) {
                Some(field) => self
                    .member_event(field, event)
                    .ctx(|| format!("member {}", ctx.path())),
                None => Ok(()),
            },
            (None, _) => Ok(()),
        }
    }
}

impl Jwk {
    /// Imports a single JWK from its JSON text.
    ///
    /// The key object must be the top-level JSON value. Members are accepted
    /// in any order; unknown members are ignored.
    ///
    /// # Examples
    ///
    /// ```
    /// use bh_jwk::{Jwk, KeyType};
    ///
    /// let jwk = Jwk::import(r#"{"kty":"oct","k":"AyM1SysPpbyDfgZld3umj1qzKObwVMkoqQ-EstJQLr_T-1qS0gZH75aKtMN3Yj0iPS4hcgUuTwjAzZr1Z9CAow"}"#).unwrap();
    ///
    /// assert_eq!(jwk.key_type(), KeyType::Oct);
    /// assert!(!jwk.is_private());
    /// ```
    pub fn import(text: &str) -> bherror::Result<Jwk, ImportError> {
        let mut session = ImportSession::new(None);
        session.run(text)?;

        session
            .imported
            .ok_or_else(|| Error::root(ImportError::MissingMandatoryField("kty")))
    }

    /// Imports every JWK of a JWK Set, i.e. a `{"keys":[...]}` document.
    ///
    /// Each key is checked and handed to `per_key` as soon as its object
    /// ends. If `per_key` returns [`ControlFlow::Break`], the import stops
    /// with [`ImportError::CallbackHalted`]; use [`ImportError::is_halt`] to
    /// tell this apart from bad input. A document without any key object
    /// fails with [`ImportError::MissingMandatoryField`] for `kty`.
    pub fn import_many<F>(text: &str, mut per_key: F) -> bherror::Result<(), ImportError>
    where
        F: FnMut(Jwk) -> ControlFlow<()>,
    {
        let per_key: &mut PerKeyCallback<'_> = &mut per_key;
        let mut session = ImportSession::new(Some(per_key));
        session.run(text)
    }
}
