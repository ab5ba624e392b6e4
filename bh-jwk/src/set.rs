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

use bherror::traits::{ErrorContext as _, ForeignError as _};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::{ExportOptions, ImportError, Jwk, JsonObject};

impl Jwk {
    /// Imports every key of a JWK Set.
    ///
    /// Fails on the first invalid key; see [`Jwk::import_many`] to process
    /// keys as they are read.
    pub fn import_set(text: &str) -> bherror::Result<Vec<Jwk>, ImportError> {
        let mut keys = Vec::new();
        Jwk::import_many(text, |jwk| {
            keys.push(jwk);
            ControlFlow::Continue(())
        })?;
        Ok(keys)
    }

    /// Imports a single JWK from a JSON object.
    pub fn from_json_object(object: &JsonObject) -> bherror::Result<Jwk, ImportError> {
        let text = serde_json::to_string(object).foreign_err(|| ImportError::Syntax)?;
        Jwk::import(&text)
    }
}

/// Serializes the public part of the key only.
///
/// Use [`Jwk::to_json_object`] with [`ExportOptions::private`] to serialize
/// a private key.
impl Serialize for Jwk {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.to_json_object(&ExportOptions::public())
            .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Jwk {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let object = JsonObject::deserialize(deserializer)?;
        Jwk::from_json_object(&object).map_err(serde::de::Error::custom)
    }
}

/// Models JWK Set, a JSON object holding an array of JWKs under `keys`.
///
/// For more details see [RFC7517][RFC].
///
/// [RFC]: https://datatracker.ietf.org/doc/html/rfc7517#section-5
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
pub struct JwkSet {
    /// The keys of the set.
    pub keys: Vec<Jwk>,
}

impl JwkSet {
    /// Create empty `JwkSet`.
    pub fn empty() -> Self {
        JwkSet { keys: vec![] }
    }

    /// Imports a JWK Set from its JSON text.
    ///
    /// A set without any key is rejected, like every document without a
    /// `kty`.
    pub fn import(text: &str) -> bherror::Result<Self, ImportError> {
        let keys = Jwk::import_set(text).ctx(|| "JWK Set")?;
        Ok(JwkSet { keys })
    }

    /// Exports the set, each key in canonical form.
    pub fn export(&self, options: &ExportOptions) -> String {
        let keys = self
            .keys
            .iter()
            .map(|jwk| Value::Object(jwk.to_json_object(options)))
            .collect();

        let mut set = JsonObject::new();
        set.insert("keys".to_owned(), Value::Array(keys));

        let mut text = Value::Object(set).to_string();
        if options.trailing_newline {
            text.push('\n');
        }
        text
    }

    /// Finds a key by its `kid`.
    pub fn find(&self, kid: &str) -> Option<&Jwk> {
        self.keys
            .iter()
            .find(|jwk| jwk.meta.kid.as_deref() == Some(kid))
    }
}
