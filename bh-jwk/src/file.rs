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

use std::{ops::ControlFlow, path::Path};

use bherror::traits::{ErrorContext as _, ForeignError as _};

use crate::{ExportError, ExportOptions, ImportError, Jwk};

impl Jwk {
    /// Reads a single JWK from the file at `path`.
    pub fn load(path: impl AsRef<Path>) -> bherror::Result<Jwk, ImportError> {
        let path = path.as_ref();
        let text = read_key_file(path)?;
        Jwk::import(&text).ctx(|| format!("key file {}", path.display()))
    }

    /// Reads every key of the JWK Set in the file at `path`, see
    /// [`Jwk::import_many`].
    pub fn load_many<F>(path: impl AsRef<Path>, per_key: F) -> bherror::Result<(), ImportError>
    where
        F: FnMut(Jwk) -> ControlFlow<()>,
    {
        let path = path.as_ref();
        let text = read_key_file(path)?;
        Jwk::import_many(&text, per_key).ctx(|| format!("key file {}", path.display()))
    }

    /// Writes the key, including its private part, to the file at `path`.
    ///
    /// The file holds the canonical JSON followed by a newline.
    pub fn save(&self, path: impl AsRef<Path>) -> bherror::Result<(), ExportError> {
        let path = path.as_ref();
        let text = self.canonical_json(&ExportOptions::private().with_trailing_newline());

        std::fs::write(path, text)
            .foreign_err(|| ExportError::Io)
            .ctx(|| format!("key file {}", path.display()))
    }
}

fn read_key_file(path: &Path) -> bherror::Result<String, ImportError> {
    std::fs::read_to_string(path)
        .foreign_err(|| ImportError::Io)
        .ctx(|| format!("key file {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::KeyType;

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("key.jwk");
        let jwk = Jwk::import(
            r#"{"kty":"RSA","n":"AQID","e":"AQAB","d":"BAUG","p":"BwgJ","q":"CgsM","kid":"r1"}"#,
        )
        .unwrap();

        jwk.save(&path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            text,
            "{\"d\":\"BAUG\",\"e\":\"AQAB\",\"kid\":\"r1\",\"kty\":\"RSA\",\"n\":\"AQID\",\"p\":\"BwgJ\",\"q\":\"CgsM\"}\n"
        );
        assert_eq!(Jwk::load(&path).unwrap(), jwk);
    }

    #[test]
    fn test_load_many() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("keys.jwks");
        std::fs::write(
            &path,
            r#"{"keys":[{"kty":"oct","k":"AQAB"},{"kty":"RSA","n":"AQID","e":"AQAB"}]}"#,
        )
        .unwrap();

        let mut types = Vec::new();
        Jwk::load_many(&path, |jwk| {
            types.push(jwk.key_type());
            ControlFlow::Continue(())
        })
        .unwrap();

        assert_eq!(types, [KeyType::Oct, KeyType::Rsa]);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();

        let error = Jwk::load(dir.path().join("missing.jwk")).unwrap_err();
        assert_eq!(error.error, ImportError::Io);
    }

    #[test]
    fn test_load_invalid_key() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("key.jwk");
        std::fs::write(&path, r#"{"kty":"oct"}"#).unwrap();

        let error = Jwk::load(&path).unwrap_err();
        assert_eq!(error.error, ImportError::MissingMandatoryField("k"));
    }

    #[test]
    fn test_save_to_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let jwk = Jwk::import(r#"{"kty":"oct","k":"AQAB"}"#).unwrap();

        let error = jwk.save(dir.path().join("no/such/dir/key.jwk")).unwrap_err();
        assert_eq!(error.error, ExportError::Io);
    }
}
