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

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! This crate provides import and export of [JSON Web Keys (JWK)][1].
//!
//! [1]: https://datatracker.ietf.org/doc/html/rfc7517
//!
//! # Details
//!
//! Keys are imported with [`Jwk::import`], or [`Jwk::import_many`] for a JWK
//! Set, straight from the JSON text. The text is tokenized by
//! [`bh_json_events`] and every member is checked against the [`FIELDS`]
//! table as soon as it is read, so a member that no key type allows next to
//! the members before it is rejected on the spot. A successfully imported
//! [`Jwk`] is always structurally valid: mandatory members are present and
//! RSA private keys are complete.
//!
//! Keys are exported in the canonical form of [RFC 7638][2], members sorted
//! and without whitespace, by [`Jwk::canonical_json`]. Unless
//! [`ExportOptions::include_private`] is set, the private part of RSA and EC
//! keys is left out together with `use` and the private-only `key_ops`.
//!
//! Key material is kept in plain byte buffers and never interpreted; this
//! crate does no cryptography apart from the optional SHA-256 thumbprint,
//! available under the default feature `openssl`.
//!
//! [2]: https://datatracker.ietf.org/doc/html/rfc7638
//!
//! # Examples
//!
//! ## Import and export a key
//!
//! ```
//! use bh_jwk::{ExportOptions, Jwk, KeyType};
//!
//! let jwk = Jwk::import(
//!     r#"{"kty":"EC","crv":"P-256","kid":"1",
//!         "x":"MKBCTNIcKUSDii11ySs3526iDZ8AiTo7Tu6KPAqv7D4",
//!         "y":"4Etl6SRW2YiLUrN5vfvVHuhp7x8PxltmWWlbbM4IFyM",
//!         "d":"870MB6gfuTJ4HtUnUvYMyJpr5eUZNP4Bk43bVdj3eAE"}"#,
//! )
//! .unwrap();
//!
//! assert_eq!(jwk.key_type(), KeyType::Ec);
//! assert!(jwk.is_private());
//!
//! let public = jwk.canonical_json(&ExportOptions::public());
//! assert!(!public.contains("\"d\""));
//! assert!(public.starts_with(r#"{"crv":"P-256","kid":"1","kty":"EC","#));
//! ```
//!
//! ## Process the keys of a JWK Set
//!
//! ```
//! use std::ops::ControlFlow;
//!
//! use bh_jwk::Jwk;
//!
//! let text = r#"{"keys":[{"kty":"oct","k":"AQAB","kid":"a"},{"kty":"oct","k":"AQID","kid":"b"}]}"#;
//!
//! // Stop as soon as the wanted key is found.
//! let mut found = None;
//! let result = Jwk::import_many(text, |jwk| {
//!     if jwk.meta.kid.as_deref() == Some("a") {
//!         found = Some(jwk);
//!         ControlFlow::Break(())
//!     } else {
//!         ControlFlow::Continue(())
//!     }
//! });
//!
//! assert!(result.unwrap_err().error.is_halt());
//! assert!(found.is_some());
//! ```

#[cfg(feature = "openssl")]
mod thumbprint;

mod accumulator;
mod error;
mod export;
mod file;
mod import;
mod key;
mod key_type;
pub mod limits;
mod set;
mod table;
mod utils;

pub use accumulator::*;
pub use error::*;
pub use export::*;
pub use import::*;
pub use key::*;
pub use key_type::*;
pub use set::*;
pub use table::*;
pub use utils::*;
