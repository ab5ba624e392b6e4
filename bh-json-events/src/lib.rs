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

//! This crate provides an event-driven JSON tokenizer.
//!
//! The [`Tokenizer`] scans raw JSON bytes and pushes typed [`Event`]s into an
//! [`EventHandler`]. It never builds a document tree and never interprets
//! values: string values are delivered unescaped, in chunks of bounded size,
//! and it is up to the handler to reassemble them if it cares.
//!
//! # Details
//!
//! Every event is accompanied by a [`Context`] carrying the dotted path of the
//! current position, e.g. `keys[].kty` for the `kty` member of an object
//! inside the `keys` array, and the index of that path in the table of paths
//! the tokenizer was constructed with, if it appears there. Handlers usually
//! dispatch on this index alone.
//!
//! # Examples
//!
//! ```
//! use bh_json_events::{Context, Event, EventHandler, Tokenizer};
//!
//! #[derive(Default)]
//! struct Names(Vec<String>);
//!
//! impl EventHandler for Names {
//!     type Error = ();
//!
//!     fn on_event(&mut self, ctx: &Context<'_>, event: Event<'_>) -> Result<(), ()> {
//!         if let (Some(0), Event::ValueComplete(bytes)) = (ctx.path_match(), event) {
//!             self.0.push(String::from_utf8_lossy(bytes).into_owned());
//!         }
//!         Ok(())
//!     }
//! }
//!
//! let mut names = Names::default();
//! Tokenizer::new(&["people[].name"])
//!     .parse(br#"{"people":[{"name":"Ana"},{"name":"Bo"}]}"#, &mut names)
//!     .unwrap();
//!
//! assert_eq!(names.0, ["Ana", "Bo"]);
//! ```

mod error;
mod tokenizer;

pub use error::*;
pub use tokenizer::*;
