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

use crate::{limits::VALUE_BUFFER_CAPACITY, FieldSpec, ImportError};

/// Reassembles a member value delivered in several chunks.
///
/// The buffer is allocated once per import, with room for the largest value
/// any member may have, and reused for every member.
#[derive(Debug)]
pub struct ValueAccumulator {
    buf: Vec<u8>,
}

impl Default for ValueAccumulator {
    fn default() -> Self {
        Self::new()
    }
}

impl ValueAccumulator {
    /// Creates an empty accumulator.
    pub fn new() -> Self {
        Self {
            buf: Vec::with_capacity(VALUE_BUFFER_CAPACITY),
        }
    }

    /// Discards the current value.
    pub fn reset(&mut self) {
        self.buf.clear();
    }

    /// Appends a chunk of the value of `field`.
    ///
    /// Fails if the value grows beyond what `field` allows, in which case the
    /// value is discarded.
    pub fn push(&mut self, field: &FieldSpec, chunk: &[u8]) -> bherror::Result<(), ImportError> {
        let len = self.buf.len() + chunk.len();
        if len > field.max_encoded_len() {
            self.reset();
            return Err(Error::root(ImportError::OversizedValue(field.name)).ctx(format!(
                "value exceeds {} encoded bytes",
                field.max_encoded_len()
            )));
        }
        self.buf.extend_from_slice(chunk);
        Ok(())
    }

    /// The bytes accumulated so far.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Number of bytes accumulated so far.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Returns `true` if nothing has been accumulated.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }
}
