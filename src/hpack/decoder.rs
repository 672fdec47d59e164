// Copyright (c) 2025 Skylark Project Authors.
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::error::HpackError;
use crate::field::HeaderSink;
use crate::hpack::representation::{Name, ReprDecoder, Representation};
use crate::hpack::table::{DynamicTable, StaticTable, DYNAMIC_START};

/// Decoder implementation of [`HPACK`].
///
/// [`HPACK`]: https://httpwg.org/specs/rfc7541.html
///
/// One `HpackDecoder` serves one connection for its whole lifetime; the
/// dynamic table it carries is the connection's cumulative compression
/// context. Fragments of each logical header block are fed to
/// [`decode`] in wire order, with `end_headers` set on the final one.
///
/// [`decode`]: HpackDecoder::decode
pub struct HpackDecoder {
    table: DynamicTable,
    max_field_size: usize,
    // Whether the current block has produced a representation other than
    // a size update. Persists across fragments, resets when the block
    // completes.
    field_seen: bool,
}

impl HpackDecoder {
    /// Creates a `HpackDecoder` from the negotiated maximum dynamic table
    /// size and the configured maximum field size.
    pub fn with_max_size(max_table_size: usize, max_field_size: usize) -> Self {
        Self {
            table: DynamicTable::with_limit(max_table_size),
            max_field_size,
            field_seen: false,
        }
    }

    /// Decodes one fragment of a header block, emitting each decoded
    /// field through `sink`.
    ///
    /// Returns the number of bytes consumed, which is always a
    /// representation boundary. When a representation is split across
    /// fragments the unread tail stays unconsumed and must be re-supplied,
    /// prefixed to the next fragment. With `end_headers` set, an
    /// incomplete trailing representation is a protocol error, and
    /// `on_headers_complete` fires once the fragment is fully consumed.
    ///
    /// Any error is fatal to the connection's compression context: fields
    /// already emitted stand, but the rest of the block is not processed.
    pub fn decode<S: HeaderSink>(
        &mut self,
        src: &[u8],
        end_headers: bool,
        sink: &mut S,
    ) -> Result<usize, HpackError> {
        let mut decoder = ReprDecoder::new(src, self.max_field_size);
        loop {
            match decoder.decode()? {
                Some(repr) => self.update(repr, sink)?,
                None => break,
            }
        }
        let consumed = decoder.consumed();
        if end_headers {
            if consumed < src.len() {
                return Err(HpackError::IncompleteHeaderBlock);
            }
            self.field_seen = false;
            sink.on_headers_complete();
        }
        Ok(consumed)
    }

    /// Applies one representation to the table and the sink.
    fn update<S: HeaderSink>(
        &mut self,
        repr: Representation,
        sink: &mut S,
    ) -> Result<(), HpackError> {
        match repr {
            Representation::Indexed { index } => {
                let (name, value) = self
                    .field_at(index)
                    .ok_or(HpackError::IndexOutOfRange { index })?;
                sink.on_header(name, value);
            }
            Representation::LiteralWithIndexing { name, value } => {
                let name = self.resolve_name(name)?;
                sink.on_header(&name, &value);
                self.table.update(name, value);
            }
            Representation::LiteralWithoutIndexing { name, value }
            | Representation::LiteralNeverIndexed { name, value } => {
                let name = self.resolve_name(name)?;
                sink.on_header(&name, &value);
            }
            Representation::SizeUpdate { max_size } => {
                // RFC7541-4.2: a size update is only legal before the
                // block's first field representation.
                if self.field_seen {
                    return Err(HpackError::SizeUpdateAfterField);
                }
                return self.table.update_size(max_size);
            }
        }
        self.field_seen = true;
        Ok(())
    }

    /// Looks up a full entry in the combined static and dynamic index
    /// space.
    fn field_at(&self, index: usize) -> Option<(&[u8], &[u8])> {
        if index < DYNAMIC_START {
            StaticTable::field(index)
        } else {
            self.table.field(index - DYNAMIC_START)
        }
    }

    /// Resolves a literal representation's name reference to owned bytes.
    fn resolve_name(&self, name: Name) -> Result<Vec<u8>, HpackError> {
        match name {
            Name::Index(index) => {
                let name = if index < DYNAMIC_START {
                    StaticTable::field_name(index)
                } else {
                    self.table.field_name(index - DYNAMIC_START)
                };
                name.map(|n| n.to_vec())
                    .ok_or(HpackError::IndexOutOfRange { index })
            }
            Name::Literal(octets) => Ok(octets),
        }
    }
}
