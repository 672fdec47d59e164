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
use crate::field::{FieldCursor, HeaderField};
use crate::hpack::representation::{
    encode_indexed, encode_indexing, encode_indexing_with_name, encode_never_indexed,
    encode_never_indexed_with_name, encode_size_update, encode_without_indexing,
    encode_without_indexing_with_name,
};
use crate::hpack::table::{entry_size, EncoderTable, TableIndex};

/// Header names that are always emitted never-indexed and kept out of
/// every table, ours and any intermediary's.
const NEVER_INDEXED: [&[u8]; 2] = [b"set-cookie", b"content-disposition"];

/// Encoder implementation of [`HPACK`].
///
/// [`HPACK`]: https://httpwg.org/specs/rfc7541.html
///
/// One `HpackEncoder` serves one connection for its whole lifetime. A
/// logical header block is encoded with one [`begin_block`] call and as
/// many [`continue_block`] calls as it takes to drain the caller's
/// cursor, each into its own destination buffer.
///
/// Every header is rendered in full before anything is written: if the
/// rendition does not fit into the remaining destination space, the call
/// stops at that header without emitting partial bytes, and the cursor
/// marks the resume point. The encoder table is only updated for bytes
/// that actually reached a destination buffer, keeping the table in step
/// with what the peer will see.
///
/// [`begin_block`]: HpackEncoder::begin_block
/// [`continue_block`]: HpackEncoder::continue_block
pub struct HpackEncoder {
    table: EncoderTable,
    use_huffman: bool,
    pending_size_update: Option<usize>,
    scratch: Vec<u8>,
}

impl HpackEncoder {
    /// Creates a `HpackEncoder` with the given maximum table size and
    /// Huffman usage.
    pub fn new(max_size: usize, use_huffman: bool) -> Self {
        Self {
            table: EncoderTable::with_max_size(max_size),
            use_huffman,
            pending_size_update: None,
            scratch: Vec::new(),
        }
    }

    /// Requests a new maximum table size. The size update is written at
    /// the very start of the next encode call, at which point the table
    /// is resized and evicted; until then nothing changes.
    pub fn set_max_table_size(&mut self, max_size: usize) {
        self.pending_size_update = Some(max_size);
    }

    /// Starts encoding a header block, optionally emitting the response
    /// status line first.
    ///
    /// Returns the number of bytes written to `dst` and whether the whole
    /// block was written. On `(n, false)` the caller sends the `n` bytes,
    /// prepares the next buffer and calls [`continue_block`]; the cursor
    /// is already positioned on the first unwritten header.
    ///
    /// [`continue_block`]: HpackEncoder::continue_block
    pub fn begin_block(
        &mut self,
        status: Option<u16>,
        fields: &[HeaderField],
        cursor: &mut FieldCursor,
        dst: &mut [u8],
    ) -> Result<(usize, bool), HpackError> {
        let mut cur = 0;
        self.write_size_update(dst, &mut cur)?;
        if let Some(code) = status {
            self.write_status(code, dst, &mut cur)?;
        }
        self.write_fields(fields, cursor, dst, cur)
    }

    /// Resumes encoding a header block into a fresh destination buffer.
    pub fn continue_block(
        &mut self,
        fields: &[HeaderField],
        cursor: &mut FieldCursor,
        dst: &mut [u8],
    ) -> Result<(usize, bool), HpackError> {
        let mut cur = 0;
        self.write_size_update(dst, &mut cur)?;
        self.write_fields(fields, cursor, dst, cur)
    }

    /// Writes a pending table size update and applies it to the table.
    fn write_size_update(&mut self, dst: &mut [u8], cur: &mut usize) -> Result<(), HpackError> {
        let max_size = match self.pending_size_update.take() {
            Some(max_size) => max_size,
            None => return Ok(()),
        };
        self.scratch.clear();
        encode_size_update(max_size, &mut self.scratch);
        let len = self.scratch.len();
        if len > dst.len() - *cur {
            return Err(HpackError::BufferTooSmall {
                required: len,
                available: dst.len() - *cur,
            });
        }
        dst[*cur..*cur + len].copy_from_slice(&self.scratch);
        *cur += len;
        self.table.update_size(max_size);
        Ok(())
    }

    /// Writes the status-line header. Statuses carried by the static
    /// table cost a single indexed byte; the rest are literals against
    /// the `:status` name and enter the table like any other field.
    fn write_status(&mut self, code: u16, dst: &mut [u8], cur: &mut usize) -> Result<(), HpackError> {
        let value = code.to_string().into_bytes();
        let insert = self.render_field(b":status", &value);
        let len = self.scratch.len();
        if len > dst.len() - *cur {
            return Err(HpackError::BufferTooSmall {
                required: len,
                available: dst.len() - *cur,
            });
        }
        dst[*cur..*cur + len].copy_from_slice(&self.scratch);
        *cur += len;
        if insert {
            self.table.update(b":status".to_vec(), value);
        }
        Ok(())
    }

    /// Encodes headers from the cursor until the collection is drained or
    /// one does not fit.
    fn write_fields(
        &mut self,
        fields: &[HeaderField],
        cursor: &mut FieldCursor,
        dst: &mut [u8],
        mut cur: usize,
    ) -> Result<(usize, bool), HpackError> {
        while let Some(field) = fields.get(cursor.position()) {
            let insert = self.render_field(field.name(), field.value());
            let len = self.scratch.len();
            if len > dst.len() - cur {
                if cur == 0 {
                    return Err(HpackError::BufferTooSmall {
                        required: len,
                        available: dst.len(),
                    });
                }
                return Ok((cur, false));
            }
            dst[cur..cur + len].copy_from_slice(&self.scratch);
            cur += len;
            if insert {
                self.table.update(field.name().to_vec(), field.value().to_vec());
            }
            cursor.advance();
        }
        Ok((cur, true))
    }

    /// Renders one header into the scratch buffer, choosing among the
    /// emission strategies. Returns whether the field must be inserted
    /// into the table once its bytes are written.
    fn render_field(&mut self, name: &[u8], value: &[u8]) -> bool {
        self.scratch.clear();
        let huffman = self.use_huffman;

        if NEVER_INDEXED.contains(&name) {
            match self.table.search(name, value) {
                Some(TableIndex::Field(index)) | Some(TableIndex::Name(index)) => {
                    encode_never_indexed(index, value, huffman, &mut self.scratch)
                }
                None => encode_never_indexed_with_name(name, value, huffman, &mut self.scratch),
            }
            return false;
        }

        match self.table.search(name, value) {
            Some(TableIndex::Field(index)) => {
                encode_indexed(index, &mut self.scratch);
                false
            }
            Some(TableIndex::Name(index)) => {
                if entry_size(name, value) > self.table.max_size() {
                    // Inserting would wipe the whole table for one entry;
                    // emit a plain literal and leave the table alone.
                    encode_without_indexing(index, value, huffman, &mut self.scratch);
                    false
                } else {
                    encode_indexing(index, value, huffman, &mut self.scratch);
                    true
                }
            }
            None => {
                if entry_size(name, value) > self.table.max_size() {
                    encode_without_indexing_with_name(name, value, huffman, &mut self.scratch);
                    false
                } else {
                    encode_indexing_with_name(name, value, huffman, &mut self.scratch);
                    true
                }
            }
        }
    }
}
