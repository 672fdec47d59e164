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

//! Header field data model shared by the encoder and decoder.
//!
//! A header field is a pair of byte strings. Table identity is exact byte
//! equality of both name and value; name-only equality is the weaker match
//! used when only a name reference can be reused.

/// A single header field: a `(name, value)` pair of byte strings.
///
/// Names are expected in the lowercase form HTTP/2 requires, but the codec
/// itself treats them as opaque bytes.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct HeaderField {
    name: Vec<u8>,
    value: Vec<u8>,
}

impl HeaderField {
    /// Creates a `HeaderField` from any byte-string-like name and value.
    pub fn new(name: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Gets the field name.
    pub fn name(&self) -> &[u8] {
        &self.name
    }

    /// Gets the field value.
    pub fn value(&self) -> &[u8] {
        &self.value
    }

    /// The table-accounting size of this field.
    ///
    /// RFC7541-4.1: the size of an entry is the sum of its name's length in
    /// octets, its value's length in octets, and 32.
    pub fn size(&self) -> usize {
        self.name.len() + self.value.len() + 32
    }
}

/// Receiver for the output of [`HpackDecoder`].
///
/// `on_header` is called once per decoded field, in wire order. Fields
/// emitted before a fatal decode error stand; no further calls follow the
/// error. `on_headers_complete` fires exactly once per logical block, after
/// the final fragment has been fully consumed.
///
/// [`HpackDecoder`]: crate::HpackDecoder
pub trait HeaderSink {
    /// Called for each decoded header field.
    fn on_header(&mut self, name: &[u8], value: &[u8]);

    /// Called when the logical header block is complete.
    fn on_headers_complete(&mut self);
}

/// Position of [`HpackEncoder`] within a caller-owned header collection.
///
/// The cursor is created once per logical header block and passed into
/// every encode call for that block. When a call reports "not all
/// written", the cursor is left on the first header that did not fit, so
/// a continuation call resumes exactly there.
///
/// [`HpackEncoder`]: crate::HpackEncoder
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct FieldCursor {
    pos: usize,
}

impl FieldCursor {
    /// Creates a cursor positioned at the first header.
    pub fn new() -> Self {
        Self::default()
    }

    /// Index of the next header to encode.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Whether every header in `fields` has been encoded.
    pub fn is_finished(&self, fields: &[HeaderField]) -> bool {
        self.pos >= fields.len()
    }

    pub(crate) fn advance(&mut self) {
        self.pos += 1;
    }
}
