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

//! [Header Field Representation] of HPACK.
//!
//! [Header Field Representation]: https://www.rfc-editor.org/rfc/rfc7541.html#section-2.4
//!
//! An encoded header field is either an index into the static/dynamic
//! table space or a literal carrying its name and/or value directly. The
//! high bits of the leading byte select the representation; the remaining
//! bits start a prefixed integer.

mod decoder;
mod encoder;

pub(crate) use decoder::ReprDecoder;
pub(crate) use encoder::{
    encode_indexed, encode_indexing, encode_indexing_with_name, encode_never_indexed,
    encode_never_indexed_with_name, encode_size_update, encode_without_indexing,
    encode_without_indexing_with_name,
};

/// One decoded header-block representation.
#[derive(Debug, Eq, PartialEq)]
pub(crate) enum Representation {
    /// An indexed header field identifies an entry in either the static
    /// table or the dynamic table.
    ///
    /// # Binary Format
    /// ```text
    ///   0   1   2   3   4   5   6   7
    /// +---+---+---+---+---+---+---+---+
    /// | 1 |        Index (7+)         |
    /// +---+---------------------------+
    /// ```
    Indexed { index: usize },

    /// A literal that is appended to the decoded header list and inserted
    /// as the new most-recent dynamic table entry.
    ///
    /// # Binary Format
    /// ```text
    ///   0   1   2   3   4   5   6   7
    /// +---+---+---+---+---+---+---+---+
    /// | 0 | 1 |      Index (6+)       |
    /// +---+---+-----------------------+
    /// | H |     Value Length (7+)     |
    /// +---+---------------------------+
    /// | Value String (Length octets)  |
    /// +-------------------------------+
    /// ```
    /// An index of 0 means the name follows as a string literal before the
    /// value.
    LiteralWithIndexing { name: Name, value: Vec<u8> },

    /// A literal that is appended to the decoded header list without
    /// altering the dynamic table.
    ///
    /// # Binary Format
    /// ```text
    ///   0   1   2   3   4   5   6   7
    /// +---+---+---+---+---+---+---+---+
    /// | 0 | 0 | 0 | 0 |  Index (4+)   |
    /// +---+---+---+---+---------------+
    /// | H |     Value Length (7+)     |
    /// +---+---------------------------+
    /// | Value String (Length octets)  |
    /// +-------------------------------+
    /// ```
    LiteralWithoutIndexing { name: Name, value: Vec<u8> },

    /// Like `LiteralWithoutIndexing`, with the added stipulation that
    /// intermediaries must keep the field out of their tables too.
    ///
    /// # Binary Format
    /// ```text
    ///   0   1   2   3   4   5   6   7
    /// +---+---+---+---+---+---+---+---+
    /// | 0 | 0 | 0 | 1 |  Index (4+)   |
    /// +---+---+---+---+---------------+
    /// | H |     Value Length (7+)     |
    /// +---+---------------------------+
    /// | Value String (Length octets)  |
    /// +-------------------------------+
    /// ```
    LiteralNeverIndexed { name: Name, value: Vec<u8> },

    /// A change to the maximum size of the dynamic table.
    ///
    /// # Binary Format
    /// ```text
    ///   0   1   2   3   4   5   6   7
    /// +---+---+---+---+---+---+---+---+
    /// | 0 | 0 | 1 |   Max size (5+)   |
    /// +---+---+---+-------------------+
    /// ```
    SizeUpdate { max_size: usize },
}

/// The selector bits at the top of a representation's leading byte.
#[derive(Copy, Clone, PartialEq, Eq)]
pub(crate) struct PrefixBit(u8);

impl PrefixBit {
    pub(crate) const INDEXED: Self = Self(0x80);
    pub(crate) const LITERAL_WITH_INDEXING: Self = Self(0x40);
    pub(crate) const SIZE_UPDATE: Self = Self(0x20);
    pub(crate) const LITERAL_NEVER_INDEXED: Self = Self(0x10);
    pub(crate) const LITERAL_WITHOUT_INDEXING: Self = Self(0x00);

    /// Classifies a leading byte by its highest set selector bits.
    pub(crate) fn from_u8(byte: u8) -> Self {
        match byte {
            x if x >= 0x80 => Self::INDEXED,
            x if x >= 0x40 => Self::LITERAL_WITH_INDEXING,
            x if x >= 0x20 => Self::SIZE_UPDATE,
            x if x >= 0x10 => Self::LITERAL_NEVER_INDEXED,
            _ => Self::LITERAL_WITHOUT_INDEXING,
        }
    }

    /// Returns the integer prefix mask that pairs with this selector.
    pub(crate) fn prefix_index_mask(&self) -> PrefixIndexMask {
        match self.0 {
            0x80 => PrefixIndexMask::INDEXED,
            0x40 => PrefixIndexMask::LITERAL_WITH_INDEXING,
            0x20 => PrefixIndexMask::SIZE_UPDATE,
            0x10 => PrefixIndexMask::LITERAL_NEVER_INDEXED,
            _ => PrefixIndexMask::LITERAL_WITHOUT_INDEXING,
        }
    }
}

/// The prefixed-integer mask left below a representation's selector bits.
pub(crate) struct PrefixIndexMask(pub(crate) u8);

impl PrefixIndexMask {
    pub(crate) const INDEXED: Self = Self(0x7f);
    pub(crate) const LITERAL_WITH_INDEXING: Self = Self(0x3f);
    pub(crate) const SIZE_UPDATE: Self = Self(0x1f);
    pub(crate) const LITERAL_NEVER_INDEXED: Self = Self(0x0f);
    pub(crate) const LITERAL_WITHOUT_INDEXING: Self = Self(0x0f);
}

/// A literal representation's name: an index into the table space or the
/// name octets themselves.
#[derive(Debug, Eq, PartialEq)]
pub(crate) enum Name {
    Index(usize),
    Literal(Vec<u8>),
}
