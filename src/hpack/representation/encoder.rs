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

//! Renderers for the wire form of each representation.
//!
//! Every function appends one complete representation to a scratch
//! buffer. The block encoder fit-checks the rendered bytes against the
//! remaining destination space before copying, so a representation either
//! reaches the wire whole or not at all.

use crate::hpack::integer::IntegerEncoder;
use crate::hpack::representation::PrefixIndexMask;
use crate::huffman::{huffman_encode, huffman_encoded_len};

/// `Indexed Header Field`: a single prefixed integer.
pub(crate) fn encode_indexed(index: usize, dst: &mut Vec<u8>) {
    encode_integer(index, PrefixIndexMask::INDEXED.0, 0x80, dst);
}

/// `Dynamic Table Size Update`.
pub(crate) fn encode_size_update(max_size: usize, dst: &mut Vec<u8>) {
    encode_integer(max_size, PrefixIndexMask::SIZE_UPDATE.0, 0x20, dst);
}

/// `Literal Header Field with Incremental Indexing -- Indexed Name`.
pub(crate) fn encode_indexing(index: usize, value: &[u8], huffman: bool, dst: &mut Vec<u8>) {
    encode_integer(index, PrefixIndexMask::LITERAL_WITH_INDEXING.0, 0x40, dst);
    encode_string(value, huffman, dst);
}

/// `Literal Header Field with Incremental Indexing -- New Name`.
pub(crate) fn encode_indexing_with_name(
    name: &[u8],
    value: &[u8],
    huffman: bool,
    dst: &mut Vec<u8>,
) {
    dst.push(0x40);
    encode_string(name, huffman, dst);
    encode_string(value, huffman, dst);
}

/// `Literal Header Field without Indexing -- Indexed Name`.
pub(crate) fn encode_without_indexing(index: usize, value: &[u8], huffman: bool, dst: &mut Vec<u8>) {
    encode_integer(index, PrefixIndexMask::LITERAL_WITHOUT_INDEXING.0, 0x00, dst);
    encode_string(value, huffman, dst);
}

/// `Literal Header Field without Indexing -- New Name`.
pub(crate) fn encode_without_indexing_with_name(
    name: &[u8],
    value: &[u8],
    huffman: bool,
    dst: &mut Vec<u8>,
) {
    dst.push(0x00);
    encode_string(name, huffman, dst);
    encode_string(value, huffman, dst);
}

/// `Literal Header Field Never Indexed -- Indexed Name`.
pub(crate) fn encode_never_indexed(index: usize, value: &[u8], huffman: bool, dst: &mut Vec<u8>) {
    encode_integer(index, PrefixIndexMask::LITERAL_NEVER_INDEXED.0, 0x10, dst);
    encode_string(value, huffman, dst);
}

/// `Literal Header Field Never Indexed -- New Name`.
pub(crate) fn encode_never_indexed_with_name(
    name: &[u8],
    value: &[u8],
    huffman: bool,
    dst: &mut Vec<u8>,
) {
    dst.push(0x10);
    encode_string(name, huffman, dst);
    encode_string(value, huffman, dst);
}

fn encode_integer(value: usize, mask: u8, pre: u8, dst: &mut Vec<u8>) {
    let mut int = IntegerEncoder::new(value, mask, pre);
    while let Some(byte) = int.next_byte() {
        dst.push(byte);
    }
}

/// String literal: a 7-bit-prefixed length whose top bit signals Huffman
/// coding, followed by the octets.
fn encode_string(octets: &[u8], huffman: bool, dst: &mut Vec<u8>) {
    if huffman {
        encode_integer(huffman_encoded_len(octets), 0x7f, 0x80, dst);
        huffman_encode(octets, dst);
    } else {
        encode_integer(octets.len(), 0x7f, 0x00, dst);
        dst.extend_from_slice(octets);
    }
}
