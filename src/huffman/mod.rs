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

//! [Huffman coding] for HPACK string literals.
//!
//! [Huffman coding]: https://www.rfc-editor.org/rfc/rfc7541.html#string.literal.representation
//!
//! RFC 7541 fixes a single canonical Huffman code, generated from
//! statistics over a large sample of HTTP headers, for use by every
//! endpoint. Codes are emitted most-significant-bit first; the final byte
//! of an encoded string is padded with the most significant bits of the
//! EOS code (all ones), never more than 7 of them.

mod consts;

use core::fmt::{Display, Formatter};
use std::error::Error;
use std::sync::OnceLock;

use consts::{EOS, HUFFMAN_ENCODE};

/// Huffman-encodes `src` and appends the coded bytes to `dst`.
pub(crate) fn huffman_encode(src: &[u8], dst: &mut Vec<u8>) {
    // `state` accumulates codes MSB-first; `nbits` is the number of
    // accumulated bits not yet flushed. The longest code is 30 bits, so
    // the accumulator never holds more than 37 meaningful bits.
    let mut state = 0u64;
    let mut nbits = 0u8;

    for &byte in src.iter() {
        let (code, len) = HUFFMAN_ENCODE[byte as usize];
        state = (state << len) | code as u64;
        nbits += len;
        while nbits >= 8 {
            nbits -= 8;
            dst.push((state >> nbits) as u8);
        }
    }

    // RFC7541-5.2: pad the final byte with the EOS prefix (all ones).
    if nbits > 0 {
        let pad = 8 - nbits;
        state = (state << pad) | ((1u64 << pad) - 1);
        dst.push(state as u8);
    }
}

/// Returns the Huffman-coded length of `src` in bytes without encoding it.
pub(crate) fn huffman_encoded_len(src: &[u8]) -> usize {
    let mut bits = 0usize;
    for &byte in src.iter() {
        bits += HUFFMAN_ENCODE[byte as usize].1 as usize;
    }
    bits.div_ceil(8)
}

/// Decodes a complete Huffman-coded string, appending the literal octets
/// to `dst`.
///
/// Bits are consumed most-significant-bit first, walking the code trie
/// until a symbol is reached. Decoding the EOS symbol is an error, as is
/// any trailing padding that is not an EOS prefix of at most 7 bits.
pub(crate) fn huffman_decode(src: &[u8], dst: &mut Vec<u8>) -> Result<(), HuffmanDecodeError> {
    let tree = decode_tree();
    let mut node = 0u16;
    // Bits consumed since the last symbol boundary, and whether all of
    // them were ones. Valid padding is an all-ones run shorter than 8.
    let mut pending = 0u8;
    let mut all_ones = true;

    for &byte in src.iter() {
        for shift in (0..8).rev() {
            let bit = (byte >> shift) & 1;
            node = match tree[node as usize] {
                Node::Internal { zero, one } => {
                    if bit == 0 {
                        zero
                    } else {
                        one
                    }
                }
                Node::Symbol { .. } => unreachable!("walk never rests on a symbol"),
            };
            if node == 0 {
                return Err(HuffmanDecodeError::InvalidHuffmanCode);
            }
            if bit == 0 {
                all_ones = false;
            }
            match tree[node as usize] {
                Node::Symbol { sym } => {
                    if sym as usize == EOS {
                        return Err(HuffmanDecodeError::InvalidHuffmanCode);
                    }
                    dst.push(sym as u8);
                    node = 0;
                    pending = 0;
                    all_ones = true;
                }
                Node::Internal { .. } => pending += 1,
            }
        }
    }

    if node != 0 && (pending > 7 || !all_ones) {
        return Err(HuffmanDecodeError::InvalidHuffmanCode);
    }
    Ok(())
}

/// Possible errors in Huffman decoding operations.
#[derive(Debug, Eq, PartialEq)]
pub enum HuffmanDecodeError {
    InvalidHuffmanCode,
}

impl Display for HuffmanDecodeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::InvalidHuffmanCode => write!(f, "invalid huffman code"),
        }
    }
}

impl Error for HuffmanDecodeError {}

/// Node of the decode trie. Index 0 is the root; a child index of 0 means
/// no code continues along that edge.
#[derive(Clone, Copy)]
enum Node {
    Internal { zero: u16, one: u16 },
    Symbol { sym: u16 },
}

fn decode_tree() -> &'static [Node] {
    static TREE: OnceLock<Vec<Node>> = OnceLock::new();
    TREE.get_or_init(build_decode_tree)
}

/// Builds the trie from the canonical code table, one node per distinct
/// code prefix.
fn build_decode_tree() -> Vec<Node> {
    let mut nodes = Vec::with_capacity(512);
    nodes.push(Node::Internal { zero: 0, one: 0 });

    for (sym, &(code, nbits)) in HUFFMAN_ENCODE.iter().enumerate() {
        let mut idx = 0usize;
        for pos in (0..nbits).rev() {
            let bit = (code >> pos) & 1;
            let (zero, one) = match nodes[idx] {
                Node::Internal { zero, one } => (zero, one),
                Node::Symbol { .. } => unreachable!("prefix code collision"),
            };
            let child = if bit == 0 { zero } else { one };

            let next = if pos == 0 {
                let leaf = nodes.len() as u16;
                nodes.push(Node::Symbol { sym: sym as u16 });
                leaf
            } else if child == 0 {
                let inner = nodes.len() as u16;
                nodes.push(Node::Internal { zero: 0, one: 0 });
                inner
            } else {
                idx = child as usize;
                continue;
            };

            nodes[idx] = if bit == 0 {
                Node::Internal { zero: next, one }
            } else {
                Node::Internal { zero, one: next }
            };
            idx = next as usize;
        }
    }
    nodes
}

#[cfg(test)]
mod ut_huffman {
    use super::{huffman_decode, huffman_encode, huffman_encoded_len, HuffmanDecodeError};
    use crate::util::test_util::decode;

    /// UT test cases for `huffman_encode`.
    ///
    /// # Brief
    /// 1. Calls `huffman_encode` function, passing in the specified
    ///    parameters.
    /// 2. Checks if the test results are correct.
    #[test]
    fn ut_huffman_encode() {
        rfc7541_test_cases();

        macro_rules! huffman_test_case {
            ($ctn: expr, $res: expr $(,)?) => {
                let mut vec = Vec::new();
                huffman_encode($ctn.as_bytes(), &mut vec);
                assert_eq!(vec, decode($res).unwrap());
                assert_eq!(huffman_encoded_len($ctn.as_bytes()), vec.len());
            };
        }

        /// The following test cases are from RFC7541.
        fn rfc7541_test_cases() {
            // C.4.1 First Request
            huffman_test_case!("www.example.com", "f1e3c2e5f23a6ba0ab90f4ff");

            // C.4.2 Second Request
            huffman_test_case!("no-cache", "a8eb10649cbf");

            // C.4.3 Third Request
            huffman_test_case!("custom-value", "25a849e95bb8e8b4bf");

            // C.6.1 First Response
            huffman_test_case!("302", "6402");
            huffman_test_case!("private", "aec3771a4b");
            huffman_test_case!(
                "Mon, 21 Oct 2013 20:13:21 GMT",
                "d07abe941054d444a8200595040b8166e082a62d1bff"
            );
            huffman_test_case!(
                "https://www.example.com",
                "9d29ad171863c78f0b97c8e9ae82ae43d3"
            );

            // C.6.2 Second Response
            huffman_test_case!("307", "640eff");

            // C.6.3 Third Response
            huffman_test_case!("gzip", "9bd9ab");
            huffman_test_case!(
                "foo=ASDJKHQKBZXOQWEOPIUAXQWEOIU; max-age=3600; version=1",
                "94e7821dd7f2e6c7b335dfdfcd5b3960d5af27087f3672c1ab270fb5291f9587316065c003ed4ee5b1063d5007",
            );
        }
    }

    /// UT test cases for `huffman_decode`.
    ///
    /// # Brief
    /// 1. Calls `huffman_decode` function, passing in the specified
    ///    parameters.
    /// 2. Checks if the test results are correct.
    #[test]
    fn ut_huffman_decode() {
        rfc7541_test_cases();

        macro_rules! huffman_test_case {
            ($ctn: expr, $res: expr $(,)?) => {
                let mut vec = Vec::new();
                huffman_decode(decode($ctn).unwrap().as_slice(), &mut vec).unwrap();
                assert_eq!(vec.as_slice(), $res.as_bytes());
            };
        }

        /// The following test cases are from RFC7541.
        fn rfc7541_test_cases() {
            // C.4.1 First Request
            huffman_test_case!("f1e3c2e5f23a6ba0ab90f4ff", "www.example.com");

            // C.4.2 Second Request
            huffman_test_case!("a8eb10649cbf", "no-cache");

            // C.4.3 Third Request
            huffman_test_case!("25a849e95bb8e8b4bf", "custom-value");

            // C.6.1 First Response
            huffman_test_case!("6402", "302");
            huffman_test_case!("aec3771a4b", "private");
            huffman_test_case!(
                "d07abe941054d444a8200595040b8166e082a62d1bff",
                "Mon, 21 Oct 2013 20:13:21 GMT"
            );
            huffman_test_case!(
                "9d29ad171863c78f0b97c8e9ae82ae43d3",
                "https://www.example.com",
            );

            // C.6.2 Second Response
            huffman_test_case!("640eff", "307");

            // C.6.3 Third Response
            huffman_test_case!("9bd9ab", "gzip");
            huffman_test_case!(
                "94e7821dd7f2e6c7b335dfdfcd5b3960d5af27087f3672c1ab270fb5291f9587316065c003ed4ee5b1063d5007",
                "foo=ASDJKHQKBZXOQWEOPIUAXQWEOIU; max-age=3600; version=1"
            );
        }
    }

    /// UT test cases for the encode-decode fixpoint.
    ///
    /// # Brief
    /// 1. Encodes every octet value and decodes the result.
    /// 2. Checks the decoded output equals the input.
    #[test]
    fn ut_huffman_fixpoint() {
        for byte in 0u8..=255 {
            let mut encoded = Vec::new();
            huffman_encode(&[byte], &mut encoded);
            let mut decoded = Vec::new();
            huffman_decode(&encoded, &mut decoded).unwrap();
            assert_eq!(decoded, [byte]);
        }

        let input: Vec<u8> = (0u8..=255).collect();
        let mut encoded = Vec::new();
        huffman_encode(&input, &mut encoded);
        let mut decoded = Vec::new();
        huffman_decode(&encoded, &mut decoded).unwrap();
        assert_eq!(decoded, input);
    }

    /// UT test cases for invalid padding and explicit EOS.
    ///
    /// # Brief
    /// 1. Decodes inputs whose trailing bits violate the padding rules.
    /// 2. Checks if each of them is rejected.
    #[test]
    fn ut_huffman_decode_invalid() {
        // 16 one-bits of padding: more than 7 without a symbol boundary.
        let mut dst = Vec::new();
        assert_eq!(
            huffman_decode(&[0xff, 0xff], &mut dst),
            Err(HuffmanDecodeError::InvalidHuffmanCode)
        );

        // The literal EOS code (30 one-bits) decoded as a symbol.
        let mut dst = Vec::new();
        assert_eq!(
            huffman_decode(&[0xff, 0xff, 0xff, 0xff], &mut dst),
            Err(HuffmanDecodeError::InvalidHuffmanCode)
        );

        // '0' (00000) followed by three zero-bits: padding must be ones.
        let mut dst = Vec::new();
        assert_eq!(
            huffman_decode(&[0x00], &mut dst),
            Err(HuffmanDecodeError::InvalidHuffmanCode)
        );

        // '0' followed by three one-bits is a valid EOS-prefix padding.
        let mut dst = Vec::new();
        assert!(huffman_decode(&[0x07], &mut dst).is_ok());
        assert_eq!(dst, b"0");
    }
}
