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
use crate::hpack::integer::IntegerDecoder;
use crate::hpack::representation::{Name, PrefixBit, Representation};
use crate::huffman::huffman_decode;

/// Parses representations one at a time from a header-block fragment.
///
/// Each call to [`decode`] either yields a complete `Representation`,
/// reports that the fragment ends mid-representation, or fails. In the
/// mid-representation case the cursor rewinds to the start of the
/// incomplete representation, so [`consumed`] always names a
/// representation boundary and the caller can re-supply the unread tail
/// together with the next fragment.
///
/// [`decode`]: ReprDecoder::decode
/// [`consumed`]: ReprDecoder::consumed
pub(crate) struct ReprDecoder<'a> {
    buf: &'a [u8],
    pos: usize,
    max_field_size: usize,
}

impl<'a> ReprDecoder<'a> {
    /// Creates a `ReprDecoder` over one fragment.
    pub(crate) fn new(buf: &'a [u8], max_field_size: usize) -> Self {
        Self {
            buf,
            pos: 0,
            max_field_size,
        }
    }

    /// Number of bytes consumed so far; always a representation boundary.
    pub(crate) fn consumed(&self) -> usize {
        self.pos
    }

    /// Decodes the next representation. `Ok(None)` means the fragment
    /// ended before the representation was complete; the unread bytes
    /// stay unconsumed.
    pub(crate) fn decode(&mut self) -> Result<Option<Representation>, HpackError> {
        let start = self.pos;
        match self.decode_inner() {
            Ok(None) => {
                self.pos = start;
                Ok(None)
            }
            other => other,
        }
    }

    fn decode_inner(&mut self) -> Result<Option<Representation>, HpackError> {
        let byte = match self.next_byte() {
            Some(byte) => byte,
            None => return Ok(None),
        };
        let repr = PrefixBit::from_u8(byte);
        let mask = repr.prefix_index_mask();
        let index = match self.decode_integer(byte, mask.0)? {
            Some(index) => index,
            None => return Ok(None),
        };

        match repr {
            PrefixBit::INDEXED => {
                // RFC7541-6.1: the index value of 0 is not used. It MUST
                // be treated as a decoding error.
                if index == 0 {
                    return Err(HpackError::IndexOutOfRange { index: 0 });
                }
                Ok(Some(Representation::Indexed { index }))
            }
            PrefixBit::SIZE_UPDATE => Ok(Some(Representation::SizeUpdate { max_size: index })),
            _ => {
                let name = if index == 0 {
                    match self.decode_string()? {
                        Some(octets) => Name::Literal(octets),
                        None => return Ok(None),
                    }
                } else {
                    Name::Index(index)
                };
                let value = match self.decode_string()? {
                    Some(octets) => octets,
                    None => return Ok(None),
                };
                Ok(Some(match repr {
                    PrefixBit::LITERAL_WITH_INDEXING => {
                        Representation::LiteralWithIndexing { name, value }
                    }
                    PrefixBit::LITERAL_WITHOUT_INDEXING => {
                        Representation::LiteralWithoutIndexing { name, value }
                    }
                    _ => Representation::LiteralNeverIndexed { name, value },
                }))
            }
        }
    }

    fn next_byte(&mut self) -> Option<u8> {
        let byte = self.buf.get(self.pos).copied();
        if byte.is_some() {
            self.pos += 1;
        }
        byte
    }

    /// Decodes a prefixed integer whose first byte has already been read.
    fn decode_integer(&mut self, first: u8, mask: u8) -> Result<Option<usize>, HpackError> {
        let mut int = match IntegerDecoder::first_byte(first, mask) {
            Ok(value) => return Ok(Some(value)),
            Err(int) => int,
        };
        loop {
            let byte = match self.next_byte() {
                Some(byte) => byte,
                None => return Ok(None),
            };
            if let Some(value) = int.next_byte(byte)? {
                return Ok(Some(value));
            }
        }
    }

    /// Decodes a string literal: a length-prefixed run of plain or
    /// Huffman-coded octets.
    ///
    /// # Binary Format
    /// ```text
    /// +---+---------------------------+
    /// | H |    String Length (7+)     |
    /// +---+---------------------------+
    /// |  String Data (Length octets)  |
    /// +-------------------------------+
    /// ```
    fn decode_string(&mut self) -> Result<Option<Vec<u8>>, HpackError> {
        let first = match self.next_byte() {
            Some(byte) => byte,
            None => return Ok(None),
        };
        let huffman = (first & 0x80) == 0x80;
        let length = match self.decode_integer(first, 0x7f)? {
            Some(length) => length,
            None => return Ok(None),
        };
        if !huffman {
            // The declared length is the decoded length; fail before
            // waiting for octets that would be rejected anyway.
            self.check_field_size(length)?;
        }
        if self.buf.len() - self.pos < length {
            return Ok(None);
        }
        let octets = &self.buf[self.pos..self.pos + length];
        self.pos += length;

        if huffman {
            let mut decoded = Vec::with_capacity(length << 1);
            huffman_decode(octets, &mut decoded)?;
            self.check_field_size(decoded.len())?;
            Ok(Some(decoded))
        } else {
            if octets.contains(&0) {
                return Err(HpackError::NulInLiteral);
            }
            Ok(Some(octets.to_vec()))
        }
    }

    fn check_field_size(&self, size: usize) -> Result<(), HpackError> {
        if size > self.max_field_size {
            return Err(HpackError::FieldTooLarge {
                size,
                limit: self.max_field_size,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod ut_repr_decoder {
    use super::*;
    use crate::util::test_util::decode;

    const MAX_FIELD_SIZE: usize = 16 << 10;

    /// UT test cases for `ReprDecoder`.
    ///
    /// # Brief
    /// 1. Creates a `ReprDecoder`.
    /// 2. Calls `ReprDecoder::decode()` function, passing in the specified
    ///    parameters.
    /// 3. Checks if the test results are correct.
    #[test]
    fn ut_repr_decoder() {
        rfc7541_test_cases();

        macro_rules! inner_test_case {
            ($decoder: expr, $pat: ident => $index: expr) => {
                match $decoder.decode() {
                    Ok(Some(Representation::$pat { index })) => assert_eq!($index, index),
                    _ => panic!("ReprDecoder::decode() failed!"),
                }
            };
            ($decoder: expr, $pat: ident, $kind: ident => $name: expr, $value: expr) => {
                match $decoder.decode() {
                    Ok(Some(Representation::$pat {
                        name: Name::$kind(n),
                        value: v,
                    })) => {
                        assert_eq!($name, n);
                        assert_eq!($value, v);
                    }
                    _ => panic!("ReprDecoder::decode() failed!"),
                }
            };
        }

        macro_rules! repr_test_case {
            ($octets: literal, $({ $pat: ident $(, $kind: ident)? => $first: expr $(, $second: expr)?} $(,)?)*) => {
                let slice = decode($octets).unwrap();
                let mut decoder = ReprDecoder::new(&slice, MAX_FIELD_SIZE);
                $(
                    inner_test_case!(decoder, $pat $(, $kind)? => $first $(, $second)?);
                )*
                assert_eq!(decoder.consumed(), slice.len());
            }
        }

        /// The following test cases are from RFC7541.
        fn rfc7541_test_cases() {
            // C.2.1. Literal Header Field with Indexing
            repr_test_case!(
                "400a637573746f6d2d6b65790d637573746f6d2d686561646572",
                { LiteralWithIndexing, Literal => b"custom-key".to_vec(), b"custom-header".to_vec() }
            );

            // C.2.2. Literal Header Field without Indexing
            repr_test_case!(
                "040c2f73616d706c652f70617468",
                { LiteralWithoutIndexing, Index => 4, b"/sample/path".to_vec() }
            );

            // C.2.3. Literal Header Field Never Indexed
            repr_test_case!(
                "100870617373776f726406736563726574",
                { LiteralNeverIndexed, Literal => b"password".to_vec(), b"secret".to_vec() }
            );

            // C.2.4. Indexed Header Field
            repr_test_case!(
                "82",
                { Indexed => 2 }
            );

            // C.3.1. First Request
            repr_test_case!(
                "828684410f7777772e6578616d706c652e636f6d",
                { Indexed => 2 },
                { Indexed => 6 },
                { Indexed => 4 },
                { LiteralWithIndexing, Index => 1, b"www.example.com".to_vec() }
            );

            // C.4.1. First Request (Huffman)
            repr_test_case!(
                "828684418cf1e3c2e5f23a6ba0ab90f4ff",
                { Indexed => 2 },
                { Indexed => 6 },
                { Indexed => 4 },
                { LiteralWithIndexing, Index => 1, b"www.example.com".to_vec() }
            );

            // C.5.1. First Response
            repr_test_case!(
                "4803333032580770726976617465611d\
                4d6f6e2c203231204f63742032303133\
                2032303a31333a323120474d546e1768\
                747470733a2f2f7777772e6578616d70\
                6c652e636f6d",
                { LiteralWithIndexing, Index => 8, b"302".to_vec() },
                { LiteralWithIndexing, Index => 24, b"private".to_vec() },
                { LiteralWithIndexing, Index => 33, b"Mon, 21 Oct 2013 20:13:21 GMT".to_vec() },
                { LiteralWithIndexing, Index => 46, b"https://www.example.com".to_vec() }
            );

            // Dynamic table size update: 001 11110 -> 30.
            let mut decoder = ReprDecoder::new(&[0x3e], MAX_FIELD_SIZE);
            match decoder.decode() {
                Ok(Some(Representation::SizeUpdate { max_size })) => assert_eq!(max_size, 30),
                _ => panic!("ReprDecoder::decode() failed!"),
            }
        }
    }

    /// UT test cases for mid-representation fragment ends.
    ///
    /// # Brief
    /// 1. Feeds prefixes of a literal representation.
    /// 2. Checks that nothing is consumed until the representation is
    ///    complete.
    #[test]
    fn ut_repr_decoder_need_more() {
        let full = decode("040c2f73616d706c652f70617468").unwrap();
        for cut in 0..full.len() {
            let mut decoder = ReprDecoder::new(&full[..cut], MAX_FIELD_SIZE);
            match decoder.decode() {
                Ok(None) => assert_eq!(decoder.consumed(), 0),
                _ => panic!("ReprDecoder::decode() failed!"),
            }
        }

        // Two representations, the second cut short: only the first is
        // consumed.
        let bytes = decode("82418cf1e3").unwrap();
        let mut decoder = ReprDecoder::new(&bytes, MAX_FIELD_SIZE);
        assert!(matches!(
            decoder.decode(),
            Ok(Some(Representation::Indexed { index: 2 }))
        ));
        assert!(matches!(decoder.decode(), Ok(None)));
        assert_eq!(decoder.consumed(), 1);
    }

    /// UT test cases for malformed representations.
    ///
    /// # Brief
    /// 1. Decodes inputs carrying an index of zero, a NUL octet, an
    ///    oversized literal and a broken Huffman string.
    /// 2. Checks the reported errors.
    #[test]
    fn ut_repr_decoder_errors() {
        // Indexed representation with index 0.
        let mut decoder = ReprDecoder::new(&[0x80], MAX_FIELD_SIZE);
        assert_eq!(
            decoder.decode(),
            Err(HpackError::IndexOutOfRange { index: 0 })
        );

        // Plain literal value containing NUL.
        let mut decoder = ReprDecoder::new(&[0x04, 0x03, b'a', 0x00, b'b'], MAX_FIELD_SIZE);
        assert_eq!(decoder.decode(), Err(HpackError::NulInLiteral));

        // Plain literal longer than the configured field size.
        let mut decoder = ReprDecoder::new(&[0x04, 0x10, b'x'], 8);
        assert_eq!(
            decoder.decode(),
            Err(HpackError::FieldTooLarge { size: 16, limit: 8 })
        );

        // Huffman literal with illegal padding.
        let mut decoder = ReprDecoder::new(&[0x04, 0x82, 0xff, 0xff], MAX_FIELD_SIZE);
        assert!(matches!(
            decoder.decode(),
            Err(HpackError::HuffmanDecode(_))
        ));
    }
}
