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

//! [Integer Representation] of HPACK.
//!
//! [Integer Representation]: https://httpwg.org/specs/rfc7541.html#integer.representation
//!
//! Integers represent table indexes, string lengths and table sizes. A
//! value that fits below the prefix mask is carried in the prefix itself;
//! otherwise the prefix is saturated and the remainder follows as base-128
//! continuation bytes, least-significant chunk first.

use core::cmp::Ordering;

use crate::error::HpackError;

/// `IntegerDecoder` implementation according to `Pseudocode to decode an
/// integer I` in `RFC7541 section-5.1`.
///
/// # Pseudocode
/// ```text
/// decode I from the next N bits
/// if I < 2^N - 1, return I
/// else
///     M = 0
///     repeat
///         B = next octet
///         I = I + (B & 127) * 2^M
///         M = M + 7
///     while B & 128 == 128
///     return I
/// ```
pub(crate) struct IntegerDecoder {
    value: usize,
    shift: u32,
}

impl IntegerDecoder {
    /// Calculates an integer based on the incoming first byte and mask.
    /// If no subsequent bytes exist, return the result directly, otherwise
    /// return the decoder itself.
    pub(crate) fn first_byte(byte: u8, mask: u8) -> Result<usize, Self> {
        let value = byte & mask;
        match value.cmp(&mask) {
            Ordering::Less => Ok(value as usize),
            _ => Err(Self {
                value: value as usize,
                shift: 1,
            }),
        }
    }

    /// Continues computing the integer based on the next byte of the input.
    /// Returns `Ok(Some(value))` once the continuation sequence ends,
    /// `Ok(None)` while more bytes follow, and an error if the accumulated
    /// value is no longer representable.
    pub(crate) fn next_byte(&mut self, byte: u8) -> Result<Option<usize>, HpackError> {
        self.value = 1usize
            .checked_shl(self.shift - 1)
            .and_then(|res| res.checked_mul((byte & 0x7f) as usize))
            .and_then(|res| res.checked_add(self.value))
            .ok_or(HpackError::IntegerOverflow)?;
        self.shift += 7;
        match (byte & 0x80) == 0x00 {
            true => Ok(Some(self.value)),
            false => Ok(None),
        }
    }
}

/// `IntegerEncoder` implementation according to `Pseudocode to represent an
/// integer I` in `RFC7541 section-5.1`.
///
/// # Pseudocode
/// ```text
/// if I < 2^N - 1, encode I on N bits
/// else
///     encode (2^N - 1) on N bits
///     I = I - (2^N - 1)
///     while I >= 128
///          encode (I % 128 + 128) on 8 bits
///          I = I / 128
///     encode I on 8 bits
/// ```
pub(crate) struct IntegerEncoder {
    i: usize,
    mask: u8,
    pre: u8,
    state: IntegerEncodeState,
}

enum IntegerEncodeState {
    First,
    Other,
    Finish,
}

impl IntegerEncoder {
    /// Creates a new `IntegerEncoder`.
    pub(crate) fn new(i: usize, mask: u8, pre: u8) -> Self {
        Self {
            i,
            mask,
            pre,
            state: IntegerEncodeState::First,
        }
    }

    /// Gets the next byte of the integer. If no remaining bytes are
    /// calculated, return `None`.
    pub(crate) fn next_byte(&mut self) -> Option<u8> {
        match self.state {
            IntegerEncodeState::First => {
                if self.i < self.mask as usize {
                    self.state = IntegerEncodeState::Finish;
                    return Some(self.pre | (self.i as u8));
                }
                self.i -= self.mask as usize;
                self.state = IntegerEncodeState::Other;
                Some(self.pre | self.mask)
            }
            IntegerEncodeState::Other => Some(if self.i >= 128 {
                let res = (self.i & 0x7f) as u8;
                self.i >>= 7;
                res | 0x80
            } else {
                self.state = IntegerEncodeState::Finish;
                (self.i & 0x7f) as u8
            }),
            IntegerEncodeState::Finish => None,
        }
    }
}
