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

//! [HPACK] header compression for the Skylark web server's HTTP/2 transport.
//!
//! [HPACK]: https://httpwg.org/specs/rfc7541.html
//!
//! This crate implements both halves of the RFC 7541 codec:
//!
//! - [`HpackDecoder`] consumes header-block fragments received from the
//!   peer and emits decoded `(name, value)` pairs through a [`HeaderSink`].
//! - [`HpackEncoder`] turns an outgoing header collection (plus an optional
//!   response status) into header-block bytes, writing into caller-supplied
//!   buffers and resuming across calls via a [`FieldCursor`].
//!
//! Both sides keep a connection-scoped, byte-accounted FIFO table whose
//! state must stay in step with the peer for the lifetime of the
//! connection. The codec performs no I/O and no locking; the connection
//! loop that owns it is responsible for serializing decode calls in wire
//! order and encode calls in write order.

// Table size accessors are exercised by the unit tests only.
#![allow(dead_code)]

mod error;
mod field;
mod hpack;
mod huffman;

pub(crate) mod util;

pub use error::HpackError;
pub use field::{FieldCursor, HeaderField, HeaderSink};
pub use hpack::{HpackDecoder, HpackEncoder};
pub use huffman::HuffmanDecodeError;
