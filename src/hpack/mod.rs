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

//! [HPACK] implementation for the HTTP/2 transport.
//!
//! [HPACK]: https://httpwg.org/specs/rfc7541.html
//!
//! HPACK eliminates redundant header fields with a bounded memory
//! requirement: both endpoints keep a size-limited dynamic table of
//! recently transmitted fields and reference entries by index instead of
//! retransmitting bytes. The format is intentionally simple and
//! inflexible; both characteristics reduce the risk of interoperability
//! or security issues due to implementation error.

mod decoder;
mod encoder;
mod integer;
mod representation;
pub(crate) mod table;

pub use decoder::HpackDecoder;
pub use encoder::HpackEncoder;
