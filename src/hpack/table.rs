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

//! The [`Static Table`][static_table] and [`Dynamic Table`][dynamic_table]
//! of HPACK, plus the encoder-side mirror with fast lookup.
//!
//! [static_table]: https://httpwg.org/specs/rfc7541.html#static.table
//! [dynamic_table]: https://httpwg.org/specs/rfc7541.html#dynamic.table
//!
//! The static table holds 61 fixed entries addressed by indexes 1 to 61.
//! Dynamic entries follow at index 62, most recently inserted first. Both
//! mutable tables account entries as `name + value + 32` octets and evict
//! oldest-first whenever an insertion or a size reduction would exceed the
//! maximum size.

use std::collections::{HashMap, VecDeque};

use crate::error::HpackError;

/// Index of the first dynamic table entry on the wire.
pub(crate) const DYNAMIC_START: usize = StaticTable::LEN + 1;

/// The table-accounting size of an entry.
///
/// RFC7541-4.1: the additional 32 octets account for an estimated overhead
/// associated with an entry.
pub(crate) fn entry_size(name: &[u8], value: &[u8]) -> usize {
    name.len() + value.len() + 32
}

/// A match found in the static or dynamic index space.
#[derive(Debug, Eq, PartialEq)]
pub(crate) enum TableIndex {
    /// Both name and value matched the entry at this wire index.
    Field(usize),
    /// Only the name matched the entry at this wire index.
    Name(usize),
}

/// The predefined static list of header fields, 1-based.
pub(crate) struct StaticTable;

impl StaticTable {
    pub(crate) const LEN: usize = 61;

    /// Gets the full entry at a 1-based static index.
    pub(crate) fn field(index: usize) -> Option<(&'static [u8], &'static [u8])> {
        match index {
            1..=Self::LEN => Some(ENTRIES[index - 1]),
            _ => None,
        }
    }

    /// Gets the name of the entry at a 1-based static index.
    pub(crate) fn field_name(index: usize) -> Option<&'static [u8]> {
        Self::field(index).map(|(name, _)| name)
    }

    /// Finds the best static match for a header field: a full match where
    /// the table carries the value, otherwise the lowest name match.
    pub(crate) fn index_of(name: &[u8], value: &[u8]) -> Option<TableIndex> {
        match name {
            b":authority" => Some(TableIndex::Name(1)),
            b":method" => Some(match value {
                b"GET" => TableIndex::Field(2),
                b"POST" => TableIndex::Field(3),
                _ => TableIndex::Name(2),
            }),
            b":path" => Some(match value {
                b"/" => TableIndex::Field(4),
                b"/index.html" => TableIndex::Field(5),
                _ => TableIndex::Name(4),
            }),
            b":scheme" => Some(match value {
                b"http" => TableIndex::Field(6),
                b"https" => TableIndex::Field(7),
                _ => TableIndex::Name(6),
            }),
            b":status" => Some(match value {
                b"200" => TableIndex::Field(8),
                b"204" => TableIndex::Field(9),
                b"206" => TableIndex::Field(10),
                b"304" => TableIndex::Field(11),
                b"400" => TableIndex::Field(12),
                b"404" => TableIndex::Field(13),
                b"500" => TableIndex::Field(14),
                _ => TableIndex::Name(8),
            }),
            b"accept-charset" => Some(TableIndex::Name(15)),
            b"accept-encoding" => Some(match value {
                b"gzip, deflate" => TableIndex::Field(16),
                _ => TableIndex::Name(16),
            }),
            b"accept-language" => Some(TableIndex::Name(17)),
            b"accept-ranges" => Some(TableIndex::Name(18)),
            b"accept" => Some(TableIndex::Name(19)),
            b"access-control-allow-origin" => Some(TableIndex::Name(20)),
            b"age" => Some(TableIndex::Name(21)),
            b"allow" => Some(TableIndex::Name(22)),
            b"authorization" => Some(TableIndex::Name(23)),
            b"cache-control" => Some(TableIndex::Name(24)),
            b"content-disposition" => Some(TableIndex::Name(25)),
            b"content-encoding" => Some(TableIndex::Name(26)),
            b"content-language" => Some(TableIndex::Name(27)),
            b"content-length" => Some(TableIndex::Name(28)),
            b"content-location" => Some(TableIndex::Name(29)),
            b"content-range" => Some(TableIndex::Name(30)),
            b"content-type" => Some(TableIndex::Name(31)),
            b"cookie" => Some(TableIndex::Name(32)),
            b"date" => Some(TableIndex::Name(33)),
            b"etag" => Some(TableIndex::Name(34)),
            b"expect" => Some(TableIndex::Name(35)),
            b"expires" => Some(TableIndex::Name(36)),
            b"from" => Some(TableIndex::Name(37)),
            b"host" => Some(TableIndex::Name(38)),
            b"if-match" => Some(TableIndex::Name(39)),
            b"if-modified-since" => Some(TableIndex::Name(40)),
            b"if-none-match" => Some(TableIndex::Name(41)),
            b"if-range" => Some(TableIndex::Name(42)),
            b"if-unmodified-since" => Some(TableIndex::Name(43)),
            b"last-modified" => Some(TableIndex::Name(44)),
            b"link" => Some(TableIndex::Name(45)),
            b"location" => Some(TableIndex::Name(46)),
            b"max-forwards" => Some(TableIndex::Name(47)),
            b"proxy-authenticate" => Some(TableIndex::Name(48)),
            b"proxy-authorization" => Some(TableIndex::Name(49)),
            b"range" => Some(TableIndex::Name(50)),
            b"referer" => Some(TableIndex::Name(51)),
            b"refresh" => Some(TableIndex::Name(52)),
            b"retry-after" => Some(TableIndex::Name(53)),
            b"server" => Some(TableIndex::Name(54)),
            b"set-cookie" => Some(TableIndex::Name(55)),
            b"strict-transport-security" => Some(TableIndex::Name(56)),
            b"transfer-encoding" => Some(TableIndex::Name(57)),
            b"user-agent" => Some(TableIndex::Name(58)),
            b"vary" => Some(TableIndex::Name(59)),
            b"via" => Some(TableIndex::Name(60)),
            b"www-authenticate" => Some(TableIndex::Name(61)),
            _ => None,
        }
    }
}

#[rustfmt::skip]
static ENTRIES: [(&[u8], &[u8]); StaticTable::LEN] = [
    (b":authority", b""),
    (b":method", b"GET"),
    (b":method", b"POST"),
    (b":path", b"/"),
    (b":path", b"/index.html"),
    (b":scheme", b"http"),
    (b":scheme", b"https"),
    (b":status", b"200"),
    (b":status", b"204"),
    (b":status", b"206"),
    (b":status", b"304"),
    (b":status", b"400"),
    (b":status", b"404"),
    (b":status", b"500"),
    (b"accept-charset", b""),
    (b"accept-encoding", b"gzip, deflate"),
    (b"accept-language", b""),
    (b"accept-ranges", b""),
    (b"accept", b""),
    (b"access-control-allow-origin", b""),
    (b"age", b""),
    (b"allow", b""),
    (b"authorization", b""),
    (b"cache-control", b""),
    (b"content-disposition", b""),
    (b"content-encoding", b""),
    (b"content-language", b""),
    (b"content-length", b""),
    (b"content-location", b""),
    (b"content-range", b""),
    (b"content-type", b""),
    (b"cookie", b""),
    (b"date", b""),
    (b"etag", b""),
    (b"expect", b""),
    (b"expires", b""),
    (b"from", b""),
    (b"host", b""),
    (b"if-match", b""),
    (b"if-modified-since", b""),
    (b"if-none-match", b""),
    (b"if-range", b""),
    (b"if-unmodified-since", b""),
    (b"last-modified", b""),
    (b"link", b""),
    (b"location", b""),
    (b"max-forwards", b""),
    (b"proxy-authenticate", b""),
    (b"proxy-authorization", b""),
    (b"range", b""),
    (b"referer", b""),
    (b"refresh", b""),
    (b"retry-after", b""),
    (b"server", b""),
    (b"set-cookie", b""),
    (b"strict-transport-security", b""),
    (b"transfer-encoding", b""),
    (b"user-agent", b""),
    (b"vary", b""),
    (b"via", b""),
    (b"www-authenticate", b""),
];

/// The decoder-side dynamic table: a FIFO of header fields, most recently
/// inserted first, bounded by a mutable maximum size that itself never
/// exceeds the negotiated protocol limit.
pub(crate) struct DynamicTable {
    queue: VecDeque<(Vec<u8>, Vec<u8>)>,
    curr_size: usize,
    max_size: usize,
    limit: usize,
}

impl DynamicTable {
    /// Creates a `DynamicTable` whose maximum size starts at the
    /// negotiated limit.
    pub(crate) fn with_limit(limit: usize) -> Self {
        Self {
            queue: VecDeque::new(),
            curr_size: 0,
            max_size: limit,
            limit,
        }
    }

    pub(crate) fn curr_size(&self) -> usize {
        self.curr_size
    }

    pub(crate) fn max_size(&self) -> usize {
        self.max_size
    }

    pub(crate) fn len(&self) -> usize {
        self.queue.len()
    }

    /// Gets the entry at a 0-based index counted from the most recent.
    pub(crate) fn field(&self, index: usize) -> Option<(&[u8], &[u8])> {
        self.queue
            .get(index)
            .map(|(n, v)| (n.as_slice(), v.as_slice()))
    }

    /// Gets the name of the entry at a 0-based index.
    pub(crate) fn field_name(&self, index: usize) -> Option<&[u8]> {
        self.queue.get(index).map(|(n, _)| n.as_slice())
    }

    /// Inserts a field as the new most-recent entry, evicting oldest
    /// entries as needed. An entry larger than the whole table leaves the
    /// table empty and is not stored.
    pub(crate) fn update(&mut self, name: Vec<u8>, value: Vec<u8>) {
        self.curr_size += entry_size(&name, &value);
        self.queue.push_front((name, value));
        self.fit_size();
    }

    /// Changes the table's maximum size, evicting oldest entries until the
    /// size invariant holds again.
    pub(crate) fn update_size(&mut self, max_size: usize) -> Result<(), HpackError> {
        if max_size > self.limit {
            return Err(HpackError::SizeUpdateOverLimit {
                requested: max_size,
                limit: self.limit,
            });
        }
        self.max_size = max_size;
        self.fit_size();
        Ok(())
    }

    /// Adjusts dynamic table content to fit its size.
    fn fit_size(&mut self) {
        while self.curr_size > self.max_size {
            match self.queue.pop_back() {
                Some((name, value)) => self.curr_size -= entry_size(&name, &value),
                None => break,
            }
        }
    }
}

/// The encoder-side mirror of the dynamic table.
///
/// Eviction follows the same byte accounting as [`DynamicTable`]; on top
/// of the FIFO, hash maps keyed by `(name, value)` and by name alone give
/// O(1) match lookup. Entries carry a monotonically increasing insertion
/// id, so a wire index is `62 + (newest_id - id)` and nothing needs
/// re-keying as entries age.
pub(crate) struct EncoderTable {
    queue: VecDeque<EncoderEntry>,
    by_field: HashMap<(Vec<u8>, Vec<u8>), u64>,
    by_name: HashMap<Vec<u8>, u64>,
    next_id: u64,
    curr_size: usize,
    max_size: usize,
}

struct EncoderEntry {
    name: Vec<u8>,
    value: Vec<u8>,
    id: u64,
}

impl EncoderTable {
    /// Creates an `EncoderTable` based on the size limit.
    pub(crate) fn with_max_size(max_size: usize) -> Self {
        Self {
            queue: VecDeque::new(),
            by_field: HashMap::new(),
            by_name: HashMap::new(),
            next_id: 0,
            curr_size: 0,
            max_size,
        }
    }

    pub(crate) fn curr_size(&self) -> usize {
        self.curr_size
    }

    pub(crate) fn max_size(&self) -> usize {
        self.max_size
    }

    pub(crate) fn len(&self) -> usize {
        self.queue.len()
    }

    /// Inserts a field as the new most-recent entry, evicting oldest
    /// entries as needed.
    pub(crate) fn update(&mut self, name: Vec<u8>, value: Vec<u8>) {
        let id = self.next_id;
        self.next_id += 1;
        self.curr_size += entry_size(&name, &value);
        self.by_field.insert((name.clone(), value.clone()), id);
        self.by_name.insert(name.clone(), id);
        self.queue.push_front(EncoderEntry { name, value, id });
        self.fit_size();
    }

    /// Changes the table's maximum size, evicting as needed.
    pub(crate) fn update_size(&mut self, max_size: usize) {
        self.max_size = max_size;
        self.fit_size();
    }

    /// Finds the best match across the static table and this table. Exact
    /// matches win over name matches; the static table wins ties.
    pub(crate) fn search(&self, name: &[u8], value: &[u8]) -> Option<TableIndex> {
        match (StaticTable::index_of(name, value), self.index_of(name, value)) {
            (x @ Some(TableIndex::Field(_)), _) => x,
            (_, y @ Some(TableIndex::Field(_))) => y,
            (x @ Some(TableIndex::Name(_)), _) => x,
            (_, y) => y,
        }
    }

    fn index_of(&self, name: &[u8], value: &[u8]) -> Option<TableIndex> {
        if self.queue.is_empty() {
            return None;
        }
        let newest = self.next_id - 1;
        if let Some(&id) = self.by_field.get(&(name.to_vec(), value.to_vec())) {
            return Some(TableIndex::Field(DYNAMIC_START + (newest - id) as usize));
        }
        self.by_name
            .get(name)
            .map(|&id| TableIndex::Name(DYNAMIC_START + (newest - id) as usize))
    }

    fn fit_size(&mut self) {
        while self.curr_size > self.max_size {
            let EncoderEntry { name, value, id } = match self.queue.pop_back() {
                Some(entry) => entry,
                None => break,
            };
            self.curr_size -= entry_size(&name, &value);
            // A newer entry may have reclaimed the same key; only drop the
            // mapping if it still points at the evicted entry.
            if self.by_name.get(&name) == Some(&id) {
                self.by_name.remove(&name);
            }
            let key = (name, value);
            if self.by_field.get(&key) == Some(&id) {
                self.by_field.remove(&key);
            }
        }
    }
}
