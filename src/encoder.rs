// Copyright (c) 2023 Huawei Device Co., Ltd.
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

//! Encoder implementation of [`HPACK`], response side.
//!
//! [`HPACK`]: https://httpwg.org/specs/rfc7541.html

use crate::error::H2Error;
use crate::field::HeaderField;
use crate::representation::{
    Indexed, Indexing, IndexingWithName, NeverIndexed, NeverIndexedWithName, WithoutIndexing,
    WithoutIndexingWithName,
};
use crate::table::{DynamicTable, StaticTable, TableIndex, ENTRY_OVERHEAD};

/// Entry size of the `:status` pseudo-header with a three-digit code.
const STATUS_FIELD_SIZE: usize = 7 + 3 + ENTRY_OVERHEAD;

/// One `HpackEncoder` exists per HTTP/2 connection, in the server-to-client
/// direction. It owns the dynamic table for that direction and writes
/// header blocks into caller-provided buffers, splitting a block over
/// several calls when a buffer fills up.
///
/// The encoder is single-threaded: every call runs to completion on the
/// caller's thread and performs no I/O. Fields are processed strictly in
/// producer order, and the resulting sequence of table insertions and
/// evictions is exactly what the peer decoder reconstructs from the
/// emitted bytes.
pub struct HpackEncoder {
    table: DynamicTable,
    /// A field that did not fit the previous buffer, parked until the next
    /// driver call.
    pending: Option<HeaderField>,
    max_header_list_size: usize,
    use_huffman: bool,
    sensitive: Option<Box<dyn Fn(&str, &str) -> bool>>,
}

impl HpackEncoder {
    /// Creates a `HpackEncoder` with the given max dynamic table size and
    /// huffman usage. The table size must equal the peer's declared
    /// `SETTINGS_HEADER_TABLE_SIZE` (4096 by default).
    pub fn new(max_size: usize, use_huffman: bool) -> Self {
        Self {
            table: DynamicTable::with_max_size(max_size),
            pending: None,
            max_header_list_size: usize::MAX,
            use_huffman,
            sensitive: None,
        }
    }

    /// Installs the predicate deciding which fields are too sensitive to
    /// ever be indexed, by this encoder or by any intermediary. It is
    /// consulted at most once per field. Without one, no field is
    /// sensitive.
    pub fn set_sensitive_filter<F>(&mut self, filter: F)
    where
        F: Fn(&str, &str) -> bool + 'static,
    {
        self.sensitive = Some(Box::new(filter));
    }

    /// Updates the dynamic table size cap, evicting oldest entries until
    /// the occupancy fits. Note that the `Dynamic Table Size Update`
    /// signal itself is owned by the framing layer, not emitted here.
    pub fn set_max_header_table_size(&mut self, size: usize) {
        self.table.update_size(size);
    }

    /// Updates the limit used by [`Self::validate_header_list_size`],
    /// normally the peer's `SETTINGS_MAX_HEADER_LIST_SIZE`.
    pub fn set_max_header_list_size(&mut self, size: usize) {
        self.max_header_list_size = size;
    }

    /// Current dynamic table occupancy, as the sum of RFC7541 §4.1 entry
    /// sizes.
    pub fn dynamic_table_size(&self) -> usize {
        self.table.curr_size()
    }

    /// Whether the previous header block was written out completely.
    pub fn is_finished(&self) -> bool {
        self.pending.is_none()
    }

    /// Starts a header block: encodes the status pseudo-header if one is
    /// given, then fields from the producer, writing as much as fits into
    /// `dst`. Returns the number of bytes written and whether the block is
    /// complete. An incomplete block is resumed with
    /// [`Self::continue_headers`] after the caller has flushed `dst` as a
    /// HEADERS frame. Any unfinished previous block is discarded.
    ///
    /// A status code that does not fit is an error: the status prefix is
    /// tiny, so a failure means the caller supplied an undersized buffer.
    pub fn encode_headers<I>(
        &mut self,
        status: Option<u16>,
        fields: &mut I,
        dst: &mut [u8],
    ) -> Result<(usize, bool), H2Error>
    where
        I: Iterator<Item = HeaderField>,
    {
        self.pending = None;
        let mut cur = 0;
        if let Some(code) = status {
            match self.encode_status(code, dst) {
                Some(size) => cur += size,
                None => return Err(H2Error::EncodingFailure),
            }
        }
        self.drive(fields, dst, cur, false)
    }

    /// Continues an incomplete header block into a fresh buffer, for the
    /// caller's CONTINUATION frames. A call that cannot write even one
    /// field is an error; otherwise a single field larger than every
    /// buffer would loop forever.
    pub fn continue_headers<I>(
        &mut self,
        fields: &mut I,
        dst: &mut [u8],
    ) -> Result<(usize, bool), H2Error>
    where
        I: Iterator<Item = HeaderField>,
    {
        self.drive(fields, dst, 0, true)
    }

    /// Pre-flight check of a whole header list against the peer's
    /// `SETTINGS_MAX_HEADER_LIST_SIZE`, summing RFC7541 §4.1 entry sizes.
    /// Runs before any table mutation, so a rejected block leaves the
    /// encoder state unchanged. At the default (unbounded) limit the walk
    /// is skipped.
    pub fn validate_header_list_size<'a, I>(
        &self,
        include_status: bool,
        fields: I,
    ) -> Result<(), H2Error>
    where
        I: IntoIterator<Item = &'a HeaderField>,
    {
        if self.max_header_list_size == usize::MAX {
            return Ok(());
        }
        let mut total = if include_status { STATUS_FIELD_SIZE } else { 0 };
        for field in fields {
            total += field.size();
            if total > self.max_header_list_size {
                return Err(H2Error::HeaderListOverflow(self.max_header_list_size));
            }
        }
        Ok(())
    }

    /// Writes the parked field (if any) and then fields from the producer
    /// until it is exhausted or `dst` fills up.
    fn drive<I>(
        &mut self,
        fields: &mut I,
        dst: &mut [u8],
        mut cur: usize,
        strict: bool,
    ) -> Result<(usize, bool), H2Error>
    where
        I: Iterator<Item = HeaderField>,
    {
        if let Some(field) = self.pending.take() {
            match self.encode_field(&field, &mut dst[cur..]) {
                Some(size) => cur += size,
                None => {
                    self.pending = Some(field);
                    if strict && cur == 0 {
                        return Err(H2Error::EncodingFailure);
                    }
                    return Ok((cur, false));
                }
            }
        }
        for field in fields {
            match self.encode_field(&field, &mut dst[cur..]) {
                Some(size) => cur += size,
                None => {
                    self.pending = Some(field);
                    if strict && cur == 0 {
                        return Err(H2Error::EncodingFailure);
                    }
                    return Ok((cur, false));
                }
            }
        }
        Ok((cur, true))
    }

    /// Seven common codes are written as a single indexed byte; any other
    /// code takes the general path with the static `:status` name index
    /// and a literal value.
    fn encode_status(&mut self, code: u16, dst: &mut [u8]) -> Option<usize> {
        match StaticTable::status_index(code) {
            Some(index) => Indexed::new(index).encode(dst),
            None => self.encode_with_hint(
                ":status",
                code.to_string().as_str(),
                Some(StaticTable::STATUS),
                dst,
            ),
        }
    }

    fn encode_field(&mut self, field: &HeaderField, dst: &mut [u8]) -> Option<usize> {
        self.encode_with_hint(
            field.name().as_str(),
            field.value(),
            field.name().static_index(),
            dst,
        )
    }

    /// Picks one of the six representation forms for a single field and
    /// writes it. Returns `None` if `dst` cannot hold it. The dynamic
    /// table is mutated only after a successful write, so a refused write
    /// leaves the encoder and the peer in agreement.
    ///
    /// Whenever both a static and a dynamic name index are usable, the
    /// static one is chosen: it is smaller and does not depend on peer
    /// synchronisation.
    fn encode_with_hint(
        &mut self,
        name: &str,
        value: &str,
        static_hint: Option<usize>,
        dst: &mut [u8],
    ) -> Option<usize> {
        let size = name.len() + value.len() + ENTRY_OVERHEAD;

        // Sensitive fields are never indexed anywhere; an intermediary
        // re-encoding them must keep them literal as well.
        if self.is_sensitive(name, value) {
            let index = static_hint.or_else(|| match self.table.search(name, value) {
                Some(TableIndex::Field(index)) | Some(TableIndex::Name(index)) => Some(index),
                None => None,
            });
            return match index {
                Some(index) => NeverIndexed::new(index, value, self.use_huffman).encode(dst),
                None => NeverIndexedWithName::new(name, value, self.use_huffman).encode(dst),
            };
        }

        // A zero-sized table cannot hold anything, so the dynamic table is
        // neither consulted nor touched.
        if self.table.max_size() == 0 {
            return match static_hint {
                Some(index) => WithoutIndexing::new(index, value, self.use_huffman).encode(dst),
                None => WithoutIndexingWithName::new(name, value, self.use_huffman).encode(dst),
            };
        }

        // A field larger than the whole table would flush every entry on
        // insertion, so it bypasses the table instead.
        if size > self.table.max_size() {
            let index = static_hint.or_else(|| match self.table.search(name, value) {
                Some(TableIndex::Field(index)) | Some(TableIndex::Name(index)) => Some(index),
                None => None,
            });
            return match index {
                Some(index) => WithoutIndexing::new(index, value, self.use_huffman).encode(dst),
                None => WithoutIndexingWithName::new(name, value, self.use_huffman).encode(dst),
            };
        }

        match self.table.search(name, value) {
            Some(TableIndex::Field(index)) => Indexed::new(index).encode(dst),
            Some(TableIndex::Name(index)) => {
                let written = Indexing::new(static_hint.unwrap_or(index), value, self.use_huffman)
                    .encode(dst)?;
                self.table.ensure_capacity(size);
                self.table.insert(name.to_string(), value.to_string(), size);
                Some(written)
            }
            None => {
                let written = match static_hint {
                    Some(index) => Indexing::new(index, value, self.use_huffman).encode(dst)?,
                    None => IndexingWithName::new(name, value, self.use_huffman).encode(dst)?,
                };
                self.table.ensure_capacity(size);
                self.table.insert(name.to_string(), value.to_string(), size);
                Some(written)
            }
        }
    }

    fn is_sensitive(&self, name: &str, value: &str) -> bool {
        match &self.sensitive {
            Some(filter) => filter(name, value),
            None => false,
        }
    }
}
