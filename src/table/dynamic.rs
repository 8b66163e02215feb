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

//! The [`Dynamic Table`][dynamic_table] implementation of [HPACK],
//! encoder side.
//!
//! [dynamic_table]: https://httpwg.org/specs/rfc7541.html#dynamic.table
//! [HPACK]: https://httpwg.org/specs/rfc7541.html
//!
//! # Introduction
//! The dynamic table consists of a list of header fields maintained in
//! first-in, first-out order. The first and newest entry of a dynamic
//! table is at the lowest index, and the oldest entry of a dynamic table
//! is at the highest index. The encoder decides how to update the dynamic
//! table and as such can control how much memory is used by it; every
//! insertion and eviction here is reproduced by the peer decoder from the
//! emitted representations, so both sides stay in lockstep.
//!
//! # Layout
//! Entries live in an arena. Slot [`SENTINEL`] anchors a circular doubly
//! linked list in age order: `sentinel.next_in_list` is the oldest live
//! entry (the eviction victim), `sentinel.prev_in_list` the newest. A
//! small array of singly linked bucket chains indexes entries by name
//! hash for lookups. Evicted slots are detached and parked on a free
//! stack for reuse, so steady-state encoding does not allocate.

use crate::table::{TableIndex, ENTRY_OVERHEAD, STATIC_TABLE_LEN};

/// Number of hash buckets. The dynamic table rarely holds more than a few
/// dozen entries, so a small power of two keeps chains short without
/// wasting cache.
const BUCKET_COUNT: usize = 16;
const BUCKET_MASK: u32 = BUCKET_COUNT as u32 - 1;

/// Null link.
const NIL: usize = usize::MAX;

/// Arena slot of the age-list sentinel.
const SENTINEL: usize = 0;

struct Entry {
    name: String,
    value: String,
    /// Cached `fnv1a(name)`.
    hash: u32,
    /// Insertion sequence number, strictly decreasing with each insert.
    /// The wire index of a live entry is recovered from the distance to
    /// the newest sequence number.
    seq: i32,
    next_in_bucket: usize,
    prev_in_list: usize,
    next_in_list: usize,
}

impl Entry {
    /// The sentinel starts self-linked with the maximum sequence number,
    /// so the first real insertion gets `i32::MAX - 1` and wire index 62.
    fn sentinel() -> Self {
        Self {
            name: String::new(),
            value: String::new(),
            hash: 0,
            seq: i32::MAX,
            next_in_bucket: NIL,
            prev_in_list: SENTINEL,
            next_in_list: SENTINEL,
        }
    }
}

pub(crate) struct DynamicTable {
    entries: Vec<Entry>,
    buckets: [usize; BUCKET_COUNT],
    /// The entry pool: detached slots awaiting reuse.
    free: Vec<usize>,
    curr_size: usize,
    max_size: usize,
}

impl DynamicTable {
    /// Creates a `DynamicTable` based on the size limit.
    pub(crate) fn with_max_size(max_size: usize) -> Self {
        Self {
            entries: vec![Entry::sentinel()],
            buckets: [NIL; BUCKET_COUNT],
            free: Vec::new(),
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

    /// Searches the live entries for the given field. A full (name, value)
    /// match wins and is returned as [`TableIndex::Field`]; otherwise the
    /// first entry with a matching name yields [`TableIndex::Name`]. Both
    /// carry wire indices into the combined index space.
    pub(crate) fn search(&self, name: &str, value: &str) -> Option<TableIndex> {
        let hash = fnv1a(name.as_bytes());
        let mut name_only = None;
        let mut slot = self.buckets[(hash & BUCKET_MASK) as usize];
        while slot != NIL {
            let entry = &self.entries[slot];
            if entry.hash == hash {
                if entry.value == value && entry.name == name {
                    return Some(TableIndex::Field(self.wire_index(entry.seq)));
                }
                if name_only.is_none() && entry.name == name {
                    name_only = Some(TableIndex::Name(self.wire_index(entry.seq)));
                }
            }
            slot = entry.next_in_bucket;
        }
        name_only
    }

    /// Evicts oldest entries until `size` more octets fit under the size
    /// cap. Callers must have checked `size <= max_size` beforehand.
    pub(crate) fn ensure_capacity(&mut self, size: usize) {
        while self.max_size - self.curr_size < size {
            self.evict_oldest();
        }
    }

    /// Inserts a field as the newest entry, reusing a pooled slot when one
    /// is available. Capacity for `size` octets must already have been
    /// reserved via [`Self::ensure_capacity`].
    pub(crate) fn insert(&mut self, name: String, value: String, size: usize) {
        let hash = fnv1a(name.as_bytes());
        if self.entries[self.entries[SENTINEL].prev_in_list].seq == i32::MIN {
            self.rebase();
        }
        let seq = self.entries[self.entries[SENTINEL].prev_in_list].seq - 1;

        let slot = match self.free.pop() {
            Some(slot) => {
                let entry = &mut self.entries[slot];
                entry.name = name;
                entry.value = value;
                entry.hash = hash;
                entry.seq = seq;
                slot
            }
            None => {
                self.entries.push(Entry {
                    name,
                    value,
                    hash,
                    seq,
                    next_in_bucket: NIL,
                    prev_in_list: NIL,
                    next_in_list: NIL,
                });
                self.entries.len() - 1
            }
        };

        let bucket = (hash & BUCKET_MASK) as usize;
        self.entries[slot].next_in_bucket = self.buckets[bucket];
        self.buckets[bucket] = slot;

        // Link as the newest entry, immediately before the sentinel.
        let prev = self.entries[SENTINEL].prev_in_list;
        self.entries[slot].prev_in_list = prev;
        self.entries[slot].next_in_list = SENTINEL;
        self.entries[prev].next_in_list = slot;
        self.entries[SENTINEL].prev_in_list = slot;

        self.curr_size += size;
    }

    /// Updates the size cap and evicts oldest entries until the occupancy
    /// fits again.
    pub(crate) fn update_size(&mut self, max_size: usize) {
        self.max_size = max_size;
        while self.curr_size > self.max_size {
            self.evict_oldest();
        }
    }

    /// Wire index of a live entry: dynamic entries are numbered from
    /// `STATIC_TABLE_LEN + 1` at the newest insertion, growing with age.
    fn wire_index(&self, seq: i32) -> usize {
        let newest = self.entries[self.entries[SENTINEL].prev_in_list].seq;
        (seq - newest) as usize + 1 + STATIC_TABLE_LEN
    }

    fn evict_oldest(&mut self) {
        let slot = self.entries[SENTINEL].next_in_list;
        debug_assert_ne!(slot, SENTINEL, "evicting from an empty table");

        let next = self.entries[slot].next_in_list;
        self.entries[SENTINEL].next_in_list = next;
        self.entries[next].prev_in_list = SENTINEL;

        let bucket = (self.entries[slot].hash & BUCKET_MASK) as usize;
        let mut cursor = self.buckets[bucket];
        if cursor == slot {
            self.buckets[bucket] = self.entries[slot].next_in_bucket;
        } else {
            while self.entries[cursor].next_in_bucket != slot {
                cursor = self.entries[cursor].next_in_bucket;
            }
            self.entries[cursor].next_in_bucket = self.entries[slot].next_in_bucket;
        }

        let entry = &mut self.entries[slot];
        self.curr_size -= entry.name.len() + entry.value.len() + ENTRY_OVERHEAD;
        entry.name.clear();
        entry.value.clear();
        entry.hash = 0;
        entry.next_in_bucket = NIL;
        entry.prev_in_list = NIL;
        entry.next_in_list = NIL;
        self.free.push(slot);
    }

    /// Renumbers all live entries downward from `i32::MAX - 1`, oldest
    /// first. Only reached after ~2^31 insertions on one connection.
    fn rebase(&mut self) {
        let mut seq = i32::MAX;
        let mut slot = self.entries[SENTINEL].next_in_list;
        while slot != SENTINEL {
            seq -= 1;
            self.entries[slot].seq = seq;
            slot = self.entries[slot].next_in_list;
        }
    }

    /// Number of live entries, counted by walking the age list.
    #[cfg(test)]
    fn len(&self) -> usize {
        let mut count = 0;
        let mut slot = self.entries[SENTINEL].next_in_list;
        while slot != SENTINEL {
            count += 1;
            slot = self.entries[slot].next_in_list;
        }
        count
    }
}

/// FNV-1a over the name octets. Stable within an encoder instance, which
/// is all that index correctness requires; equal names always hash equal.
fn fnv1a(bytes: &[u8]) -> u32 {
    let mut hash = 0x811c_9dc5u32;
    for byte in bytes {
        hash ^= *byte as u32;
        hash = hash.wrapping_mul(0x0100_0193);
    }
    hash
}

#[cfg(test)]
mod ut_dynamic_table {
    use super::*;

    fn insert(table: &mut DynamicTable, name: &str, value: &str) {
        let size = name.len() + value.len() + ENTRY_OVERHEAD;
        table.ensure_capacity(size);
        table.insert(String::from(name), String::from(value), size);
    }

    fn field_index(table: &DynamicTable, name: &str, value: &str) -> Option<usize> {
        match table.search(name, value) {
            Some(TableIndex::Field(index)) => Some(index),
            _ => None,
        }
    }

    /// UT test cases for `DynamicTable::with_max_size`.
    ///
    /// # Brief
    /// 1. Calls `DynamicTable::with_max_size` to create a `DynamicTable`.
    /// 2. Checks the results.
    #[test]
    fn ut_dynamic_table_with_max_size() {
        let table = DynamicTable::with_max_size(4096);
        assert_eq!(table.len(), 0);
        assert_eq!(table.curr_size(), 0);
        assert_eq!(table.max_size(), 4096);
        assert_eq!(table.entries[SENTINEL].seq, i32::MAX);
    }

    /// UT test cases for `DynamicTable::insert` and
    /// `DynamicTable::search`.
    ///
    /// # Brief
    /// 1. Inserts a field and searches for it by (name, value) and by
    ///    name.
    /// 2. Checks wire indices, occupancy and misses.
    #[test]
    fn ut_dynamic_table_insert_and_search() {
        let mut table = DynamicTable::with_max_size(4096);
        assert!(table.search("custom-key", "custom-value").is_none());

        insert(&mut table, "custom-key", "custom-value");
        assert_eq!(table.curr_size(), 74);
        assert_eq!(field_index(&table, "custom-key", "custom-value"), Some(62));
        match table.search("custom-key", "other-value") {
            Some(TableIndex::Name(62)) => {}
            _ => panic!("DynamicTable::search() failed!"),
        }
        assert!(table.search("other-key", "custom-value").is_none());
    }

    /// UT test cases for wire-index numbering.
    ///
    /// # Brief
    /// 1. Inserts three fields.
    /// 2. Checks that the newest entry is at index 62 and indices grow
    ///    with age, densely.
    #[test]
    fn ut_dynamic_table_wire_indices() {
        let mut table = DynamicTable::with_max_size(4096);
        insert(&mut table, "aaa", "1");
        insert(&mut table, "bbb", "2");
        insert(&mut table, "ccc", "3");

        assert_eq!(field_index(&table, "ccc", "3"), Some(62));
        assert_eq!(field_index(&table, "bbb", "2"), Some(63));
        assert_eq!(field_index(&table, "aaa", "1"), Some(64));
    }

    /// UT test cases for FIFO eviction on insertion.
    ///
    /// # Brief
    /// 1. Fills a small table, then inserts one more field.
    /// 2. Checks that the oldest entry was evicted and occupancy is
    ///    correct.
    #[test]
    fn ut_dynamic_table_eviction() {
        let mut table = DynamicTable::with_max_size(70);
        insert(&mut table, "aaa", "bbb");
        assert_eq!(table.curr_size(), 38);

        insert(&mut table, "ccc", "ddd");
        assert_eq!(table.curr_size(), 38);
        assert_eq!(table.len(), 1);
        assert!(table.search("aaa", "bbb").is_none());
        assert_eq!(field_index(&table, "ccc", "ddd"), Some(62));
    }

    /// UT test cases for `DynamicTable::update_size`.
    ///
    /// # Brief
    /// 1. Inserts three fields, then lowers the size cap twice.
    /// 2. Checks that eviction happens from the oldest end only, and that
    ///    a zero cap empties the table.
    #[test]
    fn ut_dynamic_table_update_size() {
        let mut table = DynamicTable::with_max_size(4096);
        insert(&mut table, "aaa", "1"); // 36 octets
        insert(&mut table, "bbb", "2");
        insert(&mut table, "ccc", "3");
        assert_eq!(table.curr_size(), 108);

        table.update_size(80);
        assert_eq!(table.len(), 2);
        assert!(table.search("aaa", "1").is_none());
        assert_eq!(field_index(&table, "ccc", "3"), Some(62));
        assert_eq!(field_index(&table, "bbb", "2"), Some(63));

        table.update_size(0);
        assert_eq!(table.len(), 0);
        assert_eq!(table.curr_size(), 0);
        assert!(table.search("ccc", "3").is_none());
    }

    /// UT test cases for the entry pool.
    ///
    /// # Brief
    /// 1. Inserts and evicts entries, then inserts again.
    /// 2. Checks that evicted slots are detached, parked on the free
    ///    stack and reused instead of growing the arena.
    #[test]
    fn ut_dynamic_table_entry_pool() {
        let mut table = DynamicTable::with_max_size(4096);
        insert(&mut table, "aaa", "bbb");
        insert(&mut table, "ccc", "ddd");
        assert_eq!(table.entries.len(), 3);

        table.update_size(0);
        assert_eq!(table.free.len(), 2);
        for slot in table.free.iter() {
            let entry = &table.entries[*slot];
            assert!(entry.name.is_empty());
            assert!(entry.value.is_empty());
            assert_eq!(entry.next_in_bucket, NIL);
            assert_eq!(entry.prev_in_list, NIL);
            assert_eq!(entry.next_in_list, NIL);
        }

        table.update_size(4096);
        insert(&mut table, "eee", "fff");
        assert_eq!(table.entries.len(), 3);
        assert_eq!(table.free.len(), 1);
        assert_eq!(field_index(&table, "eee", "fff"), Some(62));
    }

    /// UT test cases for duplicate names in one bucket chain.
    ///
    /// # Brief
    /// 1. Inserts two fields sharing a name.
    /// 2. Checks that an exact search still finds each value and that a
    ///    name-only search returns the most recent insertion, which sits
    ///    at its bucket head.
    #[test]
    fn ut_dynamic_table_duplicate_names() {
        let mut table = DynamicTable::with_max_size(4096);
        insert(&mut table, "cache-control", "no-cache");
        insert(&mut table, "cache-control", "private");

        assert_eq!(field_index(&table, "cache-control", "private"), Some(62));
        assert_eq!(field_index(&table, "cache-control", "no-cache"), Some(63));
        match table.search("cache-control", "no-store") {
            Some(TableIndex::Name(62)) => {}
            _ => panic!("DynamicTable::search() failed!"),
        }
    }

    /// UT test cases for sequence-number re-basing.
    ///
    /// # Brief
    /// 1. Inserts two fields and rewrites their sequence numbers to the
    ///    bottom of the `i32` range, as if ~2^31 insertions had happened.
    /// 2. Inserts another field.
    /// 3. Checks that the insertion succeeded and wire indices are still
    ///    dense and correctly ordered.
    #[test]
    fn ut_dynamic_table_seq_rebase() {
        let mut table = DynamicTable::with_max_size(4096);
        insert(&mut table, "aaa", "1");
        insert(&mut table, "bbb", "2");

        let oldest = table.entries[SENTINEL].next_in_list;
        let newest = table.entries[SENTINEL].prev_in_list;
        table.entries[oldest].seq = i32::MIN + 1;
        table.entries[newest].seq = i32::MIN;

        insert(&mut table, "ccc", "3");
        assert_eq!(field_index(&table, "ccc", "3"), Some(62));
        assert_eq!(field_index(&table, "bbb", "2"), Some(63));
        assert_eq!(field_index(&table, "aaa", "1"), Some(64));
        assert_eq!(table.entries[table.entries[SENTINEL].next_in_list].seq, i32::MAX - 1);
    }

    /// UT test cases for `DynamicTable::ensure_capacity`.
    ///
    /// # Brief
    /// 1. Fills a table, then reserves room for a field that does not fit.
    /// 2. Checks that exactly enough oldest entries were evicted.
    #[test]
    fn ut_dynamic_table_ensure_capacity() {
        let mut table = DynamicTable::with_max_size(120);
        insert(&mut table, "aaa", "1"); // 36 octets each
        insert(&mut table, "bbb", "2");
        insert(&mut table, "ccc", "3");
        assert_eq!(table.curr_size(), 108);

        table.ensure_capacity(36);
        assert_eq!(table.len(), 2);
        assert!(table.search("aaa", "1").is_none());
        assert!(table.search("bbb", "2").is_some());
    }
}
