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

//! The primitive encoders, one per representation form.
//!
//! Each form writes its *complete* representation into the destination and
//! returns the number of bytes written, or returns `None` when the
//! destination cannot hold all of it. After a `None` the caller must not
//! advance its write cursor; bytes past the cursor are scratch space and a
//! representation is never observed partially written.

use crate::huffman::huffman_encode;
use crate::integer::encode_integer;
use crate::representation::PrefixIndexMask;

/// `Indexed Header Field`. References a (name, value) entry in the
/// combined static + dynamic index space.
pub(crate) struct Indexed {
    index: usize,
}

impl Indexed {
    pub(crate) fn new(index: usize) -> Self {
        Self { index }
    }

    pub(crate) fn encode(&self, dst: &mut [u8]) -> Option<usize> {
        encode_integer(self.index, PrefixIndexMask::INDEXED.0, 0x80, dst)
    }
}

/// `Literal Header Field with Incremental Indexing` with an indexed name.
pub(crate) struct Indexing<'a> {
    index: usize,
    value: &'a str,
    huffman: bool,
}

impl<'a> Indexing<'a> {
    pub(crate) fn new(index: usize, value: &'a str, huffman: bool) -> Self {
        Self {
            index,
            value,
            huffman,
        }
    }

    pub(crate) fn encode(&self, dst: &mut [u8]) -> Option<usize> {
        let mut cur = encode_integer(
            self.index,
            PrefixIndexMask::LITERAL_WITH_INDEXING.0,
            0x40,
            dst,
        )?;
        cur += write_string(self.value, self.huffman, &mut dst[cur..])?;
        Some(cur)
    }
}

/// `Literal Header Field with Incremental Indexing` with a new name.
pub(crate) struct IndexingWithName<'a> {
    name: &'a str,
    value: &'a str,
    huffman: bool,
}

impl<'a> IndexingWithName<'a> {
    pub(crate) fn new(name: &'a str, value: &'a str, huffman: bool) -> Self {
        Self {
            name,
            value,
            huffman,
        }
    }

    pub(crate) fn encode(&self, dst: &mut [u8]) -> Option<usize> {
        let mut cur = encode_integer(0, PrefixIndexMask::LITERAL_WITH_INDEXING.0, 0x40, dst)?;
        cur += write_string(self.name, self.huffman, &mut dst[cur..])?;
        cur += write_string(self.value, self.huffman, &mut dst[cur..])?;
        Some(cur)
    }
}

/// `Literal Header Field without Indexing` with an indexed name.
pub(crate) struct WithoutIndexing<'a> {
    index: usize,
    value: &'a str,
    huffman: bool,
}

impl<'a> WithoutIndexing<'a> {
    pub(crate) fn new(index: usize, value: &'a str, huffman: bool) -> Self {
        Self {
            index,
            value,
            huffman,
        }
    }

    pub(crate) fn encode(&self, dst: &mut [u8]) -> Option<usize> {
        let mut cur = encode_integer(
            self.index,
            PrefixIndexMask::LITERAL_WITHOUT_INDEXING.0,
            0x00,
            dst,
        )?;
        cur += write_string(self.value, self.huffman, &mut dst[cur..])?;
        Some(cur)
    }
}

/// `Literal Header Field without Indexing` with a new name.
pub(crate) struct WithoutIndexingWithName<'a> {
    name: &'a str,
    value: &'a str,
    huffman: bool,
}

impl<'a> WithoutIndexingWithName<'a> {
    pub(crate) fn new(name: &'a str, value: &'a str, huffman: bool) -> Self {
        Self {
            name,
            value,
            huffman,
        }
    }

    pub(crate) fn encode(&self, dst: &mut [u8]) -> Option<usize> {
        let mut cur = encode_integer(0, PrefixIndexMask::LITERAL_WITHOUT_INDEXING.0, 0x00, dst)?;
        cur += write_string(self.name, self.huffman, &mut dst[cur..])?;
        cur += write_string(self.value, self.huffman, &mut dst[cur..])?;
        Some(cur)
    }
}

/// `Literal Header Field Never Indexed` with an indexed name.
pub(crate) struct NeverIndexed<'a> {
    index: usize,
    value: &'a str,
    huffman: bool,
}

impl<'a> NeverIndexed<'a> {
    pub(crate) fn new(index: usize, value: &'a str, huffman: bool) -> Self {
        Self {
            index,
            value,
            huffman,
        }
    }

    pub(crate) fn encode(&self, dst: &mut [u8]) -> Option<usize> {
        let mut cur = encode_integer(
            self.index,
            PrefixIndexMask::LITERAL_NEVER_INDEXED.0,
            0x10,
            dst,
        )?;
        cur += write_string(self.value, self.huffman, &mut dst[cur..])?;
        Some(cur)
    }
}

/// `Literal Header Field Never Indexed` with a new name.
pub(crate) struct NeverIndexedWithName<'a> {
    name: &'a str,
    value: &'a str,
    huffman: bool,
}

impl<'a> NeverIndexedWithName<'a> {
    pub(crate) fn new(name: &'a str, value: &'a str, huffman: bool) -> Self {
        Self {
            name,
            value,
            huffman,
        }
    }

    pub(crate) fn encode(&self, dst: &mut [u8]) -> Option<usize> {
        let mut cur = encode_integer(0, PrefixIndexMask::LITERAL_NEVER_INDEXED.0, 0x10, dst)?;
        cur += write_string(self.name, self.huffman, &mut dst[cur..])?;
        cur += write_string(self.value, self.huffman, &mut dst[cur..])?;
        Some(cur)
    }
}

/// Writes a string literal: a length with the Huffman flag in the prefix,
/// then the octets.
fn write_string(src: &str, huffman: bool, dst: &mut [u8]) -> Option<usize> {
    if huffman {
        let mut encoded = Vec::with_capacity(src.len());
        huffman_encode(src.as_bytes(), &mut encoded);
        write_octets(&encoded, 0x80, dst)
    } else {
        write_octets(src.as_bytes(), 0x00, dst)
    }
}

fn write_octets(src: &[u8], pre: u8, dst: &mut [u8]) -> Option<usize> {
    let cur = encode_integer(src.len(), 0x7f, pre, dst)?;
    dst.get_mut(cur..cur + src.len())?.copy_from_slice(src);
    Some(cur + src.len())
}
