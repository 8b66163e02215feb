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

//! A minimal decoder-side replay of emitted header blocks, enough to check
//! that every block round-trips into the exact input field sequence. It
//! mirrors what an RFC7541 peer does with the representations this encoder
//! emits: octet string literals only, no size-update instructions.

#![allow(dead_code)]

use std::collections::VecDeque;

/// The RFC7541 Appendix A static table.
pub const STATIC_TABLE: [(&str, &str); 61] = [
    (":authority", ""),
    (":method", "GET"),
    (":method", "POST"),
    (":path", "/"),
    (":path", "/index.html"),
    (":scheme", "http"),
    (":scheme", "https"),
    (":status", "200"),
    (":status", "204"),
    (":status", "206"),
    (":status", "304"),
    (":status", "400"),
    (":status", "404"),
    (":status", "500"),
    ("accept-charset", ""),
    ("accept-encoding", "gzip, deflate"),
    ("accept-language", ""),
    ("accept-ranges", ""),
    ("accept", ""),
    ("access-control-allow-origin", ""),
    ("age", ""),
    ("allow", ""),
    ("authorization", ""),
    ("cache-control", ""),
    ("content-disposition", ""),
    ("content-encoding", ""),
    ("content-language", ""),
    ("content-length", ""),
    ("content-location", ""),
    ("content-range", ""),
    ("content-type", ""),
    ("cookie", ""),
    ("date", ""),
    ("etag", ""),
    ("expect", ""),
    ("expires", ""),
    ("from", ""),
    ("host", ""),
    ("if-match", ""),
    ("if-modified-since", ""),
    ("if-none-match", ""),
    ("if-range", ""),
    ("if-unmodified-since", ""),
    ("last-modified", ""),
    ("link", ""),
    ("location", ""),
    ("max-forwards", ""),
    ("proxy-authenticate", ""),
    ("proxy-authorization", ""),
    ("range", ""),
    ("referer", ""),
    ("refresh", ""),
    ("retry-after", ""),
    ("server", ""),
    ("set-cookie", ""),
    ("strict-transport-security", ""),
    ("transfer-encoding", ""),
    ("user-agent", ""),
    ("vary", ""),
    ("via", ""),
    ("www-authenticate", ""),
];

/// The representation form a field arrived in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Form {
    Indexed,
    WithIndexing,
    WithoutIndexing,
    NeverIndexed,
}

/// One decoded field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded {
    pub name: String,
    pub value: String,
    pub form: Form,
}

/// Replays header blocks against a decoder-side dynamic table.
pub struct BlockReader {
    dynamic: VecDeque<(String, String)>,
    size: usize,
    max_size: usize,
}

impl BlockReader {
    pub fn new(max_size: usize) -> Self {
        Self {
            dynamic: VecDeque::new(),
            size: 0,
            max_size,
        }
    }

    /// Decodes one block (or any concatenation of fragments of one block)
    /// into its field sequence.
    pub fn read_block(&mut self, mut src: &[u8]) -> Vec<Decoded> {
        let mut fields = Vec::new();
        while !src.is_empty() {
            let first = src[0];
            if first & 0x80 != 0 {
                let (index, used) = read_integer(src, 0x7f);
                src = &src[used..];
                let (name, value) = self.entry(index);
                fields.push(Decoded {
                    name,
                    value,
                    form: Form::Indexed,
                });
            } else if first & 0x40 != 0 {
                let (name, value, used) = self.read_literal(src, 0x3f);
                src = &src[used..];
                self.insert(name.clone(), value.clone());
                fields.push(Decoded {
                    name,
                    value,
                    form: Form::WithIndexing,
                });
            } else if first & 0x20 != 0 {
                panic!("unexpected dynamic table size update");
            } else {
                let form = if first & 0x10 != 0 {
                    Form::NeverIndexed
                } else {
                    Form::WithoutIndexing
                };
                let (name, value, used) = self.read_literal(src, 0x0f);
                src = &src[used..];
                fields.push(Decoded { name, value, form });
            }
        }
        fields
    }

    fn entry(&self, index: usize) -> (String, String) {
        assert!(index >= 1, "index 0 is not usable");
        if index <= 61 {
            let (name, value) = STATIC_TABLE[index - 1];
            (String::from(name), String::from(value))
        } else {
            self.dynamic
                .get(index - 62)
                .cloned()
                .unwrap_or_else(|| panic!("dangling dynamic index {index}"))
        }
    }

    fn read_literal(&self, src: &[u8], mask: u8) -> (String, String, usize) {
        let (index, mut used) = read_integer(src, mask);
        let name = if index == 0 {
            let (name, name_used) = read_string(&src[used..]);
            used += name_used;
            name
        } else {
            self.entry(index).0
        };
        let (value, value_used) = read_string(&src[used..]);
        (name, value, used + value_used)
    }

    fn insert(&mut self, name: String, value: String) {
        self.size += name.len() + value.len() + 32;
        self.dynamic.push_front((name, value));
        while self.size > self.max_size {
            let (name, value) = self.dynamic.pop_back().unwrap();
            self.size -= name.len() + value.len() + 32;
        }
    }
}

fn read_integer(src: &[u8], mask: u8) -> (usize, usize) {
    let mut value = (src[0] & mask) as usize;
    if value < mask as usize {
        return (value, 1);
    }
    let mut used = 1;
    let mut shift = 0;
    loop {
        let byte = src[used];
        used += 1;
        value += ((byte & 0x7f) as usize) << shift;
        shift += 7;
        if byte & 0x80 == 0 {
            return (value, used);
        }
    }
}

fn read_string(src: &[u8]) -> (String, usize) {
    assert_eq!(src[0] & 0x80, 0, "huffman literals not expected here");
    let (len, used) = read_integer(src, 0x7f);
    let bytes = &src[used..used + len];
    (String::from_utf8(bytes.to_vec()).unwrap(), used + len)
}
