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

//! [Huffman coding] of string literals, as used by [HPACK].
//!
//! [Huffman coding]: https://en.wikipedia.org/wiki/Huffman_coding
//! [HPACK]: https://httpwg.org/specs/rfc7541.html
//!
//! The code table in `RFC7541` was generated from statistics obtained on a
//! large sample of HTTP headers. It is a canonical Huffman code with some
//! tweaking to ensure that no symbol has a unique code length. Only the
//! encoding direction is needed here; the peer decodes.

mod consts;

use core::cmp::Ordering;

use consts::HUFFMAN_ENCODE;

/// Huffman-encodes `src` and appends the result to `dst`.
pub(crate) fn huffman_encode(src: &[u8], dst: &mut Vec<u8>) {
    // `state` accumulates result bits from the top; `unfilled` counts the
    // bits of `state` not yet assigned. Whenever all 64 bits fill up, the
    // accumulator is flushed to `dst` in big-endian order.
    let mut state = 0u64;
    let mut unfilled = 64u32;

    for byte in src.iter() {
        let (nbits, code) = HUFFMAN_ENCODE[*byte as usize];
        match unfilled.cmp(&nbits) {
            Ordering::Greater => {
                state |= code << (unfilled - nbits);
                unfilled -= nbits;
            }
            Ordering::Equal => {
                state |= code;
                dst.extend_from_slice(&state.to_be_bytes());
                state = 0;
                unfilled = 64;
            }
            Ordering::Less => {
                // The code straddles the accumulator boundary. Rotating it
                // right by the overflow puts the head bits at the bottom of
                // `state` and the tail bits at the top of the next `state`.
                let rotate = code.rotate_right(nbits - unfilled);
                let mask = u64::MAX >> (64 - unfilled);
                state |= rotate & mask;
                dst.extend_from_slice(&state.to_be_bytes());
                state = rotate & !mask;
                unfilled = 64 - (nbits - unfilled);
            }
        }
    }

    // A partially filled last byte is padded with `0b1`s, which the peer
    // discards as the prefix of the EOS symbol.
    if unfilled != 64 {
        state |= u64::MAX >> (64 - unfilled);
        let bytes = state.to_be_bytes();
        let len = (8 - (unfilled >> 3)) as usize;
        dst.extend_from_slice(&bytes[..len]);
    }
}

#[cfg(test)]
mod ut_huffman {
    use super::huffman_encode;
    use crate::util::test_util::decode_hex;

    /// UT test cases for `huffman_encode`.
    ///
    /// # Brief
    /// 1. Encodes the string literals from the RFC7541 Appendix C.4 and
    ///    C.6 examples.
    /// 2. Checks the emitted bytes against the listed octets.
    #[test]
    fn ut_huffman_encode() {
        macro_rules! huffman_test_case {
            ($src: literal, $res: literal) => {
                let mut dst = Vec::new();
                huffman_encode($src.as_bytes(), &mut dst);
                assert_eq!(dst, decode_hex($res).unwrap());
            };
        }

        // C.4.1. First Request
        huffman_test_case!("www.example.com", "f1e3c2e5f23a6ba0ab90f4ff");

        // C.4.2. Second Request
        huffman_test_case!("no-cache", "a8eb10649cbf");

        // C.4.3. Third Request
        huffman_test_case!("custom-key", "25a849e95ba97d7f");
        huffman_test_case!("custom-value", "25a849e95bb8e8b4bf");

        // C.6.1. First Response
        huffman_test_case!("302", "6402");
        huffman_test_case!("private", "aec3771a4b");
        huffman_test_case!(
            "Mon, 21 Oct 2013 20:13:21 GMT",
            "d07abe941054d444a8200595040b8166e082a62d1bff"
        );
        huffman_test_case!("https://www.example.com", "9d29ad171863c78f0b97c8e9ae82ae43d3");

        huffman_test_case!("", "");
    }
}
