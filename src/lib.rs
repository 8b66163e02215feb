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

//! [HPACK] header-block compression for the response side of an [HTTP/2]
//! connection.
//!
//! [HPACK]: https://httpwg.org/specs/rfc7541.html
//! [HTTP/2]: https://httpwg.org/specs/rfc9113.html
//!
//! # Introduction
//! In HTTP/1.1, header fields are not compressed. As web pages have grown
//! to require dozens to hundreds of requests, the redundant header fields
//! in these requests unnecessarily consume bandwidth, measurably increasing
//! latency. HPACK eliminates redundant header fields, limits vulnerability
//! to known security attacks, and has a bounded memory requirement for use
//! in constrained environments.
//!
//! This crate implements the *encoder* half of HPACK as used by an HTTP/2
//! server sending response headers: a per-connection [`HpackEncoder`] that
//! maintains the dynamic table in lockstep with the peer decoder, chooses a
//! representation for each header field, and writes complete header blocks
//! into caller-provided buffers, splitting them over several calls when a
//! buffer fills up.
//!
//! # Example
//! ```
//! use h2_hpack::{HeaderField, HpackEncoder, KnownHeader};
//!
//! let mut encoder = HpackEncoder::new(4096, false);
//! let fields = vec![
//!     HeaderField::known(KnownHeader::ContentType, "text/html"),
//!     HeaderField::new("x-trace-id", "b1946ac9"),
//! ];
//! let mut buf = [0u8; 256];
//! let mut iter = fields.into_iter();
//! let (size, complete) = encoder
//!     .encode_headers(Some(200), &mut iter, &mut buf)
//!     .unwrap();
//! assert!(complete);
//! assert_eq!(buf[0], 0x88);
//! assert!(size > 1);
//! ```

mod encoder;
mod error;
mod field;
mod huffman;
mod integer;
mod representation;
mod table;

pub(crate) mod util;

pub use encoder::HpackEncoder;
pub use error::{ErrorCode, H2Error};
pub use field::{FieldName, HeaderField, KnownHeader};
