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

//! [Header Field Representation] implementation of [HPACK].
//!
//! [Header Field Representation]: https://www.rfc-editor.org/rfc/rfc7541.html#section-2.4
//! [HPACK]: https://httpwg.org/specs/rfc7541.html
//!
//! # Description from RFC7541
//! An encoded header field can be represented either as an index or as a
//! literal.
//!
//! An [indexed representation] defines a header field as a reference to an
//! entry in either the static table or the dynamic table.
//!
//! A [literal representation] defines a header field by specifying its
//! name and value. The header field name can be represented literally or
//! as a reference to an entry in either the static table or the dynamic
//! table. The header field value is represented literally.
//!
//! Three different literal representations are defined: one that adds the
//! header field as a new entry at the beginning of the dynamic table
//! ([Literal Header Field with Incremental Indexing]), one that does not
//! add the header field to the dynamic table ([Literal Header Field
//! without Indexing]), and one that additionally stipulates that the
//! header field always use a literal representation, in particular when
//! re-encoded by an intermediary ([Literal Header Field Never Indexed]).
//! The last representation is intended for protecting header field values
//! that are not to be put at risk by compressing them.
//!
//! [Literal Header Field Never Indexed]: https://www.rfc-editor.org/rfc/rfc7541.html#section-6.2.3
//! [Literal Header Field with Incremental Indexing]: https://www.rfc-editor.org/rfc/rfc7541.html#section-6.2.1
//! [Literal Header Field without Indexing]: https://www.rfc-editor.org/rfc/rfc7541.html#section-6.2.2
//! [indexed representation]: https://www.rfc-editor.org/rfc/rfc7541.html#section-6.1
//! [literal representation]: https://www.rfc-editor.org/rfc/rfc7541.html#section-6.2

mod encoder;

pub(crate) use encoder::{
    Indexed, Indexing, IndexingWithName, NeverIndexed, NeverIndexedWithName, WithoutIndexing,
    WithoutIndexingWithName,
};

/// Index prefix mask of each representation's first byte.
pub(crate) struct PrefixIndexMask(pub(crate) u8);

impl PrefixIndexMask {
    pub(crate) const INDEXED: Self = Self(0x7f);
    pub(crate) const LITERAL_WITH_INDEXING: Self = Self(0x3f);
    pub(crate) const LITERAL_WITHOUT_INDEXING: Self = Self(0x0f);
    pub(crate) const LITERAL_NEVER_INDEXED: Self = Self(0x0f);
}
