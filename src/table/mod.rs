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

//! The indexing tables of [HPACK].
//!
//! [HPACK]: https://httpwg.org/specs/rfc7541.html
//!
//! Indexed references share one index space: the [static table] occupies
//! `1..=61` and dynamic entries start at 62, newest first. The encoder
//! references the static table only through fixed positions known ahead
//! of time (the `:status` fast path here and the tagged response-header
//! names in [`KnownHeader`]); everything that must be *searched* lives in
//! the [`DynamicTable`].
//!
//! [static table]: https://httpwg.org/specs/rfc7541.html#static.table
//! [`KnownHeader`]: crate::KnownHeader

mod dynamic;

pub(crate) use dynamic::DynamicTable;

/// Number of entries in the RFC7541 Appendix A static table.
pub(crate) const STATIC_TABLE_LEN: usize = 61;

/// Per-entry overhead defined by RFC7541 §4.1: an estimate of two 64-bit
/// pointers to the name and the value plus two 64-bit reference counts.
pub(crate) const ENTRY_OVERHEAD: usize = 32;

/// Index of an entry found in the combined static + dynamic index space.
pub(crate) enum TableIndex {
    /// Both name and value matched at this index.
    Field(usize),
    /// Only the name matched at this index.
    Name(usize),
}

/// The fixed positions of the [static table] the encoder refers to.
///
/// [static table]: https://httpwg.org/specs/rfc7541.html#static.table
pub(crate) struct StaticTable;

impl StaticTable {
    /// Name-only index of the `:status` pseudo-header.
    pub(crate) const STATUS: usize = 8;

    /// Full-entry index of `:status` with the given code, for the seven
    /// codes that have dedicated static entries.
    pub(crate) fn status_index(code: u16) -> Option<usize> {
        match code {
            200 => Some(8),
            204 => Some(9),
            206 => Some(10),
            304 => Some(11),
            400 => Some(12),
            404 => Some(13),
            500 => Some(14),
            _ => None,
        }
    }
}
