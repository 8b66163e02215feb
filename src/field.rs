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

//! Response header fields as presented to the encoder.
//!
//! A header producer hands the encoder a forward sequence of
//! [`HeaderField`]s; any `Iterator<Item = HeaderField>` works. Producers
//! that recognize a header name ahead of time tag it with a
//! [`KnownHeader`], which maps to its static-table index without a lookup;
//! everything else travels as a literal name. The `:status`
//! pseudo-header is never produced this way, it is passed to
//! [`encode_headers`] separately.
//!
//! [`encode_headers`]: crate::HpackEncoder::encode_headers

use crate::table::ENTRY_OVERHEAD;

/// One response header ready for compression. Name comparison against the
/// dynamic table is byte-exact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderField {
    name: FieldName,
    value: String,
}

impl HeaderField {
    /// Creates a field with a literal name.
    pub fn new<N, V>(name: N, value: V) -> Self
    where
        N: Into<String>,
        V: Into<String>,
    {
        Self {
            name: FieldName::Other(name.into()),
            value: value.into(),
        }
    }

    /// Creates a field tagged with a static-table header name.
    pub fn known<V>(name: KnownHeader, value: V) -> Self
    where
        V: Into<String>,
    {
        Self {
            name: FieldName::Known(name),
            value: value.into(),
        }
    }

    /// The field name.
    pub fn name(&self) -> &FieldName {
        &self.name
    }

    /// The field value.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// The size this field would occupy as a table entry, defined by
    /// [RFC 7541 §4.1] as the name length plus the value length plus 32
    /// octets of per-entry overhead.
    ///
    /// [RFC 7541 §4.1]: https://www.rfc-editor.org/rfc/rfc7541.html#section-4.1
    pub fn size(&self) -> usize {
        self.name.len() + self.value.len() + ENTRY_OVERHEAD
    }
}

/// Possible name spellings of a [`HeaderField`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldName {
    /// A response header with an entry in the static table.
    Known(KnownHeader),
    /// Any other header name, spelled out.
    Other(String),
}

impl FieldName {
    /// The name as lowercase octets.
    pub fn as_str(&self) -> &str {
        match self {
            FieldName::Known(known) => known.as_str(),
            FieldName::Other(name) => name.as_str(),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.as_str().len()
    }

    /// Static-table index usable for this name, if the producer tagged it.
    pub(crate) fn static_index(&self) -> Option<usize> {
        match self {
            FieldName::Known(known) => Some(known.static_index()),
            FieldName::Other(_) => None,
        }
    }
}

/// Response headers with an entry in the [static table]. Producers tag
/// these so the encoder can reference the name by index instead of
/// spelling it out.
///
/// [static table]: https://httpwg.org/specs/rfc7541.html#static.table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KnownHeader {
    AcceptRanges,
    AccessControlAllowOrigin,
    Age,
    CacheControl,
    ContentDisposition,
    ContentEncoding,
    ContentLanguage,
    ContentLength,
    ContentRange,
    ContentType,
    Date,
    Etag,
    Expires,
    LastModified,
    Link,
    Location,
    ProxyAuthenticate,
    RetryAfter,
    Server,
    SetCookie,
    StrictTransportSecurity,
    TransferEncoding,
    Vary,
    WwwAuthenticate,
}

impl KnownHeader {
    /// The header name this tag stands for.
    pub fn as_str(&self) -> &'static str {
        match self {
            KnownHeader::AcceptRanges => "accept-ranges",
            KnownHeader::AccessControlAllowOrigin => "access-control-allow-origin",
            KnownHeader::Age => "age",
            KnownHeader::CacheControl => "cache-control",
            KnownHeader::ContentDisposition => "content-disposition",
            KnownHeader::ContentEncoding => "content-encoding",
            KnownHeader::ContentLanguage => "content-language",
            KnownHeader::ContentLength => "content-length",
            KnownHeader::ContentRange => "content-range",
            KnownHeader::ContentType => "content-type",
            KnownHeader::Date => "date",
            KnownHeader::Etag => "etag",
            KnownHeader::Expires => "expires",
            KnownHeader::LastModified => "last-modified",
            KnownHeader::Link => "link",
            KnownHeader::Location => "location",
            KnownHeader::ProxyAuthenticate => "proxy-authenticate",
            KnownHeader::RetryAfter => "retry-after",
            KnownHeader::Server => "server",
            KnownHeader::SetCookie => "set-cookie",
            KnownHeader::StrictTransportSecurity => "strict-transport-security",
            KnownHeader::TransferEncoding => "transfer-encoding",
            KnownHeader::Vary => "vary",
            KnownHeader::WwwAuthenticate => "www-authenticate",
        }
    }

    /// The fixed static-table index of this header name.
    pub fn static_index(&self) -> usize {
        match self {
            KnownHeader::AcceptRanges => 18,
            KnownHeader::AccessControlAllowOrigin => 20,
            KnownHeader::Age => 21,
            KnownHeader::CacheControl => 24,
            KnownHeader::ContentDisposition => 25,
            KnownHeader::ContentEncoding => 26,
            KnownHeader::ContentLanguage => 27,
            KnownHeader::ContentLength => 28,
            KnownHeader::ContentRange => 30,
            KnownHeader::ContentType => 31,
            KnownHeader::Date => 33,
            KnownHeader::Etag => 34,
            KnownHeader::Expires => 36,
            KnownHeader::LastModified => 44,
            KnownHeader::Link => 45,
            KnownHeader::Location => 46,
            KnownHeader::ProxyAuthenticate => 48,
            KnownHeader::RetryAfter => 53,
            KnownHeader::Server => 54,
            KnownHeader::SetCookie => 55,
            KnownHeader::StrictTransportSecurity => 56,
            KnownHeader::TransferEncoding => 57,
            KnownHeader::Vary => 59,
            KnownHeader::WwwAuthenticate => 61,
        }
    }

    /// Looks up the tag for a lowercase header name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "accept-ranges" => Some(KnownHeader::AcceptRanges),
            "access-control-allow-origin" => Some(KnownHeader::AccessControlAllowOrigin),
            "age" => Some(KnownHeader::Age),
            "cache-control" => Some(KnownHeader::CacheControl),
            "content-disposition" => Some(KnownHeader::ContentDisposition),
            "content-encoding" => Some(KnownHeader::ContentEncoding),
            "content-language" => Some(KnownHeader::ContentLanguage),
            "content-length" => Some(KnownHeader::ContentLength),
            "content-range" => Some(KnownHeader::ContentRange),
            "content-type" => Some(KnownHeader::ContentType),
            "date" => Some(KnownHeader::Date),
            "etag" => Some(KnownHeader::Etag),
            "expires" => Some(KnownHeader::Expires),
            "last-modified" => Some(KnownHeader::LastModified),
            "link" => Some(KnownHeader::Link),
            "location" => Some(KnownHeader::Location),
            "proxy-authenticate" => Some(KnownHeader::ProxyAuthenticate),
            "retry-after" => Some(KnownHeader::RetryAfter),
            "server" => Some(KnownHeader::Server),
            "set-cookie" => Some(KnownHeader::SetCookie),
            "strict-transport-security" => Some(KnownHeader::StrictTransportSecurity),
            "transfer-encoding" => Some(KnownHeader::TransferEncoding),
            "vary" => Some(KnownHeader::Vary),
            "www-authenticate" => Some(KnownHeader::WwwAuthenticate),
            _ => None,
        }
    }
}
