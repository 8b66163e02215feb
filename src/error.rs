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

//! Errors surfaced by the encoder to the HTTP/2 connection layer.
//!
//! Nothing here is recoverable inside the encoder: every error is passed
//! upward and translated by the connection layer into a stream reset or a
//! `GOAWAY`, using the [`Error Codes`] shared code space.
//!
//! [`Error Codes`]: https://httpwg.org/specs/rfc9113.html#ErrorCodes

use core::fmt::{Display, Formatter};
use std::error::Error;

/// Errors raised while compressing a header block.
#[derive(Debug, Eq, PartialEq, Copy, Clone)]
pub enum H2Error {
    /// A header-field representation could not be written at a position
    /// where previously written output prohibits partial progress: the
    /// status prefix did not fit, or a strict-mode continuation call made
    /// no progress at all. Translates to a stream reset with
    /// [`ErrorCode::CompressionError`].
    EncodingFailure,

    /// The total size of the header list exceeds the peer's
    /// `SETTINGS_MAX_HEADER_LIST_SIZE`. Carries the configured limit.
    /// Translates to a connection error with [`ErrorCode::InternalError`].
    /// The dynamic table has not been touched when this is raised.
    HeaderListOverflow(usize),
}

impl H2Error {
    /// Wire error code the HTTP/2 layer should report for this error.
    pub fn error_code(&self) -> ErrorCode {
        match self {
            H2Error::EncodingFailure => ErrorCode::CompressionError,
            H2Error::HeaderListOverflow(_) => ErrorCode::InternalError,
        }
    }

    /// Whether the error tears down the whole connection rather than a
    /// single stream.
    pub fn is_connection_error(&self) -> bool {
        matches!(self, H2Error::HeaderListOverflow(_))
    }
}

impl Display for H2Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            H2Error::EncodingFailure => {
                write!(f, "hpack encoding failure: output buffer cannot hold the header block prefix")
            }
            H2Error::HeaderListOverflow(limit) => {
                write!(f, "header list size exceeds the limit: {limit}")
            }
        }
    }
}

impl Error for H2Error {}

/// [`Error Codes`] implementation.
///
/// [`Error Codes`]: https://httpwg.org/specs/rfc9113.html#ErrorCodes
#[derive(Debug, Eq, PartialEq, Copy, Clone)]
pub enum ErrorCode {
    /// The associated condition is not a result of an error. For example,
    /// a `GOAWAY` might include this code to indicate graceful shutdown of
    /// a connection.
    NoError = 0x00,

    /// The endpoint detected an unspecific protocol error. This error is
    /// for use when a more specific error code is not available.
    ProtocolError = 0x01,

    /// The endpoint encountered an unexpected internal error.
    InternalError = 0x02,

    /// The endpoint detected that its peer violated the flow-control
    /// protocol.
    FlowControlError = 0x03,

    /// The endpoint sent a `SETTINGS` frame but did not receive a response
    /// in a timely manner.
    SettingsTimeout = 0x04,

    /// The endpoint received a frame after a stream was half-closed.
    StreamClosed = 0x05,

    /// The endpoint received a frame with an invalid size.
    FrameSizeError = 0x06,

    /// The endpoint refused the stream prior to performing any application
    /// processing.
    RefusedStream = 0x07,

    /// The endpoint uses this error code to indicate that the stream is no
    /// longer needed.
    Cancel = 0x08,

    /// The endpoint is unable to maintain the field section compression
    /// context for the connection.
    CompressionError = 0x09,

    /// The connection established in response to a `CONNECT` request was
    /// reset or abnormally closed.
    ConnectError = 0x0a,

    /// The endpoint detected that its peer is exhibiting a behavior that
    /// might be generating excessive load.
    EnhanceYourCalm = 0x0b,

    /// The underlying transport has properties that do not meet minimum
    /// security requirements.
    InadequateSecurity = 0x0c,

    /// The endpoint requires that HTTP/1.1 be used instead of HTTP/2.
    Http1_1Required = 0x0d,
}

impl ErrorCode {
    /// Gets the error code of the `ErrorCode` enum.
    pub fn into_code(self) -> u32 {
        self as u32
    }
}
