// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the `syncthru` library.
//!
//! Only two failures ever reach the caller: asking for a language the status
//! tables do not know, and pinning a [`ConnectionMode`] whose source cannot
//! deliver data. Transport and decoding problems are recovered inside the
//! acquisition step and degrade the snapshot instead.

use thiserror::Error;

use crate::types::ConnectionMode;

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// Error occurred while talking to the device.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Error occurred while decoding a response.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// The pinned connection mode cannot produce data for this device.
    #[error("device does not support {mode} mode: {reason}")]
    UnsupportedBySource {
        /// The mode the caller pinned.
        mode: ConnectionMode,
        /// Why the source was rejected.
        reason: String,
    },

    /// A language tag was requested that has no status table.
    #[error("unsupported locale: {0}")]
    UnsupportedLocale(String),
}

/// Errors related to fetching a page from the device.
#[derive(Debug, Error)]
pub enum TransportError {
    /// HTTP request failed.
    #[cfg(feature = "http")]
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Connection to the device failed.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Request timed out.
    #[error("request timed out after {0} ms")]
    Timeout(u64),

    /// Invalid URL or address.
    #[error("invalid address: {0}")]
    InvalidAddress(String),
}

/// Errors related to decoding device responses.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The body is not even relaxed JSON.
    #[error("malformed response at byte {position}: {message}")]
    MalformedResponse {
        /// Byte offset where decoding gave up.
        position: usize,
        /// Description of the problem.
        message: String,
    },
}

impl ParseError {
    pub(crate) fn malformed(position: usize, message: impl Into<String>) -> Self {
        Self::MalformedResponse {
            position,
            message: message.into(),
        }
    }
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;
