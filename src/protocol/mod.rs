// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Transports for reaching the SyncThru web service.
//!
//! The acquisition logic only needs "GET this URL, give me the status code
//! and body". [`Transport`] captures exactly that, so tests and embedders can
//! substitute their own client.
//!
//! - [`HttpClient`]: reqwest-backed transport (feature `http`)

#[cfg(feature = "http")]
mod http;

#[cfg(feature = "http")]
pub use http::{HttpClient, HttpConfig};

use std::time::Duration;

use crate::error::TransportError;

/// Answer to a single GET request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body decoded as text.
    pub body: String,
}

impl FetchResponse {
    /// Creates a new response.
    #[must_use]
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Returns `true` for 2xx status codes.
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Trait for clients that can fetch documents from a device.
///
/// Any HTTP answer, including 4xx/5xx, is an `Ok` response. Errors are
/// reserved for "no answer at all": refused connections, DNS failures,
/// timeouts.
#[allow(async_fn_in_trait)]
pub trait Transport {
    /// Fetches `url`, giving up after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns `TransportError` if no answer was received.
    async fn fetch(&self, url: &str, timeout: Duration) -> Result<FetchResponse, TransportError>;
}

impl<T: Transport> Transport for &T {
    async fn fetch(&self, url: &str, timeout: Duration) -> Result<FetchResponse, TransportError> {
        (**self).fetch(url, timeout).await
    }
}

/// Builds the device base URL from a user-supplied address.
///
/// Adds `http://` unless an `http://` or `https://` scheme is present, and
/// strips one trailing slash.
///
/// # Examples
///
/// ```
/// use syncthru::protocol::construct_url;
///
/// assert_eq!(construct_url("192.168.0.25"), "http://192.168.0.25");
/// assert_eq!(construct_url("https://printer.local/"), "https://printer.local");
/// ```
#[must_use]
pub fn construct_url(address: &str) -> String {
    let address = address.trim();
    let address = address.strip_suffix('/').unwrap_or(address);
    if address.starts_with("http://") || address.starts_with("https://") {
        address.to_string()
    } else {
        format!("http://{address}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn construct_url_adds_scheme() {
        assert_eq!(construct_url("192.168.1.100"), "http://192.168.1.100");
        assert_eq!(construct_url("printer:8080"), "http://printer:8080");
    }

    #[test]
    fn construct_url_keeps_scheme() {
        assert_eq!(construct_url("http://10.0.0.2"), "http://10.0.0.2");
        assert_eq!(construct_url("https://10.0.0.2"), "https://10.0.0.2");
    }

    #[test]
    fn construct_url_strips_one_trailing_slash() {
        assert_eq!(construct_url("http://10.0.0.2/"), "http://10.0.0.2");
        assert_eq!(construct_url("10.0.0.2//"), "http://10.0.0.2/");
    }

    #[test]
    fn success_range() {
        assert!(FetchResponse::new(200, "").is_success());
        assert!(FetchResponse::new(204, "").is_success());
        assert!(!FetchResponse::new(302, "").is_success());
        assert!(!FetchResponse::new(404, "").is_success());
    }
}
