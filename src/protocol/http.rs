// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! reqwest-backed transport.

use std::time::Duration;

use reqwest::Client;

use crate::error::TransportError;
use crate::protocol::{FetchResponse, Transport, construct_url};

// ============================================================================
// HttpConfig - Connection parameters
// ============================================================================

/// Configuration for reaching a SyncThru device over HTTP.
///
/// # Examples
///
/// ```
/// use syncthru::protocol::HttpConfig;
/// use std::time::Duration;
///
/// let config = HttpConfig::new("192.168.0.25")
///     .with_port(8080)
///     .with_timeout(Duration::from_secs(5));
/// assert_eq!(config.base_url(), "http://192.168.0.25:8080");
/// ```
#[derive(Debug, Clone)]
pub struct HttpConfig {
    host: String,
    port: Option<u16>,
    use_https: bool,
    timeout: Duration,
}

impl HttpConfig {
    /// Default request timeout.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Creates a configuration for the given host.
    ///
    /// The host may already carry a scheme; `https://` enables HTTPS.
    #[must_use]
    pub fn new(host: impl Into<String>) -> Self {
        let host = host.into();
        let use_https = host.trim_start().starts_with("https://");
        Self {
            host,
            port: None,
            use_https,
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    /// Sets a custom port.
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Enables HTTPS.
    #[must_use]
    pub fn with_https(mut self) -> Self {
        self.use_https = true;
        self
    }

    /// Sets the default request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns the host as given.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Returns the timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Builds the base URL from this configuration.
    #[must_use]
    pub fn base_url(&self) -> String {
        let url = construct_url(&self.host);
        let (scheme, rest) = url.split_once("://").unwrap_or(("http", url.as_str()));
        let scheme = if self.use_https { "https" } else { scheme };
        let Some(port) = self.port else {
            return format!("{scheme}://{rest}");
        };
        let (authority, path) = rest.find('/').map_or((rest, ""), |i| rest.split_at(i));
        format!("{scheme}://{}:{port}{path}", strip_port(authority))
    }

    /// Creates an `HttpClient` from this configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be created.
    pub fn into_client(self) -> Result<HttpClient, TransportError> {
        let client = Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(TransportError::Http)?;

        Ok(HttpClient {
            base_url: self.base_url(),
            client,
        })
    }
}

// ============================================================================
// HttpClient
// ============================================================================

/// HTTP transport built on `reqwest`.
///
/// # Examples
///
/// ```no_run
/// use std::time::Duration;
/// use syncthru::protocol::{HttpClient, Transport};
///
/// # async fn example() -> syncthru::Result<()> {
/// let client = HttpClient::new("192.168.0.25")?;
/// let url = format!("{}/sws/app/information/home/home.json", client.base_url());
/// let response = client.fetch(&url, Duration::from_secs(5)).await?;
/// println!("{} bytes", response.body.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HttpClient {
    base_url: String,
    client: Client,
}

impl HttpClient {
    /// Creates a client for the given host with default settings.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be created.
    pub fn new(host: impl Into<String>) -> Result<Self, TransportError> {
        HttpConfig::new(host).into_client()
    }

    /// Returns the base URL of the device.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl Transport for HttpClient {
    async fn fetch(&self, url: &str, timeout: Duration) -> Result<FetchResponse, TransportError> {
        tracing::debug!(url = %url, "Sending HTTP request");

        let response = self
            .client
            .get(url)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| classify_error(e, timeout))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| classify_error(e, timeout))?;

        tracing::debug!(url = %url, status, bytes = body.len(), "Received HTTP response");

        Ok(FetchResponse { status, body })
    }
}

/// Host part of an authority, without any `:port` suffix.
fn strip_port(authority: &str) -> &str {
    if let Some(end) = authority.strip_prefix('[').and_then(|a| a.find(']')) {
        return &authority[..end + 2];
    }
    match authority.rsplit_once(':') {
        Some((host, port)) if port.bytes().all(|b| b.is_ascii_digit()) => host,
        _ => authority,
    }
}

fn classify_error(error: reqwest::Error, timeout: Duration) -> TransportError {
    if error.is_timeout() {
        TransportError::Timeout(u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX))
    } else if error.is_connect() {
        TransportError::ConnectionFailed(error.to_string())
    } else if error.is_builder() {
        TransportError::InvalidAddress(error.to_string())
    } else {
        TransportError::Http(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_default_values() {
        let config = HttpConfig::new("192.168.1.100");
        assert_eq!(config.host(), "192.168.1.100");
        assert_eq!(config.timeout(), Duration::from_secs(10));
        assert_eq!(config.base_url(), "http://192.168.1.100");
    }

    #[test]
    fn config_with_port() {
        let config = HttpConfig::new("192.168.1.100").with_port(8080);
        assert_eq!(config.base_url(), "http://192.168.1.100:8080");
    }

    #[test]
    fn config_with_https() {
        let config = HttpConfig::new("192.168.1.100").with_https();
        assert_eq!(config.base_url(), "https://192.168.1.100");
    }

    #[test]
    fn config_scheme_in_host() {
        let config = HttpConfig::new("https://printer.local/");
        assert_eq!(config.base_url(), "https://printer.local");
    }

    #[test]
    fn config_port_replaces_port_in_host() {
        let config = HttpConfig::new("http://printer:8080").with_port(9000);
        assert_eq!(config.base_url(), "http://printer:9000");

        let config = HttpConfig::new("printer:8080/sws/").with_port(9000);
        assert_eq!(config.base_url(), "http://printer:9000/sws");

        let config = HttpConfig::new("http://[fe80::1]:8080").with_port(9000);
        assert_eq!(config.base_url(), "http://[fe80::1]:9000");
    }

    #[test]
    fn config_host_port_kept_without_override() {
        let config = HttpConfig::new("printer:8080");
        assert_eq!(config.base_url(), "http://printer:8080");
    }

    #[test]
    fn config_with_timeout() {
        let config = HttpConfig::new("192.168.1.100").with_timeout(Duration::from_secs(30));
        assert_eq!(config.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn config_into_client() {
        let client = HttpConfig::new("192.168.1.100")
            .with_port(8000)
            .into_client()
            .unwrap();
        assert_eq!(client.base_url(), "http://192.168.1.100:8000");
    }

    #[test]
    fn client_new() {
        let client = HttpClient::new("https://192.168.1.100").unwrap();
        assert_eq!(client.base_url(), "https://192.168.1.100");
    }
}
