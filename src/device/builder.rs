// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device builder.

use std::time::Duration;

use crate::device::SyncThru;
use crate::device::acquisition::AcquisitionOptions;
use crate::error::{Error, Result};
use crate::protocol::{Transport, construct_url};
use crate::status::supported_languages;
use crate::types::ConnectionMode;

#[cfg(feature = "http")]
use crate::protocol::{HttpClient, HttpConfig};

/// Builder for [`SyncThru`] handles.
///
/// # Examples
///
/// ```no_run
/// use std::time::Duration;
/// use syncthru::{ConnectionMode, SyncThru};
///
/// # async fn example() -> syncthru::Result<()> {
/// let printer = SyncThru::http("192.168.0.25")
///     .with_connection_mode(ConnectionMode::Html)
///     .with_timeout(Duration::from_secs(5))
///     .with_language("DE")
///     .build()?;
///
/// let snapshot = printer.update().await?;
/// println!("{}", snapshot.device_status());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct SyncThruBuilder {
    address: String,
    options: AcquisitionOptions,
}

impl SyncThruBuilder {
    /// Creates a builder for the device at `address`.
    ///
    /// The address may be a bare host (`192.168.0.25`, `printer:8080`) or a
    /// full `http://` / `https://` URL.
    #[must_use]
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            options: AcquisitionOptions::default(),
        }
    }

    /// Sets which sources are consulted on update.
    #[must_use]
    pub fn with_connection_mode(mut self, mode: ConnectionMode) -> Self {
        self.options.mode = mode;
        self
    }

    /// Sets the timeout applied to each request.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.options.timeout = timeout;
        self
    }

    /// Also fetches the page counters document after a structured answer.
    #[must_use]
    pub fn with_counters(mut self, enabled: bool) -> Self {
        self.options.fetch_counters = enabled;
        self
    }

    /// Sets the display language assumed when the device reports none.
    #[must_use]
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.options.language = Some(language.into());
        self
    }

    /// Returns the options an update will run with.
    #[must_use]
    pub fn options(&self) -> &AcquisitionOptions {
        &self.options
    }

    /// Builds a handle using the reqwest transport.
    ///
    /// # Errors
    ///
    /// Returns error if the language is not supported or the HTTP client
    /// cannot be created.
    #[cfg(feature = "http")]
    pub fn build(self) -> Result<SyncThru<HttpClient>> {
        self.validate()?;
        let client = HttpConfig::new(self.address)
            .with_timeout(self.options.timeout)
            .into_client()?;
        let base_url = client.base_url().to_string();
        Ok(SyncThru::new(client, base_url, self.options))
    }

    /// Builds a handle on top of a caller-supplied transport.
    ///
    /// # Errors
    ///
    /// Returns error if the language is not supported.
    pub fn build_with_transport<T: Transport>(self, transport: T) -> Result<SyncThru<T>> {
        self.validate()?;
        let base_url = construct_url(&self.address);
        Ok(SyncThru::new(transport, base_url, self.options))
    }

    fn validate(&self) -> Result<()> {
        match &self.options.language {
            Some(tag) if !supported_languages().any(|l| l.eq_ignore_ascii_case(tag.trim())) => {
                Err(Error::UnsupportedLocale(tag.clone()))
            }
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_defaults() {
        let builder = SyncThruBuilder::new("192.168.0.25");
        assert_eq!(builder.options(), &AcquisitionOptions::default());
        assert_eq!(builder.options().timeout, Duration::from_secs(10));
        assert_eq!(builder.options().mode, ConnectionMode::Auto);
    }

    #[test]
    fn builder_chain() {
        let builder = SyncThruBuilder::new("192.168.0.25")
            .with_connection_mode(ConnectionMode::Api)
            .with_timeout(Duration::from_secs(3))
            .with_counters(true)
            .with_language("fr");

        let options = builder.options();
        assert_eq!(options.mode, ConnectionMode::Api);
        assert_eq!(options.timeout, Duration::from_secs(3));
        assert!(options.fetch_counters);
        assert_eq!(options.language.as_deref(), Some("fr"));
    }

    #[cfg(feature = "http")]
    #[test]
    fn build_http() {
        let device = SyncThruBuilder::new("192.168.0.25/").build().unwrap();
        assert_eq!(device.base_url(), "http://192.168.0.25");
    }

    #[cfg(feature = "http")]
    #[test]
    fn build_rejects_unknown_language() {
        let result = SyncThruBuilder::new("192.168.0.25")
            .with_language("XX")
            .build();
        assert!(matches!(result, Err(Error::UnsupportedLocale(tag)) if tag == "XX"));
    }
}
