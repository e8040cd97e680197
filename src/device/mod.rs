// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! High-level handle for one SyncThru device.
//!
//! A [`SyncThru`] owns a transport and the latest published [`Snapshot`].
//! Each [`update`](SyncThru::update) builds a fresh snapshot and swaps it in
//! once complete, so readers always see either the previous or the new
//! snapshot in full. Dropping an in-flight update leaves the previous one
//! in place.
//!
//! ```no_run
//! use syncthru::SyncThru;
//!
//! # async fn example() -> syncthru::Result<()> {
//! let printer = SyncThru::http("192.168.0.25").build()?;
//! printer.update().await?;
//!
//! let snapshot = printer.snapshot();
//! if snapshot.is_online() {
//!     for (color, toner) in snapshot.toner_status(true) {
//!         println!("{color}: {}%", toner["remaining"]);
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod acquisition;
mod builder;

pub use acquisition::AcquisitionOptions;
pub use builder::SyncThruBuilder;

use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::Result;
use crate::protocol::Transport;
use crate::state::Snapshot;
use crate::types::ConnectionMode;

#[cfg(feature = "http")]
use crate::protocol::HttpClient;

/// A SyncThru printer.
///
/// # Type Parameter
///
/// `T` is the transport used to reach the device; [`HttpClient`] unless
/// built with [`SyncThruBuilder::build_with_transport`].
#[derive(Debug)]
pub struct SyncThru<T: Transport> {
    transport: T,
    base_url: String,
    options: AcquisitionOptions,
    snapshot: RwLock<Arc<Snapshot>>,
}

#[cfg(feature = "http")]
impl SyncThru<HttpClient> {
    /// Creates a builder for the device at `address`.
    #[must_use]
    pub fn builder(address: impl Into<String>) -> SyncThruBuilder {
        SyncThruBuilder::new(address)
    }

    /// Alias of [`builder`](Self::builder).
    #[must_use]
    pub fn http(address: impl Into<String>) -> SyncThruBuilder {
        SyncThruBuilder::new(address)
    }
}

impl<T: Transport> SyncThru<T> {
    pub(crate) fn new(transport: T, base_url: String, options: AcquisitionOptions) -> Self {
        Self {
            transport,
            base_url,
            options,
            snapshot: RwLock::new(Arc::new(Snapshot::offline())),
        }
    }

    /// Returns the device base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the configured connection mode.
    #[must_use]
    pub fn connection_mode(&self) -> ConnectionMode {
        self.options.mode
    }

    /// Returns the latest published snapshot.
    ///
    /// Before the first successful update this is the offline snapshot.
    #[must_use]
    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.snapshot.read().clone()
    }

    /// Queries the device and publishes a new snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedBySource`](crate::Error::UnsupportedBySource)
    /// in [`ConnectionMode::Api`] when the structured endpoint answers with
    /// something that is not structured data. The previous snapshot stays
    /// published in that case.
    pub async fn update(&self) -> Result<Arc<Snapshot>> {
        let snapshot =
            Arc::new(acquisition::acquire(&self.transport, &self.base_url, &self.options).await?);

        tracing::debug!(
            url = %self.base_url,
            state = %snapshot.device_status(),
            "Published snapshot"
        );
        *self.snapshot.write() = Arc::clone(&snapshot);
        Ok(snapshot)
    }
}
